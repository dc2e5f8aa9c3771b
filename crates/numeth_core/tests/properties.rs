use approx::assert_relative_eq;
use nalgebra::{DMatrix, DVector};
use numeth_core::direct::{
    gaussian_elimination, lu_crout, lu_doolittle, EliminationSettings, PivotStrategy,
};
use numeth_core::eigen::{power_method, PowerSettings};
use numeth_core::iterative::{gauss_seidel, jacobi, sor, IterativeSettings};
use numeth_core::ode::{euler, rk4};
use numeth_core::quadrature::{simpson_one_third, trapezoidal, StepSettings};
use numeth_core::roots::{
    bisection, illinois, newton_raphson, regula_falsi, secant, RootSettings,
};
use numeth_core::{LinearSystem, NumericError, Termination};

fn dominant_system() -> LinearSystem {
    LinearSystem::from_row_slice(
        4,
        &[
            10.0, -1.0, 2.0, 0.0, //
            -1.0, 11.0, -1.0, 3.0, //
            2.0, -1.0, 10.0, -1.0, //
            0.0, 3.0, -1.0, 8.0,
        ],
        &[6.0, 25.0, -11.0, 15.0],
    )
    .expect("system")
}

#[test]
fn bisection_bracket_always_contains_the_root() {
    let f = |x: f64| x * x * x - x - 2.0;
    let result = bisection(&f, 1.0, 2.0, RootSettings::default()).expect("bisection");
    assert!(result.converged());
    // root of x^3 - x - 2
    let root = 1.521_379_706_804_567_6;
    for step in &result.history {
        let (lo, hi) = step.bracket.expect("bisection records its bracket");
        assert!(lo <= root && root <= hi, "{lo} {hi}");
    }
    assert!((result.estimate - root).abs() <= 1e-7);
}

#[test]
fn every_root_finder_agrees_on_sqrt_two() {
    let f = |x: f64| x * x - 2.0;
    let df = |x: f64| 2.0 * x;
    let settings = RootSettings {
        tolerance: 1e-10,
        ..RootSettings::default()
    };
    let estimates = [
        bisection(&f, 1.0, 2.0, settings).expect("bisection"),
        regula_falsi(&f, 1.0, 2.0, settings).expect("regula falsi"),
        illinois(&f, 1.0, 2.0, settings).expect("illinois"),
        secant(&f, 1.0, 2.0, settings).expect("secant"),
        newton_raphson(&f, &df, 1.5, settings).expect("newton"),
    ];
    for result in estimates {
        assert!(result.converged(), "{:?}", result.termination);
        assert_relative_eq!(result.estimate, 2.0_f64.sqrt(), epsilon = 1e-8);
    }
}

#[test]
fn newton_reports_zero_derivative_on_first_iteration() {
    let f = |x: f64| x * x - 2.0;
    let zero = |_x: f64| 0.0;
    let result = newton_raphson(&f, &zero, 1.5, RootSettings::default()).expect("newton");
    assert_eq!(result.termination, Termination::ZeroDerivative { x: 1.5 });
    assert!(result.termination.is_degenerate());
    assert!(result.iterations <= 1);

    let good = newton_raphson(&f, &|x: f64| 2.0 * x, 1.5, RootSettings::default())
        .expect("newton");
    assert!(good.converged());
    assert!(good.iterations < 10);
}

#[test]
fn elimination_and_lu_solve_the_same_system() {
    let system = dominant_system();
    let expected = DVector::from_vec(vec![1.0, 2.0, -1.0, 1.0]);

    for pivot in [PivotStrategy::FirstNonZero, PivotStrategy::MaxMagnitude] {
        let settings = EliminationSettings {
            pivot,
            ..EliminationSettings::default()
        };
        let solution = gaussian_elimination(&system, settings);
        let x = solution.unique().expect("unique solution");
        assert_relative_eq!(x.clone(), expected.clone(), epsilon = 1e-12);
    }

    for lu in [
        lu_doolittle(system.matrix()).expect("doolittle"),
        lu_crout(system.matrix()).expect("crout"),
    ] {
        let x = lu.solve(system.rhs()).expect("lu solve");
        assert_relative_eq!(x, expected.clone(), epsilon = 1e-12);
        assert_relative_eq!(lu.reconstruct(), system.matrix().clone(), epsilon = 1e-12);
    }
}

#[test]
fn lu_round_trip_on_matrix_with_nonzero_minors() {
    let a = DMatrix::from_row_slice(
        3,
        3,
        &[2.0, -1.0, 0.0, -1.0, 2.0, -1.0, 0.0, -1.0, 2.0],
    );
    let doolittle = lu_doolittle(&a).expect("doolittle");
    let crout = lu_crout(&a).expect("crout");
    assert_relative_eq!(doolittle.reconstruct(), a.clone(), epsilon = 1e-14);
    assert_relative_eq!(crout.reconstruct(), a.clone(), epsilon = 1e-14);
    for i in 0..3 {
        assert_eq!(doolittle.l[(i, i)], 1.0);
        assert_eq!(crout.u[(i, i)], 1.0);
    }
}

#[test]
fn lu_without_pivoting_fails_where_elimination_swaps() {
    let system =
        LinearSystem::from_row_slice(2, &[0.0, 1.0, 1.0, 1.0], &[1.0, 2.0]).expect("system");
    let x = gaussian_elimination(&system, EliminationSettings::default());
    assert_eq!(x.unique(), Some(&DVector::from_vec(vec![1.0, 1.0])));
    assert!(matches!(
        lu_doolittle(system.matrix()),
        Err(NumericError::SingularMatrix { index: 0, .. })
    ));
}

#[test]
fn stationary_methods_reach_the_direct_solution() {
    let system = dominant_system();
    let direct = gaussian_elimination(&system, EliminationSettings::default());
    let expected = direct.unique().expect("unique").clone();

    let settings = IterativeSettings {
        max_iterations: 200,
        tolerance: Some(1e-10),
        verbose: false,
    };
    let j = jacobi(&system, None, settings).expect("jacobi");
    let gs = gauss_seidel(&system, None, settings).expect("gauss-seidel");
    let relaxed = sor(&system, None, 1.1, settings).expect("sor");

    for result in [&j, &gs, &relaxed] {
        assert!(result.converged());
        assert_relative_eq!(result.estimate.clone(), expected.clone(), epsilon = 1e-8);
    }
    assert!(gs.iterations <= j.iterations);
}

#[test]
fn power_method_on_diagonal_matrix() {
    let a = DMatrix::from_row_slice(2, 2, &[2.0, 0.0, 0.0, 1.0]);
    let x0 = DVector::from_vec(vec![1.0, 1.0]);
    let settings = PowerSettings {
        max_iterations: 100,
        ..PowerSettings::default()
    };
    let result = power_method(&a, &x0, settings).expect("power method");
    assert!(result.converged());
    assert!(result.iterations <= 100);
    assert!((result.estimate.eigenvalue - 2.0).abs() < 1e-5);
}

#[test]
fn simpson_is_more_accurate_than_trapezoid() {
    let f = |x: f64| x * x;
    let steps = StepSettings::subdivisions(100);
    let exact = 8.0 / 3.0;
    let s = simpson_one_third(&f, 0.0, 2.0, &steps).expect("simpson");
    let t = trapezoidal(&f, 0.0, 2.0, &steps).expect("trapezoid");
    assert!((s - exact).abs() < 1e-6);
    assert!((t - exact).abs() > (s - exact).abs());
}

#[test]
fn rk4_tracks_closed_form_far_better_than_euler() {
    let f = |x: f64, y: f64| x + y;
    let exact = |x: f64| 2.0 * x.exp() - x - 1.0;
    let e = euler(f, 0.0, 1.0, 0.1, 10).expect("euler");
    let r = rk4(f, 0.0, 1.0, 0.1, 10).expect("rk4");
    for i in 1..=10 {
        let x = r.t[i];
        assert!((r.y[i] - exact(x)).abs() * 100.0 < (e.y[i] - exact(x)).abs());
    }
}
