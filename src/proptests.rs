//! Property-based tests for parsing, simplification and numeric differentiation.

use proptest::prelude::*;

use crate::eval::Value;
use crate::expr::Expr;
use crate::parser::parse;

const SAMPLES: [f64; 7] = [-2.0, -0.5, 0.0, 0.5, 1.0, 2.5, 3.0];

// Strategy for leaves: small naturals, bounded reals, pi and x
fn leaf() -> impl Strategy<Value = Expr> {
    prop_oneof![
        (0u64..1000).prop_map(Expr::NaturalNumber),
        (-100.0f64..100.0).prop_map(Expr::RealNumber),
        Just(Expr::Pi),
        Just(Expr::Variable),
    ]
}

// Strategy for trees of bounded depth over every node kind
fn tree() -> impl Strategy<Value = Expr> {
    leaf().prop_recursive(4, 32, 2, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone()).prop_map(|(a, b)| Expr::sum(a, b)),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| Expr::difference(a, b)),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| Expr::product(a, b)),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| Expr::quotient(a, b)),
            (inner.clone(), 0u64..4).prop_map(|(a, n)| Expr::power_natural(a, n)),
            inner.clone().prop_map(|a| Expr::sin(a)),
            inner.clone().prop_map(|a| Expr::cos(a)),
            inner.clone().prop_map(|a| Expr::exp(a)),
            inner.clone().prop_map(|a| Expr::ln(a)),
            inner.prop_map(|a| Expr::factorial(a)),
        ]
    })
}

fn same_values(a: &Expr, b: &Expr) -> bool {
    let xs = Value::Vector(SAMPLES.to_vec());
    match (a.evaluate(&xs), b.evaluate(&xs)) {
        (Ok(left), Ok(right)) => left
            .as_slice()
            .iter()
            .zip(right.as_slice())
            .all(|(l, r)| l == r || (l.is_nan() && r.is_nan())),
        _ => false,
    }
}

proptest! {
    #[test]
    fn formula_round_trip(expr in tree()) {
        let formula = expr.to_formula();
        let parsed = parse(&formula);
        prop_assert!(parsed.is_ok(), "failed to read back {}", formula);
        if let Ok(parsed) = parsed {
            prop_assert!(same_values(&expr, &parsed), "{} read back differently", formula);
        }
    }

    #[test]
    fn simplify_idempotent(expr in tree()) {
        let once = expr.simplify();
        let twice = once.simplify();
        prop_assert!(same_values(&once, &twice));
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn simplify_never_grows(expr in tree()) {
        prop_assert!(expr.simplify().node_count() <= expr.node_count());
    }

    #[test]
    fn newton_converges_to_analytical(x in -2.0f64..2.0) {
        // sin, x^3 and e^x have second derivatives bounded by 14 on [-2, 2.01]
        for formula in ["s(x)", "^(x,3)", "e(x)"] {
            let expr = parse(formula).unwrap();
            let exact = expr.analytical_derivative().eval(x).unwrap();
            for h in [1e-2, 1e-3, 1e-4] {
                let approx = expr
                    .newton_derivative(&Value::Scalar(x), h)
                    .unwrap()
                    .as_scalar()
                    .unwrap();
                prop_assert!((approx - exact).abs() <= 7.0 * h + 1e-9);
            }
        }
    }
}

#[test]
fn derivative_correctness() {
    let xs: Vec<f64> = (1..40).map(|i| i as f64 * 0.1 - 2.0).filter(|x| *x != 0.0).collect();

    let sine = Expr::sin(Expr::Variable).analytical_derivative().simplify();
    let cubic = Expr::power_natural(Expr::Variable, 3)
        .analytical_derivative()
        .simplify();
    let log = Expr::ln(Expr::Variable).analytical_derivative();

    for x in xs {
        assert_eq!(sine.eval(x).unwrap(), x.cos());
        assert!((cubic.eval(x).unwrap() - 3.0 * x * x).abs() < 1e-12);
        assert!((log.eval(x).unwrap() - 1.0 / x).abs() < 1e-12);
    }
}

#[test]
fn constant_folding() {
    let folded = Expr::sum(Expr::NaturalNumber(1), Expr::NaturalNumber(2)).simplify();
    assert_eq!(folded, Expr::NaturalNumber(3));
    assert_eq!(folded.eval(0.0), Ok(3.0));
}
