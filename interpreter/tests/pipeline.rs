use std::thread;

use approx::assert_abs_diff_eq;
use interpreter::{calculate, respond, Answer, BracketSide, ErrorKind, Options};
use pretty_assertions::assert_eq;

fn reply(input: &str) -> String {
    respond(input, &Options::default())
}

fn error(input: &str) -> ErrorKind {
    calculate(input, &Options::default()).unwrap_err().kind
}

fn roots(input: &str) -> Vec<f64> {
    match calculate(input, &Options::default()) {
        Ok(Answer::Roots(roots)) => roots,
        other => panic!("{input}: expected roots, got {other:?}"),
    }
}

#[test]
fn direct_evaluation() {
    assert_eq!(reply("2+3*4"), "Result: 14.000000");
    assert_eq!(reply("(2+3)*4"), "Result: 20.000000");
    assert_eq!(reply("2^10"), "Result: 1024.000000");
    assert_eq!(reply("10%3"), "Result: 1.000000");
    assert_eq!(reply(" 1.5 * (2 - 0.5) "), "Result: 2.250000");
    assert_eq!(reply("0-7%3"), "Result: -1.000000");
    assert_eq!(reply("2^3^2"), "Result: 64.000000");
}

#[test]
fn equations() {
    assert_eq!(reply("x^2-4=0"), "Roots: -2.000000 2.000000");
    assert_eq!(reply("x-5=0"), "Roots: 5.000000");
    assert_eq!(reply("x^2+1=0"), "Roots: No roots");
    assert_eq!(reply("2*x=10"), "Roots: 5.000000");
    assert_eq!(reply("x=0"), "Roots: 0.000000");
    assert_eq!(reply("x = x"), "Roots: No roots");
    assert_eq!(reply("x^2 = 2*x - 1"), "Roots: 1.000000");
}

#[test]
fn roots_satisfy_the_equation() {
    for (input, expected) in [
        ("x^3 - 6*x^2 + 11*x - 6 = 0", vec![1.0, 2.0, 3.0]),
        ("(x+1)*(x-0.5) = 0", vec![-1.0, 0.5]),
        ("x^4 = 16", vec![-2.0, 2.0]),
        ("x^2 - 2 = 0", vec![-(2f64.sqrt()), 2f64.sqrt()]),
    ] {
        let found = roots(input);
        assert_eq!(found.len(), expected.len(), "{input}: {found:?}");
        for (f, e) in found.iter().zip(&expected) {
            assert_abs_diff_eq!(*f, *e, epsilon = 1e-5);
        }
    }
}

#[test]
fn roots_evaluate_below_threshold() {
    let cases: [(&str, fn(f64) -> f64); 3] = [
        ("x^4=16", |x| x.powi(4) - 16.0),
        ("x^2-4=0", |x| x * x - 4.0),
        ("x^3-6*x^2+11*x-6=0", |x| ((x - 6.0) * x + 11.0) * x - 6.0),
    ];
    for (input, poly) in cases {
        let found = roots(input);
        assert!(!found.is_empty(), "{input}");
        for r in found {
            assert!(poly(r).abs() < 1e-6, "{input}: P({r}) = {}", poly(r));
        }
    }
}

#[test]
fn errors() {
    assert_eq!(error("2/0"), ErrorKind::DivideByZero);
    assert_eq!(error("2+x"), ErrorKind::VariableOutsideEquation);
    assert_eq!(error("(2+3"), ErrorKind::BracketMismatch(BracketSide::Left));
    assert_eq!(error("2 3"), ErrorKind::ConsecutiveOperands);
    assert_eq!(error("2(3)"), ErrorKind::ImplicitMultiplication(BracketSide::Left));
    assert_eq!(error("2 & 3"), ErrorKind::UndefinedSymbol('&'));
    assert_eq!(error("1..5"), ErrorKind::MalformedNumber("1..5".into()));
    assert_eq!(error(""), ErrorKind::MissingExpression);
    assert_eq!(error("x^256=1"), ErrorKind::DegreeTooLarge);
    assert_eq!(error("x="), ErrorKind::StackUnderflow);
    assert_eq!(error("x=1=2"), ErrorKind::UnknownOperator('='));
}

#[test]
fn error_replies() {
    assert_eq!(reply("2/0"), "Error: divide by zero");
    assert_eq!(reply("2+x"), "Error: variables are only permitted in equations");
    assert_eq!(reply("(2+3"), "Error: unmatched left bracket");
    assert_eq!(reply("2 3"), "Error: consecutive numbers or variables");
    assert_eq!(reply("2^0.5"), "Error: exponent must be an integer");
    assert_eq!(reply("x=1=2"), "Error: unknown operator '='");
}

#[test]
fn options_apply_per_call() {
    let coarse = Options {
        precision: 2,
        ..Options::default()
    };
    assert_eq!(respond("1/3", &coarse), "Result: 0.33");
    assert_eq!(reply("1/3"), "Result: 0.333333");

    let traced = Options::default().with_trace(true);
    assert_eq!(respond("x^2-4=0", &traced), reply("x^2-4=0"));
}

#[test]
fn concurrent_requests_do_not_interfere() {
    let requests = ["(1+2)*(3+4)", "x^2-9=0", "((2))^(1+1)", "2/0", "x*(x-1)=0"];
    let expected: Vec<String> = requests.iter().map(|r| reply(r)).collect();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            thread::spawn(move || {
                (0..50)
                    .flat_map(|_| requests.iter().map(|r| reply(r)))
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    for handle in handles {
        let replies = handle.join().unwrap();
        for chunk in replies.chunks(requests.len()) {
            assert_eq!(chunk, expected.as_slice());
        }
    }
}
