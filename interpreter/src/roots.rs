use std::iter;

use itertools::Itertools;
use tracing::debug;

use crate::{
    config::SolverConfig,
    error::ErrorKind,
    value::{Expression, Polynomial},
};

/// Real roots of `poly`, strictly ascending, with no two closer than
/// `solver.threshold`.
///
/// Roots of the derivative split `[lower_bound, upper_bound]` into monotonic
/// pieces. A piece whose ends are on opposite sides of zero holds exactly one
/// root, which is found by bisection. A constant has no roots, including the
/// zero polynomial.
pub fn find_roots(
    poly: &Polynomial,
    solver: &SolverConfig,
    trace: bool,
) -> Result<Vec<f64>, ErrorKind> {
    #[cfg(feature = "tracy")]
    profiling::scope!("find_roots");
    let threshold = solver.threshold;
    let mut roots = match poly.degree() {
        0 => Vec::new(),
        1 => vec![-poly.coefficient(0) / poly.coefficient(1)],
        _ => {
            let critical = find_roots(&poly.derivative(), solver, trace)?;
            let breakpoints = iter::once(solver.lower_bound)
                .chain(
                    critical
                        .into_iter()
                        .filter(|&r| solver.lower_bound < r && r < solver.upper_bound),
                )
                .chain(iter::once(solver.upper_bound))
                .collect_vec();

            let near_zero = |x: f64| poly.evaluate(x).abs() < threshold;
            let mut roots = breakpoints
                .iter()
                .copied()
                .filter(|&x| near_zero(x))
                .collect_vec();
            for (lo, hi) in breakpoints.iter().copied().tuple_windows() {
                if near_zero(lo) || near_zero(hi) {
                    continue;
                }
                // A product that is merely small is not a sign change.
                if poly.evaluate(lo) * poly.evaluate(hi) < 0.0 {
                    roots.push(bisect(poly, lo, hi, threshold)?);
                }
            }
            roots.sort_by(f64::total_cmp);
            roots
        }
    };

    for root in roots.iter_mut() {
        if root.abs() < threshold {
            *root = 0.0;
        }
    }
    roots.dedup_by(|next, kept| (*next - *kept).abs() < threshold);

    if trace {
        debug!(polynomial = %poly, roots = ?roots, "found roots");
    }
    Ok(roots)
}

/// Narrows `[lo, hi]` to a point where `|poly| < threshold`.
///
/// The values at the two ends must differ in sign, or one of them must be
/// exactly zero; anything else is [`ErrorKind::Indeterminate`]. Halving goes
/// on past the threshold width until the value is small enough or the
/// midpoint no longer moves, in which case the end closer to zero is
/// returned.
pub fn bisect(
    poly: &Polynomial,
    mut lo: f64,
    mut hi: f64,
    threshold: f64,
) -> Result<f64, ErrorKind> {
    let mut low_value = poly.evaluate(lo);
    let mut high_value = poly.evaluate(hi);
    if low_value.is_nan()
        || high_value.is_nan()
        || low_value == high_value
        || low_value * high_value > 0.0
    {
        return Err(ErrorKind::Indeterminate { lo, hi });
    }
    if low_value == 0.0 {
        return Ok(lo);
    }
    if high_value == 0.0 {
        return Ok(hi);
    }

    loop {
        let mid = (lo + hi) / 2.0;
        if mid <= lo || mid >= hi {
            break;
        }
        let value = poly.evaluate(mid);
        if value.abs() < threshold {
            return Ok(mid);
        }
        if (value < 0.0) == (low_value < 0.0) {
            lo = mid;
            low_value = value;
        } else {
            hi = mid;
            high_value = value;
        }
    }
    if low_value.abs() <= high_value.abs() {
        Ok(lo)
    } else {
        Ok(hi)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use pretty_assertions::assert_eq;

    use super::*;

    fn with_roots(roots: &[f64]) -> Polynomial {
        roots.iter().fold(Polynomial::one(), |acc, r| {
            acc.multiply(&Polynomial::from_coefficients([-r, 1.0]))
                .unwrap()
        })
    }

    fn solve(poly: &Polynomial) -> Vec<f64> {
        find_roots(poly, &SolverConfig::default(), false).unwrap()
    }

    fn assert_roots(found: &[f64], expected: &[f64]) {
        assert_eq!(found.len(), expected.len(), "{found:?} vs {expected:?}");
        for (f, e) in found.iter().zip(expected) {
            assert_abs_diff_eq!(*f, *e, epsilon = 1e-5);
        }
    }

    #[test]
    fn constants_have_no_roots() {
        assert!(solve(&Polynomial::zero()).is_empty());
        assert!(solve(&Polynomial::constant(3.0)).is_empty());
    }

    #[test]
    fn linear() {
        assert_eq!(solve(&Polynomial::from_coefficients([-5.0, 1.0])), vec![5.0]);
        assert_eq!(solve(&Polynomial::from_coefficients([-10.0, 2.0])), vec![5.0]);
        // -0/1 is snapped to a plain zero.
        let root = solve(&Polynomial::variable());
        assert_eq!(root, vec![0.0]);
        assert!(root[0].is_sign_positive());
    }

    #[test]
    fn quadratic() {
        assert_roots(&solve(&with_roots(&[-2.0, 2.0])), &[-2.0, 2.0]);
        assert!(solve(&Polynomial::from_coefficients([1.0, 0.0, 1.0])).is_empty());
    }

    #[test]
    fn double_root_is_found_once() {
        assert_eq!(solve(&with_roots(&[1.0, 1.0])), vec![1.0]);
    }

    #[test]
    fn derivative_without_roots() {
        // x^3 + x is monotonic; the first midpoint is the root.
        let poly = Polynomial::from_coefficients([0.0, 1.0, 0.0, 1.0]);
        assert_eq!(solve(&poly), vec![0.0]);
    }

    #[test]
    fn ascending_and_close_to_zero() {
        let samples: [&[f64]; 6] = [
            &[-3.0, 1.0],
            &[-2.0, 0.5, 4.0],
            &[-1.0, 0.0, 1.0],
            &[-2.0, -1.0, 1.0, 2.0],
            &[-7.5, 0.25, 3.0, 10.0],
            &[0.5, 1.5, 2.5],
        ];
        for expected in samples {
            let poly = with_roots(expected);
            let found = solve(&poly);
            assert_roots(&found, expected);
            assert!(
                found.iter().tuple_windows().all(|(a, b)| a < b),
                "not ascending: {found:?}"
            );
            for r in found {
                assert!(poly.evaluate(r).abs() < 1e-6, "P({r}) = {}", poly.evaluate(r));
            }
        }
    }

    #[test]
    fn steep_roots_still_evaluate_near_zero() {
        // Near its roots P' is in the hundreds or thousands, so an interval
        // of width 1e-6 is not yet close enough.
        let samples: [&[f64]; 3] = [
            &[-2.0, 2.0, 30.0],
            &[-40.0, 5.0, 60.0],
            &[-3.0, -1.0, 2.0, 4.0, 9.0],
        ];
        for expected in samples {
            let poly = with_roots(expected);
            let found = solve(&poly);
            assert_roots(&found, expected);
            for r in found {
                assert!(poly.evaluate(r).abs() < 1e-6, "P({r}) = {}", poly.evaluate(r));
            }
        }
        let quartic = Polynomial::from_coefficients([-16.0, 0.0, 0.0, 0.0, 1.0]);
        for r in solve(&quartic) {
            assert!(quartic.evaluate(r).abs() < 1e-6, "P({r}) = {}", quartic.evaluate(r));
        }
    }

    #[test]
    fn bisect_stops_when_the_midpoint_cannot_move() {
        // 1e12 * (x - 0.1): one ulp away from 0.1 is already worth about
        // 1e-5, so the search may run out of doubles before the threshold.
        let poly = Polynomial::from_coefficients([-1e11, 1e12]);
        let root = bisect(&poly, 0.0, 1.0, 1e-6).unwrap();
        assert_abs_diff_eq!(root, 0.1, epsilon = 1e-15);
    }

    #[test]
    fn small_positive_product_is_not_a_sign_change() {
        // Between the critical points 0 and 1 the values are 0.001 and
        // 0.0001. Their product is below the threshold but there is no root
        // in between, so only the root left of zero is reported.
        let poly = Polynomial::from_coefficients([0.001, 0.0, -0.0027, 0.0018]);
        let roots = solve(&poly);
        assert_eq!(roots.len(), 1, "{roots:?}");
        assert!(-0.6 < roots[0] && roots[0] < -0.5, "{roots:?}");
    }

    #[test]
    fn bounds_limit_the_search() {
        let solver = SolverConfig {
            lower_bound: 0.0,
            upper_bound: 100.0,
            ..SolverConfig::default()
        };
        let roots = find_roots(&with_roots(&[-2.0, 2.0]), &solver, false).unwrap();
        assert_roots(&roots, &[2.0]);
    }

    #[test]
    fn bisect_requires_a_sign_change() {
        let poly = Polynomial::from_coefficients([1.0, 0.0, 1.0]);
        assert_eq!(
            bisect(&poly, -1.0, 1.0, 1e-6),
            Err(ErrorKind::Indeterminate { lo: -1.0, hi: 1.0 })
        );
        assert_eq!(
            bisect(&poly, 0.0, 2.0, 1e-6),
            Err(ErrorKind::Indeterminate { lo: 0.0, hi: 2.0 })
        );
    }

    #[test]
    fn bisect_returns_exact_endpoints() {
        let poly = with_roots(&[3.0]);
        assert_eq!(bisect(&poly, 3.0, 5.0, 1e-6), Ok(3.0));
        assert_eq!(bisect(&poly, 1.0, 3.0, 1e-6), Ok(3.0));
    }

    #[test_log::test]
    fn tracing_does_not_change_roots() {
        let poly = with_roots(&[-1.0, 0.5, 2.0]);
        let quiet = solve(&poly);
        let traced = find_roots(&poly, &SolverConfig::default(), true).unwrap();
        assert_eq!(quiet, traced);
    }
}
