//! A standalone Pareto-dominance utility, unrelated to the search loop.
//!
//! Minimization-oriented: a point dominates another when it is no worse in
//! every criterion and strictly better in at least one.

use rayon::prelude::*;

/// Returns `true`, per input, for points that are Pareto-dominated (strictly
/// worse in at least one criterion and no better in any) by some other,
/// non-dominated point.
///
/// Each element of `points` is one point's criteria vector; all points must
/// have the same length. Domination is minimization-oriented: lower is
/// better in every criterion.
///
/// Compares every unordered pair once, skipping a point as soon as it is
/// known to be dominated.
pub fn is_dominated(points: &[Vec<f64>]) -> Vec<bool> {
    let n = points.len();
    let mut dominated = vec![false; n];

    for i in 0..n {
        if dominated[i] {
            continue;
        }
        for j in (i + 1)..n {
            if dominated[j] {
                continue;
            }
            match dominates(&points[i], &points[j]) {
                std::cmp::Ordering::Less => dominated[j] = true,
                std::cmp::Ordering::Greater => dominated[i] = true,
                std::cmp::Ordering::Equal => {}
            }
        }
    }

    dominated
}

/// A `rayon`-parallel variant of [`is_dominated`].
///
/// Not early-skipping (each point's domination is decided independently by
/// scanning every other point), so it does strictly more comparisons than
/// [`is_dominated`] in exchange for being trivially parallelizable.
pub fn is_dominated_par(points: &[Vec<f64>]) -> Vec<bool> {
    (0..points.len())
        .into_par_iter()
        .map(|i| {
            points
                .iter()
                .enumerate()
                .any(|(j, p)| j != i && dominates(p, &points[i]) == std::cmp::Ordering::Less)
        })
        .collect()
}

/// Strict Pareto comparison: `Less` means `a` dominates `b`.
fn dominates(a: &[f64], b: &[f64]) -> std::cmp::Ordering {
    let mut a_better = false;
    let mut b_better = false;
    for (&x, &y) in a.iter().zip(b) {
        if x < y {
            a_better = true;
        } else if y < x {
            b_better = true;
        }
    }
    match (a_better, b_better) {
        (true, false) => std::cmp::Ordering::Less,
        (false, true) => std::cmp::Ordering::Greater,
        _ => std::cmp::Ordering::Equal,
    }
}
