// SPDX-License-Identifier: PMPL-1.0-or-later

//! Did-you-mean suggestions over a tagged candidate pool.
//!
//! The engine knows nothing about what a candidate *is* — only its name and
//! its capability tags. Callers partition the pool by passing a context tag
//! set; an empty context widens the pool to everything. A typo'd call
//! expression therefore never gets a non-callable attribute suggested,
//! unless the caller explicitly asked for the wider pool.

use crate::distance::osa_distance;
use crate::types::Candidate;

/// How far a candidate may be from `name` and still qualify. Shorter names
/// tolerate less. Tuning choice, not an invariant.
pub fn suggestion_threshold(name: &str) -> usize {
    name.chars().count() / 3 + 1
}

/// All candidate names in the partition described by `context`, in pool
/// order. The "no close match, list everything" fallback.
pub fn partition<'a>(candidates: &'a [Candidate], context: &[String]) -> Vec<&'a str> {
    candidates
        .iter()
        .filter(|c| c.in_partition(context))
        .map(|c| c.name.as_str())
        .collect()
}

/// The unique best match for `wrong_name`, or `None` when nothing qualifies
/// or several candidates tie for the minimum distance (ambiguous).
pub fn suggest(wrong_name: &str, candidates: &[Candidate], context: &[String]) -> Option<String> {
    let matches = suggest_all(wrong_name, candidates, context);
    match matches.as_slice() {
        [single] => Some(single.clone()),
        _ => None,
    }
}

/// Every candidate achieving the minimum qualifying distance, in pool
/// order. Empty when nothing is close enough.
pub fn suggest_all(wrong_name: &str, candidates: &[Candidate], context: &[String]) -> Vec<String> {
    let threshold = suggestion_threshold(wrong_name);
    let mut best_cost = threshold + 1;
    let mut best: Vec<String> = Vec::new();

    for candidate in candidates {
        if !candidate.in_partition(context) {
            continue;
        }
        let cost = osa_distance(wrong_name, &candidate.name, threshold);
        if cost > threshold || cost > best_cost {
            continue;
        }
        if cost < best_cost {
            best_cost = cost;
            best.clear();
        }
        best.push(candidate.name.clone());
    }

    best
}
