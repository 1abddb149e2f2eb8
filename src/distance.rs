// SPDX-License-Identifier: PMPL-1.0-or-later

//! Bounded optimal string alignment (OSA) distance.
//!
//! Single-character inserts, deletes and adjacent transpositions cost 1;
//! a substitution costs 2 unless the two characters are case variants of
//! each other, in which case it costs 1. OSA is the restricted variant of
//! Damerau-Levenshtein: a transposed pair cannot take part in any further
//! edit.
//!
//! The computation is bounded: as soon as the distance provably exceeds
//! `max_cost`, the function returns `max_cost + 1`. Callers must treat any
//! return value greater than `max_cost` as "no match", never as an exact
//! distance.

/// Inputs longer than this are not worth comparing; the exact distance is
/// never computed for them. Tuning constant, not a correctness requirement.
pub const MAX_STRING_SIZE: usize = 40;

/// Cost of one insert or delete.
pub const MOVE_COST: usize = 1;
/// Cost of substituting a character for its other-case twin.
pub const CASE_COST: usize = 1;
/// Cost of substituting one character for an unrelated one.
pub const SUBSTITUTE_COST: usize = 2;
/// Cost of transposing two adjacent characters.
pub const TRANSPOSE_COST: usize = 1;

fn substitution_cost(a: char, b: char) -> usize {
    if a == b {
        0
    } else if a.to_lowercase().eq(b.to_lowercase()) {
        CASE_COST
    } else {
        SUBSTITUTE_COST
    }
}

/// Minimum OSA edit cost to turn `a` into `b`, bounded by `max_cost`.
///
/// Returns `max_cost + 1` when the distance provably exceeds `max_cost`,
/// or when either input is longer than [`MAX_STRING_SIZE`].
pub fn osa_distance(a: &str, b: &str, max_cost: usize) -> usize {
    if a == b {
        return 0;
    }
    let exceeded = max_cost + 1;

    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.len() > MAX_STRING_SIZE || b.len() > MAX_STRING_SIZE {
        return exceeded;
    }

    // The distance is invariant to shared affixes; trimming them both
    // accelerates the DP and bounds its memory.
    let mut start = 0;
    while start < a.len() && start < b.len() && a[start] == b[start] {
        start += 1;
    }
    let mut a_end = a.len();
    let mut b_end = b.len();
    while a_end > start && b_end > start && a[a_end - 1] == b[b_end - 1] {
        a_end -= 1;
        b_end -= 1;
    }
    let a = &a[start..a_end];
    let b = &b[start..b_end];

    if a.is_empty() || b.is_empty() {
        let d = MOVE_COST * (a.len() + b.len());
        return if d > max_cost { exceeded } else { d };
    }

    // Keep the shorter string on the row dimension.
    let (a, b) = if a.len() < b.len() { (b, a) } else { (a, b) };
    if MOVE_COST * (a.len() - b.len()) > max_cost {
        return exceeded;
    }

    // Three rolling rows: the transposition case reaches back two rows.
    let cols = b.len() + 1;
    let mut prev2: Vec<usize> = vec![0; cols];
    let mut prev: Vec<usize> = (0..cols).map(|j| j * MOVE_COST).collect();
    let mut curr: Vec<usize> = vec![0; cols];

    for i in 1..=a.len() {
        curr[0] = i * MOVE_COST;
        let mut row_min = curr[0];
        for j in 1..=b.len() {
            let mut d = (prev[j] + MOVE_COST)
                .min(curr[j - 1] + MOVE_COST)
                .min(prev[j - 1] + substitution_cost(a[i - 1], b[j - 1]));
            if i > 1 && j > 1 && a[i - 1] == b[j - 2] && a[i - 2] == b[j - 1] {
                d = d.min(prev2[j - 2] + TRANSPOSE_COST);
            }
            curr[j] = d;
            row_min = row_min.min(d);
        }
        // Every remaining path only grows, so the bound is final.
        if row_min > max_cost {
            return exceeded;
        }
        std::mem::swap(&mut prev2, &mut prev);
        std::mem::swap(&mut prev, &mut curr);
    }

    let d = prev[b.len()];
    if d > max_cost {
        exceeded
    } else {
        d
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_strings_are_free() {
        assert_eq!(osa_distance("hello", "hello", 10), 0);
        assert_eq!(osa_distance("", "", 10), 0);
        assert_eq!(osa_distance("same", "same", 0), 0);
    }

    #[test]
    fn empty_string_distance_is_the_other_length() {
        assert_eq!(osa_distance("", "hello", 10), 5 * MOVE_COST);
        assert_eq!(osa_distance("hello", "", 10), 5 * MOVE_COST);
    }

    #[test]
    fn distance_is_symmetric() {
        assert_eq!(osa_distance("hello", "help", 10), osa_distance("help", "hello", 10));
        assert_eq!(osa_distance("Cat", "cta", 10), osa_distance("cta", "Cat", 10));
    }

    #[test]
    fn shared_affixes_do_not_change_the_distance() {
        assert_eq!(osa_distance("preab", "preba", 10), osa_distance("ab", "ba", 10));
        assert_eq!(osa_distance("hello", "hallo", 10), osa_distance("e", "a", 10));
    }

    #[test]
    fn transposition_costs_one() {
        assert_eq!(osa_distance("ab", "ba", 10), TRANSPOSE_COST);
        assert_eq!(osa_distance("hello", "hlelo", 10), TRANSPOSE_COST);
        // Non-adjacent swaps are two independent transpositions.
        assert_eq!(osa_distance("abcd", "badc", 10), 2 * TRANSPOSE_COST);
    }

    #[test]
    fn case_substitution_is_cheap() {
        assert_eq!(osa_distance("hello", "Hello", 10), CASE_COST);
        assert_eq!(osa_distance("HELLO", "hello", 10), 5 * CASE_COST);
        assert_eq!(osa_distance("cat", "cut", 10), SUBSTITUTE_COST);
    }

    #[test]
    fn multibyte_characters_count_once() {
        assert_eq!(osa_distance("naïve", "naive", 10), SUBSTITUTE_COST);
        assert_eq!(osa_distance("héllo", "hélo", 10), MOVE_COST);
    }

    #[test]
    fn bound_is_sentinel_not_exact() {
        assert_eq!(osa_distance("ab", "ba", 1), 1);
        assert_eq!(osa_distance("kitten", "sitting", 3), 4);
        assert_eq!(osa_distance("completely", "different", 2), 3);
    }

    #[test]
    fn oversize_input_is_rejected_before_trimming() {
        let long = "a".repeat(MAX_STRING_SIZE + 1);
        assert_eq!(osa_distance(&long, "a", 10), 11);
        assert_eq!(osa_distance("a", &long, 10), 11);
    }
}
