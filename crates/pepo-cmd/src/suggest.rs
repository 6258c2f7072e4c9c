//! "Did you mean" matching for unrecognized input
//!
//! A candidate matches an invalid token when it is an anagram of the token
//! or when their edit distance is strictly below the sensitivity threshold.

/// Highest accepted sensitivity
pub const MAX_SENSITIVITY: usize = 10;

/// Edit distance between two strings
///
/// Counts insertions, deletions, substitutions and swaps of two adjacent
/// characters (optimal string alignment). Works on chars, not bytes.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let n = a.len();
    let m = b.len();

    if n == 0 {
        return m;
    }
    if m == 0 {
        return n;
    }

    let mut matrix = vec![vec![0usize; m + 1]; n + 1];
    for (i, row) in matrix.iter_mut().enumerate() {
        row[0] = i;
    }
    for j in 0..=m {
        matrix[0][j] = j;
    }

    for i in 1..=n {
        for j in 1..=m {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            let mut best = (matrix[i - 1][j] + 1)
                .min(matrix[i][j - 1] + 1)
                .min(matrix[i - 1][j - 1] + cost);
            if i > 1 && j > 1 && a[i - 1] == b[j - 2] && a[i - 2] == b[j - 1] {
                best = best.min(matrix[i - 2][j - 2] + 1);
            }
            matrix[i][j] = best;
        }
    }

    matrix[n][m]
}

/// Whether two strings use exactly the same characters (case-sensitive)
pub fn is_anagram(a: &str, b: &str) -> bool {
    let mut left: Vec<char> = a.chars().collect();
    let mut right: Vec<char> = b.chars().collect();
    if left.len() != right.len() {
        return false;
    }
    left.sort_unstable();
    right.sort_unstable();
    left == right
}

/// Whether `candidate` should be offered for `invalid`
pub fn is_suggestion(invalid: &str, candidate: &str, sensitivity: usize) -> bool {
    is_anagram(invalid, candidate) || edit_distance(candidate, invalid) < sensitivity
}

/// Collect candidates close to an invalid token
///
/// Results keep candidate order; nothing is re-ranked by distance.
pub fn suggest<S: AsRef<str>>(invalid: &str, candidates: &[S], sensitivity: usize) -> Vec<String> {
    candidates
        .iter()
        .map(AsRef::as_ref)
        .filter(|candidate| is_suggestion(invalid, candidate, sensitivity))
        .map(str::to_string)
        .collect()
}
