// Block-matching similarity.
//
// score = 2 * M / (len(a) + len(b)), where M is the total length of the blocks
// found by repeatedly taking the longest common substring of the still
// unmatched regions on either side of the previous match. Works on chars, not
// bytes, so Turkish letters count as one position each.

/// Similarity of two strings in `[0.0, 1.0]`.
///
/// Inputs are compared as given; callers normalize first. Two empty strings are
/// identical (1.0) and an empty string shares nothing with a non-empty one (0.0).
pub fn ratio(a: &str, b: &str) -> f64 {
    // Greedy block matching breaks ties by position, which is order dependent.
    // Scoring the pair in a fixed order keeps the result symmetric.
    let (a, b) = if a <= b { (a, b) } else { (b, a) };

    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    let matched = matched_chars(&a, &b);
    (2 * matched) as f64 / total as f64
}

/// Sum of the lengths of all matching blocks between `a` and `b`.
fn matched_chars(a: &[char], b: &[char]) -> usize {
    let mut matched = 0;
    let mut pending = vec![(0, a.len(), 0, b.len())];

    while let Some((alo, ahi, blo, bhi)) = pending.pop() {
        let (i, j, size) = longest_match(a, b, alo, ahi, blo, bhi);
        if size == 0 {
            continue;
        }
        matched += size;

        if alo < i && blo < j {
            pending.push((alo, i, blo, j));
        }
        if i + size < ahi && j + size < bhi {
            pending.push((i + size, ahi, j + size, bhi));
        }
    }

    matched
}

/// Longest common substring of `a[alo..ahi]` and `b[blo..bhi]`.
///
/// Returns `(start_in_a, start_in_b, length)`. Among equally long blocks the one
/// that ends first in `a`, then first in `b`, wins.
fn longest_match(
    a: &[char],
    b: &[char],
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let width = bhi - blo;
    let mut best = (alo, blo, 0);
    // run[j + 1] = length of the common suffix ending at a[i] and b[blo + j]
    let mut prev = vec![0usize; width + 1];
    let mut run = vec![0usize; width + 1];

    for i in alo..ahi {
        for offset in 0..width {
            let j = blo + offset;
            if a[i] == b[j] {
                let k = prev[offset] + 1;
                run[offset + 1] = k;
                if k > best.2 {
                    best = (i + 1 - k, j + 1 - k, k);
                }
            } else {
                run[offset + 1] = 0;
            }
        }
        std::mem::swap(&mut prev, &mut run);
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_identity() {
        assert!(approx(ratio("merhaba", "merhaba"), 1.0));
        assert!(approx(ratio("python nedir?", "python nedir?"), 1.0));
    }

    #[test]
    fn test_empty_inputs() {
        assert!(approx(ratio("", ""), 1.0));
        assert!(approx(ratio("", "abc"), 0.0));
        assert!(approx(ratio("abc", ""), 0.0));
    }

    #[test]
    fn test_known_values() {
        // "bcd" is the only block
        assert!(approx(ratio("abcd", "bcde"), 0.75));
        // "itt" then "n" on the right side: 2 * 4 / 13
        assert!(approx(ratio("kitten", "sitting"), 8.0 / 13.0));
        assert!(approx(ratio("abc", "xyz"), 0.0));
    }

    #[test]
    fn test_symmetry() {
        let pairs = [
            ("merhaba", "merhabalar"),
            ("abab", "baba"),
            ("güle güle", "görüşürüz"),
            ("python nedir?", "python programlama dili nedir?"),
            ("aaab", "abaa"),
        ];
        for (a, b) in pairs {
            assert!(approx(ratio(a, b), ratio(b, a)), "asymmetric for {a:?} / {b:?}");
        }
    }

    #[test]
    fn test_counts_chars_not_bytes() {
        // Each Turkish letter is a single position.
        assert!(approx(ratio("ış", "iş"), 0.5));
    }

    #[test]
    fn test_tolerates_misspelling() {
        assert!(ratio("merhba", "merhaba") > 0.8);
        assert!(ratio("selm", "selam") > 0.8);
    }
}
