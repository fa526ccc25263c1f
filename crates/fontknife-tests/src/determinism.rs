//! Byte-level determinism checks.

/// Result of a determinism verification.
#[derive(Debug, Clone)]
pub struct DeterminismResult {
    /// Whether all runs produced identical output.
    pub is_deterministic: bool,
    /// Number of runs performed.
    pub runs: usize,
    /// BLAKE3 hash of the first run's output.
    pub hash: String,
    /// Offset of the first differing byte, if any.
    pub first_difference: Option<usize>,
}

/// BLAKE3 hash of `data` as hex.
pub fn compute_hash(data: &[u8]) -> String {
    blake3::hash(data).to_hex().to_string()
}

/// Run `generate` `runs` times and compare every output to the first.
pub fn verify_determinism<F>(mut generate: F, runs: usize) -> DeterminismResult
where
    F: FnMut() -> Vec<u8>,
{
    let first = generate();
    let mut first_difference = None;

    for _ in 1..runs {
        let output = generate();
        if output != first {
            first_difference = Some(
                first
                    .iter()
                    .zip(&output)
                    .position(|(a, b)| a != b)
                    .unwrap_or(first.len().min(output.len())),
            );
            break;
        }
    }

    DeterminismResult {
        is_deterministic: first_difference.is_none(),
        runs,
        hash: compute_hash(&first),
        first_difference,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_runs() {
        let result = verify_determinism(|| vec![1, 2, 3], 3);
        assert!(result.is_deterministic);
        assert_eq!(result.hash, compute_hash(&[1, 2, 3]));
    }

    #[test]
    fn test_difference_offset() {
        let mut calls = 0u8;
        let result = verify_determinism(
            || {
                calls += 1;
                vec![0, 0, calls]
            },
            2,
        );
        assert!(!result.is_deterministic);
        assert_eq!(result.first_difference, Some(2));
    }

    #[test]
    fn test_length_difference() {
        let mut len = 1;
        let result = verify_determinism(
            || {
                len += 1;
                vec![7; len]
            },
            2,
        );
        assert_eq!(result.first_difference, Some(2));
    }
}
