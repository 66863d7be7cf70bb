//! Directory scatter of a domain's files

use crate::models::directory_of;
use rustc_hash::FxHashSet;

/// `(distinct directories - 1) / (files - 1)`, 0 for zero or one file
pub fn calculate_fragmentation(files: &[&str]) -> f64 {
    if files.len() <= 1 {
        return 0.0;
    }
    let directories: FxHashSet<&str> = files.iter().map(|f| directory_of(f)).collect();
    (directories.len() - 1) as f64 / (files.len() - 1) as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_file_is_not_fragmented() {
        assert_eq!(calculate_fragmentation(&[]), 0.0);
        assert_eq!(calculate_fragmentation(&["src/a.ts"]), 0.0);
    }

    #[test]
    fn test_colocated_files() {
        assert_eq!(
            calculate_fragmentation(&["src/user/a.ts", "src/user/b.ts", "src/user/c.ts"]),
            0.0
        );
    }

    #[test]
    fn test_fully_scattered_files() {
        assert_eq!(
            calculate_fragmentation(&["a/x.ts", "b/x.ts", "c/x.ts", "x.ts"]),
            1.0
        );
    }

    #[test]
    fn test_partial_scatter() {
        let score = calculate_fragmentation(&["a/1.ts", "a/2.ts", "b/3.ts"]);
        assert!((score - 0.5).abs() < 1e-9);
    }
}
