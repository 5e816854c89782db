// src/wordlist.rs
// =============================================================================
// Loads the wordlist that candidate hostnames are built from.
//
// Format: one word per line. Lines are trimmed and blank lines are skipped.
// Order and duplicates are kept as they appear in the file.
// =============================================================================

use anyhow::{Context, Result};
use std::path::Path;

// Reads a wordlist file from disk
//
// Returns an error (with the file path attached) if the file can't be read.
// An empty result is NOT an error here - the caller decides what to do.
pub async fn load_wordlist(path: &Path) -> Result<Vec<String>> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read wordlist {}", path.display()))?;

    Ok(parse_words(&content))
}

/// Splits wordlist text into candidate words.
pub fn parse_words(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why tokio::fs instead of std::fs?
//    - std::fs blocks the thread, tokio::fs hands the read to a helper
//      thread so the async runtime keeps running
//
// 2. What does .with_context() add?
//    - The original io error only says "No such file or directory"
//    - with_context wraps it with which file we were trying to read
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_skips_blank_lines() {
        let words = parse_words("admin\n\n  api  \r\n\t\ndev\n");
        assert_eq!(words, vec!["admin", "api", "dev"]);
    }

    #[test]
    fn test_parse_keeps_duplicates_in_order() {
        let words = parse_words("dev\nadmin\ndev");
        assert_eq!(words, vec!["dev", "admin", "dev"]);
    }

    #[test]
    fn test_parse_empty() {
        assert!(parse_words("").is_empty());
        assert!(parse_words("\n   \n").is_empty());
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "admin").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "api").unwrap();

        let words = load_wordlist(file.path()).await.unwrap();
        assert_eq!(words, vec!["admin", "api"]);
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let err = load_wordlist(Path::new("/definitely/not/here.txt"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.txt"));
    }
}
