use std::path::Path;

use anyhow::{Context, Result};

pub async fn read_domains(path: &Path) -> Result<Vec<String>> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read domain list {}", path.display()))?;
    Ok(parse_domains(&text))
}

/// One domain per line, trimmed. Blank lines are skipped; nothing else is filtered.
pub fn parse_domains(text: &str) -> Vec<String> {
    text.trim_start_matches('\u{feff}')
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_order_and_duplicates() {
        let text = "\u{feff}b.com\r\n\n  a.com  \nhttps://c.com/x\n\nb.com\n";
        assert_eq!(
            parse_domains(text),
            vec!["b.com", "a.com", "https://c.com/x", "b.com"]
        );
    }

    #[tokio::test]
    async fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_domains(&dir.path().join("nope.txt")).await.unwrap_err();
        assert!(err.to_string().contains("nope.txt"));
    }
}
