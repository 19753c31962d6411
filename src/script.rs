//! Schema script loading, token substitution, and batch splitting.
//!
//! A schema script is a plain text file containing one or more SQL statements
//! separated by batch-separator lines (a line consisting solely of the
//! separator keyword, `GO` by default). Scripts may contain `[{Name}]`
//! placeholder tokens that are substituted with configuration values before
//! execution.

use crate::error::{InstallError, InstallResult};
use std::path::Path;

/// A schema script held in memory.
#[derive(Debug, Clone)]
pub struct SchemaScript {
    text: String,
}

impl SchemaScript {
    /// Read a schema script from a file.
    pub fn from_file(path: &Path) -> InstallResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| InstallError::script(path.display().to_string(), e.to_string()))?;
        Ok(Self { text })
    }

    /// Wrap an inline SQL string as a script.
    pub fn from_sql(sql: impl Into<String>) -> Self {
        Self { text: sql.into() }
    }

    /// Replace every occurrence of each token with its mapped value.
    ///
    /// Substitution is literal: token text and replacement values are never
    /// interpreted as patterns. Tokens are applied in order.
    pub fn substitute(mut self, tokens: &[(String, String)]) -> Self {
        for (token, value) in tokens {
            if self.text.contains(token.as_str()) {
                self.text = self.text.replace(token.as_str(), value);
            }
        }
        self
    }

    /// Split the script into executable statements on batch-separator lines.
    ///
    /// A separator line is a line whose content, after trimming whitespace,
    /// equals the separator keyword case-insensitively. Blank batches are
    /// dropped; source order is preserved.
    pub fn batches(&self, separator: &str) -> Vec<String> {
        let mut statements = Vec::new();
        let mut current = String::new();

        for line in self.text.lines() {
            if line.trim().eq_ignore_ascii_case(separator) {
                push_batch(&mut statements, &mut current);
            } else {
                current.push_str(line);
                current.push('\n');
            }
        }
        push_batch(&mut statements, &mut current);

        statements
    }

    /// Raw script text.
    pub fn text(&self) -> &str {
        &self.text
    }
}

fn push_batch(statements: &mut Vec<String>, current: &mut String) {
    if !current.trim().is_empty() {
        statements.push(std::mem::take(current));
    } else {
        current.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_counts_batches() {
        let script = SchemaScript::from_sql("CREATE TABLE a (id INT)\nGO\nCREATE TABLE b (id INT)\nGO\nCREATE TABLE c (id INT)\n");
        let batches = script.batches("GO");
        assert_eq!(batches.len(), 3);
    }

    #[test]
    fn test_split_preserves_source_order() {
        let script = SchemaScript::from_sql("first\nGO\nsecond\nGO\nthird");
        let batches = script.batches("GO");
        assert_eq!(batches[0].trim(), "first");
        assert_eq!(batches[1].trim(), "second");
        assert_eq!(batches[2].trim(), "third");
    }

    #[test]
    fn test_split_separator_case_insensitive() {
        let script = SchemaScript::from_sql("a\ngo\nb\nGo\nc");
        assert_eq!(script.batches("GO").len(), 3);
    }

    #[test]
    fn test_split_separator_allows_surrounding_whitespace() {
        let script = SchemaScript::from_sql("a\n  GO  \nb");
        assert_eq!(script.batches("GO").len(), 2);
    }

    #[test]
    fn test_split_separator_must_be_alone_on_line() {
        // "GO" inside a statement is not a boundary.
        let script = SchemaScript::from_sql("SELECT 'GO' AS keyword\nGO\nSELECT 2");
        let batches = script.batches("GO");
        assert_eq!(batches.len(), 2);
        assert!(batches[0].contains("'GO'"));
    }

    #[test]
    fn test_split_drops_blank_batches() {
        let script = SchemaScript::from_sql("a\nGO\nGO\n   \nGO\nb");
        assert_eq!(script.batches("GO").len(), 2);
    }

    #[test]
    fn test_split_custom_separator() {
        let script = SchemaScript::from_sql("a\n;;\nb");
        assert_eq!(script.batches(";;").len(), 2);
        assert_eq!(script.batches("GO").len(), 1);
    }

    #[test]
    fn test_substitute_replaces_every_occurrence() {
        let script = SchemaScript::from_sql("CREATE DATABASE [{Database_Name}];\nUSE [{Database_Name}];")
            .substitute(&[("[{Database_Name}]".to_string(), "appdb".to_string())]);
        assert_eq!(script.text().matches("appdb").count(), 2);
        assert!(!script.text().contains("[{Database_Name}]"));
    }

    #[test]
    fn test_substitute_is_literal() {
        // Regex metacharacters in the token and in the value are not interpreted.
        let script = SchemaScript::from_sql("name = [{User.Name*}]")
            .substitute(&[("[{User.Name*}]".to_string(), "a$1b".to_string())]);
        assert_eq!(script.text(), "name = a$1b");
    }

    #[test]
    fn test_substitute_unknown_token_left_in_place() {
        let script = SchemaScript::from_sql("GRANT ALL TO [{Login_Name}]")
            .substitute(&[("[{Database_Name}]".to_string(), "appdb".to_string())]);
        assert!(script.text().contains("[{Login_Name}]"));
    }

    #[test]
    fn test_from_file_missing_reports_path() {
        let err = SchemaScript::from_file(Path::new("does/not/exist.sql")).unwrap_err();
        assert!(err.to_string().contains("does/not/exist.sql"));
    }
}
