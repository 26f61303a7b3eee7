//! Shared helper functions for CLI commands
//!
//! This module contains utility functions that are used across multiple
//! command modules to avoid code duplication.

use console::style;
use miette::Result;

use crate::cli::GlobalOpts;
use crate::core::{CaseId, CaseStore, Config, LoadOutcome};
use crate::entities::TestCase;

/// Open the case store selected by `--store`, `TCF_STORE` or the config file
pub fn open_store(global: &GlobalOpts, config: &Config) -> CaseStore {
    let store = CaseStore::open(
        global
            .store
            .clone()
            .unwrap_or_else(|| config.store_path()),
    );

    if let (LoadOutcome::Recovered, Some(path)) = (store.load_outcome(), store.path()) {
        eprintln!(
            "{} Case store {} could not be read; starting with an empty collection",
            style("!").yellow(),
            path.display()
        );
    }
    store
}

/// Parse a case id given on the command line (`TC-3`, `tc-3` or `3`)
pub fn parse_case_id(raw: &str) -> Result<CaseId> {
    CaseId::parse_loose(raw).map_err(|e| miette::miette!("{}", e))
}

/// Find a committed case or fail with a not-found error
pub fn find_case<'a>(store: &'a CaseStore, raw_id: &str) -> Result<&'a TestCase> {
    let id = parse_case_id(raw_id)?;
    store
        .get(id)
        .ok_or_else(|| miette::miette!("Test case {} not found", id))
}

/// Convert a 1-based number from the command line into an index
pub fn to_index(number: usize, what: &str) -> Result<usize> {
    number
        .checked_sub(1)
        .ok_or_else(|| miette::miette!("{} numbers start at 1", what))
}

/// Truncate a string to max_len characters, adding "..." if truncated
///
/// Useful for table columns that need fixed-width output.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("hello", 10), "hello");
        assert_eq!(truncate_str("hello world", 8), "hello...");
        assert_eq!(truncate_str("hi", 2), "hi");
        assert_eq!(truncate_str("用户登录成功之后跳转", 6), "用户登...");
    }

    #[test]
    fn test_to_index() {
        assert_eq!(to_index(1, "Step").unwrap(), 0);
        assert_eq!(to_index(4, "Step").unwrap(), 3);
        assert!(to_index(0, "Step").is_err());
    }

    #[test]
    fn test_parse_case_id() {
        assert_eq!(parse_case_id("tc-2").unwrap(), CaseId::new(2));
        assert!(parse_case_id("nope").is_err());
    }
}
