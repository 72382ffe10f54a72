// LedgerSift - core/targets.rs
//
// Operator-supplied target account list: parsing and membership.
// Core layer: pure logic, no I/O.

use crate::core::numeric;
use crate::util::constants::DEFAULT_TARGET_ACCOUNTS;
use std::collections::HashSet;

/// Set of account numbers that survive the final filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetAccounts {
    accounts: HashSet<i64>,
}

/// Result of parsing an account list. Malformed tokens never fail the whole
/// list; they are collected here for reporting.
#[derive(Debug, Clone, Default)]
pub struct ParsedTargets {
    pub targets: TargetAccounts,
    /// Non-empty tokens that were not plain digit strings, or that overflow.
    pub skipped: Vec<String>,
}

impl TargetAccounts {
    /// Parse a comma- and/or newline-separated account list.
    ///
    /// Tokens are trimmed. Empty tokens are ignored silently; any other token
    /// that is not entirely ASCII digits is skipped and reported.
    pub fn parse(text: &str) -> ParsedTargets {
        let mut accounts = HashSet::new();
        let mut skipped = Vec::new();

        for token in text.split(|c: char| c == ',' || c == '\n') {
            let token = token.trim();
            if token.is_empty() {
                continue;
            }
            if !token.bytes().all(|b| b.is_ascii_digit()) {
                skipped.push(token.to_string());
                continue;
            }
            match token.parse::<i64>() {
                Ok(n) => {
                    accounts.insert(n);
                }
                Err(_) => skipped.push(token.to_string()),
            }
        }

        if !skipped.is_empty() {
            tracing::warn!(
                skipped = skipped.len(),
                accepted = accounts.len(),
                "Ignoring malformed entries in target account list"
            );
        }

        ParsedTargets {
            targets: Self { accounts },
            skipped,
        }
    }

    /// The built-in target account list.
    pub fn builtin() -> Self {
        Self::parse(DEFAULT_TARGET_ACCOUNTS).targets
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    pub fn contains(&self, account: i64) -> bool {
        self.accounts.contains(&account)
    }

    /// Membership test for a coerced account value. Missing and
    /// non-integral values are never members.
    pub fn contains_value(&self, value: Option<f64>) -> bool {
        value
            .and_then(numeric::as_integer)
            .is_some_and(|n| self.contains(n))
    }
}

impl FromIterator<i64> for TargetAccounts {
    fn from_iter<I: IntoIterator<Item = i64>>(iter: I) -> Self {
        Self {
            accounts: iter.into_iter().collect(),
        }
    }
}
