// LedgerSift - core/pipeline.rs
//
// The transaction enrichment filter: positional naming, narration
// extraction, numeric coercion, GL product-code left join, and the final
// target-account filter. Only the last step may drop rows.
// Core layer: pure logic, no I/O.

use crate::core::model::{
    Cell, EnrichedRow, LedgerRow, MappingTable, ProcessedTable, RawTable,
};
use crate::core::numeric::{self, NumericKey};
use crate::core::targets::TargetAccounts;
use crate::core::extract;
use crate::util::constants::RAW_COLUMN_COUNT;
use crate::util::error::PipelineError;
use crate::util::logging;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// How the join treats a GL code that appears on several mapping rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicateGlPolicy {
    /// The first mapping row in file order supplies the product code.
    #[default]
    FirstWins,

    /// Any duplicate GL code aborts processing.
    Reject,
}

impl DuplicateGlPolicy {
    /// Parse the config spelling: `"first"` or `"error"`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "first" => Some(Self::FirstWins),
            "error" => Some(Self::Reject),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::FirstWins => "first",
            Self::Reject => "error",
        }
    }
}

/// GL code -> product code index built from the mapping table.
///
/// Mapping rows whose GL code does not coerce to a number are unreachable:
/// a missing key never matches.
#[derive(Debug, Default)]
pub struct ProductLookup {
    codes: HashMap<NumericKey, Cell>,
    duplicates: usize,
}

impl ProductLookup {
    pub fn build(mapping: &MappingTable, policy: DuplicateGlPolicy) -> Result<Self, PipelineError> {
        let mut codes = HashMap::with_capacity(mapping.rows.len());
        // Data row (1-based) that first defined each key, for error reports.
        let mut first_seen: HashMap<NumericKey, usize> = HashMap::new();
        let mut duplicates = 0;

        for (idx, row) in mapping.rows.iter().enumerate() {
            let Some(gl) = numeric::coerce(row.gl_code.as_deref()) else {
                continue;
            };
            let key = NumericKey::new(gl);
            match codes.entry(key) {
                Entry::Vacant(slot) => {
                    slot.insert(row.product_code.clone());
                    first_seen.insert(key, idx + 1);
                }
                Entry::Occupied(_) => match policy {
                    DuplicateGlPolicy::FirstWins => duplicates += 1,
                    DuplicateGlPolicy::Reject => {
                        return Err(PipelineError::DuplicateGlCode {
                            code: numeric::format(Some(gl)),
                            first_row: first_seen.get(&key).copied().unwrap_or_default(),
                            duplicate_row: idx + 1,
                        });
                    }
                },
            }
        }

        if duplicates > 0 {
            tracing::warn!(
                duplicates,
                "Mapping has repeated GL codes; first occurrence wins"
            );
        }

        Ok(Self { codes, duplicates })
    }

    /// Product code for a coerced GL number. Missing keys never match.
    pub fn get(&self, gl: Option<f64>) -> Option<&Cell> {
        gl.and_then(|v| self.codes.get(&NumericKey::new(v)))
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Mapping rows ignored under `FirstWins`.
    pub fn duplicates(&self) -> usize {
        self.duplicates
    }
}

/// Apply steps 1-4 to one raw row: names, extraction, coercion, join.
pub fn enrich_row(ledger: LedgerRow, lookup: &ProductLookup) -> EnrichedRow {
    let narration = ledger.narration_1.as_deref();
    let account_number = narration.and_then(extract::account_number);
    let operative_account = narration.and_then(extract::operative_account);

    if let Some(text) = narration {
        tracing::trace!(
            narration = logging::preview(text),
            found_account = account_number.is_some(),
            found_operative = operative_account.is_some(),
            "Narration scanned"
        );
    }

    let finacle_gl_no = numeric::coerce(ledger.finacle_gl_no.as_deref());
    let update_product_code = lookup.get(finacle_gl_no).cloned().flatten();
    let account_no = numeric::coerce(ledger.account_no.as_deref());

    EnrichedRow {
        ledger,
        account_no,
        finacle_gl_no,
        account_number,
        operative_account,
        update_product_code,
    }
}

/// Run the full enrichment filter over a raw ledger.
///
/// Fails with `ColumnMismatch` before touching any row when the raw table
/// does not have exactly 15 columns. Every raw row is enriched; only rows
/// whose coerced `Account_No` is in `targets` are returned.
pub fn process_logic(
    raw: RawTable,
    mapping: &MappingTable,
    targets: &TargetAccounts,
    policy: DuplicateGlPolicy,
) -> Result<ProcessedTable, PipelineError> {
    if raw.column_count != RAW_COLUMN_COUNT {
        tracing::error!(
            found = raw.column_count,
            expected = RAW_COLUMN_COUNT,
            "Raw ledger column count mismatch"
        );
        return Err(PipelineError::ColumnMismatch {
            found: raw.column_count,
            expected: RAW_COLUMN_COUNT,
        });
    }

    let lookup = ProductLookup::build(mapping, policy)?;
    tracing::debug!(
        gl_codes = lookup.len(),
        mapping_rows = mapping.rows.len(),
        "Product lookup built"
    );

    let mut enriched = Vec::with_capacity(raw.rows.len());
    for cells in raw.rows {
        let positional: [Cell; RAW_COLUMN_COUNT] =
            cells
                .try_into()
                .map_err(|cells: Vec<Cell>| PipelineError::ColumnMismatch {
                    found: cells.len(),
                    expected: RAW_COLUMN_COUNT,
                })?;
        enriched.push(enrich_row(LedgerRow::from_positional(positional), &lookup));
    }

    let enriched_count = enriched.len();
    let mapped_count = enriched
        .iter()
        .filter(|row| row.update_product_code.is_some())
        .count();

    let rows: Vec<EnrichedRow> = enriched
        .into_iter()
        .filter(|row| targets.contains_value(row.account_no))
        .collect();

    tracing::info!(
        enriched = enriched_count,
        mapped = mapped_count,
        kept = rows.len(),
        targets = targets.len(),
        "Pipeline complete"
    );

    Ok(ProcessedTable {
        rows,
        enriched_count,
        mapped_count,
        duplicate_gl_codes: lookup.duplicates(),
    })
}
