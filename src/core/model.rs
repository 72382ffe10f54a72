// LedgerSift - core/model.rs
//
// Core data model types. Pure data definitions with no I/O and no platform
// dependencies. These types are the shared vocabulary across all layers.

use crate::core::numeric;
use crate::util::constants::{ENRICHED_COLUMNS, RAW_COLUMNS, RAW_COLUMN_COUNT};
use serde::ser::{Serialize, SerializeMap, Serializer};

/// A single CSV cell. Empty fields load as `None`, mirroring a missing value.
pub type Cell = Option<String>;

// =============================================================================
// Input tables
// =============================================================================

/// The raw ledger as loaded, before positional names are assigned.
///
/// `column_count` is taken from the first data record; every row in `rows`
/// has exactly that many cells.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub column_count: usize,
    pub rows: Vec<Vec<Cell>>,
}

/// One row of the product-code mapping file.
#[derive(Debug, Clone, PartialEq)]
pub struct MappingRow {
    /// GL code as text; coerced to numeric by the pipeline.
    pub gl_code: Cell,
    pub product_code: Cell,
}

/// The product-code mapping file, restricted to the two columns used.
#[derive(Debug, Clone, Default)]
pub struct MappingTable {
    pub rows: Vec<MappingRow>,
}

// =============================================================================
// Ledger row (named positional fields)
// =============================================================================

/// A raw ledger row with the fixed column names applied by position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LedgerRow {
    pub document_no: Cell,
    pub posting_date: Cell,
    pub external_document_no: Cell,
    pub account_type: Cell,
    pub account_no: Cell,
    pub debit_amount: Cell,
    pub credit_amount: Cell,
    pub branch_code: Cell,
    pub product_code: Cell,
    pub contract_asset_code: Cell,
    pub narration_1: Cell,
    pub narration_2: Cell,
    pub narration_3: Cell,
    pub finacle_gl_no: Cell,
    pub document_date: Cell,
}

impl LedgerRow {
    /// Assign column names to a 15-cell record, in `RAW_COLUMNS` order.
    pub fn from_positional(cells: [Cell; RAW_COLUMN_COUNT]) -> Self {
        let [
            document_no,
            posting_date,
            external_document_no,
            account_type,
            account_no,
            debit_amount,
            credit_amount,
            branch_code,
            product_code,
            contract_asset_code,
            narration_1,
            narration_2,
            narration_3,
            finacle_gl_no,
            document_date,
        ] = cells;
        Self {
            document_no,
            posting_date,
            external_document_no,
            account_type,
            account_no,
            debit_amount,
            credit_amount,
            branch_code,
            product_code,
            contract_asset_code,
            narration_1,
            narration_2,
            narration_3,
            finacle_gl_no,
            document_date,
        }
    }
}

// =============================================================================
// Enriched row (pipeline output)
// =============================================================================

/// A ledger row after extraction, coercion and enrichment.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedRow {
    pub ledger: LedgerRow,

    /// `Account_No` coerced to numeric. Replaces the raw text on output.
    pub account_no: Option<f64>,

    /// `Finacle_GL_No` coerced to numeric. Replaces the raw text on output.
    pub finacle_gl_no: Option<f64>,

    /// First 12-digit account number found in `Narration_1`.
    pub account_number: Cell,

    /// First `L` + 9 digit operative account found in `Narration_1`.
    pub operative_account: Cell,

    /// Product code from the mapping row whose GL code matched.
    pub update_product_code: Cell,
}

impl EnrichedRow {
    /// All output column names, in order.
    pub fn column_names() -> impl Iterator<Item = &'static str> {
        RAW_COLUMNS.iter().chain(ENRICHED_COLUMNS.iter()).copied()
    }

    /// Render the row as output text cells, in `column_names()` order.
    /// Missing values become empty strings.
    pub fn to_cells(&self) -> Vec<String> {
        fn text(cell: &Cell) -> String {
            cell.clone().unwrap_or_default()
        }
        let l = &self.ledger;
        vec![
            text(&l.document_no),
            text(&l.posting_date),
            text(&l.external_document_no),
            text(&l.account_type),
            numeric::format(self.account_no),
            text(&l.debit_amount),
            text(&l.credit_amount),
            text(&l.branch_code),
            text(&l.product_code),
            text(&l.contract_asset_code),
            text(&l.narration_1),
            text(&l.narration_2),
            text(&l.narration_3),
            numeric::format(self.finacle_gl_no),
            text(&l.document_date),
            text(&self.account_number),
            text(&self.operative_account),
            text(&self.update_product_code),
        ]
    }
}

/// Serialised as one JSON object keyed by output column name. The two
/// coerced columns are numbers; every other column is a string or null.
impl Serialize for EnrichedRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let l = &self.ledger;
        let text_fields: [(&str, &Cell); 16] = [
            ("Document_No", &l.document_no),
            ("Posting_Date", &l.posting_date),
            ("External_Document_No", &l.external_document_no),
            ("Account_Type", &l.account_type),
            ("Debit_Amount", &l.debit_amount),
            ("Credit_Amount", &l.credit_amount),
            ("Branch_Code", &l.branch_code),
            ("Product_Code", &l.product_code),
            ("Contract_Asset_Code", &l.contract_asset_code),
            ("Narration_1", &l.narration_1),
            ("Narration_2", &l.narration_2),
            ("Narration_3", &l.narration_3),
            ("Document_Date", &l.document_date),
            ("Account number", &self.account_number),
            ("Operative account", &self.operative_account),
            ("Update_Product_Code", &self.update_product_code),
        ];

        let mut map = serializer.serialize_map(Some(RAW_COLUMN_COUNT + ENRICHED_COLUMNS.len()))?;
        for (name, value) in &text_fields[..4] {
            map.serialize_entry(name, value)?;
        }
        map.serialize_entry("Account_No", &self.account_no)?;
        for (name, value) in &text_fields[4..12] {
            map.serialize_entry(name, value)?;
        }
        map.serialize_entry("Finacle_GL_No", &self.finacle_gl_no)?;
        for (name, value) in &text_fields[12..] {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

// =============================================================================
// Pipeline result
// =============================================================================

/// Output of a successful pipeline run.
#[derive(Debug, Clone, Default)]
pub struct ProcessedTable {
    /// Rows that passed the target-account filter.
    pub rows: Vec<EnrichedRow>,

    /// Row count after enrichment, before filtering. Always equals the raw
    /// input row count.
    pub enriched_count: usize,

    /// Enriched rows that received a product code from the mapping.
    pub mapped_count: usize,

    /// Mapping rows ignored because an earlier row had the same GL code.
    pub duplicate_gl_codes: usize,
}

impl ProcessedTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn positional() -> [Cell; RAW_COLUMN_COUNT] {
        std::array::from_fn(|i| Some(format!("c{i}")))
    }

    #[test]
    fn test_from_positional_assigns_names_in_order() {
        let row = LedgerRow::from_positional(positional());
        assert_eq!(row.document_no.as_deref(), Some("c0"));
        assert_eq!(row.account_no.as_deref(), Some("c4"));
        assert_eq!(row.narration_1.as_deref(), Some("c10"));
        assert_eq!(row.finacle_gl_no.as_deref(), Some("c13"));
        assert_eq!(row.document_date.as_deref(), Some("c14"));
    }

    #[test]
    fn test_to_cells_matches_column_order() {
        let row = EnrichedRow {
            ledger: LedgerRow::from_positional(positional()),
            account_no: Some(300016.0),
            finacle_gl_no: None,
            account_number: Some("100000000001".to_string()),
            operative_account: None,
            update_product_code: Some("SAV".to_string()),
        };
        let names: Vec<_> = EnrichedRow::column_names().collect();
        let cells = row.to_cells();
        assert_eq!(names.len(), cells.len());
        assert_eq!(cells[4], "300016");
        assert_eq!(cells[13], "");
        assert_eq!(names[15], "Account number");
        assert_eq!(cells[15], "100000000001");
        assert_eq!(cells[16], "");
        assert_eq!(cells[17], "SAV");
    }

    #[test]
    fn test_json_uses_column_names() {
        let row = EnrichedRow {
            ledger: LedgerRow::default(),
            account_no: Some(401002.0),
            finacle_gl_no: Some(300016.0),
            account_number: None,
            operative_account: Some("L123456789".to_string()),
            update_product_code: None,
        };
        let value = serde_json::to_value(&row).unwrap();
        assert_eq!(value["Account_No"], serde_json::json!(401002.0));
        assert_eq!(value["Operative account"], "L123456789");
        assert!(value["Update_Product_Code"].is_null());
        assert_eq!(value.as_object().unwrap().len(), 18);
    }
}
