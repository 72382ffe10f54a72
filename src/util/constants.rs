// LedgerSift - util/constants.rs
//
// Single source of truth for named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "LedgerSift";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "LedgerSift";

/// Current application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Raw ledger layout
// =============================================================================

/// Positional column names assigned to the raw ledger export.
pub const RAW_COLUMNS: [&str; 15] = [
    "Document_No",
    "Posting_Date",
    "External_Document_No",
    "Account_Type",
    "Account_No",
    "Debit_Amount",
    "Credit_Amount",
    "Branch_Code",
    "Product_Code",
    "Contract_Asset_Code",
    "Narration_1",
    "Narration_2",
    "Narration_3",
    "Finacle_GL_No",
    "Document_Date",
];

/// Number of columns the raw ledger must have.
pub const RAW_COLUMN_COUNT: usize = RAW_COLUMNS.len();

/// Columns appended by the enrichment pipeline, in output order.
pub const ENRICHED_COLUMNS: [&str; 3] = [
    "Account number",
    "Operative account",
    "Update_Product_Code",
];

/// Metadata rows at the top of a raw export that precede the data.
pub const DEFAULT_RAW_SKIP_ROWS: usize = 3;

/// Upper bound on configurable skipped rows.
pub const MAX_RAW_SKIP_ROWS: usize = 100;

// =============================================================================
// Mapping file layout
// =============================================================================

/// Mapping column holding the GL code join key.
pub const MAPPING_GL_COLUMN: &str = "GL_Code";

/// Mapping column holding the authoritative product code.
pub const MAPPING_PRODUCT_COLUMN: &str = "Product_Code";

// =============================================================================
// Narration patterns
// =============================================================================

/// Embedded 12-digit account number, leading digit 1-6.
pub const ACCOUNT_NUMBER_PATTERN: &str = r"\b([1-6]\d{11})\b";

/// Operative account code: `L` followed by nine digits.
pub const OPERATIVE_ACCOUNT_PATTERN: &str = r"\b(L\d{9})\b";

// =============================================================================
// Input limits
// =============================================================================

/// Default maximum size of a single input file (MB).
pub const DEFAULT_MAX_FILE_SIZE_MB: u64 = 500;

/// Smallest configurable input size limit (MB).
pub const MIN_MAX_FILE_SIZE_MB: u64 = 1;

/// Hard upper bound on the configurable input size limit (MB).
pub const ABSOLUTE_MAX_FILE_SIZE_MB: u64 = 4_096;

/// Bytes per megabyte, as used by the size limit.
pub const BYTES_PER_MB: u64 = 1024 * 1024;

// =============================================================================
// Export
// =============================================================================

/// Default output file name for the cleaned dataset.
pub const DEFAULT_EXPORT_FILE_NAME: &str = "BOC_Performance_Report.csv";

/// Default number of rows echoed to stdout after processing.
pub const DEFAULT_PREVIEW_ROWS: usize = 50;

/// Upper bound on configurable preview rows.
pub const MAX_PREVIEW_ROWS: usize = 1_000;

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Maximum length of a narration included in debug output.
/// Narrations carry customer account numbers.
pub const DEBUG_MAX_NARRATION_PREVIEW: usize = 40;

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";

// =============================================================================
// Target accounts
// =============================================================================

/// Built-in target account list, in the same comma/newline format the
/// operator supplies. Duplicates are harmless.
pub const DEFAULT_TARGET_ACCOUNTS: &str = "\
300016, 300015, 300037, 300057, 300033, 300035, 300058, 300021, 300024, 300040,
300048, 300051, 300056, 300060, 300038, 300047, 300054, 300034, 300036, 300045,
300046, 300052, 300053, 300018, 300020, 300032, 300017, 300019, 300027, 300039,
300041, 300049, 300055, 300029, 300023, 300026, 300059, 303007, 303008, 303009,
303010, 303015, 303022, 303025, 303028, 303029, 303030, 303027, 303020, 303031,
303032, 303033, 303035, 303036, 303037, 303038, 303039, 303040, 303041, 303042,
303043, 303044, 303045, 303046, 303047, 303048, 303049, 303050, 303051, 303052,
303001, 303002, 303003, 303004, 303005, 303011, 303012, 303016, 303017, 303021,
303023, 303024, 303026, 303543, 303545, 303546, 303547, 303548, 303541, 303536,
303537, 303538, 303539, 408122, 303529, 303534, 408132, 303535, 408145, 408142,
408135, 408133, 408131, 408130, 408129, 408125, 408122, 408120, 408118, 408117,
408114, 408113, 408112, 408111, 408109, 408108, 408107, 408105, 408104, 408103,
408098, 408096, 408095, 408093, 408092, 408090, 408086, 408083, 408080, 408078,
408077, 408076, 408070, 408069, 408068, 408065, 408062, 408061, 408057, 408056,
408055, 408050, 408049, 408047, 408046, 408044, 408043, 408042, 408040, 408039,
408038, 408035, 408034, 408030, 408028, 408027, 408025, 408024, 408023, 408022,
408021, 408020, 408019, 408018, 408015, 408014, 408013, 408012, 408010, 408009,
408007, 408005, 408004, 408003, 406033, 406030, 406029, 406028, 406027, 406025,
406023, 406022, 406017, 406015, 406014, 406011, 406005, 406003, 406002, 406001,
405010, 405008, 405007, 405001, 404002, 402007, 402006, 402003, 402002, 402001,
401030, 401029, 401028, 401026, 401025, 401024, 401020, 401014, 401013, 401012,
401011, 401008, 401007, 401006, 401005, 401004, 401003, 401002";
