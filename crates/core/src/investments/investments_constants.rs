/// Required export columns
pub const COLUMN_COMPANY: &str = "Company/Fund";
pub const COLUMN_STATUS: &str = "Status";
pub const COLUMN_LEAD: &str = "Lead";
pub const COLUMN_ROUND: &str = "Round";
pub const COLUMN_MARKET: &str = "Market";
pub const COLUMN_INVEST_DATE: &str = "Invest Date";
pub const COLUMN_INVESTED: &str = "Invested";
pub const COLUMN_REALIZED_VALUE: &str = "Realized Value";
pub const COLUMN_UNREALIZED_VALUE: &str = "Unrealized Value";
pub const COLUMN_NET_VALUE: &str = "Net Value";
pub const COLUMN_MULTIPLE: &str = "Multiple";

/// Optional export columns
pub const COLUMN_ROUND_SIZE: &str = "Round Size";
pub const COLUMN_VALUATION_OR_CAP: &str = "Valuation or Cap";
pub const COLUMN_REALIZED_DATE: &str = "Realized Date";
pub const COLUMN_URL: &str = "URL";

/// Flag column written by a previous normalization pass
pub const COLUMN_VALUATION_UNKNOWN: &str = "Valuation Unknown";

pub const REQUIRED_COLUMNS: [&str; 11] = [
    COLUMN_COMPANY,
    COLUMN_STATUS,
    COLUMN_LEAD,
    COLUMN_ROUND,
    COLUMN_MARKET,
    COLUMN_INVEST_DATE,
    COLUMN_INVESTED,
    COLUMN_REALIZED_VALUE,
    COLUMN_UNREALIZED_VALUE,
    COLUMN_NET_VALUE,
    COLUMN_MULTIPLE,
];

/// Columns without which no row can be normalized
pub const ESSENTIAL_COLUMNS: [&str; 2] = [COLUMN_COMPANY, COLUMN_INVESTED];
