/// Sentinel used by the export when a position's value is not disclosed
pub const LOCKED_VALUE_TOKEN: &str = "Locked";

/// Status values with special meaning
pub const STATUS_REALIZED: &str = "Realized";
pub const STATUS_DEAD: &str = "Dead";

/// Number of example rows rendered per summary category
pub const DEFAULT_TOP_EXAMPLES: usize = 5;

/// Number of examples shown per lead in lead statistics
pub const LEAD_TOP_EXAMPLES: usize = 4;

/// Separator used when joining example labels
pub const EXAMPLES_SEPARATOR: &str = ", ";

/// Iteration bound for the XIRR solver
pub const XIRR_MAX_ITERATIONS: u32 = 100;

/// Relative NPV tolerance for the XIRR solver
pub const XIRR_TOLERANCE: f64 = 1e-6;

/// Initial rate guess for the XIRR solver
pub const XIRR_INITIAL_GUESS: f64 = 0.1;

/// Day count basis used to annualize cash flow offsets
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Canonical display order for funding rounds
pub const ROUND_ORDER: [&str; 10] = [
    "Preseed",
    "Pre-Seed",
    "Seed",
    "Seed+",
    "Series A",
    "Series A+",
    "Series B",
    "Series B+",
    "Series C",
    "Other",
];
