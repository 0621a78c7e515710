//! Portfolio-level calculations over a normalized dataset.

pub mod breakdown;
pub mod performance;
pub mod summary;

pub use breakdown::{
    company_rollups, label_breakdown, lead_stats, market_breakdown, realized_exits,
    round_breakdown, undisclosed_leads, year_breakdown, BreakdownDimension, CompanyRollup,
    LabelBreakdown, LeadStats, RealizedExit, UndisclosedLead, YearBreakdown,
};
pub use performance::{calculate_portfolio_xirr, calculate_row_xirr, CashFlow, XirrSettings};
pub use summary::{
    classify, portfolio_headline, portfolio_total_value, summarize_categories, CategorySummary,
    CategorySummaryTable, PortfolioHeadline, SummaryCategory,
};
