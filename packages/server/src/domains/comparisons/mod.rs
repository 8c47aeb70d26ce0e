// Comparison domain: prompt construction, defensive decoding of the model's
// JSON reply, persistence, and the recent/trending/permalink reads.

pub mod actions;
pub mod data;
pub mod models;
pub mod parse;
pub mod prompt;

pub use actions::{Persistence, RECENT_LIMIT, TREND_TOP, TREND_WINDOW};
pub use data::PgComparisonStore;
pub use models::{
    Aspect, ComparisonRecord, ComparisonResult, NewComparison, RecentComparison,
    TrendRow, TrendingComparison,
};
