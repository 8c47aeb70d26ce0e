//! Kernel module - server infrastructure and dependencies.

pub mod deps;
pub mod test_dependencies;
pub mod traits;

/// GPT-4o Mini — the fixed model used for every comparison.
pub const GPT_4O_MINI: &str = "gpt-4o-mini";

/// Fixed sampling temperature for comparison completions.
pub const COMPARE_TEMPERATURE: f32 = 0.7;

pub use deps::{OpenAICompletion, ServerDeps};
pub use test_dependencies::{CompletionCallArgs, MockCompletion, MockComparisonStore};
pub use traits::*;
