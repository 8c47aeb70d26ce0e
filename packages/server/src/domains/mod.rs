// Domain modules
pub mod comparisons;
