//! Stats module - month-over-month comparison

mod comparison;

pub use comparison::{CategoryChange, ComparisonEngine, FeatureSummary};
