pub mod algorithms;
pub mod analyzer;

pub use algorithms::dimensions::{classify_dimensions, DimensionInfo};
pub use algorithms::selector::{BestDimension, Selection};
pub use analyzer::{analyze, RootCauseAnalyzer};
