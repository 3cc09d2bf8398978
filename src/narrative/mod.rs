pub mod description;
pub mod extent;
pub mod formatters;

pub use description::{describe_unit, DEFAULT_MATERIAL};
pub use extent::{borehole_ranges, classify_occurrence, describe_extent, BoreholeRange, Occurrence};

pub use formatters::{JsonFormatter, MarkdownFormatter, TabularFormatter};
