//! Subsurface Summary Rust Implementation
//!
//! Derives a subsurface conditions summary from borehole geology records:
//! layers from all boreholes are clustered into geological units, and each
//! unit gets a material description and an extent-of-occurrence statement.
//!
//! Module layout:
//! - `data`: CSV ingestion with Polars, typed `Layer` records, dataset stats
//! - `config`: tolerances and ordering policies
//! - `units`: classification grouping and unit assignment
//! - `narrative`: description/extent synthesis and CSV/Markdown/JSON output
//! - `summary`: the summary table builder tying it all together
//! - `utils`: mode and depth helpers

pub mod utils;
pub mod config;
pub mod data;
pub mod units;
pub mod narrative;
pub mod summary;

// Re-export commonly used types
pub use config::{SummaryConfig, TieBreak, UndefinedDepthPolicy};
pub use data::{BoreholeData, DataError, DatasetStats, Layer};
pub use units::{ClassificationGroup, ClassificationGrouper, GroupKey, Unit, UnitAssigner, UnitAssignment};
pub use narrative::{describe_extent, describe_unit, JsonFormatter, MarkdownFormatter, TabularFormatter};
pub use summary::{ProjectSummary, SubsurfaceSummary, SummaryTableBuilder, UnitSummaryRow};
