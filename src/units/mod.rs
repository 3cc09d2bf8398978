//! Geological unit formation
//!
//! - `classification`: soil code → classification group
//! - `assignment`: origin + group → ranked, named units

pub mod classification;
pub mod assignment;

pub use classification::{ClassificationGroup, ClassificationGrouper, UNKNOWN};
pub use assignment::{
    compare_optional_depth, origin_prefix, GroupKey, Unit, UnitAssigner, UnitAssignment,
    KEY_SEPARATOR,
};
