//! Utility modules for summary generation
//!
//! Contains shared functionality used across the unit and narrative modules:
//! - Mode: Most-frequent value with first-seen tie-break
//! - Depth: Rounding, spreads and depth statistics

pub mod depth;
pub mod mode;

// Re-export commonly used helpers
pub use depth::{format_depth, mean, quantize_spread, round_half_up_1dp};
pub use mode::{distinct_in_order, most_frequent};
