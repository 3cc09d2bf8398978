//! Summary Configuration
//!
//! Numeric tolerances and ordering policies used by unit assignment and
//! extent synthesis. Defaults reproduce the reference summary tables; a JSON
//! file may override any subset of fields.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use anyhow::{Context, Result};

/// How to order GroupKeys (and summary rows) whose mean depths are equal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Lexical order of the rendered GroupKey (`Fill_CL_Group` < `Fill_Sand_Group`)
    #[default]
    Lexical,
    /// Order in which the key first appears in the input rows
    FirstSeen,
}

/// Where units without any known depth are ranked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UndefinedDepthPolicy {
    /// After every unit with a known depth
    #[default]
    SortLast,
    /// Before every unit with a known depth
    SortFirst,
}

/// Configuration for summary generation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    /// Maximum top-depth spread (m, exclusive) for a uniform occurrence
    pub uniform_top_tolerance: f64,
    /// Maximum base-depth spread (m, exclusive) for a uniform occurrence
    pub uniform_base_tolerance: f64,
    /// Tops shallower than this (m) are reported as "surface"
    pub surface_threshold: f64,
    pub tie_break: TieBreak,
    pub undefined_depth: UndefinedDepthPolicy,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            uniform_top_tolerance: 0.2,
            uniform_base_tolerance: 0.3,
            surface_threshold: 0.1,
            tie_break: TieBreak::Lexical,
            undefined_depth: UndefinedDepthPolicy::SortLast,
        }
    }
}

impl SummaryConfig {
    /// Load configuration from JSON file
    ///
    /// Missing fields fall back to their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read summary config: {:?}", path))?;

        let config: SummaryConfig = serde_json::from_str(&contents)
            .with_context(|| "Failed to parse summary config JSON")?;

        if config.uniform_top_tolerance < 0.0 || config.uniform_base_tolerance < 0.0 {
            anyhow::bail!("Uniform tolerances must be non-negative");
        }

        Ok(config)
    }
}
