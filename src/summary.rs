//! Summary Table Builder - Main coordinator for subsurface summaries
//!
//! Runs unit assignment over a dataset, then generates the description and
//! extent text for every unit. Rows are ordered by each unit's shallowest
//! mid-depth. Includes a per-project batch that builds projects in parallel
//! (Rayon); each project is an independent computation.

use crate::config::SummaryConfig;
use crate::data::Layer;
use crate::narrative::{describe_extent, describe_unit};
use crate::units::{compare_optional_depth, ClassificationGrouper, UnitAssigner, UnitAssignment, UNKNOWN};
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Column headings of the exported summary table
pub const UNIT_COLUMN: &str = "Unit";
pub const SUMMARY_TEXT_COLUMN: &str =
    "Description, material, relative consistency, Extent of occurrence";

/// One row of the subsurface conditions summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitSummaryRow {
    pub unit_code: String,
    pub description: String,
    pub extent: String,
    /// Sorted ids of boreholes contributing layers
    pub boreholes: Vec<String>,
    pub layer_count: usize,
    pub min_avg_depth: Option<f64>,
}

impl UnitSummaryRow {
    /// Description and extent separated by a blank line (single table cell)
    pub fn combined_text(&self) -> String {
        format!("{}\n\n{}", self.description, self.extent)
    }
}

/// Summary rows plus the per-layer unit assignment they were built from
#[derive(Debug, Clone, Default)]
pub struct SubsurfaceSummary {
    pub rows: Vec<UnitSummaryRow>,
    pub assignment: UnitAssignment,
}

/// Summary for one project of a multi-project dataset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectSummary {
    pub project_id: String,
    pub rows: Vec<UnitSummaryRow>,
}

/// Main summary builder
#[derive(Debug, Clone, Default)]
pub struct SummaryTableBuilder {
    config: SummaryConfig,
    grouper: ClassificationGrouper,
}

impl SummaryTableBuilder {
    pub fn new(config: SummaryConfig, grouper: ClassificationGrouper) -> Self {
        Self { config, grouper }
    }

    /// Summary rows ordered by minimum mid-depth. Empty input → no rows.
    pub fn build(&self, layers: &[Layer]) -> Vec<UnitSummaryRow> {
        self.build_report(layers).rows
    }

    /// Summary rows together with the unit assignment (for per-layer export)
    pub fn build_report(&self, layers: &[Layer]) -> SubsurfaceSummary {
        let assignment = UnitAssigner::new(&self.grouper, &self.config).assign(layers);

        let mut ranked: Vec<(usize, UnitSummaryRow)> = assignment
            .units()
            .iter()
            .enumerate()
            .map(|(rank, unit)| {
                let unit_layers = unit.layers(layers);

                let mut boreholes: Vec<String> =
                    unit_layers.iter().map(|l| l.borehole_id.clone()).collect();
                boreholes.sort_unstable();
                boreholes.dedup();

                let row = UnitSummaryRow {
                    unit_code: unit.unit_code.clone(),
                    description: describe_unit(&unit_layers),
                    extent: describe_extent(&unit_layers, &self.config),
                    boreholes,
                    layer_count: unit_layers.len(),
                    min_avg_depth: unit.min_avg_depth,
                };
                (rank, row)
            })
            .collect();

        // Shallowest first; equal depths keep assignment order
        ranked.sort_by(|(rank_a, a), (rank_b, b)| {
            compare_optional_depth(a.min_avg_depth, b.min_avg_depth, self.config.undefined_depth)
                .then_with(|| rank_a.cmp(rank_b))
        });

        let rows: Vec<UnitSummaryRow> = ranked.into_iter().map(|(_, row)| row).collect();
        tracing::info!(
            "Summarised {} layers into {} geological units",
            layers.len(),
            rows.len()
        );

        SubsurfaceSummary { rows, assignment }
    }

    /// Build one summary per project id (sorted), projects in parallel
    ///
    /// Layers without a project id are summarised under "Unknown".
    pub fn build_by_project(&self, layers: &[Layer]) -> Vec<ProjectSummary> {
        let mut by_project: FxHashMap<&str, Vec<Layer>> = FxHashMap::default();
        for layer in layers {
            let project = layer.project_id.as_deref().unwrap_or(UNKNOWN);
            by_project.entry(project).or_default().push(layer.clone());
        }

        let mut projects: Vec<(&str, Vec<Layer>)> = by_project.into_iter().collect();
        projects.sort_by(|a, b| a.0.cmp(b.0));

        projects
            .par_iter()
            .map(|(project_id, project_layers)| ProjectSummary {
                project_id: project_id.to_string(),
                rows: self.build(project_layers),
            })
            .collect()
    }
}
