//! Data Loading and Management
//!
//! Loads borehole geology tables (one row per soil layer) using Polars and
//! converts them into typed `Layer` records for the summary pipeline.
//!
//! Ingestion rules:
//! - Required columns must all be present, otherwise `DataError::MissingColumns`
//! - `NA`, empty and whitespace-only cells are treated as null
//! - Non-numeric depths become unknown (`None`) rather than failing the load
//! - Rows without a borehole id are dropped with a warning
//! - Layers are sorted by borehole id, then top depth

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use anyhow::{Context, Result};
use std::cmp::Ordering;
use std::path::Path;

/// Column names of the geology table
pub mod columns {
    pub const PROJECT_ID: &str = "PROJ_ID";
    pub const BOREHOLE_ID: &str = "POINT_ID";
    pub const TOP: &str = "TOP";
    pub const BASE: &str = "BASE";
    pub const LEGEND: &str = "Legend";
    pub const DESCRIPTION: &str = "Description";
    pub const CLASSIFICATION: &str = "Classification";
    pub const ORIGIN: &str = "Origin1";
    pub const COLOR: &str = "Color";

    pub const PRIMARY_NAME: &str = "PrimaryName";
    pub const PRIMARY_NAME_QUALIFIER: &str = "PrimaryNameQualifier";
    pub const PLASTICITY_MIN: &str = "PlasticityMin";
    pub const PLASTICITY_MAX: &str = "PlasticityMax";
    pub const PLASTICITY_JOINER: &str = "PlasticityJoiner";
    pub const REMARKS: &str = "Remarks";

    // Derived columns added to the enriched per-layer export
    pub const THICKNESS: &str = "THICKNESS";
    pub const AVG_DEPTH: &str = "AvgDepth";
    pub const CLASS_GROUP: &str = "ClassGroup";
    pub const GROUP_KEY: &str = "GroupKey";
    pub const UNIT: &str = "Unit";

    pub const REQUIRED: [&str; 9] = [
        PROJECT_ID,
        BOREHOLE_ID,
        TOP,
        BASE,
        LEGEND,
        DESCRIPTION,
        CLASSIFICATION,
        ORIGIN,
        COLOR,
    ];
}

/// Recoverable ingestion failures
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("Missing required columns: {0:?}")]
    MissingColumns(Vec<String>),
}

/// One soil stratum within one borehole
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub project_id: Option<String>,
    pub borehole_id: String,
    pub top_depth: Option<f64>,
    pub base_depth: Option<f64>,
    /// Soil classification code (`Legend`), e.g. "CH", "SM"
    pub classification_code: Option<String>,
    pub description_text: Option<String>,
    pub classification_label: Option<String>,
    /// Deposition context (`Origin1`), e.g. "Fill", "Residual"
    pub origin: Option<String>,
    pub color_text: Option<String>,

    // Optional descriptive attributes
    pub material_name: Option<String>,
    pub material_qualifier: Option<String>,
    pub plasticity_min: Option<String>,
    pub plasticity_max: Option<String>,
    pub plasticity_joiner: Option<String>,
    pub remarks: Option<String>,
}

impl Layer {
    /// Layer with known depths and no descriptive attributes
    pub fn new(borehole_id: impl Into<String>, top_depth: f64, base_depth: f64) -> Self {
        Self {
            borehole_id: borehole_id.into(),
            top_depth: Some(top_depth),
            base_depth: Some(base_depth),
            ..Default::default()
        }
    }

    pub fn with_origin(mut self, origin: &str) -> Self {
        self.origin = Some(origin.to_string());
        self
    }

    pub fn with_code(mut self, code: &str) -> Self {
        self.classification_code = Some(code.to_string());
        self
    }

    pub fn with_color(mut self, color: &str) -> Self {
        self.color_text = Some(color.to_string());
        self
    }

    pub fn with_project(mut self, project_id: &str) -> Self {
        self.project_id = Some(project_id.to_string());
        self
    }

    /// `base - top`; `None` if either depth is unknown
    pub fn thickness(&self) -> Option<f64> {
        Some(self.base_depth? - self.top_depth?)
    }

    /// Midpoint depth; `None` if either depth is unknown
    pub fn avg_depth(&self) -> Option<f64> {
        Some((self.top_depth? + self.base_depth?) / 2.0)
    }
}

/// Headline figures for a loaded dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetStats {
    /// Project id of the first row
    pub project_id: Option<String>,
    pub borehole_count: usize,
    pub layer_count: usize,
    pub max_depth: Option<f64>,
}

/// Main data holder: validated, sorted layers
#[derive(Debug, Clone, Default)]
pub struct BoreholeData {
    layers: Vec<Layer>,
}

impl BoreholeData {
    /// Wrap already-typed layers, applying the standard sort order
    pub fn from_layers(mut layers: Vec<Layer>) -> Self {
        sort_layers(&mut layers);
        Self { layers }
    }

    /// Load geology CSV from disk
    pub fn load(path: &Path) -> Result<Self> {
        let parse_options = CsvParseOptions::default()
            .with_null_values(Some(NullValues::AllColumnsSingle("NA".into())));

        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(None) // Scan entire file
            .with_parse_options(parse_options)
            .try_into_reader_with_file_path(Some(path.into()))
            .with_context(|| format!("Failed to create CSV reader: {:?}", path))?
            .finish()
            .with_context(|| format!("Failed to load geology CSV: {:?}", path))?;

        let data = Self::from_dataframe(&df)?;
        let stats = data.stats();
        tracing::info!(
            "Loaded {} soil layers from {} boreholes ({:?})",
            stats.layer_count,
            stats.borehole_count,
            path
        );
        Ok(data)
    }

    /// Convert a geology DataFrame into layers
    ///
    /// Depth columns may be numeric or text; unparseable values become unknown.
    pub fn from_dataframe(df: &DataFrame) -> Result<Self> {
        let missing: Vec<String> = columns::REQUIRED
            .iter()
            .filter(|name| df.get_column_index(name).is_none())
            .map(|name| name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(DataError::MissingColumns(missing).into());
        }

        let project_ids = string_column(df, columns::PROJECT_ID)?;
        let borehole_ids = string_column(df, columns::BOREHOLE_ID)?;
        let tops = depth_column(df, columns::TOP)?;
        let bases = depth_column(df, columns::BASE)?;
        let legends = string_column(df, columns::LEGEND)?;
        let descriptions = string_column(df, columns::DESCRIPTION)?;
        let classifications = string_column(df, columns::CLASSIFICATION)?;
        let origins = string_column(df, columns::ORIGIN)?;
        let colors = string_column(df, columns::COLOR)?;

        let material_names = optional_string_column(df, columns::PRIMARY_NAME)?;
        let qualifiers = optional_string_column(df, columns::PRIMARY_NAME_QUALIFIER)?;
        let plasticity_mins = optional_string_column(df, columns::PLASTICITY_MIN)?;
        let plasticity_maxs = optional_string_column(df, columns::PLASTICITY_MAX)?;
        let plasticity_joiners = optional_string_column(df, columns::PLASTICITY_JOINER)?;
        let remarks = optional_string_column(df, columns::REMARKS)?;

        let mut layers = Vec::with_capacity(df.height());
        let mut dropped = 0usize;
        let mut unknown_depths = 0usize;

        for idx in 0..df.height() {
            let Some(borehole_id) = borehole_ids[idx].clone() else {
                dropped += 1;
                continue;
            };
            if tops[idx].is_none() || bases[idx].is_none() {
                unknown_depths += 1;
            }

            layers.push(Layer {
                project_id: project_ids[idx].clone(),
                borehole_id,
                top_depth: tops[idx],
                base_depth: bases[idx],
                classification_code: legends[idx].clone(),
                description_text: descriptions[idx].clone(),
                classification_label: classifications[idx].clone(),
                origin: origins[idx].clone(),
                color_text: colors[idx].clone(),
                material_name: material_names[idx].clone(),
                material_qualifier: qualifiers[idx].clone(),
                plasticity_min: plasticity_mins[idx].clone(),
                plasticity_max: plasticity_maxs[idx].clone(),
                plasticity_joiner: plasticity_joiners[idx].clone(),
                remarks: remarks[idx].clone(),
            });
        }

        if dropped > 0 {
            tracing::warn!("Dropped {} rows without {}", dropped, columns::BOREHOLE_ID);
        }
        if unknown_depths > 0 {
            tracing::warn!("{} layers have unknown or non-numeric depths", unknown_depths);
        }

        Ok(Self::from_layers(layers))
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn into_layers(self) -> Vec<Layer> {
        self.layers
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Distinct borehole ids, sorted
    pub fn borehole_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.layers.iter().map(|l| l.borehole_id.clone()).collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    /// Restrict to the given boreholes (unknown ids are ignored)
    pub fn select_boreholes(&self, borehole_ids: &[String]) -> Self {
        let unknown: Vec<&String> = borehole_ids
            .iter()
            .filter(|id| !self.layers.iter().any(|l| &l.borehole_id == *id))
            .collect();
        if !unknown.is_empty() {
            tracing::warn!("Selected boreholes not in dataset: {:?}", unknown);
        }

        let layers = self
            .layers
            .iter()
            .filter(|l| borehole_ids.contains(&l.borehole_id))
            .cloned()
            .collect();
        Self { layers }
    }

    pub fn stats(&self) -> DatasetStats {
        let max_depth = self
            .layers
            .iter()
            .filter_map(|l| l.base_depth)
            .reduce(f64::max);

        DatasetStats {
            project_id: self.layers.first().and_then(|l| l.project_id.clone()),
            borehole_count: self.borehole_ids().len(),
            layer_count: self.layers.len(),
            max_depth,
        }
    }
}

/// Borehole id, then top depth (unknown tops last)
fn sort_layers(layers: &mut [Layer]) {
    layers.sort_by(|a, b| {
        a.borehole_id
            .cmp(&b.borehole_id)
            .then_with(|| match (a.top_depth, b.top_depth) {
                (Some(x), Some(y)) => x.total_cmp(&y),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            })
    });
}

/// Read a column as text; blank cells become `None`
fn string_column(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let column = df
        .column(name)
        .with_context(|| format!("Column '{}' not found", name))?
        .cast(&DataType::String)
        .with_context(|| format!("Column '{}' cannot be read as text", name))?;

    let values = column
        .str()
        .with_context(|| format!("Column '{}' is not string type", name))?
        .into_iter()
        .map(|v| v.filter(|s| !s.trim().is_empty()).map(|s| s.to_string()))
        .collect();

    Ok(values)
}

/// Optional columns read as all-null when absent
fn optional_string_column(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    if df.get_column_index(name).is_some() {
        string_column(df, name)
    } else {
        Ok(vec![None; df.height()])
    }
}

/// Read a depth column, coercing non-numeric values to `None`
fn depth_column(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let column = df
        .column(name)
        .with_context(|| format!("Column '{}' not found", name))?;

    // Text columns are trimmed first so " 1.5" still parses
    let column = if column.dtype() == &DataType::String {
        let trimmed: Vec<Option<String>> = column
            .str()?
            .into_iter()
            .map(|v| v.map(|s| s.trim().to_string()))
            .collect();
        Column::new(name.into(), trimmed)
    } else {
        column.clone()
    };

    let values = column
        .cast(&DataType::Float64)
        .with_context(|| format!("Column '{}' cannot be read as depth", name))?
        .f64()
        .with_context(|| format!("Column '{}' is not numeric", name))?
        .into_iter()
        .map(|v| v.filter(|d| d.is_finite()))
        .collect();

    Ok(values)
}
