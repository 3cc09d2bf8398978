//! CSV / Parquet export
//!
//! Two tables leave the pipeline:
//! - the summary table (`Unit` + combined description/extent cell)
//! - the enriched per-layer dataset (input columns + derived columns + `Unit`)
//!
//! CSV output is UTF-8; cells containing newlines are quoted by the writer.

use crate::data::{columns, Layer};
use crate::summary::{UnitSummaryRow, SUMMARY_TEXT_COLUMN, UNIT_COLUMN};
use crate::units::UnitAssignment;
use polars::prelude::*;
use anyhow::{Context, Result};
use std::fs::File;
use std::path::Path;

/// Tabular formatter for summary and per-layer exports
pub struct TabularFormatter;

impl TabularFormatter {
    /// Two-column summary table
    pub fn summary_frame(rows: &[UnitSummaryRow]) -> Result<DataFrame> {
        let units: Vec<&str> = rows.iter().map(|r| r.unit_code.as_str()).collect();
        let texts: Vec<String> = rows.iter().map(|r| r.combined_text()).collect();

        DataFrame::new(vec![
            Column::new(UNIT_COLUMN.into(), units),
            Column::new(SUMMARY_TEXT_COLUMN.into(), texts),
        ])
        .with_context(|| "Failed to build summary table")
    }

    /// Input layers with THICKNESS, AvgDepth, ClassGroup, GroupKey and Unit added
    pub fn layers_frame(layers: &[Layer], assignment: &UnitAssignment) -> Result<DataFrame> {
        fn text<F>(layers: &[Layer], name: &str, field: F) -> Column
        where
            F: Fn(&Layer) -> Option<&str>,
        {
            let values: Vec<Option<&str>> = layers.iter().map(field).collect();
            Column::new(name.into(), values)
        }

        fn depth<F>(layers: &[Layer], name: &str, field: F) -> Column
        where
            F: Fn(&Layer) -> Option<f64>,
        {
            let values: Vec<Option<f64>> = layers.iter().map(field).collect();
            Column::new(name.into(), values)
        }

        let units: Vec<_> = (0..layers.len()).map(|idx| assignment.unit_for_layer(idx)).collect();
        let class_groups: Vec<Option<String>> = units
            .iter()
            .map(|u| u.map(|u| u.key.group.to_string()))
            .collect();
        let group_keys: Vec<Option<String>> =
            units.iter().map(|u| u.map(|u| u.key.to_string())).collect();
        let unit_codes: Vec<Option<&str>> =
            units.iter().map(|u| u.map(|u| u.unit_code.as_str())).collect();

        DataFrame::new(vec![
            text(layers, columns::PROJECT_ID, |l| l.project_id.as_deref()),
            text(layers, columns::BOREHOLE_ID, |l| Some(l.borehole_id.as_str())),
            depth(layers, columns::TOP, |l| l.top_depth),
            depth(layers, columns::BASE, |l| l.base_depth),
            text(layers, columns::LEGEND, |l| l.classification_code.as_deref()),
            text(layers, columns::DESCRIPTION, |l| l.description_text.as_deref()),
            text(layers, columns::CLASSIFICATION, |l| l.classification_label.as_deref()),
            text(layers, columns::ORIGIN, |l| l.origin.as_deref()),
            text(layers, columns::COLOR, |l| l.color_text.as_deref()),
            text(layers, columns::PRIMARY_NAME, |l| l.material_name.as_deref()),
            text(layers, columns::PRIMARY_NAME_QUALIFIER, |l| l.material_qualifier.as_deref()),
            text(layers, columns::PLASTICITY_MIN, |l| l.plasticity_min.as_deref()),
            text(layers, columns::PLASTICITY_MAX, |l| l.plasticity_max.as_deref()),
            text(layers, columns::PLASTICITY_JOINER, |l| l.plasticity_joiner.as_deref()),
            text(layers, columns::REMARKS, |l| l.remarks.as_deref()),
            depth(layers, columns::THICKNESS, Layer::thickness),
            depth(layers, columns::AVG_DEPTH, Layer::avg_depth),
            Column::new(columns::CLASS_GROUP.into(), class_groups),
            Column::new(columns::GROUP_KEY.into(), group_keys),
            Column::new(columns::UNIT.into(), unit_codes),
        ])
        .with_context(|| "Failed to build enriched layer table")
    }

    /// Render a table as CSV text
    pub fn to_csv_string(df: &mut DataFrame) -> Result<String> {
        let mut buf = Vec::new();
        CsvWriter::new(&mut buf)
            .include_header(true)
            .finish(df)
            .with_context(|| "Failed to write CSV")?;
        String::from_utf8(buf).with_context(|| "CSV output is not valid UTF-8")
    }

    pub fn write_csv(df: &mut DataFrame, path: &Path) -> Result<()> {
        let mut file = File::create(path)
            .with_context(|| format!("Failed to create CSV file: {:?}", path))?;
        CsvWriter::new(&mut file)
            .include_header(true)
            .finish(df)
            .with_context(|| format!("Failed to write CSV: {:?}", path))?;
        tracing::info!("Wrote {} rows to {:?}", df.height(), path);
        Ok(())
    }

    pub fn write_parquet(df: &mut DataFrame, path: &Path) -> Result<()> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create Parquet file: {:?}", path))?;
        ParquetWriter::new(file)
            .finish(df)
            .with_context(|| format!("Failed to write Parquet: {:?}", path))?;
        tracing::info!("Wrote {} rows to {:?}", df.height(), path);
        Ok(())
    }
}
