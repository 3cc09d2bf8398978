//! Extent of occurrence
//!
//! Summarises where a unit was encountered: per-borehole top/base ranges are
//! compared across boreholes and the unit is reported either as a uniform
//! layer (average depths, "approximately") or as variable (overall range
//! plus "Depth varies across boreholes.").

use crate::config::SummaryConfig;
use crate::data::Layer;
use crate::utils::depth::{format_depth, max_value, mean, min_value, quantize_spread};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Depth range of a unit within one borehole
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoreholeRange {
    pub borehole_id: String,
    /// Shallowest known top
    pub top: Option<f64>,
    /// Deepest known base
    pub base: Option<f64>,
}

/// Occurrence classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Occurrence {
    Uniform,
    Variable,
}

/// Per-borehole ranges sorted by borehole id
pub fn borehole_ranges(layers: &[&Layer]) -> Vec<BoreholeRange> {
    let mut by_borehole: FxHashMap<&str, BoreholeRange> = FxHashMap::default();

    for layer in layers {
        let range = by_borehole
            .entry(layer.borehole_id.as_str())
            .or_insert_with(|| BoreholeRange {
                borehole_id: layer.borehole_id.clone(),
                top: None,
                base: None,
            });

        if let Some(top) = layer.top_depth {
            range.top = Some(range.top.map_or(top, |t| t.min(top)));
        }
        if let Some(base) = layer.base_depth {
            range.base = Some(range.base.map_or(base, |b| b.max(base)));
        }
    }

    let mut ranges: Vec<BoreholeRange> = by_borehole.into_values().collect();
    ranges.sort_by(|a, b| a.borehole_id.cmp(&b.borehole_id));
    ranges
}

/// Uniform when both spreads are strictly inside their tolerances
pub fn classify_occurrence(top_spread: f64, base_spread: f64, config: &SummaryConfig) -> Occurrence {
    if quantize_spread(top_spread) < config.uniform_top_tolerance
        && quantize_spread(base_spread) < config.uniform_base_tolerance
    {
        Occurrence::Uniform
    } else {
        Occurrence::Variable
    }
}

/// Generate the extent statement for one unit's layers
///
/// Returns an empty string for an empty unit.
pub fn describe_extent(layers: &[&Layer], config: &SummaryConfig) -> String {
    if layers.is_empty() {
        return String::new();
    }

    let ranges = borehole_ranges(layers);
    let borehole_list = ranges
        .iter()
        .map(|r| r.borehole_id.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    let tops: Vec<f64> = ranges.iter().filter_map(|r| r.top).collect();
    let bases: Vec<f64> = ranges.iter().filter_map(|r| r.base).collect();

    let (Some(min_top), Some(max_top), Some(min_base), Some(max_base)) = (
        min_value(&tops),
        max_value(&tops),
        min_value(&bases),
        max_value(&bases),
    ) else {
        return format!("Encountered in {}. Depth not recorded.", borehole_list);
    };

    match classify_occurrence(max_top - min_top, max_base - min_base, config) {
        Occurrence::Uniform => {
            // Both vectors are non-empty here
            let avg_top = mean(&tops).unwrap_or(min_top);
            let avg_base = mean(&bases).unwrap_or(max_base);

            if avg_top < config.surface_threshold {
                format!(
                    "Encountered from surface to approximately {} mbgl in {}.",
                    format_depth(avg_base),
                    borehole_list
                )
            } else {
                format!(
                    "Encountered from approximately {} to {} mbgl in {}.",
                    format_depth(avg_top),
                    format_depth(avg_base),
                    borehole_list
                )
            }
        }
        Occurrence::Variable => {
            let depth_desc = if min_top < config.surface_threshold {
                format!(
                    "from surface to {}-{} mbgl",
                    format_depth(min_base),
                    format_depth(max_base)
                )
            } else {
                format!(
                    "from {} to {} mbgl",
                    format_depth(min_top),
                    format_depth(max_base)
                )
            };

            format!(
                "Encountered {} in {}. Depth varies across boreholes.",
                depth_desc, borehole_list
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extent(layers: &[Layer]) -> String {
        let refs: Vec<&Layer> = layers.iter().collect();
        describe_extent(&refs, &SummaryConfig::default())
    }

    #[test]
    fn test_empty_unit() {
        assert_eq!(describe_extent(&[], &SummaryConfig::default()), "");
    }

    #[test]
    fn test_uniform_from_surface() {
        let layers = vec![
            Layer::new("BH02", 0.0, 1.4),
            Layer::new("BH01", 0.0, 1.5),
        ];
        assert_eq!(
            extent(&layers),
            "Encountered from surface to approximately 1.5 mbgl in BH01, BH02."
        );
    }

    #[test]
    fn test_uniform_at_depth() {
        let layers = vec![
            Layer::new("BH01", 2.0, 4.0),
            Layer::new("BH02", 2.1, 4.2),
            Layer::new("BH03", 2.05, 4.1),
        ];
        assert_eq!(
            extent(&layers),
            "Encountered from approximately 2.1 to 4.1 mbgl in BH01, BH02, BH03."
        );
    }

    #[test]
    fn test_variable_from_surface() {
        let layers = vec![
            Layer::new("BH01", 0.0, 0.8),
            Layer::new("BH02", 0.0, 2.5),
        ];
        assert_eq!(
            extent(&layers),
            "Encountered from surface to 0.8-2.5 mbgl in BH01, BH02. Depth varies across boreholes."
        );
    }

    #[test]
    fn test_variable_at_depth() {
        let layers = vec![
            Layer::new("BH01", 1.0, 3.0),
            Layer::new("BH02", 2.5, 6.0),
        ];
        assert_eq!(
            extent(&layers),
            "Encountered from 1.0 to 6.0 mbgl in BH01, BH02. Depth varies across boreholes."
        );
    }

    #[test]
    fn test_borehole_range_spans_multiple_layers() {
        // BH01 has two layers in the unit: range 0.0-2.0
        let layers = vec![
            Layer::new("BH01", 0.0, 1.0),
            Layer::new("BH01", 1.0, 2.0),
            Layer::new("BH02", 0.0, 1.9),
        ];
        let refs: Vec<&Layer> = layers.iter().collect();
        let ranges = borehole_ranges(&refs);
        assert_eq!(ranges.len(), 2);
        assert_eq!(ranges[0].top, Some(0.0));
        assert_eq!(ranges[0].base, Some(2.0));
        assert_eq!(
            extent(&layers),
            "Encountered from surface to approximately 2.0 mbgl in BH01, BH02."
        );
    }

    #[test]
    fn test_tolerance_boundaries_are_strict() {
        let config = SummaryConfig::default();
        assert_eq!(classify_occurrence(0.19, 0.29, &config), Occurrence::Uniform);
        assert_eq!(classify_occurrence(0.2, 0.0, &config), Occurrence::Variable);
        assert_eq!(classify_occurrence(0.0, 0.3, &config), Occurrence::Variable);
        // Float subtraction lands just under the tolerance; still variable
        assert_eq!(classify_occurrence(1.2 - 1.0, 0.0, &config), Occurrence::Variable);
        assert_eq!(classify_occurrence(0.0, 2.3 - 2.0, &config), Occurrence::Variable);
    }

    #[test]
    fn test_top_spread_just_under_tolerance_is_uniform() {
        let config = SummaryConfig::default();
        assert_eq!(
            classify_occurrence(1.199_999_6 - 1.0, 0.0, &config),
            Occurrence::Uniform
        );

        let layers = vec![
            Layer::new("BH01", 1.0, 3.0),
            Layer::new("BH02", 1.199_999_6, 3.0),
        ];
        assert!(!extent(&layers).contains("Depth varies"));
    }

    #[test]
    fn test_top_spread_exactly_tolerance_reports_variable() {
        let layers = vec![
            Layer::new("BH01", 1.0, 3.0),
            Layer::new("BH02", 1.2, 3.0),
        ];
        assert!(extent(&layers).ends_with("Depth varies across boreholes."));
    }

    #[test]
    fn test_unknown_depths() {
        let mut a = Layer::new("BH01", 0.0, 0.0);
        a.top_depth = None;
        a.base_depth = None;
        let layers = vec![a];
        assert_eq!(extent(&layers), "Encountered in BH01. Depth not recorded.");

        // Partially known depths are ignored per value
        let mut b = Layer::new("BH02", 0.0, 1.0);
        b.base_depth = None;
        let layers = vec![Layer::new("BH01", 0.0, 1.0), b];
        assert_eq!(
            extent(&layers),
            "Encountered from surface to approximately 1.0 mbgl in BH01, BH02."
        );
    }
}
