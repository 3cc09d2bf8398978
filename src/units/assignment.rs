//! Unit Assigner
//!
//! Clusters layers from all boreholes into geological units:
//! 1. GroupKey = origin (or "Unknown") + classification group
//! 2. Keys ranked by the mean mid-depth of their layers
//! 3. Codes numbered per origin prefix in rank order (F1, F2, R1, AL1, ...)
//!
//! Numbering is a single fold over the ranked keys, threading the per-prefix
//! counters through the fold state.

use crate::config::{SummaryConfig, TieBreak, UndefinedDepthPolicy};
use crate::data::Layer;
use crate::units::classification::{ClassificationGroup, ClassificationGrouper, UNKNOWN};
use crate::utils::depth::{mean, min_value};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Joins origin and group in rendered keys (`Fill_Sand_Group`)
pub const KEY_SEPARATOR: &str = "_";

/// Unit code prefix for an origin
///
/// Fill → F, Residual → R, Alluvium → AL, Colluvium → CO, anything else → U.
pub fn origin_prefix(origin: &str) -> &'static str {
    match origin {
        "Fill" => "F",
        "Residual" => "R",
        "Alluvium" => "AL",
        "Colluvium" => "CO",
        _ => "U",
    }
}

/// Candidate unit identity before naming
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupKey {
    pub origin: String,
    pub group: ClassificationGroup,
}

impl GroupKey {
    pub fn for_layer(layer: &Layer, grouper: &ClassificationGrouper) -> Self {
        Self {
            origin: layer.origin.clone().unwrap_or_else(|| UNKNOWN.to_string()),
            group: grouper.group(layer.classification_code.as_deref()),
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.origin, KEY_SEPARATOR, self.group)
    }
}

/// A named geological unit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Unit {
    /// e.g. "F1", "R2", "AL1"
    pub unit_code: String,
    pub origin_prefix: String,
    /// 1-based position within the origin prefix
    pub sequence: u32,
    pub key: GroupKey,
    /// Indices of member layers in the assigned slice, in input order
    pub members: Vec<usize>,
    /// Mean mid-depth over members with known depths
    pub mean_avg_depth: Option<f64>,
    /// Shallowest member mid-depth
    pub min_avg_depth: Option<f64>,
}

impl Unit {
    /// Member layers resolved against the slice that was assigned
    pub fn layers<'a>(&self, layers: &'a [Layer]) -> Vec<&'a Layer> {
        self.members.iter().filter_map(|&idx| layers.get(idx)).collect()
    }
}

/// Result of unit assignment: units in rank order plus a per-layer lookup
#[derive(Debug, Clone, Default)]
pub struct UnitAssignment {
    units: Vec<Unit>,
    /// layer index → index into `units`
    layer_units: Vec<usize>,
}

impl UnitAssignment {
    /// Units in assignment (mean depth) order
    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn unit_for_layer(&self, layer_idx: usize) -> Option<&Unit> {
        self.layer_units.get(layer_idx).and_then(|&u| self.units.get(u))
    }

    pub fn unit_code_for(&self, layer_idx: usize) -> Option<&str> {
        self.unit_for_layer(layer_idx).map(|u| u.unit_code.as_str())
    }

    pub fn unit_by_code(&self, unit_code: &str) -> Option<&Unit> {
        self.units.iter().find(|u| u.unit_code == unit_code)
    }

    /// Number of layers covered
    pub fn layer_count(&self) -> usize {
        self.layer_units.len()
    }
}

/// Order two optional depths; unknown depths placed per policy
pub fn compare_optional_depth(
    a: Option<f64>,
    b: Option<f64>,
    policy: UndefinedDepthPolicy,
) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (None, None) => Ordering::Equal,
        (Some(_), None) => match policy {
            UndefinedDepthPolicy::SortLast => Ordering::Less,
            UndefinedDepthPolicy::SortFirst => Ordering::Greater,
        },
        (None, Some(_)) => match policy {
            UndefinedDepthPolicy::SortLast => Ordering::Greater,
            UndefinedDepthPolicy::SortFirst => Ordering::Less,
        },
    }
}

/// Per-key aggregate collected before ranking
struct Candidate {
    key: GroupKey,
    label: String,
    first_seen: usize,
    members: Vec<usize>,
    depths: Vec<f64>,
    mean: Option<f64>,
}

/// Assigns unit codes to layers
pub struct UnitAssigner<'a> {
    grouper: &'a ClassificationGrouper,
    tie_break: TieBreak,
    undefined_depth: UndefinedDepthPolicy,
}

impl<'a> UnitAssigner<'a> {
    pub fn new(grouper: &'a ClassificationGrouper, config: &SummaryConfig) -> Self {
        Self {
            grouper,
            tie_break: config.tie_break,
            undefined_depth: config.undefined_depth,
        }
    }

    /// Assign every layer to a unit. Never fails; no layers → no units.
    pub fn assign(&self, layers: &[Layer]) -> UnitAssignment {
        let mut candidates = self.collect_candidates(layers);
        self.rank(&mut candidates);

        let (units, _counters) = candidates.into_iter().fold(
            (Vec::new(), FxHashMap::<&'static str, u32>::default()),
            |(mut units, mut counters), candidate| {
                let prefix = origin_prefix(&candidate.key.origin);
                let counter = counters.entry(prefix).or_insert(0);
                *counter += 1;

                let unit = Unit {
                    unit_code: format!("{}{}", prefix, counter),
                    origin_prefix: prefix.to_string(),
                    sequence: *counter,
                    mean_avg_depth: candidate.mean,
                    min_avg_depth: min_value(&candidate.depths),
                    key: candidate.key,
                    members: candidate.members,
                };
                tracing::debug!(
                    "Unit {} <- {} ({} layers, mean depth {:?})",
                    unit.unit_code,
                    candidate.label,
                    unit.members.len(),
                    unit.mean_avg_depth
                );
                units.push(unit);
                (units, counters)
            },
        );

        let mut layer_units = vec![0usize; layers.len()];
        for (unit_idx, unit) in units.iter().enumerate() {
            for &member in &unit.members {
                layer_units[member] = unit_idx;
            }
        }

        UnitAssignment { units, layer_units }
    }

    /// Aggregate layers by GroupKey, keeping first-seen order
    fn collect_candidates(&self, layers: &[Layer]) -> Vec<Candidate> {
        let mut index: FxHashMap<GroupKey, usize> = FxHashMap::default();
        let mut candidates: Vec<Candidate> = Vec::new();

        for (idx, layer) in layers.iter().enumerate() {
            let key = GroupKey::for_layer(layer, self.grouper);
            let slot = *index.entry(key.clone()).or_insert_with(|| {
                candidates.push(Candidate {
                    label: key.to_string(),
                    key,
                    first_seen: idx,
                    members: Vec::new(),
                    depths: Vec::new(),
                    mean: None,
                });
                candidates.len() - 1
            });

            let candidate = &mut candidates[slot];
            candidate.members.push(idx);
            if let Some(depth) = layer.avg_depth() {
                candidate.depths.push(depth);
            }
        }

        for candidate in &mut candidates {
            candidate.mean = mean(&candidate.depths);
        }

        candidates
    }

    /// Ascending mean depth, then the configured tie-break
    fn rank(&self, candidates: &mut [Candidate]) {
        candidates.sort_by(|a, b| {
            compare_optional_depth(a.mean, b.mean, self.undefined_depth).then_with(|| {
                match self.tie_break {
                    TieBreak::Lexical => a.label.cmp(&b.label),
                    TieBreak::FirstSeen => a.first_seen.cmp(&b.first_seen),
                }
            })
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assign_default(layers: &[Layer]) -> UnitAssignment {
        let grouper = ClassificationGrouper::default();
        let config = SummaryConfig::default();
        UnitAssigner::new(&grouper, &config).assign(layers)
    }

    fn codes(assignment: &UnitAssignment) -> Vec<&str> {
        assignment.units().iter().map(|u| u.unit_code.as_str()).collect()
    }

    #[test]
    fn test_empty_input() {
        let assignment = assign_default(&[]);
        assert!(assignment.is_empty());
        assert_eq!(assignment.layer_count(), 0);
    }

    #[test]
    fn test_single_fill_unit() {
        let layers = vec![
            Layer::new("BH01", 0.0, 1.5).with_origin("Fill").with_code("SM"),
            Layer::new("BH02", 0.0, 1.4).with_origin("Fill").with_code("SM"),
        ];
        let assignment = assign_default(&layers);
        assert_eq!(codes(&assignment), vec!["F1"]);
        assert_eq!(assignment.unit_code_for(0), Some("F1"));
        assert_eq!(assignment.unit_code_for(1), Some("F1"));
        assert_eq!(assignment.units()[0].key.to_string(), "Fill_Sand_Group");
    }

    #[test]
    fn test_origins_numbered_independently() {
        let layers = vec![
            Layer::new("BH01", 4.0, 6.0).with_origin("Residual").with_code("CH"),
            Layer::new("BH01", 0.0, 1.0).with_origin("Fill").with_code("GW"),
            Layer::new("BH01", 1.0, 2.0).with_origin("Fill").with_code("CL"),
            Layer::new("BH01", 2.0, 4.0).with_origin("Alluvium").with_code("SP"),
            Layer::new("BH01", 6.0, 9.0).with_origin("Residual").with_code("CI"),
        ];
        let assignment = assign_default(&layers);
        assert_eq!(codes(&assignment), vec!["F1", "F2", "AL1", "R1", "R2"]);
        assert_eq!(assignment.unit_code_for(0), Some("R1"));
        assert_eq!(assignment.unit_code_for(4), Some("R2"));
    }

    #[test]
    fn test_group_families_merge() {
        let layers = vec![
            Layer::new("BH01", 0.0, 1.0).with_origin("Fill").with_code("SM"),
            Layer::new("BH02", 0.0, 1.2).with_origin("Fill").with_code("SC"),
            Layer::new("BH03", 0.0, 0.8).with_origin("Fill").with_code("SP"),
        ];
        let assignment = assign_default(&layers);
        assert_eq!(codes(&assignment), vec!["F1"]);
        assert_eq!(assignment.units()[0].members, vec![0, 1, 2]);
    }

    #[test]
    fn test_blank_code_separate_from_missing_code() {
        let layers = vec![
            Layer::new("BH01", 0.0, 1.0).with_origin("Fill"),
            Layer::new("BH02", 0.0, 1.2).with_origin("Fill").with_code("   "),
        ];
        let assignment = assign_default(&layers);
        assert_eq!(assignment.units().len(), 2);
        assert_eq!(assignment.units()[0].key.to_string(), "Fill_Unknown");
        assert_eq!(assignment.units()[1].key.to_string(), "Fill_");
        assert_eq!(codes(&assignment), vec!["F1", "F2"]);
    }

    #[test]
    fn test_unmapped_origins_share_prefix_counter() {
        let layers = vec![
            Layer::new("BH01", 0.0, 1.0).with_origin("Marine").with_code("CH"),
            Layer::new("BH01", 1.0, 2.0).with_origin("Lacustrine").with_code("CH"),
            Layer::new("BH01", 2.0, 3.0).with_code("CH"),
        ];
        let assignment = assign_default(&layers);
        assert_eq!(codes(&assignment), vec!["U1", "U2", "U3"]);
        assert_eq!(assignment.units()[2].key.origin, "Unknown");
    }

    #[test]
    fn test_equal_means_lexical_tie_break() {
        // Both keys have mean depth 0.5; Sand_Group is discovered first
        let layers = vec![
            Layer::new("BH01", 0.0, 1.0).with_origin("Fill").with_code("SM"),
            Layer::new("BH02", 0.0, 1.0).with_origin("Fill").with_code("CL"),
        ];
        let assignment = assign_default(&layers);
        assert_eq!(assignment.unit_code_for(1), Some("F1")); // Fill_CL_Group
        assert_eq!(assignment.unit_code_for(0), Some("F2")); // Fill_Sand_Group
    }

    #[test]
    fn test_equal_means_first_seen_tie_break() {
        let layers = vec![
            Layer::new("BH01", 0.0, 1.0).with_origin("Fill").with_code("SM"),
            Layer::new("BH02", 0.0, 1.0).with_origin("Fill").with_code("CL"),
        ];
        let grouper = ClassificationGrouper::default();
        let config = SummaryConfig { tie_break: TieBreak::FirstSeen, ..Default::default() };
        let assignment = UnitAssigner::new(&grouper, &config).assign(&layers);
        assert_eq!(assignment.unit_code_for(0), Some("F1"));
        assert_eq!(assignment.unit_code_for(1), Some("F2"));
    }

    #[test]
    fn test_undefined_depth_policy() {
        let mut no_depth = Layer::new("BH01", 0.0, 0.0).with_origin("Fill").with_code("CH");
        no_depth.top_depth = None;
        let layers = vec![
            no_depth,
            Layer::new("BH01", 3.0, 4.0).with_origin("Fill").with_code("SM"),
        ];

        let assignment = assign_default(&layers);
        assert_eq!(assignment.unit_code_for(1), Some("F1"));
        assert_eq!(assignment.unit_code_for(0), Some("F2"));
        assert_eq!(assignment.units()[1].mean_avg_depth, None);

        let grouper = ClassificationGrouper::default();
        let config = SummaryConfig {
            undefined_depth: UndefinedDepthPolicy::SortFirst,
            ..Default::default()
        };
        let assignment = UnitAssigner::new(&grouper, &config).assign(&layers);
        assert_eq!(assignment.unit_code_for(0), Some("F1"));
        assert_eq!(assignment.unit_code_for(1), Some("F2"));
    }

    #[test]
    fn test_mean_depth_not_min_depth_ranks() {
        // CL has the shallowest layer but the deeper mean
        let layers = vec![
            Layer::new("BH01", 0.0, 0.4).with_origin("Fill").with_code("CL"),
            Layer::new("BH02", 5.0, 7.0).with_origin("Fill").with_code("CL"),
            Layer::new("BH01", 0.4, 2.0).with_origin("Fill").with_code("GP"),
        ];
        let assignment = assign_default(&layers);
        let gravel = assignment.unit_by_code("F1").unwrap();
        assert_eq!(gravel.key.group.as_str(), "Gravel_Group");
        let clay = assignment.unit_by_code("F2").unwrap();
        assert_eq!(clay.min_avg_depth, Some(0.2));
    }

    #[test]
    fn test_origin_prefix_mapping() {
        assert_eq!(origin_prefix("Fill"), "F");
        assert_eq!(origin_prefix("Residual"), "R");
        assert_eq!(origin_prefix("Alluvium"), "AL");
        assert_eq!(origin_prefix("Colluvium"), "CO");
        assert_eq!(origin_prefix("Unknown"), "U");
        assert_eq!(origin_prefix("fill"), "U");
    }
}
