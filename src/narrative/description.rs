//! Unit material description
//!
//! Builds one line in the form
//! `RESIDUAL – CLAY (CH to CI): medium to high plasticity, red to grey, sandy Remark`
//! from whichever descriptive attributes the unit's layers carry. Missing
//! attributes drop their clause instead of failing.

use crate::data::Layer;
use crate::units::UNKNOWN;
use crate::utils::{distinct_in_order, most_frequent};
use smallvec::SmallVec;

/// Material name used when no layer records one
pub const DEFAULT_MATERIAL: &str = "SOIL";

/// Joins origin and material in the heading
const HEADING_DASH: &str = "–";

/// Generate the material description for one unit's layers
///
/// Returns an empty string for an empty unit.
pub fn describe_unit(layers: &[&Layer]) -> String {
    if layers.is_empty() {
        return String::new();
    }

    let origin = most_frequent(layers.iter().filter_map(|l| l.origin.as_deref()))
        .unwrap_or(UNKNOWN);

    let primary_material = most_frequent(layers.iter().filter_map(|l| l.material_name.as_deref()))
        .map(|m| m.to_uppercase())
        .unwrap_or_else(|| DEFAULT_MATERIAL.to_string());

    let class_range = classification_range(layers);
    let plasticity = plasticity_descriptor(layers);
    let color = color_descriptor(layers);
    let qualifier = layers
        .iter()
        .find_map(|l| l.material_qualifier.as_deref())
        .map(|q| q.to_lowercase());
    let remark = layers.iter().find_map(|l| l.remarks.as_deref());

    let mut parts: Vec<String> = vec![
        format!("{} {}", origin.to_uppercase(), HEADING_DASH),
        primary_material,
    ];

    if !class_range.is_empty() {
        parts.push(format!("{}:", class_range));
    }

    let clauses: SmallVec<[String; 3]> = [Some(plasticity), Some(color), qualifier]
        .into_iter()
        .flatten()
        .filter(|c| !c.is_empty())
        .collect();
    if !clauses.is_empty() {
        parts.push(clauses.join(", "));
    }

    if let Some(remark) = remark {
        parts.push(remark.to_string());
    }

    // Collapse whitespace (including any embedded newlines) to single spaces
    parts.join(" ").split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Distinct codes sorted lexically: `(CH)`, `(CH to CI)`, or empty
fn classification_range(layers: &[&Layer]) -> String {
    let mut codes = distinct_in_order(
        layers
            .iter()
            .filter_map(|l| l.classification_code.as_deref())
            .map(str::trim)
            .filter(|c| !c.is_empty()),
    );
    codes.sort_unstable();

    if codes.is_empty() {
        String::new()
    } else {
        format!("({})", codes.join(" to "))
    }
}

/// `medium plasticity` or `medium to high plasticity`; empty without a minimum
///
/// The joiner is only used when it is literally `to`, and the maximum only
/// follows a joiner.
fn plasticity_descriptor(layers: &[&Layer]) -> String {
    let Some(min) = layers.iter().find_map(|l| l.plasticity_min.as_deref()) else {
        return String::new();
    };

    let mut parts: SmallVec<[&str; 3]> = SmallVec::new();
    parts.push(min);

    let joiner = layers.iter().find_map(|l| l.plasticity_joiner.as_deref());
    if joiner == Some("to") {
        parts.push("to");
        if let Some(max) = layers.iter().find_map(|l| l.plasticity_max.as_deref()) {
            parts.push(max);
        }
    }

    format!("{} plasticity", parts.join(" "))
}

/// First-seen distinct colours: `red`, `red to grey`, or empty
fn color_descriptor(layers: &[&Layer]) -> String {
    let colors = distinct_in_order(layers.iter().filter_map(|l| l.color_text.as_deref()));

    match colors.as_slice() {
        [] => String::new(),
        [only] => only.to_string(),
        [first, .., last] => format!("{} to {}", first, last),
    }
}
