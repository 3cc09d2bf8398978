use crate::summary::{ProjectSummary, UnitSummaryRow};
use serde_json;

/// JSON formatter for summary tables
pub struct JsonFormatter;

impl JsonFormatter {
    /// Format summary rows as pretty-printed JSON
    pub fn format(rows: &[UnitSummaryRow]) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(rows)
    }

    /// Format summary rows as compact JSON (no whitespace)
    pub fn format_compact(rows: &[UnitSummaryRow]) -> Result<String, serde_json::Error> {
        serde_json::to_string(rows)
    }

    pub fn format_projects(projects: &[ProjectSummary]) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(projects)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_rows() -> Vec<UnitSummaryRow> {
        vec![UnitSummaryRow {
            unit_code: "F1".to_string(),
            description: "FILL – SOIL (SM):".to_string(),
            extent: "Encountered from surface to approximately 1.5 mbgl in BH01, BH02.".to_string(),
            boreholes: vec!["BH01".to_string(), "BH02".to_string()],
            layer_count: 2,
            min_avg_depth: Some(0.7),
        }]
    }

    #[test]
    fn test_format_json() {
        let json = JsonFormatter::format(&sample_rows()).unwrap();

        assert!(json.contains("\"unit_code\": \"F1\""));
        assert!(json.contains("\"layer_count\": 2"));
        assert!(json.contains("\"BH02\""));
    }

    #[test]
    fn test_format_compact() {
        let json = JsonFormatter::format_compact(&sample_rows()).unwrap();

        assert!(!json.contains('\n'));
        let parsed: Vec<UnitSummaryRow> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, sample_rows());
    }
}
