use crate::data::DatasetStats;
use crate::summary::{ProjectSummary, UnitSummaryRow, SUMMARY_TEXT_COLUMN, UNIT_COLUMN};
use crate::utils::format_depth;

/// Markdown formatter for summary tables
pub struct MarkdownFormatter;

impl MarkdownFormatter {
    /// Format summary rows as "Table 3-1: Geological Units"
    pub fn format(rows: &[UnitSummaryRow]) -> String {
        let mut md = String::with_capacity(256 + rows.len() * 256);

        md.push_str("### Table 3-1: Geological Units\n\n");
        md.push_str("*Professional summary of geotechnical units encountered*\n\n");

        if rows.is_empty() {
            md.push_str("No geological units could be derived from the data.\n");
            return md;
        }

        md.push_str(&format!("| {} | {} |\n", UNIT_COLUMN, SUMMARY_TEXT_COLUMN));
        md.push_str("|------|-------------|\n");
        for row in rows {
            md.push_str(&format!(
                "| {} | {}<br><br>{} |\n",
                escape_cell(&row.unit_code),
                escape_cell(&row.description),
                escape_cell(&row.extent)
            ));
        }

        md
    }

    /// Dataset headline figures followed by the summary table
    pub fn format_with_stats(stats: &DatasetStats, rows: &[UnitSummaryRow]) -> String {
        let mut md = String::new();

        md.push_str("## Subsurface Conditions Summary\n\n");
        md.push_str(&format!(
            "**Project ID:** {}  \n",
            stats.project_id.as_deref().unwrap_or("-")
        ));
        md.push_str(&format!("**Boreholes:** {}  \n", stats.borehole_count));
        md.push_str(&format!("**Soil Layers:** {}  \n", stats.layer_count));
        match stats.max_depth {
            Some(depth) => md.push_str(&format!("**Max Depth:** {} m\n\n", format_depth(depth))),
            None => md.push_str("**Max Depth:** -\n\n"),
        }

        md.push_str(&Self::format(rows));
        md
    }

    /// One section per project
    pub fn format_projects(projects: &[ProjectSummary]) -> String {
        let mut md = String::new();
        for project in projects {
            md.push_str(&format!("## Project {}\n\n", project.project_id));
            md.push_str(&Self::format(&project.rows));
            md.push('\n');
        }
        md
    }
}

/// Pipes would split the cell; newlines would end the row
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', "<br>")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(code: &str, description: &str, extent: &str) -> UnitSummaryRow {
        UnitSummaryRow {
            unit_code: code.to_string(),
            description: description.to_string(),
            extent: extent.to_string(),
            boreholes: vec!["BH01".to_string()],
            layer_count: 1,
            min_avg_depth: Some(0.5),
        }
    }

    #[test]
    fn test_format_table() {
        let rows = vec![
            row("F1", "FILL – SOIL (SM):", "Encountered from surface to approximately 1.0 mbgl in BH01."),
            row("R1", "RESIDUAL – CLAY (CH | CI):", "Encountered from 1.0 to 4.0 mbgl in BH01."),
        ];
        let md = MarkdownFormatter::format(&rows);

        assert!(md.starts_with("### Table 3-1: Geological Units"));
        assert!(md.contains("| Unit | Description, material, relative consistency, Extent of occurrence |"));
        assert!(md.contains(
            "| F1 | FILL – SOIL (SM):<br><br>Encountered from surface to approximately 1.0 mbgl in BH01. |"
        ));
        assert!(md.contains("(CH \\| CI)"));
    }

    #[test]
    fn test_format_empty() {
        let md = MarkdownFormatter::format(&[]);
        assert!(md.contains("No geological units"));
    }

    #[test]
    fn test_format_with_stats() {
        let stats = DatasetStats {
            project_id: Some("P100".to_string()),
            borehole_count: 2,
            layer_count: 5,
            max_depth: Some(12.25),
        };
        let md = MarkdownFormatter::format_with_stats(&stats, &[]);
        assert!(md.contains("**Project ID:** P100"));
        assert!(md.contains("**Max Depth:** 12.3 m"));
    }
}
