//! Human-readable rendering of a diff result

use std::fmt::Write;

use crate::config::OutputFormat;
use crate::schema::diff::{DiffCategory, DiffResult};

const RULE_WIDTH: usize = 50;

/// Render a result in the requested output format
pub fn render(result: &DiffResult, format: OutputFormat) -> String {
    match format {
        OutputFormat::Git => render_git_style(result),
        OutputFormat::Summary => render_summary(result),
        OutputFormat::Full => format!("{}\n{}", render_git_style(result), render_summary(result)),
    }
}

/// Unified-diff style report, grouped by category in the fixed order
pub fn render_git_style(result: &DiffResult) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "diff --sqlpulse a/{} b/{}",
        result.source_database, result.target_database
    );
    let _ = writeln!(out, "--- a/{}", result.source_database);
    let _ = writeln!(out, "+++ b/{}", result.target_database);
    out.push('\n');

    for category in DiffCategory::ALL {
        let mut differences = result.by_category(category).peekable();
        if differences.peek().is_none() {
            continue;
        }

        let _ = write!(out, "\n@@ {} @@\n", category);
        for difference in differences {
            let _ = writeln!(out, "{}", difference);
        }
    }

    out
}

/// Count summary with a per-category table
pub fn render_summary(result: &DiffResult) -> String {
    let rule = "─".repeat(RULE_WIDTH);
    let summary = &result.summary;
    let mut out = String::new();

    let _ = writeln!(out, "{}", rule);
    let _ = writeln!(
        out,
        "Diff Summary: {} → {}",
        result.source_database, result.target_database
    );
    let _ = writeln!(out, "{}", rule);

    let _ = writeln!(out, "  Total differences: {}", summary.total_differences);
    let _ = writeln!(out, "  + Added:   {} (in target only)", summary.added);
    let _ = writeln!(out, "  - Removed: {} (in source only)", summary.removed);
    let _ = writeln!(out, "  ~ Modified: {}", summary.modified);

    if !summary.by_category.is_empty() {
        out.push('\n');
        out.push_str("  By category:\n");
        for (category, count) in &summary.by_category {
            let label = format!("{}:", category);
            let _ = writeln!(out, "    {:<15} {}", label, count);
        }
    }

    let _ = writeln!(out, "{}", rule);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::diff::{DiffKind, Difference};
    use pretty_assertions::assert_eq;

    fn sample() -> DiffResult {
        DiffResult::new(
            "dev",
            "prod",
            vec![
                Difference::existence(
                    DiffKind::Added,
                    DiffCategory::Table,
                    "[dbo].[Audit]",
                    "Table [dbo].[Audit] has no counterpart",
                ),
                Difference::modified(
                    DiffCategory::Column,
                    "[dbo].[Users].Email",
                    "MaxLength",
                    "100",
                    "255",
                    "Max length differs: 100 vs 255",
                ),
                Difference::existence(
                    DiffKind::Removed,
                    DiffCategory::Schema,
                    "[sales]",
                    "Schema [sales] has no counterpart",
                ),
            ],
        )
    }

    #[test]
    fn test_git_style_groups_in_category_order() {
        let expected = "diff --sqlpulse a/dev b/prod\n\
--- a/dev\n\
+++ b/prod\n\
\n\
\n@@ SCHEMA @@\n\
- [SCHEMA] [sales]: Schema [sales] has no counterpart\n\
\n@@ TABLE @@\n\
+ [TABLE] [dbo].[Audit]: Table [dbo].[Audit] has no counterpart\n\
\n@@ COLUMN @@\n\
~ [COLUMN] [dbo].[Users].Email: Max length differs: 100 vs 255\n";

        assert_eq!(render_git_style(&sample()), expected);
    }

    #[test]
    fn test_summary_table() {
        let rendered = render_summary(&sample());
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines[1], "Diff Summary: dev → prod");
        assert_eq!(lines[3], "  Total differences: 3");
        assert_eq!(lines[4], "  + Added:   1 (in target only)");
        assert_eq!(lines[5], "  - Removed: 1 (in source only)");
        assert_eq!(lines[6], "  ~ Modified: 1");
        assert_eq!(lines[8], "  By category:");
        assert_eq!(lines[9], "    SCHEMA:         1");
        assert_eq!(lines[10], "    TABLE:          1");
        assert_eq!(lines[11], "    COLUMN:         1");
        assert_eq!(lines.last().copied(), Some("─".repeat(50).as_str()));
    }

    #[test]
    fn test_full_is_report_then_summary() {
        let result = sample();
        let full = render(&result, OutputFormat::Full);
        assert!(full.starts_with(&render_git_style(&result)));
        assert!(full.ends_with(&render_summary(&result)));
    }
}
