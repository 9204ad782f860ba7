//! Migration generator
//!
//! This module assembles a migration script from the fragments carried by a
//! diff result. The script moves the target database toward the source.

use std::fmt::Write;

use crate::schema::diff::{DiffCategory, DiffResult, Difference};

const BANNER: &str = "-- ============================================";
const BATCH_TERMINATOR: &str = "GO";

/// Migration script generator
#[derive(Debug, Default, Clone, Copy)]
pub struct MigrationGenerator;

impl MigrationGenerator {
    /// Create a new migration generator
    pub fn new() -> Self {
        Self
    }

    /// Generate the migration script for a diff result.
    ///
    /// Categories come in the fixed category order and a category is only
    /// written when at least one of its differences carries a fragment.
    /// Differences without a fragment are skipped. Deferred fragments are
    /// written with the foreign key changes, after every table exists.
    pub fn generate_migration_script(&self, result: &DiffResult) -> String {
        let mut script = String::new();

        script.push_str(BANNER);
        script.push('\n');
        script.push_str("-- Migration Script\n");
        let _ = writeln!(script, "-- From: {}", result.source_database);
        let _ = writeln!(script, "-- To:   {}", result.target_database);
        script.push_str(BANNER);
        script.push_str("\n\n");

        let mut statements = 0usize;
        for category in DiffCategory::ALL {
            let mut scripted: Vec<(String, &str)> = result
                .by_category(category)
                .filter_map(|d| {
                    d.migration_sql
                        .as_deref()
                        .map(|sql| (d.description.clone(), sql))
                })
                .collect();
            if category == DiffCategory::ForeignKey {
                scripted.extend(deferred_statements(result));
            }
            if scripted.is_empty() {
                continue;
            }

            let _ = writeln!(script, "-- {} Changes", category);
            let _ = writeln!(script, "-- {}\n", "-".repeat(40));

            for (comment, sql) in scripted {
                let _ = writeln!(script, "-- {}", comment);
                script.push_str(sql);
                let _ = write!(script, "\n{}\n\n", BATCH_TERMINATOR);
                statements += 1;
            }
        }

        tracing::debug!(statements, "Generated migration script");
        script
    }
}

/// Fragments held back until every table exists, in discovery order
fn deferred_statements(result: &DiffResult) -> impl Iterator<Item = (String, &str)> {
    result.differences.iter().filter_map(|d: &Difference| {
        d.deferred_sql
            .as_deref()
            .map(|sql| (format!("Foreign keys of {}", d.object_name), sql))
    })
}
