//! Difference records produced by a schema comparison

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of change, read as "what the target has relative to the source"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiffKind {
    /// Exists in target but not in source
    Added,
    /// Exists in source but not in target
    Removed,
    /// Exists in both with a differing property
    Modified,
}

impl DiffKind {
    /// Report line marker
    pub fn marker(&self) -> char {
        match self {
            DiffKind::Added => '+',
            DiffKind::Removed => '-',
            DiffKind::Modified => '~',
        }
    }
}

impl fmt::Display for DiffKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DiffKind::Added => "ADDED",
            DiffKind::Removed => "REMOVED",
            DiffKind::Modified => "MODIFIED",
        };
        f.write_str(name)
    }
}

/// Object category of a difference. The declaration order is the fixed
/// order in which categories are reported and scripted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiffCategory {
    Schema,
    Table,
    Column,
    Index,
    ForeignKey,
    Constraint,
    View,
    Procedure,
    Function,
    Trigger,
}

impl DiffCategory {
    pub const ALL: [DiffCategory; 10] = [
        DiffCategory::Schema,
        DiffCategory::Table,
        DiffCategory::Column,
        DiffCategory::Index,
        DiffCategory::ForeignKey,
        DiffCategory::Constraint,
        DiffCategory::View,
        DiffCategory::Procedure,
        DiffCategory::Function,
        DiffCategory::Trigger,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DiffCategory::Schema => "SCHEMA",
            DiffCategory::Table => "TABLE",
            DiffCategory::Column => "COLUMN",
            DiffCategory::Index => "INDEX",
            DiffCategory::ForeignKey => "FOREIGN_KEY",
            DiffCategory::Constraint => "CONSTRAINT",
            DiffCategory::View => "VIEW",
            DiffCategory::Procedure => "PROCEDURE",
            DiffCategory::Function => "FUNCTION",
            DiffCategory::Trigger => "TRIGGER",
        }
    }
}

impl fmt::Display for DiffCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single difference between source and target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Difference {
    pub kind: DiffKind,
    pub category: DiffCategory,
    /// Fully qualified object name, e.g. `[dbo].[Users].Email`
    pub object_name: String,
    /// Property that differs, e.g. `MaxLength`
    pub property_name: Option<String>,
    pub source_value: Option<String>,
    pub target_value: Option<String>,
    pub description: String,
    /// SQL moving the target toward the source
    pub migration_sql: Option<String>,
    /// SQL that may only run once every table exists, such as the foreign
    /// keys of a re-created table
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deferred_sql: Option<String>,
}

impl Difference {
    /// An object present on one side only
    pub fn existence(
        kind: DiffKind,
        category: DiffCategory,
        object_name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            category,
            object_name: object_name.into(),
            property_name: None,
            source_value: None,
            target_value: None,
            description: description.into(),
            migration_sql: None,
            deferred_sql: None,
        }
    }

    /// A property whose value differs between two matched objects
    pub fn modified(
        category: DiffCategory,
        object_name: impl Into<String>,
        property_name: &str,
        source_value: impl Into<String>,
        target_value: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            kind: DiffKind::Modified,
            category,
            object_name: object_name.into(),
            property_name: Some(property_name.to_string()),
            source_value: Some(source_value.into()),
            target_value: Some(target_value.into()),
            description: description.into(),
            migration_sql: None,
            deferred_sql: None,
        }
    }

    pub fn with_migration(mut self, sql: impl Into<String>) -> Self {
        let sql = sql.into();
        self.migration_sql = if sql.is_empty() { None } else { Some(sql) };
        self
    }

    pub fn with_deferred(mut self, sql: impl Into<String>) -> Self {
        let sql = sql.into();
        self.deferred_sql = if sql.is_empty() { None } else { Some(sql) };
        self
    }
}

impl fmt::Display for Difference {
    /// `<marker> [<category>] <object>: <description>`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] {}: {}",
            self.kind.marker(),
            self.category,
            self.object_name,
            self.description
        )
    }
}

/// Summary counts of a diff
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffSummary {
    pub total_differences: usize,
    pub added: usize,
    pub removed: usize,
    pub modified: usize,
    /// Only categories with at least one difference, in category order
    pub by_category: BTreeMap<DiffCategory, usize>,
}

impl DiffSummary {
    pub fn from_differences(differences: &[Difference]) -> Self {
        let mut summary = Self::default();

        for d in differences {
            summary.total_differences += 1;
            *summary.by_category.entry(d.category).or_insert(0) += 1;

            match d.kind {
                DiffKind::Added => summary.added += 1,
                DiffKind::Removed => summary.removed += 1,
                DiffKind::Modified => summary.modified += 1,
            }
        }

        summary
    }
}

/// All differences between two databases
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffResult {
    pub source_database: String,
    pub target_database: String,
    /// In discovery order
    pub differences: Vec<Difference>,
    pub summary: DiffSummary,
}

impl DiffResult {
    /// Build a result, computing its summary once
    pub fn new(
        source_database: impl Into<String>,
        target_database: impl Into<String>,
        differences: Vec<Difference>,
    ) -> Self {
        let summary = DiffSummary::from_differences(&differences);
        Self {
            source_database: source_database.into(),
            target_database: target_database.into(),
            differences,
            summary,
        }
    }

    /// Returns true if there are any differences
    pub fn has_differences(&self) -> bool {
        !self.differences.is_empty()
    }

    pub fn by_kind(&self, kind: DiffKind) -> impl Iterator<Item = &Difference> {
        self.differences.iter().filter(move |d| d.kind == kind)
    }

    pub fn by_category(&self, category: DiffCategory) -> impl Iterator<Item = &Difference> {
        self.differences.iter().filter(move |d| d.category == category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> Vec<Difference> {
        vec![
            Difference::existence(
                DiffKind::Removed,
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
                DiffKind::Added,
                DiffCategory::Column,
                "[dbo].[Users].Phone",
                "Column [Phone] has no counterpart",
            ),
        ]
    }

    #[test]
    fn test_summary_counts() {
        let result = DiffResult::new("dev", "prod", sample());
        let summary = &result.summary;

        assert_eq!(summary.total_differences, result.differences.len());
        assert_eq!(summary.added + summary.removed + summary.modified, 3);
        assert_eq!(summary.by_category.get(&DiffCategory::Column), Some(&2));
        assert_eq!(summary.by_category.get(&DiffCategory::Table), Some(&1));
        assert_eq!(summary.by_category.get(&DiffCategory::View), None);
        assert_eq!(
            summary.by_category.keys().copied().collect::<Vec<_>>(),
            vec![DiffCategory::Table, DiffCategory::Column]
        );
    }

    #[test]
    fn test_filters() {
        let result = DiffResult::new("dev", "prod", sample());
        assert_eq!(result.by_kind(DiffKind::Modified).count(), 1);
        assert_eq!(result.by_category(DiffCategory::Column).count(), 2);
        assert!(result.has_differences());
        assert!(!DiffResult::new("a", "b", Vec::new()).has_differences());
    }

    #[test]
    fn test_difference_line() {
        let line = sample()[1].to_string();
        assert_eq!(
            line,
            "~ [COLUMN] [dbo].[Users].Email: Max length differs: 100 vs 255"
        );
    }

    #[test]
    fn test_empty_migration_is_dropped() {
        let d = sample().remove(0).with_migration("");
        assert_eq!(d.migration_sql, None);
    }
}
