//! Schema extraction
//!
//! This module defines the collaborator that produces a [`DatabaseSchema`]
//! for one side of a comparison, and a snapshot-file implementation of it.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::config::DumpOptions;
use crate::error::{Error, Result};
use crate::schema::types::{DatabaseSchema, Table};
use crate::utils::naming::{qualified_name, table_scoped_name};

/// Produces a fully populated schema model
#[async_trait]
pub trait SchemaExtractor: Send + Sync {
    /// Extract the schema, honoring category toggles and name filters
    async fn extract_schema(&self, options: &DumpOptions) -> Result<DatabaseSchema>;
}

/// Snapshot file encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SnapshotFormat {
    Json,
    Yaml,
}

impl SnapshotFormat {
    fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match extension.as_deref() {
            Some("json") => Ok(SnapshotFormat::Json),
            Some("yaml") | Some("yml") => Ok(SnapshotFormat::Yaml),
            _ => Err(Error::ExtractionError(format!(
                "Unsupported snapshot format: {} (expected .json, .yaml or .yml)",
                path.display()
            ))),
        }
    }
}

/// Reads a previously captured schema from a JSON or YAML file
#[derive(Debug, Clone)]
pub struct SnapshotExtractor {
    path: PathBuf,
}

impl SnapshotExtractor {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parse(&self, content: &str) -> Result<DatabaseSchema> {
        let parsed = match SnapshotFormat::from_path(&self.path)? {
            SnapshotFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
            SnapshotFormat::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
        };

        parsed.map_err(|e| {
            Error::ExtractionError(format!(
                "Failed to parse snapshot {}: {}",
                self.path.display(),
                e
            ))
        })
    }

    /// Database name used when the snapshot leaves it empty
    fn fallback_name(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

#[async_trait]
impl SchemaExtractor for SnapshotExtractor {
    async fn extract_schema(&self, options: &DumpOptions) -> Result<DatabaseSchema> {
        tracing::debug!(path = %self.path.display(), "Reading schema snapshot");

        let content = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            Error::ExtractionError(format!(
                "Failed to read snapshot {}: {}",
                self.path.display(),
                e
            ))
        })?;

        let mut schema = self.parse(&content)?;
        if schema.database_name.is_empty() {
            schema.database_name = self.fallback_name();
        }

        fill_owner_names(&mut schema);
        validate(&schema)?;

        let schema = apply_options(schema, options);
        tracing::debug!(
            database = %schema.database_name,
            tables = schema.tables.len(),
            views = schema.views.len(),
            procedures = schema.procedures.len(),
            functions = schema.functions.len(),
            triggers = schema.triggers.len(),
            "Snapshot loaded"
        );

        Ok(schema)
    }
}

/// Nested objects may omit their owning schema and table in a snapshot
fn fill_owner_names(schema: &mut DatabaseSchema) {
    for table in &mut schema.tables {
        let (schema_name, table_name) = (table.schema_name.clone(), table.name.clone());
        let fill = |s: &mut String, t: &mut String| {
            if s.is_empty() {
                *s = schema_name.clone();
            }
            if t.is_empty() {
                *t = table_name.clone();
            }
        };

        if let Some(pk) = table.primary_key.as_mut() {
            pk.is_primary_key = true;
            fill(&mut pk.schema_name, &mut pk.table_name);
        }
        for index in &mut table.indexes {
            fill(&mut index.schema_name, &mut index.table_name);
        }
        for fk in &mut table.foreign_keys {
            fill(&mut fk.schema_name, &mut fk.table_name);
        }
        for check in &mut table.check_constraints {
            fill(&mut check.schema_name, &mut check.table_name);
        }
    }
}

fn ensure_unique(kind: &str, scope: &str, names: impl IntoIterator<Item = String>) -> Result<()> {
    let mut seen = BTreeSet::new();
    for name in names {
        if !seen.insert(name.clone()) {
            return Err(Error::ExtractionError(format!(
                "Duplicate {} {} in {}",
                kind, name, scope
            )));
        }
    }
    Ok(())
}

fn validate_table(table: &Table) -> Result<()> {
    let scope = qualified_name(&table.schema_name, &table.name);

    ensure_unique("column", &scope, table.columns.iter().map(|c| c.name.clone()))?;
    ensure_unique("index", &scope, table.indexes.iter().map(|i| i.name.clone()))?;
    ensure_unique("foreign key", &scope, table.foreign_keys.iter().map(|f| f.name.clone()))?;
    ensure_unique(
        "check constraint",
        &scope,
        table.check_constraints.iter().map(|c| c.name.clone()),
    )?;

    if let Some(index) = table.indexes.iter().find(|i| i.is_primary_key) {
        return Err(Error::ExtractionError(format!(
            "Primary key {} of {} must be held as the table primary key, not as an index",
            index.name, scope
        )));
    }

    Ok(())
}

/// Check the identity invariants the comparator relies on
pub fn validate(schema: &DatabaseSchema) -> Result<()> {
    let scope = if schema.database_name.is_empty() {
        "snapshot"
    } else {
        schema.database_name.as_str()
    };

    ensure_unique("schema", scope, schema.schemas.iter().map(|s| s.name.clone()))?;
    ensure_unique(
        "table",
        scope,
        schema.tables.iter().map(|t| qualified_name(&t.schema_name, &t.name)),
    )?;
    ensure_unique(
        "view",
        scope,
        schema.views.iter().map(|v| qualified_name(&v.schema_name, &v.name)),
    )?;
    ensure_unique(
        "procedure",
        scope,
        schema.procedures.iter().map(|p| qualified_name(&p.schema_name, &p.name)),
    )?;
    ensure_unique(
        "function",
        scope,
        schema.functions.iter().map(|f| qualified_name(&f.schema_name, &f.name)),
    )?;
    ensure_unique(
        "trigger",
        scope,
        schema
            .triggers
            .iter()
            .map(|t| table_scoped_name(&t.schema_name, &t.table_name, &t.name)),
    )?;

    schema.tables.iter().try_for_each(validate_table)
}

/// Drop the categories and objects the options exclude. Schemas themselves
/// are always kept.
pub fn apply_options(mut schema: DatabaseSchema, options: &DumpOptions) -> DatabaseSchema {
    if options.include_tables {
        schema
            .tables
            .retain(|t| options.includes_table(&t.schema_name, &t.name));
        for table in &mut schema.tables {
            if !options.include_indexes {
                table.indexes.clear();
            }
            if !options.include_foreign_keys {
                table.foreign_keys.clear();
            }
            if !options.include_constraints {
                table.check_constraints.clear();
            }
        }
    } else {
        schema.tables.clear();
    }

    if options.include_views {
        schema.views.retain(|v| options.includes_schema(&v.schema_name));
    } else {
        schema.views.clear();
    }

    if options.include_procedures {
        schema.procedures.retain(|p| options.includes_schema(&p.schema_name));
    } else {
        schema.procedures.clear();
    }

    if options.include_functions {
        schema.functions.retain(|f| options.includes_schema(&f.schema_name));
    } else {
        schema.functions.clear();
    }

    if options.include_triggers {
        schema
            .triggers
            .retain(|t| options.includes_table(&t.schema_name, &t.table_name));
    } else {
        schema.triggers.clear();
    }

    schema
}
