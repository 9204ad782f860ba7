//! Full-database DDL export

use std::fmt::{self, Write};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::config::{DumpFormat, DumpOptions};
use crate::error::Result;
use crate::schema::ddl::ToDdl;
use crate::schema::types::DatabaseSchema;
use crate::utils::naming::quote_ident;

const BANNER: &str = "-- ============================================";
const UNAVAILABLE: &str = "-- (definition not available - possibly encrypted)\n\n";

/// Render an extracted schema in the configured dump format
pub fn render(schema: &DatabaseSchema, options: &DumpOptions, generated_at: DateTime<Utc>) -> Result<String> {
    match options.format {
        DumpFormat::Sql => Ok(render_export(schema, options, generated_at)),
        DumpFormat::Json => render_json(schema),
    }
}

/// Model as pretty-printed JSON, loadable again as a snapshot
pub fn render_json(schema: &DatabaseSchema) -> Result<String> {
    Ok(serde_json::to_string_pretty(schema)?)
}

fn section(out: &mut String, title: &str) {
    let _ = write!(out, "{}\n-- {}\n{}\n\n", BANNER, title, BANNER);
}

fn statement(out: &mut String, comment: &str, sql: &str) {
    let _ = write!(out, "{}\n{};\nGO\n\n", comment, sql);
}

fn definition(out: &mut String, comment: &str, sql: &str) {
    if sql.trim().is_empty() {
        out.push_str(comment);
        out.push('\n');
        out.push_str(UNAVAILABLE);
    } else {
        statement(out, comment, sql);
    }
}

/// Full DDL script for a schema. Sections appear only when their category
/// is included and has at least one object.
pub fn render_export(schema: &DatabaseSchema, options: &DumpOptions, generated_at: DateTime<Utc>) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", BANNER);
    out.push_str("-- SQLPulse DDL Export\n");
    let _ = writeln!(out, "-- Database: {}", schema.database_name);
    let _ = writeln!(
        out,
        "-- Generated: {}",
        generated_at.to_rfc3339_opts(SecondsFormat::Secs, true)
    );
    let _ = write!(out, "{}\n\n", BANNER);

    if !schema.schemas.is_empty() {
        section(&mut out, "SCHEMAS");
        for s in &schema.schemas {
            let _ = write!(out, "{};\nGO\n\n", s.to_ddl());
        }
    }

    if options.include_tables && !schema.tables.is_empty() {
        section(&mut out, "TABLES");
        for t in &schema.tables {
            let comment = format!("-- Table: {}.{}", quote_ident(&t.schema_name), quote_ident(&t.name));
            statement(&mut out, &comment, &t.to_ddl());
        }
    }

    if options.include_indexes && schema.tables.iter().any(|t| !t.indexes.is_empty()) {
        section(&mut out, "INDEXES");
        for t in &schema.tables {
            for index in &t.indexes {
                let sql = index.to_ddl();
                if sql.is_empty() {
                    continue;
                }
                let comment = format!(
                    "-- Index: {} on {}.{}",
                    quote_ident(&index.name),
                    quote_ident(&t.schema_name),
                    quote_ident(&t.name)
                );
                statement(&mut out, &comment, &sql);
            }
        }
    }

    if options.include_foreign_keys && schema.tables.iter().any(|t| !t.foreign_keys.is_empty()) {
        section(&mut out, "FOREIGN KEYS");
        for fk in schema.tables.iter().flat_map(|t| &t.foreign_keys) {
            statement(&mut out, &format!("-- FK: {}", quote_ident(&fk.name)), &fk.to_ddl());
        }
    }

    if options.include_constraints && schema.tables.iter().any(|t| !t.check_constraints.is_empty()) {
        section(&mut out, "CHECK CONSTRAINTS");
        for check in schema.tables.iter().flat_map(|t| &t.check_constraints) {
            statement(&mut out, &format!("-- Check: {}", quote_ident(&check.name)), &check.to_ddl());
        }
    }

    if options.include_views && !schema.views.is_empty() {
        section(&mut out, "VIEWS");
        for v in &schema.views {
            let comment = format!("-- View: {}.{}", quote_ident(&v.schema_name), quote_ident(&v.name));
            definition(&mut out, &comment, &v.to_ddl());
        }
    }

    if options.include_procedures && !schema.procedures.is_empty() {
        section(&mut out, "STORED PROCEDURES");
        for p in &schema.procedures {
            let comment = format!("-- Procedure: {}.{}", quote_ident(&p.schema_name), quote_ident(&p.name));
            definition(&mut out, &comment, &p.to_ddl());
        }
    }

    if options.include_functions && !schema.functions.is_empty() {
        section(&mut out, "FUNCTIONS");
        for f in &schema.functions {
            let comment = format!(
                "-- Function: {}.{} ({})",
                quote_ident(&f.schema_name),
                quote_ident(&f.name),
                f.function_type.as_str()
            );
            definition(&mut out, &comment, &f.to_ddl());
        }
    }

    if options.include_triggers && !schema.triggers.is_empty() {
        section(&mut out, "TRIGGERS");
        for tr in &schema.triggers {
            let comment = format!(
                "-- Trigger: {} on {}.{}",
                quote_ident(&tr.name),
                quote_ident(&tr.schema_name),
                quote_ident(&tr.table_name)
            );
            definition(&mut out, &comment, &tr.to_ddl());
        }
    }

    let _ = write!(out, "{}\n-- END OF DDL EXPORT\n{}\n", BANNER, BANNER);
    out
}

/// Object counts of an extracted schema
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaStats {
    pub schemas: usize,
    pub tables: usize,
    pub indexes: usize,
    pub foreign_keys: usize,
    pub check_constraints: usize,
    pub views: usize,
    pub procedures: usize,
    pub functions: usize,
    pub triggers: usize,
}

impl SchemaStats {
    pub fn from_schema(schema: &DatabaseSchema) -> Self {
        let mut stats = Self {
            schemas: schema.schemas.len(),
            tables: schema.tables.len(),
            views: schema.views.len(),
            procedures: schema.procedures.len(),
            functions: schema.functions.len(),
            triggers: schema.triggers.len(),
            ..Self::default()
        };

        for table in &schema.tables {
            stats.indexes += table.indexes.len();
            stats.foreign_keys += table.foreign_keys.len();
            stats.check_constraints += table.check_constraints.len();
        }

        stats
    }
}

impl fmt::Display for SchemaStats {
    /// Extraction summary block
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "─".repeat(40);
        writeln!(f, "{}", rule)?;
        writeln!(f, "Extraction Summary:")?;
        writeln!(f, "  Schemas:           {}", self.schemas)?;
        writeln!(f, "  Tables:            {}", self.tables)?;
        writeln!(f, "  Indexes:           {}", self.indexes)?;
        writeln!(f, "  Foreign Keys:      {}", self.foreign_keys)?;
        writeln!(f, "  Check Constraints: {}", self.check_constraints)?;
        writeln!(f, "  Views:             {}", self.views)?;
        writeln!(f, "  Procedures:        {}", self.procedures)?;
        writeln!(f, "  Functions:         {}", self.functions)?;
        writeln!(f, "  Triggers:          {}", self.triggers)?;
        write!(f, "{}", rule)
    }
}
