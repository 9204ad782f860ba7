//! Configuration handling for SQLPulse

use serde::{Deserialize, Serialize};
use std::fs;

use crate::error::{Error, Result};

/// Load configuration from a TOML file
pub fn load_from_file(path: &str) -> Result<Config> {
    let config_str = fs::read_to_string(path)
        .map_err(|e| Error::ConfigError(format!("Failed to read config file: {}", e)))?;

    let config: Config = toml::from_str(&config_str)?;

    config.validate()?;
    Ok(config)
}

/// Represents the complete SQLPulse configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub diff: DiffOptions,
    pub dump: DumpOptions,
    pub output: OutputConfig,
    pub logging: Option<LoggingConfig>,
}

impl Config {
    /// Reject configuration that cannot drive a run
    pub fn validate(&self) -> Result<()> {
        check_filter("diff.schema_filter", &self.diff.schema_filter)?;
        check_filter("diff.table_filter", &self.diff.table_filter)?;
        check_filter("dump.schema_filter", &self.dump.schema_filter)?;
        check_filter("dump.table_filter", &self.dump.table_filter)?;

        if let Some(logging) = &self.logging {
            logging.level()?;
        }

        Ok(())
    }
}

fn check_filter(field: &str, entries: &[String]) -> Result<()> {
    if entries.iter().any(|entry| entry.trim().is_empty()) {
        return Err(Error::ConfigError(format!(
            "{} contains an empty name",
            field
        )));
    }
    Ok(())
}

/// True when `name` passes a name filter. An empty filter keeps everything.
pub fn filter_allows(filter: &[String], name: &str) -> bool {
    filter.is_empty() || filter.iter().any(|f| f.eq_ignore_ascii_case(name))
}

/// Comparison behavior for one diff run
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct DiffOptions {
    pub include_tables: bool,
    pub include_views: bool,
    pub include_procedures: bool,
    pub include_functions: bool,
    pub include_triggers: bool,
    pub include_indexes: bool,
    pub include_foreign_keys: bool,
    pub include_constraints: bool,
    pub schema_filter: Vec<String>,
    pub table_filter: Vec<String>,
    /// Suppress collation-only column differences
    pub ignore_collation: bool,
    /// Collapse whitespace runs before comparing free-text definitions
    pub ignore_whitespace: bool,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            include_tables: true,
            include_views: true,
            include_procedures: true,
            include_functions: true,
            include_triggers: true,
            include_indexes: true,
            include_foreign_keys: true,
            include_constraints: true,
            schema_filter: Vec::new(),
            table_filter: Vec::new(),
            ignore_collation: false,
            ignore_whitespace: true,
        }
    }
}

impl DiffOptions {
    /// Extraction options matching these comparison options, so both sides
    /// are extracted with the same categories and filters.
    pub fn extraction_options(&self) -> DumpOptions {
        DumpOptions {
            include_tables: self.include_tables,
            include_views: self.include_views,
            include_procedures: self.include_procedures,
            include_functions: self.include_functions,
            include_triggers: self.include_triggers,
            include_indexes: self.include_indexes,
            include_foreign_keys: self.include_foreign_keys,
            include_constraints: self.include_constraints,
            schema_filter: self.schema_filter.clone(),
            table_filter: self.table_filter.clone(),
            format: DumpFormat::Sql,
        }
    }

    pub fn includes_schema(&self, schema_name: &str) -> bool {
        filter_allows(&self.schema_filter, schema_name)
    }

    pub fn includes_table(&self, schema_name: &str, table_name: &str) -> bool {
        self.includes_schema(schema_name) && filter_allows(&self.table_filter, table_name)
    }
}

/// DDL extraction settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct DumpOptions {
    pub include_tables: bool,
    pub include_views: bool,
    pub include_procedures: bool,
    pub include_functions: bool,
    pub include_triggers: bool,
    /// Non primary-key indexes
    pub include_indexes: bool,
    pub include_foreign_keys: bool,
    pub include_constraints: bool,
    pub schema_filter: Vec<String>,
    pub table_filter: Vec<String>,
    pub format: DumpFormat,
}

impl Default for DumpOptions {
    fn default() -> Self {
        DiffOptions::default().extraction_options()
    }
}

impl DumpOptions {
    pub fn includes_schema(&self, schema_name: &str) -> bool {
        filter_allows(&self.schema_filter, schema_name)
    }

    pub fn includes_table(&self, schema_name: &str, table_name: &str) -> bool {
        self.includes_schema(schema_name) && filter_allows(&self.table_filter, table_name)
    }
}

/// Rendering of a DDL export
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DumpFormat {
    #[default]
    Sql,
    Json,
}

/// Rendering of a diff report
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Git,
    Summary,
    Full,
}

/// Diff output configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub generate_migration: bool,
    pub migration_file: Option<String>,
}

impl OutputConfig {
    /// A migration destination implies migration generation
    pub fn wants_migration(&self) -> bool {
        self.generate_migration || self.migration_file.is_some()
    }
}

/// Logging configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
    pub format: String,
    /// Log to stderr when no file is configured
    pub console: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            format: "text".to_string(),
            console: true,
        }
    }
}

impl LoggingConfig {
    /// Parse the configured level
    pub fn level(&self) -> Result<tracing::Level> {
        match self.level.to_lowercase().as_str() {
            "trace" => Ok(tracing::Level::TRACE),
            "debug" => Ok(tracing::Level::DEBUG),
            "info" => Ok(tracing::Level::INFO),
            "warn" => Ok(tracing::Level::WARN),
            "error" => Ok(tracing::Level::ERROR),
            other => Err(Error::ConfigError(format!("Unknown log level: {}", other))),
        }
    }
}
