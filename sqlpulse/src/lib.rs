//! SQLPulse: structural schema comparison for SQL Server databases
//!
//! SQLPulse compares two extracted database schemas, reports what differs
//! in a unified-diff style and proposes a migration script that moves the
//! target toward the source. It can also export a full DDL script for one
//! database.

pub mod config;
pub mod error;
pub mod output;
pub mod schema;
pub mod utils;

use chrono::Utc;

// Re-export main types for easier access
pub use config::Config;
pub use error::{Error, Result, Side};
pub use schema::comparator::SchemaComparator;
pub use schema::diff::{DiffResult, Difference};
pub use schema::export::SchemaStats;
pub use schema::extractor::{SchemaExtractor, SnapshotExtractor};
pub use schema::generator::MigrationGenerator;
pub use schema::types::DatabaseSchema;

/// Initialize SQLPulse with the specified configuration file
pub fn init(config_path: &str) -> Result<SqlPulseClient> {
    let config = config::load_from_file(config_path)?;
    Ok(SqlPulseClient::new(config))
}

/// A rendered export together with the counts of what was exported
#[derive(Debug, Clone)]
pub struct DumpOutput {
    pub content: String,
    pub stats: SchemaStats,
}

/// The main client for running SQLPulse operations
pub struct SqlPulseClient {
    config: Config,
    comparator: SchemaComparator,
}

impl SqlPulseClient {
    /// Create a new client from configuration
    pub fn new(config: Config) -> Self {
        let comparator = SchemaComparator::new(config.diff.clone());
        Self { config, comparator }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Extract one side of a comparison with the diff options' categories
    /// and filters. Failures name the side they happened on.
    pub async fn extract_side(
        &self,
        extractor: &dyn SchemaExtractor,
        side: Side,
    ) -> Result<DatabaseSchema> {
        tracing::info!(side = %side, "Extracting schema");

        let options = self.config.diff.extraction_options();
        let schema = extractor
            .extract_schema(&options)
            .await
            .map_err(|e| e.on_side(side))?;

        tracing::info!(
            side = %side,
            database = %schema.database_name,
            tables = schema.tables.len(),
            "Schema extracted"
        );
        Ok(schema)
    }

    /// Compare two already extracted schemas
    pub fn compare(&self, source: &DatabaseSchema, target: &DatabaseSchema) -> DiffResult {
        let result = self.comparator.compare(source, target);
        tracing::info!(
            total = result.summary.total_differences,
            added = result.summary.added,
            removed = result.summary.removed,
            modified = result.summary.modified,
            "Comparison finished"
        );
        result
    }

    /// Extract both sides concurrently, then compare them
    pub async fn diff(
        &self,
        source: &dyn SchemaExtractor,
        target: &dyn SchemaExtractor,
    ) -> Result<DiffResult> {
        let (source_schema, target_schema) = tokio::try_join!(
            self.extract_side(source, Side::Source),
            self.extract_side(target, Side::Target)
        )?;

        Ok(self.compare(&source_schema, &target_schema))
    }

    /// Report text in the configured output format
    pub fn report(&self, result: &DiffResult) -> String {
        schema::report::render(result, self.config.output.format)
    }

    /// Migration script for a comparison result
    pub fn migration_script(&self, result: &DiffResult) -> String {
        MigrationGenerator::new().generate_migration_script(result)
    }

    /// Extract one database and render it with the dump options
    pub async fn dump(&self, extractor: &dyn SchemaExtractor) -> Result<DumpOutput> {
        let options = &self.config.dump;
        tracing::info!(format = ?options.format, "Exporting schema");

        let schema = extractor.extract_schema(options).await?;
        let content = schema::export::render(&schema, options, Utc::now())?;

        Ok(DumpOutput {
            content,
            stats: SchemaStats::from_schema(&schema),
        })
    }
}
