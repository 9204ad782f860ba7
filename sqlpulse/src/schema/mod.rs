//! Schema module for SQLPulse
//!
//! This module holds the schema model, its DDL rendering, the structural
//! comparison and everything rendered from a comparison.

pub mod comparator;
pub mod ddl;
pub mod diff;
pub mod export;
pub mod extractor;
pub mod generator;
pub mod report;
pub mod types;

// Re-export key types
pub use comparator::SchemaComparator;
pub use ddl::ToDdl;
pub use diff::{DiffCategory, DiffKind, DiffResult, DiffSummary, Difference};
pub use export::SchemaStats;
pub use extractor::{SchemaExtractor, SnapshotExtractor};
pub use generator::MigrationGenerator;
pub use types::{
    CheckConstraint, Column, DatabaseSchema, ForeignKey, ForeignKeyColumn, Function,
    FunctionType, Identity, Index, IndexColumn, ReferentialAction, Schema, StoredProcedure, Table,
    Trigger, View,
};
