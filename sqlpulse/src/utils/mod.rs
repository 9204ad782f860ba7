//! Utilities for SQLPulse
//!
//! This module provides utility functions used across the library.

pub mod logging;
pub mod naming;

// Re-export key utility functions
pub use naming::{
    create_or_alter, definitions_equal, normalize_whitespace, qualified_name, quote_ident,
    table_scoped_name,
};
