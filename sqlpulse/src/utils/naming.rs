//! Naming utilities for SQLPulse
//!
//! Identifier quoting and qualification in T-SQL bracket style, plus the
//! text normalization used when comparing free-form object definitions.

use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

// Comments are matched as alternatives so a `CREATE` inside one is skipped
static CREATE_MODULE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?is)/\*.*?\*/|--[^\r\n]*|\bCREATE\s+(?:OR\s+ALTER\s+)?(VIEW|PROCEDURE|PROC|FUNCTION|TRIGGER)\b",
    )
    .expect("valid regex")
});

/// Quote an identifier as `[name]`, doubling any closing bracket
pub fn quote_ident(name: &str) -> String {
    format!("[{}]", name.replace(']', "]]"))
}

/// `[schema].[name]`
pub fn qualified_name(schema_name: &str, name: &str) -> String {
    format!("{}.{}", quote_ident(schema_name), quote_ident(name))
}

/// `[schema].[table].[name]`, the identity of table-scoped modules such as triggers
pub fn table_scoped_name(schema_name: &str, table_name: &str, name: &str) -> String {
    format!("{}.{}", qualified_name(schema_name, table_name), quote_ident(name))
}

/// Collapse every whitespace run to a single space and trim both ends
pub fn normalize_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").trim().to_string()
}

/// Compare two definitions, optionally ignoring incidental whitespace
pub fn definitions_equal(source: &str, target: &str, ignore_whitespace: bool) -> bool {
    if ignore_whitespace {
        normalize_whitespace(source) == normalize_whitespace(target)
    } else {
        source == target
    }
}

/// Rewrite the first `CREATE <module>` outside a comment to `CREATE OR ALTER`.
///
/// Returns `None` when the text has no recognizable creation statement.
pub fn create_or_alter(definition: &str) -> Option<String> {
    let definition = definition.trim();
    let captures = CREATE_MODULE
        .captures_iter(definition)
        .find(|c| c.get(1).is_some())?;
    let statement = captures.get(0)?;
    let keyword = captures.get(1)?.as_str().to_uppercase();

    Some(format!(
        "{}CREATE OR ALTER {}{}",
        &definition[..statement.start()],
        keyword,
        &definition[statement.end()..]
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn test_quoting() {
        assert_eq!(quote_ident("Users"), "[Users]");
        assert_eq!(quote_ident("odd]name"), "[odd]]name]");
        assert_eq!(qualified_name("dbo", "Users"), "[dbo].[Users]");
        assert_eq!(
            table_scoped_name("dbo", "Orders", "trg_Audit"),
            "[dbo].[Orders].[trg_Audit]"
        );
    }

    #[rstest]
    #[case("SELECT  a,\n\tb FROM t", "SELECT a, b FROM t")]
    #[case("  \r\n SELECT 1 \n", "SELECT 1")]
    #[case("", "")]
    fn test_normalize_whitespace(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalize_whitespace(input), expected);
    }

    #[test]
    fn test_definitions_equal() {
        let a = "CREATE VIEW v AS\n    SELECT 1";
        let b = "CREATE VIEW v AS SELECT  1 ";

        assert!(definitions_equal(a, b, true));
        assert!(!definitions_equal(a, b, false));
        assert!(definitions_equal(a, a, false));
    }

    #[rstest]
    #[case("CREATE VIEW [dbo].[v] AS SELECT 1", "CREATE OR ALTER VIEW [dbo].[v] AS SELECT 1")]
    #[case("create proc dbo.p AS SELECT 1", "CREATE OR ALTER PROC dbo.p AS SELECT 1")]
    #[case(
        "-- audit\nCREATE TRIGGER t ON x AFTER INSERT AS SELECT 1",
        "-- audit\nCREATE OR ALTER TRIGGER t ON x AFTER INSERT AS SELECT 1"
    )]
    #[case(
        "/* replaces CREATE VIEW dbo.old */\nCREATE PROCEDURE dbo.p AS SELECT 1",
        "/* replaces CREATE VIEW dbo.old */\nCREATE OR ALTER PROCEDURE dbo.p AS SELECT 1"
    )]
    #[case(
        "-- was: create function f\nCREATE VIEW v AS SELECT 1",
        "-- was: create function f\nCREATE OR ALTER VIEW v AS SELECT 1"
    )]
    #[case(
        "CREATE OR ALTER FUNCTION f() RETURNS INT AS BEGIN RETURN 1 END",
        "CREATE OR ALTER FUNCTION f() RETURNS INT AS BEGIN RETURN 1 END"
    )]
    fn test_create_or_alter(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(create_or_alter(input).as_deref(), Some(expected));
    }

    #[test]
    fn test_create_or_alter_without_create() {
        assert_eq!(create_or_alter("SELECT 1"), None);
        assert_eq!(create_or_alter("/* CREATE VIEW v */ SELECT 1"), None);
    }
}
