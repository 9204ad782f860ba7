mod common;

use pretty_assertions::assert_eq;

use common::{column_mut, orders_table, shop_schema, table_mut, users_table};
use sqlpulse::config::{DiffOptions, OutputFormat};
use sqlpulse::schema::report;
use sqlpulse::schema::types::DatabaseSchema;
use sqlpulse::{MigrationGenerator, SchemaComparator};

#[test]
fn test_email_example_report_and_script() {
    let mut source = DatabaseSchema::new("dev");
    source.add_table(users_table(100));
    let mut target = DatabaseSchema::new("prod");
    target.add_table(users_table(255));

    let result = SchemaComparator::new(DiffOptions::default()).compare(&source, &target);

    let expected_report = "diff --sqlpulse a/dev b/prod
--- a/dev
+++ b/prod


@@ COLUMN @@
~ [COLUMN] [dbo].[Users].Email: Max length differs: 100 vs 255
";
    assert_eq!(report::render_git_style(&result), expected_report);

    let expected_script = "-- ============================================
-- Migration Script
-- From: dev
-- To:   prod
-- ============================================

-- COLUMN Changes
-- ----------------------------------------

-- Max length differs: 100 vs 255
ALTER TABLE [dbo].[Users] ALTER COLUMN [Email] varchar(100) NOT NULL;
GO

";
    assert_eq!(
        MigrationGenerator::new().generate_migration_script(&result),
        expected_script
    );
}

#[test]
fn test_report_sections_follow_category_order() {
    let source = shop_schema("dev");
    let mut target = shop_schema("prod");
    target.functions.clear();
    target.schemas.pop();
    column_mut(table_mut(&mut target, "Users"), "Email").is_nullable = true;

    let result = SchemaComparator::new(DiffOptions::default()).compare(&source, &target);
    let rendered = report::render_git_style(&result);

    let headers: Vec<&str> = rendered.lines().filter(|l| l.starts_with("@@")).collect();
    assert_eq!(headers, vec!["@@ SCHEMA @@", "@@ COLUMN @@", "@@ FUNCTION @@"]);
    assert!(rendered.contains("- [SCHEMA] [sales]: Schema [sales] has no counterpart\n"));
    assert!(rendered.contains("- [FUNCTION] [dbo].[OrderCount]: Function [dbo].[OrderCount] has no counterpart\n"));
}

#[test]
fn test_script_skips_categories_without_fragments() {
    let mut source = shop_schema("dev");
    let mut target = shop_schema("prod");
    column_mut(table_mut(&mut source, "Users"), "Email").collation = Some("Latin1_General_CI_AS".to_string());
    column_mut(table_mut(&mut target, "Users"), "Email").collation = Some("Latin1_General_BIN".to_string());
    target.views.clear();

    let result = SchemaComparator::new(DiffOptions::default()).compare(&source, &target);
    assert_eq!(result.summary.total_differences, 2);

    let script = MigrationGenerator::new().generate_migration_script(&result);
    assert!(!script.contains("-- COLUMN Changes"));
    assert!(script.contains(
        "-- VIEW Changes\n-- ----------------------------------------\n\n-- View [dbo].[ActiveUsers] has no counterpart\nCREATE VIEW dbo.ActiveUsers AS\n    SELECT Id, Email\n    FROM dbo.Users\nGO\n\n"
    ));
}

#[test]
fn test_summary_format() {
    let source = shop_schema("dev");
    let mut target = shop_schema("prod");
    target.procedures.clear();
    target.views.clear();

    let result = SchemaComparator::new(DiffOptions::default()).compare(&source, &target);
    let summary = report::render(&result, OutputFormat::Summary);

    let expected = format!(
        "{rule}
Diff Summary: dev → prod
{rule}
  Total differences: 2
  + Added:   0 (in target only)
  - Removed: 2 (in source only)
  ~ Modified: 0

  By category:
    VIEW:           1
    PROCEDURE:      1
{rule}
",
        rule = "─".repeat(50)
    );
    assert_eq!(summary, expected);
}

#[test]
fn test_script_creates_every_table_before_foreign_keys() {
    let mut source = DatabaseSchema::new("dev");
    source.add_table(orders_table(true));
    source.add_table(users_table(100));
    let target = DatabaseSchema::new("prod");

    let result = SchemaComparator::new(DiffOptions::default()).compare(&source, &target);
    assert_eq!(result.summary.removed, 2);

    let script = MigrationGenerator::new().generate_migration_script(&result);
    let create_users = script.find("CREATE TABLE [dbo].[Users]").unwrap();
    let foreign_keys = script.find("-- FOREIGN_KEY Changes").unwrap();
    let references = script.find("REFERENCES [dbo].[Users]").unwrap();

    assert!(script.find("CREATE TABLE [dbo].[Orders]").unwrap() < create_users);
    assert!(create_users < foreign_keys);
    assert!(foreign_keys < references);
    assert!(script.contains("-- Foreign keys of [dbo].[Orders]\nALTER TABLE [dbo].[Orders] ADD CONSTRAINT [FK_Orders_Users]"));
}
