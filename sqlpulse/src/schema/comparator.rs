//! Structural schema comparison
//!
//! Walks a source and a target [`DatabaseSchema`] and records every added,
//! removed and modified object. Objects are matched by name only, through
//! ordered maps, so the same inputs always produce the same difference list.
//! Migration fragments always move the target toward the source.

use std::collections::BTreeMap;

use crate::config::DiffOptions;
use crate::schema::ddl::{alter_column_definition, primary_key_constraint, ToDdl};
use crate::schema::diff::{DiffCategory, DiffKind, DiffResult, Difference};
use crate::schema::types::{
    CheckConstraint, Column, DatabaseSchema, ForeignKey, Function, Index, Schema,
    StoredProcedure, Table, Trigger, View,
};
use crate::utils::naming::{
    create_or_alter, definitions_equal, qualified_name, quote_ident, table_scoped_name,
};

/// Objects of one category paired up by identity, each list in key order
struct Matched<'a, T> {
    removed: Vec<(String, &'a T)>,
    added: Vec<(String, &'a T)>,
    common: Vec<(String, &'a T, &'a T)>,
}

fn match_objects<'a, T: 'a>(
    category: DiffCategory,
    source: impl IntoIterator<Item = &'a T>,
    target: impl IntoIterator<Item = &'a T>,
    key: impl Fn(&T) -> String,
) -> Matched<'a, T> {
    let source: BTreeMap<String, &'a T> = source.into_iter().map(|o| (key(o), o)).collect();
    let target: BTreeMap<String, &'a T> = target.into_iter().map(|o| (key(o), o)).collect();

    let removed: Vec<(String, &'a T)> = source
        .iter()
        .filter(|(k, _)| !target.contains_key(*k))
        .map(|(k, o)| (k.clone(), *o))
        .collect();
    let added: Vec<(String, &'a T)> = target
        .iter()
        .filter(|(k, _)| !source.contains_key(*k))
        .map(|(k, o)| (k.clone(), *o))
        .collect();
    let common: Vec<(String, &'a T, &'a T)> = source
        .iter()
        .filter_map(|(k, s)| target.get(k).map(|t| (k.clone(), *s, *t)))
        .collect();

    tracing::trace!(
        category = %category,
        removed = removed.len(),
        added = added.len(),
        common = common.len(),
        "Matched objects"
    );

    Matched {
        removed,
        added,
        common,
    }
}

fn flag(value: bool) -> String {
    value.to_string()
}

fn nullability(is_nullable: bool) -> &'static str {
    if is_nullable {
        "NULL"
    } else {
        "NOT NULL"
    }
}

/// Comparable rendering of an index column list: key columns in order,
/// then included columns sorted by name.
pub fn index_columns_signature(index: &Index) -> String {
    let mut parts: Vec<String> = index
        .key_columns()
        .map(|col| {
            if col.is_descending {
                format!("{} DESC", col.name)
            } else {
                col.name.clone()
            }
        })
        .collect();

    let mut included: Vec<&str> = index.included_columns().map(|c| c.name.as_str()).collect();
    included.sort_unstable();
    parts.extend(included.into_iter().map(|name| format!("{} (INCLUDE)", name)));

    parts.join(", ")
}

fn foreign_key_columns_signature(fk: &ForeignKey) -> String {
    fk.columns
        .iter()
        .map(|c| format!("{} -> {}", c.column_name, c.referenced_column_name))
        .collect::<Vec<_>>()
        .join(", ")
}

fn terminate_all(statements: impl IntoIterator<Item = String>) -> String {
    statements
        .into_iter()
        .map(|s| format!("{};", s))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Attach `sql` to the first record of a per-object change set
fn attach_to_first(changes: &mut [Difference], sql: String) {
    if let Some(first) = changes.first_mut() {
        first.migration_sql = Some(sql);
    }
}

/// Compares two database schemas
pub struct SchemaComparator {
    options: DiffOptions,
}

impl SchemaComparator {
    /// Create a new schema comparator
    pub fn new(options: DiffOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &DiffOptions {
        &self.options
    }

    /// Compare source and target schemas and return the differences
    pub fn compare(&self, source: &DatabaseSchema, target: &DatabaseSchema) -> DiffResult {
        let mut differences = Vec::new();

        self.compare_schemas(source, target, &mut differences);

        if self.options.include_tables {
            self.compare_tables(source, target, &mut differences);
        }
        if self.options.include_views {
            self.compare_views(source, target, &mut differences);
        }
        if self.options.include_procedures {
            self.compare_procedures(source, target, &mut differences);
        }
        if self.options.include_functions {
            self.compare_functions(source, target, &mut differences);
        }
        if self.options.include_triggers {
            self.compare_triggers(source, target, &mut differences);
        }

        let result = DiffResult::new(
            source.database_name.clone(),
            target.database_name.clone(),
            differences,
        );

        tracing::debug!(
            source = %result.source_database,
            target = %result.target_database,
            total = result.summary.total_differences,
            added = result.summary.added,
            removed = result.summary.removed,
            modified = result.summary.modified,
            "Schema comparison finished"
        );

        result
    }

    fn compare_schemas(&self, source: &DatabaseSchema, target: &DatabaseSchema, out: &mut Vec<Difference>) {
        let wanted = |s: &&Schema| self.options.includes_schema(&s.name);
        let matched = match_objects(
            DiffCategory::Schema,
            source.schemas.iter().filter(wanted),
            target.schemas.iter().filter(wanted),
            |s| quote_ident(&s.name),
        );

        for (name, schema) in matched.removed {
            out.push(
                Difference::existence(
                    DiffKind::Removed,
                    DiffCategory::Schema,
                    name.clone(),
                    format!("Schema {} has no counterpart", name),
                )
                .with_migration(format!("{};", schema.to_ddl())),
            );
        }

        for (name, _) in matched.added {
            out.push(
                Difference::existence(
                    DiffKind::Added,
                    DiffCategory::Schema,
                    name.clone(),
                    format!("Schema {} has no counterpart", name),
                )
                .with_migration(format!("DROP SCHEMA {};", name)),
            );
        }

        for (name, src, tgt) in matched.common {
            let src_owner = src.owner.clone().unwrap_or_default();
            let tgt_owner = tgt.owner.clone().unwrap_or_default();
            if src_owner != tgt_owner {
                let mut diff = Difference::modified(
                    DiffCategory::Schema,
                    name.clone(),
                    "Owner",
                    src_owner.clone(),
                    tgt_owner.clone(),
                    format!("Owner differs: {} vs {}", src_owner, tgt_owner),
                );
                if !src_owner.is_empty() {
                    diff = diff.with_migration(format!(
                        "ALTER AUTHORIZATION ON SCHEMA::{} TO {};",
                        name,
                        quote_ident(&src_owner)
                    ));
                }
                out.push(diff);
            }
        }
    }

    fn compare_tables(&self, source: &DatabaseSchema, target: &DatabaseSchema, out: &mut Vec<Difference>) {
        let wanted = |t: &&Table| self.options.includes_table(&t.schema_name, &t.name);
        let matched = match_objects(
            DiffCategory::Table,
            source.tables.iter().filter(wanted),
            target.tables.iter().filter(wanted),
            |t| qualified_name(&t.schema_name, &t.name),
        );

        for (name, table) in matched.removed {
            out.push(
                Difference::existence(
                    DiffKind::Removed,
                    DiffCategory::Table,
                    name.clone(),
                    format!("Table {} has no counterpart", name),
                )
                .with_migration(self.recreate_table_sql(table))
                .with_deferred(self.recreate_foreign_keys_sql(table)),
            );
        }

        for (name, _) in matched.added {
            out.push(
                Difference::existence(
                    DiffKind::Added,
                    DiffCategory::Table,
                    name.clone(),
                    format!("Table {} has no counterpart", name),
                )
                .with_migration(format!("DROP TABLE {};", name)),
            );
        }

        for (name, src, tgt) in matched.common {
            self.compare_table_structure(&name, src, tgt, out);
        }
    }

    /// Table creation plus the included indexes and checks
    fn recreate_table_sql(&self, table: &Table) -> String {
        let mut statements = vec![table.to_ddl()];

        if self.options.include_indexes {
            statements.extend(table.indexes.iter().map(|i| i.to_ddl()).filter(|s| !s.is_empty()));
        }
        if self.options.include_constraints {
            statements.extend(table.check_constraints.iter().map(|c| c.to_ddl()));
        }

        terminate_all(statements)
    }

    /// Foreign keys of a re-created table. They may reference tables created
    /// later in the script, so they run with the foreign key changes.
    fn recreate_foreign_keys_sql(&self, table: &Table) -> String {
        if !self.options.include_foreign_keys {
            return String::new();
        }
        terminate_all(table.foreign_keys.iter().map(|fk| fk.to_ddl()))
    }

    fn compare_table_structure(&self, table_name: &str, source: &Table, target: &Table, out: &mut Vec<Difference>) {
        self.compare_columns(table_name, source, target, out);
        self.compare_primary_keys(table_name, source.primary_key.as_ref(), target.primary_key.as_ref(), out);

        if self.options.include_indexes {
            self.compare_indexes(table_name, source, target, out);
        }
        if self.options.include_foreign_keys {
            self.compare_foreign_keys(table_name, source, target, out);
        }
        if self.options.include_constraints {
            self.compare_check_constraints(table_name, source, target, out);
        }
    }

    fn compare_columns(&self, table_name: &str, source: &Table, target: &Table, out: &mut Vec<Difference>) {
        let matched = match_objects(
            DiffCategory::Column,
            &source.columns,
            &target.columns,
            |c| c.name.clone(),
        );

        for (name, column) in matched.removed {
            out.push(
                Difference::existence(
                    DiffKind::Removed,
                    DiffCategory::Column,
                    format!("{}.{}", table_name, name),
                    format!("Column {} has no counterpart", quote_ident(&name)),
                )
                .with_migration(format!("ALTER TABLE {} ADD {};", table_name, column.to_ddl())),
            );
        }

        for (name, _) in matched.added {
            out.push(
                Difference::existence(
                    DiffKind::Added,
                    DiffCategory::Column,
                    format!("{}.{}", table_name, name),
                    format!("Column {} has no counterpart", quote_ident(&name)),
                )
                .with_migration(format!(
                    "ALTER TABLE {} DROP COLUMN {};",
                    table_name,
                    quote_ident(&name)
                )),
            );
        }

        for (_, src, tgt) in matched.common {
            self.compare_column_details(table_name, src, tgt, out);
        }
    }

    fn compare_column_details(&self, table_name: &str, source: &Column, target: &Column, out: &mut Vec<Difference>) {
        let object = format!("{}.{}", table_name, source.name);
        let mut shape = Vec::new();

        if source.data_type != target.data_type {
            shape.push(Difference::modified(
                DiffCategory::Column,
                object.clone(),
                "DataType",
                source.data_type.clone(),
                target.data_type.clone(),
                format!("Data type differs: {} vs {}", source.data_type, target.data_type),
            ));
        }

        if source.max_length != target.max_length {
            shape.push(Difference::modified(
                DiffCategory::Column,
                object.clone(),
                "MaxLength",
                source.max_length.to_string(),
                target.max_length.to_string(),
                format!("Max length differs: {} vs {}", source.max_length, target.max_length),
            ));
        }

        if source.precision != target.precision || source.scale != target.scale {
            let src = format!("({},{})", source.precision, source.scale);
            let tgt = format!("({},{})", target.precision, target.scale);
            shape.push(Difference::modified(
                DiffCategory::Column,
                object.clone(),
                "Precision/Scale",
                src.clone(),
                tgt.clone(),
                format!("Precision/Scale differs: {} vs {}", src, tgt),
            ));
        }

        if source.is_nullable != target.is_nullable {
            let src = nullability(source.is_nullable);
            let tgt = nullability(target.is_nullable);
            shape.push(Difference::modified(
                DiffCategory::Column,
                object.clone(),
                "Nullability",
                src,
                tgt,
                format!("Nullability differs: {} vs {}", src, tgt),
            ));
        }

        // Computed columns cannot be altered in place
        if !source.is_computed() && !target.is_computed() {
            attach_to_first(
                &mut shape,
                format!(
                    "ALTER TABLE {} ALTER COLUMN {};",
                    table_name,
                    alter_column_definition(source)
                ),
            );
        }
        out.extend(shape);

        if source.is_identity() != target.is_identity() {
            out.push(Difference::modified(
                DiffCategory::Column,
                object.clone(),
                "Identity",
                flag(source.is_identity()),
                flag(target.is_identity()),
                "Identity property differs",
            ));
        }

        if !self.options.ignore_collation && source.collation != target.collation {
            let src = source.collation.clone().unwrap_or_default();
            let tgt = target.collation.clone().unwrap_or_default();
            out.push(Difference::modified(
                DiffCategory::Column,
                object,
                "Collation",
                src.clone(),
                tgt.clone(),
                format!("Collation differs: {} vs {}", src, tgt),
            ));
        }
    }

    fn compare_primary_keys(
        &self,
        table_name: &str,
        source: Option<&Index>,
        target: Option<&Index>,
        out: &mut Vec<Difference>,
    ) {
        match (source, target) {
            (None, None) => {}
            (Some(pk), None) => out.push(
                Difference::existence(
                    DiffKind::Removed,
                    DiffCategory::Constraint,
                    format!("{}.{}", table_name, pk.name),
                    format!("Primary key {} has no counterpart", quote_ident(&pk.name)),
                )
                .with_migration(format!(
                    "ALTER TABLE {} ADD {};",
                    table_name,
                    primary_key_constraint(pk)
                )),
            ),
            (None, Some(pk)) => out.push(
                Difference::existence(
                    DiffKind::Added,
                    DiffCategory::Constraint,
                    format!("{}.{}", table_name, pk.name),
                    format!("Primary key {} has no counterpart", quote_ident(&pk.name)),
                )
                .with_migration(format!(
                    "ALTER TABLE {} DROP CONSTRAINT {};",
                    table_name,
                    quote_ident(&pk.name)
                )),
            ),
            (Some(src), Some(tgt)) => {
                let src_cols = index_columns_signature(src);
                let tgt_cols = index_columns_signature(tgt);
                if src_cols != tgt_cols {
                    out.push(
                        Difference::modified(
                            DiffCategory::Constraint,
                            format!("{}.{}", table_name, src.name),
                            "Columns",
                            src_cols.clone(),
                            tgt_cols.clone(),
                            format!("Primary key columns differ: [{}] vs [{}]", src_cols, tgt_cols),
                        )
                        .with_migration(format!(
                            "ALTER TABLE {table} DROP CONSTRAINT {old};\nALTER TABLE {table} ADD {new};",
                            table = table_name,
                            old = quote_ident(&tgt.name),
                            new = primary_key_constraint(src)
                        )),
                    );
                }
            }
        }
    }

    fn compare_indexes(&self, table_name: &str, source: &Table, target: &Table, out: &mut Vec<Difference>) {
        let matched = match_objects(
            DiffCategory::Index,
            &source.indexes,
            &target.indexes,
            |i| i.name.clone(),
        );

        for (name, index) in matched.removed {
            out.push(
                Difference::existence(
                    DiffKind::Removed,
                    DiffCategory::Index,
                    format!("{}.{}", table_name, name),
                    format!("Index {} has no counterpart", quote_ident(&name)),
                )
                .with_migration(format!("{};", index.to_ddl())),
            );
        }

        for (name, _) in matched.added {
            out.push(
                Difference::existence(
                    DiffKind::Added,
                    DiffCategory::Index,
                    format!("{}.{}", table_name, name),
                    format!("Index {} has no counterpart", quote_ident(&name)),
                )
                .with_migration(format!("DROP INDEX {} ON {};", quote_ident(&name), table_name)),
            );
        }

        for (_, src, tgt) in matched.common {
            self.compare_index_details(table_name, src, tgt, out);
        }
    }

    fn compare_index_details(&self, table_name: &str, source: &Index, target: &Index, out: &mut Vec<Difference>) {
        let object = format!("{}.{}", table_name, source.name);
        let mut changes = Vec::new();

        if source.is_unique != target.is_unique {
            changes.push(Difference::modified(
                DiffCategory::Index,
                object.clone(),
                "IsUnique",
                flag(source.is_unique),
                flag(target.is_unique),
                "Unique property differs",
            ));
        }

        if source.is_clustered != target.is_clustered {
            changes.push(Difference::modified(
                DiffCategory::Index,
                object.clone(),
                "IsClustered",
                flag(source.is_clustered),
                flag(target.is_clustered),
                "Clustered property differs",
            ));
        }

        let src_cols = index_columns_signature(source);
        let tgt_cols = index_columns_signature(target);
        if src_cols != tgt_cols {
            changes.push(Difference::modified(
                DiffCategory::Index,
                object.clone(),
                "Columns",
                src_cols.clone(),
                tgt_cols.clone(),
                format!("Index columns differ: [{}] vs [{}]", src_cols, tgt_cols),
            ));
        }

        let src_filter = source.filter_definition.clone().unwrap_or_default();
        let tgt_filter = target.filter_definition.clone().unwrap_or_default();
        if !definitions_equal(&src_filter, &tgt_filter, self.options.ignore_whitespace) {
            changes.push(Difference::modified(
                DiffCategory::Index,
                object,
                "Filter",
                src_filter.clone(),
                tgt_filter.clone(),
                format!("Index filter differs: {} vs {}", src_filter, tgt_filter),
            ));
        }

        attach_to_first(
            &mut changes,
            format!(
                "DROP INDEX {} ON {};\n{};",
                quote_ident(&target.name),
                table_name,
                source.to_ddl()
            ),
        );
        out.extend(changes);
    }

    fn compare_foreign_keys(&self, table_name: &str, source: &Table, target: &Table, out: &mut Vec<Difference>) {
        let matched = match_objects(
            DiffCategory::ForeignKey,
            &source.foreign_keys,
            &target.foreign_keys,
            |fk| fk.name.clone(),
        );

        for (name, fk) in matched.removed {
            out.push(
                Difference::existence(
                    DiffKind::Removed,
                    DiffCategory::ForeignKey,
                    format!("{}.{}", table_name, name),
                    format!("Foreign key {} has no counterpart", quote_ident(&name)),
                )
                .with_migration(format!("{};", fk.to_ddl())),
            );
        }

        for (name, _) in matched.added {
            out.push(
                Difference::existence(
                    DiffKind::Added,
                    DiffCategory::ForeignKey,
                    format!("{}.{}", table_name, name),
                    format!("Foreign key {} has no counterpart", quote_ident(&name)),
                )
                .with_migration(drop_constraint_sql(table_name, &name)),
            );
        }

        for (_, src, tgt) in matched.common {
            self.compare_foreign_key_details(table_name, src, tgt, out);
        }
    }

    fn compare_foreign_key_details(&self, table_name: &str, source: &ForeignKey, target: &ForeignKey, out: &mut Vec<Difference>) {
        let object = format!("{}.{}", table_name, source.name);
        let mut changes = Vec::new();

        let src_ref = qualified_name(&source.referenced_schema_name, &source.referenced_table_name);
        let tgt_ref = qualified_name(&target.referenced_schema_name, &target.referenced_table_name);
        if src_ref != tgt_ref {
            changes.push(Difference::modified(
                DiffCategory::ForeignKey,
                object.clone(),
                "ReferencedTable",
                src_ref.clone(),
                tgt_ref.clone(),
                format!("Referenced table differs: {} vs {}", src_ref, tgt_ref),
            ));
        }

        let src_cols = foreign_key_columns_signature(source);
        let tgt_cols = foreign_key_columns_signature(target);
        if src_cols != tgt_cols {
            changes.push(Difference::modified(
                DiffCategory::ForeignKey,
                object.clone(),
                "Columns",
                src_cols.clone(),
                tgt_cols.clone(),
                format!("Foreign key columns differ: [{}] vs [{}]", src_cols, tgt_cols),
            ));
        }

        let actions = [
            ("DeleteAction", "Delete action", source.delete_action, target.delete_action),
            ("UpdateAction", "Update action", source.update_action, target.update_action),
        ];
        for (property, label, src, tgt) in actions {
            if src != tgt {
                changes.push(Difference::modified(
                    DiffCategory::ForeignKey,
                    object.clone(),
                    property,
                    src.catalog_name(),
                    tgt.catalog_name(),
                    format!("{} differs: {} vs {}", label, src.catalog_name(), tgt.catalog_name()),
                ));
            }
        }

        attach_to_first(
            &mut changes,
            format!(
                "{}\n{};",
                drop_constraint_sql(table_name, &target.name),
                source.to_ddl()
            ),
        );
        out.extend(changes);
    }

    fn compare_check_constraints(&self, table_name: &str, source: &Table, target: &Table, out: &mut Vec<Difference>) {
        let matched = match_objects(
            DiffCategory::Constraint,
            &source.check_constraints,
            &target.check_constraints,
            |cc| cc.name.clone(),
        );

        for (name, check) in matched.removed {
            out.push(
                Difference::existence(
                    DiffKind::Removed,
                    DiffCategory::Constraint,
                    format!("{}.{}", table_name, name),
                    format!("Check constraint {} has no counterpart", quote_ident(&name)),
                )
                .with_migration(format!("{};", check.to_ddl())),
            );
        }

        for (name, _) in matched.added {
            out.push(
                Difference::existence(
                    DiffKind::Added,
                    DiffCategory::Constraint,
                    format!("{}.{}", table_name, name),
                    format!("Check constraint {} has no counterpart", quote_ident(&name)),
                )
                .with_migration(drop_constraint_sql(table_name, &name)),
            );
        }

        for (_, src, tgt) in matched.common {
            self.compare_check_details(table_name, src, tgt, out);
        }
    }

    fn compare_check_details(&self, table_name: &str, source: &CheckConstraint, target: &CheckConstraint, out: &mut Vec<Difference>) {
        let object = format!("{}.{}", table_name, source.name);

        if !definitions_equal(&source.definition, &target.definition, self.options.ignore_whitespace) {
            out.push(
                Difference::modified(
                    DiffCategory::Constraint,
                    object.clone(),
                    "Definition",
                    source.definition.clone(),
                    target.definition.clone(),
                    format!(
                        "Check definition differs: {} vs {}",
                        source.definition, target.definition
                    ),
                )
                .with_migration(format!(
                    "{}\n{};",
                    drop_constraint_sql(table_name, &target.name),
                    source.to_ddl()
                )),
            );
        }

        if source.is_disabled != target.is_disabled {
            let toggle = if source.is_disabled {
                "NOCHECK"
            } else {
                "WITH CHECK CHECK"
            };
            out.push(
                Difference::modified(
                    DiffCategory::Constraint,
                    object,
                    "Disabled",
                    flag(source.is_disabled),
                    flag(target.is_disabled),
                    "Disabled state differs",
                )
                .with_migration(format!(
                    "ALTER TABLE {} {} CONSTRAINT {};",
                    table_name,
                    toggle,
                    quote_ident(&source.name)
                )),
            );
        }
    }

    fn compare_views(&self, source: &DatabaseSchema, target: &DatabaseSchema, out: &mut Vec<Difference>) {
        let wanted = |v: &&View| self.options.includes_schema(&v.schema_name);
        let matched = match_objects(
            DiffCategory::View,
            source.views.iter().filter(wanted),
            target.views.iter().filter(wanted),
            |v| qualified_name(&v.schema_name, &v.name),
        );
        self.record_modules(&VIEW, matched, |v| &v.definition, |key, _| key.to_string(), out);
    }

    fn compare_procedures(&self, source: &DatabaseSchema, target: &DatabaseSchema, out: &mut Vec<Difference>) {
        let wanted = |p: &&StoredProcedure| self.options.includes_schema(&p.schema_name);
        let matched = match_objects(
            DiffCategory::Procedure,
            source.procedures.iter().filter(wanted),
            target.procedures.iter().filter(wanted),
            |p| qualified_name(&p.schema_name, &p.name),
        );
        self.record_modules(&PROCEDURE, matched, |p| &p.definition, |key, _| key.to_string(), out);
    }

    fn compare_functions(&self, source: &DatabaseSchema, target: &DatabaseSchema, out: &mut Vec<Difference>) {
        let wanted = |f: &&Function| self.options.includes_schema(&f.schema_name);
        let matched = match_objects(
            DiffCategory::Function,
            source.functions.iter().filter(wanted),
            target.functions.iter().filter(wanted),
            |f| qualified_name(&f.schema_name, &f.name),
        );
        self.record_modules(&FUNCTION, matched, |f| &f.definition, |key, _| key.to_string(), out);
    }

    fn compare_triggers(&self, source: &DatabaseSchema, target: &DatabaseSchema, out: &mut Vec<Difference>) {
        let wanted = |t: &&Trigger| self.options.includes_table(&t.schema_name, &t.table_name);
        let matched = match_objects(
            DiffCategory::Trigger,
            source.triggers.iter().filter(wanted),
            target.triggers.iter().filter(wanted),
            |t| table_scoped_name(&t.schema_name, &t.table_name, &t.name),
        );
        // Triggers are dropped by schema-qualified name, not through their table
        self.record_modules(
            &TRIGGER,
            matched,
            |t| &t.definition,
            |_, t| qualified_name(&t.schema_name, &t.name),
            out,
        );
    }

    /// Existence and definition differences for views, procedures,
    /// functions and triggers
    fn record_modules<T>(
        &self,
        kind: &ModuleKind,
        matched: Matched<'_, T>,
        definition: impl Fn(&T) -> &str,
        drop_name: impl Fn(&str, &T) -> String,
        out: &mut Vec<Difference>,
    ) {
        for (name, object) in matched.removed {
            out.push(
                Difference::existence(
                    DiffKind::Removed,
                    kind.category,
                    name.clone(),
                    format!("{} {} has no counterpart", kind.noun, name),
                )
                .with_migration(definition(object).trim()),
            );
        }

        for (name, object) in matched.added {
            let drop = format!("DROP {} {};", kind.keyword, drop_name(&name, object));
            out.push(
                Difference::existence(
                    DiffKind::Added,
                    kind.category,
                    name.clone(),
                    format!("{} {} has no counterpart", kind.noun, name),
                )
                .with_migration(drop),
            );
        }

        for (name, src, tgt) in matched.common {
            let src_def = definition(src);
            let tgt_def = definition(tgt);
            if definitions_equal(src_def, tgt_def, self.options.ignore_whitespace) {
                continue;
            }

            let mut diff = Difference::modified(
                kind.category,
                name,
                "Definition",
                src_def,
                tgt_def,
                format!("{} definition differs", kind.noun),
            );
            if let Some(sql) = create_or_alter(src_def) {
                diff = diff.with_migration(sql);
            }
            out.push(diff);
        }
    }
}

/// Category metadata for definition-bearing objects
struct ModuleKind {
    category: DiffCategory,
    noun: &'static str,
    keyword: &'static str,
}

const VIEW: ModuleKind = ModuleKind {
    category: DiffCategory::View,
    noun: "View",
    keyword: "VIEW",
};

const PROCEDURE: ModuleKind = ModuleKind {
    category: DiffCategory::Procedure,
    noun: "Procedure",
    keyword: "PROCEDURE",
};

const FUNCTION: ModuleKind = ModuleKind {
    category: DiffCategory::Function,
    noun: "Function",
    keyword: "FUNCTION",
};

const TRIGGER: ModuleKind = ModuleKind {
    category: DiffCategory::Trigger,
    noun: "Trigger",
    keyword: "TRIGGER",
};

fn drop_constraint_sql(table_name: &str, constraint_name: &str) -> String {
    format!(
        "ALTER TABLE {} DROP CONSTRAINT {};",
        table_name,
        quote_ident(constraint_name)
    )
}
