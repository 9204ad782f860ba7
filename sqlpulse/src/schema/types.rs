//! Type definitions for database schema objects
//!
//! These are plain values filled in by an extractor. Rendering lives in
//! [`crate::schema::ddl`] and comparison in [`crate::schema::comparator`].

use serde::{Deserialize, Serialize};

/// Represents a complete database schema
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSchema {
    pub database_name: String,
    pub schemas: Vec<Schema>,
    pub tables: Vec<Table>,
    pub views: Vec<View>,
    pub procedures: Vec<StoredProcedure>,
    pub functions: Vec<Function>,
    pub triggers: Vec<Trigger>,
}

impl DatabaseSchema {
    /// Create a new empty database schema
    pub fn new(database_name: &str) -> Self {
        Self {
            database_name: database_name.to_string(),
            ..Self::default()
        }
    }

    pub fn add_schema(&mut self, schema: Schema) {
        self.schemas.push(schema);
    }

    /// Add a table to the schema
    pub fn add_table(&mut self, table: Table) {
        self.tables.push(table);
    }

    /// Add a view to the schema
    pub fn add_view(&mut self, view: View) {
        self.views.push(view);
    }

    pub fn add_procedure(&mut self, procedure: StoredProcedure) {
        self.procedures.push(procedure);
    }

    pub fn add_function(&mut self, function: Function) {
        self.functions.push(function);
    }

    pub fn add_trigger(&mut self, trigger: Trigger) {
        self.triggers.push(trigger);
    }

    /// Find a table by schema and name
    pub fn table(&self, schema_name: &str, name: &str) -> Option<&Table> {
        self.tables
            .iter()
            .find(|t| t.schema_name == schema_name && t.name == name)
    }
}

/// A namespace inside the database
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Schema {
    pub name: String,
    pub owner: Option<String>,
}

impl Schema {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            owner: None,
        }
    }

    pub fn owner(mut self, owner: &str) -> Self {
        self.owner = Some(owner.to_string());
        self
    }
}

/// Represents a database table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Table {
    pub schema_name: String,
    pub name: String,
    pub columns: Vec<Column>,
    /// Held here only; never repeated in `indexes`
    pub primary_key: Option<Index>,
    pub indexes: Vec<Index>,
    pub foreign_keys: Vec<ForeignKey>,
    pub check_constraints: Vec<CheckConstraint>,
}

impl Table {
    /// Create a new table with the given schema and name
    pub fn new(schema_name: &str, name: &str) -> Self {
        Self {
            schema_name: schema_name.to_string(),
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// Add a column to the table
    pub fn add_column(&mut self, column: Column) {
        self.columns.push(column);
    }

    /// Set the primary key for the table
    pub fn set_primary_key(&mut self, mut pk: Index) {
        pk.is_primary_key = true;
        self.primary_key = Some(pk);
    }

    /// Add an index to the table
    pub fn add_index(&mut self, index: Index) {
        self.indexes.push(index);
    }

    /// Add a foreign key to the table
    pub fn add_foreign_key(&mut self, fk: ForeignKey) {
        self.foreign_keys.push(fk);
    }

    pub fn add_check_constraint(&mut self, check: CheckConstraint) {
        self.check_constraints.push(check);
    }
}

/// Length stored for `(MAX)` character and binary columns
pub const MAX_LENGTH: i32 = -1;

/// Represents a database column
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Column {
    pub name: String,
    pub ordinal_position: i32,
    pub data_type: String,
    /// Storage length in bytes, or [`MAX_LENGTH`]
    pub max_length: i32,
    pub precision: i32,
    pub scale: i32,
    pub is_nullable: bool,
    pub default_value: Option<String>,
    pub identity: Option<Identity>,
    /// Present for computed columns
    pub computed_definition: Option<String>,
    pub collation: Option<String>,
}

impl Column {
    /// Create a new column with the given name and type
    pub fn new(name: &str, data_type: &str) -> Self {
        Self {
            name: name.to_string(),
            data_type: data_type.to_string(),
            ..Self::default()
        }
    }

    pub fn max_length(mut self, max_length: i32) -> Self {
        self.max_length = max_length;
        self
    }

    pub fn precision(mut self, precision: i32, scale: i32) -> Self {
        self.precision = precision;
        self.scale = scale;
        self
    }

    /// Set whether the column is nullable
    pub fn nullable(mut self, nullable: bool) -> Self {
        self.is_nullable = nullable;
        self
    }

    /// Set a default value for the column
    pub fn default_value(mut self, default: &str) -> Self {
        self.default_value = Some(default.to_string());
        self
    }

    pub fn identity(mut self, seed: i64, increment: i64) -> Self {
        self.identity = Some(Identity { seed, increment });
        self
    }

    pub fn computed(mut self, definition: &str) -> Self {
        self.computed_definition = Some(definition.to_string());
        self
    }

    pub fn collation(mut self, collation: &str) -> Self {
        self.collation = Some(collation.to_string());
        self
    }

    pub fn is_identity(&self) -> bool {
        self.identity.is_some()
    }

    pub fn is_computed(&self) -> bool {
        self.computed_definition.is_some()
    }
}

/// Identity seed and increment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub seed: i64,
    pub increment: i64,
}

/// A key or included column of an index
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexColumn {
    pub name: String,
    pub position: i32,
    pub is_descending: bool,
    pub is_included: bool,
}

impl IndexColumn {
    pub fn key(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn descending(name: &str) -> Self {
        Self {
            is_descending: true,
            ..Self::key(name)
        }
    }

    pub fn included(name: &str) -> Self {
        Self {
            is_included: true,
            ..Self::key(name)
        }
    }
}

/// Represents an index, or a primary key when `is_primary_key` is set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Index {
    pub name: String,
    pub schema_name: String,
    pub table_name: String,
    pub is_primary_key: bool,
    pub is_unique: bool,
    pub is_clustered: bool,
    pub is_disabled: bool,
    pub filter_definition: Option<String>,
    pub columns: Vec<IndexColumn>,
}

impl Index {
    pub fn new(schema_name: &str, table_name: &str, name: &str) -> Self {
        Self {
            name: name.to_string(),
            schema_name: schema_name.to_string(),
            table_name: table_name.to_string(),
            ..Self::default()
        }
    }

    pub fn column(mut self, column: IndexColumn) -> Self {
        self.columns.push(column);
        self
    }

    pub fn unique(mut self, is_unique: bool) -> Self {
        self.is_unique = is_unique;
        self
    }

    pub fn clustered(mut self, is_clustered: bool) -> Self {
        self.is_clustered = is_clustered;
        self
    }

    pub fn filter(mut self, predicate: &str) -> Self {
        self.filter_definition = Some(predicate.to_string());
        self
    }

    pub fn key_columns(&self) -> impl Iterator<Item = &IndexColumn> {
        self.columns.iter().filter(|c| !c.is_included)
    }

    pub fn included_columns(&self) -> impl Iterator<Item = &IndexColumn> {
        self.columns.iter().filter(|c| c.is_included)
    }
}

/// Referential action of a foreign key, in catalog spelling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReferentialAction {
    #[default]
    NoAction,
    Cascade,
    SetNull,
    SetDefault,
}

impl ReferentialAction {
    /// Catalog name, e.g. `SET_NULL`
    pub fn catalog_name(&self) -> &'static str {
        match self {
            ReferentialAction::NoAction => "NO_ACTION",
            ReferentialAction::Cascade => "CASCADE",
            ReferentialAction::SetNull => "SET_NULL",
            ReferentialAction::SetDefault => "SET_DEFAULT",
        }
    }
}

/// A referencing column and the column it points at
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForeignKeyColumn {
    pub column_name: String,
    pub referenced_column_name: String,
}

/// Represents a foreign key constraint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForeignKey {
    pub name: String,
    pub schema_name: String,
    pub table_name: String,
    pub referenced_schema_name: String,
    pub referenced_table_name: String,
    pub delete_action: ReferentialAction,
    pub update_action: ReferentialAction,
    pub columns: Vec<ForeignKeyColumn>,
}

impl ForeignKey {
    pub fn new(schema_name: &str, table_name: &str, name: &str) -> Self {
        Self {
            name: name.to_string(),
            schema_name: schema_name.to_string(),
            table_name: table_name.to_string(),
            ..Self::default()
        }
    }

    pub fn references(mut self, schema_name: &str, table_name: &str) -> Self {
        self.referenced_schema_name = schema_name.to_string();
        self.referenced_table_name = table_name.to_string();
        self
    }

    pub fn column(mut self, column_name: &str, referenced_column_name: &str) -> Self {
        self.columns.push(ForeignKeyColumn {
            column_name: column_name.to_string(),
            referenced_column_name: referenced_column_name.to_string(),
        });
        self
    }

    pub fn on_delete(mut self, action: ReferentialAction) -> Self {
        self.delete_action = action;
        self
    }

    pub fn on_update(mut self, action: ReferentialAction) -> Self {
        self.update_action = action;
        self
    }
}

/// Represents a check constraint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckConstraint {
    pub name: String,
    pub schema_name: String,
    pub table_name: String,
    pub definition: String,
    pub is_disabled: bool,
}

impl CheckConstraint {
    pub fn new(schema_name: &str, table_name: &str, name: &str, definition: &str) -> Self {
        Self {
            name: name.to_string(),
            schema_name: schema_name.to_string(),
            table_name: table_name.to_string(),
            definition: definition.to_string(),
            is_disabled: false,
        }
    }
}

/// Represents a database view
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct View {
    pub schema_name: String,
    pub name: String,
    pub definition: String,
}

impl View {
    pub fn new(schema_name: &str, name: &str, definition: &str) -> Self {
        Self {
            schema_name: schema_name.to_string(),
            name: name.to_string(),
            definition: definition.to_string(),
        }
    }
}

/// Represents a stored procedure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoredProcedure {
    pub schema_name: String,
    pub name: String,
    pub definition: String,
}

impl StoredProcedure {
    pub fn new(schema_name: &str, name: &str, definition: &str) -> Self {
        Self {
            schema_name: schema_name.to_string(),
            name: name.to_string(),
            definition: definition.to_string(),
        }
    }
}

/// Kind of user-defined function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FunctionType {
    #[default]
    Scalar,
    Table,
    Inline,
}

impl FunctionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FunctionType::Scalar => "SCALAR",
            FunctionType::Table => "TABLE",
            FunctionType::Inline => "INLINE",
        }
    }
}

/// Represents a user-defined function
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Function {
    pub schema_name: String,
    pub name: String,
    pub definition: String,
    pub function_type: FunctionType,
}

impl Function {
    pub fn new(schema_name: &str, name: &str, definition: &str) -> Self {
        Self {
            schema_name: schema_name.to_string(),
            name: name.to_string(),
            definition: definition.to_string(),
            function_type: FunctionType::Scalar,
        }
    }
}

/// Represents a DML trigger owned by a table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Trigger {
    pub schema_name: String,
    pub table_name: String,
    pub name: String,
    pub definition: String,
    pub is_disabled: bool,
}

impl Trigger {
    pub fn new(schema_name: &str, table_name: &str, name: &str, definition: &str) -> Self {
        Self {
            schema_name: schema_name.to_string(),
            table_name: table_name.to_string(),
            name: name.to_string(),
            definition: definition.to_string(),
            is_disabled: false,
        }
    }
}
