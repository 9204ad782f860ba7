//! Canonical DDL rendering
//!
//! Every schema object renders to the T-SQL statement that creates it. The
//! model types stay plain data; the rules live here.

use crate::schema::types::{
    CheckConstraint, Column, ForeignKey, Function, Index, ReferentialAction, Schema,
    StoredProcedure, Table, Trigger, View, MAX_LENGTH,
};
use crate::utils::naming::{qualified_name, quote_ident};

/// Render an object as its creation statement, without a terminator
pub trait ToDdl {
    fn to_ddl(&self) -> String;
}

impl ToDdl for Schema {
    fn to_ddl(&self) -> String {
        match self.owner.as_deref().filter(|o| !o.is_empty()) {
            Some(owner) => format!(
                "CREATE SCHEMA {} AUTHORIZATION {}",
                quote_ident(&self.name),
                quote_ident(owner)
            ),
            None => format!("CREATE SCHEMA {}", quote_ident(&self.name)),
        }
    }
}

impl ToDdl for Column {
    fn to_ddl(&self) -> String {
        // Computed columns carry no type, nullability or default
        if let Some(expression) = &self.computed_definition {
            return format!("{} AS {}", quote_ident(&self.name), expression);
        }

        let mut sql = format!("{} {}", quote_ident(&self.name), type_clause(self));

        if let Some(identity) = &self.identity {
            sql.push_str(&format!(
                " IDENTITY({},{})",
                identity.seed, identity.increment
            ));
        }

        sql.push_str(nullability(self.is_nullable));

        if let Some(default) = self.default_value.as_deref().filter(|d| !d.is_empty()) {
            sql.push_str(" DEFAULT ");
            sql.push_str(default);
        }

        sql
    }
}

/// The data type with its length, precision or scale suffix
pub fn type_clause(column: &Column) -> String {
    let data_type = column.data_type.as_str();
    let upper = data_type.to_uppercase();

    match upper.as_str() {
        "VARCHAR" | "NVARCHAR" | "CHAR" | "NCHAR" | "VARBINARY" | "BINARY" => {
            if column.max_length == MAX_LENGTH {
                format!("{}(MAX)", data_type)
            } else if upper.starts_with('N') {
                // Stored length is in bytes, two per character
                format!("{}({})", data_type, column.max_length / 2)
            } else {
                format!("{}({})", data_type, column.max_length)
            }
        }
        "DECIMAL" | "NUMERIC" => format!("{}({},{})", data_type, column.precision, column.scale),
        "DATETIME2" | "DATETIMEOFFSET" | "TIME" if column.scale > 0 => {
            format!("{}({})", data_type, column.scale)
        }
        _ => data_type.to_string(),
    }
}

fn nullability(is_nullable: bool) -> &'static str {
    if is_nullable {
        " NULL"
    } else {
        " NOT NULL"
    }
}

fn is_character_type(data_type: &str) -> bool {
    matches!(
        data_type.to_uppercase().as_str(),
        "VARCHAR" | "NVARCHAR" | "CHAR" | "NCHAR" | "TEXT" | "NTEXT"
    )
}

/// Column definition accepted by `ALTER TABLE .. ALTER COLUMN`.
///
/// Identity and defaults cannot be changed this way and are left out. An
/// explicit collation is restated, otherwise the column falls back to the
/// database default.
pub fn alter_column_definition(column: &Column) -> String {
    let mut sql = format!("{} {}", quote_ident(&column.name), type_clause(column));

    if let Some(collation) = column.collation.as_deref().filter(|c| !c.is_empty()) {
        if is_character_type(&column.data_type) {
            sql.push_str(" COLLATE ");
            sql.push_str(collation);
        }
    }

    sql.push_str(nullability(column.is_nullable));
    sql
}

fn clustering(is_clustered: bool) -> &'static str {
    if is_clustered {
        "CLUSTERED"
    } else {
        "NONCLUSTERED"
    }
}

/// Inline `CONSTRAINT .. PRIMARY KEY` clause for a primary-key index
pub fn primary_key_constraint(pk: &Index) -> String {
    let columns: Vec<String> = pk
        .key_columns()
        .map(|col| {
            let mut def = quote_ident(&col.name);
            if col.is_descending {
                def.push_str(" DESC");
            }
            def
        })
        .collect();

    format!(
        "CONSTRAINT {} PRIMARY KEY {} ({})",
        quote_ident(&pk.name),
        clustering(pk.is_clustered),
        columns.join(", ")
    )
}

impl ToDdl for Table {
    fn to_ddl(&self) -> String {
        let mut columns: Vec<&Column> = self.columns.iter().collect();
        columns.sort_by_key(|c| c.ordinal_position);

        let mut definitions: Vec<String> = columns
            .iter()
            .map(|col| format!("    {}", col.to_ddl()))
            .collect();

        if let Some(pk) = self.primary_key.as_ref().filter(|pk| !pk.columns.is_empty()) {
            definitions.push(format!("    {}", primary_key_constraint(pk)));
        }

        format!(
            "CREATE TABLE {} (\n{}\n)",
            qualified_name(&self.schema_name, &self.name),
            definitions.join(",\n")
        )
    }
}

impl ToDdl for Index {
    /// Primary keys render inline with their table, so a primary-key index
    /// yields an empty statement.
    fn to_ddl(&self) -> String {
        if self.is_primary_key {
            return String::new();
        }

        let mut sql = String::from("CREATE ");
        if self.is_unique {
            sql.push_str("UNIQUE ");
        }
        sql.push_str(clustering(self.is_clustered));
        sql.push_str(&format!(
            " INDEX {} ON {} (\n",
            quote_ident(&self.name),
            qualified_name(&self.schema_name, &self.table_name)
        ));

        let key_columns: Vec<String> = self
            .key_columns()
            .map(|col| {
                let mut def = format!("    {}", quote_ident(&col.name));
                if col.is_descending {
                    def.push_str(" DESC");
                }
                def
            })
            .collect();
        sql.push_str(&key_columns.join(",\n"));
        sql.push_str("\n)");

        let included: Vec<String> = self
            .included_columns()
            .map(|col| format!("    {}", quote_ident(&col.name)))
            .collect();
        if !included.is_empty() {
            sql.push_str(" INCLUDE (\n");
            sql.push_str(&included.join(",\n"));
            sql.push_str("\n)");
        }

        if let Some(filter) = self.filter_definition.as_deref().filter(|f| !f.is_empty()) {
            sql.push_str(" WHERE ");
            sql.push_str(filter);
        }

        sql
    }
}

/// `ON DELETE`/`ON UPDATE` spelling, e.g. `SET NULL`
fn action_sql(action: ReferentialAction) -> String {
    action.catalog_name().replace('_', " ")
}

impl ToDdl for ForeignKey {
    fn to_ddl(&self) -> String {
        let columns: Vec<String> = self
            .columns
            .iter()
            .map(|c| format!("    {}", quote_ident(&c.column_name)))
            .collect();
        let referenced: Vec<String> = self
            .columns
            .iter()
            .map(|c| format!("    {}", quote_ident(&c.referenced_column_name)))
            .collect();

        let mut sql = format!(
            "ALTER TABLE {} ADD CONSTRAINT {} FOREIGN KEY (\n{}\n) REFERENCES {} (\n{}\n)",
            qualified_name(&self.schema_name, &self.table_name),
            quote_ident(&self.name),
            columns.join(",\n"),
            qualified_name(&self.referenced_schema_name, &self.referenced_table_name),
            referenced.join(",\n")
        );

        if self.delete_action != ReferentialAction::NoAction {
            sql.push_str(" ON DELETE ");
            sql.push_str(&action_sql(self.delete_action));
        }
        if self.update_action != ReferentialAction::NoAction {
            sql.push_str(" ON UPDATE ");
            sql.push_str(&action_sql(self.update_action));
        }

        sql
    }
}

impl ToDdl for CheckConstraint {
    fn to_ddl(&self) -> String {
        format!(
            "ALTER TABLE {} ADD CONSTRAINT {} CHECK {}",
            qualified_name(&self.schema_name, &self.table_name),
            quote_ident(&self.name),
            self.definition
        )
    }
}

impl ToDdl for View {
    fn to_ddl(&self) -> String {
        self.definition.clone()
    }
}

impl ToDdl for StoredProcedure {
    fn to_ddl(&self) -> String {
        self.definition.clone()
    }
}

impl ToDdl for Function {
    fn to_ddl(&self) -> String {
        self.definition.clone()
    }
}

impl ToDdl for Trigger {
    fn to_ddl(&self) -> String {
        self.definition.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::types::IndexColumn;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(Column::new("Email", "varchar").max_length(100), "[Email] varchar(100) NOT NULL")]
    #[case(Column::new("Notes", "nvarchar").max_length(-1).nullable(true), "[Notes] nvarchar(MAX) NULL")]
    #[case(Column::new("Name", "nvarchar").max_length(200), "[Name] nvarchar(100) NOT NULL")]
    #[case(Column::new("Code", "NCHAR").max_length(10), "[Code] NCHAR(5) NOT NULL")]
    #[case(Column::new("Blob", "varbinary").max_length(-1), "[Blob] varbinary(MAX) NOT NULL")]
    #[case(Column::new("Price", "decimal").precision(18, 2), "[Price] decimal(18,2) NOT NULL")]
    #[case(Column::new("At", "datetime2").precision(27, 7), "[At] datetime2(7) NOT NULL")]
    #[case(Column::new("At", "datetime2").precision(19, 0), "[At] datetime2 NOT NULL")]
    #[case(Column::new("Id", "int").max_length(4), "[Id] int NOT NULL")]
    fn test_column_type_rendering(#[case] column: Column, #[case] expected: &str) {
        assert_eq!(column.to_ddl(), expected);
    }

    #[test]
    fn test_identity_renders_before_nullability() {
        let column = Column::new("Id", "int").identity(1, 1);
        assert_eq!(column.to_ddl(), "[Id] int IDENTITY(1,1) NOT NULL");
    }

    #[test]
    fn test_default_value() {
        let column = Column::new("CreatedAt", "datetime2")
            .default_value("(sysutcdatetime())")
            .nullable(true);
        assert_eq!(
            column.to_ddl(),
            "[CreatedAt] datetime2 NULL DEFAULT (sysutcdatetime())"
        );

        let empty_default = Column::new("Flag", "bit").default_value("");
        assert_eq!(empty_default.to_ddl(), "[Flag] bit NOT NULL");
    }

    #[test]
    fn test_computed_column_omits_type_and_nullability() {
        let column = Column::new("Total", "decimal")
            .precision(18, 2)
            .default_value("0")
            .computed("([Quantity]*[UnitPrice])");
        assert_eq!(column.to_ddl(), "[Total] AS ([Quantity]*[UnitPrice])");
    }

    #[test]
    fn test_alter_column_definition() {
        let column = Column::new("Email", "varchar")
            .max_length(255)
            .identity(1, 1)
            .default_value("''");
        assert_eq!(alter_column_definition(&column), "[Email] varchar(255) NOT NULL");
    }

    #[test]
    fn test_alter_column_definition_keeps_collation() {
        let column = Column::new("Name", "varchar")
            .max_length(100)
            .collation("Latin1_General_BIN");
        assert_eq!(
            alter_column_definition(&column),
            "[Name] varchar(100) COLLATE Latin1_General_BIN NOT NULL"
        );

        let column = Column::new("Id", "int").collation("Latin1_General_BIN");
        assert_eq!(alter_column_definition(&column), "[Id] int NOT NULL");
    }

    #[test]
    fn test_table_with_inline_primary_key() {
        let mut table = Table::new("dbo", "Users");
        table.add_column(Column::new("Id", "int").identity(1, 1));
        table.add_column(Column::new("Email", "varchar").max_length(100));
        table.set_primary_key(
            Index::new("dbo", "Users", "PK_Users")
                .clustered(true)
                .column(IndexColumn::key("Id")),
        );

        let expected = "CREATE TABLE [dbo].[Users] (\n    [Id] int IDENTITY(1,1) NOT NULL,\n    [Email] varchar(100) NOT NULL,\n    CONSTRAINT [PK_Users] PRIMARY KEY CLUSTERED ([Id])\n)";
        assert_eq!(table.to_ddl(), expected);
    }

    #[test]
    fn test_table_columns_follow_ordinal_position() {
        let mut table = Table::new("dbo", "T");
        let mut b = Column::new("B", "int");
        b.ordinal_position = 2;
        let mut a = Column::new("A", "int");
        a.ordinal_position = 1;
        table.add_column(b);
        table.add_column(a);

        assert_eq!(
            table.to_ddl(),
            "CREATE TABLE [dbo].[T] (\n    [A] int NOT NULL,\n    [B] int NOT NULL\n)"
        );
    }

    #[test]
    fn test_index_with_include_and_filter() {
        let index = Index::new("dbo", "Orders", "IX_Orders_Customer")
            .column(IndexColumn::key("CustomerId"))
            .column(IndexColumn::descending("OrderDate"))
            .column(IndexColumn::included("Total"))
            .filter("([Status]=(1))");

        let expected = "CREATE NONCLUSTERED INDEX [IX_Orders_Customer] ON [dbo].[Orders] (\n    [CustomerId],\n    [OrderDate] DESC\n) INCLUDE (\n    [Total]\n) WHERE ([Status]=(1))";
        assert_eq!(index.to_ddl(), expected);
    }

    #[test]
    fn test_unique_clustered_index() {
        let index = Index::new("dbo", "Users", "UX_Users_Email")
            .unique(true)
            .clustered(true)
            .column(IndexColumn::key("Email"));

        assert_eq!(
            index.to_ddl(),
            "CREATE UNIQUE CLUSTERED INDEX [UX_Users_Email] ON [dbo].[Users] (\n    [Email]\n)"
        );
    }

    #[test]
    fn test_primary_key_index_is_not_rendered_standalone() {
        let mut pk = Index::new("dbo", "Users", "PK_Users").column(IndexColumn::key("Id"));
        pk.is_primary_key = true;
        assert_eq!(pk.to_ddl(), "");
        assert_eq!(
            primary_key_constraint(&pk),
            "CONSTRAINT [PK_Users] PRIMARY KEY NONCLUSTERED ([Id])"
        );
    }

    #[test]
    fn test_foreign_key_actions() {
        let fk = ForeignKey::new("dbo", "Orders", "FK_Orders_Users")
            .references("dbo", "Users")
            .column("UserId", "Id")
            .on_delete(ReferentialAction::SetNull);

        let expected = "ALTER TABLE [dbo].[Orders] ADD CONSTRAINT [FK_Orders_Users] FOREIGN KEY (\n    [UserId]\n) REFERENCES [dbo].[Users] (\n    [Id]\n) ON DELETE SET NULL";
        assert_eq!(fk.to_ddl(), expected);

        let plain = ForeignKey::new("dbo", "Orders", "FK_Orders_Users")
            .references("dbo", "Users")
            .column("UserId", "Id");
        assert!(!plain.to_ddl().contains(" ON "));

        let both = plain
            .on_delete(ReferentialAction::Cascade)
            .on_update(ReferentialAction::SetDefault);
        assert!(both.to_ddl().ends_with(" ON DELETE CASCADE ON UPDATE SET DEFAULT"));
    }

    #[test]
    fn test_check_constraint_and_schema() {
        let check = CheckConstraint::new("sales", "Orders", "CK_Orders_Total", "([Total]>=(0))");
        assert_eq!(
            check.to_ddl(),
            "ALTER TABLE [sales].[Orders] ADD CONSTRAINT [CK_Orders_Total] CHECK ([Total]>=(0))"
        );

        assert_eq!(Schema::new("sales").to_ddl(), "CREATE SCHEMA [sales]");
        assert_eq!(
            Schema::new("sales").owner("dbo").to_ddl(),
            "CREATE SCHEMA [sales] AUTHORIZATION [dbo]"
        );
    }

    #[test]
    fn test_modules_render_their_definition() {
        let view = View::new("dbo", "ActiveUsers", "CREATE VIEW dbo.ActiveUsers AS SELECT 1");
        assert_eq!(view.to_ddl(), "CREATE VIEW dbo.ActiveUsers AS SELECT 1");
    }
}
