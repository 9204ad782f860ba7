//! Shared fixtures for integration tests

#![allow(dead_code)]

use sqlpulse::schema::types::{
    CheckConstraint, Column, DatabaseSchema, ForeignKey, Function, Index, IndexColumn,
    ReferentialAction, Schema, StoredProcedure, Table, Trigger, View,
};

pub fn users_table(email_length: i32) -> Table {
    let mut table = Table::new("dbo", "Users");

    let mut id = Column::new("Id", "int").max_length(4).identity(1, 1);
    id.ordinal_position = 1;
    let mut email = Column::new("Email", "varchar").max_length(email_length);
    email.ordinal_position = 2;
    let mut name = Column::new("DisplayName", "nvarchar").max_length(200).nullable(true);
    name.ordinal_position = 3;

    table.add_column(id);
    table.add_column(email);
    table.add_column(name);
    table.set_primary_key(
        Index::new("dbo", "Users", "PK_Users")
            .clustered(true)
            .column(IndexColumn::key("Id")),
    );
    table.add_index(
        Index::new("dbo", "Users", "UX_Users_Email")
            .unique(true)
            .column(IndexColumn::key("Email")),
    );
    table
}

pub fn orders_foreign_key() -> ForeignKey {
    ForeignKey::new("dbo", "Orders", "FK_Orders_Users")
        .references("dbo", "Users")
        .column("UserId", "Id")
        .on_delete(ReferentialAction::Cascade)
}

pub fn orders_table(with_foreign_key: bool) -> Table {
    let mut table = Table::new("dbo", "Orders");

    let mut id = Column::new("Id", "int").max_length(4).identity(1, 1);
    id.ordinal_position = 1;
    let mut user_id = Column::new("UserId", "int").max_length(4);
    user_id.ordinal_position = 2;
    let mut total = Column::new("Total", "decimal").precision(18, 2);
    total.ordinal_position = 3;

    table.add_column(id);
    table.add_column(user_id);
    table.add_column(total);
    table.set_primary_key(
        Index::new("dbo", "Orders", "PK_Orders")
            .clustered(true)
            .column(IndexColumn::key("Id")),
    );
    table.add_check_constraint(CheckConstraint::new(
        "dbo",
        "Orders",
        "CK_Orders_Total",
        "([Total]>=(0))",
    ));
    if with_foreign_key {
        table.add_foreign_key(orders_foreign_key());
    }
    table
}

/// A small but complete database touching every category
pub fn shop_schema(database_name: &str) -> DatabaseSchema {
    let mut schema = DatabaseSchema::new(database_name);
    schema.add_schema(Schema::new("dbo").owner("dbo"));
    schema.add_schema(Schema::new("sales").owner("dbo"));

    schema.add_table(users_table(100));
    schema.add_table(orders_table(true));

    schema.add_view(View::new(
        "dbo",
        "ActiveUsers",
        "CREATE VIEW dbo.ActiveUsers AS\n    SELECT Id, Email\n    FROM dbo.Users",
    ));
    schema.add_procedure(StoredProcedure::new(
        "sales",
        "GetOrders",
        "CREATE PROCEDURE sales.GetOrders @UserId int AS SELECT * FROM dbo.Orders WHERE UserId = @UserId",
    ));
    schema.add_function(Function::new(
        "dbo",
        "OrderCount",
        "CREATE FUNCTION dbo.OrderCount() RETURNS int AS BEGIN RETURN (SELECT COUNT(*) FROM dbo.Orders) END",
    ));
    schema.add_trigger(Trigger::new(
        "dbo",
        "Orders",
        "TR_Orders_Audit",
        "CREATE TRIGGER dbo.TR_Orders_Audit ON dbo.Orders AFTER INSERT AS SET NOCOUNT ON",
    ));

    schema
}

/// Mutable access to a fixture table
pub fn table_mut<'a>(schema: &'a mut DatabaseSchema, name: &str) -> &'a mut Table {
    schema
        .tables
        .iter_mut()
        .find(|t| t.name == name)
        .expect("fixture table exists")
}

pub fn column_mut<'a>(table: &'a mut Table, name: &str) -> &'a mut Column {
    table
        .columns
        .iter_mut()
        .find(|c| c.name == name)
        .expect("fixture column exists")
}
