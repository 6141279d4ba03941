//! SQL compilation of [`Query`] values through `sea-query`
//!
//! The statement is rendered in the SQLite dialect. The inlined text form
//! is what fingerprints hash.

use sea_query::{
    Alias, Asterisk, ColumnRef, Expr, IntoColumnRef, Order, Query as SeaQuery, SelectStatement,
    SimpleExpr, SqliteQueryBuilder, Values,
};
use serde_json::Value;

use super::{Direction, Operator, Predicate, Query};

/// SQL text plus its positional values
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledQuery {
    /// Statement with `?` placeholders
    pub sql: String,
    /// Values bound to the placeholders, in order
    pub values: Values,
}

pub(super) fn statement(query: &Query) -> SelectStatement {
    let mut select = SeaQuery::select();
    select.from(Alias::new(query.entity().name.as_str()));

    if query.columns().is_empty() {
        select.column(Asterisk);
    } else {
        select.columns(query.columns().iter().map(|c| column(c)));
    }

    for predicate in query.predicates() {
        select.and_where(condition(predicate));
    }

    for (name, direction) in query.ordering() {
        let order = match direction {
            Direction::Asc => Order::Asc,
            Direction::Desc => Order::Desc,
        };
        select.order_by(column(name), order);
    }

    if let Some(limit) = query.limit_value() {
        select.limit(limit);
    }
    if let Some(offset) = query.offset_value() {
        select.offset(offset);
    }

    select
}

pub(super) fn compile(query: &Query) -> CompiledQuery {
    let (sql, values) = statement(query).build(SqliteQueryBuilder);
    CompiledQuery { sql, values }
}

pub(super) fn compile_raw(query: &Query) -> String {
    statement(query).to_string(SqliteQueryBuilder)
}

fn column(name: &str) -> ColumnRef {
    match name.split_once('.') {
        Some((table, column)) => (Alias::new(table), Alias::new(column)).into_column_ref(),
        None => Alias::new(name).into_column_ref(),
    }
}

fn condition(predicate: &Predicate) -> SimpleExpr {
    let col = Expr::col(column(&predicate.column));

    match (predicate.operator, &predicate.value) {
        (Operator::IsNull, _) | (Operator::Eq, Value::Null) => col.is_null(),
        (Operator::NotNull, _) | (Operator::Ne, Value::Null) => col.is_not_null(),
        (Operator::Eq, value) => col.eq(to_sea_value(value)),
        (Operator::Ne, value) => col.ne(to_sea_value(value)),
        (Operator::Gt, value) => col.gt(to_sea_value(value)),
        (Operator::Gte, value) => col.gte(to_sea_value(value)),
        (Operator::Lt, value) => col.lt(to_sea_value(value)),
        (Operator::Lte, value) => col.lte(to_sea_value(value)),
        (Operator::Like, value) => col.like(label(value)),
        (Operator::In, Value::Array(values)) => col.is_in(values.iter().map(to_sea_value)),
        (Operator::In, value) => col.is_in([to_sea_value(value)]),
    }
}

fn to_sea_value(value: &Value) -> sea_query::Value {
    match value {
        Value::Null => sea_query::Value::String(None),
        Value::Bool(b) => (*b).into(),
        Value::Number(n) => match n.as_i64() {
            Some(i) => i.into(),
            None => n.as_f64().unwrap_or_default().into(),
        },
        Value::String(s) => s.clone().into(),
        other => other.to_string().into(),
    }
}

fn label(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use crate::query::{EntityDescriptor, MemoryStore, Query};
    use std::sync::Arc;

    fn query() -> Query {
        Query::new(Arc::new(MemoryStore::new()), &EntityDescriptor::new("users"))
    }

    #[test]
    fn test_select_all() {
        let compiled = query().to_sql();
        assert_eq!(compiled.sql, r#"SELECT * FROM "users""#);
        assert!(compiled.values.0.is_empty());
    }

    #[test]
    fn test_predicates_and_order() {
        let compiled = query()
            .select(["name"])
            .where_eq("active", true)
            .where_like("name", "A%")
            .where_not_null("email")
            .order_by_desc("created_at")
            .for_page(2, 10)
            .to_sql();

        assert!(compiled.sql.starts_with(r#"SELECT "id", "name" FROM "users" WHERE"#));
        assert!(compiled.sql.contains(r#""active" = ?"#));
        assert!(compiled.sql.contains(r#""name" LIKE ?"#));
        assert!(compiled.sql.contains(r#""email" IS NOT NULL"#));
        assert!(compiled.sql.contains(r#"ORDER BY "created_at" DESC"#));
        assert!(compiled.sql.contains("LIMIT"));
        assert!(compiled.sql.contains("OFFSET"));
    }

    #[test]
    fn test_where_in() {
        let compiled = query().where_in("id", [1, 2, 3]).to_sql();
        assert_eq!(compiled.sql, r#"SELECT * FROM "users" WHERE "id" IN (?, ?, ?)"#);
        assert_eq!(compiled.values.0.len(), 3);
    }

    #[test]
    fn test_null_equality_compiles_to_is_null() {
        let compiled = query().where_eq("deleted_at", serde_json::Value::Null).to_sql();
        assert_eq!(compiled.sql, r#"SELECT * FROM "users" WHERE "deleted_at" IS NULL"#);
    }

    #[test]
    fn test_raw_inlines_and_escapes() {
        let raw = query().where_eq("name", "O'Brien").where_eq("age", 40).to_raw_sql();
        assert!(raw.contains(r#""name" = '"#));
        assert!(raw.contains("Brien'"));
        assert!(raw.contains(r#""age" = 40"#));
        assert!(!raw.contains('?'));
    }

    #[test]
    fn test_raw_keeps_question_marks_in_identifiers() {
        let a = query().where_eq("why?", 1).where_eq("b", 2).to_raw_sql();
        let b = query().where_eq("why?", 2).where_eq("b", 1).to_raw_sql();
        assert!(a.contains(r#""why?" = 1"#));
        assert_ne!(a, b);
    }

    #[test]
    fn test_qualified_columns() {
        let compiled = query().where_eq("users.id", 1).to_sql();
        assert!(compiled.sql.contains(r#""users"."id" = ?"#));
    }
}
