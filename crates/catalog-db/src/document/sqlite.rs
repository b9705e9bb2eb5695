//! # SQLite Document Collection
//!
//! [`DocumentCollection`] over a single `documents` table.
//!
//! ## Storage Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  documents                                                              │
//! │  ┌────────────┬──────────────────────────────┬──────────────────────┐  │
//! │  │ collection │ id (internal identifier)     │ body (JSON)          │  │
//! │  ├────────────┼──────────────────────────────┼──────────────────────┤  │
//! │  │ products   │ 7c9e6679-7425-40de-944b-...  │ {"_id":..,"code":..} │  │
//! │  │ products   │ 550e8400-e29b-41d4-a716-...  │ {"_id":..,"code":..} │  │
//! │  └────────────┴──────────────────────────────┴──────────────────────┘  │
//! │                                                                         │
//! │  Filter::Eq("code", "C1")                                              │
//! │       → json_extract(body, '$.code') = ?                               │
//! │  FieldUpdate::Inc("stock", -3)                                         │
//! │       → json_set(body, '$.stock',                                      │
//! │                  COALESCE(json_extract(body, '$.stock'), 0) + ?)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `update_one` is a single `UPDATE` statement, so the filter check and the
//! write cannot interleave with another writer. Every `Inc` adds a range
//! predicate to that statement; SQLite would otherwise promote an overflowing
//! sum to REAL and leave an undecodable body behind.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::query::Query;
use sqlx::sqlite::SqliteArguments;
use sqlx::{Row, Sqlite, SqlitePool};
use std::marker::PhantomData;
use tracing::debug;

use super::{new_document_id, Document, DocumentCollection, FieldUpdate, Filter};
use crate::error::{DbError, DbResult};

/// SQLite-backed document collection.
#[derive(Debug)]
pub struct SqliteCollection<R> {
    pool: SqlitePool,
    _record: PhantomData<fn() -> R>,
}

impl<R> Clone for SqliteCollection<R> {
    fn clone(&self) -> Self {
        SqliteCollection {
            pool: self.pool.clone(),
            _record: PhantomData,
        }
    }
}

impl<R: Document> SqliteCollection<R> {
    /// Creates a collection handle over an already-migrated pool.
    pub fn new(pool: SqlitePool) -> Self {
        SqliteCollection {
            pool,
            _record: PhantomData,
        }
    }

    /// Counts the documents in this collection.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM documents WHERE collection = ?1")
            .bind(R::COLLECTION)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Filter / Update Compilation
// =============================================================================

/// A positional SQL argument.
#[derive(Debug, Clone, PartialEq)]
enum SqlArg {
    Text(String),
    Int(i64),
    Real(f64),
}

fn json_path(field: &str) -> String {
    debug_assert!(
        field.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'),
        "field names are code constants"
    );
    format!("'$.{}'", field)
}

/// Compiles a filter into a WHERE fragment, pushing its arguments.
fn filter_sql(filter: &Filter, args: &mut Vec<SqlArg>) -> String {
    match filter {
        Filter::All => "1 = 1".to_string(),

        Filter::Eq(field, value) => {
            let column = format!("json_extract(body, {})", json_path(field));
            match value {
                Value::Null => format!("{} IS NULL", column),
                Value::Bool(b) => {
                    // json_extract yields 1/0 for JSON booleans
                    args.push(SqlArg::Int(i64::from(*b)));
                    format!("{} = ?", column)
                }
                Value::Number(n) => {
                    match n.as_i64() {
                        Some(i) => args.push(SqlArg::Int(i)),
                        None => args.push(SqlArg::Real(n.as_f64().unwrap_or_default())),
                    }
                    format!("{} = ?", column)
                }
                Value::String(s) => {
                    args.push(SqlArg::Text(s.clone()));
                    format!("{} = ?", column)
                }
                Value::Array(_) | Value::Object(_) => {
                    args.push(SqlArg::Text(value.to_string()));
                    format!("{} = json(?)", column)
                }
            }
        }

        Filter::Contains(field, needle) => {
            args.push(SqlArg::Text(needle.clone()));
            format!("instr(json_extract(body, {}), ?) > 0", json_path(field))
        }

        Filter::Gte(field, bound) => {
            args.push(SqlArg::Int(*bound));
            format!("json_extract(body, {}) >= ?", json_path(field))
        }

        Filter::Lte(field, bound) => {
            args.push(SqlArg::Int(*bound));
            format!("json_extract(body, {}) <= ?", json_path(field))
        }

        Filter::And(inner) if inner.is_empty() => "1 = 1".to_string(),

        Filter::And(inner) => {
            let parts: Vec<String> = inner.iter().map(|f| filter_sql(f, args)).collect();
            format!("({})", parts.join(" AND "))
        }
    }
}

/// Compiles field updates into a single `json_set(...)` expression.
fn update_sql(updates: &[FieldUpdate], args: &mut Vec<SqlArg>) -> String {
    let mut pairs = Vec::with_capacity(updates.len());

    for update in updates {
        match update {
            FieldUpdate::Set(field, value) => {
                args.push(SqlArg::Text(value.to_string()));
                pairs.push(format!("{}, json(?)", json_path(field)));
            }
            FieldUpdate::Inc(field, delta) => {
                args.push(SqlArg::Int(*delta));
                let path = json_path(field);
                pairs.push(format!(
                    "{}, COALESCE(json_extract(body, {}), 0) + ?",
                    path, path
                ));
            }
        }
    }

    format!("json_set(body, {})", pairs.join(", "))
}

/// Range predicates keeping every `Inc` inside `i64`.
fn inc_guard_sql(updates: &[FieldUpdate], args: &mut Vec<SqlArg>) -> Vec<String> {
    updates
        .iter()
        .filter_map(|update| match *update {
            FieldUpdate::Inc(field, delta) if delta > 0 => {
                args.push(SqlArg::Int(i64::MAX - delta));
                Some(format!("COALESCE(json_extract(body, {}), 0) <= ?", json_path(field)))
            }
            FieldUpdate::Inc(field, delta) if delta < 0 => {
                args.push(SqlArg::Int(i64::MIN - delta));
                Some(format!("COALESCE(json_extract(body, {}), 0) >= ?", json_path(field)))
            }
            _ => None,
        })
        .collect()
}

fn bind_args<'q>(
    mut query: Query<'q, Sqlite, SqliteArguments<'q>>,
    args: Vec<SqlArg>,
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    for arg in args {
        query = match arg {
            SqlArg::Text(s) => query.bind(s),
            SqlArg::Int(i) => query.bind(i),
            SqlArg::Real(f) => query.bind(f),
        };
    }
    query
}

// =============================================================================
// DocumentCollection
// =============================================================================

#[async_trait]
impl<R: Document> DocumentCollection<R> for SqliteCollection<R> {
    async fn filter_by(&self, filter: &Filter) -> DbResult<Vec<R>> {
        let mut args = vec![SqlArg::Text(R::COLLECTION.to_string())];
        let predicate = filter_sql(filter, &mut args);
        let sql = format!(
            "SELECT body FROM documents WHERE collection = ? AND {} ORDER BY rowid",
            predicate
        );

        let rows = bind_args(sqlx::query(&sql), args)
            .fetch_all(&self.pool)
            .await?;

        debug!(collection = R::COLLECTION, count = rows.len(), "Filtered documents");

        rows.iter()
            .map(|row| -> DbResult<R> {
                let body: String = row.try_get("body")?;
                Ok(serde_json::from_str(&body)?)
            })
            .collect()
    }

    async fn insert_one(&self, mut record: R) -> DbResult<String> {
        let id = new_document_id();
        record.set_id(id.clone());
        let body = serde_json::to_string(&record)?;

        sqlx::query("INSERT INTO documents (collection, id, body) VALUES (?1, ?2, ?3)")
            .bind(R::COLLECTION)
            .bind(id.as_str())
            .bind(body)
            .execute(&self.pool)
            .await?;

        debug!(collection = R::COLLECTION, id = %id, "Inserted document");
        Ok(id)
    }

    async fn replace_one(&self, record: &R) -> DbResult<()> {
        let id = record
            .id()
            .ok_or_else(|| DbError::not_found(R::COLLECTION, "<missing _id>"))?;
        let body = serde_json::to_string(record)?;

        let result =
            sqlx::query("UPDATE documents SET body = ?1 WHERE collection = ?2 AND id = ?3")
                .bind(body)
                .bind(R::COLLECTION)
                .bind(id)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(R::COLLECTION, id));
        }

        debug!(collection = R::COLLECTION, id = %id, "Replaced document");
        Ok(())
    }

    async fn update_one(&self, filter: &Filter, updates: &[FieldUpdate]) -> DbResult<u64> {
        if updates.is_empty() {
            return Ok(0);
        }

        let mut args = Vec::new();
        let set_expr = update_sql(updates, &mut args);
        args.push(SqlArg::Text(R::COLLECTION.to_string()));
        let mut predicates = vec![filter_sql(filter, &mut args)];
        predicates.extend(inc_guard_sql(updates, &mut args));
        let predicate = predicates.join(" AND ");

        let sql = format!(
            "UPDATE documents SET body = {} WHERE rowid = (\
                SELECT rowid FROM documents WHERE collection = ? AND {} ORDER BY rowid LIMIT 1\
            )",
            set_expr, predicate
        );

        let result = bind_args(sqlx::query(&sql), args)
            .execute(&self.pool)
            .await?;

        debug!(
            collection = R::COLLECTION,
            matched = result.rows_affected(),
            "Updated document fields"
        );
        Ok(result.rows_affected())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Note {
        #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        title: String,
        hits: i64,
        pinned: bool,
    }

    impl Document for Note {
        const COLLECTION: &'static str = "notes";

        fn id(&self) -> Option<&str> {
            self.id.as_deref()
        }

        fn set_id(&mut self, id: String) {
            self.id = Some(id);
        }
    }

    fn note(title: &str, hits: i64) -> Note {
        Note {
            id: None,
            title: title.to_string(),
            hits,
            pinned: false,
        }
    }

    async fn notes() -> SqliteCollection<Note> {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        SqliteCollection::new(db.pool().clone())
    }

    #[test]
    fn test_filter_sql_compiles_with_args() {
        let mut args = Vec::new();
        let sql = filter_sql(
            &Filter::eq("code", "C1").and(Filter::Gte("stock", 3)),
            &mut args,
        );
        assert_eq!(
            sql,
            "(json_extract(body, '$.code') = ? AND json_extract(body, '$.stock') >= ?)"
        );
        assert_eq!(args, vec![SqlArg::Text("C1".to_string()), SqlArg::Int(3)]);
    }

    #[test]
    fn test_update_sql_compiles_pairs() {
        let mut args = Vec::new();
        let sql = update_sql(
            &[FieldUpdate::set("active", false), FieldUpdate::Inc("stock", -2)],
            &mut args,
        );
        assert_eq!(
            sql,
            "json_set(body, '$.active', json(?), '$.stock', COALESCE(json_extract(body, '$.stock'), 0) + ?)"
        );
        assert_eq!(
            args,
            vec![SqlArg::Text("false".to_string()), SqlArg::Int(-2)]
        );
    }

    #[test]
    fn test_inc_guards_compile_per_direction() {
        let mut args = Vec::new();
        let guards = inc_guard_sql(
            &[
                FieldUpdate::Inc("stock", 3),
                FieldUpdate::set("active", true),
                FieldUpdate::Inc("hits", -2),
            ],
            &mut args,
        );
        assert_eq!(
            guards,
            vec![
                "COALESCE(json_extract(body, '$.stock'), 0) <= ?",
                "COALESCE(json_extract(body, '$.hits'), 0) >= ?",
            ]
        );
        assert_eq!(
            args,
            vec![SqlArg::Int(i64::MAX - 3), SqlArg::Int(i64::MIN + 2)]
        );
    }

    #[tokio::test]
    async fn test_overflowing_increment_matches_nothing() {
        let collection = notes().await;
        collection.insert_one(note("full", i64::MAX)).await.unwrap();

        let matched = collection
            .update_one(&Filter::All, &[FieldUpdate::Inc("hits", 1)])
            .await
            .unwrap();
        assert_eq!(matched, 0);

        let stored = collection.find_one(&Filter::All).await.unwrap().unwrap();
        assert_eq!(stored.hits, i64::MAX);

        let matched = collection
            .update_one(
                &Filter::Lte("hits", i64::MAX),
                &[FieldUpdate::Inc("hits", -1)],
            )
            .await
            .unwrap();
        assert_eq!(matched, 1);
        let stored = collection.find_one(&Filter::All).await.unwrap().unwrap();
        assert_eq!(stored.hits, i64::MAX - 1);
    }

    #[tokio::test]
    async fn test_insert_and_filter_round_trip() {
        let collection = notes().await;
        collection.insert_one(note("alpha", 1)).await.unwrap();
        collection.insert_one(note("beta", 2)).await.unwrap();
        collection.insert_one(note("alphabet", 3)).await.unwrap();

        assert_eq!(collection.count().await.unwrap(), 3);

        let found = collection
            .filter_by(&Filter::contains("title", "alpha"))
            .await
            .unwrap();
        let titles: Vec<_> = found.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, ["alpha", "alphabet"]);
        assert!(found.iter().all(|n| n.id.is_some()));

        let by_bool = collection
            .filter_by(&Filter::eq("pinned", false))
            .await
            .unwrap();
        assert_eq!(by_bool.len(), 3);

        let by_int = collection.filter_by(&Filter::eq("hits", 2)).await.unwrap();
        assert_eq!(by_int.len(), 1);
        assert_eq!(by_int[0].title, "beta");
    }

    #[tokio::test]
    async fn test_contains_is_case_sensitive() {
        let collection = notes().await;
        collection.insert_one(note("Widget", 0)).await.unwrap();

        let lower = collection
            .filter_by(&Filter::contains("title", "widget"))
            .await
            .unwrap();
        assert!(lower.is_empty());
    }

    #[tokio::test]
    async fn test_replace_unknown_id_is_not_found() {
        let collection = notes().await;
        let mut stranger = note("stranger", 0);
        stranger.id = Some("unknown".to_string());

        let err = collection.replace_one(&stranger).await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(collection.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_update_one_sets_and_increments() {
        let collection = notes().await;
        collection.insert_one(note("counter", 5)).await.unwrap();

        let matched = collection
            .update_one(
                &Filter::eq("title", "counter").and(Filter::Gte("hits", 5)),
                &[FieldUpdate::Inc("hits", -5), FieldUpdate::set("pinned", true)],
            )
            .await
            .unwrap();
        assert_eq!(matched, 1);

        let stored = collection.find_one(&Filter::All).await.unwrap().unwrap();
        assert_eq!(stored.hits, 0);
        assert!(stored.pinned);

        // Guard no longer holds
        let matched = collection
            .update_one(
                &Filter::eq("title", "counter").and(Filter::Gte("hits", 1)),
                &[FieldUpdate::Inc("hits", -1)],
            )
            .await
            .unwrap();
        assert_eq!(matched, 0);
    }

    #[tokio::test]
    async fn test_collections_are_isolated() {
        let collection = notes().await;
        collection.insert_one(note("mine", 0)).await.unwrap();

        sqlx::query("INSERT INTO documents (collection, id, body) VALUES ('other', 'x', '{\"title\":\"mine\"}')")
            .execute(&collection.pool)
            .await
            .unwrap();

        let all = collection.filter_by(&Filter::All).await.unwrap();
        assert_eq!(all.len(), 1);
    }
}
