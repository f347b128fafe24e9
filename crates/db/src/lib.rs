use std::collections::HashSet;
use std::path::Path;

use rusqlite::types::ToSql;
use rusqlite::{Connection, OptionalExtension, Row, params, params_from_iter};

use pulse_core::{ColumnRole, Period, ReportDataType, ReportPage};

pub mod error;
mod ident;

pub use error::{DbError, Result};
pub use ident::{PERIOD_COLUMN, column_ident, table_ident};

/// File-backed store holding one physical table per metric set, partitioned
/// by period key. Tables are created lazily from the shape of the first page
/// observed for a metric set.
pub struct Db {
    conn: Connection,
}

impl Db {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        conn.pragma_update(None, "temp_store", "MEMORY")?;
        conn.pragma_update(None, "cache_size", -20_000)?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(Self { conn })
    }

    /// Create the table and unique dimension index for a metric set if they
    /// do not exist yet. Safe to call on every fetch cycle; an existing
    /// schema is left untouched even when the page shape has drifted.
    pub fn ensure_schema(&self, name: &str, page: &ReportPage) -> Result<()> {
        let table = table_ident(name)?;
        let mut columns = vec![format!("{PERIOD_COLUMN} TEXT")];
        let mut index_columns = vec![PERIOD_COLUMN.to_string()];
        for column in &page.columns {
            let ident = column_ident(&column.name)?;
            columns.push(format!("{ident} {}", storage_type(column.data_type)));
            if column.role == ColumnRole::Dimension {
                index_columns.push(ident);
            }
        }
        self.conn.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {table} ({});\n\
             CREATE UNIQUE INDEX IF NOT EXISTS {table}_dimensions ON {table} ({});",
            columns.join(", "),
            index_columns.join(", ")
        ))?;
        Ok(())
    }

    /// Replace every row of a period with the rows of `page`, atomically.
    /// Page columns missing from the physical table are dropped: the schema
    /// is frozen at first sight and never migrated. Within a page, a later
    /// row with the same dimension values wins.
    pub fn replace_period(&mut self, name: &str, period: &Period, page: &ReportPage) -> Result<usize> {
        let table = table_ident(name)?;
        let existing = self.table_columns(table)?;
        let mut kept_names = Vec::new();
        let mut kept_indexes = Vec::new();
        for (index, column) in page.columns.iter().enumerate() {
            let ident = column_ident(&column.name)?;
            if existing.contains(&ident) {
                kept_names.push(ident);
                kept_indexes.push(index);
            }
        }
        let placeholders = vec!["?"; kept_names.len() + 1].join(", ");
        let insert_sql = if kept_names.is_empty() {
            format!("INSERT OR REPLACE INTO {table} ({PERIOD_COLUMN}) VALUES (?)")
        } else {
            format!(
                "INSERT OR REPLACE INTO {table} ({PERIOD_COLUMN}, {}) VALUES ({placeholders})",
                kept_names.join(", ")
            )
        };
        let key = period.key();

        let tx = self.conn.transaction()?;
        let mut inserted = 0usize;
        {
            tx.execute(
                &format!("DELETE FROM {table} WHERE {PERIOD_COLUMN} = ?1"),
                params![key],
            )?;
            let mut stmt = tx.prepare(&insert_sql)?;
            for row in &page.rows {
                if row.len() != page.columns.len() {
                    return Err(DbError::RowShape {
                        expected: page.columns.len(),
                        found: row.len(),
                    });
                }
                let mut values: Vec<&str> = Vec::with_capacity(kept_indexes.len() + 1);
                values.push(key.as_str());
                for &index in &kept_indexes {
                    values.push(row[index].as_str());
                }
                stmt.execute(params_from_iter(values))?;
                inserted += 1;
            }
        }
        tx.commit()?;
        Ok(inserted)
    }

    /// Single-value read for widget queries. `None` when the query matches
    /// no rows or aggregates over an empty set.
    pub fn query_value(&self, sql: &str, params: &[&dyn ToSql]) -> Result<Option<f64>> {
        let value = self
            .conn
            .query_row(sql, params, |row| row.get::<_, Option<f64>>(0))
            .optional()?;
        Ok(value.flatten())
    }

    pub fn query_rows<T, F>(&self, sql: &str, params: &[&dyn ToSql], map: F) -> Result<Vec<T>>
    where
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt
            .query_map(params, map)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn table_columns(&self, table: &str) -> Result<HashSet<String>> {
        let mut stmt = self.conn.prepare(&format!("PRAGMA table_info({table})"))?;
        let mut rows = stmt.query([])?;
        let mut columns = HashSet::new();
        while let Some(row) = rows.next()? {
            columns.insert(row.get::<_, String>(1)?);
        }
        Ok(columns)
    }
}

fn storage_type(data_type: ReportDataType) -> &'static str {
    match data_type {
        ReportDataType::String => "TEXT",
        ReportDataType::Integer => "INTEGER",
        ReportDataType::Percent | ReportDataType::Time => "DECIMAL(3,2)",
        ReportDataType::Float => "REAL",
        ReportDataType::Other => "TEXT",
    }
}
