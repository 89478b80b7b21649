// src/store.rs
//! Tabular view of the records and the optional SQLite copy of it.
//!
//! Columns: `name`, `cr`, every statistic key in order of first appearance
//! across the input, then `source_url`. A record without a key gets an empty
//! cell (CSV) or `NULL` (SQLite).

use indexmap::IndexSet;

use crate::record::MonsterRecord;

pub struct DataSet {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Statistic keys in order of first appearance.
pub fn stat_columns(records: &[MonsterRecord]) -> Vec<String> {
    let mut keys: IndexSet<&str> = IndexSet::new();
    for r in records {
        keys.extend(r.stats.keys().map(String::as_str));
    }
    keys.into_iter().map(String::from).collect()
}

impl DataSet {
    pub fn from_records(records: &[MonsterRecord]) -> Self {
        let keys = stat_columns(records);

        let mut headers = Vec::with_capacity(keys.len() + 3);
        headers.push(s!("name"));
        headers.push(s!("cr"));
        headers.extend(keys.iter().cloned());
        headers.push(s!("source_url"));

        let rows = records
            .iter()
            .map(|r| {
                let mut row = Vec::with_capacity(headers.len());
                row.push(r.name.clone());
                row.push(r.cr.to_string());
                row.extend(keys.iter().map(|k| r.get(k).map(|v| v.to_string()).unwrap_or_default()));
                row.push(r.source_url.clone());
                row
            })
            .collect();

        Self { headers, rows }
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// All cells of one column; rows shorter than the header read as empty.
    pub fn column(&self, name: &str) -> Option<Vec<&str>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|r| r.get(idx).map_or("", String::as_str)).collect())
    }
}

#[cfg(feature = "sqlite")]
pub use self::sqlite::save_sqlite;

#[cfg(feature = "sqlite")]
mod sqlite {
    use std::path::Path;

    use rusqlite::types::Value;
    use rusqlite::{params_from_iter, Connection};
    use tracing::info;

    use super::stat_columns;
    use crate::config::consts::SQLITE_TABLE;
    use crate::error::ExportError;
    use crate::file::ensure_directory;
    use crate::record::{MonsterRecord, StatValue};

    fn sql_type(records: &[MonsterRecord], key: &str) -> &'static str {
        match records.iter().find_map(|r| r.get(key)) {
            Some(StatValue::Int(_)) => "INTEGER",
            Some(StatValue::Float(_)) => "REAL",
            _ => "TEXT",
        }
    }

    fn to_sql(v: Option<&StatValue>) -> Value {
        match v {
            Some(StatValue::Int(i)) => Value::Integer(*i),
            Some(StatValue::Float(f)) => Value::Real(*f),
            Some(StatValue::Text(s)) => Value::Text(s.clone()),
            None => Value::Null,
        }
    }

    /// Replace the `monsters` table of the database at `path` with `records`.
    /// Returns the number of rows inserted.
    pub fn save_sqlite(records: &[MonsterRecord], path: &Path) -> Result<usize, ExportError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                ensure_directory(parent)?;
            }
        }

        let keys = stat_columns(records);
        let mut columns = vec![
            s!("\"name\" TEXT PRIMARY KEY NOT NULL"),
            s!("\"cr\" REAL NOT NULL"),
            s!("\"cr_text\" TEXT NOT NULL"),
        ];
        columns.extend(keys.iter().map(|k| format!("\"{k}\" {}", sql_type(records, k))));
        columns.push(s!("\"source_url\" TEXT NOT NULL"));

        let ddl = format!(
            "DROP TABLE IF EXISTS \"{SQLITE_TABLE}\";\nCREATE TABLE \"{SQLITE_TABLE}\" ({});",
            columns.join(", ")
        );

        let names: Vec<String> = ["name", "cr", "cr_text"]
            .into_iter()
            .map(String::from)
            .chain(keys.iter().cloned())
            .chain(std::iter::once(s!("source_url")))
            .map(|c| format!("\"{c}\""))
            .collect();
        let marks = vec!["?"; names.len()].join(", ");
        let insert = format!(
            "INSERT INTO \"{SQLITE_TABLE}\" ({}) VALUES ({marks})",
            names.join(", ")
        );

        let mut conn = Connection::open(path)?;
        let tx = conn.transaction()?;
        tx.execute_batch(&ddl)?;
        {
            let mut stmt = tx.prepare(&insert)?;
            for r in records {
                let mut values = Vec::with_capacity(names.len());
                values.push(Value::Text(r.name.clone()));
                values.push(Value::Real(r.cr.as_f64()));
                values.push(Value::Text(r.cr.to_string()));
                values.extend(keys.iter().map(|k| to_sql(r.get(k))));
                values.push(Value::Text(r.source_url.clone()));
                stmt.execute(params_from_iter(values))?;
            }
        }
        tx.commit()?;

        info!(path = %path.display(), rows = records.len(), "wrote SQLite table");
        Ok(records.len())
    }
}
