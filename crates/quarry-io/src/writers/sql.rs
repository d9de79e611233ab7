//! Append rows to an existing SQLite table.
//!
//! One transaction per table: a table is either fully appended or not at
//! all, but earlier tables of the same run are not rolled back.

use rusqlite::types::{ToSql, ToSqlOutput, Value, ValueRef};
use rusqlite::{params_from_iter, Connection};

use quarry_core::types::{RowBatch, Scalar, TIMESTAMP_FORMAT};

use crate::error::Result;
use crate::writers::Sink;

pub struct SqlSink {
    conn: Connection,
}

impl SqlSink {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl Sink for SqlSink {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn append(&mut self, table: &str, batch: &RowBatch) -> Result<usize> {
        if batch.columns.is_empty() {
            return Ok(0);
        }
        let sql = insert_statement(table, &batch.column_names());

        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(&sql)?;
            for r in 0..batch.num_rows() {
                stmt.execute(params_from_iter(batch.row(r).into_iter().map(SqlScalar)))?;
            }
        }
        tx.commit()?;
        Ok(batch.num_rows())
    }
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn insert_statement(table: &str, columns: &[&str]) -> String {
    let cols: Vec<String> = columns.iter().map(|c| quote_ident(c)).collect();
    let placeholders = vec!["?"; columns.len()].join(", ");
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote_ident(table),
        cols.join(", "),
        placeholders
    )
}

struct SqlScalar<'a>(&'a Scalar);

impl ToSql for SqlScalar<'_> {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self.0 {
            Scalar::Null => ToSqlOutput::Borrowed(ValueRef::Null),
            Scalar::I64(i) => ToSqlOutput::Owned(Value::Integer(*i)),
            Scalar::F64(f) => ToSqlOutput::Owned(Value::Real(*f)),
            Scalar::Str(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
            Scalar::Timestamp(ts) => {
                ToSqlOutput::Owned(Value::Text(ts.format(TIMESTAMP_FORMAT).to_string()))
            }
        })
    }
}
