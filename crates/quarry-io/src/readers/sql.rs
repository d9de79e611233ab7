//! Ad-hoc query source. The batch's columns are exactly the result set's.

use rusqlite::types::ValueRef;
use rusqlite::Connection;

use quarry_core::types::{Column, RowBatch, Scalar};

use crate::error::Result;

pub fn read_query(conn: &Connection, sql: &str) -> Result<RowBatch> {
    let mut stmt = conn.prepare(sql)?;
    let names: Vec<String> = stmt.column_names().iter().map(|s| s.to_string()).collect();
    let mut values: Vec<Vec<Scalar>> = vec![Vec::new(); names.len()];

    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        for (i, slot) in values.iter_mut().enumerate() {
            slot.push(match row.get_ref(i)? {
                ValueRef::Null => Scalar::Null,
                ValueRef::Integer(n) => Scalar::I64(n),
                ValueRef::Real(f) => Scalar::F64(f),
                ValueRef::Text(t) => Scalar::Str(String::from_utf8_lossy(t).into_owned()),
                ValueRef::Blob(b) => Scalar::Str(String::from_utf8_lossy(b).into_owned()),
            });
        }
    }

    let columns = names
        .into_iter()
        .zip(values)
        .map(|(name, values)| Column::new(name, values))
        .collect();
    let batch = RowBatch::try_new(columns)?;
    tracing::info!(rows = batch.num_rows(), "source query read");
    Ok(batch)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_set_columns_become_batch_columns() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE movie (movieID INTEGER, movieTitle TEXT, score REAL);
             INSERT INTO movie VALUES (1, 'Heat', 8.5), (2, NULL, NULL);",
        )
        .unwrap();
        let batch = read_query(
            &conn,
            "SELECT movieID AS movieID, movieTitle AS title, score FROM movie ORDER BY movieID",
        )
        .unwrap();
        assert_eq!(batch.column_names(), vec!["movieID", "title", "score"]);
        assert_eq!(
            batch.column("title").unwrap().values,
            vec![Scalar::Str("Heat".into()), Scalar::Null]
        );
        assert_eq!(batch.column("score").unwrap().values[0], Scalar::F64(8.5));
    }

    #[test]
    fn bad_query_is_an_error() {
        let conn = Connection::open_in_memory().unwrap();
        assert!(read_query(&conn, "SELECT * FROM nowhere").is_err());
    }
}
