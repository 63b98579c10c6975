use super::ensure_not_empty;
use crate::errors::{AppError, AppResult};
use crate::models::ExistingTablePolicy;
use crate::table::{column_names, table_rows};
use polars::prelude::{DataFrame, DataType};
use rusqlite::types::Value as SqlValue;
use rusqlite::{params_from_iter, Connection};
use serde_json::Value;
use tracing::{debug, error, info};

/// Writes the table into `table_name` on a caller-owned SQLite connection.
///
/// `if_exists` decides what happens when the table is already there: `Fail`
/// returns `TableExists`, `Replace` drops and recreates it, `Append` inserts into
/// it. All statements run in one transaction; the connection is not closed.
///
/// # Errors
///
/// `EmptyInput` for an empty table (before the connection is used),
/// `TableExists`, or the SQLite error.
pub fn export_to_sql(
    df: &DataFrame,
    conn: &Connection,
    table_name: &str,
    if_exists: ExistingTablePolicy,
) -> AppResult<()> {
    ensure_not_empty(df, "SQL")?;

    write_table(df, conn, table_name, if_exists).map_err(|e| {
        error!(
            table = table_name,
            policy = if_exists.as_str(),
            error = %e,
            "Failed to export table to SQL"
        );
        e
    })?;

    info!(
        table = table_name,
        rows = df.height(),
        policy = if_exists.as_str(),
        "Table exported to SQL"
    );
    Ok(())
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn sql_type(dtype: &DataType) -> &'static str {
    match dtype {
        DataType::Boolean
        | DataType::Int32
        | DataType::Int64
        | DataType::UInt32
        | DataType::UInt64 => "INTEGER",
        DataType::Float32 | DataType::Float64 => "REAL",
        _ => "TEXT",
    }
}

fn to_sql_value(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
        Value::Number(n) => match n.as_i64() {
            Some(i) => SqlValue::Integer(i),
            None => n.as_f64().map(SqlValue::Real).unwrap_or(SqlValue::Null),
        },
        Value::String(s) => SqlValue::Text(s.clone()),
        other => SqlValue::Text(other.to_string()),
    }
}

fn table_exists(conn: &Connection, table_name: &str) -> AppResult<bool> {
    let mut stmt = conn.prepare("SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1")?;
    Ok(stmt.exists([table_name])?)
}

fn create_table(conn: &Connection, df: &DataFrame, table_name: &str) -> AppResult<()> {
    let columns = df
        .get_columns()
        .iter()
        .map(|s| format!("{} {}", quote_identifier(s.name()), sql_type(s.dtype())))
        .collect::<Vec<_>>()
        .join(", ");
    conn.execute_batch(&format!(
        "CREATE TABLE {} ({columns})",
        quote_identifier(table_name)
    ))?;
    Ok(())
}

fn write_table(
    df: &DataFrame,
    conn: &Connection,
    table_name: &str,
    if_exists: ExistingTablePolicy,
) -> AppResult<()> {
    let tx = conn.unchecked_transaction()?;
    let exists = table_exists(&tx, table_name)?;

    match (exists, if_exists) {
        (true, ExistingTablePolicy::Fail) => {
            return Err(AppError::TableExists(table_name.to_string()));
        }
        (true, ExistingTablePolicy::Replace) => {
            debug!(table = table_name, "Dropping existing table");
            tx.execute_batch(&format!("DROP TABLE {}", quote_identifier(table_name)))?;
            create_table(&tx, df, table_name)?;
        }
        (true, ExistingTablePolicy::Append) => {}
        (false, _) => create_table(&tx, df, table_name)?,
    }

    let names = column_names(df);
    let quoted = names
        .iter()
        .map(|n| quote_identifier(n))
        .collect::<Vec<_>>()
        .join(", ");
    let placeholders = (1..=names.len())
        .map(|i| format!("?{i}"))
        .collect::<Vec<_>>()
        .join(", ");
    let insert = format!(
        "INSERT INTO {} ({quoted}) VALUES ({placeholders})",
        quote_identifier(table_name)
    );

    {
        let mut stmt = tx.prepare(&insert)?;
        for row in table_rows(df)? {
            stmt.execute(params_from_iter(row.iter().map(to_sql_value)))?;
        }
    }

    tx.commit()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::df;

    fn people() -> DataFrame {
        df!(
            "Name" => ["Alice", "Bob"],
            "Age" => [Some(25i64), None],
            "Score" => [1.5f64, 2.0],
            "Active" => [true, false]
        )
        .unwrap()
    }

    fn count(conn: &Connection, table: &str) -> i64 {
        conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))
            .unwrap()
    }

    #[test]
    fn creates_table_with_typed_columns() {
        let conn = Connection::open_in_memory().unwrap();
        export_to_sql(&people(), &conn, "people", ExistingTablePolicy::Replace).unwrap();

        assert_eq!(count(&conn, "people"), 2);
        let (name, age, score, active): (String, Option<i64>, f64, i64) = conn
            .query_row(
                "SELECT Name, Age, Score, Active FROM people ORDER BY rowid LIMIT 1",
                [],
                |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?)),
            )
            .unwrap();
        assert_eq!(name, "Alice");
        assert_eq!(age, Some(25));
        assert_eq!(score, 1.5);
        assert_eq!(active, 1);
    }

    #[test]
    fn existing_table_policies() {
        let conn = Connection::open_in_memory().unwrap();
        export_to_sql(&people(), &conn, "people", ExistingTablePolicy::Fail).unwrap();

        let err = export_to_sql(&people(), &conn, "people", ExistingTablePolicy::Fail).unwrap_err();
        assert!(matches!(err, AppError::TableExists(ref t) if t == "people"));
        assert_eq!(count(&conn, "people"), 2);

        export_to_sql(&people(), &conn, "people", ExistingTablePolicy::Append).unwrap();
        assert_eq!(count(&conn, "people"), 4);

        export_to_sql(&people(), &conn, "people", ExistingTablePolicy::Replace).unwrap();
        assert_eq!(count(&conn, "people"), 2);
    }

    #[test]
    fn empty_table_is_rejected_before_touching_connection() {
        let conn = Connection::open_in_memory().unwrap();
        let result = export_to_sql(
            &DataFrame::default(),
            &conn,
            "people",
            ExistingTablePolicy::Replace,
        );
        assert!(matches!(result, Err(AppError::EmptyInput(_))));
        assert!(!table_exists(&conn, "people").unwrap());
    }

    #[test]
    fn identifiers_are_quoted() {
        let conn = Connection::open_in_memory().unwrap();
        let df = df!("Details.Age" => [1i64], "select" => ["x"]).unwrap();
        export_to_sql(&df, &conn, "odd \"name\"", ExistingTablePolicy::Replace).unwrap();
        assert!(table_exists(&conn, "odd \"name\"").unwrap());
    }
}
