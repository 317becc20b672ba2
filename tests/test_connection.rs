//! Connection integration tests: record loading and raw SQL execution.

mod common;

use sales_dashboard::{Connection, DashboardError};

fn sample_conn() -> Connection {
    let conn = Connection::new().unwrap();
    conn.load_records(&common::sample_records()).unwrap();
    conn
}

// ---------------------------------------------------------------------------
// load_records
// ---------------------------------------------------------------------------

#[test]
fn load_records_creates_sales_table() {
    let conn = sample_conn();
    assert!(conn.has_table("sales"));

    let n = conn.execute_scalar("SELECT COUNT(*) FROM sales", &[]).unwrap();
    assert_eq!(n.unwrap().as_i64().unwrap(), 6);
}

#[test]
fn load_records_keeps_fetch_order_in_row_id() {
    let conn = sample_conn();

    let rows = conn
        .execute("SELECT row_id, product FROM sales ORDER BY row_id", &[])
        .unwrap();
    let products: Vec<&str> = rows.iter().map(|r| r["product"].as_str().unwrap()).collect();
    assert_eq!(products, ["Notebook", "Cadeira", "Livro", "Celular", "Mesa", "Fone"]);
    assert_eq!(rows[0]["row_id"], 0);
    assert_eq!(rows[5]["row_id"], 5);
}

#[test]
fn load_records_types_dates_as_dates() {
    let conn = sample_conn();

    let first = conn
        .execute_scalar("SELECT MIN(purchase_date) FROM sales", &[])
        .unwrap()
        .unwrap();
    assert_eq!(first, "2021-01-01");
}

#[test]
fn load_records_with_no_rows_creates_empty_table() {
    let conn = Connection::new().unwrap();
    conn.load_records(&[]).unwrap();

    assert!(conn.has_table("sales"));
    let n = conn.execute_scalar("SELECT COUNT(*) FROM sales", &[]).unwrap();
    assert_eq!(n.unwrap().as_i64().unwrap(), 0);
}

#[test]
fn load_records_replaces_previous_rows() {
    let conn = sample_conn();
    let records = common::sample_records();
    conn.load_records(&records[..2]).unwrap();

    let n = conn.execute_scalar("SELECT COUNT(*) FROM sales", &[]).unwrap();
    assert_eq!(n.unwrap().as_i64().unwrap(), 2);
}

// ---------------------------------------------------------------------------
// execute
// ---------------------------------------------------------------------------

#[test]
fn execute_with_params() {
    let conn = sample_conn();

    let rows = conn
        .execute(
            "SELECT * FROM sales WHERE seller = ?",
            &["Ana".to_string()],
        )
        .unwrap();
    assert_eq!(rows.len(), 3);
}

#[test]
fn execute_returns_empty_for_no_matches() {
    let conn = sample_conn();

    let rows = conn
        .execute(
            "SELECT * FROM sales WHERE seller = ?",
            &["Nobody".to_string()],
        )
        .unwrap();
    assert!(rows.is_empty());
}

#[test]
fn execute_into_deserializes_rows() {
    #[derive(serde::Deserialize)]
    struct Row {
        seller: String,
        total: f64,
    }

    let conn = sample_conn();
    let rows: Vec<Row> = conn
        .execute_into(
            "SELECT seller, SUM(price) AS total FROM sales GROUP BY seller ORDER BY seller",
            &[],
        )
        .unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].seller, "Ana");
    common::assert_close(rows[0].total, 1150.0);
}

// ---------------------------------------------------------------------------
// execute_scalar
// ---------------------------------------------------------------------------

#[test]
fn execute_scalar_returns_none_for_empty_result() {
    let conn = sample_conn();

    let result = conn
        .execute_scalar(
            "SELECT product FROM sales WHERE seller = ?",
            &["Nobody".to_string()],
        )
        .unwrap();
    assert!(result.is_none());
}

// ---------------------------------------------------------------------------
// ensure_table / has_table
// ---------------------------------------------------------------------------

#[test]
fn ensure_table_reports_missing_table() {
    let conn = Connection::new().unwrap();
    match conn.ensure_table("sales") {
        Err(DashboardError::NotFound(msg)) => assert!(msg.contains("sales")),
        other => panic!("expected NotFound, got {:?}", other),
    }
}

#[test]
fn fresh_connection_has_no_tables() {
    let conn = Connection::new().unwrap();
    assert!(!conn.has_table("sales"));
    assert!(conn.ensure_table("sales").is_err());
}
