//! CSV export, the CSV memo, response parsing and request parameters.

mod common;

use sales_dashboard::export::{csv_file_name, encode_csv};
use sales_dashboard::source::parse_records;
use sales_dashboard::{
    Column, CsvCache, DashboardError, Region, RemoteQuery, SalesDashboard, SalesFilter,
};

fn read_csv(bytes: &[u8]) -> (Vec<String>, Vec<Vec<String>>) {
    let mut reader = csv::Reader::from_reader(bytes);
    let headers = reader.headers().unwrap().iter().map(String::from).collect();
    let rows = reader
        .records()
        .map(|r| r.unwrap().iter().map(String::from).collect())
        .collect();
    (headers, rows)
}

// ---------------------------------------------------------------------------
// encode_csv
// ---------------------------------------------------------------------------

#[test]
fn csv_has_label_header_and_one_line_per_record() {
    let records = common::sample_records();
    let bytes = encode_csv(&records, &Column::ALL).unwrap();
    let (headers, rows) = read_csv(&bytes);

    assert_eq!(headers.len(), 12);
    assert_eq!(headers[0], "Produto");
    assert_eq!(headers[2], "Preço");
    assert_eq!(rows.len(), records.len());
    assert_eq!(rows[0][0], "Notebook");
    assert_eq!(rows[0][4], "2021-01-01");
}

#[test]
fn csv_projects_selected_columns_in_order() {
    let records = common::sample_records();
    let bytes = encode_csv(&records, &[Column::Seller, Column::Price]).unwrap();
    let (headers, rows) = read_csv(&bytes);

    assert_eq!(headers, ["Vendedor", "Preço"]);
    assert_eq!(rows[3], ["Caio", "1500"]);
}

#[test]
fn csv_of_no_records_is_header_only() {
    let bytes = encode_csv(&[], &[Column::Product]).unwrap();
    assert_eq!(String::from_utf8(bytes).unwrap().trim_end(), "Produto");
}

#[test]
fn csv_with_no_columns_is_empty() {
    let bytes = encode_csv(&common::sample_records(), &[]).unwrap();
    assert!(bytes.is_empty());
}

// ---------------------------------------------------------------------------
// csv_file_name
// ---------------------------------------------------------------------------

#[test]
fn file_name_gets_a_single_csv_suffix() {
    assert_eq!(csv_file_name("vendas"), "vendas.csv");
    assert_eq!(csv_file_name("vendas.csv"), "vendas.csv");
    assert_eq!(csv_file_name("vendas.CSV"), "vendas.csv");
    assert_eq!(csv_file_name("  relatório  "), "relatório.csv");
}

#[test]
fn file_name_defaults_and_strips_unsafe_characters() {
    assert_eq!(csv_file_name(""), "dados.csv");
    assert_eq!(csv_file_name(".csv"), "dados.csv");
    assert_eq!(csv_file_name("a/b\"c"), "abc.csv");
    // Multi-byte tail must not panic
    assert_eq!(csv_file_name("ção"), "ção.csv");
}

// ---------------------------------------------------------------------------
// CsvCache
// ---------------------------------------------------------------------------

#[test]
fn cache_reuses_identical_content() {
    let records = common::sample_records();
    let mut cache = CsvCache::new(4);

    let first = cache.get_or_encode(&records, &Column::ALL).unwrap();
    let second = cache.get_or_encode(&records, &Column::ALL).unwrap();
    assert!(std::sync::Arc::ptr_eq(&first, &second));
    assert_eq!(cache.stats(), (1, 1));

    cache.get_or_encode(&records, &[Column::Product]).unwrap();
    assert_eq!(cache.stats(), (1, 2));
    assert_eq!(cache.len(), 2);
}

#[test]
fn cache_evicts_least_recently_used() {
    let records = common::sample_records();
    let mut cache = CsvCache::new(1);

    cache.get_or_encode(&records, &[Column::Product]).unwrap();
    cache.get_or_encode(&records, &[Column::Seller]).unwrap();
    cache.get_or_encode(&records, &[Column::Product]).unwrap();
    assert_eq!(cache.stats(), (0, 3));
    assert_eq!(cache.len(), 1);

    cache.clear();
    assert!(cache.is_empty());
}

#[test]
fn dashboard_export_uses_filter_and_memo() {
    let dash = SalesDashboard::builder().csv_cache_capacity(2).build().unwrap();
    let data = common::sample_dataset();
    let filter = SalesFilter {
        sellers: vec!["Ana".into()],
        ..Default::default()
    };

    let bytes = dash.export_csv(&data, &filter, &[]).unwrap();
    let (headers, rows) = read_csv(&bytes);
    assert_eq!(headers.len(), 12);
    assert_eq!(rows.len(), 3);

    dash.export_csv(&data, &filter, &[]).unwrap();
    assert_eq!(dash.csv_cache_stats(), (1, 1));
}

// ---------------------------------------------------------------------------
// parse_records
// ---------------------------------------------------------------------------

#[test]
fn parse_reads_wire_field_names() {
    let records = common::sample_records();
    assert_eq!(records.len(), 6);
    assert_eq!(records[0].category, "eletronicos");
    assert_eq!(records[0].purchase_date.to_string(), "2021-01-01");
    assert_eq!(records[3].installments, 12);
}

#[test]
fn parse_accepts_an_empty_array() {
    assert!(parse_records("[]").unwrap().is_empty());
}

#[test]
fn parse_rejects_non_arrays() {
    let err = parse_records(r#"{"detail": "not found"}"#).unwrap_err();
    assert!(matches!(err, DashboardError::InvalidData(_)));
}

#[test]
fn parse_rejects_malformed_records() {
    assert!(matches!(
        parse_records(r#"[{"Produto": "x"}]"#).unwrap_err(),
        DashboardError::Json(_)
    ));

    let bad_date = common::SAMPLE_JSON.replacen("01/01/2021", "2021-01-01", 1);
    assert!(parse_records(&bad_date).is_err());
}

#[test]
fn parse_rejects_negative_prices() {
    let negative = common::SAMPLE_JSON.replacen("\"Preço\": 200.0", "\"Preço\": -200.0", 1);
    let err = parse_records(&negative).unwrap_err();
    assert!(matches!(err, DashboardError::InvalidData(_)));
}

// ---------------------------------------------------------------------------
// Region / RemoteQuery
// ---------------------------------------------------------------------------

#[test]
fn region_parses_labels_case_insensitively() {
    assert_eq!(Region::parse("Sudeste").unwrap(), Region::Sudeste);
    assert_eq!(Region::parse("centro-oeste").unwrap(), Region::CentroOeste);
    assert_eq!(Region::parse("").unwrap(), Region::Brasil);
    assert!(Region::parse("Atlântida").is_err());
}

#[test]
fn remote_query_sends_wildcards_as_empty_strings() {
    let pairs = RemoteQuery::default().query_pairs().unwrap();
    assert_eq!(
        pairs,
        vec![("regiao", String::new()), ("ano", String::new())]
    );

    let pairs = RemoteQuery::new(Region::CentroOeste, Some(2022))
        .query_pairs()
        .unwrap();
    assert_eq!(
        pairs,
        vec![("regiao", "centro-oeste".to_string()), ("ano", "2022".to_string())]
    );
}

#[test]
fn remote_query_rejects_years_outside_the_slider() {
    assert!(RemoteQuery::new(Region::Sul, Some(2019)).query_pairs().is_err());
    assert!(RemoteQuery::new(Region::Sul, Some(2024)).query_pairs().is_err());
    assert!(RemoteQuery::new(Region::Sul, Some(2020)).query_pairs().is_ok());
}

#[test]
fn builder_rejects_empty_base_url() {
    assert!(SalesDashboard::builder().base_url("  ").build().is_err());
    let dash = SalesDashboard::builder()
        .base_url("http://localhost:1/produtos")
        .build()
        .unwrap();
    assert_eq!(dash.base_url(), "http://localhost:1/produtos");
}
