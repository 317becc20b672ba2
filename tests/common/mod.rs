//! Shared test fixtures for the sales dashboard integration tests.
//!
//! Provides a small, hand-checked sales table in the API's wire format and
//! helpers that load it into an in-memory [`Dataset`].
//!
//! Totals worth knowing when writing assertions:
//!
//! | state | revenue | sales |
//! |-------|---------|-------|
//! | MG    | 1500    | 1     |
//! | SP    | 1350    | 3     |
//! | RJ    | 200     | 1     |
//! | BA    | 100     | 1     |
//!
//! Sales span January 2021 to February 2022 with nothing in February 2021.

#![allow(dead_code)]

use sales_dashboard::source::parse_records;
use sales_dashboard::{Dataset, SaleRecord};

pub const SAMPLE_JSON: &str = r#"[
  {"Produto": "Notebook", "Categoria do Produto": "eletronicos", "Preço": 1000.0, "Frete": 50.0,
   "Data da Compra": "01/01/2021", "Vendedor": "Ana", "Local da compra": "SP",
   "Avaliação da compra": 5, "Tipo de pagamento": "cartao_credito", "Quantidade de parcelas": 10,
   "lat": -23.5, "lon": -46.6},
  {"Produto": "Cadeira", "Categoria do Produto": "moveis", "Preço": 200.0, "Frete": 10.0,
   "Data da Compra": "15/01/2021", "Vendedor": "Bia", "Local da compra": "RJ",
   "Avaliação da compra": 4, "Tipo de pagamento": "boleto", "Quantidade de parcelas": 1,
   "lat": -22.9, "lon": -43.2},
  {"Produto": "Livro", "Categoria do Produto": "livros", "Preço": 50.0, "Frete": 5.0,
   "Data da Compra": "10/03/2021", "Vendedor": "Ana", "Local da compra": "SP",
   "Avaliação da compra": 3, "Tipo de pagamento": "boleto", "Quantidade de parcelas": 1,
   "lat": -23.0, "lon": -46.0},
  {"Produto": "Celular", "Categoria do Produto": "eletronicos", "Preço": 1500.0, "Frete": 30.0,
   "Data da Compra": "05/01/2022", "Vendedor": "Caio", "Local da compra": "MG",
   "Avaliação da compra": 5, "Tipo de pagamento": "cartao_credito", "Quantidade de parcelas": 12,
   "lat": -19.9, "lon": -43.9},
  {"Produto": "Mesa", "Categoria do Produto": "moveis", "Preço": 300.0, "Frete": 20.0,
   "Data da Compra": "20/02/2022", "Vendedor": "Bia", "Local da compra": "SP",
   "Avaliação da compra": 2, "Tipo de pagamento": "cartao_debito", "Quantidade de parcelas": 1,
   "lat": -23.5, "lon": -46.6},
  {"Produto": "Fone", "Categoria do Produto": "eletronicos", "Preço": 100.0, "Frete": 8.0,
   "Data da Compra": "20/02/2022", "Vendedor": "Ana", "Local da compra": "BA",
   "Avaliação da compra": 1, "Tipo de pagamento": "cartao_credito", "Quantidade de parcelas": 2,
   "lat": -12.9, "lon": -38.5}
]"#;

/// The sample records, parsed from [`SAMPLE_JSON`].
pub fn sample_records() -> Vec<SaleRecord> {
    parse_records(SAMPLE_JSON).unwrap()
}

/// The sample records loaded into a fresh dataset.
pub fn sample_dataset() -> Dataset {
    Dataset::from_records(&sample_records()).unwrap()
}

/// A dataset with the sales table created but no rows.
pub fn empty_dataset() -> Dataset {
    Dataset::from_records(&[]).unwrap()
}

/// Approximate float comparison for aggregated revenue.
pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}
