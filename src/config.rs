use std::ops::RangeInclusive;

/// Sales API endpoint. Accepts optional `regiao` and `ano` query parameters.
pub const API_URL: &str = "https://labdados.com/produtos";

/// Date format used by the API for `Data da Compra`.
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// Years the API holds data for (bounds of the year slider).
pub const YEARS: RangeInclusive<i32> = 2020..=2023;

// Default bounds of the raw-data sidebar sliders.
pub const PRICE_BOUNDS: (f64, f64) = (0.0, 5000.0);
pub const FREIGHT_BOUNDS: (f64, f64) = (0.0, 250.0);
pub const RATING_BOUNDS: (i64, i64) = (1, 5);
pub const INSTALLMENT_BOUNDS: (i64, i64) = (1, 24);

/// Allowed range and default for the "top sellers" number input.
pub const SELLER_COUNT_BOUNDS: RangeInclusive<usize> = 2..=10;
pub const DEFAULT_SELLER_COUNT: usize = 5;

/// How many states the "top states" bar charts show.
pub const TOP_STATES: usize = 5;

/// Default base name of the exported CSV file.
pub const DEFAULT_EXPORT_NAME: &str = "dados";

/// Number of encoded CSV payloads kept in memory.
pub const DEFAULT_CSV_CACHE_CAPACITY: usize = 16;

/// Name of the DuckDB table holding one fetch.
pub const SALES_TABLE: &str = "sales";

/// Columns of the sales table, in insertion order, with their DuckDB types.
pub fn table_schema() -> &'static [(&'static str, &'static str)] {
    &[
        ("row_id", "BIGINT"),
        ("product", "VARCHAR"),
        ("category", "VARCHAR"),
        ("price", "DOUBLE"),
        ("freight", "DOUBLE"),
        ("purchase_date", "DATE"),
        ("seller", "VARCHAR"),
        ("purchase_location", "VARCHAR"),
        ("rating", "BIGINT"),
        ("payment_type", "VARCHAR"),
        ("installments", "BIGINT"),
        ("lat", "DOUBLE"),
        ("lon", "DOUBLE"),
    ]
}
