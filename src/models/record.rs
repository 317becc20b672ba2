use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{DashboardError, Result};

// ---------------------------------------------------------------------------
// SaleRecord — One sale as returned by the API
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleRecord {
    #[serde(rename = "Produto")]
    pub product: String,
    #[serde(rename = "Categoria do Produto")]
    pub category: String,
    #[serde(rename = "Preço")]
    pub price: f64,
    #[serde(rename = "Frete")]
    pub freight: f64,
    #[serde(rename = "Data da Compra", with = "dmy_date")]
    pub purchase_date: NaiveDate,
    #[serde(rename = "Vendedor")]
    pub seller: String,
    #[serde(rename = "Local da compra")]
    pub purchase_location: String,
    #[serde(rename = "Avaliação da compra")]
    pub rating: i64,
    #[serde(rename = "Tipo de pagamento")]
    pub payment_type: String,
    #[serde(rename = "Quantidade de parcelas")]
    pub installments: i64,
    pub lat: f64,
    pub lon: f64,
}

impl SaleRecord {
    /// Check the record-level invariants: price and freight are finite and
    /// non-negative.
    pub fn validate(&self) -> Result<()> {
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(DashboardError::InvalidData(format!(
                "negative or non-finite price {} for product '{}'",
                self.price, self.product
            )));
        }
        if !self.freight.is_finite() || self.freight < 0.0 {
            return Err(DashboardError::InvalidData(format!(
                "negative or non-finite freight {} for product '{}'",
                self.freight, self.product
            )));
        }
        Ok(())
    }
}

/// `Data da Compra` travels as `dd/mm/yyyy`.
mod dmy_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::config::DATE_FORMAT;

    pub fn serialize<S: Serializer>(date: &NaiveDate, s: S) -> std::result::Result<S::Ok, S::Error> {
        s.serialize_str(&date.format(DATE_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<NaiveDate, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveDate::parse_from_str(&raw, DATE_FORMAT).map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Column — Selectable columns of the sales table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Column {
    Product,
    Category,
    Price,
    Freight,
    PurchaseDate,
    Seller,
    PurchaseLocation,
    Rating,
    PaymentType,
    Installments,
    Lat,
    Lon,
}

impl Column {
    /// Every column, in API order.
    pub const ALL: [Column; 12] = [
        Column::Product,
        Column::Category,
        Column::Price,
        Column::Freight,
        Column::PurchaseDate,
        Column::Seller,
        Column::PurchaseLocation,
        Column::Rating,
        Column::PaymentType,
        Column::Installments,
        Column::Lat,
        Column::Lon,
    ];

    /// Field name used by the API, the table headers and the CSV header.
    pub fn label(self) -> &'static str {
        match self {
            Column::Product => "Produto",
            Column::Category => "Categoria do Produto",
            Column::Price => "Preço",
            Column::Freight => "Frete",
            Column::PurchaseDate => "Data da Compra",
            Column::Seller => "Vendedor",
            Column::PurchaseLocation => "Local da compra",
            Column::Rating => "Avaliação da compra",
            Column::PaymentType => "Tipo de pagamento",
            Column::Installments => "Quantidade de parcelas",
            Column::Lat => "lat",
            Column::Lon => "lon",
        }
    }

    /// Column name in the DuckDB sales table.
    pub fn sql_name(self) -> &'static str {
        match self {
            Column::Product => "product",
            Column::Category => "category",
            Column::Price => "price",
            Column::Freight => "freight",
            Column::PurchaseDate => "purchase_date",
            Column::Seller => "seller",
            Column::PurchaseLocation => "purchase_location",
            Column::Rating => "rating",
            Column::PaymentType => "payment_type",
            Column::Installments => "installments",
            Column::Lat => "lat",
            Column::Lon => "lon",
        }
    }

    /// Look a column up by its label (case-sensitive, as sent by the UI).
    pub fn from_label(label: &str) -> Option<Column> {
        Column::ALL.into_iter().find(|c| c.label() == label)
    }

    /// SELECT expression that reads this column back under its API name,
    /// so rows deserialize straight into [`SaleRecord`].
    pub fn select_expr(self) -> String {
        match self {
            Column::PurchaseDate => format!(
                "strftime({}, '%d/%m/%Y') AS \"{}\"",
                self.sql_name(),
                self.label()
            ),
            _ => format!("{} AS \"{}\"", self.sql_name(), self.label()),
        }
    }

    /// Render the cell of `record` for this column.
    ///
    /// Dates use ISO `YYYY-MM-DD`; floats use the shortest round-trip form.
    pub fn value_of(self, record: &SaleRecord) -> String {
        match self {
            Column::Product => record.product.clone(),
            Column::Category => record.category.clone(),
            Column::Price => record.price.to_string(),
            Column::Freight => record.freight.to_string(),
            Column::PurchaseDate => record.purchase_date.format("%Y-%m-%d").to_string(),
            Column::Seller => record.seller.clone(),
            Column::PurchaseLocation => record.purchase_location.clone(),
            Column::Rating => record.rating.to_string(),
            Column::PaymentType => record.payment_type.clone(),
            Column::Installments => record.installments.to_string(),
            Column::Lat => record.lat.to_string(),
            Column::Lon => record.lon.to_string(),
        }
    }
}
