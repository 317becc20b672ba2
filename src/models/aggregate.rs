use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Metric — Which reduction an aggregate is ordered and charted by
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Metric {
    /// Sum of `Preço`.
    Revenue,
    /// Number of sales (count of `Preço`).
    SalesCount,
}

impl Metric {
    /// Alias of the metric column in aggregate queries.
    pub fn column(self) -> &'static str {
        match self {
            Metric::Revenue => "revenue",
            Metric::SalesCount => "sales",
        }
    }

    /// Axis title used by the charts.
    pub fn axis_title(self) -> &'static str {
        match self {
            Metric::Revenue => "Receita",
            Metric::SalesCount => "Quantidade de vendas",
        }
    }
}

/// Implemented by aggregate rows so charts can pick the plotted value.
pub trait MetricValue {
    fn revenue(&self) -> f64;
    fn sales(&self) -> i64;

    fn metric(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Revenue => self.revenue(),
            Metric::SalesCount => self.sales() as f64,
        }
    }
}

macro_rules! impl_metric_value {
    ($($ty:ty),*) => {
        $(impl MetricValue for $ty {
            fn revenue(&self) -> f64 {
                self.revenue
            }
            fn sales(&self) -> i64 {
                self.sales
            }
        })*
    };
}

// ---------------------------------------------------------------------------
// Totals — Whole-table metrics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    pub revenue: f64,
    pub sales: i64,
}

// ---------------------------------------------------------------------------
// StateTotal — Metrics per purchase location, with its coordinates
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateTotal {
    pub state: String,
    /// Latitude of the first sale recorded for the state.
    pub lat: f64,
    /// Longitude of the first sale recorded for the state.
    pub lon: f64,
    pub revenue: f64,
    pub sales: i64,
}

// ---------------------------------------------------------------------------
// MonthlyTotal — Metrics per calendar month
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTotal {
    pub year: i32,
    /// 1-based month number.
    pub month: u32,
    /// English month name ("January", ...), used as the x axis.
    pub month_name: String,
    pub revenue: f64,
    pub sales: i64,
}

// ---------------------------------------------------------------------------
// CategoryTotal / SellerTotal
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    pub revenue: f64,
    pub sales: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SellerTotal {
    pub seller: String,
    pub revenue: f64,
    pub sales: i64,
}

impl_metric_value!(Totals, StateTotal, MonthlyTotal, CategoryTotal, SellerTotal);
