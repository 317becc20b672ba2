use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config;
use crate::error::{DashboardError, Result};
use crate::models::Column;
use crate::sql_builder::SqlBuilder;

// ---------------------------------------------------------------------------
// Region — Server-side filter understood by the API
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Region {
    /// The whole country; sent to the API as an empty `regiao`.
    #[default]
    Brasil,
    CentroOeste,
    Nordeste,
    Norte,
    Sudeste,
    Sul,
}

impl Region {
    pub const ALL: [Region; 6] = [
        Region::Brasil,
        Region::CentroOeste,
        Region::Nordeste,
        Region::Norte,
        Region::Sudeste,
        Region::Sul,
    ];

    /// Display name, as listed in the region select box.
    pub fn label(self) -> &'static str {
        match self {
            Region::Brasil => "Brasil",
            Region::CentroOeste => "Centro-Oeste",
            Region::Nordeste => "Nordeste",
            Region::Norte => "Norte",
            Region::Sudeste => "Sudeste",
            Region::Sul => "Sul",
        }
    }

    /// Value of the `regiao` query parameter. The API only accepts lowercase
    /// names and treats an empty value as "all regions".
    pub fn query_value(self) -> String {
        match self {
            Region::Brasil => String::new(),
            other => other.label().to_lowercase(),
        }
    }

    /// Parse a region from its label or query value (case-insensitive).
    /// An empty string means [`Region::Brasil`].
    pub fn parse(s: &str) -> Result<Region> {
        let wanted = s.trim().to_lowercase();
        if wanted.is_empty() {
            return Ok(Region::Brasil);
        }
        Region::ALL
            .into_iter()
            .find(|r| r.label().to_lowercase() == wanted)
            .ok_or_else(|| DashboardError::InvalidArgument(format!("Unknown region: {}", s)))
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// RemoteQuery — Parameters sent with the GET request
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteQuery {
    pub region: Region,
    /// `None` requests every year.
    pub year: Option<i32>,
}

impl RemoteQuery {
    pub fn new(region: Region, year: Option<i32>) -> Self {
        Self { region, year }
    }

    /// Build the `regiao` / `ano` query pairs. Wildcards are sent as empty
    /// strings.
    pub fn query_pairs(&self) -> Result<Vec<(&'static str, String)>> {
        let ano = match self.year {
            None => String::new(),
            Some(y) if config::YEARS.contains(&y) => y.to_string(),
            Some(y) => {
                return Err(DashboardError::InvalidArgument(format!(
                    "Year {} outside {}..={}",
                    y,
                    config::YEARS.start(),
                    config::YEARS.end()
                )))
            }
        };
        Ok(vec![("regiao", self.region.query_value()), ("ano", ano)])
    }
}

// ---------------------------------------------------------------------------
// Range — Inclusive bounds for a range filter
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range<T> {
    pub min: T,
    pub max: T,
}

impl<T: PartialOrd + Copy> Range<T> {
    pub fn new(min: T, max: T) -> Self {
        Self { min, max }
    }

    /// Whether `value` lies within the bounds (both ends inclusive).
    pub fn contains(&self, value: T) -> bool {
        self.min <= value && value <= self.max
    }
}

// ---------------------------------------------------------------------------
// SalesFilter — Client-side predicates over the fetched table
// ---------------------------------------------------------------------------

/// Conjunction of optional predicates over the sales table.
///
/// Empty sets and `None` ranges impose no restriction, so
/// `SalesFilter::default()` selects every row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SalesFilter {
    pub sellers: Vec<String>,
    pub products: Vec<String>,
    pub categories: Vec<String>,
    pub locations: Vec<String>,
    pub payment_types: Vec<String>,
    pub price: Option<Range<f64>>,
    pub freight: Option<Range<f64>>,
    pub date: Option<Range<NaiveDate>>,
    pub rating: Option<Range<i64>>,
    pub installments: Option<Range<i64>>,
}

impl SalesFilter {
    /// True when no predicate is active.
    pub fn is_empty(&self) -> bool {
        *self == SalesFilter::default()
    }

    /// Add one WHERE conjunct per active predicate to `qb`.
    pub fn apply(&self, qb: &mut SqlBuilder) -> Result<()> {
        where_members(qb, Column::Seller, &self.sellers);
        where_members(qb, Column::Product, &self.products);
        where_members(qb, Column::Category, &self.categories);
        where_members(qb, Column::PurchaseLocation, &self.locations);
        where_members(qb, Column::PaymentType, &self.payment_types);

        where_range(qb, Column::Price, self.price.as_ref(), "DOUBLE")?;
        where_range(qb, Column::Freight, self.freight.as_ref(), "DOUBLE")?;
        where_range(qb, Column::PurchaseDate, self.date.as_ref(), "DATE")?;
        where_range(qb, Column::Rating, self.rating.as_ref(), "BIGINT")?;
        where_range(qb, Column::Installments, self.installments.as_ref(), "BIGINT")?;
        Ok(())
    }
}

fn where_members(qb: &mut SqlBuilder, column: Column, values: &[String]) {
    // An empty selection is a wildcard, not an empty IN list
    if values.is_empty() {
        return;
    }
    let refs: Vec<&str> = values.iter().map(String::as_str).collect();
    qb.where_in(column.sql_name(), &refs);
}

fn where_range<T>(
    qb: &mut SqlBuilder,
    column: Column,
    range: Option<&Range<T>>,
    sql_type: &str,
) -> Result<()>
where
    T: PartialOrd + fmt::Display,
{
    let Some(range) = range else {
        return Ok(());
    };
    if range.min > range.max {
        return Err(DashboardError::InvalidArgument(format!(
            "Empty range for {}: {} > {}",
            column.label(),
            range.min,
            range.max
        )));
    }
    qb.where_between(
        column.sql_name(),
        &range.min.to_string(),
        &range.max.to_string(),
        sql_type,
    );
    Ok(())
}
