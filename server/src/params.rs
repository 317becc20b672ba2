//! Query-string decoding for the page routes.
//!
//! Forms submit multiselects as repeated keys, so handlers receive the raw
//! `(key, value)` pairs and the widgets are decoded here. Empty values count
//! as absent.

use chrono::NaiveDate;
use sales_dashboard::config;
use sales_dashboard::{Column, DashboardError, Range, Region, RemoteQuery, Result, SalesFilter};

/// Decoded state of the dashboard sidebar.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardParams {
    pub query: RemoteQuery,
    pub filter: SalesFilter,
    pub seller_count: usize,
}

/// Decoded state of the raw-data sidebar.
#[derive(Debug, Clone, PartialEq)]
pub struct RawParams {
    pub filter: SalesFilter,
    pub columns: Vec<Column>,
    pub file_name: String,
}

struct Pairs<'a>(&'a [(String, String)]);

impl<'a> Pairs<'a> {
    fn all(&self, key: &str) -> Vec<String> {
        self.0
            .iter()
            .filter(|(k, v)| k == key && !v.trim().is_empty())
            .map(|(_, v)| v.trim().to_string())
            .collect()
    }

    fn first(&self, key: &str) -> Option<&'a str> {
        self.0
            .iter()
            .find(|(k, v)| k == key && !v.trim().is_empty())
            .map(|(_, v)| v.trim())
    }

    fn parsed<T: std::str::FromStr>(&self, key: &str) -> Result<Option<T>> {
        self.first(key)
            .map(|raw| {
                raw.parse::<T>().map_err(|_| {
                    DashboardError::InvalidArgument(format!("Invalid value for {}: {}", key, raw))
                })
            })
            .transpose()
    }

    /// A range from `{prefix}_min` / `{prefix}_max`; a missing end falls back
    /// to the widget bound. `None` when neither is given.
    fn range<T>(&self, prefix: &str, bounds: (T, T)) -> Result<Option<Range<T>>>
    where
        T: std::str::FromStr + PartialOrd + Copy,
    {
        let min = self.parsed::<T>(&format!("{}_min", prefix))?;
        let max = self.parsed::<T>(&format!("{}_max", prefix))?;
        if min.is_none() && max.is_none() {
            return Ok(None);
        }
        Ok(Some(Range::new(min.unwrap_or(bounds.0), max.unwrap_or(bounds.1))))
    }
}

/// Decode `/` parameters: `regiao`, `todos_anos`, `ano`, `vendedor`,
/// `qtd_vendedores`.
pub fn dashboard_params(pairs: &[(String, String)]) -> Result<DashboardParams> {
    let p = Pairs(pairs);

    let region = Region::parse(p.first("regiao").unwrap_or(""))?;
    // The "whole period" checkbox wins over the year slider
    let year = if p.first("todos_anos").is_some() {
        None
    } else {
        p.parsed::<i32>("ano")?
    };
    let query = RemoteQuery::new(region, year);
    // Validate the year before any request goes out
    query.query_pairs()?;

    let seller_count = p
        .parsed::<usize>("qtd_vendedores")?
        .unwrap_or(config::DEFAULT_SELLER_COUNT);

    Ok(DashboardParams {
        query,
        filter: SalesFilter {
            sellers: p.all("vendedor"),
            ..Default::default()
        },
        seller_count,
    })
}

/// Decode `/dados-brutos` parameters.
pub fn raw_params(pairs: &[(String, String)]) -> Result<RawParams> {
    let p = Pairs(pairs);

    let columns = p
        .all("coluna")
        .iter()
        .map(|label| {
            Column::from_label(label)
                .ok_or_else(|| DashboardError::InvalidArgument(format!("Unknown column: {}", label)))
        })
        .collect::<Result<Vec<_>>>()?;

    let far_past = NaiveDate::from_ymd_opt(1900, 1, 1)
        .ok_or_else(|| DashboardError::InvalidArgument("bad lower date bound".into()))?;
    let far_future = NaiveDate::from_ymd_opt(2999, 12, 31)
        .ok_or_else(|| DashboardError::InvalidArgument("bad upper date bound".into()))?;

    let filter = SalesFilter {
        products: p.all("produto"),
        categories: p.all("categoria"),
        sellers: p.all("vendedor"),
        locations: p.all("local"),
        payment_types: p.all("pagamento"),
        price: p.range("preco", config::PRICE_BOUNDS)?,
        freight: p.range("frete", config::FREIGHT_BOUNDS)?,
        date: date_range(&p, far_past, far_future)?,
        rating: p.range("avaliacao", config::RATING_BOUNDS)?,
        installments: p.range("parcelas", config::INSTALLMENT_BOUNDS)?,
    };

    Ok(RawParams {
        filter,
        columns,
        file_name: p
            .first("arquivo")
            .unwrap_or(config::DEFAULT_EXPORT_NAME)
            .to_string(),
    })
}

fn date_range(p: &Pairs<'_>, past: NaiveDate, future: NaiveDate) -> Result<Option<Range<NaiveDate>>> {
    let parse = |key: &str| -> Result<Option<NaiveDate>> {
        p.first(key)
            .map(|raw| {
                NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
                    DashboardError::InvalidArgument(format!("Invalid date for {}: {}", key, raw))
                })
            })
            .transpose()
    };
    let start = parse("data_inicio")?;
    let end = parse("data_fim")?;
    if start.is_none() && end.is_none() {
        return Ok(None);
    }
    Ok(Some(Range::new(start.unwrap_or(past), end.unwrap_or(future))))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn dashboard_defaults_to_everything() {
        let params = dashboard_params(&[]).unwrap();
        assert_eq!(params.query, RemoteQuery::default());
        assert!(params.filter.is_empty());
        assert_eq!(params.seller_count, config::DEFAULT_SELLER_COUNT);
    }

    #[test]
    fn dashboard_reads_region_year_and_sellers() {
        let params = dashboard_params(&pairs(&[
            ("regiao", "Sudeste"),
            ("ano", "2021"),
            ("vendedor", "Ana"),
            ("vendedor", "Bia"),
            ("qtd_vendedores", "3"),
        ]))
        .unwrap();
        assert_eq!(params.query.region, Region::Sudeste);
        assert_eq!(params.query.year, Some(2021));
        assert_eq!(params.filter.sellers, vec!["Ana", "Bia"]);
        assert_eq!(params.seller_count, 3);
    }

    #[test]
    fn whole_period_checkbox_overrides_year() {
        let params =
            dashboard_params(&pairs(&[("todos_anos", "on"), ("ano", "2021")])).unwrap();
        assert_eq!(params.query.year, None);
    }

    #[test]
    fn dashboard_rejects_bad_year() {
        assert!(dashboard_params(&pairs(&[("ano", "1999")])).is_err());
        assert!(dashboard_params(&pairs(&[("ano", "abc")])).is_err());
    }

    #[test]
    fn raw_params_fill_missing_range_ends() {
        let params = raw_params(&pairs(&[("preco_max", "100"), ("data_inicio", "2021-01-01")])).unwrap();
        assert_eq!(params.filter.price, Some(Range::new(0.0, 100.0)));
        let date = params.filter.date.unwrap();
        assert_eq!(date.min, NaiveDate::from_ymd_opt(2021, 1, 1).unwrap());
        assert!(params.filter.freight.is_none());
        assert_eq!(params.file_name, "dados");
    }

    #[test]
    fn raw_params_decode_columns_by_label() {
        let params = raw_params(&pairs(&[("coluna", "Produto"), ("coluna", "Preço")])).unwrap();
        assert_eq!(params.columns, vec![Column::Product, Column::Price]);
        assert!(raw_params(&pairs(&[("coluna", "Nope")])).is_err());
    }

    #[test]
    fn empty_values_are_ignored() {
        let params = raw_params(&pairs(&[("produto", ""), ("preco_min", " ")])).unwrap();
        assert!(params.filter.is_empty());
    }
}
