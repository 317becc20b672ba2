//! Page view-models: what each page shows, independent of how it is drawn.

use serde::Serialize;

use crate::config::{self, SELLER_COUNT_BOUNDS};
use crate::dataset::Dataset;
use crate::error::Result;
use crate::models::{Column, Metric, RemoteQuery, SalesFilter, Totals};
use crate::presentation::charts::{self, Chart};
use crate::presentation::format::{format_currency, format_number};
use crate::queries::FilterOptions;

// ---------------------------------------------------------------------------
// Panels and tabs
// ---------------------------------------------------------------------------

/// One block inside a column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Panel {
    Metric { label: String, value: String },
    Chart(Chart),
}

impl Panel {
    fn metric(label: &str, value: String) -> Self {
        Panel::Metric {
            label: label.to_string(),
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tab {
    pub title: String,
    /// Side-by-side columns, each a vertical stack of panels.
    pub columns: Vec<Vec<Panel>>,
}

impl Tab {
    /// Charts of every column, left to right.
    pub fn charts(&self) -> impl Iterator<Item = &Chart> {
        self.columns.iter().flatten().filter_map(|p| match p {
            Panel::Chart(c) => Some(c),
            Panel::Metric { .. } => None,
        })
    }
}

/// Clamp a requested top-seller count into the allowed input range.
pub fn clamp_seller_count(n: usize) -> usize {
    n.clamp(*SELLER_COUNT_BOUNDS.start(), *SELLER_COUNT_BOUNDS.end())
}

// ---------------------------------------------------------------------------
// DashboardPage
// ---------------------------------------------------------------------------

/// The main dashboard: revenue, sales-count and sellers tabs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardPage {
    pub title: String,
    pub query: RemoteQuery,
    pub filter: SalesFilter,
    /// Sellers offered by the sidebar multiselect (unaffected by the filter).
    pub seller_options: Vec<String>,
    pub seller_count: usize,
    pub totals: Totals,
    pub tabs: Vec<Tab>,
}

impl DashboardPage {
    /// Build the page for `dataset` narrowed by `filter`, showing the
    /// `seller_count` best sellers (clamped to 2..=10) on the sellers tab.
    pub fn build(
        dataset: &Dataset,
        filter: &SalesFilter,
        seller_count: usize,
    ) -> Result<Self> {
        let seller_count = clamp_seller_count(seller_count);
        let records = dataset.records();
        let aggregates = dataset.aggregates();

        let totals = aggregates.totals(filter)?;
        let revenue = format_currency(totals.revenue);
        let sales = format_number(totals.sales as f64, "");

        let revenue_states = aggregates.by_state(filter, Metric::Revenue)?;
        let sales_states = aggregates.by_state(filter, Metric::SalesCount)?;
        let months = aggregates.by_month(filter)?;
        let revenue_categories = aggregates.by_category(filter, Metric::Revenue)?;
        let sales_categories = aggregates.by_category(filter, Metric::SalesCount)?;
        let revenue_sellers = aggregates.top_sellers(filter, Metric::Revenue, seller_count)?;
        let sales_sellers = aggregates.top_sellers(filter, Metric::SalesCount, seller_count)?;

        let revenue_tab = Tab {
            title: "Receita".to_string(),
            columns: vec![
                vec![
                    Panel::metric("Receita", revenue.clone()),
                    Panel::Chart(charts::state_map(
                        "mapa-receita",
                        "Receita por estado",
                        &revenue_states,
                        Metric::Revenue,
                    )),
                    Panel::Chart(charts::top_states_bar(
                        "receita-estados",
                        "Top estados (receita)",
                        &revenue_states,
                        Metric::Revenue,
                    )),
                ],
                vec![
                    Panel::metric("Quantidade de vendas", sales.clone()),
                    Panel::Chart(charts::monthly_line(
                        "receita-mensal",
                        "Receita mensal",
                        &months,
                        Metric::Revenue,
                    )),
                    Panel::Chart(charts::category_bar(
                        "receita-categorias",
                        "Receita por categoria",
                        &revenue_categories,
                        Metric::Revenue,
                    )),
                ],
            ],
        };

        let sales_tab = Tab {
            title: "Quantidade de vendas".to_string(),
            columns: vec![
                vec![
                    Panel::metric("Receita", revenue.clone()),
                    Panel::Chart(charts::state_map(
                        "mapa-vendas",
                        "Vendas por estado",
                        &sales_states,
                        Metric::SalesCount,
                    )),
                    Panel::Chart(charts::top_states_bar(
                        "vendas-estados",
                        &format!("Top {} estados", config::TOP_STATES),
                        &sales_states,
                        Metric::SalesCount,
                    )),
                ],
                vec![
                    Panel::metric("Quantidade de vendas", sales.clone()),
                    Panel::Chart(charts::monthly_line(
                        "vendas-mensal",
                        "Quantidade de vendas mensal",
                        &months,
                        Metric::SalesCount,
                    )),
                    Panel::Chart(charts::category_bar(
                        "vendas-categorias",
                        "Vendas por categoria",
                        &sales_categories,
                        Metric::SalesCount,
                    )),
                ],
            ],
        };

        let sellers_tab = Tab {
            title: "Vendedores".to_string(),
            columns: vec![
                vec![
                    Panel::metric("Receita", revenue),
                    Panel::Chart(charts::top_sellers_bar(
                        "receita-vendedores",
                        &format!("Top {} vendedores (receita)", seller_count),
                        &revenue_sellers,
                        Metric::Revenue,
                    )),
                ],
                vec![
                    Panel::metric("Quantidade de vendas", sales),
                    Panel::Chart(charts::top_sellers_bar(
                        "vendas-vendedores",
                        &format!("Top {} vendedores (quantidade de vendas)", seller_count),
                        &sales_sellers,
                        Metric::SalesCount,
                    )),
                ],
            ],
        };

        Ok(Self {
            title: "DASHBOARD DE VENDAS".to_string(),
            query: dataset.query().clone(),
            filter: filter.clone(),
            seller_options: records.distinct(Column::Seller)?,
            seller_count,
            totals,
            tabs: vec![revenue_tab, sales_tab, sellers_tab],
        })
    }
}

// ---------------------------------------------------------------------------
// RawTablePage
// ---------------------------------------------------------------------------

/// The raw-data page: the filtered table and its sidebar choices.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawTablePage {
    pub title: String,
    pub selected_columns: Vec<Column>,
    /// Header labels of the selected columns.
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub row_count: usize,
    pub column_count: usize,
    pub summary: String,
    pub options: FilterOptions,
    pub filter: SalesFilter,
}

impl RawTablePage {
    /// Build the page for `dataset` narrowed by `filter`, projected on
    /// `columns`. An empty column selection shows every column.
    pub fn build(dataset: &Dataset, filter: &SalesFilter, columns: &[Column]) -> Result<Self> {
        let columns = selected_columns(columns);
        let records = dataset.records();

        let rows: Vec<Vec<String>> = records
            .list(filter)?
            .iter()
            .map(|r| columns.iter().map(|c| c.value_of(r)).collect())
            .collect();
        let row_count = rows.len();
        let column_count = columns.len();

        Ok(Self {
            title: "DADOS BRUTOS".to_string(),
            headers: columns.iter().map(|c| c.label().to_string()).collect(),
            selected_columns: columns,
            rows,
            row_count,
            column_count,
            summary: format!(
                "A tabela possui {} linhas e {} colunas",
                row_count, column_count
            ),
            options: records.filter_options()?,
            filter: filter.clone(),
        })
    }
}

/// Resolve a column selection, treating an empty one as "all columns".
pub fn selected_columns(columns: &[Column]) -> Vec<Column> {
    if columns.is_empty() {
        Column::ALL.to_vec()
    } else {
        columns.to_vec()
    }
}
