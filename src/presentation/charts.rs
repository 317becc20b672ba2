//! Chart specifications.
//!
//! Builders turn aggregate tables into plotly.js figures (`data` + `layout`
//! JSON). The library never draws anything itself; the server embeds the
//! figures and plotly.js renders them in the browser.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::config::TOP_STATES;
use crate::models::{
    CategoryTotal, Metric, MetricValue, MonthlyTotal, SellerTotal, StateTotal,
};

/// Seaborn-like qualitative palette.
const PALETTE: [&str; 10] = [
    "rgb(76,114,176)",
    "rgb(221,132,82)",
    "rgb(85,168,104)",
    "rgb(196,78,82)",
    "rgb(129,114,179)",
    "rgb(147,120,96)",
    "rgb(218,139,195)",
    "rgb(140,140,140)",
    "rgb(204,185,116)",
    "rgb(100,181,205)",
];

/// One dash style per year series.
const DASHES: [&str; 6] = ["solid", "dot", "dash", "longdash", "dashdot", "longdashdot"];

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Largest marker diameter on the maps, in pixels.
const MAX_MARKER_PX: f64 = 20.0;

// ---------------------------------------------------------------------------
// Chart
// ---------------------------------------------------------------------------

/// A titled plotly figure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chart {
    /// DOM-safe identifier, unique within a page.
    pub id: String,
    pub title: String,
    /// plotly.js figure: `{"data": [...], "layout": {...}}`.
    pub figure: Value,
}

impl Chart {
    fn new(id: &str, title: &str, data: Vec<Value>, mut layout: Value) -> Self {
        layout["title"] = json!({ "text": title });
        layout["colorway"] = json!(PALETTE);
        layout["margin"] = json!({ "l": 50, "r": 20, "t": 50, "b": 50 });
        Self {
            id: id.to_string(),
            title: title.to_string(),
            figure: json!({ "data": data, "layout": layout }),
        }
    }

    /// Traces of the figure.
    pub fn traces(&self) -> &[Value] {
        self.figure["data"].as_array().map(Vec::as_slice).unwrap_or(&[])
    }
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// Bubble map of South America with one marker per state, sized by `metric`.
pub fn state_map(id: &str, title: &str, states: &[StateTotal], metric: Metric) -> Chart {
    let values: Vec<f64> = states.iter().map(|s| s.metric(metric)).collect();
    let max = values.iter().copied().fold(0.0_f64, f64::max);
    let sizeref = if max > 0.0 {
        2.0 * max / (MAX_MARKER_PX * MAX_MARKER_PX)
    } else {
        1.0
    };

    let trace = json!({
        "type": "scattergeo",
        "lat": states.iter().map(|s| s.lat).collect::<Vec<_>>(),
        "lon": states.iter().map(|s| s.lon).collect::<Vec<_>>(),
        "hovertext": states.iter().map(|s| s.state.as_str()).collect::<Vec<_>>(),
        "customdata": values,
        "hovertemplate": format!("<b>%{{hovertext}}</b><br>{}=%{{customdata}}<extra></extra>", metric.axis_title()),
        "marker": {
            "size": values,
            "sizemode": "area",
            "sizeref": sizeref,
            "sizemin": 2,
            "color": PALETTE[0],
        },
        "showlegend": false,
    });
    let layout = json!({
        "geo": {
            "scope": "south america",
            "showland": true,
            "landcolor": "rgb(234,234,242)",
            "showcountries": true,
        },
    });
    Chart::new(id, title, vec![trace], layout)
}

/// Line chart over calendar months with one series per year.
pub fn monthly_line(id: &str, title: &str, months: &[MonthlyTotal], metric: Metric) -> Chart {
    let mut by_year: BTreeMap<i32, (Vec<&str>, Vec<f64>)> = BTreeMap::new();
    for m in months {
        let entry = by_year.entry(m.year).or_default();
        entry.0.push(m.month_name.as_str());
        entry.1.push(m.metric(metric));
    }
    let max = months.iter().map(|m| m.metric(metric)).fold(0.0_f64, f64::max);

    let traces: Vec<Value> = by_year
        .into_iter()
        .enumerate()
        .map(|(i, (year, (x, y)))| {
            json!({
                "type": "scatter",
                "mode": "lines+markers",
                "name": year.to_string(),
                "x": x,
                "y": y,
                "line": {
                    "color": PALETTE[i % PALETTE.len()],
                    "dash": DASHES[i % DASHES.len()],
                },
            })
        })
        .collect();

    // The y axis always starts at zero
    let top = if max > 0.0 { max * 1.05 } else { 1.0 };
    let layout = json!({
        "xaxis": { "title": { "text": "Mes" }, "categoryorder": "array", "categoryarray": MONTHS },
        "yaxis": { "title": { "text": metric.axis_title() }, "range": [0.0, top] },
        "legend": { "title": { "text": "Ano" } },
    });
    Chart::new(id, title, traces, layout)
}

/// Vertical bars for the [`TOP_STATES`] best states by `metric`.
///
/// `states` must already be ordered by `metric` descending.
pub fn top_states_bar(id: &str, title: &str, states: &[StateTotal], metric: Metric) -> Chart {
    let top = &states[..states.len().min(TOP_STATES)];
    let x: Vec<&str> = top.iter().map(|s| s.state.as_str()).collect();
    let y: Vec<f64> = top.iter().map(|s| s.metric(metric)).collect();
    Chart::new(
        id,
        title,
        vec![bar_trace(x, y, "v", metric)],
        json!({
            "xaxis": { "title": { "text": "Local da compra" } },
            "yaxis": { "title": { "text": metric.axis_title() } },
        }),
    )
}

/// Vertical bars with one bar per category.
pub fn category_bar(id: &str, title: &str, categories: &[CategoryTotal], metric: Metric) -> Chart {
    let x: Vec<&str> = categories.iter().map(|c| c.category.as_str()).collect();
    let y: Vec<f64> = categories.iter().map(|c| c.metric(metric)).collect();
    Chart::new(
        id,
        title,
        vec![bar_trace(x, y, "v", metric)],
        json!({
            "showlegend": false,
            "xaxis": { "title": { "text": "Categoria do Produto" } },
            "yaxis": { "title": { "text": metric.axis_title() } },
        }),
    )
}

/// Horizontal bars for the given sellers, best one on top.
pub fn top_sellers_bar(id: &str, title: &str, sellers: &[SellerTotal], metric: Metric) -> Chart {
    let names: Vec<&str> = sellers.iter().map(|s| s.seller.as_str()).collect();
    let values: Vec<f64> = sellers.iter().map(|s| s.metric(metric)).collect();
    Chart::new(
        id,
        title,
        vec![bar_trace(values, names, "h", metric)],
        json!({
            "xaxis": { "title": { "text": metric.axis_title() } },
            "yaxis": { "title": { "text": "Vendedor" }, "autorange": "reversed" },
        }),
    )
}

fn bar_trace<X: Serialize, Y: Serialize>(x: X, y: Y, orientation: &str, metric: Metric) -> Value {
    let value_axis = if orientation == "h" { "x" } else { "y" };
    let number_format = match metric {
        Metric::Revenue => ",.2f",
        Metric::SalesCount => ",d",
    };
    json!({
        "type": "bar",
        "orientation": orientation,
        "x": x,
        "y": y,
        "texttemplate": format!("%{{{}:{}}}", value_axis, number_format),
        "textposition": "auto",
        "marker": { "color": PALETTE[0] },
        "showlegend": false,
    })
}
