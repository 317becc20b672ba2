//! HTML rendering of the page view-models.
//!
//! Pages are plain server-rendered HTML. Sidebar widgets are GET forms, and
//! charts are drawn client-side by plotly.js from the figure JSON embedded
//! in each page.

use std::fmt::Write as _;

use sales_dashboard::config;
use sales_dashboard::presentation::{Chart, DashboardPage, Panel, RawTablePage};
use sales_dashboard::{Column, Region};

const PLOTLY_JS: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

const STYLE: &str = r#"
body { margin: 0; font-family: sans-serif; display: flex; min-height: 100vh; }
nav.sidebar { width: 280px; padding: 1rem; background: #f0f2f6; box-sizing: border-box; }
nav.sidebar label { display: block; margin-top: .8rem; font-weight: 600; }
nav.sidebar select, nav.sidebar input { width: 100%; box-sizing: border-box; }
nav.sidebar details { margin-top: .6rem; }
main { flex: 1; padding: 1rem 2rem; overflow-x: auto; }
.pages a { margin-right: 1rem; }
.tabs button { padding: .4rem 1rem; border: none; background: none; cursor: pointer; }
.tabs button.active { border-bottom: 3px solid #ff4b4b; }
.tab { display: none; }
.tab.active { display: block; }
.columns { display: flex; gap: 2rem; }
.column { flex: 1; min-width: 0; }
.metric .label { color: #555; }
.metric .value { font-size: 2rem; }
table { border-collapse: collapse; font-size: .85rem; }
th, td { border: 1px solid #ddd; padding: .25rem .5rem; }
"#;

const TAB_SCRIPT: &str = r#"
function showTab(i) {
  document.querySelectorAll('.tab').forEach((t, j) => t.classList.toggle('active', i === j));
  document.querySelectorAll('.tabs button').forEach((b, j) => b.classList.toggle('active', i === j));
  window.dispatchEvent(new Event('resize'));
}
"#;

/// Escape text for element content and attribute values.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Serialize JSON for embedding inside a `<script>` element.
fn script_json(value: &serde_json::Value) -> String {
    value.to_string().replace("</", "<\\/")
}

fn document(title: &str, sidebar: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"pt-BR\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n<script src=\"{PLOTLY_JS}\"></script>\n\
         <style>{STYLE}</style>\n<script>{TAB_SCRIPT}</script>\n</head>\n<body>\n\
         <nav class=\"sidebar\">\n<h2>Filtros</h2>\n{sidebar}</nav>\n<main>\n\
         <div class=\"pages\"><a href=\"/\">Dashboard</a><a href=\"/dados-brutos\">Dados brutos</a></div>\n\
         {body}</main>\n</body>\n</html>\n",
        title = escape(title),
    )
}

fn options<'a>(values: impl IntoIterator<Item = &'a String>, selected: &[String]) -> String {
    let mut out = String::new();
    for v in values {
        let mark = if selected.contains(v) { " selected" } else { "" };
        let _ = write!(out, "<option value=\"{0}\"{1}>{0}</option>", escape(v), mark);
    }
    out
}

fn chart(c: &Chart) -> String {
    format!(
        "<div class=\"chart\" id=\"{id}\"></div>\n<script>(function(){{\
         var fig = {fig}; Plotly.newPlot(\"{id}\", fig.data, fig.layout, {{responsive: true}});\
         }})();</script>\n",
        id = escape(&c.id),
        fig = script_json(&c.figure),
    )
}

fn panel(p: &Panel) -> String {
    match p {
        Panel::Metric { label, value } => format!(
            "<div class=\"metric\"><div class=\"label\">{}</div><div class=\"value\">{}</div></div>\n",
            escape(label),
            escape(value)
        ),
        Panel::Chart(c) => chart(c),
    }
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

/// Render the main dashboard page.
pub fn dashboard(page: &DashboardPage) -> String {
    let mut sidebar = String::from("<form method=\"get\" action=\"/\">\n");

    sidebar.push_str("<label for=\"regiao\">Região</label><select id=\"regiao\" name=\"regiao\">");
    for region in Region::ALL {
        let mark = if region == page.query.region { " selected" } else { "" };
        let _ = write!(
            sidebar,
            "<option value=\"{0}\"{1}>{0}</option>",
            escape(region.label()),
            mark
        );
    }
    sidebar.push_str("</select>\n");

    let all_years = page.query.year.is_none();
    let _ = write!(
        sidebar,
        "<label><input type=\"checkbox\" name=\"todos_anos\"{}> Dados de todo o período</label>\n\
         <label for=\"ano\">Ano</label><input id=\"ano\" type=\"range\" name=\"ano\" min=\"{}\" max=\"{}\" value=\"{}\" \
         oninput=\"this.nextElementSibling.textContent=this.value\"><output>{}</output>\n",
        if all_years { " checked" } else { "" },
        config::YEARS.start(),
        config::YEARS.end(),
        page.query.year.unwrap_or(*config::YEARS.start()),
        page.query.year.unwrap_or(*config::YEARS.start()),
    );

    let _ = write!(
        sidebar,
        "<label for=\"vendedor\">Vendedores</label><select id=\"vendedor\" name=\"vendedor\" multiple size=\"8\">{}</select>\n",
        options(&page.seller_options, &page.filter.sellers)
    );
    let _ = write!(
        sidebar,
        "<label for=\"qtd_vendedores\">Quantidade de vendedores</label>\
         <input id=\"qtd_vendedores\" type=\"number\" name=\"qtd_vendedores\" min=\"{}\" max=\"{}\" value=\"{}\">\n",
        config::SELLER_COUNT_BOUNDS.start(),
        config::SELLER_COUNT_BOUNDS.end(),
        page.seller_count
    );
    sidebar.push_str("<p><button type=\"submit\">Aplicar</button></p>\n</form>\n");

    let mut body = format!("<h1>{} &#x1F6D2;</h1>\n<div class=\"tabs\">", escape(&page.title));
    for (i, tab) in page.tabs.iter().enumerate() {
        let _ = write!(
            body,
            "<button type=\"button\" class=\"{}\" onclick=\"showTab({})\">{}</button>",
            if i == 0 { "active" } else { "" },
            i,
            escape(&tab.title)
        );
    }
    body.push_str("</div>\n");

    for (i, tab) in page.tabs.iter().enumerate() {
        let _ = write!(
            body,
            "<section class=\"tab{}\">\n<div class=\"columns\">\n",
            if i == 0 { " active" } else { "" }
        );
        for column in &tab.columns {
            body.push_str("<div class=\"column\">\n");
            for p in column {
                body.push_str(&panel(p));
            }
            body.push_str("</div>\n");
        }
        body.push_str("</div>\n</section>\n");
    }

    document(&page.title, &sidebar, &body)
}

// ---------------------------------------------------------------------------
// Raw data
// ---------------------------------------------------------------------------

fn multiselect(title: &str, name: &str, values: &[String], selected: &[String]) -> String {
    format!(
        "<details><summary>{title}</summary>\
         <select name=\"{name}\" multiple size=\"8\">{opts}</select></details>\n",
        title = escape(title),
        name = name,
        opts = options(values, selected),
    )
}

fn number_range<T: std::fmt::Display>(
    title: &str,
    prefix: &str,
    current: Option<(T, T)>,
    bounds: (T, T),
    step: &str,
) -> String {
    let (min, max) = current.unwrap_or(bounds);
    format!(
        "<details><summary>{title}</summary>\
         <input type=\"number\" name=\"{prefix}_min\" step=\"{step}\" value=\"{min}\">\
         <input type=\"number\" name=\"{prefix}_max\" step=\"{step}\" value=\"{max}\"></details>\n",
        title = escape(title),
    )
}

/// Render the raw-data page. `query_string` is the current request's query,
/// reused for the CSV download link.
pub fn raw_table(page: &RawTablePage, file_name: &str, query_string: &str) -> String {
    let opts = &page.options;
    let f = &page.filter;
    let mut sidebar = String::from("<form method=\"get\" action=\"/dados-brutos\">\n");

    let selected_labels: Vec<String> = page
        .selected_columns
        .iter()
        .map(|c| c.label().to_string())
        .collect();
    let all_labels: Vec<String> = Column::ALL.iter().map(|c| c.label().to_string()).collect();
    sidebar.push_str(&multiselect("Colunas", "coluna", &all_labels, &selected_labels));
    sidebar.push_str(&multiselect("Nome do produto", "produto", &opts.products, &f.products));
    sidebar.push_str(&multiselect(
        "Categoria do produto",
        "categoria",
        &opts.categories,
        &f.categories,
    ));
    sidebar.push_str(&number_range(
        "Preço do produto",
        "preco",
        f.price.map(|r| (r.min, r.max)),
        config::PRICE_BOUNDS,
        "0.01",
    ));
    sidebar.push_str(&number_range(
        "Frete da venda",
        "frete",
        f.freight.map(|r| (r.min, r.max)),
        config::FREIGHT_BOUNDS,
        "0.01",
    ));

    let (start, end) = f
        .date
        .map(|r| (Some(r.min), Some(r.max)))
        .unwrap_or((opts.date_bounds.map(|b| b.0), opts.date_bounds.map(|b| b.1)));
    let _ = write!(
        sidebar,
        "<details><summary>Data da compra</summary>\
         <input type=\"date\" name=\"data_inicio\" value=\"{}\">\
         <input type=\"date\" name=\"data_fim\" value=\"{}\"></details>\n",
        start.map(|d| d.to_string()).unwrap_or_default(),
        end.map(|d| d.to_string()).unwrap_or_default(),
    );

    sidebar.push_str(&multiselect("Vendedor", "vendedor", &opts.sellers, &f.sellers));
    sidebar.push_str(&multiselect("Local da compra", "local", &opts.locations, &f.locations));
    sidebar.push_str(&number_range(
        "Avaliação da compra",
        "avaliacao",
        f.rating.map(|r| (r.min, r.max)),
        config::RATING_BOUNDS,
        "1",
    ));
    sidebar.push_str(&multiselect(
        "Tipo de pagamento",
        "pagamento",
        &opts.payment_types,
        &f.payment_types,
    ));
    sidebar.push_str(&number_range(
        "Quantidade de parcelas",
        "parcelas",
        f.installments.map(|r| (r.min, r.max)),
        config::INSTALLMENT_BOUNDS,
        "1",
    ));
    let _ = write!(
        sidebar,
        "<label for=\"arquivo\">Escreva um nome para o arquivo</label>\
         <input id=\"arquivo\" type=\"text\" name=\"arquivo\" value=\"{}\">\n\
         <p><button type=\"submit\">Aplicar</button></p>\n</form>\n",
        escape(file_name)
    );

    let mut body = format!("<h1>{}</h1>\n<table>\n<thead><tr>", escape(&page.title));
    for h in &page.headers {
        let _ = write!(body, "<th>{}</th>", escape(h));
    }
    body.push_str("</tr></thead>\n<tbody>\n");
    for row in &page.rows {
        body.push_str("<tr>");
        for cell in row {
            let _ = write!(body, "<td>{}</td>", escape(cell));
        }
        body.push_str("</tr>\n");
    }
    body.push_str("</tbody>\n</table>\n");
    let _ = write!(
        body,
        "<p>{}</p>\n<p><a href=\"/dados-brutos/csv{}\" download=\"{}\">Fazer o download da tabela em CSV</a></p>\n",
        escape(&page.summary),
        if query_string.is_empty() {
            String::new()
        } else {
            format!("?{}", escape(query_string))
        },
        escape(file_name),
    );

    document(&page.title, &sidebar, &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_handles_markup() {
        assert_eq!(escape("<a href=\"x\">&'"), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
    }

    #[test]
    fn script_json_cannot_close_the_script_tag() {
        let value = serde_json::json!({ "title": "</script><b>" });
        assert!(!script_json(&value).contains("</script>"));
    }

    #[test]
    fn options_mark_selected_values() {
        let values = vec!["Ana".to_string(), "Bia".to_string()];
        let html = options(&values, &["Bia".to_string()]);
        assert!(html.contains("<option value=\"Ana\">Ana</option>"));
        assert!(html.contains("<option value=\"Bia\" selected>Bia</option>"));
    }
}
