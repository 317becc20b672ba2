//! Parameterized SELECT construction over the sales table.
//!
//! Filter values are bound through DuckDB `?` placeholders and never spliced
//! into the SQL text. Column names and expressions come from code, not from
//! users.
//!
//! # Example
//!
//! ```rust
//! use sales_dashboard::SqlBuilder;
//! let (sql, params) = SqlBuilder::new("sales")
//!     .select(&["seller", "SUM(price) AS revenue"])
//!     .where_in("purchase_location", &["SP", "RJ"])
//!     .where_between("price", "0", "5000", "DOUBLE")
//!     .group_by(&["seller"])
//!     .order_by(&["revenue DESC"])
//!     .limit(5)
//!     .build();
//! assert_eq!(params, ["SP", "RJ", "0", "5000"]);
//! ```

/// Accumulates the clauses of one SELECT. Methods return `&mut Self`.
pub struct SqlBuilder {
    table: String,
    columns: Vec<String>,
    conditions: Vec<String>,
    params: Vec<String>,
    group_by: Vec<String>,
    order_by: Vec<String>,
    limit: Option<usize>,
}

impl SqlBuilder {
    /// Start a `SELECT * FROM {table}`.
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            columns: vec!["*".to_string()],
            conditions: Vec::new(),
            params: Vec::new(),
            group_by: Vec::new(),
            order_by: Vec::new(),
            limit: None,
        }
    }

    /// Replace the projection with `cols`.
    pub fn select<S: AsRef<str>>(&mut self, cols: &[S]) -> &mut Self {
        self.columns = cols.iter().map(|c| c.as_ref().to_string()).collect();
        self
    }

    /// `{column} IN (?, ...)`. An empty list matches nothing; callers that
    /// treat an empty selection as a wildcard skip the call.
    pub fn where_in(&mut self, column: &str, values: &[&str]) -> &mut Self {
        if values.is_empty() {
            self.conditions.push("FALSE".to_string());
            return self;
        }
        let slots = vec!["?"; values.len()].join(", ");
        self.conditions.push(format!("{} IN ({})", column, slots));
        self.params.extend(values.iter().map(|v| v.to_string()));
        self
    }

    /// Inclusive range with both bounds cast to `sql_type`:
    /// `{column} BETWEEN CAST(? AS T) AND CAST(? AS T)`.
    pub fn where_between(
        &mut self,
        column: &str,
        min: &str,
        max: &str,
        sql_type: &str,
    ) -> &mut Self {
        self.conditions.push(format!(
            "{} BETWEEN CAST(? AS {t}) AND CAST(? AS {t})",
            column,
            t = sql_type
        ));
        self.params.push(min.to_string());
        self.params.push(max.to_string());
        self
    }

    pub fn group_by(&mut self, exprs: &[&str]) -> &mut Self {
        self.group_by.extend(exprs.iter().map(|e| e.to_string()));
        self
    }

    /// Append sort keys such as `"revenue DESC"`.
    pub fn order_by(&mut self, keys: &[&str]) -> &mut Self {
        self.order_by.extend(keys.iter().map(|k| k.to_string()));
        self
    }

    pub fn limit(&mut self, n: usize) -> &mut Self {
        self.limit = Some(n);
        self
    }

    /// The SQL text and its bound parameters, in placeholder order.
    pub fn build(&self) -> (String, Vec<String>) {
        let mut sql = format!("SELECT {}\nFROM {}", self.columns.join(", "), self.table);
        if !self.conditions.is_empty() {
            sql.push_str("\nWHERE ");
            sql.push_str(&self.conditions.join(" AND "));
        }
        if !self.group_by.is_empty() {
            sql.push_str("\nGROUP BY ");
            sql.push_str(&self.group_by.join(", "));
        }
        if !self.order_by.is_empty() {
            sql.push_str("\nORDER BY ");
            sql.push_str(&self.order_by.join(", "));
        }
        if let Some(n) = self.limit {
            sql.push_str(&format!("\nLIMIT {}", n));
        }
        (sql, self.params.clone())
    }
}
