use std::cmp;

use serde_json::{Map, Value};

/// A row as exchanged with the store: column name to JSON value.
pub type Row = Map<String, Value>;

/// Conjunction of column equality conditions. A missing column equals `null`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<(String, Value)>,
}

impl Filter {
    /// Matches every row.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn eq(column: &str, value: impl Into<Value>) -> Self {
        Self::all().and(column, value)
    }

    #[must_use]
    pub fn and(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.conditions.push((column.to_string(), value.into()));
        self
    }

    #[must_use]
    pub fn matches(&self, row: &Row) -> bool {
        self.conditions
            .iter()
            .all(|(column, expected)| row.get(column).unwrap_or(&Value::Null) == expected)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}

/// Sort on a single column; `null` sorts last in both directions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ordering {
    column: String,
    ascending: bool,
}

impl Ordering {
    #[must_use]
    pub fn asc(column: &str) -> Self {
        Self {
            column: column.to_string(),
            ascending: true,
        }
    }

    #[must_use]
    pub fn desc(column: &str) -> Self {
        Self {
            column: column.to_string(),
            ascending: false,
        }
    }

    #[must_use]
    pub fn column(&self) -> &str {
        &self.column
    }

    /// Stable sort of `rows` by this ordering.
    pub fn sort(&self, rows: &mut [Row]) {
        rows.sort_by(|a, b| self.compare(a, b));
    }

    fn compare(&self, a: &Row, b: &Row) -> cmp::Ordering {
        let a = a.get(&self.column).filter(|v| !v.is_null());
        let b = b.get(&self.column).filter(|v| !v.is_null());
        match (a, b) {
            (None, None) => cmp::Ordering::Equal,
            (None, Some(_)) => cmp::Ordering::Greater,
            (Some(_), None) => cmp::Ordering::Less,
            (Some(a), Some(b)) => {
                let ord = compare_values(a, b);
                if self.ascending { ord } else { ord.reverse() }
            }
        }
    }
}

fn compare_values(a: &Value, b: &Value) -> cmp::Ordering {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => {
            let a = a.as_f64().unwrap_or(f64::NAN);
            let b = b.as_f64().unwrap_or(f64::NAN);
            a.partial_cmp(&b).unwrap_or(cmp::Ordering::Equal)
        }
        (Value::String(a), Value::String(b)) => a.cmp(b),
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        _ => cmp::Ordering::Equal,
    }
}
