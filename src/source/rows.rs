use serde_json::{Map, Value};

/// One raw tabular row: a mapping of column name to an untyped scalar as
/// produced by whatever loader supplied it (CSV cells arrive as strings,
/// JSON rows may carry real numbers and booleans).
///
/// This is the last point at which data is untyped — the record parser
/// converts rows into typed domain records and nothing downstream of it
/// sees this shape.
#[derive(Debug, Clone, Default)]
pub struct RawRow(Map<String, Value>);

impl RawRow {
    pub fn new() -> RawRow {
        RawRow(Map::new())
    }

    pub fn set(&mut self, column: &str, value: Value) {
        self.0.insert(column.to_string(), value);
    }

    /// First non-empty string value among the given column names, trimmed.
    /// Numbers are rendered to strings so loaders that type their cells
    /// still satisfy string lookups.
    pub fn text(&self, columns: &[&str]) -> Option<String> {
        for column in columns {
            let out = match self.0.get(*column) {
                Some(Value::String(s)) => {
                    let trimmed = s.trim();
                    if trimmed.is_empty() {
                        None
                    } else {
                        Some(trimmed.to_string())
                    }
                }
                Some(Value::Number(n)) => Some(n.to_string()),
                _ => None,
            };
            if out.is_some() {
                return out;
            }
        }
        None
    }

    /// First numeric value among the given column names. Accepts real JSON
    /// numbers and numeric strings; anything else is `None`.
    pub fn number(&self, columns: &[&str]) -> Option<f64> {
        for column in columns {
            let out = match self.0.get(*column) {
                Some(Value::Number(n)) => n.as_f64(),
                Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
                _ => None,
            };
            if out.is_some() {
                return out;
            }
        }
        None
    }

    /// First boolean value among the given column names. Accepts real
    /// booleans, the usual string spellings, and 0/1 numerics.
    pub fn flag(&self, columns: &[&str]) -> Option<bool> {
        for column in columns {
            let out = match self.0.get(*column) {
                Some(Value::Bool(b)) => Some(*b),
                Some(Value::String(s)) => match s.trim().to_lowercase().as_str() {
                    "true" | "yes" | "1" => Some(true),
                    "false" | "no" | "0" => Some(false),
                    _ => None,
                },
                Some(Value::Number(n)) => n.as_i64().map(|v| v != 0),
                _ => None,
            };
            if out.is_some() {
                return out;
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(pairs: &[(&str, Value)]) -> RawRow {
        let mut row = RawRow::new();
        for (column, value) in pairs {
            row.set(column, value.clone());
        }
        row
    }

    #[test]
    fn test_text_prefers_first_present_column() {
        let r = row(&[("home", json!("Arsenal"))]);
        assert_eq!(r.text(&["home_name", "home"]), Some("Arsenal".to_string()));
    }

    #[test]
    fn test_text_skips_empty_values() {
        let r = row(&[("league", json!("   "))]);
        assert_eq!(r.text(&["league"]), None);
    }

    #[test]
    fn test_number_coerces_strings() {
        let r = row(&[("odds", json!("1.925")), ("line", json!(-1.5))]);
        assert_eq!(r.number(&["odds"]), Some(1.925));
        assert_eq!(r.number(&["line"]), Some(-1.5));
        assert_eq!(r.number(&["missing"]), None);
    }

    #[test]
    fn test_number_rejects_garbage() {
        let r = row(&[("odds", json!("n/a"))]);
        assert_eq!(r.number(&["odds"]), None);
    }

    #[test]
    fn test_flag_spellings() {
        let r = row(&[
            ("a", json!(true)),
            ("b", json!("True")),
            ("c", json!("0")),
            ("d", json!(1)),
        ]);
        assert_eq!(r.flag(&["a"]), Some(true));
        assert_eq!(r.flag(&["b"]), Some(true));
        assert_eq!(r.flag(&["c"]), Some(false));
        assert_eq!(r.flag(&["d"]), Some(true));
        assert_eq!(r.flag(&["e"]), None);
    }
}
