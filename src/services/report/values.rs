use serde_json::Value;

/// Lenient numeric coercion: bad cells degrade to zero contribution instead
/// of aborting the run. Never returns NaN.
pub fn number_or_zero(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().filter(|f| f.is_finite()).unwrap_or(0.0),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                0.0
            } else {
                trimmed.parse::<f64>().ok().filter(|f| f.is_finite()).unwrap_or(0.0)
            }
        }
        Some(Value::Bool(b)) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        _ => 0.0,
    }
}

/// Scalar-to-string coercion; missing and null cells become the empty string.
pub fn string_or_empty(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numbers_pass_through() {
        assert_eq!(number_or_zero(Some(&json!(12.5))), 12.5);
        assert_eq!(number_or_zero(Some(&json!(-3))), -3.0);
    }

    #[test]
    fn numeric_strings_parse_after_trim() {
        assert_eq!(number_or_zero(Some(&json!("  42 "))), 42.0);
        assert_eq!(number_or_zero(Some(&json!("50000"))), 50000.0);
    }

    #[test]
    fn bad_cells_coerce_to_zero() {
        assert_eq!(number_or_zero(Some(&json!("abc"))), 0.0);
        assert_eq!(number_or_zero(Some(&json!(""))), 0.0);
        assert_eq!(number_or_zero(Some(&json!(null))), 0.0);
        assert_eq!(number_or_zero(None), 0.0);
    }

    #[test]
    fn string_coercion_renders_scalars() {
        assert_eq!(string_or_empty(Some(&json!("Kemeja"))), "Kemeja");
        assert_eq!(string_or_empty(Some(&json!(7))), "7");
        assert_eq!(string_or_empty(Some(&json!(null))), "");
        assert_eq!(string_or_empty(None), "");
    }
}
