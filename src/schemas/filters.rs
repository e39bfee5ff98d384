use serde_json::Value;

use crate::error::ApiError;
use crate::filter::FilterSpec;

/// Value type expected for a query-string filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    Text,
    /// Non-negative integer that fits a Postgres INTEGER.
    Count,
    /// Literal `true` or `false`; kept as a string for the compiler.
    Flag,
}

#[derive(Debug, Clone, Copy)]
pub struct FilterSchema {
    pub fields: &'static [(&'static str, FilterKind)],
    /// `(lower, upper)` filter names that must satisfy lower <= upper.
    pub range: Option<(&'static str, &'static str)>,
}

pub const COMPANY_FILTER_SCHEMA: FilterSchema = FilterSchema {
    fields: &[
        ("nameLike", FilterKind::Text),
        ("minEmployees", FilterKind::Count),
        ("maxEmployees", FilterKind::Count),
    ],
    range: Some(("minEmployees", "maxEmployees")),
};

pub const JOB_FILTER_SCHEMA: FilterSchema = FilterSchema {
    fields: &[
        ("title", FilterKind::Text),
        ("minSalary", FilterKind::Count),
        ("hasEquity", FilterKind::Flag),
    ],
    range: None,
};

impl FilterSchema {
    /// Coerce raw query pairs into a `FilterSpec`, keeping request order.
    /// A repeated key keeps its first position and its last value.
    pub fn validate(&self, params: &[(String, String)]) -> Result<FilterSpec, ApiError> {
        let mut spec = FilterSpec::new();

        for (key, raw) in params {
            let kind = self
                .fields
                .iter()
                .find(|(name, _)| *name == key.as_str())
                .map(|(_, kind)| *kind)
                .ok_or_else(|| ApiError::bad_request(format!("Unknown filter: {}", key)))?;

            let value = match kind {
                FilterKind::Text => Value::String(raw.clone()),
                FilterKind::Count => raw
                    .parse::<u32>()
                    .ok()
                    .filter(|n| *n <= i32::MAX as u32)
                    .map(Value::from)
                    .ok_or_else(|| {
                        ApiError::bad_request(format!("{} must be a non-negative integer", key))
                    })?,
                FilterKind::Flag => match raw.as_str() {
                    "true" | "false" => Value::String(raw.clone()),
                    _ => {
                        return Err(ApiError::bad_request(format!("{} must be true or false", key)))
                    }
                },
            };
            spec.insert(key.clone(), value);
        }

        if let Some((lower, upper)) = self.range {
            let bound = |name: &str| spec.get(name).and_then(Value::as_u64);
            if let (Some(min), Some(max)) = (bound(lower), bound(upper)) {
                if min > max {
                    return Err(ApiError::bad_request(format!(
                        "{} cannot be greater than {}",
                        lower, upper
                    )));
                }
            }
        }

        Ok(spec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn coerces_counts_to_numbers() {
        let spec = COMPANY_FILTER_SCHEMA
            .validate(&pairs(&[("nameLike", "net"), ("minEmployees", "1"), ("maxEmployees", "2")]))
            .unwrap();
        assert_eq!(spec["nameLike"], json!("net"));
        assert_eq!(spec["minEmployees"], json!(1));
        assert_eq!(spec["maxEmployees"], json!(2));
        assert_eq!(spec.keys().collect::<Vec<_>>(), vec!["nameLike", "minEmployees", "maxEmployees"]);
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(COMPANY_FILTER_SCHEMA.validate(&pairs(&[("apple", "1")])).is_err());
        assert!(JOB_FILTER_SCHEMA.validate(&pairs(&[("minEmployees", "1")])).is_err());
    }

    #[test]
    fn rejects_non_integer_and_negative_counts() {
        for raw in ["3.5", "-2", "ten", ""] {
            assert!(JOB_FILTER_SCHEMA.validate(&pairs(&[("minSalary", raw)])).is_err(), "{}", raw);
        }
    }

    #[test]
    fn rejects_inverted_range() {
        let err = COMPANY_FILTER_SCHEMA
            .validate(&pairs(&[("minEmployees", "2"), ("maxEmployees", "1")]))
            .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
        assert!(COMPANY_FILTER_SCHEMA
            .validate(&pairs(&[("minEmployees", "2"), ("maxEmployees", "2")]))
            .is_ok());
    }

    #[test]
    fn flag_accepts_only_true_or_false() {
        let spec = JOB_FILTER_SCHEMA.validate(&pairs(&[("hasEquity", "false")])).unwrap();
        assert_eq!(spec["hasEquity"], json!("false"));
        assert!(JOB_FILTER_SCHEMA.validate(&pairs(&[("hasEquity", "yes")])).is_err());
    }

    #[test]
    fn empty_query_is_empty_spec() {
        assert!(JOB_FILTER_SCHEMA.validate(&[]).unwrap().is_empty());
    }
}
