//! Request body and query-string validation.
//!
//! Bodies are checked against an `ObjectSchema`; query strings against a
//! `FilterSchema`. Both hand back insertion-ordered maps ready for the
//! SQL compilers.

mod filters;

pub use filters::{FilterKind, FilterSchema, COMPANY_FILTER_SCHEMA, JOB_FILTER_SCHEMA};

use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    /// String with a character-count range.
    Text { min: usize, max: Option<usize> },
    /// JSON integer no smaller than `minimum` that fits a Postgres INTEGER.
    Integer { minimum: i64 },
    /// Absolute http(s) URL.
    Url,
    /// Decimal string between 0 and 1 inclusive, e.g. `"0.05"`.
    Equity,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSchema {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub nullable: bool,
}

impl FieldSchema {
    pub const fn required(name: &'static str, kind: FieldKind) -> Self {
        Self { name, kind, required: true, nullable: false }
    }

    pub const fn optional(name: &'static str, kind: FieldKind) -> Self {
        Self { name, kind, required: false, nullable: true }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ObjectSchema {
    pub name: &'static str,
    pub fields: &'static [FieldSchema],
}

const HANDLE: FieldKind = FieldKind::Text { min: 1, max: Some(25) };
const NAME: FieldKind = FieldKind::Text { min: 1, max: None };
const FREE_TEXT: FieldKind = FieldKind::Text { min: 0, max: None };
const COUNT: FieldKind = FieldKind::Integer { minimum: 0 };

pub const COMPANY_NEW: ObjectSchema = ObjectSchema {
    name: "companyNew",
    fields: &[
        FieldSchema::required("handle", HANDLE),
        FieldSchema::required("name", NAME),
        FieldSchema::optional("description", FREE_TEXT),
        FieldSchema::optional("numEmployees", COUNT),
        FieldSchema::optional("logoUrl", FieldKind::Url),
    ],
};

/// The handle is the key and cannot be changed.
pub const COMPANY_UPDATE: ObjectSchema = ObjectSchema {
    name: "companyUpdate",
    fields: &[
        FieldSchema { name: "name", kind: NAME, required: false, nullable: false },
        FieldSchema::optional("description", FREE_TEXT),
        FieldSchema::optional("numEmployees", COUNT),
        FieldSchema::optional("logoUrl", FieldKind::Url),
    ],
};

pub const JOB_NEW: ObjectSchema = ObjectSchema {
    name: "jobNew",
    fields: &[
        FieldSchema::required("title", NAME),
        FieldSchema::optional("salary", COUNT),
        FieldSchema::optional("equity", FieldKind::Equity),
        FieldSchema::required("companyHandle", HANDLE),
    ],
};

/// Neither the id nor the owning company can be changed.
pub const JOB_UPDATE: ObjectSchema = ObjectSchema {
    name: "jobUpdate",
    fields: &[
        FieldSchema { name: "title", kind: NAME, required: false, nullable: false },
        FieldSchema::optional("salary", COUNT),
        FieldSchema::optional("equity", FieldKind::Equity),
    ],
};

impl ObjectSchema {
    /// Check `body` and return it as an ordered map. Every problem is
    /// reported in `field_errors`, keyed by property name.
    pub fn validate(&self, body: &Value) -> Result<Map<String, Value>, ApiError> {
        let object = body
            .as_object()
            .ok_or_else(|| ApiError::bad_request("Request body must be a JSON object"))?;

        let mut errors = HashMap::new();

        for key in object.keys() {
            if !self.fields.iter().any(|field| field.name == key.as_str()) {
                errors.insert(key.clone(), "is not an allowed property".to_string());
            }
        }

        for field in self.fields {
            match object.get(field.name) {
                None if field.required => {
                    errors.insert(field.name.to_string(), "is required".to_string());
                }
                None => {}
                Some(Value::Null) if field.nullable && !field.required => {}
                Some(value) => {
                    if let Err(message) = check_kind(field.kind, value) {
                        errors.insert(field.name.to_string(), message);
                    }
                }
            }
        }

        if errors.is_empty() {
            Ok(object.clone())
        } else {
            tracing::debug!("{} rejected: {:?}", self.name, errors);
            Err(ApiError::validation_error(
                format!("Invalid {}", self.name),
                Some(errors),
            ))
        }
    }
}

fn check_kind(kind: FieldKind, value: &Value) -> Result<(), String> {
    match kind {
        FieldKind::Text { min, max } => {
            let text = value.as_str().ok_or("must be a string")?;
            let len = text.chars().count();
            if len < min {
                return Err(format!("must be at least {} characters", min));
            }
            if let Some(max) = max {
                if len > max {
                    return Err(format!("must be at most {} characters", max));
                }
            }
            Ok(())
        }
        FieldKind::Integer { minimum } => {
            let n = value.as_i64().ok_or("must be an integer")?;
            if n < minimum {
                return Err(format!("must be greater than or equal to {}", minimum));
            }
            if n > i64::from(i32::MAX) {
                return Err("is too large".to_string());
            }
            Ok(())
        }
        FieldKind::Url => {
            let text = value.as_str().ok_or("must be a string")?;
            match url::Url::parse(text) {
                Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(()),
                _ => Err("must be a valid http(s) URL".to_string()),
            }
        }
        FieldKind::Equity => {
            let text = value.as_str().ok_or("must be a decimal string")?;
            if is_equity(text) {
                Ok(())
            } else {
                Err("must be a decimal string between 0 and 1".to_string())
            }
        }
    }
}

/// `0`, `0.xxx`, `1` or `1.000`: plain decimal notation, no sign or exponent.
fn is_equity(text: &str) -> bool {
    let (whole, fraction) = match text.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (text, None),
    };
    let digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());

    if !digits(whole) || fraction.is_some_and(|f| !digits(f)) {
        return false;
    }
    text.parse::<f64>().is_ok_and(|n| (0.0..=1.0).contains(&n))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn field_errors(err: ApiError) -> HashMap<String, String> {
        match err {
            ApiError::ValidationError { field_errors: Some(errors), .. } => errors,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn accepts_full_company() {
        let body = json!({
            "handle": "new",
            "name": "New",
            "description": "DescNew",
            "numEmployees": 10,
            "logoUrl": "http://new.img"
        });
        let map = COMPANY_NEW.validate(&body).unwrap();
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["handle", "name", "description", "numEmployees", "logoUrl"]);
    }

    #[test]
    fn reports_missing_required_fields() {
        let errors = field_errors(COMPANY_NEW.validate(&json!({ "handle": "new" })).unwrap_err());
        assert_eq!(errors.len(), 1);
        assert!(errors.contains_key("name"));
    }

    #[test]
    fn rejects_additional_properties() {
        let errors = field_errors(COMPANY_UPDATE.validate(&json!({ "handle": "c1-new" })).unwrap_err());
        assert!(errors.contains_key("handle"));
    }

    #[test]
    fn rejects_bad_field_values() {
        let body = json!({ "numEmployees": "ten", "logoUrl": "not-a-url" });
        let errors = field_errors(COMPANY_UPDATE.validate(&body).unwrap_err());
        assert!(errors.contains_key("numEmployees"));
        assert!(errors.contains_key("logoUrl"));

        let errors = field_errors(COMPANY_UPDATE.validate(&json!({ "numEmployees": -1 })).unwrap_err());
        assert!(errors.contains_key("numEmployees"));
    }

    #[test]
    fn nullable_fields_accept_null() {
        let map = COMPANY_UPDATE.validate(&json!({ "description": null, "logoUrl": null })).unwrap();
        assert_eq!(map["description"], Value::Null);
        assert!(COMPANY_UPDATE.validate(&json!({ "name": null })).is_err());
    }

    #[test]
    fn empty_update_passes_validation() {
        assert!(JOB_UPDATE.validate(&json!({})).unwrap().is_empty());
    }

    #[test]
    fn non_object_body_is_bad_request() {
        assert!(matches!(JOB_NEW.validate(&json!([1, 2])), Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn job_update_excludes_company() {
        let errors = field_errors(JOB_UPDATE.validate(&json!({ "companyHandle": "c2" })).unwrap_err());
        assert!(errors.contains_key("companyHandle"));
    }

    #[test]
    fn equity_format() {
        for ok in ["0", "0.050", "0.999", "1", "1.0"] {
            assert!(is_equity(ok), "{}", ok);
        }
        for bad in ["", "1.5", "-0.1", "0.", ".5", "1e-2", "abc", "01x"] {
            assert!(!is_equity(bad), "{}", bad);
        }
        let errors = field_errors(
            JOB_NEW
                .validate(&json!({ "title": "t", "companyHandle": "c1", "equity": 0.5 }))
                .unwrap_err(),
        );
        assert!(errors.contains_key("equity"));
    }

    #[test]
    fn salary_must_fit_integer_column() {
        let body = json!({ "title": "t", "companyHandle": "c1", "salary": 3_000_000_000i64 });
        assert!(JOB_NEW.validate(&body).is_err());
    }
}
