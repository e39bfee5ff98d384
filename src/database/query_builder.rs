use std::str::FromStr;

use serde_json::Value;
use sqlx::{self, postgres::PgArguments, types::BigDecimal, FromRow};

use crate::database::manager::DatabaseError;

pub type PgQueryAs<'q, O> = sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>;

/// Parse a decimal string for a NUMERIC column, keeping its scale
/// (`"0.050"` is stored and read back as `0.050`).
pub fn decimal(raw: &str) -> Result<BigDecimal, DatabaseError> {
    BigDecimal::from_str(raw).map_err(|_| DatabaseError::InvalidNumeric(raw.to_string()))
}

/// Bind compiled values in order onto a typed query.
pub fn bind_values_as<'q, O>(mut q: PgQueryAs<'q, O>, values: &'q [Value]) -> PgQueryAs<'q, O>
where
    O: for<'r> FromRow<'r, sqlx::postgres::PgRow>,
{
    for v in values {
        q = bind_param_query_as(q, v);
    }
    q
}

/// Like `bind_values_as`, but values whose position is flagged in `numeric`
/// go out as NUMERIC. Strings there must be decimals.
pub fn bind_values_as_numeric<'q, O>(
    mut q: PgQueryAs<'q, O>,
    values: &'q [Value],
    numeric: &[bool],
) -> Result<PgQueryAs<'q, O>, DatabaseError>
where
    O: for<'r> FromRow<'r, sqlx::postgres::PgRow>,
{
    for (i, v) in values.iter().enumerate() {
        let is_numeric = numeric.get(i).copied().unwrap_or(false);
        q = match v {
            Value::String(s) if is_numeric => q.bind(decimal(s)?),
            Value::Null if is_numeric => q.bind(None::<BigDecimal>),
            _ => bind_param_query_as(q, v),
        };
    }
    Ok(q)
}

// NULL goes out as a typed INT8 so assignment casts accept it for any column
fn bind_param_query_as<'q, O>(q: PgQueryAs<'q, O>, v: &'q Value) -> PgQueryAs<'q, O>
where
    O: for<'r> FromRow<'r, sqlx::postgres::PgRow>,
{
    match v {
        Value::Null => q.bind(None::<i64>),
        Value::Bool(b) => q.bind(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                q.bind(i)
            } else if let Some(f) = n.as_f64() {
                q.bind(f)
            } else {
                q.bind(n.to_string())
            }
        }
        Value::String(s) => q.bind(s.as_str()),
        Value::Array(_) | Value::Object(_) => q.bind(v.clone()), // JSONB
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_keeps_scale() {
        let (_, scale) = decimal("0.050").unwrap().as_bigint_and_exponent();
        assert_eq!(scale, 3);
        let (_, scale) = decimal("1.000").unwrap().as_bigint_and_exponent();
        assert_eq!(scale, 3);
        let (_, scale) = decimal("0").unwrap().as_bigint_and_exponent();
        assert_eq!(scale, 0);
    }

    #[test]
    fn decimal_rejects_garbage() {
        assert!(matches!(decimal("abc"), Err(DatabaseError::InvalidNumeric(raw)) if raw == "abc"));
    }
}
