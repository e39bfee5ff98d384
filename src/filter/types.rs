use serde_json::{Map, Value};

/// Sparse field -> value mapping for a PATCH. `null` sets the column to NULL,
/// a missing key leaves it untouched. Iterates in insertion order.
pub type SparseUpdate = Map<String, Value>;

/// Filter name -> raw value mapping for a listing. Iterates in insertion order.
pub type FilterSpec = Map<String, Value>;

/// Static translation from API field names to storage column names.
/// Fields without an entry map to a column of the same name.
#[derive(Debug, Clone, Copy)]
pub struct FieldMapping {
    pairs: &'static [(&'static str, &'static str)],
}

impl FieldMapping {
    pub const fn new(pairs: &'static [(&'static str, &'static str)]) -> Self {
        Self { pairs }
    }

    pub const fn identity() -> Self {
        Self { pairs: &[] }
    }

    pub fn column_for<'a>(&self, field: &'a str) -> &'a str {
        self.pairs
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, column)| *column)
            .unwrap_or(field)
    }
}

/// How a recognized filter turns its raw value into a predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterRule {
    /// Case-insensitive substring match: `"col" ILIKE $n` bound to `%value%`.
    Contains,
    /// Inclusive lower bound: `"col" >= $n`.
    AtLeast,
    /// Inclusive upper bound: `"col" <= $n`.
    AtMost,
    /// Emits `"col" <> 0` only when the raw value is the string `"true"`.
    FlagTrue,
}

impl FilterRule {
    /// Whether an emitted clause for this rule takes a positional parameter.
    pub fn consumes_placeholder(&self) -> bool {
        !matches!(self, FilterRule::FlagTrue)
    }

    pub(crate) fn applies_to(&self, raw: &Value) -> bool {
        match self {
            FilterRule::FlagTrue => raw.as_str() == Some("true"),
            _ => true,
        }
    }

    pub(crate) fn bind_value(&self, raw: &Value) -> Value {
        match self {
            FilterRule::Contains => {
                let needle = match raw {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                Value::String(format!("%{}%", needle))
            }
            _ => raw.clone(),
        }
    }

    pub(crate) fn predicate(&self, quoted_column: &str, placeholder: Option<usize>) -> String {
        let param = placeholder.map(|n| format!("${}", n)).unwrap_or_default();
        match self {
            FilterRule::Contains => format!("{} ILIKE {}", quoted_column, param),
            FilterRule::AtLeast => format!("{} >= {}", quoted_column, param),
            FilterRule::AtMost => format!("{} <= {}", quoted_column, param),
            FilterRule::FlagTrue => format!("{} <> 0", quoted_column),
        }
    }
}

/// One entry of an entity's filter allow-list.
#[derive(Debug, Clone, Copy)]
pub struct FilterDef {
    pub name: &'static str,
    pub column: &'static str,
    pub rule: FilterRule,
}

impl FilterDef {
    pub const fn new(name: &'static str, column: &'static str, rule: FilterRule) -> Self {
        Self { name, column, rule }
    }
}

/// Output of the partial-update compiler.
#[derive(Debug, Clone, PartialEq)]
pub struct SetClause {
    pub set_cols: Vec<String>,
    pub values: Vec<Value>,
}

impl SetClause {
    /// Assignments joined for splicing after `SET`.
    pub fn set_clause(&self) -> String {
        self.set_cols.join(", ")
    }

    /// Placeholder number for the caller's trailing key predicate.
    pub fn next_placeholder(&self) -> usize {
        self.values.len() + 1
    }
}

/// Output of the filter compiler. An empty `predicate` means "no WHERE".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WhereClause {
    pub predicate: String,
    pub values: Vec<Value>,
}

impl WhereClause {
    pub fn is_empty(&self) -> bool {
        self.predicate.is_empty()
    }
}

/// Quote SQL identifier to prevent injection
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
