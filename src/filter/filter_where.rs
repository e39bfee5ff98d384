use serde_json::Value;

use super::types::{quote_identifier, FilterDef, FilterSpec, WhereClause};

/// Compile listing filters into a conjunctive WHERE clause.
///
/// Filters are visited in `filters` order. A key is looked up in `rules`;
/// unknown keys produce nothing. Rules that consume a placeholder push their
/// bind value first and take `$<values.len()>`, so placeholder numbers and
/// the value list never drift apart. Rules that do not consume one emit a
/// bare predicate and leave both untouched.
pub fn sql_for_filters(filters: &FilterSpec, rules: &[FilterDef]) -> WhereClause {
    let mut clauses: Vec<String> = Vec::new();
    let mut values: Vec<Value> = Vec::new();

    for (name, raw) in filters {
        let Some(def) = rules.iter().find(|def| def.name == name.as_str()) else {
            continue;
        };
        if !def.rule.applies_to(raw) {
            continue;
        }

        let column = quote_identifier(def.column);
        let placeholder = if def.rule.consumes_placeholder() {
            values.push(def.rule.bind_value(raw));
            Some(values.len())
        } else {
            None
        };
        clauses.push(def.rule.predicate(&column, placeholder));
    }

    if clauses.is_empty() {
        return WhereClause::default();
    }

    WhereClause {
        predicate: format!("WHERE {}", clauses.join(" AND ")),
        values,
    }
}
