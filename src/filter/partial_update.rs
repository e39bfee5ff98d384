use super::error::FilterError;
use super::types::{quote_identifier, FieldMapping, SetClause, SparseUpdate};

/// Build the SET portion of a partial UPDATE.
///
/// Each field becomes `"column"=$n`, numbered from 1 in the update's
/// insertion order, with its value at the same position in `values`.
/// Column names come from `mapping`; unmapped fields are used as-is.
///
/// ```text
/// {firstName: "Aliya", age: 32} => ["\"first_name\"=$1", "\"age\"=$2"], ["Aliya", 32]
/// ```
pub fn sql_for_partial_update(
    update: &SparseUpdate,
    mapping: &FieldMapping,
) -> Result<SetClause, FilterError> {
    if update.is_empty() {
        return Err(FilterError::EmptyUpdate);
    }

    let mut set_cols = Vec::with_capacity(update.len());
    let mut values = Vec::with_capacity(update.len());

    for (field, value) in update {
        values.push(value.clone());
        set_cols.push(format!(
            "{}=${}",
            quote_identifier(mapping.column_for(field)),
            values.len()
        ));
    }

    Ok(SetClause { set_cols, values })
}
