use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    /// A partial update arrived with no fields to set.
    #[error("No data")]
    EmptyUpdate,
}
