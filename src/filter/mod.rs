pub mod types;
pub mod partial_update;
pub mod filter_where;
pub mod error;

pub use types::*;
pub use error::FilterError;
pub use partial_update::sql_for_partial_update;
pub use filter_where::sql_for_filters;
