pub mod company;
pub mod job;

pub use company::{Company, NewCompany, COMPANY_FIELDS, COMPANY_FILTERS};
pub use job::{Job, NewJob, JOB_FIELDS, JOB_FILTERS};
