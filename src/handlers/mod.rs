// handlers/mod.rs - Route handlers
//
// Public:     GET /, GET /health, GET on /companies and /jobs
// Admin only: POST, PATCH and DELETE on /companies and /jobs (AdminUser extractor)

pub mod companies;
pub mod jobs;
pub mod public;

pub use public::{health, root};
