use axum::extract::{Path, Query, State};
use serde_json::Value;

use crate::app::AppState;
use crate::database::{Job, NewJob};
use crate::error::ApiError;
use crate::middleware::{AdminUser, ApiJson, ApiResponse, ApiResult};
use crate::schemas::{JOB_FILTER_SCHEMA, JOB_NEW, JOB_UPDATE};

fn parse_id(raw: &str) -> Result<i32, ApiError> {
    raw.parse::<i32>()
        .map_err(|_| ApiError::bad_request("ID must be an integer"))
}

/// POST /jobs - { title, salary, equity, companyHandle } => { job }
pub async fn post(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    ApiJson(payload): ApiJson<Value>,
) -> ApiResult<Job> {
    let body = JOB_NEW.validate(&payload)?;
    let data: NewJob = serde_json::from_value(Value::Object(body))
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    let job = Job::create(&state.pool, data).await?;
    Ok(ApiResponse::created("job", job))
}

/// GET /jobs - optional filters title, minSalary, hasEquity
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> ApiResult<Vec<Job>> {
    let filters = JOB_FILTER_SCHEMA.validate(&params)?;
    let jobs = Job::find_all(&state.pool, &filters).await?;
    Ok(ApiResponse::success("jobs", jobs))
}

/// GET /jobs/:id
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Job> {
    let job = Job::get(&state.pool, parse_id(&id)?).await?;
    Ok(ApiResponse::success("job", job))
}

/// PATCH /jobs/:id - any of { title, salary, equity }
pub async fn patch(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<Value>,
) -> ApiResult<Job> {
    let id = parse_id(&id)?;
    let body = JOB_UPDATE.validate(&payload)?;
    let job = Job::update(&state.pool, id, &body).await?;
    Ok(ApiResponse::success("job", job))
}

/// DELETE /jobs/:id => { deleted: "<id>" }
pub async fn delete(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
) -> ApiResult<String> {
    let id = parse_id(&id)?;
    Job::remove(&state.pool, id).await?;
    tracing::info!("{} deleted job {}", admin.username, id);
    Ok(ApiResponse::success("deleted", id.to_string()))
}
