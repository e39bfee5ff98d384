use axum::extract::{Path, Query, State};
use serde_json::Value;

use crate::app::AppState;
use crate::database::{Company, NewCompany};
use crate::error::ApiError;
use crate::middleware::{AdminUser, ApiJson, ApiResponse, ApiResult};
use crate::schemas::{COMPANY_FILTER_SCHEMA, COMPANY_NEW, COMPANY_UPDATE};

/// POST /companies - { handle, name, description, numEmployees, logoUrl } => { company }
pub async fn post(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    ApiJson(payload): ApiJson<Value>,
) -> ApiResult<Company> {
    let body = COMPANY_NEW.validate(&payload)?;
    let data: NewCompany = serde_json::from_value(Value::Object(body))
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    let company = Company::create(&state.pool, data).await?;
    Ok(ApiResponse::created("company", company))
}

/// GET /companies - optional filters nameLike, minEmployees, maxEmployees
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> ApiResult<Vec<Company>> {
    let filters = COMPANY_FILTER_SCHEMA.validate(&params)?;
    let companies = Company::find_all(&state.pool, &filters).await?;
    Ok(ApiResponse::success("companies", companies))
}

/// GET /companies/:handle
pub async fn get(State(state): State<AppState>, Path(handle): Path<String>) -> ApiResult<Company> {
    let company = Company::get(&state.pool, &handle).await?;
    Ok(ApiResponse::success("company", company))
}

/// PATCH /companies/:handle - any of { name, description, numEmployees, logoUrl }
pub async fn patch(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(handle): Path<String>,
    ApiJson(payload): ApiJson<Value>,
) -> ApiResult<Company> {
    let body = COMPANY_UPDATE.validate(&payload)?;
    let company = Company::update(&state.pool, &handle, &body).await?;
    Ok(ApiResponse::success("company", company))
}

/// DELETE /companies/:handle => { deleted: handle }
pub async fn delete(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(handle): Path<String>,
) -> ApiResult<String> {
    Company::remove(&state.pool, &handle).await?;
    tracing::info!("{} deleted company {}", admin.username, handle);
    Ok(ApiResponse::success("deleted", handle))
}
