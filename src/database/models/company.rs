use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

use crate::database::manager::DatabaseError;
use crate::database::query_builder::bind_values_as;
use crate::filter::{
    sql_for_filters, sql_for_partial_update, FieldMapping, FilterDef, FilterRule, FilterSpec,
    SparseUpdate,
};

/// API field names that differ from their column names.
pub const COMPANY_FIELDS: FieldMapping =
    FieldMapping::new(&[("numEmployees", "num_employees"), ("logoUrl", "logo_url")]);

/// Query-string filters accepted by `GET /companies`.
pub const COMPANY_FILTERS: &[FilterDef] = &[
    FilterDef::new("nameLike", "name", FilterRule::Contains),
    FilterDef::new("minEmployees", "num_employees", FilterRule::AtLeast),
    FilterDef::new("maxEmployees", "num_employees", FilterRule::AtMost),
];

const COLUMNS: &str = "handle, name, description, num_employees, logo_url";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub handle: String,
    pub name: String,
    pub description: Option<String>,
    pub num_employees: Option<i32>,
    pub logo_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCompany {
    pub handle: String,
    pub name: String,
    pub description: Option<String>,
    pub num_employees: Option<i32>,
    pub logo_url: Option<String>,
}

fn duplicate_or(err: sqlx::Error, handle: &str) -> DatabaseError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            return DatabaseError::Duplicate(format!("Duplicate company: {}", handle));
        }
    }
    err.into()
}

impl Company {
    /// Insert a company. Fails with `Duplicate` when the handle or name is taken.
    pub async fn create(pool: &PgPool, data: NewCompany) -> Result<Company, DatabaseError> {
        let sql = format!(
            "INSERT INTO companies (handle, name, description, num_employees, logo_url) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            COLUMNS
        );
        let company = sqlx::query_as::<_, Company>(&sql)
            .bind(&data.handle)
            .bind(&data.name)
            .bind(&data.description)
            .bind(data.num_employees)
            .bind(&data.logo_url)
            .fetch_one(pool)
            .await
            .map_err(|e| duplicate_or(e, &data.handle))?;

        tracing::info!("Created company {}", company.handle);
        Ok(company)
    }

    /// All companies matching `filters`, ordered by name.
    pub async fn find_all(pool: &PgPool, filters: &FilterSpec) -> Result<Vec<Company>, DatabaseError> {
        let where_clause = sql_for_filters(filters, COMPANY_FILTERS);
        let sql = format!(
            "SELECT {} FROM companies {} ORDER BY name",
            COLUMNS, where_clause.predicate
        );
        tracing::debug!("Company filter: {} {:?}", sql, where_clause.values);

        let rows = bind_values_as(sqlx::query_as::<_, Company>(&sql), &where_clause.values)
            .fetch_all(pool)
            .await?;
        Ok(rows)
    }

    pub async fn get(pool: &PgPool, handle: &str) -> Result<Company, DatabaseError> {
        let sql = format!("SELECT {} FROM companies WHERE handle = $1", COLUMNS);
        sqlx::query_as::<_, Company>(&sql)
            .bind(handle)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("No company: {}", handle)))
    }

    /// Apply a partial update; only the fields present in `data` change.
    pub async fn update(
        pool: &PgPool,
        handle: &str,
        data: &SparseUpdate,
    ) -> Result<Company, DatabaseError> {
        let set = sql_for_partial_update(data, &COMPANY_FIELDS)?;
        let sql = format!(
            "UPDATE companies SET {} WHERE handle = ${} RETURNING {}",
            set.set_clause(),
            set.next_placeholder(),
            COLUMNS
        );
        tracing::debug!("Company update: {} {:?}", sql, set.values);

        bind_values_as(sqlx::query_as::<_, Company>(&sql), &set.values)
            .bind(handle)
            .fetch_optional(pool)
            .await
            .map_err(|e| duplicate_or(e, handle))?
            .ok_or_else(|| DatabaseError::NotFound(format!("No company: {}", handle)))
    }

    pub async fn remove(pool: &PgPool, handle: &str) -> Result<(), DatabaseError> {
        let deleted = sqlx::query("DELETE FROM companies WHERE handle = $1 RETURNING handle")
            .bind(handle)
            .fetch_optional(pool)
            .await?;
        match deleted {
            Some(_) => Ok(()),
            None => Err(DatabaseError::NotFound(format!("No company: {}", handle))),
        }
    }
}
