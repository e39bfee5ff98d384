use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

use crate::database::manager::DatabaseError;
use crate::database::query_builder::{bind_values_as, bind_values_as_numeric, decimal};
use crate::filter::{
    sql_for_filters, sql_for_partial_update, FieldMapping, FilterDef, FilterRule, FilterSpec,
    SparseUpdate,
};

/// Updatable job fields already match their column names.
pub const JOB_FIELDS: FieldMapping = FieldMapping::identity();

/// Query-string filters accepted by `GET /jobs`.
pub const JOB_FILTERS: &[FilterDef] = &[
    FilterDef::new("title", "title", FilterRule::Contains),
    FilterDef::new("minSalary", "salary", FilterRule::AtLeast),
    FilterDef::new("hasEquity", "equity", FilterRule::FlagTrue),
];

// equity is NUMERIC in storage and a decimal string on the wire
const COLUMNS: &str = "id, title, salary, equity::text AS equity, company_handle";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<String>,
    pub company_handle: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewJob {
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<String>,
    pub company_handle: String,
}

/// Which compiled update values go to the NUMERIC `equity` column. The
/// update compiler emits one value per key, in key order.
fn numeric_positions(data: &SparseUpdate) -> Vec<bool> {
    data.keys().map(|key| key == "equity").collect()
}

impl Job {
    /// Insert a job. Fails with `NotFound` when the company does not exist.
    pub async fn create(pool: &PgPool, data: NewJob) -> Result<Job, DatabaseError> {
        let company = sqlx::query("SELECT handle FROM companies WHERE handle = $1")
            .bind(&data.company_handle)
            .fetch_optional(pool)
            .await?;
        if company.is_none() {
            return Err(DatabaseError::NotFound(format!("No company: {}", data.company_handle)));
        }

        let sql = format!(
            "INSERT INTO jobs (title, salary, equity, company_handle) \
             VALUES ($1, $2, $3, $4) RETURNING {}",
            COLUMNS
        );
        let job = sqlx::query_as::<_, Job>(&sql)
            .bind(&data.title)
            .bind(data.salary)
            .bind(data.equity.as_deref().map(decimal).transpose()?)
            .bind(&data.company_handle)
            .fetch_one(pool)
            .await?;

        tracing::info!("Created job {} for {}", job.id, job.company_handle);
        Ok(job)
    }

    /// All jobs matching `filters`, ordered by title.
    pub async fn find_all(pool: &PgPool, filters: &FilterSpec) -> Result<Vec<Job>, DatabaseError> {
        let where_clause = sql_for_filters(filters, JOB_FILTERS);
        let sql = format!(
            "SELECT {} FROM jobs {} ORDER BY title",
            COLUMNS, where_clause.predicate
        );
        tracing::debug!("Job filter: {} {:?}", sql, where_clause.values);

        let rows = bind_values_as(sqlx::query_as::<_, Job>(&sql), &where_clause.values)
            .fetch_all(pool)
            .await?;
        Ok(rows)
    }

    pub async fn get(pool: &PgPool, id: i32) -> Result<Job, DatabaseError> {
        let sql = format!("SELECT {} FROM jobs WHERE id = $1", COLUMNS);
        sqlx::query_as::<_, Job>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("No job: {}", id)))
    }

    /// Apply a partial update of `title`, `salary` and/or `equity`.
    pub async fn update(pool: &PgPool, id: i32, data: &SparseUpdate) -> Result<Job, DatabaseError> {
        let set = sql_for_partial_update(data, &JOB_FIELDS)?;
        let sql = format!(
            "UPDATE jobs SET {} WHERE id = ${} RETURNING {}",
            set.set_clause(),
            set.next_placeholder(),
            COLUMNS
        );
        tracing::debug!("Job update: {} {:?}", sql, set.values);

        bind_values_as_numeric(sqlx::query_as::<_, Job>(&sql), &set.values, &numeric_positions(data))?
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("No job: {}", id)))
    }

    pub async fn remove(pool: &PgPool, id: i32) -> Result<(), DatabaseError> {
        let deleted = sqlx::query("DELETE FROM jobs WHERE id = $1 RETURNING id")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        match deleted {
            Some(_) => Ok(()),
            None => Err(DatabaseError::NotFound(format!("No job: {}", id))),
        }
    }
}
