//! Handler for `GET /jobs/search`.
//!
//! | Param           | Default | Notes |
//! |-----------------|---------|-------|
//! | `role`          | none    | department or alias, e.g. `Technology` searches `Engineering` |
//! | `location`      | none    | case-insensitive substring; `remote` is ignored here |
//! | `remote`        | none    | `remote`/`true`, `hybrid` or `onsite` |
//! | `country`       | `uk`    | `uk`, `us`, `au` or `nz`; unknown codes mean `uk` |
//! | `international` | `false` | `true` skips the country filter |
//! | `page`, `limit` | 1, 20   | `limit` is capped at 50 |
//!
//! Unparseable numbers fall back to their defaults rather than failing.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
};
use chrono::NaiveDate;
use fracto_core::{
  Country, Job, JobId, JobQuery, WorkplaceType,
  jobs::DEFAULT_PAGE_SIZE,
  store::JobStore,
};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
  pub role:          Option<String>,
  pub location:      Option<String>,
  pub remote:        Option<String>,
  pub country:       Option<String>,
  pub international: Option<String>,
  pub page:          Option<String>,
  pub limit:         Option<String>,
}

impl From<SearchParams> for JobQuery {
  fn from(p: SearchParams) -> Self {
    let number = |raw: Option<String>, default: u32| {
      raw.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
    };
    JobQuery::default()
      .with_role(p.role.as_deref().unwrap_or_default())
      .with_location(p.location.as_deref().unwrap_or_default())
      .with_workplace(p.remote.as_deref().and_then(WorkplaceType::from_param))
      .in_country(p.country.as_deref().map(Country::from_code).unwrap_or_default())
      .international(p.international.as_deref() == Some("true"))
      .page(number(p.page, 1))
      .limit(number(p.limit, DEFAULT_PAGE_SIZE))
  }
}

/// A listing as sent to the job board page.
///
/// A missing location reads "Location TBD", and a remote workplace counts as
/// remote even when the listing's flag is unset.
#[derive(Debug, Serialize, Deserialize)]
pub struct JobListing {
  pub id:              JobId,
  pub slug:            String,
  pub title:           String,
  pub company_name:    Option<String>,
  pub location:        String,
  pub is_remote:       bool,
  pub workplace_type:  Option<WorkplaceType>,
  pub compensation:    Option<String>,
  pub role_category:   Option<String>,
  pub skills_required: Vec<String>,
  pub posted_date:     Option<NaiveDate>,
  pub hours_per_week:  Option<String>,
}

impl From<Job> for JobListing {
  fn from(job: Job) -> Self {
    Self {
      is_remote:       job.is_remote_friendly(),
      id:              job.id,
      slug:            job.slug,
      title:           job.title,
      company_name:    job.company_name,
      location:        job.location.unwrap_or_else(|| "Location TBD".to_owned()),
      workplace_type:  job.workplace_type,
      compensation:    job.compensation,
      role_category:   job.role_category,
      skills_required: job.skills_required,
      posted_date:     job.posted_date,
      hours_per_week:  job.hours_per_week,
    }
  }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
  pub jobs:        Vec<JobListing>,
  pub total:       usize,
  pub page:        u32,
  pub limit:       u32,
  #[serde(rename = "totalPages")]
  pub total_pages: usize,
}

/// `GET /jobs/search`
pub async fn search<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, ApiError>
where
  S: JobStore,
{
  let query = JobQuery::from(params);
  let page = store.search_jobs(&query).await.map_err(ApiError::search)?;
  Ok(Json(SearchResponse {
    jobs:        page.jobs.into_iter().map(JobListing::from).collect(),
    total:       page.total,
    page:        page.page,
    limit:       page.limit,
    total_pages: page.total_pages,
  }))
}
