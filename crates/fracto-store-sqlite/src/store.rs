//! [`SqliteStore`], the SQLite implementation of [`TagStore`] and [`JobStore`].

use std::path::Path;

use chrono::Utc;
use fracto_core::{
  ItemId, Job, JobPage, JobQuery, NewJob, NewProfileItem, ProfileItem, WorkplaceType,
  store::{JobStore, TagStore},
};
use uuid::Uuid;

use crate::{
  Result,
  encode::{
    ITEM_COLUMNS, JOB_COLUMNS, RawItem, RawJob, encode_date, encode_dt, encode_metadata,
    encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A profile tag store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, mostly for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Add a listing to the job board, replacing any listing with the same
  /// slug. The replaced listing keeps its id.
  pub async fn upsert_job(&self, job: NewJob) -> Result<Job> {
    let id_str    = encode_uuid(Uuid::new_v4());
    let skills    = serde_json::to_string(&job.skills_required)?;
    let posted    = job.posted_date.map(encode_date);
    let workplace = job.workplace_type.map(WorkplaceType::as_str);

    let raw: RawJob = self
      .conn
      .call(move |conn| {
        let row = conn.query_row(
          &format!(
            "INSERT INTO jobs (
               id, slug, title, company_name, location, is_remote, workplace_type,
               compensation, role_category, skills_json, posted_date, hours_per_week,
               is_active, is_fractional
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
             ON CONFLICT (slug) DO UPDATE SET
               title          = excluded.title,
               company_name   = excluded.company_name,
               location       = excluded.location,
               is_remote      = excluded.is_remote,
               workplace_type = excluded.workplace_type,
               compensation   = excluded.compensation,
               role_category  = excluded.role_category,
               skills_json    = excluded.skills_json,
               posted_date    = excluded.posted_date,
               hours_per_week = excluded.hours_per_week,
               is_active      = excluded.is_active,
               is_fractional  = excluded.is_fractional
             RETURNING {JOB_COLUMNS}"
          ),
          rusqlite::params![
            id_str,
            job.slug,
            job.title,
            job.company_name,
            job.location,
            job.is_remote,
            workplace,
            job.compensation,
            job.role_category,
            skills,
            posted,
            job.hours_per_week,
            job.is_active,
            job.is_fractional,
          ],
          RawJob::from_row,
        )?;
        Ok(row)
      })
      .await?;

    let job = raw.into_job()?;
    tracing::debug!(id = %job.id, slug = %job.slug, "stored job listing");
    Ok(job)
  }
}

// ─── TagStore impl ───────────────────────────────────────────────────────────

impl TagStore for SqliteStore {
  type Error = crate::Error;

  async fn list_items(&self, user_id: &str) -> Result<Vec<ProfileItem>> {
    let user_id = user_id.to_owned();

    let raws: Vec<RawItem> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {ITEM_COLUMNS}
           FROM user_profile_items
           WHERE user_id = ?1
           ORDER BY created_at DESC, rowid DESC"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![user_id], RawItem::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawItem::into_item).collect()
  }

  async fn create_item(&self, input: NewProfileItem) -> Result<ProfileItem> {
    let id_str        = encode_uuid(Uuid::new_v4());
    let now_str       = encode_dt(Utc::now());
    let metadata_str  = encode_metadata(&input.metadata)?;
    let item_type_str = input.item_type.as_str();
    let NewProfileItem { user_id, value, confirmed, .. } = input;

    let raw: RawItem = self
      .conn
      .call(move |conn| {
        let row = conn.query_row(
          &format!(
            "INSERT INTO user_profile_items (
               id, user_id, item_type, value, metadata_json, confirmed, created_at, updated_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
             ON CONFLICT (user_id, item_type, value) DO UPDATE SET
               metadata_json = excluded.metadata_json,
               confirmed     = excluded.confirmed,
               updated_at    = excluded.updated_at
             RETURNING {ITEM_COLUMNS}"
          ),
          rusqlite::params![
            id_str,
            user_id,
            item_type_str,
            value,
            metadata_str,
            confirmed,
            now_str,
          ],
          RawItem::from_row,
        )?;
        Ok(row)
      })
      .await?;

    let item = raw.into_item()?;
    tracing::debug!(id = ?item.id, item_type = %item.item_type, "stored profile item");
    Ok(item)
  }

  async fn delete_item(&self, user_id: &str, item_id: ItemId) -> Result<bool> {
    let user_id = user_id.to_owned();
    let id_str  = encode_uuid(item_id);

    let removed = self
      .conn
      .call(move |conn| {
        let n = conn.execute(
          "DELETE FROM user_profile_items WHERE id = ?1 AND user_id = ?2",
          rusqlite::params![id_str, user_id],
        )?;
        Ok(n)
      })
      .await?;

    tracing::debug!(%item_id, removed, "deleted profile item");
    Ok(removed > 0)
  }
}

// ─── JobStore impl ───────────────────────────────────────────────────────────

impl JobStore for SqliteStore {
  type Error = crate::Error;

  async fn search_jobs(&self, query: &JobQuery) -> Result<JobPage> {
    let department = query.department.clone();
    let needle = query.location_needle();

    let raws: Vec<RawJob> = self
      .conn
      .call(move |conn| {
        let mut sql =
          format!("SELECT {JOB_COLUMNS} FROM jobs WHERE is_active = 1 AND is_fractional = 1");
        let mut args: Vec<String> = Vec::new();
        if let Some(department) = department {
          args.push(department);
          sql.push_str(&format!(" AND role_category = ?{}", args.len()));
        }
        if let Some(needle) = needle {
          args.push(needle);
          sql.push_str(&format!(
            " AND instr(lower(coalesce(location, '')), ?{}) > 0",
            args.len()
          ));
        }
        sql.push_str(" ORDER BY posted_date DESC NULLS LAST, rowid DESC");

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(args), RawJob::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    let candidates = raws.into_iter().map(RawJob::into_job).collect::<Result<Vec<_>>>()?;
    let page = query.paginate(candidates);
    tracing::debug!(total = page.total, page = page.page, "searched job listings");
    Ok(page)
  }
}
