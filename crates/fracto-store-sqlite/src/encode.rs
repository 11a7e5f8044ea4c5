//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are fixed-width RFC 3339 strings so they sort lexically.
//! Metadata and skill lists are compact JSON. UUIDs are hyphenated
//! lowercase strings. Posting dates are `YYYY-MM-DD`.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use fracto_core::{ItemMetadata, ItemType, Job, ProfileItem, WorkplaceType};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339_opts(SecondsFormat::Micros, true) }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Metadata ─────────────────────────────────────────────────────────────────

pub fn encode_metadata(m: &ItemMetadata) -> Result<String> { Ok(serde_json::to_string(m)?) }

pub fn decode_metadata(s: &str) -> Result<ItemMetadata> {
  // Rows written by other tools may hold `null`.
  let value: Option<ItemMetadata> = serde_json::from_str(s)?;
  Ok(value.unwrap_or_default())
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching [`RawItem::from_row`].
pub const ITEM_COLUMNS: &str = "id, item_type, value, metadata_json, confirmed, created_at";

/// Raw values read directly from a `user_profile_items` row.
pub struct RawItem {
  pub id:            String,
  pub item_type:     String,
  pub value:         String,
  pub metadata_json: String,
  pub confirmed:     bool,
  pub created_at:    String,
}

impl RawItem {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:            row.get(0)?,
      item_type:     row.get(1)?,
      value:         row.get(2)?,
      metadata_json: row.get(3)?,
      confirmed:     row.get(4)?,
      created_at:    row.get(5)?,
    })
  }

  pub fn into_item(self) -> Result<ProfileItem> {
    Ok(ProfileItem {
      id:         Some(decode_uuid(&self.id)?),
      item_type:  self.item_type.parse::<ItemType>()?,
      value:      self.value,
      metadata:   decode_metadata(&self.metadata_json)?,
      confirmed:  self.confirmed,
      created_at: Some(decode_dt(&self.created_at)?),
    })
  }
}

/// Column list matching [`RawJob::from_row`].
pub const JOB_COLUMNS: &str = "id, slug, title, company_name, location, is_remote, workplace_type, \
   compensation, role_category, skills_json, posted_date, hours_per_week";

/// Raw values read directly from a `jobs` row.
pub struct RawJob {
  pub id:             String,
  pub slug:           String,
  pub title:          String,
  pub company_name:   Option<String>,
  pub location:       Option<String>,
  pub is_remote:      bool,
  pub workplace_type: Option<String>,
  pub compensation:   Option<String>,
  pub role_category:  Option<String>,
  pub skills_json:    String,
  pub posted_date:    Option<String>,
  pub hours_per_week: Option<String>,
}

impl RawJob {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:             row.get(0)?,
      slug:           row.get(1)?,
      title:          row.get(2)?,
      company_name:   row.get(3)?,
      location:       row.get(4)?,
      is_remote:      row.get(5)?,
      workplace_type: row.get(6)?,
      compensation:   row.get(7)?,
      role_category:  row.get(8)?,
      skills_json:    row.get(9)?,
      posted_date:    row.get(10)?,
      hours_per_week: row.get(11)?,
    })
  }

  pub fn into_job(self) -> Result<Job> {
    // Unknown workplace labels are treated as unlabelled.
    let workplace_type = self.workplace_type.as_deref().and_then(WorkplaceType::from_label);
    let skills: Option<Vec<String>> = serde_json::from_str(&self.skills_json)?;
    Ok(Job {
      id: decode_uuid(&self.id)?,
      slug: self.slug,
      title: self.title,
      company_name: self.company_name,
      location: self.location,
      is_remote: self.is_remote,
      workplace_type,
      compensation: self.compensation,
      role_category: self.role_category,
      skills_required: skills.unwrap_or_default(),
      posted_date: self.posted_date.as_deref().map(decode_date).transpose()?,
      hours_per_week: self.hours_per_week,
    })
  }
}
