//! Fractional job listings and the search filter applied to them.
//!
//! A search runs in two stages. The store narrows active fractional listings
//! by department and location substring, newest first. [`JobQuery::accepts`]
//! then applies the country and workplace rules, and [`JobQuery::paginate`]
//! cuts out the requested page.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type JobId = Uuid;

/// Largest page a caller may ask for.
pub const MAX_PAGE_SIZE: u32 = 50;
pub const DEFAULT_PAGE_SIZE: u32 = 20;

// ─── Workplace ───────────────────────────────────────────────────────────────

/// Where the work happens, as recorded on the listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkplaceType {
  Remote,
  Hybrid,
  #[serde(rename = "On-site", alias = "Onsite")]
  Onsite,
}

impl WorkplaceType {
  /// Must match the serde tags above.
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Remote => "Remote",
      Self::Hybrid => "Hybrid",
      Self::Onsite => "On-site",
    }
  }

  /// Parse a stored label. Unknown labels yield `None`.
  pub fn from_label(label: &str) -> Option<Self> {
    match label {
      "Remote" => Some(Self::Remote),
      "Hybrid" => Some(Self::Hybrid),
      "On-site" | "Onsite" => Some(Self::Onsite),
      _ => None,
    }
  }

  /// Parse the `remote` search parameter: `remote`/`true`, `hybrid`, `onsite`.
  pub fn from_param(param: &str) -> Option<Self> {
    match param {
      "remote" | "true" => Some(Self::Remote),
      "hybrid" => Some(Self::Hybrid),
      "onsite" => Some(Self::Onsite),
      _ => None,
    }
  }
}

// ─── Country ─────────────────────────────────────────────────────────────────

/// Market a search is restricted to. Listings match on location keywords.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Country {
  #[default]
  Uk,
  Us,
  Au,
  Nz,
}

const UK_KEYWORDS: &[&str] = &[
  "united kingdom", "england", "scotland", "wales", "northern ireland",
  "london", "manchester", "birmingham", "edinburgh", "glasgow",
  "bristol", "leeds", "liverpool", "cambridge", "oxford", "uk",
];

const US_KEYWORDS: &[&str] = &[
  "united states", "usa", "america",
  "new york", "san francisco", "los angeles", "chicago", "boston",
  "austin", "seattle", "denver", "miami", "atlanta", "dallas",
];

const AU_KEYWORDS: &[&str] = &[
  "australia",
  "sydney", "melbourne", "brisbane", "perth", "adelaide",
  "canberra", "hobart", "darwin", "gold coast",
];

const NZ_KEYWORDS: &[&str] = &[
  "new zealand", "nz",
  "auckland", "wellington", "christchurch", "hamilton", "tauranga", "dunedin",
];

impl Country {
  /// Parse a country code; anything unrecognised falls back to the UK.
  pub fn from_code(code: &str) -> Self {
    match code.to_ascii_lowercase().as_str() {
      "us" => Self::Us,
      "au" => Self::Au,
      "nz" => Self::Nz,
      _ => Self::Uk,
    }
  }

  pub fn keywords(self) -> &'static [&'static str] {
    match self {
      Self::Uk => UK_KEYWORDS,
      Self::Us => US_KEYWORDS,
      Self::Au => AU_KEYWORDS,
      Self::Nz => NZ_KEYWORDS,
    }
  }

  /// Remote listings count for every country; a missing location for none.
  pub fn contains(self, location: Option<&str>) -> bool {
    let Some(location) = location else {
      return false;
    };
    let location = location.to_lowercase();
    location == "remote" || self.keywords().iter().any(|k| location.contains(k))
  }
}

// ─── Departments ─────────────────────────────────────────────────────────────

/// Role names used by the marketing pages, mapped to stored `role_category`.
const DEPARTMENT_ALIASES: &[(&str, &str)] = &[
  ("Technology", "Engineering"),
  ("Engineering", "Engineering"),
  ("Marketing", "Marketing"),
  ("Finance", "Finance"),
  ("Operations", "Operations"),
  ("Sales", "Sales"),
  ("HR", "HR"),
  ("Product", "Product"),
  ("Legal", "Legal"),
  ("Design", "Design"),
  ("Data", "Data"),
  ("Executive", "Executive"),
  ("Compliance", "Legal"),
  ("Innovation", "Engineering"),
  ("Strategy", "Executive"),
  ("Communications", "Marketing"),
  ("Sustainability", "Operations"),
];

/// The `role_category` searched for `role`. Unknown roles pass through as-is.
pub fn department_for(role: &str) -> String {
  DEPARTMENT_ALIASES
    .iter()
    .find(|(alias, _)| alias.eq_ignore_ascii_case(role))
    .map(|(_, department)| (*department).to_owned())
    .unwrap_or_else(|| role.to_owned())
}

// ─── Listings ────────────────────────────────────────────────────────────────

/// An active fractional job listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
  pub id:              JobId,
  pub slug:            String,
  pub title:           String,
  pub company_name:    Option<String>,
  pub location:        Option<String>,
  pub is_remote:       bool,
  pub workplace_type:  Option<WorkplaceType>,
  pub compensation:    Option<String>,
  pub role_category:   Option<String>,
  #[serde(default)]
  pub skills_required: Vec<String>,
  pub posted_date:     Option<NaiveDate>,
  pub hours_per_week:  Option<String>,
}

impl Job {
  /// Flagged remote, or a remote workplace.
  pub fn is_remote_friendly(&self) -> bool {
    self.is_remote || self.workplace_type == Some(WorkplaceType::Remote)
  }

  fn matches_workplace(&self, wanted: WorkplaceType) -> bool {
    match wanted {
      WorkplaceType::Remote => {
        self.is_remote_friendly()
          || self.location.as_deref().is_some_and(|l| l.eq_ignore_ascii_case("remote"))
      }
      WorkplaceType::Hybrid => self.workplace_type == Some(WorkplaceType::Hybrid),
      WorkplaceType::Onsite => match self.workplace_type {
        Some(WorkplaceType::Onsite) => true,
        Some(_) => false,
        None => !self.is_remote,
      },
    }
  }
}

fn yes() -> bool { true }

/// A listing to store. Built with [`NewJob::new`] and struct update syntax,
/// or read from an import file where only `slug` and `title` are required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewJob {
  pub slug:            String,
  pub title:           String,
  #[serde(default)]
  pub company_name:    Option<String>,
  #[serde(default)]
  pub location:        Option<String>,
  #[serde(default)]
  pub is_remote:       bool,
  #[serde(default)]
  pub workplace_type:  Option<WorkplaceType>,
  #[serde(default)]
  pub compensation:    Option<String>,
  #[serde(default)]
  pub role_category:   Option<String>,
  #[serde(default)]
  pub skills_required: Vec<String>,
  #[serde(default)]
  pub posted_date:     Option<NaiveDate>,
  #[serde(default)]
  pub hours_per_week:  Option<String>,
  /// Inactive or full-time listings never show up in searches.
  #[serde(default = "yes")]
  pub is_active:       bool,
  #[serde(default = "yes")]
  pub is_fractional:   bool,
}

impl NewJob {
  /// An active fractional listing with nothing but a slug and a title.
  pub fn new(slug: impl Into<String>, title: impl Into<String>) -> Self {
    Self {
      slug:            slug.into(),
      title:           title.into(),
      company_name:    None,
      location:        None,
      is_remote:       false,
      workplace_type:  None,
      compensation:    None,
      role_category:   None,
      skills_required: Vec::new(),
      posted_date:     None,
      hours_per_week:  None,
      is_active:       true,
      is_fractional:   true,
    }
  }
}

// ─── Query ───────────────────────────────────────────────────────────────────

/// Filters and paging for a job search.
#[derive(Debug, Clone, PartialEq)]
pub struct JobQuery {
  /// Stored `role_category` to match exactly, already alias-mapped.
  pub department:    Option<String>,
  /// Case-insensitive substring of the listing's location.
  pub location:      Option<String>,
  pub workplace:     Option<WorkplaceType>,
  pub country:       Country,
  /// Skip the country filter entirely.
  pub international: bool,
  /// 1-based.
  pub page:          u32,
  pub limit:         u32,
}

impl Default for JobQuery {
  fn default() -> Self {
    Self {
      department:    None,
      location:      None,
      workplace:     None,
      country:       Country::default(),
      international: false,
      page:          1,
      limit:         DEFAULT_PAGE_SIZE,
    }
  }
}

impl JobQuery {
  /// Filter by role; accepts department aliases. Blank roles are ignored.
  pub fn with_role(mut self, role: &str) -> Self {
    let role = role.trim();
    self.department = (!role.is_empty()).then(|| department_for(role));
    self
  }

  /// Filter by location substring. Blank locations are ignored.
  pub fn with_location(mut self, location: &str) -> Self {
    let location = location.trim();
    self.location = (!location.is_empty()).then(|| location.to_owned());
    self
  }

  pub fn with_workplace(mut self, workplace: Option<WorkplaceType>) -> Self {
    self.workplace = workplace;
    self
  }

  pub fn in_country(mut self, country: Country) -> Self {
    self.country = country;
    self
  }

  pub fn international(mut self, international: bool) -> Self {
    self.international = international;
    self
  }

  /// Page numbers start at 1; 0 is treated as 1.
  pub fn page(mut self, page: u32) -> Self {
    self.page = page.max(1);
    self
  }

  /// Page size, clamped to `1..=MAX_PAGE_SIZE`.
  pub fn limit(mut self, limit: u32) -> Self {
    self.limit = limit.clamp(1, MAX_PAGE_SIZE);
    self
  }

  /// Lowercased needle for the store's location match.
  ///
  /// `remote` is not a place: it is handled by the country rule instead.
  pub fn location_needle(&self) -> Option<String> {
    self
      .location
      .as_deref()
      .map(str::to_lowercase)
      .filter(|l| l != "remote")
  }

  /// Country and workplace rules, applied after the store's narrowing.
  pub fn accepts(&self, job: &Job) -> bool {
    let in_market = self.international || self.country.contains(job.location.as_deref());
    in_market && self.workplace.is_none_or(|w| job.matches_workplace(w))
  }

  /// Filter `candidates` (already narrowed and ordered by the store) and
  /// return the requested page.
  pub fn paginate(&self, candidates: Vec<Job>) -> JobPage {
    let matching: Vec<Job> = candidates.into_iter().filter(|j| self.accepts(j)).collect();
    let total = matching.len();
    let offset = (self.page as usize).saturating_sub(1) * self.limit as usize;
    let jobs = matching.into_iter().skip(offset).take(self.limit as usize).collect();
    JobPage {
      jobs,
      total,
      page: self.page,
      limit: self.limit,
      total_pages: total.div_ceil(self.limit.max(1) as usize),
    }
  }
}

/// One page of search results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPage {
  pub jobs:        Vec<Job>,
  /// Matches across all pages.
  pub total:       usize,
  pub page:        u32,
  pub limit:       u32,
  #[serde(rename = "totalPages")]
  pub total_pages: usize,
}

#[cfg(test)]
mod tests {
  use super::*;

  fn job(slug: &str, location: Option<&str>) -> Job {
    Job {
      id:              Uuid::new_v4(),
      slug:            slug.to_owned(),
      title:           format!("Fractional {slug}"),
      company_name:    None,
      location:        location.map(str::to_owned),
      is_remote:       false,
      workplace_type:  None,
      compensation:    None,
      role_category:   None,
      skills_required: Vec::new(),
      posted_date:     None,
      hours_per_week:  None,
    }
  }

  #[test]
  fn department_aliases_map_to_stored_categories() {
    assert_eq!(department_for("Technology"), "Engineering");
    assert_eq!(department_for("strategy"), "Executive");
    assert_eq!(department_for("Compliance"), "Legal");
    assert_eq!(department_for("Procurement"), "Procurement");
  }

  #[test]
  fn country_matches_keywords_case_insensitively() {
    assert!(Country::Uk.contains(Some("Central LONDON")));
    assert!(Country::Uk.contains(Some("Remote")));
    assert!(!Country::Uk.contains(Some("Sydney, NSW")));
    assert!(!Country::Uk.contains(None));
    assert!(Country::Au.contains(Some("Sydney, NSW")));
    assert_eq!(Country::from_code("NZ"), Country::Nz);
    assert_eq!(Country::from_code("fr"), Country::Uk);
  }

  #[test]
  fn international_skips_country_filter() {
    let sydney = job("cfo", Some("Sydney"));
    assert!(!JobQuery::default().accepts(&sydney));
    assert!(JobQuery::default().international(true).accepts(&sydney));
    assert!(JobQuery::default().international(true).accepts(&job("cto", None)));
  }

  #[test]
  fn workplace_filters() {
    let mut remote = job("remote", Some("London"));
    remote.is_remote = true;
    let mut hybrid = job("hybrid", Some("Leeds"));
    hybrid.workplace_type = Some(WorkplaceType::Hybrid);
    let unlabelled = job("office", Some("Bristol"));
    let listed_remote = job("anywhere", Some("remote"));

    let remote_q = JobQuery::default().with_workplace(WorkplaceType::from_param("true"));
    assert!(remote_q.accepts(&remote));
    assert!(remote_q.accepts(&listed_remote));
    assert!(!remote_q.accepts(&hybrid));

    let hybrid_q = JobQuery::default().with_workplace(Some(WorkplaceType::Hybrid));
    assert!(hybrid_q.accepts(&hybrid));
    assert!(!hybrid_q.accepts(&unlabelled));

    let onsite_q = JobQuery::default().with_workplace(WorkplaceType::from_param("onsite"));
    assert!(onsite_q.accepts(&unlabelled));
    assert!(!onsite_q.accepts(&remote));
    assert!(!onsite_q.accepts(&hybrid));
  }

  #[test]
  fn remote_location_is_not_a_substring_filter() {
    assert_eq!(JobQuery::default().with_location(" Remote ").location_needle(), None);
    assert_eq!(
      JobQuery::default().with_location("Manchester").location_needle().as_deref(),
      Some("manchester")
    );
    assert_eq!(JobQuery::default().with_location("  ").location, None);
  }

  #[test]
  fn paging_is_clamped_and_counts_filtered_total() {
    let q = JobQuery::default().page(0).limit(500);
    assert_eq!((q.page, q.limit), (1, MAX_PAGE_SIZE));

    let candidates: Vec<Job> = (0..5)
      .map(|i| job(&format!("uk-{i}"), Some("London")))
      .chain([job("us", Some("Boston"))])
      .collect();

    let page = JobQuery::default().limit(2).page(3).paginate(candidates);
    assert_eq!(page.total, 5);
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.jobs.len(), 1);
    assert_eq!(page.jobs[0].slug, "uk-4");
  }

  #[test]
  fn onsite_label_accepts_both_spellings() {
    let a: WorkplaceType = serde_json::from_str("\"Onsite\"").unwrap();
    let b: WorkplaceType = serde_json::from_str("\"On-site\"").unwrap();
    assert_eq!(a, b);
    assert_eq!(serde_json::to_string(&a).unwrap(), "\"On-site\"");
    assert_eq!(WorkplaceType::from_label("Onsite"), Some(WorkplaceType::Onsite));
  }
}
