//! Profile categories and their input rules.
//!
//! Every [`ItemType`] carries a static [`CategorySpec`] describing how many
//! values it may hold and which input it takes. Adding a category means adding
//! a variant and its spec; callers never branch on category names.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Error, ItemMetadata, Result};

// ─── Suggested options ───────────────────────────────────────────────────────

/// Escape hatch offered at the end of a choice list.
pub const OTHER_OPTION: &str = "Other...";

/// Common target roles. Not exhaustive: the store accepts any value.
pub const SUGGESTED_ROLES: &[&str] = &[
  "CEO", "CFO", "CMO", "CTO", "COO", "CHRO", "CIO", "CISO", "CPO", "CRO", "CCO", "CSO",
  "VP Engineering", "VP Sales", "VP Marketing", "VP Operations", "VP Product",
  "Director", "Managing Director", "General Manager",
  "Board Member", "Non-Executive Director", "Advisor",
];

/// Common locations: UK cities, work arrangements, international hubs.
pub const SUGGESTED_LOCATIONS: &[&str] = &[
  "London", "Manchester", "Birmingham", "Leeds", "Glasgow", "Liverpool",
  "Edinburgh", "Bristol", "Sheffield", "Newcastle", "Nottingham", "Cardiff",
  "Belfast", "Leicester", "Southampton", "Brighton", "Oxford", "Cambridge",
  "Remote", "Hybrid", "Hybrid - London", "Hybrid - Manchester",
  "New York", "San Francisco", "Berlin", "Dublin", "Amsterdam", "Paris",
  OTHER_OPTION,
];

// ─── Descriptors ─────────────────────────────────────────────────────────────

/// How many items of a category a user may hold at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
  /// At most one; adding replaces the existing item.
  Single,
  Multi,
}

/// The input a category takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
  /// Pick from suggestions. The list is advisory, not a whitelist.
  Choice { options: &'static [&'static str] },
  FreeText,
}

impl InputKind {
  /// Trim `raw` and reject it if nothing is left.
  pub fn normalize(&self, raw: &str) -> Result<String> {
    let value = raw.trim();
    if value.is_empty() {
      return Err(Error::EmptyValue);
    }
    Ok(value.to_owned())
  }

  /// `true` if `value` is one of the suggestions (case-insensitive).
  /// Free-text inputs have no suggestions, so this is always `false` there.
  pub fn is_suggested(&self, value: &str) -> bool {
    match self {
      Self::Choice { options } => options
        .iter()
        .any(|o| *o != OTHER_OPTION && o.eq_ignore_ascii_case(value.trim())),
      Self::FreeText => false,
    }
  }

  pub fn options(&self) -> &'static [&'static str] {
    match self {
      Self::Choice { options } => options,
      Self::FreeText => &[],
    }
  }
}

/// Display and input rules for one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategorySpec {
  pub label:       &'static str,
  pub placeholder: &'static str,
  pub icon:        &'static str,
  /// Colour family name used by front ends (`emerald`, `blue`, ...).
  pub color:       &'static str,
  pub cardinality: Cardinality,
  pub input:       InputKind,
}

const LOCATION: CategorySpec = CategorySpec {
  label:       "Location",
  placeholder: "Select location...",
  icon:        "◉",
  color:       "emerald",
  cardinality: Cardinality::Single,
  input:       InputKind::Choice { options: SUGGESTED_LOCATIONS },
};

const ROLE_PREFERENCE: CategorySpec = CategorySpec {
  label:       "Target Role",
  placeholder: "Select role...",
  icon:        "◎",
  color:       "blue",
  cardinality: Cardinality::Single,
  input:       InputKind::Choice { options: SUGGESTED_ROLES },
};

const COMPANY: CategorySpec = CategorySpec {
  label:       "Companies",
  placeholder: "e.g., Google, Microsoft",
  icon:        "▣",
  color:       "orange",
  cardinality: Cardinality::Multi,
  input:       InputKind::FreeText,
};

const SKILL: CategorySpec = CategorySpec {
  label:       "Skills",
  placeholder: "e.g., Leadership, Strategy, Python",
  icon:        "★",
  color:       "purple",
  cardinality: Cardinality::Multi,
  input:       InputKind::FreeText,
};

// ─── ItemType ────────────────────────────────────────────────────────────────

/// The category of a profile item. The snake_case name is the `item_type`
/// stored in the database and sent over the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
  Location,
  /// Older rows and clients use `role`.
  #[serde(alias = "role")]
  RolePreference,
  Company,
  Skill,
}

impl ItemType {
  /// Display order of the profile sections.
  pub const ALL: [ItemType; 4] =
    [Self::Location, Self::RolePreference, Self::Company, Self::Skill];

  pub fn spec(self) -> &'static CategorySpec {
    match self {
      Self::Location => &LOCATION,
      Self::RolePreference => &ROLE_PREFERENCE,
      Self::Company => &COMPANY,
      Self::Skill => &SKILL,
    }
  }

  pub fn is_single(self) -> bool { self.spec().cardinality == Cardinality::Single }

  /// Trim and validate a raw value for this category.
  pub fn normalize(self, raw: &str) -> Result<String> { self.spec().input.normalize(raw) }

  /// Must match the `rename_all = "snake_case"` serde tags above.
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Location => "location",
      Self::RolePreference => "role_preference",
      Self::Company => "company",
      Self::Skill => "skill",
    }
  }

  /// Natural-language statement of an item, e.g. "User is based in London".
  pub fn fact_sentence(self, value: &str, metadata: &ItemMetadata) -> String {
    match self {
      Self::Company => {
        let title = metadata.job_title.as_deref().unwrap_or("a role");
        format!("User worked at {value} as {title}")
      }
      Self::Location => format!("User is based in {value}"),
      Self::RolePreference => format!("User is interested in {value} roles"),
      Self::Skill => format!("User has experience with {value}"),
    }
  }
}

impl fmt::Display for ItemType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for ItemType {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    match s {
      "location" => Ok(Self::Location),
      // `role` is accepted as a legacy alias.
      "role_preference" | "role" => Ok(Self::RolePreference),
      "company" => Ok(Self::Company),
      "skill" => Ok(Self::Skill),
      other => Err(Error::UnknownItemType(other.to_owned())),
    }
  }
}
