//! Node/edge projection of a profile for force-directed rendering.
//!
//! The projection is a star: one `user` node in the centre and one node per
//! item, each linked to the user. Layout is left to the renderer.

use serde::{Deserialize, Serialize};

use crate::{ItemType, ProfileItem};

pub const USER_NODE_ID: &str = "user";

/// Node weights. Confirmed items render larger than tentative ones.
pub const USER_WEIGHT: u32 = 25;
pub const CONFIRMED_WEIGHT: u32 = 18;
pub const TENTATIVE_WEIGHT: u32 = 14;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
  User,
  Location,
  Role,
  Company,
  Skill,
}

impl NodeKind {
  /// Legend colour as a hex string.
  pub fn color(self) -> &'static str {
    match self {
      Self::User => "#FFD700",
      Self::Location => "#10B981",
      Self::Role => "#3B82F6",
      Self::Company => "#F97316",
      Self::Skill => "#A855F7",
    }
  }
}

impl From<ItemType> for NodeKind {
  fn from(t: ItemType) -> Self {
    match t {
      ItemType::Location => Self::Location,
      ItemType::RolePreference => Self::Role,
      ItemType::Company => Self::Company,
      ItemType::Skill => Self::Skill,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
  pub id:   String,
  pub name: String,
  #[serde(rename = "type")]
  pub kind: NodeKind,
  pub val:  u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphLink {
  pub source: String,
  pub target: String,
}

/// The `{nodes, links}` shape consumed by force-graph renderers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileGraph {
  pub nodes: Vec<GraphNode>,
  pub links: Vec<GraphLink>,
}

impl ProfileGraph {
  /// Every node except the central user node.
  pub fn tag_nodes(&self) -> impl Iterator<Item = &GraphNode> {
    self.nodes.iter().filter(|n| n.kind != NodeKind::User)
  }
}

/// Project `items` into a star graph centred on the user.
pub fn project(user_name: Option<&str>, items: &[ProfileItem]) -> ProfileGraph {
  let mut nodes = Vec::with_capacity(items.len() + 1);
  let mut links = Vec::with_capacity(items.len());

  nodes.push(GraphNode {
    id:   USER_NODE_ID.to_owned(),
    name: user_name.filter(|n| !n.is_empty()).unwrap_or("You").to_owned(),
    kind: NodeKind::User,
    val:  USER_WEIGHT,
  });

  for (i, item) in items.iter().enumerate() {
    let id = format!("item_{i}");
    nodes.push(GraphNode {
      id:   id.clone(),
      name: item.value.clone(),
      kind: item.item_type.into(),
      val:  if item.confirmed { CONFIRMED_WEIGHT } else { TENTATIVE_WEIGHT },
    });
    links.push(GraphLink { source: USER_NODE_ID.to_owned(), target: id });
  }

  ProfileGraph { nodes, links }
}
