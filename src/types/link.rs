//! Link data model: top-level tiles, folder children, and the tree nodes
//! the API serves. JSON uses camelCase field names throughout.

use serde::{Deserialize, Serialize};

/// How a top-level link renders on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    /// A single clickable tile.
    Icon,
    /// A folder tile that expands to show child links.
    List,
}

impl LinkKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkKind::Icon => "icon",
            LinkKind::List => "list",
        }
    }

    /// Parses the stored kind column. Unknown values read as `Icon`.
    pub fn from_db(value: &str) -> Self {
        match value {
            "list" => LinkKind::List,
            _ => LinkKind::Icon,
        }
    }
}

/// A top-level dashboard link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub id: String,
    /// `None` for the seeded global defaults.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
    /// Folder parents may have no target of their own.
    pub href: Option<String>,
    pub label: String,
    /// Icon image URL (stored upload or favicon service URL).
    pub icon: String,
    /// Deletion handle for an uploaded icon; absent for favicon URLs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_handle: Option<String>,
    pub kind: LinkKind,
    pub position: i32,
    pub visit_count: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid_row: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid_column: Option<i32>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// A link nested under a folder parent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildLink {
    pub id: String,
    pub parent_id: String,
    pub href: String,
    pub label: String,
    pub icon: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_handle: Option<String>,
    pub position: i32,
    pub created_at: i64,
    pub updated_at: i64,
}

/// A top-level link with its children attached, as served by the API.
///
/// `children` is absent (not an empty array) for links without children and
/// for plain icon links.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkNode {
    #[serde(flatten)]
    pub link: Link,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<ChildLink>>,
}

/// Input for creating a top-level link.
#[derive(Debug, Clone, Default)]
pub struct NewLink {
    pub owner_id: Option<String>,
    pub href: Option<String>,
    pub label: String,
    pub icon: String,
    pub icon_handle: Option<String>,
    pub kind: Option<LinkKind>,
    /// Appended after the owner's last link when `None`.
    pub position: Option<i32>,
}

/// Partial update for a top-level link. `None` leaves a field unchanged;
/// for the doubly-optional fields, `Some(None)` clears the stored value.
#[derive(Debug, Clone, Default)]
pub struct LinkPatch {
    pub href: Option<Option<String>>,
    pub label: Option<String>,
    pub icon: Option<String>,
    pub icon_handle: Option<Option<String>>,
    pub kind: Option<LinkKind>,
}

/// Input for creating a child link.
#[derive(Debug, Clone, Default)]
pub struct NewChildLink {
    pub parent_id: String,
    pub href: String,
    pub label: String,
    pub icon: String,
    pub icon_handle: Option<String>,
    pub position: Option<i32>,
}

/// Partial update for a child link.
#[derive(Debug, Clone, Default)]
pub struct ChildLinkPatch {
    pub href: Option<String>,
    pub label: Option<String>,
    pub icon: Option<String>,
    pub icon_handle: Option<Option<String>>,
}
