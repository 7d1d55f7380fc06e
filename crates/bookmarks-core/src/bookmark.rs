use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Maximum stored length of a bookmark link.
pub const LINK_MAX_LEN: usize = 256;

/// Attributes returned by list queries (`updatedAt` is internal).
pub const LISTED_FIELDS: [&str; 5] = ["guid", "link", "createdAt", "description", "favorites"];

/// A persisted bookmark.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    pub guid: Uuid,
    pub link: String,
    /// Milliseconds since the Unix epoch.
    pub created_at: i64,
    /// Milliseconds since the Unix epoch.
    pub updated_at: i64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub favorites: bool,
}

impl Bookmark {
    pub fn new(guid: Uuid, link: impl Into<String>, now: i64) -> Self {
        Self {
            guid,
            link: link.into(),
            created_at: now,
            updated_at: now,
            description: None,
            favorites: false,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_favorites(mut self, favorites: bool) -> Self {
        self.favorites = favorites;
        self
    }

    /// Applies a partial update in place. `guid` and `created_at` never change.
    pub fn apply(&mut self, patch: &BookmarkPatch) {
        if let Some(link) = &patch.link {
            self.link = link.clone();
        }
        if let Some(description) = &patch.description {
            self.description = Some(description.clone());
        }
        if let Some(favorites) = patch.favorites {
            self.favorites = favorites;
        }
        self.updated_at = patch.updated_at;
    }

    /// Serializes only the requested attributes. Unknown names are skipped.
    pub fn project(&self, fields: &[String]) -> Map<String, Value> {
        let mut out = Map::with_capacity(fields.len());
        for field in fields {
            let value = match field.as_str() {
                "guid" => Value::String(self.guid.to_string()),
                "link" => Value::String(self.link.clone()),
                "createdAt" => Value::from(self.created_at),
                "updatedAt" => Value::from(self.updated_at),
                "description" => self
                    .description
                    .clone()
                    .map(Value::String)
                    .unwrap_or(Value::Null),
                "favorites" => Value::Bool(self.favorites),
                _ => continue,
            };
            out.insert(field.clone(), value);
        }
        out
    }
}

/// Partial update of a bookmark. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favorites: Option<bool>,
    pub updated_at: i64,
}

impl BookmarkPatch {
    pub fn new(updated_at: i64) -> Self {
        Self {
            updated_at,
            ..Default::default()
        }
    }

    /// Returns `true` if the patch only refreshes `updated_at`.
    pub fn is_touch_only(&self) -> bool {
        self.link.is_none() && self.description.is_none() && self.favorites.is_none()
    }
}
