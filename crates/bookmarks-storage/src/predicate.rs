//! Query predicate types handed from the validation engine to storage.

use std::cmp::Ordering;
use std::fmt;

use bookmarks_core::Bookmark;
use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Deserialize, Serialize, Serializer};

/// Bookmark attributes that can be filtered and sorted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QueryField {
    #[serde(rename = "createdAt")]
    CreatedAt,
    #[serde(rename = "favorites")]
    Favorites,
}

impl QueryField {
    pub const ALL: [QueryField; 2] = [QueryField::CreatedAt, QueryField::Favorites];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreatedAt => "createdAt",
            Self::Favorites => "favorites",
        }
    }

    /// Exact, case-sensitive name lookup.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == name)
    }
}

impl fmt::Display for QueryField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    /// Case-insensitive parse of `asc` / `desc`.
    pub fn parse(value: &str) -> Option<Self> {
        if value.eq_ignore_ascii_case("asc") {
            Some(Self::Asc)
        } else if value.eq_ignore_ascii_case("desc") {
            Some(Self::Desc)
        } else {
            None
        }
    }
}

/// A typed filter operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Bool(bool),
    Int(i64),
}

/// Filter mode on a single field. Equality and range are mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Eq(FilterValue),
    /// Closed or half-open interval; at least one bound is set by the builder.
    Range { gte: Option<i64>, lte: Option<i64> },
}

impl Serialize for Comparison {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Comparison::Eq(value) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("eq", value)?;
                map.end()
            }
            Comparison::Range { gte, lte } => {
                let len = usize::from(gte.is_some()) + usize::from(lte.is_some());
                let mut map = serializer.serialize_map(Some(len))?;
                if let Some(gte) = gte {
                    map.serialize_entry("gte", gte)?;
                }
                if let Some(lte) = lte {
                    map.serialize_entry("lte", lte)?;
                }
                map.end()
            }
        }
    }
}

/// The single-field condition of a predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Condition {
    pub field: QueryField,
    pub comparison: Comparison,
}

impl Condition {
    pub fn eq(field: QueryField, value: FilterValue) -> Self {
        Self {
            field,
            comparison: Comparison::Eq(value),
        }
    }

    pub fn range(field: QueryField, gte: Option<i64>, lte: Option<i64>) -> Self {
        Self {
            field,
            comparison: Comparison::Range { gte, lte },
        }
    }

    /// Check if a bookmark satisfies this condition.
    ///
    /// Operands of the wrong type never match (a boolean operand on
    /// `createdAt`, an integer operand on `favorites`).
    pub fn matches(&self, bookmark: &Bookmark) -> bool {
        match (self.field, self.comparison) {
            (QueryField::Favorites, Comparison::Eq(FilterValue::Bool(b))) => bookmark.favorites == b,
            (QueryField::CreatedAt, Comparison::Eq(FilterValue::Int(n))) => bookmark.created_at == n,
            (QueryField::CreatedAt, Comparison::Range { gte, lte }) => {
                gte.is_none_or(|from| bookmark.created_at >= from)
                    && lte.is_none_or(|to| bookmark.created_at <= to)
            }
            (QueryField::Favorites, Comparison::Range { gte, lte }) => {
                let v = i64::from(bookmark.favorites);
                gte.is_none_or(|from| v >= from) && lte.is_none_or(|to| v <= to)
            }
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderBy {
    pub field: QueryField,
    pub direction: SortDirection,
}

impl OrderBy {
    pub fn new(field: QueryField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Orders two bookmarks on the sort field, ties broken by guid.
    pub fn compare(&self, a: &Bookmark, b: &Bookmark) -> Ordering {
        let primary = match self.field {
            QueryField::CreatedAt => a.created_at.cmp(&b.created_at),
            QueryField::Favorites => a.favorites.cmp(&b.favorites),
        };
        let primary = match self.direction {
            SortDirection::Asc => primary,
            SortDirection::Desc => primary.reverse(),
        };
        primary.then_with(|| a.guid.cmp(&b.guid))
    }
}

/// Normalized filter/sort/pagination descriptor sent to storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPredicate {
    /// Attributes to return, in order.
    pub fields: Vec<String>,
    /// At most one filtered field.
    pub condition: Option<Condition>,
    pub order_by: OrderBy,
    pub offset: u64,
    pub limit: u64,
}

impl QueryPredicate {
    pub fn new(order_by: OrderBy, offset: u64, limit: u64) -> Self {
        Self {
            fields: bookmarks_core::LISTED_FIELDS
                .iter()
                .map(|f| f.to_string())
                .collect(),
            condition: None,
            order_by,
            offset,
            limit,
        }
    }

    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    /// Check if a bookmark passes the condition (pagination not applied).
    pub fn matches(&self, bookmark: &Bookmark) -> bool {
        self.condition.is_none_or(|c| c.matches(bookmark))
    }
}

struct ConditionMap<'a>(Option<&'a Condition>);

impl Serialize for ConditionMap<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(usize::from(self.0.is_some())))?;
        if let Some(condition) = self.0 {
            map.serialize_entry(condition.field.as_str(), &condition.comparison)?;
        }
        map.end()
    }
}

impl Serialize for QueryPredicate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut st = serializer.serialize_struct("QueryPredicate", 5)?;
        st.serialize_field("fields", &self.fields)?;
        st.serialize_field("condition", &ConditionMap(self.condition.as_ref()))?;
        st.serialize_field("orderBy", &(self.order_by.field, self.order_by.direction))?;
        st.serialize_field("offset", &self.offset)?;
        st.serialize_field("limit", &self.limit)?;
        st.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use uuid::Uuid;

    fn bookmark(created_at: i64, favorites: bool) -> Bookmark {
        Bookmark::new(Uuid::new_v4(), "https://example.com", created_at).with_favorites(favorites)
    }

    #[test]
    fn field_and_direction_parsing() {
        assert_eq!(QueryField::parse("createdAt"), Some(QueryField::CreatedAt));
        assert_eq!(QueryField::parse("favorites"), Some(QueryField::Favorites));
        assert_eq!(QueryField::parse("createdat"), None);
        assert_eq!(SortDirection::parse("DESC"), Some(SortDirection::Desc));
        assert_eq!(SortDirection::parse("Asc"), Some(SortDirection::Asc));
        assert_eq!(SortDirection::parse("up"), None);
    }

    #[test]
    fn serializes_equality_predicate() {
        let predicate = QueryPredicate::new(
            OrderBy::new(QueryField::CreatedAt, SortDirection::Asc),
            0,
            10,
        )
        .with_condition(Condition::eq(QueryField::Favorites, FilterValue::Bool(true)));

        assert_eq!(
            serde_json::to_value(&predicate).unwrap(),
            json!({
                "fields": ["guid", "link", "createdAt", "description", "favorites"],
                "condition": {"favorites": {"eq": true}},
                "orderBy": ["createdAt", "asc"],
                "offset": 0,
                "limit": 10
            })
        );
    }

    #[test]
    fn serializes_half_open_range_and_unfiltered() {
        let ranged = QueryPredicate::new(
            OrderBy::new(QueryField::Favorites, SortDirection::Desc),
            5,
            50,
        )
        .with_condition(Condition::range(QueryField::CreatedAt, Some(100), None));
        let value = serde_json::to_value(&ranged).unwrap();
        assert_eq!(value["condition"], json!({"createdAt": {"gte": 100}}));
        assert_eq!(value["orderBy"], json!(["favorites", "desc"]));

        let plain = QueryPredicate::new(
            OrderBy::new(QueryField::CreatedAt, SortDirection::Asc),
            0,
            50,
        );
        assert_eq!(serde_json::to_value(&plain).unwrap()["condition"], json!({}));
    }

    #[test]
    fn condition_matching() {
        let fav = bookmark(100, true);
        let plain = bookmark(200, false);

        let c = Condition::eq(QueryField::Favorites, FilterValue::Bool(true));
        assert!(c.matches(&fav));
        assert!(!c.matches(&plain));

        let c = Condition::eq(QueryField::CreatedAt, FilterValue::Int(200));
        assert!(c.matches(&plain));
        assert!(!c.matches(&fav));

        let c = Condition::range(QueryField::CreatedAt, Some(150), Some(250));
        assert!(c.matches(&plain));
        assert!(!c.matches(&fav));

        let c = Condition::range(QueryField::CreatedAt, None, Some(100));
        assert!(c.matches(&fav));

        // mismatched operand type never matches
        let c = Condition::eq(QueryField::CreatedAt, FilterValue::Bool(true));
        assert!(!c.matches(&fav));
    }

    #[test]
    fn order_by_reverses_for_desc() {
        let a = bookmark(1, false);
        let b = bookmark(2, true);
        let asc = OrderBy::new(QueryField::CreatedAt, SortDirection::Asc);
        let desc = OrderBy::new(QueryField::CreatedAt, SortDirection::Desc);
        assert_eq!(asc.compare(&a, &b), Ordering::Less);
        assert_eq!(desc.compare(&a, &b), Ordering::Greater);

        let by_fav = OrderBy::new(QueryField::Favorites, SortDirection::Desc);
        assert_eq!(by_fav.compare(&b, &a), Ordering::Less);
    }
}
