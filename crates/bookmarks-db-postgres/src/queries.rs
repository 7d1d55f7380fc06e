//! Renders storage predicates into parameterised SQL.
//!
//! User values never appear in the SQL text; they travel in `binds`, in
//! placeholder order.

use bookmarks_storage::{Comparison, Condition, FilterValue, QueryField, QueryPredicate, SortDirection};

pub const COLUMNS: &str = r#"guid, link, "createdAt", "updatedAt", description, favorites"#;

/// A value bound to a numbered placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindValue {
    Int(i64),
    Bool(bool),
}

impl From<FilterValue> for BindValue {
    fn from(value: FilterValue) -> Self {
        match value {
            FilterValue::Bool(b) => Self::Bool(b),
            FilterValue::Int(i) => Self::Int(i),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedQuery {
    pub sql: String,
    pub binds: Vec<BindValue>,
}

impl RenderedQuery {
    fn push(&mut self, value: BindValue) -> String {
        self.binds.push(value);
        format!("${}", self.binds.len())
    }
}

pub fn column(field: QueryField) -> &'static str {
    match field {
        QueryField::CreatedAt => r#""createdAt""#,
        QueryField::Favorites => "favorites",
    }
}

fn direction(dir: SortDirection) -> &'static str {
    match dir {
        SortDirection::Asc => "ASC",
        SortDirection::Desc => "DESC",
    }
}

fn render_where(condition: Option<&Condition>, out: &mut RenderedQuery) {
    let Some(condition) = condition else {
        return;
    };
    let col = column(condition.field);
    let clauses: Vec<String> = match condition.comparison {
        Comparison::Eq(value) => vec![format!("{col} = {}", out.push(value.into()))],
        Comparison::Range { gte, lte } => {
            let mut clauses = Vec::with_capacity(2);
            if let Some(gte) = gte {
                clauses.push(format!("{col} >= {}", out.push(BindValue::Int(gte))));
            }
            if let Some(lte) = lte {
                clauses.push(format!("{col} <= {}", out.push(BindValue::Int(lte))));
            }
            clauses
        }
    };
    if !clauses.is_empty() {
        out.sql.push_str(" WHERE ");
        out.sql.push_str(&clauses.join(" AND "));
    }
}

/// Page query: columns, condition, order (ties by guid), offset and limit.
pub fn render_select(predicate: &QueryPredicate) -> RenderedQuery {
    let mut out = RenderedQuery {
        sql: format!("SELECT {COLUMNS} FROM bookmarks"),
        binds: Vec::new(),
    };
    render_where(predicate.condition.as_ref(), &mut out);

    let order = &predicate.order_by;
    out.sql.push_str(&format!(
        " ORDER BY {} {}, guid ASC",
        column(order.field),
        direction(order.direction)
    ));

    let offset = out.push(BindValue::Int(clamp_i64(predicate.offset)));
    let limit = out.push(BindValue::Int(clamp_i64(predicate.limit)));
    out.sql.push_str(&format!(" OFFSET {offset} LIMIT {limit}"));
    out
}

/// Count of all rows matching the condition.
pub fn render_count(predicate: &QueryPredicate) -> RenderedQuery {
    let mut out = RenderedQuery {
        sql: "SELECT COUNT(*) FROM bookmarks".to_string(),
        binds: Vec::new(),
    };
    render_where(predicate.condition.as_ref(), &mut out);
    out
}

fn clamp_i64(n: u64) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookmarks_storage::OrderBy;

    fn predicate() -> QueryPredicate {
        QueryPredicate::new(OrderBy::new(QueryField::CreatedAt, SortDirection::Asc), 0, 50)
    }

    #[test]
    fn unfiltered_select() {
        let q = render_select(&predicate());
        assert_eq!(
            q.sql,
            r#"SELECT guid, link, "createdAt", "updatedAt", description, favorites FROM bookmarks ORDER BY "createdAt" ASC, guid ASC OFFSET $1 LIMIT $2"#
        );
        assert_eq!(q.binds, vec![BindValue::Int(0), BindValue::Int(50)]);
    }

    #[test]
    fn equality_filter_binds_first() {
        let p = QueryPredicate::new(OrderBy::new(QueryField::Favorites, SortDirection::Desc), 20, 10)
            .with_condition(Condition::eq(QueryField::Favorites, FilterValue::Bool(true)));
        let q = render_select(&p);
        assert!(q.sql.contains("WHERE favorites = $1 ORDER BY favorites DESC, guid ASC OFFSET $2 LIMIT $3"));
        assert_eq!(q.binds, vec![BindValue::Bool(true), BindValue::Int(20), BindValue::Int(10)]);
    }

    #[test]
    fn range_filter_and_count_share_condition() {
        let p = predicate().with_condition(Condition::range(QueryField::CreatedAt, Some(100), Some(200)));
        let count = render_count(&p);
        assert_eq!(
            count.sql,
            r#"SELECT COUNT(*) FROM bookmarks WHERE "createdAt" >= $1 AND "createdAt" <= $2"#
        );
        assert_eq!(count.binds, vec![BindValue::Int(100), BindValue::Int(200)]);

        let half = predicate().with_condition(Condition::range(QueryField::CreatedAt, None, Some(7)));
        let q = render_select(&half);
        assert!(q.sql.contains(r#"WHERE "createdAt" <= $1 ORDER BY"#));
        assert_eq!(q.binds.len(), 3);
    }

    #[test]
    fn values_never_reach_sql_text() {
        let p = predicate().with_condition(Condition::eq(QueryField::CreatedAt, FilterValue::Int(1547459442106)));
        let q = render_select(&p);
        assert!(!q.sql.contains("1547459442106"));
    }
}
