//! Behavioural properties of the bookmark engine as seen by API handlers.

use bookmarks_storage::{Condition, FilterValue, OrderBy, QueryField, SortDirection};
use bookmarks_validation::{BookmarkEngine, ErrorCode, ParameterSet, ValidationError};
use serde_json::json;
use uuid::Uuid;

fn engine() -> BookmarkEngine {
    BookmarkEngine::default()
}

fn list_errors(query: &str) -> Vec<ValidationError> {
    engine()
        .validate_list(&ParameterSet::from_query(query))
        .unwrap_err()
        .validation_errors()
        .expect("validation failure")
        .as_slice()
        .to_vec()
}

#[test]
fn limit_and_offset_are_preserved() {
    for (limit, offset) in [(1u64, 0u64), (10, 5), (50, 1000), (987_654, 123_456_789)] {
        let predicate = engine()
            .validate_list(&ParameterSet::from_query(&format!("limit={limit}&offset={offset}")))
            .unwrap();
        assert_eq!(predicate.limit, limit);
        assert_eq!(predicate.offset, offset);
    }

    let predicate = engine().validate_list(&ParameterSet::new()).unwrap();
    assert_eq!((predicate.limit, predicate.offset), (50, 0));
}

#[test]
fn oversized_pagination_is_rejected_not_clamped() {
    let descriptions: Vec<_> = list_errors("limit=99999999999999999999&offset=1e30")
        .into_iter()
        .map(|e| e.description)
        .collect();
    assert_eq!(descriptions, vec!["limit: is out of range", "offset: is out of range"]);
}

#[test]
fn favorites_filter_without_value_is_one_error() {
    for query in ["filter=favorites", "filter=favorites&filter_value=", "filter=favorites&limit=3"] {
        let errors = list_errors(query);
        assert_eq!(errors.len(), 1, "{query}");
        assert_eq!(errors[0].code, ErrorCode::InputInvalid);
        assert!(errors[0].description.starts_with("filter: "), "{query}");
    }
}

#[test]
fn inverted_range_is_reported() {
    let errors = list_errors("filter=createdAt&filter_from=100&filter_to=50");
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].description,
        "filter_from: filter range error: filter_from > filter_to"
    );
}

#[test]
fn non_integer_filter_to_reports_only_itself() {
    let errors = list_errors("filter=createdAt&filter_from=100&filter_to=abc");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].description, "filter_to: values of filter must be integer");
}

#[test]
fn every_failing_field_is_reported_in_table_order() {
    let errors = list_errors("sort_dir=sideways&sort_by=link&offset=-1&limit=x");
    let described: Vec<_> = errors.iter().map(|e| e.description.as_str()).collect();
    assert_eq!(
        described,
        vec![
            "limit: is not a number",
            "offset: must be greater than or equal to 0",
            "sort_by: only createdAt and favorites supported",
            "sort_dir: only asc and desc supported",
        ]
    );
}

#[test]
fn links_are_classified() {
    let create = |link: serde_json::Value| {
        engine()
            .validate_create(&ParameterSet::from_pairs([("link", link)]), Uuid::new_v4(), 0)
            .unwrap_err()
            .validation_errors()
            .expect("validation failure")
            .as_slice()
            .to_vec()
    };

    assert_eq!(create(json!("http://yahoo.com/x")), vec![ValidationError::blocked_domain("yahoo.com")]);
    assert_eq!(create(json!("not a url")), vec![ValidationError::invalid_link()]);
    assert_eq!(create(json!("")), vec![ValidationError::invalid_link()]);
    assert_eq!(
        serde_json::to_value(&create(json!("http://yahoo.com/x"))[0]).unwrap(),
        json!({"code": "BOOKMARKS_BLOCKED_DOMAIN", "description": "\"yahoo.com\" banned"})
    );
}

#[test]
fn empty_link_only_fails_on_create() {
    let path = ParameterSet::from_pairs([("guid", Uuid::new_v4().to_string())]);
    for empty in [json!(""), json!(null)] {
        let body = ParameterSet::from_pairs([("link", empty.clone())]);
        assert!(engine().validate_update(&path, &body, 1).is_ok());
        assert!(engine().validate_create(&body, Uuid::new_v4(), 1).is_err());
    }
}

#[test]
fn blank_link_is_invalid_on_update() {
    let path = ParameterSet::from_pairs([("guid", Uuid::new_v4().to_string())]);
    let body = ParameterSet::from_pairs([("link", "   ")]);
    let err = engine().validate_update(&path, &body, 1).unwrap_err();
    assert_eq!(
        err.validation_errors().unwrap().as_slice(),
        &[ValidationError::invalid_link()]
    );
}

#[test]
fn revalidation_is_idempotent() {
    let engine = engine();
    for query in [
        "filter=favorites&filter_value=true&limit=10",
        "filter=createdAt&filter_from=5&filter_to=9&sort_dir=DESC",
        "filter=createdAt&filter_from=9&filter_to=5",
        "limit=0",
    ] {
        let params = ParameterSet::from_query(query);
        let snapshot = params.clone();
        let first = engine.validate_list(&params).map_err(|e| e.to_string());
        let second = engine.validate_list(&params).map_err(|e| e.to_string());
        assert_eq!(first, second, "{query}");
        assert_eq!(params, snapshot);
    }
}

#[test]
fn favorites_listing_predicate() {
    let predicate = engine()
        .validate_list(&ParameterSet::from_query("filter=favorites&filter_value=true&limit=10"))
        .unwrap();
    assert_eq!(
        predicate.condition,
        Some(Condition::eq(QueryField::Favorites, FilterValue::Bool(true)))
    );
    assert_eq!(predicate.limit, 10);
    assert_eq!(predicate.offset, 0);
    assert_eq!(predicate.order_by, OrderBy::new(QueryField::CreatedAt, SortDirection::Asc));
}

#[test]
fn malformed_guid_is_single_error() {
    let err = engine()
        .validate_guid(&ParameterSet::from_pairs([("guid", "xyz")]))
        .unwrap_err();
    let errors = err.validation_errors().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.as_slice()[0].code, ErrorCode::InputInvalid);
    assert_eq!(errors.as_slice()[0].description, "guid: invalid uuid");
}
