//! End-to-end list query flows through the public API

use query_spec::prelude::*;
use query_spec::{extract_filters, extract_filters_only, PaginationResolver, SortParser};
use serde_json::json;

#[test]
fn test_list_request_to_find_options() {
    let request = QueryRequest::new()
        .with("page", 1)
        .with("pageSize", 10)
        .with("sort", "incomeReceived:asc,status:asc")
        .with("status", "active");

    let spec = QuerySpecBuilder::default().build(&request).unwrap();

    assert_eq!(spec.order().get("incomeReceived"), Some(SortDirection::Ascending));
    assert_eq!(spec.order().get("status"), Some(SortDirection::Ascending));
    assert_eq!(spec.order().len(), 2);
    assert_eq!(spec.filters(), &FilterMap::new().with("status", "active"));
    assert_eq!(spec.pagination().skip(), 0);
    assert_eq!(spec.pagination().take(), 10);
}

#[test]
fn test_wrap_second_page() {
    let request = QueryRequest::new().with("page", 2).with("pageSize", 2);
    let spec = QuerySpecBuilder::default().build(&request).unwrap();

    let result = wrap(vec!["x", "y"], 5, &spec, None).unwrap();
    assert_eq!(
        serde_json::to_value(&result).unwrap(),
        json!({"meta": {"total": 5, "page": 2, "limit": 2}, "data": ["x", "y"]})
    );
}

#[test]
fn test_filters_only_keeps_reserved_names() {
    let request = QueryRequest::new()
        .with("status", "")
        .with("type", "bot")
        .with("page", 1);

    let only = extract_filters_only(&request);
    assert_eq!(only, FilterMap::new().with("type", "bot").with("page", 1));

    // The full extractor treats page as pagination, not a filter
    let full = extract_filters(&request);
    assert_eq!(full, FilterMap::new().with("type", "bot"));
}

#[test]
fn test_pagination_defaults_and_offsets() {
    let resolver = PaginationResolver::new(10);

    for page in [None, Some(0), Some(-3)] {
        assert_eq!(resolver.resolve(page, Some(5)).page(), 1);
    }
    for page_size in [None, Some(0), Some(-1)] {
        assert_eq!(resolver.resolve(Some(1), page_size).page_size(), 10);
    }

    for (page, page_size) in [(1, 1), (2, 10), (7, 25), (100, 3)] {
        let pagination = resolver.resolve(Some(page), Some(page_size));
        assert_eq!(pagination.skip(), ((page - 1) * page_size) as u64);
        assert_eq!(pagination.take(), page_size as u64);
    }
}

#[test]
fn test_sort_parsing_rules() {
    let parser = SortParser::new("createdAt");
    let default = SortOrder::single("createdAt", SortDirection::Descending);

    assert_eq!(parser.parse(None), default);
    assert_eq!(parser.parse(Some("")), default);
    assert_eq!(parser.parse(Some("   ")), default);

    let mut expected = SortOrder::new();
    expected.insert("a", SortDirection::Ascending);
    expected.insert("b", SortDirection::Descending);
    assert_eq!(parser.parse(Some("a:asc,b:desc")), expected);

    assert_eq!(
        parser.parse(Some("a:asc,a:desc")),
        SortOrder::single("a", SortDirection::Descending)
    );
    assert_eq!(
        parser.parse(Some("a")),
        SortOrder::single("a", SortDirection::Descending)
    );
}

#[test]
fn test_blank_values_dropped_but_falsy_kept() {
    let request = QueryRequest::new()
        .with("deletedAt", QueryValue::Null)
        .with("name", "")
        .with("count", 0)
        .with("archived", false);

    let filters = extract_filters(&request);
    assert_eq!(
        filters,
        FilterMap::new().with("count", 0).with("archived", false)
    );
}

#[test]
fn test_enforced_owner_overrides_client() {
    let request = QueryRequest::new()
        .with("ownerId", 99)
        .with("status", "active");
    let spec = QuerySpecBuilder::default().build(&request).unwrap();

    let options = spec.find_options(Some(&FilterMap::new().with("ownerId", 7)));
    assert_eq!(options.conditions.get("ownerId"), Some(&QueryValue::Integer(7)));
    assert_eq!(spec.filters().get("ownerId"), Some(&QueryValue::Integer(99)));

    let filter_spec = QuerySpecBuilder::default()
        .build_filters_only(&request)
        .unwrap();
    let conditions = filter_spec.conditions(Some(&FilterMap::new().with("ownerId", 7)));
    assert_eq!(conditions.get("ownerId"), Some(&QueryValue::Integer(7)));
}

#[test]
fn test_json_request_round_trip_to_response() {
    let request: QueryRequest = serde_json::from_value(json!({
        "page": 3,
        "pageSize": 20,
        "sort": "name:ASC, createdAt",
        "status": "active",
        "tag": ""
    }))
    .unwrap();

    let config = QueryConfig::default()
        .with_default_sort_field("updatedAt")
        .with_default_page_size(25);
    let builder = QuerySpecBuilder::new(&config)
        .with_allowed_filters(FilterAllowList::new(["status", "ownerId"]));

    let spec = builder.build(&request).unwrap();
    let options = spec.find_options(Some(&FilterMap::new().with("ownerId", 7)));

    assert_eq!(
        serde_json::to_value(&options).unwrap(),
        json!({
            "skip": 40,
            "take": 20,
            "order": {"name": "ASC", "createdAt": "DESC"},
            "where": {"status": "active", "ownerId": 7}
        })
    );

    let result = wrap(vec![json!({"id": 41})], 41, &spec, Some("users")).unwrap();
    assert_eq!(result.meta().total_pages(), 3);
    assert_eq!(
        serde_json::to_value(&result).unwrap(),
        json!({"meta": {"total": 41, "page": 3, "limit": 20}, "users": [{"id": 41}]})
    );
}

#[test]
fn test_allow_list_rejects_unknown_filter() {
    let builder = QuerySpecBuilder::default()
        .with_allowed_filters(FilterAllowList::new(["status"]));
    let request = QueryRequest::new().with("status", "active").with("role", "admin");

    let err = builder.build(&request).unwrap_err();
    assert!(matches!(err, Error::FilterNotAllowed { ref field, .. } if field == "role"));
    assert!(err.is_client_error());

    // Reserved fields never count against the list
    let request = QueryRequest::new().with("page", 2).with("sort", "status");
    assert!(builder.build(&request).is_ok());
}
