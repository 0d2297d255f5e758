use json_patch::json;
use json_patch::jsonpath::{JsonPath, Options, ParseError};

fn store() -> json_patch::Value {
    json!({
        "store": {
            "book": [
                {"category": "fiction", "title": "Sword", "price": 9},
                {"category": "fiction", "title": "Saga", "price": 13},
                {"category": "reference", "title": "Myths", "price": 8},
            ],
            "bicycle": {"color": "red", "price": 20},
        }
    })
}

#[test]
fn dotted_path_selects_single_value() {
    let path = JsonPath::parse("$.store.bicycle.color").unwrap();
    let values = path.select(&store(), Options::NONE);
    assert_eq!(values.len(), 1);
    assert_eq!(values[0].as_str(), Some("red"));
}

#[test]
fn bracket_index_selects_array_element() {
    let path = JsonPath::parse("$.store.book[0].title").unwrap();
    let values = path.select(&store(), Options::NONE);
    assert_eq!(values.len(), 1);
    assert_eq!(values[0].as_str(), Some("Sword"));
}

#[test]
fn wildcard_selects_every_book() {
    let path = JsonPath::parse("$.store.book[*].title").unwrap();
    let values = path.select(&store(), Options::NONE);
    assert_eq!(values.len(), 3);
}

#[test]
fn recursive_descent_finds_all_prices() {
    let path = JsonPath::parse("$..price").unwrap();
    let values = path.select(&store(), Options::NONE);
    assert_eq!(values.len(), 4);
}

#[test]
fn negative_index_addresses_last_book() {
    let path = JsonPath::parse("$.store.book[-1].title").unwrap();
    let values = path.select(&store(), Options::NONE);
    assert_eq!(values.len(), 1);
    assert_eq!(values[0].as_str(), Some("Myths"));
}

#[test]
fn select_paths_reports_normalized_locations() {
    let path = JsonPath::parse("$.store.book[*].price").unwrap();
    let paths = path.select_paths(&store(), Options::PATH);
    let rendered: Vec<String> = paths.iter().map(|p| p.to_string()).collect();
    assert_eq!(
        rendered,
        vec!["$.store.book[0].price", "$.store.book[1].price", "$.store.book[2].price"]
    );
}

#[test]
fn select_nodes_pairs_path_with_value() {
    let path = JsonPath::parse("$.store.bicycle.color").unwrap();
    let nodes = path.select_nodes(&store(), Options::PATH);
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0].path.to_string(), "$.store.bicycle.color");
    assert_eq!(nodes[0].value.as_str(), Some("red"));
}

#[test]
fn unsupported_filter_expression_is_rejected() {
    let err = JsonPath::parse("$.store.book[?(@.price < 10)]").unwrap_err();
    assert!(matches!(err, ParseError::Unsupported { what: "filter", .. }));
}

#[test]
fn missing_leading_root_is_rejected() {
    assert!(JsonPath::parse("store.book").is_err());
}
