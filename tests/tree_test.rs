use rstest::rstest;

use serde_json::Value as Json;

use bstv::domain::{build_and_serialize, json, parse_numbers, Tree, TreeJson, Value};
use bstv::util::testing;

#[ctor::ctor]
fn init() {
    testing::init_test_setup();
}

fn values(ns: &[f64]) -> Vec<Value> {
    ns.iter().filter_map(|n| Value::new(*n)).collect()
}

/// Checks the search-tree ordering with explicit bounds on every node.
fn assert_ordered(doc: &Json) {
    let mut stack: Vec<(&Json, Option<f64>, Option<f64>)> = vec![(doc, None, None)];
    while let Some((node, lo, hi)) = stack.pop() {
        if node.is_null() {
            continue;
        }
        let v = node["value"].as_f64().expect("numeric value");
        if let Some(lo) = lo {
            assert!(v > lo, "{v} must be greater than {lo}");
        }
        if let Some(hi) = hi {
            assert!(v < hi, "{v} must be less than {hi}");
        }
        stack.push((&node["left"], lo, Some(v)));
        stack.push((&node["right"], Some(v), hi));
    }
}

fn count(doc: &Json) -> usize {
    let mut n = 0;
    let mut stack = vec![doc];
    while let Some(node) = stack.pop() {
        if !node.is_null() {
            n += 1;
            stack.push(&node["left"]);
            stack.push(&node["right"]);
        }
    }
    n
}

#[rstest]
#[case::scattered(&[8.0, 3.0, 10.0, 1.0, 6.0, 14.0, 4.0, 7.0, 13.0])]
#[case::duplicates(&[5.0, 3.0, 5.0, 3.0, 9.0, 9.0])]
#[case::fractions(&[0.5, -1.25, 3.75, 0.25, -0.5])]
#[case::descending(&[9.0, 8.0, 7.0, 6.0, 5.0, 4.0])]
#[case::single(&[42.0])]
fn given_input_when_building_then_tree_is_ordered_and_distinct(#[case] input: &[f64]) {
    let vs = values(input);
    let serialized = build_and_serialize(&vs);

    assert_ordered(&serialized);

    let mut distinct = input.to_vec();
    distinct.sort_by(f64::total_cmp);
    distinct.dedup();
    assert_eq!(count(&serialized), distinct.len());

    let tree = Tree::from_values(&vs);
    let in_order: Vec<f64> = tree.iter().map(|v| v.get()).collect();
    assert_eq!(in_order, distinct);
}

#[test]
fn given_same_input_when_building_twice_then_output_is_identical() {
    let vs = parse_numbers("8, 3 10,1 6 14 4 7 13");
    let a = json::to_string(&build_and_serialize(&vs)).unwrap();
    let b = json::to_string(&build_and_serialize(&vs)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn given_parsed_text_when_building_then_matches_expected_json() {
    let vs = parse_numbers("8, 3, 10, 1, 6");
    let json = Tree::from_values(&vs).to_json();
    let expected = serde_json::json!({
        "value": 8,
        "left": {
            "value": 3,
            "left": {"value": 1, "left": null, "right": null},
            "right": {"value": 6, "left": null, "right": null}
        },
        "right": {"value": 10, "left": null, "right": null}
    });
    assert_eq!(json, expected);
}

#[test]
fn given_no_numbers_when_building_then_serializes_to_null() {
    let vs = parse_numbers(" , ,abc ");
    assert!(vs.is_empty());
    assert_eq!(Tree::from_values(&vs).to_json(), Json::Null);
}

#[test]
fn given_unsorted_input_when_building_balanced_then_height_is_minimal() {
    let vs = values(&[10.0, 1.0, 7.0, 3.0, 15.0, 2.0, 9.0, 3.0]);
    let tree = Tree::balanced(&vs);

    assert_eq!(tree.len(), 7);
    // ceil(log2(7 + 1))
    assert_eq!(tree.height(), 3);
    assert_ordered(&tree.to_json());
}

#[test]
fn given_tree_when_rendering_then_lists_every_value() {
    let tree = Tree::from_values(&values(&[2.0, 1.0, 3.0]));
    let text = tree.to_string();
    for v in ["1", "2", "3"] {
        assert!(text.contains(v), "missing {v} in:\n{text}");
    }
}

#[test]
fn given_sorted_input_when_serializing_then_chain_survives_encode_and_decode() {
    let vs: Vec<Value> = (0..20_000).map(Value::from).collect();

    let text = json::to_string(&build_and_serialize(&vs)).unwrap();
    let back: TreeJson = json::from_str(&text).unwrap();

    assert_ordered(&back);
    assert_eq!(count(&back), 20_000);
}
