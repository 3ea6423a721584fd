use super::*;
use serde_json::json;

fn body(value: serde_json::Value) -> Fields {
    match value {
        Value::Object(map) => map,
        other => panic!("expected an object, got {other}"),
    }
}

#[test]
fn test_operator_round_trips_through_its_token() {
    for op in Operator::ALL {
        assert_eq!(op.as_str().parse::<Operator>().unwrap(), op);
    }
    assert!("!=".parse::<Operator>().is_err());
    assert!("LIKE".parse::<Operator>().is_err());
}

#[test]
fn test_eq_compares_numbers_by_value() {
    let doc = body(json!({ "cost": 1500000 }));
    assert!(Filter::eq("cost", json!(1500000.0)).matches(&doc));
    assert!(!Filter::eq("cost", json!("1500000")).matches(&doc));
}

#[test]
fn test_missing_field_never_matches() {
    let doc = body(json!({ "name": "Kursus A" }));
    for op in Operator::ALL {
        let value = if op.takes_list() {
            json!(["x"])
        } else {
            json!("x")
        };
        let filter = Filter::new("absent", op, value).unwrap();
        assert!(!filter.matches(&doc), "{op} matched a missing field");
    }
}

#[test]
fn test_range_requires_same_type() {
    let doc = body(json!({ "rating": 4, "name": "Beta" }));
    let gt = |field: &str, v| Filter::new(field, Operator::Gt, v).unwrap();
    let ge = Filter::new("rating", Operator::Ge, json!(4)).unwrap();
    let lt = Filter::new("name", Operator::Lt, json!("Gamma")).unwrap();

    assert!(gt("rating", json!(3)).matches(&doc));
    assert!(!gt("rating", json!(4)).matches(&doc));
    assert!(ge.matches(&doc));
    assert!(!gt("rating", json!("3")).matches(&doc));
    assert!(gt("name", json!("Alpha")).matches(&doc));
    assert!(lt.matches(&doc));
}

#[test]
fn test_range_rejects_structured_values() {
    assert!(Filter::new("rating", Operator::Lt, json!([1])).is_err());
    assert!(Filter::new("rating", Operator::Lt, json!(null)).is_err());
}

#[test]
fn test_array_contains() {
    let doc = body(json!({ "facilities": ["WiFi", "AC"], "name": "WiFi" }));
    let contains = |field: &str, v| Filter::new(field, Operator::ArrayContains, v).unwrap();

    assert!(contains("facilities", json!("AC")).matches(&doc));
    assert!(!contains("facilities", json!("Parkir")).matches(&doc));
    assert!(!contains("name", json!("WiFi")).matches(&doc));
}

#[test]
fn test_array_contains_any() {
    let doc = body(json!({ "programs": ["Grammar Boost", "Speaking"] }));
    let any = |v| Filter::new("programs", Operator::ArrayContainsAny, v).unwrap();

    assert!(any(json!(["TOEFL", "Speaking"])).matches(&doc));
    assert!(!any(json!(["TOEFL", "IELTS"])).matches(&doc));
}

#[test]
fn test_in_and_not_in() {
    let doc = body(json!({ "targetType": "kos", "topicId": null }));

    let is_in = Filter::new("targetType", Operator::In, json!(["course", "kos"])).unwrap();
    assert!(is_in.matches(&doc));

    let not_in = Filter::new("targetType", Operator::NotIn, json!(["course"])).unwrap();
    assert!(not_in.matches(&doc));

    let not_in_kos = Filter::new("targetType", Operator::NotIn, json!(["kos"])).unwrap();
    assert!(!not_in_kos.matches(&doc));

    // null is excluded from not-in
    let null_not_in = Filter::new("topicId", Operator::NotIn, json!(["x"])).unwrap();
    assert!(!null_not_in.matches(&doc));
}

#[test]
fn test_list_operators_validate_their_value() {
    for op in [Operator::In, Operator::NotIn, Operator::ArrayContainsAny] {
        assert!(Filter::new("f", op, json!("scalar")).is_err());
        assert!(Filter::new("f", op, json!([])).is_err());
        let too_many: Vec<u32> = (0..=MAX_DISJUNCTION as u32).collect();
        assert!(Filter::new("f", op, json!(too_many)).is_err());
        assert!(Filter::new("f", op, json!([1, 2, 3])).is_ok());
    }
}

#[test]
fn test_empty_field_name_is_rejected() {
    assert!(Filter::new("", Operator::Eq, json!(1)).is_err());
}

#[test]
fn test_values_equal_recurses() {
    assert!(values_equal(
        &json!({ "a": [1, 2.0] }),
        &json!({ "a": [1.0, 2] })
    ));
    assert!(!values_equal(
        &json!({ "a": 1 }),
        &json!({ "a": 1, "b": 2 })
    ));
    assert!(!values_equal(&json!([1]), &json!([1, 1])));
}
