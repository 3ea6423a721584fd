use super::*;

#[test]
fn test_predicate_eq() {
    insta::assert_snapshot!(predicate(Operator::Eq), @"fields -> $2::text = $3::jsonb");
}

#[test]
fn test_predicate_lt() {
    insta::assert_snapshot!(
        predicate(Operator::Lt),
        @r#"CASE WHEN jsonb_typeof(fields -> $2::text) <> jsonb_typeof($3::jsonb) THEN false WHEN jsonb_typeof($3::jsonb) = 'string' THEN (fields ->> $2::text) COLLATE "C" < ($3::jsonb #>> '{}') COLLATE "C" ELSE fields -> $2::text < $3::jsonb END"#
    );
}

#[test]
fn test_predicate_in() {
    insta::assert_snapshot!(
        predicate(Operator::In),
        @"EXISTS (SELECT 1 FROM jsonb_array_elements($3::jsonb) AS wanted(value) WHERE wanted.value = fields -> $2::text)"
    );
}

#[test]
fn test_query_eq() {
    insta::assert_snapshot!(
        query(Operator::Eq),
        @"SELECT id, created_at, fields FROM document WHERE collection = $1 AND fields -> $2::text = $3::jsonb ORDER BY created_at, id"
    );
}

#[test]
fn test_range_predicates_splice_their_symbol() {
    for op in [Operator::Lt, Operator::Le, Operator::Gt, Operator::Ge] {
        let sql = predicate(op);
        assert!(
            sql.ends_with(&format!("ELSE fields -> $2::text {} $3::jsonb END", op.as_str())),
            "{sql}"
        );
    }
}

#[test]
fn test_every_operator_binds_the_same_parameters() {
    for op in Operator::ALL {
        let sql = query(op);
        assert!(sql.contains("$1"), "{op}: {sql}");
        assert!(sql.contains("$2::text"), "{op}: {sql}");
        assert!(sql.contains("$3::jsonb"), "{op}: {sql}");
        assert!(!sql.contains("$4"), "{op}: {sql}");
    }
}

#[test]
fn test_insert_fills_timestamp_and_created_at_from_one_clock() {
    assert!(INSERT.contains("clock_timestamp()"));
    assert!(INSERT.contains("jsonb_build_object('timestamp', clock.ts)"));
    assert!(INSERT.ends_with("RETURNING id"));
}
