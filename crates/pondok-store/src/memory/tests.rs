use super::*;
use crate::ErrorKind;
use crate::filter::Operator;
use proptest::prelude::*;
use serde_json::json;
use std::collections::HashSet;
use std::sync::Arc;

fn fields(value: Value) -> Fields {
    match value {
        Value::Object(map) => map,
        other => panic!("expected an object, got {other}"),
    }
}

const COURSES: &str = "courseInstitutions";

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
        .block_on(future)
}

#[tokio::test]
async fn test_insert_then_get_returns_fields_id_and_timestamp() {
    let store = MemoryStore::new();
    let body = fields(json!({
        "name": "Kursus Elfast",
        "cost": 750000,
        "programs": ["Speaking"],
    }));

    let id = store.insert(COURSES, body.clone()).await.unwrap();
    let doc = store.get(COURSES, &id).await.unwrap().unwrap();

    assert_eq!(doc.id, id);
    assert!(!doc.id.as_str().is_empty());
    let timestamp = doc.get(TIMESTAMP_FIELD).unwrap();
    assert!(timestamp.is_string());

    let mut without_timestamp = doc.fields.clone();
    without_timestamp.remove(TIMESTAMP_FIELD);
    assert_eq!(without_timestamp, body);
}

#[tokio::test]
async fn test_caller_timestamp_is_kept_and_null_is_filled() {
    let store = MemoryStore::new();

    let body = fields(json!({ "timestamp": "2024-01-01T00:00:00Z" }));
    let given = store.insert("forumPosts", body).await.unwrap();
    let doc = store.get("forumPosts", &given).await.unwrap().unwrap();
    assert_eq!(doc.get("timestamp"), Some(&json!("2024-01-01T00:00:00Z")));

    let null = store
        .insert("forumPosts", fields(json!({ "timestamp": null })))
        .await
        .unwrap();
    let doc = store.get("forumPosts", &null).await.unwrap().unwrap();
    assert!(doc.get("timestamp").unwrap().is_string());
}

#[tokio::test]
async fn test_insert_rejects_caller_id() {
    let store = MemoryStore::new();
    let err = store
        .insert("reviews", fields(json!({ "id": "mine", "rating": 3 })))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(store.count("reviews").await.unwrap(), 0);
}

#[tokio::test]
async fn test_get_missing_is_none() {
    let store = MemoryStore::new();
    let missing = DocumentId::new("does-not-exist");
    assert!(store.get("reviews", &missing).await.unwrap().is_none());
}

#[tokio::test]
async fn test_update_merges_only_named_fields() {
    let store = MemoryStore::new();
    let body = fields(json!({
        "name": "Kos Melati",
        "pricePerMonth": 500000,
        "isVerified": false,
    }));
    let id = store.insert("kosHomestays", body).await.unwrap();
    let before = store.get("kosHomestays", &id).await.unwrap().unwrap();

    store
        .update("kosHomestays", &id, fields(json!({ "isVerified": true })))
        .await
        .unwrap();
    let after = store.get("kosHomestays", &id).await.unwrap().unwrap();

    assert_eq!(after.get("isVerified"), Some(&json!(true)));
    for (key, value) in &before.fields {
        if key != "isVerified" {
            assert_eq!(after.get(key), Some(value), "{key} changed");
        }
    }
    assert_eq!(after.created_at, before.created_at);
}

#[tokio::test]
async fn test_update_and_delete_missing_are_not_found() {
    let store = MemoryStore::new();
    let missing = DocumentId::new("nope");

    let err = store
        .update("reviews", &missing, fields(json!({ "rating": 2 })))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let err = store.delete("reviews", &missing).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_update_cannot_write_id() {
    let store = MemoryStore::new();
    let body = fields(json!({ "email": "a@b.c" }));
    let id = store.insert("users", body).await.unwrap();
    let err = store
        .update("users", &id, fields(json!({ "id": "other" })))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[tokio::test]
async fn test_delete_is_physical() {
    let store = MemoryStore::new();
    let body = fields(json!({ "content": "hi" }));
    let id = store.insert("forumReplies", body).await.unwrap();
    store.delete("forumReplies", &id).await.unwrap();
    assert!(store.get("forumReplies", &id).await.unwrap().is_none());
    assert!(store.get_all("forumReplies").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_query_filters_by_one_field() {
    let store = MemoryStore::new();
    for (target, rating) in [("c1", 5), ("c2", 3), ("c1", 2)] {
        let body = fields(json!({ "targetId": target, "rating": rating }));
        store.insert("reviews", body).await.unwrap();
    }

    let for_c1 = store
        .query("reviews", &Filter::eq("targetId", "c1"))
        .await
        .unwrap();
    assert_eq!(for_c1.len(), 2);

    let high = Filter::new("rating", Operator::Ge, 3).unwrap();
    let high = store.query("reviews", &high).await.unwrap();
    assert_eq!(high.len(), 2);
}

#[tokio::test]
async fn test_query_validates_before_reading() {
    let store = MemoryStore::new();
    let bad = Filter {
        field: "targetType".into(),
        op: Operator::In,
        value: json!("course"),
    };
    let err = store.query("reviews", &bad).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[tokio::test]
async fn test_page_size_zero_is_rejected() {
    let store = MemoryStore::new();
    let err = store.paginate("forumPosts", 0, None).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[tokio::test]
async fn test_empty_collection_pages_end_immediately() {
    let store = MemoryStore::new();
    let page = store.paginate("forumPosts", 5, None).await.unwrap();
    assert!(page.documents.is_empty());
    assert!(page.is_last());
}

#[tokio::test]
async fn test_full_last_page_is_followed_by_an_empty_one() {
    let store = MemoryStore::new();
    for n in 0..4 {
        let body = fields(json!({ "n": n }));
        store.insert("forumPosts", body).await.unwrap();
    }

    let first = store.paginate("forumPosts", 2, None).await.unwrap();
    let second = store
        .paginate("forumPosts", 2, first.next_cursor.as_ref())
        .await
        .unwrap();
    assert_eq!(second.documents.len(), 2);
    let cursor = second.next_cursor.expect("a full page has a cursor");

    let third = store
        .paginate("forumPosts", 2, Some(&cursor))
        .await
        .unwrap();
    assert!(third.documents.is_empty());
    assert!(third.is_last());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_inserts_get_distinct_ids() {
    let store = Arc::new(MemoryStore::new());
    let mut handles = Vec::new();
    for n in 0..64 {
        let store = Arc::clone(&store);
        handles.push(tokio::spawn(async move {
            store
                .insert("forumPosts", fields(json!({ "n": n })))
                .await
                .unwrap()
        }));
    }

    let mut ids = HashSet::new();
    for handle in handles {
        assert!(ids.insert(handle.await.unwrap()));
    }
    assert_eq!(ids.len(), 64);
    assert_eq!(store.count("forumPosts").await.unwrap(), 64);
}

proptest! {
    #[test]
    fn prop_pages_concatenate_to_everything_newest_first(
        total in 0usize..40,
        page_size in 1usize..9,
    ) {
        let (expected, paged) = block_on(async {
            let store = MemoryStore::new();
            for n in 0..total {
                store.insert("forumPosts", fields(json!({ "n": n }))).await.unwrap();
            }

            let mut expected = store.get_all("forumPosts").await.unwrap();
            expected.sort_by(|a, b| (b.created_at, &b.id).cmp(&(a.created_at, &a.id)));

            let mut paged = Vec::new();
            let mut cursor = None;
            loop {
                let page = store
                    .paginate("forumPosts", page_size, cursor.as_ref())
                    .await
                    .unwrap();
                assert!(page.documents.len() <= page_size);
                paged.extend(page.documents);
                match page.next_cursor {
                    Some(next) => cursor = Some(next),
                    None => break,
                }
            }
            (expected, paged)
        });

        let expected_ids: Vec<_> = expected.iter().map(|d| d.id.clone()).collect();
        let paged_ids: Vec<_> = paged.iter().map(|d| d.id.clone()).collect();
        prop_assert_eq!(paged_ids, expected_ids);
    }
}
