use murmur_core::domain::CommentAuthor;
use murmur_store::repo::CommentNew;
use murmur_store::Store;

fn add(store: &Store, external_id: &str, message: &str) {
    store
        .comments()
        .insert(
            1_700_000_000,
            CommentNew {
                external_id: Some(external_id.to_string()),
                author: CommentAuthor::default(),
                message: message.to_string(),
                ..CommentNew::default()
            },
        )
        .expect("insert");
}

#[test]
fn summary_orders_by_count_then_phone() {
    let store = Store::open_in_memory().expect("open in memory");
    store.migrate().expect("migrate");

    add(&store, "1", "call 222-333-4444");
    add(&store, "2", "or 111-222-3333");
    add(&store, "3", "2223334444 works, so does 111.222.3333");
    add(&store, "4", "+12025550173 and 202-555-0173");

    let summary = store.phones().summary().expect("summary");
    let rows: Vec<(&str, i64)> = summary
        .iter()
        .map(|row| (row.phone.as_str(), row.comment_count))
        .collect();
    assert_eq!(
        rows,
        vec![
            ("111-222-3333", 2),
            ("222-333-4444", 2),
            ("+12025550173", 1),
            ("202-555-0173", 1),
        ]
    );
    assert_eq!(store.phones().count_distinct().expect("count"), 4);
}

#[test]
fn summary_is_empty_without_phones() {
    let store = Store::open_in_memory().expect("open in memory");
    store.migrate().expect("migrate");
    add(&store, "1", "no digits here");
    assert!(store.phones().summary().expect("summary").is_empty());
}
