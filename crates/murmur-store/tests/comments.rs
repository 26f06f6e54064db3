use murmur_core::domain::{CommentAuthor, CommentId, Sentiment};
use murmur_store::error::StoreErrorKind;
use murmur_store::repo::{CommentInsert, CommentNew, CommentQuery};
use murmur_store::Store;

fn store() -> Store {
    let store = Store::open_in_memory().expect("open in memory");
    store.migrate().expect("migrate");
    store
}

fn comment(external_id: Option<&str>, message: &str, created_at: i64) -> CommentNew {
    CommentNew {
        external_id: external_id.map(str::to_string),
        post_id: Some("615_900".to_string()),
        author: CommentAuthor {
            id: Some("42".to_string()),
            name: Some("Ada Lovelace".to_string()),
        },
        message: message.to_string(),
        created_at: Some(created_at),
        like_count: Some(0),
    }
}

#[test]
fn insert_extracts_phones_in_order() {
    let store = store();
    let now = 1_700_000_000;

    let outcome = store
        .comments()
        .insert(
            now,
            comment(
                Some("c1"),
                "Call 234-567-8901 or 9876543210, again 987-654-3210",
                now - 10,
            ),
        )
        .expect("insert");
    assert!(outcome.is_created());
    assert_eq!(
        outcome.comment().phones,
        vec!["234-567-8901".to_string(), "987-654-3210".to_string()]
    );

    let loaded = store
        .comments()
        .get(outcome.comment().id)
        .expect("get")
        .expect("comment exists");
    assert_eq!(loaded, outcome.into_comment());
}

#[test]
fn reimport_updates_in_place_and_resets_sentiment() {
    let store = store();
    let now = 1_700_000_000;
    let repo = store.comments();

    let first = repo
        .insert(now, comment(Some("c1"), "Great service 555-123-4567", now))
        .expect("insert")
        .into_comment();
    repo.set_sentiment(now, first.id, Some(Sentiment::Positive))
        .expect("set sentiment");

    let same = repo
        .insert(now + 5, comment(Some("c1"), "Great service 555-123-4567", now))
        .expect("reinsert");
    assert!(matches!(same, CommentInsert::Updated(_)));
    assert_eq!(same.comment().id, first.id);
    assert_eq!(same.comment().sentiment, Some(Sentiment::Positive));

    let edited = repo
        .insert(now + 10, comment(Some("c1"), "Actually call +44 20 7946 0958", now))
        .expect("edit");
    assert_eq!(edited.comment().id, first.id);
    assert_eq!(edited.comment().sentiment, None);
    assert_eq!(edited.comment().phones, vec!["+442079460958".to_string()]);
    assert_eq!(repo.count().expect("count"), 1);
}

#[test]
fn comments_without_external_id_are_always_new() {
    let store = store();
    let now = 1_700_000_000;
    let repo = store.comments();
    repo.insert(now, comment(None, "hello", now)).expect("insert");
    repo.insert(now, comment(None, "hello", now)).expect("insert");
    assert_eq!(repo.count().expect("count"), 2);
}

#[test]
fn blank_external_id_is_rejected() {
    let store = store();
    let err = store
        .comments()
        .insert(1, comment(Some("   "), "text", 1))
        .unwrap_err();
    assert_eq!(err.kind(), StoreErrorKind::InvalidComment);
}

#[test]
fn list_filters_by_phone_and_sentiment() {
    let store = store();
    let now = 1_700_000_000;
    let repo = store.comments();

    let a = repo
        .insert(now, comment(Some("a"), "no number, love it", now - 30))
        .expect("insert a")
        .into_comment();
    let b = repo
        .insert(now, comment(Some("b"), "(555) 123-4567 please", now - 20))
        .expect("insert b")
        .into_comment();
    let c = repo
        .insert(now, comment(Some("c"), "bad, ring 111-222-3333", now - 10))
        .expect("insert c")
        .into_comment();
    repo.set_sentiment(now, a.id, Some(Sentiment::Positive))
        .expect("label a");
    repo.set_sentiment(now, c.id, Some(Sentiment::Negative))
        .expect("label c");

    let with_phones = repo
        .list(&CommentQuery {
            with_phones_only: true,
            ..CommentQuery::default()
        })
        .expect("list");
    let ids: Vec<CommentId> = with_phones.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![b.id, c.id]);

    let negative = repo
        .list(&CommentQuery {
            with_phones_only: true,
            sentiment: Some(Sentiment::Negative),
            ..CommentQuery::default()
        })
        .expect("list");
    assert_eq!(negative.len(), 1);
    assert_eq!(negative[0].id, c.id);

    let unclassified = repo
        .list(&CommentQuery {
            unclassified_only: true,
            ..CommentQuery::default()
        })
        .expect("list");
    assert_eq!(unclassified.len(), 1);
    assert_eq!(unclassified[0].id, b.id);

    let limited = repo
        .list(&CommentQuery {
            limit: Some(2),
            ..CommentQuery::default()
        })
        .expect("list");
    assert_eq!(limited.len(), 2);
    assert_eq!(limited[0].id, a.id);
    assert_eq!(repo.list_all().expect("list all").len(), 3);
}

#[test]
fn delete_cascades_to_phones() {
    let store = store();
    let now = 1_700_000_000;
    let created = store
        .comments()
        .insert(now, comment(Some("x"), "555.123.4567", now))
        .expect("insert")
        .into_comment();

    store.comments().delete(created.id).expect("delete");
    assert!(store.comments().get(created.id).expect("get").is_none());
    assert!(store
        .phones()
        .list_for_comment(created.id)
        .expect("phones")
        .is_empty());

    let err = store.comments().delete(created.id).unwrap_err();
    assert_eq!(err.kind(), StoreErrorKind::NotFound);
}
