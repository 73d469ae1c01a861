use meeple_db::seed::SeedData;
use meeple_db::{Database, ErrorKind, StoreError};
use serde_json::json;

fn seeded() -> Database {
    let db = Database::open_in_memory().unwrap();
    db.reseed(&SeedData::test().unwrap()).unwrap();
    db
}

// -- Listing --

#[test]
fn lists_comments_for_review() {
    let db = seeded();
    let comments = db.list_comments("3").unwrap();

    assert_eq!(comments.len(), 3);
    assert!(comments.iter().all(|c| c.review_id == 3));
}

#[test]
fn review_without_comments_is_empty_not_missing() {
    let db = seeded();
    assert!(db.list_comments("4").unwrap().is_empty());
}

#[test]
fn list_comments_errors() {
    let db = seeded();
    assert_eq!(db.list_comments("9999999").unwrap_err().kind(), ErrorKind::NotFound);
    assert_eq!(db.list_comments("invalid_id").unwrap_err().kind(), ErrorKind::BadRequest);
}

// -- Insertion --

#[test]
fn add_comment_defaults_votes_and_timestamp() {
    let db = seeded();
    let comment = db
        .add_comment("2", Some("mallionaire"), Some("Body of test comment to be newly added"))
        .unwrap();

    assert_eq!(comment.comment_id, 7);
    assert_eq!(comment.author, "mallionaire");
    assert_eq!(comment.review_id, 2);
    assert_eq!(comment.votes, 0);
    assert_eq!(comment.body, "Body of test comment to be newly added");
    assert!((chrono::Utc::now() - comment.created_at).num_seconds().abs() < 60);

    assert_eq!(db.list_comments("2").unwrap().len(), 4);
}

#[test]
fn add_comment_id_checks_come_first() {
    let db = seeded();

    let err = db.add_comment("invalid_id", None, None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BadRequest);

    let err = db.add_comment("99999999", None, None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn add_comment_requires_username_and_body() {
    let db = seeded();

    for (username, body) in [
        (None, Some("A bit boring tbh")),
        (Some("mallionaire"), None),
        (Some(""), Some("A bit boring tbh")),
        (Some("mallionaire"), Some("")),
    ] {
        let err = db.add_comment("2", username, body).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadRequest);
    }
    assert_eq!(db.list_comments("2").unwrap().len(), 3);
}

#[test]
fn unknown_author_is_reclassified_as_not_found() {
    let db = seeded();
    let err = db
        .add_comment("2", Some("ziggy"), Some("Great fun to be had by all"))
        .unwrap_err();

    assert!(matches!(err, StoreError::ConstraintViolation(_)));
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

// -- Votes --

#[test]
fn comment_votes() {
    let db = seeded();

    let comment = db.set_comment_votes("2", Some(&json!(1))).unwrap();
    assert_eq!(comment.votes, 14);
    assert_eq!(comment.author, "mallionaire");
    assert_eq!(comment.review_id, 3);
    assert_eq!(comment.body, "My dog loved this game too!");
    assert_eq!(comment.created_at.to_rfc3339(), "2021-01-18T10:09:05.410+00:00");

    let comment = db.set_comment_votes("2", Some(&json!(-10))).unwrap();
    assert_eq!(comment.votes, 4);

    let comment = db.set_comment_votes("2", None).unwrap();
    assert_eq!(comment.votes, 4);
}

#[test]
fn comment_vote_errors() {
    let db = seeded();

    let err = db.set_comment_votes("bad_request", Some(&json!(1))).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BadRequest);

    let err = db.set_comment_votes("999999", Some(&json!(1))).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let err = db.set_comment_votes("2", Some(&json!(2.5))).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BadRequest);
}

#[test]
fn overflowing_comment_delta_is_rejected_and_row_stays_readable() {
    let db = seeded();

    let err = db.set_comment_votes("2", Some(&json!(i64::MAX))).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BadRequest);

    db.set_comment_votes("2", Some(&json!(-20))).unwrap();
    let err = db.set_comment_votes("2", Some(&json!(i64::MIN))).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BadRequest);

    let comments = db.list_comments("3").unwrap();
    let comment = comments.iter().find(|c| c.comment_id == 2).unwrap();
    assert_eq!(comment.votes, -7);

    let err = db.set_comment_votes("999999", Some(&json!(i64::MIN))).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn concurrent_increments_are_not_lost() {
    let db = std::sync::Arc::new(seeded());

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let db = db.clone();
            std::thread::spawn(move || {
                for _ in 0..25 {
                    db.set_comment_votes("1", Some(&json!(1))).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let comment = db.set_comment_votes("1", None).unwrap();
    assert_eq!(comment.votes, 16 + 8 * 25);
}

// -- Deletion --

#[test]
fn delete_comment_then_repeat_is_not_found() {
    let db = seeded();

    db.delete_comment("1").unwrap();
    assert_eq!(db.list_comments("2").unwrap().len(), 2);

    let err = db.delete_comment("1").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn delete_comment_errors() {
    let db = seeded();
    assert_eq!(db.delete_comment("999999").unwrap_err().kind(), ErrorKind::NotFound);
    assert_eq!(db.delete_comment("invalid_id").unwrap_err().kind(), ErrorKind::BadRequest);
}
