//! Feed-state classification and display assembly over in-memory
//! documents.

use chrono::{Duration, TimeZone, Utc};
use echofeed::achievements::ACHIEVEMENTS;
use echofeed::feed::FeedState;
use echofeed::model::{Comment, Post};
use echofeed::present::{compact_count, relative_time, resolve_displayed_badges, sort_comments_newest_first};

fn comment(id: &str, offset_minutes: i64) -> Comment {
    let base = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).single().expect("timestamp");
    Comment {
        id: id.to_string(),
        author_id: format!("author-{id}"),
        author_name: format!("user {id}"),
        author_avatar_url: String::new(),
        text: "text".to_string(),
        created_at: base + Duration::minutes(offset_minutes),
    }
}

fn post_with_comments(comments: Vec<Comment>) -> Post {
    Post {
        id: "p1".to_string(),
        created_at: Utc.with_ymd_and_hms(2024, 3, 1, 11, 0, 0).single().expect("timestamp"),
        version: 1,
        author_id: "u1".to_string(),
        author_name: "alice".to_string(),
        author_avatar_url: String::new(),
        title: "title".to_string(),
        body: "body".to_string(),
        image_url: None,
        tags: vec!["tag".to_string()],
        comments,
        donations: None,
        verified: false,
        upvotes: vec![],
        downvotes: vec![],
    }
}

#[test]
fn loading_empty_and_populated_are_distinct() {
    let loading: FeedState<Post> = FeedState::from_query(None);
    let empty: FeedState<Post> = FeedState::from_query(Some(vec![]));
    let populated = FeedState::from_query(Some(vec![post_with_comments(vec![])]));

    assert!(loading.is_loading());
    assert!(!loading.is_empty());

    assert!(empty.is_empty());
    assert!(!empty.is_loading());

    assert!(!populated.is_loading());
    assert!(!populated.is_empty());
    assert_eq!(populated.items().len(), 1);
}

#[test]
fn thread_comments_render_newest_first_with_stable_ties() {
    // Insertion order: old, tie-a, tie-b, newest.
    let post = post_with_comments(vec![
        comment("old", 0),
        comment("tie-a", 10),
        comment("tie-b", 10),
        comment("newest", 20),
    ]);

    let sorted = sort_comments_newest_first(&post.comments);
    let ids: Vec<_> = sorted.iter().map(|c| c.id.as_str()).collect();
    // Ties keep their insertion order relative to each other.
    assert_eq!(ids, vec!["newest", "tie-a", "tie-b", "old"]);
}

#[test]
fn display_values_derive_from_the_document() {
    let now = Utc.with_ymd_and_hms(2024, 3, 1, 15, 0, 0).single().expect("timestamp");
    let post = post_with_comments(vec![]);

    assert_eq!(relative_time(post.created_at, now), "4 hours ago");
    assert_eq!(compact_count(post.comments.len() as u64), "0");
    assert_eq!(compact_count(26_800), "26.8K");
}

#[test]
fn badge_strip_resolves_in_stored_order_and_drops_unknowns() {
    let stored = vec![
        "story_teller".to_string(),
        "gone_badge".to_string(),
        "first_comment".to_string(),
    ];
    let resolved = resolve_displayed_badges(&stored, ACHIEVEMENTS);
    let ids: Vec<_> = resolved.iter().map(|a| a.id).collect();
    assert_eq!(ids, vec!["story_teller", "first_comment"]);
}
