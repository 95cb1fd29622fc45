//! Scenario tests for the pure reaction engine: multi-step sequences a
//! single actor (or several) drive against one document's reaction
//! fields.

use std::collections::HashSet;

use echofeed::reaction::{
    BadgeError, SetOp, compute_score, toggle_displayed_badge, toggle_downvote, toggle_follow, toggle_like,
    toggle_upvote,
};

fn set(ids: &[&str]) -> HashSet<String> {
    ids.iter().map(|s| s.to_string()).collect()
}

#[test]
fn vote_switch_scenario() {
    // U={}, D={}; actor "u1" upvotes -> U={u1}, D={}.
    let first = toggle_upvote(&set(&[]), &set(&[]), "u1");
    assert_eq!(first.sets.upvotes, set(&["u1"]));
    assert!(first.sets.downvotes.is_empty());

    // Same actor downvotes -> U={}, D={u1} in one step.
    let second = toggle_downvote(&first.sets.upvotes, &first.sets.downvotes, "u1");
    assert!(second.sets.upvotes.is_empty());
    assert_eq!(second.sets.downvotes, set(&["u1"]));
}

#[test]
fn multiple_actors_accumulate_independently() {
    let mut upvotes = set(&[]);
    let mut downvotes = set(&[]);

    for actor in ["a", "b", "c"] {
        let out = toggle_upvote(&upvotes, &downvotes, actor);
        upvotes = out.sets.upvotes;
        downvotes = out.sets.downvotes;
    }
    let out = toggle_downvote(&upvotes, &downvotes, "x");
    upvotes = out.sets.upvotes;
    downvotes = out.sets.downvotes;

    assert_eq!(upvotes, set(&["a", "b", "c"]));
    assert_eq!(downvotes, set(&["x"]));
    assert_eq!(compute_score(&upvotes, &downvotes), 2);
}

#[test]
fn repeated_toggles_return_to_the_original_state() {
    let up = set(&["a", "b"]);
    let down = set(&["c"]);

    let once = toggle_upvote(&up, &down, "z");
    let twice = toggle_upvote(&once.sets.upvotes, &once.sets.downvotes, "z");
    assert_eq!(twice.sets.upvotes, up);
    assert_eq!(twice.sets.downvotes, down);

    let once = toggle_downvote(&up, &down, "z");
    let twice = toggle_downvote(&once.sets.upvotes, &once.sets.downvotes, "z");
    assert_eq!(twice.sets.upvotes, up);
    assert_eq!(twice.sets.downvotes, down);

    let likes = set(&["a"]);
    let once = toggle_like(&likes, "z");
    let twice = toggle_like(&once.likes, "z");
    assert_eq!(twice.likes, likes);
}

#[test]
fn deltas_describe_exactly_the_transition() {
    // Switching a downvoter to an upvoter emits one add and one remove.
    let out = toggle_upvote(&set(&[]), &set(&["u1"]), "u1");
    assert_eq!(out.deltas.len(), 2);
    assert!(out.deltas.iter().any(|d| d.field == "upvotes" && d.op == SetOp::Add));
    assert!(out.deltas.iter().any(|d| d.field == "downvotes" && d.op == SetOp::Remove));

    // Un-voting emits a single remove.
    let out = toggle_upvote(&set(&["u1"]), &set(&[]), "u1");
    assert_eq!(out.deltas.len(), 1);
    assert_eq!(out.deltas[0].op, SetOp::Remove);
}

#[test]
fn follow_unfollow_round_trip() {
    let follow = toggle_follow("alice", "bob", false);
    assert!(follow.now_following);

    let unfollow = toggle_follow("alice", "bob", follow.now_following);
    assert!(!unfollow.now_following);
    assert_eq!(unfollow.following_delta.member, "bob");
    assert_eq!(unfollow.followers_delta.member, "alice");
}

#[test]
fn badge_selection_lifecycle() {
    let unlocked: Vec<String> = ["first_post", "first_comment", "first_upvote", "power_user", "enthusiast", "popular_post"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let mut displayed: Vec<String> = vec![];

    // Fill to the limit of five.
    for id in &unlocked[..5] {
        displayed = toggle_displayed_badge(&displayed, id, &unlocked).expect("add badge");
    }
    assert_eq!(displayed.len(), 5);

    // A sixth is rejected and the list is unchanged.
    let before = displayed.clone();
    let err = toggle_displayed_badge(&displayed, "popular_post", &unlocked).unwrap_err();
    assert_eq!(err, BadgeError::LimitExceeded);
    assert_eq!(displayed, before);

    // Toggling one off frees a slot for the rejected badge.
    displayed = toggle_displayed_badge(&displayed, "first_post", &unlocked).expect("remove badge");
    displayed = toggle_displayed_badge(&displayed, "popular_post", &unlocked).expect("add freed slot");
    assert_eq!(displayed.len(), 5);
    assert_eq!(displayed.last().map(String::as_str), Some("popular_post"));

    // Locked achievements can never be displayed.
    let err = toggle_displayed_badge(&displayed, "story_teller", &unlocked).unwrap_err();
    assert_eq!(err, BadgeError::NotUnlocked);
}
