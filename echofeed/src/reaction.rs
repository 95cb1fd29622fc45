//! Pure reaction engine.
//!
//! Every operation here computes the next state of a document's
//! reaction fields from the current state, the actor's id, and the
//! requested action. No I/O. Each toggle also reports the set deltas it
//! implies so the store layer can apply them as atomic set mutations
//! instead of whole-array writes; the Lua scripts in `lua/` implement
//! exactly these transitions server-side.
//!
//! All toggles are idempotent pairs: applying one twice with no
//! intervening change returns the original state.

use std::collections::HashSet;

use thiserror::Error;

use crate::model::{DOWNVOTES, FOLLOWERS, FOLLOWING, LIKES, UPVOTES};

/// Upper bound on badges shown on a profile.
pub const MAX_DISPLAYED_BADGES: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOp {
    Add,
    Remove,
}

/// A single atomic mutation of one reaction set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetDelta {
    pub field: &'static str,
    pub op: SetOp,
    pub member: String,
}

impl SetDelta {
    fn add(field: &'static str, member: &str) -> Self {
        Self { field, op: SetOp::Add, member: member.to_string() }
    }

    fn remove(field: &'static str, member: &str) -> Self {
        Self { field, op: SetOp::Remove, member: member.to_string() }
    }
}

/// Next state of the mutually-exclusive vote pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteSets {
    pub upvotes: HashSet<String>,
    pub downvotes: HashSet<String>,
}

#[derive(Debug, Clone)]
pub struct VoteOutcome {
    pub sets: VoteSets,
    pub deltas: Vec<SetDelta>,
}

impl VoteOutcome {
    /// Whether the actor ends up in the upvote set.
    pub fn upvoted(&self, actor_id: &str) -> bool {
        self.sets.upvotes.contains(actor_id)
    }

    /// Whether the actor ends up in the downvote set.
    pub fn downvoted(&self, actor_id: &str) -> bool {
        self.sets.downvotes.contains(actor_id)
    }
}

/// Toggle the actor's upvote.
///
/// Removing an existing upvote leaves downvotes alone; adding one also
/// clears any standing downvote (vote switch). The actor ends up in at
/// most one of the two sets.
pub fn toggle_upvote(upvotes: &HashSet<String>, downvotes: &HashSet<String>, actor_id: &str) -> VoteOutcome {
    toggle_vote_pair(upvotes, downvotes, actor_id, UPVOTES, DOWNVOTES)
}

/// Mirror of [`toggle_upvote`] for the downvote set.
pub fn toggle_downvote(upvotes: &HashSet<String>, downvotes: &HashSet<String>, actor_id: &str) -> VoteOutcome {
    let mirrored = toggle_vote_pair(downvotes, upvotes, actor_id, DOWNVOTES, UPVOTES);
    VoteOutcome {
        sets: VoteSets {
            upvotes: mirrored.sets.downvotes,
            downvotes: mirrored.sets.upvotes,
        },
        deltas: mirrored.deltas,
    }
}

/// Shared transition: toggle membership in `primary`, clearing
/// `secondary` on entry. Field names ride along for the delta patch.
fn toggle_vote_pair(
    primary: &HashSet<String>,
    secondary: &HashSet<String>,
    actor_id: &str,
    primary_field: &'static str,
    secondary_field: &'static str,
) -> VoteOutcome {
    let mut next_primary = primary.clone();
    let mut next_secondary = secondary.clone();
    let mut deltas = Vec::with_capacity(2);

    if next_primary.remove(actor_id) {
        deltas.push(SetDelta::remove(primary_field, actor_id));
    } else {
        next_primary.insert(actor_id.to_string());
        deltas.push(SetDelta::add(primary_field, actor_id));
        if next_secondary.remove(actor_id) {
            deltas.push(SetDelta::remove(secondary_field, actor_id));
        }
    }

    debug_assert!(!(next_primary.contains(actor_id) && next_secondary.contains(actor_id)));

    VoteOutcome {
        sets: VoteSets {
            upvotes: next_primary,
            downvotes: next_secondary,
        },
        deltas,
    }
}

#[derive(Debug, Clone)]
pub struct LikeOutcome {
    pub likes: HashSet<String>,
    pub delta: SetDelta,
    /// Whether the actor ends up liking.
    pub liked: bool,
}

/// Simple membership flip; its own inverse. No mutual-exclusion partner.
pub fn toggle_like(likes: &HashSet<String>, actor_id: &str) -> LikeOutcome {
    let mut next = likes.clone();
    if next.remove(actor_id) {
        LikeOutcome {
            likes: next,
            delta: SetDelta::remove(LIKES, actor_id),
            liked: false,
        }
    } else {
        next.insert(actor_id.to_string());
        LikeOutcome {
            likes: next,
            delta: SetDelta::add(LIKES, actor_id),
            liked: true,
        }
    }
}

/// Net vote score. May be negative; no floor or ceiling.
pub fn compute_score(upvotes: &HashSet<String>, downvotes: &HashSet<String>) -> i64 {
    upvotes.len() as i64 - downvotes.len() as i64
}

/// The two independent set deltas a follow toggle produces: one on the
/// actor's `following` set, one on the target's `followers` set. The
/// store applies both in a single script so the symmetric pair cannot
/// diverge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FollowPatch {
    pub now_following: bool,
    /// Applies to the actor's profile.
    pub following_delta: SetDelta,
    /// Applies to the target's profile.
    pub followers_delta: SetDelta,
}

pub fn toggle_follow(actor_id: &str, target_id: &str, currently_following: bool) -> FollowPatch {
    if currently_following {
        FollowPatch {
            now_following: false,
            following_delta: SetDelta::remove(FOLLOWING, target_id),
            followers_delta: SetDelta::remove(FOLLOWERS, actor_id),
        }
    } else {
        FollowPatch {
            now_following: true,
            following_delta: SetDelta::add(FOLLOWING, target_id),
            followers_delta: SetDelta::add(FOLLOWERS, actor_id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BadgeError {
    /// The achievement has not been unlocked by this user.
    #[error("achievement is not unlocked")]
    NotUnlocked,
    /// Adding would exceed the displayed-badge limit; state unchanged.
    #[error("no more than {} badges can be displayed", MAX_DISPLAYED_BADGES)]
    LimitExceeded,
}

/// Toggle a badge in the ordered displayed set.
///
/// Removal always succeeds. Addition requires the achievement to be
/// unlocked and the list to hold fewer than [`MAX_DISPLAYED_BADGES`]
/// entries; new badges are appended, preserving display order.
pub fn toggle_displayed_badge(
    displayed: &[String],
    achievement_id: &str,
    unlocked: &[String],
) -> Result<Vec<String>, BadgeError> {
    if !unlocked.iter().any(|id| id == achievement_id) {
        return Err(BadgeError::NotUnlocked);
    }

    if displayed.iter().any(|id| id == achievement_id) {
        return Ok(displayed.iter().filter(|id| *id != achievement_id).cloned().collect());
    }

    if displayed.len() >= MAX_DISPLAYED_BADGES {
        return Err(BadgeError::LimitExceeded);
    }

    let mut next = displayed.to_vec();
    next.push(achievement_id.to_string());
    Ok(next)
}
