//! Static achievement catalog.
//!
//! Fixed, code-defined enumeration; not mutable at runtime. Profiles
//! store achievement ids, never copies of these entries.

/// One catalog entry. `icon` names the glyph the presentation layer renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Achievement {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
}

pub const ACHIEVEMENTS: &[Achievement] = &[
    Achievement {
        id: "first_post",
        title: "First Post",
        description: "You shared your first story or problem.",
        icon: "feather",
    },
    Achievement {
        id: "first_comment",
        title: "Joined the Conversation",
        description: "You posted your first comment.",
        icon: "message-square",
    },
    Achievement {
        id: "first_upvote",
        title: "Appreciated",
        description: "Your post received its first upvote.",
        icon: "award",
    },
    Achievement {
        id: "power_user",
        title: "Power User",
        description: "You have posted more than 10 stories.",
        icon: "coffee",
    },
    Achievement {
        id: "enthusiast",
        title: "Enthusiast",
        description: "You have commented on 25 different posts.",
        icon: "users",
    },
    Achievement {
        id: "helpful_hand",
        title: "Helpful Hand",
        description: "Your comment was marked as helpful.",
        icon: "heart-handshake",
    },
    Achievement {
        id: "popular_post",
        title: "Popular Post",
        description: "One of your posts has over 25 upvotes.",
        icon: "star",
    },
    Achievement {
        id: "story_teller",
        title: "Story Teller",
        description: "One of your posts has over 100 upvotes.",
        icon: "book-open",
    },
    Achievement {
        id: "verified",
        title: "Verified",
        description: "Your account has been verified by the mods.",
        icon: "shield-check",
    },
];

/// Looks up a catalog entry by id.
pub fn find(id: &str) -> Option<&'static Achievement> {
    ACHIEVEMENTS.iter().find(|a| a.id == id)
}

/// Whether the id names a known achievement.
pub fn is_known(id: &str) -> bool {
    find(id).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_nine_unique_entries() {
        assert_eq!(ACHIEVEMENTS.len(), 9);
        let mut ids: Vec<_> = ACHIEVEMENTS.iter().map(|a| a.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 9);
    }

    #[test]
    fn find_resolves_known_and_rejects_unknown() {
        assert_eq!(find("first_post").map(|a| a.title), Some("First Post"));
        assert!(find("no_such_badge").is_none());
    }
}
