//! Feed and thread assembly.
//!
//! Assemblers hand the store's already-ordered page to presentation
//! without reordering, and keep the empty case distinct from the
//! loading case. Each assembler loads a single bounded page; there is
//! no pagination.

use crate::errors::StoreError;
use crate::model::{Comment, Notification, Post, UserProfile, Video};
use crate::present::sort_comments_newest_first;
use crate::store::Client;

/// Fixed page size for every feed query.
pub const DEFAULT_FEED_LIMIT: usize = 50;

/// Observable states of a feed query.
///
/// `Loading` is the state before the query resolves (a UI starts
/// here); a resolved query is `Empty` or `Populated`, never `Loading`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedState<T> {
    Loading,
    Empty,
    Populated(Vec<T>),
}

impl<T> FeedState<T> {
    /// Classify a resolved query result. `None` means the query has
    /// not resolved yet.
    pub fn from_query(result: Option<Vec<T>>) -> Self {
        match result {
            None => FeedState::Loading,
            Some(items) if items.is_empty() => FeedState::Empty,
            Some(items) => FeedState::Populated(items),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, FeedState::Loading)
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, FeedState::Empty)
    }

    pub fn items(&self) -> &[T] {
        match self {
            FeedState::Populated(items) => items,
            _ => &[],
        }
    }
}

/// A post together with its comments, newest first.
#[derive(Debug, Clone)]
pub struct Thread {
    pub post: Post,
    pub comments: Vec<Comment>,
}

/// Home feed: newest posts first.
pub async fn home_feed(client: &Client, limit: usize) -> Result<FeedState<Post>, StoreError> {
    let posts = client.collection::<Post>().recent(limit).await?;
    Ok(FeedState::from_query(Some(posts)))
}

/// Video feed: newest videos first.
pub async fn video_feed(client: &Client, limit: usize) -> Result<FeedState<Video>, StoreError> {
    let videos = client.collection::<Video>().recent(limit).await?;
    Ok(FeedState::from_query(Some(videos)))
}

/// All of one author's posts, newest first, from the single bounded page.
pub async fn user_posts(client: &Client, author_id: &str, limit: usize) -> Result<FeedState<Post>, StoreError> {
    let posts = client.collection::<Post>().recent(limit).await?;
    let own: Vec<Post> = posts.into_iter().filter(|p| p.author_id == author_id).collect();
    Ok(FeedState::from_query(Some(own)))
}

/// One post with reaction sets populated and comments sorted for display.
pub async fn post_thread(client: &Client, post_id: &str) -> Result<Option<Thread>, StoreError> {
    let Some(post) = client.collection::<Post>().get_with_reactions(post_id).await? else {
        return Ok(None);
    };
    let comments = sort_comments_newest_first(&post.comments);
    Ok(Some(Thread { post, comments }))
}

/// One video with its like set populated and comments sorted for display.
pub async fn video_thread(client: &Client, video_id: &str) -> Result<Option<(Video, Vec<Comment>)>, StoreError> {
    let Some(video) = client.collection::<Video>().get_with_reactions(video_id).await? else {
        return Ok(None);
    };
    let comments = sort_comments_newest_first(&video.comments);
    Ok(Some((video, comments)))
}

/// Exact-title search over the bounded recent page (the only filter
/// shape the store supports is equality).
pub async fn search_posts_by_title(
    client: &Client,
    title: &str,
    limit: usize,
) -> Result<FeedState<Post>, StoreError> {
    let posts = client.collection::<Post>().recent(DEFAULT_FEED_LIMIT).await?;
    let matches: Vec<Post> = posts.into_iter().filter(|p| p.title == title).take(limit).collect();
    Ok(FeedState::from_query(Some(matches)))
}

/// A recipient's notifications, newest first.
pub async fn notification_feed(
    client: &Client,
    recipient_id: &str,
    limit: usize,
) -> Result<FeedState<Notification>, StoreError> {
    let items = client
        .collection::<Notification>()
        .recent_in(recipient_id, limit)
        .await?;
    Ok(FeedState::from_query(Some(items)))
}

/// Profile lookup by unique username; `None` when the name is unclaimed.
pub async fn profile_by_username(client: &Client, username: &str) -> Result<Option<UserProfile>, StoreError> {
    let Some(user_id) = client
        .lookup_unique(crate::model::USERS, "username", username)
        .await?
    else {
        return Ok(None);
    };
    client.collection::<UserProfile>().get_with_reactions(&user_id).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unresolved_query_is_loading() {
        let state: FeedState<i32> = FeedState::from_query(None);
        assert!(state.is_loading());
        assert!(state.items().is_empty());
    }

    #[test]
    fn resolved_zero_rows_is_empty_not_loading() {
        let state: FeedState<i32> = FeedState::from_query(Some(vec![]));
        assert!(state.is_empty());
        assert!(!state.is_loading());
    }

    #[test]
    fn populated_keeps_store_order() {
        let state = FeedState::from_query(Some(vec![3, 1, 2]));
        assert_eq!(state.items(), &[3, 1, 2]);
    }
}
