//! Creating and deleting posts and videos.

use chrono::Utc;
use tracing::info;

use crate::errors::{StoreError, ValidationError};
use crate::id::generate_document_id;
use crate::media::{BlobError, BlobStore, blob_path};
use crate::model::{Donations, Post, UserProfile, Video};
use crate::store::Client;

#[derive(Debug, Clone, Default)]
pub struct NewPost {
    pub title: String,
    pub body: String,
    pub tags: Vec<String>,
    pub image_url: Option<String>,
    pub donations: Option<Donations>,
}

#[derive(Debug, Clone)]
pub struct NewVideo {
    pub media_url: String,
    pub caption: String,
    pub song: String,
}

/// Whether the author carries the mod-granted verification achievement.
fn is_verified(author: &UserProfile) -> bool {
    author.unlocked_achievements.iter().any(|id| id == "verified")
}

pub async fn create_post(client: &Client, author: &UserProfile, input: NewPost) -> Result<Post, StoreError> {
    if input.title.trim().is_empty() {
        return Err(ValidationError::single("title", "validation.required", "title cannot be empty").into());
    }
    if input.body.trim().is_empty() {
        return Err(ValidationError::single("body", "validation.required", "body cannot be empty").into());
    }

    let post = Post {
        id: generate_document_id(),
        created_at: Utc::now(),
        version: 1,
        author_id: author.id.clone(),
        author_name: author.username.clone(),
        author_avatar_url: author.avatar_url.clone(),
        title: input.title,
        body: input.body,
        image_url: input.image_url,
        tags: input.tags,
        comments: Vec::new(),
        donations: input.donations,
        verified: is_verified(author),
        upvotes: Vec::new(),
        downvotes: Vec::new(),
    };

    client.collection::<Post>().create(&post).await?;
    info!(post_id = %post.id, author_id = %author.id, "post created");
    Ok(post)
}

pub async fn create_video(client: &Client, author: &UserProfile, input: NewVideo) -> Result<Video, StoreError> {
    if input.media_url.trim().is_empty() {
        return Err(ValidationError::single("media_url", "validation.required", "media url cannot be empty").into());
    }

    let video = Video {
        id: generate_document_id(),
        created_at: Utc::now(),
        version: 1,
        author_id: author.id.clone(),
        author_name: author.username.clone(),
        author_avatar_url: author.avatar_url.clone(),
        media_url: input.media_url,
        caption: input.caption,
        song: input.song,
        comments: Vec::new(),
        shares: 0,
        verified: is_verified(author),
        likes: Vec::new(),
    };

    client.collection::<Video>().create(&video).await?;
    info!(video_id = %video.id, author_id = %author.id, "video created");
    Ok(video)
}

/// Author-only, unconditional. Removes the document, its index entry,
/// and its reaction sets.
pub async fn delete_post(client: &Client, actor_id: &str, post_id: &str) -> Result<(), StoreError> {
    let mut posts = client.collection::<Post>();
    let post = posts.get_or_error(post_id).await?;
    if post.author_id != actor_id {
        return Err(StoreError::InvalidRequest {
            message: "only the author can delete a post".to_string(),
        });
    }
    posts.delete(post_id).await
}

pub async fn delete_video(client: &Client, actor_id: &str, video_id: &str) -> Result<(), StoreError> {
    let mut videos = client.collection::<Video>();
    let video = videos.get_or_error(video_id).await?;
    if video.author_id != actor_id {
        return Err(StoreError::InvalidRequest {
            message: "only the author can delete a video".to_string(),
        });
    }
    videos.delete(video_id).await
}

/// Upload an image or clip for a new post, scoped under the author's
/// id. Returns the public URL to reference from the document.
pub async fn upload_media(
    blobs: &impl BlobStore,
    author_id: &str,
    filename: &str,
    bytes: &[u8],
    progress: &mut dyn FnMut(f32),
) -> Result<String, BlobError> {
    let path = blob_path(author_id, filename, Utc::now());
    blobs.upload(&path, bytes, progress).await
}
