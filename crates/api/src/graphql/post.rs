//! Post resolvers: list/fetch queries plus create/update/delete mutations.

use async_graphql::{Context, Object, Result, SimpleObject};

use lireddit_db::models::post::{CreatePost, Post};
use lireddit_db::repositories::PostRepo;
use lireddit_db::types::{DbId, Timestamp};
use lireddit_db::DbPool;

/// Transport-facing post shape, mapped explicitly from the storage row.
#[derive(Debug, SimpleObject)]
#[graphql(name = "Post")]
pub struct PostType {
    pub id: DbId,
    pub title: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<Post> for PostType {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            title: post.title,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

#[derive(Default)]
pub struct PostQuery;

#[Object]
impl PostQuery {
    /// All posts, oldest first.
    async fn posts(&self, ctx: &Context<'_>) -> Result<Vec<PostType>> {
        let pool = ctx.data::<DbPool>()?;
        let posts = PostRepo::list(pool).await?;
        Ok(posts.into_iter().map(PostType::from).collect())
    }

    /// A single post by id, or null when none exists.
    async fn post(&self, ctx: &Context<'_>, id: DbId) -> Result<Option<PostType>> {
        let pool = ctx.data::<DbPool>()?;
        let post = PostRepo::find_by_id(pool, id).await?;
        Ok(post.map(PostType::from))
    }
}

#[derive(Default)]
pub struct PostMutation;

#[Object]
impl PostMutation {
    /// Create a new post with the given title.
    async fn create_post(&self, ctx: &Context<'_>, title: String) -> Result<PostType> {
        let pool = ctx.data::<DbPool>()?;
        let post = PostRepo::create(pool, &CreatePost { title }).await?;
        Ok(post.into())
    }

    /// Update a post's title. Returns null when no post has the given id.
    ///
    /// When `title` is not supplied the post is returned untouched and
    /// `updatedAt` keeps its old value. An empty string counts as supplied
    /// and overwrites the title.
    async fn update_post(
        &self,
        ctx: &Context<'_>,
        id: DbId,
        title: Option<String>,
    ) -> Result<Option<PostType>> {
        let pool = ctx.data::<DbPool>()?;
        let post = match title {
            Some(title) => PostRepo::update_title(pool, id, &title).await?,
            None => PostRepo::find_by_id(pool, id).await?,
        };
        Ok(post.map(PostType::from))
    }

    /// Delete a post by id.
    ///
    /// Returns true iff a row was removed. A storage failure is logged and
    /// collapsed to false; callers cannot tell it apart from "not found".
    async fn delete_post(&self, ctx: &Context<'_>, id: DbId) -> Result<bool> {
        let pool = ctx.data::<DbPool>()?;
        match PostRepo::delete(pool, id).await {
            Ok(deleted) => Ok(deleted),
            Err(err) => {
                tracing::error!(error = %err, post_id = id, "Failed to delete post");
                Ok(false)
            }
        }
    }
}
