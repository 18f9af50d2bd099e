use tracing::warn;

use crate::api::{ApiClient, ApiError};
use crate::models::{
    Comment, CommentCreate, CommentDetail, CommentReplies, CommentUpdate, CommentsQuery,
    ListParams, Paginated, PostComments,
};

use super::Pagination;

const FETCH_COMMENTS_FAILED: &str = "Failed to fetch comments";
const FETCH_POST_COMMENTS_FAILED: &str = "Failed to fetch post comments";
const CREATE_COMMENT_FAILED: &str = "Failed to create comment";
const UPDATE_COMMENT_FAILED: &str = "Failed to update comment";
const DELETE_COMMENT_FAILED: &str = "Failed to delete comment";

pub struct CommentsState {
    api: ApiClient,
    pub comments: Vec<Comment>,
    pub pagination: Pagination,
    pub loading: bool,
    pub error: Option<String>,
}

impl CommentsState {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            comments: Vec::new(),
            pagination: Pagination::default(),
            loading: false,
            error: None,
        }
    }

    pub async fn fetch_comments(
        &mut self,
        query: &CommentsQuery,
    ) -> Result<Paginated<Comment>, ApiError> {
        self.begin();
        let result = self.api.comments(query).await;
        let page = self.finish(result, FETCH_COMMENTS_FAILED)?;

        self.comments = page.results.clone();
        self.pagination = Pagination::from(&page);
        Ok(page)
    }

    pub async fn fetch_my_comments(
        &mut self,
        params: &ListParams,
    ) -> Result<Paginated<Comment>, ApiError> {
        self.begin();
        let result = self.api.my_comments(params).await;
        let page = self.finish(result, FETCH_COMMENTS_FAILED)?;

        self.comments = page.results.clone();
        self.pagination = Pagination::from(&page);
        Ok(page)
    }

    /// Load the top-level thread of one post. Pagination is left as is.
    pub async fn fetch_post_comments(&mut self, post_id: i64) -> Result<PostComments, ApiError> {
        self.begin();
        let result = self.api.post_comments(post_id).await;
        let thread = self.finish(result, FETCH_POST_COMMENTS_FAILED)?;

        self.comments = thread.comments.clone();
        Ok(thread)
    }

    /// Post a comment. Top-level comments go to the front of the list;
    /// replies are not listed here.
    ///
    /// The server echoes only the submitted fields, so the listed comment
    /// has id 0 until the list is fetched again.
    pub async fn create_comment(
        &mut self,
        comment: &CommentCreate,
    ) -> Result<CommentCreate, ApiError> {
        self.begin();
        let result = self.api.create_comment(comment).await;
        let created = self.finish(result, CREATE_COMMENT_FAILED)?;

        if created.parent.is_none() {
            self.comments.insert(0, unsaved(&created));
        }
        Ok(created)
    }

    pub async fn update_comment(
        &mut self,
        id: i64,
        comment: &CommentUpdate,
    ) -> Result<CommentUpdate, ApiError> {
        self.begin();
        let result = self.api.update_comment(id, comment).await;
        let updated = self.finish(result, UPDATE_COMMENT_FAILED)?;

        if let Some(existing) = self.comments.iter_mut().find(|c| c.id == id) {
            existing.content = updated.content.clone();
        }
        Ok(updated)
    }

    pub async fn delete_comment(&mut self, id: i64) -> Result<(), ApiError> {
        self.begin();
        let result = self.api.delete_comment(id).await;
        self.finish(result, DELETE_COMMENT_FAILED)?;

        self.comments.retain(|c| c.id != id);
        Ok(())
    }

    pub async fn fetch_comment(&self, id: i64) -> Result<CommentDetail, ApiError> {
        self.api
            .comment(id)
            .await
            .inspect_err(|e| warn!(error = %e, id, "Failed to fetch comment"))
    }

    pub async fn fetch_comment_replies(&self, id: i64) -> Result<CommentReplies, ApiError> {
        self.api
            .comment_replies(id)
            .await
            .inspect_err(|e| warn!(error = %e, id, "Failed to fetch comment replies"))
    }

    fn begin(&mut self) {
        self.loading = true;
        self.error = None;
    }

    fn finish<T>(&mut self, result: Result<T, ApiError>, fallback: &str) -> Result<T, ApiError> {
        self.loading = false;
        if let Err(ref e) = result {
            self.error = Some(e.user_message(fallback));
        }
        result
    }
}

fn unsaved(created: &CommentCreate) -> Comment {
    Comment {
        id: 0,
        content: created.content.clone(),
        author: None,
        author_info: None,
        parent: None,
        is_active: true,
        is_reply: false,
        replies_count: 0,
        created: None,
        modified: None,
    }
}
