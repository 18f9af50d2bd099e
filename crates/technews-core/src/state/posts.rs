use tracing::warn;

use crate::api::{ApiClient, ApiError};
use crate::models::{
    Category, FeaturedPosts, ListParams, Paginated, PostCreateUpdate, PostDetail, PostList,
    PostsQuery, TogglePinStatus,
};

use super::Pagination;

const FETCH_POSTS_FAILED: &str = "Failed to fetch posts";
const FETCH_POST_FAILED: &str = "Failed to fetch post";
const CREATE_POST_FAILED: &str = "Failed to create post";
const UPDATE_POST_FAILED: &str = "Failed to update post";
const DELETE_POST_FAILED: &str = "Failed to delete post";
const TOGGLE_PIN_FAILED: &str = "Failed to toggle pin status";

pub struct PostsState {
    api: ApiClient,
    pub posts: Vec<PostList>,
    pub current_post: Option<PostDetail>,
    pub featured_posts: Option<FeaturedPosts>,
    pub popular_posts: Vec<PostList>,
    pub recent_posts: Vec<PostList>,
    pub categories: Vec<Category>,
    pub pagination: Pagination,
    pub loading: bool,
    pub error: Option<String>,
}

impl PostsState {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            posts: Vec::new(),
            current_post: None,
            featured_posts: None,
            popular_posts: Vec::new(),
            recent_posts: Vec::new(),
            categories: Vec::new(),
            pagination: Pagination::default(),
            loading: false,
            error: None,
        }
    }

    pub async fn fetch_posts(&mut self, query: &PostsQuery) -> Result<Paginated<PostList>, ApiError> {
        self.begin();
        let result = self.api.posts(query).await;
        let page = self.finish(result, FETCH_POSTS_FAILED)?;

        self.posts = page.results.clone();
        self.pagination = Pagination::from(&page);
        Ok(page)
    }

    /// Like `fetch_posts`, limited to the signed-in user's posts.
    pub async fn fetch_my_posts(
        &mut self,
        query: &PostsQuery,
    ) -> Result<Paginated<PostList>, ApiError> {
        self.begin();
        let result = self.api.my_posts(query).await;
        let page = self.finish(result, FETCH_POSTS_FAILED)?;

        self.posts = page.results.clone();
        self.pagination = Pagination::from(&page);
        Ok(page)
    }

    pub async fn fetch_post(&mut self, slug: &str) -> Result<PostDetail, ApiError> {
        self.begin();
        let result = self.api.post_detail(slug).await;
        let post = self.finish(result, FETCH_POST_FAILED)?;

        self.current_post = Some(post.clone());
        Ok(post)
    }

    /// Create a post and put it at the head of the list.
    pub async fn create_post(&mut self, post: &PostCreateUpdate) -> Result<PostDetail, ApiError> {
        self.begin();
        let result = self.api.create_post(post).await;
        let created = self.finish(result, CREATE_POST_FAILED)?;

        self.posts.insert(0, PostList::from(&created));
        Ok(created)
    }

    /// Update a post, replacing its list row and the selected post when
    /// either has the same slug.
    pub async fn update_post(
        &mut self,
        slug: &str,
        post: &PostCreateUpdate,
    ) -> Result<PostDetail, ApiError> {
        self.begin();
        let result = self.api.update_post(slug, post).await;
        let updated = self.finish(result, UPDATE_POST_FAILED)?;

        if let Some(row) = self.posts.iter_mut().find(|p| p.slug == slug) {
            *row = PostList::from(&updated);
        }
        if self.current_post.as_ref().is_some_and(|p| p.slug == slug) {
            self.current_post = Some(updated.clone());
        }
        Ok(updated)
    }

    pub async fn delete_post(&mut self, slug: &str) -> Result<(), ApiError> {
        self.begin();
        let result = self.api.delete_post(slug).await;
        self.finish(result, DELETE_POST_FAILED)?;

        self.posts.retain(|p| p.slug != slug);
        if self.current_post.as_ref().is_some_and(|p| p.slug == slug) {
            self.current_post = None;
        }
        Ok(())
    }

    /// Pin or unpin a post; the matching list row takes the returned post's
    /// fields.
    pub async fn toggle_pin_status(&mut self, slug: &str) -> Result<TogglePinStatus, ApiError> {
        self.begin();
        let result = self.api.toggle_pin_status(slug).await;
        let toggled = self.finish(result, TOGGLE_PIN_FAILED)?;

        if let Some(ref post) = toggled.post {
            if let Some(row) = self.posts.iter_mut().find(|p| p.slug == slug) {
                row.apply(post);
            }
        }
        Ok(toggled)
    }

    // The side lists below leave `loading` and `error` alone; failures are
    // only logged.

    pub async fn fetch_featured_posts(&mut self) -> Result<FeaturedPosts, ApiError> {
        let featured = self
            .api
            .featured_posts()
            .await
            .inspect_err(|e| warn!(error = %e, "Failed to fetch featured posts"))?;
        self.featured_posts = Some(featured.clone());
        Ok(featured)
    }

    pub async fn fetch_popular_posts(&mut self) -> Result<Vec<PostList>, ApiError> {
        let posts = self
            .api
            .popular_posts()
            .await
            .inspect_err(|e| warn!(error = %e, "Failed to fetch popular posts"))?;
        self.popular_posts = posts.clone();
        Ok(posts)
    }

    pub async fn fetch_recent_posts(&mut self) -> Result<Vec<PostList>, ApiError> {
        let posts = self
            .api
            .recent_posts()
            .await
            .inspect_err(|e| warn!(error = %e, "Failed to fetch recent posts"))?;
        self.recent_posts = posts.clone();
        Ok(posts)
    }

    pub async fn fetch_categories(
        &mut self,
        params: &ListParams,
    ) -> Result<Paginated<Category>, ApiError> {
        let page = self
            .api
            .categories(params)
            .await
            .inspect_err(|e| warn!(error = %e, "Failed to fetch categories"))?;
        self.categories = page.results.clone();
        Ok(page)
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
