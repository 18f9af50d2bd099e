use serde::{Deserialize, Serialize};

/// Page of results in the DRF pagination envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    #[serde(default)]
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

impl<T> Default for Paginated<T> {
    fn default() -> Self {
        Self {
            count: 0,
            next: None,
            previous: None,
            results: Vec::new(),
        }
    }
}

impl<T> Paginated<T> {
    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }

    pub fn has_previous(&self) -> bool {
        self.previous.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublicationStatus {
    Draft,
    Published,
    Archived,
}

/// Common list query parameters. Unset fields are not sent.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ListParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ordering: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PostsQuery {
    #[serde(flatten)]
    pub list: ListParams,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publication_status: Option<PublicationStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorInfo {
    pub id: serde_json::Value,
    pub username: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryInfo {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostList {
    pub id: i64,
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    pub publication_status: Option<PublicationStatus>,
    #[serde(default)]
    pub comments_count: i64,
    #[serde(default)]
    pub views_count: i64,
    pub created: Option<String>,
    pub modified: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDetail {
    pub id: i64,
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub author: Option<serde_json::Value>,
    #[serde(default)]
    pub author_info: Option<AuthorInfo>,
    #[serde(default)]
    pub category: Option<serde_json::Value>,
    #[serde(default)]
    pub category_info: Option<CategoryInfo>,
    pub publication_status: Option<PublicationStatus>,
    #[serde(default)]
    pub comments_count: i64,
    #[serde(default)]
    pub views_count: i64,
    pub created: Option<String>,
    pub modified: Option<String>,
}

impl PostList {
    /// Overwrite this row with the fields of a freshly fetched detail.
    /// Author and category keep their current text when the detail does
    /// not carry them.
    pub fn apply(&mut self, detail: &PostDetail) {
        self.id = detail.id;
        self.title = detail.title.clone();
        self.slug = detail.slug.clone();
        self.content = detail.content.clone();
        self.image = detail.image.clone();
        if let Some(author) = detail.author_name() {
            self.author = Some(author.to_string());
        }
        if let Some(ref category) = detail.category_info {
            self.category = Some(category.name.clone());
        }
        self.publication_status = detail.publication_status;
        self.comments_count = detail.comments_count;
        self.views_count = detail.views_count;
        self.created = detail.created.clone();
        self.modified = detail.modified.clone();
    }
}

impl From<&PostDetail> for PostList {
    fn from(detail: &PostDetail) -> Self {
        let mut row = PostList {
            id: detail.id,
            title: String::new(),
            slug: String::new(),
            content: String::new(),
            image: None,
            author: None,
            category: None,
            publication_status: None,
            comments_count: 0,
            views_count: 0,
            created: None,
            modified: None,
        };
        row.apply(detail);
        row
    }
}

impl PostDetail {
    /// Username of the author, from `author_info` or a string `author`.
    pub fn author_name(&self) -> Option<&str> {
        self.author_info
            .as_ref()
            .map(|info| info.username.as_str())
            .or_else(|| self.author.as_ref().and_then(|a| a.as_str()))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostCreateUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publication_status: Option<PublicationStatus>,
}

/// Image attached to a multipart post submission.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub mime: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeaturedPosts {
    #[serde(default)]
    pub pinned_posts: Vec<PostList>,
    #[serde(default)]
    pub popular_posts: Vec<PostList>,
    #[serde(default)]
    pub recent_posts: Vec<PostList>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PinnedPostsOnly {
    #[serde(default)]
    pub pinned_posts: Vec<PostList>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TogglePinStatus {
    #[serde(default)]
    pub is_pinned: bool,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub post: Option<PostDetail>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub posts_count: i64,
    pub created: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostsByCategory {
    pub category: Category,
    #[serde(default)]
    pub posts: Vec<PostList>,
}
