//! Post data model and search criteria.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Maximum allowed length for a post title.
pub const POST_TITLE_MAX: usize = 255;

/// Validation errors returned by [`NewPost::try_new`] and [`PostChanges::try_new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostValidationError {
    /// Title missing or blank.
    EmptyTitle,
    /// Title longer than the maximum.
    TitleTooLong {
        /// Upper bound in characters.
        max: usize,
    },
    /// Content missing or blank.
    EmptyContent,
}

impl PostValidationError {
    /// Request field the failure refers to.
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyTitle | Self::TitleTooLong { .. } => "title",
            Self::EmptyContent => "content",
        }
    }

    /// Machine-readable failure code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyTitle | Self::EmptyContent => "required",
            Self::TitleTooLong { .. } => "too_long",
        }
    }
}

impl fmt::Display for PostValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "Title is required"),
            Self::TitleTooLong { max } => write!(f, "Title must not exceed {max} characters"),
            Self::EmptyContent => write!(f, "Content is required"),
        }
    }
}

impl std::error::Error for PostValidationError {}

/// Validated post title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostTitle(String);

impl PostTitle {
    /// Validate and construct a [`PostTitle`].
    pub fn new(title: impl Into<String>) -> Result<Self, PostValidationError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(PostValidationError::EmptyTitle);
        }
        if title.chars().count() > POST_TITLE_MAX {
            return Err(PostValidationError::TitleTooLong {
                max: POST_TITLE_MAX,
            });
        }
        Ok(Self(title))
    }

    /// Borrow the title.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Validated post body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostContent(String);

impl PostContent {
    /// Validate and construct a [`PostContent`].
    pub fn new(content: impl Into<String>) -> Result<Self, PostValidationError> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(PostValidationError::EmptyContent);
        }
        Ok(Self(content))
    }

    /// Borrow the content.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Stored post.
///
/// ## Invariants
/// - `user_id` references an existing user and never changes after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Store-assigned identifier.
    #[schema(example = 1)]
    pub id: i64,
    /// Post title.
    #[schema(example = "Hello")]
    pub title: String,
    /// Post body.
    #[schema(example = "World")]
    pub content: String,
    /// Owning user.
    #[schema(example = 1)]
    pub user_id: i64,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Join the post with its author's display name.
    #[must_use]
    pub fn with_author(self, author_name: impl Into<String>) -> PostWithAuthor {
        PostWithAuthor {
            id: self.id,
            title: self.title,
            content: self.content,
            user_id: self.user_id,
            author_name: author_name.into(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Post representation returned to clients, carrying the author's name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostWithAuthor {
    /// Store-assigned identifier.
    pub id: i64,
    /// Post title.
    pub title: String,
    /// Post body.
    pub content: String,
    /// Owning user.
    pub user_id: i64,
    /// Owning user's name.
    #[schema(example = "Ann")]
    pub author_name: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

/// Validated input for creating a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    title: PostTitle,
    content: PostContent,
    user_id: i64,
}

impl NewPost {
    /// Validate raw request fields.
    pub fn try_new(
        title: impl Into<String>,
        content: impl Into<String>,
        user_id: i64,
    ) -> Result<Self, PostValidationError> {
        Ok(Self {
            title: PostTitle::new(title)?,
            content: PostContent::new(content)?,
            user_id,
        })
    }

    /// Requested title.
    #[must_use]
    pub fn title(&self) -> &PostTitle {
        &self.title
    }

    /// Requested content.
    #[must_use]
    pub fn content(&self) -> &PostContent {
        &self.content
    }

    /// Owning user.
    #[must_use]
    pub fn user_id(&self) -> i64 {
        self.user_id
    }
}

/// Partial update for a post; absent fields stay unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostChanges {
    title: Option<PostTitle>,
    content: Option<PostContent>,
}

impl PostChanges {
    /// Validate the fields that are present.
    pub fn try_new(
        title: Option<String>,
        content: Option<String>,
    ) -> Result<Self, PostValidationError> {
        Ok(Self {
            title: title.map(PostTitle::new).transpose()?,
            content: content.map(PostContent::new).transpose()?,
        })
    }

    /// New title, if changing.
    #[must_use]
    pub fn title(&self) -> Option<&PostTitle> {
        self.title.as_ref()
    }

    /// New content, if changing.
    #[must_use]
    pub fn content(&self) -> Option<&PostContent> {
        self.content.as_ref()
    }

    /// Apply the present fields to `post` and stamp `now` as the update time.
    pub fn apply_to(&self, post: &mut Post, now: DateTime<Utc>) {
        if let Some(title) = &self.title {
            post.title = title.as_str().to_owned();
        }
        if let Some(content) = &self.content {
            post.content = content.as_str().to_owned();
        }
        post.updated_at = now;
    }
}

/// Optional, AND-composed filters for post search.
///
/// `title` and `content` match as case-sensitive substrings; `author_name`
/// must equal the author's name exactly. Blank filters are dropped.
///
/// # Examples
/// ```
/// use playground::domain::PostSearchCondition;
///
/// let condition = PostSearchCondition::new(Some("Hel".into()), Some("  ".into()), None);
/// assert_eq!(condition.title(), Some("Hel"));
/// assert_eq!(condition.content(), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostSearchCondition {
    title: Option<String>,
    content: Option<String>,
    author_name: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl PostSearchCondition {
    /// Build a condition, discarding blank filters.
    #[must_use]
    pub fn new(
        title: Option<String>,
        content: Option<String>,
        author_name: Option<String>,
    ) -> Self {
        Self {
            title: non_blank(title),
            content: non_blank(content),
            author_name: non_blank(author_name),
        }
    }

    /// Title substring filter.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Content substring filter.
    #[must_use]
    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    /// Exact author name filter.
    #[must_use]
    pub fn author_name(&self) -> Option<&str> {
        self.author_name.as_deref()
    }

    /// Whether `post`, written by `author_name`, satisfies every filter.
    #[must_use]
    pub fn matches(&self, post: &Post, author_name: &str) -> bool {
        self.title().is_none_or(|t| post.title.contains(t))
            && self.content().is_none_or(|c| post.content.contains(c))
            && self.author_name().is_none_or(|a| a == author_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn post() -> Post {
        let now = Utc::now();
        Post {
            id: 1,
            title: "Hello".to_owned(),
            content: "World".to_owned(),
            user_id: 1,
            created_at: now,
            updated_at: now,
        }
    }

    #[rstest]
    #[case("", "body", PostValidationError::EmptyTitle)]
    #[case("  ", "body", PostValidationError::EmptyTitle)]
    #[case("title", " ", PostValidationError::EmptyContent)]
    fn new_post_rejects_blank_fields(
        #[case] title: &str,
        #[case] content: &str,
        #[case] expected: PostValidationError,
    ) {
        assert_eq!(NewPost::try_new(title, content, 1), Err(expected));
    }

    #[rstest]
    fn title_limit_is_inclusive() {
        assert!(PostTitle::new("t".repeat(POST_TITLE_MAX)).is_ok());
        assert_eq!(
            PostTitle::new("t".repeat(POST_TITLE_MAX + 1)),
            Err(PostValidationError::TitleTooLong {
                max: POST_TITLE_MAX
            })
        );
    }

    #[rstest]
    #[case(PostSearchCondition::new(Some("ell".into()), None, None), true)]
    #[case(PostSearchCondition::new(Some("hell".into()), None, None), false)]
    #[case(PostSearchCondition::new(None, Some("orl".into()), Some("Ann".into())), true)]
    #[case(PostSearchCondition::new(None, None, Some("An".into())), false)]
    #[case(PostSearchCondition::default(), true)]
    fn search_condition_matching(
        post: Post,
        #[case] condition: PostSearchCondition,
        #[case] expected: bool,
    ) {
        assert_eq!(condition.matches(&post, "Ann"), expected);
    }

    #[rstest]
    fn with_author_keeps_post_fields(post: Post) {
        let joined = post.clone().with_author("Ann");
        assert_eq!(joined.id, post.id);
        assert_eq!(joined.user_id, post.user_id);
        assert_eq!(joined.author_name, "Ann");
    }
}
