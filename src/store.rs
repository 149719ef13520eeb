//! In-memory users and blogs.
//!
//! Everything lives behind one `RwLock` for the life of the process. Guards
//! are never held across an `.await`; every method takes the lock, does its
//! work, and returns owned data.

use std::collections::HashMap;

use parking_lot::RwLock;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

/// Author name reported when a blog's author cannot be resolved.
pub const UNKNOWN_AUTHOR: &str = "Unknown";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("email already registered")]
    DuplicateEmail,
}

/// A registered user. The password is kept verbatim.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub email: String,
    pub password: String,
    pub name: String,
}

/// Display fields of a blog's author, resolved when the blog is read.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Author {
    pub name: String,
}

/// A blog post as handed out to callers, author resolved.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Blog {
    pub id: u64,
    pub title: String,
    pub content: String,
    pub author_id: String,
    pub published: bool,
    pub author: Author,
}

/// Point-in-time summary of the store's contents.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSnapshot {
    pub user_count: usize,
    pub blog_count: usize,
    pub users: Vec<UserSummary>,
    pub blogs: Vec<BlogSummary>,
}

#[derive(Clone, Debug, Serialize)]
pub struct UserSummary {
    pub id: String,
    pub name: String,
    pub email: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct BlogSummary {
    pub id: u64,
    pub title: String,
}

/// Blog as stored: the author is only a reference.
struct BlogRecord {
    id: u64,
    title: String,
    content: String,
    author_id: String,
    published: bool,
}

struct Inner {
    /// Insertion order; `by_id` indexes into it.
    users: Vec<User>,
    by_id: HashMap<String, usize>,
    blogs: Vec<BlogRecord>,
    next_user_id: u64,
    next_blog_id: u64,
}

impl Inner {
    fn user(&self, id: &str) -> Option<&User> {
        self.by_id.get(id).map(|&idx| &self.users[idx])
    }

    fn resolve(&self, record: &BlogRecord) -> Blog {
        let name = self.user(&record.author_id)
            .map_or_else(|| UNKNOWN_AUTHOR.to_owned(), |u| u.name.clone());
        Blog {
            id: record.id,
            title: record.title.clone(),
            content: record.content.clone(),
            author_id: record.author_id.clone(),
            published: record.published,
            author: Author { name },
        }
    }
}

/// The application's users and blogs.
///
/// Constructed empty at startup (see [`crate::fixtures`] for seeding) and
/// shared by every handler through [`crate::api::App`].
pub struct Store {
    inner: RwLock<Inner>,
}

impl Store {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                users: Vec::new(),
                by_id: HashMap::new(),
                blogs: Vec::new(),
                next_user_id: 1,
                next_blog_id: 1,
            }),
        }
    }

    /// Registers a user under the next `user_<n>` id.
    ///
    /// Emails are compared exactly (case-sensitive). The check and the insert
    /// happen under one write guard.
    pub fn create_user(
        &self,
        email: impl Into<String>,
        password: impl Into<String>,
        name: impl Into<String>,
    ) -> Result<User, StoreError> {
        let email = email.into();
        let mut inner = self.inner.write();

        if inner.users.iter().any(|u| u.email == email) {
            return Err(StoreError::DuplicateEmail);
        }

        let id = format!("user_{}", inner.next_user_id);
        inner.next_user_id += 1;

        let user = User { id: id.clone(), email, password: password.into(), name: name.into() };
        let idx = inner.users.len();
        inner.users.push(user.clone());
        inner.by_id.insert(id, idx);

        info!(user_id = %user.id, "user created");
        Ok(user)
    }

    pub fn find_user_by_email(&self, email: &str) -> Option<User> {
        self.inner.read().users.iter().find(|u| u.email == email).cloned()
    }

    pub fn find_user_by_id(&self, id: &str) -> Option<User> {
        self.inner.read().user(id).cloned()
    }

    /// Appends a published blog. The author id is not checked against the
    /// user collection.
    pub fn create_blog(
        &self,
        title: impl Into<String>,
        content: impl Into<String>,
        author_id: impl Into<String>,
    ) -> Blog {
        let mut inner = self.inner.write();

        let id = inner.next_blog_id;
        inner.next_blog_id += 1;

        let record = BlogRecord {
            id,
            title: title.into(),
            content: content.into(),
            author_id: author_id.into(),
            published: true,
        };
        let blog = inner.resolve(&record);
        inner.blogs.push(record);

        info!(blog_id = id, author_id = %blog.author_id, "blog created");
        blog
    }

    /// Published blogs in creation order.
    pub fn list_published_blogs(&self) -> Vec<Blog> {
        let inner = self.inner.read();
        let blogs: Vec<Blog> = inner.blogs.iter()
            .filter(|b| b.published)
            .map(|b| inner.resolve(b))
            .collect();
        debug!(count = blogs.len(), "listed published blogs");
        blogs
    }

    pub fn get_blog_by_id(&self, id: u64) -> Option<Blog> {
        let inner = self.inner.read();
        inner.blogs.iter().find(|b| b.id == id).map(|b| inner.resolve(b))
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        let inner = self.inner.read();
        StoreSnapshot {
            user_count: inner.users.len(),
            blog_count: inner.blogs.len(),
            users: inner.users.iter()
                .map(|u| UserSummary { id: u.id.clone(), name: u.name.clone(), email: u.email.clone() })
                .collect(),
            blogs: inner.blogs.iter()
                .map(|b| BlogSummary { id: b.id, title: b.title.clone() })
                .collect(),
        }
    }
}

impl Default for Store {
    fn default() -> Self { Self::new() }
}
