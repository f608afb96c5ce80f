use crate::domain::product::Product;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_HISTORY_LIMIT: usize = 20;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AuthProvider {
    Admin,
    Google,
    Kakao,
}

impl fmt::Display for AuthProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AuthProvider::Admin => "admin",
            AuthProvider::Google => "google",
            AuthProvider::Kakao => "kakao",
        };
        f.write_str(name)
    }
}

/// A resolved identity. The display name doubles as the storage key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionUser {
    pub name: String,
    pub provider: AuthProvider,
    #[serde(rename = "isAdmin", default)]
    pub is_admin: bool,
}

impl SessionUser {
    pub fn new(name: impl Into<String>, provider: AuthProvider) -> Self {
        Self {
            name: name.into(),
            provider,
            is_admin: provider == AuthProvider::Admin,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Bookmark {
    pub id: String,
    pub name: String,
}

impl From<&Product> for Bookmark {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
        }
    }
}

/// In-memory profile of the logged-in user.
#[derive(Debug, Clone, PartialEq)]
pub struct UserProfile {
    pub user: SessionUser,
    pub search_history: Vec<String>,
    pub bookmarks: Vec<Bookmark>,
}

impl UserProfile {
    pub fn new(user: SessionUser, search_history: Vec<String>, bookmarks: Vec<Bookmark>) -> Self {
        Self {
            user,
            search_history,
            bookmarks,
        }
    }

    pub fn display_name(&self) -> &str {
        &self.user.name
    }

    /// Prepends `query` and drops the oldest entries beyond `limit`.
    pub fn push_search(&mut self, query: String, limit: usize) {
        self.search_history.insert(0, query);
        self.search_history.truncate(limit);
    }

    /// Adds the bookmark, or removes it if one with the same id exists.
    /// Returns whether the product is bookmarked afterwards.
    pub fn toggle_bookmark(&mut self, bookmark: Bookmark) -> bool {
        if let Some(idx) = self.bookmarks.iter().position(|b| b.id == bookmark.id) {
            self.bookmarks.remove(idx);
            false
        } else {
            self.bookmarks.push(bookmark);
            true
        }
    }

    pub fn is_bookmarked(&self, product_id: &str) -> bool {
        self.bookmarks.iter().any(|b| b.id == product_id)
    }
}
