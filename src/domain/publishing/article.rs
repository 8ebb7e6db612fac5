//! Article record as seen by access control.
//!
//! Content, slugs, and rendering live elsewhere; this module only tracks
//! ownership, creation order, and visibility.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ArticleId, Timestamp, UserId};

/// Visibility of an article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArticleStatus {
    Published,
    Locked,
}

impl ArticleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArticleStatus::Published => "published",
            ArticleStatus::Locked => "locked",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "published" => Some(ArticleStatus::Published),
            "locked" => Some(ArticleStatus::Locked),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: ArticleId,
    pub author_id: UserId,
    pub title: String,
    pub status: ArticleStatus,
    pub created_at: Timestamp,
}

impl Article {
    pub fn new(author_id: UserId, title: impl Into<String>, created_at: Timestamp) -> Self {
        Self {
            id: ArticleId::new(),
            author_id,
            title: title.into(),
            status: ArticleStatus::Published,
            created_at,
        }
    }

    pub fn is_published(&self) -> bool {
        self.status == ArticleStatus::Published
    }

    pub fn is_locked(&self) -> bool {
        self.status == ArticleStatus::Locked
    }
}
