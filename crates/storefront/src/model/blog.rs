use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{check_opt, require_text, Entity, Validate};
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub author: String,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BlogDraft {
    pub title: String,
    pub excerpt: String,
    pub body: String,
    pub author: String,
    pub category: String,
    pub tags: Vec<String>,
}

impl Validate for BlogDraft {
    fn validate(&self) -> Result<()> {
        require_text("title", &self.title)?;
        require_text("category", &self.category)?;
        require_text("body", &self.body)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BlogPatch {
    pub title: Option<String>,
    pub excerpt: Option<String>,
    pub body: Option<String>,
    pub author: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl Validate for BlogPatch {
    fn validate(&self) -> Result<()> {
        check_opt(&self.title, |v| require_text("title", v))?;
        check_opt(&self.category, |v| require_text("category", v))?;
        check_opt(&self.body, |v| require_text("body", v))
    }
}

impl Entity for BlogPost {
    type Draft = BlogDraft;
    type Patch = BlogPatch;

    const COLLECTION: &'static str = "blogs";

    fn id(&self) -> u64 {
        self.id
    }

    fn category(&self) -> &str {
        &self.category
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.title.as_str(), self.excerpt.as_str(), self.author.as_str()];
        fields.extend(self.tags.iter().map(String::as_str));
        fields
    }

    fn from_draft(id: u64, draft: BlogDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: draft.title,
            excerpt: draft.excerpt,
            body: draft.body,
            author: draft.author,
            category: draft.category,
            tags: draft.tags,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_patch(&mut self, patch: BlogPatch, now: DateTime<Utc>) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(excerpt) = patch.excerpt {
            self.excerpt = excerpt;
        }
        if let Some(body) = patch.body {
            self.body = body;
        }
        if let Some(author) = patch.author {
            self.author = author;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(tags) = patch.tags {
            self.tags = tags;
        }
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_are_searchable() {
        let post = BlogPost::from_draft(
            1,
            BlogDraft {
                title: "Study tips".into(),
                body: "Space your reviews.".into(),
                category: "learning".into(),
                tags: vec!["memory".into()],
                ..Default::default()
            },
            Utc::now(),
        );
        assert!(post.search_fields().contains(&"memory"));
    }

    #[test]
    fn draft_requires_body() {
        let draft = BlogDraft {
            title: "Empty".into(),
            category: "news".into(),
            ..Default::default()
        };
        assert!(draft.validate().unwrap_err().to_string().contains("body"));
    }
}
