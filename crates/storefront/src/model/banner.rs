use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{check_opt, require_text, Entity, Validate};
use crate::error::Result;

/// Promotional banner. `placement` (e.g. `home-hero`) doubles as its category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Banner {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub link: String,
    pub placement: String,
    #[serde(default)]
    pub position: u32,
    #[serde(default = "default_active")]
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BannerDraft {
    pub title: String,
    pub subtitle: String,
    pub image: String,
    pub link: String,
    pub placement: String,
    pub position: u32,
    pub active: bool,
}

impl Default for BannerDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            subtitle: String::new(),
            image: String::new(),
            link: String::new(),
            placement: String::new(),
            position: 0,
            active: default_active(),
        }
    }
}

impl Validate for BannerDraft {
    fn validate(&self) -> Result<()> {
        require_text("title", &self.title)?;
        require_text("placement", &self.placement)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BannerPatch {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub image: Option<String>,
    pub link: Option<String>,
    pub placement: Option<String>,
    pub position: Option<u32>,
    pub active: Option<bool>,
}

impl Validate for BannerPatch {
    fn validate(&self) -> Result<()> {
        check_opt(&self.title, |v| require_text("title", v))?;
        check_opt(&self.placement, |v| require_text("placement", v))
    }
}

impl Entity for Banner {
    type Draft = BannerDraft;
    type Patch = BannerPatch;

    const COLLECTION: &'static str = "banners";

    fn id(&self) -> u64 {
        self.id
    }

    fn category(&self) -> &str {
        &self.placement
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.subtitle.as_str()]
    }

    fn from_draft(id: u64, draft: BannerDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: draft.title,
            subtitle: draft.subtitle,
            image: draft.image,
            link: draft.link,
            placement: draft.placement,
            position: draft.position,
            active: draft.active,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_patch(&mut self, patch: BannerPatch, now: DateTime<Utc>) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(subtitle) = patch.subtitle {
            self.subtitle = subtitle;
        }
        if let Some(image) = patch.image {
            self.image = image;
        }
        if let Some(link) = patch.link {
            self.link = link;
        }
        if let Some(placement) = patch.placement {
            self.placement = placement;
        }
        if let Some(position) = patch.position {
            self.position = position;
        }
        if let Some(active) = patch.active {
            self.active = active;
        }
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_banner_without_active_flag_is_active() {
        let json = r#"{
            "id": 4,
            "title": "Spring sale",
            "placement": "home-hero",
            "createdAt": "2024-03-01T00:00:00Z",
            "updatedAt": "2024-03-01T00:00:00Z"
        }"#;
        let banner: Banner = serde_json::from_str(json).unwrap();
        assert!(banner.active);
        assert_eq!(banner.category(), "home-hero");
    }

    #[test]
    fn deactivating_keeps_other_fields() {
        let now = Utc::now();
        let mut banner = Banner::from_draft(
            1,
            BannerDraft {
                title: "Sale".into(),
                placement: "sidebar".into(),
                ..Default::default()
            },
            now,
        );
        banner.apply_patch(
            BannerPatch {
                active: Some(false),
                ..Default::default()
            },
            now,
        );
        assert!(!banner.active);
        assert_eq!(banner.title, "Sale");
    }
}
