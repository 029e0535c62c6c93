use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{check_opt, require_price, require_rating, require_text, Entity, Validate};
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: String,
    pub price: f64,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub image: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: f64,
    pub rating: f64,
    pub stock: u32,
    pub image: String,
}

impl ProductDraft {
    pub fn new(name: impl Into<String>, category: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            price,
            ..Default::default()
        }
    }
}

impl Validate for ProductDraft {
    fn validate(&self) -> Result<()> {
        require_text("name", &self.name)?;
        require_text("category", &self.category)?;
        require_price("price", self.price)?;
        require_rating("rating", self.rating)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub rating: Option<f64>,
    pub stock: Option<u32>,
    pub image: Option<String>,
}

impl Validate for ProductPatch {
    fn validate(&self) -> Result<()> {
        check_opt(&self.name, |v| require_text("name", v))?;
        check_opt(&self.category, |v| require_text("category", v))?;
        check_opt(&self.price, |v| require_price("price", *v))?;
        check_opt(&self.rating, |v| require_rating("rating", *v))
    }
}

impl Entity for Product {
    type Draft = ProductDraft;
    type Patch = ProductPatch;

    const COLLECTION: &'static str = "products";

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
        vec![self.name.as_str(), self.description.as_str()]
    }

    fn price(&self) -> Option<f64> {
        Some(self.price)
    }

    fn rating(&self) -> Option<f64> {
        Some(self.rating)
    }

    fn from_draft(id: u64, draft: ProductDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name,
            description: draft.description,
            category: draft.category,
            price: draft.price,
            rating: draft.rating,
            stock: draft.stock,
            image: draft.image,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_patch(&mut self, patch: ProductPatch, now: DateTime<Utc>) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(rating) = patch.rating {
            self.rating = rating;
        }
        if let Some(stock) = patch.stock {
            self.stock = stock;
        }
        if let Some(image) = patch.image {
            self.image = image;
        }
        self.updated_at = now;
    }
}
