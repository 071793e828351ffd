use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{CategoryId, CategoryName, ImageRef, Slug};

/// Product category shown in navigation and listings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub id: CategoryId,
    pub name: CategoryName,
    pub slug: Slug,
    pub description: String,
    pub image: Option<ImageRef>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Data required to insert a new [`Category`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewCategory {
    pub name: CategoryName,
    pub slug: Slug,
    pub description: String,
    pub image: Option<ImageRef>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Replacement values applied when editing a [`Category`].
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateCategory {
    pub name: CategoryName,
    pub slug: Slug,
    pub description: String,
    pub image: Option<ImageRef>,
}
