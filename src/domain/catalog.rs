use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Menu {
    pub menu_id: String,
    pub name: String,
    pub category: String,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Whether `check` lies strictly between `start` and `end`.
pub fn in_time_span(start: DateTime<Utc>, end: DateTime<Utc>, check: DateTime<Utc>) -> bool {
    check > start && check < end
}

#[derive(Debug, Clone)]
pub struct NewMenu {
    pub name: String,
    pub category: String,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default)]
pub struct MenuPatch {
    pub name: Option<String>,
    pub category: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Food {
    pub food_id: String,
    pub name: String,
    /// Normalized to two decimals when written.
    pub price: f64,
    pub food_image: String,
    pub menu_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewFood {
    pub name: String,
    pub price: f64,
    pub food_image: String,
    pub menu_id: String,
}

#[derive(Debug, Clone, Default)]
pub struct FoodPatch {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub food_image: Option<String>,
    pub menu_id: Option<String>,
}

impl FoodPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.price.is_none()
            && self.food_image.is_none()
            && self.menu_id.is_none()
    }
}

/// Predicate shared by the windowed food listing and its count.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FoodFilter {
    pub menu_id: Option<String>,
}

impl FoodFilter {
    pub fn matches(&self, food: &Food) -> bool {
        self.menu_id.as_ref().map_or(true, |id| *id == food.menu_id)
    }
}
