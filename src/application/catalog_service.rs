use std::sync::Arc;

use chrono::Utc;

use crate::domain::catalog::{
    in_time_span, Food, FoodFilter, FoodPatch, Menu, MenuPatch, NewFood, NewMenu,
};
use crate::domain::errors::DomainError;
use crate::domain::pagination::{Page, PageRequest};
use crate::domain::ports::EntityStore;
use crate::domain::price::normalize_price;

use super::listing::paginate;
use super::new_id;

const RETYPE_TIME: &str = "kindly retype the time";

/// Menus and the foods listed on them.
pub struct CatalogService<S: ?Sized> {
    store: Arc<S>,
}

impl<S: EntityStore + ?Sized> CatalogService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    // ── Menus ────────────────────────────────────────────────────────────────

    pub fn create_menu(&self, input: NewMenu) -> Result<Menu, DomainError> {
        if let (Some(start), Some(end)) = (input.start_date, input.end_date) {
            if start >= end {
                log::warn!("rejected menu '{}': start_date not before end_date", input.name);
                return Err(DomainError::InvalidInput(
                    "start_date must be before end_date".to_string(),
                ));
            }
        }

        let now = Utc::now();
        let menu = Menu {
            menu_id: new_id(),
            name: input.name,
            category: input.category,
            start_date: input.start_date,
            end_date: input.end_date,
            created_at: now,
            updated_at: now,
        };
        self.store.insert_menu(menu.clone())?;
        log::info!("created menu {}", menu.menu_id);
        Ok(menu)
    }

    /// A menu may only be edited while the window carried by the patch is
    /// open, so both bounds are required.
    pub fn update_menu(&self, menu_id: &str, patch: MenuPatch) -> Result<Menu, DomainError> {
        let now = Utc::now();
        match (patch.start_date, patch.end_date) {
            (Some(start), Some(end)) if in_time_span(start, end, now) => {}
            _ => {
                log::warn!("rejected update of menu {}: outside its time window", menu_id);
                return Err(DomainError::InvalidInput(RETYPE_TIME.to_string()));
            }
        }

        if !self.store.update_menu(menu_id, &patch, now)? {
            return Err(DomainError::NotFound("menu"));
        }
        log::info!("updated menu {}", menu_id);
        self.store
            .find_menu(menu_id)?
            .ok_or(DomainError::NotFound("menu"))
    }

    pub fn get_menu(&self, menu_id: &str) -> Result<Option<Menu>, DomainError> {
        self.store.find_menu(menu_id)
    }

    pub fn list_menus(&self) -> Result<Vec<Menu>, DomainError> {
        self.store.list_menus()
    }

    // ── Foods ────────────────────────────────────────────────────────────────

    pub fn create_food(&self, input: NewFood) -> Result<Food, DomainError> {
        self.require_menu(&input.menu_id)?;
        let price = normalize_price(input.price)?;

        let now = Utc::now();
        let food = Food {
            food_id: new_id(),
            name: input.name,
            price,
            food_image: input.food_image,
            menu_id: input.menu_id,
            created_at: now,
            updated_at: now,
        };
        self.store.insert_food(food.clone())?;
        log::info!("created food {} on menu {}", food.food_id, food.menu_id);
        Ok(food)
    }

    pub fn update_food(&self, food_id: &str, mut patch: FoodPatch) -> Result<Food, DomainError> {
        if patch.is_empty() {
            return Err(DomainError::InvalidInput("no fields to update".to_string()));
        }
        if let Some(menu_id) = &patch.menu_id {
            self.require_menu(menu_id)?;
        }
        if let Some(price) = patch.price {
            patch.price = Some(normalize_price(price)?);
        }

        if !self.store.update_food(food_id, &patch, Utc::now())? {
            return Err(DomainError::NotFound("food"));
        }
        log::info!("updated food {}", food_id);
        self.store
            .find_food(food_id)?
            .ok_or(DomainError::NotFound("food"))
    }

    pub fn get_food(&self, food_id: &str) -> Result<Option<Food>, DomainError> {
        self.store.find_food(food_id)
    }

    pub fn list_foods(
        &self,
        request: PageRequest,
        filter: FoodFilter,
    ) -> Result<Page<Food>, DomainError> {
        log::debug!("listing foods {:?} with {:?}", request, filter);
        paginate(
            request,
            &filter,
            |f, window| self.store.list_foods(f, window),
            |f| self.store.count_foods(f),
        )
    }

    fn require_menu(&self, menu_id: &str) -> Result<(), DomainError> {
        match self.store.find_menu(menu_id)? {
            Some(_) => Ok(()),
            None => {
                log::warn!("menu {} was not found", menu_id);
                Err(DomainError::NotFound("menu"))
            }
        }
    }
}
