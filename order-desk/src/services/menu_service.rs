//! Menu Service - categories, foods, sides and the food ↔ side links

use rust_decimal::Decimal;
use serde::Serialize;
use shared::models::{
    Category, CategoryUpsert, DEFAULT_SIDE_TYPE, Food, FoodSide, FoodUpsert, SIDE_TYPES, Side,
    SideUpsert,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::instrument;

use crate::store::{DataStore, DataStoreExt, Filter, Query, StoreError};
use crate::utils::{AppError, AppResult, ErrorCode};

const CATEGORIES: &str = "categories";
const FOODS: &str = "foods";
const SIDES: &str = "sides";
const FOOD_SIDES: &str = "food_sides";

/// Sides of one type, for pickers that group by type
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SideGroup {
    pub side_type: String,
    pub sides: Vec<Side>,
}

/// Group sides by type: known types first in their fixed order, then any
/// other types alphabetically. Empty groups are left out.
pub fn group_sides_by_type(sides: &[Side]) -> Vec<SideGroup> {
    let mut by_type: BTreeMap<&str, Vec<Side>> = BTreeMap::new();
    for side in sides {
        by_type.entry(side.side_type()).or_default().push(side.clone());
    }

    let mut groups = Vec::with_capacity(by_type.len());
    for known in SIDE_TYPES {
        if let Some(sides) = by_type.remove(known) {
            groups.push(SideGroup {
                side_type: known.to_string(),
                sides,
            });
        }
    }
    groups.extend(by_type.into_iter().map(|(side_type, sides)| SideGroup {
        side_type: side_type.to_string(),
        sides,
    }));
    groups
}

/// Foods belonging to `category_id`, or all of them when `None`
pub fn foods_in_category(foods: &[Food], category_id: Option<i64>) -> Vec<&Food> {
    foods
        .iter()
        .filter(|f| category_id.is_none_or(|id| f.category_id == id))
        .collect()
}

#[derive(Clone)]
pub struct MenuService {
    store: Arc<dyn DataStore>,
}

impl std::fmt::Debug for MenuService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MenuService").finish_non_exhaustive()
    }
}

impl MenuService {
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self { store }
    }

    // =========================================================================
    // Categories
    // =========================================================================

    pub async fn list_categories(&self) -> AppResult<Vec<Category>> {
        Ok(self
            .store
            .fetch(CATEGORIES, &Query::newest_first())
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Error fetching categories"))?)
    }

    #[instrument(skip(self))]
    pub async fn create_category(&self, name: &str) -> AppResult<Category> {
        let payload = category_payload(name)?;
        let category: Category = self
            .store
            .insert_one(CATEGORIES, &payload)
            .await
            .map_err(|e| save_error("category", e))?;
        tracing::info!(id = category.id, name = %category.name, "Category created");
        Ok(category)
    }

    #[instrument(skip(self))]
    pub async fn rename_category(&self, id: i64, name: &str) -> AppResult<()> {
        let payload = category_payload(name)?;
        let updated = self
            .store
            .update_where(CATEGORIES, &payload, &[Filter::eq("id", id)])
            .await
            .map_err(|e| save_error("category", e))?;
        if updated.is_empty() {
            return Err(AppError::new(ErrorCode::CategoryNotFound).with_detail("id", id));
        }
        Ok(())
    }

    /// Delete a category together with every food filed under it
    ///
    /// Foods go first; if that fails the category is left untouched.
    #[instrument(skip(self))]
    pub async fn delete_category(&self, id: i64) -> AppResult<()> {
        let foods_removed = self
            .store
            .delete(FOODS, &[Filter::eq("category_id", id)])
            .await
            .map_err(|e| {
                tracing::error!(category_id = id, error = %e, "Error deleting associated foods");
                AppError::new(ErrorCode::CategoryHasFoods).with_detail("reason", e.to_string())
            })?;

        let removed = self
            .store
            .delete(CATEGORIES, &[Filter::eq("id", id)])
            .await
            .map_err(|e| {
                tracing::error!(category_id = id, error = %e, "Error deleting category");
                AppError::from(e)
            })?;
        if removed == 0 {
            return Err(AppError::new(ErrorCode::CategoryNotFound).with_detail("id", id));
        }

        tracing::info!(category_id = id, foods_removed, "Category deleted");
        Ok(())
    }

    // =========================================================================
    // Foods
    // =========================================================================

    /// Foods newest first, each with its category name
    pub async fn list_foods(&self, category_id: Option<i64>) -> AppResult<Vec<Food>> {
        let foods: Vec<Food> = self
            .store
            .fetch(
                FOODS,
                &Query::newest_first().columns("*, categories(name)"),
            )
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Error fetching foods"))?;
        Ok(foods_in_category(&foods, category_id)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Create (`editing = None`) or update a food, then replace its side links
    ///
    /// Link failures are logged but do not undo the saved food.
    #[instrument(skip(self, payload))]
    pub async fn save_food(
        &self,
        editing: Option<i64>,
        payload: &FoodUpsert,
        side_ids: &[i64],
    ) -> AppResult<i64> {
        validate_food(payload)?;

        let food_id = match editing {
            Some(id) => {
                let updated = self
                    .store
                    .update_where(FOODS, payload, &[Filter::eq("id", id)])
                    .await
                    .map_err(|e| save_error("food", e))?;
                if updated.is_empty() {
                    return Err(AppError::new(ErrorCode::FoodNotFound).with_detail("id", id));
                }
                id
            }
            None => {
                let food: Food = self
                    .store
                    .insert_one(FOODS, payload)
                    .await
                    .map_err(|e| save_error("food", e))?;
                food.id
            }
        };

        if let Err(e) = self.replace_food_sides(food_id, side_ids).await {
            tracing::warn!(food_id, error = %e, "Food saved but side links were not replaced");
        }
        tracing::info!(food_id, name = %payload.name, "Food saved");
        Ok(food_id)
    }

    /// Drop every link of `food_id`, then insert one per side id
    pub async fn replace_food_sides(&self, food_id: i64, side_ids: &[i64]) -> AppResult<()> {
        self.store
            .delete(FOOD_SIDES, &[Filter::eq("food_id", food_id)])
            .await?;
        if side_ids.is_empty() {
            return Ok(());
        }

        let rows = side_ids
            .iter()
            .map(|&side_id| serde_json::to_value(FoodSide { food_id, side_id }))
            .collect::<Result<Vec<_>, _>>()
            .map_err(StoreError::from)?;
        self.store.insert(FOOD_SIDES, rows).await?;
        Ok(())
    }

    /// Side ids currently linked to `food_id`, for pre-selecting an edit form
    pub async fn linked_side_ids(&self, food_id: i64) -> AppResult<Vec<i64>> {
        let links: Vec<FoodSide> = self
            .store
            .fetch(
                FOOD_SIDES,
                &Query::new().columns("food_id, side_id").eq("food_id", food_id),
            )
            .await?;
        Ok(links.into_iter().map(|l| l.side_id).collect())
    }

    pub async fn set_availability(&self, id: i64, is_available: bool) -> AppResult<()> {
        let updated = self
            .store
            .update(
                FOODS,
                serde_json::json!({ "is_available": is_available }),
                &[Filter::eq("id", id)],
            )
            .await
            .map_err(|e| {
                tracing::error!(food_id = id, error = %e, "Error updating availability");
                AppError::from(e)
            })?;
        if updated.is_empty() {
            return Err(AppError::new(ErrorCode::FoodNotFound).with_detail("id", id));
        }
        Ok(())
    }

    /// Flip availability given the currently displayed value; returns the new value
    pub async fn toggle_availability(&self, id: i64, current: bool) -> AppResult<bool> {
        self.set_availability(id, !current).await?;
        Ok(!current)
    }

    #[instrument(skip(self))]
    pub async fn delete_food(&self, id: i64) -> AppResult<()> {
        let removed = self
            .store
            .delete(FOODS, &[Filter::eq("id", id)])
            .await
            .map_err(|e| {
                tracing::error!(food_id = id, error = %e, "Error deleting food");
                AppError::from(e)
            })?;
        if removed == 0 {
            return Err(AppError::new(ErrorCode::FoodNotFound).with_detail("id", id));
        }
        Ok(())
    }

    // =========================================================================
    // Sides
    // =========================================================================

    pub async fn list_sides(&self) -> AppResult<Vec<Side>> {
        Ok(self
            .store
            .fetch(SIDES, &Query::newest_first())
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Error fetching sides"))?)
    }

    #[instrument(skip(self, payload))]
    pub async fn save_side(&self, editing: Option<i64>, payload: &SideUpsert) -> AppResult<i64> {
        let mut payload = payload.clone();
        if payload.side_type.trim().is_empty() {
            payload.side_type = DEFAULT_SIDE_TYPE.to_string();
        }
        validate_side(&payload)?;

        match editing {
            Some(id) => {
                let updated = self
                    .store
                    .update_where(SIDES, &payload, &[Filter::eq("id", id)])
                    .await
                    .map_err(|e| save_error("side", e))?;
                if updated.is_empty() {
                    return Err(AppError::new(ErrorCode::SideNotFound).with_detail("id", id));
                }
                Ok(id)
            }
            None => {
                let side: Side = self
                    .store
                    .insert_one(SIDES, &payload)
                    .await
                    .map_err(|e| save_error("side", e))?;
                tracing::info!(side_id = side.id, name = %side.name, "Side created");
                Ok(side.id)
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn delete_side(&self, id: i64) -> AppResult<()> {
        let removed = self
            .store
            .delete(SIDES, &[Filter::eq("id", id)])
            .await
            .map_err(|e| {
                tracing::error!(side_id = id, error = %e, "Error deleting side");
                AppError::from(e)
            })?;
        if removed == 0 {
            return Err(AppError::new(ErrorCode::SideNotFound).with_detail("id", id));
        }
        Ok(())
    }
}

fn save_error(entity: &str, err: StoreError) -> AppError {
    tracing::error!(entity, error = %err, "Error saving {}", entity);
    let mut app: AppError = err.into();
    app.message = format!("Error saving {}: {}", entity, app.message);
    app
}

fn category_payload(name: &str) -> AppResult<CategoryUpsert> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::required("name"));
    }
    Ok(CategoryUpsert {
        name: name.to_string(),
    })
}

fn validate_food(payload: &FoodUpsert) -> AppResult<()> {
    if payload.name.trim().is_empty() {
        return Err(AppError::required("name"));
    }
    if payload.category_id <= 0 {
        return Err(AppError::required("category_id"));
    }
    if payload.price < Decimal::ZERO {
        return Err(AppError::new(ErrorCode::FoodInvalidPrice).with_detail("price", payload.price.to_string()));
    }
    Ok(())
}

fn validate_side(payload: &SideUpsert) -> AppResult<()> {
    if payload.name.trim().is_empty() {
        return Err(AppError::required("name"));
    }
    if payload.price < Decimal::ZERO {
        return Err(AppError::new(ErrorCode::SideInvalidPrice).with_detail("price", payload.price.to_string()));
    }
    if !SIDE_TYPES.contains(&payload.side_type.as_str()) {
        return Err(AppError::validation(format!(
            "Unknown side type '{}'. Expected one of: {}",
            payload.side_type,
            SIDE_TYPES.join(", ")
        ))
        .with_detail("field", "type"));
    }
    Ok(())
}
