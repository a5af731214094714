use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use greenerp_core::{DomainError, DomainResult, ItemId};

/// A catalog item.
///
/// `co2_per_unit` is the emission factor (kg CO2e per unit) that purchase
/// orders snapshot into their lines at creation time; changing it later does
/// not rewrite historical lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub sku: String,
    pub category: String,
    pub unit: String,
    pub stock: i64,
    pub reorder_level: i64,
    pub co2_per_unit: f64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Fields required to create an item. Optional fields carry the same
/// defaults the API applies when a request omits them.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewItem {
    pub name: String,
    pub sku: String,
    pub category: String,
    pub unit: String,
    pub stock: i64,
    pub reorder_level: i64,
    pub co2_per_unit: f64,
    pub is_active: bool,
}

impl Item {
    /// Validate and create an item.
    ///
    /// Name and SKU are required; both are trimmed. SKU uniqueness is a store
    /// concern (enforced on insert).
    pub fn create(new: NewItem, now: DateTime<Utc>) -> DomainResult<Self> {
        let name = new.name.trim().to_string();
        let sku = new.sku.trim().to_string();

        if name.is_empty() || sku.is_empty() {
            return Err(DomainError::validation("name and sku are required"));
        }

        Ok(Self {
            id: ItemId::new(),
            name,
            sku,
            category: new.category,
            unit: new.unit,
            stock: new.stock,
            reorder_level: new.reorder_level,
            co2_per_unit: new.co2_per_unit,
            is_active: new.is_active,
            created_at: now,
        })
    }

    /// Apply a partial update: only fields present in the patch overwrite
    /// current values. The SKU is immutable after creation.
    pub fn apply_patch(&mut self, patch: ItemPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(unit) = patch.unit {
            self.unit = unit;
        }
        if let Some(stock) = patch.stock {
            self.stock = stock;
        }
        if let Some(reorder_level) = patch.reorder_level {
            self.reorder_level = reorder_level;
        }
        if let Some(co2_per_unit) = patch.co2_per_unit {
            self.co2_per_unit = co2_per_unit;
        }
        if let Some(is_active) = patch.is_active {
            self.is_active = is_active;
        }
    }
}

/// Partial item update; absent fields retain their prior values.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub category: Option<String>,
    pub unit: Option<String>,
    pub stock: Option<i64>,
    pub reorder_level: Option<i64>,
    pub co2_per_unit: Option<f64>,
    pub is_active: Option<bool>,
}
