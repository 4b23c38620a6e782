//! # Menu Types
//!
//! Restaurant menu for tablepay.
//! The menu is loaded from `config/menu.toml`.

use crate::error::{PaymentError, PaymentResult};
use crate::payment::LineItem;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A dish or drink on the menu
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItem {
    /// Unique item identifier (e.g., "pho-bo")
    pub id: String,

    /// Display name
    pub name: String,

    /// Short description
    #[serde(default)]
    pub description: String,

    /// Menu section (e.g., "Mains", "Drinks")
    #[serde(default = "default_category")]
    pub category: String,

    /// Unit price in VND
    pub price: i64,

    /// Whether the kitchen currently serves this item
    #[serde(default = "default_true")]
    pub available: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

fn default_true() -> bool {
    true
}

fn default_category() -> String {
    "Other".to_string()
}

impl MenuItem {
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: i64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            category: default_category(),
            price,
            available: true,
            image_url: None,
        }
    }

    /// Builder: set category
    pub fn in_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Builder: set description
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    /// Builder: mark as sold out
    pub fn sold_out(mut self) -> Self {
        self.available = false;
        self
    }

    /// Line item for `quantity` units of this dish
    pub fn line_item(&self, quantity: u32) -> LineItem {
        LineItem::new(self.name.clone(), quantity, self.price)
    }
}

/// The restaurant menu (loaded from config)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Menu {
    #[serde(default)]
    pub items: Vec<MenuItem>,
}

impl Menu {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn add(&mut self, item: MenuItem) {
        self.items.push(item);
    }

    /// Builder: add an item
    pub fn with_item(mut self, item: MenuItem) -> Self {
        self.add(item);
        self
    }

    /// Find an item by ID, regardless of availability
    pub fn get(&self, id: &str) -> Option<&MenuItem> {
        self.items.iter().find(|i| i.id == id)
    }

    /// Find an item that can be ordered right now
    pub fn orderable(&self, id: &str) -> PaymentResult<&MenuItem> {
        let item = self.get(id).ok_or_else(|| PaymentError::MenuItemNotFound {
            item_id: id.to_string(),
        })?;
        if !item.available {
            return Err(PaymentError::MenuItemUnavailable {
                item_id: id.to_string(),
            });
        }
        Ok(item)
    }

    /// All items currently served
    pub fn available_items(&self) -> impl Iterator<Item = &MenuItem> {
        self.items.iter().filter(|i| i.available)
    }

    /// Available items grouped by category, categories sorted by name
    pub fn by_category(&self) -> BTreeMap<&str, Vec<&MenuItem>> {
        let mut sections: BTreeMap<&str, Vec<&MenuItem>> = BTreeMap::new();
        for item in self.available_items() {
            sections.entry(item.category.as_str()).or_default().push(item);
        }
        sections
    }

    /// Load menu from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }
}
