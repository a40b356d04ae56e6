//! # Entities
//!
//! Two collections live in the store:
//! - `categories`: named tags, optionally described
//! - `items`: grocery products pointing at zero or more categories
//!
//! Item to category links are weak references. An item keeps the category id
//! only, nothing checks that the category still exists, and deleting a category
//! leaves dangling ids behind. Lookups that resolve them simply skip the misses.
use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const CATEGORY_NAME_MAX: usize = 20;

macro_rules! entity_id {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s.trim()).map(Self)
            }
        }
    };
}

entity_id!(CategoryId);
entity_id!(ItemId);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Category {
    pub fn url(&self) -> String {
        category_url(&self.id)
    }
}

pub fn category_url(id: &CategoryId) -> String {
    format!("/category/{id}")
}

/// Category fields as accepted from a form, before the store assigns an id.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryDraft {
    pub name: String,
    pub description: Option<String>,
}

impl CategoryDraft {
    pub fn into_category(self, id: CategoryId) -> Category {
        Category {
            id,
            name: self.name,
            description: self.description,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Vec<CategoryId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    pub amount: f64,
}

impl Item {
    pub fn url(&self) -> String {
        item_url(&self.id)
    }

    pub fn summary(&self) -> ItemSummary {
        ItemSummary {
            id: self.id,
            name: self.name.clone(),
            amount: self.amount,
        }
    }
}

pub fn item_url(id: &ItemId) -> String {
    format!("/item/{id}")
}

#[derive(Debug, Clone, PartialEq)]
pub struct ItemDraft {
    pub name: String,
    pub description: Option<String>,
    pub category: Vec<CategoryId>,
    pub price: Option<f64>,
    pub amount: f64,
}

impl ItemDraft {
    pub fn into_item(self, id: ItemId) -> Item {
        Item {
            id,
            name: self.name,
            description: self.description,
            category: self.category,
            price: self.price,
            amount: self.amount,
        }
    }
}

/// Projection of an item used by list pages: only `name` and `amount` are read.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemSummary {
    pub id: ItemId,
    pub name: String,
    pub amount: f64,
}

impl ItemSummary {
    pub fn url(&self) -> String {
        item_url(&self.id)
    }
}

/// Byte-wise ascending by name, id breaks ties.
pub fn sort_categories(categories: &mut [Category]) {
    categories.sort_by(|a, b| (a.name.as_str(), a.id).cmp(&(b.name.as_str(), b.id)));
}

pub fn sort_summaries(items: &mut [ItemSummary]) {
    items.sort_by(|a, b| (a.name.as_str(), a.id).cmp(&(b.name.as_str(), b.id)));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls_derive_from_id() {
        let category = CategoryDraft {
            name: "Dairy".to_string(),
            description: None,
        }
        .into_category(CategoryId::new());

        assert_eq!(category.url(), format!("/category/{}", category.id));

        let item = ItemDraft {
            name: "Milk".to_string(),
            description: None,
            category: vec![category.id],
            price: Some(1.5),
            amount: 2.0,
        }
        .into_item(ItemId::new());

        assert_eq!(item.url(), format!("/item/{}", item.id));
        assert_eq!(item.summary().url(), item.url());
    }

    #[test]
    fn test_id_parsing() {
        let id = CategoryId::new();

        assert_eq!(id.to_string().parse::<CategoryId>().unwrap(), id);
        assert!("not-an-id".parse::<CategoryId>().is_err());
        assert!("".parse::<ItemId>().is_err());
    }

    #[test]
    fn test_item_document_defaults() {
        let id = ItemId::new();
        let json = format!(r#"{{"id":"{id}","name":"Bread","amount":1}}"#);
        let item: Item = serde_json::from_str(&json).unwrap();

        assert!(item.category.is_empty());
        assert_eq!(item.price, None);
        assert_eq!(item.description, None);
    }

    #[test]
    fn test_sort_categories() {
        let mut categories: Vec<Category> = ["Produce", "Bakery", "Dairy"]
            .into_iter()
            .map(|name| Category {
                id: CategoryId::new(),
                name: name.to_string(),
                description: None,
            })
            .collect();
        sort_categories(&mut categories);

        let names: Vec<&str> = categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Bakery", "Dairy", "Produce"]);
    }
}
