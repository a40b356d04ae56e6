//! # Sample Data
//!
//! Populates a store with a handful of categories and items that reference
//! them. Useful for poking at the pages locally.
//!
//! - Categories are created first so items can point at their ids
//! - Item references use category names from [`ITEMS`], unknown names are skipped
//! - Running twice without `--reset` creates duplicates, ids are never reused
use std::collections::HashMap;

use grocery_server::{
    database::{RedisStore, Store},
    error::StoreError,
    models::{CategoryDraft, CategoryId, ItemDraft},
};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

pub struct SampleItem {
    pub name: &'static str,
    pub description: Option<&'static str>,
    pub categories: &'static [&'static str],
    pub price: Option<f64>,
    pub amount: f64,
}

pub const CATEGORIES: &[(&str, Option<&str>)] = &[
    ("Bakery", Some("Bread, pastries and cakes")),
    ("Dairy", Some("Milk, cheese and eggs")),
    ("Produce", Some("Fresh fruit and vegetables")),
    ("Beverages", None),
];

pub const ITEMS: &[SampleItem] = &[
    SampleItem {
        name: "Sourdough",
        description: Some("Baked this morning"),
        categories: &["Bakery"],
        price: Some(4.5),
        amount: 6.0,
    },
    SampleItem {
        name: "Whole Milk",
        description: None,
        categories: &["Dairy", "Beverages"],
        price: Some(1.2),
        amount: 24.0,
    },
    SampleItem {
        name: "Cheddar",
        description: Some("Aged 12 months"),
        categories: &["Dairy"],
        price: Some(5.75),
        amount: 10.0,
    },
    SampleItem {
        name: "Apples",
        description: None,
        categories: &["Produce"],
        price: None,
        amount: 40.0,
    },
    SampleItem {
        name: "Orange Juice",
        description: Some("Not from concentrate"),
        categories: &["Beverages", "Produce"],
        price: Some(3.1),
        amount: 12.0,
    },
    SampleItem {
        name: "Paper Bags",
        description: None,
        categories: &[],
        price: None,
        amount: 100.0,
    },
];

pub async fn run(redis_url: &str, reset: bool) -> anyhow::Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let store = RedisStore::connect(redis_url).await?;

    if reset {
        store.clear().await?;
    }

    let (categories, items) = populate(&store).await?;

    println!("Created Categories: {categories}");
    println!("Created Items: {items}");

    Ok(())
}

/// Creates [`CATEGORIES`] then [`ITEMS`], returns how many of each were written.
pub async fn populate(store: &dyn Store) -> Result<(usize, usize), StoreError> {
    let pb = ProgressBar::new((CATEGORIES.len() + ITEMS.len()) as u64);
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );

    let mut ids: HashMap<&str, CategoryId> = HashMap::new();

    for (name, description) in CATEGORIES {
        pb.set_message(format!("Category {name}"));

        let category = store
            .create_category(CategoryDraft {
                name: name.to_string(),
                description: description.map(str::to_string),
            })
            .await?;
        info!("Seeded category {name} as {}", category.id);

        ids.insert(*name, category.id);
        pb.inc(1);
    }

    for sample in ITEMS {
        pb.set_message(format!("Item {}", sample.name));

        let item = store
            .create_item(ItemDraft {
                name: sample.name.to_string(),
                description: sample.description.map(str::to_string),
                category: sample
                    .categories
                    .iter()
                    .filter_map(|name| ids.get(name).copied())
                    .collect(),
                price: sample.price,
                amount: sample.amount,
            })
            .await?;
        info!("Seeded item {} as {}", sample.name, item.id);

        pb.inc(1);
    }

    pb.finish_with_message("Done");
    Ok((CATEGORIES.len(), ITEMS.len()))
}

#[cfg(test)]
mod tests {
    use grocery_server::memory::MemoryStore;

    use super::*;

    #[tokio::test]
    async fn test_populate() {
        let store = MemoryStore::new();

        let (categories, items) = populate(&store).await.unwrap();

        assert_eq!(categories, 4);
        assert_eq!(items, 6);
        assert_eq!(store.count_categories().await.unwrap(), 4);

        let names: Vec<String> = store
            .list_categories()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, ["Bakery", "Beverages", "Dairy", "Produce"]);
    }

    #[tokio::test]
    async fn test_items_reference_seeded_categories() {
        let store = MemoryStore::new();
        populate(&store).await.unwrap();

        let milk_id = store
            .list_item_summaries()
            .await
            .unwrap()
            .into_iter()
            .find(|i| i.name == "Whole Milk")
            .unwrap()
            .id;
        let milk = store.find_item(&milk_id).await.unwrap().unwrap();

        let names: Vec<String> = store
            .find_categories(&milk.category)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, ["Dairy", "Beverages"]);
    }
}
