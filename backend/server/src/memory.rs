use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    database::Store,
    error::StoreError,
    models::{
        Category, CategoryDraft, CategoryId, Item, ItemDraft, ItemId, ItemSummary,
        sort_categories, sort_summaries,
    },
};

/// Process-local store. Each instance is isolated, nothing survives a restart.
#[derive(Default)]
pub struct MemoryStore {
    categories: RwLock<HashMap<CategoryId, Category>>,
    items: RwLock<HashMap<ItemId, Item>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn count_categories(&self) -> Result<usize, StoreError> {
        Ok(self.categories.read().await.len())
    }

    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        let mut categories: Vec<Category> = self.categories.read().await.values().cloned().collect();
        sort_categories(&mut categories);

        Ok(categories)
    }

    async fn find_category(&self, id: &CategoryId) -> Result<Option<Category>, StoreError> {
        Ok(self.categories.read().await.get(id).cloned())
    }

    async fn find_categories(&self, ids: &[CategoryId]) -> Result<Vec<Category>, StoreError> {
        let categories = self.categories.read().await;

        Ok(ids.iter().filter_map(|id| categories.get(id).cloned()).collect())
    }

    async fn create_category(&self, draft: CategoryDraft) -> Result<Category, StoreError> {
        let category = draft.into_category(CategoryId::new());
        self.categories
            .write()
            .await
            .insert(category.id, category.clone());

        Ok(category)
    }

    async fn update_category(
        &self,
        id: &CategoryId,
        draft: CategoryDraft,
    ) -> Result<Option<Category>, StoreError> {
        let mut categories = self.categories.write().await;

        Ok(categories.get_mut(id).map(|stored| {
            *stored = draft.into_category(*id);
            stored.clone()
        }))
    }

    async fn delete_category(&self, id: &CategoryId) -> Result<(), StoreError> {
        self.categories.write().await.remove(id);

        Ok(())
    }

    async fn count_items(&self) -> Result<usize, StoreError> {
        Ok(self.items.read().await.len())
    }

    async fn list_item_summaries(&self) -> Result<Vec<ItemSummary>, StoreError> {
        let mut summaries: Vec<ItemSummary> =
            self.items.read().await.values().map(Item::summary).collect();
        sort_summaries(&mut summaries);

        Ok(summaries)
    }

    async fn find_item(&self, id: &ItemId) -> Result<Option<Item>, StoreError> {
        Ok(self.items.read().await.get(id).cloned())
    }

    async fn items_in_category(&self, id: &CategoryId) -> Result<Vec<ItemSummary>, StoreError> {
        let mut summaries: Vec<ItemSummary> = self
            .items
            .read()
            .await
            .values()
            .filter(|item| item.category.contains(id))
            .map(Item::summary)
            .collect();
        sort_summaries(&mut summaries);

        Ok(summaries)
    }

    async fn create_item(&self, draft: ItemDraft) -> Result<Item, StoreError> {
        let item = draft.into_item(ItemId::new());
        self.items.write().await.insert(item.id, item.clone());

        Ok(item)
    }

    async fn update_item(&self, id: &ItemId, draft: ItemDraft) -> Result<Option<Item>, StoreError> {
        let mut items = self.items.write().await;

        Ok(items.get_mut(id).map(|stored| {
            *stored = draft.into_item(*id);
            stored.clone()
        }))
    }

    async fn delete_item(&self, id: &ItemId) -> Result<(), StoreError> {
        self.items.write().await.remove(id);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(name: &str) -> CategoryDraft {
        CategoryDraft {
            name: name.to_string(),
            description: None,
        }
    }

    fn item(name: &str, category: Vec<CategoryId>) -> ItemDraft {
        ItemDraft {
            name: name.to_string(),
            description: None,
            category,
            price: None,
            amount: 1.0,
        }
    }

    #[tokio::test]
    async fn test_categories_sorted_by_name() {
        let store = MemoryStore::new();
        for name in ["Dairy", "Bakery", "Produce"] {
            store.create_category(category(name)).await.unwrap();
        }

        let names: Vec<String> = store
            .list_categories()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();

        assert_eq!(names, ["Bakery", "Dairy", "Produce"]);
    }

    #[tokio::test]
    async fn test_update_keeps_identity() {
        let store = MemoryStore::new();
        let dairy = store.create_category(category("Dairy")).await.unwrap();

        let updated = store
            .update_category(&dairy.id, category("Milk & Cheese"))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.id, dairy.id);
        assert_eq!(store.count_categories().await.unwrap(), 1);
        assert_eq!(
            store.find_category(&dairy.id).await.unwrap().unwrap().name,
            "Milk & Cheese"
        );
    }

    #[tokio::test]
    async fn test_update_missing_creates_nothing() {
        let store = MemoryStore::new();

        let updated = store
            .update_item(&ItemId::new(), item("Milk", Vec::new()))
            .await
            .unwrap();

        assert_eq!(updated, None);
        assert_eq!(store.count_items().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_delete_missing_is_noop() {
        let store = MemoryStore::new();
        store.create_category(category("Dairy")).await.unwrap();
        store.create_item(item("Milk", Vec::new())).await.unwrap();

        store.delete_category(&CategoryId::new()).await.unwrap();
        store.delete_item(&ItemId::new()).await.unwrap();

        assert_eq!(store.count_categories().await.unwrap(), 1);
        assert_eq!(store.count_items().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_weak_references() {
        let store = MemoryStore::new();
        let dairy = store.create_category(category("Dairy")).await.unwrap();
        let bakery = store.create_category(category("Bakery")).await.unwrap();
        let gone = CategoryId::new();

        let milk = store
            .create_item(item("Milk", vec![dairy.id, gone, bakery.id]))
            .await
            .unwrap();
        store.create_item(item("Bread", vec![bakery.id])).await.unwrap();

        let resolved = store.find_categories(&milk.category).await.unwrap();
        assert_eq!(resolved, vec![dairy.clone(), bakery.clone()]);

        let in_bakery: Vec<String> = store
            .items_in_category(&bakery.id)
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.name)
            .collect();
        assert_eq!(in_bakery, ["Bread", "Milk"]);

        store.delete_category(&dairy.id).await.unwrap();
        let stored = store.find_item(&milk.id).await.unwrap().unwrap();
        assert_eq!(stored.category.len(), 3);
    }
}
