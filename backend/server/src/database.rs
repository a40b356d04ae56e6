//! # Storage
//!
//! Document storage behind the [`Store`] trait. Handlers receive the store
//! through [`crate::state::AppState`], so every test can run against its own
//! [`crate::memory::MemoryStore`].
//!
//! ## Redis layout
//!
//! - Redis hash `categories`: category id -> JSON document
//! - Redis hash `items`: item id -> JSON document
//! - One document per field. Creates and deletes are single commands, updates
//!   run as a Lua script so the existence check and the write are one step
//! - No multi-document transactions, a delete never cascades
//! - Sorting and projection happen after `HGETALL`, the collections are small
use std::time::Duration;

use async_trait::async_trait;
use redis::{
    AsyncCommands, Client, Script,
    aio::{ConnectionManager, ConnectionManagerConfig},
};
use serde::{Serialize, de::DeserializeOwned};
use tracing::info;

use crate::{
    error::StoreError,
    models::{
        Category, CategoryDraft, CategoryId, Item, ItemDraft, ItemId, ItemSummary,
        sort_categories, sort_summaries,
    },
};

pub const CATEGORIES: &str = "categories";
pub const ITEMS: &str = "items";

/// Existence check and write run as one server-side step, a concurrent `HDEL`
/// cannot land between them.
const REPLACE_SCRIPT: &str = r"
if redis.call('HEXISTS', KEYS[1], ARGV[1]) == 1 then
    redis.call('HSET', KEYS[1], ARGV[1], ARGV[2])
    return 1
end
return 0
";

#[async_trait]
pub trait Store: Send + Sync {
    async fn count_categories(&self) -> Result<usize, StoreError>;

    /// All categories, ascending by name.
    async fn list_categories(&self) -> Result<Vec<Category>, StoreError>;

    async fn find_category(&self, id: &CategoryId) -> Result<Option<Category>, StoreError>;

    /// Resolves weak references. Ids with no document are skipped and the
    /// order of `ids` is kept.
    async fn find_categories(&self, ids: &[CategoryId]) -> Result<Vec<Category>, StoreError>;

    async fn create_category(&self, draft: CategoryDraft) -> Result<Category, StoreError>;

    /// Returns `None` when there is nothing stored under `id`.
    async fn update_category(
        &self,
        id: &CategoryId,
        draft: CategoryDraft,
    ) -> Result<Option<Category>, StoreError>;

    /// Deleting a missing id is a no-op.
    async fn delete_category(&self, id: &CategoryId) -> Result<(), StoreError>;

    async fn count_items(&self) -> Result<usize, StoreError>;

    /// `name` and `amount` of every item, ascending by name.
    async fn list_item_summaries(&self) -> Result<Vec<ItemSummary>, StoreError>;

    async fn find_item(&self, id: &ItemId) -> Result<Option<Item>, StoreError>;

    /// Items referencing `id`, ascending by name.
    async fn items_in_category(&self, id: &CategoryId) -> Result<Vec<ItemSummary>, StoreError>;

    async fn create_item(&self, draft: ItemDraft) -> Result<Item, StoreError>;

    async fn update_item(&self, id: &ItemId, draft: ItemDraft) -> Result<Option<Item>, StoreError>;

    async fn delete_item(&self, id: &ItemId) -> Result<(), StoreError>;
}

#[derive(Clone)]
pub struct RedisStore {
    connection: ConnectionManager,
}

impl RedisStore {
    pub async fn connect(redis_url: &str) -> Result<Self, StoreError> {
        Ok(Self {
            connection: init_redis(redis_url).await?,
        })
    }

    /// Drops both collections.
    pub async fn clear(&self) -> Result<(), StoreError> {
        let mut connection = self.connection.clone();
        let _: () = connection.del(vec![CATEGORIES, ITEMS]).await?;

        info!("Cleared {CATEGORIES} and {ITEMS}");
        Ok(())
    }

    async fn get_all<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>, StoreError> {
        let mut connection = self.connection.clone();
        let documents: Vec<(String, String)> = connection.hgetall(key).await?;

        documents
            .into_iter()
            .map(|(_, json)| serde_json::from_str(&json).map_err(StoreError::from))
            .collect()
    }

    async fn get_one<T: DeserializeOwned>(
        &self,
        key: &str,
        id: String,
    ) -> Result<Option<T>, StoreError> {
        let mut connection = self.connection.clone();
        let document: Option<String> = connection.hget(key, id).await?;

        document
            .map(|json| serde_json::from_str(&json))
            .transpose()
            .map_err(StoreError::from)
    }

    async fn put<T: Serialize>(&self, key: &str, id: String, document: &T) -> Result<(), StoreError> {
        let json = serde_json::to_string(document)?;

        let mut connection = self.connection.clone();
        let _: () = connection.hset(key, id, json).await?;

        Ok(())
    }

    /// Writes only when `id` already exists, so an update never creates a document.
    async fn replace<T: Serialize>(
        &self,
        key: &str,
        id: String,
        document: &T,
    ) -> Result<bool, StoreError> {
        let json = serde_json::to_string(document)?;

        let mut connection = self.connection.clone();
        let replaced: i64 = Script::new(REPLACE_SCRIPT)
            .key(key)
            .arg(id)
            .arg(json)
            .invoke_async(&mut connection)
            .await?;

        Ok(replaced == 1)
    }

    async fn remove(&self, key: &str, id: String) -> Result<(), StoreError> {
        let mut connection = self.connection.clone();
        let _: usize = connection.hdel(key, id).await?;

        Ok(())
    }

    async fn count(&self, key: &str) -> Result<usize, StoreError> {
        let mut connection = self.connection.clone();

        Ok(connection.hlen(key).await?)
    }
}

#[async_trait]
impl Store for RedisStore {
    async fn count_categories(&self) -> Result<usize, StoreError> {
        self.count(CATEGORIES).await
    }

    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        let mut categories: Vec<Category> = self.get_all(CATEGORIES).await?;
        sort_categories(&mut categories);

        Ok(categories)
    }

    async fn find_category(&self, id: &CategoryId) -> Result<Option<Category>, StoreError> {
        self.get_one(CATEGORIES, id.to_string()).await
    }

    async fn find_categories(&self, ids: &[CategoryId]) -> Result<Vec<Category>, StoreError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let fields: Vec<String> = ids.iter().map(ToString::to_string).collect();

        let mut connection = self.connection.clone();
        let documents: Vec<Option<String>> = redis::cmd("HMGET")
            .arg(CATEGORIES)
            .arg(&fields)
            .query_async(&mut connection)
            .await?;

        documents
            .into_iter()
            .flatten()
            .map(|json| serde_json::from_str(&json).map_err(StoreError::from))
            .collect()
    }

    async fn create_category(&self, draft: CategoryDraft) -> Result<Category, StoreError> {
        let category = draft.into_category(CategoryId::new());
        self.put(CATEGORIES, category.id.to_string(), &category)
            .await?;

        Ok(category)
    }

    async fn update_category(
        &self,
        id: &CategoryId,
        draft: CategoryDraft,
    ) -> Result<Option<Category>, StoreError> {
        let category = draft.into_category(*id);
        let updated = self
            .replace(CATEGORIES, id.to_string(), &category)
            .await?;

        Ok(updated.then_some(category))
    }

    async fn delete_category(&self, id: &CategoryId) -> Result<(), StoreError> {
        self.remove(CATEGORIES, id.to_string()).await
    }

    async fn count_items(&self) -> Result<usize, StoreError> {
        self.count(ITEMS).await
    }

    async fn list_item_summaries(&self) -> Result<Vec<ItemSummary>, StoreError> {
        let items: Vec<Item> = self.get_all(ITEMS).await?;

        let mut summaries: Vec<ItemSummary> = items.iter().map(Item::summary).collect();
        sort_summaries(&mut summaries);

        Ok(summaries)
    }

    async fn find_item(&self, id: &ItemId) -> Result<Option<Item>, StoreError> {
        self.get_one(ITEMS, id.to_string()).await
    }

    async fn items_in_category(&self, id: &CategoryId) -> Result<Vec<ItemSummary>, StoreError> {
        let items: Vec<Item> = self.get_all(ITEMS).await?;

        let mut summaries: Vec<ItemSummary> = items
            .iter()
            .filter(|item| item.category.contains(id))
            .map(Item::summary)
            .collect();
        sort_summaries(&mut summaries);

        Ok(summaries)
    }

    async fn create_item(&self, draft: ItemDraft) -> Result<Item, StoreError> {
        let item = draft.into_item(ItemId::new());
        self.put(ITEMS, item.id.to_string(), &item).await?;

        Ok(item)
    }

    async fn update_item(&self, id: &ItemId, draft: ItemDraft) -> Result<Option<Item>, StoreError> {
        let item = draft.into_item(*id);
        let updated = self.replace(ITEMS, id.to_string(), &item).await?;

        Ok(updated.then_some(item))
    }

    async fn delete_item(&self, id: &ItemId) -> Result<(), StoreError> {
        self.remove(ITEMS, id.to_string()).await
    }
}

pub async fn init_redis(redis_url: &str) -> Result<ConnectionManager, StoreError> {
    let config = ConnectionManagerConfig::new()
        .set_number_of_retries(1)
        .set_connection_timeout(Some(Duration::from_millis(100)));

    let client = Client::open(redis_url)?;
    let connection_manager = client.get_connection_manager_with_config(config).await?;

    info!("Connected to Redis at {redis_url}");
    Ok(connection_manager)
}
