//! Route table. Literal segments such as `create` are registered ahead of the
//! `{id}` routes they would otherwise collide with.
use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    routing::get,
};

use crate::{
    categories::{
        category_create_get, category_create_post, category_delete_get, category_delete_post,
        category_detail, category_list, category_update_get, category_update_post,
    },
    error::AppError,
    items::{
        item_create_get, item_create_post, item_delete_get, item_delete_post, item_detail,
        item_list, item_update_get, item_update_post,
    },
    state::AppState,
    views::View,
};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index_handler))
        // Categories
        .route(
            "/category/create",
            get(category_create_get).post(category_create_post),
        )
        .route(
            "/category/{id}/delete",
            get(category_delete_get).post(category_delete_post),
        )
        .route(
            "/category/{id}/update",
            get(category_update_get).post(category_update_post),
        )
        .route("/category/{id}", get(category_detail))
        .route("/categories", get(category_list))
        // Items
        .route("/item/create", get(item_create_get).post(item_create_post))
        .route(
            "/item/{id}/delete",
            get(item_delete_get).post(item_delete_post),
        )
        .route(
            "/item/{id}/update",
            get(item_update_get).post(item_update_post),
        )
        .route("/item/{id}", get(item_detail))
        .route("/items", get(item_list))
        .fallback(not_found_handler)
        .with_state(state)
}

pub async fn index_handler(State(state): State<Arc<AppState>>) -> Result<View, AppError> {
    let (category_count, item_count) =
        tokio::try_join!(state.store.count_categories(), state.store.count_items())?;

    Ok(View::Index {
        category_count,
        item_count,
    })
}

async fn not_found_handler() -> AppError {
    AppError::NotFound("Page")
}
