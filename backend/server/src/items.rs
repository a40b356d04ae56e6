use std::sync::Arc;

use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use tracing::{debug, info};

use crate::{
    error::AppError,
    models::ItemId,
    state::AppState,
    utils::FormFields,
    validation::{Invalid, ItemForm},
    views::{View, mark_checked},
};

const LIST_URL: &str = "/items";

fn item_id(raw: &str) -> Result<ItemId, AppError> {
    raw.parse().map_err(|_| AppError::NotFound("Item"))
}

/// Re-renders a rejected item form with the category list it was built from.
async fn rejected(
    state: &AppState,
    title: &'static str,
    Invalid { form, errors }: Invalid<ItemForm>,
) -> Result<Response, AppError> {
    debug!("Rejected item: {errors:?}");

    let categories = state.store.list_categories().await?;
    let categories = mark_checked(categories, &form.selected());

    Ok(View::ItemEdit {
        title,
        form: Some(form),
        categories,
        errors,
    }
    .into_response())
}

pub async fn item_list(State(state): State<Arc<AppState>>) -> Result<View, AppError> {
    let items = state.store.list_item_summaries().await?;

    Ok(View::ItemList { items })
}

pub async fn item_detail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<View, AppError> {
    let id = item_id(&id)?;

    let item = state
        .store
        .find_item(&id)
        .await?
        .ok_or(AppError::NotFound("Item"))?;
    let categories = state.store.find_categories(&item.category).await?;

    Ok(View::ItemDetail { item, categories })
}

pub async fn item_create_get(State(state): State<Arc<AppState>>) -> Result<View, AppError> {
    let categories = state.store.list_categories().await?;

    Ok(View::ItemEdit {
        title: "Create Item",
        form: None,
        categories: mark_checked(categories, &[]),
        errors: Vec::new(),
    })
}

pub async fn item_create_post(
    State(state): State<Arc<AppState>>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response, AppError> {
    match ItemForm::submit(&pairs.into()) {
        Err(invalid) => rejected(&state, "Create Item", invalid).await,
        Ok(draft) => {
            let item = state.store.create_item(draft).await?;
            info!("Created item {}", item.id);

            Ok(Redirect::to(&item.url()).into_response())
        }
    }
}

pub async fn item_delete_get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let Ok(id) = id.parse::<ItemId>() else {
        return Ok(Redirect::to(LIST_URL).into_response());
    };

    let Some(item) = state.store.find_item(&id).await? else {
        return Ok(Redirect::to(LIST_URL).into_response());
    };
    let categories = state.store.find_categories(&item.category).await?;

    Ok(View::ItemDelete { item, categories }.into_response())
}

/// The id comes from the `itemid` field of the confirmation form, the path is
/// only a fallback for bodies without it.
pub async fn item_delete_post(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Redirect, AppError> {
    let fields = FormFields::from(pairs);
    let raw = fields.value("itemid").unwrap_or(id.as_str());

    if let Ok(id) = raw.parse::<ItemId>() {
        state.store.delete_item(&id).await?;
        info!("Deleted item {id}");
    }

    Ok(Redirect::to(LIST_URL))
}

pub async fn item_update_get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<View, AppError> {
    let id = item_id(&id)?;

    let (item, categories) = tokio::try_join!(
        state.store.find_item(&id),
        state.store.list_categories(),
    )?;
    let item = item.ok_or(AppError::NotFound("Item"))?;

    Ok(View::ItemEdit {
        title: "Update Item",
        categories: mark_checked(categories, &item.category),
        form: Some(ItemForm::from_item(&item)),
        errors: Vec::new(),
    })
}

pub async fn item_update_post(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response, AppError> {
    let id = item_id(&id)?;

    match ItemForm::submit(&pairs.into()) {
        Err(invalid) => rejected(&state, "Update Item", invalid).await,
        Ok(draft) => {
            let item = state
                .store
                .update_item(&id, draft)
                .await?
                .ok_or(AppError::NotFound("Item"))?;
            info!("Updated item {id}");

            Ok(Redirect::to(&item.url()).into_response())
        }
    }
}
