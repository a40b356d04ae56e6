use std::sync::Arc;

use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use tracing::{debug, info};

use crate::{
    error::AppError,
    models::CategoryId,
    state::AppState,
    utils::FormFields,
    validation::{CategoryForm, Invalid},
    views::View,
};

const LIST_URL: &str = "/categories";

fn category_id(raw: &str) -> Result<CategoryId, AppError> {
    raw.parse().map_err(|_| AppError::NotFound("Category"))
}

pub async fn category_list(State(state): State<Arc<AppState>>) -> Result<View, AppError> {
    let categories = state.store.list_categories().await?;

    Ok(View::CategoryList { categories })
}

pub async fn category_detail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<View, AppError> {
    let id = category_id(&id)?;

    let (category, items) = tokio::try_join!(
        state.store.find_category(&id),
        state.store.items_in_category(&id),
    )?;
    let category = category.ok_or(AppError::NotFound("Category"))?;

    Ok(View::CategoryDetail { category, items })
}

pub async fn category_create_get() -> View {
    View::CategoryEdit {
        title: "Create Category",
        form: None,
        errors: Vec::new(),
    }
}

pub async fn category_create_post(
    State(state): State<Arc<AppState>>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response, AppError> {
    match CategoryForm::submit(&pairs.into()) {
        Err(Invalid { form, errors }) => {
            debug!("Rejected category: {errors:?}");

            Ok(View::CategoryEdit {
                title: "Create Category",
                form: Some(form),
                errors,
            }
            .into_response())
        }
        Ok(draft) => {
            let category = state.store.create_category(draft).await?;
            info!("Created category {}", category.id);

            Ok(Redirect::to(&category.url()).into_response())
        }
    }
}

pub async fn category_delete_get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let Ok(id) = id.parse::<CategoryId>() else {
        return Ok(Redirect::to(LIST_URL).into_response());
    };

    let (category, items) = tokio::try_join!(
        state.store.find_category(&id),
        state.store.items_in_category(&id),
    )?;

    Ok(match category {
        Some(category) => View::CategoryDelete { category, items }.into_response(),
        None => Redirect::to(LIST_URL).into_response(),
    })
}

/// The id comes from the `categoryid` field of the confirmation form, the path
/// is only a fallback for bodies without it.
pub async fn category_delete_post(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Redirect, AppError> {
    let fields = FormFields::from(pairs);
    let raw = fields.value("categoryid").unwrap_or(id.as_str());

    if let Ok(id) = raw.parse::<CategoryId>() {
        state.store.delete_category(&id).await?;
        info!("Deleted category {id}");
    }

    Ok(Redirect::to(LIST_URL))
}

pub async fn category_update_get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<View, AppError> {
    let id = category_id(&id)?;

    let category = state
        .store
        .find_category(&id)
        .await?
        .ok_or(AppError::NotFound("Category"))?;

    Ok(View::CategoryEdit {
        title: "Update Category",
        form: Some(CategoryForm::from_category(&category)),
        errors: Vec::new(),
    })
}

pub async fn category_update_post(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response, AppError> {
    let id = category_id(&id)?;

    match CategoryForm::submit(&pairs.into()) {
        Err(Invalid { form, errors }) => {
            debug!("Rejected update of category {id}: {errors:?}");

            Ok(View::CategoryEdit {
                title: "Update Category",
                form: Some(form),
                errors,
            }
            .into_response())
        }
        Ok(draft) => {
            let category = state
                .store
                .update_category(&id, draft)
                .await?
                .ok_or(AppError::NotFound("Category"))?;
            info!("Updated category {id}");

            Ok(Redirect::to(&category.url()).into_response())
        }
    }
}
