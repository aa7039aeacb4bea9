//! 产品处理器

use axum::{
    extract::{rejection::FormRejection, Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Form,
};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use super::{model::ProductForm, repository::ProductRepository, view};
use crate::core::error::CoreError;

#[derive(Clone)]
pub struct AppState {
    pub products: Arc<dyn ProductRepository>,
}

impl AppState {
    pub fn new(products: Arc<dyn ProductRepository>) -> Self {
        Self { products }
    }
}

/// 302 重定向
pub fn redirect(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

// 格式错误的 id 与不存在的 id 同样处理
fn parse_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw).ok()
}

fn not_found(raw: &str) -> CoreError {
    warn!("Product not found: {}", raw);
    CoreError::NotFound(format!("No product with id {raw}"))
}

pub async fn index(State(state): State<AppState>) -> Result<Html<String>, CoreError> {
    let products = state.products.find_all().await?;
    Ok(Html(view::index(&products)))
}

pub async fn new_form() -> Html<String> {
    Html(view::new_form())
}

pub async fn create(
    State(state): State<AppState>,
    form: Result<Form<ProductForm>, FormRejection>,
) -> Result<Response, CoreError> {
    let Form(form) = form?;
    let fields = form.into_fields()?;
    let product = state.products.create(fields).await?;

    info!("Created product: {} ({})", product.name, product.id);
    Ok(redirect(&format!("/products/{}", product.id)))
}

pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Html<String>, CoreError> {
    let product = match parse_id(&id) {
        Some(uuid) => state.products.find_by_id(uuid).await?,
        None => None,
    }
    .ok_or_else(|| not_found(&id))?;

    Ok(Html(view::show(&product)))
}

pub async fn edit_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Html<String>, CoreError> {
    let product = match parse_id(&id) {
        Some(uuid) => state.products.find_by_id(uuid).await?,
        None => None,
    }
    .ok_or_else(|| not_found(&id))?;

    Ok(Html(view::edit_form(&product)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    form: Result<Form<ProductForm>, FormRejection>,
) -> Result<Response, CoreError> {
    let uuid = parse_id(&id).ok_or_else(|| not_found(&id))?;
    let Form(form) = form?;
    // 只替换表单里出现的字段
    let patch = form.into_patch()?;
    let product = state
        .products
        .update_by_id(uuid, patch)
        .await?
        .ok_or_else(|| not_found(&id))?;

    info!("Updated product: {} ({})", product.name, product.id);
    Ok(redirect(&format!("/products/{}", product.id)))
}

pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, CoreError> {
    let deleted = match parse_id(&id) {
        Some(uuid) => state.products.delete_by_id(uuid).await?,
        None => false,
    };
    if deleted {
        info!("Deleted product: {}", id);
    } else {
        warn!("Delete of unknown product ignored: {}", id);
    }

    Ok(redirect("/products"))
}

pub async fn home() -> Response {
    redirect("/products")
}

pub async fn fallback() -> CoreError {
    CoreError::NotFound("Page not found".to_string())
}
