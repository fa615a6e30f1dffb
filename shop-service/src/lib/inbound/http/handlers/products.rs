use axum::extract::Path;
use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::MessageData;
use crate::domain::identity::Identity;
use crate::domain::product::models::CreateProductCommand;
use crate::domain::product::models::Description;
use crate::domain::product::models::Price;
use crate::domain::product::models::Product;
use crate::domain::product::models::ProductId;
use crate::domain::product::models::ProductQuery;
use crate::domain::product::models::ProductTitle;
use crate::domain::product::models::UpdateProductCommand;
use crate::inbound::http::router::AppState;
use crate::product::errors::ProductError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductResponseData {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub price: f64,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Product> for ProductResponseData {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            title: product.title.as_str().to_string(),
            description: product
                .description
                .as_ref()
                .map(|d| d.as_str().to_string()),
            price: product.price.value(),
            created_by: product.created_by.to_string(),
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListProductsParams {
    title: Option<String>,
    #[serde(rename = "minPrice")]
    min_price: Option<f64>,
    #[serde(rename = "maxPrice")]
    max_price: Option<f64>,
}

pub async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<ListProductsParams>,
) -> Result<ApiSuccess<Vec<ProductResponseData>>, ApiError> {
    let query = ProductQuery {
        title: params.title,
        min_price: params.min_price,
        max_price: params.max_price,
    };

    let products = state.product_service.list_products(&query).await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        products.iter().map(ProductResponseData::from).collect(),
    ))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> Result<ApiSuccess<ProductResponseData>, ApiError> {
    let product_id = ProductId::from_string(&product_id).map_err(ProductError::from)?;

    state
        .product_service
        .get_product(&product_id)
        .await
        .map_err(ApiError::from)
        .map(|ref product| ApiSuccess::new(StatusCode::OK, product.into()))
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CreateProductRequest {
    title: String,
    description: Option<String>,
    price: f64,
}

impl CreateProductRequest {
    fn try_into_command(self) -> Result<CreateProductCommand, ProductError> {
        Ok(CreateProductCommand {
            title: ProductTitle::new(self.title)?,
            description: self.description.map(Description::new).transpose()?,
            price: Price::new(self.price)?,
        })
    }
}

pub async fn create_product(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(body): Json<CreateProductRequest>,
) -> Result<ApiSuccess<ProductResponseData>, ApiError> {
    state
        .product_service
        .create_product(body.try_into_command()?, &identity.user_id)
        .await
        .map_err(ApiError::from)
        .map(|ref product| ApiSuccess::new(StatusCode::CREATED, product.into()))
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UpdateProductRequest {
    title: Option<String>,
    description: Option<String>,
    price: Option<f64>,
}

impl UpdateProductRequest {
    fn try_into_command(self) -> Result<UpdateProductCommand, ProductError> {
        Ok(UpdateProductCommand {
            title: self.title.map(ProductTitle::new).transpose()?,
            description: self.description.map(Description::new).transpose()?,
            price: self.price.map(Price::new).transpose()?,
        })
    }
}

pub async fn update_product(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    Json(body): Json<UpdateProductRequest>,
) -> Result<ApiSuccess<ProductResponseData>, ApiError> {
    let product_id = ProductId::from_string(&product_id).map_err(ProductError::from)?;

    state
        .product_service
        .update_product(&product_id, body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref product| ApiSuccess::new(StatusCode::OK, product.into()))
}

pub async fn delete_product(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> Result<ApiSuccess<MessageData>, ApiError> {
    let product_id = ProductId::from_string(&product_id).map_err(ProductError::from)?;

    state.product_service.delete_product(&product_id).await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        MessageData::new("Product has been deleted"),
    ))
}
