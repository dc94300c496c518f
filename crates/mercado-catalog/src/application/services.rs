//! Catalog services.

use uuid::Uuid;

use mercado_core::error::DomainError;

use crate::domain::models::{CreateProduct, Product};
use crate::domain::repository::ProductRepository;

/// Creates a product after validating the input.
///
/// # Errors
///
/// `Validation` on bad input; `Infrastructure` on storage failure.
pub async fn create_product(
    input: CreateProduct,
    repo: &dyn ProductRepository,
) -> Result<Product, DomainError> {
    if input.name.trim().len() < 2 {
        return Err(DomainError::Validation("product name is too short".into()));
    }
    if input.description.trim().len() < 10 {
        return Err(DomainError::Validation(
            "product description is too short".into(),
        ));
    }
    if input.price <= 0.0 {
        return Err(DomainError::Validation("price must be positive".into()));
    }
    if input.stock < 0 {
        return Err(DomainError::Validation("stock cannot be negative".into()));
    }

    let product = repo.create(&input).await?;
    tracing::info!(product_id = %product.id, "product created");
    Ok(product)
}

/// Lists the whole catalog.
///
/// # Errors
///
/// `DomainError::Infrastructure` on storage failure.
pub async fn list_products(repo: &dyn ProductRepository) -> Result<Vec<Product>, DomainError> {
    repo.find_all().await
}

/// Looks a product up by id.
///
/// # Errors
///
/// `DomainError::Infrastructure` on storage failure.
pub async fn get_product(
    id: Uuid,
    repo: &dyn ProductRepository,
) -> Result<Option<Product>, DomainError> {
    repo.find_by_id(id).await
}

/// Removes sold units from stock.
///
/// # Errors
///
/// `DomainError::Infrastructure` on storage failure.
pub async fn update_stock(
    id: Uuid,
    quantity: i32,
    repo: &dyn ProductRepository,
) -> Result<bool, DomainError> {
    repo.decrement_stock(id, quantity).await
}
