//! Product workflows.
//!
//! Every workflow takes the repository it should run against. Handlers pass a
//! [`DieselTransaction`](crate::repository::DieselTransaction) so that all reads
//! and writes of one call share a single transaction.

use crate::domain::product::{Product, ProductListQuery, UpdateProduct};
use crate::forms::products::{ProductForm, validate_code, validate_id, validate_name};
use crate::repository::{ProductReader, ProductWriter};
use crate::services::{ServiceError, ServiceResult};

fn not_found(id: i64) -> ServiceError {
    ServiceError::NotFound(format!("product not found with id {id}"))
}

/// Creates a new product after validating the payload and checking code uniqueness.
///
/// The uniqueness check covers inactive products too. Nothing is written when
/// validation or the check fails.
pub fn create_product<R>(repo: &R, form: Option<ProductForm>) -> ServiceResult<Product>
where
    R: ProductReader + ProductWriter + ?Sized,
{
    let form = form.ok_or_else(|| ServiceError::InvalidInput("product must not be null".into()))?;
    log::info!("Creating product with code {:?}", form.code);

    log::debug!("Validating product for creation");
    let new_product = form.into_new_product()?;

    if repo.product_code_exists(&new_product.code)? {
        return Err(ServiceError::Conflict(format!(
            "duplicate code: a product with code {} already exists",
            new_product.code
        )));
    }

    let created = repo.create_product(&new_product)?;
    log::info!("Created product {}", created.id);

    Ok(created)
}

/// Returns every product whose `active` flag is set.
pub fn list_active_products<R>(repo: &R) -> ServiceResult<Vec<Product>>
where
    R: ProductReader + ?Sized,
{
    log::info!("Listing active products");
    Ok(repo.list_products(ProductListQuery::active())?)
}

/// Returns every stored product, active or not.
pub fn list_all_products<R>(repo: &R) -> ServiceResult<Vec<Product>>
where
    R: ProductReader + ?Sized,
{
    log::info!("Listing all products including inactive ones");
    Ok(repo.list_products(ProductListQuery::all())?)
}

/// Looks a product up by id. A miss is `Ok(None)`.
pub fn get_product_by_id<R>(repo: &R, id: i64) -> ServiceResult<Option<Product>>
where
    R: ProductReader + ?Sized,
{
    log::info!("Looking up product {id}");
    validate_id(id)?;
    Ok(repo.get_product_by_id(id)?)
}

/// Looks a product up by its code. A miss is `Ok(None)`.
pub fn get_product_by_code<R>(repo: &R, code: &str) -> ServiceResult<Option<Product>>
where
    R: ProductReader + ?Sized,
{
    log::info!("Looking up product with code {code}");
    validate_code(code)?;
    Ok(repo.get_product_by_code(code)?)
}

/// Case-insensitive name search across all products.
///
/// The fragment must itself satisfy the product name rules.
pub fn search_products_by_name<R>(repo: &R, fragment: &str) -> ServiceResult<Vec<Product>>
where
    R: ProductReader + ?Sized,
{
    log::info!("Searching products by name {fragment:?}");
    validate_name(fragment)?;
    Ok(repo.list_products(ProductListQuery::all().name_contains(fragment))?)
}

/// Replaces every mutable column of product `id` with the payload.
///
/// Field validation and the code uniqueness check are not applied here; a
/// duplicate code is only caught by the store's unique index.
pub fn update_product<R>(repo: &R, id: i64, form: ProductForm) -> ServiceResult<Product>
where
    R: ProductReader + ProductWriter + ?Sized,
{
    log::info!("Updating product {id}");
    validate_id(id)?;

    let existing = repo.get_product_by_id(id)?.ok_or_else(|| not_found(id))?;
    let updates = form.into_update_product(&existing)?;

    let updated = repo.update_product(id, &updates)?;
    log::info!("Updated product {id}");

    Ok(updated)
}

/// Marks product `id` inactive. The row stays readable by id and code.
pub fn soft_delete_product<R>(repo: &R, id: i64) -> ServiceResult<()>
where
    R: ProductReader + ProductWriter + ?Sized,
{
    log::info!("Deactivating product {id}");
    validate_id(id)?;

    let existing = repo.get_product_by_id(id)?.ok_or_else(|| not_found(id))?;
    let updates = UpdateProduct::from_existing(&existing).active(false);

    repo.update_product(id, &updates)?;
    log::info!("Deactivated product {id}");

    Ok(())
}

/// Removes product `id` from the store permanently.
pub fn hard_delete_product<R>(repo: &R, id: i64) -> ServiceResult<()>
where
    R: ProductReader + ProductWriter + ?Sized,
{
    log::info!("Permanently deleting product {id}");
    validate_id(id)?;

    if !repo.product_exists(id)? {
        return Err(not_found(id));
    }

    repo.delete_product(id)?;
    log::info!("Permanently deleted product {id}");

    Ok(())
}

/// Reports whether any product, active or not, uses `code`.
pub fn product_exists_by_code<R>(repo: &R, code: &str) -> ServiceResult<bool>
where
    R: ProductReader + ?Sized,
{
    log::info!("Checking whether code {code} is taken");
    validate_code(code)?;
    Ok(repo.product_code_exists(code)?)
}
