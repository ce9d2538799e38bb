use actix_web::{HttpResponse, Responder, delete, get, post, put, web};
use serde::{Deserialize, Serialize};

use crate::forms::products::ProductForm;
use crate::repository::DieselRepository;
use crate::routes::{TITLE_NOT_FOUND, failure, service_error_response, success};
use crate::services::products;

/// Query string of the name search endpoint.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub nombre: String,
}

/// Body returned by the code existence check.
#[derive(Debug, Serialize, Deserialize)]
pub struct ExistsResponse {
    pub exists: bool,
    pub code: String,
}

#[post("")]
pub async fn create_product(
    repo: web::Data<DieselRepository>,
    body: web::Json<Option<ProductForm>>,
) -> impl Responder {
    log::info!("Received request to create a product");
    match repo.transaction(|tx| products::create_product(tx, body.into_inner())) {
        Ok(product) => {
            HttpResponse::Created().json(success("Product created successfully", product))
        }
        Err(err) => {
            log::error!("Failed to create product: {err}");
            service_error_response(&err)
        }
    }
}

#[get("")]
pub async fn list_active_products(repo: web::Data<DieselRepository>) -> impl Responder {
    match repo.transaction(|tx| products::list_active_products(tx)) {
        Ok(items) => HttpResponse::Ok().json(success("Products retrieved successfully", items)),
        Err(err) => {
            log::error!("Failed to list active products: {err}");
            service_error_response(&err)
        }
    }
}

#[get("/todos")]
pub async fn list_all_products(repo: web::Data<DieselRepository>) -> impl Responder {
    match repo.transaction(|tx| products::list_all_products(tx)) {
        Ok(items) => HttpResponse::Ok().json(success("Products retrieved successfully", items)),
        Err(err) => {
            log::error!("Failed to list products: {err}");
            service_error_response(&err)
        }
    }
}

#[get("/{id}")]
pub async fn get_product(
    path: web::Path<i64>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let id = path.into_inner();
    match repo.transaction(|tx| products::get_product_by_id(tx, id)) {
        Ok(Some(product)) => {
            HttpResponse::Ok().json(success("Product retrieved successfully", product))
        }
        Ok(None) => HttpResponse::NotFound().json(failure(
            TITLE_NOT_FOUND,
            format!("product not found with id {id}"),
        )),
        Err(err) => {
            log::error!("Failed to get product {id}: {err}");
            service_error_response(&err)
        }
    }
}

#[get("/codigo/{code}")]
pub async fn get_product_by_code(
    path: web::Path<String>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let code = path.into_inner();
    match repo.transaction(|tx| products::get_product_by_code(tx, &code)) {
        Ok(Some(product)) => {
            HttpResponse::Ok().json(success("Product retrieved successfully", product))
        }
        Ok(None) => HttpResponse::NotFound().json(failure(
            TITLE_NOT_FOUND,
            format!("product not found with code {code}"),
        )),
        Err(err) => {
            log::error!("Failed to get product with code {code}: {err}");
            service_error_response(&err)
        }
    }
}

#[get("/buscar")]
pub async fn search_products(
    params: web::Query<SearchQuery>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let SearchQuery { nombre } = params.into_inner();
    match repo.transaction(|tx| products::search_products_by_name(tx, &nombre)) {
        Ok(items) => HttpResponse::Ok().json(success("Search completed successfully", items)),
        Err(err) => {
            log::error!("Failed to search products by name {nombre:?}: {err}");
            service_error_response(&err)
        }
    }
}

#[put("/{id}")]
pub async fn update_product(
    path: web::Path<i64>,
    repo: web::Data<DieselRepository>,
    body: web::Json<ProductForm>,
) -> impl Responder {
    let id = path.into_inner();
    match repo.transaction(|tx| products::update_product(tx, id, body.into_inner())) {
        Ok(product) => HttpResponse::Ok().json(success("Product updated successfully", product)),
        Err(err) => {
            log::error!("Failed to update product {id}: {err}");
            service_error_response(&err)
        }
    }
}

#[delete("/{id}")]
pub async fn soft_delete_product(
    path: web::Path<i64>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let id = path.into_inner();
    match repo.transaction(|tx| products::soft_delete_product(tx, id)) {
        Ok(()) => HttpResponse::Ok().json(success("Product deleted successfully", ())),
        Err(err) => {
            log::error!("Failed to deactivate product {id}: {err}");
            service_error_response(&err)
        }
    }
}

#[delete("/{id}/permanente")]
pub async fn hard_delete_product(
    path: web::Path<i64>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let id = path.into_inner();
    match repo.transaction(|tx| products::hard_delete_product(tx, id)) {
        Ok(()) => HttpResponse::Ok().json(success("Product permanently deleted", ())),
        Err(err) => {
            log::error!("Failed to permanently delete product {id}: {err}");
            service_error_response(&err)
        }
    }
}

#[get("/existe/{code}")]
pub async fn product_exists(
    path: web::Path<String>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let code = path.into_inner();
    match repo.transaction(|tx| products::product_exists_by_code(tx, &code)) {
        Ok(exists) => HttpResponse::Ok().json(ExistsResponse { exists, code }),
        Err(err) => {
            log::error!("Failed to check code {code}: {err}");
            service_error_response(&err)
        }
    }
}
