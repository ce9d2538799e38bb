use actix_cors::Cors;
use actix_web::error::{InternalError, JsonPayloadError, PathError, QueryPayloadError};
use actix_web::{HttpRequest, HttpResponse, web};
use serde::Serialize;

use crate::services::ServiceError;

pub mod products;

const STATUS_SUCCESS: &str = "success";
const STATUS_ERROR: &str = "error";

pub const TITLE_VALIDATION: &str = "Validation error";
pub const TITLE_NOT_FOUND: &str = "Not found";
pub const TITLE_INTERNAL: &str = "Internal server error";

/// Envelope wrapping every successful response body.
#[derive(Debug, Serialize)]
pub struct SuccessResponse<T: Serialize> {
    pub message: String,
    pub data: T,
    pub status: &'static str,
}

/// Envelope wrapping every failed response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub title: String,
    pub message: String,
    pub status: &'static str,
}

pub fn success<T: Serialize>(message: impl Into<String>, data: T) -> SuccessResponse<T> {
    SuccessResponse {
        message: message.into(),
        data,
        status: STATUS_SUCCESS,
    }
}

pub fn failure(title: impl Into<String>, message: impl Into<String>) -> ErrorResponse {
    ErrorResponse {
        title: title.into(),
        message: message.into(),
        status: STATUS_ERROR,
    }
}

/// Maps a workflow error onto the HTTP response the API contract prescribes.
///
/// Not-found failures raised by update and delete workflows answer 400, same
/// as invalid input. Only the read endpoints turn a miss into 404 themselves.
pub fn service_error_response(err: &ServiceError) -> HttpResponse {
    match err {
        ServiceError::InvalidInput(message)
        | ServiceError::NotFound(message)
        | ServiceError::Conflict(message) => {
            HttpResponse::BadRequest().json(failure(TITLE_VALIDATION, message))
        }
        ServiceError::Internal(message) => {
            HttpResponse::InternalServerError().json(failure(TITLE_INTERNAL, message))
        }
    }
}

fn bad_request<E>(err: E, _req: &HttpRequest) -> actix_web::Error
where
    E: std::fmt::Debug + std::fmt::Display + 'static,
{
    log::error!("Rejected malformed request: {err}");
    let response = HttpResponse::BadRequest().json(failure(TITLE_VALIDATION, err.to_string()));
    InternalError::from_response(err, response).into()
}

/// Seconds a browser may cache a preflight response.
pub const CORS_MAX_AGE: usize = 3600;

/// Cross-origin policy of the product API: any origin, method and header.
pub fn cors() -> Cors {
    Cors::permissive().max_age(CORS_MAX_AGE)
}

/// Registers the product API and the extractor error handlers.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(bad_request::<JsonPayloadError>))
        .app_data(web::PathConfig::default().error_handler(bad_request::<PathError>))
        .app_data(web::QueryConfig::default().error_handler(bad_request::<QueryPayloadError>))
        .service(
            web::scope("/api/productos")
                .wrap(cors())
                // Literal segments must be registered ahead of `/{id}`.
                .service(products::list_all_products)
                .service(products::search_products)
                .service(products::get_product_by_code)
                .service(products::product_exists)
                .service(products::create_product)
                .service(products::list_active_products)
                .service(products::get_product)
                .service(products::update_product)
                .service(products::soft_delete_product)
                .service(products::hard_delete_product),
        );
}
