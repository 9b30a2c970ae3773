//! Shared validation helpers for inbound HTTP adapters.
//!
//! Domain validation failures and Actix extractor failures all become
//! `400 Bad Request` envelopes carrying the offending field where known.

use actix_web::error::{JsonPayloadError, PathError, QueryPayloadError};
use actix_web::{HttpRequest, web};
use serde_json::json;

use crate::domain::{Error, PostValidationError, UserValidationError};

/// Map a user validation failure to a 400 with field context.
pub(crate) fn user_validation_error(err: UserValidationError) -> Error {
    Error::invalid_request(err.to_string()).with_details(json!({
        "field": err.field(),
        "code": err.code(),
    }))
}

/// Map a post validation failure to a 400 with field context.
pub(crate) fn post_validation_error(err: PostValidationError) -> Error {
    Error::invalid_request(err.to_string()).with_details(json!({
        "field": err.field(),
        "code": err.code(),
    }))
}

fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    Error::invalid_request("Malformed request body")
        .with_details(json!({ "reason": err.to_string() }))
        .into()
}

fn path_error(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    Error::invalid_request("Invalid path parameter")
        .with_details(json!({ "reason": err.to_string() }))
        .into()
}

fn query_error(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    Error::invalid_request("Invalid query parameter")
        .with_details(json!({ "reason": err.to_string() }))
        .into()
}

/// JSON body extractor configuration rendering failures as envelopes.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(json_error)
}

/// Path extractor configuration rendering failures as envelopes.
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(path_error)
}

/// Query extractor configuration rendering failures as envelopes.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(query_error)
}
