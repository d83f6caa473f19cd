//! Reading typed parameters off a request.

use salvo::Request;

use crate::error::{AppError, AppResult};

/// ## Summary
/// Reads a path parameter as a 64-bit id.
///
/// ## Errors
/// Returns `AppError::BadRequest` if the parameter is missing or not an integer.
pub fn path_id(req: &Request, name: &str) -> AppResult<i64> {
    let raw = req
        .param::<String>(name)
        .ok_or_else(|| AppError::BadRequest(format!("missing path parameter '{name}'")))?;

    raw.parse()
        .map_err(|_err| AppError::BadRequest(format!("'{name}' must be an integer, got '{raw}'")))
}

/// ## Summary
/// Reads a required query parameter as a number.
///
/// ## Errors
/// Returns `AppError::BadRequest` if the parameter is missing or not a number.
pub fn query_f64(req: &Request, name: &str) -> AppResult<f64> {
    let raw = req
        .query::<String>(name)
        .ok_or_else(|| AppError::BadRequest(format!("missing query parameter '{name}'")))?;

    raw.trim()
        .parse()
        .map_err(|_err| AppError::BadRequest(format!("'{name}' must be a number, got '{raw}'")))
}
