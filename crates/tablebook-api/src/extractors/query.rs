//! Query string extractor that reports bad parameters as API errors.

use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;

use tablebook_core::error::AppError;

use crate::error::ApiError;

/// Typed query parameters. Unknown or missing required fields and values
/// of the wrong shape become `INVALID_QUERY`.
#[derive(Debug, Clone)]
pub struct ApiQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::validation(e.body_text()).with_code("INVALID_QUERY"))?;
        Ok(ApiQuery(value))
    }
}
