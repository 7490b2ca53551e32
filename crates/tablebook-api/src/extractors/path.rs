//! Path parameter extractor that reports malformed segments as API errors.

use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;

use tablebook_core::error::AppError;

use crate::error::ApiError;

/// Typed path parameters, e.g. `ApiPath<Uuid>` for `/venues/{id}`.
#[derive(Debug, Clone)]
pub struct ApiPath<T>(pub T);

impl<T, S> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::validation(e.body_text()).with_code("INVALID_PATH"))?;
        Ok(ApiPath(value))
    }
}
