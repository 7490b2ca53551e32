//! JSON body extractor that reports decoding and validation failures as API errors.

use axum::Json;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;
use validator::Validate;

use tablebook_core::error::AppError;

use crate::error::ApiError;

/// A JSON body that has been decoded and passed its `validator` rules.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|e| {
            AppError::validation(e.body_text()).with_code("INVALID_BODY")
        })?;
        value.validate().map_err(|e| {
            AppError::validation(format!("Invalid request: {e}")).with_code("INVALID_BODY")
        })?;
        Ok(ValidatedJson(value))
    }
}
