//! Role guard for the administrative routes.

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;

use crate::error::ApiError;
use crate::extractors::AuthUser;

/// Rejects the request unless the caller is an authenticated admin.
///
/// Missing or invalid tokens yield 401; authenticated non-admins 403.
pub async fn require_admin(
    auth: AuthUser,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    auth.require_admin()?;
    Ok(next.run(request).await)
}
