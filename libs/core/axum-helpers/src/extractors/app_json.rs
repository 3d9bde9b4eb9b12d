//! JSON body extractor with structured rejection responses.

use crate::errors::AppError;
use axum::{
    extract::{FromRequest, Json, Request},
    response::Response,
};
use serde::de::DeserializeOwned;

/// JSON extractor producing the standard error response on rejection.
///
/// Deserialization only; semantic validation of the payload is the business
/// layer's responsibility. Malformed bodies and wrong content types are
/// reported in the same structured shape as every other API error.
///
/// # Example
/// ```ignore
/// use axum_helpers::extractors::AppJson;
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct CreateUser {
///     name: String,
///     email: String,
/// }
///
/// async fn create_user(AppJson(payload): AppJson<CreateUser>) -> String {
///     format!("Creating user: {}", payload.name)
/// }
/// ```
pub struct AppJson<T>(pub T);

impl<T, S> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        use axum::response::IntoResponse;

        let Json(data) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::JsonExtractorRejection(e).into_response())?;

        Ok(AppJson(data))
    }
}
