use axum::{
    Form, Json,
    extract::{FromRequest, Request, rejection::{FormRejection, JsonRejection}},
    http::header,
};
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::error::ApiError;

/// Request body decoded as JSON when the client says so, otherwise as an
/// urlencoded form (what the landing page submits).
///
/// Decode failures become [`ApiError::Validation`] so they share the JSON
/// error shape of every other failure.
#[derive(Debug, Clone)]
pub struct FormOrJson<T>(pub T);

impl<T, S> FromRequest<S> for FormOrJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    Form<T>: FromRequest<S, Rejection = FormRejection>,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("application/json"));

        if is_json {
            let Json(value) = Json::<T>::from_request(req, state).await.map_err(|e| {
                warn!("Rejected JSON body: {}", e.body_text());
                ApiError::validation(e.body_text())
            })?;
            Ok(Self(value))
        } else {
            let Form(value) = Form::<T>::from_request(req, state).await.map_err(|e| {
                warn!("Rejected form body: {}", e.body_text());
                ApiError::validation(e.body_text())
            })?;
            Ok(Self(value))
        }
    }
}
