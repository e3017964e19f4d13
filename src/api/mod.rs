use crate::api::error::ApiError;
use async_trait::async_trait;
use axum::extract::{FromRequest, Request};
use axum::{Json, Router};
use serde::de::DeserializeOwned;

pub mod admin;
pub mod consultations;
pub mod cookbooks;
pub mod emails;
pub mod error;

/// Every endpoint, to be nested under `/api`.
pub fn router() -> Router {
    Router::new()
        .merge(consultations::router())
        .merge(emails::router())
        .merge(cookbooks::router())
        .merge(admin::router())
}

/// `Json` body whose rejections are rendered as JSON 400s.
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, ApiError> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
        Ok(JsonBody(value))
    }
}
