//! Email endpoints: consultation confirmations and the cookbook lead magnet

use crate::api::JsonBody;
use crate::core::email::ConsultationNotice;
use crate::core::errors::ServiceError;
use crate::core::traits::{LeadService, NotificationService};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use di_axum::Inject;
use log::{error, info, warn};
use serde_json::{Value, json};

pub fn router() -> Router {
    Router::new()
        .route(
            "/send-consultation-confirmation",
            post(send_consultation_confirmation),
        )
        .route("/send-cookbook", post(send_cookbook))
        .route("/test-email", get(test_email))
}

async fn send_consultation_confirmation(
    Inject(notifications): Inject<dyn NotificationService>,
    JsonBody(notice): JsonBody<ConsultationNotice>,
) -> (StatusCode, Json<Value>) {
    match notifications.send_consultation_confirmation(&notice).await {
        Ok(()) => (StatusCode::OK, Json(json!({ "success": true }))),
        Err(e) => {
            error!("Error sending confirmation email: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to send confirmation email" })),
            )
        }
    }
}

async fn send_cookbook(
    Inject(leads): Inject<dyn LeadService>,
    JsonBody(request): JsonBody<schemas::SendCookbook>,
) -> (StatusCode, Json<Value>) {
    match leads.send_cookbook(request.into()).await {
        Ok(receipt) => {
            info!("cookbook email accepted as {}", receipt.id);
            (
                StatusCode::OK,
                Json(json!({
                    "success": true,
                    "message": "Cookbook sent successfully",
                    "data": receipt,
                })),
            )
        }
        Err(e @ ServiceError::Validation(_)) => {
            warn!("rejected cookbook request: {e}");
            (
                StatusCode::BAD_REQUEST,
                Json(json!({ "success": false, "message": e.to_string() })),
            )
        }
        Err(e) => {
            error!("Error sending cookbook: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "success": false,
                    "message": e.to_string(),
                    "error": e.to_string(),
                })),
            )
        }
    }
}

async fn test_email(
    Inject(notifications): Inject<dyn NotificationService>,
) -> (StatusCode, Json<Value>) {
    match notifications.send_test_email().await {
        Ok(receipt) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": receipt,
                "message": "Test email sent successfully!",
            })),
        ),
        Err(e) => {
            error!("Test email error: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "success": false, "error": e.to_string() })),
            )
        }
    }
}

pub mod schemas {
    use crate::core::traits::CookbookRequest;
    use serde::Deserialize;

    #[derive(Deserialize, Debug, Default)]
    #[serde(rename_all = "camelCase")]
    pub struct SendCookbook {
        pub email: Option<String>,
        pub cookbook_id: Option<String>,
        pub cookbook_title: Option<String>,
    }

    impl From<SendCookbook> for CookbookRequest {
        fn from(request: SendCookbook) -> Self {
            CookbookRequest {
                email: request.email,
                cookbook_id: request.cookbook_id,
                cookbook_title: request.cookbook_title,
            }
        }
    }
}
