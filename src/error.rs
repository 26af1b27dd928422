use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use weekplate_recipe::RecipeError;
use weekplate_shopping::ShoppingListError;

use crate::history::HistoryError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] validator::ValidationErrors),

    #[error("Recipe error: {0}")]
    RecipeError(#[from] RecipeError),

    #[error("Grocery list error: {0}")]
    ShoppingListError(#[from] ShoppingListError),

    #[error("History error: {0}")]
    HistoryError(#[from] HistoryError),
}

/// JSON body returned for every failed request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    fn new(error: &str, message: impl Into<String>) -> Self {
        Self {
            error: error.to_string(),
            message: message.into(),
            details: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::ValidationFailed(errors) => {
                let fields: serde_json::Map<String, serde_json::Value> = errors
                    .field_errors()
                    .into_iter()
                    .map(|(field, errs)| {
                        let messages: Vec<String> = errs
                            .iter()
                            .map(|e| {
                                e.message
                                    .as_ref()
                                    .map(|m| m.to_string())
                                    .unwrap_or_else(|| e.code.to_string())
                            })
                            .collect();
                        (field.to_string(), json!(messages))
                    })
                    .collect();
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse {
                        details: Some(serde_json::Value::Object(fields)),
                        ..ErrorResponse::new("ValidationFailed", "Invalid request payload.")
                    },
                )
            }
            AppError::ShoppingListError(ShoppingListError::WrongRecipeCount {
                expected,
                actual,
            }) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    details: Some(json!({ "expected": expected, "actual": actual })),
                    ..ErrorResponse::new(
                        "WrongRecipeCount",
                        format!("Exactly {expected} recipes must be selected, got {actual}"),
                    )
                },
            ),
            AppError::ShoppingListError(ShoppingListError::InvalidRecipe(e))
            | AppError::RecipeError(e @ RecipeError::ValidationError(_)) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new("InvalidRecipe", e.to_string()),
            ),
            AppError::RecipeError(RecipeError::NotFound(id)) => (
                StatusCode::NOT_FOUND,
                ErrorResponse {
                    details: Some(json!({ "recipe_id": id })),
                    ..ErrorResponse::new("RecipeNotFound", format!("Recipe not found: {id}"))
                },
            ),
            AppError::RecipeError(RecipeError::NotEnoughRecipes { required, actual }) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    details: Some(json!({ "required": required, "actual": actual })),
                    ..ErrorResponse::new(
                        "NotEnoughRecipes",
                        format!("At least {required} recipes are needed, got {actual}"),
                    )
                },
            ),
            AppError::RecipeError(e) => {
                tracing::error!("Recipe error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("InternalError", "An unexpected error occurred."),
                )
            }
            AppError::HistoryError(e) => {
                tracing::error!("History write failed: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new(
                        "HistoryError",
                        "The request succeeded but could not be saved to history.",
                    ),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
