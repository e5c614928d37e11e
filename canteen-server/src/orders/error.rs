//! Order lifecycle errors

use crate::db::models::OrderStatus;
use crate::db::repository::RepoError;
use crate::utils::AppError;
use thiserror::Error;

/// Errors produced by the order lifecycle operations.
///
/// All variants except `Storage` are client-input/state errors; `Storage`
/// wraps unexpected persistence failures and is the only retryable kind.
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Order must contain items")]
    EmptyOrder,

    #[error("Item '{0}' is not available")]
    ItemUnavailable(String),

    #[error("Order {0} not found")]
    OrderNotFound(String),

    #[error("Cannot change order status from '{from}' to '{to}'")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    #[error("Not authorized to modify this order")]
    Forbidden,

    #[error("Invalid order: {0}")]
    InvalidOrder(String),

    #[error("Storage error: {0}")]
    Storage(RepoError),
}

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        match &err {
            OrderError::EmptyOrder => AppError::validation(err.to_string()),
            OrderError::ItemUnavailable(_) => AppError::business_rule(err.to_string()),
            OrderError::OrderNotFound(_) => AppError::not_found(err.to_string()),
            OrderError::InvalidTransition { .. } => AppError::business_rule(err.to_string()),
            OrderError::Forbidden => AppError::forbidden(err.to_string()),
            OrderError::InvalidOrder(_) => AppError::validation(err.to_string()),
            OrderError::Storage(e) => AppError::database(e.to_string()),
        }
    }
}
