//! 核心错误处理模块

use axum::{
    extract::rejection::FormRejection,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use tracing::error;

use crate::app::products::view;

/// 核心错误类型
#[derive(Debug)]
pub enum CoreError {
    NotFound(String),
    Validation(String),
    StoreUnavailable(String),
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CoreError::NotFound(msg) => write!(f, "not found: {}", msg),
            CoreError::Validation(msg) => write!(f, "validation failed: {}", msg),
            CoreError::StoreUnavailable(msg) => write!(f, "store unavailable: {}", msg),
        }
    }
}

impl std::error::Error for CoreError {}

impl CoreError {
    pub fn status(&self) -> StatusCode {
        match self {
            CoreError::NotFound(_) => StatusCode::NOT_FOUND,
            CoreError::Validation(_) => StatusCode::BAD_REQUEST,
            CoreError::StoreUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for CoreError {
    fn into_response(self) -> Response {
        let status = self.status();
        // 存储层的细节只写日志，不回显给客户端
        let user_message = match self {
            CoreError::NotFound(msg) | CoreError::Validation(msg) => msg,
            CoreError::StoreUnavailable(msg) => {
                error!("Store error: {}", msg);
                "The product store is unavailable, please try again later".to_string()
            }
        };

        (status, Html(view::error_page(status, &user_message))).into_response()
    }
}

impl From<sqlx::Error> for CoreError {
    fn from(err: sqlx::Error) -> Self {
        CoreError::StoreUnavailable(err.to_string())
    }
}

// 请求体无法解析时同样返回 HTML 错误页，而不是 axum 的纯文本
impl From<FormRejection> for CoreError {
    fn from(rejection: FormRejection) -> Self {
        CoreError::Validation(rejection.body_text())
    }
}

impl From<validator::ValidationErrors> for CoreError {
    fn from(err: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = err
            .field_errors()
            .into_iter()
            .flat_map(|(_, errors)| {
                errors.iter().map(|error| {
                    error
                        .message
                        .as_ref()
                        .map(|msg| msg.to_string())
                        .unwrap_or_else(|| "Validation error".to_string())
                })
            })
            .collect();
        // field_errors 来自 HashMap，排序后输出才稳定
        messages.sort();

        CoreError::Validation(messages.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            CoreError::NotFound("x".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            CoreError::Validation("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            CoreError::StoreUnavailable("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_store_error_renders_500_page() {
        let response = CoreError::from(sqlx::Error::PoolTimedOut).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
