//! 路由装配

use axum::{
    middleware,
    routing::get,
    Router,
};
use std::time::Duration;
use tower::Layer;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use super::products::handler::{self, AppState};
use crate::core::middleware::{method_override_middleware, request_logging_middleware};

/// 构建完整的应用路由
///
/// 方法覆盖中间件包在已经完成路由的 `Router` 外面，
/// 这样改写后的方法才能参与路由匹配。
pub fn build_router(state: AppState, request_timeout: Duration) -> Router {
    let routes = Router::new()
        .route("/", get(handler::home))
        .route("/products", get(handler::index).post(handler::create))
        .route("/products/new", get(handler::new_form))
        .route(
            "/products/:id",
            get(handler::show)
                .put(handler::update)
                .patch(handler::update)
                .delete(handler::destroy),
        )
        .route("/products/:id/edit", get(handler::edit_form))
        .fallback(handler::fallback)
        .layer(middleware::from_fn(request_logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(request_timeout))
        .with_state(state);

    let with_override = middleware::from_fn(method_override_middleware).layer(routes);
    Router::new().fallback_service(with_override)
}
