//! 核心中间件模块

use axum::{
    extract::Request,
    http::{HeaderMap, Method},
    middleware::Next,
    response::Response,
};
use serde::Serialize;
use std::time::Instant;
use tracing::{debug, info};

/// 方法覆盖使用的查询参数名
pub const METHOD_OVERRIDE_PARAM: &str = "_method";
/// 方法覆盖使用的请求头
pub const METHOD_OVERRIDE_HEADER: &str = "x-http-method-override";

#[derive(Serialize)]
struct RequestLog {
    method: String,
    uri: String,
    status: u16,
    duration_ms: u64,
    user_agent: Option<String>,
}

/// 请求日志中间件
pub async fn request_logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let uri = req.uri().clone();
    let user_agent = req
        .headers()
        .get("user-agent")
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string());

    let response = next.run(req).await;

    let log = RequestLog {
        method: method.to_string(),
        uri: uri.to_string(),
        status: response.status().as_u16(),
        duration_ms: start.elapsed().as_millis() as u64,
        user_agent,
    };
    info!(
        "Request: {}",
        serde_json::to_string(&log).unwrap_or_default()
    );

    response
}

/// 方法覆盖中间件
///
/// HTML 表单只能发 GET/POST。POST 请求带 `?_method=PUT` 或
/// `X-HTTP-Method-Override: DELETE` 时改写成对应方法。必须包在路由外层，
/// 在路由匹配之前执行。
pub async fn method_override_middleware(mut req: Request, next: Next) -> Response {
    if let Some(method) = override_method(req.method(), req.uri().query(), req.headers()) {
        debug!("Method override: {} {} -> {}", req.method(), req.uri(), method);
        *req.method_mut() = method;
    }
    next.run(req).await
}

/// 解析覆盖目标，只允许 POST 改写为 PUT/PATCH/DELETE
pub fn override_method(method: &Method, query: Option<&str>, headers: &HeaderMap) -> Option<Method> {
    if method != Method::POST {
        return None;
    }

    let requested = headers
        .get(METHOD_OVERRIDE_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string())
        .or_else(|| query.and_then(query_override))?;

    match requested.trim().to_ascii_uppercase().as_str() {
        "PUT" => Some(Method::PUT),
        "PATCH" => Some(Method::PATCH),
        "DELETE" => Some(Method::DELETE),
        _ => None,
    }
}

fn query_override(query: &str) -> Option<String> {
    query.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        (key == METHOD_OVERRIDE_PARAM).then(|| value.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_query_override() {
        let headers = HeaderMap::new();
        assert_eq!(
            override_method(&Method::POST, Some("_method=PUT"), &headers),
            Some(Method::PUT)
        );
        assert_eq!(
            override_method(&Method::POST, Some("a=1&_method=delete"), &headers),
            Some(Method::DELETE)
        );
        assert_eq!(override_method(&Method::POST, Some("a=1"), &headers), None);
        assert_eq!(override_method(&Method::POST, None, &headers), None);
    }

    #[test]
    fn test_header_override() {
        let mut headers = HeaderMap::new();
        headers.insert(METHOD_OVERRIDE_HEADER, HeaderValue::from_static("PATCH"));
        assert_eq!(
            override_method(&Method::POST, None, &headers),
            Some(Method::PATCH)
        );
    }

    #[test]
    fn test_only_post_and_known_verbs() {
        let headers = HeaderMap::new();
        assert_eq!(override_method(&Method::GET, Some("_method=DELETE"), &headers), None);
        assert_eq!(override_method(&Method::POST, Some("_method=GET"), &headers), None);
        assert_eq!(override_method(&Method::POST, Some("_method=CONNECT"), &headers), None);
    }
}
