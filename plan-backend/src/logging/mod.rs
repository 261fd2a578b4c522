// src/logging/mod.rs

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use std::time::Instant;
use uuid::Uuid;

#[macro_export]
macro_rules! log_with_context {
    ($level:expr, $msg:expr $(, $($key:expr => $value:expr),* $(,)?)?) => {
        match $level {
            tracing::Level::ERROR => {
                tracing::error!(
                    message = $msg
                    $(, $($key = ?$value,)*)?
                );
            }
            tracing::Level::WARN => {
                tracing::warn!(
                    message = $msg
                    $(, $($key = ?$value,)*)?
                );
            }
            tracing::Level::INFO => {
                tracing::info!(
                    message = $msg
                    $(, $($key = ?$value,)*)?
                );
            }
            tracing::Level::DEBUG => {
                tracing::debug!(
                    message = $msg
                    $(, $($key = ?$value,)*)?
                );
            }
            _ => {}
        }
    };
}

// リクエストコンテキスト
#[derive(Clone, Debug)]
pub struct RequestContext {
    pub request_id: String,
    pub path: String,
    pub method: String,
}

// リクエストIDの採番と開始・完了ログをまとめて行うミドルウェア
pub async fn request_logging_middleware(mut req: Request<Body>, next: Next) -> Response {
    let start = Instant::now();

    let context = RequestContext {
        request_id: Uuid::new_v4().to_string(),
        path: req.uri().path().to_string(),
        method: req.method().to_string(),
    };
    req.extensions_mut().insert(context.clone());

    log_with_context!(
        tracing::Level::DEBUG,
        "Request started",
        "request_id" => &context.request_id,
        "method" => &context.method,
        "path" => &context.path,
    );

    let response = next.run(req).await;
    let duration = start.elapsed();
    let status = response.status().as_u16();

    log_with_context!(
        if status >= 500 { tracing::Level::ERROR }
        else if status >= 400 { tracing::Level::WARN }
        else { tracing::Level::INFO },
        "Request completed",
        "request_id" => &context.request_id,
        "method" => &context.method,
        "path" => &context.path,
        "status" => status,
        "duration_ms" => duration.as_millis(),
    );

    response
}
