//! HTTP middleware for request/response logging.
//!
//! Provides actix-web middleware that:
//! - Reuses the caller's `x-request-id` or generates one
//! - Logs requests and responses with structured fields
//! - Tracks request duration and flags slow requests
//! - Echoes the request id back in the response headers

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{HeaderName, HeaderValue},
    Error, HttpMessage,
};
use futures_util::future::LocalBoxFuture;
use std::{
    future::{ready, Ready},
    rc::Rc,
    time::Instant,
};
use tracing::{debug, error, info, span, warn, Instrument, Level};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Request id stored in the request extensions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

/// Configuration for observability middleware
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    /// Service name for log attribution
    pub service_name: String,
    /// Paths to exclude from logging (e.g., /health)
    pub exclude_paths: Vec<String>,
    /// Threshold in ms for slow request warnings
    pub slow_request_threshold_ms: u64,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            service_name: "medgraph".to_string(),
            exclude_paths: vec!["/health".to_string(), "/favicon.ico".to_string()],
            // LLM round trips dominate; a few seconds is normal
            slow_request_threshold_ms: 15_000,
        }
    }
}

impl ObservabilityConfig {
    pub fn for_service(name: impl Into<String>) -> Self {
        Self {
            service_name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_slow_threshold(mut self, ms: u64) -> Self {
        self.slow_request_threshold_ms = ms;
        self
    }

    pub fn exclude_path(mut self, path: impl Into<String>) -> Self {
        self.exclude_paths.push(path.into());
        self
    }

    fn is_excluded(&self, path: &str) -> bool {
        self.exclude_paths.iter().any(|p| path.starts_with(p.as_str()))
    }
}

/// Observability middleware for actix-web
#[derive(Clone)]
pub struct ObservabilityMiddleware {
    config: ObservabilityConfig,
}

impl ObservabilityMiddleware {
    pub fn new(config: ObservabilityConfig) -> Self {
        Self { config }
    }

    pub fn for_service(name: impl Into<String>) -> Self {
        Self::new(ObservabilityConfig::for_service(name))
    }
}

impl<S, B> Transform<S, ServiceRequest> for ObservabilityMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = ObservabilityMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ObservabilityMiddlewareService {
            service: Rc::new(service),
            config: self.config.clone(),
        }))
    }
}

pub struct ObservabilityMiddlewareService<S> {
    service: Rc<S>,
    config: ObservabilityConfig,
}

impl<S, B> Service<ServiceRequest> for ObservabilityMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let config = self.config.clone();
        let service = self.service.clone();

        Box::pin(async move {
            if config.is_excluded(req.path()) {
                return service.call(req).await;
            }

            let method = req.method().to_string();
            let path = req.path().to_string();
            let request_id = req
                .headers()
                .get(REQUEST_ID_HEADER)
                .and_then(|h| h.to_str().ok())
                .map(str::to_string)
                .unwrap_or_else(|| Uuid::new_v4().to_string());

            req.extensions_mut().insert(RequestId(request_id.clone()));
            debug!(request_id = %request_id, service = %config.service_name, "→ {} {}", method, path);

            let request_span = span!(
                Level::INFO,
                "http_request",
                request_id = %request_id,
                method = %method,
                path = %path,
                service = %config.service_name,
            );

            let start = Instant::now();
            let result = service.call(req).instrument(request_span).await;
            let duration_ms = start.elapsed().as_millis() as u64;

            match result {
                Ok(mut res) => {
                    let status = res.status().as_u16();
                    let line = format!("← {} {} {} {}ms", method, path, status, duration_ms);

                    match Outcome::classify(status, duration_ms, config.slow_request_threshold_ms) {
                        Outcome::ServerError => error!(request_id = %request_id, status, duration_ms, "{}", line),
                        Outcome::ClientError => warn!(request_id = %request_id, status, duration_ms, "{}", line),
                        Outcome::Slow => warn!(request_id = %request_id, status, duration_ms, "SLOW {}", line),
                        Outcome::Normal => info!(request_id = %request_id, status, duration_ms, "{}", line),
                    }

                    if let Ok(value) = HeaderValue::from_str(&request_id) {
                        res.headers_mut().insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
                    }
                    Ok(res)
                }
                Err(e) => {
                    error!(
                        request_id = %request_id,
                        duration_ms,
                        error = %e,
                        "← {} {} ERROR {}ms",
                        method, path, duration_ms
                    );
                    Err(e)
                }
            }
        })
    }
}

/// Log level bucket for a finished request
#[derive(Debug, PartialEq, Eq)]
enum Outcome {
    ServerError,
    ClientError,
    Slow,
    Normal,
}

impl Outcome {
    fn classify(status: u16, duration_ms: u64, slow_threshold_ms: u64) -> Self {
        match status {
            500..=u16::MAX => Outcome::ServerError,
            400..=499 => Outcome::ClientError,
            _ if duration_ms > slow_threshold_ms => Outcome::Slow,
            _ => Outcome::Normal,
        }
    }
}

/// Helper to create observability middleware for a service
pub fn observability(service_name: impl Into<String>) -> ObservabilityMiddleware {
    ObservabilityMiddleware::for_service(service_name)
}

/// Request id assigned by the middleware, if it ran for this request
pub fn request_id(req: &actix_web::HttpRequest) -> Option<String> {
    req.extensions().get::<RequestId>().map(|id| id.0.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, web, App, HttpRequest, HttpResponse};

    async fn echo_request_id(req: HttpRequest) -> HttpResponse {
        HttpResponse::Ok().body(request_id(&req).unwrap_or_default())
    }

    #[actix_web::test]
    async fn test_propagates_caller_request_id() {
        let app = test::init_service(
            App::new()
                .wrap(observability("test"))
                .route("/ask", web::post().to(echo_request_id)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/ask")
            .insert_header((REQUEST_ID_HEADER, "req-123"))
            .to_request();
        let body = test::call_and_read_body(&app, req).await;

        assert_eq!(body, "req-123");
    }

    #[actix_web::test]
    async fn test_excluded_path_has_no_request_id() {
        let app = test::init_service(
            App::new()
                .wrap(observability("test"))
                .route("/health", web::get().to(echo_request_id)),
        )
        .await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let body = test::call_and_read_body(&app, req).await;

        assert!(body.is_empty());
    }

    #[actix_web::test]
    async fn test_response_carries_request_id() {
        let app = test::init_service(
            App::new()
                .wrap(observability("test"))
                .route("/ask", web::post().to(echo_request_id)),
        )
        .await;

        let resp = test::call_service(&app, test::TestRequest::post().uri("/ask").to_request()).await;
        let header = resp.headers().get(REQUEST_ID_HEADER).unwrap().to_str().unwrap();

        assert!(Uuid::parse_str(header).is_ok());
    }

    #[::core::prelude::v1::test]
    fn test_outcome_classification() {
        assert_eq!(Outcome::classify(503, 10, 1000), Outcome::ServerError);
        assert_eq!(Outcome::classify(404, 5000, 1000), Outcome::ClientError);
        assert_eq!(Outcome::classify(200, 5000, 1000), Outcome::Slow);
        assert_eq!(Outcome::classify(200, 10, 1000), Outcome::Normal);
    }

    #[::core::prelude::v1::test]
    fn test_config_builder() {
        let config = ObservabilityConfig::for_service("graph-rag")
            .with_slow_threshold(500)
            .exclude_path("/metrics");

        assert_eq!(config.slow_request_threshold_ms, 500);
        assert!(config.is_excluded("/metrics"));
        assert!(config.is_excluded("/health"));
        assert!(!config.is_excluded("/api/rag/graph/ask"));
    }
}
