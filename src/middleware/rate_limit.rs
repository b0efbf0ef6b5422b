use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    error::InternalError,
    Error, HttpResponse,
};
use futures::future::{ready, LocalBoxFuture, Ready};

#[derive(Debug)]
struct RequestWindow {
    started_at: Instant,
    count: usize,
}

/// Fixed-window request limiter.
///
/// `per_client` keys windows by peer address (the stricter ceiling on
/// the planning endpoint); `global` shares one window across every
/// caller (the looser app-wide ceiling).
#[derive(Clone)]
pub struct RateLimit {
    max_requests: usize,
    window: Duration,
    per_client: bool,
    state: Arc<Mutex<HashMap<String, RequestWindow>>>,
}

impl RateLimit {
    pub fn per_client(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            per_client: true,
            state: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn global(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            per_client: false,
            state: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn try_acquire(&self, key: &str) -> bool {
        let mut windows = self.state.lock().expect("rate limit state poisoned");
        let window = windows.entry(key.to_string()).or_insert(RequestWindow {
            started_at: Instant::now(),
            count: 0,
        });

        if window.started_at.elapsed() >= self.window {
            window.started_at = Instant::now();
            window.count = 0;
        }

        if window.count >= self.max_requests {
            return false;
        }
        window.count += 1;
        true
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = RateLimitService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitService {
            service,
            limiter: self.clone(),
        }))
    }
}

pub struct RateLimitService<S> {
    service: S,
    limiter: RateLimit,
}

impl<S, B> Service<ServiceRequest> for RateLimitService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let key = if self.limiter.per_client {
            req.peer_addr()
                .map(|addr| addr.ip().to_string())
                .unwrap_or_else(|| "unknown".to_string())
        } else {
            "*".to_string()
        };

        if !self.limiter.try_acquire(&key) {
            let response = HttpResponse::TooManyRequests().json(serde_json::json!({
                "error": "Too many requests. Please slow down.",
                "code": "rate_limited",
            }));
            return Box::pin(ready(Err(
                InternalError::from_response("rate limit exceeded", response).into()
            )));
        }

        Box::pin(self.service.call(req))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, web, App};

    async fn ping() -> &'static str {
        "pong"
    }

    #[actix_rt::test]
    async fn test_requests_over_the_ceiling_get_429() {
        let app = test::init_service(
            App::new()
                .wrap(RateLimit::global(2, Duration::from_secs(60)))
                .route("/ping", web::get().to(ping)),
        )
        .await;

        for _ in 0..2 {
            let resp =
                test::call_service(&app, test::TestRequest::get().uri("/ping").to_request()).await;
            assert!(resp.status().is_success());
        }

        let err = app
            .call(test::TestRequest::get().uri("/ping").to_request())
            .await
            .unwrap_err();
        assert_eq!(err.error_response().status(), 429);
    }

    #[actix_rt::test]
    async fn test_window_resets_after_elapsing() {
        let limiter = RateLimit::global(1, Duration::from_millis(10));
        assert!(limiter.try_acquire("*"));
        assert!(!limiter.try_acquire("*"));

        tokio::time::sleep(Duration::from_millis(15)).await;
        assert!(limiter.try_acquire("*"));
    }

    #[::core::prelude::v1::test]
    fn test_per_client_windows_are_independent() {
        let limiter = RateLimit::per_client(1, Duration::from_secs(60));
        assert!(limiter.try_acquire("10.0.0.1"));
        assert!(!limiter.try_acquire("10.0.0.1"));
        assert!(limiter.try_acquire("10.0.0.2"));
    }
}
