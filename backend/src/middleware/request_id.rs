//! Middleware attaching a per-request correlation identifier.
//!
//! Each request receives a UUID held in task-local storage for the duration
//! of the handler, and the same value is echoed in a `Request-Id` response
//! header so client reports can be matched against server logs.
//!
//! Tokio task-locals are not inherited by spawned tasks; wrap spawned work in
//! [`CorrelationId::scope`] when the identifier must follow it.

use std::future::Future;
use std::task::{Context, Poll};

use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{HeaderName, HeaderValue};
use actix_web::Error;
use futures_util::future::{ready, LocalBoxFuture, Ready};
use tokio::task_local;
use tracing::error;
use uuid::Uuid;

task_local! {
    static CORRELATION_ID: CorrelationId;
}

/// Request-scoped correlation identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorrelationId(Uuid);

impl CorrelationId {
    fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// The identifier in scope for the current task, if any.
    pub fn current() -> Option<Self> {
        CORRELATION_ID.try_with(|id| *id).ok()
    }

    /// Run `fut` with `id` in scope.
    pub async fn scope<Fut>(id: CorrelationId, fut: Fut) -> Fut::Output
    where
        Fut: Future,
    {
        CORRELATION_ID.scope(id, fut).await
    }
}

impl std::fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Middleware factory; wrap the app with `App::new().wrap(RequestId)`.
#[derive(Clone)]
pub struct RequestId;

impl<S, B> Transform<S, ServiceRequest> for RequestId
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestIdMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestIdMiddleware { service }))
    }
}

/// Service wrapper produced by [`RequestId`].
pub struct RequestIdMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RequestIdMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let id = CorrelationId::generate();
        let header_value = id.to_string();
        let fut = self.service.call(req);
        Box::pin(CorrelationId::scope(id, async move {
            let mut res = fut.await?;
            match HeaderValue::from_str(&header_value) {
                Ok(value) => {
                    res.response_mut()
                        .headers_mut()
                        .insert(HeaderName::from_static("request-id"), value);
                }
                Err(err) => {
                    error!(error = %err, request_id = %id, "request id header encoding failed");
                }
            }
            Ok(res)
        }))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use actix_web::{test, web, App, HttpResponse};

    #[tokio::test]
    async fn current_reflects_the_scope() {
        let id = CorrelationId::generate();
        let observed = CorrelationId::scope(id, async move { CorrelationId::current() }).await;
        assert_eq!(observed, Some(id));
        assert!(CorrelationId::current().is_none());
    }

    #[actix_web::test]
    async fn responses_carry_the_request_id_header() {
        let app = test::init_service(
            App::new()
                .wrap(RequestId)
                .route("/", web::get().to(|| async { HttpResponse::Ok().finish() })),
        )
        .await;
        let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert!(res.headers().contains_key("request-id"));
    }

    #[actix_web::test]
    async fn handlers_observe_the_scoped_id() {
        let app = test::init_service(App::new().wrap(RequestId).route(
            "/",
            web::get().to(|| async {
                let id = CorrelationId::current().expect("id in scope");
                HttpResponse::Ok().body(id.to_string())
            }),
        ))
        .await;
        let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        let header = res
            .headers()
            .get("request-id")
            .expect("header present")
            .to_str()
            .expect("ascii header")
            .to_owned();
        let body = test::read_body(res).await;
        assert_eq!(header.as_bytes(), &body[..]);
    }
}
