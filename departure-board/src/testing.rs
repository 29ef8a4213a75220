//! In-process HTTP stub for exercising the provider clients.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::routing::post;

/// A request the stub received.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub headers: HeaderMap,
    pub body: String,
}

struct Inner {
    status: StatusCode,
    content_type: &'static str,
    body: String,
    delay: Duration,
    requests: Mutex<Vec<Recorded>>,
}

/// A running stub server answering every POST with a canned response.
#[derive(Clone)]
pub struct Stub {
    inner: Arc<Inner>,
    pub url: String,
}

impl Stub {
    pub async fn start(status: StatusCode, content_type: &'static str, body: &str) -> Self {
        Self::start_delayed(status, content_type, body, Duration::ZERO).await
    }

    pub async fn start_delayed(
        status: StatusCode,
        content_type: &'static str,
        body: &str,
        delay: Duration,
    ) -> Self {
        let inner = Arc::new(Inner {
            status,
            content_type,
            body: body.to_string(),
            delay,
            requests: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/", post(respond))
            .with_state(inner.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            inner,
            url: format!("http://{addr}/"),
        }
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.inner.requests.lock().unwrap().clone()
    }
}

async fn respond(
    State(inner): State<Arc<Inner>>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, [(header::HeaderName, &'static str); 1], String) {
    inner.requests.lock().unwrap().push(Recorded {
        headers,
        body: String::from_utf8_lossy(&body).into_owned(),
    });

    if !inner.delay.is_zero() {
        tokio::time::sleep(inner.delay).await;
    }

    (
        inner.status,
        [(header::CONTENT_TYPE, inner.content_type)],
        inner.body.clone(),
    )
}
