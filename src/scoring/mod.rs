//! Scoring Module - remote prediction and decision

pub mod client;
pub mod decision;

pub use client::{Prediction, ScoringClient, ScoringConfig, ScoringError};
pub use decision::{Decision, Verdict};

#[cfg(test)]
pub(crate) mod testing {
    //! Local stand-in for the scoring endpoint.

    use std::sync::Arc;

    use axum::http::{header::CONTENT_TYPE, HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::Router;
    use parking_lot::Mutex;

    #[derive(Debug, Clone)]
    pub struct CapturedRequest {
        pub content_type: Option<String>,
        pub body: serde_json::Value,
    }

    pub struct ScoringStub {
        pub url: String,
        received: Arc<Mutex<Vec<CapturedRequest>>>,
    }

    impl ScoringStub {
        pub fn received(&self) -> Vec<CapturedRequest> {
            self.received.lock().clone()
        }
    }

    /// Serve `POST /prediction` answering every call with `status` and `body`.
    pub async fn spawn_scoring_stub(status: StatusCode, body: &'static str) -> ScoringStub {
        let received = Arc::new(Mutex::new(Vec::new()));
        let captured = received.clone();

        let app = Router::new().route(
            "/prediction",
            post(move |headers: HeaderMap, payload: String| {
                let captured = captured.clone();
                async move {
                    captured.lock().push(CapturedRequest {
                        content_type: headers
                            .get(CONTENT_TYPE)
                            .and_then(|v| v.to_str().ok())
                            .map(str::to_string),
                        body: serde_json::from_str(&payload).unwrap_or(serde_json::Value::Null),
                    });
                    (status, body)
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        let addr = listener.local_addr().expect("addr");
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        ScoringStub {
            url: format!("http://{addr}/prediction"),
            received,
        }
    }
}
