//! Canned in-process directory server for client tests.

use hyper::service::{make_service_fn, service_fn};
use hyper::{Body, Method, Request, Response, Server, StatusCode};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

/// A scripted stand-in for the remote directory.
///
/// Serves `GET /users` from a canned body and records every POST it
/// receives, so tests can assert on what the client actually sent.
#[derive(Clone)]
pub struct TestDirectory {
    users_body: String,
    users_status: StatusCode,
    log_status: StatusCode,
    enroll_status: StatusCode,
    posts: Arc<Mutex<Vec<(String, serde_json::Value)>>>,
}

impl Default for TestDirectory {
    fn default() -> Self {
        TestDirectory {
            users_body: "[]".to_string(),
            users_status: StatusCode::OK,
            log_status: StatusCode::OK,
            enroll_status: StatusCode::OK,
            posts: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[allow(dead_code)]
impl TestDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(mut self, body: impl Into<String>) -> Self {
        self.users_body = body.into();
        self
    }

    pub fn with_users_status(mut self, status: StatusCode) -> Self {
        self.users_status = status;
        self
    }

    pub fn with_log_status(mut self, status: StatusCode) -> Self {
        self.log_status = status;
        self
    }

    pub fn with_enroll_status(mut self, status: StatusCode) -> Self {
        self.enroll_status = status;
        self
    }

    /// Recorded POSTs as `(path, json body)` pairs, in arrival order.
    pub fn posts(&self) -> Vec<(String, serde_json::Value)> {
        self.posts.lock().unwrap().clone()
    }

    /// Bind on an ephemeral local port and serve until the runtime drops.
    pub fn spawn(&self) -> SocketAddr {
        let dir = self.clone();
        let make_svc = make_service_fn(move |_conn| {
            let dir = dir.clone();
            async move {
                Ok::<_, Infallible>(service_fn(move |req| {
                    let dir = dir.clone();
                    async move { Ok::<_, Infallible>(dir.handle(req).await) }
                }))
            }
        });

        let server = Server::bind(&"127.0.0.1:0".parse().unwrap()).serve(make_svc);
        let addr = server.local_addr();
        tokio::spawn(server);
        addr
    }

    async fn handle(&self, req: Request<Body>) -> Response<Body> {
        let method = req.method().clone();
        let path = req.uri().path().to_string();

        match (method, path.as_str()) {
            (Method::GET, "/users") => Response::builder()
                .status(self.users_status)
                .header("content-type", "application/json")
                .body(Body::from(self.users_body.clone()))
                .unwrap(),
            (Method::POST, "/access/log") | (Method::POST, "/users/enroll") => {
                let status = if path == "/access/log" {
                    self.log_status
                } else {
                    self.enroll_status
                };
                let bytes = hyper::body::to_bytes(req.into_body()).await.unwrap_or_default();
                let value = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
                self.posts.lock().unwrap().push((path, value));
                Response::builder()
                    .status(status)
                    .body(Body::empty())
                    .unwrap()
            }
            _ => Response::builder()
                .status(StatusCode::NOT_FOUND)
                .body(Body::empty())
                .unwrap(),
        }
    }
}

/// A local base URL that nothing is listening on.
#[allow(dead_code)]
pub fn unreachable_base_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}
