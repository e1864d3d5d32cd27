//! Scripted loopback HTTP server for adapter tests

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};
use tokio::net::TcpListener;

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub target: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        let name = name.to_ascii_lowercase();
        self.headers
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).to_string()
    }
}

#[derive(Debug, Clone)]
pub struct ScriptedResponse {
    status: u16,
    headers: Vec<(String, String)>,
    body: String,
}

impl ScriptedResponse {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: String::new(),
        }
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn json(mut self, body: serde_json::Value) -> Self {
        self.headers
            .push(("Content-Type".to_string(), "application/json".to_string()));
        self.body = body.to_string();
        self
    }
}

impl IntoResponse for ScriptedResponse {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut response = (status, self.body).into_response();
        for (name, value) in &self.headers {
            if let (Ok(name), Ok(value)) = (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                response.headers_mut().insert(name, value);
            }
        }
        response
    }
}

#[derive(Default)]
struct Script {
    responses: VecDeque<ScriptedResponse>,
    requests: Vec<RecordedRequest>,
}

type SharedScript = Arc<Mutex<Script>>;

fn lock(script: &Mutex<Script>) -> MutexGuard<'_, Script> {
    script.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Answers every request, on any path, with the next scripted response.
/// Once the script runs out the server answers 500.
pub struct ScriptedServer {
    addr: SocketAddr,
    listener: Option<TcpListener>,
    script: SharedScript,
}

impl ScriptedServer {
    pub async fn bind() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        Self {
            addr,
            listener: Some(listener),
            script: SharedScript::default(),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn serve(&mut self, responses: Vec<ScriptedResponse>) {
        let listener = self.listener.take().expect("serve called twice");
        lock(&self.script).responses = responses.into();

        let app = Router::new()
            .fallback(answer)
            .with_state(self.script.clone());
        tokio::spawn(async move { axum::serve(listener, app).await });
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.script).requests.clone()
    }
}

async fn answer(
    State(script): State<SharedScript>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let recorded = RecordedRequest {
        method: method.to_string(),
        target: uri
            .path_and_query()
            .map(|p| p.as_str().to_string())
            .unwrap_or_else(|| uri.path().to_string()),
        headers: headers
            .iter()
            .map(|(k, v)| {
                (
                    k.as_str().to_string(),
                    v.to_str().unwrap_or_default().to_string(),
                )
            })
            .collect(),
        body: body.to_vec(),
    };

    let mut script = lock(&script);
    script.requests.push(recorded);
    match script.responses.pop_front() {
        Some(response) => response.into_response(),
        None => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "no scripted response left",
        )
            .into_response(),
    }
}

/// HTTP client for tests: no system proxy, no redirects
pub fn test_http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_answers_in_order_then_500() {
        let mut server = ScriptedServer::bind().await;
        server.serve(vec![
            ScriptedResponse::new(308).header("Range", "bytes=0-3"),
            ScriptedResponse::new(201).json(serde_json::json!({"id": "v1"})),
        ]);
        let client = test_http_client();

        let first = client
            .put(server.url("/session?upload_id=1"))
            .header("Content-Range", "bytes 0-3/8")
            .body("0123")
            .send()
            .await
            .unwrap();
        assert_eq!(first.status().as_u16(), 308);
        assert_eq!(first.headers()["range"], "bytes=0-3");

        let second = client.get(server.url("/anything")).send().await.unwrap();
        assert_eq!(second.status().as_u16(), 201);
        assert_eq!(second.text().await.unwrap(), r#"{"id":"v1"}"#);

        let exhausted = client.get(server.url("/")).send().await.unwrap();
        assert_eq!(exhausted.status().as_u16(), 500);

        let requests = server.requests();
        assert_eq!(requests.len(), 3);
        assert_eq!(requests[0].method, "PUT");
        assert_eq!(requests[0].target, "/session?upload_id=1");
        assert_eq!(requests[0].header("Content-Range"), Some("bytes 0-3/8"));
        assert_eq!(requests[0].body_text(), "0123");
    }
}
