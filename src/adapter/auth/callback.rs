//! Loopback Redirect Listener
//!
//! ブラウザからのリダイレクトを 127.0.0.1 の一時ポートで受け取る

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use log::{debug, warn};
use serde::Deserialize;
use tokio::net::TcpListener;
use tokio::sync::{oneshot, Mutex};

use crate::domain::errors::AuthError;

const SUCCESS_PAGE: &str = "<html><body><h1>Authorization complete</h1>\
<p>You can close this window and return to the terminal.</p></body></html>";

const FAILURE_PAGE: &str = "<html><body><h1>Authorization failed</h1>\
<p>Return to the terminal for details.</p></body></html>";

/// Time the server gets to finish answering the browser after the code arrives
const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

/// Query string of the redirect
#[derive(Debug, Default, Deserialize)]
pub struct RedirectQuery {
    code: Option<String>,
    state: Option<String>,
    error: Option<String>,
}

/// コールバックのクエリ解析結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackParams {
    Code { code: String, state: String },
    Denied { error: String },
    /// Requests to `/` that carry neither a code nor an error
    Ignored,
}

impl From<RedirectQuery> for CallbackParams {
    fn from(query: RedirectQuery) -> Self {
        match (query.code, query.error) {
            (_, Some(error)) => CallbackParams::Denied { error },
            (Some(code), None) => CallbackParams::Code {
                code,
                state: query.state.unwrap_or_default(),
            },
            (None, None) => CallbackParams::Ignored,
        }
    }
}

type CodeSender = oneshot::Sender<Result<String, AuthError>>;

struct RedirectState {
    expected_state: String,
    sender: Mutex<Option<CodeSender>>,
}

fn router(state: Arc<RedirectState>) -> Router {
    Router::new()
        .route("/", get(handle_redirect))
        .fallback(|| async { StatusCode::NOT_FOUND })
        .with_state(state)
}

async fn handle_redirect(
    State(state): State<Arc<RedirectState>>,
    Query(query): Query<RedirectQuery>,
) -> Response {
    let outcome = match CallbackParams::from(query) {
        CallbackParams::Code { code, state: received } => {
            if received == state.expected_state {
                Ok(code)
            } else {
                Err(AuthError::StateMismatch)
            }
        }
        CallbackParams::Denied { error } => Err(AuthError::ConsentFailed(error)),
        CallbackParams::Ignored => return StatusCode::NOT_FOUND.into_response(),
    };

    let answer = match &outcome {
        Ok(_) => (StatusCode::OK, Html(SUCCESS_PAGE)),
        Err(_) => (StatusCode::BAD_REQUEST, Html(FAILURE_PAGE)),
    };

    match state.sender.lock().await.take() {
        Some(sender) => {
            sender.send(outcome).ok();
        }
        None => debug!("Redirect received after the authorization was already settled"),
    }

    answer.into_response()
}

/// ローカルのリダイレクト受信サーバ
pub struct CallbackListener {
    listener: Option<TcpListener>,
    redirect_uri: String,
}

impl CallbackListener {
    /// 127.0.0.1 の空きポートで待ち受けを開始
    pub async fn bind() -> Result<Self, AuthError> {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|e| AuthError::ConsentFailed(format!("cannot open local listener: {}", e)))?;
        let port = listener
            .local_addr()
            .map_err(|e| AuthError::ConsentFailed(e.to_string()))?
            .port();

        Ok(Self {
            listener: Some(listener),
            redirect_uri: format!("http://127.0.0.1:{}/", port),
        })
    }

    pub fn redirect_uri(&self) -> &str {
        &self.redirect_uri
    }

    /// 認可コードが届くまで待つ
    ///
    /// Connections are served concurrently, so an idle socket opened by the
    /// browser does not hold up the redirect.
    ///
    /// # Errors
    ///
    /// * `ConsentTimeout` - `timeout` 内にリダイレクトが来なかった
    /// * `StateMismatch` - state が一致しない
    /// * `ConsentFailed` - ユーザーが拒否した、またはサーバが停止した
    pub async fn wait_for_code(
        &mut self,
        expected_state: &str,
        timeout: Duration,
    ) -> Result<String, AuthError> {
        let listener = self.listener.take().ok_or_else(|| {
            AuthError::ConsentFailed("redirect listener was already used".to_string())
        })?;

        let (code_tx, code_rx) = oneshot::channel();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let app = router(Arc::new(RedirectState {
            expected_state: expected_state.to_string(),
            sender: Mutex::new(Some(code_tx)),
        }));

        let mut server = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_rx.await.ok();
                })
                .await
        });

        let received = tokio::time::timeout(timeout, code_rx).await;

        shutdown_tx.send(()).ok();
        match tokio::time::timeout(SHUTDOWN_GRACE, &mut server).await {
            Ok(Ok(Err(e))) => warn!("Redirect listener stopped with an error: {}", e),
            Ok(_) => {}
            Err(_) => {
                debug!("Redirect listener still has open connections, aborting it");
                server.abort();
            }
        }

        match received {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(_)) => Err(AuthError::ConsentFailed(
                "redirect listener stopped before receiving a code".to_string(),
            )),
            Err(_) => Err(AuthError::ConsentTimeout),
        }
    }
}
