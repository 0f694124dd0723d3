//! Mock ML Scoring Server for Tests
//!
//! Provides a [`MockAnalyzerServer`] that stands in for the ML service's
//! `POST /analyze` route, so client tests never need a live model.
//!
//! # Example
//! ```ignore
//! let server = MockAnalyzerServer::builder()
//!     .with_json(r#"{"asset":"srv1","risk_level":"high","risk_score":8.2,"recommendation":"patch now"}"#)
//!     .build()
//!     .await;
//! let client = MlClient::with_url(server.analyze_url());
//! // ...
//! server.stop().await;
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{watch, Mutex};

/// One canned reply.
#[derive(Debug, Clone)]
pub struct MockReply {
    pub status: u16,
    pub body: String,
}

/// A request the server received on the analyze route.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub content_type: Option<String>,
    pub body: String,
}

#[derive(Debug, Clone)]
pub struct MockAnalyzerConfig {
    /// Replies served in order; the last one repeats once the queue is used up.
    pub replies: Vec<MockReply>,
    /// Route that answers; anything else gets 404.
    pub path: String,
    /// Artificial latency before every reply (milliseconds).
    pub latency_ms: u64,
}

impl Default for MockAnalyzerConfig {
    fn default() -> Self {
        Self {
            replies: Vec::new(),
            path: crate::config::DEFAULT_ANALYZER_PATH.to_string(),
            latency_ms: 0,
        }
    }
}

#[derive(Default)]
pub struct MockAnalyzerServerBuilder {
    config: MockAnalyzerConfig,
}

impl MockAnalyzerServerBuilder {
    /// Queue a 200 reply with a JSON body.
    pub fn with_json(self, body: impl Into<String>) -> Self {
        self.with_body(200, body)
    }

    /// Queue a reply with an arbitrary status and body.
    pub fn with_body(mut self, status: u16, body: impl Into<String>) -> Self {
        self.config.replies.push(MockReply {
            status,
            body: body.into(),
        });
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.config.path = path.into();
        self
    }

    pub fn with_latency(mut self, ms: u64) -> Self {
        self.config.latency_ms = ms;
        self
    }

    pub async fn build(self) -> MockAnalyzerServer {
        MockAnalyzerServer::start(self.config).await
    }
}

pub struct MockAnalyzerServer {
    url: String,
    state: Arc<ServerState>,
    shutdown_tx: watch::Sender<bool>,
    handle: tokio::task::JoinHandle<()>,
}

/// Everything the connection tasks share.
struct ServerState {
    config: MockAnalyzerConfig,
    replies_served: AtomicUsize,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl ServerState {
    /// Next queued reply; the last one repeats once the queue is used up.
    fn next_reply(&self) -> Option<&MockReply> {
        let n = self.replies_served.fetch_add(1, Ordering::SeqCst);
        let replies = &self.config.replies;
        replies.get(n).or_else(|| replies.last())
    }
}

impl MockAnalyzerServer {
    pub fn builder() -> MockAnalyzerServerBuilder {
        MockAnalyzerServerBuilder::default()
    }

    /// Bind to `127.0.0.1:0` and serve in a background task.
    pub async fn start(config: MockAnalyzerConfig) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind mock analyzer");
        let url = format!("http://{}", listener.local_addr().expect("no local addr"));

        let state = Arc::new(ServerState {
            config,
            replies_served: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        });
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(serve(listener, Arc::clone(&state), shutdown_rx));

        Self {
            url,
            state,
            shutdown_tx,
            handle,
        }
    }

    /// Base URL, e.g. `"http://127.0.0.1:54321"`.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Full URL of the analyze route.
    pub fn analyze_url(&self) -> String {
        format!("{}{}", self.url, self.state.config.path)
    }

    /// Requests received so far on the analyze route.
    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().await.clone()
    }

    pub async fn stop(self) {
        let _ = self.shutdown_tx.send(true);
        let _ = self.handle.await;
    }
}

async fn serve(listener: TcpListener, state: Arc<ServerState>, mut shutdown: watch::Receiver<bool>) {
    while !*shutdown.borrow() {
        let accepted = tokio::select! {
            changed = shutdown.changed() => {
                // sender dropped
                if changed.is_err() {
                    return;
                }
                continue;
            }
            accepted = listener.accept() => accepted,
        };

        let stream = match accepted {
            Ok((stream, _)) => stream,
            Err(e) => {
                tracing::debug!("mock analyzer accept failed: {}", e);
                continue;
            }
        };
        let state = Arc::clone(&state);
        tokio::spawn(async move {
            if let Err(e) = answer(stream, &state).await {
                tracing::debug!("mock analyzer connection failed: {}", e);
            }
        });
    }
}

async fn answer(mut stream: TcpStream, state: &ServerState) -> std::io::Result<()> {
    let Some(request) = read_request(&mut stream).await? else {
        return Ok(());
    };

    if request.method != "POST" || request.recorded.path != state.config.path {
        return respond(&mut stream, 404, "").await;
    }
    state.requests.lock().await.push(request.recorded);

    if state.config.latency_ms > 0 {
        tokio::time::sleep(std::time::Duration::from_millis(state.config.latency_ms)).await;
    }

    match state.next_reply() {
        Some(reply) => respond(&mut stream, reply.status, &reply.body).await,
        None => respond(&mut stream, 500, "no reply configured").await,
    }
}

struct ParsedRequest {
    method: String,
    recorded: RecordedRequest,
}

/// Read the head, then as much body as Content-Length announces.
async fn read_request(stream: &mut TcpStream) -> std::io::Result<Option<ParsedRequest>> {
    let mut buf = Vec::with_capacity(8192);
    let mut chunk = [0u8; 4096];

    let head_end = loop {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            return Ok(None);
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = find_subslice(&buf, b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..head_end]).to_string();
    let mut lines = head.lines();
    let mut request_line = lines.next().unwrap_or_default().split_whitespace();
    let method = request_line.next().unwrap_or_default().to_string();
    let path = request_line.next().unwrap_or_default().to_string();

    let mut content_length = 0usize;
    let mut content_type = None;
    for line in lines {
        if let Some((name, value)) = line.split_once(':') {
            let value = value.trim();
            if name.eq_ignore_ascii_case("content-length") {
                content_length = value.parse().unwrap_or(0);
            } else if name.eq_ignore_ascii_case("content-type") {
                content_type = Some(value.to_string());
            }
        }
    }

    while buf.len() < head_end + content_length {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    let body_end = buf.len().min(head_end + content_length);
    let body = String::from_utf8_lossy(&buf[head_end..body_end]).to_string();

    Ok(Some(ParsedRequest {
        method,
        recorded: RecordedRequest {
            path,
            content_type,
            body,
        },
    }))
}

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Write a complete `Connection: close` response. Only the statuses the
/// tests use get their proper reason phrase.
async fn respond(stream: &mut TcpStream, status: u16, body: &str) -> std::io::Result<()> {
    let reason = match status {
        200 => "OK",
        404 => "Not Found",
        503 => "Service Unavailable",
        _ => "Internal Server Error",
    };
    let head = format!(
        "HTTP/1.1 {status} {reason}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n",
        body.len()
    );
    stream.write_all(head.as_bytes()).await?;
    stream.write_all(body.as_bytes()).await?;
    stream.flush().await
}
