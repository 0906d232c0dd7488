//! 集成测试用的本地HTTP服务
//!
//! 基于tokio的TcpListener，按路径返回预设响应，并记录收到的请求。

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// 预设响应
#[derive(Debug, Clone)]
pub struct MockResponse {
    pub status: u16,
    pub content_type: String,
    pub body: Vec<u8>,
}

impl MockResponse {
    pub fn html(body: &str) -> Self {
        Self {
            status: 200,
            content_type: "text/html; charset=utf-8".to_string(),
            body: body.as_bytes().to_vec(),
        }
    }

    pub fn json(body: &str) -> Self {
        Self {
            status: 200,
            content_type: "application/json".to_string(),
            body: body.as_bytes().to_vec(),
        }
    }

    pub fn bytes(body: &[u8]) -> Self {
        Self {
            status: 200,
            content_type: "application/octet-stream".to_string(),
            body: body.to_vec(),
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            content_type: "text/plain".to_string(),
            body: Vec::new(),
        }
    }
}

/// 收到的请求
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

type Handler = Box<dyn Fn(&RecordedRequest) -> MockResponse + Send + Sync>;

/// 路由：按顺序返回响应（最后一个重复使用），或由闭包动态生成
pub enum Route {
    Sequence(Vec<MockResponse>),
    Dynamic(Handler),
}

impl Route {
    pub fn always(response: MockResponse) -> Self {
        Route::Sequence(vec![response])
    }

    pub fn dynamic<F>(handler: F) -> Self
    where
        F: Fn(&RecordedRequest) -> MockResponse + Send + Sync + 'static,
    {
        Route::Dynamic(Box::new(handler))
    }
}

struct State {
    routes: HashMap<String, Route>,
    hits: Mutex<HashMap<String, usize>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl State {
    fn respond(&self, request: &RecordedRequest) -> MockResponse {
        let hit = {
            let mut hits = self.hits.lock().unwrap();
            let counter = hits.entry(request.path.clone()).or_insert(0);
            *counter += 1;
            *counter - 1
        };

        match self.routes.get(&request.path) {
            Some(Route::Sequence(responses)) if !responses.is_empty() => {
                responses[hit.min(responses.len() - 1)].clone()
            }
            Some(Route::Dynamic(handler)) => handler(request),
            _ => MockResponse::status(404),
        }
    }
}

pub struct TestServer {
    base_url: String,
    state: Arc<State>,
}

impl TestServer {
    /// 启动服务，返回后即可接受连接
    pub async fn spawn(routes: Vec<(&str, Route)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let state = Arc::new(State {
            routes: routes
                .into_iter()
                .map(|(path, route)| (path.to_string(), route))
                .collect(),
            hits: Mutex::new(HashMap::new()),
            requests: Mutex::new(Vec::new()),
        });

        let accept_state = state.clone();
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let state = accept_state.clone();
                tokio::spawn(async move {
                    let _ = handle(stream, state).await;
                });
            }
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    /// 拼接完整URL
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// 某路径被请求的次数
    pub fn hits(&self, path: &str) -> usize {
        self.state.hits.lock().unwrap().get(path).copied().unwrap_or(0)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }
}

async fn handle(mut stream: TcpStream, state: Arc<State>) -> std::io::Result<()> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            return Ok(());
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = head.lines();
    let request_line = lines.next().unwrap_or_default();
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let target = parts.next().unwrap_or("/");
    let path = target.split('?').next().unwrap_or("/").to_string();

    let headers: HashMap<String, String> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_ascii_lowercase(), v.trim().to_string()))
        .collect();

    let content_length = headers
        .get("content-length")
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(0);
    while buf.len() < header_end + content_length {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    let body_end = (header_end + content_length).min(buf.len());

    let request = RecordedRequest {
        method,
        path,
        headers,
        body: buf[header_end..body_end].to_vec(),
    };
    let response = state.respond(&request);
    state.requests.lock().unwrap().push(request);

    let reason = match response.status {
        200 => "OK",
        403 => "Forbidden",
        404 => "Not Found",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Status",
    };
    let head = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        response.status,
        reason,
        response.content_type,
        response.body.len()
    );
    stream.write_all(head.as_bytes()).await?;
    stream.write_all(&response.body).await?;
    stream.flush().await?;
    stream.shutdown().await
}
