#![allow(dead_code)]

use std::{
    collections::VecDeque,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpListener,
};

use betai::feed::{FeedError, FeedSource};

pub fn record(id: &str) -> Value {
    json!({
        "id": id,
        "time": "19:45",
        "league": "Premier League",
        "homeTeam": format!("Home {id}"),
        "awayTeam": format!("Away {id}"),
        "prediction": {"homeWin": 48, "draw": 27, "awayWin": 25},
        "safeBet": {"title": "Over 1.5 goals", "odds": "1.28", "description": "Both sides score freely"},
        "valueBet": {"title": "Home win & BTTS", "odds": "3.40", "description": "Leaky away defence"},
        "stats": {
            "homeForm": "WWLDW",
            "awayForm": "LDWLL",
            "h2h": "Home side won 3 of the last 5",
            "keyInsights": "Away striker suspended"
        },
        "reasoning": "Form and head-to-head both point to the hosts."
    })
}

pub fn records(count: usize) -> Value {
    Value::Array((0..count).map(|i| record(&format!("m{i}"))).collect())
}

/// Feed source that replays scripted documents and counts round-trips.
pub struct ScriptedSource {
    responses: Mutex<VecDeque<Result<Value, FeedError>>>,
    fallback: Result<Value, FeedError>,
    calls: AtomicUsize,
    latency: Option<Duration>,
}

impl ScriptedSource {
    pub fn always(response: Result<Value, FeedError>) -> Self {
        Self::sequence(Vec::new(), response)
    }

    /// Replays `responses` in order, then `fallback` forever.
    pub fn sequence(
        responses: Vec<Result<Value, FeedError>>,
        fallback: Result<Value, FeedError>,
    ) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            fallback,
            calls: AtomicUsize::new(0),
            latency: None,
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FeedSource for ScriptedSource {
    async fn fetch_document(&self) -> Result<Value, FeedError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        let next = self
            .responses
            .lock()
            .expect("script lock should not be poisoned")
            .pop_front();
        next.unwrap_or_else(|| self.fallback.clone())
    }
}

pub struct CannedResponse {
    pub status_line: &'static str,
    pub body: String,
}

impl CannedResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status_line: "200 OK",
            body: body.into(),
        }
    }

    pub fn status(status_line: &'static str, body: impl Into<String>) -> Self {
        Self {
            status_line,
            body: body.into(),
        }
    }
}

/// Serves `responses` one connection at a time and records each raw request head.
pub async fn spawn_feed_server(responses: Vec<CannedResponse>) -> (String, Arc<Mutex<Vec<String>>>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind should succeed");
    let address = listener.local_addr().expect("local addr should exist");
    let requests = Arc::new(Mutex::new(Vec::new()));
    let captured = Arc::clone(&requests);

    tokio::spawn(async move {
        for canned in responses {
            let (mut stream, _) = listener.accept().await.expect("accept should succeed");
            let head = read_request_head(&mut stream).await;
            captured
                .lock()
                .expect("capture lock should not be poisoned")
                .push(head);

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Length: {}\r\nContent-Type: application/json\r\nConnection: close\r\n\r\n{}",
                canned.status_line,
                canned.body.len(),
                canned.body
            );
            stream
                .write_all(response.as_bytes())
                .await
                .expect("response should be written");
            let _ = stream.shutdown().await;
        }
    });

    (format!("http://{}", address), requests)
}

/// Accepts connections and never answers them.
pub async fn spawn_silent_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind should succeed");
    let address = listener.local_addr().expect("local addr should exist");

    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((stream, _)) = listener.accept().await {
            held.push(stream);
        }
    });

    format!("http://{}", address)
}

async fn read_request_head(stream: &mut tokio::net::TcpStream) -> String {
    let mut head = Vec::new();
    let mut chunk = [0u8; 1024];
    while !head.windows(4).any(|window| window == b"\r\n\r\n") {
        let read = stream.read(&mut chunk).await.expect("request should be readable");
        if read == 0 {
            break;
        }
        head.extend_from_slice(&chunk[..read]);
    }
    String::from_utf8_lossy(&head).to_string()
}
