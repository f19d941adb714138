#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use ivplot::{FetchError, Transport};

/// In-memory transport answering by URL, counting every request.
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<HashMap<String, Result<String, u16>>>,
    delays: Mutex<HashMap<String, Duration>>,
    calls: AtomicUsize,
    urls: Mutex<Vec<String>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, url: &str, body: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert(url.to_string(), Ok(body.to_string()));
        self
    }

    pub fn fail(self, url: &str, status: u16) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert(url.to_string(), Err(status));
        self
    }

    pub fn delay(self, url: &str, delay: Duration) -> Self {
        self.delays.lock().unwrap().insert(url.to_string(), delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn urls(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }
}

impl Transport for MockTransport {
    async fn get(&self, url: &str) -> Result<String, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.urls.lock().unwrap().push(url.to_string());
        let delay = self.delays.lock().unwrap().get(url).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let response = self.responses.lock().unwrap().get(url).cloned();
        match response {
            Some(Ok(body)) => Ok(body),
            Some(Err(status)) => Err(FetchError::Status {
                status,
                body: "error".to_string(),
            }),
            None => Err(FetchError::Status {
                status: 404,
                body: format!("no route for {url}"),
            }),
        }
    }
}

pub const BASE: &str = "http://ivplot.test";

/// 2024-01-01 00:00:00 UTC (09:00 in Tokyo).
pub const T0: i64 = 1_704_067_200;

/// ATM trend payload as the endpoint writes it: a bare `updated_at` line,
/// then two rows.
pub fn bare_meta_trend_body(updated_at: i64) -> String {
    format!(
        "{updated_at}\n\
         {t0},33000,18.5,420,1\n\
         {t1},33250,19.0,415,2\n",
        t0 = T0,
        t1 = T0 + 3600,
    )
}

/// ATM trend payload: meta row, then three rows with a gap in the IV column
/// and one in the price column.
pub fn trend_body(updated_at: i64) -> String {
    format!(
        "{updated_at},,,,\n\
         {t0},33000,18.5,420,1\n\
         {t1},33250,,415,2\n\
         {t2},33250,19.1,,3\n",
        t0 = T0,
        t1 = T0 + 3600,
        t2 = T0 + 7200,
    )
}

/// IV candles; every candle closes at `close`.
pub fn candles_body(count: usize, close: f64) -> String {
    let mut body = String::new();
    for i in 0..count {
        body.push_str(&format!(
            "15.0,21.0,14.5,{close},2024-01-01 {:02}:00:00+09:00\n",
            9 + i
        ));
    }
    body
}
