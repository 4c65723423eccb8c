#![allow(dead_code)]

use std::collections::HashMap;
use std::io::Cursor;
use std::sync::{Arc, Mutex, Once};

use iconset_core::RankedDomain;
use iconset_engine::{
    FetchError, FetchMetadata, FetchOutput, Fetcher, RankedListProvider, SourceError,
};
use image::{ImageFormat, RgbaImage};

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(engine_logging::initialize_for_tests);
}

/// In-memory fetcher: unknown URLs fail with a network error.
#[derive(Default)]
pub struct FakeFetcher {
    routes: HashMap<String, Result<FetchOutput, FetchError>>,
    requests: Mutex<Vec<String>>,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn html(self, url: &str, body: &str) -> Self {
        self.redirected_html(url, url, body)
    }

    pub fn redirected_html(self, url: &str, final_url: &str, body: &str) -> Self {
        self.respond(url, final_url, 200, Some("text/html; charset=utf-8"), body.as_bytes())
    }

    pub fn asset(self, url: &str, content_type: &str, bytes: &[u8]) -> Self {
        self.respond(url, url, 200, Some(content_type), bytes)
    }

    pub fn png(self, url: &str, width: u32, height: u32) -> Self {
        self.asset(url, "image/png", &png(width, height))
    }

    pub fn svg(self, url: &str) -> Self {
        self.asset(url, "image/svg+xml", b"<svg xmlns=\"http://www.w3.org/2000/svg\"/>")
    }

    pub fn status(mut self, url: &str, status: u16) -> Self {
        self.routes
            .insert(url.to_string(), Err(FetchError::Status(status)));
        self
    }

    pub fn respond(
        mut self,
        url: &str,
        final_url: &str,
        status: u16,
        content_type: Option<&str>,
        bytes: &[u8],
    ) -> Self {
        let output = FetchOutput {
            bytes: bytes.to_vec(),
            metadata: FetchMetadata {
                requested_url: url.to_string(),
                final_url: final_url.to_string(),
                status,
                content_type: content_type.map(str::to_string),
            },
        };
        self.routes.insert(url.to_string(), Ok(output));
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }
}

#[async_trait::async_trait]
impl Fetcher for FakeFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchOutput, FetchError> {
        self.requests.lock().unwrap().push(url.to_string());
        self.routes
            .get(url)
            .cloned()
            .unwrap_or_else(|| Err(FetchError::Transport(format!("no route to {url}"))))
    }
}

/// Ranked list provider with a fixed answer.
pub struct StaticProvider(pub Vec<RankedDomain>);

#[async_trait::async_trait]
impl RankedListProvider for StaticProvider {
    async fn fetch(&self) -> Result<Vec<RankedDomain>, SourceError> {
        Ok(self.0.clone())
    }
}

pub fn png(width: u32, height: u32) -> Vec<u8> {
    let mut bytes = Vec::new();
    RgbaImage::new(width, height)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}
