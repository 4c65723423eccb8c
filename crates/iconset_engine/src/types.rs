/// Body and response details of a successful GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutput {
    pub bytes: Vec<u8>,
    pub metadata: FetchMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchMetadata {
    pub requested_url: String,
    /// Where the redirect chain ended.
    pub final_url: String,
    pub status: u16,
    pub content_type: Option<String>,
}

impl FetchMetadata {
    /// Lowercased MIME type without parameters, e.g. `image/svg+xml`.
    pub fn mime_essence(&self) -> Option<String> {
        self.content_type
            .as_deref()
            .map(mime_essence)
            .filter(|essence| !essence.is_empty())
    }
}

pub(crate) fn mime_essence(content_type: &str) -> String {
    let essence = match content_type.split_once(';') {
        Some((head, _)) => head,
        None => content_type,
    };
    essence.trim().to_ascii_lowercase()
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("invalid url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("server answered {0}")]
    Status(u16),
    #[error("request timed out")]
    Timeout,
    #[error("gave up after {limit} redirects")]
    TooManyRedirects { limit: usize },
    #[error("body larger than {limit} bytes")]
    TooLarge { limit: u64 },
    #[error("unexpected content type {0}")]
    ContentType(String),
    #[error("transport: {0}")]
    Transport(String),
}
