use std::collections::HashSet;
use std::fs;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use engine_logging::{engine_debug, engine_info};
use iconset_core::{Rank, RankedDomain};
use zip::ZipArchive;

use crate::{FetchError, Fetcher};

pub const DEFAULT_TOP_SITES_URL: &str = "http://s3.amazonaws.com/alexa-static/top-1m.csv.zip";
pub const DEFAULT_ARCHIVE_ENTRY: &str = "top-1m.csv";
/// Always included when no extra-domains file is given.
pub const DEFAULT_EXTRA_DOMAINS: &[&str] = &["mail.google.com", "go.twitch.tv"];

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

/// The domain list could not be produced. Always fatal for a run.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("ranked list unavailable: {0}")]
    Fetch(#[from] FetchError),
    #[error("cannot read {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("unreadable ranked list archive: {0}")]
    Archive(String),
    #[error("{origin} line {line}: {message}")]
    Parse {
        origin: String,
        line: usize,
        message: String,
    },
}

/// A provider of `(rank, hostname)` rows, in any order.
#[async_trait::async_trait]
pub trait RankedListProvider: Send + Sync {
    async fn fetch(&self) -> Result<Vec<RankedDomain>, SourceError>;
}

/// Downloads a zipped `rank,hostname` CSV (plain CSV bodies are accepted too).
pub struct RemoteRankedList {
    fetcher: Arc<dyn Fetcher>,
    url: String,
    entry: String,
}

impl RemoteRankedList {
    pub fn new(fetcher: Arc<dyn Fetcher>, url: impl Into<String>) -> Self {
        Self {
            fetcher,
            url: url.into(),
            entry: DEFAULT_ARCHIVE_ENTRY.to_string(),
        }
    }

    pub fn with_entry(mut self, entry: impl Into<String>) -> Self {
        self.entry = entry.into();
        self
    }
}

#[async_trait::async_trait]
impl RankedListProvider for RemoteRankedList {
    async fn fetch(&self) -> Result<Vec<RankedDomain>, SourceError> {
        engine_info!("Fetching ranked list from {}", self.url);
        let output = self.fetcher.fetch(&self.url).await?;
        let text = unpack_list(&output.bytes, &self.entry)?;
        parse_ranked_list(&text, &self.url)
    }
}

fn unpack_list(bytes: &[u8], entry: &str) -> Result<String, SourceError> {
    if !bytes.starts_with(ZIP_MAGIC) {
        return Ok(String::from_utf8_lossy(bytes).into_owned());
    }

    let archive_err = |err: zip::result::ZipError| SourceError::Archive(err.to_string());
    let mut archive = ZipArchive::new(Cursor::new(bytes)).map_err(archive_err)?;
    let has_entry = archive.file_names().any(|name| name == entry);
    let file = if has_entry {
        archive.by_name(entry)
    } else {
        engine_debug!("archive has no {entry}, reading its first entry");
        archive.by_index(0)
    };
    let mut file = file.map_err(archive_err)?;

    let mut text = String::new();
    file.read_to_string(&mut text)
        .map_err(|err| SourceError::Archive(err.to_string()))?;
    Ok(text)
}

/// Parse strict `rank,hostname` rows. A non-numeric first line is a header.
pub fn parse_ranked_list(text: &str, origin: &str) -> Result<Vec<RankedDomain>, SourceError> {
    let mut domains = Vec::new();
    let mut first_row = true;
    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let header_allowed = std::mem::replace(&mut first_row, false);
        let parse_err = |message: &str| SourceError::Parse {
            origin: origin.to_string(),
            line: index + 1,
            message: message.to_string(),
        };
        let (rank, hostname) = line
            .split_once(',')
            .ok_or_else(|| parse_err("expected rank,hostname"))?;
        let rank = match rank.trim().parse::<u32>() {
            Ok(rank) => rank,
            Err(_) if header_allowed => continue,
            Err(_) => return Err(parse_err("rank is not a number")),
        };
        let hostname = normalize_hostname(hostname);
        if hostname.is_empty() {
            return Err(parse_err("empty hostname"));
        }
        domains.push(RankedDomain::new(Rank::Ranked(rank), hostname));
    }
    Ok(domains)
}

/// How the first column of a local CSV is interpreted when it is not a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelPolicy {
    /// Use the 1-based row position as the rank.
    Position,
    /// Mark the row as unranked.
    Unranked,
}

/// Parse `(rank_or_label, hostname)` rows from a local file.
///
/// A row without a comma is taken as a bare hostname.
pub fn parse_domain_rows(
    text: &str,
    origin: &str,
    labels: LabelPolicy,
) -> Result<Vec<RankedDomain>, SourceError> {
    let mut domains = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (label, hostname) = match line.split_once(',') {
            Some((label, hostname)) => (Some(label.trim()), hostname),
            None => (None, line),
        };
        let hostname = normalize_hostname(hostname);
        if hostname.is_empty() {
            return Err(SourceError::Parse {
                origin: origin.to_string(),
                line: index + 1,
                message: "empty hostname".to_string(),
            });
        }

        let position = domains.len() as u32 + 1;
        let rank = match (label.and_then(|l| l.parse::<i64>().ok()), labels) {
            (Some(rank), _) => Rank::from(rank),
            (None, LabelPolicy::Position) => Rank::Ranked(position),
            (None, LabelPolicy::Unranked) => Rank::Unranked,
        };
        domains.push(RankedDomain::new(rank, hostname));
    }
    Ok(domains)
}

fn normalize_hostname(raw: &str) -> String {
    raw.trim().trim_end_matches('.').to_ascii_lowercase()
}

fn read_rows(path: &Path, labels: LabelPolicy) -> Result<Vec<RankedDomain>, SourceError> {
    let text = fs::read_to_string(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_domain_rows(&text, &path.display().to_string(), labels)
}

/// Produces the ordered domain list for a run: `count` ranked domains
/// followed by every extra domain, without repeats.
pub struct DomainSource {
    provider: Arc<dyn RankedListProvider>,
    top_sites_file: Option<PathBuf>,
    extra_file: Option<PathBuf>,
}

impl DomainSource {
    pub fn new(provider: Arc<dyn RankedListProvider>) -> Self {
        Self {
            provider,
            top_sites_file: None,
            extra_file: None,
        }
    }

    pub fn with_top_sites_file(mut self, path: Option<PathBuf>) -> Self {
        self.top_sites_file = path;
        self
    }

    pub fn with_extra_file(mut self, path: Option<PathBuf>) -> Self {
        self.extra_file = path;
        self
    }

    pub async fn domains(&self, count: usize) -> Result<Vec<RankedDomain>, SourceError> {
        let mut ranked = match self.top_sites_file.as_deref() {
            Some(path) => {
                engine_info!("Reading top {count} sites from {:?}", path);
                read_rows(path, LabelPolicy::Position)?
            }
            None => {
                let mut rows = self.provider.fetch().await?;
                rows.sort_by_key(|domain| domain.rank.value().unwrap_or(u32::MAX));
                rows
            }
        };
        ranked.truncate(count);

        let extras = match self.extra_file.as_deref() {
            Some(path) => read_rows(path, LabelPolicy::Unranked)?,
            None => DEFAULT_EXTRA_DOMAINS
                .iter()
                .map(|host| RankedDomain::new(Rank::Unranked, *host))
                .collect(),
        };

        let mut seen = HashSet::new();
        let domains: Vec<RankedDomain> = ranked
            .into_iter()
            .chain(extras)
            .filter(|domain| seen.insert(domain.hostname.clone()))
            .collect();
        engine_info!("Domain list has {} entries", domains.len());
        Ok(domains)
    }
}
