use std::sync::Arc;

use engine_logging::{engine_debug, engine_info, engine_trace};
use iconset_core::{IconCandidate, RankedDomain, SiteResult};
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::decode::decode_document;
use crate::Fetcher;

/// `rel` values (whitespace-normalised, lowercase) that declare a site icon.
const ICON_RELS: &[&str] = &[
    "apple-touch-icon",
    "apple-touch-icon-precomposed",
    "icon shortcut",
    "shortcut icon",
    "icon",
    "fluid-icon",
];

const META_ICON_NAME: &str = "apple-touch-icon";

/// Finds the icon candidates a domain declares on its homepage.
///
/// Every failure collapses to "no candidates"; discovery itself never errors.
#[derive(Clone)]
pub struct IconDiscovery {
    documents: Arc<dyn Fetcher>,
    assets: Arc<dyn Fetcher>,
}

impl IconDiscovery {
    /// `documents` fetches homepages, `assets` probes the default favicon.
    pub fn new(documents: Arc<dyn Fetcher>, assets: Arc<dyn Fetcher>) -> Self {
        Self { documents, assets }
    }

    /// Homepage URLs to try, in order.
    pub fn attempt_urls(hostname: &str) -> Vec<String> {
        let mut urls = vec![format!("https://{hostname}"), format!("http://{hostname}")];
        if !hostname.starts_with("www.") {
            urls.push(format!("https://www.{hostname}"));
        }
        urls
    }

    pub async fn discover(&self, domain: &RankedDomain) -> SiteResult {
        let hostname = domain.hostname.as_str();
        let mut reachable: Option<String> = None;

        for url in Self::attempt_urls(hostname) {
            match self.candidates_at(&url).await {
                Some(candidates) if !candidates.is_empty() => {
                    engine_info!(
                        "{} {}: {} icon candidates at {}",
                        domain.rank,
                        hostname,
                        candidates.len(),
                        url
                    );
                    return site_result(domain, url, candidates);
                }
                Some(_) => {
                    engine_debug!("{hostname}: no icons declared at {url}");
                    reachable.get_or_insert(url);
                }
                None => {}
            }
        }

        let url = reachable.unwrap_or_else(|| format!("https://{hostname}"));
        let candidates = self.probe_default_icon(&url).await.into_iter().collect::<Vec<_>>();
        if candidates.is_empty() {
            engine_info!("{} {}: no icon candidates found", domain.rank, hostname);
        }
        site_result(domain, url, candidates)
    }

    /// `None` when the document could not be fetched at all.
    async fn candidates_at(&self, url: &str) -> Option<Vec<IconCandidate>> {
        let output = match self.documents.fetch(url).await {
            Ok(output) => output,
            Err(err) => {
                engine_debug!("fetching {url} failed: {err}");
                return None;
            }
        };

        let decoded = decode_document(&output.bytes, output.metadata.content_type.as_deref());
        if decoded.lossy {
            engine_debug!("{url}: invalid {} sequences replaced", decoded.encoding_label);
        } else {
            engine_trace!("{url}: decoded as {}", decoded.encoding_label);
        }
        let base = match Url::parse(&output.metadata.final_url) {
            Ok(base) => base,
            Err(err) => {
                engine_debug!("unusable final url {}: {err}", output.metadata.final_url);
                return None;
            }
        };
        Some(extract_candidates(&decoded.html, &base))
    }

    async fn probe_default_icon(&self, url: &str) -> Option<IconCandidate> {
        let favicon = format!("{}/favicon.ico", url.trim_end_matches('/'));
        match self.assets.fetch(&favicon).await {
            Ok(output) if output.metadata.status == 200 => {
                engine_debug!("default icon reachable at {favicon}");
                Some(IconCandidate::new(favicon))
            }
            Ok(output) => {
                engine_debug!("default icon at {favicon} answered {}", output.metadata.status);
                None
            }
            Err(err) => {
                engine_debug!("default icon at {favicon} unreachable: {err}");
                None
            }
        }
    }
}

fn site_result(domain: &RankedDomain, url: String, candidates: Vec<IconCandidate>) -> SiteResult {
    SiteResult {
        hostname: domain.hostname.clone(),
        url,
        rank: domain.rank,
        candidates,
        best_icon: None,
    }
}

/// Collect icon links and `apple-touch-icon` meta tags in document order.
///
/// Relative hrefs are resolved against `base`; protocol-relative ones are
/// kept verbatim and `data:` URLs are dropped.
pub fn extract_candidates(html: &str, base: &Url) -> Vec<IconCandidate> {
    let document = Html::parse_document(html);
    let Ok(selector) = Selector::parse("link[rel], meta[name]") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|element| candidate_from(element, base))
        .collect()
}

fn candidate_from(element: ElementRef, base: &Url) -> Option<IconCandidate> {
    let node = element.value();
    let raw_href = match node.name() {
        "link" => {
            let rel = node.attr("rel")?;
            let rel = rel
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
                .to_ascii_lowercase();
            if !ICON_RELS.contains(&rel.as_str()) {
                return None;
            }
            node.attr("href")?
        }
        "meta" => {
            if !node.attr("name")?.trim().eq_ignore_ascii_case(META_ICON_NAME) {
                return None;
            }
            node.attr("content")?
        }
        _ => return None,
    };

    let href = resolve_href(raw_href, base)?;
    Some(IconCandidate {
        href,
        sizes: node
            .attr("sizes")
            .map(str::trim)
            .filter(|sizes| !sizes.is_empty())
            .map(str::to_string),
        masked: node.attr("mask").is_some(),
    })
}

fn resolve_href(raw: &str, base: &Url) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.to_ascii_lowercase().starts_with("data:") {
        return None;
    }
    if trimmed.starts_with("//") {
        return Some(trimmed.to_string());
    }
    let resolved = match Url::parse(trimmed) {
        Ok(url) => url,
        Err(_) => base.join(trimmed).ok()?,
    };
    matches!(resolved.scheme(), "http" | "https").then(|| resolved.to_string())
}
