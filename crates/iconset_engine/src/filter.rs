use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use iconset_core::ExclusionList;

/// Hosts that never belong in a manifest: ad networks, CDNs, and
/// regional blog mirrors that show up high in traffic rankings.
pub const DEFAULT_EXCLUDED_DOMAINS: &[&str] = &[
    "higheurest.com",
    "blogspot.co.id",
    "pipeschannels.com",
    "blogspot.mx",
    "bestadbid.com",
    "googlevideo.com",
    "tqeobp89axcn.com",
    "ioredi.com",
    "moradu.com",
    "fedsit.com",
    "vebadu.com",
];

pub fn default_exclusions() -> ExclusionList {
    ExclusionList::new(DEFAULT_EXCLUDED_DOMAINS)
}

/// Read one hostname per line; blank lines and `#` comments are ignored.
pub fn read_host_list(path: &Path) -> std::io::Result<Vec<String>> {
    let text = fs::read_to_string(path)?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_ascii_lowercase)
        .collect())
}

/// Decides whether a domain serves adult content.
///
/// Implementations must not fail; an internal error means "not NSFW".
pub trait NsfwClassifier: Send + Sync {
    fn is_nsfw(&self, hostname: &str) -> bool;
}

/// Flags nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoNsfwClassifier;

impl NsfwClassifier for NoNsfwClassifier {
    fn is_nsfw(&self, _hostname: &str) -> bool {
        false
    }
}

/// Flags a fixed set of hostnames and their subdomains.
#[derive(Debug, Default, Clone)]
pub struct HostListClassifier {
    hosts: HashSet<String>,
}

impl HostListClassifier {
    pub fn new<I, S>(hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            hosts: hosts
                .into_iter()
                .map(|host| host.into().to_ascii_lowercase())
                .collect(),
        }
    }
}

impl NsfwClassifier for HostListClassifier {
    fn is_nsfw(&self, hostname: &str) -> bool {
        let hostname = hostname.to_ascii_lowercase();
        let mut rest = hostname.as_str();
        loop {
            if self.hosts.contains(rest) {
                return true;
            }
            match rest.split_once('.') {
                Some((_, parent)) if parent.contains('.') => rest = parent,
                _ => return false,
            }
        }
    }
}

/// Why a domain was left out of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Skip {
    Excluded,
    Nsfw,
}

/// Static exclusion list plus the injected classifier.
#[derive(Clone)]
pub struct DomainFilter {
    exclusions: ExclusionList,
    classifier: Arc<dyn NsfwClassifier>,
}

impl DomainFilter {
    pub fn new(exclusions: ExclusionList, classifier: Arc<dyn NsfwClassifier>) -> Self {
        Self {
            exclusions,
            classifier,
        }
    }

    pub fn exclusions(&self) -> &ExclusionList {
        &self.exclusions
    }

    pub fn check(&self, hostname: &str) -> Option<Skip> {
        if self.exclusions.contains(hostname) {
            Some(Skip::Excluded)
        } else if self.classifier.is_nsfw(hostname) {
            Some(Skip::Nsfw)
        } else {
            None
        }
    }
}

impl Default for DomainFilter {
    fn default() -> Self {
        Self::new(default_exclusions(), Arc::new(NoNsfwClassifier))
    }
}
