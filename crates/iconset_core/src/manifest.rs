use std::collections::{BTreeSet, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::SiteResult;

/// Default raster width threshold in pixels.
pub const DEFAULT_MIN_WIDTH: u32 = 96;

/// Hostnames that must never appear in a manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionList {
    hosts: BTreeSet<String>,
}

impl ExclusionList {
    pub fn new<I, S>(hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list = Self::default();
        list.extend(hosts);
        list
    }

    pub fn extend<I, S>(&mut self, hosts: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.hosts.extend(
            hosts
                .into_iter()
                .map(|host| host.as_ref().trim().to_ascii_lowercase())
                .filter(|host| !host.is_empty()),
        );
    }

    pub fn contains(&self, hostname: &str) -> bool {
        self.hosts.contains(&hostname.trim().to_ascii_lowercase())
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }
}

/// One icon and every domain that resolved to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub image_url: String,
    pub domains: Vec<String>,
}

/// Pure aggregation of site results into manifest entries.
#[derive(Debug, Clone)]
pub struct ManifestBuilder {
    min_width: u32,
    exclusions: ExclusionList,
}

impl Default for ManifestBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_WIDTH)
    }
}

impl ManifestBuilder {
    pub fn new(min_width: u32) -> Self {
        Self {
            min_width,
            exclusions: ExclusionList::default(),
        }
    }

    pub fn with_exclusions(mut self, exclusions: ExclusionList) -> Self {
        self.exclusions = exclusions;
        self
    }

    /// Group qualifying sites by icon URL, ordered by each group's first domain.
    pub fn build(&self, results: &[SiteResult]) -> Vec<ManifestEntry> {
        let mut entries: Vec<ManifestEntry> = Vec::new();
        let mut by_url: HashMap<String, usize> = HashMap::new();
        let mut seen_hosts: HashSet<&str> = HashSet::new();

        for site in results {
            let Some(icon) = site.best_icon.as_ref() else {
                continue;
            };
            if !icon.width.meets(self.min_width) || self.exclusions.contains(&site.hostname) {
                continue;
            }
            if !seen_hosts.insert(site.hostname.as_str()) {
                continue;
            }

            let image_url = match icon.url.strip_prefix("//") {
                Some(rest) => format!("https://{rest}"),
                None => icon.url.clone(),
            };
            match by_url.get(&image_url) {
                Some(&index) => entries[index].domains.push(site.hostname.clone()),
                None => {
                    by_url.insert(image_url.clone(), entries.len());
                    entries.push(ManifestEntry {
                        image_url,
                        domains: vec![site.hostname.clone()],
                    });
                }
            }
        }

        // Stable: groups with the same first domain keep first-seen order.
        entries.sort_by(|a, b| a.domains[0].cmp(&b.domains[0]));
        entries
    }
}
