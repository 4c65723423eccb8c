use std::path::PathBuf;
use std::sync::Arc;

use engine_logging::{engine_info, engine_warn};
use futures_util::stream::{self, StreamExt};
use iconset_core::{ManifestBuilder, ManifestEntry, RankedDomain, SiteResult, DEFAULT_MIN_WIDTH};

use crate::filter::{DomainFilter, Skip};
use crate::persist::{check_dataset_target, load_site_results, save_site_results, DatasetError};
use crate::source::{DomainSource, RankedListProvider, SourceError};
use crate::{IconDiscovery, IconRanker};

pub const DEFAULT_COUNT: usize = 10;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Dataset(#[from] DatasetError),
}

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub count: usize,
    pub min_width: u32,
    pub top_sites_file: Option<PathBuf>,
    pub extra_file: Option<PathBuf>,
    /// Skip discovery and read a previously saved raw dataset.
    pub load_path: Option<PathBuf>,
    pub save_path: Option<PathBuf>,
    /// Domains processed at once; results keep domain order regardless.
    pub concurrency: usize,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            count: DEFAULT_COUNT,
            min_width: DEFAULT_MIN_WIDTH,
            top_sites_file: None,
            extra_file: None,
            load_path: None,
            save_path: None,
            concurrency: 1,
        }
    }
}

/// Wires domain acquisition, discovery, ranking and aggregation together.
pub struct Orchestrator {
    provider: Arc<dyn RankedListProvider>,
    discovery: IconDiscovery,
    ranker: IconRanker,
    filter: DomainFilter,
}

impl Orchestrator {
    pub fn new(
        provider: Arc<dyn RankedListProvider>,
        discovery: IconDiscovery,
        ranker: IconRanker,
        filter: DomainFilter,
    ) -> Self {
        Self {
            provider,
            discovery,
            ranker,
            filter,
        }
    }

    pub async fn run(&self, options: &RunOptions) -> Result<Vec<ManifestEntry>, PipelineError> {
        let results = match options.load_path.as_deref() {
            Some(path) => load_site_results(path)?,
            None => {
                if let Some(path) = options.save_path.as_deref() {
                    check_dataset_target(path)?;
                }
                let domains = DomainSource::new(self.provider.clone())
                    .with_top_sites_file(options.top_sites_file.clone())
                    .with_extra_file(options.extra_file.clone())
                    .domains(options.count)
                    .await?;
                let results = self.collect(&domains, options.concurrency).await;
                if let Some(path) = options.save_path.as_deref() {
                    save_site_results(path, &results)?;
                }
                results
            }
        };

        let manifest = ManifestBuilder::new(options.min_width)
            .with_exclusions(self.filter.exclusions().clone())
            .build(&results);
        engine_info!(
            "Manifest has {} icons for {} sites (min width {})",
            manifest.len(),
            results.len(),
            options.min_width
        );
        Ok(manifest)
    }

    /// Discover and rank every domain the filter lets through, in input order.
    pub async fn collect(&self, domains: &[RankedDomain], concurrency: usize) -> Vec<SiteResult> {
        let admitted: Vec<&RankedDomain> = domains
            .iter()
            .filter(|domain| match self.filter.check(&domain.hostname) {
                Some(Skip::Excluded) => {
                    engine_info!("Skipping excluded domain {}", domain.hostname);
                    false
                }
                Some(Skip::Nsfw) => {
                    engine_info!("Skipping NSFW domain {}", domain.hostname);
                    false
                }
                None => true,
            })
            .collect();

        let results: Vec<SiteResult> = stream::iter(admitted)
            .map(|domain| self.process(domain))
            .buffered(concurrency.max(1))
            .collect()
            .await;

        let missing = results.iter().filter(|r| r.best_icon.is_none()).count();
        if missing > 0 {
            engine_warn!("{missing} of {} domains have no usable icon", results.len());
        }
        engine_info!("Done fetching icons");
        results
    }

    pub async fn process(&self, domain: &RankedDomain) -> SiteResult {
        let mut site = self.discovery.discover(domain).await;
        site.best_icon = self.ranker.rank(&site.candidates).await;
        match site.best_icon.as_ref() {
            Some(icon) => engine_info!(
                "{}: best icon {} ({})",
                site.hostname,
                icon.url,
                icon.width
            ),
            None => engine_info!("{}: no usable icon", site.hostname),
        }
        site
    }
}
