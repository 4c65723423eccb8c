use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use engine_logging::{engine_error, engine_info, LogSettings};
use iconset_engine::{
    default_exclusions, read_host_list, DomainFilter, FetchSettings, HeaderImageDecoder,
    HostListClassifier, IconDiscovery, IconRanker, NoNsfwClassifier, NsfwClassifier,
    Orchestrator, RemoteRankedList, ReqwestFetcher, RunOptions,
};
use log::LevelFilter;

use crate::cli::Cli;
use crate::output::render_manifest;

pub fn run(cli: Cli) -> anyhow::Result<()> {
    engine_logging::initialize(&LogSettings {
        file: Some(cli.log_file.clone()),
        file_level: LevelFilter::Debug,
        terminal_level: if cli.verbose {
            LevelFilter::Info
        } else {
            LevelFilter::Warn
        },
    });

    let orchestrator = build_orchestrator(&cli)?;
    let options = RunOptions {
        count: cli.count,
        min_width: cli.min_width,
        top_sites_file: cli.top_sites_file,
        extra_file: cli.extra_file,
        load_path: cli.load_raw,
        save_path: cli.save_raw,
        concurrency: usize::from(cli.concurrency),
    };

    let runtime = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;
    let manifest = runtime
        .block_on(orchestrator.run(&options))
        .inspect_err(|err| engine_error!("Run failed: {err}"))
        .context("could not build the icon manifest")?;

    let rendered = render_manifest(&manifest).context("failed to serialize manifest")?;
    println!("{rendered}");
    engine_info!("Wrote manifest with {} entries", manifest.len());
    Ok(())
}

fn build_orchestrator(cli: &Cli) -> anyhow::Result<Orchestrator> {
    let mut exclusions = default_exclusions();
    if let Some(path) = cli.exclude_file.as_deref() {
        let hosts = read_host_list(path)
            .with_context(|| format!("cannot read exclusion list {}", path.display()))?;
        exclusions.extend(hosts);
    }

    let classifier: Arc<dyn NsfwClassifier> = match cli.nsfw_list.as_deref() {
        Some(path) => {
            let hosts = read_host_list(path)
                .with_context(|| format!("cannot read NSFW list {}", path.display()))?;
            Arc::new(HostListClassifier::new(hosts))
        }
        None => Arc::new(NoNsfwClassifier),
    };

    let timeout = Duration::from_secs(cli.timeout_secs);
    let documents = Arc::new(
        ReqwestFetcher::new(FetchSettings::for_documents().with_request_timeout(timeout))
            .context("cannot build document client")?,
    );
    let assets = Arc::new(
        ReqwestFetcher::new(FetchSettings::for_assets().with_request_timeout(timeout))
            .context("cannot build asset client")?,
    );
    let lists = Arc::new(
        ReqwestFetcher::new(FetchSettings::for_ranked_list())
            .context("cannot build ranked list client")?,
    );

    Ok(Orchestrator::new(
        Arc::new(
            RemoteRankedList::new(lists, cli.top_sites_url.clone())
                .with_entry(cli.top_sites_entry.clone()),
        ),
        IconDiscovery::new(documents, assets.clone()),
        IconRanker::new(assets, Arc::new(HeaderImageDecoder)),
        DomainFilter::new(exclusions, classifier),
    ))
}
