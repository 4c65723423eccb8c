//! Iconset engine: domain sources, icon discovery and ranking over HTTP.
mod decode;
mod discovery;
mod fetch;
mod filter;
mod image_probe;
mod persist;
mod pipeline;
mod ranker;
mod source;
mod types;

pub use decode::{decode_document, DecodedDocument};
pub use discovery::{extract_candidates, IconDiscovery};
pub use fetch::{
    FetchSettings, Fetcher, ReqwestFetcher, DEFAULT_REQUEST_TIMEOUT, FIREFOX_UA, IPHONE_UA,
};
pub use filter::{
    default_exclusions, read_host_list, DomainFilter, HostListClassifier, NoNsfwClassifier,
    NsfwClassifier, Skip, DEFAULT_EXCLUDED_DOMAINS,
};
pub use image_probe::{effective_width, HeaderImageDecoder, ImageDecoder, ImageProbeError};
pub use persist::{
    check_dataset_target, load_site_results, save_site_results, AtomicFileWriter, DatasetError,
    PersistError,
};
pub use pipeline::{Orchestrator, PipelineError, RunOptions, DEFAULT_COUNT};
pub use ranker::IconRanker;
pub use source::{
    parse_domain_rows, parse_ranked_list, DomainSource, LabelPolicy, RankedListProvider,
    RemoteRankedList, SourceError, DEFAULT_ARCHIVE_ENTRY, DEFAULT_EXTRA_DOMAINS,
    DEFAULT_TOP_SITES_URL,
};
pub use types::{FetchError, FetchMetadata, FetchOutput};
