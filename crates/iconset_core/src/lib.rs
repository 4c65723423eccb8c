//! Iconset core: data model and pure manifest aggregation.
mod manifest;
mod model;

pub use manifest::{ExclusionList, ManifestBuilder, ManifestEntry, DEFAULT_MIN_WIDTH};
pub use model::{IconCandidate, IconWidth, RankedDomain, Rank, ResolvedIcon, SiteResult};
