use std::sync::Arc;

use engine_logging::{engine_debug, engine_trace};
use iconset_core::{IconCandidate, IconWidth, ResolvedIcon};

use crate::image_probe::{effective_width, ImageDecoder};
use crate::Fetcher;

const SVG_MIME: &str = "image/svg+xml";

/// What probing a single candidate yielded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Probe {
    Width(u32),
    Vector,
    Skip,
}

/// Picks the best icon out of a domain's candidates.
///
/// An unmasked SVG wins outright and stops the scan. Otherwise the widest
/// raster wins, with the earlier candidate taking ties.
#[derive(Clone)]
pub struct IconRanker {
    assets: Arc<dyn Fetcher>,
    decoder: Arc<dyn ImageDecoder>,
}

impl IconRanker {
    pub fn new(assets: Arc<dyn Fetcher>, decoder: Arc<dyn ImageDecoder>) -> Self {
        Self { assets, decoder }
    }

    pub async fn rank(&self, candidates: &[IconCandidate]) -> Option<ResolvedIcon> {
        let mut best: Option<(String, u32)> = None;

        for candidate in candidates {
            let url = candidate.absolute_href();
            match self.probe(candidate, &url).await {
                Probe::Vector => {
                    engine_debug!("vector icon {url} selected");
                    return Some(ResolvedIcon {
                        url,
                        width: IconWidth::Vector,
                    });
                }
                Probe::Width(width) => {
                    let current = best.as_ref().map_or(0, |(_, w)| *w);
                    if width > current {
                        best = Some((url, width));
                    }
                }
                Probe::Skip => {}
            }
        }

        best.map(|(url, width)| ResolvedIcon {
            url,
            width: IconWidth::Pixels(width),
        })
    }

    async fn probe(&self, candidate: &IconCandidate, url: &str) -> Probe {
        if let Some(width) = candidate.declared_width() {
            engine_trace!("{url}: declared width {width}");
            return Probe::Width(width);
        }

        let output = match self.assets.fetch(url).await {
            Ok(output) => output,
            Err(err) => {
                engine_debug!("skipping {url}: {err}");
                return Probe::Skip;
            }
        };

        if output.metadata.mime_essence().as_deref() == Some(SVG_MIME) {
            if candidate.masked {
                engine_debug!("skipping masked vector icon {url}");
                return Probe::Skip;
            }
            return Probe::Vector;
        }

        match self.decoder.dimensions(&output.bytes) {
            Ok((width, height)) => Probe::Width(effective_width(width, height)),
            Err(err) => {
                engine_debug!("skipping {url}: {err}");
                Probe::Skip
            }
        }
    }
}
