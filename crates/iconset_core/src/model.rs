use std::fmt;

use serde::{Deserialize, Serialize};

/// Position of a domain in the ranked top-sites list.
///
/// Stored as a plain integer on disk; `Unranked` is written as `-1` and any
/// negative value reads back as `Unranked`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum Rank {
    Ranked(u32),
    Unranked,
}

impl Rank {
    pub fn value(self) -> Option<u32> {
        match self {
            Rank::Ranked(rank) => Some(rank),
            Rank::Unranked => None,
        }
    }
}

impl From<i64> for Rank {
    fn from(raw: i64) -> Self {
        u32::try_from(raw).map_or(Rank::Unranked, Rank::Ranked)
    }
}

impl From<Rank> for i64 {
    fn from(rank: Rank) -> Self {
        match rank {
            Rank::Ranked(rank) => i64::from(rank),
            Rank::Unranked => -1,
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rank::Ranked(rank) => write!(f, "#{rank}"),
            Rank::Unranked => write!(f, "extra"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedDomain {
    pub rank: Rank,
    pub hostname: String,
}

impl RankedDomain {
    pub fn new(rank: Rank, hostname: impl Into<String>) -> Self {
        Self {
            rank,
            hostname: hostname.into(),
        }
    }
}

/// A declared or inferred icon reference, before its size is confirmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconCandidate {
    pub href: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sizes: Option<String>,
    #[serde(default)]
    pub masked: bool,
}

impl IconCandidate {
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            sizes: None,
            masked: false,
        }
    }

    pub fn with_sizes(mut self, sizes: impl Into<String>) -> Self {
        self.sizes = Some(sizes.into());
        self
    }

    pub fn masked(mut self) -> Self {
        self.masked = true;
        self
    }

    /// Width declared by the `sizes` hint, if it reads as `<W>x<H>`.
    ///
    /// Only the first of several space-separated sizes is considered.
    pub fn declared_width(&self) -> Option<u32> {
        let first = self.sizes.as_deref()?.split_whitespace().next()?;
        let (width, height) = first.split_once(['x', 'X'])?;
        height.trim().parse::<u32>().ok()?;
        width.trim().parse().ok()
    }

    /// Absolute URL for fetching; anything not already `http(s)` is treated
    /// as protocol-relative and gets `https:` prepended.
    pub fn absolute_href(&self) -> String {
        if self.href.starts_with("http") {
            self.href.clone()
        } else {
            format!("https:{}", self.href)
        }
    }
}

/// Measured width of an icon. `Vector` outranks every pixel width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "WidthRepr", into = "WidthRepr")]
pub enum IconWidth {
    Pixels(u32),
    Vector,
}

const VECTOR_TAG: &str = "vector";

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum WidthRepr {
    Pixels(u32),
    Tag(String),
}

impl TryFrom<WidthRepr> for IconWidth {
    type Error = String;

    fn try_from(repr: WidthRepr) -> Result<Self, Self::Error> {
        match repr {
            WidthRepr::Pixels(px) => Ok(IconWidth::Pixels(px)),
            WidthRepr::Tag(tag) if tag == VECTOR_TAG => Ok(IconWidth::Vector),
            WidthRepr::Tag(tag) => Err(format!("unknown icon width {tag:?}")),
        }
    }
}

impl From<IconWidth> for WidthRepr {
    fn from(width: IconWidth) -> Self {
        match width {
            IconWidth::Pixels(px) => WidthRepr::Pixels(px),
            IconWidth::Vector => WidthRepr::Tag(VECTOR_TAG.to_string()),
        }
    }
}

impl IconWidth {
    /// Whether the icon is usable under a minimum raster width.
    pub fn meets(self, min_width: u32) -> bool {
        match self {
            IconWidth::Vector => true,
            IconWidth::Pixels(px) => px >= min_width,
        }
    }
}

impl fmt::Display for IconWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IconWidth::Pixels(px) => write!(f, "{px}px"),
            IconWidth::Vector => write!(f, "{VECTOR_TAG}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedIcon {
    pub url: String,
    pub width: IconWidth,
}

/// Per-domain discovery and ranking result; the unit of the raw dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteResult {
    pub hostname: String,
    pub url: String,
    pub rank: Rank,
    #[serde(default)]
    pub candidates: Vec<IconCandidate>,
    #[serde(default)]
    pub best_icon: Option<ResolvedIcon>,
}
