use std::sync::Once;

use iconset_core::{
    ExclusionList, IconWidth, ManifestBuilder, ManifestEntry, Rank, ResolvedIcon, SiteResult,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(engine_logging::initialize_for_tests);
}

fn site(hostname: &str, icon: Option<(&str, IconWidth)>) -> SiteResult {
    SiteResult {
        hostname: hostname.to_string(),
        url: format!("https://{hostname}"),
        rank: Rank::Ranked(1),
        candidates: Vec::new(),
        best_icon: icon.map(|(url, width)| ResolvedIcon {
            url: url.to_string(),
            width,
        }),
    }
}

fn entry(image_url: &str, domains: &[&str]) -> ManifestEntry {
    ManifestEntry {
        image_url: image_url.to_string(),
        domains: domains.iter().map(|d| d.to_string()).collect(),
    }
}

#[test]
fn sites_without_icon_are_dropped() {
    init_logging();
    let results = vec![site("nothing.com", None)];
    assert!(ManifestBuilder::new(0).build(&results).is_empty());
}

#[test]
fn raster_width_threshold_is_inclusive() {
    init_logging();
    let results = vec![
        site("small.com", Some(("https://small.com/a.png", IconWidth::Pixels(95)))),
        site("exact.com", Some(("https://exact.com/a.png", IconWidth::Pixels(96)))),
    ];
    assert_eq!(
        ManifestBuilder::new(96).build(&results),
        vec![entry("https://exact.com/a.png", &["exact.com"])]
    );
}

#[test]
fn vector_icons_ignore_threshold() {
    init_logging();
    let results = vec![site(
        "vector.com",
        Some(("https://vector.com/a.svg", IconWidth::Vector)),
    )];
    assert_eq!(
        ManifestBuilder::new(10_000).build(&results),
        vec![entry("https://vector.com/a.svg", &["vector.com"])]
    );
}

#[test]
fn shared_icon_urls_collapse_in_first_seen_order() {
    init_logging();
    let shared = "https://cdn.example/icon.svg";
    let results = vec![
        site("b.com", Some((shared, IconWidth::Vector))),
        site("c.com", Some(("https://c.com/c.png", IconWidth::Pixels(192)))),
        site("a.com", Some((shared, IconWidth::Vector))),
    ];
    assert_eq!(
        ManifestBuilder::default().build(&results),
        vec![
            entry(shared, &["b.com", "a.com"]),
            entry("https://c.com/c.png", &["c.com"]),
        ]
    );
}

#[test]
fn entries_sorted_by_first_domain() {
    init_logging();
    let results = vec![
        site("zeta.org", Some(("https://zeta.org/z.png", IconWidth::Pixels(128)))),
        site("alpha.org", Some(("https://alpha.org/a.png", IconWidth::Pixels(128)))),
        site("mid.org", Some(("https://mid.org/m.png", IconWidth::Pixels(128)))),
    ];
    let firsts: Vec<String> = ManifestBuilder::default()
        .build(&results)
        .into_iter()
        .map(|e| e.domains[0].clone())
        .collect();
    assert_eq!(firsts, vec!["alpha.org", "mid.org", "zeta.org"]);
}

#[test]
fn two_domains_sharing_an_svg_make_one_entry() {
    init_logging();
    let url = "https://cdn.example/icon.svg";
    let results = vec![
        site("a.com", Some((url, IconWidth::Vector))),
        site("b.com", Some((url, IconWidth::Vector))),
    ];
    let manifest = ManifestBuilder::default().build(&results);
    assert_eq!(manifest, vec![entry(url, &["a.com", "b.com"])]);
    assert_eq!(
        serde_json::to_value(&manifest).unwrap(),
        serde_json::json!([{ "image_url": url, "domains": ["a.com", "b.com"] }])
    );
}

#[test]
fn excluded_and_repeated_hosts_are_skipped() {
    init_logging();
    let results = vec![
        site("ok.com", Some(("https://ok.com/1.png", IconWidth::Pixels(128)))),
        site("ok.com", Some(("https://ok.com/2.png", IconWidth::Pixels(256)))),
        site("Blocked.COM", Some(("https://blocked.com/b.png", IconWidth::Pixels(512)))),
    ];
    let builder =
        ManifestBuilder::new(96).with_exclusions(ExclusionList::new(["blocked.com"]));
    assert_eq!(
        builder.build(&results),
        vec![entry("https://ok.com/1.png", &["ok.com"])]
    );
}

#[test]
fn threshold_applies_per_domain_within_a_group() {
    init_logging();
    let url = "https://cdn.example/shared.png";
    let results = vec![
        site("big.com", Some((url, IconWidth::Pixels(128)))),
        // Same URL but declared smaller for this site.
        site("tiny.com", Some((url, IconWidth::Pixels(16)))),
    ];
    assert_eq!(
        ManifestBuilder::new(96).build(&results),
        vec![entry(url, &["big.com"])]
    );
}

#[test]
fn protocol_relative_icons_are_published_over_https() {
    init_logging();
    let results = vec![
        site("a.com", Some(("//cdn.example/icon.svg", IconWidth::Vector))),
        site("b.com", Some(("https://cdn.example/icon.svg", IconWidth::Vector))),
    ];
    assert_eq!(
        ManifestBuilder::new(96).build(&results),
        vec![entry("https://cdn.example/icon.svg", &["a.com", "b.com"])]
    );
}
