use iconset_core::ManifestEntry;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

/// Pretty-print the manifest with four-space indentation.
pub fn render_manifest(manifest: &[ManifestEntry]) -> serde_json::Result<String> {
    let mut buffer = Vec::new();
    let mut serializer =
        Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(b"    "));
    manifest.serialize(&mut serializer)?;
    // serde_json only ever writes valid UTF-8.
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manifest_renders_as_indented_array() {
        let manifest = vec![ManifestEntry {
            image_url: "https://cdn.example/icon.svg".to_string(),
            domains: vec!["a.com".to_string(), "b.com".to_string()],
        }];
        let expected = r#"[
    {
        "image_url": "https://cdn.example/icon.svg",
        "domains": [
            "a.com",
            "b.com"
        ]
    }
]"#;
        assert_eq!(render_manifest(&manifest).unwrap(), expected);
    }

    #[test]
    fn empty_manifest_is_empty_array() {
        assert_eq!(render_manifest(&[]).unwrap(), "[]");
    }
}
