//! Stock-image selector: maps keywords to one of a fixed set of Pexels photos.
//!
//! Hash-mod-N over UTF-16 code units: stable per keyword set, no relevance
//! ranking. Different keyword sets landing on the same photo is expected.

/// Picks the photo URL for `keywords`, falling back to `topic` when the
/// keywords normalise to nothing. Returns `None` only for an empty catalog.
pub fn select_image_url(keywords: Option<&str>, topic: &str, photo_ids: &[u64]) -> Option<String> {
    if photo_ids.is_empty() {
        return None;
    }

    let source = keywords.filter(|k| !k.trim().is_empty()).unwrap_or(topic);
    let mut key = normalize_keywords(source);
    if key.is_empty() {
        key = topic.to_lowercase();
    }

    let index = (keyword_hash(&key) % photo_ids.len() as u64) as usize;
    Some(pexels_url(photo_ids[index]))
}

/// First two comma-separated terms, trimmed and lower-cased, joined with `,`.
fn normalize_keywords(keywords: &str) -> String {
    keywords
        .split(',')
        .take(2)
        .map(|k| k.trim().to_lowercase())
        .collect::<Vec<_>>()
        .join(",")
}

/// Sum of UTF-16 code units.
fn keyword_hash(key: &str) -> u64 {
    key.encode_utf16().map(u64::from).sum()
}

fn pexels_url(photo_id: u64) -> String {
    format!(
        "https://images.pexels.com/photos/{photo_id}/pexels-photo-{photo_id}.jpeg?auto=compress&cs=tinysrgb&w=1600&h=900&fit=crop"
    )
}
