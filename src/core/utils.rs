use std::sync::OnceLock;

use regex::Regex;

use super::CardId;

/// Separator between folder levels in an Anki deck name.
pub const DECK_SEPARATOR: &str = "::";

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

fn normalize_for_hash(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

fn to_base36(mut value: u32) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }

    let mut digits = Vec::new();
    while value > 0 {
        digits.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    String::from_utf8_lossy(&digits).into_owned()
}

/// Derives the identity of a card from where it lives and what it says.
///
/// Whitespace runs collapse and case folds before hashing, so reflowing a card
/// keeps its identity while any wording change produces a new one. The hash is
/// 32-bit FNV-1a over UTF-16 code units; collisions are accepted, not detected.
pub fn card_id(document_path: &str, front: &str, back: &str) -> CardId {
    // Each part is prefixed with its length so no content can shift a boundary.
    let source = [document_path.to_string(), normalize_for_hash(front), normalize_for_hash(back)]
        .iter()
        .map(|part| format!("{}:{}", part.len(), part))
        .collect::<String>();

    let hash = source.encode_utf16().fold(FNV_OFFSET_BASIS, |hash, unit| {
        (hash ^ u32::from(unit)).wrapping_mul(FNV_PRIME)
    });

    CardId::new(to_base36(hash))
}

fn sanitize_deck_segment(segment: &str) -> String {
    segment.replace(':', "-").trim().to_string()
}

/// Deck mirroring the folders of `document_path` under `root`.
pub fn deck_name(document_path: &str, root: &str) -> String {
    let root = root.trim();
    let mut segments: Vec<&str> = document_path.split('/').collect();
    segments.pop();

    let deck = std::iter::once(root)
        .chain(segments)
        .filter(|segment| !segment.is_empty())
        .map(sanitize_deck_segment)
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join(DECK_SEPARATOR);

    if deck.is_empty() {
        root.to_string()
    } else {
        deck
    }
}

/// File name without its last extension, the way a vault shows it.
pub fn display_title(file_name: &str) -> &str {
    match file_name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => file_name,
    }
}

pub fn breadcrumb(document_path: &str) -> String {
    let mut parts: Vec<&str> = document_path.split('/').collect();
    if let Some(last) = parts.last_mut() {
        *last = display_title(last);
    }
    parts.join(" / ")
}

pub fn deep_link(vault_name: &str, document_path: &str, line_number: usize) -> String {
    format!(
        "obsidian://open?vault={}&file={}&line={}",
        urlencoding::encode(vault_name),
        urlencoding::encode(document_path),
        line_number
    )
}

fn strip_markdown_extension(path: &str) -> &str {
    match path.len().checked_sub(3).and_then(|split| path.get(split..).map(|ext| (split, ext))) {
        Some((split, ext)) if ext.eq_ignore_ascii_case(".md") => &path[..split],
        _ => path,
    }
}

/// Namespaced tag that round-trips a document's location, e.g. `notes::rust::traits`.
pub fn sanitized_path_tag(document_path: &str) -> String {
    static DISALLOWED: OnceLock<Regex> = OnceLock::new();
    let disallowed =
        DISALLOWED.get_or_init(|| Regex::new(r"[^a-z0-9_-]+").expect("static pattern is valid"));

    let normalized = document_path.replace('\\', "/");
    strip_markdown_extension(&normalized)
        .split('/')
        .map(|segment| disallowed.replace_all(&segment.trim().to_lowercase(), "_").into_owned())
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join(DECK_SEPARATOR)
}
