//! Frontmatter extraction for lifecycle artifacts.
//!
//! An artifact may open with a block delimited by `---` lines holding
//! `key: value` pairs. Anything that does not fit that shape yields no keys.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::OnceLock;

pub const SKIPPED_KEY: &str = "skipped";

static KV_RE: OnceLock<Regex> = OnceLock::new();

fn kv_re() -> &'static Regex {
    KV_RE.get_or_init(|| Regex::new(r"^(\w+):\s*(.+)$").unwrap())
}

fn extract_block(content: &str) -> Option<&str> {
    let rest = content.strip_prefix("---")?;
    let rest = if let Some(r) = rest.strip_prefix('\n') {
        r
    } else if let Some(r) = rest.strip_prefix("\r\n") {
        r
    } else {
        return None;
    };
    if rest.starts_with("---") {
        return Some("");
    }
    let end = rest.find("\n---")?;
    Some(&rest[..end])
}

/// Parse the leading frontmatter block into trimmed string values.
///
/// Returns an empty map when the content has no block, an unterminated
/// block, or no well-formed pairs.
pub fn parse(content: &str) -> BTreeMap<String, String> {
    let Some(block) = extract_block(content) else {
        return BTreeMap::new();
    };
    block
        .lines()
        .filter_map(|line| {
            let caps = kv_re().captures(line.trim_end_matches('\r'))?;
            Some((caps[1].to_string(), caps[2].trim().to_string()))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// SkipMarker
// ---------------------------------------------------------------------------

/// The `skipped` frontmatter flag of a discussion or research artifact.
///
/// `Absent` and `NotSkipped` are distinct: an absent marker lets the status
/// assigner infer done/skipped from ordering, `NotSkipped` forces done.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipMarker {
    #[default]
    Absent,
    Skipped,
    NotSkipped,
}

impl SkipMarker {
    pub fn from_content(content: &str) -> Self {
        match parse(content).get(SKIPPED_KEY).map(String::as_str) {
            Some("true") => SkipMarker::Skipped,
            Some("false") => SkipMarker::NotSkipped,
            _ => SkipMarker::Absent,
        }
    }

    pub fn is_present(self) -> bool {
        !matches!(self, SkipMarker::Absent)
    }

    pub fn as_bool(self) -> Option<bool> {
        match self {
            SkipMarker::Absent => None,
            SkipMarker::Skipped => Some(true),
            SkipMarker::NotSkipped => Some(false),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
