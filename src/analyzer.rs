//! Follow-back Analysis Engine
//!
//! This module computes which followed accounts do not follow back. It is the
//! pure core of the crate: no file, network or environment access happens
//! here, and no step can fail.
//!
//! ## Pipeline
//!
//! 1. **Parse**: each byte buffer is parsed as JSON; unparseable input becomes
//!    an empty mapping (see [`parse_document`])
//! 2. **Scan**: the [`HrefScanner`] collects every `href` string field
//! 3. **Extract**: each href becomes a [`Username`] via [`extract_username`]
//! 4. **Assemble**: non-empty usernames go into a [`FollowerSet`] or a
//!    [`FollowingList`]
//! 5. **Diff**: following minus followers, sorted ascending
//!
//! ## Degradation
//!
//! Bad JSON contributes an empty document, records of the wrong shape
//! contribute nothing, and URLs without a usable username are dropped. The
//! analysis always produces a (possibly empty) sorted result.
//!
//! ## Usage Example
//!
//! ```rust
//! let followers = br#"[{"string_list_data":[{"href":"https://instagram.com/alice"}]}]"#;
//! let following = br#"{"relationships_following":[
//!     {"string_list_data":[{"href":"https://instagram.com/alice"}]},
//!     {"string_list_data":[{"href":"https://instagram.com/bob"}]}
//! ]}"#;
//!
//! let result = follow_audit::analyze(followers, following);
//! assert_eq!(result, vec!["bob"]);
//! ```

use crate::config::Config;
use crate::extract::extract_username;
use crate::models::*;
use crate::scanner::HrefScanner;
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use tracing::{debug, warn};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Parse an export buffer, degrading to an empty mapping on any failure.
pub fn parse_document(bytes: &[u8]) -> RawExportDocument {
    match serde_json::from_slice(strip_bom(bytes)) {
        Ok(value) => value,
        Err(e) => {
            warn!(error = %e, "Export is not valid JSON, treating it as empty");
            Value::Object(Map::new())
        }
    }
}

pub(crate) fn strip_bom(bytes: &[u8]) -> &[u8] {
    bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes)
}

/// Diff engine configured with a scan depth limit.
#[derive(Debug, Clone, Default)]
pub struct FollowAnalyzer {
    scanner: HrefScanner,
}

impl FollowAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scanner(scanner: HrefScanner) -> Self {
        Self { scanner }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::with_scanner(HrefScanner::new(config.limits.max_scan_depth))
    }

    /// Usernames of everyone in a followers document.
    ///
    /// The document is expected to be a sequence of per-account records;
    /// anything else contributes nothing.
    pub fn load_followers(&self, document: &RawExportDocument) -> FollowerSet {
        let mut followers = FollowerSet::new();
        self.extend_followers(&mut followers, document);
        followers
    }

    fn extend_followers(&self, followers: &mut FollowerSet, document: &RawExportDocument) {
        let Value::Array(records) = document else {
            debug!("Followers export is not a list, skipping it");
            return;
        };

        let mut skipped = 0usize;
        for record in records {
            let before = followers.len();
            followers.extend(
                self.scanner
                    .collect_all(record)
                    .into_iter()
                    .map(extract_username)
                    .filter(|username| !username.is_empty()),
            );
            if followers.len() == before {
                skipped += 1;
            }
        }

        debug!(
            records = records.len(),
            followers = followers.len(),
            records_without_new_username = skipped,
            "Loaded followers export"
        );
    }

    /// Usernames of everyone the user follows, in first-seen order.
    ///
    /// The whole document is scanned rather than one named field, so wrapper
    /// keys renamed by a future export format still work.
    pub fn load_following(&self, document: &RawExportDocument) -> FollowingList {
        let following: FollowingList = self
            .scanner
            .collect_all(document)
            .into_iter()
            .map(extract_username)
            .filter(|username| !username.is_empty())
            .collect();

        debug!(following = following.len(), "Loaded following export");
        following
    }

    /// Compare one followers buffer against one following buffer.
    pub fn analyze(&self, followers: &[u8], following: &[u8]) -> AnalysisReport {
        self.analyze_parts(&[followers], following)
    }

    /// Compare a followers export split across several files against a
    /// following buffer. The union of all parts forms the follower set.
    pub fn analyze_parts(&self, followers_parts: &[&[u8]], following: &[u8]) -> AnalysisReport {
        let mut followers = FollowerSet::new();
        for part in followers_parts {
            self.extend_followers(&mut followers, &parse_document(part));
        }

        let following_list = self.load_following(&parse_document(following));
        let following_count = following_list.len();
        let following_set: BTreeSet<Username> = following_list.into_iter().collect();

        let not_following_back: NonFollowBackResult =
            following_set.difference(&followers).cloned().collect();

        debug!(
            followers = followers.len(),
            following = following_set.len(),
            not_following_back = not_following_back.len(),
            "Computed follow-back difference"
        );

        AnalysisReport {
            followers_count: followers.len(),
            following_count,
            distinct_following_count: following_set.len(),
            not_following_back,
        }
    }
}

/// Accounts in the following export that are absent from the followers
/// export, sorted ascending. Never fails.
pub fn analyze(followers: &[u8], following: &[u8]) -> NonFollowBackResult {
    FollowAnalyzer::new()
        .analyze(followers, following)
        .not_following_back
}
