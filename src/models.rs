//! Core Data Models
//!
//! This module defines the data structures that flow through the follow-back
//! analysis pipeline, from raw export documents to the final report.
//!
//! ## Data Flow
//!
//! 1. **Raw Data**: [`RawExportDocument`] - untyped JSON parsed from an export file
//! 2. **Identity**: [`Username`] - normalized identity key extracted from profile URLs
//! 3. **Assembly**: [`FollowerSet`], [`FollowingList`] - per-export collections
//! 4. **Report**: [`AnalysisReport`] - the sorted non-follow-back result plus counts
//!
//! ## Features
//!
//! - **Serde Integration**: [`Username`] serializes transparently as a string
//! - **Ordering**: usernames order by their normalized string, so a
//!   [`FollowerSet`] iterates in the same order the result is reported in

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Untyped JSON value as parsed from an uploaded export; no schema is trusted.
pub type RawExportDocument = serde_json::Value;

/// Set of accounts that follow the user.
pub type FollowerSet = BTreeSet<Username>;

/// Accounts the user follows, in first-seen document order.
pub type FollowingList = Vec<Username>;

/// Accounts followed by the user that do not follow back, sorted ascending.
pub type NonFollowBackResult = Vec<Username>;

/// A normalized account identifier.
///
/// Only the normalizer builds non-empty values, so two `Username`s compare
/// equal exactly when they refer to the same account. The empty username
/// means "no valid username" and never enters a set.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    pub(crate) fn from_normalized(value: String) -> Self {
        Self(value)
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for Username {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Username {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Which of the two platform exports a document came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportKind {
    Followers,
    Following,
}

impl fmt::Display for ExportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportKind::Followers => f.write_str("followers"),
            ExportKind::Following => f.write_str("following"),
        }
    }
}

/// Outcome of one analysis, ready for rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    /// Distinct accounts found in the followers export(s)
    pub followers_count: usize,
    /// Usernames found in the following export, duplicates included
    pub following_count: usize,
    /// Distinct accounts found in the following export
    pub distinct_following_count: usize,
    pub not_following_back: NonFollowBackResult,
}

impl AnalysisReport {
    /// Following entries that repeated an account already seen.
    pub fn duplicate_following_count(&self) -> usize {
        self.following_count.saturating_sub(self.distinct_following_count)
    }

    /// The result rendered as one username per line, without a trailing newline.
    pub fn to_plain_text(&self) -> String {
        self.not_following_back
            .iter()
            .map(Username::as_str)
            .collect::<Vec<_>>()
            .join("\n")
    }
}
