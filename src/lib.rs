//! Follow Audit Library
//!
//! Finds the accounts a user follows that do not follow them back, using the
//! followers and following JSON files from a social platform's personal data
//! export.
//!
//! ## Core Features
//!
//! - **Schema-drift tolerant parsing**: profile links are found by scanning
//!   for `href` fields anywhere in a document instead of following a fixed
//!   path, so container shapes that change between export versions still work
//! - **Canonical identities**: usernames are trimmed, lowercased,
//!   NFC-composed and stripped of invisible characters before comparison
//! - **Never fails**: malformed JSON, odd record shapes and unusable URLs
//!   degrade to empty contributions instead of errors
//! - **Split exports**: followers spread over several files are merged
//!
//! ## Architecture Overview
//!
//! - [`normalize`] - username normalization
//! - [`extract`] - username extraction from profile URLs
//! - [`scanner`] - depth-bounded recursive `href` scanning
//! - [`analyzer`] - the diff engine
//! - [`models`] - shared data structures
//! - [`validation`] - structural pre-validation with user-facing messages
//! - [`input`] - guarded file reading and export discovery
//! - [`display`] - text/plain/JSON rendering and result files
//! - [`config`] - configuration with environment variable support
//! - [`logging`] - structured logging with JSON and pretty-print formats
//!
//! The first four modules are pure: they never touch the file system, the
//! network or the environment.
//!
//! ## Main Entry Point
//!
//! ```rust
//! let followers = br#"[{"string_list_data":[{"href":"https://instagram.com/alice"}]}]"#;
//! let following = br#"{"relationships_following":[
//!     {"string_list_data":[{"href":"https://www.instagram.com/Alice/"}]},
//!     {"string_list_data":[{"href":"https://instagram.com/_u/bob"}]}
//! ]}"#;
//!
//! let not_following_back = follow_audit::analyze(followers, following);
//! assert_eq!(not_following_back, vec!["bob"]);
//! ```

pub mod analyzer;
pub mod config;
pub mod display;
pub mod extract;
pub mod input;
pub mod logging;
pub mod models;
pub mod normalize;
pub mod scanner;
pub mod validation;

pub use analyzer::{analyze, FollowAnalyzer};
pub use models::*;
