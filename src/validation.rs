//! Structural pre-validation of export files
//!
//! The analysis core swallows every malformed input silently. Before running
//! it, the command-line layer checks that each export at least looks like
//! what the platform produces, so users get a message explaining why a file
//! was rejected instead of an empty result.

use crate::analyzer::strip_bom;
use crate::models::{ExportKind, RawExportDocument};
use crate::scanner::HrefScanner;
use serde_json::Value;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{kind} export is not valid JSON or is corrupted")]
    InvalidJson { kind: ExportKind },

    #[error("{kind} export is empty or not formatted correctly")]
    EmptyOrMalformed { kind: ExportKind },

    #[error("{kind} export has an invalid structure: expected a JSON object at the top level")]
    InvalidStructure { kind: ExportKind },

    #[error(
        "{kind} export format is not recognized: no profile links were found. \
         The platform may have changed its export structure"
    )]
    UnrecognizedFormat { kind: ExportKind },
}

impl ValidationError {
    pub fn kind(&self) -> ExportKind {
        match self {
            ValidationError::InvalidJson { kind }
            | ValidationError::EmptyOrMalformed { kind }
            | ValidationError::InvalidStructure { kind }
            | ValidationError::UnrecognizedFormat { kind } => *kind,
        }
    }
}

/// Checks export documents against the shapes the platform is known to emit.
#[derive(Debug, Clone, Default)]
pub struct ExportValidator {
    scanner: HrefScanner,
}

impl ExportValidator {
    pub fn new(scanner: HrefScanner) -> Self {
        Self { scanner }
    }

    /// A followers export must be a non-empty JSON list containing at least
    /// one profile link.
    pub fn validate_followers(&self, bytes: &[u8]) -> Result<(), ValidationError> {
        let kind = ExportKind::Followers;
        let document = parse_strict(kind, bytes)?;

        match &document {
            Value::Array(records) if !records.is_empty() => {}
            _ => return Err(ValidationError::EmptyOrMalformed { kind }),
        }

        self.require_href(kind, &document)
    }

    /// A following export must be a JSON object containing at least one
    /// profile link somewhere inside it.
    pub fn validate_following(&self, bytes: &[u8]) -> Result<(), ValidationError> {
        let kind = ExportKind::Following;
        let document = parse_strict(kind, bytes)?;

        if !document.is_object() {
            return Err(ValidationError::InvalidStructure { kind });
        }

        self.require_href(kind, &document)
    }

    fn require_href(
        &self,
        kind: ExportKind,
        document: &RawExportDocument,
    ) -> Result<(), ValidationError> {
        if self.scanner.find_first(document).is_some() {
            return Ok(());
        }
        warn!(%kind, "Export format not recognized, the platform may have changed it");
        Err(ValidationError::UnrecognizedFormat { kind })
    }
}

fn parse_strict(kind: ExportKind, bytes: &[u8]) -> Result<RawExportDocument, ValidationError> {
    serde_json::from_slice(strip_bom(bytes)).map_err(|e| {
        error!(%kind, error = %e, "Failed to parse export");
        ValidationError::InvalidJson { kind }
    })
}

/// Validate a followers export with the default scan depth.
pub fn validate_followers(bytes: &[u8]) -> Result<(), ValidationError> {
    ExportValidator::default().validate_followers(bytes)
}

/// Validate a following export with the default scan depth.
pub fn validate_following(bytes: &[u8]) -> Result<(), ValidationError> {
    ExportValidator::default().validate_following(bytes)
}
