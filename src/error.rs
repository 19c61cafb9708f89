use thiserror::Error;

use crate::{host::Capability, importer::ValidationReport};

pub type Result<T> = std::result::Result<T, ScsError>;

#[derive(Debug, Error)]
pub enum ScsError {
    #[error("no translator registered for {0}")]
    UnsupportedCueKind(String),

    #[error("capability {0} is not available")]
    MissingCapability(Capability),

    #[error("incomplete cue data: {0}")]
    IncompleteCueData(String),

    #[error("value cannot be translated: {0}")]
    UnmappableValue(String),

    #[error("document cannot be imported: {0}")]
    InvalidDocument(ValidationReport),

    #[error("malformed SCS document: {0}")]
    MalformedDocument(String),

    #[error("XML parsing failed: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("XML writing failed: {0}")]
    Write(#[from] quick_xml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ScsError {
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedDocument(message.into())
    }
}
