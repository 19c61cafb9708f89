pub mod control;
pub mod cue;
pub mod device;
pub mod document;
pub mod midi;

pub use document::{SCS_FILE_EXTENSION, ScsDocument, ScsElement};
