use std::{fmt, path::Path};

use serde::{Deserialize, Serialize};

use crate::model::cue::SinkKind;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "camelCase")]
pub enum Capability {
    MediaBackend,
    Midi,
    Controller,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::MediaBackend => "MediaBackend",
            Self::Midi => "Midi",
            Self::Controller => "Controller",
        };
        f.write_str(name)
    }
}

pub trait CapabilityProvider {
    fn is_loaded(&self, capability: Capability) -> bool;

    fn is_enabled(&self, capability: Capability) -> bool;

    fn is_available(&self, capability: Capability) -> bool {
        self.is_loaded(capability) && self.is_enabled(capability)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaClass {
    Audio,
    Video,
}

pub trait MediaBackend {
    fn audio_extensions(&self) -> &[String];

    fn video_extensions(&self) -> &[String];

    fn configured_sink(&self) -> SinkKind;

    fn classify_extension(&self, extension: &str) -> Option<MediaClass> {
        let extension = extension.to_ascii_lowercase();
        if self.audio_extensions().iter().any(|ext| ext.eq_ignore_ascii_case(&extension)) {
            Some(MediaClass::Audio)
        } else if self.video_extensions().iter().any(|ext| ext.eq_ignore_ascii_case(&extension)) {
            Some(MediaClass::Video)
        } else {
            None
        }
    }
}

#[derive(Clone, Copy)]
pub struct HostContext<'a> {
    pub capabilities: &'a dyn CapabilityProvider,
    pub media: &'a dyn MediaBackend,
    pub session_dir: &'a Path,
}

impl<'a> HostContext<'a> {
    pub fn new(
        capabilities: &'a dyn CapabilityProvider,
        media: &'a dyn MediaBackend,
        session_dir: &'a Path,
    ) -> Self {
        Self {
            capabilities,
            media,
            session_dir,
        }
    }
}
