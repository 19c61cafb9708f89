use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    host::{Capability, CapabilityProvider, MediaBackend},
    model::cue::SinkKind,
};

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ShowSettings {
    pub plugins: PluginSettings,
    pub media: MediaSettings,
    pub controller: ControllerSettings,
    pub scs: ScsSettings,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PluginSettings {
    pub capabilities: BTreeMap<Capability, bool>,
}

impl Default for PluginSettings {
    fn default() -> Self {
        Self {
            capabilities: [Capability::MediaBackend, Capability::Midi, Capability::Controller]
                .into_iter()
                .map(|capability| (capability, true))
                .collect(),
        }
    }
}

impl CapabilityProvider for PluginSettings {
    fn is_loaded(&self, capability: Capability) -> bool {
        self.capabilities.contains_key(&capability)
    }

    fn is_enabled(&self, capability: Capability) -> bool {
        self.capabilities.get(&capability).copied().unwrap_or(false)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct MediaSettings {
    pub audio_extensions: Vec<String>,
    pub video_extensions: Vec<String>,
    pub sink: SinkKind,
}

impl Default for MediaSettings {
    fn default() -> Self {
        let to_vec = |exts: &[&str]| exts.iter().map(|ext| ext.to_string()).collect();
        Self {
            audio_extensions: to_vec(&["aif", "aiff", "flac", "m4a", "mp3", "oga", "ogg", "opus", "wav"]),
            video_extensions: to_vec(&["avi", "mkv", "mov", "mp4", "mpeg", "ogv", "webm"]),
            sink: SinkKind::Auto,
        }
    }
}

impl MediaBackend for MediaSettings {
    fn audio_extensions(&self) -> &[String] {
        &self.audio_extensions
    }

    fn video_extensions(&self) -> &[String] {
        &self.video_extensions
    }

    fn configured_sink(&self) -> SinkKind {
        self.sink
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ControllerSettings {
    pub midi: Vec<MidiTrigger>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MidiTrigger {
    pub message: String,
    pub action: ControllerAction,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum ControllerAction {
    Go,
    StopAll,
    InterruptAll,
    PauseAll,
    ResumeAll,
    StandbyBack,
    StandbyForward,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ScsSettings {
    pub prod_id: Option<String>,
}
