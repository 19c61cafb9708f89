use std::fmt;

use kira::Easing;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const LOOP_FOREVER: i32 = -1;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Cue {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub param: CueParam,
}

impl Cue {
    pub fn kind(&self) -> CueKind {
        self.param.kind()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "camelCase")]
pub enum CueKind {
    Media,
    Midi,
    Wait,
}

impl fmt::Display for CueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Media => "MediaCue",
            Self::Midi => "MidiCue",
            Self::Wait => "WaitCue",
        };
        f.write_str(name)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", content = "params", rename_all = "camelCase")]
pub enum CueParam {
    Media {
        media: MediaParam,
        #[serde(default)]
        fade_in: Option<AudioCueFadeParam>,
        #[serde(default)]
        fade_out: Option<AudioCueFadeParam>,
    },
    Midi {
        message: String,
    },
    Wait {
        duration: f64,
    },
}

impl CueParam {
    pub fn kind(&self) -> CueKind {
        match self {
            Self::Media { .. } => CueKind::Media,
            Self::Midi { .. } => CueKind::Midi,
            Self::Wait { .. } => CueKind::Wait,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MediaParam {
    pub elements: MediaElements,
    #[serde(default)]
    pub start_time: Option<f64>,
    #[serde(default)]
    pub stop_time: Option<f64>,
    // 0 plays once, LOOP_FOREVER repeats until stopped, n repeats n times.
    #[serde(default)]
    pub loop_count: i32,
}

impl MediaParam {
    pub fn pipe(&self) -> Vec<&'static str> {
        let mut pipe = Vec::new();
        if self.elements.uri_input.is_some() {
            pipe.push("UriInput");
        }
        if self.elements.volume.is_some() {
            pipe.push("Volume");
        }
        if self.elements.audio_pan.is_some() {
            pipe.push("AudioPan");
        }
        if let Some(sink) = self.elements.sink {
            pipe.push(sink.element_name());
        }
        pipe
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MediaElements {
    #[serde(default)]
    pub uri_input: Option<UriInput>,
    #[serde(default)]
    pub volume: Option<Volume>,
    #[serde(default)]
    pub audio_pan: Option<AudioPan>,
    #[serde(default)]
    pub sink: Option<SinkKind>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UriInput {
    pub uri: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Volume {
    pub volume: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AudioPan {
    // -1.0 (left) to 1.0 (right)
    pub pan: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum SinkKind {
    #[default]
    Auto,
    Alsa,
    Jack,
    Pulse,
}

impl SinkKind {
    pub fn element_name(&self) -> &'static str {
        match self {
            Self::Auto => "AutoSink",
            Self::Alsa => "AlsaSink",
            Self::Jack => "JackSink",
            Self::Pulse => "PulseSink",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AudioCueFadeParam {
    pub duration: f64,
    pub easing: Easing,
}

impl AudioCueFadeParam {
    pub fn linear(duration: f64) -> Self {
        Self {
            duration,
            easing: Easing::Linear,
        }
    }
}
