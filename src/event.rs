use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "param", rename_all = "camelCase")]
pub enum TranslationEvent {
    CueKindSkipped { kind: String, reason: String },
    CueSkipped {
        index: usize,
        name: String,
        reason: String,
    },
    FieldDropped {
        index: usize,
        field: String,
        reason: String,
    },
    ControlDropped { trigger: String, reason: String },
    SubCueSkipped {
        cue_id: String,
        sub_type: String,
        reason: String,
    },
    EmptyCueSkipped { cue_id: String },
}

impl TranslationEvent {
    pub(crate) fn record(self, events: &mut Vec<TranslationEvent>) {
        log::warn!("{}", self);
        events.push(self);
    }
}

impl fmt::Display for TranslationEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CueKindSkipped { kind, reason } => {
                write!(f, "Skipping cues of type {}: {}", kind, reason)
            }
            Self::CueSkipped { index, name, reason } => {
                write!(f, "Skipping cue {} '{}': {}", index, name, reason)
            }
            Self::FieldDropped { index, field, reason } => {
                write!(f, "Cue {}: dropped {}: {}", index, field, reason)
            }
            Self::ControlDropped { trigger, reason } => {
                write!(f, "Dropping controller trigger '{}': {}", trigger, reason)
            }
            Self::SubCueSkipped { cue_id, sub_type, reason } => {
                write!(f, "Skipping sub-cue {} of cue {}: {}", sub_type, cue_id, reason)
            }
            Self::EmptyCueSkipped { cue_id } => {
                write!(f, "Skipping cue {}: it has no sub-cues", cue_id)
            }
        }
    }
}
