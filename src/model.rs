use serde::{Deserialize, Serialize};

use crate::model::{cue::Cue, settings::ShowSettings};

pub mod cue;
pub mod record;
pub mod settings;

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ShowModel {
    pub name: String,
    pub cues: Vec<Cue>,
    #[serde(default)]
    pub settings: ShowSettings,
}
