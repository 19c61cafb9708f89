use uuid::Uuid;

use crate::model::cue::{Cue, CueParam};

#[derive(Debug, Clone, PartialEq)]
pub struct CueRecord {
    pub name: String,
    pub description: String,
    pub param: CueParam,
}

pub trait CueFactory {
    fn create_cue(&self, record: CueRecord) -> Cue;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct UuidCueFactory;

impl CueFactory for UuidCueFactory {
    fn create_cue(&self, record: CueRecord) -> Cue {
        Cue {
            id: Uuid::new_v4(),
            name: record.name,
            description: record.description,
            param: record.param,
        }
    }
}
