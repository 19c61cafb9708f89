use crate::{
    error::Result,
    host::HostContext,
    importer::{
        CueImporter, SubCueImport,
        media::{MediaFieldNames, media_cue_param},
    },
    model::{cue::LOOP_FOREVER, record::CueRecord},
    scs::{ScsElement, cue::generic_cue_fields},
};

pub const VIDEO_SUBTYPE: &str = "A";

const FIELDS: MediaFieldNames = MediaFieldNames {
    level: "SubDBLevel0",
    pan: "SubDBPan0",
    fade_in: "PLFadeInTime",
    fade_out: "PLFadeOutTime",
};

pub struct VideoCueImporter;

impl CueImporter for VideoCueImporter {
    fn import_cue(&self, host: &HostContext<'_>, scs_cue: &ScsElement, scs_subcue: &ScsElement) -> Result<SubCueImport> {
        let (name, description) = generic_cue_fields(scs_cue)?;
        let loop_count = if scs_subcue.boolean("VideoRepeat")? {
            LOOP_FOREVER
        } else {
            0
        };

        Ok(SubCueImport::single(CueRecord {
            name,
            description,
            param: media_cue_param(host, scs_subcue, &FIELDS, loop_count)?,
        }))
    }
}
