use crate::{
    codec::db_to_linear,
    error::Result,
    host::HostContext,
    importer::{
        CueImporter, SubCueImport,
        media::{level, media_elements},
    },
    model::{
        cue::{CueParam, MediaParam},
        record::CueRecord,
    },
    scs::{ScsElement, cue::generic_cue_fields},
};

pub const PLAYLIST_SUBTYPE: &str = "P";

const FULL_RELATIVE_LEVEL: f64 = 100.0;

// Each playlist entry becomes its own media cue.
pub struct PlaylistCueImporter;

impl CueImporter for PlaylistCueImporter {
    fn import_cue(&self, host: &HostContext<'_>, scs_cue: &ScsElement, scs_subcue: &ScsElement) -> Result<SubCueImport> {
        let (name, description) = generic_cue_fields(scs_cue)?;
        let master = db_to_linear(level(scs_subcue, "PLMastDBLevel0")?);

        let mut import = SubCueImport::default();
        for entry in scs_subcue.children_named("AudioFile") {
            let file_name = entry.required_text("FileName")?;
            let relative = entry.float("PLRelLevel")?.unwrap_or(FULL_RELATIVE_LEVEL);
            let gain = master * relative / 100.0;

            import.records.push(CueRecord {
                name: name.clone(),
                description: description.clone(),
                param: CueParam::Media {
                    media: MediaParam {
                        elements: media_elements(host, file_name, gain, 0.0),
                        ..Default::default()
                    },
                    fade_in: None,
                    fade_out: None,
                },
            });
        }
        log::debug!("Playlist expanded to {} cues", import.records.len());
        Ok(import)
    }
}
