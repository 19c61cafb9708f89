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

pub const AUDIO_SUBTYPE: &str = "F";

const FIELDS: MediaFieldNames = MediaFieldNames {
    level: "DBLevel0",
    pan: "Pan0",
    fade_in: "FadeInTime",
    fade_out: "FadeOutTime",
};

pub struct AudioCueImporter;

impl CueImporter for AudioCueImporter {
    fn import_cue(&self, host: &HostContext<'_>, scs_cue: &ScsElement, scs_subcue: &ScsElement) -> Result<SubCueImport> {
        let (name, description) = generic_cue_fields(scs_cue)?;

        let loop_count = if scs_subcue.boolean("Loop")? {
            match scs_subcue.integer("NumLoops")? {
                Some(count) if count > 0 => count.min(i32::MAX as i64) as i32,
                _ => LOOP_FOREVER,
            }
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        importer::tests::{host, scs_cue},
        model::{
            cue::{CueParam, SinkKind},
            settings::{MediaSettings, PluginSettings},
        },
    };

    fn audio_file(fields: &[(&str, &str)]) -> ScsElement {
        let mut file = ScsElement::new("AudioFile");
        file.push_text("FileName", "$(Cue)\\sfx\\rain.wav");
        for (name, value) in fields {
            file.push_text(*name, *value);
        }
        file
    }

    fn import(file: ScsElement) -> CueRecord {
        let plugins = PluginSettings::default();
        let media = MediaSettings {
            sink: SinkKind::Jack,
            ..Default::default()
        };
        let scs_cue = scs_cue("Q4", "F", vec![file]);
        let sub = scs_cue.child("Sub").unwrap();
        let mut import = AudioCueImporter
            .import_cue(&host(&plugins, &media), &scs_cue, sub)
            .unwrap();
        import.records.remove(0)
    }

    #[test]
    fn defaults_for_sparse_audio() {
        let record = import(audio_file(&[]));
        assert_eq!(record.name, "[[Q4]] Scene");
        let CueParam::Media { media, fade_in, fade_out } = record.param else {
            panic!("not a media cue");
        };
        let elements = &media.elements;
        assert_eq!(elements.uri_input.as_ref().unwrap().uri, "file:///show/sfx/rain.wav");
        assert!((elements.volume.unwrap().volume - 0.70795).abs() < 1e-4);
        assert_eq!(elements.audio_pan.unwrap().pan, 0.0);
        assert_eq!(elements.sink, Some(SinkKind::Jack));
        assert_eq!(media.loop_count, 0);
        assert_eq!(media.start_time, None);
        assert!(fade_in.is_none() && fade_out.is_none());
    }

    #[test]
    fn full_audio_fields() {
        let record = import(audio_file(&[
            ("DBLevel0", "0"),
            ("Pan0", "750"),
            ("FadeInTime", "2500"),
            ("FadeOutTime", "0"),
            ("StartAt", "1000"),
            ("EndAt", "9000"),
            ("Loop", "1"),
        ]));
        let CueParam::Media { media, fade_in, fade_out } = record.param else {
            panic!("not a media cue");
        };
        assert_eq!(media.elements.volume.unwrap().volume, 1.0);
        assert_eq!(media.elements.audio_pan.unwrap().pan, 0.5);
        assert_eq!(fade_in.unwrap().duration, 2.5);
        assert!(fade_out.is_none());
        assert_eq!(media.start_time, Some(1.0));
        assert_eq!(media.stop_time, Some(9.0));
        assert_eq!(media.loop_count, LOOP_FOREVER);
    }

    #[test]
    fn counted_loops_and_silence() {
        let record = import(audio_file(&[("DBLevel0", "-INF"), ("Loop", "1"), ("NumLoops", "4")]));
        let CueParam::Media { media, .. } = record.param else {
            panic!("not a media cue");
        };
        assert_eq!(media.elements.volume.unwrap().volume, 0.0);
        assert_eq!(media.loop_count, 4);
    }
}
