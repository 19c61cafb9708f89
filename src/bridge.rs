use std::path::Path;

use crate::{
    error::Result,
    exporter::{ExportReport, ExporterRegistry, ScsExporter, builtin_exporters},
    host::HostContext,
    importer::{ImportReport, ImporterRegistry, ScsImporter, ValidationReport, builtin_importers},
    model::{ShowModel, record::CueFactory, settings::ShowSettings},
    scs::ScsDocument,
};

pub struct Lisp2Scs {
    exporters: ExporterRegistry,
    importers: ImporterRegistry,
}

impl Default for Lisp2Scs {
    fn default() -> Self {
        Self::new()
    }
}

impl Lisp2Scs {
    pub fn new() -> Self {
        Self::with_registries(
            ExporterRegistry::discover(builtin_exporters()),
            ImporterRegistry::discover(builtin_importers()),
        )
    }

    pub fn with_registries(exporters: ExporterRegistry, importers: ImporterRegistry) -> Self {
        log::debug!(
            "{} exporters and {} importers registered",
            exporters.len(),
            importers.len()
        );
        Self { exporters, importers }
    }

    pub fn export_show(&self, show: &ShowModel, session_dir: &Path) -> ExportReport {
        let settings = &show.settings;
        let host = HostContext::new(&settings.plugins, &settings.media, session_dir);
        ScsExporter::new(&self.exporters, host)
            .with_title(&show.name)
            .with_controls(&settings.controller.midi)
            .export(settings.scs.prod_id.as_deref(), &show.cues)
    }

    pub fn validate_file(&self, contents: &str, settings: &ShowSettings) -> Result<ValidationReport> {
        let document = ScsDocument::parse(contents)?;
        let host = HostContext::new(&settings.plugins, &settings.media, Path::new(""));
        Ok(ScsImporter::new(&self.importers, host).validate(&document))
    }

    pub fn import_file(
        &self,
        contents: &str,
        base_path: &Path,
        show: &mut ShowModel,
        factory: &dyn CueFactory,
    ) -> Result<ImportReport> {
        let document = ScsDocument::parse(contents)?;
        let settings = show.settings.clone();
        let host = HostContext::new(&settings.plugins, &settings.media, base_path);
        ScsImporter::new(&self.importers, host).import(&document, show, factory)
    }
}

#[cfg(test)]
mod tests {
    use kira::Easing;
    use uuid::Uuid;

    use super::*;
    use crate::{
        error::ScsError,
        event::TranslationEvent,
        exporter::tests::{media_cue, midi_cue},
        model::{
            cue::{AudioCueFadeParam, AudioPan, Cue, CueParam, SinkKind},
            record::UuidCueFactory,
            settings::{ControllerAction, MidiTrigger},
        },
    };

    fn show() -> ShowModel {
        let mut thunder = media_cue("[[Q1]] Thunder", "/show/sfx/thunder.wav", Some(SinkKind::Auto));
        if let CueParam::Media { media, fade_in, .. } = &mut thunder.param {
            media.elements.audio_pan = Some(AudioPan { pan: 0.25 });
            media.start_time = Some(0.5);
            media.stop_time = Some(12.0);
            media.loop_count = 2;
            *fade_in = Some(AudioCueFadeParam::linear(1.5));
        }
        thunder.description = "On the flash".to_string();

        let mut film = media_cue("Film", "/show/video/film.mkv", Some(SinkKind::Auto));
        if let CueParam::Media { media, .. } = &mut film.param {
            media.loop_count = -1;
        }

        let mut show = ShowModel {
            name: "Storm".to_string(),
            cues: vec![
                thunder,
                film,
                midi_cue("[[Q3]] Fog", "control_change channel=0 control=7 value=64"),
                midi_cue("Bend", "pitchwheel channel=2 pitch=-4096"),
            ],
            settings: Default::default(),
        };
        show.settings.controller.midi.push(MidiTrigger {
            message: "note_on channel=0 note=60 velocity=127".to_string(),
            action: ControllerAction::Go,
        });
        show.settings.scs.prod_id = Some("7f3c".to_string());
        show
    }

    fn round_trip(show: &ShowModel) -> ShowModel {
        let bridge = Lisp2Scs::new();
        let report = bridge.export_show(show, Path::new("/show"));
        let xml = report.document.to_xml_string().unwrap();

        let mut imported = ShowModel::default();
        let import = bridge
            .import_file(&xml, Path::new("/show"), &mut imported, &UuidCueFactory)
            .unwrap();
        assert_eq!(import.imported, show.cues.len());
        imported
    }

    fn strip_ids(cues: &[Cue]) -> Vec<(String, String, CueParam)> {
        cues.iter()
            .map(|cue| (cue.name.clone(), cue.description.clone(), cue.param.clone()))
            .collect()
    }

    #[test]
    fn export_import_keeps_cue_semantics() {
        let show = show();
        let imported = round_trip(&show);

        assert_eq!(imported.name, "Storm");
        assert_eq!(imported.settings.scs.prod_id.as_deref(), Some("7f3c"));
        assert_eq!(imported.settings.controller.midi, show.settings.controller.midi);

        let names: Vec<&str> = imported.cues.iter().map(|cue| cue.name.as_str()).collect();
        assert_eq!(names, vec!["[[Q1]] Thunder", "[[2]] Film", "[[Q3]] Fog", "[[4]] Bend"]);
        assert_eq!(imported.cues[0].description, "On the flash");

        let CueParam::Media { media, fade_in, .. } = &imported.cues[0].param else {
            panic!("not a media cue");
        };
        assert_eq!(media.elements.uri_input.as_ref().unwrap().uri, "file:///show/sfx/thunder.wav");
        assert!((media.elements.volume.unwrap().volume - 0.5).abs() < 1e-3);
        assert_eq!(media.elements.audio_pan.unwrap().pan, 0.25);
        assert_eq!(media.start_time, Some(0.5));
        assert_eq!(media.stop_time, Some(12.0));
        assert_eq!(media.loop_count, 2);
        assert_eq!(fade_in.unwrap().duration, 1.5);

        let CueParam::Media { media, .. } = &imported.cues[1].param else {
            panic!("not a media cue");
        };
        assert_eq!(media.loop_count, -1);
        assert_eq!(media.elements.uri_input.as_ref().unwrap().uri, "file:///show/video/film.mkv");

        assert_eq!(
            imported.cues[3].param,
            CueParam::Midi {
                message: "pitchwheel channel=2 pitch=-4096".to_string()
            }
        );
    }

    #[test]
    fn second_export_is_identical() {
        let first = round_trip(&show());
        let second = round_trip(&first);
        assert_eq!(strip_ids(&first.cues), strip_ids(&second.cues));
        assert_eq!(first.settings, second.settings);

        let bridge = Lisp2Scs::new();
        let once = bridge.export_show(&first, Path::new("/show")).document;
        let twice = bridge.export_show(&second, Path::new("/show")).document;
        assert_eq!(once, twice);
    }

    #[test]
    fn lossy_fields_are_reported() {
        let mut show = show();
        if let CueParam::Media { fade_out, .. } = &mut show.cues[0].param {
            *fade_out = Some(AudioCueFadeParam {
                duration: 2.0,
                easing: Easing::OutPowi(3),
            });
        }
        show.cues.push(Cue {
            id: Uuid::new_v4(),
            name: "Pause".to_string(),
            description: String::new(),
            param: CueParam::Wait { duration: 3.0 },
        });

        let report = Lisp2Scs::new().export_show(&show, Path::new("/show"));
        assert_eq!(report.document.cues().count(), 4);
        assert!(report.warnings.iter().any(|w| matches!(
            w,
            TranslationEvent::FieldDropped { index: 0, field, .. } if field == "fade-out curve"
        )));
        assert!(report.warnings.iter().any(|w| matches!(
            w,
            TranslationEvent::CueKindSkipped { kind, .. } if kind == "WaitCue"
        )));
    }

    #[test]
    fn validate_and_import_reject_unknown_sub_types() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<Production>
    <Head><Title>Other</Title></Head>
    <Cue>
        <CueID>1</CueID>
        <Sub><SubType>K</SubType></Sub>
    </Cue>
    <Cue>
        <CueID>2</CueID>
        <Sub><SubType>L</SubType></Sub>
    </Cue>
</Production>
"#;
        let bridge = Lisp2Scs::new();
        let report = bridge.validate_file(xml, &ShowSettings::default()).unwrap();
        assert_eq!(report.failures.len(), 2);

        let mut show = ShowModel::default();
        let result = bridge.import_file(xml, Path::new("/show"), &mut show, &UuidCueFactory);
        assert!(matches!(result, Err(ScsError::InvalidDocument(_))));
        assert!(show.name.is_empty());
    }

    #[test]
    fn not_xml_is_an_error() {
        let bridge = Lisp2Scs::new();
        assert!(bridge.validate_file("not xml", &ShowSettings::default()).is_err());
    }
}
