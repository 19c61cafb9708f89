pub mod audio;
pub mod control;
mod media;
pub mod playlist;
pub mod video;

use std::fmt;

use crate::{
    error::{Result, ScsError},
    event::TranslationEvent,
    host::{Capability, HostContext},
    model::{
        ShowModel,
        record::{CueFactory, CueRecord},
    },
    registry::{PluginEntry, Registry},
    scs::{ScsDocument, ScsElement, control::parse_control_rx_definitions},
};

pub trait CueImporter: Send + Sync {
    fn import_cue(&self, host: &HostContext<'_>, scs_cue: &ScsElement, scs_subcue: &ScsElement)
    -> Result<SubCueImport>;
}

#[derive(Debug, Default)]
pub struct SubCueImport {
    pub records: Vec<CueRecord>,
    pub skipped: Vec<ScsError>,
}

impl SubCueImport {
    pub fn single(record: CueRecord) -> Self {
        Self {
            records: vec![record],
            skipped: Vec::new(),
        }
    }
}

pub type ImporterRegistry = Registry<&'static str, dyn CueImporter>;

pub fn builtin_importers() -> Vec<PluginEntry<&'static str, dyn CueImporter>> {
    vec![
        PluginEntry {
            key: audio::AUDIO_SUBTYPE,
            name: "AudioCueImporter",
            capability: Capability::MediaBackend,
            create: || Box::new(audio::AudioCueImporter),
        },
        PluginEntry {
            key: video::VIDEO_SUBTYPE,
            name: "VideoCueImporter",
            capability: Capability::MediaBackend,
            create: || Box::new(video::VideoCueImporter),
        },
        PluginEntry {
            key: playlist::PLAYLIST_SUBTYPE,
            name: "PlaylistCueImporter",
            capability: Capability::MediaBackend,
            create: || Box::new(playlist::PlaylistCueImporter),
        },
        PluginEntry {
            key: control::CONTROL_SUBTYPE,
            name: "ControlCueImporter",
            capability: Capability::Midi,
            create: || Box::new(control::ControlCueImporter),
        },
    ]
}

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationIssue {
    MissingSubType,
    Unsupported,
    NotLoaded(Capability),
    NotEnabled(Capability),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidationFailure {
    pub sub_type: String,
    pub issue: ValidationIssue,
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.issue {
            ValidationIssue::MissingSubType => write!(f, "a <Sub> has no <SubType>"),
            ValidationIssue::Unsupported => write!(f, "sub-cue type '{}' is not supported", self.sub_type),
            ValidationIssue::NotLoaded(capability) => write!(
                f,
                "sub-cue type '{}' needs {}, which is not loaded",
                self.sub_type, capability
            ),
            ValidationIssue::NotEnabled(capability) => write!(
                f,
                "sub-cue type '{}' needs {}, which is disabled",
                self.sub_type, capability
            ),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    pub failures: Vec<ValidationFailure>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.failures.is_empty()
    }

    fn add(&mut self, sub_type: &str, issue: ValidationIssue) {
        if !self.failures.iter().any(|failure| failure.sub_type == sub_type) {
            self.failures.push(ValidationFailure {
                sub_type: sub_type.to_string(),
                issue,
            });
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let failures: Vec<String> = self.failures.iter().map(ToString::to_string).collect();
        f.write_str(&failures.join("; "))
    }
}

#[derive(Debug)]
pub struct ImportReport {
    pub imported: usize,
    pub warnings: Vec<TranslationEvent>,
}

pub struct ScsImporter<'a> {
    registry: &'a ImporterRegistry,
    host: HostContext<'a>,
}

impl<'a> ScsImporter<'a> {
    pub fn new(registry: &'a ImporterRegistry, host: HostContext<'a>) -> Self {
        Self { registry, host }
    }

    pub fn validate(&self, document: &ScsDocument) -> ValidationReport {
        let mut report = ValidationReport::default();
        for scs_cue in document.cues() {
            for sub in scs_cue.children_named("Sub") {
                let Some(sub_type) = sub.child("SubType").and_then(ScsElement::text).map(str::trim) else {
                    report.add("", ValidationIssue::MissingSubType);
                    continue;
                };
                let capabilities = self.host.capabilities;
                match self.registry.capability(sub_type) {
                    None => report.add(sub_type, ValidationIssue::Unsupported),
                    Some(capability) if !capabilities.is_loaded(capability) => {
                        report.add(sub_type, ValidationIssue::NotLoaded(capability))
                    }
                    Some(capability) if !capabilities.is_enabled(capability) => {
                        report.add(sub_type, ValidationIssue::NotEnabled(capability))
                    }
                    Some(_) => {}
                }
            }
        }
        for failure in &report.failures {
            log::warn!("{}", failure);
        }
        report
    }

    pub fn import(&self, document: &ScsDocument, show: &mut ShowModel, factory: &dyn CueFactory) -> Result<ImportReport> {
        let validation = self.validate(document);
        if !validation.is_valid() {
            return Err(ScsError::InvalidDocument(validation));
        }

        let mut warnings = Vec::new();
        let mut records = Vec::new();
        for scs_cue in document.cues() {
            let cue_id = scs_cue.child("CueID").and_then(ScsElement::text).unwrap_or_default();
            let mut subs = scs_cue.children_named("Sub").peekable();
            if subs.peek().is_none() {
                TranslationEvent::EmptyCueSkipped {
                    cue_id: cue_id.to_string(),
                }
                .record(&mut warnings);
                continue;
            }
            for sub in subs {
                let sub_type = sub.required_text("SubType")?.trim();
                let Some(importer) = self.registry.get(sub_type) else {
                    continue;
                };

                log::debug!("Importing sub-cue {} of cue {}", sub_type, cue_id);
                let skipped = match importer.import_cue(&self.host, scs_cue, sub) {
                    Ok(import) => {
                        records.extend(import.records);
                        import.skipped
                    }
                    Err(e @ (ScsError::MalformedDocument(_) | ScsError::Xml(_))) => return Err(e),
                    Err(e) => vec![e],
                };
                for reason in skipped {
                    TranslationEvent::SubCueSkipped {
                        cue_id: cue_id.to_string(),
                        sub_type: sub_type.to_string(),
                        reason: reason.to_string(),
                    }
                    .record(&mut warnings);
                }
            }
        }

        if let Some(head) = document.head() {
            self.apply_head(head, show, &mut warnings);
        }

        let imported = records.len();
        show.cues.extend(records.into_iter().map(|record| factory.create_cue(record)));
        log::info!("Imported {} cues ({} warnings)", imported, warnings.len());
        Ok(ImportReport { imported, warnings })
    }

    fn apply_head(&self, head: &ScsElement, show: &mut ShowModel, warnings: &mut Vec<TranslationEvent>) {
        if show.name.is_empty() {
            if let Some(title) = head.child("Title").and_then(ScsElement::text) {
                show.name = title.to_string();
            }
        }
        if let Some(prod_id) = head.child("ProdId").and_then(ScsElement::text).filter(|id| !id.is_empty()) {
            show.settings.scs.prod_id = Some(prod_id.to_string());
        }

        let capabilities = self.host.capabilities;
        if capabilities.is_available(Capability::Midi) && capabilities.is_available(Capability::Controller) {
            for trigger in parse_control_rx_definitions(head, warnings) {
                if !show.settings.controller.midi.contains(&trigger) {
                    show.settings.controller.midi.push(trigger);
                }
            }
        }
    }
}
