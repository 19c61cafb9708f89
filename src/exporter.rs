pub mod media;
pub mod midi;

use std::collections::BTreeSet;

use crate::{
    error::{Result, ScsError},
    event::TranslationEvent,
    host::{Capability, HostContext},
    model::{
        cue::{Cue, CueKind},
        settings::MidiTrigger,
    },
    registry::{PluginEntry, Registry},
    scs::{
        ScsDocument, ScsElement,
        control::build_control_rx_definitions,
        device::{DeviceAggregator, DeviceDescriptor, DeviceKind},
    },
};

pub trait CueExporter: Send + Sync {
    fn export_cue(&self, host: &HostContext<'_>, cue: &Cue, index: usize) -> Result<ExportedCue>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct DroppedField {
    pub field: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportedCue {
    pub cues: Vec<ScsElement>,
    pub device: Option<(DeviceKind, DeviceDescriptor)>,
    pub dropped: Vec<DroppedField>,
}

pub type ExporterRegistry = Registry<CueKind, dyn CueExporter>;

pub fn builtin_exporters() -> Vec<PluginEntry<CueKind, dyn CueExporter>> {
    vec![
        PluginEntry {
            key: CueKind::Media,
            name: "MediaCueExporter",
            capability: Capability::MediaBackend,
            create: || Box::new(media::MediaCueExporter),
        },
        PluginEntry {
            key: CueKind::Midi,
            name: "MidiCueExporter",
            capability: Capability::Midi,
            create: || Box::new(midi::MidiCueExporter),
        },
    ]
}

#[derive(Debug)]
pub struct ExportReport {
    pub document: ScsDocument,
    pub warnings: Vec<TranslationEvent>,
}

pub struct ScsExporter<'a> {
    registry: &'a ExporterRegistry,
    host: HostContext<'a>,
    title: &'a str,
    controls: &'a [MidiTrigger],
}

impl<'a> ScsExporter<'a> {
    pub fn new(registry: &'a ExporterRegistry, host: HostContext<'a>) -> Self {
        Self {
            registry,
            host,
            title: "",
            controls: &[],
        }
    }

    pub fn with_title(mut self, title: &'a str) -> Self {
        self.title = title;
        self
    }

    pub fn with_controls(mut self, controls: &'a [MidiTrigger]) -> Self {
        self.controls = controls;
        self
    }

    pub fn export(&self, prod_id: Option<&str>, cues: &[Cue]) -> ExportReport {
        let mut warnings = Vec::new();
        let usable = self.resolve(cues, &mut warnings);

        let mut document = ScsDocument::new();
        let mut devices = DeviceAggregator::new();
        for (index, cue) in cues.iter().enumerate() {
            if !usable.contains(&cue.kind()) {
                continue;
            }
            let Some(exporter) = self.registry.get(&cue.kind()) else {
                continue;
            };

            log::debug!("Exporting cue {} '{}'", index, cue.name);
            match exporter.export_cue(&self.host, cue, index) {
                Ok(exported) => {
                    if let Some((kind, device)) = exported.device {
                        devices.add(kind, device);
                    }
                    for dropped in exported.dropped {
                        TranslationEvent::FieldDropped {
                            index,
                            field: dropped.field,
                            reason: dropped.reason,
                        }
                        .record(&mut warnings);
                    }
                    document.root.children.extend(exported.cues);
                }
                Err(e) => TranslationEvent::CueSkipped {
                    index,
                    name: cue.name.clone(),
                    reason: e.to_string(),
                }
                .record(&mut warnings),
            }
        }

        let head = self.build_production_head(prod_id, &devices, &mut warnings);
        document.root.children.insert(0, head);

        log::info!(
            "Exported {} of {} cues ({} warnings)",
            document.cues().count(),
            cues.len(),
            warnings.len()
        );
        ExportReport { document, warnings }
    }

    fn resolve(&self, cues: &[Cue], warnings: &mut Vec<TranslationEvent>) -> BTreeSet<CueKind> {
        let kinds: BTreeSet<CueKind> = cues.iter().map(Cue::kind).collect();
        let mut usable = BTreeSet::new();
        for kind in kinds {
            let problem = match self.registry.capability(&kind) {
                None => Some(ScsError::UnsupportedCueKind(kind.to_string())),
                Some(capability) if !self.host.capabilities.is_available(capability) => {
                    Some(ScsError::MissingCapability(capability))
                }
                Some(_) => None,
            };
            match problem {
                Some(e) => TranslationEvent::CueKindSkipped {
                    kind: kind.to_string(),
                    reason: e.to_string(),
                }
                .record(warnings),
                None => {
                    usable.insert(kind);
                }
            }
        }
        usable
    }

    fn build_production_head(
        &self,
        prod_id: Option<&str>,
        devices: &DeviceAggregator,
        warnings: &mut Vec<TranslationEvent>,
    ) -> ScsElement {
        let mut head = ScsElement::new("Head");
        head.push_text("Title", self.title);

        if let Some(prod_id) = prod_id.filter(|id| !id.is_empty()) {
            head.push_text("ProdId", prod_id);
        }

        head.children.extend(devices.audio_definitions());
        head.children.extend(devices.midi_out_definitions());

        let capabilities = self.host.capabilities;
        if capabilities.is_available(Capability::Midi) && capabilities.is_available(Capability::Controller) {
            head.children.extend(build_control_rx_definitions(self.controls, warnings));
        }
        head
    }
}
