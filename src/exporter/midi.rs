use crate::{
    error::{Result, ScsError},
    exporter::{CueExporter, ExportedCue},
    host::HostContext,
    midi::MidiMessage,
    model::cue::{Cue, CueParam},
    scs::{
        ScsElement,
        cue::{build_generic_cue, build_generic_subcue},
        device::{DeviceDescriptor, DeviceKind},
        midi::{ScsMessageType, encode_free},
    },
};

pub const MIDI_SUBTYPE: &str = "M";

pub const MIDI_DEVICE: &str = "MIDI";

pub struct MidiCueExporter;

impl CueExporter for MidiCueExporter {
    fn export_cue(&self, _host: &HostContext<'_>, cue: &Cue, index: usize) -> Result<ExportedCue> {
        let CueParam::Midi { message } = &cue.param else {
            return Err(ScsError::UnsupportedCueKind(cue.kind().to_string()));
        };
        if message.trim().is_empty() {
            return Err(ScsError::IncompleteCueData("no MIDI message".to_string()));
        }
        let message: MidiMessage = message.parse()?;

        let mut sub = build_generic_subcue(cue, MIDI_SUBTYPE);
        sub.push(control_message(&message)?);
        let mut scs_cue = build_generic_cue(cue, index);
        scs_cue.push(sub);

        Ok(ExportedCue {
            cues: vec![scs_cue],
            device: Some((DeviceKind::Midi, DeviceDescriptor::named(MIDI_DEVICE))),
            dropped: Vec::new(),
        })
    }
}

pub fn control_message(message: &MidiMessage) -> Result<ScsElement> {
    let message_type = ScsMessageType::for_message(message)?;

    let mut element = ScsElement::new("ControlMessage");
    element
        .push_text("CMLogicalDev", MIDI_DEVICE)
        .push_text("MSMsgType", message_type.code());
    if let Some(channel) = message.channel().filter(|_| message_type.has_channel()) {
        element.push_text("MSChannel", &(channel + 1));
    }

    match message {
        MidiMessage::NoteOn { note, velocity, .. } | MidiMessage::NoteOff { note, velocity, .. } => {
            element.push_text("MSParam1", note).push_text("MSParam2", velocity);
        }
        MidiMessage::ControlChange { control, value, .. } => {
            element.push_text("MSParam1", control).push_text("MSParam2", value);
        }
        MidiMessage::ProgramChange { program, .. } => {
            element.push_text("MSParam1", program);
        }
        _ => {
            element.push_text("MIDIData", &encode_free(message)?);
        }
    }
    Ok(element)
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::{
        exporter::tests::midi_cue,
        model::settings::{MediaSettings, PluginSettings},
    };

    fn export(cue: &Cue) -> Result<ExportedCue> {
        let plugins = PluginSettings::default();
        let media = MediaSettings::default();
        let host = HostContext::new(&plugins, &media, Path::new("/show"));
        MidiCueExporter.export_cue(&host, cue, 6)
    }

    fn control(message: &str) -> ScsElement {
        control_message(&message.parse().unwrap()).unwrap()
    }

    #[test]
    fn note_on_fields() {
        let exported = export(&midi_cue("Lights", "note_on channel=2 note=60 velocity=100")).unwrap();
        assert_eq!(
            exported.device,
            Some((DeviceKind::Midi, DeviceDescriptor::named("MIDI")))
        );
        let scs_cue = &exported.cues[0];
        assert_eq!(scs_cue.text_of("CueID"), Some("7"));
        assert_eq!(scs_cue.text_of("SubType"), Some("M"));

        let message = scs_cue.descendant("ControlMessage").unwrap();
        assert_eq!(message.text_of("CMLogicalDev"), Some("MIDI"));
        assert_eq!(message.text_of("MSMsgType"), Some("ON"));
        assert_eq!(message.integer("MSChannel").unwrap(), Some(3));
        assert_eq!(message.integer("MSParam1").unwrap(), Some(60));
        assert_eq!(message.integer("MSParam2").unwrap(), Some(100));
    }

    #[test]
    fn program_change_has_one_param() {
        let message = control("program_change channel=15 program=0");
        assert_eq!(message.text_of("MSMsgType"), Some("PC127"));
        assert_eq!(message.integer("MSChannel").unwrap(), Some(16));
        assert_eq!(message.integer("MSParam1").unwrap(), Some(0));
        assert!(message.child("MSParam2").is_none());
    }

    #[test]
    fn other_messages_are_free() {
        let message = control("pitchwheel channel=1 pitch=0");
        assert_eq!(message.text_of("MSMsgType"), Some("FREE"));
        assert!(message.child("MSChannel").is_none());
        assert_eq!(message.text_of("MIDIData"), Some("E1 00 40"));
    }

    #[test]
    fn unusable_messages_fail() {
        assert!(matches!(
            export(&midi_cue("Empty", "  ")),
            Err(ScsError::IncompleteCueData(_))
        ));
        assert!(matches!(
            export(&midi_cue("MSC", "sysex data=(127,1,2,1,1,49)")),
            Err(ScsError::UnmappableValue(_))
        ));
        assert!(export(&midi_cue("Garbage", "note_on channel=99 note=1 velocity=1")).is_err());
    }
}
