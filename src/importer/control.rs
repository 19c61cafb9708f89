use crate::{
    error::{Result, ScsError},
    host::HostContext,
    importer::{CueImporter, SubCueImport},
    midi::MidiMessage,
    model::{cue::CueParam, record::CueRecord},
    scs::{
        ScsElement,
        cue::generic_cue_fields,
        midi::{ScsMessageType, decode_free, msc_unsupported},
    },
};

pub const CONTROL_SUBTYPE: &str = "M";

pub struct ControlCueImporter;

impl CueImporter for ControlCueImporter {
    fn import_cue(&self, _host: &HostContext<'_>, scs_cue: &ScsElement, scs_subcue: &ScsElement) -> Result<SubCueImport> {
        let (name, description) = generic_cue_fields(scs_cue)?;

        let mut import = SubCueImport::default();
        for control in scs_subcue.children_named("ControlMessage") {
            match midi_message(control) {
                Ok(message) => import.records.push(CueRecord {
                    name: name.clone(),
                    description: description.clone(),
                    param: CueParam::Midi {
                        message: message.to_string(),
                    },
                }),
                Err(e @ ScsError::MalformedDocument(_)) => return Err(e),
                Err(e) => import.skipped.push(e),
            }
        }
        Ok(import)
    }
}

pub fn midi_message(control: &ScsElement) -> Result<MidiMessage> {
    let code = control.required_text("MSMsgType")?;
    let message_type = ScsMessageType::from_code(code)
        .ok_or_else(|| ScsError::UnmappableValue(format!("MIDI message type '{}'", code)))?;

    let message = match message_type {
        ScsMessageType::Msc => return Err(msc_unsupported()),
        ScsMessageType::Free => return decode_free(control.required_text("MIDIData")?),
        ScsMessageType::NoteOn => MidiMessage::NoteOn {
            channel: channel(control)?,
            note: data_byte(control, "MSParam1")?,
            velocity: data_byte(control, "MSParam2")?,
        },
        ScsMessageType::NoteOff => MidiMessage::NoteOff {
            channel: channel(control)?,
            note: data_byte(control, "MSParam1")?,
            velocity: data_byte(control, "MSParam2")?,
        },
        ScsMessageType::ControlChange => MidiMessage::ControlChange {
            channel: channel(control)?,
            control: data_byte(control, "MSParam1")?,
            value: data_byte(control, "MSParam2")?,
        },
        ScsMessageType::ProgramChange127 => MidiMessage::ProgramChange {
            channel: channel(control)?,
            program: data_byte(control, "MSParam1")?,
        },
        ScsMessageType::ProgramChange128 => {
            let program = control
                .integer("MSParam1")?
                .filter(|program| (1..=128).contains(program))
                .ok_or_else(|| ScsError::malformed("PC128 program outside 1-128"))?;
            MidiMessage::ProgramChange {
                channel: channel(control)?,
                program: (program - 1) as u8,
            }
        }
    };
    Ok(message)
}

// MSChannel is 1-16 in SCS, 0-15 in LiSP.
fn channel(control: &ScsElement) -> Result<u8> {
    match control.integer("MSChannel")? {
        Some(channel) if (1..=16).contains(&channel) => Ok((channel - 1) as u8),
        Some(channel) => Err(ScsError::malformed(format!("MSChannel {} outside 1-16", channel))),
        None => Err(ScsError::malformed("<ControlMessage> has no <MSChannel>")),
    }
}

fn data_byte(control: &ScsElement, name: &str) -> Result<u8> {
    match control.integer(name)? {
        Some(value) if (0..=127).contains(&value) => Ok(value as u8),
        Some(value) => Err(ScsError::malformed(format!("{} {} outside 0-127", name, value))),
        None => Ok(0),
    }
}
