use std::collections::BTreeMap;

use crate::{
    event::TranslationEvent,
    midi::MidiMessage,
    model::settings::{ControllerAction, MidiTrigger},
    scs::document::ScsElement,
};

pub const MAX_CONTROL_CHANNELS: usize = 2;

const NOTE_OFF: u8 = 8;
const NOTE_ON: u8 = 9;
const CONTROL_CHANGE: u8 = 11;
const PROGRAM_CHANGE: u8 = 12;

pub fn scs_command(action: ControllerAction) -> Option<&'static str> {
    match action {
        ControllerAction::Go => Some("Go"),
        ControllerAction::StopAll | ControllerAction::InterruptAll => Some("StopAll"),
        ControllerAction::StandbyBack => Some("GoBack"),
        ControllerAction::StandbyForward => Some("GoNext"),
        ControllerAction::PauseAll | ControllerAction::ResumeAll => None,
    }
}

pub fn controller_action(command: &str) -> Option<ControllerAction> {
    match command.trim() {
        "Go" => Some(ControllerAction::Go),
        "StopAll" => Some(ControllerAction::StopAll),
        "GoBack" => Some(ControllerAction::StandbyBack),
        "GoNext" => Some(ControllerAction::StandbyForward),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq)]
struct RemoteCommand {
    command: &'static str,
    status: u8,
    param1: u8,
    param2: u8,
    trigger: String,
}

impl RemoteCommand {
    fn from_trigger(trigger: &MidiTrigger) -> Result<(u8, Self), String> {
        let command = scs_command(trigger.action)
            .ok_or_else(|| format!("SCS has no equivalent of {:?}", trigger.action))?;
        let message: MidiMessage = trigger.message.parse().map_err(|e| format!("{}", e))?;

        let (channel, status, param1, param2) = match message {
            MidiMessage::NoteOn { channel, note, velocity } => (channel, NOTE_ON, note, velocity),
            MidiMessage::NoteOff { channel, note, velocity } => (channel, NOTE_OFF, note, velocity),
            MidiMessage::ControlChange { channel, control, value } => (channel, CONTROL_CHANGE, control, value),
            MidiMessage::ProgramChange { channel, program } => (channel, PROGRAM_CHANGE, program, 0),
            other => return Err(format!("SCS cannot be triggered by {}", other.type_name())),
        };
        Ok((
            channel,
            Self {
                command,
                status,
                param1,
                param2,
                trigger: trigger.message.clone(),
            },
        ))
    }

    fn to_element(&self) -> ScsElement {
        let mut element = ScsElement::new("PRCCMidiCommand");
        element
            .push_text("PRCCMidiCmdType", self.command)
            .push_text("PRCCMidiCmd", &self.status)
            .push_text("PRCCMidiCC", &self.param1)
            .push_text("PRCCMidiVV", &self.param2);
        element
    }
}

// SCS binds each command once per channel, and only the busiest channels fit.
pub fn build_control_rx_definitions(
    triggers: &[MidiTrigger],
    warnings: &mut Vec<TranslationEvent>,
) -> Vec<ScsElement> {
    let mut channels: BTreeMap<u8, Vec<RemoteCommand>> = BTreeMap::new();
    for trigger in triggers {
        match RemoteCommand::from_trigger(trigger) {
            Ok((channel, command)) => channels.entry(channel).or_default().push(command),
            Err(reason) => TranslationEvent::ControlDropped {
                trigger: trigger.message.clone(),
                reason,
            }
            .record(warnings),
        }
    }

    let mut channels: Vec<(u8, Vec<RemoteCommand>)> = channels.into_iter().collect();
    // Stable sort keeps lower channels first on ties.
    channels.sort_by(|(_, a), (_, b)| b.len().cmp(&a.len()));

    let mut definitions = Vec::new();
    for (position, (channel, commands)) in channels.into_iter().enumerate() {
        if position >= MAX_CONTROL_CHANNELS {
            for command in commands {
                TranslationEvent::ControlDropped {
                    trigger: command.trigger,
                    reason: format!(
                        "SCS listens on {} MIDI channels at most",
                        MAX_CONTROL_CHANNELS
                    ),
                }
                .record(warnings);
            }
            continue;
        }

        let mut device = ScsElement::new("PRCCDevice");
        device
            .push_text("PRCCDevType", "MIDIIn")
            .push_text("PRCCMidiCtrlMethod", "Custom")
            .push_text("PRCCMidiChannel", &(channel + 1));

        let mut bound: Vec<&'static str> = Vec::new();
        for command in commands {
            if bound.contains(&command.command) {
                TranslationEvent::ControlDropped {
                    trigger: command.trigger,
                    reason: format!("{} is already bound on channel {}", command.command, channel + 1),
                }
                .record(warnings);
                continue;
            }
            bound.push(command.command);
            device.push(command.to_element());
        }
        definitions.push(device);
    }
    definitions
}

pub fn parse_control_rx_definitions(head: &ScsElement, warnings: &mut Vec<TranslationEvent>) -> Vec<MidiTrigger> {
    let mut triggers = Vec::new();
    for device in head.children_named("PRCCDevice") {
        let device_type = device.text_of("PRCCDevType").unwrap_or_default();
        let method = device.text_of("PRCCMidiCtrlMethod").unwrap_or_default();
        if device_type != "MIDIIn" || method != "Custom" {
            TranslationEvent::ControlDropped {
                trigger: format!("{} {}", device_type, method),
                reason: "only custom MIDI input control is imported".to_string(),
            }
            .record(warnings);
            continue;
        }

        let channel = match device.integer("PRCCMidiChannel") {
            Ok(Some(channel)) if (1..=16).contains(&channel) => (channel - 1) as u8,
            _ => {
                TranslationEvent::ControlDropped {
                    trigger: "PRCCDevice".to_string(),
                    reason: "no valid PRCCMidiChannel".to_string(),
                }
                .record(warnings);
                continue;
            }
        };

        for command in device.children_named("PRCCMidiCommand") {
            match trigger_from_command(channel, command) {
                Ok(trigger) => triggers.push(trigger),
                Err(reason) => TranslationEvent::ControlDropped {
                    trigger: command.text_of("PRCCMidiCmdType").unwrap_or_default().to_string(),
                    reason,
                }
                .record(warnings),
            }
        }
    }
    triggers
}

fn trigger_from_command(channel: u8, command: &ScsElement) -> Result<MidiTrigger, String> {
    let command_type = command.text_of("PRCCMidiCmdType").unwrap_or_default();
    let action = controller_action(command_type)
        .ok_or_else(|| format!("no controller action for SCS command '{}'", command_type))?;

    let byte = |name: &str| -> Result<u8, String> {
        match command.integer(name) {
            Ok(Some(value)) if (0..=127).contains(&value) => Ok(value as u8),
            Ok(None) => Ok(0),
            _ => Err(format!("invalid {}", name)),
        }
    };
    let param1 = byte("PRCCMidiCC")?;
    let param2 = byte("PRCCMidiVV")?;

    let message = match command.integer("PRCCMidiCmd") {
        Ok(Some(status)) if status == NOTE_ON as i64 => MidiMessage::NoteOn {
            channel,
            note: param1,
            velocity: param2,
        },
        Ok(Some(status)) if status == NOTE_OFF as i64 => MidiMessage::NoteOff {
            channel,
            note: param1,
            velocity: param2,
        },
        Ok(Some(status)) if status == CONTROL_CHANGE as i64 => MidiMessage::ControlChange {
            channel,
            control: param1,
            value: param2,
        },
        Ok(Some(status)) if status == PROGRAM_CHANGE as i64 => MidiMessage::ProgramChange {
            channel,
            program: param1,
        },
        _ => return Err("unsupported PRCCMidiCmd".to_string()),
    };
    Ok(MidiTrigger {
        message: message.to_string(),
        action,
    })
}
