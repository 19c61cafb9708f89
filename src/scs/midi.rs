use midly::{
    MidiMessage as WireMessage, PitchBend,
    live::{LiveEvent, SystemCommon, SystemRealtime},
    num::{u4, u7, u14},
};

use crate::{
    error::{Result, ScsError},
    midi::MidiMessage,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScsMessageType {
    NoteOn,
    NoteOff,
    ControlChange,
    ProgramChange127,
    ProgramChange128,
    Free,
    Msc,
}

impl ScsMessageType {
    pub fn code(&self) -> &'static str {
        match self {
            Self::NoteOn => "ON",
            Self::NoteOff => "OFF",
            Self::ControlChange => "CC",
            Self::ProgramChange127 => "PC127",
            Self::ProgramChange128 => "PC128",
            Self::Free => "FREE",
            Self::Msc => "MSC",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        let message_type = match code.trim() {
            "ON" => Self::NoteOn,
            "OFF" => Self::NoteOff,
            "CC" => Self::ControlChange,
            "PC127" => Self::ProgramChange127,
            "PC128" => Self::ProgramChange128,
            "FREE" => Self::Free,
            "MSC" => Self::Msc,
            _ => return None,
        };
        Some(message_type)
    }

    pub fn for_message(message: &MidiMessage) -> Result<Self> {
        match message {
            MidiMessage::NoteOn { .. } => Ok(Self::NoteOn),
            MidiMessage::NoteOff { .. } => Ok(Self::NoteOff),
            MidiMessage::ControlChange { .. } => Ok(Self::ControlChange),
            MidiMessage::ProgramChange { .. } => Ok(Self::ProgramChange127),
            MidiMessage::PolyTouch { .. }
            | MidiMessage::AfterTouch { .. }
            | MidiMessage::PitchWheel { .. }
            | MidiMessage::SongSelect { .. }
            | MidiMessage::SongPos { .. }
            | MidiMessage::Start
            | MidiMessage::Stop
            | MidiMessage::Continue => Ok(Self::Free),
            MidiMessage::SysEx { .. } if message.is_msc() => Err(msc_unsupported()),
            MidiMessage::SysEx { .. } => Err(ScsError::UnmappableValue(
                "system exclusive MIDI messages".to_string(),
            )),
        }
    }

    pub fn has_channel(&self) -> bool {
        !matches!(self, Self::Free | Self::Msc)
    }
}

pub fn msc_unsupported() -> ScsError {
    ScsError::UnmappableValue("MIDI Show Control messages".to_string())
}

pub fn encode_free(message: &MidiMessage) -> Result<String> {
    let event = live_event(message).ok_or_else(|| {
        ScsError::UnmappableValue(format!("{} has no raw MIDI encoding", message.type_name()))
    })?;
    let mut bytes = Vec::new();
    event.write_std(&mut bytes)?;
    let hex: Vec<String> = bytes.iter().map(|byte| format!("{:02X}", byte)).collect();
    Ok(hex.join(" "))
}

pub fn decode_free(text: &str) -> Result<MidiMessage> {
    let bytes = parse_hex(text)?;
    let event = LiveEvent::parse(&bytes)
        .map_err(|e| ScsError::UnmappableValue(format!("MIDI data '{}': {}", text, e)))?;

    let message = match event {
        LiveEvent::Midi { channel, message } => {
            let channel = channel.as_int();
            match message {
                WireMessage::NoteOn { key, vel } => MidiMessage::NoteOn {
                    channel,
                    note: key.as_int(),
                    velocity: vel.as_int(),
                },
                WireMessage::NoteOff { key, vel } => MidiMessage::NoteOff {
                    channel,
                    note: key.as_int(),
                    velocity: vel.as_int(),
                },
                WireMessage::Aftertouch { key, vel } => MidiMessage::PolyTouch {
                    channel,
                    note: key.as_int(),
                    value: vel.as_int(),
                },
                WireMessage::Controller { controller, value } => MidiMessage::ControlChange {
                    channel,
                    control: controller.as_int(),
                    value: value.as_int(),
                },
                WireMessage::ProgramChange { program } => MidiMessage::ProgramChange {
                    channel,
                    program: program.as_int(),
                },
                WireMessage::ChannelAftertouch { vel } => MidiMessage::AfterTouch {
                    channel,
                    value: vel.as_int(),
                },
                WireMessage::PitchBend { bend } => MidiMessage::PitchWheel {
                    channel,
                    pitch: bend.as_int(),
                },
            }
        }
        LiveEvent::Common(SystemCommon::SongSelect(song)) => MidiMessage::SongSelect { song: song.as_int() },
        LiveEvent::Common(SystemCommon::SongPosition(pos)) => MidiMessage::SongPos { pos: pos.as_int() },
        LiveEvent::Common(SystemCommon::SysEx(data)) => {
            let message = MidiMessage::SysEx {
                data: data.iter().map(|byte| byte.as_int()).collect(),
            };
            return Err(if message.is_msc() {
                msc_unsupported()
            } else {
                ScsError::UnmappableValue("system exclusive MIDI messages".to_string())
            });
        }
        LiveEvent::Realtime(SystemRealtime::Start) => MidiMessage::Start,
        LiveEvent::Realtime(SystemRealtime::Stop) => MidiMessage::Stop,
        LiveEvent::Realtime(SystemRealtime::Continue) => MidiMessage::Continue,
        _ => {
            return Err(ScsError::UnmappableValue(format!(
                "unsupported MIDI data '{}'",
                text
            )));
        }
    };
    Ok(message)
}

fn live_event(message: &MidiMessage) -> Option<LiveEvent<'static>> {
    let channel_event = |channel: u8, message: WireMessage| LiveEvent::Midi {
        channel: u4::new(channel),
        message,
    };

    let event = match message {
        MidiMessage::NoteOn { channel, note, velocity } => channel_event(
            *channel,
            WireMessage::NoteOn {
                key: u7::new(*note),
                vel: u7::new(*velocity),
            },
        ),
        MidiMessage::NoteOff { channel, note, velocity } => channel_event(
            *channel,
            WireMessage::NoteOff {
                key: u7::new(*note),
                vel: u7::new(*velocity),
            },
        ),
        MidiMessage::ControlChange { channel, control, value } => channel_event(
            *channel,
            WireMessage::Controller {
                controller: u7::new(*control),
                value: u7::new(*value),
            },
        ),
        MidiMessage::ProgramChange { channel, program } => channel_event(
            *channel,
            WireMessage::ProgramChange {
                program: u7::new(*program),
            },
        ),
        MidiMessage::PolyTouch { channel, note, value } => channel_event(
            *channel,
            WireMessage::Aftertouch {
                key: u7::new(*note),
                vel: u7::new(*value),
            },
        ),
        MidiMessage::AfterTouch { channel, value } => channel_event(
            *channel,
            WireMessage::ChannelAftertouch { vel: u7::new(*value) },
        ),
        MidiMessage::PitchWheel { channel, pitch } => channel_event(
            *channel,
            WireMessage::PitchBend {
                bend: PitchBend::from_int(*pitch),
            },
        ),
        MidiMessage::SongSelect { song } => LiveEvent::Common(SystemCommon::SongSelect(u7::new(*song))),
        MidiMessage::SongPos { pos } => LiveEvent::Common(SystemCommon::SongPosition(u14::new(*pos))),
        MidiMessage::Start => LiveEvent::Realtime(SystemRealtime::Start),
        MidiMessage::Stop => LiveEvent::Realtime(SystemRealtime::Stop),
        MidiMessage::Continue => LiveEvent::Realtime(SystemRealtime::Continue),
        MidiMessage::SysEx { .. } => return None,
    };
    Some(event)
}

fn parse_hex(text: &str) -> Result<Vec<u8>> {
    let malformed = || ScsError::malformed(format!("MIDIData '{}' is not a list of hex bytes", text));
    let digits: Vec<u8> = text.bytes().filter(|b| !b.is_ascii_whitespace()).collect();
    if digits.is_empty() || digits.len() % 2 != 0 || !digits.iter().all(u8::is_ascii_hexdigit) {
        return Err(malformed());
    }
    digits
        .chunks(2)
        .map(|pair| {
            let pair = std::str::from_utf8(pair).map_err(|_| malformed())?;
            u8::from_str_radix(pair, 16).map_err(|_| malformed())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_layouts() {
        let cases = [
            ("polytouch channel=3 note=64 value=20", "A3 40 14"),
            ("aftertouch channel=10 value=127", "DA 7F"),
            ("pitchwheel channel=0 pitch=0", "E0 00 40"),
            ("song_select song=5", "F3 05"),
            ("songpos pos=129", "F2 01 01"),
            ("start", "FA"),
            ("stop", "FC"),
            ("continue", "FB"),
        ];
        for (lisp, hex) in cases {
            let message: MidiMessage = lisp.parse().unwrap();
            assert_eq!(ScsMessageType::for_message(&message).unwrap(), ScsMessageType::Free);
            assert_eq!(encode_free(&message).unwrap(), hex);
            assert_eq!(decode_free(hex).unwrap(), message);
        }
    }

    #[test]
    fn pitchwheel_extremes_round_trip() {
        for pitch in [-8192, -1, 1, 8191] {
            let message = MidiMessage::PitchWheel { channel: 4, pitch };
            let hex = encode_free(&message).unwrap();
            assert_eq!(decode_free(&hex).unwrap(), message);
        }
    }

    #[test]
    fn direct_codes() {
        let cases = [
            ("note_on channel=0 note=60 velocity=64", ScsMessageType::NoteOn),
            ("note_off channel=0 note=60 velocity=0", ScsMessageType::NoteOff),
            ("control_change channel=0 control=7 value=100", ScsMessageType::ControlChange),
            ("program_change channel=0 program=3", ScsMessageType::ProgramChange127),
        ];
        for (lisp, expected) in cases {
            let message: MidiMessage = lisp.parse().unwrap();
            let message_type = ScsMessageType::for_message(&message).unwrap();
            assert_eq!(message_type, expected);
            assert_eq!(ScsMessageType::from_code(message_type.code()), Some(expected));
            assert!(message_type.has_channel());
        }
    }

    #[test]
    fn msc_is_rejected() {
        let message: MidiMessage = "sysex data=(127,1,2,1,1,49)".parse().unwrap();
        let err = ScsMessageType::for_message(&message).unwrap_err();
        assert!(err.to_string().contains("MIDI Show Control"));
        assert!(!ScsMessageType::Msc.has_channel());
    }

    #[test]
    fn accepts_unspaced_hex() {
        assert_eq!(decode_free("fa").unwrap(), MidiMessage::Start);
        assert_eq!(
            decode_free("903C40").unwrap(),
            MidiMessage::NoteOn {
                channel: 0,
                note: 60,
                velocity: 64
            }
        );
        assert!(decode_free("9").is_err());
        assert!(decode_free("ZZ").is_err());
    }

    #[test]
    fn non_ascii_data_is_malformed() {
        assert!(matches!(decode_free("Aé0"), Err(ScsError::MalformedDocument(_))));
        assert!(matches!(decode_free("9０"), Err(ScsError::MalformedDocument(_))));
    }
}
