use std::{collections::HashMap, fmt, str::FromStr};

use crate::error::ScsError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MidiMessage {
    NoteOn { channel: u8, note: u8, velocity: u8 },
    NoteOff { channel: u8, note: u8, velocity: u8 },
    ControlChange { channel: u8, control: u8, value: u8 },
    ProgramChange { channel: u8, program: u8 },
    PolyTouch { channel: u8, note: u8, value: u8 },
    AfterTouch { channel: u8, value: u8 },
    PitchWheel { channel: u8, pitch: i16 },
    SongSelect { song: u8 },
    SongPos { pos: u16 },
    Start,
    Stop,
    Continue,
    SysEx { data: Vec<u8> },
}

impl MidiMessage {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::NoteOn { .. } => "note_on",
            Self::NoteOff { .. } => "note_off",
            Self::ControlChange { .. } => "control_change",
            Self::ProgramChange { .. } => "program_change",
            Self::PolyTouch { .. } => "polytouch",
            Self::AfterTouch { .. } => "aftertouch",
            Self::PitchWheel { .. } => "pitchwheel",
            Self::SongSelect { .. } => "song_select",
            Self::SongPos { .. } => "songpos",
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Continue => "continue",
            Self::SysEx { .. } => "sysex",
        }
    }

    pub fn channel(&self) -> Option<u8> {
        match self {
            Self::NoteOn { channel, .. }
            | Self::NoteOff { channel, .. }
            | Self::ControlChange { channel, .. }
            | Self::ProgramChange { channel, .. }
            | Self::PolyTouch { channel, .. }
            | Self::AfterTouch { channel, .. }
            | Self::PitchWheel { channel, .. } => Some(*channel),
            _ => None,
        }
    }

    // MSC travels as a universal real-time sysex, sub-id 0x02.
    pub fn is_msc(&self) -> bool {
        matches!(self, Self::SysEx { data } if data.len() >= 3 && data[0] == 0x7F && data[2] == 0x02)
    }
}

impl fmt::Display for MidiMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name())?;
        match self {
            Self::NoteOn { channel, note, velocity } | Self::NoteOff { channel, note, velocity } => {
                write!(f, " channel={} note={} velocity={}", channel, note, velocity)
            }
            Self::ControlChange { channel, control, value } => {
                write!(f, " channel={} control={} value={}", channel, control, value)
            }
            Self::ProgramChange { channel, program } => {
                write!(f, " channel={} program={}", channel, program)
            }
            Self::PolyTouch { channel, note, value } => {
                write!(f, " channel={} note={} value={}", channel, note, value)
            }
            Self::AfterTouch { channel, value } => write!(f, " channel={} value={}", channel, value),
            Self::PitchWheel { channel, pitch } => write!(f, " channel={} pitch={}", channel, pitch),
            Self::SongSelect { song } => write!(f, " song={}", song),
            Self::SongPos { pos } => write!(f, " pos={}", pos),
            Self::Start | Self::Stop | Self::Continue => Ok(()),
            Self::SysEx { data } => {
                let bytes: Vec<String> = data.iter().map(|byte| byte.to_string()).collect();
                write!(f, " data=({})", bytes.join(","))
            }
        }
    }
}

impl FromStr for MidiMessage {
    type Err = ScsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut tokens = s.split_whitespace();
        let type_name = tokens
            .next()
            .ok_or_else(|| ScsError::IncompleteCueData("empty MIDI message".to_string()))?;
        let fields = Fields::parse(s, tokens)?;

        let message = match type_name {
            "note_on" => Self::NoteOn {
                channel: fields.channel()?,
                note: fields.data("note")?,
                velocity: fields.data("velocity")?,
            },
            "note_off" => Self::NoteOff {
                channel: fields.channel()?,
                note: fields.data("note")?,
                velocity: fields.data("velocity")?,
            },
            "control_change" => Self::ControlChange {
                channel: fields.channel()?,
                control: fields.data("control")?,
                value: fields.data("value")?,
            },
            "program_change" => Self::ProgramChange {
                channel: fields.channel()?,
                program: fields.data("program")?,
            },
            "polytouch" => Self::PolyTouch {
                channel: fields.channel()?,
                note: fields.data("note")?,
                value: fields.data("value")?,
            },
            "aftertouch" => Self::AfterTouch {
                channel: fields.channel()?,
                value: fields.data("value")?,
            },
            "pitchwheel" => Self::PitchWheel {
                channel: fields.channel()?,
                pitch: fields.ranged("pitch", -8192, 8191)? as i16,
            },
            "song_select" => Self::SongSelect {
                song: fields.data("song")?,
            },
            "songpos" => Self::SongPos {
                pos: fields.ranged("pos", 0, 16383)? as u16,
            },
            "start" => Self::Start,
            "stop" => Self::Stop,
            "continue" => Self::Continue,
            "sysex" => Self::SysEx {
                data: fields.bytes("data")?,
            },
            other => {
                return Err(ScsError::UnmappableValue(format!(
                    "unsupported MIDI message type '{}'",
                    other
                )));
            }
        };
        Ok(message)
    }
}

struct Fields<'a> {
    message: &'a str,
    values: HashMap<&'a str, &'a str>,
}

impl<'a> Fields<'a> {
    fn parse(message: &'a str, tokens: impl Iterator<Item = &'a str>) -> Result<Self, ScsError> {
        let mut values = HashMap::new();
        for token in tokens {
            let (key, value) = token.split_once('=').ok_or_else(|| {
                ScsError::IncompleteCueData(format!("bad field '{}' in MIDI message '{}'", token, message))
            })?;
            values.insert(key, value);
        }
        Ok(Self { message, values })
    }

    fn raw(&self, key: &str) -> Result<&'a str, ScsError> {
        self.values.get(key).copied().ok_or_else(|| {
            ScsError::IncompleteCueData(format!("MIDI message '{}' has no {}", self.message, key))
        })
    }

    fn ranged(&self, key: &str, min: i64, max: i64) -> Result<i64, ScsError> {
        let raw = self.raw(key)?;
        match raw.parse::<i64>() {
            Ok(value) if (min..=max).contains(&value) => Ok(value),
            _ => Err(ScsError::IncompleteCueData(format!(
                "{}={} out of range in MIDI message '{}'",
                key, raw, self.message
            ))),
        }
    }

    fn channel(&self) -> Result<u8, ScsError> {
        self.ranged("channel", 0, 15).map(|value| value as u8)
    }

    fn data(&self, key: &str) -> Result<u8, ScsError> {
        self.ranged(key, 0, 127).map(|value| value as u8)
    }

    fn bytes(&self, key: &str) -> Result<Vec<u8>, ScsError> {
        let raw = self.raw(key)?;
        raw.trim_start_matches('(')
            .trim_end_matches(')')
            .split(',')
            .filter(|byte| !byte.trim().is_empty())
            .map(|byte| {
                byte.trim().parse::<u8>().map_err(|_| {
                    ScsError::IncompleteCueData(format!("bad sysex byte '{}' in '{}'", byte, self.message))
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_channel_messages() {
        let message: MidiMessage = "note_on channel=2 note=60 velocity=100".parse().unwrap();
        assert_eq!(
            message,
            MidiMessage::NoteOn {
                channel: 2,
                note: 60,
                velocity: 100
            }
        );
        assert_eq!(message.channel(), Some(2));

        let message: MidiMessage = "pitchwheel channel=0 pitch=-8192".parse().unwrap();
        assert_eq!(message, MidiMessage::PitchWheel { channel: 0, pitch: -8192 });
    }

    #[test]
    fn formats_back_to_the_same_string() {
        for text in [
            "note_off channel=15 note=0 velocity=0",
            "control_change channel=1 control=7 value=127",
            "program_change channel=0 program=5",
            "polytouch channel=3 note=64 value=20",
            "aftertouch channel=3 value=20",
            "pitchwheel channel=9 pitch=4000",
            "song_select song=12",
            "songpos pos=16383",
            "start",
            "sysex data=(127,1,2,1,1)",
        ] {
            let message: MidiMessage = text.parse().unwrap();
            assert_eq!(message.to_string(), text);
        }
    }

    #[test]
    fn rejects_out_of_range_values() {
        assert!("note_on channel=16 note=60 velocity=64".parse::<MidiMessage>().is_err());
        assert!("control_change channel=0 control=128 value=0".parse::<MidiMessage>().is_err());
        assert!("note_on channel=0 note=60".parse::<MidiMessage>().is_err());
    }

    #[test]
    fn unknown_types_are_unmappable() {
        let err = "clock".parse::<MidiMessage>().unwrap_err();
        assert!(matches!(err, ScsError::UnmappableValue(_)));
    }

    #[test]
    fn detects_msc() {
        let message: MidiMessage = "sysex data=(127,1,2,1,1,49)".parse().unwrap();
        assert!(message.is_msc());
        let message: MidiMessage = "sysex data=(67,16,0)".parse().unwrap();
        assert!(!message.is_msc());
    }
}
