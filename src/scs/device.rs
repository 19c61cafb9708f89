use crate::scs::document::ScsElement;

// SCS requires one audio device even in productions without audio cues.
pub const PLACEHOLDER_AUDIO_DEVICE: &str = "Placeholder";

pub const DEFAULT_CHANNELS: u16 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceKind {
    Audio,
    VideoAudio,
    Midi,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeviceDescriptor {
    pub name: String,
    pub channels: Option<u16>,
}

impl DeviceDescriptor {
    pub fn audio(name: impl Into<String>, channels: u16) -> Self {
        Self {
            name: name.into(),
            channels: Some(channels),
        }
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            channels: None,
        }
    }
}

#[derive(Debug, Default)]
pub struct DeviceAggregator {
    audio: Vec<DeviceDescriptor>,
    video_audio: Vec<DeviceDescriptor>,
    midi: Vec<DeviceDescriptor>,
}

impl DeviceAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, kind: DeviceKind, descriptor: DeviceDescriptor) {
        let devices = match kind {
            DeviceKind::Audio => &mut self.audio,
            DeviceKind::VideoAudio => &mut self.video_audio,
            DeviceKind::Midi => &mut self.midi,
        };
        if !devices.contains(&descriptor) {
            log::debug!("Using {:?} device '{}'", kind, descriptor.name);
            devices.push(descriptor);
        }
    }

    pub fn devices(&self, kind: DeviceKind) -> &[DeviceDescriptor] {
        match kind {
            DeviceKind::Audio => &self.audio,
            DeviceKind::VideoAudio => &self.video_audio,
            DeviceKind::Midi => &self.midi,
        }
    }

    pub fn audio_definitions(&self) -> Vec<ScsElement> {
        let placeholder = [DeviceDescriptor::audio(PLACEHOLDER_AUDIO_DEVICE, DEFAULT_CHANNELS)];
        let audio = if self.audio.is_empty() {
            &placeholder[..]
        } else {
            &self.audio[..]
        };

        let mut definitions = Vec::new();
        for (idx, device) in audio.iter().enumerate() {
            definitions.push(ScsElement::with_text(format!("PRLogicalDev{}", idx), &device.name));
            definitions.push(ScsElement::with_text(
                format!("PRNumChans{}", idx),
                &device.channels.unwrap_or(DEFAULT_CHANNELS),
            ));
            if idx == 0 {
                definitions.push(ScsElement::with_text(format!("PRAutoIncludeDev{}", idx), &true));
            }
        }

        for (idx, device) in self.video_audio.iter().enumerate() {
            definitions.push(ScsElement::with_text(
                format!("PRVidAudLogicalDev{}", idx),
                &device.name,
            ));
        }

        definitions.push(ScsElement::with_text("PreviewDevice", &audio[0].name));
        definitions
    }

    pub fn midi_out_definitions(&self) -> Vec<ScsElement> {
        self.midi
            .iter()
            .map(|device| {
                let mut definition = ScsElement::new("PRCSDevice");
                definition
                    .push_text("PRCSLogicalDev", &device.name)
                    .push_text("PRCSDevType", "MIDIOut");
                definition
            })
            .collect()
    }
}
