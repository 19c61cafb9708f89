use kira::Easing;

use crate::{
    codec::{MIN_DB_LEVEL, linear_to_db, pan_to_scs, relative_file_path, round_db, seconds_to_ms, uri_extension},
    error::{Result, ScsError},
    exporter::{CueExporter, DroppedField, ExportedCue},
    host::{HostContext, MediaClass},
    model::cue::{AudioCueFadeParam, Cue, CueParam, MediaParam, SinkKind},
    scs::{
        ScsElement,
        cue::{build_generic_cue, build_generic_subcue},
        device::{DeviceDescriptor, DeviceKind},
    },
};

pub const AUDIO_SUBTYPE: &str = "F";
pub const VIDEO_SUBTYPE: &str = "A";

const PRIMARY_SCREEN: u8 = 2;

pub fn sink_device(sink: SinkKind) -> (&'static str, u16) {
    match sink {
        SinkKind::Auto => ("System", 2),
        SinkKind::Alsa => ("Alsa", 2),
        SinkKind::Jack => ("Jack", 8),
        SinkKind::Pulse => ("Pulse", 2),
    }
}

pub struct MediaCueExporter;

impl CueExporter for MediaCueExporter {
    fn export_cue(&self, host: &HostContext<'_>, cue: &Cue, index: usize) -> Result<ExportedCue> {
        let CueParam::Media {
            media,
            fade_in,
            fade_out,
        } = &cue.param
        else {
            return Err(ScsError::UnsupportedCueKind(cue.kind().to_string()));
        };

        let uri = media
            .elements
            .uri_input
            .as_ref()
            .map(|input| input.uri.as_str())
            .filter(|uri| !uri.is_empty())
            .ok_or_else(|| ScsError::IncompleteCueData("no media source".to_string()))?;
        let extension = uri_extension(uri)
            .ok_or_else(|| ScsError::IncompleteCueData(format!("cannot tell the file type of {}", uri)))?;
        let class = host.media.classify_extension(extension).ok_or_else(|| {
            ScsError::IncompleteCueData(format!("'{}' is neither an audio nor a video file", extension))
        })?;
        let sink = media
            .elements
            .sink
            .ok_or_else(|| ScsError::IncompleteCueData("media pipeline has no output".to_string()))?;
        let (device_name, channels) = sink_device(sink);

        let mut dropped = Vec::new();
        let fade_in_ms = fade_ms(fade_in.as_ref(), "fade-in curve", &mut dropped);
        let fade_out_ms = fade_ms(fade_out.as_ref(), "fade-out curve", &mut dropped);
        let file_name = relative_file_path(uri, host.session_dir);

        let (sub, device) = match class {
            MediaClass::Audio => {
                let mut sub = build_generic_subcue(cue, AUDIO_SUBTYPE);
                sub.push(audio_file(media, &file_name, device_name, fade_in_ms, fade_out_ms));
                (sub, (DeviceKind::Audio, DeviceDescriptor::audio(device_name, channels)))
            }
            MediaClass::Video => {
                if media.loop_count > 0 {
                    dropped.push(DroppedField {
                        field: "loop count".to_string(),
                        reason: "SCS video cues repeat forever or not at all".to_string(),
                    });
                }
                let mut sub = build_generic_subcue(cue, VIDEO_SUBTYPE);
                sub.push_text("OutputScreen", &PRIMARY_SCREEN)
                    .push_text("VideoLogicalAudioDev", device_name)
                    .push_text("SubDBLevel0", &level(media));
                if let Some(pan) = pan(media) {
                    sub.push_text("SubDBPan0", &pan);
                }
                sub.push(video_file(media, &file_name, fade_in_ms, fade_out_ms));
                (sub, (DeviceKind::VideoAudio, DeviceDescriptor::named(device_name)))
            }
        };

        let mut scs_cue = build_generic_cue(cue, index);
        scs_cue.push(sub);
        Ok(ExportedCue {
            cues: vec![scs_cue],
            device: Some(device),
            dropped,
        })
    }
}

// A missing volume element plays at unity gain. SCS has no level below -75 dB.
fn level(media: &MediaParam) -> f64 {
    round_db(linear_to_db(media.elements.volume.map_or(1.0, |volume| volume.volume))).max(MIN_DB_LEVEL)
}

fn pan(media: &MediaParam) -> Option<u16> {
    media.elements.audio_pan.and_then(|pan| pan_to_scs(pan.pan))
}

fn fade_ms(fade: Option<&AudioCueFadeParam>, field: &str, dropped: &mut Vec<DroppedField>) -> Option<i64> {
    let fade = fade?;
    let ms = seconds_to_ms(fade.duration)?;
    if fade.easing != Easing::Linear {
        dropped.push(DroppedField {
            field: field.to_string(),
            reason: "SCS fades are linear".to_string(),
        });
    }
    Some(ms)
}

fn push_range(element: &mut ScsElement, media: &MediaParam) {
    if let Some(start) = media.start_time.and_then(seconds_to_ms) {
        element.push_text("StartAt", &start);
    }
    if let Some(end) = media.stop_time.and_then(seconds_to_ms) {
        element.push_text("EndAt", &end);
    }
}

fn audio_file(
    media: &MediaParam,
    file_name: &str,
    device_name: &str,
    fade_in_ms: Option<i64>,
    fade_out_ms: Option<i64>,
) -> ScsElement {
    let mut file = ScsElement::new("AudioFile");
    file.push_text("FileName", file_name)
        .push_text("LogicalDev0", device_name)
        .push_text("DBLevel0", &level(media));
    if let Some(pan) = pan(media) {
        file.push_text("Pan0", &pan);
    }
    if let Some(ms) = fade_in_ms {
        file.push_text("FadeInTime", &ms);
    }
    if let Some(ms) = fade_out_ms {
        file.push_text("FadeOutTime", &ms);
    }
    push_range(&mut file, media);
    if media.loop_count != 0 {
        file.push_text("Loop", &true);
        if media.loop_count > 0 {
            file.push_text("NumLoops", &media.loop_count);
        }
    }
    file
}

fn video_file(media: &MediaParam, file_name: &str, fade_in_ms: Option<i64>, fade_out_ms: Option<i64>) -> ScsElement {
    let mut file = ScsElement::new("VideoFile");
    file.push_text("FileName", file_name);
    push_range(&mut file, media);
    if let Some(ms) = fade_in_ms {
        file.push_text("PLFadeInTime", &ms);
    }
    if let Some(ms) = fade_out_ms {
        file.push_text("PLFadeOutTime", &ms);
    }
    if media.loop_count != 0 {
        file.push_text("VideoRepeat", &true);
    }
    file
}
