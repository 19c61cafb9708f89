use crate::{
    codec::{DEFAULT_DB_LEVEL, db_to_linear, file_uri, ms_to_seconds, parse_db_level, scs_to_linear_pan},
    error::Result,
    host::HostContext,
    model::cue::{AudioCueFadeParam, AudioPan, CueParam, MediaElements, MediaParam, UriInput, Volume},
    scs::ScsElement,
};

pub(crate) struct MediaFieldNames {
    pub level: &'static str,
    pub pan: &'static str,
    pub fade_in: &'static str,
    pub fade_out: &'static str,
}

pub(crate) fn level(element: &ScsElement, name: &str) -> Result<f64> {
    Ok(element.parsed(name, parse_db_level)?.unwrap_or(DEFAULT_DB_LEVEL))
}

pub(crate) fn seconds(element: &ScsElement, name: &str) -> Result<Option<f64>> {
    Ok(element.integer(name)?.and_then(ms_to_seconds))
}

pub(crate) fn media_elements(host: &HostContext<'_>, scs_path: &str, gain: f64, pan: f64) -> MediaElements {
    MediaElements {
        uri_input: Some(UriInput {
            uri: file_uri(scs_path, host.session_dir),
        }),
        volume: Some(Volume { volume: gain }),
        audio_pan: Some(AudioPan { pan }),
        sink: Some(host.media.configured_sink()),
    }
}

pub(crate) fn media_cue_param(
    host: &HostContext<'_>,
    sub: &ScsElement,
    names: &MediaFieldNames,
    loop_count: i32,
) -> Result<CueParam> {
    let file_name = sub.required_text("FileName")?;
    let gain = db_to_linear(level(sub, names.level)?);
    let pan = sub.integer(names.pan)?.map_or(0.0, scs_to_linear_pan);

    Ok(CueParam::Media {
        media: MediaParam {
            elements: media_elements(host, file_name, gain, pan),
            start_time: seconds(sub, "StartAt")?,
            stop_time: seconds(sub, "EndAt")?,
            loop_count,
        },
        fade_in: seconds(sub, names.fade_in)?.map(AudioCueFadeParam::linear),
        fade_out: seconds(sub, names.fade_out)?.map(AudioCueFadeParam::linear),
    })
}
