use std::path::{Component, Path};

// Level SCS assumes for absent volume fields.
pub const DEFAULT_DB_LEVEL: f64 = -3.0;

pub const MIN_DB_LEVEL: f64 = -75.0;

pub const CUE_PATH_TOKEN: &str = "$(Cue)";

const FILE_SCHEME: &str = "file://";

pub fn linear_to_db(gain: f64) -> f64 {
    if gain <= 0.0 {
        return f64::NEG_INFINITY;
    }
    20.0 * gain.log10()
}

pub fn round_db(level: f64) -> f64 {
    (level * 100.0).round() / 100.0
}

pub fn db_to_linear(level: f64) -> f64 {
    10f64.powf(level / 20.0)
}

pub fn parse_db_level(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.eq_ignore_ascii_case("-inf") {
        return Some(f64::NEG_INFINITY);
    }
    text.parse().ok()
}

// Centre returns None; SCS omits Pan0 for it.
pub fn pan_to_scs(pan: f64) -> Option<u16> {
    if pan == 0.0 {
        return None;
    }
    let pan = pan.clamp(-1.0, 1.0);
    Some(((pan + 1.0) * 500.0).round() as u16)
}

pub fn scs_to_linear_pan(value: i64) -> f64 {
    value.clamp(0, 1000) as f64 / 500.0 - 1.0
}

pub fn seconds_to_ms(seconds: f64) -> Option<i64> {
    let ms = (seconds * 1000.0).round() as i64;
    (ms > 0).then_some(ms)
}

pub fn ms_to_seconds(ms: i64) -> Option<f64> {
    (ms > 0).then(|| ms as f64 / 1000.0)
}

pub fn uri_to_path(uri: &str) -> &str {
    uri.strip_prefix(FILE_SCHEME).unwrap_or(uri)
}

pub fn uri_extension(uri: &str) -> Option<&str> {
    let path = uri_to_path(uri);
    let file_name = path.rsplit(['/', '\\']).next()?;
    let (_, extension) = file_name.rsplit_once('.')?;
    (!extension.is_empty()).then_some(extension)
}

// Files under `base` become `$(Cue)\relative\path`, anything else stays absolute.
pub fn relative_file_path(uri: &str, base: &Path) -> String {
    let path = Path::new(uri_to_path(uri));
    match path.strip_prefix(base) {
        Ok(relative) if !relative.as_os_str().is_empty() => {
            let parts: Vec<_> = relative
                .components()
                .filter_map(|component| match component {
                    Component::Normal(part) => Some(part.to_string_lossy()),
                    _ => None,
                })
                .collect();
            format!("{}\\{}", CUE_PATH_TOKEN, parts.join("\\"))
        }
        _ => path.to_string_lossy().replace('/', "\\"),
    }
}

pub fn file_uri(scs_path: &str, base: &Path) -> String {
    let scs_path = scs_path.trim();
    match scs_path.strip_prefix(CUE_PATH_TOKEN) {
        Some(relative) => {
            let relative = relative.trim_start_matches(['\\', '/']).replace('\\', "/");
            let base = base.to_string_lossy().replace('\\', "/");
            format!("{}{}/{}", FILE_SCHEME, base.trim_end_matches('/'), relative)
        }
        None => format!("{}{}", FILE_SCHEME, scs_path.replace('\\', "/")),
    }
}

pub fn format_decimal(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}
