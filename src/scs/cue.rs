use crate::{
    error::{Result, ScsError},
    model::cue::Cue,
    scs::document::ScsElement,
};

const MARKER_OPEN: &str = "[[";
const MARKER_CLOSE: &str = "]]";

// `[[Q7]] Intro` -> (Some("Q7"), "Intro")
pub fn split_cue_marker(name: &str) -> (Option<&str>, &str) {
    let Some(rest) = name.trim_start().strip_prefix(MARKER_OPEN) else {
        return (None, name);
    };
    match rest.find(MARKER_CLOSE) {
        Some(end) if end > 0 => (Some(&rest[..end]), rest[end + MARKER_CLOSE.len()..].trim_start()),
        _ => (None, name),
    }
}

pub fn mark_cue_name(cue_id: &str, name: &str) -> String {
    if name.is_empty() {
        format!("{}{}{}", MARKER_OPEN, cue_id, MARKER_CLOSE)
    } else {
        format!("{}{}{} {}", MARKER_OPEN, cue_id, MARKER_CLOSE, name)
    }
}

pub fn build_generic_cue(cue: &Cue, index: usize) -> ScsElement {
    let (cue_id, name) = split_cue_marker(&cue.name);
    let cue_id = cue_id.map(str::to_string).unwrap_or_else(|| (index + 1).to_string());

    let mut element = ScsElement::new("Cue");
    element.push_text("CueID", &cue_id).push_text("Description", name);
    if !cue.description.is_empty() {
        element.push_text("WhenReqd", &cue.description.replace("\n\n", "\n"));
    }
    element
}

pub fn build_generic_subcue(cue: &Cue, sub_type: &str) -> ScsElement {
    let (_, name) = split_cue_marker(&cue.name);
    let mut element = ScsElement::new("Sub");
    element.push_text("SubType", sub_type).push_text("SubDescription", name);
    element
}

pub fn generic_cue_fields(scs_cue: &ScsElement) -> Result<(String, String)> {
    let cue_id = scs_cue
        .child("CueID")
        .and_then(ScsElement::text)
        .ok_or_else(|| ScsError::malformed("<Cue> has no <CueID>"))?;
    let name = scs_cue
        .child("Description")
        .and_then(ScsElement::text)
        .unwrap_or_default();
    let description = scs_cue
        .child("WhenReqd")
        .and_then(ScsElement::text)
        .unwrap_or_default();
    Ok((mark_cue_name(cue_id.trim(), name), description.to_string()))
}
