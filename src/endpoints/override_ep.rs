//! Manual override of the anomaly lamp.
//!
//! `PUT /anomaly {"action":true|false}` forces the indicator on or off;
//! `DELETE /anomaly` hands control back to the classifiers.  The anomaly
//! condition itself is never touched here.

use log::warn;

use crate::anomaly::{AnomalyState, OverrideState};
use crate::error::RequestError;
use crate::field;

/// Parse the `action` flag and enable the override.
pub fn set_override(payload: &[u8], state: &mut AnomalyState) -> Result<OverrideState, RequestError> {
    if payload.is_empty() {
        return Err(RequestError::MalformedRequest("empty payload"));
    }
    let text = core::str::from_utf8(payload)
        .map_err(|_| RequestError::MalformedRequest("payload is not UTF-8"))?;
    let desired_on = field::get_bool(text, "action").map_err(|e| {
        warn!("anomaly: rejected override '{}': {}", text, e);
        RequestError::from(e)
    })?;
    state.set_override(desired_on);
    Ok(state.override_state())
}

/// Disable the override.
pub fn clear_override(state: &mut AnomalyState) -> OverrideState {
    state.clear_override();
    state.override_state()
}
