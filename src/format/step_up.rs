//! Step-up helpers exposed next to the message formatter.

use serde::Serialize;

use crate::error::{ClientError, ErrorCode, Meta};
use crate::util::value::{coerce_seconds, non_empty_str};

/// Hints a step-up response carries for the re-auth prompt.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepUpMeta {
    pub hint: Option<String>,
    pub challenge_id: Option<String>,
    pub expires_in: Option<u64>,
    /// Every other key the server sent.
    #[serde(flatten)]
    pub extra: Meta,
}

/// True only for structured errors carrying the step-up code.
pub fn is_step_up_error(err: &ClientError) -> bool {
    err.as_unified()
        .and_then(|unified| unified.code())
        .is_some_and(ErrorCode::is_step_up)
}

/// Step-up metadata, present only when [`is_step_up_error`] holds.
pub fn get_reauth_meta(err: &ClientError) -> Option<StepUpMeta> {
    if !is_step_up_error(err) {
        return None;
    }
    let Some(meta) = err.as_unified().and_then(|unified| unified.meta()) else {
        return Some(StepUpMeta::default());
    };

    let text = |keys: &[&str]| {
        keys.iter()
            .find_map(|key| meta.get(*key).and_then(non_empty_str))
            .map(str::to_string)
    };
    let expires_in = ["expiresIn", "expires_in"]
        .iter()
        .find_map(|key| meta.get(*key))
        .and_then(coerce_seconds);

    const KNOWN: [&str; 5] = ["hint", "challengeId", "challenge_id", "expiresIn", "expires_in"];
    let extra = meta
        .iter()
        .filter(|(key, _)| !KNOWN.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    Some(StepUpMeta {
        hint: text(&["hint"]),
        challenge_id: text(&["challengeId", "challenge_id"]),
        expires_in,
        extra,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::UnifiedError;
    use serde_json::json;

    fn step_up(meta: serde_json::Value) -> ClientError {
        UnifiedError::builder()
            .status(401)
            .code(ErrorCode::NeedStepUp)
            .meta(meta.as_object().unwrap().clone())
            .build()
            .into()
    }

    #[test]
    fn reads_hint_challenge_and_expiry() {
        let meta = get_reauth_meta(&step_up(json!({
            "hint": "mfa",
            "challengeId": "ch_1",
            "expiresIn": "300",
            "detail": "Confirm it's you",
        })))
        .unwrap();
        assert_eq!(meta.hint.as_deref(), Some("mfa"));
        assert_eq!(meta.challenge_id.as_deref(), Some("ch_1"));
        assert_eq!(meta.expires_in, Some(300));
        assert_eq!(meta.extra.get("detail"), Some(&json!("Confirm it's you")));
        assert!(!meta.extra.contains_key("hint"));
    }

    #[test]
    fn invalid_expiry_is_none() {
        let meta = get_reauth_meta(&step_up(json!({"expiresIn": "soon"}))).unwrap();
        assert_eq!(meta.expires_in, None);
    }

    #[test]
    fn non_step_up_has_no_meta() {
        let err: ClientError = UnifiedError::builder()
            .status(403)
            .code(ErrorCode::Forbidden)
            .build()
            .into();
        assert!(!is_step_up_error(&err));
        assert_eq!(get_reauth_meta(&err), None);
        assert!(!is_step_up_error(&ClientError::aborted()));
    }
}
