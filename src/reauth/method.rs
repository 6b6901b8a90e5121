//! Re-auth method inference from explicit hints, challenges, and problem text.

use crate::error::ProblemDetail;

use super::challenge::ChallengeParams;
use super::ReauthMethod;

const MFA_MARKERS: [&str; 3] = ["mfa", "totp", "otp"];
const PASSWORD_MARKERS: [&str; 2] = ["password", "passcode"];
const CHALLENGE_KEYS: [&str; 3] = ["error", "prompt", "acr_values"];

/// Signals available for picking a method, strongest first.
#[derive(Debug, Default)]
pub(crate) struct MethodHints<'a> {
    pub explicit: Option<&'a str>,
    pub challenge: Option<&'a ChallengeParams>,
    pub problem: Option<&'a ProblemDetail>,
}

/// Classify free text as an MFA or password hint. MFA markers win.
pub(crate) fn method_from_text(text: &str) -> Option<ReauthMethod> {
    let lower = text.to_lowercase();
    if MFA_MARKERS.iter().any(|marker| lower.contains(marker)) {
        Some(ReauthMethod::Mfa)
    } else if PASSWORD_MARKERS.iter().any(|marker| lower.contains(marker)) {
        Some(ReauthMethod::Password)
    } else {
        None
    }
}

pub(crate) fn infer_method(hints: &MethodHints<'_>, fallback: ReauthMethod) -> ReauthMethod {
    if let Some(explicit) = hints.explicit {
        if let Some(method) = method_from_text(explicit) {
            return method;
        }
        if explicit.trim().eq_ignore_ascii_case("any") {
            return ReauthMethod::Any;
        }
    }

    if let Some(params) = hints.challenge {
        let from_challenge = CHALLENGE_KEYS
            .iter()
            .filter_map(|key| params.get(*key))
            .find_map(|value| method_from_text(value));
        if let Some(method) = from_challenge {
            return method;
        }
    }

    if let Some(problem) = hints.problem {
        if let Some(method) = problem.texts().find_map(method_from_text) {
            return method;
        }
    }

    fallback
}
