// crates/airtable-gate-core/src/gate.rs
// ============================================================================
// Module: Usage Gates
// Description: Welcome gate and repeat-action throttle for tool calls.
// Purpose: Decide whether a call dispatches, onboards, or is blocked.
// Dependencies: airtable-gate-core::session, airtable-gate-core::tooling
// ============================================================================

//! ## Overview
//! Two gates run ahead of dispatch. The welcome gate consumes a session's
//! very first call, whatever it names, and answers with a fixed onboarding
//! message. The repeat-action throttle lets each restricted tool run once
//! per session and blocks further invocations unless the serialized argument
//! text carries an override phrase. Override matching is substring
//! containment over case-folded text, deliberately permissive: a false
//! positive dispatches one extra call, a false negative would block a
//! legitimate repeat.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::session::SessionKey;
use crate::session::SessionRegistry;
use crate::tooling::ToolName;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Onboarding message returned for a session's first interaction.
pub const WELCOME_TEXT: &str = "You can use the following tools to interact with your Airtable \
                                account:\n\n- List available bases\n- Show tables in a base\n- \
                                Create, update, and manage tables and fields\n- List, add, \
                                update, and delete records\n- Search for records\n- Get a record \
                                by its ID\n\nI don't have direct access to your credentials, but \
                                I can perform these actions through the tools provided.";

/// Phrases interpreted as explicit intent to repeat a restricted action.
///
/// Matched as lowercase substrings of the serialized argument text; the
/// trailing space in `"create "` is intentional.
pub const OVERRIDE_PHRASES: &[&str] = &[
    "create multiple",
    "create ",
    "add more",
    "again",
    "list again",
    "another",
    "more",
    "repeat",
    "next",
    "several",
    "many",
    "multiple",
    "all",
    "batch",
    "bulk",
];

// ============================================================================
// SECTION: Welcome Gate
// ============================================================================

/// Gate that consumes a session's first call with an onboarding response.
pub struct WelcomeGate;

impl WelcomeGate {
    /// Returns true when this call must be answered with [`WELCOME_TEXT`]
    /// instead of dispatching, marking the session as welcomed.
    ///
    /// Runs strictly before credential resolution; the consumed call must be
    /// retried by the caller to perform the named action.
    #[must_use]
    pub fn intercept(registry: &SessionRegistry, key: &SessionKey) -> bool {
        registry.with_session(key, |session| {
            if session.welcomed {
                false
            } else {
                session.welcomed = true;
                true
            }
        })
    }
}

// ============================================================================
// SECTION: Override Detector
// ============================================================================

/// Detector for natural-language phrases that signal intentional repetition.
pub struct OverrideDetector;

impl OverrideDetector {
    /// Returns true when the serialized argument text contains any override
    /// phrase.
    ///
    /// Matching is case-insensitive substring containment, not word-boundary
    /// matching: `"moreover"` matches through `"more"`.
    #[must_use]
    pub fn matches(args_text: &str) -> bool {
        let folded = args_text.to_lowercase();
        OVERRIDE_PHRASES.iter().any(|phrase| folded.contains(phrase))
    }
}

// ============================================================================
// SECTION: Action Throttle
// ============================================================================

/// Outcome of the repeat-action gate for a single call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThrottleDecision {
    /// The tool is not restricted; the gate does not apply.
    Unrestricted,
    /// First invocation of the restricted tool; the call dispatches and the
    /// tool is marked used.
    FirstUse,
    /// Repeat invocation explicitly requested through an override phrase;
    /// the call dispatches and the used set is unchanged.
    OverrideGranted,
    /// Repeat invocation without an override phrase; the call must not
    /// reach the upstream.
    Blocked,
}

/// Per-session repeat-action gate over restricted tools.
pub struct ActionThrottle;

impl ActionThrottle {
    /// Evaluates the gate for one call, mutating session state for first
    /// uses.
    ///
    /// `args_text` is the raw serialized form of the call's arguments; it is
    /// case-folded internally. The check-and-mark runs under one registry
    /// lock so a single call never observes its own partial update.
    #[must_use]
    pub fn evaluate(
        registry: &SessionRegistry,
        key: &SessionKey,
        tool: ToolName,
        args_text: &str,
    ) -> ThrottleDecision {
        if !tool.is_restricted() {
            return ThrottleDecision::Unrestricted;
        }
        registry.with_session(key, |session| {
            if session.used.contains(&tool) {
                if OverrideDetector::matches(args_text) {
                    ThrottleDecision::OverrideGranted
                } else {
                    ThrottleDecision::Blocked
                }
            } else {
                session.used.insert(tool);
                ThrottleDecision::FirstUse
            }
        })
    }
}

/// Builds the warning text returned for a blocked repeat invocation.
#[must_use]
pub fn block_warning(tool: ToolName) -> String {
    format!(
        "The \"{tool}\" tool has already been used in this session. To run it again, please \
         specify clearly (e.g., \"create 5 fields\", \"list again\")."
    )
}

// ============================================================================
// SECTION: Tests
// ============================================================================
