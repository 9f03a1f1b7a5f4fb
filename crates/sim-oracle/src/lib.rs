#![deny(warnings)]

//! The scoring-oracle boundary for Statecraft.
//!
//! The core treats action analysis and event generation as a black-box
//! scoring service: given free text (or just the current situation), the
//! oracle returns a bounded [`EffectDelta`] plus metadata. This crate defines
//! that contract, a client for a generative-language endpoint, and the
//! tolerant-extraction / strict-validation step that turns a model response
//! into a fully-typed value. Any failure is an [`OracleError`], which callers
//! map to the deterministic fallback; the oracle never produces a
//! partially-populated result.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sim_core::{EffectDelta, Indicators, PolicyAnalysis, Timeframe, DELTA_LIMIT};
use thiserror::Error;

mod client;

pub use client::{GenerativeClient, OracleConfig};

/// A world event proposed by the oracle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeneratedEvent {
    pub title: String,
    pub description: String,
    pub effects: EffectDelta,
}

/// Errors at the oracle boundary. Every variant is a "use the fallback"
/// signal to the session; none is surfaced to the player as a hard failure.
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("oracle transport error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("oracle endpoint returned {status}: {body}")]
    Api { status: u16, body: String },
    #[error("oracle response contained no text")]
    EmptyResponse,
    #[error("oracle response could not be parsed: {0}")]
    Malformed(String),
    #[error("no oracle is configured")]
    Disabled,
}

/// The scoring oracle: analyzes player actions and proposes world events.
///
/// Implementations must be usable behind a shared reference; the session
/// guarantees at most one call is in flight at a time.
#[async_trait]
pub trait Oracle: Send + Sync {
    /// Score a free-text policy action for the given year.
    async fn analyze_action(
        &self,
        action: &str,
        year: i32,
        indicators: &Indicators,
    ) -> Result<PolicyAnalysis, OracleError>;

    /// Propose a world event for the given year, or `None` when the oracle
    /// declines to produce one.
    async fn generate_event(
        &self,
        year: i32,
        indicators: &Indicators,
    ) -> Result<Option<GeneratedEvent>, OracleError>;
}

/// An oracle that always signals fallback. Used for offline play.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullOracle;

#[async_trait]
impl Oracle for NullOracle {
    async fn analyze_action(
        &self,
        _action: &str,
        _year: i32,
        _indicators: &Indicators,
    ) -> Result<PolicyAnalysis, OracleError> {
        Err(OracleError::Disabled)
    }

    async fn generate_event(
        &self,
        _year: i32,
        _indicators: &Indicators,
    ) -> Result<Option<GeneratedEvent>, OracleError> {
        Err(OracleError::Disabled)
    }
}

/// Extract the embedded JSON object from a model response: the substring
/// from the first `{` to the last `}`, tolerant of surrounding prose and
/// markdown fences.
pub fn extract_json(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

fn effect_field(effects: &serde_json::Value, key: &str) -> Option<f64> {
    effects
        .get(key)
        .and_then(serde_json::Value::as_f64)
        .map(|v| v.clamp(-DELTA_LIMIT, DELTA_LIMIT))
}

/// Normalize a parsed `effects` object into a bounded delta. Non-numeric or
/// absent fields are dropped; numeric fields are clamped to
/// [`DELTA_LIMIT`] regardless of what the model returned.
fn normalize_effects(value: &serde_json::Value) -> EffectDelta {
    let effects = value.get("effects").cloned().unwrap_or_default();
    EffectDelta {
        approval: effect_field(&effects, "approval"),
        national_wealth: effect_field(&effects, "nationalWealth"),
        competitiveness: effect_field(&effects, "competitiveness"),
        technology: effect_field(&effects, "technology"),
        economic_health: effect_field(&effects, "economicHealth"),
        unemployment: effect_field(&effects, "unemployment"),
        satisfaction: effect_field(&effects, "satisfaction"),
        relations: effect_field(&effects, "relations"),
    }
}

/// Parse a model response into a policy analysis.
///
/// Tolerates prose around the JSON object, then validates strictly:
/// effects clamped, feasibility forced into 1..=10, unknown timeframes
/// downgraded to short-term, missing prose fields replaced with fixed
/// defaults. Returns [`OracleError::Malformed`] when no JSON object can be
/// recovered at all.
pub fn parse_analysis(text: &str) -> Result<PolicyAnalysis, OracleError> {
    let raw = extract_json(text).ok_or(OracleError::EmptyResponse)?;
    let value: serde_json::Value =
        serde_json::from_str(raw).map_err(|e| OracleError::Malformed(e.to_string()))?;

    let feasibility = value
        .get("feasibility")
        .and_then(serde_json::Value::as_f64)
        .map(|v| v.clamp(1.0, 10.0) as u8)
        .unwrap_or(5);
    let timeframe = match value.get("timeframe").and_then(serde_json::Value::as_str) {
        Some("immediate") => Timeframe::Immediate,
        Some("long-term") => Timeframe::LongTerm,
        _ => Timeframe::ShortTerm,
    };
    let reasoning = value
        .get("reasoning")
        .and_then(serde_json::Value::as_str)
        .unwrap_or("Policy analysis complete.")
        .to_string();
    let category = value
        .get("category")
        .and_then(serde_json::Value::as_str)
        .unwrap_or("general")
        .to_string();

    Ok(PolicyAnalysis {
        effects: normalize_effects(&value),
        reasoning,
        category,
        feasibility,
        timeframe,
    })
}

/// Parse a model response into a generated event, with the same tolerance
/// and strictness as [`parse_analysis`].
pub fn parse_event(text: &str) -> Result<GeneratedEvent, OracleError> {
    let raw = extract_json(text).ok_or(OracleError::EmptyResponse)?;
    let value: serde_json::Value =
        serde_json::from_str(raw).map_err(|e| OracleError::Malformed(e.to_string()))?;

    let title = value
        .get("title")
        .and_then(serde_json::Value::as_str)
        .unwrap_or("Economic Conditions Shift")
        .to_string();
    let description = value
        .get("description")
        .and_then(serde_json::Value::as_str)
        .unwrap_or("Economic conditions at home and abroad have shifted.")
        .to_string();

    Ok(GeneratedEvent {
        title,
        description,
        effects: normalize_effects(&value),
    })
}
