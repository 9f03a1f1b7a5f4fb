#![deny(warnings)]

//! Core domain models and invariants for Statecraft.
//!
//! This crate defines the eight bounded national indicators, the effect
//! reducer that applies sparse deltas under per-field clamping, the derived
//! composite score, termination classification, and the periodic election
//! gate. Everything here is pure and synchronous; randomness is supplied by
//! callers as already-drawn values.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// First simulated year; a fresh game starts here and the termination
/// evaluator never fires while the state is still at it.
pub const START_YEAR: i32 = 2025;

/// Latest year validation accepts; nothing meaningful survives a century.
pub const MAX_YEAR: i32 = 2125;

/// Years between re-election checks.
pub const ELECTION_PERIOD: i32 = 5;

/// Magnitude bound delta producers aim for. The reducer does not bound its
/// inputs, only its outputs; producers clamp their own contributions to this.
pub const DELTA_LIMIT: f64 = 10.0;

/// The eight national indicators plus the derived composite score.
///
/// Every field is kept inside its declared range by [`apply_effects`];
/// `overall_score` is recomputed after every mutation and never set by any
/// delta producer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Indicators {
    /// Presidential approval rating in percent, 0..=100.
    pub approval: f64,
    /// National net assets in trillions, -500..=500; negative is net debt.
    pub national_wealth: f64,
    /// Corporate competitiveness index, 0..=100.
    pub competitiveness: f64,
    /// Technological advancement, 0..=100.
    pub technology: f64,
    /// Economic soundness index, 0..=100.
    pub economic_health: f64,
    /// Unemployment rate in percent, 0..=20.
    pub unemployment: f64,
    /// Public satisfaction, 0..=100.
    pub satisfaction: f64,
    /// International relations index, 0..=100.
    pub relations: f64,
    /// Weighted composite of the other eight, 0..=100. Derived.
    pub overall_score: f64,
}

impl Indicators {
    /// The fixed starting position of a new presidency.
    pub fn baseline() -> Self {
        let mut ind = Self {
            approval: 52.0,
            national_wealth: -120.0,
            competitiveness: 68.0,
            technology: 72.0,
            economic_health: 65.0,
            unemployment: 3.2,
            satisfaction: 58.0,
            relations: 65.0,
            overall_score: 0.0,
        };
        ind.overall_score = overall_score(&ind);
        ind
    }
}

/// A sparse set of signed adjustments to the indicators.
///
/// Absent field = no effect. There is deliberately no `overall_score` field;
/// the composite is always recomputed, never adjusted directly.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EffectDelta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approval: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub national_wealth: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub competitiveness: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub technology: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub economic_health: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unemployment: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub satisfaction: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relations: Option<f64>,
}

impl EffectDelta {
    /// True when no field is present.
    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    /// Present fields as `(name, value)` pairs, in declaration order.
    pub fn entries(&self) -> Vec<(&'static str, f64)> {
        let fields = [
            ("approval", self.approval),
            ("nationalWealth", self.national_wealth),
            ("competitiveness", self.competitiveness),
            ("technology", self.technology),
            ("economicHealth", self.economic_health),
            ("unemployment", self.unemployment),
            ("satisfaction", self.satisfaction),
            ("relations", self.relations),
        ];
        fields
            .into_iter()
            .filter_map(|(name, v)| v.map(|v| (name, v)))
            .collect()
    }

    /// Copy with every present field clamped to `[-limit, limit]`.
    ///
    /// Producers apply this before handing a delta to the reducer, so an
    /// oracle that ignores the requested bounds still cannot swing an
    /// indicator more than `limit` per application.
    pub fn clamped(&self, limit: f64) -> Self {
        let c = |v: Option<f64>| v.map(|v| v.clamp(-limit, limit));
        Self {
            approval: c(self.approval),
            national_wealth: c(self.national_wealth),
            competitiveness: c(self.competitiveness),
            technology: c(self.technology),
            economic_health: c(self.economic_health),
            unemployment: c(self.unemployment),
            satisfaction: c(self.satisfaction),
            relations: c(self.relations),
        }
    }
}

/// Apply a sparse delta to an indicator set, clamping each touched field to
/// its declared range and recomputing the composite score last.
///
/// Returns a new value and never mutates the input, so callers can diff
/// before/after for display.
pub fn apply_effects(indicators: &Indicators, delta: &EffectDelta) -> Indicators {
    let mut next = indicators.clone();
    if let Some(v) = delta.approval {
        next.approval = (next.approval + v).clamp(0.0, 100.0);
    }
    if let Some(v) = delta.national_wealth {
        next.national_wealth = (next.national_wealth + v).clamp(-500.0, 500.0);
    }
    if let Some(v) = delta.competitiveness {
        next.competitiveness = (next.competitiveness + v).clamp(0.0, 100.0);
    }
    if let Some(v) = delta.technology {
        next.technology = (next.technology + v).clamp(0.0, 100.0);
    }
    if let Some(v) = delta.economic_health {
        next.economic_health = (next.economic_health + v).clamp(0.0, 100.0);
    }
    if let Some(v) = delta.unemployment {
        next.unemployment = (next.unemployment + v).clamp(0.0, 20.0);
    }
    if let Some(v) = delta.satisfaction {
        next.satisfaction = (next.satisfaction + v).clamp(0.0, 100.0);
    }
    if let Some(v) = delta.relations {
        next.relations = (next.relations + v).clamp(0.0, 100.0);
    }
    next.overall_score = overall_score(&next);
    next
}

/// Weighted composite of the eight indicators, rounded to the nearest
/// integer.
///
/// National wealth is normalized so -200..200 maps onto 0..100; the
/// unemployment rate is inverted so low unemployment scores high. Weights
/// sum to 1.00.
pub fn overall_score(ind: &Indicators) -> f64 {
    let wealth_score = ((ind.national_wealth + 200.0) / 4.0).clamp(0.0, 100.0);
    let unemployment_score = (100.0 - ind.unemployment * 5.0).max(0.0);
    (ind.approval * 0.15
        + wealth_score * 0.15
        + ind.competitiveness * 0.12
        + ind.technology * 0.12
        + ind.economic_health * 0.15
        + unemployment_score * 0.13
        + ind.satisfaction * 0.13
        + ind.relations * 0.05)
        .round()
}

/// When a policy's effects are expected to materialize.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "immediate")]
    Immediate,
    #[serde(rename = "short-term")]
    ShortTerm,
    #[serde(rename = "long-term")]
    LongTerm,
}

impl Timeframe {
    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::Immediate => "immediate",
            Timeframe::ShortTerm => "short-term",
            Timeframe::LongTerm => "long-term",
        }
    }
}

/// Analysis metadata attached to a scored policy action.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PolicyAnalysis {
    pub effects: EffectDelta,
    pub reasoning: String,
    pub category: String,
    /// Political feasibility, 1..=10.
    pub feasibility: u8,
    pub timeframe: Timeframe,
}

/// One submitted player action and what it did. Immutable once appended.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PolicyRecord {
    pub year: i32,
    /// The free-text action as the player entered it.
    pub policy: String,
    /// The delta that was actually applied.
    pub effects: EffectDelta,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<PolicyAnalysis>,
}

/// One world event and what it did. Immutable once appended.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub year: i32,
    pub title: String,
    pub description: String,
    pub effects: EffectDelta,
}

/// Full game state: the indicator set plus append-only policy and event logs.
///
/// Owned exclusively by the session controller; all mutations are whole-state
/// replacements.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub year: i32,
    pub president_name: String,
    /// Latch: once an ending has been shown, the evaluator returns ongoing
    /// forever so the same state is never re-classified.
    pub ending_shown: bool,
    pub indicators: Indicators,
    pub policies: Vec<PolicyRecord>,
    pub events: Vec<EventRecord>,
}

impl GameState {
    /// Fresh state at the start year with baseline indicators and empty logs.
    pub fn new(president_name: impl Into<String>) -> Self {
        Self {
            year: START_YEAR,
            president_name: president_name.into(),
            ending_shown: false,
            indicators: Indicators::baseline(),
            policies: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Whether an action has already been submitted for the current year.
    /// One action per year; the session rejects a second submission.
    pub fn action_taken_this_year(&self) -> bool {
        self.policies.iter().any(|p| p.year == self.year)
    }
}

/// Validation errors for domain invariants.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// Indicator outside its declared range.
    #[error("{field} value {value} is out of range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    /// Numeric field must be finite.
    #[error("non-finite value in {0}")]
    NonFinite(&'static str),
    /// Stored composite does not match the recomputation.
    #[error("overallScore is stale: stored {stored}, computed {computed}")]
    StaleScore { stored: f64, computed: f64 },
    /// President name must be non-empty.
    #[error("president name must not be empty")]
    EmptyName,
    /// Year outside supported range.
    #[error("year {0} is out of supported range [2025, 2125]")]
    YearOutOfRange(i32),
}

fn check_range(
    field: &'static str,
    value: f64,
    min: f64,
    max: f64,
) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFinite(field));
    }
    if value < min || value > max {
        return Err(ValidationError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}

/// Validate an indicator set: every field finite and in range, composite
/// consistent with the recomputation.
pub fn validate_indicators(ind: &Indicators) -> Result<(), ValidationError> {
    check_range("approval", ind.approval, 0.0, 100.0)?;
    check_range("nationalWealth", ind.national_wealth, -500.0, 500.0)?;
    check_range("competitiveness", ind.competitiveness, 0.0, 100.0)?;
    check_range("technology", ind.technology, 0.0, 100.0)?;
    check_range("economicHealth", ind.economic_health, 0.0, 100.0)?;
    check_range("unemployment", ind.unemployment, 0.0, 20.0)?;
    check_range("satisfaction", ind.satisfaction, 0.0, 100.0)?;
    check_range("relations", ind.relations, 0.0, 100.0)?;
    check_range("overallScore", ind.overall_score, 0.0, 100.0)?;
    let computed = overall_score(ind);
    if ind.overall_score != computed {
        return Err(ValidationError::StaleScore {
            stored: ind.overall_score,
            computed,
        });
    }
    Ok(())
}

/// Validate a full game state.
pub fn validate_state(state: &GameState) -> Result<(), ValidationError> {
    if !(START_YEAR..=MAX_YEAR).contains(&state.year) {
        return Err(ValidationError::YearOutOfRange(state.year));
    }
    if state.president_name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }
    validate_indicators(&state.indicators)
}

/// Terminal outcome classes. Checked in fixed precedence: defeat first,
/// then true victory, then victory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndingKind {
    Defeat,
    Victory,
    TrueVictory,
}

impl EndingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EndingKind::Defeat => "defeat",
            EndingKind::Victory => "victory",
            EndingKind::TrueVictory => "true_victory",
        }
    }
}

/// A classified ending with player-facing prose.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EndingReport {
    pub kind: EndingKind,
    pub title: String,
    pub description: String,
    pub reason: String,
}

impl EndingReport {
    fn new(
        kind: EndingKind,
        title: &str,
        description: &str,
        reason: String,
    ) -> Self {
        Self {
            kind,
            title: title.to_string(),
            description: description.to_string(),
            reason,
        }
    }
}

/// Classify the state into a terminal outcome, or `None` while ongoing.
///
/// Short-circuits at the first latch: a state still at the start year never
/// terminates (guards against the baseline tripping a condition), and a
/// state whose ending was already shown is never re-classified. Otherwise
/// defeat conditions are checked before true-victory, and true-victory
/// before victory; within a class, the first matching rule wins.
pub fn check_ending(state: &GameState) -> Option<EndingReport> {
    if state.year <= START_YEAR || state.ending_shown {
        return None;
    }
    check_defeat(&state.indicators)
        .or_else(|| check_true_victory(&state.indicators))
        .or_else(|| check_victory(state))
}

fn check_defeat(ind: &Indicators) -> Option<EndingReport> {
    if ind.overall_score <= 10.0 {
        return Some(EndingReport::new(
            EndingKind::Defeat,
            "National Collapse",
            "The state has completely collapsed.",
            format!(
                "An overall governance score of {:.0} left the country impossible to run.",
                ind.overall_score
            ),
        ));
    }
    if ind.national_wealth <= -400.0 && ind.economic_health <= 15.0 {
        return Some(EndingReport::new(
            EndingKind::Defeat,
            "Total Economic Collapse",
            "The national economy is beyond recovery.",
            format!(
                "National debt reached {:.0} trillion while economic health fell to {:.0}.",
                ind.national_wealth.abs(),
                ind.economic_health
            ),
        ));
    }
    if ind.approval <= 5.0 && ind.satisfaction <= 10.0 {
        return Some(EndingReport::new(
            EndingKind::Defeat,
            "Forced Resignation",
            "Overwhelming public backlash has forced the president out of office.",
            format!(
                "With {:.1}% approval and satisfaction at {:.0}, governing became impossible.",
                ind.approval, ind.satisfaction
            ),
        ));
    }
    if ind.unemployment >= 15.0 {
        return Some(EndingReport::new(
            EndingKind::Defeat,
            "Social Breakdown",
            "Mass unemployment has thrown society into chaos.",
            format!(
                "An unemployment rate of {:.1}% paralyzed the country.",
                ind.unemployment
            ),
        ));
    }
    None
}

fn check_true_victory(ind: &Indicators) -> Option<EndingReport> {
    if ind.technology >= 98.0
        && ind.competitiveness >= 98.0
        && ind.economic_health >= 98.0
        && ind.relations >= 98.0
        && ind.national_wealth >= 300.0
    {
        return Some(EndingReport::new(
            EndingKind::TrueVictory,
            "Space Conquest",
            "The first president in history to lead humanity beyond Earth.",
            "Every sector surpassed human limits and a spacefaring civilization was founded."
                .to_string(),
        ));
    }
    if ind.relations >= 97.0 && ind.national_wealth >= 400.0 && ind.competitiveness >= 95.0 {
        return Some(EndingReport::new(
            EndingKind::TrueVictory,
            "Global Unification",
            "A great leader who peacefully unified the whole world.",
            "Overwhelming economic and diplomatic power united the planet under one banner."
                .to_string(),
        ));
    }
    if ind.technology >= 99.0 && ind.economic_health >= 97.0 && ind.national_wealth >= 450.0 {
        return Some(EndingReport::new(
            EndingKind::TrueVictory,
            "Solar System Conquest",
            "An interplanetary empire now spans the entire solar system.",
            "Transcendent technology and wealth achieved what was thought impossible."
                .to_string(),
        ));
    }
    None
}

fn check_victory(state: &GameState) -> Option<EndingReport> {
    let ind = &state.indicators;
    if state.year >= START_YEAR + 30 && ind.overall_score >= 75.0 {
        return Some(EndingReport::new(
            EndingKind::Victory,
            "Thirty Successful Years",
            "Three decades of steady, successful governance are complete.",
            format!(
                "Thirty years in office closed out with an overall score of {:.0}.",
                ind.overall_score
            ),
        ));
    }
    if ind.overall_score >= 90.0 {
        return Some(EndingReport::new(
            EndingKind::Victory,
            "A Perfect Presidency",
            "Outstanding results across every field of government.",
            format!(
                "An overall score of {:.0} places this presidency among the greatest in history.",
                ind.overall_score
            ),
        ));
    }
    None
}

/// Whether advancing into `next_year` triggers a re-election check.
/// Elections fall every [`ELECTION_PERIOD`] years after the start year.
pub fn election_due(next_year: i32) -> bool {
    next_year > START_YEAR && (next_year - START_YEAR) % ELECTION_PERIOD == 0
}

/// Decide an election from an already-drawn uniform value in `[0, 100)`.
/// The approval rating is a direct re-election probability percentage.
pub fn election_won(approval: f64, draw: f64) -> bool {
    draw <= approval
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn baseline_composite_is_59() {
        let ind = Indicators::baseline();
        assert_eq!(ind.overall_score, 59.0);
        validate_indicators(&ind).unwrap();
    }

    #[test]
    fn empty_delta_is_a_noop() {
        let ind = Indicators::baseline();
        let next = apply_effects(&ind, &EffectDelta::default());
        assert_eq!(ind, next);
    }

    #[test]
    fn reducer_does_not_mutate_input() {
        let ind = Indicators::baseline();
        let before = ind.clone();
        let _ = apply_effects(
            &ind,
            &EffectDelta {
                approval: Some(-30.0),
                ..Default::default()
            },
        );
        assert_eq!(ind, before);
    }

    #[test]
    fn score_is_a_pure_function() {
        let ind = Indicators::baseline();
        assert_eq!(overall_score(&ind), overall_score(&ind));
    }

    #[test]
    fn delta_clamped_bounds_every_field() {
        let delta = EffectDelta {
            approval: Some(55.0),
            national_wealth: Some(-300.0),
            unemployment: Some(0.2),
            ..Default::default()
        };
        let clamped = delta.clamped(DELTA_LIMIT);
        assert_eq!(clamped.approval, Some(10.0));
        assert_eq!(clamped.national_wealth, Some(-10.0));
        assert_eq!(clamped.unemployment, Some(0.2));
        assert_eq!(clamped.technology, None);
    }

    #[test]
    fn snapshot_keys_are_camel_case() {
        let state = GameState::new("Kim");
        let v = serde_json::to_value(&state).unwrap();
        assert!(v.get("presidentName").is_some());
        assert!(v.get("endingShown").is_some());
        assert!(v["indicators"].get("nationalWealth").is_some());
        assert!(v["indicators"].get("overallScore").is_some());
    }

    #[test]
    fn delta_roundtrip_skips_absent_fields() {
        let delta = EffectDelta {
            technology: Some(3.0),
            ..Default::default()
        };
        let s = serde_json::to_string(&delta).unwrap();
        assert_eq!(s, r#"{"technology":3.0}"#);
        let back: EffectDelta = serde_json::from_str(&s).unwrap();
        assert_eq!(back, delta);
    }

    fn state_with(ind: Indicators, year: i32) -> GameState {
        let mut state = GameState::new("Test");
        state.indicators = ind;
        state.indicators.overall_score = overall_score(&state.indicators);
        state.year = year;
        state
    }

    fn floor_indicators() -> Indicators {
        Indicators {
            approval: 0.0,
            national_wealth: -500.0,
            competitiveness: 0.0,
            technology: 0.0,
            economic_health: 0.0,
            unemployment: 20.0,
            satisfaction: 0.0,
            relations: 0.0,
            overall_score: 0.0,
        }
    }

    #[test]
    fn start_year_never_terminates() {
        let state = state_with(floor_indicators(), START_YEAR);
        assert!(check_ending(&state).is_none());
    }

    #[test]
    fn ending_latch_suppresses_reclassification() {
        let mut state = state_with(floor_indicators(), START_YEAR + 3);
        assert!(check_ending(&state).is_some());
        state.ending_shown = true;
        assert!(check_ending(&state).is_none());
    }

    #[test]
    fn defeat_beats_simultaneous_defeat_rules() {
        // Qualifies for both national collapse (score <= 10) and social
        // breakdown (unemployment >= 15); the first rule must win.
        let state = state_with(floor_indicators(), 2060);
        let ending = check_ending(&state).unwrap();
        assert_eq!(ending.kind, EndingKind::Defeat);
        assert_eq!(ending.title, "National Collapse");
    }

    #[test]
    fn true_victory_beats_victory() {
        let ind = Indicators {
            approval: 100.0,
            national_wealth: 500.0,
            competitiveness: 100.0,
            technology: 100.0,
            economic_health: 100.0,
            unemployment: 0.0,
            satisfaction: 100.0,
            relations: 100.0,
            overall_score: 0.0,
        };
        // Score is 100, so plain victory also matches; true victory wins.
        let state = state_with(ind, 2060);
        let ending = check_ending(&state).unwrap();
        assert_eq!(ending.kind, EndingKind::TrueVictory);
        assert_eq!(ending.title, "Space Conquest");
    }

    #[test]
    fn defeat_beats_victory() {
        // unemployment >= 15 forces defeat even with a long tenure.
        let mut ind = Indicators::baseline();
        ind.unemployment = 16.0;
        let state = state_with(ind, 2060);
        let ending = check_ending(&state).unwrap();
        assert_eq!(ending.kind, EndingKind::Defeat);
    }

    #[test]
    fn long_tenure_victory_fires_at_2055() {
        let mut ind = Indicators::baseline();
        ind.approval = 90.0;
        ind.national_wealth = 200.0;
        ind.satisfaction = 85.0;
        let state = state_with(ind.clone(), 2054);
        assert!(check_ending(&state).is_none());
        let state = state_with(ind, 2055);
        let ending = check_ending(&state).unwrap();
        assert_eq!(ending.kind, EndingKind::Victory);
        assert_eq!(ending.title, "Thirty Successful Years");
    }

    #[test]
    fn election_cadence() {
        assert!(!election_due(START_YEAR));
        assert!(!election_due(2026));
        assert!(election_due(2030));
        assert!(!election_due(2031));
        assert!(election_due(2035));
        assert!(election_due(2055));
    }

    #[test]
    fn election_draw_boundaries() {
        assert!(election_won(50.0, 50.0));
        assert!(!election_won(50.0, 50.1));
        assert!(election_won(100.0, 99.999));
        assert!(!election_won(0.0, 0.001));
        assert!(election_won(0.0, 0.0));
    }

    #[test]
    fn validation_rejects_out_of_range_and_stale_score() {
        let mut ind = Indicators::baseline();
        ind.unemployment = 25.0;
        assert!(matches!(
            validate_indicators(&ind),
            Err(ValidationError::OutOfRange { field: "unemployment", .. })
        ));
        let mut ind = Indicators::baseline();
        ind.overall_score += 1.0;
        assert!(matches!(
            validate_indicators(&ind),
            Err(ValidationError::StaleScore { .. })
        ));
        let mut state = GameState::new("  ");
        state.indicators = Indicators::baseline();
        assert_eq!(validate_state(&state), Err(ValidationError::EmptyName));
    }

    proptest! {
        #[test]
        fn reducer_output_always_in_range(
            approval in -1e6f64..1e6,
            wealth in -1e6f64..1e6,
            competitiveness in -1e6f64..1e6,
            technology in -1e6f64..1e6,
            economic in -1e6f64..1e6,
            unemployment in -1e6f64..1e6,
            satisfaction in -1e6f64..1e6,
            relations in -1e6f64..1e6,
        ) {
            let delta = EffectDelta {
                approval: Some(approval),
                national_wealth: Some(wealth),
                competitiveness: Some(competitiveness),
                technology: Some(technology),
                economic_health: Some(economic),
                unemployment: Some(unemployment),
                satisfaction: Some(satisfaction),
                relations: Some(relations),
            };
            let next = apply_effects(&Indicators::baseline(), &delta);
            prop_assert!(validate_indicators(&next).is_ok());
        }

        #[test]
        fn composite_stays_in_unit_range(
            approval in 0.0f64..=100.0,
            wealth in -500.0f64..=500.0,
            unemployment in 0.0f64..=20.0,
        ) {
            let mut ind = Indicators::baseline();
            ind.approval = approval;
            ind.national_wealth = wealth;
            ind.unemployment = unemployment;
            let score = overall_score(&ind);
            prop_assert!((0.0..=100.0).contains(&score));
            prop_assert_eq!(score, score.round());
        }
    }
}
