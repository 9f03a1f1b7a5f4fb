#![deny(warnings)]

//! World events and deterministic fallbacks for Statecraft.
//!
//! This crate provides:
//! - The static weighted event table and cumulative-probability selection
//! - The unconditional per-year natural-drift sampler
//! - The keyword heuristic that analyzes a policy action when the scoring
//!   oracle is unavailable
//!
//! All randomized contributions stay within [`sim_core::DELTA_LIMIT`] after
//! generation; the effect reducer clamps again on application.

use rand::Rng;
use serde::{Deserialize, Serialize};
use sim_core::{EffectDelta, PolicyAnalysis, Timeframe, DELTA_LIMIT};
use thiserror::Error;

/// One entry of the static event table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RandomEvent {
    pub title: String,
    pub description: String,
    pub effects: EffectDelta,
    /// Selection weight; the table's probabilities form a cumulative
    /// distribution and their sum is configuration, not an invariant.
    pub probability: f64,
}

/// Errors in a user-supplied event table.
#[derive(Debug, Error, PartialEq)]
pub enum TableError {
    #[error("event {0:?} has a negative or non-finite probability")]
    BadProbability(String),
    #[error("event {0:?} has a non-finite effect value")]
    BadEffect(String),
}

/// Validate an event table: probabilities non-negative and finite, effect
/// values finite.
pub fn validate_table(table: &[RandomEvent]) -> Result<(), TableError> {
    for event in table {
        if !event.probability.is_finite() || event.probability < 0.0 {
            return Err(TableError::BadProbability(event.title.clone()));
        }
        if event.effects.entries().iter().any(|(_, v)| !v.is_finite()) {
            return Err(TableError::BadEffect(event.title.clone()));
        }
    }
    Ok(())
}

fn effects(
    approval: Option<f64>,
    national_wealth: Option<f64>,
    competitiveness: Option<f64>,
    technology: Option<f64>,
    economic_health: Option<f64>,
    unemployment: Option<f64>,
    satisfaction: Option<f64>,
    relations: Option<f64>,
) -> EffectDelta {
    EffectDelta {
        approval,
        national_wealth,
        competitiveness,
        technology,
        economic_health,
        unemployment,
        satisfaction,
        relations,
    }
}

/// The built-in event table.
///
/// Probabilities sum to 0.85, so a uniform draw lands past the final
/// cumulative bound about 15% of the time and no event fires that year.
pub fn standard_events() -> Vec<RandomEvent> {
    let entry = |title: &str, description: &str, fx: EffectDelta, probability: f64| RandomEvent {
        title: title.to_string(),
        description: description.to_string(),
        effects: fx,
        probability,
    };
    vec![
        entry(
            "Global Economic Crisis",
            "An escalating trade war between the major powers has tipped the world \
             economy into recession, and the shock is reaching domestic markets.",
            effects(
                Some(-5.0),
                None,
                Some(-3.0),
                None,
                Some(-15.0),
                Some(1.5),
                Some(-8.0),
                None,
            ),
            0.12,
        ),
        entry(
            "Cultural Wave Goes Global",
            "Domestic pop culture is sweeping the world again, lifting the country's \
             image and its creative industries.",
            effects(
                Some(3.0),
                None,
                Some(5.0),
                None,
                Some(4.0),
                None,
                Some(6.0),
                Some(8.0),
            ),
            0.15,
        ),
        entry(
            "Cyber Security Incident",
            "A coordinated attack on major banks and public agencies exposed serious \
             gaps in the national security infrastructure.",
            effects(
                Some(-8.0),
                None,
                None,
                Some(-2.0),
                None,
                None,
                Some(-5.0),
                Some(-3.0),
            ),
            0.09,
        ),
        entry(
            "Semiconductor Breakthrough",
            "A domestic firm has succeeded in next-generation chip development, \
             securing a commanding lead in the global market.",
            effects(
                Some(5.0),
                None,
                Some(8.0),
                Some(10.0),
                Some(8.0),
                None,
                None,
                Some(4.0),
            ),
            0.07,
        ),
        entry(
            "Natural Disaster",
            "A severe typhoon has caused damage nationwide; rapid recovery measures \
             are needed.",
            effects(
                Some(-3.0),
                Some(-15.0),
                None,
                None,
                Some(-5.0),
                None,
                Some(-6.0),
                None,
            ),
            0.13,
        ),
        entry(
            "International Tech Cooperation",
            "Joint technology projects with key partners wrapped up successfully, \
             raising both capability and standing abroad.",
            effects(
                Some(4.0),
                None,
                Some(4.0),
                Some(6.0),
                None,
                None,
                None,
                Some(7.0),
            ),
            0.1,
        ),
        entry(
            "Youth Employment Rebound",
            "Job-creation programs are paying off, with youth employment figures \
             improving sharply.",
            effects(
                Some(7.0),
                None,
                None,
                None,
                Some(6.0),
                Some(-2.0),
                Some(8.0),
                None,
            ),
            0.09,
        ),
        entry(
            "Diplomatic Dispute",
            "A dispute with a neighboring country has flared up, straining the \
             region's diplomatic climate.",
            effects(
                Some(-6.0),
                None,
                Some(-2.0),
                None,
                None,
                None,
                Some(-4.0),
                Some(-10.0),
            ),
            0.1,
        ),
    ]
}

/// Select an event from the table given a uniform draw in `[0, 1)`.
///
/// The probabilities are treated as a cumulative distribution: the first
/// entry whose cumulative probability meets or exceeds the draw wins; a draw
/// beyond the sum of all probabilities selects nothing.
pub fn pick_event(table: &[RandomEvent], draw: f64) -> Option<&RandomEvent> {
    let mut cumulative = 0.0;
    for event in table {
        cumulative += event.probability;
        if draw <= cumulative {
            return Some(event);
        }
    }
    None
}

/// Draw an event (or nothing) from the table with the supplied RNG.
pub fn draw_event<'a, R: Rng + ?Sized>(
    table: &'a [RandomEvent],
    rng: &mut R,
) -> Option<&'a RandomEvent> {
    pick_event(table, rng.gen_range(0.0..1.0))
}

/// The small stochastic change every year brings regardless of events.
/// Applied unconditionally on year advance and not logged as an event.
pub fn natural_drift<R: Rng + ?Sized>(rng: &mut R) -> EffectDelta {
    EffectDelta {
        approval: Some(rng.gen_range(-1.0..1.0)),
        satisfaction: Some(rng.gen_range(-0.75..0.75)),
        economic_health: Some(rng.gen_range(-1.0..1.0)),
        unemployment: Some(rng.gen_range(-0.15..0.15)),
        ..Default::default()
    }
}

/// Keyword-heuristic analysis of a policy action, used when the scoring
/// oracle is unavailable. Category classification is deterministic in the
/// action text; effect magnitudes are randomized within fixed per-bucket
/// ranges and clamped to [`DELTA_LIMIT`] afterwards.
pub fn analyze_action_heuristic<R: Rng + ?Sized>(action: &str, rng: &mut R) -> PolicyAnalysis {
    let text = action.to_lowercase();
    let contains_any = |words: &[&str]| words.iter().any(|w| text.contains(w));

    let mut fx = EffectDelta::default();
    let reasoning;
    let category;
    let mut feasibility = 5;
    let mut timeframe = Timeframe::ShortTerm;

    if text.contains("tax") {
        category = "economy";
        if contains_any(&["cut", "lower", "reduce"]) {
            fx.approval = Some(rng.gen_range(2..=5) as f64);
            fx.satisfaction = Some(rng.gen_range(3..=6) as f64);
            fx.economic_health = Some(rng.gen_range(3..=8) as f64);
            fx.national_wealth = Some(-(rng.gen_range(15..=34) as f64));
            fx.competitiveness = Some(rng.gen_range(2..=4) as f64);
            reasoning = "Tax cuts are popular with households and businesses in the short \
                         term but strain public finances; increased corporate investment \
                         should support growth.";
            feasibility = 7;
        } else if contains_any(&["raise", "increase", "hike"]) {
            fx.approval = Some(-(rng.gen_range(3..=6) as f64));
            fx.satisfaction = Some(-(rng.gen_range(4..=8) as f64));
            fx.national_wealth = Some(rng.gen_range(10..=24) as f64);
            fx.economic_health = Some(-(rng.gen_range(2..=5) as f64));
            reasoning = "Tax increases are unpopular but improve fiscal soundness; some \
                         short-term contraction in consumption is expected.";
            feasibility = 4;
        } else {
            reasoning = "A tax measure without a clear direction; effects depend on the \
                         concrete rates involved.";
        }
    } else if contains_any(&["job", "employment", "hiring"]) {
        category = "social";
        fx.unemployment = Some(-rng.gen_range(1.0..3.0));
        fx.satisfaction = Some(rng.gen_range(4..=8) as f64);
        fx.approval = Some(rng.gen_range(3..=6) as f64);
        fx.national_wealth = Some(-(rng.gen_range(8..=22) as f64));
        if text.contains("youth") {
            fx.satisfaction = fx.satisfaction.map(|v| v + 2.0);
            fx.approval = fx.approval.map(|v| v + 1.0);
        }
        reasoning = "Job-creation programs are highly popular and cut unemployment \
                     directly, at the cost of significant budget outlays.";
        feasibility = 8;
    } else if contains_any(&["tech", "semiconductor", "digital", "innovation", "r&d"]) {
        category = "technology";
        fx.technology = Some(rng.gen_range(5..=10) as f64);
        fx.competitiveness = Some(rng.gen_range(3..=6) as f64);
        fx.economic_health = Some(rng.gen_range(4..=9) as f64);
        fx.national_wealth = Some(-(rng.gen_range(3..=12) as f64));
        fx.relations = Some(rng.gen_range(2..=4) as f64);
        reasoning = "Technology investment is essential to long-run competitiveness; \
                     the up-front cost buys future growth engines.";
        feasibility = 7;
        timeframe = Timeframe::LongTerm;
    } else if contains_any(&["welfare", "pension", "healthcare", "medical"]) {
        category = "social";
        fx.satisfaction = Some(rng.gen_range(5..=10) as f64);
        fx.approval = Some(rng.gen_range(4..=8) as f64);
        fx.national_wealth = Some(-(rng.gen_range(15..=39) as f64));
        if contains_any(&["elderly", "senior"]) {
            fx.satisfaction = fx.satisfaction.map(|v| v + 1.0);
        }
        reasoning = "Expanded welfare lifts satisfaction and approval substantially \
                     while carrying a heavy fiscal burden; it strengthens the social \
                     safety net.";
        feasibility = 6;
    } else if contains_any(&["diploma", "international", "cooperation", "alliance", "summit"]) {
        category = "diplomacy";
        fx.relations = Some(rng.gen_range(4..=9) as f64);
        fx.competitiveness = Some(rng.gen_range(1..=3) as f64);
        fx.approval = Some(rng.gen_range(1..=3) as f64);
        if contains_any(&["trade", "export"]) {
            fx.economic_health = Some(rng.gen_range(2..=5) as f64);
            fx.competitiveness = fx.competitiveness.map(|v| v + 2.0);
        }
        reasoning = "Closer diplomatic cooperation raises international standing and \
                     opens economic opportunities, though citizens feel the benefits \
                     only indirectly.";
        feasibility = 6;
        timeframe = Timeframe::LongTerm;
    } else if contains_any(&["environment", "carbon", "renewable", "climate"]) {
        category = "environment";
        fx.satisfaction = Some(rng.gen_range(3..=6) as f64);
        fx.relations = Some(rng.gen_range(3..=6) as f64);
        fx.national_wealth = Some(-(rng.gen_range(5..=16) as f64));
        fx.technology = Some(rng.gen_range(2..=5) as f64);
        fx.approval = Some(rng.gen_range(1..=3) as f64);
        reasoning = "Environmental policy is an investment in future generations and is \
                     well received abroad, but brings near-term costs and industry \
                     pushback.";
        feasibility = 5;
        timeframe = Timeframe::LongTerm;
    } else {
        category = "general";
        fx.approval = Some(rng.gen_range(-3..=3) as f64);
        fx.satisfaction = Some(rng.gen_range(-2..=2) as f64);
        fx.national_wealth = Some(rng.gen_range(-5..=4) as f64);
        reasoning = "A broad assessment based on the action as described; a more \
                     specific proposal would allow a sharper analysis.";
    }

    PolicyAnalysis {
        effects: fx.clamped(DELTA_LIMIT),
        reasoning: reasoning.to_string(),
        category: category.to_string(),
        feasibility,
        timeframe,
    }
}
