//! Client for a generative-language scoring endpoint.
//!
//! Speaks the `generateContent` REST shape: a single user turn carrying the
//! full instruction prompt, and a response whose first candidate holds the
//! generated text. The credential and endpoint are explicit configuration;
//! nothing here reads ambient state.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sim_core::{Indicators, PolicyAnalysis};
use tracing::debug;

use crate::{parse_analysis, parse_event, GeneratedEvent, Oracle, OracleError};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Explicit oracle configuration. The API key must come from external
/// configuration (environment, config file); it is never compiled in.
#[derive(Clone, Debug)]
pub struct OracleConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

impl OracleConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_k: u32,
    top_p: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

/// Scoring oracle backed by a generative-language endpoint.
pub struct GenerativeClient {
    config: OracleConfig,
    http: reqwest::Client,
}

impl GenerativeClient {
    pub fn new(config: OracleConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    async fn generate(
        &self,
        prompt: String,
        generation_config: GenerationConfig,
    ) -> Result<String, OracleError> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.config.base_url, self.config.model
        );
        let request = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: prompt }],
            }],
            generation_config,
        };

        debug!(model = %self.config.model, "oracle generate request");

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(OracleError::Api { status, body });
        }

        let parsed: GenerateResponse = response.json().await?;
        let text: String = parsed
            .candidates
            .into_iter()
            .next()
            .map(|c| {
                c.content
                    .parts
                    .into_iter()
                    .map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();
        if text.is_empty() {
            return Err(OracleError::EmptyResponse);
        }
        Ok(text)
    }
}

fn indicator_summary(ind: &Indicators) -> String {
    format!(
        "- Presidential approval: {:.1}%\n\
         - National net assets: {:.0} trillion\n\
         - Corporate competitiveness: {:.0}\n\
         - Technological advancement: {:.0}\n\
         - Economic health: {:.0}\n\
         - Unemployment rate: {:.1}%\n\
         - Public satisfaction: {:.0}\n\
         - International relations: {:.0}",
        ind.approval,
        ind.national_wealth,
        ind.competitiveness,
        ind.technology,
        ind.economic_health,
        ind.unemployment,
        ind.satisfaction,
        ind.relations
    )
}

fn analysis_prompt(action: &str, year: i32, indicators: &Indicators) -> String {
    format!(
        "You are a policy analyst for a national government. It is the year {year}. \
         Analyze the following presidential action:\n\n\
         Action: \"{action}\"\n\n\
         Current national situation:\n{summary}\n\n\
         Rate the action's impact on each of these eight indicators as a number \
         between -10 and +10:\n\
         1. approval: how strongly the public will support this\n\
         2. nationalWealth: impact on public finances (positive grows assets, negative spends them)\n\
         3. competitiveness: impact on corporate competitiveness\n\
         4. technology: impact on technological innovation and progress\n\
         5. economicHealth: impact on the soundness of the economy\n\
         6. unemployment: change in the unemployment rate (positive raises it, negative lowers it)\n\
         7. satisfaction: impact on overall public satisfaction\n\
         8. relations: impact on relations with other countries\n\n\
         Also provide:\n\
         - category: one word (economy, diplomacy, social, technology, environment, personnel, general)\n\
         - feasibility: 1-10\n\
         - timeframe: one of immediate / short-term / long-term\n\
         - reasoning: the basis of the analysis, under 200 characters\n\n\
         Respond with ONLY the following JSON object and no other text:\n\
         {{\n\
           \"effects\": {{\n\
             \"approval\": number,\n\
             \"nationalWealth\": number,\n\
             \"competitiveness\": number,\n\
             \"technology\": number,\n\
             \"economicHealth\": number,\n\
             \"unemployment\": number,\n\
             \"satisfaction\": number,\n\
             \"relations\": number\n\
           }},\n\
           \"reasoning\": \"...\",\n\
           \"category\": \"...\",\n\
           \"feasibility\": number,\n\
           \"timeframe\": \"immediate|short-term|long-term\"\n\
         }}",
        year = year,
        action = action,
        summary = indicator_summary(indicators),
    )
}

fn event_prompt(year: i32, indicators: &Indicators) -> String {
    format!(
        "You are an expert on national politics, economics, and society. It is the \
         year {year}. Generate one realistic event that could plausibly occur.\n\n\
         Current national situation:\n{summary}\n\n\
         Choose one category: economic, social, international, technological, \
         environmental/disaster, or political. Rate the event's impact on each \
         indicator as a number between -10 and +10 (the same eight keys as the \
         situation above: approval, nationalWealth, competitiveness, technology, \
         economicHealth, unemployment, satisfaction, relations).\n\n\
         Respond with ONLY the following JSON object and no other text:\n\
         {{\n\
           \"title\": \"event title, under 30 characters\",\n\
           \"description\": \"event description, under 100 characters\",\n\
           \"effects\": {{ ... }}\n\
         }}",
        year = year,
        summary = indicator_summary(indicators),
    )
}

#[async_trait]
impl Oracle for GenerativeClient {
    async fn analyze_action(
        &self,
        action: &str,
        year: i32,
        indicators: &Indicators,
    ) -> Result<PolicyAnalysis, OracleError> {
        let text = self
            .generate(
                analysis_prompt(action, year, indicators),
                GenerationConfig {
                    temperature: 0.7,
                    top_k: 40,
                    top_p: 0.95,
                    max_output_tokens: 1000,
                },
            )
            .await?;
        parse_analysis(&text)
    }

    async fn generate_event(
        &self,
        year: i32,
        indicators: &Indicators,
    ) -> Result<Option<GeneratedEvent>, OracleError> {
        let text = self
            .generate(
                event_prompt(year, indicators),
                GenerationConfig {
                    temperature: 0.8,
                    top_k: 40,
                    top_p: 0.95,
                    max_output_tokens: 800,
                },
            )
            .await?;
        parse_event(&text).map(Some)
    }
}
