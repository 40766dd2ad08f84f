use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::SummarySettings;
use crate::data::filter::FilterCriteria;
use crate::data::model::{Measured, PlanetRecord};
use crate::data::stats::SummaryStats;

// ---------------------------------------------------------------------------
// Narrative summary via a chat-completion API
// ---------------------------------------------------------------------------

const SYSTEM_PROMPT: &str = "You are an expert astronomer and engaging science communicator.";

/// The completion call failed. Charts keep rendering; the UI shows `cause`
/// in place of the summary.
#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("AI summary unavailable: {cause}")]
    Unavailable { cause: String },
}

impl SummaryError {
    fn unavailable(cause: impl Into<String>) -> Self {
        SummaryError::Unavailable {
            cause: cause.into(),
        }
    }
}

/// Build the user prompt from the working subset.
///
/// `samples` is expected to be already truncated to the configured count.
pub fn build_prompt(
    stats: &SummaryStats,
    criteria: &FilterCriteria,
    samples: &[&PlanetRecord],
) -> String {
    let top_methods = if stats.top_methods.is_empty() {
        "none".to_string()
    } else {
        stats
            .top_methods
            .iter()
            .map(|(m, c)| format!("{m} ({c})"))
            .collect::<Vec<_>>()
            .join(", ")
    };

    let mut prompt = format!(
        "You are an expert astronomer and science communicator. Analyze the following \
         exoplanet dataset statistics and write a clear, engaging and insightful \
         one-paragraph summary.\n\n\
         Dataset size: {total} planets\n\
         Active filters: {filters}\n\n\
         Dataset statistics:\n\
         - Discovery year range: {years}\n\
         - Top discovery methods: {top_methods}\n\
         - Average planet radius: {radius} Earth radii\n\
         - Average orbital distance: {distance} AU\n\
         - Planets in habitable zone: {hz}\n\
         - Discovery method filter applied: {method_filter}\n\
         - Habitable zone filter active: {hz_only}\n",
        total = stats.total_planets,
        filters = criteria.describe(),
        years = stats.year_range,
        radius = Measured(stats.avg_radius),
        distance = Measured(stats.avg_distance),
        hz = stats.habitable_zone_count,
        method_filter = stats.method_filter,
        hz_only = stats.habitable_only,
    );

    if !samples.is_empty() {
        prompt.push_str("\nExample planets:\n");
        for rec in samples {
            prompt.push_str(&format!(
                "- {} ({}, {}): radius {} R⊕, orbit {} AU, star {} K\n",
                rec.identifier,
                rec.discovery_method,
                rec.discovery_year,
                Measured(rec.planet_radius_earth),
                Measured(rec.orbital_distance_au),
                Measured(rec.host_star_temperature_k),
            ));
        }
    }

    prompt.push_str(
        "\nHighlight key trends, explain what the habitable zone results mean for the \
         search for life, comment on the dominant discovery methods, and end with a \
         forward-looking statement. Keep the tone accessible to a general audience and \
         write flowing prose, not bullet points.\n",
    );
    prompt
}

// -- Wire types (OpenAI-compatible chat completions) --

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: Option<String>,
}

/// `error.message` from an OpenAI-style error body, else the start of the body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.chars().take(200).collect::<String>().trim().to_string())
}

/// Blocking client for the completion service.
#[derive(Clone)]
pub struct SummaryClient {
    http: reqwest::blocking::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

impl SummaryClient {
    pub fn new(settings: &SummarySettings) -> Result<Self, SummaryError> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(concat!("exoplanet-explorer/", env!("CARGO_PKG_VERSION")))
            .timeout(settings.timeout)
            .build()
            .map_err(|e| SummaryError::unavailable(format!("cannot create HTTP client: {e}")))?;

        Ok(Self {
            http,
            endpoint: settings.url.clone(),
            model: settings.model.clone(),
            api_key: settings.api_key.clone(),
        })
    }

    /// Send `prompt` and return the reply text as-is.
    pub fn summarize(&self, prompt: &str) -> Result<String, SummaryError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| SummaryError::unavailable("GROQ_API_KEY is not set"))?;

        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: 0.7,
            max_tokens: 600,
        };

        log::info!("Requesting summary from {} ({})", self.endpoint, self.model);
        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    SummaryError::unavailable(format!("request timed out: {e}"))
                } else {
                    SummaryError::unavailable(format!("network error: {e}"))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(SummaryError::unavailable(format!(
                "HTTP {}: {}",
                status.as_u16(),
                error_message(&body)
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .map_err(|e| SummaryError::unavailable(format!("malformed response: {e}")))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or_else(|| SummaryError::unavailable("response contained no text"))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use httpmock::prelude::*;

    use super::*;

    fn stats() -> SummaryStats {
        SummaryStats {
            total_planets: 42,
            year_range: "2000–2024".to_string(),
            top_methods: vec![("Transit".to_string(), 30), ("Radial Velocity".to_string(), 12)],
            avg_radius: Some(2.35),
            avg_distance: None,
            habitable_zone_count: 3,
            method_filter: "All".to_string(),
            habitable_only: false,
        }
    }

    fn client_for(url: String, api_key: Option<&str>) -> SummaryClient {
        SummaryClient::new(&SummarySettings {
            url,
            model: "test-model".to_string(),
            api_key: api_key.map(str::to_string),
            timeout: Duration::from_secs(5),
            sample_records: 5,
        })
        .unwrap()
    }

    #[test]
    fn prompt_includes_size_filters_and_samples() {
        let rec = PlanetRecord {
            planet_radius_earth: Some(1.63),
            orbital_distance_au: Some(1.25),
            ..PlanetRecord::new("Kepler-452 b", 2015, "Transit")
        };
        let criteria = FilterCriteria {
            year_range: Some(2000..=2024),
            ..Default::default()
        };
        let prompt = build_prompt(&stats(), &criteria, &[&rec]);

        assert!(prompt.contains("Dataset size: 42 planets"));
        assert!(prompt.contains("Active filters: methods: all; years: 2000–2024"));
        assert!(prompt.contains("Top discovery methods: Transit (30), Radial Velocity (12)"));
        assert!(prompt.contains("Average orbital distance: N/A AU"));
        assert!(prompt.contains("- Kepler-452 b (Transit, 2015): radius 1.63 R⊕, orbit 1.25 AU, star N/A K"));
    }

    #[test]
    fn prompt_without_samples_has_no_example_section() {
        let prompt = build_prompt(&stats(), &FilterCriteria::default(), &[]);
        assert!(!prompt.contains("Example planets"));
    }

    #[test]
    fn summarize_returns_first_choice() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/openai/v1/chat/completions")
                .header("authorization", "Bearer gsk_test");
            then.status(200).json_body(serde_json::json!({
                "choices": [
                    { "message": { "role": "assistant", "content": "  Worlds abound.  " } }
                ]
            }));
        });

        let client = client_for(server.url("/openai/v1/chat/completions"), Some("gsk_test"));
        let text = client.summarize("hello").unwrap();
        mock.assert();
        assert_eq!(text, "Worlds abound.");
    }

    #[test]
    fn missing_key_is_unavailable_without_request() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST);
            then.status(200);
        });

        let client = client_for(server.url("/chat"), None);
        let err = client.summarize("hello").unwrap_err();
        assert!(err.to_string().contains("GROQ_API_KEY"));
        mock.assert_calls(0);
    }

    #[test]
    fn error_status_is_unavailable() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/chat");
            then.status(401).body("invalid api key");
        });

        let err = client_for(server.url("/chat"), Some("bad")).summarize("hello").unwrap_err();
        let SummaryError::Unavailable { cause } = err;
        assert!(cause.contains("HTTP 401"));
    }

    #[test]
    fn api_error_message_is_surfaced() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/chat");
            then.status(429).json_body(serde_json::json!({
                "error": { "message": "Rate limit reached", "type": "tokens" }
            }));
        });

        let err = client_for(server.url("/chat"), Some("k")).summarize("hello").unwrap_err();
        assert_eq!(err.to_string(), "AI summary unavailable: HTTP 429: Rate limit reached");
    }

    #[test]
    fn slow_completion_times_out() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/chat");
            then.status(200)
                .delay(Duration::from_secs(3))
                .json_body(serde_json::json!({ "choices": [] }));
        });

        let client = SummaryClient::new(&SummarySettings {
            url: server.url("/chat"),
            model: "test-model".to_string(),
            api_key: Some("k".to_string()),
            timeout: Duration::from_millis(500),
            sample_records: 5,
        })
        .unwrap();
        let err = client.summarize("hello").unwrap_err();
        assert!(err.to_string().contains("timed out"), "{err}");
    }

    #[test]
    fn empty_choices_are_unavailable() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/chat");
            then.status(200).json_body(serde_json::json!({ "choices": [] }));
        });

        let err = client_for(server.url("/chat"), Some("k")).summarize("hello").unwrap_err();
        assert!(err.to_string().contains("no text"));
    }
}
