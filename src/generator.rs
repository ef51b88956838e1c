use std::sync::LazyLock;

use regex::{Match, Regex};
use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tokio::time::{timeout, Duration};

use crate::config::ProviderConfig;
use crate::model::AnswerLetter;

const SYSTEM_PROMPT: &str =
    "You are a careful tutor. You answer multiple-choice questions and justify the choice briefly.";

static ANSWER_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?m)^[ \t]*[*_#>]*[ \t]*(?i:(?:final|correct)[ \t]+)?(?i:answer)[*_]*[ \t]*[:\-][ \t]*[*_]*[ \t]*(?:(?i:option|choice)[ \t]+)?\(?([A-Da-d])\b",
    )
    .expect("answer line pattern")
});

static LABELLED_ANSWER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i:answer)(?:\s+(?i:is))?\s*\**\s*[:\-]?\s*\**\s*(?:(?i:option|choice)\s+)?\(?([A-Da-d])\b",
    )
    .expect("labelled answer pattern")
});

static LEADING_ANSWER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)\A\s*\**\(?([ABCD])\)?\**(?:\s*[.):\-]|[ \t]*$|\s+\w)")
        .expect("leading answer pattern")
});

/// Words that may follow a standalone letter "A" when it names a choice.
const VERBS_AFTER_LETTER: &[&str] = &["is", "was", "would", "should", "seems", "appears"];

static EXPLANATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)explanation\**\s*[:\-]\**\s*(.+)").expect("explanation pattern")
});

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("provider API key is not configured")]
    MissingApiKey,
    #[error("provider API key is not a valid header value")]
    InvalidApiKey,
    #[error("provider request timed out after {0} ms")]
    Timeout(u64),
    #[error("failed to reach provider: {0}")]
    Request(#[from] reqwest::Error),
    #[error("provider returned {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("provider response was not a completion: {0}")]
    MalformedResponse(String),
    #[error("no answer letter found in completion: {0:?}")]
    NoAnswerLetter(String),
}

impl GenerationError {
    /// Whether the provider could not be consulted at all, as opposed to
    /// answering with something unusable.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            Self::MissingApiKey
                | Self::InvalidApiKey
                | Self::Timeout(_)
                | Self::Request(_)
                | Self::Status { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedAnswer {
    pub answer: AnswerLetter,
    pub explanation: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    content: Option<String>,
}

/// Client for an OpenAI-compatible chat completion endpoint.
#[derive(Clone)]
pub struct AnswerGenerator {
    client: reqwest::Client,
    config: ProviderConfig,
}

impl AnswerGenerator {
    pub fn new(config: ProviderConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    pub async fn generate(
        &self,
        question: &str,
        choices: &[String; 4],
    ) -> Result<GeneratedAnswer, GenerationError> {
        if self.config.api_key.trim().is_empty() {
            return Err(GenerationError::MissingApiKey);
        }

        let prompt = build_prompt(question, choices);
        let completion = timeout(
            Duration::from_millis(self.config.timeout_ms),
            self.complete(&prompt),
        )
        .await
        .map_err(|_| GenerationError::Timeout(self.config.timeout_ms))??;

        parse_completion(&completion)
    }

    async fn complete(&self, prompt: &str) -> Result<String, GenerationError> {
        let url = format!("{}/chat/completions", self.config.api_base);
        let bearer = HeaderValue::from_str(&format!("Bearer {}", self.config.api_key.trim()))
            .map_err(|_| GenerationError::InvalidApiKey)?;

        let payload = ChatRequest {
            model: &self.config.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: 0.0,
        };

        let response = self
            .client
            .post(url)
            .header(AUTHORIZATION, bearer)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unable to read response body>".to_string());
            return Err(GenerationError::Status { status, body });
        }

        let body = response.text().await?;
        let parsed: ChatResponse = serde_json::from_str(&body)
            .map_err(|e| GenerationError::MalformedResponse(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| GenerationError::MalformedResponse("empty completion".to_string()))
    }
}

pub fn build_prompt(question: &str, choices: &[String; 4]) -> String {
    let mut prompt = format!("Question: {question}\n");
    for (letter, choice) in AnswerLetter::ALL.iter().zip(choices) {
        prompt.push_str(&format!("{letter}. {choice}\n"));
    }
    prompt.push_str(
        "\nPick the single best choice. Reply in exactly this format:\n\
         Answer: <A, B, C or D>\n\
         Explanation: <why that choice is correct>",
    );
    prompt
}

/// Extracts the answer letter and explanation from free-form completion text.
///
/// An `Answer:` line wins over a loose mention of "answer", which wins over a
/// letter at the very start of the reply.
pub fn parse_completion(text: &str) -> Result<GeneratedAnswer, GenerationError> {
    let text = text.trim();
    let letter = letter_match(&ANSWER_LINE, text, true)
        .or_else(|| letter_match(&LABELLED_ANSWER, text, true))
        .or_else(|| letter_match(&LEADING_ANSWER, text, false))
        .ok_or_else(|| GenerationError::NoAnswerLetter(text.to_string()))?;

    let answer = letter
        .as_str()
        .to_ascii_uppercase()
        .parse::<AnswerLetter>()
        .map_err(|_| GenerationError::NoAnswerLetter(text.to_string()))?;

    let labelled = EXPLANATION
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty());
    let explanation = labelled
        .or_else(|| {
            let rest = text[letter.end()..].trim_start_matches(|c: char| !c.is_alphanumeric());
            Some(rest.trim()).filter(|s| !s.is_empty())
        })
        .unwrap_or(text);

    Ok(GeneratedAnswer {
        answer,
        explanation: explanation.to_string(),
    })
}

/// First match whose letter is not the article "a". An uppercase "A" that
/// reads like an article is still taken when nothing better matched and
/// `article_fallback` is set.
fn letter_match<'t>(
    pattern: &Regex,
    text: &'t str,
    article_fallback: bool,
) -> Option<Match<'t>> {
    let mut fallback = None;
    for captures in pattern.captures_iter(text) {
        let Some(letter) = captures.get(1) else {
            continue;
        };
        if !reads_as_article(text, &letter) {
            return Some(letter);
        }
        if article_fallback && fallback.is_none() && letter.as_str() == "A" {
            fallback = Some(letter);
        }
    }
    fallback
}

fn reads_as_article(text: &str, letter: &Match<'_>) -> bool {
    if !letter.as_str().eq_ignore_ascii_case("a") {
        return false;
    }
    let rest = &text[letter.end()..];
    if !rest.starts_with(char::is_whitespace) {
        return false;
    }
    let word: String = rest
        .trim_start()
        .chars()
        .take_while(|c| c.is_alphabetic())
        .collect();
    word.starts_with(char::is_lowercase) && !VERBS_AFTER_LETTER.contains(&word.as_str())
}
