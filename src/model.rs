use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the four choice labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnswerLetter {
    A,
    B,
    C,
    D,
}

impl AnswerLetter {
    pub const ALL: [AnswerLetter; 4] = [Self::A, Self::B, Self::C, Self::D];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
        }
    }
}

impl fmt::Display for AnswerLetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0:?} is not one of A, B, C or D")]
pub struct InvalidLetter(pub String);

impl FromStr for AnswerLetter {
    type Err = InvalidLetter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" => Ok(Self::A),
            "B" => Ok(Self::B),
            "C" => Ok(Self::C),
            "D" => Ok(Self::D),
            other => Err(InvalidLetter(other.to_string())),
        }
    }
}

/// A persisted question record, serialized in the shape the API returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    pub id: i64,
    #[serde(rename = "question")]
    pub question_text: String,
    pub choices: [String; 4],
    #[serde(rename = "answer")]
    pub predicted_answer: Option<AnswerLetter>,
    pub explanation: Option<String>,
    pub user_correction: Option<AnswerLetter>,
}

/// A record that has not been assigned an identifier yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQuestion {
    pub question_text: String,
    pub choices: [String; 4],
    pub predicted_answer: AnswerLetter,
    pub explanation: String,
}
