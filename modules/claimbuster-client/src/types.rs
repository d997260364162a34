use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct ScoreTextInput {
    pub input_text: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScoreTextResponse {
    #[serde(default)]
    pub results: Vec<ScoredSentence>,
}

/// One sentence of the input with its check-worthiness score (0–1).
#[derive(Debug, Clone, Deserialize)]
pub struct ScoredSentence {
    pub text: String,
    pub score: f64,
}
