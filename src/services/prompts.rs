//! Instruction templates for the scoring call.
//!
//! The three variants share one field contract and one JSON-only
//! instruction; only the mode-specific additions differ. Selection is
//! static per deployment (`SCORING_MODE`), never request-driven.

/// System prompt for the standalone translation call.
pub const TRANSLATOR_PROMPT: &str = "You are a professional translator. \
Translate the following text into Spanish. \
Return ONLY the translated text, nothing else.";

const JSON_ONLY_INSTRUCTION: &str = "Return ONLY the JSON object.";

/// Scoring prompt variant, fixed per deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoringMode {
    /// Summary, sentiment, key points, score and recommendations.
    Summary,
    /// Adds a weighted multi-criterion scorecard.
    Weighted,
    /// Weighted scorecard plus an in-prompt translation of the
    /// transcript.
    TranslateAndScore,
}

impl ScoringMode {
    /// Parses the configured mode name; unknown values fall back to
    /// `Summary`.
    pub fn from_config(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "weighted" => ScoringMode::Weighted,
            "translate-and-score" => ScoringMode::TranslateAndScore,
            "summary" => ScoringMode::Summary,
            other => {
                if !other.is_empty() {
                    tracing::warn!(mode = other, "unknown scoring mode, using summary");
                }
                ScoringMode::Summary
            }
        }
    }

    /// Builds the full system prompt for this mode.
    pub fn system_prompt(&self) -> String {
        let mut prompt = String::from(
            "You are an expert QA Analyst for a customer support call center.\n\
             Your task is to analyze the following customer call transcript (which has been translated to English).\n\
             \n\
             Generate a detailed quality feedback report in JSON format with the following fields:\n\
             - summary: A brief summary of the call (max 2 sentences).\n\
             - sentiment: The overall sentiment of the customer (e.g., \"Frustrated\", \"Satisfied\", \"Neutral\").\n\
             - keyPoints: An array of 3-5 bullet points highlighting the main topics discussed.\n\
             - qualityScore: A number between 0 and 100 rating the interaction quality (from the perspective of a successful resolution/interaction).\n\
             - recommendations: An array of 3 actionable recommendations for the agent or business.\n",
        );

        if matches!(self, ScoringMode::Weighted | ScoringMode::TranslateAndScore) {
            prompt.push_str(
                "- criteriaBreakdown: An array of objects, one per evaluation criterion, each with:\n\
                 \x20 - criterion: The criterion name.\n\
                 \x20 - met: Whether the agent met the criterion (boolean).\n\
                 \x20 - score: Points awarded (never above maxScore).\n\
                 \x20 - maxScore: Points possible.\n\
                 Weight the criteria as: Greeting and identification (15), Active listening (25), Problem resolution (40), Closing and next steps (20).\n\
                 The awarded scores should sum to qualityScore.\n",
            );
        }

        if matches!(self, ScoringMode::TranslateAndScore) {
            prompt.push_str(
                "- translatedTranscript: The full transcript translated into Spanish.\n",
            );
        }

        prompt.push('\n');
        prompt.push_str(JSON_ONLY_INSTRUCTION);
        prompt
    }
}
