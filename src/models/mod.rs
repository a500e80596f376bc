use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One line of the itemized scorecard returned by the weighted
/// scoring templates.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CriterionScore {
    /// Name of the evaluation criterion (e.g. "Greeting")
    pub criterion: String,
    /// Whether the agent met the criterion
    pub met: bool,
    /// Points awarded
    pub score: u32,
    /// Points possible
    pub max_score: u32,
}

/// Structured QA feedback for one call transcript.
///
/// Field names mirror the public API payload, hence camelCase on the
/// wire.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackReport {
    /// Brief summary of the call (max 2 sentences)
    pub summary: String,
    /// Overall customer sentiment (e.g. "Frustrated", "Satisfied")
    pub sentiment: String,
    /// 3-5 bullet points of the main topics discussed
    pub key_points: Vec<String>,
    /// Interaction quality, 0-100
    pub quality_score: u32,
    /// Actionable recommendations for the agent or business
    pub recommendations: Vec<String>,
    /// Itemized scorecard; only populated by the weighted templates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub criteria_breakdown: Option<Vec<CriterionScore>>,
}

impl FeedbackReport {
    /// Clamps scores into their documented ranges. The upstream model
    /// is only asked for valid ranges, never guaranteed to honor them.
    pub fn normalize(mut self) -> Self {
        self.quality_score = self.quality_score.min(100);
        if let Some(breakdown) = self.criteria_breakdown.as_mut() {
            for entry in breakdown.iter_mut() {
                if entry.score > entry.max_score {
                    entry.score = entry.max_score;
                }
            }
        }
        self
    }
}

/// Whether a response was produced by live inference or substituted
/// from the static fallback payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ResultSource {
    Live,
    Fallback,
}

pub mod mock {
    use super::{CriterionScore, FeedbackReport};

    /// Fixed transcript substituted when the ASR or translation call
    /// fails. Identical across failures, by product decision.
    pub const MOCK_TRANSCRIPT: &str = "[FALLBACK MODE: API Error detected]\n\
    This is a simulated transcription because the AI Provider returned an error (likely quota exceeded, missing key, or model issue).\n\
    \n\
    Original Audio Content (Simulated):\n\
    \"Guten Tag, ich rufe an, weil ich ein Problem mit meiner letzten Bestellung habe. Das Produkt ist beschädigt angekommen.\"\n\
    \n\
    \"Good day, I am calling because I have a problem with my last order. The product arrived damaged.\"\n\
    \n\
    Translation (Spanish):\n\
    \"Buenos días, llamo porque tengo un problema con mi último pedido. El producto llegó dañado.\"";

    /// Fixed feedback report substituted when the scoring call fails.
    /// Not derived from input. The breakdown sums to the quality score.
    pub fn mock_feedback() -> FeedbackReport {
        FeedbackReport {
            summary: "Customer reported a damaged product delivery (Fallback Mode).".to_string(),
            sentiment: "Frustrated but Polite".to_string(),
            key_points: vec![
                "Product arrived damaged.".to_string(),
                "Customer is requesting a resolution.".to_string(),
                "API Quota/Error triggered fallback response.".to_string(),
            ],
            quality_score: 75,
            recommendations: vec![
                "Check Groq API quota/billing.".to_string(),
                "Apologize to the customer for the damage.".to_string(),
                "Initiate replacement process immediately.".to_string(),
            ],
            criteria_breakdown: Some(vec![
                CriterionScore {
                    criterion: "Greeting and identification".to_string(),
                    met: true,
                    score: 15,
                    max_score: 15,
                },
                CriterionScore {
                    criterion: "Active listening".to_string(),
                    met: true,
                    score: 20,
                    max_score: 25,
                },
                CriterionScore {
                    criterion: "Problem resolution".to_string(),
                    met: false,
                    score: 20,
                    max_score: 40,
                },
                CriterionScore {
                    criterion: "Closing and next steps".to_string(),
                    met: true,
                    score: 20,
                    max_score: 20,
                },
            ]),
        }
    }
}
