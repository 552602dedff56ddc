//! Message Generator
//!
//! Drafts the three outbound communications (suppliers, buyers, management)
//! from a finished analysis. Failures here never fail the run; the engine
//! returns a partial result with the scores already committed.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::chat::ChatClient;
use crate::service::SupplierOutcome;

/// One drafted message. Extra fields the model returns (tone, key points,
/// priority) are intentionally dropped; only subject and content persist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageDraft {
    pub subject: String,
    pub content: String,
}

/// The three drafts of one generation call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageSet {
    pub supplier_message: MessageDraft,
    pub buyer_message: MessageDraft,
    pub management_message: MessageDraft,
}

#[async_trait]
pub trait MessageGenerator: Send + Sync {
    async fn generate(
        &self,
        results: &[SupplierOutcome],
        summary: &str,
        analysis_title: &str,
    ) -> Result<MessageSet>;
}

/// Chat-completions backed generator
pub struct LlmMessageGenerator {
    chat: ChatClient,
}

impl LlmMessageGenerator {
    pub fn new(chat: ChatClient) -> Self {
        Self { chat }
    }
}

#[async_trait]
impl MessageGenerator for LlmMessageGenerator {
    async fn generate(
        &self,
        results: &[SupplierOutcome],
        summary: &str,
        analysis_title: &str,
    ) -> Result<MessageSet> {
        let data = serde_json::to_string_pretty(results)?;

        let content = self
            .chat
            .complete(
                GENERATION_SYSTEM_PROMPT,
                &generation_prompt(analysis_title, summary, &data),
            )
            .await?;

        let messages: MessageSet =
            serde_json::from_str(&content).context("Failed to parse messages JSON")?;

        Ok(messages)
    }
}

const GENERATION_SYSTEM_PROMPT: &str = "You are an expert in professional communication. \
Write clear, constructive messages adapted to each recipient. \
Return ONLY valid JSON, no additional text.";

fn generation_prompt(analysis_title: &str, summary: &str, results: &str) -> String {
    format!(
        r#"
Write personalized messages for the analysis "{analysis_title}" based on these supplier results:

Summary: {summary}

Results:
{results}

Write 3 messages:
1. A message to the suppliers (encouragement, feedback, improvement requests)
2. A message to the buyers (performance recap, recommendations)
3. A message to management (strategic synthesis, actions to take)

Respond with JSON in exactly this shape:
{{
  "supplierMessage": {{ "subject": "string", "content": "string" }},
  "buyerMessage": {{ "subject": "string", "content": "string" }},
  "managementMessage": {{ "subject": "string", "content": "string" }}
}}
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_set_parses_and_drops_extras() {
        let content = r#"{
            "supplierMessage": {
                "subject": "Performance feedback",
                "content": "Thank you for your deliveries.",
                "tone": "encouraging"
            },
            "buyerMessage": {
                "subject": "Supplier recap",
                "content": "Two suppliers need attention.",
                "keyPoints": ["delays rising"]
            },
            "managementMessage": {
                "subject": "Strategic review",
                "content": "Consolidation recommended.",
                "actionItems": ["renegotiate"],
                "priority": "high"
            }
        }"#;

        let set: MessageSet = serde_json::from_str(content).unwrap();
        assert_eq!(set.supplier_message.subject, "Performance feedback");
        assert_eq!(set.management_message.content, "Consolidation recommended.");
    }

    #[test]
    fn test_prompt_embeds_title_and_summary() {
        let prompt = generation_prompt("Q1 review", "Stable base.", "[]");
        assert!(prompt.contains("Q1 review"));
        assert!(prompt.contains("Stable base."));
    }
}
