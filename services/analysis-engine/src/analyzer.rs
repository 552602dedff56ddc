//! AI Analyzer
//!
//! External LLM categorization of supplier performance. The trait is the
//! injection seam: the engine sees only `AiAnalyzer`, tests plug in fakes,
//! and `OpenAiAnalyzer` is the one real implementation.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use procura_models::{Category, SupplierRecord};

use crate::chat::ChatClient;

/// Structured result of one AI analysis call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiAnalysis {
    pub global_analysis: GlobalAssessment,
    pub supplier_analysis: Vec<SupplierAssessment>,
    pub summary: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalAssessment {
    pub overall_quality: f64,
    pub average_delivery_delay: f64,
    pub price_competitiveness: f64,
    pub total_suppliers: i64,
}

/// Per-supplier verdict, keyed by exact supplier name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierAssessment {
    pub name: String,
    pub category: Category,
    pub performance_score: f64,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

#[async_trait]
pub trait AiAnalyzer: Send + Sync {
    /// One attempt, may fail or hang; the engine bounds and recovers.
    async fn analyze(&self, suppliers: &[SupplierRecord]) -> Result<AiAnalysis>;
}

/// Chat-completions backed analyzer
pub struct OpenAiAnalyzer {
    chat: ChatClient,
}

impl OpenAiAnalyzer {
    pub fn new(chat: ChatClient) -> Self {
        Self { chat }
    }
}

#[async_trait]
impl AiAnalyzer for OpenAiAnalyzer {
    async fn analyze(&self, suppliers: &[SupplierRecord]) -> Result<AiAnalysis> {
        let payload: Vec<SupplierPayload> = suppliers.iter().map(SupplierPayload::from).collect();
        let data = serde_json::to_string_pretty(&payload)?;

        let content = self
            .chat
            .complete(ANALYSIS_SYSTEM_PROMPT, &analysis_prompt(&data))
            .await?;

        let analysis: AiAnalysis =
            serde_json::from_str(&content).context("Failed to parse analysis JSON")?;

        Ok(analysis)
    }
}

/// Slim supplier view sent to the model
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SupplierPayload {
    name: String,
    product: String,
    quantity: i32,
    quality: f64,
    delivery_delay: i32,
    price: f64,
    delivery_date: String,
}

impl From<&SupplierRecord> for SupplierPayload {
    fn from(record: &SupplierRecord) -> Self {
        Self {
            name: record.name.clone(),
            product: record.product.clone(),
            quantity: record.quantity,
            quality: record.quality,
            delivery_delay: record.delivery_delay,
            price: record.price,
            delivery_date: record.delivery_date.format("%Y-%m-%d").to_string(),
        }
    }
}

const ANALYSIS_SYSTEM_PROMPT: &str = "You are an expert in supplier performance analysis. \
Provide precise, detailed assessments based on the data provided. \
Return ONLY valid JSON, no additional text.";

fn analysis_prompt(supplier_data: &str) -> String {
    format!(
        r#"
Analyze the performance of the following suppliers and provide a detailed assessment:

Supplier data:
{supplier_data}

Assess:
1. Overall quality (rated out of 10)
2. Delivery punctuality
3. Price competitiveness
4. Each supplier's tier (EXCELLENT, GOOD, AVERAGE, POOR, CRITICAL)
5. Each supplier's strengths and weaknesses
6. Improvement recommendations

Respond with JSON in exactly this shape:
{{
  "globalAnalysis": {{
    "overallQuality": number,
    "averageDeliveryDelay": number,
    "priceCompetitiveness": number,
    "totalSuppliers": number
  }},
  "supplierAnalysis": [
    {{
      "name": "string",
      "category": "EXCELLENT|GOOD|AVERAGE|POOR|CRITICAL",
      "performanceScore": number,
      "strengths": ["string"],
      "weaknesses": ["string"],
      "recommendations": ["string"]
    }}
  ],
  "summary": "string"
}}
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ai_analysis_parses_expected_shape() {
        let content = r#"{
            "globalAnalysis": {
                "overallQuality": 7.8,
                "averageDeliveryDelay": 4.5,
                "priceCompetitiveness": 0.7,
                "totalSuppliers": 2
            },
            "supplierAnalysis": [
                {
                    "name": "Acme",
                    "category": "GOOD",
                    "performanceScore": 82,
                    "strengths": ["consistent quality"],
                    "weaknesses": ["slow deliveries"],
                    "recommendations": ["negotiate delivery terms"]
                },
                {
                    "name": "Globex",
                    "category": "CRITICAL",
                    "performanceScore": 21
                }
            ],
            "summary": "Mixed supplier base."
        }"#;

        let analysis: AiAnalysis = serde_json::from_str(content).unwrap();
        assert_eq!(analysis.supplier_analysis.len(), 2);
        assert_eq!(analysis.supplier_analysis[0].category, Category::Good);
        // Omitted list fields default to empty
        assert!(analysis.supplier_analysis[1].strengths.is_empty());
        assert_eq!(analysis.global_analysis.total_suppliers, 2);
    }

    #[test]
    fn test_prompt_embeds_supplier_data() {
        let prompt = analysis_prompt("[{\"name\":\"Acme\"}]");
        assert!(prompt.contains("\"name\":\"Acme\""));
        assert!(prompt.contains("supplierAnalysis"));
    }
}
