use serde::Serialize;
use serde_json::json;
use tracing::{error, info};

use crate::domain::{Direction, NarrativeAnalysis, Transaction};
use crate::error::AnalysisError;
use crate::gemini::GeminiClient;
use crate::time::utc_day;
use crate::units::format_ether;

/// Reduced per-transaction view sent to the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TxDigest {
    pub date: String,
    #[serde(rename = "type")]
    pub direction: Direction,
    #[serde(rename = "valueETH")]
    pub value_eth: String,
    #[serde(rename = "otherParty")]
    pub other_party: String,
    #[serde(rename = "isError")]
    pub is_error: bool,
}

pub fn project(address: &str, transactions: &[Transaction]) -> Vec<TxDigest> {
    transactions
        .iter()
        .map(|tx| TxDigest {
            date: utc_day(&tx.time_stamp).unwrap_or_else(|| "unknown".to_string()),
            direction: tx.direction(address),
            value_eth: format_ether(&tx.value),
            other_party: tx.counterparty(address).to_string(),
            is_error: tx.is_error(),
        })
        .collect()
}

/// Output schema the model is constrained to.
pub fn response_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "summary": { "type": "STRING" },
            "riskAssessment": { "type": "STRING", "enum": ["LOW", "MEDIUM", "HIGH"] },
            "keyActivities": { "type": "ARRAY", "items": { "type": "STRING" } }
        },
        "required": ["summary", "riskAssessment", "keyActivities"]
    })
}

fn build_prompt(address: &str, digests: &[TxDigest]) -> Result<String, AnalysisError> {
    let data = serde_json::to_string_pretty(digests)?;
    Ok(format!(
        "Analyze the following recent Ethereum transactions for wallet address {address}.\n\n\
         Transaction Data:\n{data}\n\n\
         Provide a structured analysis in JSON format containing:\n\
         1. A brief \"summary\" of the wallet's recent behavior (max 2 sentences).\n\
         2. A \"riskAssessment\" (LOW, MEDIUM, or HIGH) based on failed transactions, \
         interactions with suspicious patterns (if inferable), or high frequency.\n\
         3. A list of \"keyActivities\" (e.g., \"Frequent trading\", \"Holding\", \"Interacting with DeFi\").\n"
    ))
}

#[derive(Clone)]
pub struct NarrativeAnalyzer {
    model: GeminiClient,
}

impl NarrativeAnalyzer {
    pub fn new(model: GeminiClient) -> Self {
        Self { model }
    }

    /// Never fails: model problems degrade to [`NarrativeAnalysis::unavailable`].
    pub async fn analyze(&self, address: &str, transactions: &[Transaction]) -> NarrativeAnalysis {
        if transactions.is_empty() {
            return NarrativeAnalysis::inactive();
        }

        match self.try_analyze(address, transactions).await {
            Ok(analysis) => {
                info!(address, risk = analysis.risk_assessment.as_str(), "analysis.done");
                analysis
            }
            Err(e) => {
                error!(address, error = %e, "analysis.degraded");
                NarrativeAnalysis::unavailable()
            }
        }
    }

    async fn try_analyze(
        &self,
        address: &str,
        transactions: &[Transaction],
    ) -> Result<NarrativeAnalysis, AnalysisError> {
        let prompt = build_prompt(address, &project(address, transactions))?;
        let text = self
            .model
            .generate_json(&prompt, &response_schema())
            .await?
            .ok_or(AnalysisError::EmptyResponse)?;
        Ok(serde_json::from_str(text.trim())?)
    }
}
