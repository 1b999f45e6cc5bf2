use serde::{Deserialize, Serialize};
use tracing::warn;

/// Most recent records kept per lookup.
pub const MAX_TRANSACTIONS: usize = 20;

/// One ledger transaction as returned by the `txlist` endpoint.
///
/// Every field is a string on the wire; missing ones default to empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Transaction {
    pub block_number: String,
    pub time_stamp: String,
    pub hash: String,
    pub nonce: String,
    pub block_hash: String,
    pub transaction_index: String,
    pub from: String,
    pub to: String,
    /// wei
    pub value: String,
    pub gas: String,
    pub gas_price: String,
    pub is_error: String,
    #[serde(rename = "txreceipt_status")]
    pub txreceipt_status: String,
    pub input: String,
    pub contract_address: String,
    pub cumulative_gas_used: String,
    pub gas_used: String,
    pub confirmations: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    In,
    Out,
}

impl Transaction {
    pub fn is_error(&self) -> bool {
        self.is_error == "1"
    }

    pub fn direction(&self, address: &str) -> Direction {
        if self.from.eq_ignore_ascii_case(address) {
            Direction::Out
        } else {
            Direction::In
        }
    }

    pub fn counterparty(&self, address: &str) -> &str {
        match self.direction(address) {
            Direction::Out => &self.to,
            Direction::In => &self.from,
        }
    }

    pub fn involves(&self, address: &str) -> bool {
        [&self.from, &self.to, &self.contract_address]
            .iter()
            .any(|a| !a.is_empty() && a.eq_ignore_ascii_case(address))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletSnapshot {
    pub address: String,
    /// wei
    pub balance: String,
    /// Newest first.
    pub transactions: Vec<Transaction>,
}

impl WalletSnapshot {
    /// Builds the snapshot, keeping only records that touch `address`.
    pub fn assemble(address: &str, balance: String, transactions: Vec<Transaction>) -> Self {
        let transactions = transactions
            .into_iter()
            .filter(|tx| {
                let keep = tx.involves(address);
                if !keep {
                    warn!(hash = %tx.hash, address, "snapshot.drop_foreign_tx");
                }
                keep
            })
            .take(MAX_TRANSACTIONS)
            .collect();

        Self {
            address: address.to_string(),
            balance,
            transactions,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
        }
    }
}

/// Structured output of the narrative analyzer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NarrativeAnalysis {
    pub summary: String,
    pub risk_assessment: RiskLevel,
    pub key_activities: Vec<String>,
}

impl NarrativeAnalysis {
    /// Fixed result for a wallet with no recent activity.
    pub fn inactive() -> Self {
        Self {
            summary: "No recent transactions found to analyze.".into(),
            risk_assessment: RiskLevel::Low,
            key_activities: vec!["Inactive wallet".into()],
        }
    }

    /// Fallback when the model could not produce a usable answer.
    pub fn unavailable() -> Self {
        Self {
            summary: "AI Analysis currently unavailable.".into(),
            risk_assessment: RiskLevel::Low,
            key_activities: vec![],
        }
    }
}
