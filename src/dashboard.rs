use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::analyzer::NarrativeAnalyzer;
use crate::domain::{NarrativeAnalysis, WalletSnapshot};
use crate::error::{LedgerError, ValidationError};
use crate::etherscan::EtherscanClient;

/// Lookup workflow.
///
/// `Loaded` always means the narrative analysis is still pending: the
/// analyzer cannot fail, so every loaded cycle settles in `LoadedWithAnalysis`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Workflow {
    #[default]
    Idle,
    Loading,
    Loaded {
        snapshot: Arc<WalletSnapshot>,
    },
    LoadedWithAnalysis {
        snapshot: Arc<WalletSnapshot>,
        analysis: NarrativeAnalysis,
    },
    Error {
        message: String,
    },
}

impl Workflow {
    pub fn label(&self) -> &'static str {
        match self {
            Workflow::Idle => "idle",
            Workflow::Loading => "loading",
            Workflow::Loaded { .. } => "loaded",
            Workflow::LoadedWithAnalysis { .. } => "loaded_with_analysis",
            Workflow::Error { .. } => "error",
        }
    }

    pub fn is_analyzing(&self) -> bool {
        matches!(self, Workflow::Loaded { .. })
    }

    pub fn snapshot(&self) -> Option<&WalletSnapshot> {
        match self {
            Workflow::Loaded { snapshot } | Workflow::LoadedWithAnalysis { snapshot, .. } => {
                Some(&**snapshot)
            }
            _ => None,
        }
    }

    pub fn analysis(&self) -> Option<&NarrativeAnalysis> {
        match self {
            Workflow::LoadedWithAnalysis { analysis, .. } => Some(analysis),
            _ => None,
        }
    }
}

/// What the rendering layer observes. `generation` identifies the lookup cycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardView {
    pub generation: u64,
    #[serde(flatten)]
    pub workflow: Workflow,
}

pub struct Dashboard {
    ledger: EtherscanClient,
    analyzer: NarrativeAnalyzer,
    view: watch::Sender<DashboardView>,
}

impl Dashboard {
    pub fn new(ledger: EtherscanClient, analyzer: NarrativeAnalyzer) -> Self {
        let (view, _) = watch::channel(DashboardView::default());
        Self { ledger, analyzer, view }
    }

    pub fn subscribe(&self) -> watch::Receiver<DashboardView> {
        self.view.subscribe()
    }

    pub fn view(&self) -> DashboardView {
        self.view.borrow().clone()
    }

    /// Runs one lookup cycle: balance -> transactions -> analysis.
    ///
    /// Validation errors leave the current view untouched. A later `submit`
    /// supersedes this one; its remaining results are dropped.
    pub async fn submit(&self, address: &str, credential: &str) -> Result<(), ValidationError> {
        let address = address.trim();
        let credential = credential.trim();
        if address.is_empty() {
            return Err(ValidationError::MissingAddress);
        }
        if credential.is_empty() {
            return Err(ValidationError::MissingCredential);
        }

        let generation = self.begin_cycle();
        info!(generation, address, "dashboard.submit");

        let snapshot = match self.fetch_snapshot(address, credential).await {
            Ok(snapshot) => Arc::new(snapshot),
            Err(e) => {
                warn!(generation, error = %e, "dashboard.ledger_failed");
                self.publish(generation, Workflow::Error { message: e.to_string() });
                return Ok(());
            }
        };

        let current = self.publish(
            generation,
            Workflow::Loaded {
                snapshot: snapshot.clone(),
            },
        );
        if !current {
            return Ok(());
        }

        let analysis = self.analyzer.analyze(address, &snapshot.transactions).await;
        self.publish(generation, Workflow::LoadedWithAnalysis { snapshot, analysis });
        Ok(())
    }

    async fn fetch_snapshot(&self, address: &str, credential: &str) -> Result<WalletSnapshot, LedgerError> {
        let balance = self.ledger.fetch_balance(address, credential).await?;
        let transactions = self.ledger.fetch_transactions(address, credential).await?;
        Ok(WalletSnapshot::assemble(address, balance, transactions))
    }

    fn begin_cycle(&self) -> u64 {
        let mut generation = 0;
        self.view.send_modify(|v| {
            v.generation += 1;
            v.workflow = Workflow::Loading;
            generation = v.generation;
        });
        generation
    }

    /// Applies `workflow` only if `generation` is still the live cycle.
    fn publish(&self, generation: u64, workflow: Workflow) -> bool {
        let label = workflow.label();
        let applied = self.view.send_if_modified(|v| {
            if v.generation != generation {
                return false;
            }
            v.workflow = workflow;
            true
        });
        if applied {
            debug!(generation, state = label, "dashboard.transition");
        } else {
            debug!(generation, state = label, "dashboard.stale_discarded");
        }
        applied
    }
}
