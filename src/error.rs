use thiserror::Error;

/// Rejected before any network call is made.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter a wallet address.")]
    MissingAddress,

    #[error("Please provide an Etherscan API Key to fetch data.")]
    MissingCredential,
}

/// Fatal to the current lookup cycle; shown to the user.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// The provider answered with a failure status.
    #[error("{0}")]
    Query(String),

    #[error("ledger request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected ledger payload: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Never surfaced; the analyzer degrades to a fixed result instead.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("generative model API key is not configured")]
    MissingCredential,

    #[error("model request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("empty response from model")]
    EmptyResponse,

    #[error("model output does not match schema: {0}")]
    Malformed(#[from] serde_json::Error),
}
