use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::{Transaction, MAX_TRANSACTIONS};
use crate::error::LedgerError;

const STATUS_FAILED: &str = "0";
const NO_TRANSACTIONS: &str = "No transactions found";
const GENERIC_FAILURE: &str = "NOTOK";

#[derive(Clone)]
pub struct EtherscanClient {
    base_url: String,
    http: Client,
}

/// `{status, message, result}` wrapper used by every account endpoint.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    status: String,
    #[serde(default)]
    message: String,
    #[serde(default)]
    result: serde_json::Value,
}

impl Envelope {
    fn is_failure(&self) -> bool {
        self.status == STATUS_FAILED
    }

    /// Etherscan often answers `message: "NOTOK"` with the real reason in `result`.
    fn into_error(self, fallback: &str) -> LedgerError {
        let detail = match self.result {
            serde_json::Value::String(s) if self.message == GENERIC_FAILURE && !s.is_empty() => s,
            _ => self.message,
        };
        if detail.is_empty() {
            LedgerError::Query(fallback.to_string())
        } else {
            LedgerError::Query(detail)
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct AccountQuery<'a> {
    module: &'static str,
    action: &'static str,
    address: &'a str,
    apikey: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    tag: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    startblock: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    endblock: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    offset: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sort: Option<&'static str>,
}

impl EtherscanClient {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    async fn get(&self, query: &AccountQuery<'_>) -> Result<Envelope, LedgerError> {
        let resp = self
            .http
            .get(&self.base_url)
            .query(query)
            .send()
            .await?
            .error_for_status()?;
        let body = resp.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Latest balance in wei.
    pub async fn fetch_balance(&self, address: &str, api_key: &str) -> Result<String, LedgerError> {
        debug!(address, "ledger.fetch_balance");
        let env = self
            .get(&AccountQuery {
                module: "account",
                action: "balance",
                address,
                apikey: api_key,
                tag: Some("latest"),
                startblock: None,
                endblock: None,
                page: None,
                offset: None,
                sort: None,
            })
            .await?;

        if env.is_failure() {
            let err = env.into_error("Failed to fetch balance");
            warn!(address, error = %err, "ledger.fetch_balance.failed");
            return Err(err);
        }

        match env.result {
            serde_json::Value::String(balance) => Ok(balance),
            other => Ok(serde_json::from_value::<String>(other)?),
        }
    }

    /// Up to 20 most recent transactions, newest first. "No transactions found" is an empty list.
    pub async fn fetch_transactions(
        &self,
        address: &str,
        api_key: &str,
    ) -> Result<Vec<Transaction>, LedgerError> {
        debug!(address, "ledger.fetch_transactions");
        let env = self
            .get(&AccountQuery {
                module: "account",
                action: "txlist",
                address,
                apikey: api_key,
                tag: None,
                startblock: Some(0),
                endblock: Some(99_999_999),
                page: Some(1),
                offset: Some(MAX_TRANSACTIONS),
                sort: Some("desc"),
            })
            .await?;

        if env.is_failure() {
            if env.message == NO_TRANSACTIONS {
                return Ok(vec![]);
            }
            let err = env.into_error("Failed to fetch transactions");
            warn!(address, error = %err, "ledger.fetch_transactions.failed");
            return Err(err);
        }

        if env.result.is_null() {
            return Ok(vec![]);
        }
        Ok(serde_json::from_value(env.result)?)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::{
        matchers::{method, path, query_param},
        Mock, MockServer, ResponseTemplate,
    };

    pub(crate) async fn mock_action(server: &MockServer, action: &str, body: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path("/api"))
            .and(query_param("action", action))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
    }

    fn client(server: &MockServer) -> EtherscanClient {
        EtherscanClient::new(format!("{}/api/", server.uri()))
    }

    #[tokio::test]
    async fn balance_sends_expected_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api"))
            .and(query_param("module", "account"))
            .and(query_param("action", "balance"))
            .and(query_param("address", "0xABC"))
            .and(query_param("tag", "latest"))
            .and(query_param("apikey", "k1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "1", "message": "OK", "result": "2500000000000000000"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let balance = client(&server).fetch_balance("0xABC", "k1").await.unwrap();
        assert_eq!(balance, "2500000000000000000");
    }

    #[tokio::test]
    async fn balance_failure_carries_provider_message() {
        let server = MockServer::start().await;
        mock_action(&server, "balance", json!({"status": "0", "message": "Invalid API Key"})).await;

        let err = client(&server).fetch_balance("0xABC", "bad").await.unwrap_err();
        assert!(matches!(err, LedgerError::Query(_)));
        assert_eq!(err.to_string(), "Invalid API Key");
    }

    #[tokio::test]
    async fn notok_prefers_result_text() {
        let server = MockServer::start().await;
        mock_action(
            &server,
            "balance",
            json!({"status": "0", "message": "NOTOK", "result": "Max rate limit reached"}),
        )
        .await;

        let err = client(&server).fetch_balance("0xABC", "k").await.unwrap_err();
        assert_eq!(err.to_string(), "Max rate limit reached");
    }

    #[tokio::test]
    async fn empty_message_uses_fallback() {
        let server = MockServer::start().await;
        mock_action(&server, "balance", json!({"status": "0"})).await;

        let err = client(&server).fetch_balance("0xABC", "k").await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to fetch balance");
    }

    #[tokio::test]
    async fn txlist_sends_paging_params() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api"))
            .and(query_param("action", "txlist"))
            .and(query_param("startblock", "0"))
            .and(query_param("endblock", "99999999"))
            .and(query_param("page", "1"))
            .and(query_param("offset", "20"))
            .and(query_param("sort", "desc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "1",
                "message": "OK",
                "result": [
                    {"hash": "0x2", "from": "0xabc", "to": "0xdef", "value": "5", "timeStamp": "1700000100", "isError": "1"},
                    {"hash": "0x1", "from": "0xdef", "to": "0xabc", "value": "7", "timeStamp": "1700000000", "isError": "0"}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let txs = client(&server).fetch_transactions("0xabc", "k").await.unwrap();
        assert_eq!(txs.len(), 2);
        assert_eq!(txs[0].hash, "0x2");
        assert!(txs[0].is_error());
    }

    #[tokio::test]
    async fn no_transactions_found_is_empty_success() {
        let server = MockServer::start().await;
        mock_action(
            &server,
            "txlist",
            json!({"status": "0", "message": "No transactions found", "result": []}),
        )
        .await;

        let txs = client(&server).fetch_transactions("0xabc", "k").await.unwrap();
        assert!(txs.is_empty());
    }

    #[tokio::test]
    async fn other_txlist_failures_are_errors() {
        let server = MockServer::start().await;
        mock_action(
            &server,
            "txlist",
            json!({"status": "0", "message": "Invalid address format", "result": []}),
        )
        .await;

        let err = client(&server).fetch_transactions("nope", "k").await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid address format");
    }

    #[tokio::test]
    async fn http_status_error_is_ledger_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let err = client(&server).fetch_balance("0xabc", "k").await.unwrap_err();
        assert!(matches!(err, LedgerError::Http(_)));
    }

    #[tokio::test]
    async fn non_json_body_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>Bad Gateway</html>"))
            .mount(&server)
            .await;

        let err = client(&server).fetch_balance("0xabc", "k").await.unwrap_err();
        assert!(matches!(err, LedgerError::Decode(_)));
    }

    #[tokio::test]
    async fn non_string_balance_is_decode_error() {
        let server = MockServer::start().await;
        mock_action(&server, "balance", json!({"status": "1", "message": "OK", "result": {"wei": 5}})).await;

        let err = client(&server).fetch_balance("0xabc", "k").await.unwrap_err();
        assert!(matches!(err, LedgerError::Decode(_)));
    }

    #[tokio::test]
    async fn non_array_txlist_is_decode_error() {
        let server = MockServer::start().await;
        mock_action(&server, "txlist", json!({"status": "1", "message": "OK", "result": "not a list"})).await;

        let err = client(&server).fetch_transactions("0xabc", "k").await.unwrap_err();
        assert!(matches!(err, LedgerError::Decode(_)));
    }
}
