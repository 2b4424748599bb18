//! Zoho Analytics API client
//!
//! Wraps the reports API's POST-with-query-parameters calling convention:
//! every request carries a fixed set of `ZOHO_*` parameters plus the
//! per-operation ones, and is authorized through the token cache before it
//! goes out.

use crate::{
    auth::TokenCache,
    config::ZohoConfig,
    errors::{Result, ZohoError},
    utils::{create_http_client, log_api_request},
};
use reqwest::{multipart, Client};
use serde::Deserialize;
use std::collections::HashMap;

const OUTPUT_FORMAT: &str = "JSON";
const ERROR_FORMAT: &str = "JSON";
const API_VERSION: &str = "1.0";
const VALID_JSON: &str = "true";
const AUTO_IDENTIFY: &str = "true";
const ADD_ROW_ACTION: &str = "ADDROW";
const IMPORT_ACTION: &str = "IMPORT";
const CSV_FILE_FIELD: &str = "ZOHO_FILE";
const CSV_FILE_NAME: &str = "file.csv";

/// Response returned by the row-append and CSV-import operations
#[derive(Debug, Clone, Deserialize)]
pub struct AddRowResponse {
    /// Envelope around the operation result
    pub response: ApiResponse,
}

/// Envelope element of [`AddRowResponse`]
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse {
    /// Request URI echoed back by the server
    #[serde(default)]
    pub uri: String,
    /// `ZOHO_ACTION` the request carried
    #[serde(default)]
    pub action: String,
    /// Inserted data as the server recorded it
    #[serde(default)]
    pub result: ResponseResult,
}

/// Result element of [`AddRowResponse`]
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseResult {
    /// Column names in server order
    #[serde(default)]
    pub column_order: Vec<String>,
    /// Inserted rows, cells in `column_order` order
    #[serde(default)]
    pub rows: Vec<Vec<String>>,
}

/// Client for the Zoho Analytics reports API
pub struct ZohoClient {
    config: ZohoConfig,
    http: Client,
    auth: TokenCache,
}

impl ZohoClient {
    /// Create a new client from a validated configuration
    pub fn new(config: ZohoConfig) -> Result<Self> {
        config.validate()?;

        let http = create_http_client(&config)?;
        let auth = TokenCache::new(&config);

        Ok(Self { config, http, auth })
    }

    /// The configuration this client was built from
    pub fn config(&self) -> &ZohoConfig {
        &self.config
    }

    /// Full URL for a table in a Zoho Analytics workspace
    pub fn table_url(&self, email_id: &str, workspace: &str, table: &str) -> String {
        self.config.table_url(email_id, workspace, table)
    }

    /// Append a single row to the table identified by `table_url`.
    ///
    /// Column values ride as query parameters, keyed by column name. The
    /// response echoes the inserted row.
    pub async fn add_row(
        &self,
        table_url: &str,
        column_values: &HashMap<String, String>,
    ) -> Result<AddRowResponse> {
        self.send_api_request(table_url, ADD_ROW_ACTION, column_values, None)
            .await
    }

    /// Bulk-import CSV data into the table identified by `table_url`.
    ///
    /// `import_config` holds the provider's import parameters, e.g.
    /// `ZOHO_IMPORT_TYPE` (`APPEND`, `TRUNCATEADD`, `UPDATEADD`) and
    /// `ZOHO_ON_IMPORT_ERROR` (`ABORT`, `SKIPROW`, `SETCOLUMNEMPTY`).
    /// `ZOHO_AUTO_IDENTIFY` is always set to `true` so the server detects
    /// the CSV format itself.
    pub async fn import_csv(
        &self,
        table_url: &str,
        csv_data: impl Into<String>,
        import_config: &HashMap<String, String>,
    ) -> Result<AddRowResponse> {
        let mut params = import_config.clone();
        params.insert("ZOHO_AUTO_IDENTIFY".to_string(), AUTO_IDENTIFY.to_string());

        let csv_part = multipart::Part::text(csv_data.into())
            .file_name(CSV_FILE_NAME)
            .mime_str("text/csv")?;
        let form = multipart::Form::new().part(CSV_FILE_FIELD, csv_part);

        self.send_api_request(table_url, IMPORT_ACTION, &params, Some(form))
            .await
    }

    // One code path for every reports API call: fixed ZOHO_* parameters,
    // per-operation parameters, bearer token, POST, envelope decode.
    async fn send_api_request(
        &self,
        table_url: &str,
        action: &str,
        params: &HashMap<String, String>,
        form: Option<multipart::Form>,
    ) -> Result<AddRowResponse> {
        let mut request = self
            .http
            .post(table_url)
            .query(&[
                ("ZOHO_ACTION", action),
                ("ZOHO_OUTPUT_FORMAT", OUTPUT_FORMAT),
                ("ZOHO_ERROR_FORMAT", ERROR_FORMAT),
                ("ZOHO_API_VERSION", API_VERSION),
                ("ZOHO_VALID_JSON", VALID_JSON),
            ])
            .query(params);

        if let Some(form) = form {
            request = request.multipart(form);
        }

        let request = self.auth.authorize(&self.http, request).await?;

        log_api_request(&self.config, action, table_url);

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ZohoError::from_response(status, &body));
        }

        let decoded: AddRowResponse = response.json().await?;
        Ok(decoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mount_token_endpoint(mock_server: &MockServer) {
        Mock::given(method("POST"))
            .and(path("/oauth/v2/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "test-token",
                "scope": "ZohoAnalytics.data.create",
                "api_domain": "https://www.zohoapis.eu",
                "token_type": "Bearer",
                "expires_in": 3600
            })))
            .mount(mock_server)
            .await;
    }

    async fn test_client(mock_server: &MockServer) -> ZohoClient {
        mount_token_endpoint(mock_server).await;

        let config = ZohoConfig::new("test-id", "test-secret", "test-refresh")
            .with_accounts_domain(mock_server.uri())
            .with_analytics_domain(mock_server.uri());

        ZohoClient::new(config).unwrap()
    }

    fn add_row_body() -> serde_json::Value {
        serde_json::json!({
            "response": {
                "uri": "/api/user@example.com/Sales/Orders",
                "action": "ADDROW",
                "result": {
                    "column_order": ["Name", "Amount"],
                    "rows": [["Widget", "100"]]
                }
            }
        })
    }

    #[tokio::test]
    async fn add_row_sends_column_values_as_query_params() {
        let mock_server = MockServer::start().await;
        let client = test_client(&mock_server).await;

        Mock::given(method("POST"))
            .and(path("/api/user@example.com/Sales/Orders"))
            .and(query_param("ZOHO_ACTION", "ADDROW"))
            .and(query_param("ZOHO_OUTPUT_FORMAT", "JSON"))
            .and(query_param("ZOHO_ERROR_FORMAT", "JSON"))
            .and(query_param("ZOHO_API_VERSION", "1.0"))
            .and(query_param("ZOHO_VALID_JSON", "true"))
            .and(query_param("Name", "Widget"))
            .and(query_param("Amount", "100"))
            .and(header("Authorization", "Zoho-oauthtoken test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(add_row_body()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let table_url = client.table_url("user@example.com", "Sales", "Orders");
        let column_values = HashMap::from([
            ("Name".to_string(), "Widget".to_string()),
            ("Amount".to_string(), "100".to_string()),
        ]);

        let response = client.add_row(&table_url, &column_values).await.unwrap();

        assert_eq!(response.response.action, "ADDROW");
        assert_eq!(response.response.result.column_order, vec!["Name", "Amount"]);
        assert_eq!(response.response.result.rows, vec![vec!["Widget", "100"]]);
    }

    #[tokio::test]
    async fn add_row_decodes_api_error_envelope() {
        let mock_server = MockServer::start().await;
        let client = test_client(&mock_server).await;

        Mock::given(method("POST"))
            .and(path("/api/user@example.com/Sales/Missing"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "response": {
                    "uri": "/api/user@example.com/Sales/Missing",
                    "action": "ADDROW",
                    "error": {"code": 7103, "message": "Table not found"}
                }
            })))
            .mount(&mock_server)
            .await;

        let table_url = client.table_url("user@example.com", "Sales", "Missing");
        let result = client.add_row(&table_url, &HashMap::new()).await;

        match result {
            Err(ZohoError::Api { code, message, .. }) => {
                assert_eq!(code, 7103);
                assert_eq!(message, "Table not found");
            }
            other => panic!("expected api error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn import_csv_uploads_multipart_file() {
        let mock_server = MockServer::start().await;
        let client = test_client(&mock_server).await;

        Mock::given(method("POST"))
            .and(path("/api/user@example.com/Sales/Orders"))
            .and(query_param("ZOHO_ACTION", "IMPORT"))
            .and(query_param("ZOHO_AUTO_IDENTIFY", "true"))
            .and(query_param("ZOHO_IMPORT_TYPE", "APPEND"))
            .and(header("Authorization", "Zoho-oauthtoken test-token"))
            .and(body_string_contains("ZOHO_FILE"))
            .and(body_string_contains("file.csv"))
            .and(body_string_contains("Name,Amount\nWidget,100"))
            .respond_with(ResponseTemplate::new(200).set_body_json(add_row_body()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let table_url = client.table_url("user@example.com", "Sales", "Orders");
        let import_config =
            HashMap::from([("ZOHO_IMPORT_TYPE".to_string(), "APPEND".to_string())]);

        let response = client
            .import_csv(&table_url, "Name,Amount\nWidget,100", &import_config)
            .await
            .unwrap();

        assert_eq!(response.response.result.rows.len(), 1);
    }

    #[tokio::test]
    async fn import_csv_forces_auto_identify() {
        let mock_server = MockServer::start().await;
        let client = test_client(&mock_server).await;

        Mock::given(method("POST"))
            .and(path("/api/user@example.com/Sales/Orders"))
            .and(query_param("ZOHO_AUTO_IDENTIFY", "true"))
            .respond_with(ResponseTemplate::new(200).set_body_json(add_row_body()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let table_url = client.table_url("user@example.com", "Sales", "Orders");

        // A caller-supplied value must not disable format detection.
        let import_config =
            HashMap::from([("ZOHO_AUTO_IDENTIFY".to_string(), "false".to_string())]);

        client
            .import_csv(&table_url, "Name\nWidget", &import_config)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn import_response_without_result_decodes_to_defaults() {
        let mock_server = MockServer::start().await;
        let client = test_client(&mock_server).await;

        Mock::given(method("POST"))
            .and(path("/api/user@example.com/Sales/Orders"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "response": {
                    "uri": "/api/user@example.com/Sales/Orders",
                    "action": "IMPORT"
                }
            })))
            .mount(&mock_server)
            .await;

        let table_url = client.table_url("user@example.com", "Sales", "Orders");
        let response = client
            .import_csv(&table_url, "Name\nWidget", &HashMap::new())
            .await
            .unwrap();

        assert!(response.response.result.column_order.is_empty());
        assert!(response.response.result.rows.is_empty());
    }

    #[test]
    fn new_rejects_invalid_config() {
        let config = ZohoConfig::new("", "secret", "refresh");
        assert!(ZohoClient::new(config).is_err());
    }
}
