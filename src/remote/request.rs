use crate::{
    collection::error::CollectionError,
    types::{
        addon::AddonEntry,
        collection::{AddonCollectionGet, AddonCollectionSet},
    },
    utils::api::ApiConfig,
};
use serde::Serialize;
use serde_json::Value;

const COLLECTION_GET_METHOD: &str = "addonCollectionGet";
const COLLECTION_SET_METHOD: &str = "addonCollectionSet";

/// The two calls the collection API offers: read everything, replace everything.
///
/// Neither call is retried. A replace that fails on the wire may still have been applied by
/// the server, so the caller decides whether to send it again.
pub trait CollectionRemote {
    async fn fetch_collection(&self, auth_key: &str) -> Result<Vec<AddonEntry>, CollectionError>;

    async fn replace_collection(
        &self,
        auth_key: &str,
        entries: &[AddonEntry],
    ) -> Result<(), CollectionError>;
}

#[derive(Debug, Clone)]
pub struct RemoteCollectionClient {
    client: reqwest::Client,
    config: ApiConfig,
}

impl RemoteCollectionClient {
    pub fn new(config: ApiConfig) -> Result<Self, CollectionError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| CollectionError::Network(format!("Failed to build HTTP client: {}", e)))?;
        Ok(RemoteCollectionClient { client, config })
    }

    async fn post_to_stremio_api<B: Serialize>(
        &self,
        method: &str,
        body: &B,
    ) -> Result<Value, CollectionError> {
        let response = self
            .client
            .post(self.config.endpoint(method))
            .json(body)
            .send()
            .await
            .map_err(|e| {
                CollectionError::Network(format!("Failed to send request to Stremio API: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = match response.text().await {
                Ok(text) if !text.trim().is_empty() => text,
                _ => "No additional error information".to_string(),
            };
            return Err(CollectionError::Network(format!(
                "HTTP {} - {}",
                status, error_text
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| CollectionError::Network(format!("Failed to read response body: {}", e)))?;

        serde_json::from_str(&body)
            .map_err(|e| CollectionError::Protocol(format!("Failed to parse response JSON: {}", e)))
    }
}

impl CollectionRemote for RemoteCollectionClient {
    async fn fetch_collection(&self, auth_key: &str) -> Result<Vec<AddonEntry>, CollectionError> {
        let json = self
            .post_to_stremio_api(COLLECTION_GET_METHOD, &AddonCollectionGet::new(auth_key))
            .await?;
        parse_collection_get(json)
    }

    async fn replace_collection(
        &self,
        auth_key: &str,
        entries: &[AddonEntry],
    ) -> Result<(), CollectionError> {
        let json = self
            .post_to_stremio_api(
                COLLECTION_SET_METHOD,
                &AddonCollectionSet::new(auth_key, entries),
            )
            .await?;
        parse_collection_set(&json)
    }
}

/// `{result: {addons: [...]}}` -> the addons, in server order.
pub fn parse_collection_get(mut json: Value) -> Result<Vec<AddonEntry>, CollectionError> {
    let addons = json
        .get_mut("result")
        .and_then(|r| r.get_mut("addons"))
        .map(Value::take);
    let addons = match addons {
        Some(addons) => addons,
        None => {
            let reason = server_error_message(&json)
                .map(|msg| format!("no addons in response ({})", msg))
                .unwrap_or_else(|| "no addons in response; the session might be invalid".to_string());
            return Err(CollectionError::Protocol(reason));
        }
    };

    if !addons.is_array() {
        return Err(CollectionError::Protocol(
            "addons field is not an array".to_string(),
        ));
    }

    serde_json::from_value(addons)
        .map_err(|e| CollectionError::Protocol(format!("Failed to decode addon entries: {}", e)))
}

/// `{result: {success: true}}` -> Ok; `{result: {success: false, error}}` -> rejected.
pub fn parse_collection_set(json: &Value) -> Result<(), CollectionError> {
    match json.get("result") {
        Some(result) if result.is_object() => {
            if result.get("success").map(is_truthy).unwrap_or(false) {
                return Ok(());
            }
            let message = result
                .get("error")
                .and_then(error_text)
                .unwrap_or_else(|| "Unknown error".to_string());
            Err(CollectionError::RemoteRejected(message))
        }
        _ => match server_error_message(json) {
            Some(message) => Err(CollectionError::RemoteRejected(message)),
            None => Err(CollectionError::Protocol(
                "result field not found in response".to_string(),
            )),
        },
    }
}

/// The API reports request-level failures as a top-level `error` (string or `{message}`).
fn server_error_message(json: &Value) -> Option<String> {
    json.get("error").and_then(error_text)
}

fn error_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Object(obj) => obj
            .get("message")
            .and_then(|m| m.as_str())
            .map(|s| s.to_string()),
        _ => None,
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;
    use std::time::Duration;

    fn client_for(server: &mockito::Server) -> RemoteCollectionClient {
        RemoteCollectionClient::new(ApiConfig::new(server.url(), Duration::from_secs(5))).unwrap()
    }

    fn addons_payload() -> Value {
        json!([
            {
                "transportUrl": "https://v3-cinemeta.strem.io/manifest.json",
                "transportName": "http",
                "manifest": { "id": "com.linvo.cinemeta", "name": "Cinemeta", "version": "3.0.12" },
                "flags": { "official": true, "protected": true }
            },
            {
                "transportUrl": "https://torrentio.strem.fun/manifest.json",
                "manifest": { "id": "com.stremio.torrentio.addon", "name": "Torrentio", "types": ["movie"] }
            }
        ])
    }

    #[tokio::test]
    async fn fetch_returns_entries_in_server_order() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/addonCollectionGet")
            .match_body(Matcher::Json(json!({
                "type": "AddonCollectionGet",
                "authKey": "key-1",
                "update": true
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({ "result": { "addons": addons_payload() } }).to_string())
            .create_async()
            .await;

        let entries = client_for(&server).fetch_collection("key-1").await.unwrap();

        mock.assert_async().await;
        assert_eq!(serde_json::to_value(&entries).unwrap(), addons_payload());
    }

    #[tokio::test]
    async fn fetch_without_addons_is_a_protocol_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/addonCollectionGet")
            .with_status(200)
            .with_body(r#"{"error":{"message":"Session does not exist","code":1}}"#)
            .create_async()
            .await;

        let err = client_for(&server).fetch_collection("stale").await.unwrap_err();
        assert_eq!(
            err,
            CollectionError::Protocol("no addons in response (Session does not exist)".to_string())
        );
    }

    #[tokio::test]
    async fn fetch_with_garbage_body_is_a_protocol_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/addonCollectionGet")
            .with_status(200)
            .with_body("<html>maintenance</html>")
            .create_async()
            .await;

        let err = client_for(&server).fetch_collection("key").await.unwrap_err();
        assert!(matches!(err, CollectionError::Protocol(_)));
    }

    #[tokio::test]
    async fn fetch_non_2xx_is_a_network_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/addonCollectionGet")
            .with_status(502)
            .with_body("bad gateway")
            .create_async()
            .await;

        let err = client_for(&server).fetch_collection("key").await.unwrap_err();
        match err {
            CollectionError::Network(msg) => assert!(msg.contains("502")),
            other => panic!("expected network error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn unreachable_server_is_a_network_error() {
        let client = RemoteCollectionClient::new(ApiConfig::new(
            "http://127.0.0.1:1/api/",
            Duration::from_secs(2),
        ))
        .unwrap();

        let err = client.fetch_collection("key").await.unwrap_err();
        assert!(matches!(err, CollectionError::Network(_)));
    }

    #[tokio::test]
    async fn stalled_server_times_out_as_network_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        // Accepts the connection and never answers.
        let silent = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(10)).await;
            drop(socket);
        });

        let client = RemoteCollectionClient::new(ApiConfig::new(
            format!("http://{}/api/", addr),
            Duration::from_millis(200),
        ))
        .unwrap();

        let started = std::time::Instant::now();
        let fetched = client.fetch_collection("key").await;
        let replaced = client.replace_collection("key", &[]).await;
        silent.abort();

        assert!(matches!(fetched, Err(CollectionError::Network(_))));
        assert!(matches!(replaced, Err(CollectionError::Network(_))));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn replace_sends_full_collection() {
        let entries: Vec<AddonEntry> = serde_json::from_value(addons_payload()).unwrap();

        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/addonCollectionSet")
            .match_body(Matcher::Json(json!({
                "type": "AddonCollectionSet",
                "authKey": "key-1",
                "addons": addons_payload()
            })))
            .with_status(200)
            .with_body(r#"{"result":{"success":true}}"#)
            .create_async()
            .await;

        client_for(&server)
            .replace_collection("key-1", &entries)
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn replace_rejected_carries_server_message() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/addonCollectionSet")
            .with_status(200)
            .with_body(r#"{"result":{"success":false,"error":"quota exceeded"}}"#)
            .create_async()
            .await;

        let err = client_for(&server)
            .replace_collection("key", &[])
            .await
            .unwrap_err();
        assert_eq!(err, CollectionError::RemoteRejected("quota exceeded".to_string()));
    }

    #[test]
    fn set_response_variants() {
        assert_eq!(parse_collection_set(&json!({ "result": { "success": 1 } })), Ok(()));
        assert_eq!(
            parse_collection_set(&json!({ "result": { "success": false } })),
            Err(CollectionError::RemoteRejected("Unknown error".to_string()))
        );
        assert_eq!(
            parse_collection_set(&json!({ "result": {} })),
            Err(CollectionError::RemoteRejected("Unknown error".to_string()))
        );
        assert_eq!(
            parse_collection_set(&json!({ "error": { "message": "Session does not exist" } })),
            Err(CollectionError::RemoteRejected(
                "Session does not exist".to_string()
            ))
        );
        assert!(matches!(
            parse_collection_set(&json!({ "ok": true })),
            Err(CollectionError::Protocol(_))
        ));
    }

    #[test]
    fn get_response_keeps_entries_exactly_as_sent() {
        let addons = json!([
            { "transportUrl": "u", "manifest": { "name": "A", "logo": null, "description": null } },
            { "manifest": { "id": "x", "logo": 5 } }
        ]);

        let entries = parse_collection_get(json!({ "result": { "addons": addons.clone() } })).unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].name(), "x");
        assert_eq!(serde_json::to_string(&entries).unwrap(), addons.to_string());
    }

    #[test]
    fn get_response_with_non_array_addons_is_rejected() {
        assert!(matches!(
            parse_collection_get(json!({ "result": { "addons": {} } })),
            Err(CollectionError::Protocol(_))
        ));
        assert_eq!(
            parse_collection_get(json!({ "result": { "addons": [] } })),
            Ok(Vec::new())
        );
    }
}
