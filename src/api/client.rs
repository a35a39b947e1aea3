//! Gateway client: sends one action request and interprets the answer.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use reqwest::Url;
use serde_json::Value;
use tracing::debug;

use crate::api::action::ActionRequest;
use crate::api::error::ApiErrorCode;
use crate::error::{ClientError, Result};
use crate::http::{HttpClient, Transport};

/// Default gateway endpoint.
pub const API_URL: &str = "https://g.api.mega.co.nz/cs";

/// Stateless request executor for the action gateway.
///
/// Every request is sent as a one-element batch; the first element of the
/// answer is returned. There is no retry and no session check: a request
/// without a valid `sid` fails at the server and surfaces as
/// [`ClientError::RemoteError`].
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    api_url: String,
    request_id: AtomicU32,
}

impl ApiClient {
    /// Create a client for the default gateway.
    pub fn new() -> Self {
        Self::with_transport(Arc::new(HttpClient::new()), API_URL)
    }

    /// Create a client over any transport and gateway URL.
    pub fn with_transport(transport: Arc<dyn Transport>, api_url: impl Into<String>) -> Self {
        Self {
            transport,
            api_url: api_url.into(),
            request_id: AtomicU32::new(rand::random()),
        }
    }

    /// The transport used for gateway and transfer requests.
    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn request_url(&self, id: u32, sid: Option<&str>) -> Result<Url> {
        let id = id.to_string();
        let mut params = vec![("id", id.as_str())];
        if let Some(sid) = sid {
            params.push(("sid", sid));
        }
        Url::parse_with_params(&self.api_url, &params).map_err(|e| {
            ClientError::ConfigError(format!("Invalid api_url {}: {}", self.api_url, e))
        })
    }

    /// Execute a single action request.
    pub async fn execute(&self, request: ActionRequest) -> Result<Value> {
        let id = self.request_id.fetch_add(1, Ordering::Relaxed).wrapping_add(1);
        let url = self.request_url(id, request.session())?;
        let body = serde_json::to_string(&[request.to_json()])?;

        debug!(action = request.action(), id, "api request");
        let response_text = self.transport.post_json(url.as_str(), &body).await?;
        debug!(
            action = request.action(),
            id,
            bytes = response_text.len(),
            "api response"
        );

        interpret_response(&response_text)
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Turn a raw gateway answer into the first result or an error.
pub(crate) fn interpret_response(text: &str) -> Result<Value> {
    let response: Value = serde_json::from_str(text)
        .map_err(|e| ClientError::ProtocolError(format!("response is not JSON: {}", e)))?;

    let first = match response {
        Value::Array(mut items) => {
            if items.is_empty() {
                return Err(ClientError::ProtocolError("empty response batch".into()));
            }
            items.swap_remove(0)
        }
        // Whole-batch failures come back as a bare number.
        Value::Number(_) => response,
        other => {
            return Err(ClientError::ProtocolError(format!(
                "unexpected response shape: {}",
                other
            )));
        }
    };

    match first.as_i64() {
        Some(code) if code < 0 => Err(ClientError::RemoteError {
            code: ApiErrorCode::from(code),
        }),
        _ => Ok(first),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bytes::Bytes;
    use parking_lot::Mutex;
    use serde_json::json;

    struct Recorder {
        calls: Mutex<Vec<(String, String)>>,
        reply: String,
    }

    #[async_trait]
    impl Transport for Recorder {
        async fn post_json(&self, url: &str, body: &str) -> Result<String> {
            self.calls.lock().push((url.to_string(), body.to_string()));
            Ok(self.reply.clone())
        }

        async fn post_multipart(&self, _: &str, _: &str, _: &str, _: Bytes) -> Result<String> {
            unreachable!()
        }

        async fn get_bytes(&self, _: &str) -> Result<Bytes> {
            unreachable!()
        }
    }

    #[test]
    fn test_interpret_first_element() {
        let value = interpret_response(r#"[{"csid":"X"}]"#).unwrap();
        assert_eq!(value, json!({"csid": "X"}));
        assert_eq!(interpret_response("[0]").unwrap(), json!(0));
    }

    #[test]
    fn test_interpret_negative_codes() {
        let err = interpret_response("[-9]").unwrap_err();
        assert!(matches!(
            err,
            ClientError::RemoteError {
                code: ApiErrorCode::NotExist
            }
        ));
        let err = interpret_response("-15").unwrap_err();
        assert!(matches!(
            err,
            ClientError::RemoteError {
                code: ApiErrorCode::Blocked
            }
        ));
    }

    #[test]
    fn test_interpret_malformed() {
        assert!(interpret_response("<html>").unwrap_err().is_protocol());
        assert!(interpret_response("[]").unwrap_err().is_protocol());
        assert!(interpret_response(r#"{"f":[]}"#).unwrap_err().is_protocol());
    }

    #[tokio::test]
    async fn test_execute_sends_single_element_batch() {
        let recorder = Arc::new(Recorder {
            calls: Mutex::new(Vec::new()),
            reply: r#"[{"f":[]}]"#.to_string(),
        });
        let client = ApiClient::with_transport(recorder.clone(), "https://gw.test/cs");

        let value = client
            .execute(ActionRequest::list_files().with_session(Some("SID")))
            .await
            .unwrap();
        assert_eq!(value, json!({"f": []}));

        let calls = recorder.calls.lock();
        assert_eq!(calls.len(), 1);
        let (url, body) = &calls[0];
        assert!(url.starts_with("https://gw.test/cs?id="));
        assert!(url.ends_with("&sid=SID"));
        let body: Value = serde_json::from_str(body).unwrap();
        assert_eq!(body, json!([{"a": "f", "c": 1, "r": 1, "sid": "SID"}]));
    }

    #[tokio::test]
    async fn test_execute_without_session_has_no_sid() {
        let recorder = Arc::new(Recorder {
            calls: Mutex::new(Vec::new()),
            reply: "[-9]".to_string(),
        });
        let client = ApiClient::with_transport(recorder.clone(), API_URL);

        let err = client
            .execute(ActionRequest::login("a@b.c", "00"))
            .await
            .unwrap_err();
        assert!(err.is_remote());
        assert!(!recorder.calls.lock()[0].0.contains("sid="));
    }

    #[tokio::test]
    async fn test_request_ids_increase() {
        let recorder = Arc::new(Recorder {
            calls: Mutex::new(Vec::new()),
            reply: "[0]".to_string(),
        });
        let client = ApiClient::with_transport(recorder.clone(), API_URL);
        client.execute(ActionRequest::delete("a")).await.unwrap();
        client.execute(ActionRequest::delete("b")).await.unwrap();

        let ids: Vec<u32> = recorder
            .calls
            .lock()
            .iter()
            .map(|(url, _)| url.rsplit("id=").next().unwrap().parse().unwrap())
            .collect();
        assert_eq!(ids[1], ids[0].wrapping_add(1));
    }

    #[tokio::test]
    async fn test_session_token_is_escaped_in_url_and_sent_in_body() {
        let recorder = Arc::new(Recorder {
            calls: Mutex::new(Vec::new()),
            reply: "[0]".to_string(),
        });
        let client = ApiClient::with_transport(recorder.clone(), "https://gw.test/cs");
        client
            .execute(ActionRequest::delete("H").with_session(Some("a&b=c#d")))
            .await
            .unwrap();

        let calls = recorder.calls.lock();
        let (url, body) = &calls[0];
        let url = Url::parse(url).unwrap();
        let query: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(query.len(), 2);
        assert_eq!(query[0].0, "id");
        assert_eq!(query[1], ("sid".to_string(), "a&b=c#d".to_string()));
        assert!(url.fragment().is_none());

        let body: Value = serde_json::from_str(body).unwrap();
        assert_eq!(body, json!([{"a": "d", "n": "H", "sid": "a&b=c#d"}]));
    }

    #[test]
    fn test_bad_api_url_is_config_error() {
        let client = ApiClient::with_transport(Arc::new(HttpClient::new()), "not a url");
        assert!(matches!(
            client.request_url(1, None),
            Err(ClientError::ConfigError(_))
        ));
    }
}
