//! JSON-RPC node stand-in for tests

use alloy::primitives::address;
use alloy::providers::{Provider, ProviderBuilder};
use serde_json::{json, Value};
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

use crate::config::Contracts;

/// Addresses Hardhat assigns to the first two deployments
pub fn contracts() -> Contracts {
    Contracts {
        exchange: address!("e7f1725E7734CE288F8367e1Bb143E90bb3F0512"),
        token: address!("5FbDB2315678afecb367f032d93F642f64180aa3"),
    }
}

/// Result or error object for a single JSON-RPC request
#[derive(Debug, Clone)]
pub struct RpcReply(Result<Value, (i64, String)>);

impl RpcReply {
    pub fn ok(result: Value) -> Self {
        Self(Ok(result))
    }

    pub fn err(code: i64, message: &str) -> Self {
        Self(Err((code, message.to_string())))
    }
}

struct JsonRpcResponder<F>(F);

impl<F> JsonRpcResponder<F>
where
    F: Fn(&str, &Value) -> RpcReply,
{
    fn answer(&self, request: &Value) -> Value {
        let id = request.get("id").cloned().unwrap_or(Value::Null);
        let method = request["method"].as_str().unwrap_or_default();
        let params = request.get("params").cloned().unwrap_or(Value::Null);

        match (self.0)(method, &params).0 {
            Ok(result) => json!({ "jsonrpc": "2.0", "id": id, "result": result }),
            Err((code, message)) => json!({
                "jsonrpc": "2.0",
                "id": id,
                "error": { "code": code, "message": message },
            }),
        }
    }
}

impl<F> Respond for JsonRpcResponder<F>
where
    F: Fn(&str, &Value) -> RpcReply + Send + Sync,
{
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let body: Value = serde_json::from_slice(&request.body).unwrap_or(Value::Null);
        let reply = match &body {
            Value::Array(batch) => Value::Array(batch.iter().map(|r| self.answer(r)).collect()),
            single => self.answer(single),
        };
        ResponseTemplate::new(200).set_body_json(reply)
    }
}

/// Start a mock node answering through `handler` and connect a plain HTTP provider to it.
/// Keep the returned server alive for as long as the provider is used.
pub async fn rpc_provider<F>(handler: F) -> (MockServer, impl Provider)
where
    F: Fn(&str, &Value) -> RpcReply + Send + Sync + 'static,
{
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(JsonRpcResponder(handler))
        .mount(&server)
        .await;

    let url: reqwest::Url = server.uri().parse().unwrap();
    let provider = ProviderBuilder::new()
        .disable_recommended_fillers()
        .connect_http(url);

    (server, provider)
}
