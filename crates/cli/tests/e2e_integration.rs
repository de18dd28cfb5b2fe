//! End-to-end integration tests for the HIPAA Guardian MCP server.
//!
//! These tests load a knowledge base from disk through the config layer and
//! drive a full JSON-RPC session over the stdio transport.

use std::path::PathBuf;
use std::sync::Arc;

use hipaa_guardian_config::AppConfig;
use hipaa_guardian_core::knowledge::{KnowledgeStore, REQUIRED_KEYS};
use hipaa_guardian_gateway::McpServer;
use hipaa_guardian_gateway::stdio;
use serde_json::{Value, json};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

// ── Helpers ──────────────────────────────────────────────────────────────

fn sample_knowledge_base() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../data/hipaa-content.json")
}

fn server_for(path: PathBuf) -> Arc<McpServer> {
    let mut config = AppConfig::default();
    config
        .apply_overrides(|key| match key {
            "HIPAA_GUARDIAN_KNOWLEDGE_BASE" => Some(path.display().to_string()),
            _ => None,
        })
        .unwrap();
    config.validate().unwrap();
    Arc::new(McpServer::from_config(&config).unwrap())
}

/// A connected client: writes requests into the server's stdin and reads
/// responses from its stdout.
struct Session {
    input: tokio::io::DuplexStream,
    output: tokio::io::Lines<BufReader<tokio::io::DuplexStream>>,
    task: tokio::task::JoinHandle<std::io::Result<()>>,
}

impl Session {
    fn start(server: Arc<McpServer>) -> Self {
        let (input, server_in) = tokio::io::duplex(64 * 1024);
        let (server_out, output) = tokio::io::duplex(256 * 1024);
        let task = tokio::spawn(stdio::serve(server, server_in, server_out));
        Self {
            input,
            output: BufReader::new(output).lines(),
            task,
        }
    }

    async fn send(&mut self, message: Value) {
        let mut line = message.to_string();
        line.push('\n');
        self.input.write_all(line.as_bytes()).await.unwrap();
    }

    async fn request(&mut self, message: Value) -> Value {
        self.send(message).await;
        self.recv().await
    }

    async fn recv(&mut self) -> Value {
        let line = self.output.next_line().await.unwrap().expect("server closed stdout");
        serde_json::from_str(&line).unwrap()
    }

    async fn close(mut self) -> Option<String> {
        self.input.shutdown().await.unwrap();
        drop(self.input);
        self.task.await.unwrap().unwrap();
        self.output.next_line().await.unwrap()
    }
}

fn call(id: u64, name: &str, arguments: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": "tools/call",
        "params": {"name": name, "arguments": arguments}
    })
}

// ── Tests ────────────────────────────────────────────────────────────────

#[test]
fn e2e_sample_knowledge_base_has_every_section() {
    let store = KnowledgeStore::load(&sample_knowledge_base()).unwrap();
    assert!(store.missing_keys(&REQUIRED_KEYS).is_empty());
}

#[tokio::test]
async fn e2e_full_session_over_stdio() {
    let mut session = Session::start(server_for(sample_knowledge_base()));

    let init = session
        .request(json!({
            "jsonrpc": "2.0", "id": 1, "method": "initialize",
            "params": {
                "protocolVersion": "2025-03-26",
                "capabilities": {},
                "clientInfo": {"name": "e2e", "version": "1.0"}
            }
        }))
        .await;
    assert_eq!(init["id"], 1);
    assert_eq!(init["result"]["protocolVersion"], "2025-03-26");
    assert_eq!(init["result"]["serverInfo"]["name"], "HIPAA Compliance Guardian");

    session
        .send(json!({"jsonrpc": "2.0", "method": "notifications/initialized"}))
        .await;

    let list = session
        .request(json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list"}))
        .await;
    let tools = list["result"]["tools"].as_array().unwrap();
    assert_eq!(tools.len(), 15);
    let vendor = tools
        .iter()
        .find(|t| t["name"] == "getVendorVettingChecklist")
        .unwrap();
    assert_eq!(vendor["inputSchema"]["required"], json!(["vendorName"]));

    let roadmap = session
        .request(call(3, "getComplianceRoadmap", json!({})))
        .await;
    let expected = KnowledgeStore::load(&sample_knowledge_base())
        .unwrap()
        .get("becoming_hipaa_compliant")
        .unwrap()
        .to_string();
    assert_eq!(roadmap["result"]["content"][0]["text"], expected);

    let vetting = session
        .request(call(4, "getVendorVettingChecklist", json!({"vendorName": "Acme Cloud"})))
        .await;
    let text = vetting["result"]["content"][0]["text"].as_str().unwrap();
    assert!(text.contains("Acme Cloud"));
    assert!(!text.contains("{{"));

    let confirm = session
        .request(call(
            5,
            "confirmCodeCompliance",
            json!({
                "codeSnippet": "log::info!(\"user {}\", user.id);",
                "checklist": "Never log PHI",
                "justification": "Only the opaque user id is logged."
            }),
        ))
        .await;
    assert_eq!(
        confirm["result"]["content"][0]["text"],
        "Compliance Justification Confirmed:\n\nOnly the opaque user id is logged."
    );

    // Notifications produce no output, so stdout ends after the last response.
    assert_eq!(session.close().await, None);
}

#[tokio::test]
async fn e2e_errors_do_not_end_the_session() {
    let mut session = Session::start(server_for(sample_knowledge_base()));

    session.input.write_all(b"{broken\n").await.unwrap();
    let parse = session.recv().await;
    assert_eq!(parse["error"]["code"], -32700);

    let unknown = session
        .request(call(1, "getHipaaCertificate", json!({})))
        .await;
    assert_eq!(unknown["error"]["code"], -32602);

    let invalid = session
        .request(call(2, "getCoreDefinitions", json!({"term": "HITECH", "extra": 1})))
        .await;
    assert_eq!(invalid["error"]["code"], -32602);
    assert_eq!(
        invalid["error"]["data"]["violations"].as_array().unwrap().len(),
        2
    );

    let ping = session
        .request(json!({"jsonrpc": "2.0", "id": 3, "method": "ping"}))
        .await;
    assert_eq!(ping["result"], json!({}));

    session.close().await;
}

#[tokio::test]
async fn e2e_missing_section_is_tool_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("partial.json");
    std::fs::write(&path, r#"{"what_is_hipaa?": "HIPAA is a 1996 US law."}"#).unwrap();

    let mut session = Session::start(server_for(path));

    let defs = session
        .request(call(1, "getCoreDefinitions", json!({"term": "PHI"})))
        .await;
    assert_eq!(
        defs["result"]["content"][0]["text"],
        "Here are the core definitions from the guide:\n\nHIPAA is a 1996 US law."
    );

    let fines = session
        .request(call(2, "getPenaltyInformation", json!({})))
        .await;
    assert_eq!(fines["result"]["isError"], true);

    session.close().await;
}

#[test]
fn e2e_unreadable_knowledge_base_fails_startup() {
    let mut config = AppConfig::default();
    config.knowledge.path = PathBuf::from("/nonexistent/hipaa-content.json");
    assert!(McpServer::from_config(&config).is_err());
}
