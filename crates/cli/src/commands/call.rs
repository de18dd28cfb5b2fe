//! `hipaa-guardian call`: run one tool locally.

use std::sync::Arc;

use hipaa_guardian_config::AppConfig;
use hipaa_guardian_core::knowledge::KnowledgeStore;
use hipaa_guardian_core::tool::ToolCall;

pub async fn run(
    config: AppConfig,
    name: &str,
    args: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let arguments = match args {
        Some(raw) => serde_json::from_str(raw)
            .map_err(|e| format!("--args must be a JSON object: {e}"))?,
        None => serde_json::Value::Null,
    };

    let store = KnowledgeStore::load(&config.knowledge.path)?;
    let registry = hipaa_guardian_tools::default_registry(Arc::new(store))?;

    let result = registry.dispatch(&ToolCall::new(name, arguments)).await?;
    println!("{}", result.joined_text());

    Ok(())
}
