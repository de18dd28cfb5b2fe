//! `hipaa-guardian gateway`: MCP over HTTP.

use std::sync::Arc;

use hipaa_guardian_config::AppConfig;
use hipaa_guardian_gateway::McpServer;

/// `--port` is already folded into `config` by the override layer.
pub async fn run(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let server = McpServer::from_config(&config)?;

    eprintln!("🛡️  HIPAA Guardian Gateway");
    eprintln!("   Listening: {}:{}", config.gateway.host, config.gateway.port);
    eprintln!("   Endpoint:  POST /mcp");
    eprintln!("   Tools:     {}", server.registry().len());

    hipaa_guardian_gateway::start(Arc::new(server), &config.gateway).await?;

    Ok(())
}
