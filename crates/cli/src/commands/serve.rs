//! `hipaa-guardian serve`: MCP over stdin/stdout.

use std::sync::Arc;

use hipaa_guardian_config::AppConfig;
use hipaa_guardian_gateway::{McpServer, serve_stdio};

pub async fn run(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let server = McpServer::from_config(&config)?;
    tracing::info!(
        name = %server.info().name,
        version = %server.info().version,
        "Server ready on stdio"
    );

    serve_stdio(Arc::new(server)).await?;
    Ok(())
}
