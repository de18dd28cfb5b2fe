//! `hipaa-guardian tools`: print the tool catalog.

use std::sync::Arc;

use hipaa_guardian_config::AppConfig;
use hipaa_guardian_core::knowledge::KnowledgeStore;
use hipaa_guardian_core::schema::FieldKind;

pub fn run(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    // Listing only needs definitions, so a missing knowledge base is not fatal here.
    let store = KnowledgeStore::load(&config.knowledge.path).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Knowledge base unavailable; lookups will fail");
        KnowledgeStore::default()
    });
    let registry = hipaa_guardian_tools::default_registry(Arc::new(store))?;

    println!("🧰 {} tools\n", registry.len());
    for name in registry.names() {
        let Some(tool) = registry.get(name) else {
            continue;
        };
        println!("  {name}");
        if let Some(summary) = tool.description().lines().next() {
            println!("      {summary}");
        }
        let shape = tool.input_shape();
        for field in shape.fields() {
            let kind = match &field.kind {
                FieldKind::String => "string".to_string(),
                FieldKind::Enum(values) => values.join(" | "),
            };
            let required = if field.required { "required" } else { "optional" };
            println!("      {}: {kind} ({required})", field.name);
        }
    }

    Ok(())
}
