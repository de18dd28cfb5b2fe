//! Built-in tool implementations for HIPAA Guardian.
//!
//! Three families of tools:
//! - knowledge lookups that return a section of the loaded knowledge base
//! - checklists rendered from embedded Markdown templates
//! - `confirmCodeCompliance`, which echoes the caller's justification

pub mod checklists;
pub mod confirm_compliance;
pub mod knowledge_lookup;

use std::sync::Arc;

use hipaa_guardian_core::error::ToolError;
use hipaa_guardian_core::knowledge::KnowledgeStore;
use hipaa_guardian_core::tool::ToolRegistry;

pub use checklists::ChecklistTool;
pub use confirm_compliance::ConfirmCodeComplianceTool;
pub use knowledge_lookup::KnowledgeLookupTool;

/// Create the registry holding the full tool catalog.
///
/// Only fails if two tools share a name.
pub fn default_registry(store: Arc<KnowledgeStore>) -> Result<ToolRegistry, ToolError> {
    let mut registry = ToolRegistry::new();

    for tool in knowledge_lookup::knowledge_tools(&store) {
        registry.register(Box::new(tool))?;
    }
    for tool in checklists::checklist_tools() {
        registry.register(Box::new(tool))?;
    }
    registry.register(Box::new(ConfirmCodeComplianceTool))?;

    tracing::debug!(tools = registry.len(), "Tool registry built");
    Ok(registry)
}
