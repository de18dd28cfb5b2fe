//! Knowledge lookup tools that return a section of the knowledge base.
//!
//! Each tool is bound to one fixed key at construction. The key set is known
//! up front, so a missing section is an internal failure, not a user error.

use std::sync::Arc;

use async_trait::async_trait;
use hipaa_guardian_core::error::ToolError;
use hipaa_guardian_core::knowledge::KnowledgeStore;
use hipaa_guardian_core::schema::{FieldSpec, InputShape};
use hipaa_guardian_core::tool::{Tool, ToolResult};

/// Terms accepted by `getCoreDefinitions`.
pub const DEFINITION_TERMS: [&str; 4] = [
    "PHI",
    "Business Associate",
    "De-Identification",
    "Patient Rights",
];

pub struct KnowledgeLookupTool {
    name: &'static str,
    description: &'static str,
    key: &'static str,
    preamble: Option<&'static str>,
    input_shape: InputShape,
    store: Arc<KnowledgeStore>,
}

impl KnowledgeLookupTool {
    pub fn new(
        name: &'static str,
        description: &'static str,
        key: &'static str,
        store: Arc<KnowledgeStore>,
    ) -> Self {
        Self {
            name,
            description,
            key,
            preamble: None,
            input_shape: InputShape::empty(),
            store,
        }
    }

    /// Text placed before the stored section.
    pub fn with_preamble(mut self, preamble: &'static str) -> Self {
        self.preamble = Some(preamble);
        self
    }

    pub fn with_input_shape(mut self, shape: InputShape) -> Self {
        self.input_shape = shape;
        self
    }

    pub fn key(&self) -> &'static str {
        self.key
    }
}

#[async_trait]
impl Tool for KnowledgeLookupTool {
    fn name(&self) -> &str {
        self.name
    }

    fn description(&self) -> &str {
        self.description
    }

    fn input_shape(&self) -> InputShape {
        self.input_shape.clone()
    }

    async fn execute(&self, _arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let section = self
            .store
            .get(self.key)
            .map_err(|e| ToolError::ExecutionFailed {
                tool_name: self.name.to_string(),
                reason: e.to_string(),
            })?;

        let text = match self.preamble {
            Some(preamble) => format!("{preamble}{section}"),
            None => section.to_string(),
        };
        Ok(ToolResult::text(text))
    }
}

/// Build the eight knowledge-backed tools over a shared store.
pub fn knowledge_tools(store: &Arc<KnowledgeStore>) -> Vec<KnowledgeLookupTool> {
    vec![
        KnowledgeLookupTool::new(
            "evaluateComplianceNeed",
            "Provides a decision flowchart and examples to determine if an application needs to be HIPAA compliant. Use this before starting any development.",
            "do_i_need_to_be_hipaa_compliant?",
            store.clone(),
        ),
        KnowledgeLookupTool::new(
            "getComplianceRoadmap",
            "Returns a step-by-step roadmap for an organization to become HIPAA compliant, including administrative and policy requirements.",
            "becoming_hipaa_compliant",
            store.clone(),
        ),
        // `term` is validated but the whole definitions section is returned,
        // since the definitions only make sense read together.
        KnowledgeLookupTool::new(
            "getCoreDefinitions",
            "Provides foundational definitions for terms like PHI (Protected Health Information), Business Associate, and De-Identification.",
            "what_is_hipaa?",
            store.clone(),
        )
        .with_preamble("Here are the core definitions from the guide:\n\n")
        .with_input_shape(InputShape::new(vec![FieldSpec::enumeration(
            "term",
            &DEFINITION_TERMS,
        )])),
        KnowledgeLookupTool::new(
            "getSecurityRuleSafeguards",
            "Provides a developer-focused guide to the Administrative, Physical, and Technical Safeguards of the HIPAA Security Rule.",
            "hipaa_security_rule",
            store.clone(),
        ),
        KnowledgeLookupTool::new(
            "getMobileSecurityControls",
            "Returns a checklist of specific security controls for mobile and wearable apps, including data storage, transmission, and notifications.",
            "mobile_and_wearable_applications",
            store.clone(),
        ),
        KnowledgeLookupTool::new(
            "getPenaltyInformation",
            "Returns the up-to-date, four-tiered structure of civil monetary penalties (fines) for HIPAA violations.",
            "hipaa_fines",
            store.clone(),
        ),
        KnowledgeLookupTool::new(
            "getValidationAndAuditInfo",
            "Explains why there is no official \"HIPAA Certification\" and details how compliance is demonstrated through third-party audits and attestations like HITRUST and SOC 2.",
            "who_validates_hipaa_compliance",
            store.clone(),
        ),
        KnowledgeLookupTool::new(
            "getDeveloperConsiderations",
            "Provides guidance on key developer decisions, including the cloud Shared Responsibility Model and a framework for \"Build vs. Outsource\" choices.",
            "developer_considerations",
            store.clone(),
        ),
    ]
}
