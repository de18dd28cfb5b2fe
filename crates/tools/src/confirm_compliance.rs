//! `confirmCodeCompliance`: a forcing function for the calling agent.
//!
//! The server verifies nothing. It requires the caller to supply the code, the
//! checklist and a point-by-point justification, then echoes the
//! justification under a confirmation header.

use async_trait::async_trait;
use hipaa_guardian_core::error::ToolError;
use hipaa_guardian_core::schema::{FieldSpec, InputShape};
use hipaa_guardian_core::template;
use hipaa_guardian_core::tool::{Tool, ToolResult};

const CONFIRMATION: &str = "Compliance Justification Confirmed:\n\n{{justification}}";

pub struct ConfirmCodeComplianceTool;

#[async_trait]
impl Tool for ConfirmCodeComplianceTool {
    fn name(&self) -> &str {
        "confirmCodeCompliance"
    }

    fn description(&self) -> &str {
        "Takes a snippet of code and a relevant compliance checklist (e.g., from getSecureCodingChecklist) and requires the agent to provide a point-by-point justification of how the code meets each requirement. This must be the last step before outputting code."
    }

    fn input_shape(&self) -> InputShape {
        InputShape::new(vec![
            FieldSpec::string("codeSnippet")
                .describe("The proposed code the agent intends to write."),
            FieldSpec::string("checklist")
                .describe("The full text of the checklist the code must be validated against."),
            FieldSpec::string("justification").describe(
                "A point-by-point explanation of how the codeSnippet satisfies each item in the checklist.",
            ),
        ])
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let justification = arguments["justification"].as_str().ok_or_else(|| {
            ToolError::ExecutionFailed {
                tool_name: self.name().to_string(),
                reason: "justification missing after validation".into(),
            }
        })?;

        let text = template::fill(CONFIRMATION, &[("justification", justification)]).map_err(
            |e| ToolError::ExecutionFailed {
                tool_name: self.name().to_string(),
                reason: e.to_string(),
            },
        )?;
        Ok(ToolResult::text(text))
    }
}
