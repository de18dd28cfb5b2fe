//! Checklist tools backed by embedded Markdown templates.
//!
//! A template's placeholders are filled from the tool's string arguments.
//! Templates without placeholders come back unchanged.

use async_trait::async_trait;
use hipaa_guardian_core::error::ToolError;
use hipaa_guardian_core::schema::{FieldSpec, InputShape};
use hipaa_guardian_core::template::Template;
use hipaa_guardian_core::tool::{Tool, ToolResult};

pub const BREACH_RESPONSE: &str = include_str!("../templates/breach_response.md");
pub const SECURE_CODING: &str = include_str!("../templates/secure_coding.md");
pub const VENDOR_VETTING: &str = include_str!("../templates/vendor_vetting.md");
pub const API_SECURITY: &str = include_str!("../templates/api_security.md");
pub const PRIVACY_POLICY: &str = include_str!("../templates/privacy_policy.md");
pub const GENERAL_DATA_SECURITY: &str = include_str!("../templates/general_data_security.md");

pub struct ChecklistTool {
    name: &'static str,
    description: &'static str,
    template: Template<'static>,
    input_shape: InputShape,
}

impl ChecklistTool {
    pub fn new(name: &'static str, description: &'static str, template: &'static str) -> Self {
        Self {
            name,
            description,
            template: Template::new(template),
            input_shape: InputShape::empty(),
        }
    }

    pub fn with_input_shape(mut self, shape: InputShape) -> Self {
        self.input_shape = shape;
        self
    }
}

#[async_trait]
impl Tool for ChecklistTool {
    fn name(&self) -> &str {
        self.name
    }

    fn description(&self) -> &str {
        self.description
    }

    fn input_shape(&self) -> InputShape {
        self.input_shape.clone()
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let vars: Vec<(&str, &str)> = self
            .input_shape
            .fields()
            .iter()
            .filter_map(|f| arguments.get(f.name).and_then(|v| v.as_str()).map(|v| (f.name, v)))
            .collect();

        let text = self
            .template
            .render(&vars)
            .map_err(|e| ToolError::ExecutionFailed {
                tool_name: self.name.to_string(),
                reason: e.to_string(),
            })?;
        Ok(ToolResult::text(text))
    }
}

/// Build the six checklist tools.
pub fn checklist_tools() -> Vec<ChecklistTool> {
    vec![
        ChecklistTool::new(
            "getBreachResponseChecklist",
            "Provides an actionable checklist for incident response according to the HIPAA Breach Notification Rule, including timelines and notification requirements.",
            BREACH_RESPONSE,
        ),
        ChecklistTool::new(
            "getSecureCodingChecklist",
            "Provides a checklist for developers to ensure HIPAA compliance throughout the Software Development Lifecycle (SDLC).",
            SECURE_CODING,
        ),
        ChecklistTool::new(
            "getVendorVettingChecklist",
            "Provides a checklist for evaluating a third-party vendor (Business Associate) to ensure they meet HIPAA compliance standards before integration.",
            VENDOR_VETTING,
        )
        .with_input_shape(InputShape::new(vec![
            FieldSpec::string("vendorName").describe(
                "The name of the third-party service being considered, e.g., 'Twilio', 'Google Cloud', 'Zendesk'",
            ),
        ])),
        ChecklistTool::new(
            "getApiSecurityChecklist",
            "Provides a general-purpose checklist for securing backend APIs, based on OWASP best practices.",
            API_SECURITY,
        ),
        ChecklistTool::new(
            "getPrivacyPolicyPoints",
            "Provides a checklist of key sections and topics that should be included in a user-facing privacy policy. This is for guidance only and is not legal advice.",
            PRIVACY_POLICY,
        ),
        ChecklistTool::new(
            "getGeneralDataSecurityChecklist",
            "Provides a general checklist for handling sensitive Personally Identifiable Information (PII), even if it is not PHI.",
            GENERAL_DATA_SECURITY,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn find(name: &str) -> ChecklistTool {
        checklist_tools().into_iter().find(|t| t.name == name).unwrap()
    }

    #[test]
    fn only_vendor_template_has_placeholders() {
        for tool in checklist_tools() {
            let placeholders = tool.template.placeholders().unwrap();
            if tool.name == "getVendorVettingChecklist" {
                assert!(!placeholders.is_empty());
                assert!(placeholders.iter().all(|p| *p == "vendorName"));
            } else {
                assert!(placeholders.is_empty(), "{} has placeholders", tool.name);
            }
        }
    }

    #[tokio::test]
    async fn vendor_name_substituted_everywhere() {
        let tool = find("getVendorVettingChecklist");
        let result = tool
            .execute(serde_json::json!({"vendorName": "Twilio"}))
            .await
            .unwrap();
        let text = result.joined_text();
        assert_eq!(text, VENDOR_VETTING.replace("{{vendorName}}", "Twilio"));
        assert!(text.contains("# Business Associate Vetting Checklist for Twilio"));
        assert!(!text.contains("{{"));
    }

    #[tokio::test]
    async fn static_checklist_returned_unchanged() {
        let tool = find("getBreachResponseChecklist");
        let result = tool.execute(serde_json::json!({})).await.unwrap();
        assert_eq!(result, ToolResult::text(BREACH_RESPONSE));
        assert!(BREACH_RESPONSE.contains("No Later Than 60 Days"));
    }

    #[tokio::test]
    async fn unfilled_placeholder_fails() {
        // Bypasses registry validation, which would reject this call first.
        let tool = find("getVendorVettingChecklist");
        let err = tool.execute(serde_json::json!({})).await.unwrap_err();
        assert!(matches!(err, ToolError::ExecutionFailed { .. }));
    }

    #[test]
    fn vendor_schema_requires_vendor_name() {
        let def = find("getVendorVettingChecklist").to_definition();
        assert_eq!(def.input_schema["required"], serde_json::json!(["vendorName"]));
        assert!(
            def.input_schema["properties"]["vendorName"]["description"]
                .as_str()
                .unwrap()
                .contains("Twilio")
        );
    }
}
