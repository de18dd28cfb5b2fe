//! # HIPAA Guardian Core
//!
//! Domain types, traits, and error definitions for the HIPAA Compliance
//! Guardian tool server. This crate has **no transport dependencies**: it
//! defines the knowledge store, the tool contract and the registry that the
//! other crates build on.
//!
//! ## Design Philosophy
//!
//! - The knowledge base is an explicit immutable value, shared by `Arc`
//! - Every tool declares its input shape; the registry validates it once
//! - Synthetic content lives in templates filled by one utility

pub mod error;
pub mod knowledge;
pub mod schema;
pub mod template;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use error::{Error, FieldViolation, KnowledgeError, Result, TemplateError, ToolError};
pub use knowledge::{KnowledgeStore, REQUIRED_KEYS};
pub use schema::{FieldKind, FieldSpec, InputShape};
pub use template::Template;
pub use tool::{ContentBlock, Tool, ToolCall, ToolDefinition, ToolRegistry, ToolResult};
