//! `hipaa-guardian doctor`: diagnose config and knowledge base.

use std::path::Path;
use std::sync::Arc;

use hipaa_guardian_config::{AppConfig, ConfigError};
use hipaa_guardian_core::knowledge::{KnowledgeStore, REQUIRED_KEYS};

pub fn run(
    config_path: &Path,
    loaded: Result<AppConfig, ConfigError>,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 HIPAA Guardian Doctor: System Diagnostics");
    println!("============================================\n");

    let mut issues = 0;

    if config_path.exists() {
        println!("  ✅ Config file found at {}", config_path.display());
    } else {
        println!("  ⚠️  No config file at {}, using defaults", config_path.display());
    }

    let config = match loaded {
        Ok(config) => {
            println!("  ✅ Config valid");
            config
        }
        Err(e) => {
            println!("  ❌ Config invalid: {e}");
            println!("\n  ⚠️  Fix the config before running further checks.");
            return Err(e.into());
        }
    };

    let kb_path = &config.knowledge.path;
    match KnowledgeStore::load(kb_path) {
        Ok(store) => {
            println!(
                "  ✅ Knowledge base loaded from {} ({} sections)",
                kb_path.display(),
                store.len()
            );

            let missing = store.missing_keys(&REQUIRED_KEYS);
            if missing.is_empty() {
                println!("  ✅ All {} required sections present", REQUIRED_KEYS.len());
            } else {
                for key in &missing {
                    println!("  ❌ Missing section: {key}");
                }
                issues += missing.len();
            }

            match hipaa_guardian_tools::default_registry(Arc::new(store)) {
                Ok(registry) => println!("  ✅ {} tools registered", registry.len()),
                Err(e) => {
                    println!("  ❌ Tool registry failed: {e}");
                    issues += 1;
                }
            }
        }
        Err(e) => {
            println!("  ❌ {e}");
            println!("     Set knowledge.path, HIPAA_GUARDIAN_KNOWLEDGE_BASE or --knowledge-base");
            issues += 1;
        }
    }

    println!();
    if issues > 0 {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
        return Err(format!("doctor found {issues} issue(s)").into());
    }

    println!("  🎉 All checks passed!");
    Ok(())
}
