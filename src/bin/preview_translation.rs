//! Preview binary - runs one translation fan-out against the live service
//! and shows what would be merged and submitted, without submitting anything.
//!
//! Usage:
//!   cargo run --bin preview -- path/to/entity.json              # translate from the default language
//!   cargo run --bin preview -- path/to/entity.json --source en  # translate from another language
//!
//! Required environment variables:
//! - TRANSLATION_API_URL
//! - TRANSLATION_API_KEY
//!
//! Optional:
//! - CONTENT_LANGUAGES (defaults to "tr,en")
//! - DEFAULT_LANGUAGE (defaults to the first catalog entry)
//! - TRANSLATION_TIMEOUT_SECS (defaults to 30)

use anyhow::{Context, Result};
use content_localizer::catalog::LanguageCode;
use content_localizer::client::TranslationClient;
use content_localizer::config::Config;
use content_localizer::encoder::{encode_entity, EncodedValue};
use content_localizer::model::LocalizedEntity;
use content_localizer::notify::TracingNotifier;
use content_localizer::orchestrator::TranslationOrchestrator;
use std::fs;
use std::sync::Arc;
use tracing::info;

fn load_entity(path: &str) -> Result<LocalizedEntity> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read entity file {}", path))?;
    let entity: LocalizedEntity =
        serde_json::from_str(&contents).with_context(|| format!("Failed to parse {}", path))?;
    Ok(entity)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("content_localizer=info".parse().unwrap()),
        )
        .init();

    // Load environment from .env file
    dotenvy::dotenv().ok();

    // Parse CLI arguments
    let args: Vec<String> = std::env::args().skip(1).collect();
    let entity_path = args
        .iter()
        .find(|arg| !arg.starts_with("--"))
        .cloned()
        .context("Usage: preview <entity.json> [--source <lang>]")?;
    let source_override = args
        .iter()
        .position(|arg| arg == "--source")
        .and_then(|idx| args.get(idx + 1))
        .cloned();

    info!("Loading configuration...");
    let config = Config::from_env()?;
    let catalog = config.catalog();
    let source = LanguageCode::new(
        source_override.unwrap_or_else(|| config.default_language.clone()),
    );

    info!("Loading entity from {}...", entity_path);
    let mut entity = load_entity(&entity_path)?;
    entity.ensure_catalog_languages(&catalog);

    let client = TranslationClient::new(&config)?;
    let orchestrator = TranslationOrchestrator::new(client, catalog, Arc::new(TracingNotifier));

    info!("Translating from '{}'...", source);
    let summary = match orchestrator.translate(&mut entity, &source).await {
        Ok(summary) => summary,
        Err(err) => {
            println!("\nNothing was translated: {}\n", err);
            return Ok(());
        }
    };

    println!();
    println!("╔══════════════════════════════════════════════════════════╗");
    println!("║                 TRANSLATION RUN PREVIEW                   ║");
    println!("╠══════════════════════════════════════════════════════════╣");
    println!(
        "║ Languages updated: {:>2} of {:<2}                               ║",
        summary.languages_updated(),
        summary.languages_attempted()
    );
    println!(
        "║ Fields merged: {:>3}   Field failures: {:>3}                   ║",
        summary.fields_updated(),
        summary.field_failures()
    );
    println!("╚══════════════════════════════════════════════════════════╝");
    println!();

    for outcome in &summary.outcomes {
        let updated: Vec<&str> = outcome.updated_fields.iter().map(|f| f.key()).collect();
        println!("--- {} ---", outcome.language);
        if updated.is_empty() {
            println!("  (no fields updated)");
        } else {
            println!("  updated: {}", updated.join(", "));
        }
        for failed in &outcome.failed_fields {
            println!("  failed:  {} ({})", failed.field, failed.failure);
        }
    }

    if !summary.nested.is_empty() {
        println!();
        println!(
            "Attached records translated: {} (see log for details)",
            summary.nested.len()
        );
    }

    println!();
    println!("--- Submission parts (as the endpoint would receive them) ---");
    for field in encode_entity(&entity) {
        match field.value {
            EncodedValue::Text(value) => println!("  {} = {}", field.key, value),
            EncodedValue::File(file) => println!(
                "  {} = <file {} ({} bytes)>",
                field.key,
                file.file_name,
                file.data.len()
            ),
        }
    }
    println!();

    Ok(())
}
