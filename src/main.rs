//! Jupiter Docs batch entry point.
//!
//! Loads configuration from the environment, reads the upstream export,
//! runs every processing phase and writes the computed documents.

use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use jupiter_docs::adapters::{FileDocumentSource, FileScheduleWriter};
use jupiter_docs::application::{ProcessDocumentsCommand, ProcessDocumentsHandler};
use jupiter_docs::config::{AppConfig, LoggingConfig};

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging.default_directive()));
    let registry = tracing_subscriber::registry().with(filter);

    if logging.json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config.logging);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    info!(
        data_dir = %config.source.data_dir.display(),
        output_dir = %config.output.dir.display(),
        format = ?config.output.format,
        "Starting jupiter-docs"
    );

    let handler = ProcessDocumentsHandler::new(
        Arc::new(FileDocumentSource::new(&config.source.data_dir)),
        Arc::new(FileScheduleWriter::new(&config.output.dir, config.output.format)),
        config.pipeline.qc_settings(),
    );

    let result = handler.handle(ProcessDocumentsCommand::default()).await?;
    info!(
        documents = result.summary.documents,
        amendments = result.summary.amendments,
        deeds = result.summary.deeds,
        payments = result.summary.payments,
        total_payment_amount = %result.summary.total_payment_amount,
        documents_with_flags = result.summary.documents_with_flags,
        "Done"
    );

    Ok(())
}
