mod classify;
mod config;
mod error;
mod fetch;
mod ingest;
mod llm;
mod model;
mod pipeline;
mod rules;
mod server;
mod snippet;

use std::sync::Arc;

use rmcp::{ServiceExt, transport::stdio};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::Config;
use fetch::GuidelineFetcher;
use llm::TriageAssistant;
use pipeline::TriagePipeline;
use server::ReferralTriageServer;
use triage_common::openai::{OpenAiClient, OpenAiClientConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing to stderr (stdout is reserved for MCP JSON-RPC)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    info!("starting referral-triage MCP server");

    let config = Config::from_env()?;
    info!(
        sources = config.guideline_sources.len(),
        max_sites = config.max_sites,
        per_site_snippets = config.per_site_snippets,
        model = %config.model,
        "configuration loaded"
    );

    let openai_config = OpenAiClientConfig::from_env();
    info!(
        base_url = %openai_config.base_url,
        authenticated = openai_config.api_key.is_some(),
        "llm client configured"
    );
    let openai = OpenAiClient::new(openai_config)?;
    let assistant = TriageAssistant::new(openai, config.model.clone());

    let fetcher = GuidelineFetcher::new(config.fetch_timeout)?;
    let rules = rules::default_rules();
    info!(rules = rules.len(), "triage rule table loaded");

    let pipeline = Arc::new(TriagePipeline::new(config, assistant, fetcher, rules));
    let server = ReferralTriageServer::new(pipeline);

    if let Ok(addr) = std::env::var("MCP_TCP_LISTEN_ADDR") {
        let listener = TcpListener::bind(&addr).await?;
        info!(listen_addr = %addr, "MCP server ready, serving on TCP");
        loop {
            let (stream, peer) = listener.accept().await?;
            let server = server.clone();
            tokio::spawn(async move {
                tracing::info!(peer = %peer, "MCP client connected");
                let service = server.serve(stream).await.inspect_err(|e| {
                    tracing::error!(error = %e, "MCP server error");
                })?;
                service.waiting().await?;
                tracing::info!(peer = %peer, "MCP client disconnected");
                Ok::<(), anyhow::Error>(())
            });
        }
    } else {
        info!("MCP server ready, serving on stdio");
        let service = server.serve(stdio()).await.inspect_err(|e| {
            tracing::error!(error = %e, "MCP server error");
        })?;
        service.waiting().await?;
        info!("MCP server shut down");
    }
    Ok(())
}
