//! rooncord - Roon to Discord rich-presence bridge.
//!
//! Watches Roon zone events and mirrors the currently playing track into a
//! Discord activity, resolving album art into a publicly linkable image via
//! a persistent cache, MusicBrainz/Cover Art Archive, or an upload backend.

pub mod art;
pub mod bridge;
pub mod cli;
pub mod config;
pub mod feed;
pub mod model;
pub mod presence;

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use art::{ArtCache, ArtOrchestrator, MusicBrainzResolver, RoonImageClient};
use art::hosting::{ImgurHost, SelfHost};
use art::traits::{ArtHost, ReleaseArtLookup};
use config::ArtUploadMethod;
use presence::{DiscordPresence, PresenceClient, PresenceUpdater};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(EnvFilter::from_default_env().add_directive("rooncord=info".parse().unwrap()))
        .init();

    let mut config = config::load_or_bootstrap(args.config.as_deref()).await;
    config.validate();

    // Art pipeline
    let cache_path = config::cache_path()
        .unwrap_or_else(|| std::path::PathBuf::from("cached_art.json"));
    let cache = ArtCache::load(cache_path);

    let source = Arc::new(RoonImageClient::new(&config.roon.image_url));
    let host: Option<Arc<dyn ArtHost>> = match config.art_upload_method {
        ArtUploadMethod::Imgur => Some(Arc::new(ImgurHost::new(&config.imgur))),
        ArtUploadMethod::SelfHost => Some(Arc::new(SelfHost::new(&config.selfhost))),
        _ => None,
    };
    let lookup: Arc<dyn ReleaseArtLookup> = Arc::new(MusicBrainzResolver::new());

    let orchestrator = Arc::new(ArtOrchestrator::new(
        config.art_upload_method,
        cache,
        source,
        host,
        lookup,
        config.roon.width,
        config.roon.height,
    ));

    // Discord connection; connect failures are absorbed and retried on the
    // next presence push.
    let client: Box<dyn PresenceClient> =
        Box::new(DiscordPresence::new(&config.discord.application_id)?);
    let mut presence = PresenceUpdater::new(client);
    presence.connect();

    tracing::info!(
        "Art method: {:?}, {} cached links",
        config.art_upload_method,
        orchestrator.cached_links().await
    );

    // Zone event feed
    let feed_command = args
        .feed_command
        .unwrap_or_else(|| config.roon.feed_command.clone());
    let events = feed::spawn(&feed_command)?;

    let mut session = bridge::Bridge::new(orchestrator, presence);

    tokio::select! {
        _ = session.run(events) => {}
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Interrupted, shutting down");
        }
    }

    Ok(())
}
