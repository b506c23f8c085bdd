use anyhow::{anyhow, Result};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use log::{debug, error, info, warn};
use notify::event::CreateKind;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::PathBuf;
use tokio::signal;
use tokio::sync::mpsc;

use crate::config::Config;
use crate::key::parse_key;
use crate::s3::Uploader;

pub struct Monitor {
    config: Config,
    uploader: Uploader,
    matcher: GlobSet,
}

impl Monitor {
    pub fn new(config: Config, uploader: Uploader) -> Result<Self> {
        let matcher = build_matcher(&config.patterns)?;
        Ok(Self {
            config,
            uploader,
            matcher,
        })
    }

    pub async fn run(&self) -> Result<()> {
        let (tx, mut rx) = mpsc::channel(100);

        let mut watcher = RecommendedWatcher::new(
            move |res: Result<Event, notify::Error>| match res {
                Ok(event) => {
                    if let Err(e) = tx.try_send(event) {
                        error!("Failed to queue file event: {}", e);
                    }
                }
                Err(e) => error!("File watcher error: {}", e),
            },
            notify::Config::default(),
        )
        .map_err(|e| anyhow!("Failed to create file watcher: {}", e))?;

        watcher
            .watch(&self.config.watch_dir, RecursiveMode::NonRecursive)
            .map_err(|e| {
                anyhow!(
                    "Failed to watch {}: {}",
                    self.config.watch_dir.display(),
                    e
                )
            })?;

        info!(
            "Monitoring {} for new files matching {}",
            self.config.watch_dir.display(),
            self.config.patterns.join(",")
        );

        let shutdown = shutdown_signal();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                Some(event) = rx.recv() => {
                    if let Err(e) = self.handle_event(event).await {
                        error!("Failed to handle file event: {}", e);
                    }
                }
                _ = &mut shutdown => {
                    info!("Received shutdown signal");
                    break;
                }
            }
        }

        if let Err(e) = watcher.unwatch(&self.config.watch_dir) {
            debug!("Failed to unwatch {}: {}", self.config.watch_dir.display(), e);
        }

        info!("Monitor stopped");
        Ok(())
    }

    async fn handle_event(&self, event: Event) -> Result<()> {
        for path in qualifying_paths(&event, &self.matcher) {
            // file_name is present for every path the filter lets through
            let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();

            match parse_key(file_name) {
                Some(key) => {
                    info!(
                        "Storing file at \"{}\" to bucket \"{}\" as \"{}\"",
                        path.display(),
                        self.uploader.bucket(),
                        key
                    );
                    self.uploader.upload(&path, &key).await?;
                }
                None => {
                    warn!(
                        "File name \"{}\" does not meet the format of \
                         <camera_name>_<year>_<month>_<day>_<hour>_<minute>_<second>.<ext>, skipping",
                        file_name
                    );
                }
            }
        }

        Ok(())
    }
}

/// Compiles the configured glob patterns into one case-insensitive
/// matcher applied to file base names.
pub fn build_matcher(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();

    for pattern in patterns {
        let glob = GlobBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| anyhow!("Invalid glob pattern \"{}\": {}", pattern, e))?;
        builder.add(glob);
    }

    builder
        .build()
        .map_err(|e| anyhow!("Failed to compile glob patterns: {}", e))
}

/// Paths from a filesystem event that qualify for upload: the event
/// must be a creation, the path must be a file, and its base name must
/// match one of the configured patterns.
fn qualifying_paths(event: &Event, matcher: &GlobSet) -> Vec<PathBuf> {
    match event.kind {
        EventKind::Create(CreateKind::Folder) => return Vec::new(),
        EventKind::Create(_) => {}
        _ => return Vec::new(),
    }

    event
        .paths
        .iter()
        .filter(|path| {
            if path.is_dir() {
                debug!("Ignoring directory creation: {}", path.display());
                return false;
            }
            match path.file_name().and_then(|n| n.to_str()) {
                Some(name) if matcher.is_match(name) => true,
                Some(name) => {
                    debug!("Ignoring non-matching file: {}", name);
                    false
                }
                None => false,
            }
        })
        .cloned()
        .collect()
}

/// Resolves when the process is asked to stop (Ctrl+C, or SIGTERM on
/// unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
