//! Generate static files

use anyhow::Result;
use notify_debouncer_mini::new_debouncer;
use notify_debouncer_mini::notify::{RecursiveMode, Watcher};
use std::sync::mpsc::channel;
use std::time::{Duration, Instant};

use crate::generator::Generator;
use crate::Blog;

/// Generate the static site
pub fn run(blog: &Blog) -> Result<()> {
    let start = Instant::now();

    let stats = Generator::new(blog)?.generate()?;

    tracing::info!(
        "Generated {} post pages and {} tag pages ({} files) in {:.2}s",
        stats.posts,
        stats.tags,
        stats.files,
        start.elapsed().as_secs_f64()
    );

    Ok(())
}

/// Watch the content directory and config file, regenerating on change.
/// Blocks until the watcher channel closes.
pub fn watch(blog: &Blog) -> Result<()> {
    let (tx, rx) = channel();

    // Debounce to avoid multiple rapid rebuilds
    let mut debouncer = new_debouncer(Duration::from_millis(500), tx)?;

    if blog.content_dir.exists() {
        debouncer
            .watcher()
            .watch(&blog.content_dir, RecursiveMode::NonRecursive)?;
        tracing::debug!("Watching: {:?}", blog.content_dir);
    }

    let config_path = blog.base_dir.join(Blog::CONFIG_FILE);
    if config_path.exists() {
        debouncer
            .watcher()
            .watch(&config_path, RecursiveMode::NonRecursive)?;
        tracing::debug!("Watching: {:?}", config_path);
    }

    tracing::info!("Watching for changes. Press Ctrl+C to stop.");

    loop {
        match rx.recv() {
            Ok(Ok(events)) => {
                for event in &events {
                    tracing::info!("File changed: {}", event.path.display());
                }

                // Config changes need a fresh Blog
                let result = Blog::new(&blog.base_dir).and_then(|blog| run(&blog));
                if let Err(e) = result {
                    tracing::error!("Generation failed: {:#}", e);
                }
            }
            Ok(Err(e)) => {
                tracing::error!("Watch error: {:?}", e);
            }
            Err(_) => break,
        }
    }

    Ok(())
}
