// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::env;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use multicast_delegate::config::{load_and_validate_config, RuntimeBuilder};
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG: &str = "configs/contexts.yaml";

/// Observer shape used by the demo
trait PriceListener: Send + Sync {
    fn on_price(&self, symbol: &str, price: f64);
}

/// Prints every quote it receives and counts them
struct Ticker {
    name: String,
    received: AtomicUsize,
}

impl Ticker {
    fn new(name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            received: AtomicUsize::new(0),
        })
    }
}

impl PriceListener for Ticker {
    fn on_price(&self, symbol: &str, price: f64) {
        self.received.fetch_add(1, Ordering::SeqCst);
        let thread = std::thread::current();
        println!(
            "  {:<8} {} @ {:>8.2}  (thread {:?})",
            self.name,
            symbol,
            price,
            thread.name().unwrap_or("unnamed")
        );
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config_path = env::args().nth(1).unwrap_or_else(|| DEFAULT_CONFIG.to_string());
    let config = load_and_validate_config(&config_path)
        .with_context(|| format!("loading contexts from {}", config_path))?;
    let runtime = RuntimeBuilder::from_config(&config).context("building contexts")?;

    println!("📋 Configuration: {}", config_path);
    println!("🧵 Contexts: {:?}", runtime.contexts().labels());
    println!("🏠 Default context: {}", runtime.default_context().label());

    let mut registry = runtime.registry::<dyn PriceListener>();

    // One observer per declared context, plus one on the default.
    let mut tickers = Vec::new();
    for label in runtime.contexts().labels() {
        let ticker = Ticker::new(format!("on-{}", label));
        let listener: Arc<dyn PriceListener> = ticker.clone();
        registry.add_on(Some(&listener), runtime.context(label));
        tickers.push((ticker, listener));
    }
    let fallback = Ticker::new("default");
    let fallback_listener: Arc<dyn PriceListener> = fallback.clone();
    registry.add(Some(&fallback_listener));

    println!("\n📣 Dispatching to {} observers", registry.count());
    let started = Instant::now();
    let report = registry.dispatch(|listener| listener.on_price("RUST", 42.17));
    println!("⏱️  invoke returned after {:?}: {:?}", started.elapsed(), report);
    runtime.flush_all().await;

    // Dropping the last strong handle expires the node without touching the registry.
    drop(fallback_listener);
    drop(fallback);
    println!("\n📣 Dispatching again after dropping the default observer");
    let report = registry.dispatch(|listener| listener.on_price("RUST", 43.05));
    runtime.flush_all().await;
    println!(
        "🔢 {:?}; stored nodes={}, live={}",
        report,
        registry.count(),
        registry.live_count()
    );

    let purged = registry.compact();
    println!("🧹 Compacted {} expired node(s); {} remain", purged, registry.count());

    for (ticker, _) in &tickers {
        println!(
            "  {:<12} received {} quote(s)",
            ticker.name,
            ticker.received.load(Ordering::SeqCst)
        );
    }

    runtime.shutdown();
    Ok(())
}
