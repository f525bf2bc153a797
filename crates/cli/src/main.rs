//! openhotas - HOTAS input remapping daemon.
//!
//! Assembles the acquisition pipeline and runs it until interrupted. The OS
//! device source and output backends are injected at this boundary; this
//! binary wires the in-memory mock backends so the pipeline can be exercised
//! and observed on any machine (the real HID/ViGEm/SendInput backends live in
//! their own platform crates and plug into the same traits).

#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![deny(clippy::unwrap_used)]

use anyhow::{Context, Result};
use clap::Parser;
use openhotas_engine::prelude::*;
use openhotas_hid_common::mock::MockDeviceSource;
use openhotas_hid_common::DeviceSource;
use openhotas_mapping::{load_profile, MappingTable};
use openhotas_pad::{MockSyntheticInput, MockVirtualPad, SyntheticInput, VirtualPad};
use openhotas_signal_map::{DeviceKind, SignalMap};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "openhotas")]
#[command(about = "HOTAS input remapping daemon - virtual X360 pad, keyboard and mouse output")]
#[command(version)]
struct Cli {
    /// Runtime configuration file (JSON).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Mapping profile file (JSON).
    #[arg(long, default_value = "config/mappings.json")]
    mappings: PathBuf,

    /// Print loop statistics every N seconds (0 disables).
    #[arg(long, default_value_t = 5)]
    stats_interval: u64,

    /// Verbose logging.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("openhotas={log_level}").into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let map = SignalMap::builtin_default();

    let config: RuntimeConfig = match &cli.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => RuntimeConfig::default(),
    };

    let table = Arc::new(MappingTable::new());
    match load_profile(&cli.mappings, &map) {
        Ok(outcome) => {
            tracing::info!(
                mappings = outcome.entries.len(),
                unmigrated = outcome.unmigrated.len(),
                "loaded mapping profile"
            );
            table.replace_all(outcome.entries);
        }
        Err(err) => {
            tracing::warn!(%err, path = %cli.mappings.display(), "starting with an empty mapping table");
        }
    }

    let source = Arc::new(MockDeviceSource::new());
    source.add_device("mock/stick", DeviceKind::Stick);
    source.add_device("mock/throttle", DeviceKind::Throttle);
    let pad = Arc::new(MockVirtualPad::new());
    let input = Arc::new(MockSyntheticInput::default());

    let pipeline = Pipeline::new(
        map,
        Arc::clone(&source) as Arc<dyn DeviceSource>,
        pad as Arc<dyn VirtualPad>,
        input as Arc<dyn SyntheticInput>,
        Arc::clone(&table),
    );

    let mut handle = AcquisitionCore::spawn(pipeline).context("spawning acquisition loop")?;
    config.apply(handle.controls(), handle.store());
    tracing::info!("acquisition running at {TARGET_HZ} Hz");

    let stop = Arc::new(AtomicBool::new(false));
    {
        let stop = Arc::clone(&stop);
        ctrlc::set_handler(move || stop.store(true, Ordering::Release))
            .context("installing signal handler")?;
    }

    let mut since_stats = Duration::ZERO;
    let poll = Duration::from_millis(200);
    while !stop.load(Ordering::Acquire) {
        std::thread::sleep(poll);
        since_stats += poll;

        for fault in handle.faults().drain() {
            tracing::debug!(code = fault.code(), ?fault, "tick fault");
        }

        if cli.stats_interval > 0 && since_stats >= Duration::from_secs(cli.stats_interval) {
            since_stats = Duration::ZERO;
            let stats = handle.stats().read();
            tracing::info!(
                effective_hz = stats.effective_hz,
                avg_loop_us = stats.avg_loop_us,
                "loop stats"
            );
        }
    }

    tracing::info!("shutting down");
    handle.stop();
    Ok(())
}
