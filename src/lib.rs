// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod exec;
pub mod gpio;
pub mod logging;
pub mod probe;
pub mod watch;

use std::time::Duration;

use anyhow::{ensure, Result};
use tracing::info;

use crate::cli::CliArgs;
use crate::config::loader::load_and_validate;
use crate::config::model::WatchConfig;
use crate::probe::ProcTableProbe;
use crate::watch::{ButtonWatcher, ProcessWatcher};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - GPIO adapter detection
/// - the background command executor
/// - one poll loop per watcher kind
/// - Ctrl-C handling and pin release on the way out
pub async fn run(args: CliArgs) -> Result<()> {
    ensure!(
        args.period > 0.0,
        "--period must be positive (got {})",
        args.period
    );
    ensure!(
        args.debounced > 0.0,
        "--debounced must be positive (got {})",
        args.debounced
    );

    let cfg = load_and_validate(&args.config)?;

    if args.dry_run {
        print_dry_run(&cfg);
        return Ok(());
    }

    let pins = gpio::detect();
    let exec_tx = exec::spawn_executor();
    let (stop, token) = watch::stop_channel();

    let mut handles = Vec::new();

    if !cfg.processes.is_empty() {
        let watcher = ProcessWatcher::new(
            cfg.processes.clone(),
            Box::new(ProcTableProbe::new()),
            pins.clone(),
            exec_tx.clone(),
            Duration::from_secs_f64(args.period),
        );
        handles.push(watch::spawn_watch(watcher, token.clone()));
    }

    if !cfg.buttons.is_empty() {
        let watcher = ButtonWatcher::new(
            cfg.buttons.clone(),
            pins.clone(),
            exec_tx.clone(),
            Duration::from_secs_f64(args.debounced),
        );
        handles.push(watch::spawn_watch(watcher, token.clone()));
    }

    // The only normal exit path is external interruption.
    tokio::signal::ctrl_c().await?;
    info!("interrupt received, stopping watchers");

    stop.stop();
    for handle in handles {
        let _ = handle.await;
    }
    pins.release();

    info!("pinwatch exiting");
    Ok(())
}

/// Dry-run output: print parsed targets without touching pins or processes.
fn print_dry_run(cfg: &WatchConfig) {
    println!("pinwatch dry-run");
    println!();

    println!("process targets ({}):", cfg.processes.len());
    for target in &cfg.processes {
        println!("  - command: {:?}", target.command.as_deref().unwrap_or(""));
        if let Some(port) = target.port {
            println!("      port: {port} (active level {})", target.active);
        }
        if let Some(ref cmd) = target.on_found {
            println!("      onFound: {cmd}");
        }
        if let Some(ref cmd) = target.on_lost {
            println!("      onLost: {cmd}");
        }
        if target.timeout > 0.0 {
            println!("      timeout: {}s", target.timeout);
        }
    }
    println!();

    println!("button targets ({}):", cfg.buttons.len());
    for target in &cfg.buttons {
        println!(
            "  - port: {:?} (active level {}, pull-up {})",
            target.port, target.active, target.pull_up
        );
        if !target.execute.is_empty() {
            println!("      execute: {}", target.execute);
        }
        if target.timeout > 0.0 {
            println!("      timeout: {}s", target.timeout);
        }
    }
}
