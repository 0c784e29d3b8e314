// LabWired - Firmware Simulation Platform
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use anyhow::Context;
use bringup_selftest::State;
use bringup_sim::harness::DEFAULT_TEST_NAME;
use bringup_sim::{RunOptions, RunReport, SocConfig};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info};

const EXIT_PASS: u8 = 0;
const EXIT_SELFTEST_FAIL: u8 = 1;
const EXIT_CONFIG_ERROR: u8 = 2;
const EXIT_RUNTIME_ERROR: u8 = 3;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Runs the SoC bring-up self-test against a simulated board",
    long_about = None
)]
struct Cli {
    /// Path to the SoC description (YAML). Defaults to the reference board.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Blink cycles to observe after the checks
    #[arg(long, default_value = "4")]
    cycles: u32,

    /// Also drive 0x80 into the GPIO register, a bit with no pin behind it on the reference board
    #[arg(long)]
    gpio_fault_probe: bool,

    /// Report through the conformance status protocol ("name..OK" / "name..ERROR")
    #[arg(long)]
    status_uart: bool,

    /// Test name announced on the status UART
    #[arg(long, default_value = DEFAULT_TEST_NAME)]
    name: String,

    /// Disable status UART stdout echo (still captured in the report)
    #[arg(long)]
    no_uart_stdout: bool,

    /// Log every register access
    #[arg(short, long)]
    trace: bool,

    /// Write the run report (JSON) to this file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the run report as a single JSON line
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries only the status UART echo and the JSON report.
    if cli.trace {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_writer(std::io::stderr)
            .init();
    }

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("{:#}", e);
            return ExitCode::from(EXIT_CONFIG_ERROR);
        }
    };

    let options = RunOptions {
        cycles: cli.cycles,
        gpio_fault_probe: cli.gpio_fault_probe,
        status_uart: cli.status_uart,
        echo_uart: !cli.no_uart_stdout,
        test_name: cli.name.clone(),
    };

    let report = match bringup_sim::run(&config, &options) {
        Ok(report) => report,
        Err(e) => {
            error!("Run failed: {:#}", e);
            return ExitCode::from(EXIT_RUNTIME_ERROR);
        }
    };

    if let Err(e) = write_outputs(&cli, &report) {
        error!("{:#}", e);
        return ExitCode::from(EXIT_RUNTIME_ERROR);
    }

    match report.state {
        State::PassSignal => {
            info!(
                "PASS: '{}' blinking {}/{} ticks",
                report.soc, report.blink.high_ticks, report.blink.low_ticks
            );
            ExitCode::from(EXIT_PASS)
        }
        State::FailSignal => {
            match &report.message {
                Some(message) => error!("FAIL: {}", message),
                None => error!("FAIL: '{}'", report.soc),
            }
            ExitCode::from(EXIT_SELFTEST_FAIL)
        }
        State::Running => {
            error!("Self-test on '{}' never reached a verdict", report.soc);
            ExitCode::from(EXIT_RUNTIME_ERROR)
        }
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<SocConfig> {
    match path {
        Some(path) => {
            info!("Loading SoC config: {:?}", path);
            SocConfig::from_file(path)
        }
        None => {
            info!("No config given, using the reference board");
            Ok(SocConfig::default())
        }
    }
}

fn write_outputs(cli: &Cli, report: &RunReport) -> anyhow::Result<()> {
    if let Some(path) = &cli.output {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create output directory {:?}", parent))?;
        }
        let f = std::fs::File::create(path)
            .with_context(|| format!("Failed to create report {:?}", path))?;
        serde_json::to_writer_pretty(f, report)
            .with_context(|| format!("Failed to write report {:?}", path))?;
        info!("Run report written to {:?}", path);
    }

    if cli.json {
        println!("{}", serde_json::to_string(report)?);
    }
    Ok(())
}
