//! # openmote-demo
//!
//! Composition root that wires the CoAP transport into the façade and
//! exercises every resource of one mote.
//!
//! ## Responsibilities
//! - Load configuration (`openmote.toml`, env vars)
//! - Install the tracing subscriber
//! - Ping the device, toggle the configured LEDs, print sensor readings
//! - Echo button presses until a line is read from standard input
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer. No domain logic belongs here.

mod config;

use std::error::Error;
use std::process::ExitCode;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use openmote_adapter_coap::CoapTransport;
use openmote_app::ports::{ButtonObserver, TransportError};
use openmote_app::services::openmote::OpenMote;

use crate::config::Config;

/// Prints button transitions to standard output.
struct ConsoleObserver;

impl ButtonObserver for ConsoleObserver {
    fn on_pressed(&self) {
        println!("Button pressed");
    }

    fn on_released(&self) {
        println!("Button released");
    }

    fn on_error(&self, error: &TransportError) {
        eprintln!("Button observation failed: {error}");
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let config = match Config::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}", report(&err));
            return ExitCode::FAILURE;
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();

    let observe_errors = config.coap.observe_errors;
    let ping_timeout = config.coap.ping_timeout();
    let transport = CoapTransport::new(config.coap);

    let mote = match OpenMote::with_port(&config.device.address, config.device.port, transport) {
        Ok(mote) => mote.with_observe_errors(observe_errors),
        Err(err) => {
            eprintln!("{}", report(&err));
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(endpoint = %mote.endpoint(), "talking to mote");

    if mote.ping(ping_timeout).await {
        tracing::info!("mote is alive");
    } else {
        tracing::warn!(timeout = ?ping_timeout, "mote did not answer ping");
    }

    for led in &config.demo.leds {
        mote.toggle_led(*led).await;
    }

    match mote.sense_climate().await {
        Ok(Some(climate)) => {
            println!("Temperature: {:.2} °C", climate.temperature);
            println!("Humidity: {:.2} %", climate.humidity);
        }
        Ok(None) => println!("Temperature/humidity: no response"),
        Err(err) => eprintln!("{}", report(&err)),
    }

    match mote.sense_light().await {
        Ok(Some(lux)) => println!("Light: {lux:.2} lx"),
        Ok(None) => println!("Light: no response"),
        Err(err) => eprintln!("{}", report(&err)),
    }

    let observer = Arc::new(ConsoleObserver);
    mote.register_for_button_presses(&observer).await;

    println!("Press Enter to exit...");
    let mut line = String::new();
    if let Err(err) = BufReader::new(tokio::io::stdin()).read_line(&mut line).await {
        eprintln!("{}", report(&err));
        return ExitCode::FAILURE;
    }

    drop(observer);
    ExitCode::SUCCESS
}

/// Render an error with its whole `source()` chain, one cause per line.
fn report(err: &dyn Error) -> String {
    let mut out = format!("error: {err}");
    let mut source = err.source();
    while let Some(cause) = source {
        out.push_str(&format!("\n  caused by: {cause}"));
        source = cause.source();
    }
    out
}
