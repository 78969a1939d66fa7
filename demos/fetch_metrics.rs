// SPDX-License-Identifier: MPL-2.0

//! Water softener metrics example.
//!
//! Logs in to the JU-Control cloud and prints the decoded consumption
//! metrics together with the metadata of every registered appliance.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example fetch_metrics -- <username> <password> [endpoint]
//! ```
//!
//! # Example
//!
//! ```bash
//! cargo run --example fetch_metrics -- user@example.com secret
//! cargo run --example fetch_metrics -- user@example.com secret https://www.myjudo.eu/interface
//! ```

use std::env;
use jucontrol_lib::{ClientConfig, JuControlClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 3 {
        eprintln!("Usage: {} <username> <password> [endpoint]", args[0]);
        eprintln!();
        eprintln!("Examples:");
        eprintln!("  cargo run --example fetch_metrics -- user@example.com secret");
        std::process::exit(1);
    }

    let username = &args[1];
    let password = &args[2];

    let mut config = ClientConfig::new();
    if let Some(endpoint) = args.get(3) {
        config = config.with_endpoint(endpoint.as_str());
    }
    config.validate()?;

    println!("=== JU-Control Metrics ===");
    println!("Endpoint: {}", config.endpoint());
    println!("User:     {username}");
    println!();

    let client = JuControlClient::with_config(&config, username.as_str(), password)?;

    if !client.login().await? {
        eprintln!("Login rejected, check the credentials");
        std::process::exit(2);
    }

    let metrics = client.fetch_metrics().await?;

    for device in metrics.devices() {
        println!(
            "Device {} (sw {}, hw {})",
            device.serial_number.as_deref().unwrap_or("?"),
            device.software_version.as_deref().unwrap_or("?"),
            device.hardware_version.as_deref().unwrap_or("?"),
        );
        if let Some(date) = &device.installation_date {
            println!("  Installed: {date}");
        }
    }
    println!();

    if metrics.is_empty() {
        println!("No metrics decoded");
    }
    for (metric, value) in metrics.iter() {
        match metric.unit() {
            Some(unit) => println!("  {metric:<28} {value:>10} {unit}"),
            None => println!("  {metric:<28} {value:>10}"),
        }
    }

    for (id, raw) in metrics.raw_registers() {
        println!("  register {id:<19} {raw:>10}");
    }

    let diagnostics = metrics.diagnostics();
    if !diagnostics.is_clean() {
        println!();
        println!("Registers that failed to decode:");
        for failure in &diagnostics.failures {
            println!("  {}: {}", failure.field, failure.reason);
        }
    }

    Ok(())
}
