// ZE-SG3 command-line tool
// Reads and writes single fields of a ZE-SG3 module over Modbus TCP

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use ze_sg3::registers;
use ze_sg3::types::Command;
use ze_sg3::{ModbusConfig, ZeSg3Device, REGISTER_MAP};

/// Access the holding registers of a Seneca ZE-SG3 load-cell converter
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// JSON config file with host, port, timeout_ms and unit_id
    #[arg(long)]
    config: Option<PathBuf>,

    /// Module address (overrides the config file)
    #[arg(long)]
    host: Option<String>,

    /// Modbus TCP port
    #[arg(long)]
    port: Option<u16>,

    /// Per-request timeout in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Modbus unit identifier
    #[arg(long)]
    unit_id: Option<u8>,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand, Debug)]
enum Action {
    /// List every field of the register map
    Fields,
    /// Read one field
    Read { name: String },
    /// Write one field
    Write { name: String, value: String },
    /// Read every field and print them as JSON
    Dump,
    /// Send a command code (e.g. tare_ram, reboot)
    Command { name: String },
}

impl Args {
    fn modbus_config(&self) -> Result<ModbusConfig> {
        let mut config = match &self.config {
            Some(path) => ModbusConfig::from_file(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => ModbusConfig::default(),
        };
        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config.timeout_ms = timeout_ms;
        }
        if let Some(unit_id) = self.unit_id {
            config.unit_id = unit_id;
        }
        config.validate()?;
        Ok(config)
    }
}

fn print_fields() {
    for d in REGISTER_MAP {
        println!("{:<36} {:>3} x{} {} {}", d.name, d.address, d.words, d.access, d.kind);
    }
}

fn run(device: &mut ZeSg3Device, action: &Action) -> Result<()> {
    match action {
        Action::Fields => print_fields(),
        Action::Read { name } => {
            let value = device.read(name)?;
            println!("{} = {}", name, value);
        }
        Action::Write { name, value } => {
            let descriptor = registers::lookup(name).ok_or_else(|| anyhow!("unknown field '{}'", name))?;
            let parsed = descriptor.parse_value(value)?;
            device.write(name, parsed)?;
            println!("{} <- {}", name, parsed);
        }
        Action::Dump => {
            let values = device.read_all()?;
            let map: serde_json::Map<String, serde_json::Value> = values
                .into_iter()
                .map(|(name, value)| Ok((name.to_string(), serde_json::to_value(value)?)))
                .collect::<Result<_, serde_json::Error>>()?;
            println!("{}", serde_json::to_string_pretty(&map)?);
        }
        Action::Command { name } => {
            let command = Command::from_label(name).ok_or_else(|| {
                let known: Vec<_> = Command::ALL.iter().map(|c| c.label()).collect();
                anyhow!("unknown command '{}', expected one of: {}", name, known.join(", "))
            })?;
            device.send_command(command)?;
            println!("sent {} ({})", command, command.code());
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init_from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, "info"),
    );

    let args = Args::parse();

    // Listing the map needs no device
    if let Action::Fields = args.action {
        print_fields();
        return Ok(());
    }

    let config = args.modbus_config()?;
    log::info!("Connecting to {}:{} (unit {})", config.host, config.port, config.unit_id);
    let mut device = ZeSg3Device::connect_with_config(&config)
        .with_context(|| format!("connecting to {}:{}", config.host, config.port))?;

    let result = run(&mut device, &args.action);
    device.disconnect();
    result
}
