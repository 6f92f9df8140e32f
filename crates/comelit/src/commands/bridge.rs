//! Serial Bridge command handlers.

use tabled::Tabled;
use tracing::{debug, warn};

use comelit_config::Config;
use comelit_core::{BridgeClient, ClimaAction, Device, DeviceType, DeviceValue};

use crate::cli::{BridgeArgs, BridgeCommand, ClimaArgs, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "Type")]
    dtype: String,
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Zone")]
    zone: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Power")]
    power: String,
}

impl From<&Device> for DeviceRow {
    fn from(d: &Device) -> Self {
        Self {
            dtype: d.device_type.to_string(),
            index: d.index,
            name: d.name.clone(),
            zone: d.zone.clone(),
            status: d.human_status.to_string(),
            value: match &d.value {
                DeviceValue::Number(n) => n.to_string(),
                DeviceValue::Nested(map) => serde_json::Value::Object(map.clone()).to_string(),
            },
            power: if d.device_type == DeviceType::Other {
                format!("{:.1} {}", d.power, d.power_unit)
            } else {
                String::new()
            },
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(args: BridgeArgs, global: &GlobalOpts, cfg: &Config) -> Result<(), CliError> {
    let host = config::resolve_bridge(global, cfg)?;
    let client = BridgeClient::new(&host, config::client_config(global, cfg)?)?;

    client.login().await?;
    let result = run(&client, args.command, global).await;
    if let Err(e) = client.logout().await {
        warn!(error = %e, "bridge logout failed");
    }
    client.close();
    result
}

async fn run(client: &BridgeClient, cmd: BridgeCommand, global: &GlobalOpts) -> Result<(), CliError> {
    debug!(command = ?cmd, "bridge command");
    match cmd {
        BridgeCommand::Devices { device_type } => {
            let table = client.get_all_devices().await?;
            let devices: Vec<Device> = table
                .into_iter()
                .filter(|(t, _)| device_type.is_none_or(|wanted| wanted == *t))
                .flat_map(|(_, devices)| devices.into_values())
                .collect();
            let out = output::render_list(
                global.format(),
                &devices,
                |d| DeviceRow::from(d),
                |d| format!("{} {}", d.device_type, d.index),
            )?;
            output::print_output(&out, global.quiet);
        }

        BridgeCommand::Status { device_type, index } => {
            let status = client.get_device_status(device_type, index).await?;
            let out = output::render_single(
                global.format(),
                &status,
                |s| format!("{device_type} {index}: {s}"),
                ToString::to_string,
            )?;
            output::print_output(&out, global.quiet);
        }

        BridgeCommand::Set {
            device_type,
            index,
            action,
        } => {
            client.set_device_status(device_type, index, action).await?;
            output::print_output(&format!("{device_type} {index} -> {action}"), global.quiet);
        }

        BridgeCommand::Clima(ClimaArgs {
            index,
            action,
            value,
        }) => {
            client.set_clima_status(index, action, value).await?;
            output::print_output(&describe("thermostat", index, action, value), global.quiet);
        }

        BridgeCommand::Humidity(ClimaArgs {
            index,
            action,
            value,
        }) => {
            client.set_humidity_status(index, action, value).await?;
            output::print_output(&describe("humidistat", index, action, value), global.quiet);
        }
    }
    Ok(())
}

fn describe(what: &str, index: usize, action: ClimaAction, value: f64) -> String {
    if action == ClimaAction::Set {
        format!("{what} {index} -> set {value}")
    } else {
        format!("{what} {index} -> {action}")
    }
}
