//! VEDO alarm command handlers.

use tabled::Tabled;
use tracing::{debug, warn};

use comelit_config::Config;
use comelit_core::{
    ALL_ZONES, AlarmArea, AlarmData, AlarmZone, BridgeClient, VedoClient, ZoneAction,
};

use crate::cli::{GlobalOpts, VedoArgs, VedoCommand, ZoneArgs};
use crate::config::{self, VedoPlan};
use crate::error::CliError;
use crate::output;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct AreaRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Area")]
    name: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Ready")]
    ready: bool,
    #[tabled(rename = "Armed")]
    armed: bool,
    #[tabled(rename = "Alarm memory")]
    alarm_memory: bool,
}

impl From<&AlarmArea> for AreaRow {
    fn from(a: &AlarmArea) -> Self {
        Self {
            index: a.index,
            name: a.name.clone(),
            state: a.human_status.to_string(),
            ready: a.ready,
            armed: a.armed,
            alarm_memory: a.alarm_memory,
        }
    }
}

#[derive(Tabled)]
struct ZoneRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Zone")]
    name: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Raw")]
    raw: String,
}

impl From<&AlarmZone> for ZoneRow {
    fn from(z: &AlarmZone) -> Self {
        Self {
            index: z.index,
            name: z.name.clone(),
            state: z.human_status.to_string(),
            raw: z.status_api.clone(),
        }
    }
}

fn detail(data: &AlarmData) -> String {
    let areas: Vec<AreaRow> = data.areas.values().map(AreaRow::from).collect();
    let zones: Vec<ZoneRow> = data.zones.values().map(ZoneRow::from).collect();
    format!(
        "{}\n{}",
        output::render_table(&areas),
        output::render_table(&zones)
    )
}

fn plain(data: &AlarmData) -> String {
    data.areas
        .values()
        .map(|a| format!("area {} {}", a.index, a.human_status))
        .chain(
            data.zones
                .values()
                .map(|z| format!("zone {} {}", z.index, z.human_status)),
        )
        .collect::<Vec<_>>()
        .join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(args: VedoArgs, global: &GlobalOpts, cfg: &Config) -> Result<(), CliError> {
    let client_config = config::client_config(global, cfg)?;

    match config::resolve_vedo(global, cfg, args.via_bridge)? {
        VedoPlan::Direct(host) => {
            let client = VedoClient::new(&host, client_config)?;
            client.login().await?;
            let result = run(&client, args.command, global).await;
            if let Err(e) = client.logout().await {
                warn!(error = %e, "vedo logout failed");
            }
            client.close();
            result
        }
        VedoPlan::ViaBridge { bridge, pin } => {
            let bridge = BridgeClient::new(&bridge, client_config)?;
            bridge.login().await?;
            let result = match bridge.vedo_enabled(&pin).await {
                Ok(true) => run(&bridge.vedo(pin), args.command, global).await,
                Ok(false) => Err(CliError::AuthFailed {
                    message: format!(
                        "VEDO is not reachable through the bridge at {}",
                        bridge.host()
                    ),
                }),
                Err(e) => Err(e.into()),
            };
            if let Err(e) = bridge.logout().await {
                warn!(error = %e, "bridge logout failed");
            }
            bridge.close();
            result
        }
    }
}

async fn run(client: &VedoClient, cmd: VedoCommand, global: &GlobalOpts) -> Result<(), CliError> {
    debug!(command = ?cmd, route = ?client.route(), "vedo command");
    match cmd {
        VedoCommand::Status => {
            let data = client.get_all_areas_and_zones().await?;
            let out = output::render_single(global.format(), &data, detail, plain)?;
            output::print_output(&out, global.quiet);
        }
        VedoCommand::Arm(zone) => set_zone(client, zone, ZoneAction::Arm, global).await?,
        VedoCommand::Disarm(zone) => set_zone(client, zone, ZoneAction::Disarm, global).await?,
    }
    Ok(())
}

async fn set_zone(
    client: &VedoClient,
    args: ZoneArgs,
    action: ZoneAction,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    client.set_zone_status(args.zone, action, args.force).await?;
    let target = if args.zone == ALL_ZONES {
        "all zones".to_owned()
    } else {
        format!("zone {}", args.zone)
    };
    let verb = match action {
        ZoneAction::Arm => "armed",
        ZoneAction::Disarm => "disarmed",
    };
    let out = output::render_single(
        global.format(),
        &serde_json::json!({"zone": args.zone, "action": verb, "force": args.force}),
        |_| format!("{target} {verb}"),
        |_| verb.to_owned(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
