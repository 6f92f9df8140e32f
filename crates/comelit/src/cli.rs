//! Clap derive structures for the `comelit` CLI.
//!
//! Defines the command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

use comelit_core::{ALL_ZONES, ClimaAction, DeviceAction, DeviceType};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// comelit -- drive a Comelit SimpleHome installation from the shell
#[derive(Debug, Parser)]
#[command(
    name = "comelit",
    version,
    about = "Control Comelit SimpleHome bridges and VEDO alarms from the command line",
    long_about = "Talks to a Comelit Serial Bridge (lights, covers, climate, irrigation,\n\
        scenarios) and to a VEDO alarm panel, directly or through the bridge.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Installation profile to use
    #[arg(long, short = 'p', env = "COMELIT_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Serial Bridge host (overrides profile)
    #[arg(long, env = "COMELIT_BRIDGE", global = true)]
    pub bridge: Option<String>,

    /// Serial Bridge HTTP port
    #[arg(long, env = "COMELIT_BRIDGE_PORT", global = true)]
    pub bridge_port: Option<u16>,

    /// Serial Bridge PIN (else the profile's `pin_env`, `COMELIT_BRIDGE_PIN`, or `pin`)
    #[arg(long, global = true)]
    pub bridge_pin: Option<String>,

    /// VEDO alarm host (overrides profile)
    #[arg(long, env = "COMELIT_VEDO", global = true)]
    pub vedo: Option<String>,

    /// VEDO alarm HTTP port
    #[arg(long, env = "COMELIT_VEDO_PORT", global = true)]
    pub vedo_port: Option<u16>,

    /// VEDO alarm PIN (else the profile's `pin_env`, `COMELIT_VEDO_PIN`, or `pin`)
    #[arg(long, global = true)]
    pub vedo_pin: Option<String>,

    /// Output format [default: `defaults.output` from the config, else table]
    #[arg(long, short = 'o', env = "COMELIT_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Request timeout in seconds
    #[arg(long, env = "COMELIT_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

impl GlobalOpts {
    /// The output format in effect, table when none was chosen.
    pub fn format(&self) -> &OutputFormat {
        self.output.as_ref().unwrap_or(&OutputFormat::Table)
    }
}

// ── Output Enum ──────────────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// Plain text, one value per line (scripting)
    Plain,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serial Bridge devices: lights, covers, climate, irrigation, scenarios
    #[command(alias = "b")]
    Bridge(BridgeArgs),

    /// VEDO alarm areas and zones
    #[command(alias = "alarm")]
    Vedo(VedoArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Bridge ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct BridgeArgs {
    #[command(subcommand)]
    pub command: BridgeCommand,
}

#[derive(Debug, Subcommand)]
pub enum BridgeCommand {
    /// List every configured device
    #[command(alias = "ls")]
    Devices {
        /// Only show one category (light, cover, climate, irrigation, other, scenario)
        #[arg(long = "type", short = 't')]
        device_type: Option<DeviceType>,
    },

    /// Show the raw status code of one device
    Status {
        /// Device category
        device_type: DeviceType,
        /// Slot index within the category
        index: usize,
    },

    /// Switch a device (on/off, open/close for covers)
    Set {
        /// Device category
        device_type: DeviceType,
        /// Slot index within the category
        index: usize,
        /// on | off | open | close
        action: DeviceAction,
    },

    /// Drive a thermostat
    Clima(ClimaArgs),

    /// Drive a humidistat
    Humidity(ClimaArgs),
}

#[derive(Debug, Args)]
pub struct ClimaArgs {
    /// Climate device index
    pub index: usize,
    /// auto | man | on | off | set
    pub action: ClimaAction,
    /// Set point (degrees or percent), used with `set`
    #[arg(default_value_t = 0.0)]
    pub value: f64,
}

// ── VEDO ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct VedoArgs {
    /// Reach the panel through the Serial Bridge
    #[arg(long, global = true)]
    pub via_bridge: bool,

    #[command(subcommand)]
    pub command: VedoCommand,
}

#[derive(Debug, Subcommand)]
pub enum VedoCommand {
    /// Show every present area and zone
    Status,

    /// Arm a zone, or every zone with `all`
    Arm(ZoneArgs),

    /// Disarm a zone, or every zone with `all`
    Disarm(ZoneArgs),
}

#[derive(Debug, Args)]
pub struct ZoneArgs {
    /// Zone index or `all`
    #[arg(value_parser = parse_zone)]
    pub zone: usize,

    /// Override the panel's safety checks
    #[arg(long, short = 'f')]
    pub force: bool,
}

fn parse_zone(raw: &str) -> Result<usize, String> {
    if raw.eq_ignore_ascii_case("all") {
        return Ok(ALL_ZONES);
    }
    raw.parse()
        .map_err(|_| format!("expected a zone index or 'all', got '{raw}'"))
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
