//! Command tree for the `remo` binary and its dispatch onto the API clients.

use clap::{Args, Parser, Subcommand};
use log::debug;
use nature_remo::{AirConSettings, NatureRemoAPI, NatureRemoError, NatureRemoLocalAPI, NatureRemoModel, dump_list};

use crate::config::Config;

const LONG_VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (git ", env!("BUILD_TIME_GIT_HASH"), ")");

#[derive(Debug, Parser)]
#[command(name = "remo", version = LONG_VERSION, about = "Nature Remo cloud and local API client")]
pub struct Cli {
    /// Access token; defaults to $REMO_ACCESS_TOKEN.
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Log HTTP requests and responses to stderr.
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Authenticated user.
    #[command(subcommand)]
    User(UserCommand),
    /// Remo devices.
    #[command(subcommand)]
    Device(DeviceCommand),
    /// Appliances controlled through a Remo.
    #[command(subcommand)]
    Appliance(ApplianceCommand),
    /// Stored IR signals.
    #[command(subcommand)]
    Signal(SignalCommand),
    /// Local API of a Remo on the LAN.
    #[command(subcommand)]
    Local(LocalCommand),
}

#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// Fetch the authenticated user's information.
    Get,
    /// Update the authenticated user's nickname.
    Update { nickname: String },
}

#[derive(Debug, Subcommand)]
pub enum DeviceCommand {
    /// List the Remo devices the user has access to.
    Get,
    /// Rename a Remo.
    Update { device: String, name: String },
    /// Delete a Remo.
    Delete { device: String },
    /// Set the offset added to the measured temperature.
    #[command(name = "update_temperature_offset")]
    UpdateTemperatureOffset {
        device: String,
        #[arg(allow_negative_numbers = true)]
        offset: i32,
    },
    /// Set the offset added to the measured humidity.
    #[command(name = "update_humidity_offset")]
    UpdateHumidityOffset {
        device: String,
        #[arg(allow_negative_numbers = true)]
        offset: i32,
    },
}

#[derive(Debug, Subcommand)]
pub enum ApplianceCommand {
    /// Find the air conditioners matching an IR signal (JSON message).
    Detect { message: String },
    /// List appliances.
    Get,
    /// Register a new appliance.
    Create {
        device: String,
        nickname: String,
        image: String,
        /// IRDB model id.
        #[arg(long)]
        model: Option<String>,
        #[arg(long)]
        model_type: Option<String>,
    },
    /// Reorder appliances (comma separated list of every appliance id).
    #[command(name = "update_orders")]
    UpdateOrders {
        #[arg(value_delimiter = ',', required = true)]
        appliances: Vec<String>,
    },
    /// Delete an appliance.
    Delete { appliance: String },
    /// Update an appliance's nickname and image.
    Update { appliance: String, nickname: String, image: String },
    /// Change air conditioner settings.
    #[command(name = "update_aircon_settings")]
    UpdateAirconSettings(AirConSettingsArgs),
    /// Press a TV button.
    #[command(name = "send_tv_infrared_signal")]
    SendTvInfraredSignal { appliance: String, button: String },
    /// Press a light button.
    #[command(name = "send_light_infrared_signal")]
    SendLightInfraredSignal { appliance: String, button: String },
}

#[derive(Debug, Args)]
pub struct AirConSettingsArgs {
    pub appliance: String,
    #[arg(long)]
    pub operation_mode: Option<String>,
    #[arg(long, allow_negative_numbers = true)]
    pub temperature: Option<String>,
    #[arg(long)]
    pub air_volume: Option<String>,
    #[arg(long)]
    pub air_direction: Option<String>,
    #[arg(long)]
    pub button: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum SignalCommand {
    /// List the signals of an appliance.
    Get { appliance: String },
    /// Store a new signal under an appliance.
    Create {
        appliance: String,
        name: String,
        message: String,
        image: String,
    },
    /// Reorder signals (comma separated list of every signal id).
    #[command(name = "update_orders")]
    UpdateOrders {
        appliance: String,
        #[arg(value_delimiter = ',', required = true)]
        signals: Vec<String>,
    },
    /// Update a signal's name and image.
    Update { signal: String, name: String, image: String },
    /// Delete a signal.
    Delete { signal: String },
    /// Send a signal.
    Send { signal: String },
}

#[derive(Debug, Subcommand)]
pub enum LocalCommand {
    /// Fetch the newest IR signal received by the device at ADDR.
    Get { addr: String },
    /// Make the device at ADDR emit an IR signal (JSON message).
    Send { addr: String, message: String },
}

fn print_one<T: NatureRemoModel>(item: &T) -> Result<(), NatureRemoError> {
    println!("{}", item.dump()?);
    Ok(())
}

fn print_many<T: NatureRemoModel>(items: &[T]) -> Result<(), NatureRemoError> {
    println!("{}", dump_list(items)?);
    Ok(())
}

pub fn dispatch(command: Command, cfg: &Config) -> Result<(), NatureRemoError> {
    debug!("dispatching {:?}", command);
    match command {
        Command::Local(cmd) => local(cmd),
        Command::User(cmd) => user(&NatureRemoAPI::new(cfg.require_token()?), cmd),
        Command::Device(cmd) => device(&NatureRemoAPI::new(cfg.require_token()?), cmd),
        Command::Appliance(cmd) => appliance(&NatureRemoAPI::new(cfg.require_token()?), cmd),
        Command::Signal(cmd) => signal(&NatureRemoAPI::new(cfg.require_token()?), cmd),
    }
}

fn user(api: &NatureRemoAPI, cmd: UserCommand) -> Result<(), NatureRemoError> {
    match cmd {
        UserCommand::Get => print_one(&api.get_user()?),
        UserCommand::Update { nickname } => print_one(&api.update_user(&nickname)?),
    }
}

fn device(api: &NatureRemoAPI, cmd: DeviceCommand) -> Result<(), NatureRemoError> {
    match cmd {
        DeviceCommand::Get => print_many(&api.get_devices()?),
        DeviceCommand::Update { device, name } => api.update_device(&device, &name),
        DeviceCommand::Delete { device } => api.delete_device(&device),
        DeviceCommand::UpdateTemperatureOffset { device, offset } => api.update_temperature_offset(&device, offset),
        DeviceCommand::UpdateHumidityOffset { device, offset } => api.update_humidity_offset(&device, offset),
    }
}

fn appliance(api: &NatureRemoAPI, cmd: ApplianceCommand) -> Result<(), NatureRemoError> {
    match cmd {
        ApplianceCommand::Detect { message } => print_many(&api.detect_appliance(&message)?),
        ApplianceCommand::Get => print_many(&api.get_appliances()?),
        ApplianceCommand::Create {
            device,
            nickname,
            image,
            model,
            model_type,
        } => print_one(&api.create_appliance(
            &device,
            &nickname,
            &image,
            model.as_deref(),
            model_type.as_deref(),
        )?),
        ApplianceCommand::UpdateOrders { appliances } => api.update_appliance_orders(&appliances),
        ApplianceCommand::Delete { appliance } => api.delete_appliance(&appliance),
        ApplianceCommand::Update {
            appliance,
            nickname,
            image,
        } => print_one(&api.update_appliance(&appliance, &nickname, &image)?),
        ApplianceCommand::UpdateAirconSettings(args) => {
            let settings = AirConSettings {
                operation_mode: args.operation_mode,
                temperature: args.temperature,
                air_volume: args.air_volume,
                air_direction: args.air_direction,
                button: args.button,
            };
            api.update_aircon_settings(&args.appliance, &settings)
        }
        ApplianceCommand::SendTvInfraredSignal { appliance, button } => api.send_tv_infrared_signal(&appliance, &button),
        ApplianceCommand::SendLightInfraredSignal { appliance, button } => {
            api.send_light_infrared_signal(&appliance, &button)
        }
    }
}

fn signal(api: &NatureRemoAPI, cmd: SignalCommand) -> Result<(), NatureRemoError> {
    match cmd {
        SignalCommand::Get { appliance } => print_many(&api.get_signals(&appliance)?),
        SignalCommand::Create {
            appliance,
            name,
            message,
            image,
        } => print_one(&api.create_signal(&appliance, &name, &message, &image)?),
        SignalCommand::UpdateOrders { appliance, signals } => api.update_signal_orders(&appliance, &signals),
        SignalCommand::Update { signal, name, image } => api.update_signal(&signal, &name, &image),
        SignalCommand::Delete { signal } => api.delete_signal(&signal),
        SignalCommand::Send { signal } => api.send_signal(&signal),
    }
}

fn local(cmd: LocalCommand) -> Result<(), NatureRemoError> {
    match cmd {
        LocalCommand::Get { addr } => print_one(&NatureRemoLocalAPI::new(addr).get_ir_signal()?),
        LocalCommand::Send { addr, message } => NatureRemoLocalAPI::new(addr).send_ir_signal(&message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_tree_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn snake_case_subcommands_and_global_flags() {
        let cli = Cli::try_parse_from([
            "remo",
            "device",
            "update_temperature_offset",
            "dev-1",
            "-2",
            "--token",
            "t",
            "--debug",
        ])
        .unwrap();
        assert_eq!(cli.token.as_deref(), Some("t"));
        assert!(cli.debug);
        match cli.command {
            Command::Device(DeviceCommand::UpdateTemperatureOffset { device, offset }) => {
                assert_eq!(device, "dev-1");
                assert_eq!(offset, -2);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn orders_split_on_commas() {
        let cli = Cli::try_parse_from(["remo", "signal", "update_orders", "a1", "s1,s2,s3"]).unwrap();
        match cli.command {
            Command::Signal(SignalCommand::UpdateOrders { appliance, signals }) => {
                assert_eq!(appliance, "a1");
                assert_eq!(signals, ["s1", "s2", "s3"]);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn aircon_settings_flags() {
        let cli = Cli::try_parse_from([
            "remo",
            "appliance",
            "update_aircon_settings",
            "ac-1",
            "--operation-mode",
            "cool",
            "--temperature",
            "26",
        ])
        .unwrap();
        match cli.command {
            Command::Appliance(ApplianceCommand::UpdateAirconSettings(args)) => {
                assert_eq!(args.appliance, "ac-1");
                assert_eq!(args.operation_mode.as_deref(), Some("cool"));
                assert_eq!(args.temperature.as_deref(), Some("26"));
                assert!(args.air_volume.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn create_appliance_optional_model() {
        let cli = Cli::try_parse_from([
            "remo", "appliance", "create", "d1", "AC", "ico_ac_1", "--model", "m1", "--model-type", "AC",
        ])
        .unwrap();
        match cli.command {
            Command::Appliance(ApplianceCommand::Create { model, model_type, .. }) => {
                assert_eq!(model.as_deref(), Some("m1"));
                assert_eq!(model_type.as_deref(), Some("AC"));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn missing_token_fails_before_any_request() {
        let cfg = Config::default();
        let err = dispatch(Command::User(UserCommand::Get), &cfg).unwrap_err();
        assert_eq!(err.to_string(), "Access token must be supplied");
    }
}
