//! Companion settings inspector: entry point.
//!
//! Opens a Companion settings store, runs the normal initialization (which
//! also purges deprecated keys), and reports or changes what is inside.
//!
//! # Usage
//!
//! ```text
//! companion-settings [OPTIONS] <COMMAND>
//!
//! Commands:
//!   status          Version marker, first-use flag and selected profile
//!   profiles        Configured profiles
//!   show-profile    One profile as JSON
//!   select          Persist the selected profile
//!   remove-profile  Delete every key of a profile
//!   find-previous   Stores written by earlier versions
//!   import          Import the store of an earlier version
//!   keys            Every raw key in the store
//!
//! Options:
//!   --store-dir <DIR>      Root of the settings stores [env: COMPANION_SETTINGS_DIR]
//!   --organization <NAME>  [default: OpenTX]
//!   --product <NAME>       [default: Companion 2.2]
//! ```
//!
//! Set `RUST_LOG=debug` to see every key read and written.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use companion_settings::domain::schema::{COMPANY, PRODUCT};
use companion_settings::{
    AppSettings, Profile, SettingsStore, StartupDataType, StoreLocator, TomlStoreLocator,
};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Inspect and migrate OpenTX Companion settings stores.
#[derive(Debug, Parser)]
#[command(name = "companion-settings", version)]
struct Cli {
    /// Directory holding `<organization>/<product>.toml` stores.
    ///
    /// Defaults to the platform configuration directory.
    #[arg(long, env = "COMPANION_SETTINGS_DIR")]
    store_dir: Option<PathBuf>,

    /// Organization half of the store name.
    #[arg(long, default_value = COMPANY)]
    organization: String,

    /// Product half of the store name.
    #[arg(long, default_value = PRODUCT)]
    product: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show the version marker, first-use flag and selected profile.
    Status,
    /// List configured profiles.
    Profiles,
    /// Print one profile as JSON.
    ShowProfile { index: usize },
    /// Persist `index` as the selected profile.
    Select { index: usize },
    /// Delete every stored key of a profile.
    RemoveProfile { index: usize },
    /// List stores written by earlier versions, newest first.
    FindPrevious,
    /// Import the store of an earlier version (e.g. `2.1`).
    Import { label: String },
    /// List every raw key in the store.
    Keys,
}

impl Cli {
    fn locator(&self) -> anyhow::Result<TomlStoreLocator> {
        match &self.store_dir {
            Some(dir) => Ok(TomlStoreLocator::new(dir)),
            None => TomlStoreLocator::platform_default()
                .context("cannot determine the platform configuration directory; use --store-dir"),
        }
    }

    /// Opens and initialises the selected store.
    fn open_settings(&self) -> anyhow::Result<AppSettings> {
        let locator = self.locator()?;
        let path = locator.store_path(&self.organization, &self.product);
        let backend = locator
            .open(&self.organization, &self.product)
            .with_context(|| format!("failed to open settings store {}", path.display()))?;
        let mut settings = AppSettings::new(SettingsStore::from_boxed(backend), locator);
        settings
            .init()
            .with_context(|| format!("failed to initialise settings from {}", path.display()))?;
        Ok(settings)
    }
}

// ── Output types ──────────────────────────────────────────────────────────────

/// JSON view of a profile for `show-profile`.
#[derive(Debug, Serialize)]
struct ProfileDto {
    index: usize,
    name: String,
    fw_name: String,
    fw_type: String,
    sd_path: String,
    backup_dir: String,
    splash_file: String,
    channel_order: i32,
    default_mode: i32,
    volume_gain: i32,
    burn_firmware: bool,
    rename_fw_files: bool,
    enable_backup: bool,
    simulator_startup: &'static str,
    simulator_firmware_id: String,
    stick_pot_calib: String,
    trainer_calib: String,
    vbat_warn: i32,
}

impl From<&Profile> for ProfileDto {
    fn from(profile: &Profile) -> Self {
        let simulator = profile.simulator_options();
        Self {
            index: profile.index(),
            name: profile.name(),
            fw_name: profile.fw_name(),
            fw_type: profile.fw_type(),
            sd_path: profile.sd_path(),
            backup_dir: profile.backup_dir(),
            splash_file: profile.splash_file(),
            channel_order: profile.channel_order(),
            default_mode: profile.default_mode(),
            volume_gain: profile.volume_gain(),
            burn_firmware: profile.burn_firmware(),
            rename_fw_files: profile.rename_fw_files(),
            enable_backup: profile.enable_backup(),
            simulator_startup: match simulator.startup_data_type {
                StartupDataType::SdPath => "sd-path",
                StartupDataType::DataFile => "data-file",
                StartupDataType::DataFolder => "data-folder",
            },
            simulator_firmware_id: simulator.firmware_id,
            stick_pot_calib: profile.stick_pot_calib(),
            trainer_calib: profile.trainer_calib(),
            vbat_warn: profile.vbat_warn(),
        }
    }
}

// ── Commands ──────────────────────────────────────────────────────────────────

fn execute(cli: &Cli, out: &mut impl Write) -> anyhow::Result<()> {
    let mut settings = cli.open_settings()?;

    match &cli.command {
        Command::Status => {
            writeln!(out, "settings version: {}", settings.settings_version())?;
            writeln!(out, "first use:        {}", settings.is_first_use())?;
            writeln!(out, "profile id:       {}", settings.profile_id())?;
            writeln!(out, "session id:       {}", settings.session_id())?;
            writeln!(out, "update branch:    {:?}", settings.bounded_opentx_branch())?;
        }
        Command::Profiles => {
            for (index, name) in settings.active_profiles()? {
                writeln!(out, "{index}\t{name}")?;
            }
        }
        Command::ShowProfile { index } => {
            let dto = ProfileDto::from(settings.try_profile(*index)?);
            writeln!(out, "{}", serde_json::to_string_pretty(&dto)?)?;
        }
        Command::Select { index } => {
            settings.try_profile(*index)?;
            settings.set_profile_id(*index)?;
            info!(index, "selected profile");
        }
        Command::RemoveProfile { index } => {
            settings.try_profile_mut(*index)?.remove()?;
            info!(index, "removed profile");
        }
        Command::FindPrevious => {
            let found = settings.previous_versions()?;
            if found.is_empty() {
                writeln!(out, "no previous settings found")?;
            }
            for version in found {
                writeln!(
                    out,
                    "{}\t{}/{}",
                    version.label, version.organization, version.product
                )?;
            }
        }
        Command::Import { label } => {
            if !settings.import_settings(label)? {
                anyhow::bail!("unknown settings version '{label}'");
            }
            writeln!(out, "imported settings from {}", settings.previous_version())?;
        }
        Command::Keys => {
            for key in settings.store_handle().all_keys()? {
                writeln!(out, "{key}")?;
            }
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    // Initialise structured logging.  Level is overridden by `RUST_LOG`.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let stdout = std::io::stdout();
    execute(&cli, &mut stdout.lock())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
