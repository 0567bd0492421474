//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

use crate::pipeline::{RunMode, RunOptions};

/// Energy-manager microgrid demonstration: builds one day of solver inputs,
/// solves once and presents the setpoints.
#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Args {
    /// Energy-manager configuration (TOML).
    #[clap(long, default_value = "data/microapp/config_microapp.toml", env = "EMS_CONFIG")]
    pub config: PathBuf,

    /// Load and PV profile archive (CSV with `loadProfile2,pvProfile2`).
    #[clap(
        long,
        default_value = "data/microapp/load_pv_microapp.csv",
        env = "EMS_PROFILES"
    )]
    pub profiles: PathBuf,

    /// Scenario constants (TOML); built-in defaults when omitted.
    #[clap(long, env = "EMS_SCENARIO")]
    pub scenario: Option<PathBuf>,

    /// Output path of the web-service payload.
    #[clap(long, default_value = "data/microapp/efoc_microapp.json")]
    pub export_path: PathBuf,

    /// Presentation modes, comma-separated.
    #[clap(long, value_enum, value_delimiter = ',')]
    pub mode: Vec<RunMode>,

    /// Also write the setpoints to this CSV file.
    #[clap(long)]
    pub setpoints_out: Option<PathBuf>,

    /// Log at debug level.
    #[clap(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            config_path: self.config.clone(),
            profiles_path: self.profiles.clone(),
            scenario_path: self.scenario.clone(),
            export_path: self.export_path.clone(),
            modes: self.mode.clone(),
            setpoints_out: self.setpoints_out.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Option<Args> {
        Args::try_parse_from(std::iter::once("ems-microapp").chain(args.iter().copied())).ok()
    }

    #[test]
    fn defaults() {
        let args = parse(&[]);
        let opts = args.as_ref().map(Args::run_options);
        assert_eq!(
            opts.as_ref().map(|o| o.config_path.clone()),
            Some(PathBuf::from("data/microapp/config_microapp.toml"))
        );
        assert_eq!(
            opts.as_ref().map(|o| o.export_path.clone()),
            Some(PathBuf::from("data/microapp/efoc_microapp.json"))
        );
        assert_eq!(opts.as_ref().map(|o| o.modes.is_empty()), Some(true));
        assert_eq!(args.map(|a| a.verbose), Some(false));
    }

    #[test]
    fn modes_combine() {
        let opts = parse(&["--mode", "plot,export"]).map(|a| a.run_options());
        assert_eq!(
            opts.map(|o| o.modes),
            Some(vec![RunMode::Plot, RunMode::Export])
        );
    }

    #[test]
    fn repeated_mode_flags_accumulate() {
        let opts = parse(&["--mode", "export", "--mode", "plot"]).map(|a| a.run_options());
        let opts = opts.unwrap_or_else(|| panic!("arguments should parse"));
        assert!(opts.has_mode(RunMode::Plot));
        assert!(opts.has_mode(RunMode::Export));
    }

    #[test]
    fn unknown_mode_rejected() {
        assert!(parse(&["--mode", "web"]).is_none());
    }

    #[test]
    fn scenario_and_setpoints_paths() {
        let args = parse(&[
            "--scenario",
            "s.toml",
            "--setpoints-out",
            "out/setpoints.csv",
            "-v",
        ]);
        let opts = args.as_ref().map(Args::run_options);
        assert_eq!(
            opts.as_ref().and_then(|o| o.scenario_path.clone()),
            Some(PathBuf::from("s.toml"))
        );
        assert_eq!(
            opts.and_then(|o| o.setpoints_out),
            Some(PathBuf::from("out/setpoints.csv"))
        );
        assert_eq!(args.map(|a| a.verbose), Some(true));
    }
}
