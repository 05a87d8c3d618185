//! Command line options that are used across applications.

use std::path::{Path, PathBuf};

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use dirs::home_dir;

use crate::{analytics::DEFAULT_REGION_MARKER, errors::SnapshotErr};

/// Struct to package up command line arguments.
#[derive(Clone, Debug)]
pub struct CommonCmdLineArgs {
    // Path to the directory holding the store
    root: PathBuf,
    // Region marker used when listing stations by region
    region: String,
    // Whether to draw the latest temperature chart
    chart: bool,
}

impl CommonCmdLineArgs {
    const DEFAULT_ROOT_DIR: &'static str = "wxsnap";

    /// Create a new set of args.
    pub fn new_app(app_name: &'static str, about: &'static str) -> Command {
        Command::new(app_name)
            .about(about)
            .version(env!("CARGO_PKG_VERSION"))
            .arg(
                Arg::new("root")
                    .short('r')
                    .long("root")
                    .value_name("DIR")
                    .value_parser(value_parser!(PathBuf))
                    .help("Path to the store.")
                    .long_help("Path to the directory holding the store. Defaults to '${HOME}/wxsnap/'"),
            )
            .arg(
                Arg::new("region")
                    .long("region")
                    .value_name("MARKER")
                    .default_value(DEFAULT_REGION_MARKER)
                    .help("List the stations whose region contains this text.")
                    .long_help(
                        "List the stations whose region contains this text. The match is case \
                         sensitive.",
                    ),
            )
            .arg(
                Arg::new("no-chart")
                    .long("no-chart")
                    .action(ArgAction::SetTrue)
                    .help("Do not draw the latest temperature chart."),
            )
            .after_help("Set RUST_LOG (e.g. RUST_LOG=debug) to change how much is logged.")
    }

    /// Process a `Command` to get the parsed values out of it and the matches object so an
    /// application can continue with further argument parsing.
    pub fn matches(app: Command) -> Result<(Self, ArgMatches), SnapshotErr> {
        Self::from_matches(app.get_matches())
    }

    /// Extract the common values from already parsed arguments.
    pub fn from_matches(matches: ArgMatches) -> Result<(Self, ArgMatches), SnapshotErr> {
        let root = match matches.get_one::<PathBuf>("root") {
            Some(root) => root.clone(),
            None => home_dir()
                .map(|hd| hd.join(Self::DEFAULT_ROOT_DIR))
                .ok_or_else(|| {
                    SnapshotErr::GeneralError(
                        "unable to find the home directory, use --root".to_owned(),
                    )
                })?,
        };

        let region = matches
            .get_one::<String>("region")
            .cloned()
            .unwrap_or_else(|| DEFAULT_REGION_MARKER.to_owned());

        let chart = !matches.get_flag("no-chart");

        Ok((
            CommonCmdLineArgs {
                root,
                region,
                chart,
            },
            matches,
        ))
    }

    /// Get the root of the store
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the region marker
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Should the chart be drawn?
    pub fn chart(&self) -> bool {
        self.chart
    }
}

#[cfg(test)]
mod unit {
    use super::*;

    fn parse(args: &[&str]) -> CommonCmdLineArgs {
        let matches = CommonCmdLineArgs::new_app("test", "Test app.")
            .try_get_matches_from(args)
            .expect("Invalid arguments.");
        CommonCmdLineArgs::from_matches(matches)
            .expect("Error processing arguments.")
            .0
    }

    #[test]
    fn test_explicit_values() {
        let args = parse(&["test", "--root", "/tmp/wx", "--region", "Maas", "--no-chart"]);

        assert_eq!(args.root(), Path::new("/tmp/wx"));
        assert_eq!(args.region(), "Maas");
        assert!(!args.chart());
    }

    #[test]
    fn test_defaults() {
        let args = parse(&["test", "-r", "/tmp/wx"]);

        assert_eq!(args.region(), DEFAULT_REGION_MARKER);
        assert!(args.chart());
    }
}
