//! Weather snapshot daemon.
//!
//! Downloads the Buienradar station feed on a fixed interval, replaces the local store with it and
//! answers the standard questions after every refresh.

use std::{io, time::Duration};

use anyhow::{anyhow, Context, Error};
use clap::{value_parser, Arg, ArgAction, Command};
use log::{error, info, warn};
use station_snapshot::{
    defaults, BarChart, BuienradarFeed, CommonCmdLineArgs, CycleOutcome, Report, ReportSink,
    Scheduler, Store,
};

fn main() {
    if let Err(ref e) = run() {
        println!("error: {}", e);

        for cause in e.chain().skip(1) {
            println!("caused by: {}", cause);
        }

        ::std::process::exit(1);
    }
}

fn app() -> Command {
    CommonCmdLineArgs::new_app(
        "wxsnap",
        "Keep a local snapshot of the Buienradar weather stations up to date.",
    )
    .arg(
        Arg::new("url")
            .long("url")
            .value_name("URL")
            .default_value(defaults::DEFAULT_URL)
            .help("Feed to download."),
    )
    .arg(
        Arg::new("interval")
            .short('i')
            .long("interval")
            .value_name("MINUTES")
            .value_parser(value_parser!(u64).range(1..=u64::MAX / 60))
            .default_value("10")
            .help("Minutes between refreshes."),
    )
    .arg(
        Arg::new("poll")
            .long("poll")
            .value_name("SECONDS")
            .value_parser(value_parser!(u64).range(1..))
            .default_value("30")
            .help("Seconds between checks for due work.")
            .long_help(
                "Seconds between checks for due work. A refresh is never later than this, \
                 and shutdown is noticed within this time.",
            ),
    )
    .arg(
        Arg::new("timeout")
            .long("timeout")
            .value_name("SECONDS")
            .value_parser(value_parser!(u64).range(1..))
            .default_value("10")
            .help("Seconds before a download is abandoned."),
    )
    .arg(
        Arg::new("once")
            .long("once")
            .action(ArgAction::SetTrue)
            .help("Refresh a single time and exit."),
    )
}

fn run() -> Result<(), Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let (common_args, matches) = CommonCmdLineArgs::matches(app())?;

    let url = matches
        .get_one::<String>("url")
        .map(String::as_str)
        .unwrap_or(defaults::DEFAULT_URL);
    let interval = matches
        .get_one::<u64>("interval")
        .map(|minutes| Duration::from_secs(minutes * 60))
        .unwrap_or(defaults::DEFAULT_INTERVAL);
    let poll = matches
        .get_one::<u64>("poll")
        .map(|secs| Duration::from_secs(*secs))
        .unwrap_or(defaults::DEFAULT_POLL);
    let timeout = matches
        .get_one::<u64>("timeout")
        .map(|secs| Duration::from_secs(*secs))
        .unwrap_or(defaults::DEFAULT_TIMEOUT);

    let mut store = Store::create(&common_args.root()).with_context(|| {
        format!(
            "unable to initialize the store in {}",
            common_args.root().display()
        )
    })?;
    let mut feed = BuienradarFeed::new(url, timeout)?;
    info!(
        "Keeping {} in sync with {}.",
        common_args.root().display(),
        feed.url()
    );
    let mut scheduler = Scheduler::new(interval, poll);

    if matches.get_flag("once") {
        match scheduler.run_cycle(&mut feed, &mut store) {
            CycleOutcome::Refreshed { .. } => publish(&store, &common_args),
            CycleOutcome::FetchFailed(err) => return Err(anyhow!(err).context("refresh failed")),
            CycleOutcome::PersistFailed(err) => {
                return Err(anyhow!(err).context("refresh failed"))
            }
        }
    } else {
        let handle = scheduler.shutdown_handle();
        ctrlc::set_handler(move || {
            info!("Shutdown requested, stopping after the current cycle.");
            handle.shutdown();
        })
        .context("unable to install the interrupt handler")?;

        scheduler.run(&mut feed, &mut store, |store| publish(store, &common_args));
    }

    Ok(())
}

// Neither a failing query nor a failing chart may stop the refresh loop.
fn publish(store: &Store, common_args: &CommonCmdLineArgs) {
    let report = match Report::compute(store, common_args.region()) {
        Ok(report) => report,
        Err(err) => {
            error!("Unable to answer questions about the snapshot: {}", err);
            return;
        }
    };

    println!("{}", report);

    if common_args.chart() {
        if let Err(err) = BarChart::new(io::stdout()).render(&report.latest) {
            warn!("Unable to draw chart: {}", err);
        }
    }
}

#[cfg(test)]
mod unit {
    use super::*;

    #[test]
    fn test_interval_in_seconds_fits() {
        let largest = (u64::MAX / 60).to_string();
        let matches = app()
            .try_get_matches_from(&["wxsnap", "--interval", largest.as_str()])
            .expect("Largest interval rejected.");
        assert_eq!(matches.get_one::<u64>("interval"), Some(&(u64::MAX / 60)));

        let too_large = (u64::MAX / 60 + 1).to_string();
        assert!(app()
            .try_get_matches_from(&["wxsnap", "--interval", too_large.as_str()])
            .is_err());
        assert!(app()
            .try_get_matches_from(&["wxsnap", "--interval", "0"])
            .is_err());
    }
}
