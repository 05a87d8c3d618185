//! Weather snapshot query tool.
//!
//! Answers the standard questions about the snapshot already in the store, without downloading.

use std::{io, str::FromStr};

use anyhow::{Context, Error};
use clap::{Arg, ArgAction};
use station_snapshot::{BarChart, CommonCmdLineArgs, Question, Report, ReportSink, Store};
use strum::IntoEnumIterator;

fn main() {
    if let Err(ref e) = run() {
        println!("error: {}", e);

        for cause in e.chain().skip(1) {
            println!("caused by: {}", cause);
        }

        ::std::process::exit(1);
    }
}

fn run() -> Result<(), Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let app = CommonCmdLineArgs::new_app(
        "wxquery",
        "Answer questions about the weather snapshot in the store.",
    )
    .arg(
        Arg::new("only")
            .short('q')
            .long("only")
            .value_name("QUESTION")
            .action(ArgAction::Append)
            .value_parser(|name: &str| Question::from_str(name).map_err(|err| err.to_string()))
            .help("Only answer these questions (highest, average, feel-gap, region).")
            .long_help(concat!(
                "Only answer these questions. Can be given more than once. One of highest, ",
                "average, feel-gap or region. Without this option all questions are answered ",
                "and the chart is drawn."
            )),
    )
    .arg(
        Arg::new("summary")
            .short('s')
            .long("summary")
            .action(ArgAction::SetTrue)
            .help("Show the size of the snapshot first."),
    );

    let (common_args, matches) = CommonCmdLineArgs::matches(app)?;

    let store = Store::connect(&common_args.root()).with_context(|| {
        format!(
            "no usable store in {}, run wxsnap first",
            common_args.root().display()
        )
    })?;

    if matches.get_flag("summary") {
        println!(
            "{} stations, {} measurements, {} bytes on disk.\n",
            store.station_count()?,
            store.measurement_count()?,
            store.db_size()?
        );
    }

    let report = Report::compute(&store, common_args.region())?;

    let questions: Vec<Question> = match matches.get_many::<Question>("only") {
        Some(chosen) => chosen.copied().collect(),
        None => Question::iter().collect(),
    };
    let answer_all = matches.get_many::<Question>("only").is_none();

    for question in questions {
        println!("{}", report.answer(question));
    }

    if answer_all && common_args.chart() {
        println!();
        BarChart::new(io::stdout()).render(&report.latest)?;
    }

    Ok(())
}
