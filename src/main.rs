// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

extern crate bandbrot;
extern crate clap;
extern crate env_logger;
extern crate num_cpus;

use bandbrot::config::{HEIGHT, OUTPUT as DEFAULT_OUTPUT};
use bandbrot::{RemainderPolicy, RunConfig};
use clap::{App, Arg, ArgMatches};
use std::path::PathBuf;
use std::str::FromStr;

fn validate_range<T: FromStr + Ord>(
    s: &str,
    low: T,
    high: T,
    isnotanumber_err: &str,
    isnotinrange_err: &str,
) -> Result<(), String> {
    match T::from_str(s) {
        Ok(i) => {
            if i >= low && i <= high {
                Ok(())
            } else {
                Err(isnotinrange_err.to_string())
            }
        }
        Err(_) => Err(isnotanumber_err.to_string()),
    }
}

const OUTPUT: &str = "output";
const WORKERS: &str = "workers";
const THREADS: &str = "threads";
const REMAINDER: &str = "remainder";
const VERBOSE: &str = "verbose";

// Every worker owns at least one row.
const MAX_WORKERS: usize = HEIGHT;

fn args<'a>() -> ArgMatches<'a> {
    let max_threads = num_cpus::get();

    App::new("bandbrot")
        .version("0.1.0")
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Renders an 800x800 Mandelbrot set in bands across a group of workers")
        .arg(
            Arg::with_name(OUTPUT)
                .required(false)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .default_value(DEFAULT_OUTPUT)
                .help("Output file"),
        )
        .arg(
            Arg::with_name(WORKERS)
                .required(false)
                .long(WORKERS)
                .short("n")
                .takes_value(true)
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        MAX_WORKERS,
                        "Could not parse worker count",
                        &format!("Worker count must be between 1 and {}", MAX_WORKERS),
                    )
                })
                .help("Number of workers, each rendering one band (default: one per CPU)"),
        )
        .arg(
            Arg::with_name(THREADS)
                .required(false)
                .long(THREADS)
                .short("t")
                .takes_value(true)
                .default_value("1")
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        max_threads,
                        "Could not parse thread count",
                        &format!("Thread count must be between 1 and {}", max_threads),
                    )
                })
                .help("Number of threads each worker uses inside its band"),
        )
        .arg(
            Arg::with_name(REMAINDER)
                .required(false)
                .long(REMAINDER)
                .short("r")
                .takes_value(true)
                .possible_values(RemainderPolicy::NAMES)
                .default_value("last-worker")
                .help("What to do with rows left over when the height does not divide evenly"),
        )
        .arg(
            Arg::with_name(VERBOSE)
                .long(VERBOSE)
                .short("v")
                .multiple(true)
                .help("Log more; repeat for more detail"),
        )
        .get_matches()
}

fn init_logging(verbosity: u64) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn config(matches: &ArgMatches) -> Result<RunConfig, String> {
    let mut config = RunConfig::default();
    if let Some(workers) = matches.value_of(WORKERS) {
        config.workers = usize::from_str(workers).map_err(|e| e.to_string())?;
    }
    if let Some(threads) = matches.value_of(THREADS) {
        config.threads = usize::from_str(threads).map_err(|e| e.to_string())?;
    }
    if let Some(remainder) = matches.value_of(REMAINDER) {
        config.remainder = RemainderPolicy::from_str(remainder)?;
    }
    if let Some(output) = matches.value_of(OUTPUT) {
        config.output = PathBuf::from(output);
    }
    Ok(config)
}

fn main() {
    let matches = args();
    init_logging(matches.occurrences_of(VERBOSE));

    let config = match config(&matches) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration failure: {}", e);
            std::process::exit(1);
        }
    };

    match bandbrot::run(&config) {
        Err(e) => {
            eprintln!("Render failure: {}", e);
            std::process::exit(1);
        }
        Ok(timings) => println!("{}", timings),
    }
}
