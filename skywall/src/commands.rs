use crate::CLAP_STYLING;
use clap::{arg, command};

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("skywall")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("skywall")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner and non-essential output").required(false))
        .subcommand_required(false)
        .subcommand(
            command!("init")
                .about("Initializes the skywall cache directory and status database")
                .arg(
                    arg!([PATH])
                        .required(false)
                        .help("Location of the cache root")
                        .default_value("~/.cache/skywall/"),
                )
                .arg(
                    arg!(-f - -"force")
                        .help(
                            "Forces the overwriting of any existing status database at the \
                        specified location.",
                        )
                        .required(false),
                ),
        )
        .subcommand(
            command!("classify")
                .about(
                    "Walk the archive index, fetch each day page through the cache and \
                classify it. Overwrites the persisted status maps.",
                )
                .arg(
                    arg!(--"full")
                        .required(false)
                        .help("Use the complete historical archive index instead of the recent one")
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(
                    arg!(-t --"threads" <NUM_WORKERS>)
                        .required(false)
                        .help("The number of async worker 'threads' in the worker pool.")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("1"),
                )
                .arg(
                    arg!(-c --"cache-dir" <PATH>)
                        .required(false)
                        .help("Cache root directory")
                        .default_value("~/.cache/skywall/"),
                )
                .arg(
                    arg!(--"timeout" <SECONDS>)
                        .required(false)
                        .help("Per-fetch timeout in seconds")
                        .value_parser(clap::value_parser!(u64))
                        .default_value("10"),
                ),
        )
        .subcommand(
            command!("list")
                .about("List the pages recorded with a given status")
                .arg(
                    arg!(-s --"status" <STATUS>)
                        .required(true)
                        .help("Status name, e.g. OK, OLD, HORIZONTAL, ERROR"),
                )
                .arg(
                    arg!(-c --"cache-dir" <PATH>)
                        .required(false)
                        .help("Cache root directory")
                        .default_value("~/.cache/skywall/"),
                ),
        )
        .subcommand(
            command!("download")
                .about("Download the image of every OK page into the image directory")
                .arg(
                    arg!(--"overwrite")
                        .required(false)
                        .help("Re-download images that already exist on disk")
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(
                    arg!(-c --"cache-dir" <PATH>)
                        .required(false)
                        .help("Cache root directory")
                        .default_value("~/.cache/skywall/"),
                )
                .arg(
                    arg!(--"timeout" <SECONDS>)
                        .required(false)
                        .help("Per-fetch timeout in seconds")
                        .value_parser(clap::value_parser!(u64))
                        .default_value("10"),
                ),
        )
        .subcommand(
            command!("report")
                .about("Generate a report from the last classification run")
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Report format: text, json")
                        .value_parser(["text", "json"])
                        .default_value("text"),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Save report to file (default: display to screen)")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                )
                .arg(
                    arg!(-c --"cache-dir" <PATH>)
                        .required(false)
                        .help("Cache root directory")
                        .default_value("~/.cache/skywall/"),
                ),
        )
}
