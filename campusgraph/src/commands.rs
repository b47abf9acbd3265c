use crate::CLAP_STYLING;
use campusgraph::handlers::DEFAULT_CONFIG_PATH;
use clap::{arg, command};
use url::Url;

fn site_args(cmd: clap::Command) -> clap::Command {
    cmd.arg(
        arg!(-c --"config" <PATH>)
            .required(false)
            .help("JSON site configuration (see `campusgraph init`)")
            .value_parser(clap::value_parser!(std::path::PathBuf)),
    )
    .arg(
        arg!(--"root-url" <URL>)
            .required(false)
            .help("Listing page that links to every location")
            .value_parser(clap::value_parser!(Url)),
    )
    .arg(
        arg!(--"site-root" <URL>)
            .required(false)
            .help("Base for root-relative location links")
            .value_parser(clap::value_parser!(Url)),
    )
    .arg(
        arg!(--"timeout" <SECONDS>)
            .required(false)
            .help("Request timeout in seconds")
            .value_parser(clap::value_parser!(u64))
            .default_value("30"),
    )
}

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("campusgraph")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("campusgraph")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner and non-essential output").required(false))
        .arg(
            arg!(-v --"verbose" "Raise the log level (repeatable)")
                .required(false)
                .action(clap::ArgAction::Count),
        )
        .subcommand_required(false)
        .subcommand(
            command!("init")
                .about("Writes the default site configuration to your filesystem")
                .arg(
                    arg!([PATH])
                        .required(false)
                        .help("Where to store the configuration file")
                        .default_value(DEFAULT_CONFIG_PATH),
                )
                .arg(
                    arg!(-f - -"force")
                        .help("Overwrite an existing configuration file without asking")
                        .required(false),
                ),
        )
        .subcommand(site_args(
            command!("locations").about("List the locations found on the listing page"),
        ))
        .subcommand(site_args(
            command!("crawl")
                .about(
                    "Crawl every location, collect its modules and export the location/module \
                graph.",
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Write the export here (default: mentoring_graph.<format>, text goes to the screen)")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Export format: html, json, text")
                        .value_parser(["html", "json", "text"])
                        .default_value("html"),
                )
                .arg(
                    arg!(-t --"workers" <NUM_WORKERS>)
                        .required(false)
                        .help("Location pages fetched at the same time")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("1"),
                ),
        ))
}
