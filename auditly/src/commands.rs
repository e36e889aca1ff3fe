use crate::CLAP_STYLING;
use auditly_core::config::DEFAULT_CONFIG_PATH;
use clap::{Arg, arg, command};

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("auditly")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("auditly")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner and non-essential output").required(false))
        .subcommand_required(false)
        .subcommand(
            command!("init")
                .about("Writes a default auditly configuration file")
                .arg(
                    arg!([PATH])
                        .required(false)
                        .help("Where to write the configuration file")
                        .default_value(DEFAULT_CONFIG_PATH),
                )
                .arg(
                    arg!(-f --"force")
                        .help("Overwrite an existing configuration file without asking.")
                        .required(false),
                ),
        )
        .subcommand(
            command!("audit")
                .about("Audit a single website and print the report")
                .arg(
                    arg!(<URL>)
                        .required(true)
                        .help("The website to audit, e.g. https://example.com"),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Report format: text, json, markdown")
                        .value_parser(["text", "json", "markdown", "md"])
                        .default_value("text"),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Save the report to a file (default: display to screen)")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                )
                .arg(
                    arg!(--"pdf")
                        .required(false)
                        .help("Also export the report as auditly-report.pdf")
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(
                    arg!(-v --"verbose")
                        .required(false)
                        .help("Log request details to stderr")
                        .action(clap::ArgAction::SetTrue),
                )
                .args(config_args()),
        )
        .subcommand(
            command!("ui")
                .about("Launch the interactive terminal UI")
                .args(config_args()),
        )
}

/// Flags shared by every command that talks to the audit service.
fn config_args() -> Vec<Arg> {
    vec![
        arg!(-c --"config" <PATH>)
            .required(false)
            .help("Path to a configuration file (default: ~/.config/auditly/config.json)"),
        arg!(-e --"endpoint" <URL>)
            .required(false)
            .help("Audit service endpoint, e.g. http://localhost:5000/api/audit"),
        arg!(-p --"policy" <POLICY>)
            .required(false)
            .help("Scoring policy: standard, extended")
            .value_parser(["standard", "extended"]),
        arg!(-d --"output-dir" <DIR>)
            .required(false)
            .help("Directory the PDF export is written to"),
    ]
}
