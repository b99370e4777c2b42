use clap::{Arg, ArgAction, Command};
use colored::*;
use std::process;

use netfacts::{
    config::CollectorConfig,
    engine::{DeviceReport, FactEngine},
    output::{OutputConfig, OutputFormat, OutputManager},
    utils::Logger,
};

fn build_cli() -> Command {
    Command::new("netfacts")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Collect SNMP interface and identity facts from network devices")
        .arg(
            Arg::new("targets")
                .value_name("TARGET")
                .help("Hosts to collect from")
                .required(true)
                .num_args(1..),
        )
        .arg(
            Arg::new("community")
                .short('c')
                .long("community")
                .value_name("COMMUNITY")
                .help("SNMP v1/v2c community string"),
        )
        .arg(
            Arg::new("timeout")
                .short('t')
                .long("timeout")
                .value_name("SECONDS")
                .help("Per-request SNMP timeout")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new("workers")
                .long("workers")
                .value_name("COUNT")
                .help("Concurrent subtree walks per host (1-4)")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("FILE")
                .help("TOML configuration file (default: ~/.netfacts.toml)"),
        )
        .arg(
            Arg::new("detect-platform")
                .long("detect-platform")
                .help("Identify the CLI platform over SSH")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("ssh-user")
                .long("ssh-user")
                .value_name("USER")
                .help("SSH username for platform detection (password via NETFACTS_SSH_PASSWORD)"),
        )
        .arg(
            Arg::new("format")
                .short('f')
                .long("format")
                .value_name("FORMAT")
                .help("Output format")
                .value_parser(["text", "json", "csv"])
                .default_value("text"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .help("Write output to file"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Increase log verbosity (-v info, -vv debug)")
                .action(ArgAction::Count),
        )
        .arg(
            Arg::new("no-color")
                .long("no-color")
                .help("Disable colored output")
                .action(ArgAction::SetTrue),
        )
}

fn load_config(matches: &clap::ArgMatches) -> anyhow::Result<CollectorConfig> {
    let mut config = match matches.get_one::<String>("config") {
        Some(path) => CollectorConfig::from_toml_file(path)?,
        None => CollectorConfig::load_default_config(),
    };

    if let Some(community) = matches.get_one::<String>("community") {
        config = config.with_community(community.clone());
    }
    if let Some(timeout) = matches.get_one::<u64>("timeout") {
        config = config.with_timeout(*timeout);
    }
    if let Some(workers) = matches.get_one::<usize>("workers") {
        config = config.with_max_concurrent_walks(*workers);
    }
    if let Some(user) = matches.get_one::<String>("ssh-user") {
        let password = config.autodetect.password.clone();
        config = config.with_ssh_credentials(user.clone(), password);
    }
    if matches.get_flag("detect-platform") {
        config.autodetect.enabled = true;
    }

    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = build_cli().get_matches();

    Logger::init(Logger::level_for(matches.get_count("verbose")));

    let no_color = matches.get_flag("no-color");
    if no_color {
        colored::control::set_override(false);
    }

    let config = match load_config(&matches) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", "[!] Configuration error:".bright_red(), e);
            process::exit(2);
        }
    };

    let format = matches
        .get_one::<String>("format")
        .map(String::as_str)
        .unwrap_or("text")
        .parse::<OutputFormat>()
        .map_err(anyhow::Error::msg)?;

    let output = OutputManager::new(OutputConfig {
        format,
        file: matches.get_one::<String>("output").cloned(),
        colored: !no_color && format == OutputFormat::Text,
    });

    let engine = FactEngine::new(config);
    let targets: Vec<String> = matches
        .get_many::<String>("targets")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();

    let mut reports: Vec<DeviceReport> = Vec::with_capacity(targets.len());
    for target in &targets {
        match engine.run(target).await {
            Ok(report) => reports.push(report),
            Err(e) => eprintln!("{} {}: {}", "[!]".bright_red(), target.bright_yellow(), e),
        }
    }

    output.write_reports(&reports)?;

    if reports.is_empty() {
        process::exit(1);
    }
    Ok(())
}
