// Command-line front end

use anyhow::{bail, Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use serde_json::{Map, Value};
use std::io::Write;
use std::path::Path;
use tracing::debug;

use crate::config::{OutputFormat, YmlSettings};
use crate::domain::template::{MergePolicy, ParameterMap, UriParams};
use crate::validation::{self, Mode};

pub fn build_cli() -> Command {
    let merge = Arg::new("merge")
        .long("merge")
        .value_name("POLICY")
        .value_parser(["last-wins", "restrictive"])
        .help("How to resolve a parameter used more than once");

    Command::new("uri-params")
        .version(concat!("v", env!("CARGO_PKG_VERSION")))
        .about("Infer which values the variables of a URI template accept")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("CONFIG")
                .global(true)
                .help("Path to a YAML settings file"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .global(true)
                .help("Log parsing decisions to stderr"),
        )
        .subcommand(
            Command::new("params")
                .about("Print the parameter map of a template")
                .arg(
                    Arg::new("template")
                        .required(true)
                        .help("The URI template, e.g. '/users/{id}{?fields*}'"),
                )
                .arg(
                    Arg::new("format")
                        .short('f')
                        .long("format")
                        .value_name("FORMAT")
                        .value_parser(["json", "yaml"])
                        .help("Output format"),
                )
                .arg(merge.clone()),
        )
        .subcommand(
            Command::new("check")
                .about("Check parameter values against a template")
                .arg(
                    Arg::new("template")
                        .help("The URI template; without it every name and value is accepted"),
                )
                .arg(
                    Arg::new("values")
                        .long("values")
                        .value_name("FILE")
                        .required(true)
                        .help("JSON or YAML file holding an object of parameter values"),
                )
                .arg(
                    Arg::new("strict")
                        .long("strict")
                        .action(ArgAction::SetTrue)
                        .conflicts_with("permissive")
                        .help("Only strings and numbers are single values"),
                )
                .arg(
                    Arg::new("permissive")
                        .long("permissive")
                        .action(ArgAction::SetTrue)
                        .help("Also accept booleans and null as single values"),
                )
                .arg(merge),
        )
}

pub fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };

    // A subscriber may already be installed (tests run in one process)
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Parse process arguments and run the selected subcommand
pub fn run() -> Result<()> {
    let matches = build_cli().get_matches();
    if let Some((_, submatches)) = matches.subcommand() {
        init_logging(submatches.get_flag("verbose"));
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    execute(&matches, &mut out)
}

pub fn execute(matches: &ArgMatches, out: &mut dyn Write) -> Result<()> {
    match matches.subcommand() {
        Some(("params", submatches)) => {
            let settings = load_settings(submatches)?;
            params_command(submatches, &settings, out)
        }
        Some(("check", submatches)) => {
            let settings = load_settings(submatches)?;
            check_command(submatches, &settings, out)
        }
        Some((name, _)) => bail!("Unknown subcommand: {}", name),
        None => bail!("No subcommand given, try '--help'"),
    }
}

fn load_settings(matches: &ArgMatches) -> Result<YmlSettings> {
    let path = matches.get_one::<String>("config").map(String::as_str);
    YmlSettings::load(path)
}

fn merge_policy(matches: &ArgMatches, settings: &YmlSettings) -> MergePolicy {
    match matches.get_one::<String>("merge").map(String::as_str) {
        Some("restrictive") => MergePolicy::Restrictive,
        Some(_) => MergePolicy::LastWins,
        None => settings.merge.unwrap_or_default(),
    }
}

fn params_command(
    matches: &ArgMatches,
    settings: &YmlSettings,
    out: &mut dyn Write,
) -> Result<()> {
    let template = matches
        .get_one::<String>("template")
        .context("Missing template argument")?;
    let policy = merge_policy(matches, settings);
    let format = match matches.get_one::<String>("format").map(String::as_str) {
        Some("yaml") => OutputFormat::Yaml,
        Some(_) => OutputFormat::Json,
        None => settings.format.unwrap_or_default(),
    };

    let params = ParameterMap::from_str_with(template, policy);
    debug!("inferred {} parameters from {:?}", params.len(), template);

    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &params)?;
            writeln!(out)?;
        }
        OutputFormat::Yaml => {
            // serde_yaml renders an empty map as "{}"
            write!(out, "{}", serde_yaml::to_string(&params)?)?;
        }
    }

    Ok(())
}

fn check_command(
    matches: &ArgMatches,
    settings: &YmlSettings,
    out: &mut dyn Write,
) -> Result<()> {
    let policy = merge_policy(matches, settings);
    let mode = if matches.get_flag("permissive") {
        Mode::Permissive
    } else if matches.get_flag("strict") {
        Mode::Strict
    } else {
        settings.mode.unwrap_or_default()
    };

    let params = match matches.get_one::<String>("template") {
        Some(template) => UriParams::infer_with(template, policy),
        None => UriParams::open(),
    };

    let values_path = matches
        .get_one::<String>("values")
        .context("Missing --values argument")?;
    let values = read_values(values_path)?;

    let violations = validation::collect_violations(&params, &values, mode);
    if violations.is_empty() {
        writeln!(out, "ok")?;
        return Ok(());
    }

    for violation in &violations {
        writeln!(out, "{}", violation)?;
    }
    bail!("{} invalid parameter value(s)", violations.len())
}

/// Read an object of parameter values from a JSON or YAML file
fn read_values(path: &str) -> Result<Map<String, Value>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Could not read values file {}", path))?;

    let is_json = Path::new(path)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let value: Value = if is_json {
        serde_json::from_str(&text).with_context(|| format!("Invalid values file {}", path))?
    } else {
        serde_yaml::from_str(&text).with_context(|| format!("Invalid values file {}", path))?
    };

    match value {
        Value::Object(values) => Ok(values),
        other => bail!(
            "Values file {} must hold an object of parameter values, found {}",
            path,
            other
        ),
    }
}
