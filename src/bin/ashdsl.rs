//! Command-line interface for ashdsl
//!
//! Usage:
//!   ashdsl parse `<path>` [--strategy `<strategy>`] [--format `<format>`] [--positions]
//!   ashdsl list-configs              - List the built-in module configurations
//!   ashdsl check-atom `<text>`         - Exit 0 when the text is a valid atom literal
//!   ashdsl tokens `<path>`             - Dump the grammar tokens of a file
//!
//! Settings are read from `ashdsl.toml` in the working directory when present,
//! then from `--config <file>`. Flags override both.

use ashdsl::ash::config::{get_all_available_configurations, ModuleRegistry};
use ashdsl::ash::formats::FormatRegistry;
use ashdsl::ash::grammar::{parse_atom_literal, tokenize_with_spans};
use ashdsl::ash::parsers::ParserRegistry;
use ashdsl::ash::settings::{Loader, Settings, SettingsError};
use clap::{Arg, ArgAction, ArgMatches, Command};
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn main() {
    let matches = Command::new("ashdsl")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Structural parser for Ash framework DSL modules")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .help("Settings file layered over the defaults"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::Count)
                .help("Log more (-v debug, -vv trace)"),
        )
        .subcommand(
            Command::new("parse")
                .about("Parse a file and print its sections")
                .arg(
                    Arg::new("path")
                        .help("Path to the source file")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("strategy")
                        .long("strategy")
                        .short('s')
                        .value_parser(["auto", "config", "simple", "grammar"])
                        .help("Parsing strategy (default from settings)"),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .value_parser(["outline", "json", "yaml"])
                        .help("Output format (default from settings)"),
                )
                .arg(
                    Arg::new("positions")
                        .long("positions")
                        .action(ArgAction::SetTrue)
                        .help("Show node positions in the outline"),
                ),
        )
        .subcommand(Command::new("list-configs").about("List the built-in module configurations"))
        .subcommand(
            Command::new("check-atom")
                .about("Check whether text is a valid atom literal")
                .arg(Arg::new("text").required(true).allow_hyphen_values(true).index(1)),
        )
        .subcommand(
            Command::new("tokens")
                .about("Print the grammar tokens of a file")
                .arg(Arg::new("path").required(true).index(1)),
        )
        .get_matches();

    let settings = load_settings(&matches).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(2);
    });
    init_logging(&settings, matches.get_count("verbose"));

    match matches.subcommand() {
        Some(("parse", parse_matches)) => {
            let path = parse_matches.get_one::<String>("path").unwrap();
            handle_parse_command(path, &settings);
        }
        Some(("list-configs", _)) => handle_list_configs_command(),
        Some(("check-atom", atom_matches)) => {
            let text = atom_matches.get_one::<String>("text").unwrap();
            handle_check_atom_command(text);
        }
        Some(("tokens", tokens_matches)) => {
            let path = tokens_matches.get_one::<String>("path").unwrap();
            handle_tokens_command(path);
        }
        _ => unreachable!(),
    }
}

fn load_settings(matches: &ArgMatches) -> Result<Settings, SettingsError> {
    let mut loader = Loader::new().with_local_settings(".");
    if let Some(path) = matches.get_one::<String>("config") {
        loader = loader.with_settings_file(path);
    }
    if let Some(("parse", parse_matches)) = matches.subcommand() {
        if let Some(strategy) = parse_matches.get_one::<String>("strategy") {
            loader = loader.with_strategy(strategy)?;
        }
        if let Some(format) = parse_matches.get_one::<String>("format") {
            loader = loader.with_format(format)?;
        }
        if parse_matches.get_flag("positions") {
            loader = loader.with_positions()?;
        }
    }
    loader.build()
}

fn init_logging(settings: &Settings, verbosity: u8) {
    let directive = settings.logging.directive(verbosity);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Handle the parse command
fn handle_parse_command(path: &str, settings: &Settings) {
    let source = read_source(path);
    let strategy = settings.parser.strategy.as_str();
    let format = settings.output.format.as_str();
    debug!(path, strategy, format, "parsing");

    let parsers = ParserRegistry::with_defaults(ModuleRegistry::shared());
    let result = parsers.parse(strategy, &source).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        eprintln!("Available strategies: {}", parsers.available().join(", "));
        std::process::exit(1);
    });
    debug!(
        parser = %result.parser_name,
        sections = result.sections.len(),
        nodes = result.node_count(),
        "parsed"
    );

    let formats = FormatRegistry::with_defaults(settings.output.show_positions);
    let output = formats.serialize(&result, format).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        eprintln!("Available formats: {}", formats.available().join(", "));
        std::process::exit(1);
    });
    print!("{}", output);
    if !output.ends_with('\n') {
        println!();
    }
}

/// Handle the list-configs command
fn handle_list_configs_command() {
    println!("Available module configurations:\n");
    for configuration in get_all_available_configurations() {
        let kind = configuration
            .kind
            .map(|k| format!(" [{}]", k))
            .unwrap_or_default();
        println!("  {}{}", configuration.declaration_pattern, kind);
        println!(
            "    {} ({} sections)",
            configuration.display_name,
            configuration.sections.len()
        );
    }
}

/// Handle the check-atom command
fn handle_check_atom_command(text: &str) {
    let text = text.trim();
    match parse_atom_literal(text) {
        Ok(nodes) if !nodes.is_empty() => println!("{}: valid atom", text),
        Ok(_) => {
            println!("{}: not an atom", text);
            std::process::exit(1);
        }
        Err(e) => {
            println!("{}: not an atom ({})", text, e);
            std::process::exit(1);
        }
    }
}

/// Handle the tokens command
fn handle_tokens_command(path: &str) {
    let source = read_source(path);
    let tokens = tokenize_with_spans(&source).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });
    for (token, span) in tokens {
        let text = source.get(span.clone()).unwrap_or_default();
        println!("{:>6}..{:<6} {:<16} {:?}", span.start, span.end, token.kind(), text);
    }
}
