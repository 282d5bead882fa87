//! Command-line front end for `ebnflint`.
//!
//! ```text
//! ebnflint <validate|analyze|report> [path] [--level L] [--depth D]
//!          [--config FILE] [--json] [--verbose]
//! ```
//!
//! Without a path (or with `-`), the grammar is read from stdin.
use ebnflint::{
    analyze_with, optimization_report, validate_with, AnalysisDepth, Config, LintError,
    ValidationLevel,
};
use facet::Facet;
use std::io::{self, Read};
use std::process::ExitCode;
use std::str::FromStr;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt::SubscriberBuilder;

#[derive(Facet, Debug)]
struct Args {
    /// One of `validate`, `analyze` or `report`.
    #[facet(positional)]
    command: String,

    /// Grammar file; stdin when absent.
    #[facet(positional, default)]
    path: Option<String>,

    /// Validation level: strict, moderate or lenient.
    #[facet(named, short = 'l', default)]
    level: Option<String>,

    /// Analysis depth: basic, detailed or comprehensive.
    #[facet(named, short = 'd', default)]
    depth: Option<String>,

    /// JSON file holding a full engine configuration.
    #[facet(named, short = 'c', default)]
    config: Option<String>,

    /// Print the result as JSON.
    #[facet(named, short = 'j', default)]
    json: bool,

    /// Log at debug level unless `RUST_LOG` says otherwise.
    #[facet(named, short = 'v', default)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy)]
enum Command {
    Validate,
    Analyze,
    Report,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "validate" => Ok(Command::Validate),
            "analyze" => Ok(Command::Analyze),
            "report" => Ok(Command::Report),
            other => Err(format!(
                "unknown command '{other}' (expected validate, analyze or report)"
            )),
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // an already-installed subscriber wins
    let _ = SubscriberBuilder::default()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

fn read_input(path: Option<&str>) -> Result<String, LintError> {
    match path {
        Some(path) if path != "-" => {
            std::fs::read_to_string(path).map_err(|e| LintError::from_io(path, e))
        }
        _ => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .map_err(|e| LintError::from_io("<stdin>", e))?;
            Ok(text)
        }
    }
}

fn load_config(path: Option<&str>) -> Result<Config, LintError> {
    match path {
        Some(path) => {
            let json = std::fs::read_to_string(path).map_err(|e| LintError::from_io(path, e))?;
            Config::from_json(&json)
        }
        None => Ok(Config::default()),
    }
}

fn fail(message: &dyn std::fmt::Display) -> ExitCode {
    eprintln!("ebnflint: {message}");
    ExitCode::from(2)
}

fn main() -> ExitCode {
    let args: Args = match facet_args::from_std_args() {
        Ok(args) => args,
        Err(e) => return fail(&e),
    };
    init_tracing(args.verbose);

    let command = match args.command.parse::<Command>() {
        Ok(command) => command,
        Err(e) => return fail(&e),
    };
    let config = match load_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => return fail(&e),
    };
    let text = match read_input(args.path.as_deref()) {
        Ok(text) => text,
        Err(e) => return fail(&e),
    };

    match command {
        Command::Validate => {
            let level = match args
                .level
                .as_deref()
                .map(str::parse::<ValidationLevel>)
                .transpose()
            {
                Ok(level) => level.unwrap_or_default(),
                Err(e) => return fail(&e),
            };
            run_validate(&text, level, &config, args.json)
        }
        Command::Analyze => {
            let depth = match args
                .depth
                .as_deref()
                .map(str::parse::<AnalysisDepth>)
                .transpose()
            {
                Ok(depth) => depth.unwrap_or_default(),
                Err(e) => return fail(&e),
            };
            run_analyze(&text, depth, &config, args.json)
        }
        Command::Report => run_report(&text, args.json),
    }
}

fn run_validate(text: &str, level: ValidationLevel, config: &Config, json: bool) -> ExitCode {
    let result = validate_with(text, level, config);
    if json {
        println!("{}", facet_json::to_string(&result));
    } else {
        println!("{result}");
        for error in &result.errors {
            println!("error: {error}");
        }
        for warning in &result.warnings {
            println!("warning: {warning}");
        }
        for suggestion in &result.suggestions {
            println!("suggestion: {suggestion}");
        }
    }
    if result.is_valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}

fn run_analyze(text: &str, depth: AnalysisDepth, config: &Config, json: bool) -> ExitCode {
    let result = analyze_with(text, depth, config);
    if json {
        println!("{}", facet_json::to_string(&result));
    } else if let Some(error) = &result.metadata.error {
        println!("error: {error}");
    } else {
        println!("{result}");
        for pattern in &result.patterns {
            println!("pattern: {} ({})", pattern.description, pattern.occurrences);
        }
        for suggestion in &result.optimization_suggestions {
            println!("suggestion: {suggestion}");
        }
    }
    if result.metadata.error.is_some() {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}

fn run_report(text: &str, json: bool) -> ExitCode {
    let report = optimization_report(text);
    if json {
        println!("{}", facet_json::to_string(&report));
    } else if let Some(error) = &report.error {
        println!("error: {error}");
    } else {
        println!("{report}");
        for pattern in &report.patterns {
            println!(
                "pattern: {} ({}, impact {:.1})",
                pattern.description, pattern.count, pattern.impact
            );
        }
        for suggestion in &report.suggestions {
            println!("suggestion: {suggestion}");
        }
    }
    if report.error.is_some() {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}
