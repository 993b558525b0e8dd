use std::{
    fs,
    io::{self, BufRead, Write},
};

use clap::Parser as ClapParser;
use ravel::{
    config::Config,
    interpreter::{evaluator::core::Context, parser::core::Parser, value::core::Value},
};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// ravel is an interpreter for a small APL-like array language with exact
/// arithmetic.
#[derive(ClapParser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Evaluate this text instead of reading a file or standard input.
    #[arg(short, long, conflicts_with = "file")]
    expr: Option<String>,

    /// Run the program in this file.
    #[arg(short, long)]
    file: Option<String>,

    /// Index origin, 0 or 1.
    #[arg(long, default_value_t = ravel::config::DEFAULT_ORIGIN,
          value_parser = clap::value_parser!(i64).range(0..=1))]
    origin: i64,

    /// Significant digits kept by float results.
    #[arg(long, default_value_t = ravel::config::DEFAULT_FLOAT_PRECISION,
          value_parser = clap::value_parser!(u64).range(1..=ravel::config::MAX_FLOAT_PRECISION))]
    prec: u64,

    /// Debug toggles to switch on: `parse`, `tokens`.
    #[arg(long, value_parser = ["parse", "tokens"])]
    debug: Vec<String>,
}

fn main() {
    init_tracing();
    let args = Args::parse();

    let mut config = Config { origin: args.origin,
                              float_precision: args.prec,
                              ..Config::default() };
    for name in &args.debug {
        config.debug.toggle(name);
    }
    let mut context = Context::with_config(config);

    let source = match (&args.expr, &args.file) {
        (Some(expr), _) => expr.clone(),
        (None, Some(path)) => fs::read_to_string(path).unwrap_or_else(|_| {
                                  eprintln!("Failed to read the input file '{path}'. Perhaps this file does not exist?");
                                  std::process::exit(1);
                              }),
        (None, None) => {
            repl(&mut context);
            return;
        },
    };

    if !run_source(&source, &mut context) {
        std::process::exit(1);
    }
}

/// Runs every line, printing results and reporting errors as it goes.
///
/// Returns `false` if any line failed.
fn run_source(source: &str, context: &mut Context) -> bool {
    let mut parser = Parser::new(source);
    let mut ok = true;
    while let Some(result) = parser.line(context) {
        match result {
            Ok(values) => print_values(&values, context),
            Err(e) => {
                eprintln!("{e}");
                ok = false;
            },
        }
    }
    ok
}

/// Reads lines from standard input until it closes.
///
/// A line ending in a backslash continues on the next one.
fn repl(context: &mut Context) {
    let stdin = io::stdin();
    let mut pending = String::new();
    prompt(&pending);

    for line in stdin.lock().lines() {
        let Ok(line) = line else {
            break;
        };
        pending.push_str(&line);
        pending.push('\n');
        if line.ends_with('\\') {
            prompt(&pending);
            continue;
        }
        run_source(&pending, context);
        pending.clear();
        prompt(&pending);
    }
}

fn prompt(pending: &str) {
    print!("{}", if pending.is_empty() { "      " } else { "    > " });
    let _ = io::stdout().flush();
}

fn print_values(values: &[Value], context: &Context) {
    for value in values {
        println!("{}", value.sprint(&context.config));
    }
}

/// Sends log events to standard error.
///
/// `RUST_LOG` selects what is shown; without it only the output of the
/// `parse` and `tokens` debug toggles appears.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("ravel::parse=info,ravel::tokens=info"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr).with_target(false).without_time())
        .with(filter)
        .init();
}
