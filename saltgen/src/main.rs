//! Small CLI around the salt generator. Errors are reported once and the
//! process exits non-zero; nothing is retried except by `batch`.

use std::env;
use std::process::ExitCode;

use saltgen::batch::issue_batch;
use saltgen::config::{load_from_env, SaltConfig};
use saltgen::logging::setup_tracing;
use saltgen::pattern::validate_candidate;
use saltgen::{RandomSource, RngSource, SaltGenerator};
use serde_json::json;

fn print_usage() {
    eprintln!(
        "Commands:\n  (none)  generate one salt of the configured length\n  \
         generate <length>\n  batch <length> <count>\n  check <candidate>\n  \
         show-config\nConfig file: $SALTGEN_CONFIG (JSON)"
    );
}

fn parse_arg<T: std::str::FromStr>(value: &str, name: &str) -> Option<T> {
    match value.parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            eprintln!("invalid {name}: {value}");
            None
        }
    }
}

fn main() -> ExitCode {
    let config = match load_from_env() {
        Ok(cfg) => cfg,
        Err(err) => {
            eprintln!("config load failed: {err}");
            return ExitCode::FAILURE;
        }
    };
    setup_tracing(config.log_filter.as_deref());

    let args: Vec<String> = env::args().collect();
    match config.seed {
        Some(seed) => {
            tracing::info!(seed, "using seeded random source");
            run(&args, &config, SaltGenerator::new(RngSource::seeded(seed)))
        }
        None => run(&args, &config, SaltGenerator::new(RngSource::from_entropy())),
    }
}

fn run<R: RandomSource>(
    args: &[String],
    config: &SaltConfig,
    mut generator: SaltGenerator<R>,
) -> ExitCode {
    if args.len() < 2 {
        return generate(&mut generator, config.length);
    }

    match args[1].as_str() {
        "generate" => {
            if args.len() != 3 {
                print_usage();
                return ExitCode::FAILURE;
            }
            match parse_arg(&args[2], "length") {
                Some(length) => generate(&mut generator, length),
                None => ExitCode::FAILURE,
            }
        }
        "batch" => {
            if args.len() != 4 {
                print_usage();
                return ExitCode::FAILURE;
            }
            let (Some(length), Some(count)) = (
                parse_arg::<i64>(&args[2], "length"),
                parse_arg::<usize>(&args[3], "count"),
            ) else {
                return ExitCode::FAILURE;
            };
            match issue_batch(&mut generator, length, count, config.max_attempts) {
                Ok(salts) => print_json(&json!({ "length": length, "salts": salts })),
                Err(err) => {
                    eprintln!("batch generation failed: {err}");
                    ExitCode::FAILURE
                }
            }
        }
        "check" => {
            if args.len() != 3 {
                print_usage();
                return ExitCode::FAILURE;
            }
            match validate_candidate(&args[2]) {
                Ok(()) => {
                    println!("ok");
                    ExitCode::SUCCESS
                }
                Err(violation) => {
                    println!("rejected: {violation}");
                    ExitCode::FAILURE
                }
            }
        }
        "show-config" => print_json(&json!(config)),
        _ => {
            print_usage();
            ExitCode::FAILURE
        }
    }
}

fn generate<R: RandomSource>(generator: &mut SaltGenerator<R>, length: i64) -> ExitCode {
    match generator.generate_salt(length) {
        Ok(salt) => {
            println!("Generated Salt: {salt}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Error generating salt: {err}");
            ExitCode::FAILURE
        }
    }
}

fn print_json(value: &serde_json::Value) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(text) => {
            println!("{text}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("output encoding failed: {err}");
            ExitCode::FAILURE
        }
    }
}
