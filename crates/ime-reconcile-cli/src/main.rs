use anyhow::Result;
use ime_reconcile_cli::{Scenario, replay, resolve_strategy};
use ime_reconcile_config::Config;
use ime_reconcile_engine::Strategy;
use std::{env, path::PathBuf, process};

fn usage(program: &str) -> ! {
    eprintln!("Usage: {program} <scenario.toml> [--strategy <name>]");
    eprintln!(
        "Strategies: {}, {}",
        Strategy::DiffGuardedBackwardDelete,
        Strategy::GenericRangeReplace
    );
    process::exit(1);
}

fn main() -> Result<()> {
    let config = match Config::load() {
        Ok(config) => config.unwrap_or_default(),
        Err(e) => {
            eprintln!("Warning: ignoring config file: {e}");
            Config::default()
        }
    };

    env_logger::Builder::from_default_env()
        .filter_level(config.log_level_filter())
        .init();

    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("ime-reconcile-cli");

    let (scenario_path, strategy_flag) = match args.as_slice() {
        [_, path] => (PathBuf::from(path), None),
        [_, path, flag, name] if flag == "--strategy" => match name.parse::<Strategy>() {
            Ok(strategy) => (PathBuf::from(path), Some(strategy)),
            Err(e) => {
                eprintln!("Error: {e}");
                usage(program);
            }
        },
        _ => usage(program),
    };

    let scenario = match Scenario::load(&scenario_path) {
        Ok(scenario) => scenario,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    let strategy = resolve_strategy(strategy_flag, scenario.strategy, &config);
    log::info!(
        "Replaying {} with {strategy}",
        scenario_path.display()
    );

    println!("{}", replay(&scenario, strategy).render());
    Ok(())
}
