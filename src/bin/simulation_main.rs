// simulation_main.rs
use intersection_sync::simulation_engine::config::SimulationConfig;
use intersection_sync::simulation_engine::simulation::run_simulation;
use intersection_sync::SimulationError;
use std::path::PathBuf;
use std::process::ExitCode;

async fn run(config_path: Option<PathBuf>) -> Result<(), SimulationError> {
    let config = match config_path {
        Some(path) => SimulationConfig::from_json_file(&path)?,
        None => SimulationConfig::default(),
    };
    let report = run_simulation(config).await?;
    println!("{report}");
    report.ensure_safe()
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    match run(config_path).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            eprintln!("Simulation error: {e}");
            ExitCode::FAILURE
        }
    }
}
