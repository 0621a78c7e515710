mod config;
mod main_lib;

use config::Config;
use main_lib::{init_tracing, run};

fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?.with_input_arg(std::env::args().nth(1));
    init_tracing();

    let report = run(&config)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
