use std::{env, error::Error, fs, path::PathBuf};

use log::info;
use orchestrator::{configs, train};

const DEFAULT_CONFIG: &str = "config.json";

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let path = PathBuf::from(env::var("CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG.to_string()));
    let training = configs::load(&path)?;
    info!("loaded config from {}", path.display());

    let model = train(&training)?;
    let json = serde_json::to_string_pretty(&model)?;

    match env::var("OUTPUT") {
        Ok(output) => {
            fs::write(&output, json)?;
            info!("model written to {output}");
        }
        Err(_) => println!("{json}"),
    }

    Ok(())
}
