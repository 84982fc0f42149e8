use std::error::Error;

use tracing::{debug, error};

use agent_synthesis::cli::{render, Cli};
use agent_synthesis::config::SynthesizerConfig;

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::init();

    let config = SynthesizerConfig::load(cli.config_path())?;
    // init logging singleton
    config.log.try_init()?;
    debug!(images = ?config.images, "synthesizer config loaded");

    let agent = cli.read_agent()?;
    match render(&agent, cli.component(), &config.images) {
        Ok(output) => {
            print!("{output}");
            Ok(())
        }
        Err(err) => {
            error!("synthesis failed: {}", err);
            Err(err.into())
        }
    }
}
