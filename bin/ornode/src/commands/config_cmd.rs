//! CLI command to show configs.

use clap::Parser;
use eyre::WrapErr;
use ornode_config::Config;
use std::path::PathBuf;

/// `ornode config` command
#[derive(Debug, Parser)]
pub struct Command {
    /// The path to the configuration file to show. Prints the defaults without it.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

impl Command {
    /// Execute `config` command
    pub fn execute(&self) -> eyre::Result<()> {
        let config = match &self.config {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .wrap_err_with(|| format!("could not read config file {}", path.display()))?;
                toml::from_str::<Config>(&raw).wrap_err("could not parse config file")?
            }
            None => Config::default(),
        };
        println!("{}", config.to_toml()?);
        Ok(())
    }
}
