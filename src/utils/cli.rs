use clap::Parser;

/// Arguments shared by the `approve`, `mint` and `dashboard` binaries.
/// Everything else comes from the config file and `CLAWP_*` variables.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Overrides the built-in defaults (RON, TOML, JSON or YAML)
    #[arg(long)]
    pub config_file: Option<String>,
}
