use clap::Subcommand;
use quizstreak_core::storage::Config;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value by dot-separated key
    Get { key: String },
    /// Set a config value
    Set { key: String, value: String },
    /// List the full config as TOML
    List,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let cfg = Config::load_or_default();
            match cfg.get(&key) {
                Some(value) => println!("{value}"),
                None => {
                    eprintln!("unknown config key: {key}");
                    std::process::exit(1);
                }
            }
        }
        ConfigAction::Set { key, value } => {
            let mut cfg = Config::load_or_default();
            cfg.set(&key, &value)?;
            println!("{key} = {value}");
        }
        ConfigAction::List => {
            let cfg = Config::load_or_default();
            print!("{}", toml::to_string_pretty(&cfg)?);
        }
    }
    Ok(())
}
