use std::{fs, path::PathBuf};

use clap::Parser;
use cli::{Args, Commands};
use error::{ErrorContext, SkiffResult};
use logging::setup_logging;
use remote::{handle_remote, ListOptions};
use skiff_config::config::{config_path, generate_default_config, set_config_path, Config};
use skiff_registry::Registry;
use skiff_utils::path::resolve_path;
use tracing::{debug, info, warn};
use utils::set_color;

mod cli;
mod error;
mod logging;
mod remote;
mod utils;

fn registry_path(override_path: Option<&str>, config: &Config) -> SkiffResult<PathBuf> {
    match override_path {
        Some(path) => Ok(resolve_path(path)?),
        None => Ok(config.get_registry_path()?),
    }
}

fn print_config() -> SkiffResult<()> {
    let config_path = config_path();
    let content = match fs::read_to_string(&config_path) {
        Ok(v) => v,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            warn!("Config file {} not found", config_path.display());
            toml::to_string_pretty(&Config::default_config())?
        }
        Err(err) => {
            return Err(err)
                .with_context(|| format!("reading config {}", config_path.display()));
        }
    };
    info!("{}", content.trim_end());
    Ok(())
}

fn handle_cli() -> SkiffResult<()> {
    let args = Args::parse();

    setup_logging(&args);

    if let Some(ref c) = args.config {
        set_config_path(resolve_path(c)?);
    }

    match args.command {
        Commands::DefConfig => {
            let path = generate_default_config()?;
            info!(
                "Default configuration file generated at: {}",
                path.display()
            );
        }
        command => {
            let config = Config::new()?;
            set_color(!args.no_color && config.display().colors());
            let registry_override = args.registry.as_deref();

            match command {
                Commands::Remote {
                    action,
                } => {
                    let path = registry_path(registry_override, &config)?;
                    debug!("using registry {}", path.display());

                    let mut registry = Registry::open(&path)?;
                    let options = ListOptions {
                        json: args.json,
                        mark_default: config.display().mark_default(),
                    };
                    handle_remote(&mut registry, action, options)?;

                    if registry.persist()? {
                        debug!("registry written to {}", path.display());
                    }
                }
                Commands::Env => {
                    info!("SKIFF_CONFIG={}", config_path().display());
                    info!("SKIFF_ROOT={}", config.get_root_path()?.display());
                    info!(
                        "SKIFF_REGISTRY={}",
                        registry_path(registry_override, &config)?.display()
                    );
                }
                Commands::Config => print_config()?,
                Commands::DefConfig => unreachable!(),
            }
        }
    }

    Ok(())
}

fn main() {
    // Install miette's fancy error handler
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .build(),
        )
    }))
    .ok();

    if let Err(err) = handle_cli() {
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(1);
    }
}
