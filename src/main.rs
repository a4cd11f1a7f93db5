mod autocomplete;
mod cli;
mod config;
mod importer;
mod init;
mod repl;

use std::{io, path::PathBuf};

use clap::Parser;

use cli::Commands;
use repl::Session;

// Use mimalloc for musl builds (musl's default malloc is very slow).
#[cfg(target_env = "musl")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

fn main() {
    init::init_logger();

    let cli = cli::Cli::parse();

    // Handle CLI flags.
    if let Some(cmd) = cli.command {
        match cmd {
            // Generate a new config file.
            Commands::NewConfig { path } => {
                match config::generate_sample(&path) {
                    Ok(_) => {
                        log::info!("config file generated: {}", path.display());
                    }
                    Err(e) => {
                        log::error!("error generating config: {}", e);
                        std::process::exit(1);
                    }
                }
                return;
            }
        }
    }

    // Load config. CLI flags take precedence.
    let config = init::init_config(&cli.config);
    let data_file = cli.file.clone().or_else(|| {
        if config.app.data_file.is_empty() {
            None
        } else {
            Some(PathBuf::from(&config.app.data_file))
        }
    });
    let save_on_exit = cli.save_on_exit || config.app.save_on_exit;

    let index = init::init_index(data_file.as_deref());
    if !index.is_empty() {
        log::info!("index ready with {} words", index.len());
    }

    let mut session = Session::new(index);
    let stdin = io::stdin();
    if let Err(e) = session.run(stdin.lock(), io::stdout().lock()) {
        log::error!("error running session: {}", e);
        std::process::exit(1);
    }

    if save_on_exit {
        let Some(path) = data_file else {
            log::warn!("save on exit is set but there is no data file to save to");
            return;
        };
        if let Err(e) = importer::save_csv(&path, session.index()) {
            log::error!("error saving {}: {}", path.display(), e);
            std::process::exit(1);
        }
    }
}
