use std::path::{Path, PathBuf};

use crate::{autocomplete::PrefixIndex, config, importer};

/// Initialize logger. Logs go to stderr so stdout carries only command output.
pub fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_env("RUST_LOG")
        .format(|buf, record| {
            use std::io::Write;
            let level = if record.level() != log::Level::Info {
                format!("[{}] ", record.level())
            } else {
                String::new()
            };
            writeln!(
                buf,
                "{} {}:{} {}{}",
                chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f"),
                record.file().unwrap_or("unknown"),
                record.line().unwrap_or(0),
                level,
                record.args()
            )
        })
        .init();
}

/// Load and merge config files, exiting on error.
pub fn init_config(paths: &[PathBuf]) -> config::Config {
    match config::load_all(paths) {
        Ok(c) => c,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    }
}

/// Build the startup index: empty, or loaded from the data file if one is set.
pub fn init_index(data_file: Option<&Path>) -> PrefixIndex {
    let path = match data_file {
        Some(p) => p,
        None => {
            log::info!("no data file configured. starting with an empty index");
            return PrefixIndex::new();
        }
    };

    match importer::load_csv(path) {
        Ok(index) => index,
        Err(e) => {
            log::error!("error loading {}: {}", path.display(), e);
            std::process::exit(1);
        }
    }
}
