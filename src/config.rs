use std::path::{Path, PathBuf};

use serde::Deserialize;

const SAMPLE_CONFIG: &str = include_str!("../config.sample.toml");

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub app: AppConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// CSV file of `word,frequency` rows loaded at startup.
    #[serde(default)]
    pub data_file: String,

    /// Write the index back to `data_file` on exit.
    #[serde(default)]
    pub save_on_exit: bool,
}

/// Load and merge one or more config files. No files yields the defaults.
pub fn load_all(paths: &[PathBuf]) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = Config::default();

    for path in paths {
        log::info!("loading config: {}", path.display());
        let c = read_file(path)
            .map_err(|e| format!("error loading config {}: {}", path.display(), e))?;
        merge(&mut config, c);
    }

    Ok(config)
}

/// Generate sample config file.
pub fn generate_sample(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if path.exists() {
        return Err("config file already exists".into());
    }
    std::fs::write(path, SAMPLE_CONFIG)?;
    Ok(())
}

/// Load configuration from a given TOML file.
fn read_file(path: &Path) -> Result<Config, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)?;
    let cfg: Config = toml::from_str(&content)?;
    Ok(cfg)
}

/// Merge the given src config into the dest config struct.
fn merge(dest: &mut Config, src: Config) {
    if !src.app.data_file.is_empty() {
        dest.app.data_file = src.app.data_file;
    }
    if src.app.save_on_exit {
        dest.app.save_on_exit = true;
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn config_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_sample_config_parses() {
        let cfg: Config = toml::from_str(SAMPLE_CONFIG).unwrap();
        assert!(cfg.app.data_file.is_empty());
        assert!(!cfg.app.save_on_exit);
    }

    #[test]
    fn test_load_all_merges_in_order() {
        let a = config_file("[app]\ndata_file = \"a.csv\"\n");
        let b = config_file("[app]\nsave_on_exit = true\n");
        let c = config_file("[app]\ndata_file = \"c.csv\"\n");

        let cfg = load_all(&[
            a.path().to_path_buf(),
            b.path().to_path_buf(),
            c.path().to_path_buf(),
        ])
        .unwrap();
        assert_eq!(cfg.app.data_file, "c.csv");
        assert!(cfg.app.save_on_exit);
    }

    #[test]
    fn test_load_all_defaults_and_errors() {
        let cfg = load_all(&[]).unwrap();
        assert!(cfg.app.data_file.is_empty());

        let bad = config_file("[app\n");
        assert!(load_all(&[bad.path().to_path_buf()]).is_err());
        assert!(load_all(&[PathBuf::from("/nonexistent/config.toml")]).is_err());
    }

    #[test]
    fn test_generate_sample() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        generate_sample(&path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), SAMPLE_CONFIG);
        assert!(generate_sample(&path).is_err());
    }
}
