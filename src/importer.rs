use std::path::Path;

use regex::Regex;

use crate::autocomplete::{self, IntoFrequency, PrefixIndex};

const COL_WORD: usize = 0;
const COL_FREQ: usize = 1;
const MIN_COLS: usize = 2;

/// Frequency column names recognised in a header row.
const FREQ_HEADERS: [&str; 5] = ["frequency", "freq", "count", "weight", "score"];

/// Log progress every this many rows.
const LOG_EVERY: usize = 50_000;

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("index error: {0}")]
    Index(#[from] autocomplete::Error),
    #[error("{0}")]
    Validation(String),
}

/// Load `word,frequency` rows from a CSV file into a new index.
///
/// A first row whose frequency column is a column name such as `frequency` is
/// taken to be a header and skipped. Rows with an empty word are skipped. Any other malformed row
/// fails the whole load, so callers can keep their current index on error.
pub fn load_csv(file_path: &Path) -> Result<PrefixIndex, ImportError> {
    log::info!("loading words from {} ...", file_path.display());

    let file = std::fs::File::open(file_path)?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(file);

    let re_spaces = Regex::new(r"\s+").map_err(|e| ImportError::Validation(e.to_string()))?;

    let mut index = PrefixIndex::new();
    let mut n = 0;
    let mut skipped = 0;

    for result in reader.records() {
        let record = result?;
        n += 1;

        if record.len() < MIN_COLS {
            return Err(ImportError::Validation(format!(
                "line {}: every line should have at least {} columns. Found {}",
                n,
                MIN_COLS,
                record.len()
            )));
        }

        let get = |i: usize| record.get(i).unwrap_or("");
        let word = clean_string(get(COL_WORD), &re_spaces).to_lowercase();

        let freq = match get(COL_FREQ).into_frequency() {
            Ok(f) => f,
            Err(_) if n == 1 && is_header(&word, get(COL_FREQ)) => {
                log::info!("skipping header row: {:?}", record);
                continue;
            }
            Err(e) => {
                return Err(ImportError::Validation(format!(
                    "line {}: column {}: {}",
                    n, COL_FREQ, e
                )));
            }
        };

        if word.is_empty() {
            log::warn!("line {}: empty word at column {}", n, COL_WORD);
            skipped += 1;
            continue;
        }

        index.insert(&word, freq)?;

        if n % LOG_EVERY == 0 {
            log::info!("read {} rows", n);
        }
    }

    log::info!(
        "finished. loaded {} words from {} rows ({} skipped)",
        index.len(),
        n,
        skipped
    );

    Ok(index)
}

/// Write every stored word to a CSV file as `word,frequency` rows sorted by
/// word. Returns the number of rows written.
pub fn save_csv(file_path: &Path, index: &PrefixIndex) -> Result<usize, ImportError> {
    let mut items = index.items();
    items.sort_by(|a, b| a.0.cmp(&b.0));

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(file_path)?;

    for (word, freq) in &items {
        writer.write_record([word.clone(), freq.to_string()])?;
    }
    writer.flush()?;

    log::info!("saved {} words to {}", items.len(), file_path.display());

    Ok(items.len())
}

fn is_header(word: &str, freq: &str) -> bool {
    let freq = freq.trim().to_lowercase();
    !word.is_empty() && FREQ_HEADERS.contains(&freq.as_str())
}

fn clean_string(s: &str, re_spaces: &Regex) -> String {
    re_spaces.replace_all(s.trim(), " ").to_string()
}
