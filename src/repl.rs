use std::{
    io::{self, BufRead, Write},
    path::Path,
};

use crate::{autocomplete::PrefixIndex, importer};

/// Result of executing one command line.
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Keep reading. Holds the line to print, if the command prints one.
    Continue(Option<String>),
    Quit,
}

/// A command session over one index. Each input line runs exactly one index
/// operation. Malformed commands print nothing so output stays machine friendly.
pub struct Session {
    index: PrefixIndex,
}

impl Session {
    pub fn new(index: PrefixIndex) -> Self {
        Self { index }
    }

    pub fn index(&self) -> &PrefixIndex {
        &self.index
    }

    /// Run commands from `input` until EOF or `quit`, writing results to `output`.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> io::Result<()> {
        for line in input.lines() {
            match self.exec(&line?) {
                Outcome::Continue(Some(out)) => {
                    writeln!(output, "{}", out)?;
                    output.flush()?;
                }
                Outcome::Continue(None) => {}
                Outcome::Quit => break,
            }
        }
        Ok(())
    }

    /// Execute a single command line.
    pub fn exec(&mut self, line: &str) -> Outcome {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some(first) = parts.first() else {
            return Outcome::Continue(None);
        };

        let out = match (first.to_lowercase().as_str(), parts.len()) {
            ("quit", _) => return Outcome::Quit,

            ("load", 2) => {
                self.load(Path::new(parts[1]));
                None
            }

            ("save", 2) => {
                if let Err(e) = importer::save_csv(Path::new(parts[1]), &self.index) {
                    log::warn!("error saving {}: {}", parts[1], e);
                }
                None
            }

            ("insert", 3) => {
                let word = parts[1].to_lowercase();
                if let Err(e) = self.index.insert(&word, parts[2]) {
                    log::warn!("skipping insert '{}': {}", word, e);
                }
                None
            }

            ("remove", 2) => {
                let ok = self.index.remove(&parts[1].to_lowercase());
                Some(if ok { "OK" } else { "MISS" }.to_string())
            }

            ("contains", 2) => {
                let ok = self.index.contains(&parts[1].to_lowercase());
                Some(if ok { "YES" } else { "NO" }.to_string())
            }

            ("complete", n) if n >= 3 => {
                let prefix = parts[1].to_lowercase();
                match parts[2].parse::<i64>() {
                    Ok(k) => Some(self.index.complete(prefix.as_str(), k.max(0)).join(",")),
                    Err(_) => {
                        log::debug!("ignoring complete with invalid limit '{}'", parts[2]);
                        None
                    }
                }
            }

            ("stats", _) => Some(self.index.stats().to_string()),

            _ => {
                log::debug!("ignoring unknown or malformed command: {}", line.trim());
                None
            }
        };

        Outcome::Continue(out)
    }

    /// Replace the index with the contents of a CSV file. On failure the
    /// current index is kept.
    fn load(&mut self, path: &Path) {
        match importer::load_csv(path) {
            Ok(index) => self.index = index,
            Err(e) => log::warn!("error loading {}: {}", path.display(), e),
        }
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    fn run(session: &mut Session, script: &str) -> String {
        let mut out = Vec::new();
        session.run(script.as_bytes(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_session_commands() {
        let mut s = Session::new(PrefixIndex::new());
        let out = run(
            &mut s,
            "insert Apple 5\n\
             insert application 3\n\
             insert apply 4\n\
             \n\
             contains APPLE\n\
             contains app\n\
             complete App 2\n\
             complete zzz 3\n\
             stats\n\
             remove apply\n\
             remove apply\n\
             complete app 5\n",
        );

        assert_eq!(
            out,
            "YES\nNO\napple,apply\n\nwords=3 height=11 nodes=14\nOK\nMISS\napple,application\n"
        );
    }

    #[test]
    fn test_session_malformed_commands() {
        let mut s = Session::new(PrefixIndex::new());
        let out = run(
            &mut s,
            "insert word notafloat\n\
             insert word\n\
             complete w abc\n\
             complete w -3\n\
             bogus command\n\
             STATS\n",
        );

        assert_eq!(out, "\nwords=0 height=0 nodes=1\n");
    }

    #[test]
    fn test_session_quit() {
        let mut s = Session::new(PrefixIndex::new());
        let out = run(&mut s, "insert a 1\nquit\ncontains a\n");
        assert_eq!(out, "");
        assert!(s.index().contains("a"));
        assert_eq!(s.exec("QUIT"), Outcome::Quit);
    }

    #[test]
    fn test_session_save_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("words.csv");
        let path = path.display();

        let mut s = Session::new(PrefixIndex::new());
        run(&mut s, &format!("insert cat 2\ninsert dog 1\nsave {}\n", path));

        let mut s = Session::new(PrefixIndex::new());
        let out = run(
            &mut s,
            &format!("insert bird 9\nload {}\ncomplete c 5\ncontains bird\nstats\n", path),
        );
        assert_eq!(out, "cat\nNO\nwords=2 height=3 nodes=7\n");
        assert_eq!(s.index().complete("", 5), vec!["cat", "dog"]);

        // A failed load keeps the current index.
        run(&mut s, "load /nonexistent/words.csv\n");
        assert_eq!(s.index().len(), 2);
    }
}
