use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Instant;

use delegate::delegate;
use derive_new::new;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::wordlist::error::WordlistError;
use crate::wordlist::format::FileFormat;
use crate::wordlist::trie::Trie;

#[derive(Default)]
pub struct Wordlist {
    trie: Trie,
}

/// How many times `word` occurs in the dictionary.
#[derive(new, Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Occurrence {
    pub word: String,
    pub count: usize,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub lines: usize,
    pub words_read: usize,
    pub rejected: usize,
}

impl Wordlist {
    pub fn new() -> Wordlist {
        Wordlist { trie: Trie::new() }
    }

    delegate! {
        to self.trie {
            pub fn lookup(&self, word: &str) -> usize;
            pub fn contains(&self, word: &str) -> bool;
            pub fn node_count(&self) -> usize;
            pub fn entries(&self) -> Vec<(String, usize)>;
        }
    }

    pub fn load_file<P: AsRef<Path>>(&mut self, filename: P, format: &FileFormat) -> Result<LoadReport, WordlistError> {
        let filename = filename.as_ref();
        info!(file = %filename.display(), "reading words");
        let file = File::open(filename)?;
        self.load_reader(BufReader::new(file), format)
    }

    /// Inserts every word of `reader` into the trie.
    ///
    /// Words with characters outside `a`-`z`, including bytes that are not
    /// UTF-8, are skipped and counted in [`LoadReport::rejected`], unless the
    /// format is strict. So are words whose count would overflow. A malformed
    /// line always stops the load; words inserted before it stay in the trie.
    pub fn load_reader<R: BufRead>(&mut self, mut reader: R, format: &FileFormat) -> Result<LoadReport, WordlistError> {
        let start = Instant::now();
        let mut report = LoadReport::default();
        let mut buf = Vec::new();

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            report.lines += 1;
            let number = report.lines;
            let text = String::from_utf8_lossy(&buf);
            let line = strip_line_ending(&text);

            let entries = format.parse_line(line)
                .map_err(|source| WordlistError::Format { line: number, source })?;
            for (word, freq) in entries {
                match self.trie.insert_with_freq(word, freq) {
                    Ok(()) => {
                        report.words_read += 1;
                        if report.words_read % 100_000 == 0 {
                            debug!(count = report.words_read, word, "progress");
                        }
                    }
                    Err(source) if format.is_strict() => {
                        return Err(WordlistError::InvalidWord {
                            line: number,
                            word: word.to_string(),
                            source,
                        });
                    }
                    Err(e) => {
                        warn!(line = number, word, error = %e, "skipping word");
                        report.rejected += 1;
                    }
                }
            }
        }

        info!(words = report.words_read,
              rejected = report.rejected,
              nodes = self.trie.node_count(),
              elapsed_ms = start.elapsed().as_millis() as u64,
              "read dictionary");
        Ok(report)
    }

    /// Looks up every query in parallel. Results keep the order of `queries`.
    pub fn occurrences<S>(&self, queries: &[S]) -> Vec<Occurrence>
        where S: AsRef<str> + Sync {
        queries.par_iter()
            .map(|x| {
                let word = x.as_ref();
                Occurrence::new(word.to_string(), self.trie.lookup(word))
            })
            .collect()
    }

    /// Releases the trie and returns the number of nodes freed.
    pub fn teardown(self) -> usize {
        self.trie.teardown()
    }
}

fn strip_line_ending(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}
