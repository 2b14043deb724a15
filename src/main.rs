use std::time::Instant;

use anyhow::Context;
use structopt::StructOpt;
use tracing::{info, Level};
use wordfreq_trie::wordlist::format::FileFormat;
use wordfreq_trie::wordlist::wordlist::Wordlist;

const SAMPLE_QUERIES: [&str; 5] = ["notaword", "ucf", "no", "note", "corg"];

/// Count how many times each query word occurs in a dictionary.
#[derive(StructOpt)]
struct Cli {
    /// The dictionary file to read
    #[structopt(parse(from_os_str))]
    path: std::path::PathBuf,
    /// Words to look up. Defaults to a fixed sample.
    queries: Vec<String>,
    /// Column delimiter. Without one every whitespace-separated token is a word.
    #[structopt(short, long)]
    delimiter: Option<char>,
    /// Column holding the word (with --delimiter, default 0)
    #[structopt(long)]
    word_column: Option<usize>,
    /// Column holding the frequency (with --delimiter, default 1)
    #[structopt(long)]
    freq_column: Option<usize>,
    /// Stop at the first word with characters outside a-z
    #[structopt(long)]
    strict: bool,
    /// Print results as JSON
    #[structopt(long)]
    json: bool,
    #[structopt(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Cli::from_args();

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .init();

    let file_format = FileFormat::builder()
        .delimiter(args.delimiter)
        .word_column(args.word_column)
        .freq_column(args.freq_column)
        .strict(args.strict)
        .build();

    let start = Instant::now();
    let mut wl = Wordlist::new();
    let report = wl.load_file(&args.path, &file_format)
        .with_context(|| format!("reading dictionary {}", args.path.display()))?;
    println!("Number of words read from dictionary: {}", report.words_read);

    let queries: Vec<String> = if args.queries.is_empty() {
        SAMPLE_QUERIES.iter().map(|x| x.to_string()).collect()
    } else {
        args.queries
    };

    let results = wl.occurrences(&queries);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        for result in &results {
            println!("\t{} : {}", result.word, result.count);
        }
    }

    let released = wl.teardown();
    info!(released, elapsed_ms = start.elapsed().as_millis() as u64, "done");
    Ok(())
}
