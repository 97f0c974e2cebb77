use clap::Parser;
use fxhash::FxHashMap;
use rayon::prelude::*;
use serde::Serialize;
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use std::time::Instant;

use khmercut::dictionary::Dictionary;
use khmercut::rules::{default_rule_specs, RuleEngine, RuleSpec};
use khmercut::segmenter::KhmerSegmenter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to dictionary file (one word per line)
    #[arg(short, long, default_value = "data/khmer_dictionary_words.txt")]
    dict: String,

    /// Path to frequency file (JSON map of word -> count)
    #[arg(short, long, default_value = "data/khmer_word_frequencies.json")]
    freq: String,

    /// Path to rules file (JSON list); built-in rules when absent
    #[arg(short, long, default_value = "data/segmentation_rules.json")]
    rules: String,

    /// Input text file
    #[arg(short, long)]
    input: String,

    /// Output file (JSONL) - optional, skip to benchmark only
    #[arg(short, long)]
    output: Option<String>,

    /// Limit number of lines to process
    #[arg(short, long)]
    limit: Option<usize>,

    /// Emit the raw DP cover, skipping rules and unknown grouping
    #[arg(long)]
    raw: bool,
}

#[derive(Serialize)]
struct OutputRecord<'a> {
    id: usize,
    input: &'a str,
    segments: Vec<String>,
    unknown: Vec<bool>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    println!("Initializing Segmenter...");
    println!("Dictionary: {}", args.dict);
    println!("Frequencies: {}", args.freq);
    println!("Rules: {}", args.rules);

    let start_load = Instant::now();

    let dict_text = std::fs::read_to_string(&args.dict)?;

    let frequencies: Option<FxHashMap<String, f64>> = if Path::new(&args.freq).exists() {
        Some(serde_json::from_reader(File::open(&args.freq)?)?)
    } else {
        println!("Frequency file not found. Using defaults.");
        None
    };

    let rule_specs: Vec<RuleSpec> = if Path::new(&args.rules).exists() {
        serde_json::from_reader(File::open(&args.rules)?)?
    } else {
        println!("Rules file not found. Using built-in rules.");
        default_rule_specs()
    };

    let dictionary = Dictionary::new(&dict_text, frequencies.as_ref());
    let rules = RuleEngine::compile(rule_specs);
    println!("Loaded {} words, {} rules", dictionary.len(), rules.len());

    let segmenter = KhmerSegmenter::new(dictionary, rules);
    println!("Model loaded in {:.2}s", start_load.elapsed().as_secs_f32());

    println!("Reading source: {}", args.input);
    let file = File::open(&args.input)?;
    let reader = BufReader::new(file);
    let mut lines: Vec<String> = reader
        .lines()
        .collect::<Result<Vec<String>, _>>()?
        .into_iter()
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .collect();

    if let Some(limit) = args.limit {
        if limit < lines.len() {
            lines.truncate(limit);
        }
    }

    println!("Processing {} lines...", lines.len());
    let start_process = Instant::now();

    // The segmenter is immutable; rayon workers share one instance
    let results: Vec<String> = lines
        .par_iter()
        .enumerate()
        .map(|(i, line)| {
            let segments = if args.raw {
                segmenter.segment_raw(line)
            } else {
                segmenter.segment(line)
            };
            let unknown = segments.iter().map(|s| segmenter.is_unknown(s)).collect();

            let record = OutputRecord { id: i, input: line, segments, unknown };
            serde_json::to_string(&record).unwrap_or_default()
        })
        .collect();

    if let Some(ref output_path) = args.output {
        let mut output_file = File::create(output_path)?;
        for result in results {
            writeln!(output_file, "{}", result)?;
        }
        println!("Done. Saved to {}", output_path);
    }

    let duration = start_process.elapsed();
    println!("Time taken: {:.2}s", duration.as_secs_f32());
    println!("Speed: {:.2} lines/sec", lines.len() as f32 / duration.as_secs_f32());

    Ok(())
}
