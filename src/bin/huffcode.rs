//! Huffman file compressor.
//!
//! ## Usage
//!
//! ```bash
//! # Compress
//! huffcode -e notes.txt notes.huff
//!
//! # Decompress and print the size report
//! huffcode -d notes.huff notes.txt --stats
//!
//! # Refuse inputs that would need codes longer than 32 bits
//! huffcode -e big.bin big.huff --max-code-length 32
//! ```

use std::path::PathBuf;

use clap::{ArgGroup, Parser};
use tracing_subscriber::filter::LevelFilter;

use huffcode::compression::{CoderConfig, HuffmanCoder};

#[derive(Parser, Debug)]
#[command(name = "huffcode")]
#[command(version)]
#[command(about = "Two-pass Huffman compressor for arbitrary files", long_about = None)]
#[command(group(ArgGroup::new("mode").required(true).args(["encode", "decode"])))]
struct Args {
    /// Compress INPUT into OUTPUT
    #[arg(short, long)]
    encode: bool,

    /// Decompress INPUT into OUTPUT
    #[arg(short, long)]
    decode: bool,

    /// File to read
    input: PathBuf,

    /// File to create or overwrite
    output: PathBuf,

    /// Print the code table and size report
    #[arg(long)]
    stats: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// I/O buffer size in bytes
    #[arg(long, default_value_t = huffcode::compression::coder::DEFAULT_IO_BUFFER_SIZE)]
    buffer_size: usize,

    /// Reject inputs whose codes would exceed this many bits
    #[arg(long)]
    max_code_length: Option<usize>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "info" => LevelFilter::INFO,
        "warn" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        "off" => LevelFilter::OFF,
        _ => LevelFilter::WARN,
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let config = CoderConfig::default()
        .with_io_buffer_size(args.buffer_size)
        .with_max_code_length(args.max_code_length);
    let coder = HuffmanCoder::new(config);

    if args.encode {
        let stats = coder.encode_file(&args.input, &args.output)?;
        if args.stats {
            println!("{stats}");
        }
    } else {
        let stats = coder.decode_file(&args.input, &args.output)?;
        if args.stats {
            println!("{stats}");
        }
    }

    Ok(())
}
