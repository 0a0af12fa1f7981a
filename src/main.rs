//! The `md2txt` binary.

use md2txt::{format_document, Options, Parser, ReferenceScope};

use std::boxed::Box;
use std::env;
use std::error::Error;
use std::fs;
use std::io::{self, BufWriter, Read, Write};
use std::path::PathBuf;
use std::process;

use clap::{Parser as _, ValueEnum};

const EXIT_SUCCESS: i32 = 0;
const EXIT_PARSE_CONFIG: i32 = 2;
const EXIT_READ_INPUT: i32 = 3;

#[derive(Debug, clap::Parser)]
#[command(about, author, version)]
#[command(after_help = "\
By default, md2txt will attempt to read command-line options from a config file specified by \
--config-file.  This behaviour can be disabled by passing --config-file none.  It is not an \
error if the file does not exist.")]
struct Cli {
    /// Markdown file(s) to read; or standard input if none passed
    #[arg(value_name = "FILE")]
    files: Option<Vec<PathBuf>>,

    /// Path to config file containing command-line arguments, or 'none'
    #[arg(short, long, value_name = "PATH")]
    config_file: Option<String>,

    /// Write output to FILE instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Which blocks a reference definition applies to
    #[arg(long, value_enum, value_name = "SCOPE", default_value_t = ScopeArg::Document)]
    reference_scope: ScopeArg,

    /// Text to place between top-level blocks
    #[arg(long, value_name = "TEXT", default_value = "\n", hide_default_value = true)]
    separator: String,

    /// Log progress to stderr; repeat for more detail
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ScopeArg {
    Document,
    Block,
}

impl From<ScopeArg> for ReferenceScope {
    fn from(scope: ScopeArg) -> Self {
        match scope {
            ScopeArg::Document => ReferenceScope::Document,
            ScopeArg::Block => ReferenceScope::Block,
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let mut cli = Cli::parse();

    if let Some(path) = &config_path(cli.config_file.take()) {
        if let Ok(config) = fs::read_to_string(path) {
            let mut args = match shell_words::split(&config) {
                Ok(args) => args,
                Err(err) => {
                    eprintln!("failed to parse {}: {}", path, err);
                    process::exit(EXIT_PARSE_CONFIG);
                }
            };
            args.insert(0, "md2txt".to_string());
            args.extend(env::args().skip(1));
            cli = Cli::parse_from(args);
        }
    }

    init_logging(cli.verbose);

    let mut options = Options::default();
    options.parse.reference_scope = cli.reference_scope.into();
    options.render.block_separator = cli.separator;

    let mut s: Vec<u8> = Vec::with_capacity(2048);

    match cli.files {
        None => {
            log::debug!("reading standard input");
            io::stdin().read_to_end(&mut s)?;
        }
        Some(ref paths) => {
            for path in paths {
                log::debug!("reading {}", path.display());
                match fs::read(path) {
                    Ok(mut content) => s.append(&mut content),
                    Err(err) => {
                        eprintln!("failed to read {}: {}", path.display(), err);
                        process::exit(EXIT_READ_INPUT);
                    }
                }
            }
        }
    };

    let blocks = Parser::from_bytes(&s);

    if let Some(output_filename) = cli.output {
        let mut bw = BufWriter::new(fs::File::create(output_filename)?);
        fmt2io::write(&mut bw, |writer| format_document(blocks, &options, writer))?;
        bw.flush()?;
    } else {
        let stdout = io::stdout();
        let mut bw = BufWriter::new(stdout.lock());
        fmt2io::write(&mut bw, |writer| format_document(blocks, &options, writer))?;
        bw.flush()?;
    };

    process::exit(EXIT_SUCCESS);
}

/// The config file to read, given the `--config-file` argument.
fn config_path(arg: Option<String>) -> Option<String> {
    match arg {
        Some(path) if path == "none" => None,
        Some(path) => Some(path),
        None => get_default_config_path(),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

#[cfg(all(not(windows), not(target_arch = "wasm32")))]
fn get_default_config_path() -> Option<String> {
    if let Ok(xdg_dirs) = xdg::BaseDirectories::with_prefix("md2txt") {
        if let Ok(path) = xdg_dirs.place_config_file("config") {
            return path.into_os_string().into_string().ok();
        }
    }

    None
}

#[cfg(any(windows, target_arch = "wasm32"))]
fn get_default_config_path() -> Option<String> {
    None
}
