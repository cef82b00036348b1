// Command-line front end for akbtool.
//
// Subcommands map one-to-one onto the `io` helpers; every `cmd_*` returns a
// process exit code.

use std::path::{Path, PathBuf};
use std::process;

use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};

use crate::container::{Container, NameDecoding};
use crate::io::{self as akb_io, CreateOptions};
use crate::lzss::{self, token};

// ---------------------------------------------------------------------------
// Clap CLI definition
// ---------------------------------------------------------------------------

/// AKB image container tool.
#[derive(Parser, Debug)]
#[command(
    name = "akbtool",
    version,
    about = "Create, inspect and decode AKB images",
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Cmd,

    /// Force overwrite existing output files.
    #[arg(short = 'f', long, global = true)]
    force: bool,

    /// Quiet mode (only errors are printed).
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Verbose mode (use multiple times for more detail).
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Output stats as JSON to stdout.
    #[arg(long = "json", global = true)]
    json_output: bool,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Create an AKB image from a PNG/BMP source.
    Create(CreateArgs),
    /// Write `<file>.metadata.json` for an AKB image.
    Extract(ExtractArgs),
    /// Decode an AKB image to PNG.
    Decode(DecodeArgs),
    /// Print header information for an AKB image.
    Info(InfoArgs),
    /// Print build/configuration details.
    Config,
}

#[derive(Args, Debug)]
struct CreateArgs {
    /// Source image (24- or 32-bit).
    #[arg(value_hint = ValueHint::FilePath)]
    input: PathBuf,

    /// Output AKB file.
    #[arg(value_hint = ValueHint::FilePath)]
    output: PathBuf,

    /// Metadata sidecar (default: `<input>.metadata.json`).
    #[arg(long, short = 'm', value_hint = ValueHint::FilePath)]
    metadata: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ExtractArgs {
    /// AKB file.
    #[arg(value_hint = ValueHint::FilePath)]
    input: PathBuf,

    /// Reproduce the old extractor, which kept only the leading NUL bytes
    /// of the background image name field.
    #[arg(long = "legacy-name")]
    legacy_name: bool,
}

#[derive(Args, Debug)]
struct DecodeArgs {
    /// AKB file.
    #[arg(value_hint = ValueHint::FilePath)]
    input: PathBuf,

    /// Output PNG file.
    #[arg(value_hint = ValueHint::FilePath)]
    output: PathBuf,
}

#[derive(Args, Debug)]
struct InfoArgs {
    /// AKB file.
    #[arg(value_hint = ValueHint::FilePath)]
    input: PathBuf,

    /// Also count literal and match tokens in the payload.
    #[arg(long)]
    tokens: bool,
}

#[derive(Debug, Clone, Copy)]
struct Globals {
    force: bool,
    quiet: bool,
    verbose: u8,
    json_output: bool,
}

impl From<&Cli> for Globals {
    fn from(cli: &Cli) -> Self {
        Self {
            force: cli.force,
            quiet: cli.quiet,
            verbose: cli.verbose.min(2),
            json_output: cli.json_output,
        }
    }
}

#[cfg(any(test, feature = "fuzzing"))]
pub fn fuzz_try_parse_args(args: &[String]) {
    let argv: Vec<String> = std::iter::once("akbtool".to_string())
        .chain(args.iter().cloned())
        .collect();
    if let Ok(cli) = Cli::try_parse_from(argv) {
        let _ = Globals::from(&cli);
    }
}

fn refuse_overwrite(path: &Path, g: Globals) -> bool {
    if path.exists() && !g.force {
        eprintln!(
            "akbtool: output file exists, use -f to overwrite: {}",
            path.display()
        );
        return true;
    }
    false
}

fn print_json(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("akbtool: json: {e}"),
    }
}

// ---------------------------------------------------------------------------
// Config command
// ---------------------------------------------------------------------------

fn cmd_config() -> i32 {
    let version = env!("CARGO_PKG_VERSION");
    println!("akbtool version {version}");
    println!("LZSS_WINDOW={}", lzss::N);
    println!("LZSS_LOOKAHEAD={}", lzss::F);
    println!("LZSS_THRESHOLD={}", lzss::THRESHOLD);
    println!("HEADER_SIZE={}", crate::container::HEADER_SIZE);
    println!("NAME_FIELD_LEN={}", crate::container::NAME_FIELD_LEN);
    println!("IMAGE_IO={}", cfg!(feature = "image-io") as u8);
    0
}

// ---------------------------------------------------------------------------
// Create command
// ---------------------------------------------------------------------------

fn cmd_create(args: &CreateArgs, g: Globals) -> i32 {
    if refuse_overwrite(&args.output, g) {
        return 1;
    }

    let opts = CreateOptions {
        metadata_path: args.metadata.clone(),
    };
    let stats = match akb_io::create_file(&args.input, &args.output, &opts) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("akbtool: create: {e}");
            return 1;
        }
    };

    if g.json_output {
        print_json(&serde_json::json!({
            "command": "create",
            "source_width": stats.source_width,
            "source_height": stats.source_height,
            "bits_per_pixel": stats.format.bits_per_pixel(),
            "canvas_width": stats.canvas_width,
            "canvas_height": stats.canvas_height,
            "pixel_bytes": stats.pixel_bytes,
            "payload_bytes": stats.payload_bytes,
            "file_bytes": stats.file_bytes,
            "sidecar_used": stats.sidecar_used,
        }));
    } else if g.verbose > 0 && !g.quiet {
        eprintln!(
            "akbtool: create: {}x{} {}, canvas {}x{}, {} -> {} bytes",
            stats.source_width,
            stats.source_height,
            stats.format,
            stats.canvas_width,
            stats.canvas_height,
            stats.pixel_bytes,
            stats.file_bytes
        );
    }

    0
}

// ---------------------------------------------------------------------------
// Extract command
// ---------------------------------------------------------------------------

fn cmd_extract(args: &ExtractArgs, g: Globals) -> i32 {
    let names = if args.legacy_name {
        NameDecoding::Legacy
    } else {
        NameDecoding::Terminated
    };

    let sidecar = crate::metadata::sidecar_path(&args.input);
    if refuse_overwrite(&sidecar, g) {
        return 1;
    }

    match akb_io::extract_metadata(&args.input, names) {
        Ok((path, _)) => {
            if !g.quiet {
                eprintln!("akbtool: wrote {}", path.display());
            }
            0
        }
        Err(e) => {
            eprintln!("akbtool: extract: {e}");
            1
        }
    }
}

// ---------------------------------------------------------------------------
// Decode command
// ---------------------------------------------------------------------------

fn cmd_decode(args: &DecodeArgs, g: Globals) -> i32 {
    if refuse_overwrite(&args.output, g) {
        return 1;
    }

    let stats = match akb_io::decode_file(&args.input, &args.output) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("akbtool: decode: {e}");
            return 1;
        }
    };

    if g.json_output {
        print_json(&serde_json::json!({
            "command": "decode",
            "width": stats.width,
            "height": stats.height,
            "bits_per_pixel": stats.format.bits_per_pixel(),
            "file_bytes": stats.file_bytes,
            "pixel_bytes": stats.pixel_bytes,
        }));
    } else if g.verbose > 0 && !g.quiet {
        eprintln!(
            "akbtool: decode: {}x{} {}, {} -> {} bytes",
            stats.width, stats.height, stats.format, stats.file_bytes, stats.pixel_bytes
        );
    }

    0
}

// ---------------------------------------------------------------------------
// Info command
// ---------------------------------------------------------------------------

fn cmd_info(args: &InfoArgs, g: Globals) -> i32 {
    let (container, file_bytes) = match akb_io::read_container(&args.input) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("akbtool: {e}");
            return 1;
        }
    };

    let tokens = if args.tokens {
        match token::stats(container.payload()) {
            Ok(st) => Some(st),
            Err(e) => {
                eprintln!("akbtool: payload: {e}");
                return 1;
            }
        }
    } else {
        None
    };

    if g.json_output {
        print_json(&info_json(&container, file_bytes, tokens));
        return 0;
    }

    let h = container.header();
    let magic = String::from_utf8_lossy(&container.magic()).into_owned();
    println!("Magic:                 {magic:?}");
    println!("Canvas:                {}x{}", h.width, h.height);
    println!("Flags:                 {:#010X} ({})", h.flags.bits(), h.format());
    println!("Background color:      {:#010X}", h.background_color as u32);
    println!(
        "Image rect:            ({}, {}) - ({}, {})",
        h.rect.x0, h.rect.y0, h.rect.x1, h.rect.y1
    );
    println!("Payload size:          {}", container.payload().len());
    println!("File size:             {file_bytes}");
    if let Some(name) = container.background() {
        println!(
            "Background image:      {:?}",
            name.decode(NameDecoding::Terminated)
        );
    }
    if let Some(st) = tokens {
        println!("Literal tokens:        {}", st.literals);
        println!("Match tokens:          {}", st.matches);
        println!("Expanded size:         {}", st.expanded_len);
    }

    0
}

fn info_json(container: &Container, file_bytes: u64, tokens: Option<token::TokenStats>) -> serde_json::Value {
    let h = container.header();
    let mut v = serde_json::json!({
        "magic": String::from_utf8_lossy(&container.magic()),
        "width": h.width,
        "height": h.height,
        "flags": h.flags.bits(),
        "bits_per_pixel": h.format().bits_per_pixel(),
        "background_color": h.background_color,
        "rect": [h.rect.x0, h.rect.y0, h.rect.x1, h.rect.y1],
        "payload_bytes": container.payload().len(),
        "file_bytes": file_bytes,
        "background_image": container
            .background()
            .map(|n| n.decode(NameDecoding::Terminated)),
    });
    if let Some(st) = tokens {
        v["literals"] = st.literals.into();
        v["matches"] = st.matches.into();
        v["expanded_bytes"] = st.expanded_len.into();
    }
    v
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn log_filter(g: Globals) -> &'static str {
    if g.quiet {
        return "error";
    }
    match g.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Main CLI entry point. Parses arguments via clap, dispatches commands.
pub fn run() -> ! {
    let cli = Cli::parse();
    let g = Globals::from(&cli);

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_filter(g)))
        .format_timestamp(None)
        .format_target(false)
        .init();

    let exit_code = match &cli.command {
        Cmd::Create(args) => cmd_create(args, g),
        Cmd::Extract(args) => cmd_extract(args, g),
        Cmd::Decode(args) => cmd_decode(args, g),
        Cmd::Info(args) => cmd_info(args, g),
        Cmd::Config => cmd_config(),
    };

    process::exit(exit_code);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
