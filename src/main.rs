/// zoptable - Z-machine opcode table generator CLI
use std::env;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process;

use tracing::{debug, Level};
use zoptable::{compile_tables, render_tables, GeneratorConfig, EMBEDDED_TABLE};

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn print_usage() {
    eprintln!("zoptable v{}", VERSION);
    eprintln!();
    eprintln!("Generates the standard and extended opcode tables for the interpreter.");
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("    zoptable [OPTIONS]");
    eprintln!();
    eprintln!("OPTIONS:");
    eprintln!("    -h, --help           Print this help message");
    eprintln!("    -V, --version        Print version information");
    eprintln!("    -c, --config <FILE>  Load generator settings from a TOML file");
    eprintln!("    -i, --input <FILE>   Read the opcode table from FILE ('-' for stdin)");
    eprintln!("    -o, --output <FILE>  Write output to FILE (default: stdout)");
    eprintln!("    -v, --verbose        Log progress to stderr (repeat for more)");
    eprintln!();
    eprintln!("EXAMPLES:");
    eprintln!("    zoptable > opcodes.src");
    eprintln!("    zoptable --config zoptable.toml -o opcodes.src");
}

fn print_version() {
    println!("zoptable {}", VERSION);
}

struct Options {
    config: Option<PathBuf>,
    input: Option<String>,
    output: Option<String>,
    verbosity: u8,
}

fn parse_args() -> Result<Options, String> {
    let args: Vec<String> = env::args().collect();

    let mut config = None;
    let mut input = None;
    let mut output = None;
    let mut verbosity = 0;
    let mut i = 1;

    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_usage();
                process::exit(1);
            }
            "-V" | "--version" => {
                print_version();
                process::exit(0);
            }
            "-c" | "--config" => {
                i += 1;
                let path = args.get(i).ok_or("Missing config file after --config")?;
                config = Some(PathBuf::from(path));
            }
            "-i" | "--input" => {
                i += 1;
                let path = args.get(i).ok_or("Missing input file after --input")?;
                input = Some(path.clone());
            }
            "-o" | "--output" => {
                i += 1;
                let path = args.get(i).ok_or("Missing output file after -o")?;
                output = Some(path.clone());
            }
            "-v" | "--verbose" => verbosity += 1,
            "-vv" => verbosity += 2,
            arg => {
                return Err(format!("Unknown argument: {}", arg));
            }
        }
        i += 1;
    }

    Ok(Options {
        config,
        input,
        output,
        verbosity,
    })
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn read_input(input: &str) -> Result<String, String> {
    if input == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| format!("Failed to read from stdin: {}", e))?;
        Ok(buffer)
    } else {
        let path = Path::new(input);
        if !path.exists() {
            return Err(format!("Input file not found: {}", input));
        }
        fs::read_to_string(path).map_err(|e| format!("Failed to read file '{}': {}", input, e))
    }
}

fn write_output(output: Option<&str>, content: &str) -> Result<(), String> {
    match output {
        Some(path) => {
            let mut file = fs::File::create(path)
                .map_err(|e| format!("Failed to create output file '{}': {}", path, e))?;
            file.write_all(content.as_bytes())
                .map_err(|e| format!("Failed to write to output file '{}': {}", path, e))?;
            Ok(())
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(content.as_bytes())
                .and_then(|_| stdout.flush())
                .map_err(|e| format!("Failed to write to stdout: {}", e))
        }
    }
}

fn run(options: &Options) -> Result<(), String> {
    let config = match &options.config {
        Some(path) => GeneratorConfig::load(path).map_err(|e| e.to_string())?,
        None => GeneratorConfig::default(),
    };

    // --input wins over the config file's source; both fall back to the embedded table
    let source_path = options
        .input
        .clone()
        .or_else(|| config.source.as_ref().map(|p| p.display().to_string()));
    let source = match &source_path {
        Some(path) => {
            debug!(path = %path, "reading opcode table");
            read_input(path)?
        }
        None => EMBEDDED_TABLE.to_string(),
    };

    let tables = compile_tables(&source).map_err(|e| e.to_string())?;
    write_output(options.output.as_deref(), &render_tables(&tables, &config))
}

fn main() {
    let options = match parse_args() {
        Ok(opts) => opts,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!();
            print_usage();
            process::exit(1);
        }
    };

    init_logging(options.verbosity);

    if let Err(e) = run(&options) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
