//! yamless command-line tool for validating, querying, and transcoding
//! yamless documents.
//!
//! Usage: yamless [OPTIONS] [FILE|-]
//!
//! Options:
//!   -t, --to <FORMAT>      Output format (yamless, json, yaml, toml) [default: yamless]
//!   -q, --query <PATH>     Select a dotted path such as `server.hosts.0`
//!   -a, --as <TYPE>        Print the selection as int, bigint, float, bool, string or pair
//!   -o, --output <FILE>    Write output to specified file
//!   --check                Check if input is valid (exit 0 if valid, 1 if invalid)
//!   -v, --verbose          Log parser activity to stderr
//!   -h, --help             Print help
//!   -V, --version          Print version
//!
//! Logging goes to stderr and is filtered by the `YAMLESS_LOG` environment
//! variable, using `tracing-subscriber` directive syntax.

use libyamless::{encode, parse_with_filename, CoerceError, Format, Node};
use num_bigint::BigInt;
use std::fs;
use std::io::{self, Read};
use std::path::Path;
use std::process;
use tracing::debug;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

mod transcode;

/// Output format selected with -t.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Yamless,
    Json,
    Yaml,
    Toml,
}

fn parse_target(s: &str) -> Option<Target> {
    match s {
        "yamless" => Some(Target::Yamless),
        "json" => Some(Target::Json),
        "yaml" | "yml" => Some(Target::Yaml),
        "toml" => Some(Target::Toml),
        _ => None,
    }
}

/// Type selected with -a.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Extract {
    Int,
    BigInt,
    Float,
    Bool,
    String,
    Pair,
}

fn parse_extract(s: &str) -> Option<Extract> {
    match s {
        "int" => Some(Extract::Int),
        "bigint" => Some(Extract::BigInt),
        "float" => Some(Extract::Float),
        "bool" => Some(Extract::Bool),
        "string" => Some(Extract::String),
        "pair" => Some(Extract::Pair),
        _ => None,
    }
}

struct Options<'a> {
    target: Target,
    query: Option<&'a str>,
    extract: Option<Extract>,
    output_file: Option<&'a str>,
    check_only: bool,
}

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let mut target: Option<Target> = None;
    let mut query: Option<&str> = None;
    let mut extract: Option<Extract> = None;
    let mut output_file: Option<&str> = None;
    let mut check_only = false;
    let mut verbose = false;
    let mut input_path: Option<&str> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_help();
                return;
            }
            "-V" | "--version" => {
                println!("yamless {}", env!("CARGO_PKG_VERSION"));
                return;
            }
            "-t" | "--to" => {
                let name = option_value(&args, &mut i, "-t requires a format argument");
                match parse_target(name) {
                    Some(t) => target = Some(t),
                    None => {
                        eprintln!("Error: Unknown format: {}", name);
                        process::exit(1);
                    }
                }
            }
            "-q" | "--query" => {
                query = Some(option_value(&args, &mut i, "--query requires a path"));
            }
            "-a" | "--as" => {
                let name = option_value(&args, &mut i, "--as requires a type argument");
                match parse_extract(name) {
                    Some(e) => extract = Some(e),
                    None => {
                        eprintln!("Error: Unknown type: {}", name);
                        process::exit(1);
                    }
                }
            }
            "-o" | "--output" => {
                output_file = Some(option_value(&args, &mut i, "--output requires an argument"));
            }
            "--check" => {
                check_only = true;
            }
            "-v" | "--verbose" => {
                verbose = true;
            }
            "-" => {
                // Explicit stdin
            }
            arg if arg.starts_with('-') => {
                eprintln!("Error: Unknown option: {}", arg);
                process::exit(1);
            }
            _ => {
                if input_path.is_some() {
                    eprintln!("Error: Multiple input paths not supported");
                    process::exit(1);
                }
                input_path = Some(&args[i]);
            }
        }
        i += 1;
    }

    if extract.is_some() && target.is_some() {
        eprintln!("Error: --as and --to are mutually exclusive");
        process::exit(1);
    }

    init_tracing(verbose);

    let input = match input_path {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                eprintln!("Error reading {}: {}", path, e);
                process::exit(1);
            }
        },
        None => {
            let mut buffer = String::new();
            if let Err(e) = io::stdin().read_to_string(&mut buffer) {
                eprintln!("Error reading stdin: {}", e);
                process::exit(1);
            }
            buffer
        }
    };

    let options = Options {
        target: target.unwrap_or(Target::Yamless),
        query,
        extract,
        output_file,
        check_only,
    };
    process::exit(process_input(&input, input_path, &options));
}

/// Consume the argument following an option, or exit with `missing`.
fn option_value<'a>(args: &'a [String], i: &mut usize, missing: &str) -> &'a str {
    *i += 1;
    match args.get(*i) {
        Some(value) => value,
        None => {
            eprintln!("Error: {}", missing);
            process::exit(1);
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    let filter = EnvFilter::builder()
        .with_default_directive(default.into())
        .with_env_var("YAMLESS_LOG")
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn process_input(input: &str, input_file: Option<&str>, options: &Options) -> i32 {
    let filename = input_file.map(|p| {
        Path::new(p)
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| p.to_string())
    });

    let doc = match parse_with_filename(input, filename.as_deref()) {
        Ok(doc) => doc,
        Err(e) => {
            if let Some(path) = input_file {
                eprintln!("{}: {}", path, e);
            } else {
                eprintln!("Parse error: {}", e);
            }
            return 1;
        }
    };

    if options.check_only {
        if let Some(path) = input_file {
            println!("{}: ok", path);
        }
        return 0;
    }

    let node = match options.query {
        Some(path) => {
            let node = doc.pointer(path);
            if !node.is_valid() {
                eprintln!("Error: No value at {}", path);
                return 1;
            }
            debug!(path, kind = node.kind_name(), "selected");
            node
        }
        None => &doc,
    };

    let output = match options.extract {
        Some(kind) => extract(node, kind).map_err(|e| e.to_string()),
        None => render(node, options.target),
    };

    match output {
        Ok(text) => {
            write_text_output(&text, options.output_file);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

/// Read a node as the requested type and format it for printing.
fn extract(node: &Node, kind: Extract) -> Result<String, CoerceError> {
    Ok(match kind {
        Extract::Int => node.to::<i64>()?.to_string(),
        Extract::BigInt => node.to::<BigInt>()?.to_string(),
        Extract::Float => node.to::<f64>()?.to_string(),
        Extract::Bool => node.to::<bool>()?.to_string(),
        Extract::String => node.to::<String>()?,
        Extract::Pair => {
            let (a, b) = node.to::<(String, String)>()?;
            format!("({}, {})", a, b)
        }
    })
}

fn render(node: &Node, target: Target) -> Result<String, String> {
    debug!(?target, "rendering");
    match target {
        Target::Yamless => Ok(encode(node, Format::Yamless)),
        Target::Json => Ok(encode(node, Format::Json)),
        Target::Yaml => {
            transcode::yaml::encode(node).map_err(|e| format!("Cannot convert to YAML: {}", e))
        }
        Target::Toml => {
            transcode::toml::encode(node).map_err(|e| format!("Cannot convert to TOML: {}", e))
        }
    }
}

fn write_text_output(output: &str, output_file: Option<&str>) {
    if let Some(path) = output_file {
        if let Err(e) = fs::write(path, output) {
            eprintln!("Error writing {}: {}", path, e);
            process::exit(1);
        }
    } else {
        print!("{}", output);
        // Ensure output ends with newline
        if !output.ends_with('\n') {
            println!();
        }
    }
}

fn print_help() {
    println!(
        "yamless - yamless command-line tool

USAGE:
    yamless [OPTIONS] [FILE|-]

ARGS:
    [FILE|-]    Input file (reads from stdin if not provided or '-')

OPTIONS:
    -t, --to <FORMAT>      Output format [default: yamless]
                           Supported: yamless, json, yaml, toml

                           Scalars are typed by their text: 42 is an
                           integer, \"42\" is a string, and a key with no
                           value is null. TOML has no null, so documents
                           with absent values cannot be converted to it.

    -q, --query <PATH>     Select a dotted path before output. Numeric
                           segments index sequences, e.g. servers.0.port

    -a, --as <TYPE>        Print the selection as one typed value
                           Supported: int, bigint, float, bool, string, pair

    -o, --output <FILE>    Write output to specified file

    --check                Check if input is valid (exit 0 if valid, 1 if invalid)

    -v, --verbose          Log parser activity to stderr
                           (YAMLESS_LOG overrides, e.g. YAMLESS_LOG=libyamless=trace)

    -h, --help             Print help

    -V, --version          Print version

EXAMPLES:
    # Validate a configuration file
    yamless --check config.yml

    # Print a normalized rendering
    yamless config.yml

    # Convert to JSON
    yamless -t json config.yml

    # Convert to TOML, writing a file
    yamless -t toml config.yml -o config.toml

    # Read one value
    yamless -q node.nested.nested_value -a float config.yml

    # Read a subtree as YAML from stdin
    cat config.yml | yamless -q node.multi_list -t yaml
"
    );
}
