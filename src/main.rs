//! Command-line interface for vnfd-convert

#[cfg(feature = "cli")]
use clap::{ArgAction, Parser, Subcommand};

#[cfg(feature = "cli")]
use std::fs;
#[cfg(feature = "cli")]
use std::path::{Path, PathBuf};

#[cfg(feature = "cli")]
use tracing_subscriber::EnvFilter;

#[cfg(feature = "cli")]
use vnfd_convert::converters::{Converter, ConverterConfig, Sol1Converter, Sol6Converter};
#[cfg(feature = "cli")]
use vnfd_convert::documents::{from_yaml_str, to_json_string, to_yaml_string, Tree};
#[cfg(feature = "cli")]
use vnfd_convert::keys::SchemaKeys;
#[cfg(feature = "cli")]
use vnfd_convert::loaders::Loader;
#[cfg(feature = "cli")]
use vnfd_convert::locations::Location;
#[cfg(feature = "cli")]
use vnfd_convert::paths::find_all;

#[cfg(feature = "cli")]
type CliResult = Result<(), Box<dyn std::error::Error>>;

#[cfg(feature = "cli")]
#[derive(Parser, Debug)]
#[command(name = "vnfd-convert")]
#[command(author, version, about = "TOSCA (SOL001) and SOL006 VNF descriptor converter", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert a TOSCA descriptor to a SOL006 VNFD
    #[command(name = "to-sol6")]
    ToSol6 {
        /// Path to the TOSCA YAML file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output skeleton (defaults to the built-in one)
        #[arg(long, value_name = "SKELETON")]
        skeleton: Option<PathBuf>,

        /// Key table overriding the built-in paths
        #[arg(short, long, value_name = "KEYS")]
        keys: Option<PathBuf>,

        /// Template input value, as NAME=VALUE (repeatable)
        #[arg(short, long = "input", value_name = "NAME=VALUE", value_parser = parse_input)]
        inputs: Vec<(String, String)>,

        /// Create output containers missing from the skeleton
        #[arg(long)]
        lenient: bool,

        /// Keep unit suffixes on sizes ("8 GB")
        #[arg(long)]
        keep_units: bool,

        /// Output as JSON instead of YAML
        #[arg(short, long)]
        json: bool,

        /// Pretty print JSON output
        #[arg(short, long)]
        pretty: bool,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Convert a SOL006 VNFD back to a TOSCA skeleton
    #[command(name = "to-sol1")]
    ToSol1 {
        /// Path to the SOL006 YAML or JSON file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Key table overriding the built-in paths
        #[arg(short, long, value_name = "KEYS")]
        keys: Option<PathBuf>,

        /// Write requirements as a mapping instead of a list
        #[arg(long)]
        requirements_map: bool,

        /// Output as JSON instead of YAML
        #[arg(short, long)]
        json: bool,

        /// Pretty print JSON output
        #[arg(short, long)]
        pretty: bool,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List every subtree holding a key (and value)
    Find {
        /// Path to the document
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Key to look for
        #[arg(short, long)]
        key: String,

        /// Required value of the key
        #[arg(long)]
        value: Option<String>,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Print the built-in key table
    Keys {
        /// Output as JSON instead of YAML
        #[arg(short, long)]
        json: bool,
    },
}

#[cfg(feature = "cli")]
fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let result = match cli.command {
        Commands::ToSol6 {
            file,
            skeleton,
            keys,
            inputs,
            lenient,
            keep_units,
            json,
            pretty,
            output,
        } => {
            let config = ConverterConfig::new()
                .with_strict_structure(!lenient)
                .with_strip_units(!keep_units);
            cmd_to_sol6(file, skeleton, keys, inputs, config, json, pretty, output)
        }
        Commands::ToSol1 {
            file,
            keys,
            requirements_map,
            json,
            pretty,
            output,
        } => {
            let config = ConverterConfig::new().with_requirements_as_list(!requirements_map);
            cmd_to_sol1(file, keys, config, json, pretty, output)
        }
        Commands::Find {
            file,
            key,
            value,
            json,
        } => cmd_find(file, key, value, json),
        Commands::Keys { json } => cmd_keys(json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(feature = "cli")]
fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    // RUST_LOG wins over the flags
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(feature = "cli")]
fn parse_input(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected NAME=VALUE, got '{}'", s)),
    }
}

#[cfg(feature = "cli")]
fn load_keys(path: Option<&Path>) -> Result<SchemaKeys, Box<dyn std::error::Error>> {
    let keys = match path {
        Some(path) => SchemaKeys::from_tree(&Loader::new().load(&Location::path(path))?)?,
        None => SchemaKeys::default(),
    };
    keys.validate()?;
    Ok(keys)
}

/// Run `converter` on the document read from `file`
#[cfg(feature = "cli")]
fn convert_file<C: Converter>(converter: C, file: &Path) -> vnfd_convert::Result<Tree> {
    tracing::info!(
        file = %file.display(),
        from = %converter.source_dialect(),
        to = %converter.target_dialect(),
        "converting descriptor"
    );
    converter.convert()
}

#[allow(clippy::too_many_arguments)]
#[cfg(feature = "cli")]
fn cmd_to_sol6(
    file: PathBuf,
    skeleton: Option<PathBuf>,
    keys: Option<PathBuf>,
    inputs: Vec<(String, String)>,
    config: ConverterConfig,
    json: bool,
    pretty: bool,
    output: Option<PathBuf>,
) -> CliResult {
    let loader = Loader::new();
    let keys = load_keys(keys.as_deref())?;
    let source = loader.load(&Location::path(&file))?;
    let skeleton = match skeleton {
        Some(path) => loader.load(&Location::path(path))?,
        None => keys.sol6.skeleton()?,
    };

    let mut converter = Sol6Converter::new(&source, skeleton, &keys, config);
    for (name, value) in inputs {
        // Values are typed like YAML scalars ("4" is a number)
        let value = from_yaml_str(&value).unwrap_or_else(|_| Tree::from(value.as_str()));
        converter = converter.with_input(name, value);
    }

    let tree = convert_file(converter, &file)?;
    write_output(&tree, json, pretty, output.as_deref())
}

#[cfg(feature = "cli")]
fn cmd_to_sol1(
    file: PathBuf,
    keys: Option<PathBuf>,
    config: ConverterConfig,
    json: bool,
    pretty: bool,
    output: Option<PathBuf>,
) -> CliResult {
    let keys = load_keys(keys.as_deref())?;
    let source = Loader::new().load(&Location::path(&file))?;

    let converter = Sol1Converter::new(source, &keys).with_config(config);
    let tree = convert_file(converter, &file)?;
    write_output(&tree, json, pretty, output.as_deref())
}

#[cfg(feature = "cli")]
fn cmd_find(file: PathBuf, key: String, value: Option<String>, json: bool) -> CliResult {
    let document = Loader::new().load(&Location::path(&file))?;
    let value = value.map(|v| Tree::from(v.as_str()));

    let found = find_all(&document, &key, value.as_ref())
        .ok_or("document root is not a mapping")?;

    if json {
        let items: Vec<serde_json::Value> = found
            .iter()
            .map(|s| {
                serde_json::json!({
                    "name": s.name(),
                    "node": s.node,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&items)?);
    } else {
        for subtree in &found {
            println!("{}: {}", subtree.name().unwrap_or("<unnamed>"), subtree.node.describe());
        }
        println!("{} match(es)", found.len());
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn cmd_keys(json: bool) -> CliResult {
    let keys = SchemaKeys::default();
    if json {
        println!("{}", serde_json::to_string_pretty(&keys)?);
    } else {
        print!("{}", serde_yaml::to_string(&keys)?);
    }
    Ok(())
}

#[cfg(feature = "cli")]
fn write_output(tree: &Tree, json: bool, pretty: bool, output: Option<&Path>) -> CliResult {
    let text = if json {
        to_json_string(tree, pretty)?
    } else {
        to_yaml_string(tree)?
    };

    if let Some(output_path) = output {
        fs::write(output_path, &text)?;
    } else {
        println!("{}", text.trim_end());
    }

    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Rebuild with --features cli");
    std::process::exit(1);
}
