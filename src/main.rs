//! GridClassKey CLI
//!
//! Usage:
//!   gridclasskey [OPTIONS] <TEMPLATE>
//!
//! Options:
//!   -p, --placeholders <FILE>  Nested placeholder data (JSON, or TOML by extension)
//!       --prefix <PREFIX>      Prefix for the flattened placeholder keys
//!   -s, --site <FILE>          Site file with [settings] and [lexicon.*] tables (TOML)
//!   -c, --chunks <DIR>         Directory of chunk files
//!   -t, --process-tags         Run the tag post-processor over the output
//!       --check                Report tag syntax errors instead of rendering
//!   -v, --verbose              Debug logging on stderr
//!   -h, --help                 Print help

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use gridclasskey::config::CHUNKS_PATH_KEY;
use gridclasskey::template::CHUNK_FILE_SUFFIX;
use gridclasskey::{
    Binding, ConfigMap, GridClassKey, Host, InMemoryRegistry, Lexicon, Placeholders, Settings,
    TagParser, TagPass,
};

#[derive(Parser)]
#[command(name = "gridclasskey")]
#[command(about = "Render template references with flattened placeholders")]
struct Cli {
    /// Template reference: @INLINE:<code>, @FILE:<path>, @CHUNK:<name> or a chunk name
    template: String,

    /// Nested placeholder data (JSON, or TOML for .toml files)
    #[arg(short, long)]
    placeholders: Option<PathBuf>,

    /// Prefix for the flattened placeholder keys
    #[arg(long)]
    prefix: Option<String>,

    /// Site file with [settings] and [lexicon.<topic>] tables (TOML)
    #[arg(short, long)]
    site: Option<PathBuf>,

    /// Directory of chunk files, also used as the fallback chunks path
    #[arg(short, long)]
    chunks: Option<PathBuf>,

    /// Run the tag post-processor over the rendered output
    #[arg(short = 't', long)]
    process_tags: bool,

    /// Report tag syntax errors in the template source instead of rendering
    #[arg(long)]
    check: bool,

    /// Debug logging on stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    // Load site settings and lexicon
    let (settings, lexicon) = match &cli.site {
        Some(path) => match Settings::site_from_file(path) {
            Ok(site) => site,
            Err(e) => {
                eprintln!("Error loading site file '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => (Settings::default(), Lexicon::new()),
    };

    let mut host = Host::new(settings).with_lexicon(lexicon);
    let mut config = ConfigMap::new();

    if let Some(dir) = &cli.chunks {
        match InMemoryRegistry::from_dir(dir) {
            Ok(registry) => host = host.with_registry(registry),
            Err(e) => {
                eprintln!("Error loading chunks from '{}': {}", dir.display(), e);
                std::process::exit(1);
            }
        }
        config.insert(
            CHUNKS_PATH_KEY.to_string(),
            Value::String(format!("{}/", dir.display())),
        );
    }

    let mut gck = GridClassKey::new(host, config);

    if cli.check {
        std::process::exit(check(&gck, &cli.template));
    }

    let placeholders = match &cli.placeholders {
        Some(path) => {
            let data = match read_data(path) {
                Ok(data) => data,
                Err(e) => {
                    eprintln!("Error reading placeholders '{}': {}", path.display(), e);
                    std::process::exit(1);
                }
            };
            gck.set_placeholders(&data, cli.prefix.as_deref())
                .unwrap_or_default()
        }
        None => Placeholders::new(),
    };

    let mut output = gck.parse_tpl(&cli.template, &placeholders);
    if cli.process_tags {
        output = gck.process_element_tags(&output, None);
    }
    println!("{}", output);
}

/// Read nested data from a JSON or TOML file
fn read_data(path: &Path) -> Result<Value, String> {
    let content = fs::read_to_string(path).map_err(|e| e.to_string())?;
    if path.extension().is_some_and(|ext| ext == "toml") {
        toml::from_str(&content).map_err(|e| e.to_string())
    } else {
        serde_json::from_str(&content).map_err(|e| e.to_string())
    }
}

/// Print syntax reports for the template's source; returns the exit code
fn check(gck: &GridClassKey, reference: &str) -> i32 {
    let chunks_path = gck
        .config()
        .get(CHUNKS_PATH_KEY)
        .and_then(Value::as_str)
        .unwrap_or_default();

    let (name, source) = match Binding::parse(reference) {
        Binding::Inline(code) => ("inline".to_string(), code),
        Binding::File(path) => {
            let path = gck.replace_prop_phs(&path);
            match fs::read_to_string(&path) {
                Ok(source) => (path, source),
                Err(e) => {
                    eprintln!("Error reading file '{}': {}", path, e);
                    return 1;
                }
            }
        }
        Binding::Chunk(name) => match gck.host().registry().get_chunk(&name) {
            Some(chunk) => (name, chunk.content().to_string()),
            None => {
                let file = format!("{}{}{}", chunks_path, name.to_lowercase(), CHUNK_FILE_SUFFIX);
                match fs::read_to_string(&file) {
                    Ok(source) => (file, source),
                    Err(e) => {
                        eprintln!("Error: chunk '{}' not found ({}: {})", name, file, e);
                        return 1;
                    }
                }
            }
        },
    };

    let errors = TagParser::new().check(&source, &TagPass::default());
    for error in &errors {
        eprintln!("{}", error.format(&source, &name));
    }

    if errors.is_empty() {
        println!("{}: no tag errors", name);
        0
    } else {
        1
    }
}
