//! # docfig demo application
//!
//! A sample CLI tool that shows how an application wires docfig in. It is
//! not a real app; it exists to demonstrate and manually check docfig's
//! behavior.
//!
//! ## Running
//!
//! ```sh
//! cargo run --example docfig_demo -- show
//! RUST_LOG=docfig=debug cargo run --example docfig_demo -- show
//! ```
//!
//! ## Features demonstrated
//!
//! | Feature               | How to exercise it                                                          |
//! |-----------------------|-----------------------------------------------------------------------------|
//! | Defaults only         | `cargo run --example docfig_demo -- show`                                   |
//! | Env var path          | `DOCFIG_DEMO_CONFIG=demo.json cargo run --example docfig_demo -- show`      |
//! | Explicit path         | `cargo run --example docfig_demo -- --config demo.toml show`                |
//! | Platform default path | Place `docfig-demo.toml` in the platform config dir                         |
//! | Template expansion    | `url` is expanded from `host` and `port`                                    |
//! | Validation            | `cargo run --example docfig_demo -- --validate raise show`                  |
//! | Single key            | `cargo run --example docfig_demo -- show --key port`                        |
//! | Write a file          | `cargo run --example docfig_demo -- write demo.json --overwrite prompt`     |
//! | Edit one TOML key     | `cargo run --example docfig_demo -- set demo.toml port 9000`                |
//! | Debug logging         | `RUST_LOG=docfig=debug cargo run --example docfig_demo -- show`             |

mod config;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde_json::{Value, json};
use tracing_subscriber::EnvFilter;

use docfig::{
    ConfigArgs, DefaultPath, DeserializeCheck, Docfig, DocfigBuilder, DocfigError, Document,
    Overwrite, Schema, ValidationMode,
};

use config::DemoConfig;

/// docfig demo: a sample CLI app for showcasing docfig integration.
#[derive(Parser, Debug)]
#[command(name = "docfig-demo")]
struct Cli {
    #[command(flatten)]
    config: ConfigArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the resolved configuration.
    Show {
        /// Print only this key.
        #[arg(long)]
        key: Option<String>,
    },
    /// Write the resolved configuration to a .json or .toml file.
    Write {
        output: PathBuf,

        /// What to do if the file already exists.
        #[arg(long, value_enum, default_value_t = OverwriteArg::Deny)]
        overwrite: OverwriteArg,
    },
    /// Set one top-level key in a TOML file, keeping its comments.
    Set {
        path: PathBuf,
        key: String,
        /// Parsed as JSON when possible, otherwise taken as a string.
        value: String,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OverwriteArg {
    Deny,
    Allow,
    Prompt,
}

impl From<OverwriteArg> for Overwrite {
    fn from(arg: OverwriteArg) -> Self {
        match arg {
            OverwriteArg::Deny => Overwrite::Deny,
            OverwriteArg::Allow => Overwrite::Allow,
            OverwriteArg::Prompt => Overwrite::Prompt,
        }
    }
}

/// Create a [`DocfigBuilder`] wired up for the demo app.
///
/// Path: `--config`, else `$DOCFIG_DEMO_CONFIG`, else
/// `docfig-demo.toml` in the platform config directory.
fn make_builder(args: ConfigArgs) -> DocfigBuilder {
    let builder = Docfig::builder()
        .config_path_env_var("DOCFIG_DEMO_CONFIG")
        .default_config_path(DefaultPath::Platform {
            app_name: "docfig-demo".into(),
            file_name: "docfig-demo.toml".into(),
        })
        .default_value("name", "docfig-demo")
        .default_value("host", "127.0.0.1")
        .default_value("port", 8080)
        .default_value("url", "http://{host}:{port}")
        .default_value("verbose", false)
        .schema(Schema::from_config::<DemoConfig>())
        .checker(DeserializeCheck::<DemoConfig>::new().deny_unknown(true));

    args.apply(builder)
}

/// Build the template variables for `url` from the loaded host and port.
fn url_vars(doc: &Document) -> Document {
    let mut vars = Document::new();
    for key in ["host", "port"] {
        if let Some(v) = doc.get(key) {
            vars.insert(key.to_string(), v.clone());
        }
    }
    vars
}

fn load(args: ConfigArgs) -> Result<Document, DocfigError> {
    // First pass only finds host and port; the second expands url and validates.
    let raw = make_builder(args.clone())
        .validate(ValidationMode::Off)
        .load()?;
    make_builder(args).template("url", url_vars(&raw)).load()
}

fn show(config: &Document, key: Option<&str>) {
    match key {
        Some(k) => match config.get(k) {
            Some(Value::String(s)) => println!("{s}"),
            Some(v) => println!("{v}"),
            None => {
                eprintln!("Unknown key: {k}");
                std::process::exit(1);
            }
        },
        None => {
            let width = config.keys().map(String::len).max().unwrap_or(0);
            for (k, v) in config {
                println!("{k:<width$}  {v}");
            }
        }
    }
}

fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| json!(raw))
}

fn run(cli: Cli) -> Result<(), DocfigError> {
    match cli.command {
        Commands::Show { key } => {
            let config = load(cli.config)?;
            show(&config, key.as_deref());
        }
        Commands::Write { output, overwrite } => {
            let config = load(cli.config)?;
            docfig::write_document(&config, &output, overwrite.into())?;
            println!("Wrote {}", output.display());
        }
        Commands::Set { path, key, value } => {
            docfig::set_top_level_key(&path, &key, &parse_value(&value))?;
            println!("Set {key} in {}", path.display());
        }
    }
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error:\n{e}");
        std::process::exit(1);
    }
}
