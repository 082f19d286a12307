//! Clap adapter for docfig.
//!
//! Compiled only when the `clap` Cargo feature is enabled (on by default).
//! [`ConfigArgs`] adds `--config <PATH>` and `--validate <MODE>` flags to an
//! application's parser; [`ConfigArgs::apply()`] feeds them into a
//! [`DocfigBuilder`](crate::DocfigBuilder). Nothing else in the crate depends
//! on clap.

use std::path::PathBuf;

use clap::Args;

use crate::builder::DocfigBuilder;
use crate::types::ValidationMode;

/// Clap-derived config flags.
///
/// Flatten into your app's clap derive:
/// ```ignore
/// #[derive(Parser)]
/// struct Cli {
///     #[command(flatten)]
///     config: ConfigArgs,
/// }
/// ```
#[derive(Debug, Clone, Default, Args)]
pub struct ConfigArgs {
    /// Path to the config file (.json, .yaml, .yml or .toml).
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// What to do when the config does not match its schema: raise, warn or off.
    #[arg(long, value_name = "MODE")]
    pub validate: Option<ValidationMode>,
}

impl ConfigArgs {
    /// Apply the parsed flags to `builder`. Flags that were not passed leave
    /// the builder untouched.
    ///
    /// `--config` takes the place of any env var configured on the builder,
    /// so the flag and the variable never conflict.
    pub fn apply(self, mut builder: DocfigBuilder) -> DocfigBuilder {
        if let Some(path) = self.config {
            builder = builder.no_config_path_env_var().config_path(path);
        }
        if let Some(mode) = self.validate {
            builder = builder.validate(mode);
        }
        builder
    }
}
