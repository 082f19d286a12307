//! Typed view of the demo config.
//!
//! docfig itself only deals in untyped documents. The demo derives its schema
//! from this struct ([`Schema::from_config`](docfig::Schema::from_config)) and
//! checks conformance by deserializing into it
//! ([`DeserializeCheck`](docfig::DeserializeCheck)).

use confique::Config;
use serde::{Deserialize, Serialize};

/// Root configuration for the demo application.
#[derive(Config, Serialize, Deserialize, Debug)]
pub struct DemoConfig {
    /// Application name shown in the banner.
    #[config(default = "docfig-demo")]
    pub name: String,

    /// Hostname to bind to.
    #[config(default = "127.0.0.1")]
    pub host: String,

    /// Port to listen on.
    #[config(default = 8080)]
    pub port: u16,

    /// Base URL, usually a template over host and port.
    #[config(default = "http://{host}:{port}")]
    pub url: String,

    /// Enable verbose output.
    #[config(default = false)]
    pub verbose: bool,
}
