//! Siteaccess router front end.
//!
//! # Architecture Overview
//!
//! ```text
//!                  ┌──────────────────────────────────────────────────────┐
//!                  │                  SITEACCESS ROUTER                    │
//!                  │                                                      │
//!  Client Request  │  ┌─────────┐    ┌──────────────┐    ┌────────────┐   │
//!  ────────────────┼─▶│  http   │───▶│    kernel    │───▶│  routing   │   │
//!                  │  │ server  │    │ front ctrl.  │    │  matchers  │   │
//!                  │  └─────────┘    └──────┬───────┘    └────────────┘   │
//!                  │                        │                             │
//!                  │                        ▼                             │
//!                  │                 ┌──────────────┐                     │
//!                  │                 │   pipeline   │ setup → index       │
//!                  │                 │    stages    │ → forward → redirect│
//!                  │                 └──────┬───────┘                     │
//!                  │                        ▼                             │
//!  Client Response │  ┌─────────┐    ┌──────────────┐                     │
//!  ◀───────────────┼──│response │◀───│   renderer   │                     │
//!                  │  └─────────┘    └──────────────┘                     │
//!                  │                                                      │
//!                  │   config (toml + hot reload) · observability ·       │
//!                  │   lifecycle (startup / graceful shutdown)            │
//!                  └──────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(name = "siteaccess-router")]
#[command(about = "Siteaccess matching front end", long_about = None)]
struct Args {
    /// TOML configuration file; built-in defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    siteaccess_router::lifecycle::start(args.config.as_deref()).await?;
    Ok(())
}
