use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use siteaccess_router::config::{load_config, AppConfig};
use siteaccess_router::http::response;
use siteaccess_router::{FrontController, Request};

#[derive(Parser)]
#[command(name = "siteaccess-cli")]
#[command(about = "Inspect siteaccess matching and pipeline decisions offline", long_about = None)]
struct Cli {
    /// TOML configuration file; built-in defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show which siteaccess an absolute URL resolves to
    Match { url: String },
    /// Run the pipeline for an absolute URL and print its disposition
    Resolve {
        url: String,
        /// Flag the request for a permanent redirect
        #[arg(long)]
        needs_redirect: bool,
        /// Re-insert the siteaccess prefix into the redirect target
        #[arg(long)]
        prepend_siteaccess: bool,
    },
    /// Build an outbound link for a semantic path under the URL's siteaccess
    Link { url: String, path: String },
    /// Load and validate the configuration
    Check,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };

    if let Commands::Check = cli.command {
        print_json(&json!({
            "valid": true,
            "default": config.siteaccess.default,
            "matchers": config.siteaccess.matchers.len(),
        }))?;
        return Ok(());
    }

    let controller = FrontController::from_config(&config)?;

    match cli.command {
        Commands::Match { url } => {
            let mut request = Request::create(&url)?;
            controller.bind(&mut request);
            let siteaccess = request.attributes.siteaccess.as_ref();
            print_json(&json!({
                "siteaccess": siteaccess.map(|sa| sa.name()),
                "matching_type": siteaccess.map(|sa| sa.matching_type()),
                "has_uri_lexer": siteaccess.is_some_and(|sa| sa.has_uri_lexer()),
                "semantic_pathinfo": request.attributes.semantic_pathinfo,
            }))?;
        }
        Commands::Resolve {
            url,
            needs_redirect,
            prepend_siteaccess,
        } => {
            let mut request = Request::create(&url)?;
            request.attributes.needs_redirect = needs_redirect;
            request.attributes.prepend_siteaccess_on_redirect = prepend_siteaccess;

            let resolution = controller.resolve(request)?;
            let attributes = &resolution.request.attributes;
            let disposition = match &resolution.response {
                Some(terminal) => json!({
                    "terminal": true,
                    "status": terminal.status().as_u16(),
                    "location": response::location(terminal),
                }),
                None => json!({ "terminal": false }),
            };
            print_json(&json!({
                "siteaccess": resolution.request.siteaccess_name(),
                "semantic_pathinfo": attributes.semantic_pathinfo,
                "needs_forward": attributes.needs_forward,
                "needs_redirect": attributes.needs_redirect,
                "disposition": disposition,
            }))?;
        }
        Commands::Link { url, path } => {
            let mut request = Request::create(&url)?;
            controller.bind(&mut request);
            let link = match &request.attributes.siteaccess {
                Some(siteaccess) => siteaccess.analyse_link(&path),
                None => path,
            };
            print_json(&json!({
                "siteaccess": request.siteaccess_name(),
                "link": link,
            }))?;
        }
        Commands::Check => {}
    }

    Ok(())
}

fn print_json(value: &Value) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
