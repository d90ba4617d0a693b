use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde_json::json;

use route_dispatch::config::{load_config, RouteConfig};
use route_dispatch::routing::{split_path, Dispatch, PathRequest};
use route_dispatch::{RouteValue, Site};

#[derive(Parser)]
#[command(name = "route-cli")]
#[command(about = "Inspect and exercise a route configuration offline", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate and compile a configuration
    Check { config: PathBuf },
    /// Print the configured route tree
    Tree { config: PathBuf },
    /// Resolve a path (or absolute URL) against a configuration
    Parse {
        config: PathBuf,
        path: String,
        /// Request method; omit to skip method filtering
        #[arg(short, long)]
        method: Option<String>,
    },
    /// Render a route value (JSON) back into a path
    Render { config: PathBuf, route: String },
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check { config } => {
            let loaded = load_config(&config)?;
            Site::compile(&loaded)?;
            println!("{}: ok", config.display());
        }
        Commands::Tree { config } => {
            let loaded = load_config(&config)?;
            print_routes(&loaded.routes, 0);
            for (name, subsite) in &loaded.subsites {
                println!("[subsite {}]", name);
                print_routes(&subsite.routes, 1);
            }
        }
        Commands::Parse { config, path, method } => {
            let site = Site::compile(&load_config(&config)?)?;
            let mut request = PathRequest::new(split_path(&path));
            if let Some(method) = method {
                let method = route_dispatch::config::schema::parse_method(&method)
                    .ok_or_else(|| format!("invalid method `{}`", method))?;
                request = request.with_method(method);
            }

            let outcome = site.resolve(&request);
            let label = outcome.outcome();
            let report = match &outcome {
                Dispatch::Matched { route, .. } => json!({
                    "outcome": label,
                    "segments": request.segments(),
                    "route": route,
                    "path": site.render(route),
                }),
                Dispatch::NotFound => json!({
                    "outcome": label,
                    "segments": request.segments(),
                }),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);

            if outcome.into_route().is_none() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Render { config, route } => {
            let site = Site::compile(&load_config(&config)?)?;
            let value: RouteValue = serde_json::from_str(&route)?;
            match site.render(&value) {
                Some(path) => println!("{}", path),
                None => {
                    eprintln!("Error: route value does not fit the configured tree");
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn print_routes(routes: &[RouteConfig], depth: usize) {
    for route in routes {
        let indent = "  ".repeat(depth);
        let methods = if route.methods.is_empty() {
            "*".to_string()
        } else {
            route.methods.join(",")
        };
        match &route.mount {
            Some(subsite) => println!("{}{} {} -> subsite {}", indent, route.name, route.pattern, subsite),
            None if route.children.is_empty() => {
                println!("{}{} {} [{}]", indent, route.name, route.pattern, methods)
            }
            None => {
                println!("{}{} {}", indent, route.name, route.pattern);
                print_routes(&route.children, depth + 1);
            }
        }
    }
}
