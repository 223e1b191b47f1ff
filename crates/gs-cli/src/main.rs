//! geoscan CLI
//!
//! CLI tool for classifying hosts against a geosite catalog and packaging
//! domain lists into routing tokens.

mod input;
mod lookup;

use std::fs;
use std::io::Write;
use std::path::Path;

use clap::{ArgAction, Parser, Subcommand};

use gs_core::{Catalog, CatalogIndex};
use gs_route::{build_route, dedupe_domains, encode_token, parse_domain_list, RouteOptions};

use crate::lookup::{LookupOptions, OutputFormat};

#[derive(Parser)]
#[command(name = "geoscan")]
#[command(about = "Find which geosite categories a domain belongs to")]
struct Cli {
    /// Verbose logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report every geosite selector each listed domain matches
    Lookup {
        /// Path to geosite.dat (v2fly/domain-list-community build)
        #[arg(long, default_value = "dlc.dat")]
        geosite: String,

        /// Path to file with domains/urls (one per line)
        #[arg(long, default_value = "domains.txt")]
        domains: String,

        /// Show a brief reason (matched rule type/value)
        #[arg(long, default_value_t = true, action = ArgAction::Set)]
        why: bool,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Dump catalog info
    Info {
        /// Path to geosite.dat
        #[arg(long, default_value = "dlc.dat")]
        geosite: String,

        /// Show group sizes for one tag
        #[arg(long)]
        tag: Option<String>,
    },

    /// Package a domain list into a v2rayTun import_route token
    Route {
        /// Domain list file (one per line)
        input: String,

        /// Outbound tag the domains are routed to
        #[arg(long, default_value = "direct")]
        outbound: String,

        /// Route and rule name
        #[arg(long, default_value = "Default")]
        name: String,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Lookup {
            geosite,
            domains,
            why,
            format,
        } => lookup::run_lookup(LookupOptions {
            geosite_path: geosite,
            domains_path: domains,
            show_why: why,
            format,
        }),
        Commands::Info { geosite, tag } => cmd_info(&geosite, tag.as_deref()),
        Commands::Route {
            input,
            outbound,
            name,
        } => cmd_route(&input, outbound, name),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn cmd_info(geosite: &str, tag: Option<&str>) -> Result<(), String> {
    let catalog = Catalog::open(Path::new(geosite)).map_err(|e| e.to_string())?;
    let index = CatalogIndex::build(&catalog);
    let counts = catalog.strategy_counts();

    println!("Catalog: {}", geosite);
    println!("  Categories:  {}", catalog.len());
    println!("  Rules:       {}", catalog.rule_count());
    println!();
    println!("Rules by type:");
    println!("  plain:       {}", counts.plain);
    println!("  domain:      {}", counts.domain);
    println!("  full:        {}", counts.full);
    println!("  regex:       {}", counts.regex);
    if counts.unknown > 0 {
        println!("  unknown:     {}", counts.unknown);
    }

    if let Some(tag) = tag {
        if catalog.get(tag).is_none() {
            return Err(format!("Tag '{}' not found in '{}'", tag, geosite));
        }
        println!();
        println!("geosite:{}", tag);
        println!("  size:        {}", index.base_size(tag));
        for (key, size) in index.attributes_of(tag) {
            println!("  @{:<11} {}", key, size);
        }
    }

    Ok(())
}

fn cmd_route(input: &str, outbound: String, name: String) -> Result<(), String> {
    let content =
        fs::read_to_string(input).map_err(|e| format!("Failed to read '{}': {}", input, e))?;

    let mut domains = parse_domain_list(&content);
    dedupe_domains(&mut domains);

    let opts = RouteOptions {
        name,
        outbound_tag: outbound,
    };
    let route = build_route(domains, &opts).map_err(|e| e.to_string())?;
    let token = encode_token(&route).map_err(|e| e.to_string())?;

    let mut stdout = std::io::stdout().lock();
    write!(stdout, "{}", token)
        .and_then(|_| stdout.flush())
        .map_err(|e| format!("Failed to write token: {}", e))
}
