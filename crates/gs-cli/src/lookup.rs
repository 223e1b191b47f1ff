use std::io::{self, Write};
use std::path::Path;

use clap::ValueEnum;
use log::{debug, info};
use serde::Serialize;

use gs_core::matcher::Scanner;
use gs_core::{Catalog, MatchRecord};

use crate::input;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

pub struct LookupOptions {
    pub geosite_path: String,
    pub domains_path: String,
    pub show_why: bool,
    pub format: OutputFormat,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct LookupStats {
    pub hosts: usize,
    pub matched: usize,
    pub errors: usize,
}

pub fn run_lookup(opts: LookupOptions) -> Result<(), String> {
    let catalog = Catalog::open(Path::new(&opts.geosite_path)).map_err(|e| e.to_string())?;
    let lines = input::read_domain_lines(Path::new(&opts.domains_path))?;

    let mut scanner = Scanner::new(&catalog);
    info!(
        "Scanning {} entries against {} categories",
        lines.len(),
        catalog.len()
    );

    let mut stdout = io::stdout().lock();
    let stats = lookup_lines(&mut scanner, &lines, opts.format, opts.show_why, &mut stdout)
        .map_err(|e| format!("Failed to write output: {}", e))?;

    debug!(
        "Looked up {} hosts: {} matched, {} errors, {} regex patterns cached ({} invalid)",
        stats.hosts,
        stats.matched,
        stats.errors,
        scanner.cache().len(),
        scanner.cache().failures()
    );
    Ok(())
}

/// Look up each line in order and write one report per line to `out`.
pub fn lookup_lines<W: Write>(
    scanner: &mut Scanner<'_>,
    lines: &[String],
    format: OutputFormat,
    show_why: bool,
    out: &mut W,
) -> io::Result<LookupStats> {
    let mut stats = LookupStats::default();

    for raw in lines {
        match scanner.lookup(raw) {
            Ok((host, matches)) => {
                stats.hosts += 1;
                if !matches.is_empty() {
                    stats.matched += 1;
                }
                match format {
                    OutputFormat::Text => write_text(out, &host, &matches, show_why)?,
                    OutputFormat::Json => write_json(out, &host, &matches, show_why)?,
                }
            }
            Err(e) => {
                stats.errors += 1;
                match format {
                    OutputFormat::Text => writeln!(out, "{}\tERROR\t{}", raw, e)?,
                    OutputFormat::Json => {
                        let line = JsonLine::Error {
                            input: raw,
                            error: e.to_string(),
                        };
                        writeln!(out, "{}", to_json(&line)?)?;
                    }
                }
            }
        }
    }

    Ok(stats)
}

fn write_text<W: Write>(
    out: &mut W,
    host: &str,
    matches: &[MatchRecord],
    show_why: bool,
) -> io::Result<()> {
    writeln!(out, "== {} ==", host)?;
    if matches.is_empty() {
        writeln!(out, "(no geosite match found)")?;
        return writeln!(out);
    }

    for m in matches {
        if show_why {
            writeln!(
                out,
                "{:<42} size={:<6} via={}:{}",
                m.selector, m.group_size, m.strategy, m.rule_value
            )?;
        } else {
            writeln!(out, "{:<42} size={}", m.selector, m.group_size)?;
        }
    }
    writeln!(out)
}

// =============================================================================
// JSON Output
// =============================================================================

#[derive(Serialize)]
#[serde(untagged)]
enum JsonLine<'a> {
    Host {
        host: &'a str,
        matches: Vec<JsonMatch<'a>>,
    },
    Error {
        input: &'a str,
        error: String,
    },
}

#[derive(Serialize)]
struct JsonMatch<'a> {
    selector: &'a str,
    tag: &'a str,
    attribute: &'a str,
    size: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    strategy: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rule: Option<&'a str>,
}

fn write_json<W: Write>(
    out: &mut W,
    host: &str,
    matches: &[MatchRecord],
    show_why: bool,
) -> io::Result<()> {
    let line = JsonLine::Host {
        host,
        matches: matches
            .iter()
            .map(|m| JsonMatch {
                selector: &m.selector,
                tag: &m.tag,
                attribute: &m.attribute,
                size: m.group_size,
                strategy: show_why.then_some(m.strategy.as_str()),
                rule: show_why.then_some(m.rule_value.as_str()),
            })
            .collect(),
    };
    writeln!(out, "{}", to_json(&line)?)
}

fn to_json<T: Serialize>(value: &T) -> io::Result<String> {
    serde_json::to_string(value).map_err(io::Error::other)
}
