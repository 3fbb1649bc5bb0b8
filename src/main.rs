// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use scour::binary::SegmentHeader;
use scour::{
    Engine, EngineConfig, IndexObserver, IndexReport, JsonDirSource, Namespace, QueryReport,
    SearchError,
};

mod cli;
use cli::display::*;
use cli::{Cli, Commands};

fn main() {
    init_tracing();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", paint(Tone::Error, "error:"), e);
        std::process::exit(1);
    }
}

/// Diagnostics go to stderr so they never mix with results.
fn init_tracing() {
    let filter = EnvFilter::try_from_env("SCOUR_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => EngineConfig::from_file(path)?,
        None => EngineConfig::default(),
    };
    if let Some(dir) = cli.index_dir {
        config.index_dir = dir;
    }

    match cli.command {
        Commands::Index { source, namespaces } => {
            let engine = Engine::new(config)?;
            run_index(&engine, &source, &parse_namespaces(&namespaces)?)
        }
        Commands::Namespaces => run_namespaces(&Engine::new(config)?),
        Commands::Search {
            query,
            namespaces,
            limit,
            json,
        } => {
            if let Some(limit) = limit {
                config.result_limit = limit;
            }
            let engine = Engine::new(config)?;
            run_search(&engine, &query, &parse_namespaces(&namespaces)?, json)
        }
        Commands::Inspect { namespace } => {
            let engine = Engine::new(config)?;
            run_inspect(&engine, &Namespace::new(namespace)?)
        }
    }
}

fn parse_namespaces(names: &[String]) -> Result<Vec<Namespace>> {
    names
        .iter()
        .map(|name| Namespace::new(name.as_str()).map_err(anyhow::Error::from))
        .collect()
}

// ═══════════════════════════════════════════════════════════════════════════
// INDEX
// ═══════════════════════════════════════════════════════════════════════════

/// Per-namespace progress bar with ETA.
#[cfg(feature = "parallel")]
struct ProgressObserver {
    bar: std::cell::RefCell<Option<indicatif::ProgressBar>>,
}

#[cfg(feature = "parallel")]
impl ProgressObserver {
    fn new() -> Self {
        Self {
            bar: std::cell::RefCell::new(None),
        }
    }
}

#[cfg(feature = "parallel")]
impl IndexObserver for ProgressObserver {
    fn namespace_started(&self, namespace: &Namespace, total: usize) {
        use indicatif::{ProgressBar, ProgressStyle};

        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:<12} [{bar:40.cyan/dim}] {pos}/{len} (ETA {eta}) {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("━━╸");

        let bar = ProgressBar::new(total as u64);
        bar.set_style(style);
        bar.set_prefix(namespace.to_string());
        *self.bar.borrow_mut() = Some(bar);
    }

    fn document_fetched(&self, _namespace: &Namespace, key: &str, found: bool) {
        if let Some(bar) = self.bar.borrow().as_ref() {
            if !found {
                bar.println(format!("no document: {}", key));
            }
            bar.set_message(key.to_string());
            bar.inc(1);
        }
    }

    fn namespace_finished(&self, namespace: &Namespace, report: &IndexReport) {
        if let Some(bar) = self.bar.borrow_mut().take() {
            bar.finish_with_message(format!("{} indexed, {} skipped", report.indexed, report.skipped));
        }
        println!("Done indexing {}!", namespace);
    }
}

/// Plain-text progress when built without the `parallel` feature.
#[cfg(not(feature = "parallel"))]
struct ProgressObserver;

#[cfg(not(feature = "parallel"))]
impl ProgressObserver {
    fn new() -> Self {
        Self
    }
}

#[cfg(not(feature = "parallel"))]
impl IndexObserver for ProgressObserver {
    fn namespace_started(&self, namespace: &Namespace, total: usize) {
        println!("Indexing {} ({} documents)...", namespace, total);
    }

    fn document_fetched(&self, _namespace: &Namespace, key: &str, found: bool) {
        if !found {
            println!("no document: {}", key);
        }
    }

    fn namespace_finished(&self, namespace: &Namespace, _report: &IndexReport) {
        println!("Done indexing {}!", namespace);
    }
}

fn run_index(engine: &Engine, source_dir: &Path, namespaces: &[Namespace]) -> Result<()> {
    let source = JsonDirSource::open(source_dir)
        .with_context(|| format!("opening source {}", source_dir.display()))?;

    let observer = ProgressObserver::new();
    let reports = engine.index_from_source(&source, namespaces, &observer)?;

    if reports.is_empty() {
        println!("Could not find documents for the namespaces:");
        for ns in namespaces {
            println!("- {}", ns);
        }
        return Ok(());
    }

    for (namespace, report) in &reports {
        for key in &report.skipped_keys {
            println!("{} {}: {}", paint(Tone::Warning, "no content:"), namespace, key);
        }
    }
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════
// NAMESPACES
// ═══════════════════════════════════════════════════════════════════════════

fn run_namespaces(engine: &Engine) -> Result<()> {
    let mut listed: Vec<_> = engine.list_namespaces()?.into_iter().collect();
    if listed.is_empty() {
        println!("Nothing has been indexed yet!");
        return Ok(());
    }

    listed.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
    println!("Indexed namespaces:");
    for (namespace, modified) in listed {
        println!(
            "- {} (indexed on: {})",
            paint(Tone::Namespace, namespace.as_str()),
            format_timestamp(modified)
        );
    }
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════
// SEARCH
// ═══════════════════════════════════════════════════════════════════════════

fn run_search(engine: &Engine, query: &str, namespaces: &[Namespace], json: bool) -> Result<()> {
    let results = engine.query_many(namespaces, query)?;
    if results.is_empty() {
        println!("Nothing has been indexed yet!");
        return Ok(());
    }

    let mut reports = Vec::new();
    for (namespace, result) in results {
        match result {
            Ok(report) => reports.push(report),
            Err(SearchError::NotIndexed(_)) => {
                println!("{} has not been indexed yet", namespace);
            }
            Err(e) => {
                eprintln!("{} {}: {}", paint(Tone::Error, "error:"), namespace, e);
            }
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for report in &reports {
            print_report(report);
        }
    }
    Ok(())
}

fn print_report(report: &QueryReport) {
    if let Some(corrected) = &report.used_correction {
        println!("Could not find results for '{}'.", report.query);
        println!("Showing results for '{}' instead...", corrected);
    }
    if report.matches.is_empty() {
        println!(
            "{} no results in {}",
            paint(Tone::Muted, "·"),
            report.namespace
        );
        return;
    }

    let formatter = |text: &str| emphasis(text);
    for hit in &report.matches {
        let heading = hit.title.as_deref().unwrap_or(&hit.key);
        println!(
            "{} {} {}",
            score_value(hit.score),
            paint(Tone::Namespace, report.namespace.as_str()),
            bold(heading)
        );
        println!("        {}", paint(Tone::Link, &hit.url));

        let excerpt: Vec<String> = hit
            .fragments
            .iter()
            .map(|fragment| fragment.render(&formatter))
            .collect();
        if !excerpt.is_empty() {
            println!("{}", excerpt.join("... \n"));
        }
        println!();
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// INSPECT
// ═══════════════════════════════════════════════════════════════════════════

fn run_inspect(engine: &Engine, namespace: &Namespace) -> Result<()> {
    let info = engine.segment_info(namespace)?;
    // Full decode verifies the checksum and every structural invariant
    let verified = engine.snapshot(namespace);

    let header = &info.header;
    let offsets = header.section_offsets();
    let path = scour::index::segment_path(engine.root(), namespace);

    banner(&format!("NAMESPACE {}", namespace));

    section_top("SEGMENT");
    row(&format!(
        "  File        {}",
        truncate_path(&path.display().to_string(), 60)
    ));
    row(&format!("  Size        {}", format_size(info.file_size)));
    row(&format!("  Version     {}", header.version));
    row(&format!("  Generation  {}", header.generation));
    row(&format!(
        "  Committed   {}",
        format_timestamp(header.committed_at())
    ));

    section_mid("CONTENTS");
    row(&format!("  Documents   {}", header.doc_count));
    row(&format!("  Terms       {}", header.term_count));
    if let Ok(snapshot) = &verified {
        let postings: usize = snapshot.terms().values().map(|list| list.doc_freq()).sum();
        row(&format!("  Postings    {}", postings));
        row(&format!("  Positions   {}", snapshot.total_positions()));
    }

    section_mid("SECTIONS");
    let sections = [
        ("HEADER", 0, SegmentHeader::SIZE),
        ("DOCS", offsets.docs.0, offsets.docs.1 - offsets.docs.0),
        (
            "VOCABULARY",
            offsets.vocabulary.0,
            offsets.vocabulary.1 - offsets.vocabulary.0,
        ),
        (
            "POSTINGS",
            offsets.postings.0,
            offsets.postings.1 - offsets.postings.0,
        ),
        (
            "FOOTER",
            offsets.footer.0,
            offsets.footer.1 - offsets.footer.0,
        ),
    ];
    for (name, offset, size) in sections {
        row(&format!(
            "  {} @ {:>10}  {}",
            pad_right(&paint(Tone::Section, name), 12),
            offset,
            format_size(size as u64)
        ));
    }

    section_mid("INTEGRITY");
    match &verified {
        Ok(_) => row(&format!(
            "  CRC32       {:#010x}  {}",
            info.crc32,
            paint(Tone::Ok, "ok")
        )),
        Err(e) => {
            row(&format!(
                "  CRC32       {:#010x}  {}",
                info.crc32,
                paint(Tone::Error, "invalid")
            ));
            row(&format!("  {}", truncate_path(&e.to_string(), 76)));
        }
    }
    section_bot();
    Ok(())
}
