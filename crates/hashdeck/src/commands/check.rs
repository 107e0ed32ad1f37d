use anyhow::Result;
use colored::Colorize;
use std::path::Path;

use crate::config::Config;
use crate::deck::{Deck, DeckSource};
use crate::document::{ContainerKind, Document};
use crate::loader::LoadOutcome;

/// What loading a deck produced, without opening a window.
struct Report {
    fragments: Option<usize>,
    notes: usize,
    titles: Vec<Option<String>>,
    declared: Option<usize>,
    missing_notes: Vec<usize>,
    orphaned_notes: Vec<usize>,
    /// Diagnostic text when the load failed.
    failure: Option<String>,
}

pub fn run(path: &Path, quiet: bool) -> Result<()> {
    let deck = Deck::load(path)?;
    let config = Config::load_or_default();
    let report = build_report(&deck, &config);

    if !quiet {
        print_report(&deck, &report);
    }
    if let Some(failure) = report.failure {
        anyhow::bail!("{}: {failure}", path.display());
    }
    Ok(())
}

fn build_report(deck: &Deck, config: &Config) -> Report {
    let mut failure = None;
    let mut fragments = None;
    let document = match &deck.source {
        DeckSource::Markdown(content) => Document::from_markdown(content, deck.chrome()),
        DeckSource::Manifest(_) => {
            let mut document = Document::loading(deck.chrome());
            if let Some(source) = deck.content_source() {
                fragments = Some(source.locations().len());
                let outcome = source.with_timeout(config.loader_timeout()).load();
                outcome.inject_into(&mut document);
                if let LoadOutcome::Failed(error) = outcome {
                    failure = Some(error.to_string());
                }
            }
            document
        }
    };

    let diagnostic = document
        .containers()
        .iter()
        .any(|c| c.kind == ContainerKind::Diagnostic);
    if failure.is_none() && (diagnostic || document.slide_indices().is_empty()) {
        failure = Some("no slides found".to_string());
    }

    let titles: Vec<Option<String>> = document
        .slide_indices()
        .into_iter()
        .map(|i| document.containers()[i].title().map(str::to_string))
        .collect();

    let count = if failure.is_some() { 0 } else { titles.len() };
    let notes = deck.notes();
    Report {
        fragments,
        notes: notes.len(),
        declared: deck.expected_slides(),
        missing_notes: if notes.is_empty() {
            Vec::new()
        } else {
            notes.missing(count)
        },
        orphaned_notes: notes.orphaned(count),
        titles,
        failure,
    }
}

fn print_report(deck: &Deck, report: &Report) {
    println!("{} {}", "Deck:".bold(), deck.path.display());
    if let Some(title) = deck.title() {
        println!("{} {title}", "Title:".bold());
    }
    if let Some(fragments) = report.fragments {
        println!("{} {fragments}", "Fragments:".bold());
    }

    if let Some(failure) = &report.failure {
        println!("{} {failure}", "Load failed:".red().bold());
        return;
    }

    let count = report.titles.len();
    match report.declared {
        Some(declared) if declared != count => println!(
            "{} {count} (manifest declares {declared})",
            "Slides:".yellow().bold()
        ),
        _ => println!("{} {count}", "Slides:".bold()),
    }

    for (i, title) in report.titles.iter().enumerate() {
        let title = title.as_deref().unwrap_or("(untitled)");
        println!("  {:>3}  {title}", i.to_string().dimmed());
    }

    if report.notes > 0 {
        println!("{} {}", "Notes:".bold(), report.notes);
    }

    if !report.missing_notes.is_empty() {
        println!(
            "{} {}",
            "Slides without notes:".yellow(),
            join(&report.missing_notes)
        );
    }
    if !report.orphaned_notes.is_empty() {
        println!(
            "{} {}",
            "Notes for missing slides:".yellow(),
            join(&report.orphaned_notes)
        );
    }
}

fn join(indices: &[usize]) -> String {
    indices
        .iter()
        .map(usize::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
