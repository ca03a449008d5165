//! Shared output formatting for query commands.

use notegraph_core::backlinks::Backlink;
use notegraph_core::index::{Completion, Definition, Location, TagSummary};
use notegraph_core::links::Reference;
use serde::Serialize;

use crate::OutputFormat;

const MAX_COLUMN_WIDTH: usize = 50;

/// A query result printable as a table row, JSON object or bare path.
pub trait Render: Serialize {
    const HEADERS: &'static [&'static str];

    fn row(&self) -> Vec<String>;

    /// The value printed in quiet mode.
    fn key(&self) -> String;
}

impl<T: Render> Render for &T {
    const HEADERS: &'static [&'static str] = T::HEADERS;

    fn row(&self) -> Vec<String> {
        (*self).row()
    }

    fn key(&self) -> String {
        (*self).key()
    }
}

impl Render for Backlink {
    const HEADERS: &'static [&'static str] = &["SOURCE", "LINE", "RANGE"];

    fn row(&self) -> Vec<String> {
        vec![
            self.source_path.clone(),
            self.line.to_string(),
            format!("{}..{}", self.range.start, self.range.end),
        ]
    }

    fn key(&self) -> String {
        self.source_path.clone()
    }
}

impl Render for Location {
    const HEADERS: &'static [&'static str] = &["PATH"];

    fn row(&self) -> Vec<String> {
        vec![self.path.clone()]
    }

    fn key(&self) -> String {
        self.path.clone()
    }
}

impl Render for Definition {
    const HEADERS: &'static [&'static str] = &["PATH", "TITLE", "MATCH"];

    fn row(&self) -> Vec<String> {
        vec![self.path.clone(), self.title.clone(), self.tier.as_str().to_string()]
    }

    fn key(&self) -> String {
        self.path.clone()
    }
}

impl Render for Completion {
    const HEADERS: &'static [&'static str] = &["PATH", "TITLE"];

    fn row(&self) -> Vec<String> {
        vec![self.path.clone(), self.title.clone()]
    }

    fn key(&self) -> String {
        self.path.clone()
    }
}

impl Render for TagSummary {
    const HEADERS: &'static [&'static str] = &["TAG", "COUNT"];

    fn row(&self) -> Vec<String> {
        vec![format!("#{}", self.tag), self.count.to_string()]
    }

    fn key(&self) -> String {
        self.tag.clone()
    }
}

impl Render for Reference {
    const HEADERS: &'static [&'static str] = &["SOURCE", "LINE", "LABEL"];

    fn row(&self) -> Vec<String> {
        vec![self.source_path.clone(), self.line.to_string(), self.raw_label.clone()]
    }

    fn key(&self) -> String {
        format!("{}:{}", self.source_path, self.line)
    }
}

/// Print results in the requested format. `noun` names the items in table mode.
pub fn print<T: Render>(items: &[T], noun: &str, format: OutputFormat) {
    match format {
        OutputFormat::Table => print_table(items, noun),
        OutputFormat::Json => print_json(items),
        OutputFormat::Quiet => {
            for item in items {
                println!("{}", item.key());
            }
        }
    }
}

/// Print any serializable value as pretty JSON.
pub fn print_json<T: Serialize + ?Sized>(value: &T) {
    println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
}

fn print_table<T: Render>(items: &[T], noun: &str) {
    if items.is_empty() {
        println!("(no {} found)", noun);
        return;
    }

    let rows: Vec<Vec<String>> = items.iter().map(|item| item.row()).collect();
    let widths: Vec<usize> = T::HEADERS
        .iter()
        .enumerate()
        .map(|(i, h)| {
            rows.iter()
                .map(|r| r.get(i).map_or(0, |c| c.chars().count()))
                .max()
                .unwrap_or(0)
                .clamp(h.len(), MAX_COLUMN_WIDTH.max(h.len()))
        })
        .collect();

    let header: Vec<String> =
        T::HEADERS.iter().zip(&widths).map(|(h, w)| format!("{:<w$}", h, w = w)).collect();
    println!("{}", header.join("  ").trim_end());
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    println!("{}", rule.join("  "));

    for row in &rows {
        let cells: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{:<w$}", truncate(c, *w), w = w))
            .collect();
        println!("{}", cells.join("  ").trim_end());
    }

    println!();
    println!("-- {} {} --", items.len(), noun);
}

/// Truncate string with ellipsis if needed.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len > 3 {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    } else {
        s.chars().take(max_len).collect()
    }
}
