use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::models::{AttributionEntry, AttributionModel};

/// Print a summary of the attribution model.
pub fn render(model: &AttributionModel, verbose: bool, quiet: bool) {
    let total = model.entries.len();
    let licenses = model.distinct_licenses().len();
    let unlicensed = model.entries.iter().filter(|e| e.licenses.is_empty()).count();
    let missing_text = model
        .distinct_licenses()
        .iter()
        .filter(|l| l.text == crate::license::entry::NO_LICENSE_TEXT)
        .count();

    if quiet {
        println!(
            "Packages: {}  Licenses: {}  Unlicensed: {}  Missing texts: {}",
            total,
            licenses,
            unlicensed.to_string().yellow(),
            missing_text.to_string().yellow(),
        );
        return;
    }

    println!(
        "\n {} v{}",
        "attribution-report".bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!(
        " Project: {} {}\n",
        model.project.name,
        model.project.version
    );

    println!(" ┌────────────────────────────────────────────────────┐");
    println!(" │  {:<48} │", "SUMMARY".bold());
    println!(" │  {:<48} │", format!("Packages           : {:>4}", total));
    println!(" │  {:<48} │", format!("Distinct licenses  : {:>4}", licenses));
    println!(
        " │  {:<48} │",
        format!("{}  No license      : {:>4}", "⚠".yellow(), unlicensed)
    );
    println!(
        " │  {:<48} │",
        format!("{}  No license text : {:>4}", "⚠".yellow(), missing_text)
    );
    println!(" └────────────────────────────────────────────────────┘\n");

    if unlicensed > 0 {
        println!(" {} Packages without a license:\n", "[WARN]".yellow().bold());
        render_table(model.entries.iter().filter(|e| e.licenses.is_empty()));
        println!();
    }

    if verbose && total > 0 {
        println!(" {} All packages:\n", "[INFO]".cyan().bold());
        render_table(model.entries.iter());
        println!();
    }
}

fn render_table<'a>(entries: impl Iterator<Item = &'a AttributionEntry>) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Package").add_attribute(Attribute::Bold),
            Cell::new("Binary").add_attribute(Attribute::Bold),
            Cell::new("Licenses").add_attribute(Attribute::Bold),
            Cell::new("Copyrights").add_attribute(Attribute::Bold),
        ]);

    for entry in entries {
        let licenses = if entry.licenses.is_empty() {
            Cell::new("none").fg(Color::Yellow)
        } else {
            Cell::new(license_list(entry))
        };

        table.add_row(vec![
            Cell::new(&entry.purl),
            Cell::new(entry.binary_filename.as_deref().unwrap_or("-")).fg(Color::DarkGrey),
            licenses,
            Cell::new(copyright_count(&entry.copyright)).set_alignment(CellAlignment::Right),
        ]);
    }

    println!("{}", table);
}

fn license_list(entry: &AttributionEntry) -> String {
    entry
        .licenses
        .iter()
        .map(|l| l.license.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn copyright_count(copyright: &str) -> usize {
    copyright.lines().filter(|l| !l.trim().is_empty()).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copyright_count() {
        assert_eq!(copyright_count(""), 0);
        assert_eq!(copyright_count("(c) A\n(c) B\n(c) A"), 3);
    }
}
