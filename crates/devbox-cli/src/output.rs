use colored::Colorize;
use devbox_core::{Component, format_rfc3339};
use devbox_engine::PhaseOutcome;
use tabled::builder::Builder;
use tabled::settings::Style;

pub fn print_success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

pub fn print_field(label: &str, value: &str) {
    println!("{}: {}", label.cyan(), value);
}

/// Prints a phase header and what it did.
pub fn print_phase(title: &str, outcome: &PhaseOutcome, verb: &str) {
    println!("{} {}", "+".cyan(), title.bold());
    if outcome.is_up_to_date() {
        println!("  {}", "Skipping (up-to-date)".dimmed());
        return;
    }
    for name in outcome.changed() {
        println!("  {verb} {}", name.cyan());
    }
}

pub fn print_components(components: &[Component]) {
    if components.is_empty() {
        println!("No components found.");
        return;
    }
    println!("{}", component_table(components));
}

fn component_table(components: &[Component]) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Name", "Label", "Image", "State", "Updated"]);
    for c in components {
        let image = if c.image.is_empty() { "-" } else { c.image.as_str() };
        let state = c.state.to_string();
        let updated = format_rfc3339(c.updated_at);
        builder.push_record([
            c.name.as_str(),
            c.label.as_str(),
            image,
            state.as_str(),
            updated.as_str(),
        ]);
    }
    builder.build().with(Style::rounded()).to_string()
}
