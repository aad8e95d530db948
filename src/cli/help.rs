use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::{CommandEntry, CommandRegistry};

const GROUPS: &[(&str, &[&str])] = &[
    ("Session", &["login", "logout", "whoami", "company"]),
    ("Masters", &["coa", "bank", "partner", "series"]),
    ("Transactions", &["voucher", "iou", "requisition", "depreciation"]),
    ("Reports", &["dashboard"]),
];

fn group_of(name: &str) -> &'static str {
    GROUPS
        .iter()
        .find(|(_, members)| members.contains(&name))
        .map(|(group, _)| *group)
        .unwrap_or("Shell")
}

pub fn print_overview(registry: &CommandRegistry) {
    let entries: Vec<&CommandEntry> = registry.iter().collect();
    let mut groups: Vec<&str> = GROUPS.iter().map(|(group, _)| *group).collect();
    groups.push("Shell");
    for group in groups {
        let members: Vec<&&CommandEntry> = entries
            .iter()
            .filter(|entry| group_of(entry.name) == group)
            .collect();
        if members.is_empty() {
            continue;
        }
        output_section(group);
        for entry in members {
            io::print_info(format!("  {:<14} {}", entry.name, entry.description));
        }
    }
    io::print_hint("Use `help <command>` for usage details.");
}

pub fn print_command(entry: &CommandEntry) {
    output_section(format!("Help: {}", entry.name));
    io::print_info(format!("  {}", entry.description));
    io::print_info(format!("  Usage: {}", entry.usage));
    if !entry.actions.is_empty() {
        io::print_info(format!("  Actions: {}", entry.actions.join(", ")));
    }
}
