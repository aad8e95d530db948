//! Root command table for the LedgerDesk shell.
//!
//! Each entry owns one root word (`voucher`, `series`, `bank`, ...). Entries
//! keep the order they were registered in, which is the order `help` lists
//! them and the completer offers them.

use std::collections::HashMap;

use crate::cli::core::CommandResult;
use crate::cli::shell_context::ShellContext;

pub type CommandHandler = fn(&mut ShellContext, &[&str]) -> CommandResult;

pub struct CommandEntry {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    /// Second-word actions such as `post` in `voucher post 12`.
    pub actions: &'static [&'static str],
    pub handler: CommandHandler,
}

impl CommandEntry {
    pub const fn new(
        name: &'static str,
        description: &'static str,
        usage: &'static str,
        handler: CommandHandler,
    ) -> Self {
        Self {
            name,
            description,
            usage,
            actions: &[],
            handler,
        }
    }

    pub fn with_actions(mut self, actions: &'static [&'static str]) -> Self {
        self.actions = actions;
        self
    }
}

#[derive(Default)]
pub struct CommandRegistry {
    entries: Vec<CommandEntry>,
    slots: HashMap<&'static str, usize>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `entries` with the names in `preferred` first. Names missing
    /// from `preferred` follow in the order given.
    pub fn ordered(mut entries: Vec<CommandEntry>, preferred: &[&str]) -> Self {
        entries.sort_by_key(|entry| {
            preferred
                .iter()
                .position(|name| entry.name.eq_ignore_ascii_case(name))
                .unwrap_or(preferred.len())
        });
        let mut registry = Self::new();
        for entry in entries {
            registry.register(entry);
        }
        registry
    }

    /// A second entry with the same name replaces the first in its slot.
    pub fn register(&mut self, entry: CommandEntry) {
        match self.slots.get(entry.name) {
            Some(&slot) => self.entries[slot] = entry,
            None => {
                self.slots.insert(entry.name, self.entries.len());
                self.entries.push(entry);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&CommandEntry> {
        self.slots.get(name).map(|&slot| &self.entries[slot])
    }

    pub fn handler(&self, name: &str) -> Option<CommandHandler> {
        self.get(name).map(|entry| entry.handler)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommandEntry> + '_ {
        self.entries.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|entry| entry.name)
    }

    /// `(command, actions)` pairs for the line editor's completer.
    pub fn completion_table(&self) -> Vec<(&'static str, &'static [&'static str])> {
        self.entries
            .iter()
            .map(|entry| (entry.name, entry.actions))
            .collect()
    }
}
