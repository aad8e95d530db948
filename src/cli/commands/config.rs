use ledgerdesk_config::Config;

use crate::cli::args::ArgMap;
use crate::cli::commands::unknown_action;
use crate::cli::core::{apply_output_preferences, CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::block;
use crate::cli::registry::CommandEntry;
use crate::cli::ui::table_renderer::{Table, TableColumn};

const USAGE: &str = "config [show|set <key> <value>|backup [note]|backups|restore [name]]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "config",
        "View and manage client preferences",
        USAGE,
        cmd_config,
    )
    .with_actions(&["show", "set", "backup", "backups", "restore"])]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((action, rest)) = args.split_first() else {
        return show_config(context);
    };
    let args = ArgMap::parse(rest);
    match action.to_lowercase().as_str() {
        "show" => show_config(context),
        "set" => set_value(context, &args),
        "backup" => backup_config(context, &args),
        "backups" => list_backups(context),
        "restore" => restore_config(context, &args),
        other => Err(unknown_action("config", other)),
    }
}

fn show_config(context: &ShellContext) -> CommandResult {
    let mut table = Table::new(vec![TableColumn::left("Key"), TableColumn::left("Value").max(60)]);
    for (key, value) in context.config.entries() {
        table.push([key.to_string(), value]);
    }
    block(&table.render());
    io::print_hint(format!(
        "Stored in {}",
        context.config_manager.config_path().display()
    ));
    Ok(())
}

fn set_value(context: &mut ShellContext, args: &ArgMap<'_>) -> CommandResult {
    let (Some(key), Some(value)) = (args.positional(0), args.rest(1)) else {
        return Err(CommandError::InvalidArguments(format!(
            "usage: config set <key> <value> (keys: {})",
            Config::KEYS.join(", ")
        )));
    };
    context.config.set(key, &value)?;
    context.persist_config()?;

    match key {
        "ui_color_enabled" => apply_output_preferences(context.mode(), &context.config),
        "default_company_id" => {
            context.company_id = context.config.default_company_id;
            context.location_id = None;
        }
        "default_location_id" => context.location_id = context.config.default_location_id,
        "api_base_url" | "request_timeout_secs" | "session_dir" => {
            io::print_hint("Takes effect the next time LedgerDesk starts.")
        }
        _ => {}
    }
    io::print_success(format!("{} updated.", key));
    Ok(())
}

fn backup_config(context: &mut ShellContext, args: &ArgMap<'_>) -> CommandResult {
    let note = args.rest(0);
    let name = context.config_manager.backup(&context.config, note.as_deref())?;
    io::print_success(format!("Configuration saved as {}.", name));
    Ok(())
}

fn list_backups(context: &ShellContext) -> CommandResult {
    let backups = context.config_manager.list_backups()?;
    if backups.is_empty() {
        io::print_info("No configuration backups yet.");
        return Ok(());
    }
    for name in backups {
        io::print_info(format!("  {}", name));
    }
    Ok(())
}

fn restore_config(context: &mut ShellContext, args: &ArgMap<'_>) -> CommandResult {
    let name = match args.positional(0) {
        Some(name) => name.to_string(),
        None if context.can_prompt() => {
            let backups = context.config_manager.list_backups()?;
            if backups.is_empty() {
                io::print_info("No configuration backups yet.");
                return Ok(());
            }
            match io::select(context.theme(), "Restore which backup?", &backups, 0)? {
                Some(index) => backups[index].clone(),
                None => {
                    io::print_info("Operation cancelled.");
                    return Ok(());
                }
            }
        }
        None => {
            return Err(CommandError::InvalidArguments(
                "usage: config restore <name>".into(),
            ))
        }
    };
    if !context.confirm(&format!("Replace the current configuration with {}?", name))? {
        io::print_info("Nothing restored.");
        return Ok(());
    }
    context.config = context.config_manager.restore(&name)?;
    context.company_id = context.config.default_company_id;
    context.location_id = context.config.default_location_id;
    apply_output_preferences(context.mode(), &context.config);
    io::print_success(format!("Configuration restored from {}.", name));
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::cli::core::process_script;
    use crate::cli::test_support::signed_in_context;

    #[test]
    fn set_persists_the_value() {
        let (mut context, _fixture) = signed_in_context();
        process_script(&mut context, &["config set currency eur"]).expect("script");
        assert_eq!(context.config.currency, "EUR");
        let stored = context.config_manager.load().expect("load");
        assert_eq!(stored.currency, "EUR");
    }

    #[test]
    fn unknown_key_is_rejected() {
        let (mut context, _fixture) = signed_in_context();
        assert!(context.process_line("config set theme dark").is_err());
        assert_eq!(context.config_manager.load().expect("load").locale, "en-US");
    }

    #[test]
    fn default_company_switches_the_scope() {
        let (mut context, _fixture) = signed_in_context();
        context.location_id = Some(10);
        process_script(&mut context, &["config set default_company_id 2"]).expect("script");
        assert_eq!(context.company_id, Some(2));
        assert_eq!(context.location_id, None);
    }

    #[test]
    fn backup_then_restore() {
        let (mut context, _fixture) = signed_in_context();
        process_script(&mut context, &["config backup before change"]).expect("script");
        let backups = context.config_manager.list_backups().expect("backups");
        assert_eq!(backups.len(), 1);
        assert!(backups[0].ends_with("_before-change.json"));

        process_script(&mut context, &["config set currency gbp"]).expect("script");
        let line = format!("config restore {}", backups[0]);
        process_script(&mut context, &[line.as_str()]).expect("script");
        assert_eq!(context.config.currency, "USD");
    }

    #[test]
    fn restore_brings_back_the_default_scope() {
        let (mut context, _fixture) = signed_in_context();
        process_script(
            &mut context,
            &["config set default_company_id 2", "config backup beta"],
        )
        .expect("script");
        let backup = context.config_manager.list_backups().expect("backups")[0].clone();

        process_script(&mut context, &["config set default_company_id 1"]).expect("script");
        context.location_id = Some(10);
        let line = format!("config restore {}", backup);
        process_script(&mut context, &[line.as_str()]).expect("script");
        assert_eq!(context.company_id, Some(2));
        assert_eq!(context.location_id, None);
    }
}
