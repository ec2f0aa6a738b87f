//! Config inspection commands. These never open a platform connection.

use canvass_config::{active_profile_name, config_path, load_config_or_default};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

pub fn handle(args: &ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            output::print_output(&config_path().display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = load_config_or_default();
            let active = active_profile_name(global.profile.as_deref(), &cfg);

            let mut lines = vec![
                format!("Config file:     {}", config_path().display()),
                format!("Active profile:  {active}"),
                format!("Default output:  {}", cfg.defaults.output),
                format!("Timeout:         {}s", cfg.defaults.timeout),
            ];

            if cfg.profiles.is_empty() {
                lines.push("Profiles:        (none)".to_owned());
            } else {
                lines.push("Profiles:".to_owned());
                let mut names: Vec<&String> = cfg.profiles.keys().collect();
                names.sort();
                for name in names {
                    let profile = &cfg.profiles[name];
                    let marker = if *name == active { "*" } else { " " };
                    lines.push(format!(
                        "  {marker} {name}: {} ({})",
                        profile.url,
                        profile.email.as_deref().unwrap_or("no email"),
                    ));
                }
            }

            output::print_output(&lines.join("\n"), global.quiet);
            Ok(())
        }
    }
}
