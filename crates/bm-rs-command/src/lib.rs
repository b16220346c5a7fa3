//! Administration commands: parsing, registry and built-in commands.

pub mod drops;
pub mod item;
pub mod mob;

use std::collections::HashMap;
use std::path::Path;

use bm_rs_catalog::SharedCatalog;
use rand::RngCore;
use tracing::info;

/// Context passed to a command handler.
pub struct CommandContext<'a> {
    /// Name of whoever issued the command.
    pub sender_name: String,
    /// Arguments after the command name.
    pub args: Vec<String>,
    pub catalog: &'a SharedCatalog,
    /// Where `save` writes the catalog.
    pub catalog_path: &'a Path,
    pub rng: &'a mut dyn RngCore,
}

impl CommandContext<'_> {
    /// Argument `index`, if present.
    pub fn arg(&self, index: usize) -> Option<&str> {
        self.args.get(index).map(String::as_str)
    }
}

/// Result returned by a command handler.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command executed successfully.
    pub success: bool,
    /// Messages to send back to the command sender.
    pub messages: Vec<String>,
    /// If true, the admin console should shut down.
    pub should_stop: bool,
}

impl CommandResult {
    /// Create a successful result with a single message.
    pub fn ok(message: impl Into<String>) -> Self {
        Self::lines(vec![message.into()])
    }

    /// Create a successful result with several lines.
    pub fn lines(messages: Vec<String>) -> Self {
        Self {
            success: true,
            messages,
            should_stop: false,
        }
    }

    /// Create a failed result with a single message.
    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            messages: vec![message.into()],
            should_stop: false,
        }
    }

    pub fn usage(usage: &str) -> Self {
        Self::err(format!("Usage: {usage}"))
    }
}

/// Function pointer type for command handlers.
pub type CommandFn = fn(&mut CommandContext<'_>) -> CommandResult;

/// A registered command.
pub struct CommandEntry {
    pub name: String,
    pub description: String,
    pub handler: CommandFn,
}

/// Registry of available admin commands.
pub struct CommandRegistry {
    commands: HashMap<String, CommandEntry>,
}

impl CommandRegistry {
    /// Create a new registry with the built-in commands.
    pub fn new() -> Self {
        let mut registry = Self {
            commands: HashMap::new(),
        };
        registry.register("help", "List available commands", cmd_help);
        registry.register("mob", "Inspect and edit mob types", mob::cmd_mob);
        registry.register("drops", "Inspect and edit drop tables", drops::cmd_drops);
        registry.register("item", "List custom items", item::cmd_item);
        registry.register("save", "Save the catalog", cmd_save);
        registry.register("reload", "Reload the catalog from disk", cmd_reload);
        registry.register("stop", "Stop the console", cmd_stop);
        registry
    }

    /// Register a command.
    fn register(&mut self, name: &str, description: &str, handler: CommandFn) {
        self.commands.insert(
            name.to_string(),
            CommandEntry {
                name: name.to_string(),
                description: description.to_string(),
                handler,
            },
        );
    }

    /// Execute a command by name.
    ///
    /// `help` receives the command list as `name:description` arguments.
    pub fn execute(&self, name: &str, ctx: &mut CommandContext<'_>) -> CommandResult {
        if name == "help" {
            ctx.args = self.help_args();
        }
        match self.commands.get(name) {
            Some(entry) => (entry.handler)(ctx),
            None => CommandResult::err(format!(
                "Unknown command: {name}. Type help for a list of commands."
            )),
        }
    }

    /// Split a console line into a command name and execute it.
    ///
    /// Returns `None` for blank lines.
    pub fn execute_line(&self, line: &str, ctx: &mut CommandContext<'_>) -> Option<CommandResult> {
        let mut words = line.split_whitespace();
        let name = words.next()?.trim_start_matches('/');
        ctx.args = words.map(String::from).collect();
        Some(self.execute(name, ctx))
    }

    /// Get a reference to all registered commands.
    pub fn get_commands(&self) -> &HashMap<String, CommandEntry> {
        &self.commands
    }

    fn help_args(&self) -> Vec<String> {
        let mut entries: Vec<&CommandEntry> = self.commands.values().collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        entries
            .iter()
            .map(|e| format!("{}:{}", e.name, e.description))
            .collect()
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Built-in commands
// ---------------------------------------------------------------------------

fn cmd_help(ctx: &mut CommandContext<'_>) -> CommandResult {
    let mut lines = vec!["Available commands:".to_string()];
    for arg in &ctx.args {
        if let Some((name, desc)) = arg.split_once(':') {
            lines.push(format!("  {name} - {desc}"));
        }
    }
    CommandResult::lines(lines)
}

fn cmd_save(ctx: &mut CommandContext<'_>) -> CommandResult {
    let snapshot = ctx.catalog.snapshot();
    match bm_rs_catalog::save_file(&snapshot, ctx.catalog_path) {
        Ok(()) => {
            info!("{} saved the catalog", ctx.sender_name);
            CommandResult::ok(format!("Saved catalog to {}.", ctx.catalog_path.display()))
        }
        Err(e) => CommandResult::err(format!("Could not save catalog: {e}")),
    }
}

fn cmd_reload(ctx: &mut CommandContext<'_>) -> CommandResult {
    match bm_rs_catalog::load_file(ctx.catalog_path) {
        Ok(catalog) => {
            ctx.catalog.replace(catalog);
            info!("{} reloaded the catalog", ctx.sender_name);
            CommandResult::ok(format!(
                "Reloaded catalog from {}.",
                ctx.catalog_path.display()
            ))
        }
        Err(e) => CommandResult::err(format!("Could not reload catalog: {e}")),
    }
}

fn cmd_stop(_ctx: &mut CommandContext<'_>) -> CommandResult {
    CommandResult {
        success: true,
        messages: vec!["Stopping...".to_string()],
        should_stop: true,
    }
}

/// Shared fixtures for command tests.
#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use bm_rs_catalog::Catalog;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    pub struct Console {
        pub registry: CommandRegistry,
        pub catalog: SharedCatalog,
        pub path: std::path::PathBuf,
        pub rng: StdRng,
    }

    impl Console {
        pub fn new() -> Self {
            Self {
                registry: CommandRegistry::new(),
                catalog: SharedCatalog::new(Catalog::new()),
                path: std::env::temp_dir().join(format!(
                    "bm-rs-command-{}-{:?}.json",
                    std::process::id(),
                    std::thread::current().id()
                )),
                rng: StdRng::seed_from_u64(17),
            }
        }

        pub fn run(&mut self, line: &str) -> CommandResult {
            let mut ctx = CommandContext {
                sender_name: "console".to_string(),
                args: Vec::new(),
                catalog: &self.catalog,
                catalog_path: &self.path,
                rng: &mut self.rng,
            };
            self.registry
                .execute_line(line, &mut ctx)
                .unwrap_or_else(|| CommandResult::err("empty line"))
        }

        /// Run a command that must succeed.
        pub fn ok(&mut self, line: &str) -> Vec<String> {
            let result = self.run(line);
            assert!(result.success, "{line}: {:?}", result.messages);
            result.messages
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================
