//! Console session: runs command lines against the shared catalog.

use std::path::{Path, PathBuf};

use bm_rs_catalog::{save_file, CatalogError, SharedCatalog};
use bm_rs_command::{CommandContext, CommandRegistry, CommandResult};
use rand::rngs::StdRng;
use tracing::{info, warn};

pub struct Console {
    registry: CommandRegistry,
    catalog: SharedCatalog,
    catalog_path: PathBuf,
    rng: StdRng,
}

impl Console {
    pub fn new(catalog: SharedCatalog, catalog_path: PathBuf, rng: StdRng) -> Self {
        Self {
            registry: CommandRegistry::new(),
            catalog,
            catalog_path,
            rng,
        }
    }

    pub fn catalog_path(&self) -> &Path {
        &self.catalog_path
    }

    /// Execute one console line. Blank lines yield `None`.
    pub fn execute(&mut self, line: &str) -> Option<CommandResult> {
        let mut ctx = CommandContext {
            sender_name: "console".to_string(),
            args: Vec::new(),
            catalog: &self.catalog,
            catalog_path: &self.catalog_path,
            rng: &mut self.rng,
        };
        self.registry.execute_line(line, &mut ctx)
    }

    /// Execute a line and print its output. Returns true when the console should stop.
    pub fn handle_line(&mut self, line: &str) -> bool {
        let Some(result) = self.execute(line) else {
            return false;
        };
        for message in &result.messages {
            println!("{message}");
        }
        if !result.success {
            warn!("Console command failed: {line}");
        }
        result.should_stop
    }

    pub fn save(&self) -> Result<(), CatalogError> {
        save_file(&self.catalog.snapshot(), &self.catalog_path)?;
        info!("Saved catalog to {}", self.catalog_path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bm_rs_catalog::{load_file, Catalog};
    use rand::SeedableRng;

    fn console(name: &str) -> Console {
        let path = std::env::temp_dir().join(format!(
            "bm-rs-admin-{name}-{}.json",
            std::process::id()
        ));
        Console::new(
            SharedCatalog::new(Catalog::new()),
            path,
            StdRng::seed_from_u64(5),
        )
    }

    #[test]
    fn blank_lines_do_nothing() {
        let mut console = console("blank");
        assert!(console.execute("").is_none());
        assert!(!console.handle_line("  "));
    }

    #[test]
    fn stop_ends_session() {
        let mut console = console("stop");
        assert!(!console.handle_line("help"));
        assert!(!console.handle_line("mob frobnicate"));
        assert!(console.handle_line("stop"));
    }

    #[test]
    fn edits_survive_save() {
        let mut console = console("save");
        let result = console.execute("mob add boss zombie").unwrap();
        assert!(result.success, "{:?}", result.messages);
        let result = console.execute("mob set boss health 80").unwrap();
        assert!(result.success, "{:?}", result.messages);
        console.save().unwrap();

        let loaded = load_file(console.catalog_path()).unwrap();
        let boss = loaded.mobs.get("boss").unwrap();
        assert_eq!(boss.parent_id(), Some("zombie"));
        let _ = std::fs::remove_file(console.catalog_path());
    }
}
