//! `item` subcommands.

use crate::{CommandContext, CommandResult};

pub(crate) fn cmd_item(ctx: &mut CommandContext<'_>) -> CommandResult {
    match ctx.arg(0) {
        Some("list") => list(ctx),
        _ => CommandResult::usage("item list"),
    }
}

fn list(ctx: &CommandContext<'_>) -> CommandResult {
    let catalog = ctx.catalog.snapshot();
    let mut lines = vec!["Items:".to_string()];
    for item in catalog.items.all() {
        let line = match item.record() {
            Some(record) => match &record.name {
                Some(name) => format!("  {}: {} \"{name}\"", item.id(), record.material),
                None => format!("  {}: {}", item.id(), record.material),
            },
            None => format!("  {}: special", item.id()),
        };
        lines.push(line);
    }
    CommandResult::lines(lines)
}

#[cfg(test)]
mod tests {
    use crate::test_support::Console;
    use bm_rs_loot::ItemRecord;

    #[test]
    fn lists_special_and_custom_items() {
        let mut console = Console::new();
        console
            .catalog
            .edit(|c| {
                c.items
                    .add(
                        "crown",
                        ItemRecord {
                            material: "golden_helmet".into(),
                            name: Some("Crown".into()),
                        },
                    )
                    .map(|_| ())
            })
            .unwrap();
        let lines = console.ok("item list");
        assert_eq!(
            lines,
            vec![
                "Items:",
                "  DEFAULT: special",
                "  NOTHING: special",
                "  crown: golden_helmet \"Crown\"",
            ]
        );
        assert!(!console.run("item give").success);
    }
}
