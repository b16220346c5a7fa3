//! `mob` subcommands.

use bm_rs_catalog::{configure_mob, death_drops, SimulatedEntity};
use bm_rs_mobs::schema::{self, PARENT_TYPE};
use bm_rs_mobs::{resolve_derived, MobError};
use tracing::info;

use crate::{CommandContext, CommandResult};

const USAGE: &str =
    "mob <list|info|add|remove|get|set|clear|properties|spawn|loot> [args...]";

pub(crate) fn cmd_mob(ctx: &mut CommandContext<'_>) -> CommandResult {
    match ctx.arg(0) {
        Some("list") => list(ctx),
        Some("info") => info(ctx),
        Some("add") => add(ctx),
        Some("remove") => remove(ctx),
        Some("get") => get(ctx),
        Some("set") => set(ctx),
        Some("clear") => clear(ctx),
        Some("properties") => properties(),
        Some("spawn") => spawn(ctx),
        Some("loot") => loot(ctx),
        _ => CommandResult::usage(USAGE),
    }
}

fn list(ctx: &CommandContext<'_>) -> CommandResult {
    let catalog = ctx.catalog.snapshot();
    let mut lines = vec![format!("Mob types ({}):", catalog.mobs.len())];
    for mob_type in catalog.mobs.all() {
        let parent_exists = mob_type
            .parent_id()
            .is_some_and(|p| catalog.mobs.get(p).is_some());
        lines.push(format!("  {}", mob_type.short_description(parent_exists)));
    }
    CommandResult::lines(lines)
}

fn info(ctx: &CommandContext<'_>) -> CommandResult {
    let Some(id) = ctx.arg(1) else {
        return CommandResult::usage("mob info <id>");
    };
    let catalog = ctx.catalog.snapshot();
    let Some(mob_type) = catalog.mobs.get(id) else {
        return CommandResult::err(MobError::UnknownMobType(id.into()).to_string());
    };
    let kind = if mob_type.is_predefined() {
        "predefined"
    } else {
        "custom"
    };
    let mut lines = vec![format!("Mob type {id} ({kind}):")];
    let mut any = false;
    for slot in mob_type.overridden() {
        if let Some(value) = slot.value() {
            lines.push(format!("  {}: {value}", slot.id()));
            any = true;
        }
    }
    if !any {
        lines.push("  no overridden properties".to_string());
    }
    CommandResult::lines(lines)
}

fn add(ctx: &CommandContext<'_>) -> CommandResult {
    let (Some(id), Some(parent)) = (ctx.arg(1), ctx.arg(2)) else {
        return CommandResult::usage("mob add <id> <parent-type>");
    };
    if ctx.catalog.snapshot().mobs.get(parent).is_none() {
        return CommandResult::err(format!("Parent type {parent} does not exist."));
    }
    match ctx
        .catalog
        .edit(|c| c.mobs.add_custom(id, Some(parent)).map(|_| ()))
    {
        Ok(()) => {
            info!("{} added mob type {id}", ctx.sender_name);
            CommandResult::ok(format!("Added mob type {id} with parent {parent}."))
        }
        Err(e) => CommandResult::err(e.to_string()),
    }
}

fn remove(ctx: &CommandContext<'_>) -> CommandResult {
    let Some(id) = ctx.arg(1) else {
        return CommandResult::usage("mob remove <id>");
    };
    match ctx.catalog.edit(|c| c.mobs.remove(id)) {
        Ok(_) => {
            info!("{} removed mob type {id}", ctx.sender_name);
            CommandResult::ok(format!("Removed mob type {id}."))
        }
        Err(e) => CommandResult::err(e.to_string()),
    }
}

fn get(ctx: &CommandContext<'_>) -> CommandResult {
    let (Some(id), Some(property)) = (ctx.arg(1), ctx.arg(2)) else {
        return CommandResult::usage("mob get <id> <property>");
    };
    let catalog = ctx.catalog.snapshot();
    let Some(mob_type) = catalog.mobs.get(id) else {
        return CommandResult::err(MobError::UnknownMobType(id.into()).to_string());
    };
    match resolve_derived(&*catalog, mob_type, property) {
        Ok(Some(slot)) => match slot.value() {
            Some(value) if slot.owner() == id => {
                CommandResult::ok(format!("{id}.{property}: {value}"))
            }
            Some(value) => CommandResult::ok(format!(
                "{id}.{property}: {value} (inherited from {})",
                slot.owner()
            )),
            None => CommandResult::ok(format!("{id}.{property}: unset")),
        },
        Ok(None) => CommandResult::err(MobError::UnknownProperty(property.into()).to_string()),
        Err(e) => CommandResult::err(e.to_string()),
    }
}

fn set(ctx: &CommandContext<'_>) -> CommandResult {
    if ctx.args.len() < 4 {
        return CommandResult::usage("mob set <id> <property> <value...>");
    }
    let id = ctx.args[1].as_str();
    let property = ctx.args[2].as_str();
    let text = ctx.args[3..].join(" ");
    let result = ctx.catalog.edit(|c| {
        c.mobs
            .get_mut(id)
            .ok_or_else(|| MobError::UnknownMobType(id.into()))?
            .set_property_text(property, &text)
    });
    if let Err(e) = result {
        return CommandResult::err(e.to_string());
    }
    info!("{} set {id}.{property} to {text}", ctx.sender_name);

    let mut lines = vec![format!("Set {id}.{property} to {text}.")];
    if property == PARENT_TYPE {
        let catalog = ctx.catalog.snapshot();
        if catalog.mobs.get(&text).is_none() {
            lines.push(format!("Warning: parent type {text} does not exist."));
        }
        for cycle in catalog.mobs.check_inheritance() {
            lines.push(format!("Warning: {cycle}"));
        }
    }
    CommandResult::lines(lines)
}

fn clear(ctx: &CommandContext<'_>) -> CommandResult {
    let (Some(id), Some(property)) = (ctx.arg(1), ctx.arg(2)) else {
        return CommandResult::usage("mob clear <id> <property>");
    };
    match ctx.catalog.edit(|c| c.mobs.set_property(id, property, None)) {
        Ok(()) => {
            info!("{} cleared {id}.{property}", ctx.sender_name);
            CommandResult::ok(format!("Cleared {id}.{property}."))
        }
        Err(e) => CommandResult::err(e.to_string()),
    }
}

fn properties() -> CommandResult {
    let mut lines = vec!["Mob properties:".to_string()];
    for id in schema::sorted_ids() {
        if let Some(descriptor) = schema::descriptor(id) {
            lines.push(format!("  {id} ({})", descriptor.kind.name()));
        }
    }
    CommandResult::lines(lines)
}

/// Dry-run the configuration pass against a simulated entity.
fn spawn(ctx: &mut CommandContext<'_>) -> CommandResult {
    let Some(id) = ctx.arg(1).map(str::to_string) else {
        return CommandResult::usage("mob spawn <id>");
    };
    let catalog = ctx.catalog.snapshot();
    let Some(mob_type) = catalog.mobs.get(&id) else {
        return CommandResult::err(MobError::UnknownMobType(id).to_string());
    };
    let mut entity = match SimulatedEntity::for_mob_type(&catalog, mob_type) {
        Ok(entity) => entity,
        Err(e) => return CommandResult::err(e.to_string()),
    };
    let report = configure_mob(&catalog, mob_type, &mut entity, &mut *ctx.rng);

    let mut lines = vec![format!("Spawned {id} as {}:", entity.kind().name)];
    lines.extend(entity.effects().iter().map(|e| format!("  {e:?}")));
    if !report.unsupported.is_empty() {
        lines.push(format!("Not supported: {}", report.unsupported.join(", ")));
    }
    for failure in &report.failures {
        lines.push(format!("Failed {}: {}", failure.property, failure.reason));
    }
    CommandResult::lines(lines)
}

/// Roll the loot a mob of this type would drop on death.
fn loot(ctx: &mut CommandContext<'_>) -> CommandResult {
    let Some(id) = ctx.arg(1).map(str::to_string) else {
        return CommandResult::usage("mob loot <id>");
    };
    let catalog = ctx.catalog.snapshot();
    let Some(mob_type) = catalog.mobs.get(&id) else {
        return CommandResult::err(MobError::UnknownMobType(id).to_string());
    };
    let drops = match death_drops(&catalog, mob_type, &mut *ctx.rng) {
        Ok(drops) => drops,
        Err(e) => return CommandResult::err(e.to_string()),
    };
    if drops.is_empty() {
        return CommandResult::ok(format!("{id} dropped nothing."));
    }
    let mut lines = vec![format!("{id} dropped:")];
    for stack in &drops.items {
        lines.push(format!("  {} x {}", stack.count, stack.item_id));
    }
    for mob in &drops.mobs {
        lines.push(format!("  mob {mob}"));
    }
    for objective in &drops.objectives {
        lines.push(format!("  objective {objective}"));
    }
    CommandResult::lines(lines)
}
