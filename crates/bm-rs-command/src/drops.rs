//! `drops` subcommands.

use bm_rs_loot::{DropEntry, DropKind, DropTable, LootError, NOTHING_KEY};
use tracing::info;

use crate::{CommandContext, CommandResult};

const USAGE: &str = "drops <list|info|add|remove|set|unset|roll> [args...]";
const SET_USAGE: &str =
    "drops set <id> <payload> <percentage> [min [max]] [mob|item|nothing]";

pub(crate) fn cmd_drops(ctx: &mut CommandContext<'_>) -> CommandResult {
    match ctx.arg(0) {
        Some("list") => list(ctx),
        Some("info") => info(ctx),
        Some("add") => add(ctx),
        Some("remove") => remove(ctx),
        Some("set") => set(ctx),
        Some("unset") => unset(ctx),
        Some("roll") => roll(ctx),
        _ => CommandResult::usage(USAGE),
    }
}

fn list(ctx: &CommandContext<'_>) -> CommandResult {
    let catalog = ctx.catalog.snapshot();
    let mut lines = vec![format!("Drop tables ({}):", catalog.drops.len())];
    for table in catalog.drops.all() {
        if let Some(header) = table.description().into_iter().next() {
            lines.push(format!("  {header}"));
        }
    }
    CommandResult::lines(lines)
}

fn info(ctx: &CommandContext<'_>) -> CommandResult {
    let Some(id) = ctx.arg(1) else {
        return CommandResult::usage("drops info <id>");
    };
    match ctx.catalog.snapshot().drops.get(id) {
        Some(table) => CommandResult::lines(table.description()),
        None => CommandResult::err(LootError::UnknownDropTable(id.into()).to_string()),
    }
}

fn add(ctx: &CommandContext<'_>) -> CommandResult {
    let Some(id) = ctx.arg(1) else {
        return CommandResult::usage("drops add <id> [single|multiple]");
    };
    let single = match ctx.arg(2) {
        None | Some("single") => true,
        Some("multiple") => false,
        Some(other) => {
            return CommandResult::err(format!("Expected single or multiple, got {other}."))
        }
    };
    let mut table = DropTable::new(id);
    table.set_single(single);
    match ctx.catalog.edit(|c| c.drops.add(table).map(|_| ())) {
        Ok(()) => {
            info!("{} added drop table {id}", ctx.sender_name);
            CommandResult::ok(format!("Added drop table {id}."))
        }
        Err(e) => CommandResult::err(e.to_string()),
    }
}

fn remove(ctx: &CommandContext<'_>) -> CommandResult {
    let Some(id) = ctx.arg(1) else {
        return CommandResult::usage("drops remove <id>");
    };
    match ctx.catalog.edit(|c| c.drops.remove(id)) {
        Ok(_) => {
            info!("{} removed drop table {id}", ctx.sender_name);
            CommandResult::ok(format!("Removed drop table {id}."))
        }
        Err(e) => CommandResult::err(e.to_string()),
    }
}

/// Parse the arguments of `drops set` after the table ID.
fn parse_entry(args: &[String]) -> Result<DropEntry, String> {
    let [payload, percent, rest @ ..] = args else {
        return Err(format!("Usage: {SET_USAGE}"));
    };
    let percent: f64 = percent
        .parse()
        .map_err(|_| format!("Expected a percentage, got {percent}."))?;

    let mut numbers = Vec::new();
    let mut kind = None;
    for arg in rest {
        match arg.as_str() {
            "item" => kind = Some(DropKind::Item),
            "mob" => kind = Some(DropKind::Mob),
            "nothing" => kind = Some(DropKind::Nothing),
            n if kind.is_none() && numbers.len() < 2 => numbers.push(
                n.parse::<u32>()
                    .map_err(|_| format!("Expected a count, got {n}."))?,
            ),
            _ => return Err(format!("Usage: {SET_USAGE}")),
        }
    }
    let kind = kind.unwrap_or(if payload == NOTHING_KEY {
        DropKind::Nothing
    } else {
        DropKind::Item
    });
    let min = numbers.first().copied().unwrap_or(1);
    let max = numbers.get(1).copied().unwrap_or(min.max(1));
    DropEntry::new(kind, payload, percent / 100.0, min, max).map_err(|e| e.to_string())
}

fn set(ctx: &CommandContext<'_>) -> CommandResult {
    let Some(id) = ctx.arg(1) else {
        return CommandResult::usage(SET_USAGE);
    };
    let entry = match parse_entry(&ctx.args[2..]) {
        Ok(entry) => entry,
        Err(message) => return CommandResult::err(message),
    };
    let description = entry.short_description();
    let result = ctx.catalog.edit(|c| {
        let missing = match entry.kind() {
            DropKind::Item => c.items.get(entry.key()).is_none(),
            DropKind::Mob => c.mobs.get(entry.key()).is_none(),
            DropKind::Nothing => false,
        };
        if missing {
            return Err(format!("No {:?} named {}.", entry.kind(), entry.key()));
        }
        c.drops
            .get_mut(id)
            .ok_or_else(|| LootError::UnknownDropTable(id.into()).to_string())?
            .set_entry(entry);
        Ok(())
    });
    match result {
        Ok(()) => {
            info!("{} set drop {description} in {id}", ctx.sender_name);
            CommandResult::ok(format!("{id}: {description}"))
        }
        Err(message) => CommandResult::err(message),
    }
}

fn unset(ctx: &CommandContext<'_>) -> CommandResult {
    let (Some(id), Some(payload)) = (ctx.arg(1), ctx.arg(2)) else {
        return CommandResult::usage("drops unset <id> <payload>");
    };
    let result = ctx.catalog.edit(|c| {
        c.drops
            .get_mut(id)
            .ok_or_else(|| LootError::UnknownDropTable(id.into()))?
            .remove_entry(payload)
            .ok_or_else(|| LootError::UnknownDrop {
                table: id.into(),
                payload: payload.into(),
            })
    });
    match result {
        Ok(_) => {
            info!("{} removed drop {payload} from {id}", ctx.sender_name);
            CommandResult::ok(format!("Removed drop {payload} from {id}."))
        }
        Err(e) => CommandResult::err(e.to_string()),
    }
}

/// Select one outcome, optionally guaranteed, and show what it materializes to.
fn roll(ctx: &mut CommandContext<'_>) -> CommandResult {
    let Some(id) = ctx.arg(1).map(str::to_string) else {
        return CommandResult::usage("drops roll <id> [guarantee]");
    };
    let guarantee = match ctx.arg(2) {
        None => false,
        Some("guarantee") => true,
        Some(other) => {
            return CommandResult::err(format!("Expected guarantee, got {other}."))
        }
    };
    let catalog = ctx.catalog.snapshot();
    let Some(table) = catalog.drops.get(&id) else {
        return CommandResult::err(LootError::UnknownDropTable(id).to_string());
    };
    let drop = match table.select_one(guarantee, &mut *ctx.rng) {
        Ok(drop) => drop,
        Err(e) => return CommandResult::err(e.to_string()),
    };
    match drop.kind() {
        DropKind::Nothing => CommandResult::ok(format!("{id} rolled nothing.")),
        DropKind::Mob => CommandResult::ok(format!("{id} rolled mob {}.", drop.key())),
        DropKind::Item => match drop.generate(&*catalog, &mut *ctx.rng) {
            Ok(Some(stack)) => {
                CommandResult::ok(format!("{id} rolled {} x {}.", stack.count, stack.item_id))
            }
            Ok(None) => CommandResult::ok(format!("{id} rolled nothing.")),
            Err(e) => CommandResult::err(e.to_string()),
        },
    }
}
