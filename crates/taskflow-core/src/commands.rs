use anyhow::anyhow;
use chrono::Utc;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::cli::Command;
use crate::render::Renderer;
use crate::store::Store;
use crate::task::Priority;
use crate::tasks::{StatusFilter, TaskList};

/// Executes one subcommand against the store.
///
/// The collection is loaded once, mutated in memory through [`TaskList`],
/// and written back explicitly after each mutating command. Read-only
/// commands never touch the store file.
#[instrument(skip(store, renderer, command))]
pub fn dispatch(store: &Store, renderer: &mut Renderer, command: Command) -> anyhow::Result<()> {
    let now = Utc::now();
    let mut list = TaskList::new(store.load());

    match command {
        Command::Add {
            title,
            description,
            priority,
        } => cmd_add(store, &mut list, &title, &description, priority, now),
        Command::Toggle { id } => cmd_toggle(store, &mut list, &id, now),
        Command::Rm { id } => cmd_rm(store, &mut list, &id),
        Command::List { status, search } => {
            cmd_list(renderer, &mut list, status, search, now)
        }
        Command::Stats => {
            info!("command stats");
            renderer.print_stats(&list.stats())
        }
    }
}

#[instrument(skip_all)]
fn cmd_add(
    store: &Store,
    list: &mut TaskList,
    title: &str,
    description: &str,
    priority: Priority,
    now: chrono::DateTime<Utc>,
) -> anyhow::Result<()> {
    info!("command add");

    let Some(id) = list.add(title, description, priority, now) else {
        return Err(anyhow!("task title cannot be empty"));
    };

    store.save(list.tasks());
    let task = list.get(id).ok_or_else(|| anyhow!("task vanished after add: {id}"))?;
    println!("Created task {}.", task.short_id());
    Ok(())
}

#[instrument(skip(store, list, now))]
fn cmd_toggle(
    store: &Store,
    list: &mut TaskList,
    id_text: &str,
    now: chrono::DateTime<Utc>,
) -> anyhow::Result<()> {
    info!("command toggle");

    let id = resolve_id(list, id_text)?;
    list.toggle(id, now);
    store.save(list.tasks());

    let task = list.get(id).ok_or_else(|| anyhow!("task vanished after toggle: {id}"))?;
    if task.completed {
        println!("Completed task {}.", task.short_id());
    } else {
        println!("Reopened task {}.", task.short_id());
    }
    Ok(())
}

#[instrument(skip(store, list))]
fn cmd_rm(store: &Store, list: &mut TaskList, id_text: &str) -> anyhow::Result<()> {
    info!("command rm");

    let id = resolve_id(list, id_text)?;
    let short_id = list
        .get(id)
        .map(|task| task.short_id())
        .unwrap_or_else(|| id.to_string());
    list.remove(id);
    store.save(list.tasks());

    println!("Deleted task {short_id}.");
    Ok(())
}

#[instrument(skip(renderer, list, now))]
fn cmd_list(
    renderer: &mut Renderer,
    list: &mut TaskList,
    status: StatusFilter,
    search: Option<String>,
    now: chrono::DateTime<Utc>,
) -> anyhow::Result<()> {
    info!("command list");

    list.set_filter(status);
    if let Some(query) = search {
        list.set_search(query);
    }

    renderer.print_grouped(&list.filtered(), now)
}

/// Resolves CLI input to a task id.
///
/// Accepts a full UUID or a prefix of one; hyphens and case are ignored.
/// The prefix must match exactly one task in the collection.
fn resolve_id(list: &TaskList, text: &str) -> anyhow::Result<Uuid> {
    let needle: String = text
        .chars()
        .filter(|c| *c != '-')
        .collect::<String>()
        .to_lowercase();
    if needle.is_empty() {
        return Err(anyhow!("task id cannot be empty"));
    }

    let matches: Vec<Uuid> = list
        .tasks()
        .iter()
        .filter(|task| task.id.simple().to_string().starts_with(&needle))
        .map(|task| task.id)
        .collect();

    match matches.as_slice() {
        [] => Err(anyhow!("no task matching '{text}'")),
        [id] => Ok(*id),
        many => Err(anyhow!(
            "'{text}' is ambiguous, it matches {} tasks",
            many.len()
        )),
    }
}
