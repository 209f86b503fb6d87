//! Subcommand dispatch and plain-text rendering.

use anyhow::Result;
use chrono::Local;

use tmark_core::api::{DoctorEntry, JumpOutcome, TmarkCore};
use tmark_core::bookmark::{Bookmark, TargetKind};
use tmark_core::resolver::{Resolution, ResolveMethod};
use tmark_core::snapshot::SnapshotProvider;

use crate::config::Command;

/// Run one subcommand and return what should be printed
pub async fn execute<P: SnapshotProvider>(
    core: &TmarkCore<P>,
    command: &Command,
    default_kind: TargetKind,
) -> Result<String> {
    let output = match command {
        Command::Add { label, kind } => {
            let (slot, bookmark) = core
                .add_current_with_slot(label, kind.unwrap_or(default_kind))
                .await?;
            format!("Added [{}] {}", slot, describe(&bookmark))
        }
        Command::List => format_list(&core.list().await?),
        Command::Jump { reference } => format_jump(&core.jump(reference).await?),
        Command::Prev => format_jump(&core.jump_previous().await?),
        Command::Rm { reference } => {
            let removed = core.remove(reference).await?;
            format!("Removed {}", describe(&removed))
        }
        Command::Rename { reference, label } => {
            let renamed = core.rename(reference, label).await?;
            format!("Renamed to {}", describe(&renamed))
        }
        Command::Replace { slot, label, kind } => {
            let bookmark = core
                .replace_current(*slot, label, kind.unwrap_or(default_kind))
                .await?;
            format!("Replaced [{}] with {}", slot, describe(&bookmark))
        }
        Command::Mv { from, to } => {
            core.move_slot(*from, *to).await?;
            format!("Moved [{}] to [{}]", from, to)
        }
        Command::Doctor => format_doctor(&core.doctor().await?),
    };
    Ok(output)
}

fn describe(bookmark: &Bookmark) -> String {
    format!(
        "'{}' ({} {})",
        bookmark.label, bookmark.kind, bookmark.target
    )
}

fn format_jump(outcome: &JumpOutcome) -> String {
    let mut line = format!("Jumped to '{}'", outcome.bookmark.label);
    if outcome.method != ResolveMethod::Id {
        line.push_str(&format!(" via {} ({})", outcome.method, outcome.target));
    }
    line
}

/// Slot, label, kind, id, cwd and last use, one bookmark per line
pub fn format_list(bookmarks: &[Bookmark]) -> String {
    if bookmarks.is_empty() {
        return "No bookmarks".to_string();
    }

    let width = bookmarks
        .iter()
        .map(|b| b.label.chars().count())
        .max()
        .unwrap_or(0)
        .max("LABEL".len());

    let mut lines = vec![format!(
        "{:>4}  {:<width$}  {:<7}  {:<8}  {:<16}  CWD",
        "SLOT", "LABEL", "KIND", "ID", "LAST USED"
    )];
    for (i, b) in bookmarks.iter().enumerate() {
        lines.push(format!(
            "{:>4}  {:<width$}  {:<7}  {:<8}  {:<16}  {}",
            i + 1,
            b.label,
            b.kind.as_str(),
            short_id(&b.id),
            b.meta
                .last_used
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M")
                .to_string(),
            b.meta.cwd.as_deref().unwrap_or("-"),
        ));
    }
    lines.join("\n")
}

/// One line per bookmark with how (or why not) it resolves
pub fn format_doctor(entries: &[DoctorEntry]) -> String {
    if entries.is_empty() {
        return "No bookmarks".to_string();
    }

    entries
        .iter()
        .map(|entry| match &entry.resolution {
            Resolution::Resolved { method, target } => format!(
                "{:>4}  {}  ok via {} -> {}",
                entry.slot, entry.bookmark.label, method, target
            ),
            Resolution::Unresolved { reason } => format!(
                "{:>4}  {}  unresolved: {}",
                entry.slot, entry.bookmark.label, reason
            ),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}
