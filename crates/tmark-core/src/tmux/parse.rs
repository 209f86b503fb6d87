//! Parsers for the tab-separated `-F` formats the client asks tmux for.
//!
//! Names come last in each format and are split with `splitn`, so a name
//! containing a tab does not shift the other fields.

use crate::snapshot::{Location, PaneEntry, SessionEntry, WindowEntry};

pub(crate) const SESSION_FORMAT: &str = "#{session_id}\t#{session_attached}\t#{session_name}";

pub(crate) const WINDOW_FORMAT: &str =
    "#{window_id}\t#{session_id}\t#{window_index}\t#{window_active}\t#{window_name}";

pub(crate) const PANE_FORMAT: &str =
    "#{pane_id}\t#{window_id}\t#{session_id}\t#{pane_index}\t#{pane_active}\t#{pane_current_path}";

pub(crate) const LOCATION_FORMAT: &str = "#{session_id}\t#{window_id}\t#{pane_id}\t#{window_index}\t#{pane_current_path}\t#{session_name}\t#{window_name}";

/// Format: session_id\tattached\tname
pub(crate) fn parse_session(line: &str) -> Option<SessionEntry> {
    let mut parts = line.splitn(3, '\t');
    let id = parts.next()?;
    let attached = parts.next()?.parse().unwrap_or(0);
    let name = parts.next()?;
    if !id.starts_with('$') {
        return None;
    }

    Some(SessionEntry {
        id: id.to_string(),
        name: name.to_string(),
        attached,
    })
}

/// Format: window_id\tsession_id\tindex\tactive\tname
pub(crate) fn parse_window(line: &str) -> Option<WindowEntry> {
    let mut parts = line.splitn(5, '\t');
    let id = parts.next()?;
    let session_id = parts.next()?;
    let index = parts.next()?.parse().ok()?;
    let active = parts.next()? == "1";
    let name = parts.next()?;
    if !id.starts_with('@') {
        return None;
    }

    Some(WindowEntry {
        id: id.to_string(),
        index,
        name: name.to_string(),
        session_id: session_id.to_string(),
        active,
    })
}

/// Format: pane_id\twindow_id\tsession_id\tindex\tactive\tcwd
pub(crate) fn parse_pane(line: &str) -> Option<PaneEntry> {
    let mut parts = line.splitn(6, '\t');
    let id = parts.next()?;
    let window_id = parts.next()?;
    let session_id = parts.next()?;
    let index = parts.next()?.parse().ok()?;
    let active = parts.next()? == "1";
    let cwd = parts.next()?;
    if !id.starts_with('%') {
        return None;
    }

    Some(PaneEntry {
        id: id.to_string(),
        index,
        window_id: window_id.to_string(),
        session_id: session_id.to_string(),
        cwd: cwd.to_string(),
        active,
    })
}

/// Format: session_id\twindow_id\tpane_id\twindow_index\tcwd\tsession_name\twindow_name
pub(crate) fn parse_location(line: &str) -> Option<Location> {
    let mut parts = line.trim_end_matches('\n').splitn(7, '\t');
    let session_id = parts.next()?;
    let window_id = parts.next()?;
    let pane_id = parts.next()?;
    let window_index = parts.next()?.parse().ok()?;
    let cwd = parts.next()?;
    let session_name = parts.next()?;
    let window_name = parts.next()?;

    Some(Location {
        session_id: session_id.to_string(),
        session_name: session_name.to_string(),
        window_id: window_id.to_string(),
        window_name: window_name.to_string(),
        window_index,
        pane_id: pane_id.to_string(),
        cwd: cwd.to_string(),
    })
}

/// Parse every line with `parse`, logging and skipping the ones that fail
pub(crate) fn parse_lines<T>(stdout: &str, what: &str, parse: fn(&str) -> Option<T>) -> Vec<T> {
    stdout
        .lines()
        .filter(|line| !line.is_empty())
        .filter_map(|line| {
            let parsed = parse(line);
            if parsed.is_none() {
                tracing::debug!("Skipping unparseable tmux {} line: {:?}", what, line);
            }
            parsed
        })
        .collect()
}
