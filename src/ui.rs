//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the page using `ratatui`: the
//! header, the ingestion error banner, the drop zone, the track rows with
//! their per-row controls, the status line and the picker overlay.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Padding, Paragraph, Wrap},
};
use std::{collections::BTreeMap, sync::LazyLock, time::Duration};

use crate::app::{App, PlayerState};
use crate::config::{TimeField, UiSettings};
use crate::library::Track;

static CONTROLS_MAP: LazyLock<BTreeMap<String, String>> = LazyLock::new(|| {
    let mut map: BTreeMap<String, String> = BTreeMap::new();
    map.insert("j/k".to_string(), "up/down".to_string());
    map.insert("gg/G".to_string(), "top/bottom".to_string());
    map.insert("enter/p".to_string(), "play row".to_string());
    map.insert("space".to_string(), "pause row".to_string());
    map.insert("d".to_string(), "delete row".to_string());
    map.insert("a".to_string(), "type a path".to_string());
    map.insert("o".to_string(), "browse files".to_string());
    map.insert("q".to_string(), "quit".to_string());
    map
});

/// Render the controls help text in a stable, human-friendly order.
fn controls_text() -> String {
    let order = ["j/k", "gg/G", "enter/p", "space", "d", "a", "o", "q"];
    order
        .iter()
        .filter_map(|k| CONTROLS_MAP.get(*k).map(|v| format!("[{}] {}", k, v)))
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Format a `Duration` as `MM:SS`.
fn format_mmss(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Build the now-playing time text (elapsed/total/remaining) per `UiSettings`.
fn now_playing_time_text(
    elapsed: Duration,
    total: Option<Duration>,
    ui: &UiSettings,
) -> Option<String> {
    if ui.now_playing_time_fields.is_empty() {
        return None;
    }

    let mut parts: Vec<String> = Vec::new();
    for f in &ui.now_playing_time_fields {
        match f {
            TimeField::Elapsed => parts.push(format_mmss(elapsed)),
            TimeField::Total => {
                if let Some(t) = total {
                    parts.push(format_mmss(t));
                }
            }
            TimeField::Remaining => {
                if let Some(t) = total {
                    let rem = t.saturating_sub(elapsed);
                    parts.push(format!("-{}", format_mmss(rem)));
                }
            }
        }
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(&ui.now_playing_time_separator))
    }
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    // Keep the popup smaller and avoid covering the entire UI.
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(5);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

/// Render a per-row control label; disabled controls are dimmed and inert.
fn control_span(label: &str, enabled: bool) -> Span<'static> {
    if enabled {
        Span::styled(format!("[{label}]"), Style::new().bold())
    } else {
        Span::styled(format!("[{label}]"), Style::new().dim().crossed_out())
    }
}

/// One track row: its display name plus the row's control affordances.
fn track_row<'a>(app: &App, track: &'a Track) -> ListItem<'a> {
    let active = app.active_track_id() == Some(track.id);
    let name = if active {
        Span::styled(track.name.as_str(), Style::new().bold())
    } else {
        Span::raw(track.name.as_str())
    };

    ListItem::new(Line::from(vec![
        name,
        Span::raw("  "),
        control_span("Play", app.play_enabled(track.id)),
        Span::raw(" "),
        control_span("Pause", app.pause_enabled(track.id)),
        Span::raw(" "),
        control_span("Delete", true),
    ]))
}

/// Render the entire page into the provided `frame` using `app` state and settings.
pub fn draw(frame: &mut Frame, app: &App, ui_settings: &UiSettings) {
    let show_error = app.error.is_some();

    let mut constraints = vec![Constraint::Length(3)];
    if show_error {
        constraints.push(Constraint::Length(3));
    }
    constraints.extend([
        Constraint::Length(3),
        Constraint::Min(1),
        Constraint::Length(4),
        Constraint::Length(4),
    ]);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(frame.area());

    let header_area = chunks[0];
    let mut next = 1;
    let error_area = if show_error {
        let a = chunks[next];
        next += 1;
        Some(a)
    } else {
        None
    };
    let drop_area = chunks[next];
    let list_area = chunks[next + 1];
    let status_area = chunks[next + 2];
    let footer_area = chunks[next + 3];

    // Header
    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" staccato ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, header_area);

    // Ingestion error banner; rendered only while a rejection message is set.
    if let (Some(area), Some(message)) = (error_area, app.error.as_deref()) {
        let banner = Paragraph::new(message)
            .style(Style::new().red().bold())
            .block(
                Block::bordered()
                    .padding(Padding {
                        left: 1,
                        right: 0,
                        top: 0,
                        bottom: 0,
                    })
                    .title(" error "),
            )
            .wrap(Wrap { trim: true });
        frame.render_widget(banner, area);
    }

    // Drop zone / path-entry line
    let (drop_text, drop_title) = if app.entry_mode {
        (
            format!("> {}_", app.entry),
            " add track (enter submits, esc cancels) ",
        )
    } else {
        (ui_settings.drop_hint_text.clone(), " drop zone ")
    };
    let drop_zone = Paragraph::new(drop_text)
        .block(
            Block::bordered()
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                })
                .title(drop_title),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(drop_zone, drop_area);

    // Track rows
    {
        // Center the selected item when possible by creating a visible window.
        // Only build ListItems for the visible window (avoid allocating the entire list).
        let total = app.tracks.len();
        let list_height = list_area.height.saturating_sub(2) as usize;
        let sel_pos = app.selected.min(total.saturating_sub(1));
        let (start, end, selected_pos_in_visible) = if total <= list_height || list_height == 0 {
            (0, total, sel_pos)
        } else {
            let half = list_height / 2;
            let mut start = if sel_pos > half { sel_pos - half } else { 0 };
            if start + list_height > total {
                start = total - list_height;
            }
            (start, start + list_height, sel_pos - start)
        };

        let visible_items: Vec<ListItem> = app.tracks[start..end]
            .iter()
            .map(|t| track_row(app, t))
            .collect();

        let list = List::new(visible_items)
            .block(Block::default().borders(Borders::ALL).title(" tracks "))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut state = ratatui::widgets::ListState::default();
        if total > 0 {
            state.select(Some(selected_pos_in_visible));
        }
        frame.render_stateful_widget(list, list_area, &mut state);
    }

    // Status box
    let status = {
        let mut parts: Vec<String> = Vec::new();

        match app.state {
            PlayerState::Idle => parts.push("Idle".to_string()),
            PlayerState::Playing { .. } => parts.push("Playing".to_string()),
            PlayerState::Paused { .. } => parts.push("Paused".to_string()),
        }

        if let Some(track) = app.now_playing() {
            // While paused, show the captured offset rather than the live
            // readout so the display matches where resume will land.
            let elapsed = match app.state {
                PlayerState::Paused { resume_at, .. } => resume_at,
                _ => app
                    .playback_handle
                    .as_ref()
                    .and_then(|h| h.lock().ok().map(|info| info.elapsed))
                    .unwrap_or(Duration::ZERO),
            };
            let time = now_playing_time_text(elapsed, track.duration, ui_settings);
            if let Some(time) = time {
                parts.push(format!("Now Playing: {} [{}]", track.name, time));
            } else {
                parts.push(format!("Now Playing: {}", track.name));
            }
        }

        if let Some(alert) = &app.playback_alert {
            parts.push(format!("Playback failed: {alert}"));
        }

        parts.join(" • ")
    };

    let status_par = Paragraph::new(status)
        .block(
            Block::bordered()
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                })
                .title(" status "),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(status_par, status_area);

    // Footer
    let footer = Paragraph::new(controls_text())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, footer_area);

    // Picker overlay (keeps the list visible under it)
    if let Some(picker) = &app.picker {
        let popup_area = centered_rect_sized(72, 18, list_area);
        frame.render_widget(Clear, popup_area);

        let items: Vec<ListItem> = picker
            .entries
            .iter()
            .map(|e| {
                if e.is_dir {
                    ListItem::new(format!("{}/", e.name)).style(Style::new().bold())
                } else {
                    ListItem::new(e.name.clone())
                }
            })
            .collect();

        let title = format!(" pick a file: {} ", picker.dir.display());
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(title))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut state = ratatui::widgets::ListState::default();
        if !picker.entries.is_empty() {
            state.select(Some(picker.selected));
        }
        frame.render_stateful_widget(list, popup_area, &mut state);
    }
}
