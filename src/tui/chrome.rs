// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Workchart-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Workchart and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// Title, footer, help, and style helpers used by TUI rendering.
fn view_title(label: &str, focused: bool, tail: Option<&str>) -> Line<'static> {
    let label_style = if focused {
        Style::default().fg(FOCUS_COLOR).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };
    let mut spans = vec![Span::raw("─ "), Span::styled(label.to_owned(), label_style)];
    if let Some(tail) = tail.map(str::trim).filter(|tail| !tail.is_empty()) {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(tail.to_owned(), Style::default().fg(WARNING_COLOR)));
    }
    spans.push(Span::raw(" "));
    Line::from(spans)
}

fn panel_border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(FOCUS_COLOR)
    } else {
        Style::default()
    }
}

fn preview_title_tail(collisions: &[LabelCollision]) -> Option<String> {
    if collisions.is_empty() {
        return None;
    }
    let ids = collisions
        .iter()
        .map(|collision| collision.mermaid_id.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    Some(format!("⚠ merged labels: {ids}"))
}

fn footer_help_line(app: &App, toast_suffix: &str) -> Line<'static> {
    let mut spans = Vec::<Span<'static>>::new();

    match &app.mode {
        Mode::Rename { buffer, .. } => {
            push_footer_entry(&mut spans, "RENAME", buffer);
            push_footer_entry(&mut spans, "SAVE", "Enter");
            push_footer_entry(&mut spans, "CANCEL", "Esc");
        }
        Mode::Connect { source } => {
            push_footer_entry(&mut spans, "CONNECT FROM", source.as_str());
            push_footer_entry(&mut spans, "TARGET", "j/k then e");
            push_footer_entry(&mut spans, "CANCEL", "Esc");
        }
        Mode::Split { edge_id } => {
            push_footer_entry(&mut spans, "SPLIT", edge_id.as_str());
            push_footer_entry(&mut spans, "KIND", "a/s/c");
            push_footer_entry(&mut spans, "CANCEL", "Esc");
        }
        Mode::Normal => {
            push_footer_entry(&mut spans, "ADD", "a/s/c");
            match app.focus {
                Pane::Nodes => {
                    push_footer_entry(&mut spans, "RENAME", "r");
                    push_footer_entry(&mut spans, "CONNECT", "e");
                    push_footer_entry(&mut spans, "MOVE", "HJKL");
                }
                Pane::Edges => {
                    push_footer_entry(&mut spans, "LABEL", "r");
                    push_footer_entry(&mut spans, "SPLIT", "x");
                }
            }
            push_footer_entry(&mut spans, "DEL", "d");
            push_footer_entry(&mut spans, "COPY", "y/Y");
            push_footer_entry(&mut spans, "PNG/SVG", "p/v");
            push_footer_entry(&mut spans, "HELP", "?");
            push_footer_entry(&mut spans, "QUIT", "q");
        }
    }

    if !toast_suffix.is_empty() {
        spans.push(Span::styled(
            toast_suffix.to_owned(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ));
    }

    Line::from(spans)
}

fn push_footer_entry(spans: &mut Vec<Span<'static>>, label: &str, value: &str) {
    if !spans.is_empty() {
        spans.push(Span::styled(" | ", Style::default().fg(FOOTER_LABEL_COLOR)));
    }
    spans.push(Span::styled(
        format!("{}:", footer_label_ucfirst(label)),
        Style::default().fg(FOOTER_LABEL_COLOR),
    ));
    spans.push(Span::styled(value.to_owned(), Style::default().fg(FOOTER_KEY_COLOR)));
}

fn footer_label_ucfirst(label: &str) -> String {
    let lower = label.to_ascii_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

fn help_kv(key: &str, desc: &str, key_width: usize) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("{key:>width$}", width = key_width),
            Style::default().fg(FOOTER_KEY_COLOR).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::raw(desc.to_owned()),
    ])
}

fn centered_rect(width_percent: u16, height_percent: u16, area: Rect) -> Rect {
    let vertical_margin = (100u16.saturating_sub(height_percent)) / 2;
    let horizontal_margin = (100u16.saturating_sub(width_percent)) / 2;

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(vertical_margin),
            Constraint::Percentage(height_percent),
            Constraint::Percentage(vertical_margin),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(horizontal_margin),
            Constraint::Percentage(width_percent),
            Constraint::Percentage(horizontal_margin),
        ])
        .split(vertical[1])[1]
}

const HELP_ENTRIES: &[(&str, &str)] = &[
    ("a / s / c", "Add Action / State / Choice"),
    ("Tab", "Switch Nodes / Edges"),
    ("j/k, ↑/↓", "Select"),
    ("r, Enter", "Rename node or label edge"),
    ("d", "Delete selected"),
    ("e", "Connect: mark source, then e on target"),
    ("x", "Split selected edge, then a/s/c"),
    ("H/J/K/L", "Move node by 10"),
    ("y / Y", "Copy Mermaid (plain / fenced)"),
    ("p / v", "Export PNG / SVG"),
    ("X", "Clear diagram"),
    ("Esc", "Cancel"),
    ("q", "Quit"),
];

fn render_help(frame: &mut Frame<'_>, area: Rect) {
    let area = centered_rect(60, 70, area);
    frame.render_widget(Clear, area);

    let key_width = HELP_ENTRIES.iter().map(|(key, _)| key.chars().count()).max().unwrap_or(0);
    let lines = HELP_ENTRIES
        .iter()
        .map(|(key, desc)| help_kv(key, desc, key_width))
        .collect::<Vec<_>>();
    let help = Paragraph::new(Text::from(lines)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(view_title("Help", true, None))
            .border_style(panel_border_style(true)),
    );
    frame.render_widget(help, area);
}
