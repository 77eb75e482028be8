// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Workchart-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Workchart and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Terminal UI.
//!
//! A keyboard-driven editor (ratatui + crossterm) over the shared [`DiagramStore`]: node and
//! edge lists on the left, the live Mermaid preview on the right.

use std::{
    error::Error,
    io,
    path::PathBuf,
    sync::Arc,
    time::{Duration, Instant},
};

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::editor::DiagramStore;
use crate::export::{
    copy_mermaid, export_image, ClipboardSink, CopyFormat, ImageFormat, Osc52Clipboard,
    SceneRenderer,
};
use crate::format::mermaid::{export_flowchart, label_collisions, LabelCollision};
use crate::model::{Diagram, Edge, EdgeId, Node, NodeId, NodeKind, Position, Viewport};

const FOCUS_COLOR: Color = Color::LightGreen;
const WARNING_COLOR: Color = Color::Yellow;
const FOOTER_LABEL_COLOR: Color = Color::Gray;
const FOOTER_KEY_COLOR: Color = Color::Cyan;
const MOVE_STEP: f64 = 10.0;
const NEW_NODE_GAP: f64 = 120.0;
const TOAST_TTL: Duration = Duration::from_secs(2);

/// Runs the interactive terminal UI until the user quits.
///
/// Blocks the calling thread; every edit takes the store lock with `blocking_lock`, so call this
/// from a plain thread or `spawn_blocking`.
pub fn run(store: Arc<Mutex<DiagramStore>>, export_dir: PathBuf) -> Result<(), Box<dyn Error>> {
    let mut terminal = TerminalSession::new()?;
    let mut app = App::new(store, Box::new(Osc52Clipboard::stdout()), export_dir);

    while !app.should_quit {
        app.refresh();
        terminal.draw(|frame| draw(frame, &mut app))?;

        if event::poll(Duration::from_millis(250))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
                _ => {}
            }
        }
    }

    Ok(())
}

/// Sample approval workflow used by `--demo`.
pub fn demo_diagram() -> Diagram {
    let node = |id: &str, kind: NodeKind, label: &str, x: f64, y: f64| {
        NodeId::new(id).map(|node_id| Node::new(node_id, kind, label, Position::new(x, y)))
    };
    let edge = |source: &str, target: &str, label: Option<&str>| {
        Ok::<_, crate::model::IdError>(
            Edge::between(NodeId::new(source)?, NodeId::new(target)?).with_label(label),
        )
    };

    let nodes = [
        node("state-1", NodeKind::State, "Draft", 0.0, 0.0),
        node("action-2", NodeKind::Action, "Submit for review", 0.0, 120.0),
        node("choice-3", NodeKind::Choice, "Approved?", 0.0, 240.0),
        node("state-4", NodeKind::State, "Published", -160.0, 360.0),
        node("action-5", NodeKind::Action, "Request changes", 160.0, 360.0),
    ]
    .into_iter()
    .collect::<Result<Vec<_>, _>>();
    let edges = [
        edge("state-1", "action-2", None),
        edge("action-2", "choice-3", None),
        edge("choice-3", "state-4", Some("yes")),
        edge("choice-3", "action-5", Some("no")),
        edge("action-5", "state-1", None),
    ]
    .into_iter()
    .collect::<Result<Vec<_>, _>>();

    match (nodes, edges) {
        (Ok(nodes), Ok(edges)) => Diagram::new(nodes, edges, Viewport::default()),
        _ => Diagram::default(),
    }
}

fn draw(frame: &mut Frame<'_>, app: &mut App) {
    let area = frame.area();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);
    let main_area = layout[0];
    let status_area = layout[1];

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(main_area);
    let lists = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(panes[0]);

    let connect_source = match &app.mode {
        Mode::Connect { source } => Some(source.clone()),
        _ => None,
    };
    let node_items = app
        .snapshot
        .nodes()
        .iter()
        .map(|node| {
            let marker = if connect_source.as_ref() == Some(node.node_id()) { "● " } else { "  " };
            let position = node.position();
            ListItem::new(Line::from(vec![
                Span::styled(marker, Style::default().fg(FOCUS_COLOR)),
                Span::styled(format!("{:<7}", node.kind().display_name()), kind_style(node.kind())),
                Span::raw(node.label().to_owned()),
                Span::styled(
                    format!("  ({:.0}, {:.0})", position.x, position.y),
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
        })
        .collect::<Vec<_>>();
    let nodes_focused = app.focus == Pane::Nodes;
    let nodes_list = List::new(node_items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(view_title("Nodes", nodes_focused, None))
                .border_style(panel_border_style(nodes_focused)),
        )
        .highlight_style(cursor_style(nodes_focused));
    frame.render_stateful_widget(nodes_list, lists[0], &mut app.nodes_state);

    let edge_items = app
        .snapshot
        .edges()
        .iter()
        .map(|edge| {
            let source = app.node_label(edge.source_id());
            let target = app.node_label(edge.target_id());
            let dangling = source.is_none() || target.is_none();
            let mut spans = vec![
                Span::raw(source.unwrap_or_else(|| edge.source_id().to_string())),
                Span::styled(" → ", Style::default().fg(FOOTER_KEY_COLOR)),
                Span::raw(target.unwrap_or_else(|| edge.target_id().to_string())),
            ];
            if let Some(label) = edge.label() {
                spans.push(Span::styled(format!("  |{label}|"), Style::default().fg(Color::Gray)));
            }
            let item = ListItem::new(Line::from(spans));
            if dangling {
                item.style(Style::default().fg(Color::DarkGray))
            } else {
                item
            }
        })
        .collect::<Vec<_>>();
    let edges_focused = app.focus == Pane::Edges;
    let edges_list = List::new(edge_items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(view_title("Edges", edges_focused, None))
                .border_style(panel_border_style(edges_focused)),
        )
        .highlight_style(cursor_style(edges_focused));
    frame.render_stateful_widget(edges_list, lists[1], &mut app.edges_state);

    let (preview_text, preview_tail) = match app.preview() {
        Some(preview) => (preview.text.clone(), preview_title_tail(&preview.collisions)),
        None => (String::new(), None),
    };
    let preview = Paragraph::new(preview_text).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .title(view_title("Mermaid", false, preview_tail.as_deref())),
    );
    frame.render_widget(preview, panes[1]);

    if app.toast.as_ref().is_some_and(|toast| toast.expires_at <= Instant::now()) {
        app.toast = None;
    }
    let toast_suffix = app
        .toast
        .as_ref()
        .map(|toast| format!(" | {}", toast.message))
        .unwrap_or_default();
    let status = Paragraph::new(footer_help_line(app, &toast_suffix));
    frame.render_widget(status, status_area);

    if app.show_help {
        render_help(frame, main_area);
    }
}

fn kind_style(kind: NodeKind) -> Style {
    match kind {
        NodeKind::Action => Style::default().fg(Color::LightBlue),
        NodeKind::State => Style::default().fg(Color::LightGreen),
        NodeKind::Choice => Style::default().fg(Color::LightYellow),
    }
}

fn cursor_style(focused: bool) -> Style {
    if focused {
        Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    }
}

// Extracted title/footer/help rendering helpers.
include!("chrome.rs");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pane {
    Nodes,
    Edges,
}

#[derive(Debug, Clone, PartialEq)]
enum RenameTarget {
    Node(NodeId),
    Edge(EdgeId),
}

#[derive(Debug, Clone, PartialEq)]
enum Mode {
    Normal,
    Rename { target: RenameTarget, buffer: String },
    Connect { source: NodeId },
    Split { edge_id: EdgeId },
}

#[derive(Debug, Clone)]
struct Toast {
    message: String,
    expires_at: Instant,
}

/// Mermaid text and collision report for one store revision.
#[derive(Debug, Clone)]
struct Preview {
    rev: u64,
    text: String,
    collisions: Vec<LabelCollision>,
}

struct App {
    store: Arc<Mutex<DiagramStore>>,
    snapshot: Diagram,
    snapshot_rev: Option<u64>,
    preview: Option<Preview>,
    focus: Pane,
    nodes_state: ListState,
    edges_state: ListState,
    mode: Mode,
    toast: Option<Toast>,
    show_help: bool,
    clipboard: Box<dyn ClipboardSink + Send>,
    renderer: SceneRenderer,
    export_dir: PathBuf,
    should_quit: bool,
}

impl App {
    fn new(
        store: Arc<Mutex<DiagramStore>>,
        clipboard: Box<dyn ClipboardSink + Send>,
        export_dir: PathBuf,
    ) -> Self {
        let mut app = Self {
            store,
            snapshot: Diagram::default(),
            snapshot_rev: None,
            preview: None,
            focus: Pane::Nodes,
            nodes_state: ListState::default(),
            edges_state: ListState::default(),
            mode: Mode::Normal,
            toast: None,
            show_help: false,
            clipboard,
            renderer: SceneRenderer::new(),
            export_dir,
            should_quit: false,
        };
        app.refresh();
        app
    }

    /// Pulls a fresh snapshot when the store moved on, e.g. after an MCP edit.
    fn refresh(&mut self) {
        let (rev, diagram) = {
            let store = self.store.blocking_lock();
            if self.snapshot_rev == Some(store.rev()) {
                return;
            }
            (store.rev(), store.diagram().clone())
        };
        self.snapshot = diagram;
        self.snapshot_rev = Some(rev);
        clamp_selection(&mut self.nodes_state, self.snapshot.nodes().len());
        clamp_selection(&mut self.edges_state, self.snapshot.edges().len());

        if let Mode::Connect { source } = &self.mode {
            if !self.snapshot.contains_node(source) {
                self.mode = Mode::Normal;
            }
        }
    }

    fn preview(&mut self) -> Option<&Preview> {
        let rev = self.snapshot_rev?;
        if self.preview.as_ref().map(|preview| preview.rev) != Some(rev) {
            self.preview = Some(Preview {
                rev,
                text: export_flowchart(&self.snapshot),
                collisions: label_collisions(&self.snapshot),
            });
        }
        self.preview.as_ref()
    }

    fn edit<R>(&mut self, f: impl FnOnce(&mut DiagramStore) -> R) -> R {
        let result = {
            let mut store = self.store.blocking_lock();
            f(&mut store)
        };
        self.refresh();
        result
    }

    fn node_label(&self, node_id: &NodeId) -> Option<String> {
        self.snapshot.node(node_id).map(|node| node.label().to_owned())
    }

    fn selected_node(&self) -> Option<&Node> {
        self.nodes_state.selected().and_then(|idx| self.snapshot.nodes().get(idx))
    }

    fn selected_edge(&self) -> Option<&Edge> {
        self.edges_state.selected().and_then(|idx| self.snapshot.edges().get(idx))
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if self.handle_key_code(key.code) {
            self.should_quit = true;
        }
    }

    /// Returns `true` when the key asks to quit.
    fn handle_key_code(&mut self, code: KeyCode) -> bool {
        if self.show_help {
            match code {
                KeyCode::Esc | KeyCode::Char('?') => self.show_help = false,
                KeyCode::Char('q') => return true,
                _ => {}
            }
            return false;
        }

        match self.mode.clone() {
            Mode::Rename { target, buffer } => {
                self.handle_rename_key(code, target, buffer);
                false
            }
            Mode::Connect { source } => {
                self.handle_connect_key(code, source);
                false
            }
            Mode::Split { edge_id } => {
                self.handle_split_key(code, edge_id);
                false
            }
            Mode::Normal => self.handle_normal_key(code),
        }
    }

    fn handle_normal_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Char('a') => self.add_node(NodeKind::Action),
            KeyCode::Char('s') => self.add_node(NodeKind::State),
            KeyCode::Char('c') => self.add_node(NodeKind::Choice),
            KeyCode::Tab | KeyCode::BackTab => {
                self.focus = match self.focus {
                    Pane::Nodes => Pane::Edges,
                    Pane::Edges => Pane::Nodes,
                };
            }
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(1),
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(-1),
            KeyCode::Char('r') | KeyCode::Enter => self.begin_rename(),
            KeyCode::Char('d') | KeyCode::Delete => self.delete_selected(),
            KeyCode::Char('e') => self.begin_connect(),
            KeyCode::Char('x') => self.begin_split(),
            KeyCode::Char('H') => self.nudge_selected(-MOVE_STEP, 0.0),
            KeyCode::Char('L') => self.nudge_selected(MOVE_STEP, 0.0),
            KeyCode::Char('K') => self.nudge_selected(0.0, -MOVE_STEP),
            KeyCode::Char('J') => self.nudge_selected(0.0, MOVE_STEP),
            KeyCode::Char('y') => self.copy(CopyFormat::Plain),
            KeyCode::Char('Y') => self.copy(CopyFormat::Fenced),
            KeyCode::Char('p') => self.export(ImageFormat::Png),
            KeyCode::Char('v') => self.export(ImageFormat::Svg),
            KeyCode::Char('X') => self.clear_all(),
            _ => {}
        }
        false
    }

    fn handle_rename_key(&mut self, code: KeyCode, target: RenameTarget, mut buffer: String) {
        match code {
            KeyCode::Esc => {
                self.mode = Mode::Normal;
                self.set_toast("Rename cancelled");
            }
            KeyCode::Enter => {
                self.mode = Mode::Normal;
                let changed = self.edit(|store| match &target {
                    RenameTarget::Node(node_id) => store.rename_node(node_id, buffer),
                    RenameTarget::Edge(edge_id) => store.rename_edge(edge_id, buffer),
                });
                if !changed {
                    debug!(?target, "rename target vanished before commit");
                }
            }
            KeyCode::Backspace => {
                buffer.pop();
                self.mode = Mode::Rename { target, buffer };
            }
            KeyCode::Char(ch) => {
                buffer.push(ch);
                self.mode = Mode::Rename { target, buffer };
            }
            _ => {}
        }
    }

    fn handle_connect_key(&mut self, code: KeyCode, source: NodeId) {
        match code {
            KeyCode::Esc => {
                self.mode = Mode::Normal;
                self.set_toast("Connect cancelled");
            }
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(1),
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(-1),
            KeyCode::Char('e') | KeyCode::Enter => {
                self.mode = Mode::Normal;
                let Some(target) = self.selected_node().map(|node| node.node_id().clone()) else {
                    return;
                };
                if target == source {
                    self.set_toast("Connect cancelled");
                    return;
                }
                let before = self.snapshot.edges().len();
                match self.edit(|store| store.add_edge(&source, &target)) {
                    Ok(edge_id) => {
                        if self.snapshot.edges().len() > before {
                            self.select_edge(&edge_id);
                            self.set_toast(format!("Connected {edge_id}"));
                        } else {
                            self.set_toast(format!("Already connected ({edge_id})"));
                        }
                    }
                    Err(err) => self.set_toast(format!("Connect failed: {err}")),
                }
            }
            _ => {}
        }
    }

    fn handle_split_key(&mut self, code: KeyCode, edge_id: EdgeId) {
        let kind = match code {
            KeyCode::Char('a') => NodeKind::Action,
            KeyCode::Char('s') => NodeKind::State,
            KeyCode::Char('c') => NodeKind::Choice,
            KeyCode::Esc => {
                self.mode = Mode::Normal;
                self.set_toast("Split cancelled");
                return;
            }
            _ => return,
        };

        self.mode = Mode::Normal;
        let position = self.snapshot.edge_midpoint(&edge_id).unwrap_or_default();
        match self.edit(|store| store.split_edge(&edge_id, kind, position)) {
            Some(node_id) => {
                self.focus = Pane::Nodes;
                self.select_node(&node_id);
            }
            None => self.set_toast("Edge is no longer splittable"),
        }
    }

    fn add_node(&mut self, kind: NodeKind) {
        let position = self.next_node_position();
        let node_id = self.edit(|store| store.add_node(kind, position, None));
        self.focus = Pane::Nodes;
        self.select_node(&node_id);
    }

    /// New nodes stack below the lowest node, aligned with the selection.
    fn next_node_position(&self) -> Position {
        let lowest = self
            .snapshot
            .nodes()
            .iter()
            .map(|node| node.position().y)
            .fold(None, |acc: Option<f64>, y| Some(acc.map_or(y, |acc| acc.max(y))));
        let x = self.selected_node().map(|node| node.position().x).unwrap_or(0.0);
        match lowest {
            Some(y) => Position::new(x, y + NEW_NODE_GAP),
            None => Position::default(),
        }
    }

    fn move_cursor(&mut self, delta: isize) {
        let (state, len) = match (&self.mode, self.focus) {
            (Mode::Connect { .. }, _) | (_, Pane::Nodes) => {
                (&mut self.nodes_state, self.snapshot.nodes().len())
            }
            (_, Pane::Edges) => (&mut self.edges_state, self.snapshot.edges().len()),
        };
        if len == 0 {
            state.select(None);
            return;
        }
        let current = state.selected().unwrap_or(0) as isize;
        let next = (current + delta).clamp(0, len as isize - 1) as usize;
        state.select(Some(next));
    }

    fn select_node(&mut self, node_id: &NodeId) {
        let idx = self.snapshot.nodes().iter().position(|node| node.node_id() == node_id);
        if idx.is_some() {
            self.nodes_state.select(idx);
        }
    }

    fn select_edge(&mut self, edge_id: &EdgeId) {
        let idx = self.snapshot.edges().iter().position(|edge| edge.edge_id() == edge_id);
        if idx.is_some() {
            self.edges_state.select(idx);
        }
    }

    fn begin_rename(&mut self) {
        let mode = match self.focus {
            Pane::Nodes => self.selected_node().map(|node| Mode::Rename {
                target: RenameTarget::Node(node.node_id().clone()),
                buffer: node.label().to_owned(),
            }),
            Pane::Edges => self.selected_edge().map(|edge| Mode::Rename {
                target: RenameTarget::Edge(edge.edge_id().clone()),
                buffer: edge.label().unwrap_or_default().to_owned(),
            }),
        };
        match mode {
            Some(mode) => self.mode = mode,
            None => self.set_toast("Nothing selected"),
        }
    }

    fn delete_selected(&mut self) {
        let removed = match self.focus {
            Pane::Nodes => match self.selected_node().map(|node| node.node_id().clone()) {
                Some(node_id) => self.edit(|store| store.remove_node(&node_id)),
                None => false,
            },
            Pane::Edges => match self.selected_edge().map(|edge| edge.edge_id().clone()) {
                Some(edge_id) => self.edit(|store| store.remove_edge(&edge_id)),
                None => false,
            },
        };
        if !removed {
            self.set_toast("Nothing selected");
        }
    }

    fn begin_connect(&mut self) {
        if self.focus != Pane::Nodes {
            self.set_toast("Connect starts from a node");
            return;
        }
        match self.selected_node().map(|node| node.node_id().clone()) {
            Some(source) => self.mode = Mode::Connect { source },
            None => self.set_toast("Nothing selected"),
        }
    }

    fn begin_split(&mut self) {
        if self.focus != Pane::Edges {
            self.set_toast("Split needs an edge");
            return;
        }
        match self.selected_edge().map(|edge| edge.edge_id().clone()) {
            Some(edge_id) => self.mode = Mode::Split { edge_id },
            None => self.set_toast("Nothing selected"),
        }
    }

    fn nudge_selected(&mut self, dx: f64, dy: f64) {
        if self.focus != Pane::Nodes {
            return;
        }
        let Some((node_id, position)) =
            self.selected_node().map(|node| (node.node_id().clone(), node.position()))
        else {
            return;
        };
        self.edit(|store| store.move_node(&node_id, position.offset(dx, dy)));
    }

    fn copy(&mut self, format: CopyFormat) {
        let outcome = copy_mermaid(self.clipboard.as_mut(), &self.snapshot, format);
        self.set_toast(outcome.to_string());
    }

    fn export(&mut self, format: ImageFormat) {
        match export_image(&self.renderer, &self.snapshot, format, &self.export_dir) {
            Ok(path) => self.set_toast(format!("Exported {}", path.display())),
            Err(err) => {
                warn!(error = %err, ?format, "tui export failed");
                self.set_toast(format!("Export failed: {err}"));
            }
        }
    }

    fn clear_all(&mut self) {
        self.edit(DiagramStore::clear);
        self.mode = Mode::Normal;
    }

    fn set_toast(&mut self, message: impl Into<String>) {
        self.toast = Some(Toast {
            message: message.into(),
            expires_at: Instant::now() + TOAST_TTL,
        });
    }
}

fn clamp_selection(state: &mut ListState, len: usize) {
    match state.selected() {
        _ if len == 0 => state.select(None),
        Some(idx) if idx >= len => state.select(Some(len - 1)),
        None => state.select(Some(0)),
        Some(_) => {}
    }
}

struct TerminalSession {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self, Box<dyn Error>> {
        enable_raw_mode()?;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).map_err(|err| {
            teardown_terminal();
            err
        })?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).map_err(|err| {
            teardown_terminal();
            err
        })?;
        terminal.clear().map_err(|err| {
            teardown_terminal();
            err
        })?;

        Ok(Self { terminal })
    }

    fn draw(&mut self, draw_fn: impl FnOnce(&mut Frame<'_>)) -> io::Result<()> {
        self.terminal.draw(draw_fn)?;
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
        teardown_terminal();
    }
}

fn teardown_terminal() {
    let _ = disable_raw_mode();
    let mut stdout = io::stdout();
    let _ = execute!(stdout, LeaveAlternateScreen);
}
