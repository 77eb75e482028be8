// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Workchart-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Workchart and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Workchart CLI entrypoint.
//!
//! By default this runs the interactive TUI and serves MCP over streamable HTTP at
//! `http://127.0.0.1:<port>/mcp`.
//!
//! Use `--mcp` to run the MCP server over stdio instead (intended for tool integrations), or
//! `--print` / `--export-svg` / `--export-png` for one-shot output.

use std::error::Error;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::Router;
use rmcp::transport::{
    streamable_http_server::session::local::LocalSessionManager, StreamableHttpServerConfig,
    StreamableHttpService,
};
use tokio::sync::Mutex;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use workchart::editor::DiagramStore;
use workchart::export::{export_image, ImageFormat, SceneRenderer};
use workchart::format::mermaid::{export_flowchart_with, fenced, MermaidOptions, NodeKeying};
use workchart::mcp::WorkchartMcp;
use workchart::store::{DurableSlot, FileSlot, MemorySlot, PersistenceBridge, WriteDurability};

const DEFAULT_MCP_HTTP_PORT: u16 = 27435;
const DEFAULT_SLOT: &str = "workchart.json";
const SLOT_ENV: &str = "WORKCHART_SLOT";
const LOG_ENV: &str = "WORKCHART_LOG";
const LOG_FILE: &str = "workchart.log";

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [<slot-file>] [--durable-writes] [--mcp-http-port <port>]\n  {program} [--slot <file>] [--durable-writes] [--mcp-http-port <port>]\n  {program} --demo [--mcp-http-port <port>]\n  {program} [<slot-file>] [--durable-writes] --mcp\n  {program} --demo --mcp\n  {program} [<slot-file>] --print [--fenced] [--by-id]\n  {program} [<slot-file>] --export-svg <dir>\n  {program} [<slot-file>] --export-png <dir>\n\nTUI mode (default) serves MCP over streamable HTTP at `http://127.0.0.1:<port>/mcp`.\n--mcp-http-port selects the port (0 = ephemeral; default {DEFAULT_MCP_HTTP_PORT}).\n\nIf slot-file/--slot is omitted, ${SLOT_ENV} is used, then ./{DEFAULT_SLOT}.\n--demo uses an in-memory slot seeded with a sample diagram and cannot be combined with slot-file/--slot.\n\n--durable-writes opts into slower, best-effort durable persistence (fsync/sync where supported).\n${LOG_ENV} sets the log filter (default `warn`); TUI logs go to {LOG_FILE} next to the slot."
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    mcp: bool,
    demo: bool,
    slot: Option<String>,
    mcp_http_port: Option<u16>,
    durable_writes: bool,
    print: bool,
    fenced: bool,
    by_id: bool,
    export_svg: Option<String>,
    export_png: Option<String>,
}

impl CliOptions {
    fn one_shot(&self) -> bool {
        self.print || self.export_svg.is_some() || self.export_png.is_some()
    }
}

fn set_flag(flag: &mut bool) -> Result<(), ()> {
    if *flag {
        return Err(());
    }
    *flag = true;
    Ok(())
}

fn set_value(value: &mut Option<String>, args: &mut impl Iterator<Item = String>) -> Result<(), ()> {
    if value.is_some() {
        return Err(());
    }
    *value = Some(args.next().ok_or(())?);
    Ok(())
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--mcp" => set_flag(&mut options.mcp)?,
            "--demo" => set_flag(&mut options.demo)?,
            "--durable-writes" => set_flag(&mut options.durable_writes)?,
            "--print" => set_flag(&mut options.print)?,
            "--fenced" => set_flag(&mut options.fenced)?,
            "--by-id" => set_flag(&mut options.by_id)?,
            "--slot" => set_value(&mut options.slot, &mut args)?,
            "--export-svg" => set_value(&mut options.export_svg, &mut args)?,
            "--export-png" => set_value(&mut options.export_png, &mut args)?,
            "--mcp-http-port" => {
                if options.mcp_http_port.is_some() {
                    return Err(());
                }
                let raw = args.next().ok_or(())?;
                let port: u16 = raw.parse().map_err(|_| ())?;
                options.mcp_http_port = Some(port);
            }
            _ if arg.starts_with('-') => return Err(()),
            _ => {
                if options.slot.is_some() {
                    return Err(());
                }
                options.slot = Some(arg);
            }
        }
    }

    if options.demo && options.slot.is_some() {
        return Err(());
    }

    if options.mcp && (options.mcp_http_port.is_some() || options.one_shot()) {
        return Err(());
    }

    if options.one_shot() && options.mcp_http_port.is_some() {
        return Err(());
    }

    if (options.fenced || options.by_id) && !options.print {
        return Err(());
    }

    Ok(options)
}

fn resolve_slot_path(options: &CliOptions) -> PathBuf {
    options
        .slot
        .clone()
        .or_else(|| std::env::var(SLOT_ENV).ok().filter(|value| !value.is_empty()))
        .unwrap_or_else(|| DEFAULT_SLOT.to_owned())
        .into()
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// TUI mode owns the terminal, so logs go to a file; every other mode logs to stderr.
fn init_logging(log_file: Option<&Path>) {
    if let Some(path) = log_file {
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => {
                let _ = tracing_subscriber::fmt()
                    .with_env_filter(env_filter())
                    .with_ansi(false)
                    .with_writer(std::sync::Mutex::new(file))
                    .try_init();
                return;
            }
            Err(err) => eprintln!("workchart: cannot open log file {}: {err}", path.display()),
        }
    }

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .try_init();
}

fn open_store<S>(slot: S, seed: Option<workchart::model::Diagram>) -> DiagramStore
where
    S: DurableSlot + Send + Sync + 'static,
{
    let bridge = PersistenceBridge::new(slot);
    let diagram = seed.unwrap_or_else(|| bridge.load());
    let mut store = DiagramStore::new(diagram);
    bridge.attach(&mut store);
    store
}

fn run_one_shot(options: &CliOptions, store: &DiagramStore) -> Result<(), Box<dyn Error>> {
    let diagram = store.diagram();

    if options.print {
        let keying = if options.by_id {
            NodeKeying::StableId
        } else {
            NodeKeying::Label
        };
        let mermaid = export_flowchart_with(diagram, MermaidOptions { keying });
        if options.fenced {
            println!("{}", fenced(&mermaid));
        } else {
            print!("{mermaid}");
        }
    }

    let renderer = SceneRenderer::new();
    for (dir, format) in [
        (options.export_svg.as_deref(), ImageFormat::Svg),
        (options.export_png.as_deref(), ImageFormat::Png),
    ] {
        if let Some(dir) = dir {
            let path = export_image(&renderer, diagram, format, Path::new(dir))?;
            eprintln!("workchart: wrote {}", path.display());
        }
    }

    Ok(())
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "workchart".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        let slot_path = resolve_slot_path(&options);
        let tui_mode = !options.mcp && !options.one_shot();
        let log_file = if tui_mode {
            let dir = match slot_path.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
                _ => PathBuf::from("."),
            };
            Some(dir.join(LOG_FILE))
        } else {
            None
        };
        init_logging(log_file.as_deref());

        let store = if options.demo {
            info!("starting with the demo diagram");
            open_store(MemorySlot::new(), Some(workchart::tui::demo_diagram()))
        } else {
            let durability = if options.durable_writes {
                WriteDurability::Durable
            } else {
                WriteDurability::BestEffort
            };
            info!(slot = %slot_path.display(), ?durability, "opening slot");
            open_store(
                FileSlot::new(slot_path.clone()).with_durability(durability),
                None,
            )
        };

        if options.one_shot() {
            return run_one_shot(&options, &store);
        }

        let store = Arc::new(Mutex::new(store));

        if options.mcp {
            let mcp = WorkchartMcp::new(store);
            let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;

            runtime.block_on(mcp.serve_stdio())?;
            return Ok(());
        }

        let mcp_http_port = options.mcp_http_port.unwrap_or(DEFAULT_MCP_HTTP_PORT);
        let export_dir = PathBuf::from(".");
        let mcp = WorkchartMcp::new(store.clone()).with_export_dir(export_dir.clone());

        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;

        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::bind(("127.0.0.1", mcp_http_port)).await?;
            info!(addr = %listener.local_addr()?, "serving MCP over streamable HTTP");

            let config = StreamableHttpServerConfig {
                stateful_mode: true,
                ..StreamableHttpServerConfig::default()
            };
            let shutdown_token = config.cancellation_token.clone();
            let server_shutdown = shutdown_token.clone();

            let session_manager = Arc::new(LocalSessionManager::default());
            let mcp_service = {
                let mcp = mcp.clone();
                StreamableHttpService::new(move || Ok(mcp.clone()), session_manager, config)
            };

            let router = Router::new().nest_service("/mcp", mcp_service);
            let server_handle = tokio::spawn(async move {
                let serve = axum::serve(listener, router).with_graceful_shutdown(async move {
                    server_shutdown.cancelled().await;
                });
                if let Err(err) = serve.await {
                    warn!(error = %err, "MCP HTTP server error");
                }
            });

            let tui_join = tokio::task::spawn_blocking(move || {
                workchart::tui::run(store, export_dir).map_err(|err| err.to_string())
            })
            .await;

            shutdown_token.cancel();
            let _ = server_handle.await;

            let tui_result = tui_join.map_err(|err| -> Box<dyn Error> { Box::new(err) })?;
            tui_result.map_err(|err| Box::new(std::io::Error::other(err)) as Box<dyn Error>)?;
            Ok::<(), Box<dyn Error>>(())
        })?;

        Ok(())
    })();

    if let Err(err) = result {
        eprintln!("workchart: {err}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_options, resolve_slot_path, CliOptions, DEFAULT_SLOT};

    fn parse(args: &[&str]) -> Result<CliOptions, ()> {
        parse_options(args.iter().map(|arg| (*arg).to_owned()))
    }

    #[test]
    fn parses_empty_args() {
        let options = parse(&[]).expect("parse options");
        assert_eq!(options, CliOptions::default());
    }

    #[test]
    fn parses_demo_flag() {
        let options = parse(&["--demo"]).expect("parse options");
        assert!(options.demo);
        assert!(!options.mcp);
        assert!(options.slot.is_none());
        assert_eq!(options.mcp_http_port, None);
    }

    #[test]
    fn parses_slot_flag_and_positional_slot() {
        let options = parse(&["--slot", "some/chart.json"]).expect("parse options");
        assert_eq!(options.slot.as_deref(), Some("some/chart.json"));

        let options = parse(&["chart.json", "--mcp"]).expect("parse options");
        assert_eq!(options.slot.as_deref(), Some("chart.json"));
        assert!(options.mcp);
    }

    #[test]
    fn parses_mcp_http_port() {
        let options = parse(&["--mcp-http-port", "1234"]).expect("parse options");
        assert_eq!(options.mcp_http_port, Some(1234));
        assert!(!options.mcp);
    }

    #[test]
    fn parses_print_with_modifiers() {
        let options = parse(&["--print", "--fenced", "--by-id"]).expect("parse options");
        assert!(options.print && options.fenced && options.by_id);
        assert!(options.one_shot());
    }

    #[test]
    fn parses_both_exports_together() {
        let options =
            parse(&["chart.json", "--export-svg", "out", "--export-png", "out"]).expect("parse");
        assert_eq!(options.export_svg.as_deref(), Some("out"));
        assert_eq!(options.export_png.as_deref(), Some("out"));
    }

    #[test]
    fn parses_demo_and_mcp_in_any_order() {
        assert!(parse(&["--demo", "--mcp"]).expect("parse options").mcp);
        assert!(parse(&["--mcp", "--demo"]).expect("parse options").demo);
    }

    #[test]
    fn rejects_mcp_http_port_with_stdio_mcp_mode() {
        parse(&["--mcp", "--mcp-http-port", "0"]).unwrap_err();
    }

    #[test]
    fn rejects_one_shot_with_a_server_mode() {
        parse(&["--mcp", "--print"]).unwrap_err();
        parse(&["--export-svg", "out", "--mcp-http-port", "0"]).unwrap_err();
    }

    #[test]
    fn rejects_print_modifiers_without_print() {
        parse(&["--fenced"]).unwrap_err();
        parse(&["--by-id", "--export-svg", "out"]).unwrap_err();
    }

    #[test]
    fn rejects_demo_with_slot() {
        parse(&["--demo", "--slot", "chart.json"]).unwrap_err();
        parse(&["chart.json", "--demo"]).unwrap_err();
    }

    #[test]
    fn rejects_unknown_args() {
        parse(&["--nope"]).unwrap_err();
    }

    #[test]
    fn rejects_duplicate_flags() {
        parse(&["--demo", "--demo"]).unwrap_err();
        parse(&["--print", "--print"]).unwrap_err();
        parse(&["--slot", "a", "--slot", "b"]).unwrap_err();
        parse(&["--export-png", "a", "--export-png", "b"]).unwrap_err();
    }

    #[test]
    fn rejects_multiple_positional_slots() {
        parse(&["one", "two"]).unwrap_err();
        parse(&["--slot", "one", "two"]).unwrap_err();
    }

    #[test]
    fn rejects_missing_values() {
        parse(&["--slot"]).unwrap_err();
        parse(&["--export-svg"]).unwrap_err();
        parse(&["--mcp-http-port", "not-a-port"]).unwrap_err();
    }

    #[test]
    fn explicit_slot_wins_over_the_default() {
        let options = parse(&["chart.json"]).expect("parse options");
        assert_eq!(resolve_slot_path(&options), std::path::PathBuf::from("chart.json"));
        if std::env::var_os(super::SLOT_ENV).is_none() {
            assert_eq!(
                resolve_slot_path(&CliOptions::default()),
                std::path::PathBuf::from(DEFAULT_SLOT)
            );
        }
    }
}
