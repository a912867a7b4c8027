//! Extension entry point
//!
//! The host calls [`SiteMapExtension::register`] once at load time. It sets up
//! logging, builds the worker runtime and registers the context menu.

use anyhow::Context;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::runtime::{Builder, Runtime};

use crate::api::controller::{TransferController, UiEventPump};
use crate::api::menu::SiteMapMenu;
use crate::api::transfer_api::ExportOptions;
use crate::host::{ExtenderCallbacks, HostAdapter};

pub const DEFAULT_EXTENSION_NAME: &str = "Import and export Site Map";
/// Title prefix of the host's main window
pub const DEFAULT_WINDOW_TITLE_PREFIX: &str = "Burp Suite";

const PRETTY_ENV: &str = "SITEMAP_TRANSFER_PRETTY";
const LOG_DIR_ENV: &str = "SITEMAP_TRANSFER_LOG_DIR";

/// Extension configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionConfig {
    /// Name shown in the host's extension list
    pub extension_name: String,
    /// Used to find the main window when the host does not provide one
    pub window_title_prefix: String,
    /// Indent exported JSON
    pub pretty_json: bool,
    /// Log file directory for release builds
    pub log_dir: Option<PathBuf>,
}

impl Default for ExtensionConfig {
    fn default() -> Self {
        Self {
            extension_name: DEFAULT_EXTENSION_NAME.to_string(),
            window_title_prefix: DEFAULT_WINDOW_TITLE_PREFIX.to_string(),
            pretty_json: false,
            log_dir: None,
        }
    }
}

impl ExtensionConfig {
    /// Defaults overlaid with `SITEMAP_TRANSFER_PRETTY` and `SITEMAP_TRANSFER_LOG_DIR`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(pretty) = lookup(PRETTY_ENV).as_deref().and_then(parse_flag) {
            config.pretty_json = pretty;
        }
        if let Some(dir) = lookup(LOG_DIR_ENV).filter(|d| !d.trim().is_empty()) {
            config.log_dir = Some(PathBuf::from(dir));
        }
        config
    }

    fn export_options(&self) -> ExportOptions {
        ExportOptions {
            pretty: self.pretty_json,
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Initialize tracing. Safe to call more than once; later calls are no-ops.
///
/// Debug builds log to stderr. Release builds log to a daily file under
/// `log_dir` when one is given, stderr otherwise.
#[allow(unused_variables)]
pub fn init_logging(log_dir: Option<&Path>) -> Result<(), String> {
    let level = resolve_log_level();

    #[cfg(debug_assertions)]
    {
        let _ = tracing_subscriber::fmt()
            .with_max_level(level)
            .with_writer(std::io::stderr)
            .try_init();
    }

    #[cfg(not(debug_assertions))]
    {
        match log_dir {
            Some(dir) => {
                std::fs::create_dir_all(dir).map_err(|e| {
                    format!("Failed to create log directory {}: {}", dir.display(), e)
                })?;
                let file_appender = tracing_appender::rolling::daily(dir, "sitemap_transfer");
                let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
                // Logging lasts until the host exits
                std::mem::forget(guard);
                let _ = tracing_subscriber::fmt()
                    .with_max_level(level)
                    .with_writer(non_blocking)
                    .try_init();
            }
            None => {
                let _ = tracing_subscriber::fmt()
                    .with_max_level(level)
                    .with_writer(std::io::stderr)
                    .try_init();
            }
        }
    }

    Ok(())
}

fn resolve_log_level() -> tracing::level_filters::LevelFilter {
    use tracing::level_filters::LevelFilter;

    match std::env::var("RUST_LOG") {
        Ok(val) => match val.to_lowercase().as_str() {
            "trace" => LevelFilter::TRACE,
            "debug" => LevelFilter::DEBUG,
            "info" => LevelFilter::INFO,
            "warn" | "warning" => LevelFilter::WARN,
            "error" => LevelFilter::ERROR,
            _ => LevelFilter::INFO,
        },
        Err(_) => LevelFilter::INFO,
    }
}

/// A loaded extension. Keep it alive for as long as the host runs.
pub struct SiteMapExtension {
    runtime: Runtime,
    menu: Arc<SiteMapMenu>,
}

impl SiteMapExtension {
    /// Register with the host.
    ///
    /// The returned pump must be drained on the host's UI thread.
    pub fn register(
        callbacks: &dyn ExtenderCallbacks,
        host: Arc<dyn HostAdapter>,
        config: ExtensionConfig,
    ) -> anyhow::Result<(Self, UiEventPump)> {
        init_logging(config.log_dir.as_deref()).map_err(anyhow::Error::msg)?;

        let runtime = Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("sitemap-transfer")
            .enable_all()
            .build()
            .context("building transfer runtime")?;
        let (controller, pump) =
            TransferController::new(host, runtime.handle().clone(), config.export_options());
        let menu = Arc::new(SiteMapMenu::new(controller, &config.window_title_prefix));

        callbacks.set_extension_name(&config.extension_name);
        callbacks.register_context_menu_factory(menu.clone());

        tracing::info!("{} registered v{}", config.extension_name, crate::VERSION);
        Ok((Self { runtime, menu }, pump))
    }

    pub fn menu(&self) -> &Arc<SiteMapMenu> {
        &self.menu
    }

    /// Drive a future on the extension runtime from a non-async thread
    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{ContextMenuFactory, FileDialog, HostUi, InMemoryHost, WindowHandle};
    use crate::models::{HttpService, InvocationContext, MenuAction, SiteMapItem};
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use tempfile::tempdir;

    #[derive(Default)]
    struct FakeCallbacks {
        name: Mutex<Option<String>>,
        factories: Mutex<Vec<Arc<dyn ContextMenuFactory>>>,
    }

    impl ExtenderCallbacks for FakeCallbacks {
        fn set_extension_name(&self, name: &str) {
            *self.name.lock().unwrap() = Some(name.to_string());
        }

        fn register_context_menu_factory(&self, factory: Arc<dyn ContextMenuFactory>) {
            self.factories.lock().unwrap().push(factory);
        }
    }

    struct SaveTo {
        path: PathBuf,
        progress: RefCell<Vec<bool>>,
    }

    impl HostUi for SaveTo {
        fn choose_file(&self, _dialog: &FileDialog) -> Option<PathBuf> {
            Some(self.path.clone())
        }

        fn set_progress_visible(&self, _parent: Option<WindowHandle>, visible: bool) {
            self.progress.borrow_mut().push(visible);
        }

        fn show_warning(&self, _parent: Option<WindowHandle>, title: &str, message: &str) {
            panic!("unexpected warning {title}: {message}");
        }
    }

    #[test]
    fn config_defaults() {
        let config = ExtensionConfig::default();
        assert_eq!(config.extension_name, "Import and export Site Map");
        assert_eq!(config.window_title_prefix, "Burp Suite");
        assert!(!config.pretty_json);
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn config_reads_overrides() {
        let env: HashMap<&str, &str> = [
            ("SITEMAP_TRANSFER_PRETTY", "yes"),
            ("SITEMAP_TRANSFER_LOG_DIR", "/var/log/sitemap"),
        ]
        .into_iter()
        .collect();
        let config = ExtensionConfig::from_lookup(|key| env.get(key).map(|v| v.to_string()));
        assert!(config.pretty_json);
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/sitemap")));
    }

    #[test]
    fn config_ignores_unparseable_values() {
        let config = ExtensionConfig::from_lookup(|key| match key {
            "SITEMAP_TRANSFER_PRETTY" => Some("sometimes".to_string()),
            "SITEMAP_TRANSFER_LOG_DIR" => Some("  ".to_string()),
            _ => None,
        });
        assert_eq!(config, ExtensionConfig::default());
    }

    #[test]
    fn logging_init_is_idempotent() {
        assert!(init_logging(None).is_ok());
        assert!(init_logging(None).is_ok());
    }

    #[test]
    fn register_wires_menu_and_runs_export() {
        let callbacks = FakeCallbacks::default();
        let host = Arc::new(InMemoryHost::with_items(vec![
            SiteMapItem::new(HttpService::new("a.test", 443, "https")).with_comment("first"),
        ]));
        let config = ExtensionConfig {
            pretty_json: true,
            ..ExtensionConfig::default()
        };

        let (extension, mut pump) =
            SiteMapExtension::register(&callbacks, host, config).expect("registers");
        assert_eq!(
            callbacks.name.lock().unwrap().as_deref(),
            Some("Import and export Site Map")
        );
        let factory = callbacks.factories.lock().unwrap()[0].clone();
        assert_eq!(
            factory
                .create_menu_items(InvocationContext::TargetSiteMapTree)
                .len(),
            2
        );

        let dir = tempdir().unwrap();
        let ui = SaveTo {
            path: dir.path().join("out.json"),
            progress: RefCell::new(Vec::new()),
        };
        let ticket = extension
            .menu()
            .handle_action(MenuAction::ExportSiteMap, &ui)
            .unwrap()
            .unwrap();
        assert_eq!(extension.block_on(ticket.join()), Ok(1));
        assert_eq!(pump.pump(&ui), 2);
        assert_eq!(ui.progress.into_inner(), vec![true, false]);

        let written = std::fs::read_to_string(dir.path().join("out.json")).unwrap();
        assert!(written.contains('\n'));
        assert!(written.contains("\"comment\": \"first\""));
    }
}
