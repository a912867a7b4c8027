//! Background transfer dispatch
//!
//! The UI thread starts a transfer and returns immediately. The work runs on a
//! blocking worker of the extension's tokio runtime and reports back through
//! an unbounded channel that the UI thread drains with [`UiEventPump`].

use std::fmt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::api::transfer_api::{export_site_map, import_site_map, ExportOptions};
use crate::host::{DialogMode, HostAdapter, HostUi, WindowHandle};
use crate::models::MenuAction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferKind {
    Export,
    Import,
}

impl TransferKind {
    /// Title of the warning shown when the transfer fails
    pub fn failure_title(&self) -> &'static str {
        match self {
            TransferKind::Export => "Export Failed",
            TransferKind::Import => "Import Failed",
        }
    }

    pub fn dialog_mode(&self) -> DialogMode {
        match self {
            TransferKind::Export => DialogMode::Save,
            TransferKind::Import => DialogMode::Open,
        }
    }
}

impl fmt::Display for TransferKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferKind::Export => f.write_str("export"),
            TransferKind::Import => f.write_str("import"),
        }
    }
}

impl From<MenuAction> for TransferKind {
    fn from(action: MenuAction) -> Self {
        match action {
            MenuAction::ExportSiteMap => TransferKind::Export,
            MenuAction::ImportSiteMap => TransferKind::Import,
        }
    }
}

/// Progress notifications for the UI thread
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    Started {
        id: Uuid,
        kind: TransferKind,
        parent: Option<WindowHandle>,
    },
    Finished {
        id: Uuid,
        kind: TransferKind,
        parent: Option<WindowHandle>,
        /// Item count, or the error text to show the user
        result: Result<usize, String>,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error("another site map transfer is still running")]
    Busy,
}

/// Handle to a running transfer
pub struct TransferTicket {
    pub id: Uuid,
    pub kind: TransferKind,
    handle: JoinHandle<Result<usize, String>>,
}

impl TransferTicket {
    /// Wait for the worker to finish
    pub async fn join(self) -> Result<usize, String> {
        self.handle
            .await
            .map_err(|e| format!("transfer worker failed: {e}"))?
    }
}

/// Starts transfers against one host, at most one at a time.
pub struct TransferController {
    host: Arc<dyn HostAdapter>,
    runtime: Handle,
    events: mpsc::UnboundedSender<UiEvent>,
    busy: Arc<AtomicBool>,
    export_options: ExportOptions,
}

impl TransferController {
    pub fn new(
        host: Arc<dyn HostAdapter>,
        runtime: Handle,
        export_options: ExportOptions,
    ) -> (Self, UiEventPump) {
        let (tx, rx) = mpsc::unbounded_channel();
        let controller = Self {
            host,
            runtime,
            events: tx,
            busy: Arc::new(AtomicBool::new(false)),
            export_options,
        };
        (controller, UiEventPump { events: rx })
    }

    pub fn host(&self) -> &Arc<dyn HostAdapter> {
        &self.host
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Launch a transfer on a worker thread.
    ///
    /// Emits `UiEvent::Started` before returning and `UiEvent::Finished` once
    /// the worker is done.
    pub fn start(
        &self,
        kind: TransferKind,
        path: PathBuf,
        parent: Option<WindowHandle>,
    ) -> Result<TransferTicket, DispatchError> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            tracing::warn!("Rejected site map {}: a transfer is already running", kind);
            return Err(DispatchError::Busy);
        }

        let id = Uuid::new_v4();
        tracing::info!("Starting site map {} {} ({})", kind, id, path.display());
        let _ = self.events.send(UiEvent::Started { id, kind, parent });

        let mut completion = Completion {
            busy: Arc::clone(&self.busy),
            events: self.events.clone(),
            id,
            kind,
            parent,
            result: None,
        };
        let host = Arc::clone(&self.host);
        let options = self.export_options;
        let handle = self.runtime.spawn_blocking(move || {
            let result = match kind {
                TransferKind::Export => export_site_map(host.as_ref(), &path, options),
                TransferKind::Import => import_site_map(host.as_ref(), &path),
            };
            let result = match result {
                Ok(count) => {
                    tracing::info!("Site map {} {} finished: {} items", kind, id, count);
                    Ok(count)
                }
                Err(err) => {
                    tracing::error!("Site map {} {} failed: {}", kind, id, err);
                    Err(err.to_string())
                }
            };
            completion.result = Some(result.clone());
            result
        });

        Ok(TransferTicket { id, kind, handle })
    }
}

/// Releases the busy flag and reports the outcome, even if the worker panics.
struct Completion {
    busy: Arc<AtomicBool>,
    events: mpsc::UnboundedSender<UiEvent>,
    id: Uuid,
    kind: TransferKind,
    parent: Option<WindowHandle>,
    result: Option<Result<usize, String>>,
}

impl Drop for Completion {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::SeqCst);
        let result = self
            .result
            .take()
            .unwrap_or_else(|| Err("site map transfer aborted unexpectedly".to_string()));
        let _ = self.events.send(UiEvent::Finished {
            id: self.id,
            kind: self.kind,
            parent: self.parent,
            result,
        });
    }
}

/// UI-thread end of the progress channel
pub struct UiEventPump {
    events: mpsc::UnboundedReceiver<UiEvent>,
}

impl UiEventPump {
    /// Next queued event without blocking
    pub fn try_next(&mut self) -> Option<UiEvent> {
        self.events.try_recv().ok()
    }

    pub async fn next(&mut self) -> Option<UiEvent> {
        self.events.recv().await
    }

    /// Apply every queued event to the host UI. Returns how many were handled.
    pub fn pump(&mut self, ui: &dyn HostUi) -> usize {
        let mut handled = 0;
        while let Some(event) = self.try_next() {
            apply_ui_event(ui, &event);
            handled += 1;
        }
        handled
    }
}

pub fn apply_ui_event(ui: &dyn HostUi, event: &UiEvent) {
    match event {
        UiEvent::Started { parent, .. } => ui.set_progress_visible(*parent, true),
        UiEvent::Finished {
            kind,
            parent,
            result,
            ..
        } => {
            ui.set_progress_visible(*parent, false);
            if let Err(message) = result {
                ui.show_warning(*parent, kind.failure_title(), message);
            }
        }
    }
}
