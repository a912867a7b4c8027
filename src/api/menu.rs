//! Context menu entries for the site map view

use chrono::Local;

use crate::api::controller::{DispatchError, TransferController, TransferKind, TransferTicket};
use crate::host::{
    resolve_parent_window, ContextMenuFactory, DialogMode, FileDialog, FileFilter, HostUi,
    WindowHandle,
};
use crate::models::{InvocationContext, MenuAction, MenuItem};

pub struct SiteMapMenu {
    controller: TransferController,
    window_title_prefix: String,
}

impl SiteMapMenu {
    pub fn new(controller: TransferController, window_title_prefix: &str) -> Self {
        Self {
            controller,
            window_title_prefix: window_title_prefix.to_string(),
        }
    }

    pub fn controller(&self) -> &TransferController {
        &self.controller
    }

    fn parent_window(&self) -> Option<WindowHandle> {
        resolve_parent_window(self.controller.host().as_ref(), &self.window_title_prefix)
    }

    /// Ask for a file and start the transfer.
    ///
    /// `Ok(None)` means the user cancelled the dialog.
    pub fn handle_action(
        &self,
        action: MenuAction,
        ui: &dyn HostUi,
    ) -> Result<Option<TransferTicket>, DispatchError> {
        if self.controller.is_busy() {
            return Err(DispatchError::Busy);
        }
        let kind = TransferKind::from(action);
        let parent = self.parent_window();
        let dialog = file_dialog(kind, parent);

        let Some(path) = ui.choose_file(&dialog) else {
            tracing::debug!("Site map {} cancelled at file selection", kind);
            return Ok(None);
        };
        let path = match dialog.mode {
            DialogMode::Save => dialog.filter.with_default_extension(path),
            DialogMode::Open => path,
        };
        self.controller.start(kind, path, parent).map(Some)
    }
}

fn file_dialog(kind: TransferKind, parent: Option<WindowHandle>) -> FileDialog {
    let suggested_name = match kind {
        TransferKind::Export => Some(format!(
            "site-map-{}.json",
            Local::now().format("%Y%m%d-%H%M%S")
        )),
        TransferKind::Import => None,
    };
    FileDialog {
        mode: kind.dialog_mode(),
        filter: FileFilter::json(),
        parent,
        suggested_name,
        initial_dir: dirs::home_dir(),
    }
}

impl ContextMenuFactory for SiteMapMenu {
    fn create_menu_items(&self, invocation: InvocationContext) -> Vec<MenuItem> {
        if !invocation.is_site_map_tree() {
            return Vec::new();
        }
        let enabled = !self.controller.is_busy();
        vec![
            MenuItem::new(MenuAction::ImportSiteMap, enabled),
            MenuItem::new(MenuAction::ExportSiteMap, enabled),
        ]
    }

    fn menu_item_selected(&self, action: MenuAction, ui: &dyn HostUi) {
        if let Err(err) = self.handle_action(action, ui) {
            let kind = TransferKind::from(action);
            tracing::warn!("Site map {} not started: {}", kind, err);
            ui.show_warning(self.parent_window(), kind.failure_title(), &err.to_string());
        }
    }
}
