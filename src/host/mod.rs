//! Adapters for the host application's extension API.
//!
//! The host owns the site map, the proxy engine and the UI shell. Everything
//! this crate needs from it goes through the traits below.

mod memory;
mod ui;
mod window;

pub use memory::InMemoryHost;
pub use ui::{DialogMode, FileDialog, FileFilter, HostUi};
pub use window::{find_main_window, WindowHandle, WindowInfo};

use anyhow::Result;
use std::sync::Arc;

use crate::models::{InvocationContext, MenuAction, MenuItem, SiteMapItem};

/// Site map access exposed by the host.
///
/// Implementations must tolerate calls from worker threads.
pub trait HostAdapter: Send + Sync {
    /// Snapshot of the full site map at call time
    fn site_map(&self) -> Result<Vec<SiteMapItem>>;

    /// Insert one item. Merge and dedup behaviour is up to the host.
    fn add_to_site_map(&self, item: SiteMapItem) -> Result<()>;

    /// Main window handle, when the host hands one out directly
    fn main_window(&self) -> Option<WindowHandle> {
        None
    }

    /// Visible and hidden top-level windows, used to guess the main window
    fn top_level_windows(&self) -> Vec<WindowInfo> {
        Vec::new()
    }
}

/// Resolve a dialog parent: the host's own answer first, then the title heuristic.
pub fn resolve_parent_window(host: &dyn HostAdapter, title_prefix: &str) -> Option<WindowHandle> {
    if let Some(handle) = host.main_window() {
        return Some(handle);
    }
    let parent = find_main_window(&host.top_level_windows(), title_prefix);
    if parent.is_none() {
        tracing::debug!(
            "No unique visible window titled {:?}*; dialogs will be unparented",
            title_prefix
        );
    }
    parent
}

/// Context menu contributor registered with the host.
pub trait ContextMenuFactory: Send + Sync {
    fn create_menu_items(&self, invocation: InvocationContext) -> Vec<MenuItem>;

    /// Called on the UI thread when the user picks one of our entries
    fn menu_item_selected(&self, action: MenuAction, ui: &dyn HostUi);
}

/// Registration hooks the host calls into once at load time.
pub trait ExtenderCallbacks {
    fn set_extension_name(&self, name: &str);
    fn register_context_menu_factory(&self, factory: Arc<dyn ContextMenuFactory>);
}
