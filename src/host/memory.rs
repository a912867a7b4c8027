//! In-memory site map
//!
//! A self-contained `HostAdapter` for embedding without a real host and for
//! exercising the transfer actions in tests.

use anyhow::anyhow;
use std::sync::RwLock;

use super::{HostAdapter, WindowHandle, WindowInfo};
use crate::models::SiteMapItem;

#[derive(Default)]
pub struct InMemoryHost {
    items: RwLock<Vec<SiteMapItem>>,
    windows: Vec<WindowInfo>,
    main_window: Option<WindowHandle>,
}

impl InMemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(items: Vec<SiteMapItem>) -> Self {
        Self {
            items: RwLock::new(items),
            ..Self::default()
        }
    }

    pub fn with_windows(mut self, windows: Vec<WindowInfo>) -> Self {
        self.windows = windows;
        self
    }

    pub fn with_main_window(mut self, handle: WindowHandle) -> Self {
        self.main_window = Some(handle);
        self
    }

    /// Copy of the current contents, in insertion order
    pub fn items(&self) -> Vec<SiteMapItem> {
        self.items.read().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.items.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) -> usize {
        let mut items = self.items.write().unwrap();
        let removed = items.len();
        items.clear();
        removed
    }
}

impl HostAdapter for InMemoryHost {
    fn site_map(&self) -> anyhow::Result<Vec<SiteMapItem>> {
        let items = self
            .items
            .read()
            .map_err(|e| anyhow!("lock poisoned: {}", e))?;
        Ok(items.clone())
    }

    fn add_to_site_map(&self, item: SiteMapItem) -> anyhow::Result<()> {
        let mut items = self
            .items
            .write()
            .map_err(|e| anyhow!("lock poisoned: {}", e))?;
        items.push(item);
        Ok(())
    }

    fn main_window(&self) -> Option<WindowHandle> {
        self.main_window
    }

    fn top_level_windows(&self) -> Vec<WindowInfo> {
        self.windows.clone()
    }
}
