use serde::{Deserialize, Serialize};

/// Where the user opened a context menu, as reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvocationContext {
    MessageEditorRequest,
    MessageEditorResponse,
    MessageViewerRequest,
    MessageViewerResponse,
    TargetSiteMapTree,
    TargetSiteMapTable,
    ProxyHistory,
    ScannerResults,
    IntruderPayloadPositions,
    IntruderAttackResults,
    SearchResults,
}

impl InvocationContext {
    /// Whether the menu was opened on the site map tree
    pub fn is_site_map_tree(&self) -> bool {
        matches!(self, InvocationContext::TargetSiteMapTree)
    }
}

/// Actions contributed to the context menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MenuAction {
    ImportSiteMap,
    ExportSiteMap,
}

impl MenuAction {
    pub fn label(&self) -> &'static str {
        match self {
            MenuAction::ImportSiteMap => "Import Site Map",
            MenuAction::ExportSiteMap => "Export Site Map",
        }
    }
}

/// A menu entry handed to the host for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub label: String,
    pub action: MenuAction,
    /// False while a transfer is running
    pub enabled: bool,
}

impl MenuItem {
    pub fn new(action: MenuAction, enabled: bool) -> Self {
        Self {
            label: action.label().to_string(),
            action,
            enabled,
        }
    }
}
