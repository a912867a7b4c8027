use std::path::{Path, PathBuf};

use super::WindowHandle;

/// UI services of the host shell. Only ever called from the UI thread.
pub trait HostUi {
    /// Show a native file dialog; `None` when the user cancels
    fn choose_file(&self, dialog: &FileDialog) -> Option<PathBuf>;

    /// Show or hide the modal progress indicator
    fn set_progress_visible(&self, parent: Option<WindowHandle>, visible: bool);

    fn show_warning(&self, parent: Option<WindowHandle>, title: &str, message: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogMode {
    Open,
    Save,
}

/// Extension filter shown in a file dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFilter {
    pub description: String,
    /// Extensions without the leading dot
    pub extensions: Vec<String>,
}

impl FileFilter {
    pub fn json() -> Self {
        Self {
            description: "JSON files".to_string(),
            extensions: vec!["json".to_string()],
        }
    }

    pub fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                self.extensions
                    .iter()
                    .any(|allowed| allowed.eq_ignore_ascii_case(ext))
            })
            .unwrap_or(false)
    }

    /// Append the first extension when `path` has none at all
    pub fn with_default_extension(&self, path: PathBuf) -> PathBuf {
        match (path.extension(), self.extensions.first()) {
            (None, Some(ext)) => path.with_extension(ext),
            _ => path,
        }
    }
}

/// Everything the host needs to show a file dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDialog {
    pub mode: DialogMode,
    pub filter: FileFilter,
    pub parent: Option<WindowHandle>,
    pub suggested_name: Option<String>,
    pub initial_dir: Option<PathBuf>,
}
