/// Opaque native window reference supplied by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowHandle(pub u64);

/// A top-level window as reported by the host's windowing layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowInfo {
    pub handle: WindowHandle,
    pub title: String,
    pub visible: bool,
}

impl WindowInfo {
    pub fn new(handle: u64, title: &str, visible: bool) -> Self {
        Self {
            handle: WindowHandle(handle),
            title: title.to_string(),
            visible,
        }
    }
}

/// Pick the host's main window by title prefix.
///
/// Best effort: only a single visible match counts. No match, or several,
/// yields `None` and dialogs open without a parent.
pub fn find_main_window(windows: &[WindowInfo], title_prefix: &str) -> Option<WindowHandle> {
    let mut matches = windows
        .iter()
        .filter(|window| window.visible && window.title.starts_with(title_prefix));
    match (matches.next(), matches.next()) {
        (Some(window), None) => Some(window.handle),
        _ => None,
    }
}
