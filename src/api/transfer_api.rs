//! Site map export and import actions
//!
//! Both actions block on file I/O and are meant to run on a worker thread,
//! see [`crate::api::controller`].

use std::path::Path;

use crate::host::HostAdapter;
use crate::storage::{self, SiteMapError};

/// Export formatting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportOptions {
    /// Indent the JSON output
    pub pretty: bool,
}

/// Write the host's complete site map to `output_path`.
///
/// Returns the number of items written.
pub fn export_site_map(
    host: &dyn HostAdapter,
    output_path: &Path,
    options: ExportOptions,
) -> Result<usize, SiteMapError> {
    let items = host.site_map().map_err(SiteMapError::HostList)?;
    tracing::info!(
        "Exporting {} site map items to {}",
        items.len(),
        output_path.display()
    );
    storage::export_site_map_to_path(&items, output_path, options.pretty)
}

/// Replay every item in `input_path` into the host, in file order.
///
/// The file is decoded completely before the first insert, so a malformed
/// file adds nothing. An insert failure stops the import; items added
/// before it stay in the host.
pub fn import_site_map(host: &dyn HostAdapter, input_path: &Path) -> Result<usize, SiteMapError> {
    let items = storage::import_site_map_from_path(input_path)?;
    let total = items.len();
    tracing::info!(
        "Importing {} site map items from {}",
        total,
        input_path.display()
    );

    for (index, item) in items.into_iter().enumerate() {
        tracing::debug!(
            "Adding {} ({} bytes)",
            item.http_service.origin(),
            item.payload_len()
        );
        host.add_to_site_map(item)
            .map_err(|source| SiteMapError::HostAdd { index, source })?;
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::InMemoryHost;
    use crate::models::{HttpService, SiteMapItem};
    use anyhow::anyhow;
    use std::sync::Mutex;
    use tempfile::tempdir;

    /// Host that lists fine but rejects the add at `fail_at`
    struct FlakyHost {
        added: Mutex<Vec<SiteMapItem>>,
        fail_at: Option<usize>,
        list_fails: bool,
    }

    impl FlakyHost {
        fn new(fail_at: Option<usize>, list_fails: bool) -> Self {
            Self {
                added: Mutex::new(Vec::new()),
                fail_at,
                list_fails,
            }
        }
    }

    impl HostAdapter for FlakyHost {
        fn site_map(&self) -> anyhow::Result<Vec<SiteMapItem>> {
            if self.list_fails {
                return Err(anyhow!("site map unavailable"));
            }
            Ok(self.added.lock().unwrap().clone())
        }

        fn add_to_site_map(&self, item: SiteMapItem) -> anyhow::Result<()> {
            let mut added = self.added.lock().unwrap();
            if Some(added.len()) == self.fail_at {
                return Err(anyhow!("store is read-only"));
            }
            added.push(item);
            Ok(())
        }
    }

    fn sample_items() -> Vec<SiteMapItem> {
        vec![
            SiteMapItem::new(HttpService::new("a.test", 443, "https"))
                .with_request(b"GET /a HTTP/1.1\r\nHost: a.test\r\n\r\n".to_vec()),
            SiteMapItem::new(HttpService::new("b.test", 80, "http"))
                .with_request(b"POST /b HTTP/1.1\r\n\r\n\x00\x01".to_vec())
                .with_response(b"HTTP/1.1 204 No Content\r\n\r\n".to_vec()),
            SiteMapItem::new(HttpService::new("c.test", 8080, "http"))
                .with_comment("admin panel")
                .with_highlight("orange"),
        ]
    }

    #[test]
    fn export_then_import_reproduces_items() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("site-map.json");
        let source = InMemoryHost::with_items(sample_items());

        let written = export_site_map(&source, &path, ExportOptions::default()).expect("export");
        assert_eq!(written, 3);

        let target = InMemoryHost::new();
        let imported = import_site_map(&target, &path).expect("import");
        assert_eq!(imported, 3);
        assert_eq!(target.items(), sample_items());
    }

    #[test]
    fn importing_twice_accumulates_duplicates() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("site-map.json");
        export_site_map(
            &InMemoryHost::with_items(sample_items()),
            &path,
            ExportOptions { pretty: true },
        )
        .unwrap();

        let target = InMemoryHost::new();
        import_site_map(&target, &path).unwrap();
        import_site_map(&target, &path).unwrap();
        assert_eq!(target.len(), 6);
    }

    #[test]
    fn malformed_record_aborts_before_any_insert() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mixed.json");
        std::fs::write(
            &path,
            r#"[
                {"comment": "", "highlight": "", "httpService": {"host": "ok.test", "port": 443, "protocol": "https"}, "request": null, "response": null},
                {"comment": "broken", "request": null}
            ]"#,
        )
        .unwrap();

        let target = InMemoryHost::new();
        let err = import_site_map(&target, &path).unwrap_err();
        assert!(matches!(err, SiteMapError::Parse(_)));
        assert!(target.is_empty());
    }

    #[test]
    fn list_failure_is_reported_and_writes_nothing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("site-map.json");
        let host = FlakyHost::new(None, true);

        let err = export_site_map(&host, &path, ExportOptions::default()).unwrap_err();
        assert!(matches!(err, SiteMapError::HostList(_)));
        assert!(err.to_string().contains("site map unavailable"));
        assert!(!path.exists());
    }

    #[test]
    fn add_failure_stops_the_import() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("site-map.json");
        export_site_map(
            &InMemoryHost::with_items(sample_items()),
            &path,
            ExportOptions::default(),
        )
        .unwrap();

        let host = FlakyHost::new(Some(1), false);
        let err = import_site_map(&host, &path).unwrap_err();
        match err {
            SiteMapError::HostAdd { index, .. } => assert_eq!(index, 1),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(host.added.lock().unwrap().len(), 1);
    }

    #[test]
    fn missing_import_file_is_an_io_error() {
        let dir = tempdir().unwrap();
        let target = InMemoryHost::new();
        let err = import_site_map(&target, &dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, SiteMapError::Io { .. }));
        assert!(target.is_empty());
    }
}
