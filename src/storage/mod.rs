//! Site map persistence
//!
//! The on-disk format is a JSON array with one object per captured
//! transaction. Raw request/response bytes are carried as base64 strings.

mod site_map;

pub use site_map::{
    export_site_map_to_path, import_site_map_from_path, import_site_map_from_str, read_site_map,
    site_map_to_json, write_site_map, SiteMapError,
};
