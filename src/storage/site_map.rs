use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;
use thiserror::Error;

use crate::models::{HttpService, SiteMapItem};

#[derive(Debug, Error)]
pub enum SiteMapError {
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },
    #[error("invalid site map file: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("failed to read the host site map: {0:#}")]
    HostList(#[source] anyhow::Error),
    #[error("host rejected site map item {index}, earlier items stay imported: {source:#}")]
    HostAdd {
        index: usize,
        #[source]
        source: anyhow::Error,
    },
}

impl SiteMapError {
    fn io(context: impl Into<String>, source: io::Error) -> Self {
        SiteMapError::Io {
            context: context.into(),
            source,
        }
    }

    fn from_json(context: &str, err: serde_json::Error) -> Self {
        if err.is_io() {
            SiteMapError::io(context, io::Error::from(err))
        } else {
            SiteMapError::Parse(err)
        }
    }
}

#[derive(Serialize)]
struct SiteMapRecord<'a> {
    comment: &'a str,
    highlight: &'a str,
    #[serde(rename = "httpService")]
    http_service: RecordService<'a>,
    #[serde(serialize_with = "serialize_bytes")]
    request: Option<&'a [u8]>,
    #[serde(serialize_with = "serialize_bytes")]
    response: Option<&'a [u8]>,
}

#[derive(Serialize)]
struct RecordService<'a> {
    host: &'a str,
    port: u16,
    protocol: &'a str,
}

impl<'a> From<&'a SiteMapItem> for SiteMapRecord<'a> {
    fn from(item: &'a SiteMapItem) -> Self {
        Self {
            comment: &item.comment,
            highlight: &item.highlight,
            http_service: RecordService {
                host: &item.http_service.host,
                port: item.http_service.port,
                protocol: &item.http_service.protocol,
            },
            request: item.request.as_deref(),
            response: item.response.as_deref(),
        }
    }
}

fn serialize_bytes<S: Serializer>(bytes: &Option<&[u8]>, serializer: S) -> Result<S::Ok, S::Error> {
    match bytes {
        Some(bytes) => serializer.serialize_str(&general_purpose::STANDARD.encode(bytes)),
        None => serializer.serialize_none(),
    }
}

#[derive(Deserialize)]
struct RawSiteMapRecord {
    #[serde(default, deserialize_with = "string_or_null")]
    comment: String,
    #[serde(default, deserialize_with = "string_or_null")]
    highlight: String,
    #[serde(rename = "httpService")]
    http_service: RawHttpService,
    #[serde(default, deserialize_with = "deserialize_bytes")]
    request: Option<Vec<u8>>,
    #[serde(default, deserialize_with = "deserialize_bytes")]
    response: Option<Vec<u8>>,
}

#[derive(Deserialize)]
struct RawHttpService {
    host: String,
    port: u16,
    protocol: String,
}

impl From<RawSiteMapRecord> for SiteMapItem {
    fn from(raw: RawSiteMapRecord) -> Self {
        Self {
            http_service: HttpService {
                host: raw.http_service.host,
                port: raw.http_service.port,
                protocol: raw.http_service.protocol,
            },
            request: raw.request,
            response: raw.response,
            comment: raw.comment,
            highlight: raw.highlight,
        }
    }
}

fn string_or_null<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn deserialize_bytes<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Vec<u8>>, D::Error> {
    Option::<String>::deserialize(deserializer)?
        .map(|text| {
            general_purpose::STANDARD
                .decode(text.as_bytes())
                .map_err(|err| serde::de::Error::custom(format!("invalid base64 payload: {err}")))
        })
        .transpose()
}

/// Serialize items as a JSON array into `writer`.
pub fn write_site_map<W: Write>(
    writer: W,
    items: &[SiteMapItem],
    pretty: bool,
) -> Result<(), SiteMapError> {
    let records: Vec<SiteMapRecord<'_>> = items.iter().map(SiteMapRecord::from).collect();
    let mut writer = BufWriter::new(writer);
    let result = if pretty {
        serde_json::to_writer_pretty(&mut writer, &records)
    } else {
        serde_json::to_writer(&mut writer, &records)
    };
    result.map_err(|err| SiteMapError::from_json("writing site map", err))?;
    writer
        .flush()
        .map_err(|err| SiteMapError::io("writing site map", err))
}

pub fn site_map_to_json(items: &[SiteMapItem], pretty: bool) -> Result<String, SiteMapError> {
    let records: Vec<SiteMapRecord<'_>> = items.iter().map(SiteMapRecord::from).collect();
    let result = if pretty {
        serde_json::to_string_pretty(&records)
    } else {
        serde_json::to_string(&records)
    };
    result.map_err(SiteMapError::Parse)
}

/// Write the site map to `output_path`, replacing any existing file.
///
/// A failure part way through leaves whatever was written in place.
pub fn export_site_map_to_path(
    items: &[SiteMapItem],
    output_path: impl AsRef<Path>,
    pretty: bool,
) -> Result<usize, SiteMapError> {
    let path = output_path.as_ref();
    let file = File::create(path)
        .map_err(|err| SiteMapError::io(format!("creating {}", path.display()), err))?;
    write_site_map(file, items, pretty)?;
    Ok(items.len())
}

/// Parse a JSON array of site map records from `reader`.
pub fn read_site_map<R: Read>(reader: R) -> Result<Vec<SiteMapItem>, SiteMapError> {
    let raw: Vec<RawSiteMapRecord> = serde_json::from_reader(BufReader::new(reader))
        .map_err(|err| SiteMapError::from_json("reading site map", err))?;
    Ok(raw.into_iter().map(SiteMapItem::from).collect())
}

pub fn import_site_map_from_str(contents: &str) -> Result<Vec<SiteMapItem>, SiteMapError> {
    let raw: Vec<RawSiteMapRecord> =
        serde_json::from_str(contents).map_err(SiteMapError::Parse)?;
    Ok(raw.into_iter().map(SiteMapItem::from).collect())
}

pub fn import_site_map_from_path(
    path: impl AsRef<Path>,
) -> Result<Vec<SiteMapItem>, SiteMapError> {
    let path = path.as_ref();
    let file = File::open(path)
        .map_err(|err| SiteMapError::io(format!("opening {}", path.display()), err))?;
    read_site_map(file)
}
