use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WebLinkConfig {
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NoteConfig {
    pub note_id: String,
    #[serde(default)]
    pub note_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StoredFileConfig {
    pub storage_key: String,
    pub original_name: String,
    pub mime_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PdfConfig {
    pub storage_key: String,
    pub original_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SpreadsheetConfig {
    pub storage_key: String,
    pub original_name: String,
    #[serde(default)]
    pub sheet_name: Option<String>,
}

/// Audio is either a direct URL or a stored file; the direct URL wins.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AudioConfig {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub storage_key: Option<String>,
    pub original_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VideoConfig {
    pub video_id: String,
    #[serde(default)]
    pub start_time: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RemoteShellConfig {
    #[serde(default)]
    pub connection_id: Option<String>,
    pub host: String,
    #[serde(default = "default_ssh_port")]
    pub port: u16,
    pub username: String,
}

fn default_ssh_port() -> u16 {
    22
}

/// Typed configuration of a resource, keyed by its `type` tag.
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceConfig {
    WebLink(WebLinkConfig),
    Note(NoteConfig),
    File(StoredFileConfig),
    Pdf(PdfConfig),
    Spreadsheet(SpreadsheetConfig),
    Audio(AudioConfig),
    Video(VideoConfig),
    RemoteShell(RemoteShellConfig),
    /// The `type` tag is not one this workspace knows how to open.
    Unrecognized { resource_type: String },
    /// The `type` tag is known but `config` does not fit its shape.
    Malformed { resource_type: String, reason: String },
}

impl ResourceConfig {
    pub const WEB_LINK: &'static str = "weblink";
    pub const NOTE: &'static str = "note";
    pub const FILE: &'static str = "file";
    pub const PDF: &'static str = "pdf";
    pub const SPREADSHEET: &'static str = "spreadsheet";
    pub const AUDIO: &'static str = "audio";
    pub const VIDEO: &'static str = "video";
    pub const REMOTE_SHELL: &'static str = "ssh";

    /// Parses a raw `type` + `config` pair. Never fails: unknown tags and
    /// shape mismatches land in the two fallback variants.
    pub fn parse(resource_type: &str, config: Value) -> Self {
        fn typed<T: DeserializeOwned>(
            resource_type: &str,
            config: Value,
            wrap: fn(T) -> ResourceConfig,
        ) -> ResourceConfig {
            match serde_json::from_value(config) {
                Ok(cfg) => wrap(cfg),
                Err(e) => ResourceConfig::Malformed {
                    resource_type: resource_type.to_string(),
                    reason: e.to_string(),
                },
            }
        }

        match resource_type {
            Self::WEB_LINK => typed(resource_type, config, ResourceConfig::WebLink),
            Self::NOTE => typed(resource_type, config, ResourceConfig::Note),
            Self::FILE => typed(resource_type, config, ResourceConfig::File),
            Self::PDF => typed(resource_type, config, ResourceConfig::Pdf),
            Self::SPREADSHEET => typed(resource_type, config, ResourceConfig::Spreadsheet),
            Self::AUDIO => typed(resource_type, config, ResourceConfig::Audio),
            Self::VIDEO => typed(resource_type, config, ResourceConfig::Video),
            Self::REMOTE_SHELL => typed(resource_type, config, ResourceConfig::RemoteShell),
            other => ResourceConfig::Unrecognized {
                resource_type: other.to_string(),
            },
        }
    }

    pub fn type_name(&self) -> &str {
        match self {
            ResourceConfig::WebLink(_) => Self::WEB_LINK,
            ResourceConfig::Note(_) => Self::NOTE,
            ResourceConfig::File(_) => Self::FILE,
            ResourceConfig::Pdf(_) => Self::PDF,
            ResourceConfig::Spreadsheet(_) => Self::SPREADSHEET,
            ResourceConfig::Audio(_) => Self::AUDIO,
            ResourceConfig::Video(_) => Self::VIDEO,
            ResourceConfig::RemoteShell(_) => Self::REMOTE_SHELL,
            ResourceConfig::Unrecognized { resource_type }
            | ResourceConfig::Malformed { resource_type, .. } => resource_type,
        }
    }

    fn to_json(&self) -> Value {
        let value = match self {
            ResourceConfig::WebLink(c) => serde_json::to_value(c),
            ResourceConfig::Note(c) => serde_json::to_value(c),
            ResourceConfig::File(c) => serde_json::to_value(c),
            ResourceConfig::Pdf(c) => serde_json::to_value(c),
            ResourceConfig::Spreadsheet(c) => serde_json::to_value(c),
            ResourceConfig::Audio(c) => serde_json::to_value(c),
            ResourceConfig::Video(c) => serde_json::to_value(c),
            ResourceConfig::RemoteShell(c) => serde_json::to_value(c),
            ResourceConfig::Unrecognized { .. } | ResourceConfig::Malformed { .. } => {
                Ok(Value::Null)
            }
        };
        value.unwrap_or(Value::Null)
    }
}

/// Something external that can be opened as a tab.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawResource", into = "RawResource")]
pub struct ResourceDescriptor {
    pub id: String,
    pub title: String,
    pub config: ResourceConfig,
}

impl ResourceDescriptor {
    pub fn new(id: impl Into<String>, title: impl Into<String>, config: ResourceConfig) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            config,
        }
    }
}

/// Wire shape of a resource: `{id, type, title, config}`. A missing `type`
/// parses as unrecognized and a missing or null `title` as empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawResource {
    id: String,
    #[serde(rename = "type", default)]
    resource_type: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    config: Value,
}

impl From<RawResource> for ResourceDescriptor {
    fn from(raw: RawResource) -> Self {
        Self {
            config: ResourceConfig::parse(&raw.resource_type, raw.config),
            id: raw.id,
            title: raw.title.unwrap_or_default(),
        }
    }
}

impl From<ResourceDescriptor> for RawResource {
    fn from(resource: ResourceDescriptor) -> Self {
        Self {
            resource_type: resource.config.type_name().to_string(),
            config: resource.config.to_json(),
            id: resource.id,
            title: Some(resource.title),
        }
    }
}
