use serde::{Deserialize, Serialize};

/// Closed set of tool kinds a tab can host.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum AppType {
    Terminal,
    SnippetStore,
    Search,
    WebView,
    CodeViewer,
    ImageViewer,
    PdfViewer,
    SpreadsheetViewer,
    AudioPlayer,
    VideoEmbed,
    NoteViewer,
    LogViewer,
    AiChat,
}

impl AppType {
    pub const ALL: [AppType; 13] = [
        AppType::Terminal,
        AppType::SnippetStore,
        AppType::Search,
        AppType::WebView,
        AppType::CodeViewer,
        AppType::ImageViewer,
        AppType::PdfViewer,
        AppType::SpreadsheetViewer,
        AppType::AudioPlayer,
        AppType::VideoEmbed,
        AppType::NoteViewer,
        AppType::LogViewer,
        AppType::AiChat,
    ];

    /// Human-readable name used as the default tab title.
    pub fn display_name(self) -> &'static str {
        match self {
            AppType::Terminal => "Terminal",
            AppType::SnippetStore => "Snippets",
            AppType::Search => "Search",
            AppType::WebView => "Web",
            AppType::CodeViewer => "Code",
            AppType::ImageViewer => "Image",
            AppType::PdfViewer => "PDF",
            AppType::SpreadsheetViewer => "Spreadsheet",
            AppType::AudioPlayer => "Audio",
            AppType::VideoEmbed => "Video",
            AppType::NoteViewer => "Note",
            AppType::LogViewer => "Logs",
            AppType::AiChat => "AI Chat",
        }
    }

    /// Whether the tool is a remote service rendered in an embedded frame.
    pub fn is_embedded(self) -> bool {
        matches!(
            self,
            AppType::Terminal
                | AppType::SnippetStore
                | AppType::Search
                | AppType::WebView
                | AppType::LogViewer
        )
    }
}

/// Terminal session target. All fields empty means a local shell.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TerminalProps {
    #[serde(default)]
    pub connection_id: Option<String>,
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SnippetStoreProps {
    #[serde(default)]
    pub snippet_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SearchProps {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct WebViewProps {
    #[serde(default)]
    pub url: String,
}

/// A stored file rendered by one of the local viewers.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FileProps {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub original_name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SpreadsheetProps {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub original_name: String,
    #[serde(default)]
    pub sheet_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct VideoProps {
    #[serde(default)]
    pub video_id: String,
    /// Playback offset in seconds.
    #[serde(default)]
    pub start_time: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NoteProps {
    #[serde(default)]
    pub note_id: String,
    #[serde(default)]
    pub note_path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LogViewerProps {
    #[serde(default)]
    pub source: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AiChatProps {
    #[serde(default)]
    pub conversation_id: Option<String>,
}

/// Tool-specific configuration of a tab.
///
/// The variant *is* the tab's [`AppType`], so a tab can never carry props
/// shaped for a different tool.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "app_type", content = "props", rename_all = "kebab-case")]
pub enum TabProps {
    Terminal(TerminalProps),
    SnippetStore(SnippetStoreProps),
    Search(SearchProps),
    WebView(WebViewProps),
    CodeViewer(FileProps),
    ImageViewer(FileProps),
    PdfViewer(FileProps),
    SpreadsheetViewer(SpreadsheetProps),
    AudioPlayer(FileProps),
    VideoEmbed(VideoProps),
    NoteViewer(NoteProps),
    LogViewer(LogViewerProps),
    AiChat(AiChatProps),
}

impl TabProps {
    pub fn app_type(&self) -> AppType {
        match self {
            TabProps::Terminal(_) => AppType::Terminal,
            TabProps::SnippetStore(_) => AppType::SnippetStore,
            TabProps::Search(_) => AppType::Search,
            TabProps::WebView(_) => AppType::WebView,
            TabProps::CodeViewer(_) => AppType::CodeViewer,
            TabProps::ImageViewer(_) => AppType::ImageViewer,
            TabProps::PdfViewer(_) => AppType::PdfViewer,
            TabProps::SpreadsheetViewer(_) => AppType::SpreadsheetViewer,
            TabProps::AudioPlayer(_) => AppType::AudioPlayer,
            TabProps::VideoEmbed(_) => AppType::VideoEmbed,
            TabProps::NoteViewer(_) => AppType::NoteViewer,
            TabProps::LogViewer(_) => AppType::LogViewer,
            TabProps::AiChat(_) => AppType::AiChat,
        }
    }

    /// Default props for a freshly launched tool.
    pub fn empty(app_type: AppType) -> Self {
        match app_type {
            AppType::Terminal => TabProps::Terminal(TerminalProps::default()),
            AppType::SnippetStore => TabProps::SnippetStore(SnippetStoreProps::default()),
            AppType::Search => TabProps::Search(SearchProps::default()),
            AppType::WebView => TabProps::WebView(WebViewProps::default()),
            AppType::CodeViewer => TabProps::CodeViewer(FileProps::default()),
            AppType::ImageViewer => TabProps::ImageViewer(FileProps::default()),
            AppType::PdfViewer => TabProps::PdfViewer(FileProps::default()),
            AppType::SpreadsheetViewer => {
                TabProps::SpreadsheetViewer(SpreadsheetProps::default())
            }
            AppType::AudioPlayer => TabProps::AudioPlayer(FileProps::default()),
            AppType::VideoEmbed => TabProps::VideoEmbed(VideoProps::default()),
            AppType::NoteViewer => TabProps::NoteViewer(NoteProps::default()),
            AppType::LogViewer => TabProps::LogViewer(LogViewerProps::default()),
            AppType::AiChat => TabProps::AiChat(AiChatProps::default()),
        }
    }

    /// Builds props for `app_type` from a JSON object of camelCase fields.
    pub fn from_json(app_type: AppType, props: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(serde_json::json!({ "app_type": app_type, "props": props }))
    }
}

/// One open tool instance in the workspace.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Tab {
    pub id: String,
    pub title: String,
    #[serde(flatten)]
    pub props: TabProps,
    pub resource_id: Option<String>,
    pub external_task_id: Option<String>,
    pub created_at: i64,
}

impl Tab {
    pub fn app_type(&self) -> AppType {
        self.props.app_type()
    }
}

/// Request to open a tab.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenTabRequest {
    pub title: String,
    pub props: TabProps,
    pub resource_id: Option<String>,
    pub external_task_id: Option<String>,
}

impl OpenTabRequest {
    pub fn new(title: impl Into<String>, props: TabProps) -> Self {
        Self {
            title: title.into(),
            props,
            resource_id: None,
            external_task_id: None,
        }
    }

    /// Request for a tool launched without any configuration.
    pub fn launch(app_type: AppType) -> Self {
        Self::new(app_type.display_name(), TabProps::empty(app_type))
    }

    pub fn with_resource(mut self, resource_id: impl Into<String>) -> Self {
        self.resource_id = Some(resource_id.into());
        self
    }

    pub fn with_external_task(mut self, task_id: Option<String>) -> Self {
        self.external_task_id = task_id;
        self
    }
}
