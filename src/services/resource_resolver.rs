//! Resource Resolver for HubDeck.
//!
//! Maps an external resource descriptor onto the tool that shows it, and
//! opens (or focuses) the tab for it. The mapping is pure apart from storage
//! key resolution, which is delegated to a [`FileUrlResolver`].

use std::sync::Arc;

use log::{error, info, warn};

use crate::managers::tab_manager::TabManagerTrait;
use crate::services::file_resolver::FileUrlResolver;
use crate::services::resource_service::ResourceService;
use crate::types::resource::{ResourceConfig, ResourceDescriptor};
use crate::types::tab::{
    FileProps, NoteProps, OpenTabRequest, SpreadsheetProps, TabProps, TerminalProps, VideoProps,
    WebViewProps,
};

/// Title and props of the tab a resource resolves to.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTab {
    pub title: String,
    pub props: TabProps,
}

pub struct ResourceResolver {
    files: Arc<dyn FileUrlResolver>,
}

impl ResourceResolver {
    pub fn new(files: Arc<dyn FileUrlResolver>) -> Self {
        Self { files }
    }

    /// Direct storage address of a file key.
    pub fn storage_url(&self, key: &str) -> String {
        self.files.resolve_storage_key(key)
    }

    /// Resolve a resource into the tab that should show it. `None` means the
    /// resource cannot be shown and no tab must be opened.
    pub fn resolve(&self, resource: &ResourceDescriptor) -> Option<ResolvedTab> {
        let props = match &resource.config {
            ResourceConfig::WebLink(c) => TabProps::WebView(WebViewProps { url: c.url.clone() }),
            ResourceConfig::Note(c) => TabProps::NoteViewer(NoteProps {
                note_id: c.note_id.clone(),
                note_path: c.note_path.clone(),
            }),
            ResourceConfig::File(c) => {
                let props = FileProps {
                    url: self.files.resolve_storage_key(&c.storage_key),
                    original_name: c.original_name.clone(),
                };
                if c.mime_type.starts_with("image/") {
                    TabProps::ImageViewer(props)
                } else {
                    TabProps::CodeViewer(props)
                }
            }
            ResourceConfig::Pdf(c) => TabProps::PdfViewer(FileProps {
                url: self.files.resolve_storage_key(&c.storage_key),
                original_name: c.original_name.clone(),
            }),
            ResourceConfig::Spreadsheet(c) => TabProps::SpreadsheetViewer(SpreadsheetProps {
                url: self.files.resolve_storage_key(&c.storage_key),
                original_name: c.original_name.clone(),
                sheet_name: c.sheet_name.clone(),
            }),
            ResourceConfig::Audio(c) => {
                let url = match (&c.url, &c.storage_key) {
                    (Some(url), _) => url.clone(),
                    (None, Some(key)) => self.files.resolve_storage_key(key),
                    (None, None) => {
                        warn!("audio resource {} has neither url nor storage key", resource.id);
                        return None;
                    }
                };
                TabProps::AudioPlayer(FileProps {
                    url,
                    original_name: c.original_name.clone(),
                })
            }
            ResourceConfig::Video(c) => TabProps::VideoEmbed(VideoProps {
                video_id: c.video_id.clone(),
                start_time: c.start_time,
            }),
            ResourceConfig::RemoteShell(c) => TabProps::Terminal(TerminalProps {
                connection_id: c.connection_id.clone(),
                host: Some(c.host.clone()),
                port: Some(c.port),
                username: Some(c.username.clone()),
            }),
            ResourceConfig::Unrecognized { resource_type } => {
                warn!("resource {} has unknown type '{}'", resource.id, resource_type);
                return None;
            }
            ResourceConfig::Malformed {
                resource_type,
                reason,
            } => {
                warn!(
                    "resource {} of type '{}' has a malformed config: {}",
                    resource.id, resource_type, reason
                );
                return None;
            }
        };

        Some(ResolvedTab {
            title: resource.title.clone(),
            props,
        })
    }

    /// Open `resource` as a tab, or focus the tab already showing it.
    pub fn open_resource_as_tab<T: TabManagerTrait + ?Sized>(
        &self,
        tabs: &mut T,
        resource: &ResourceDescriptor,
        external_task_id: Option<&str>,
    ) -> Option<String> {
        let resolved = self.resolve(resource)?;

        let existing = match &resolved.props {
            TabProps::NoteViewer(note) => tabs
                .find_tab_by_resource_id(&resource.id)
                .or_else(|| tabs.find_note_tab(&note.note_id)),
            _ => tabs.find_tab_by_resource_id(&resource.id),
        };
        if let Some(existing) = existing {
            let id = existing.id.clone();
            // Cannot fail: the id was just read from the registry.
            let _ = tabs.set_active_tab(&id);
            return Some(id);
        }

        let request = OpenTabRequest::new(resolved.title, resolved.props)
            .with_resource(resource.id.clone())
            .with_external_task(external_task_id.map(str::to_string));
        Some(tabs.open_tab(request))
    }

    /// Open every resource of a task, in order. Resources that do not
    /// resolve are skipped; a failed fetch yields an empty list.
    pub async fn open_all_resources_for_task<T: TabManagerTrait + ?Sized>(
        &self,
        tabs: &mut T,
        service: &dyn ResourceService,
        task_id: &str,
    ) -> Vec<String> {
        let resources = match service.fetch_resources_for_grouping(task_id).await {
            Ok(resources) => resources,
            Err(e) => {
                error!("failed to fetch resources for task {}: {}", task_id, e);
                return Vec::new();
            }
        };

        let mut opened = Vec::with_capacity(resources.len());
        for resource in &resources {
            if let Some(id) = self.open_resource_as_tab(&mut *tabs, resource, Some(task_id)) {
                opened.push(id);
            }
        }

        info!(
            "opened {} of {} resources for task {}",
            opened.len(),
            resources.len(),
            task_id
        );
        opened
    }
}
