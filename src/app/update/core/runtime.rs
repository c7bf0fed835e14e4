use super::super::super::messages::Message;
use super::super::Effect;
use crate::cache::{AnnotationCache, PageStore};
use crate::model::PageNumber;
use crate::prefetch::PrefetchScheduler;
use crate::service::DocumentService;
use crate::settings::{KeyValueStore, save_selected_narrators};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Executes effects produced by the reducer.
///
/// Network work is spawned; every task reports back through the outbox as a
/// `Message`, so state only ever changes inside the session loop.
pub struct EffectRunner {
    service: Arc<dyn DocumentService>,
    pages: Arc<PageStore>,
    annotations: Arc<AnnotationCache>,
    prefetch: PrefetchScheduler,
    settings: Arc<dyn KeyValueStore>,
    outbox: mpsc::UnboundedSender<Message>,
}

impl EffectRunner {
    pub fn new(
        service: Arc<dyn DocumentService>,
        pages: Arc<PageStore>,
        annotations: Arc<AnnotationCache>,
        prefetch_radius: u32,
        settings: Arc<dyn KeyValueStore>,
        outbox: mpsc::UnboundedSender<Message>,
    ) -> Self {
        Self {
            prefetch: PrefetchScheduler::new(Arc::clone(&pages), prefetch_radius),
            service,
            pages,
            annotations,
            settings,
            outbox,
        }
    }

    /// Must be called from within a tokio runtime.
    pub fn run(&self, effect: Effect) {
        match effect {
            Effect::LoadPage(page) => {
                let fetch = self.pages.fetch_if_absent(page);
                self.reply(async move {
                    Message::PageLoaded {
                        page,
                        result: fetch.await,
                    }
                });
            }
            Effect::LoadNeighbour(page) => {
                let fetch = self.pages.fetch_if_absent(page);
                self.reply(async move {
                    Message::NeighbourLoaded {
                        page,
                        result: fetch.await.map(|_| ()),
                    }
                });
            }
            Effect::Prefetch(focus) => {
                self.prefetch.schedule(focus);
            }
            Effect::RefreshAnnotations { page, word_ids } => {
                let annotations = Arc::clone(&self.annotations);
                self.reply(async move {
                    Message::AnnotationsRefreshed {
                        page,
                        result: annotations.refresh(page, word_ids).await,
                    }
                });
            }
            Effect::LoadNarrators => {
                let service = Arc::clone(&self.service);
                self.reply(async move {
                    Message::NarratorsLoaded(service.fetch_narrators().await)
                });
            }
            Effect::PersistNarrators(selected) => {
                if let Err(err) = save_selected_narrators(self.settings.as_ref(), &selected) {
                    warn!("Failed to persist narrator selection: {err:#}");
                }
            }
            Effect::SaveAnnotation { page, variation } => {
                let service = Arc::clone(&self.service);
                self.reply(async move {
                    Message::AnnotationMutated {
                        page,
                        result: service.create_variation(&variation).await,
                    }
                });
            }
            Effect::DeleteAnnotation { page, key } => {
                let service = Arc::clone(&self.service);
                self.reply(async move {
                    Message::AnnotationMutated {
                        page,
                        result: service.delete_variation(key).await,
                    }
                });
            }
        }
    }

    pub fn prefetch_window(&self, focus: PageNumber) -> std::ops::RangeInclusive<u32> {
        self.prefetch.window(focus)
    }

    fn reply<F>(&self, task: F)
    where
        F: Future<Output = Message> + Send + 'static,
    {
        let outbox = self.outbox.clone();
        tokio::spawn(async move {
            let message = task.await;
            if outbox.send(message).is_err() {
                debug!("Session closed before a task reported back");
            }
        });
    }
}
