use super::super::state::App;
use super::Effect;
use crate::error::{EngineError, ServiceError};
use crate::model::{
    AnnotationKey, AnnotationSet, Narrator, NarratorId, PageNumber, Variation, WordId,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

impl App {
    pub(super) fn handle_narrators_loaded(&mut self, result: Result<Vec<Narrator>, ServiceError>) {
        match result {
            Ok(narrators) => {
                info!(count = narrators.len(), "Loaded narrators");
                self.narrators.available = narrators;
            }
            Err(err) => warn!("Failed to load narrators: {err}"),
        }
    }

    pub(super) fn handle_toggle_narrator(&mut self, id: NarratorId, effects: &mut Vec<Effect>) {
        let was_active = self.narrators.filter_active();
        let selected = self.narrators.toggle(id);
        debug!(narrator = %id, selected, "Toggled narrator");
        effects.push(Effect::PersistNarrators(self.narrators.selected.clone()));

        let page = self.reader.current_page;
        if !was_active && self.narrators.filter_active() && !self.annotations.contains(page) {
            if let Some(content) = self.reader.view.content() {
                effects.push(Effect::RefreshAnnotations {
                    page,
                    word_ids: content.word_ids(),
                });
            }
        }
        self.reader.touch();
    }

    pub(super) fn handle_annotations_refreshed(
        &mut self,
        page: PageNumber,
        result: Result<Arc<AnnotationSet>, EngineError>,
    ) {
        match result {
            Ok(set) => debug!(page = page.get(), entries = set.len(), "Annotations refreshed"),
            // Stale annotations are acceptable; the page stays readable.
            Err(err) => warn!(page = page.get(), "{err}"),
        }
    }

    pub(super) fn handle_save_annotation(
        &mut self,
        word_id: WordId,
        narrator_id: NarratorId,
        content: String,
        effects: &mut Vec<Effect>,
    ) {
        let page = self.reader.current_page;
        info!(page = page.get(), word = %word_id, narrator = %narrator_id, "Saving annotation");
        effects.push(Effect::SaveAnnotation {
            page,
            variation: Variation {
                word_id,
                narrator_id,
                content,
            },
        });
    }

    pub(super) fn handle_delete_annotation(
        &mut self,
        word_id: WordId,
        narrator_id: NarratorId,
        effects: &mut Vec<Effect>,
    ) {
        let page = self.reader.current_page;
        info!(page = page.get(), word = %word_id, narrator = %narrator_id, "Deleting annotation");
        effects.push(Effect::DeleteAnnotation {
            page,
            key: AnnotationKey {
                word_id,
                narrator_id,
            },
        });
    }

    /// A successful mutation always re-reads the page's annotations.
    pub(super) fn handle_annotation_mutated(
        &mut self,
        page: PageNumber,
        result: Result<(), ServiceError>,
        effects: &mut Vec<Effect>,
    ) {
        if let Err(err) = result {
            warn!(page = page.get(), "Annotation change failed: {err}");
            return;
        }
        match self.pages.get(page) {
            Some(content) => effects.push(Effect::RefreshAnnotations {
                page,
                word_ids: content.word_ids(),
            }),
            None => debug!(page = page.get(), "Mutated page is not cached; skipping refresh"),
        }
    }
}
