use super::super::super::messages::Message;
use super::super::super::state::App;
use super::super::Effect;
use tracing::{debug, trace};

impl App {
    /// Applies one message. Never blocks; anything asynchronous comes back
    /// as an effect for the runner.
    pub fn reduce(&mut self, message: Message) -> Vec<Effect> {
        let mut effects = Vec::new();

        match message {
            Message::GoTo(requested) => self.handle_go_to(requested, &mut effects),
            Message::NextPage => self.handle_next_page(&mut effects),
            Message::PreviousPage => self.handle_previous_page(&mut effects),
            Message::PageLoaded { page, result } => {
                self.handle_page_loaded(page, result, &mut effects)
            }
            Message::NeighbourLoaded { page, result } => {
                self.handle_neighbour_loaded(page, result)
            }
            Message::AnnotationsRefreshed { page, result } => {
                self.handle_annotations_refreshed(page, result)
            }
            Message::NarratorsLoaded(result) => self.handle_narrators_loaded(result),
            Message::ToggleNarrator(id) => self.handle_toggle_narrator(id, &mut effects),
            Message::SaveAnnotation {
                word_id,
                narrator_id,
                content,
            } => self.handle_save_annotation(word_id, narrator_id, content, &mut effects),
            Message::DeleteAnnotation {
                word_id,
                narrator_id,
            } => self.handle_delete_annotation(word_id, narrator_id, &mut effects),
            Message::AnnotationMutated { page, result } => {
                self.handle_annotation_mutated(page, result, &mut effects)
            }
            Message::OpenDrawer => self.drawer.open(),
            Message::CloseDrawer => self.drawer.close(),
            Message::ToggleDrawer => self.drawer.toggle(),
            Message::PointerDown { x, y } => self.handle_pointer_down(x, y),
            Message::PointerMove(sample) => self.handle_pointer_move(sample),
            Message::PointerUp(sample) => self.handle_pointer_up(sample),
            Message::PointerCancel => self.handle_pointer_cancel(),
            Message::PresentedDrawerOffset(offset) => self.drawer.record_presented_offset(offset),
            Message::Frame(dt) => {
                trace!(dt_ms = dt.as_millis() as u64, "Frame");
                self.handle_frame(dt, &mut effects)
            }
            Message::WatchdogTick => self.handle_watchdog_tick(),
            Message::CacheChanged(event) => self.handle_cache_changed(event),
            Message::ViewportResized { width } => self.handle_viewport_resized(width),
            Message::Quit => debug!("Quit requested"),
        }

        effects
    }
}
