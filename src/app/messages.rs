use crate::cache::CacheEvent;
use crate::cache::pages::PageResult;
use crate::error::{EngineError, ServiceError};
use crate::gesture::DragSample;
use crate::model::{AnnotationSet, Narrator, NarratorId, PageNumber, WordId};
use std::sync::Arc;
use std::time::Duration;

/// Everything the reducer reacts to: user input, timers and task results.
#[derive(Debug, Clone)]
pub enum Message {
    GoTo(i64),
    NextPage,
    PreviousPage,
    PageLoaded {
        page: PageNumber,
        result: PageResult,
    },
    NeighbourLoaded {
        page: PageNumber,
        result: Result<(), ServiceError>,
    },
    AnnotationsRefreshed {
        page: PageNumber,
        result: Result<Arc<AnnotationSet>, EngineError>,
    },
    NarratorsLoaded(Result<Vec<Narrator>, ServiceError>),
    ToggleNarrator(NarratorId),
    SaveAnnotation {
        word_id: WordId,
        narrator_id: NarratorId,
        content: String,
    },
    DeleteAnnotation {
        word_id: WordId,
        narrator_id: NarratorId,
    },
    AnnotationMutated {
        page: PageNumber,
        result: Result<(), ServiceError>,
    },
    OpenDrawer,
    CloseDrawer,
    ToggleDrawer,
    PointerDown {
        x: f32,
        y: f32,
    },
    PointerMove(DragSample),
    PointerUp(DragSample),
    PointerCancel,
    /// Drawer offset a renderer actually presented.
    PresentedDrawerOffset(f32),
    Frame(Duration),
    WatchdogTick,
    CacheChanged(CacheEvent),
    ViewportResized {
        width: f32,
    },
    Quit,
}
