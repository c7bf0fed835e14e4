use crate::model::{AnnotationKey, NarratorId, PageNumber, Variation, WordId};

mod annotations;
pub(crate) mod core;
mod gestures;
mod navigation;

pub use self::core::{EffectRunner, Session, SessionHandle, parse_command};

/// Describes work that must be performed outside the pure reducer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Fetch the page the reader is waiting on.
    LoadPage(PageNumber),
    /// Fill an adjacent swipe pane.
    LoadNeighbour(PageNumber),
    Prefetch(PageNumber),
    RefreshAnnotations {
        page: PageNumber,
        word_ids: Vec<WordId>,
    },
    LoadNarrators,
    PersistNarrators(Vec<NarratorId>),
    SaveAnnotation {
        page: PageNumber,
        variation: Variation,
    },
    DeleteAnnotation {
        page: PageNumber,
        key: AnnotationKey,
    },
}
