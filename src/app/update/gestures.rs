use super::super::state::{App, GestureOwner};
use super::Effect;
use crate::gesture::{DragSample, SwipeDecision, SwipeDirection};
use std::time::Duration;
use tracing::{debug, trace};

impl App {
    /// The drawer gets first claim on a pointer; the swipe takes the rest.
    pub(super) fn handle_pointer_down(&mut self, x: f32, y: f32) {
        if self.gesture.is_some() {
            return;
        }
        if self.drawer.begin_drag(x) {
            self.gesture = Some(GestureOwner::Drawer);
        } else if self.swipe.begin(x, self.drawer.is_visible()) {
            self.gesture = Some(GestureOwner::Swipe);
        }
        trace!(x, y, owner = ?self.gesture, "Pointer down");
    }

    pub(super) fn handle_pointer_move(&mut self, sample: DragSample) {
        match self.gesture {
            Some(GestureOwner::Drawer) => self.drawer.update_drag(sample.dx),
            Some(GestureOwner::Swipe) => self.swipe.update(sample.dx),
            None => {}
        }
    }

    pub(super) fn handle_pointer_up(&mut self, sample: DragSample) {
        match self.gesture.take() {
            Some(GestureOwner::Drawer) => {
                self.drawer.end_drag(sample);
            }
            Some(GestureOwner::Swipe) => {
                let can_go_previous = !self.reader.current_page.is_first();
                if let SwipeDecision::Commit(direction) = self.swipe.end(sample, can_go_previous)
                {
                    debug!(?direction, "Swipe committing");
                }
            }
            None => {}
        }
    }

    pub(super) fn handle_pointer_cancel(&mut self) {
        match self.gesture.take() {
            Some(GestureOwner::Drawer) => self.drawer.cancel_drag(),
            Some(GestureOwner::Swipe) => self.swipe.cancel(),
            None => {}
        }
    }

    /// Navigation happens in the same tick the commit animation finishes.
    pub(super) fn handle_frame(&mut self, dt: Duration, effects: &mut Vec<Effect>) {
        self.drawer.tick(dt);
        match self.swipe.tick(dt) {
            Some(SwipeDirection::Next) => effects.extend(self.next_page()),
            Some(SwipeDirection::Previous) => effects.extend(self.previous_page()),
            None => {}
        }
    }

    pub(super) fn handle_watchdog_tick(&mut self) {
        if let Some(report) = self.drawer.watchdog() {
            debug!(observed = report.observed, "Watchdog repaired drawer");
            self.reader.touch();
        }
    }

    pub(super) fn handle_viewport_resized(&mut self, width: f32) {
        self.swipe.set_viewport_width(width);
    }
}

#[cfg(test)]
mod tests {
    use super::super::super::state::testing::{Fixture, page};
    use super::*;

    const FRAME: Duration = Duration::from_millis(16);

    fn settle(app: &mut App) -> Vec<Effect> {
        let mut effects = Vec::new();
        for _ in 0..200 {
            if !app.is_animating() {
                return effects;
            }
            app.handle_frame(FRAME, &mut effects);
        }
        panic!("animations never settled");
    }

    fn navigations(effects: &[Effect]) -> usize {
        effects
            .iter()
            .filter(|effect| matches!(effect, Effect::Prefetch(_)))
            .count()
    }

    #[tokio::test]
    async fn swipe_past_half_width_moves_forward_exactly_once() {
        let fixture = Fixture::new();
        fixture.warm(&[5, 6]).await;
        let mut app = fixture.app(5, &[]);
        let vw = app.swipe().viewport_width();

        app.handle_pointer_down(300.0, 200.0);
        app.handle_pointer_move(DragSample::new(-0.3 * vw, 4.0, -200.0));
        app.handle_pointer_up(DragSample::new(-0.6 * vw, 4.0, 0.0));
        let effects = settle(&mut app);

        assert_eq!(navigations(&effects), 1);
        assert_eq!(app.current_page(), page(6));
        assert_eq!(app.swipe().translate(), 0.0);
    }

    #[test]
    fn vertical_drag_never_navigates() {
        let fixture = Fixture::new();
        let mut app = fixture.app(5, &[]);
        let vw = app.swipe().viewport_width();

        app.handle_pointer_down(300.0, 200.0);
        app.handle_pointer_up(DragSample::new(-0.75 * vw, 0.5 * vw, -4000.0));
        let effects = settle(&mut app);

        assert_eq!(navigations(&effects), 0);
        assert_eq!(app.current_page(), page(5));
        assert_eq!(app.swipe().translate(), 0.0);
    }

    #[test]
    fn swipe_back_from_first_page_snaps_back() {
        let fixture = Fixture::new();
        let mut app = fixture.app(1, &[]);
        let vw = app.swipe().viewport_width();

        app.handle_pointer_down(300.0, 0.0);
        app.handle_pointer_up(DragSample::new(0.7 * vw, 0.0, 900.0));
        let effects = settle(&mut app);

        assert_eq!(navigations(&effects), 0);
        assert_eq!(app.current_page(), page(1));
    }

    #[test]
    fn edge_band_pointer_goes_to_the_drawer() {
        let fixture = Fixture::new();
        let mut app = fixture.app(5, &[]);
        let width = app.drawer_machine().config().width;

        app.handle_pointer_down(10.0, 100.0);
        app.handle_pointer_move(DragSample::new(0.9 * width, 0.0, 0.0));
        assert_eq!(app.swipe().translate(), 0.0);
        app.handle_pointer_up(DragSample::new(0.9 * width, 0.0, 0.0));
        settle(&mut app);

        assert_eq!(app.drawer().offset, 0.0);
        assert!(app.drawer().visible);

        // With the drawer open, pointers anywhere belong to it.
        app.handle_pointer_down(300.0, 100.0);
        app.handle_pointer_up(DragSample::new(-width, 0.0, -800.0));
        settle(&mut app);
        assert_eq!(app.drawer().offset, -width);
        assert_eq!(app.current_page(), page(5));
    }

    #[test]
    fn watchdog_repairs_presented_drift() {
        let fixture = Fixture::new();
        let mut app = fixture.app(5, &[]);
        let width = app.drawer_machine().config().width;

        app.drawer.record_presented_offset(-0.2 * width);
        app.handle_watchdog_tick();

        assert_eq!(app.drawer().offset, 0.0);
        assert!(app.drawer().settled);
        assert_eq!(app.drawer_machine().drift_corrections(), 1);
    }
}
