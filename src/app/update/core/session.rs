use super::super::super::messages::Message;
use super::super::super::state::App;
use super::super::Effect;
use super::runtime::EffectRunner;
use crate::cache::{AnnotationCache, CacheEvent, CacheNotifier, PageStore};
use crate::config::AppConfig;
use crate::service::DocumentService;
use crate::settings::KeyValueStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use tokio::time::{Instant, MissedTickBehavior, interval};
use tracing::{info, warn};

/// The single loop that owns the `App`.
///
/// Gesture input, timers, task replies and cache notifications all arrive as
/// messages and are applied one at a time.
pub struct Session {
    app: App,
    runner: EffectRunner,
    pending: Vec<Effect>,
    inbox: mpsc::UnboundedReceiver<Message>,
    cache_events: broadcast::Receiver<CacheEvent>,
    watchdog_interval: Duration,
    frame_interval: Duration,
}

/// Sends input into a running session.
#[derive(Clone)]
pub struct SessionHandle {
    sender: mpsc::UnboundedSender<Message>,
}

impl SessionHandle {
    /// Returns false once the session has stopped.
    pub fn send(&self, message: Message) -> bool {
        self.sender.send(message).is_ok()
    }
}

impl Session {
    pub fn new(
        config: AppConfig,
        service: Arc<dyn DocumentService>,
        settings: Arc<dyn KeyValueStore>,
    ) -> (Session, SessionHandle) {
        let notifier = CacheNotifier::new();
        let cache_events = notifier.subscribe();
        let pages = Arc::new(PageStore::new(Arc::clone(&service), notifier.clone()));
        let annotations = Arc::new(AnnotationCache::new(Arc::clone(&service), notifier));
        let (sender, inbox) = mpsc::unbounded_channel();

        let watchdog_interval = config.watchdog_interval();
        let frame_interval = config.frame_interval();
        let prefetch_radius = config.prefetch_radius;
        let (app, pending) = App::bootstrap(
            config,
            Arc::clone(&pages),
            Arc::clone(&annotations),
            settings.as_ref(),
        );
        let runner = EffectRunner::new(
            service,
            pages,
            annotations,
            prefetch_radius,
            settings,
            sender.clone(),
        );

        let session = Session {
            app,
            runner,
            pending,
            inbox,
            cache_events,
            watchdog_interval,
            frame_interval,
        };
        (session, SessionHandle { sender })
    }

    pub fn app(&self) -> &App {
        &self.app
    }

    pub async fn run(self) -> App {
        self.run_with(|_| {}).await
    }

    /// Runs until `Message::Quit`. `observer` sees the state after bootstrap
    /// and after every applied message.
    pub async fn run_with(self, mut observer: impl FnMut(&App)) -> App {
        let Session {
            mut app,
            runner,
            pending,
            mut inbox,
            mut cache_events,
            watchdog_interval,
            frame_interval,
        } = self;

        for effect in pending {
            runner.run(effect);
        }
        observer(&app);

        let mut watchdog = interval(watchdog_interval);
        watchdog.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut frames = interval(frame_interval);
        frames.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut last_frame = Instant::now();
        let mut was_animating = false;
        let mut events_open = true;

        loop {
            let animating = app.is_animating();
            if animating && !was_animating {
                frames.reset();
                last_frame = Instant::now();
            }
            was_animating = animating;

            let message = tokio::select! {
                received = inbox.recv() => match received {
                    Some(Message::Quit) | None => break,
                    Some(message) => message,
                },
                _ = watchdog.tick() => Message::WatchdogTick,
                now = frames.tick(), if animating => {
                    let dt = now.saturating_duration_since(last_frame);
                    last_frame = now;
                    Message::Frame(dt)
                }
                event = cache_events.recv(), if events_open => match event {
                    Ok(event) => Message::CacheChanged(event),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Cache notifications lagged");
                        continue;
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        events_open = false;
                        continue;
                    }
                },
            };

            app.update(message, &runner);
            observer(&app);
        }

        info!(page = app.current_page().get(), "Session finished");
        app
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::PageView;
    use crate::gesture::DragSample;
    use crate::model::PageNumber;
    use crate::service::fake::FakeService;
    use crate::settings::MemoryStore;

    fn page(n: u32) -> PageNumber {
        PageNumber::new(i64::from(n)).expect("positive")
    }

    fn session(service: &Arc<FakeService>) -> (Session, SessionHandle) {
        let config = AppConfig {
            start_page: 19,
            ..AppConfig::default()
        };
        let dyn_service: Arc<dyn DocumentService> = service.clone();
        Session::new(config, dyn_service, Arc::new(MemoryStore::default()))
    }

    #[tokio::test(start_paused = true)]
    async fn navigation_fetches_each_page_once() {
        let service = Arc::new(FakeService::new());
        let (session, handle) = session(&service);

        let driver = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            handle.send(Message::GoTo(20));
            tokio::time::sleep(Duration::from_millis(50)).await;
            handle.send(Message::Quit);
        });
        let app = session.run().await;
        driver.await.expect("driver");

        assert_eq!(app.current_page(), page(20));
        assert!(matches!(app.view(), PageView::Ready(_)));
        for n in 14..=25 {
            assert!(service.page_requests(n) <= 1, "page {n} fetched twice");
        }
        assert_eq!(service.page_requests(20), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn swipe_commit_is_driven_by_frame_ticks() {
        let service = Arc::new(FakeService::new());
        let (session, handle) = session(&service);
        let vw = session.app().swipe().viewport_width();

        let driver = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            handle.send(Message::PointerDown { x: 300.0, y: 100.0 });
            handle.send(Message::PointerMove(DragSample::new(-0.3 * vw, 2.0, -300.0)));
            handle.send(Message::PointerUp(DragSample::new(-0.6 * vw, 2.0, 0.0)));
            tokio::time::sleep(Duration::from_secs(1)).await;
            handle.send(Message::Quit);
        });
        let mut pages_seen = Vec::new();
        let app = session
            .run_with(|app| {
                if pages_seen.last() != Some(&app.current_page()) {
                    pages_seen.push(app.current_page());
                }
            })
            .await;
        driver.await.expect("driver");

        assert_eq!(pages_seen, vec![page(19), page(20)]);
        assert_eq!(app.swipe().translate(), 0.0);
        assert!(!app.is_animating());
    }

    #[tokio::test(start_paused = true)]
    async fn failed_page_is_fetched_again_on_next_visit() {
        let service = Arc::new(FakeService::new());
        service.fail_page(40);
        let (session, handle) = session(&service);

        let probe = service.clone();
        let driver = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            handle.send(Message::GoTo(40));
            tokio::time::sleep(Duration::from_millis(10)).await;
            probe.heal_page(40);
            handle.send(Message::GoTo(41));
            tokio::time::sleep(Duration::from_millis(10)).await;
            handle.send(Message::GoTo(40));
            tokio::time::sleep(Duration::from_millis(10)).await;
            handle.send(Message::Quit);
        });
        let app = session.run().await;
        driver.await.expect("driver");

        assert!(matches!(app.view(), PageView::Ready(_)));
        assert!(service.page_requests(40) >= 2);
    }
}
