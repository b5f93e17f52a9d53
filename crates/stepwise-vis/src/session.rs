//! Shared, timer-driven playback sessions.
//!
//! A [`Session`] owns one [`Playback`] behind a lock and runs the tick loop
//! for it: whenever the playback arms a tick, a background task sleeps for
//! the requested delay and delivers it. At most one timer task exists per
//! session, and replacing or cancelling a tick aborts the old task.
//!
//! Every mutation publishes the playback's revision on a `watch` channel so
//! WebSocket clients can re-render.

use std::sync::{Arc, Weak};

use serde::Serialize;
use tokio::sync::{watch, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, trace};

use crate::playback::{Playback, PlaybackStatus, Scene, StatusOf};
use crate::timer::{ScheduledTick, TickToken};

/// Status plus scene contents, as pushed to clients.
#[derive(Debug, Clone, Serialize)]
pub struct Frame<A, P, T> {
    pub status: PlaybackStatus<A, P>,
    pub scene: T,
}

/// Frame type for a given scene.
pub type FrameOf<S> = Frame<
    <S as Scene>::Algorithm,
    crate::playback::PhaseOf<S>,
    <S as Scene>::Snapshot,
>;

struct Driver<S: Scene> {
    playback: Playback<S>,
    timer: Option<(TickToken, JoinHandle<()>)>,
}

impl<S: Scene> Driver<S> {
    fn abort_timer(&mut self) {
        if let Some((token, handle)) = self.timer.take() {
            trace!(?token, "timer task aborted");
            handle.abort();
        }
    }
}

impl<S: Scene> Drop for Driver<S> {
    fn drop(&mut self) {
        self.abort_timer();
    }
}

/// One visualizer's playback plus its tick loop.
pub struct Session<S: Scene> {
    name: &'static str,
    driver: RwLock<Driver<S>>,
    revisions: watch::Sender<u64>,
}

impl<S> Session<S>
where
    S: Scene + Send + Sync + 'static,
{
    pub fn new(name: &'static str, playback: Playback<S>) -> Arc<Self> {
        let (revisions, _) = watch::channel(playback.revision());
        Arc::new(Self {
            name,
            driver: RwLock::new(Driver {
                playback,
                timer: None,
            }),
            revisions,
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Receive the revision after every change.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revisions.subscribe()
    }

    /// Read the playback.
    pub async fn read<R>(&self, f: impl FnOnce(&Playback<S>) -> R) -> R {
        let driver = self.driver.read().await;
        f(&driver.playback)
    }

    pub async fn status(&self) -> StatusOf<S> {
        self.read(|playback| PlaybackStatus::from(playback)).await
    }

    pub async fn frame(&self) -> FrameOf<S> {
        self.read(|playback| Frame {
            status: PlaybackStatus::from(playback),
            scene: playback.scene().snapshot(),
        })
        .await
    }

    /// Start or resume.
    pub async fn start(self: &Arc<Self>) {
        self.drive(Playback::start).await;
    }

    pub async fn pause(self: &Arc<Self>) -> bool {
        self.update(Playback::pause).await
    }

    pub async fn step(self: &Arc<Self>) -> bool {
        self.update(Playback::step).await
    }

    pub async fn reset(self: &Arc<Self>) {
        self.update(Playback::reset).await;
    }

    /// Mutate the playback with an operation that never arms a tick
    /// (pause, edits, speed, algorithm choice).
    pub async fn update<R>(self: &Arc<Self>, f: impl FnOnce(&mut Playback<S>) -> R) -> R {
        let mut driver = self.driver.write().await;
        let out = f(&mut driver.playback);
        self.sync(&mut driver, None);
        out
    }

    async fn drive(self: &Arc<Self>, f: impl FnOnce(&mut Playback<S>) -> Option<ScheduledTick>) {
        let mut driver = self.driver.write().await;
        let next = f(&mut driver.playback);
        self.sync(&mut driver, next);
    }

    /// Line the timer task up with the playback's armed tick, then publish.
    fn sync(self: &Arc<Self>, driver: &mut Driver<S>, next: Option<ScheduledTick>) {
        if let Some(tick) = next {
            driver.abort_timer();
            driver.timer = Some((tick.token, self.spawn_timer(tick)));
        } else {
            let running = driver.timer.as_ref().map(|(token, _)| *token);
            if running.is_some() && running != driver.playback.armed_tick() {
                driver.abort_timer();
            }
        }
        self.revisions.send_replace(driver.playback.revision());
    }

    fn spawn_timer(self: &Arc<Self>, first: ScheduledTick) -> JoinHandle<()> {
        let session: Weak<Self> = Arc::downgrade(self);
        let name = self.name;
        tokio::spawn(async move {
            let mut tick = first;
            loop {
                tokio::time::sleep(tick.delay).await;
                let Some(session) = session.upgrade() else {
                    return;
                };
                let mut driver = session.driver.write().await;
                let next = driver.playback.tick(tick.token);
                session.revisions.send_replace(driver.playback.revision());

                match next {
                    Some(n) => {
                        driver.timer = driver.timer.take().map(|(_, handle)| (n.token, handle));
                        tick = n;
                    }
                    None => {
                        if matches!(driver.timer, Some((token, _)) if token == tick.token) {
                            driver.timer = None;
                        }
                        debug!(session = name, "timer task finished");
                        return;
                    }
                }
            }
        })
    }
}
