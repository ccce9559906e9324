//! Background fetching of a game's live state.

use std::collections::HashMap;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender};
use matrix_engine::Context;
use parking_lot::Mutex;
use tracing::{debug, error, instrument, warn};

use crate::api::{Game, GameId};
use crate::error::SportError;
use crate::retry::RetryPolicy;
use crate::SportResult;

/// Per-pass ready signals and fetched live games.
#[derive(Default)]
pub struct PreloadSlot {
    ready: Mutex<HashMap<GameId, Receiver<()>>>,
    games: Mutex<HashMap<GameId, Arc<dyn Game>>>,
}

impl PreloadSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a ready signal for `game_id`.
    ///
    /// Returns `None` if the game already has one this pass.
    pub fn register(&self, game_id: GameId) -> Option<ReadySignal> {
        let mut ready = self.ready.lock();
        if ready.contains_key(&game_id) {
            return None;
        }
        let (tx, rx) = crossbeam_channel::bounded(1);
        ready.insert(game_id, rx);
        Some(ReadySignal { game_id, tx })
    }

    /// The ready receiver for `game_id`. It yields once, then disconnects.
    pub fn ready(&self, game_id: GameId) -> Option<Receiver<()>> {
        self.ready.lock().get(&game_id).cloned()
    }

    pub fn store(&self, game_id: GameId, game: Arc<dyn Game>) {
        self.games.lock().insert(game_id, game);
    }

    /// The fetched live game, if its preload succeeded.
    pub fn game(&self, game_id: GameId) -> Option<Arc<dyn Game>> {
        self.games.lock().get(&game_id).cloned()
    }
}

/// Fires a game's ready signal when dropped.
pub struct ReadySignal {
    game_id: GameId,
    tx: Sender<()>,
}

impl ReadySignal {
    pub fn game_id(&self) -> GameId {
        self.game_id
    }
}

impl Drop for ReadySignal {
    fn drop(&mut self) {
        // Capacity 1 and a single sender: this is the only send.
        let _ = self.tx.try_send(());
    }
}

/// Fetches one game's live state with retries.
pub struct LivePreloader {
    game: Arc<dyn Game>,
    slot: Arc<PreloadSlot>,
    signal: ReadySignal,
    policy: RetryPolicy,
}

impl LivePreloader {
    /// Create a preloader for `game`, registering its ready signal in `slot`.
    ///
    /// Returns `None` if the game was already registered.
    pub fn new(game: Arc<dyn Game>, slot: Arc<PreloadSlot>, policy: RetryPolicy) -> Option<Self> {
        let signal = slot.register(game.id())?;
        Some(Self {
            game,
            slot,
            signal,
            policy,
        })
    }

    pub fn game_id(&self) -> GameId {
        self.signal.game_id()
    }

    /// Fetch the game's live state, storing it in the slot on success.
    ///
    /// The ready signal fires when this returns, whatever the outcome.
    #[instrument(name = "live_preload", skip_all, fields(game_id = self.signal.game_id()))]
    pub fn run(self, ctx: &Context) -> SportResult<()> {
        let Self {
            game,
            slot,
            signal: _signal,
            policy,
        } = self;
        let game_id = game.id();

        let mut attempts = 0;
        while policy.should_retry(attempts) {
            ctx.check()?;
            attempts += 1;

            match game.update(ctx) {
                Ok(live) => {
                    debug!(game_id, attempts, "live game fetched");
                    slot.store(game_id, live);
                    return Ok(());
                }
                Err(e) => {
                    error!(game_id, attempt = attempts, "failed to get live game: {:#}", e);
                    if policy.should_retry(attempts) {
                        ctx.sleep(policy.backoff)?;
                    }
                }
            }
        }

        Err(SportError::RetriesExhausted(attempts))
    }

    /// Run on a dedicated thread.
    ///
    /// If the thread cannot be started the preloader is dropped, which still
    /// fires its ready signal.
    pub fn spawn(self, ctx: Context) -> std::io::Result<JoinHandle<()>> {
        let game_id = self.game_id();
        thread::Builder::new()
            .name(format!("preload-{}", game_id))
            .spawn(move || match self.run(&ctx) {
                Ok(()) => {}
                Err(SportError::Cancelled) => debug!(game_id, "preload cancelled"),
                Err(e) => warn!(game_id, "preload failed: {}", e),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Team;
    use anyhow::anyhow;
    use chrono::{DateTime, Local};
    use crossbeam_channel::TryRecvError;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    /// Fails `failures` times, then succeeds.
    struct FlakyGame {
        failures: u32,
        calls: AtomicU32,
    }

    impl FlakyGame {
        fn new(failures: u32) -> Arc<Self> {
            Arc::new(Self {
                failures,
                calls: AtomicU32::new(0),
            })
        }
    }

    impl Game for FlakyGame {
        fn id(&self) -> GameId {
            7
        }
        fn link(&self) -> anyhow::Result<String> {
            Ok(String::new())
        }
        fn is_live(&self) -> anyhow::Result<bool> {
            Ok(true)
        }
        fn is_complete(&self) -> anyhow::Result<bool> {
            Ok(false)
        }
        fn home_team(&self) -> anyhow::Result<Arc<dyn Team>> {
            Err(anyhow!("unused"))
        }
        fn away_team(&self) -> anyhow::Result<Arc<dyn Team>> {
            Err(anyhow!("unused"))
        }
        fn period(&self) -> anyhow::Result<u32> {
            Ok(1)
        }
        fn clock(&self) -> anyhow::Result<String> {
            Ok("12:00".into())
        }
        fn update(&self, _ctx: &Context) -> anyhow::Result<Arc<dyn Game>> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n < self.failures {
                return Err(anyhow!("timeout"));
            }
            Ok(FlakyGame::new(0))
        }
        fn start_time(&self, _ctx: &Context) -> anyhow::Result<DateTime<Local>> {
            Ok(Local::now())
        }
    }

    fn fast_policy() -> RetryPolicy {
        RetryPolicy::new(3, Duration::from_millis(5))
    }

    fn assert_fired_once(rx: &Receiver<()>) {
        assert_eq!(rx.try_recv(), Ok(()));
        assert_eq!(rx.try_recv(), Err(TryRecvError::Disconnected));
    }

    #[test]
    fn test_register_is_once_per_game() {
        let slot = PreloadSlot::new();
        let signal = slot.register(1);
        assert!(signal.is_some());
        assert!(slot.register(1).is_none());

        let rx = slot.ready(1).unwrap();
        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
        drop(signal);
        assert_fired_once(&rx);
    }

    #[test]
    fn test_success_after_retry() {
        let slot = Arc::new(PreloadSlot::new());
        let game = FlakyGame::new(1);
        let preloader = LivePreloader::new(game.clone(), slot.clone(), fast_policy()).unwrap();

        preloader.run(&Context::new()).unwrap();

        assert_eq!(game.calls.load(Ordering::SeqCst), 2);
        assert!(slot.game(7).is_some());
        assert_fired_once(&slot.ready(7).unwrap());
    }

    #[test]
    fn test_exhaustion_fires_without_result() {
        let slot = Arc::new(PreloadSlot::new());
        let game = FlakyGame::new(u32::MAX);
        let preloader = LivePreloader::new(game.clone(), slot.clone(), fast_policy()).unwrap();

        let err = preloader.run(&Context::new()).unwrap_err();

        assert!(matches!(err, SportError::RetriesExhausted(3)));
        assert_eq!(game.calls.load(Ordering::SeqCst), 3);
        assert!(slot.game(7).is_none());
        assert_fired_once(&slot.ready(7).unwrap());
    }

    #[test]
    fn test_cancel_during_backoff_fires() {
        let slot = Arc::new(PreloadSlot::new());
        let game = FlakyGame::new(u32::MAX);
        let policy = RetryPolicy::new(3, Duration::from_secs(60));
        let preloader = LivePreloader::new(game.clone(), slot.clone(), policy).unwrap();

        let ctx = Context::new();
        let handle = preloader.spawn(ctx.clone()).unwrap();
        let rx = slot.ready(7).unwrap();

        thread::sleep(Duration::from_millis(20));
        ctx.cancel();

        assert_eq!(rx.recv_timeout(Duration::from_secs(5)), Ok(()));
        handle.join().unwrap();
        assert_eq!(game.calls.load(Ordering::SeqCst), 1);
        assert!(slot.game(7).is_none());
    }

    #[test]
    fn test_cancelled_before_start() {
        let slot = Arc::new(PreloadSlot::new());
        let game = FlakyGame::new(0);
        let preloader = LivePreloader::new(game.clone(), slot.clone(), fast_policy()).unwrap();

        let ctx = Context::new();
        ctx.cancel();
        let err = preloader.run(&ctx).unwrap_err();

        assert!(matches!(err, SportError::Cancelled));
        assert_eq!(game.calls.load(Ordering::SeqCst), 0);
        assert_fired_once(&slot.ready(7).unwrap());
    }
}
