//! The serialized action engine of one match.
//!
//! ## Critical section
//!
//! `Game::apply` checks legality, executes, records history and publishes a
//! snapshot under a single lock, so two triggers arriving at once can never
//! both pass `can_execute` against a state the other is about to change.
//! Triggers may come from any thread.
//!
//! ## Publishing
//!
//! Every successful action replaces the published `Arc<GameState>`. Readers
//! (broadcaster, watchers, UIs) only ever see these immutable snapshots.
//! Subscribers are called on the applying thread after the lock is released;
//! they may read the game and apply further actions.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::actions::{Action, ActionContext, ActionTrigger, StateView};
use crate::config::GameOptions;
use crate::core::{ControllerRng, GameState, WallClock};

use super::timeline::Timeline;
use super::undo::UndoState;

/// Change notification callback.
pub type Subscriber = Box<dyn Fn(&Arc<GameState>) + Send + Sync>;

struct Inner {
    state: GameState,
    timeline: Timeline,
    /// Last action applied with the User trigger.
    last_user_action: Option<Action>,
    undo: UndoState,
    rng: ControllerRng,
}

/// One match: live state, history and change notification.
///
/// ## Example
///
/// ```
/// use std::sync::Arc;
/// use game_controller::actions::{Action, ActionTrigger};
/// use game_controller::config::{GameOptions, TeamInfo};
/// use game_controller::core::{ControllerRng, ManualClock, PlayMode};
/// use game_controller::engine::Game;
/// use game_controller::rules::League;
///
/// let options = GameOptions::new(League::Spl, TeamInfo::new(5, "B-Human"), TeamInfo::new(12, "Nao Devils"));
/// let game = Game::new(&options, Arc::new(ManualClock::new(1_000)), ControllerRng::new(1));
///
/// assert!(game.apply(&Action::Ready, ActionTrigger::User));
/// assert!(!game.apply(&Action::Play, ActionTrigger::User));
/// assert_eq!(game.snapshot().play_mode, PlayMode::Ready);
/// assert_eq!(game.last_labels(2), vec!["Ready", "B-Human vs Nao Devils"]);
/// ```
pub struct Game {
    inner: Mutex<Inner>,
    published: RwLock<Arc<GameState>>,
    subscribers: RwLock<Vec<Subscriber>>,
    clock: Arc<dyn WallClock>,
}

impl Game {
    /// Set up a match. The game id is drawn from `rng`.
    #[must_use]
    pub fn new(options: &GameOptions, clock: Arc<dyn WallClock>, mut rng: ControllerRng) -> Self {
        let wall = clock.now_millis();
        let state = GameState::new(options, rng.next_id(), wall);
        let label = format!("{} vs {}", options.left.name, options.right.name);
        tracing::info!(league = options.league.name(), game_id = state.game_id(), "{}", label);

        let snapshot = Arc::new(state.clone());
        Self {
            inner: Mutex::new(Inner {
                state,
                timeline: Timeline::new(Arc::clone(&snapshot), label),
                last_user_action: None,
                undo: UndoState::Idle,
                rng,
            }),
            published: RwLock::new(snapshot),
            subscribers: RwLock::new(Vec::new()),
            clock,
        }
    }

    /// Apply an action if it is legal. Returns whether it was applied.
    pub fn apply(&self, action: &Action, trigger: ActionTrigger) -> bool {
        let snapshot = {
            let mut guard = self.inner.lock();
            let inner = &mut *guard;
            let wall = self.clock.now_millis();
            if !step(inner, action, trigger, wall) {
                return false;
            }
            let snapshot = Arc::new(inner.state.clone());
            *self.published.write() = Arc::clone(&snapshot);
            snapshot
        };

        for subscriber in self.subscribers.read().iter() {
            subscriber(&snapshot);
        }
        true
    }

    /// Whether `action` would be applied right now.
    #[must_use]
    pub fn can_execute(&self, action: &Action) -> bool {
        let inner = self.inner.lock();
        let view = StateView::new(&inner.state, inner.last_user_action.as_ref(), self.wall());
        action.can_execute(&view)
    }

    /// The latest published state.
    #[must_use]
    pub fn snapshot(&self) -> Arc<GameState> {
        Arc::clone(&self.published.read())
    }

    /// Register a change listener.
    pub fn subscribe<F>(&self, subscriber: F)
    where
        F: Fn(&Arc<GameState>) + Send + Sync + 'static,
    {
        self.subscribers.write().push(Box::new(subscriber));
    }

    /// Current wall-clock reading in ms.
    #[must_use]
    pub fn wall(&self) -> i64 {
        self.clock.now_millis()
    }

    #[must_use]
    pub fn last_user_action(&self) -> Option<Action> {
        self.inner.lock().last_user_action.clone()
    }

    /// Entries an armed undo would remove, if one is armed.
    #[must_use]
    pub fn undo_preview(&self) -> Option<u8> {
        self.inner.lock().undo.armed()
    }

    /// The `count` most recent timeline labels, newest first.
    #[must_use]
    pub fn last_labels(&self, count: usize) -> Vec<String> {
        self.inner.lock().timeline.last_labels(count)
    }

    /// A copy of the whole history (O(1)).
    #[must_use]
    pub fn timeline(&self) -> Timeline {
        self.inner.lock().timeline.clone()
    }
}

/// One action inside the critical section. Returns whether it was applied.
fn step(inner: &mut Inner, action: &Action, trigger: ActionTrigger, wall: i64) -> bool {
    let user = trigger == ActionTrigger::User;
    let view = StateView::new(&inner.state, inner.last_user_action.as_ref(), wall);
    if !action.can_execute(&view) {
        tracing::trace!(action = %action.name(), ?trigger, "illegal action ignored");
        return false;
    }

    if user {
        match action {
            Action::Undo(states) => {
                match inner.undo.press(*states) {
                    Some(count) => {
                        let restored = inner.timeline.undo(usize::from(count), wall);
                        inner.state = GameState::clone(&restored);
                        inner.last_user_action = None;
                        tracing::info!(states = count, "Undo to \"{}\"", inner.timeline.tail().label);
                    }
                    None => {
                        inner.last_user_action = Some(action.clone());
                        tracing::debug!(states, "undo armed");
                    }
                }
                return true;
            }
            Action::CancelUndo => {
                inner.undo.cancel();
                inner.last_user_action = None;
                return true;
            }
            _ => inner.undo.cancel(),
        }
    }

    let outcome = {
        let mut ctx = ActionContext::new(
            &mut inner.state,
            inner.last_user_action.as_ref(),
            wall,
            &mut inner.rng,
        );
        action.execute(&mut ctx)
    };

    if user {
        inner.last_user_action = if outcome.clear_last_user_action {
            None
        } else {
            Some(action.clone())
        };
    }

    if let Some(label) = outcome.label {
        tracing::info!("{}", label);
        inner.timeline.push(Arc::new(inner.state.clone()), label);
    }
    true
}
