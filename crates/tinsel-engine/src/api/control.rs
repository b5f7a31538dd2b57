//! Game-facing control surface: state transitions, pause, deferred
//! callbacks and input bindings.

use std::collections::HashMap;

use crate::api::game::{EngineContext, Game};
use crate::api::types::{NodeId, TimerId};
use crate::core::state::StateMachine;
use crate::core::timers::TimerQueue;
use crate::input::state::InputEdge;

/// Callback bound to an input edge. Stays bound until replaced or removed.
pub type Handler<G> = Box<dyn FnMut(&mut G, &mut EngineContext, &mut Control<G>)>;

/// One-shot callback queued with [`Control::wait`].
pub type Deferred<G> = Box<dyn FnOnce(&mut G, &mut EngineContext, &mut Control<G>)>;

/// Input edge a handler is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    KeyPress(u32),
    KeyRelease(u32),
    PointerPress,
    PointerRelease,
    Tap,
    ButtonPress(NodeId),
    ButtonRelease(NodeId),
}

impl From<InputEdge> for Trigger {
    fn from(edge: InputEdge) -> Self {
        match edge {
            InputEdge::KeyPress(code) => Trigger::KeyPress(code),
            InputEdge::KeyRelease(code) => Trigger::KeyRelease(code),
            InputEdge::PointerPress(_) => Trigger::PointerPress,
            InputEdge::PointerRelease(_) => Trigger::PointerRelease,
            InputEdge::Tap(_) => Trigger::Tap,
            InputEdge::ButtonPress(node) => Trigger::ButtonPress(node),
            InputEdge::ButtonRelease(node) => Trigger::ButtonRelease(node),
        }
    }
}

/// Scheduler state owned by the engine and handed to every game callback.
pub struct Control<G: Game> {
    states: StateMachine<G::State>,
    timers: TimerQueue<Deferred<G>>,
    handlers: HashMap<Trigger, Handler<G>>,
    /// Trigger whose handler is running, and whether it was unbound meanwhile.
    running: Option<(Trigger, bool)>,
    now_ms: f64,
}

impl<G: Game> Control<G> {
    pub fn new(initial: G::State) -> Self {
        Self {
            states: StateMachine::new(initial),
            timers: TimerQueue::new(),
            handlers: HashMap::new(),
            running: None,
            now_ms: 0.0,
        }
    }

    // -- State --

    pub fn state(&self) -> G::State {
        self.states.current()
    }

    /// Switch state at the start of the next tick.
    pub fn set_state(&mut self, next: G::State) {
        self.states.set(next);
    }

    /// Stop calling `Game::update`. Tweens, particles, emitters and timers
    /// keep running.
    pub fn pause(&mut self) {
        self.states.pause();
    }

    pub fn resume(&mut self) {
        self.states.resume();
    }

    pub fn is_paused(&self) -> bool {
        self.states.is_paused()
    }

    pub(crate) fn apply_pending_state(&mut self) -> Option<(G::State, G::State)> {
        self.states.apply_pending()
    }

    // -- Timers --

    /// Milliseconds of game time elapsed, as seen by timers.
    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    pub(crate) fn set_now(&mut self, now_ms: f64) {
        self.now_ms = now_ms;
    }

    /// Start a deferred callback: `control.wait(500).then(|game, ctx, control| ..)`.
    pub fn wait(&mut self, delay_ms: f64) -> Wait<'_, G> {
        Wait { control: self, delay_ms }
    }

    /// Cancel a pending `wait`. Returns false if it already ran.
    pub fn cancel_wait(&mut self, id: TimerId) -> bool {
        self.timers.cancel(id)
    }

    pub fn pending_waits(&self) -> usize {
        self.timers.len()
    }

    pub(crate) fn take_due(&mut self) -> Vec<(TimerId, Deferred<G>)> {
        self.timers.take_due(self.now_ms)
    }

    // -- Input bindings --

    /// Bind a handler, replacing any handler already bound to `trigger`.
    pub fn on(&mut self, trigger: Trigger, handler: impl FnMut(&mut G, &mut EngineContext, &mut Control<G>) + 'static) {
        self.handlers.insert(trigger, Box::new(handler));
    }

    pub fn off(&mut self, trigger: Trigger) -> bool {
        match &mut self.running {
            Some((running, unbound)) if *running == trigger => {
                *unbound = true;
                self.handlers.remove(&trigger);
                true
            }
            _ => self.handlers.remove(&trigger).is_some(),
        }
    }

    pub fn is_bound(&self, trigger: Trigger) -> bool {
        self.handlers.contains_key(&trigger)
    }

    pub fn on_key_press(&mut self, key_code: u32, handler: impl FnMut(&mut G, &mut EngineContext, &mut Control<G>) + 'static) {
        self.on(Trigger::KeyPress(key_code), handler);
    }

    pub fn on_key_release(&mut self, key_code: u32, handler: impl FnMut(&mut G, &mut EngineContext, &mut Control<G>) + 'static) {
        self.on(Trigger::KeyRelease(key_code), handler);
    }

    pub fn on_pointer_press(&mut self, handler: impl FnMut(&mut G, &mut EngineContext, &mut Control<G>) + 'static) {
        self.on(Trigger::PointerPress, handler);
    }

    pub fn on_pointer_release(&mut self, handler: impl FnMut(&mut G, &mut EngineContext, &mut Control<G>) + 'static) {
        self.on(Trigger::PointerRelease, handler);
    }

    pub fn on_tap(&mut self, handler: impl FnMut(&mut G, &mut EngineContext, &mut Control<G>) + 'static) {
        self.on(Trigger::Tap, handler);
    }

    pub fn on_button_press(&mut self, button: NodeId, handler: impl FnMut(&mut G, &mut EngineContext, &mut Control<G>) + 'static) {
        self.on(Trigger::ButtonPress(button), handler);
    }

    pub fn on_button_release(&mut self, button: NodeId, handler: impl FnMut(&mut G, &mut EngineContext, &mut Control<G>) + 'static) {
        self.on(Trigger::ButtonRelease(button), handler);
    }

    /// Run the handler bound to `trigger`, if any. The handler is out of its
    /// slot while it runs and goes back unless it was replaced or unbound.
    pub(crate) fn dispatch(&mut self, trigger: Trigger, game: &mut G, ctx: &mut EngineContext) -> bool {
        let Some(mut handler) = self.handlers.remove(&trigger) else {
            return false;
        };
        self.running = Some((trigger, false));
        handler(game, ctx, self);
        let unbound = matches!(self.running.take(), Some((_, true)));
        if !unbound {
            self.handlers.entry(trigger).or_insert(handler);
        }
        true
    }
}

/// Builder returned by [`Control::wait`].
pub struct Wait<'a, G: Game> {
    control: &'a mut Control<G>,
    delay_ms: f64,
}

impl<G: Game> Wait<'_, G> {
    /// Queue `callback` to run once the delay has elapsed.
    pub fn then(self, callback: impl FnOnce(&mut G, &mut EngineContext, &mut Control<G>) + 'static) -> TimerId {
        let now = self.control.now_ms;
        let id = self.control.timers.schedule(now, self.delay_ms, Box::new(callback));
        log::debug!("wait {:?}: {} ms", id, self.delay_ms);
        id
    }
}
