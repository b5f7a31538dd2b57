//! Frame driver: asset loading, fixed-step ticks and the per-frame pass order.

use crate::api::control::Control;
use crate::api::error::EngineError;
use crate::api::game::{EngineContext, Game, GameConfig};
use crate::assets::loader::{load_assets, AssetSource};
use crate::core::time::FixedTimestep;
use crate::input::queue::{InputEvent, InputQueue};
use crate::renderer::instance::DisplayList;
use crate::systems::animation::tick_animations;
use crate::systems::emitter::tick_emitters;
use crate::systems::render::build_display_list;

/// Engine lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnginePhase {
    Uninitialized,
    Loading,
    Running,
    /// Loading failed; `start` may be called again.
    LoadFailed,
}

/// Owns a game and everything it runs against.
pub struct Engine<G: Game> {
    game: G,
    ctx: EngineContext,
    control: Control<G>,
    input: InputQueue,
    timestep: FixedTimestep,
    config: GameConfig,
    phase: EnginePhase,
    display: DisplayList,
}

impl<G: Game> Engine<G> {
    pub fn new(game: G) -> Self {
        let config = game.config();
        let control = Control::new(game.initial_state());
        Self {
            ctx: EngineContext::new(&config),
            control,
            input: InputQueue::new(),
            timestep: FixedTimestep::from_fps(config.fps, config.max_steps_per_frame),
            display: DisplayList::new(),
            phase: EnginePhase::Uninitialized,
            config,
            game,
        }
    }

    /// Load `paths` from `source`, then run `Game::setup`. On failure the
    /// phase becomes `LoadFailed` and the call can be retried.
    pub fn start<S: AsRef<str>>(&mut self, paths: &[S], source: &mut dyn AssetSource) -> Result<(), EngineError> {
        if self.phase == EnginePhase::Running {
            return Err(EngineError::AlreadyRunning);
        }
        self.phase = EnginePhase::Loading;

        let game = &mut self.game;
        match load_assets(paths, source, |progress| game.load(progress)) {
            Ok(assets) => self.ctx.assets = assets,
            Err(err) => {
                log::warn!("asset loading failed: {}", err);
                self.phase = EnginePhase::LoadFailed;
                return Err(err.into());
            }
        }

        self.game.setup(&mut self.ctx, &mut self.control);
        self.phase = EnginePhase::Running;
        log::info!("engine running ({}x{} at {} fps)", self.config.width, self.config.height, self.config.fps);
        Ok(())
    }

    /// Queue a host input event for the next step.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Advance by `dt` seconds of host time. Runs as many fixed steps as have
    /// accumulated, then rebuilds the display list. Returns the step count.
    pub fn tick(&mut self, dt: f32) -> u32 {
        if self.phase != EnginePhase::Running {
            return 0;
        }
        // Timers and taps run on host time, spread over this frame's steps.
        let from_ms = self.ctx.clock.real_ms();
        self.ctx.clock.advance_real(dt as f64 * 1000.0);
        let span_ms = self.ctx.clock.real_ms() - from_ms;

        let steps = self.timestep.accumulate(dt);
        for i in 1..=steps {
            self.step(from_ms + span_ms * i as f64 / steps as f64);
        }
        build_display_list(&self.ctx.scene, &mut self.display);
        steps
    }

    /// One fixed step, in frame order. `now` is host time in milliseconds.
    fn step(&mut self, now: f64) {
        let dt = self.timestep.dt();
        let dt_ms = self.timestep.dt_ms();
        self.ctx.clock.advance(dt_ms);
        self.ctx.scene.settle_all();
        self.control.set_now(now);

        // 1. state transition requested last frame
        self.control.apply_pending_state();

        // 2. input edges
        let events = self.input.drain();
        let edges = self.ctx.input.process(&events, &mut self.ctx.scene, now);
        for edge in edges {
            self.control.dispatch(edge.into(), &mut self.game, &mut self.ctx);
        }

        // 3. deferred callbacks
        for (id, callback) in self.control.take_due() {
            log::debug!("wait {:?} due", id);
            callback(&mut self.game, &mut self.ctx, &mut self.control);
        }

        // 4. tweens and shakes
        self.ctx.tweens.tick(&mut self.ctx.scene);
        self.ctx.shakes.tick(&mut self.ctx.scene, &mut self.ctx.rng);

        // 5. particles, emitters, frame animation
        self.ctx.particles.tick(&mut self.ctx.scene);
        tick_emitters(&mut self.ctx, dt_ms);
        tick_animations(&mut self.ctx.scene, dt);

        // 6. game logic
        if !self.control.is_paused() {
            let state = self.control.state();
            self.game.update(state, &mut self.ctx, &mut self.control);
        }

        // 7. cleanup
        let freed = self.ctx.scene.flush_pending();
        if freed > 0 {
            log::debug!("freed {} nodes", freed);
        }
        self.ctx.tweens.drain_completed().for_each(drop);
    }

    // -- Accessors --

    pub fn phase(&self) -> EnginePhase {
        self.phase
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut G {
        &mut self.game
    }

    pub fn context(&self) -> &EngineContext {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut EngineContext {
        &mut self.ctx
    }

    pub fn control(&self) -> &Control<G> {
        &self.control
    }

    pub fn display_list(&self) -> &DisplayList {
        &self.display
    }

    /// Host pixels per stage unit, applied to pointer coordinates.
    pub fn set_pointer_scale(&mut self, scale: f32) {
        self.ctx.input.set_scale(scale);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::NodeId;
    use crate::assets::loader::MemorySource;
    use crate::input::keys;
    use glam::Vec2;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Phase {
        Play,
        End,
    }

    #[derive(Default)]
    struct Probe {
        log: Vec<String>,
        updates: Vec<Phase>,
        loaded: Vec<usize>,
        ball: Option<NodeId>,
    }

    impl Game for Probe {
        type State = Phase;

        fn initial_state(&self) -> Phase {
            Phase::Play
        }

        fn load(&mut self, progress: crate::assets::loader::LoadProgress<'_>) {
            self.loaded.push(progress.loaded);
        }

        fn setup(&mut self, ctx: &mut EngineContext, control: &mut Control<Self>) {
            self.ball = ctx.sprite("ball.png");
            control.on_key_press(keys::SPACE, |game, _, _| game.log.push(String::from("space")));
            control.on_key_release(keys::SPACE, |game, _, _| game.log.push(String::from("space up")));
        }

        fn update(&mut self, state: Phase, _ctx: &mut EngineContext, _control: &mut Control<Self>) {
            self.updates.push(state);
        }
    }

    const DT: f32 = 1.0 / 60.0;

    fn source() -> MemorySource {
        let mut source = MemorySource::new();
        source.insert_image("ball.png", 32.0, 32.0);
        source
    }

    fn running() -> Engine<Probe> {
        let mut engine = Engine::new(Probe::default());
        engine.start(&["ball.png"], &mut source()).unwrap();
        engine
    }

    #[test]
    fn start_loads_then_sets_up() {
        let engine = running();
        assert_eq!(engine.phase(), EnginePhase::Running);
        assert_eq!(engine.game().loaded, vec![1]);
        assert!(engine.game().ball.is_some());
    }

    #[test]
    fn failed_load_is_retryable() {
        let mut engine = Engine::new(Probe::default());
        let err = engine.start(&["missing.png"], &mut source()).unwrap_err();
        assert!(matches!(err, EngineError::Assets(_)));
        assert_eq!(engine.phase(), EnginePhase::LoadFailed);
        assert_eq!(engine.tick(DT), 0);
        assert!(engine.game().updates.is_empty());

        engine.start(&["ball.png"], &mut source()).unwrap();
        assert_eq!(engine.phase(), EnginePhase::Running);
        assert!(matches!(
            engine.start(&["ball.png"], &mut source()),
            Err(EngineError::AlreadyRunning)
        ));
    }

    #[test]
    fn state_change_applies_next_tick() {
        let mut engine = running();
        engine.tick(DT);
        engine.control.set_state(Phase::End);
        assert_eq!(engine.control().state(), Phase::Play);
        engine.tick(DT);
        assert_eq!(engine.game().updates, vec![Phase::Play, Phase::End]);
    }

    #[test]
    fn pause_stops_update_only() {
        let mut engine = running();
        let ball = engine.game().ball.unwrap();
        engine.ctx.slide(ball, Vec2::new(60.0, 0.0), 3, crate::Easing::Linear, false);
        engine.control.pause();

        for _ in 0..3 {
            engine.tick(DT);
        }
        assert!(engine.game().updates.is_empty());
        assert_eq!(engine.context().scene.get(ball).unwrap().pos, Vec2::new(60.0, 0.0));

        engine.control.resume();
        engine.tick(DT);
        assert_eq!(engine.game().updates.len(), 1);
    }

    #[test]
    fn waits_run_in_due_order() {
        let mut engine = running();
        engine.control.wait(50.0).then(|game, _, _| game.log.push(String::from("b")));
        engine.control.wait(20.0).then(|game, _, _| game.log.push(String::from("a")));
        let cancelled = engine.control.wait(30.0).then(|game, _, _| game.log.push(String::from("x")));
        assert!(engine.control.cancel_wait(cancelled));

        for _ in 0..2 {
            engine.tick(DT);
        }
        assert_eq!(engine.game().log, vec!["a"]);
        for _ in 0..2 {
            engine.tick(DT);
        }
        assert_eq!(engine.game().log, vec!["a", "b"]);
        assert_eq!(engine.control().pending_waits(), 0);
    }

    #[test]
    fn waits_follow_host_time_past_the_step_cap() {
        let mut engine = running();
        engine.control.wait(500.0).then(|game, _, _| game.log.push(String::from("late")));

        assert_eq!(engine.tick(1.0), 10);
        assert!(engine.context().clock.elapsed_ms() < 500.0);
        assert_eq!(engine.game().log, vec!["late"]);
    }

    #[test]
    fn waits_accumulate_short_host_frames() {
        let mut engine = running();
        engine.control.wait(10.0).then(|game, _, _| game.log.push(String::from("soon")));

        // Too short for a fixed step; the time still counts.
        assert_eq!(engine.tick(0.008), 0);
        assert!(engine.game().log.is_empty());
        assert_eq!(engine.tick(0.009), 1);
        assert_eq!(engine.game().log, vec!["soon"]);
    }

    #[test]
    fn key_callbacks_fire_on_edges_only() {
        let mut engine = running();
        engine.push_input(InputEvent::KeyDown { key_code: keys::SPACE });
        engine.push_input(InputEvent::KeyDown { key_code: keys::SPACE });
        engine.tick(DT);
        engine.push_input(InputEvent::KeyDown { key_code: keys::SPACE });
        engine.tick(DT);
        assert!(engine.context().input.key(keys::SPACE).is_down);

        engine.push_input(InputEvent::KeyUp { key_code: keys::SPACE });
        engine.tick(DT);
        assert_eq!(engine.game().log, vec!["space", "space up"]);
        assert!(engine.context().input.key(keys::SPACE).is_up);
    }

    #[test]
    fn destroy_later_frees_at_end_of_step() {
        let mut engine = running();
        let ball = engine.game().ball.unwrap();
        engine.ctx.scene.destroy_later(ball);
        assert!(engine.context().scene.contains(ball));
        engine.tick(DT);
        assert!(!engine.context().scene.contains(ball));
    }

    #[test]
    fn display_list_follows_the_scene() {
        let mut engine = running();
        engine.tick(DT);
        assert_eq!(engine.display_list().instance_count(), 1);
    }
}
