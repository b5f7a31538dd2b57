use std::collections::BTreeMap;

use crate::api::game::EngineContext;
use crate::api::types::EmitterId;

/// Callback run on every emission, typically spawning a particle burst.
pub type EmitterFactory = Box<dyn FnMut(&mut EngineContext)>;

/// Periodic emission task.
pub struct Emitter {
    /// Milliseconds between emissions.
    pub interval_ms: f64,
    playing: bool,
    elapsed_ms: f64,
    /// Empty while the factory is running.
    factory: Option<EmitterFactory>,
}

impl Emitter {
    pub fn new(interval_ms: f64, factory: EmitterFactory) -> Self {
        Self {
            interval_ms: interval_ms.max(1.0),
            playing: false,
            elapsed_ms: 0.0,
            factory: Some(factory),
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Advance by `dt_ms`. Returns how many emissions are due.
    fn advance(&mut self, dt_ms: f64) -> u32 {
        if !self.playing {
            return 0;
        }
        self.elapsed_ms += dt_ms;
        let mut due = 0;
        while self.elapsed_ms >= self.interval_ms {
            self.elapsed_ms -= self.interval_ms;
            due += 1;
        }
        due
    }
}

impl std::fmt::Debug for Emitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Emitter")
            .field("interval_ms", &self.interval_ms)
            .field("playing", &self.playing)
            .field("elapsed_ms", &self.elapsed_ms)
            .finish_non_exhaustive()
    }
}

/// Registry of emitters.
#[derive(Debug, Default)]
pub struct EmitterState {
    emitters: BTreeMap<EmitterId, Emitter>,
    next_id: u32,
}

impl EmitterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a stopped emitter.
    pub fn add(&mut self, emitter: Emitter) -> EmitterId {
        let id = EmitterId(self.next_id);
        self.next_id += 1;
        self.emitters.insert(id, emitter);
        id
    }

    pub fn get(&self, id: EmitterId) -> Option<&Emitter> {
        self.emitters.get(&id)
    }

    /// Start playing. Returns true if the emitter was stopped, meaning the
    /// caller should fire it once right away.
    pub fn start(&mut self, id: EmitterId) -> bool {
        match self.emitters.get_mut(&id) {
            Some(emitter) if !emitter.playing => {
                emitter.playing = true;
                emitter.elapsed_ms = 0.0;
                true
            }
            _ => false,
        }
    }

    /// Halt emission without removing the emitter.
    pub fn stop(&mut self, id: EmitterId) {
        if let Some(emitter) = self.emitters.get_mut(&id) {
            emitter.playing = false;
        }
    }

    pub fn remove(&mut self, id: EmitterId) -> bool {
        self.emitters.remove(&id).is_some()
    }

    pub fn is_playing(&self, id: EmitterId) -> bool {
        self.emitters.get(&id).is_some_and(|e| e.playing)
    }

    /// Advance every playing emitter. Returns one entry per due emission,
    /// ordered by emitter id.
    pub fn advance(&mut self, dt_ms: f64) -> Vec<EmitterId> {
        let mut due = Vec::new();
        for (&id, emitter) in self.emitters.iter_mut() {
            for _ in 0..emitter.advance(dt_ms) {
                due.push(id);
            }
        }
        due
    }

    /// Take the factory out of its slot so it can run against the context.
    pub fn take_factory(&mut self, id: EmitterId) -> Option<EmitterFactory> {
        self.emitters.get_mut(&id)?.factory.take()
    }

    /// Put a factory back. Dropped if the emitter was removed meanwhile.
    pub fn restore_factory(&mut self, id: EmitterId, factory: EmitterFactory) {
        if let Some(emitter) = self.emitters.get_mut(&id) {
            emitter.factory.get_or_insert(factory);
        }
    }

    pub fn len(&self) -> usize {
        self.emitters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.emitters.is_empty()
    }

    pub fn clear(&mut self) {
        self.emitters.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop() -> EmitterFactory {
        Box::new(|_| {})
    }

    #[test]
    fn stopped_emitters_never_fire() {
        let mut emitters = EmitterState::new();
        emitters.add(Emitter::new(100.0, noop()));
        assert!(emitters.advance(1000.0).is_empty());
    }

    #[test]
    fn start_reports_first_fire_once() {
        let mut emitters = EmitterState::new();
        let id = emitters.add(Emitter::new(100.0, noop()));
        assert!(emitters.start(id));
        assert!(!emitters.start(id));
        assert!(emitters.is_playing(id));
    }

    #[test]
    fn interval_crossings_are_counted() {
        let mut emitters = EmitterState::new();
        let id = emitters.add(Emitter::new(100.0, noop()));
        emitters.start(id);

        assert!(emitters.advance(60.0).is_empty());
        assert_eq!(emitters.advance(60.0), vec![id]);
        assert_eq!(emitters.advance(250.0), vec![id, id]);

        emitters.stop(id);
        assert!(emitters.advance(500.0).is_empty());
    }

    #[test]
    fn due_emissions_are_ordered_by_id() {
        let mut emitters = EmitterState::new();
        let ids: Vec<EmitterId> = (0..16).map(|_| emitters.add(Emitter::new(100.0, noop()))).collect();
        for &id in ids.iter().rev() {
            emitters.start(id);
        }
        assert_eq!(emitters.advance(100.0), ids);
    }

    #[test]
    fn factory_round_trip() {
        let mut emitters = EmitterState::new();
        let id = emitters.add(Emitter::new(100.0, noop()));
        let factory = emitters.take_factory(id).unwrap();
        assert!(emitters.take_factory(id).is_none());
        emitters.restore_factory(id, factory);
        assert!(emitters.take_factory(id).is_some());

        emitters.remove(id);
        emitters.restore_factory(id, noop());
        assert!(emitters.get(id).is_none());
    }
}
