use tinsel_engine::{
    DisplayInstance, Engine, EnginePhase, Fetched, Game, InputEvent, MemorySource,
};

/// Generic game runner that wires the engine to a browser host.
///
/// Each concrete game creates a `thread_local!` GameRunner and exports free
/// functions via `#[wasm_bindgen]`, because wasm-bindgen cannot export generic
/// structs directly. The host fetches every asset itself and pushes the
/// results in before calling `start`.
pub struct GameRunner<G: Game> {
    engine: Engine<G>,
    source: MemorySource,
    /// Asset paths in the order the host added them.
    paths: Vec<String>,
}

impl<G: Game> GameRunner<G> {
    pub fn new(game: G) -> Self {
        Self {
            engine: Engine::new(game),
            source: MemorySource::new(),
            paths: Vec::new(),
        }
    }

    fn add_asset(&mut self, path: &str, fetched: Fetched) {
        if !self.paths.iter().any(|p| p == path) {
            self.paths.push(path.to_owned());
        }
        self.source.insert(path, fetched);
    }

    /// Text content of a JSON asset.
    pub fn add_asset_text(&mut self, path: &str, text: &str) {
        self.add_asset(path, Fetched::Text(text.to_owned()));
    }

    /// A decoded image, reported by its pixel size.
    pub fn add_asset_image(&mut self, path: &str, width: f32, height: f32) {
        self.add_asset(path, Fetched::Image { width, height });
    }

    /// A sound or font the host has already decoded or registered.
    pub fn add_asset_media(&mut self, path: &str, is_font: bool) {
        let fetched = if is_font { Fetched::Font } else { Fetched::Audio };
        self.add_asset(path, fetched);
    }

    /// Load every added asset and run the game's setup.
    /// Returns false if loading failed; the host may add assets and retry.
    pub fn start(&mut self) -> bool {
        match self.engine.start(self.paths.as_slice(), &mut self.source) {
            Ok(()) => true,
            Err(err) => {
                log::error!("start failed: {}", err);
                false
            }
        }
    }

    pub fn game(&self) -> &G {
        self.engine.game()
    }

    pub fn is_running(&self) -> bool {
        self.engine.phase() == EnginePhase::Running
    }

    /// Push an input event into the queue.
    pub fn push_input(&mut self, event: InputEvent) {
        self.engine.push_input(event);
    }

    /// Run one host frame; `dt` in seconds.
    pub fn tick(&mut self, dt: f32) {
        self.engine.tick(dt);
    }

    pub fn set_pointer_scale(&mut self, scale: f32) {
        self.engine.set_pointer_scale(scale);
    }

    // ---- Pointer accessors for host reads ----

    pub fn display_ptr(&self) -> *const f32 {
        self.engine.display_list().instances_ptr()
    }

    pub fn display_count(&self) -> u32 {
        self.engine.display_list().instance_count()
    }

    pub fn display_stride(&self) -> u32 {
        DisplayInstance::FLOATS as u32
    }

    /// Text and rectangle styling for this frame, as JSON.
    pub fn display_extras(&self) -> String {
        self.engine.display_list().extras_json()
    }

    pub fn world_width(&self) -> f32 {
        self.engine.config().width
    }

    pub fn world_height(&self) -> f32 {
        self.engine.config().height
    }
}
