pub mod runner;

pub use runner::GameRunner;

// Used by `export_game!` expansions in game crates.
#[doc(hidden)]
pub use {console_error_panic_hook, console_log, log, tinsel_engine, wasm_bindgen, web_sys};

/// Generate all `#[wasm_bindgen]` exports for a game.
///
/// Generates:
/// - `thread_local!` storage for the GameRunner
/// - `with_runner()` helper function
/// - All wasm-bindgen exports (init, asset intake, start, tick, input, display list)
///
/// # Usage
///
/// ```ignore
/// use wasm_bindgen::prelude::*;
///
/// mod game;
/// use game::Bloxyee;
///
/// tinsel_web::export_game!(Bloxyee, "bloxyee");
/// ```
///
/// # Arguments
///
/// - `$game_type`: The game struct type that implements `tinsel_engine::Game`
///   and provides `fn new() -> Self`
/// - `$game_name`: A string literal used in the initialization log message
#[macro_export]
macro_rules! export_game {
    ($game_type:ty, $game_name:literal) => {
        use std::cell::RefCell;
        use $crate::GameRunner;
        use $crate::tinsel_engine::InputEvent;

        thread_local! {
            static RUNNER: RefCell<Option<GameRunner<$game_type>>> = RefCell::new(None);
        }

        /// Runs `f` against the runner. Before `game_init` the logger is not
        /// installed yet, so the complaint goes straight to the console.
        fn with_runner<R: Default>(f: impl FnOnce(&mut GameRunner<$game_type>) -> R) -> R {
            RUNNER.with(|cell| match cell.borrow_mut().as_mut() {
                Some(runner) => f(runner),
                None => {
                    let message = format!("{}: game_init() has not been called", $game_name);
                    $crate::web_sys::console::warn_1(&$crate::wasm_bindgen::JsValue::from_str(&message));
                    R::default()
                }
            })
        }

        #[wasm_bindgen]
        pub fn game_init() {
            $crate::console_error_panic_hook::set_once();
            let _ = $crate::console_log::init_with_level($crate::log::Level::Info);

            let game = <$game_type>::new();
            let runner = GameRunner::new(game);

            RUNNER.with(|cell| {
                *cell.borrow_mut() = Some(runner);
            });
            $crate::log::info!("{}: initialized", $game_name);
        }

        // ---- Asset intake ----

        #[wasm_bindgen]
        pub fn game_add_asset_text(path: &str, text: &str) {
            with_runner(|r| r.add_asset_text(path, text));
        }

        #[wasm_bindgen]
        pub fn game_add_asset_image(path: &str, width: f32, height: f32) {
            with_runner(|r| r.add_asset_image(path, width, height));
        }

        #[wasm_bindgen]
        pub fn game_add_asset_media(path: &str, is_font: bool) {
            with_runner(|r| r.add_asset_media(path, is_font));
        }

        #[wasm_bindgen]
        pub fn game_start() -> bool {
            with_runner(|r| r.start())
        }

        #[wasm_bindgen]
        pub fn game_tick(dt: f32) {
            with_runner(|r| r.tick(dt));
        }

        // ---- Input ----

        #[wasm_bindgen]
        pub fn game_pointer_down(x: f32, y: f32) {
            with_runner(|r| r.push_input(InputEvent::PointerDown { x, y }));
        }

        #[wasm_bindgen]
        pub fn game_pointer_up(x: f32, y: f32) {
            with_runner(|r| r.push_input(InputEvent::PointerUp { x, y }));
        }

        #[wasm_bindgen]
        pub fn game_pointer_move(x: f32, y: f32) {
            with_runner(|r| r.push_input(InputEvent::PointerMove { x, y }));
        }

        #[wasm_bindgen]
        pub fn game_key_down(key_code: u32) {
            with_runner(|r| r.push_input(InputEvent::KeyDown { key_code }));
        }

        #[wasm_bindgen]
        pub fn game_key_up(key_code: u32) {
            with_runner(|r| r.push_input(InputEvent::KeyUp { key_code }));
        }

        #[wasm_bindgen]
        pub fn game_set_pointer_scale(scale: f32) {
            with_runner(|r| r.set_pointer_scale(scale));
        }

        // ---- Display list ----

        #[wasm_bindgen]
        pub fn get_display_ptr() -> *const f32 {
            RUNNER.with(|cell| {
                cell.borrow()
                    .as_ref()
                    .map_or(std::ptr::null(), |r| r.display_ptr())
            })
        }

        #[wasm_bindgen]
        pub fn get_display_count() -> u32 {
            with_runner(|r| r.display_count())
        }

        #[wasm_bindgen]
        pub fn get_display_stride() -> u32 {
            with_runner(|r| r.display_stride())
        }

        #[wasm_bindgen]
        pub fn get_display_extras() -> String {
            with_runner(|r| r.display_extras())
        }

        #[wasm_bindgen]
        pub fn get_world_width() -> f32 {
            with_runner(|r| r.world_width())
        }

        #[wasm_bindgen]
        pub fn get_world_height() -> f32 {
            with_runner(|r| r.world_height())
        }
    };
}
