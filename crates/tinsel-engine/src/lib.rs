pub mod api;
pub mod core;
pub mod components;
pub mod systems;
pub mod renderer;
pub mod input;
pub mod assets;
pub mod extensions;

// Re-export key types at crate root for convenience
pub use api::control::{Control, Trigger, Wait};
pub use api::engine::{Engine, EnginePhase};
pub use api::error::{AssetError, EngineError, SceneError};
pub use api::game::{EngineContext, Game, GameConfig};
pub use api::types::{Bounds, Edge, EmitterId, NodeId, TimerId, TweenId};
pub use assets::loader::{load_assets, AssetKind, AssetSource, Fetched, LoadProgress, MemorySource};
pub use assets::registry::{AssetTable, FontId, SoundId, TextureRegion};
pub use components::node::{DisplayNode, NodeKind};
pub use components::sprite::{ButtonState, SpriteComponent, Texture, TextureId};
pub use core::collision::{contain, contain_then, hit, hit_each, hit_test_point, overlaps, HitOptions, HitTarget};
pub use core::layout::{grid, GridLayout};
pub use core::scene::Scene;
pub use core::state::StateMachine;
pub use core::time::FixedTimestep;
pub use input::keys;
pub use input::queue::{InputEvent, InputQueue};
pub use input::state::{InputEdge, InputState, KeyState, PointerState};
pub use renderer::instance::{DisplayExtra, DisplayInstance, DisplayList};
pub use systems::particles::{ParticleEffect, ParticleSystem};
pub use systems::render::build_display_list;
pub use systems::rng::Rng;

// Extensions: procedural animation
pub use extensions::{
    Easing, lerp, lerp_vec2, ease,
    ShakeState, Tween, TweenLoop, TweenState, TweenTarget, Wobble,
};
