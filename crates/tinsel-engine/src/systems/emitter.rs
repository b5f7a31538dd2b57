use crate::api::game::EngineContext;
use crate::api::types::EmitterId;

/// Run one emission. The factory is taken out of the registry while it runs so
/// it can use the whole context, then put back.
pub fn fire_emitter(ctx: &mut EngineContext, id: EmitterId) {
    let Some(mut factory) = ctx.emitters.take_factory(id) else {
        log::debug!("emitter {:?} has no factory to run", id);
        return;
    };
    factory(ctx);
    ctx.emitters.restore_factory(id, factory);
}

/// Advance every playing emitter by `dt_ms` and run the emissions that came due.
/// This is a free function because factories need the whole context.
pub fn tick_emitters(ctx: &mut EngineContext, dt_ms: f64) -> usize {
    let due = ctx.emitters.advance(dt_ms);
    for &id in &due {
        // Stopped or removed by an earlier emission this frame.
        if ctx.emitters.is_playing(id) {
            fire_emitter(ctx, id);
        }
    }
    due.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::game::GameConfig;
    use crate::components::sprite::{Texture, TextureId};
    use crate::systems::particles::ParticleEffect;
    use glam::Vec2;

    fn ctx() -> EngineContext {
        EngineContext::new(&GameConfig::default())
    }

    fn burst(count: u32) -> impl FnMut(&mut EngineContext) + 'static {
        move |ctx: &mut EngineContext| {
            let effect = ParticleEffect::new(Vec2::new(50.0, 50.0)).with_count(count);
            let texture = Texture::new(TextureId(0), 4.0, 4.0);
            ctx.particle_effect(&effect, |scene| scene.sprite(texture));
        }
    }

    #[test]
    fn tick_emitters_spawns_on_interval() {
        let mut ctx = ctx();
        let id = ctx.emitter(100.0, burst(2));
        ctx.play_emitter(id);
        assert_eq!(ctx.particles.len(), 2);

        tick_emitters(&mut ctx, 50.0);
        assert_eq!(ctx.particles.len(), 2);
        tick_emitters(&mut ctx, 60.0);
        assert_eq!(ctx.particles.len(), 4);
    }

    #[test]
    fn stopped_emitter_is_silent() {
        let mut ctx = ctx();
        let id = ctx.emitter(100.0, burst(1));
        ctx.play_emitter(id);
        ctx.stop_emitter(id);
        assert_eq!(tick_emitters(&mut ctx, 1000.0), 0);
        assert_eq!(ctx.particles.len(), 1);
        assert!(ctx.emitters.get(id).is_some());
    }

    #[test]
    fn emitter_can_stop_itself() {
        let mut ctx = ctx();
        let id = EmitterId(0);
        let mut fired = 0;
        let own = ctx.emitter(10.0, move |ctx| {
            fired += 1;
            if fired == 2 {
                ctx.stop_emitter(id);
            }
        });
        assert_eq!(own, id);
        ctx.play_emitter(own);
        tick_emitters(&mut ctx, 100.0);
        assert!(!ctx.emitters.is_playing(own));
    }
}
