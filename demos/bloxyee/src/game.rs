use glam::Vec2;
use tinsel_engine::{
    grid, keys, Control, Edge, EngineContext, Game, GridLayout, HitOptions, HitTarget, LoadProgress, NodeId,
    ParticleEffect, Texture, Wobble,
};

const BLOCK_COLUMNS: u32 = 8;
const BLOCK_ROWS: u32 = 5;
const WALL_TOP: f32 = 48.0;
const PADDLE_SPEED: f32 = 8.0;
const BALL_SPEED: f32 = 6.0;
const RESTART_DELAY_MS: f64 = 3000.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Phase {
    Play,
    Over,
}

#[derive(Debug, Clone, Copy)]
struct Board {
    paddle: NodeId,
    ball: NodeId,
    blocks: NodeId,
    score_text: NodeId,
    message: NodeId,
}

/// Paddle and blocks: knock every block out of the wall to finish a round.
#[derive(Default)]
pub struct Bloxyee {
    board: Option<Board>,
    block: Option<Texture>,
    star: Option<Texture>,
    score: u32,
}

impl Bloxyee {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    fn build_wall(&self, ctx: &mut EngineContext) -> Option<NodeId> {
        let texture = self.block?;
        let layout = GridLayout::new(BLOCK_COLUMNS, BLOCK_ROWS, Vec2::new(texture.width, texture.height))
            .with_offset(Vec2::new(0.0, WALL_TOP));
        Some(grid(&mut ctx.scene, layout, |scene| scene.sprite(texture)))
    }

    fn show_score(&self, ctx: &mut EngineContext, board: Board) {
        if let Some(text) = ctx.scene.get_mut(board.score_text) {
            text.set_content(format!("score: {}", self.score));
        }
    }

    fn steer(ctx: &mut EngineContext, paddle: NodeId) {
        let left = ctx.input.key(keys::LEFT).is_down;
        let right = ctx.input.key(keys::RIGHT).is_down;
        let direction = match (left, right) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        };
        if let Some(node) = ctx.scene.get_mut(paddle) {
            node.vel.x = direction * PADDLE_SPEED;
        }
        ctx.scene.move_by_velocity(paddle);
        ctx.contain_in_stage(paddle, false);
    }

    fn break_blocks(&mut self, ctx: &mut EngineContext, board: Board) {
        let wall = HitTarget::children_of(&ctx.scene, board.blocks);
        let mut struck = Vec::new();
        ctx.hit_each(board.ball, &wall, HitOptions::default(), |_, _, block| struck.push(block));
        let Some(&first) = struck.first() else { return };

        // One bounce per frame however many blocks the ball overlaps.
        ctx.hit(board.ball, &HitTarget::One(first), HitOptions::bounce());
        for block in struck {
            let center = ctx.scene.global_center(block);
            ctx.scene.destroy_later(block);
            self.score += 1;
            if let (Some(center), Some(star)) = (center, self.star) {
                ctx.particle_effect(&ParticleEffect::new(center).with_count(12), move |scene| scene.sprite(star));
            }
        }
        self.show_score(ctx, board);
    }

    fn miss(&mut self, ctx: &mut EngineContext, board: Board) {
        self.score = self.score.saturating_sub(1);
        ctx.shake(board.blocks, 6.0, false);
        self.show_score(ctx, board);
    }

    fn finish(&mut self, ctx: &mut EngineContext, control: &mut Control<Self>, board: Board) {
        log::info!("wall cleared, score {}", self.score);
        control.set_state(Phase::Over);
        if let Some(ball) = ctx.scene.get_mut(board.ball) {
            ball.vel = Vec2::ZERO;
        }
        if let Some(message) = ctx.scene.get_mut(board.message) {
            message.set_content(format!("Final score: {}", self.score));
            message.visible = true;
        }
        let stage = ctx.scene.stage();
        ctx.scene.put_center(stage, board.message, Vec2::ZERO);
        ctx.fade_out(board.paddle, 30);
        control.wait(RESTART_DELAY_MS).then(|game, ctx, control| game.restart(ctx, control));
    }

    fn restart(&mut self, ctx: &mut EngineContext, control: &mut Control<Self>) {
        let Some(mut board) = self.board else { return };
        ctx.scene.destroy(board.blocks);
        let Some(blocks) = self.build_wall(ctx) else { return };
        board.blocks = blocks;
        self.board = Some(board);

        self.score = 0;
        self.show_score(ctx, board);
        if let Some(message) = ctx.scene.get_mut(board.message) {
            message.visible = false;
        }
        ctx.fade_in(board.paddle, 30);
        serve(ctx, board.ball);
        control.set_state(Phase::Play);
    }
}

/// Put the ball in the middle of the stage heading down.
fn serve(ctx: &mut EngineContext, ball: NodeId) {
    let stage = ctx.scene.stage();
    ctx.scene.put_center(stage, ball, Vec2::ZERO);
    let drift = if ctx.random_int(0, 1) == 0 { -3.0 } else { 3.0 };
    if let Some(node) = ctx.scene.get_mut(ball) {
        node.vel = Vec2::new(drift, BALL_SPEED);
    }
}

impl Game for Bloxyee {
    type State = Phase;

    fn initial_state(&self) -> Phase {
        Phase::Play
    }

    fn load(&mut self, progress: LoadProgress<'_>) {
        log::info!("loading {} ({}/{})", progress.path, progress.loaded, progress.total);
    }

    fn setup(&mut self, ctx: &mut EngineContext, control: &mut Control<Self>) {
        self.block = ctx.assets.texture("block.png");
        self.star = ctx.assets.texture("star.png");
        let (Some(paddle), Some(ball)) = (ctx.sprite("paddle.png"), ctx.sprite("ball.png")) else {
            log::error!("paddle or ball texture missing");
            return;
        };
        let Some(blocks) = self.build_wall(ctx) else {
            log::error!("block texture missing");
            return;
        };

        let stage = ctx.scene.stage();
        ctx.scene.put_bottom(stage, paddle, Vec2::new(0.0, -24.0));
        serve(ctx, ball);

        let score_text = ctx.scene.text("score: 0", "16px sans-serif", "white", Vec2::new(8.0, 8.0));
        let message = ctx.scene.text("", "32px sans-serif", "white", Vec2::ZERO);
        if let Some(node) = ctx.scene.get_mut(message) {
            node.visible = false;
        }
        self.board = Some(Board { paddle, ball, blocks, score_text, message });

        control.on_key_press(keys::SPACE, |_, _, control| {
            if control.is_paused() {
                control.resume();
            } else {
                control.pause();
            }
        });
    }

    fn update(&mut self, phase: Phase, ctx: &mut EngineContext, control: &mut Control<Self>) {
        let Some(board) = self.board else { return };
        if phase == Phase::Over {
            return;
        }

        Self::steer(ctx, board.paddle);
        ctx.scene.move_by_velocity(board.ball);
        if ctx.contain_in_stage(board.ball, true) == Some(Edge::Bottom) {
            self.miss(ctx, board);
        }

        if ctx.hit(board.ball, &HitTarget::One(board.paddle), HitOptions::bounce()).is_some() {
            let squash = Wobble { scale: Vec2::new(1.3, 1.2), frames: 6, ..Wobble::default() };
            ctx.wobble(board.paddle, squash);
        }

        self.break_blocks(ctx, board);
        if ctx.scene.group_is_empty(board.blocks) {
            self.finish(ctx, control, board);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tinsel_engine::{Engine, InputEvent, MemorySource};

    const ASSETS: [&str; 4] = ["paddle.png", "ball.png", "block.png", "star.png"];
    const DT: f32 = 1.0 / 60.0;

    fn source() -> MemorySource {
        let mut source = MemorySource::new();
        source.insert_image("paddle.png", 96.0, 16.0);
        source.insert_image("ball.png", 16.0, 16.0);
        source.insert_image("block.png", 64.0, 32.0);
        source.insert_image("star.png", 16.0, 16.0);
        source
    }

    fn running() -> Engine<Bloxyee> {
        let mut engine = Engine::new(Bloxyee::new());
        engine.start(ASSETS.as_slice(), &mut source()).unwrap();
        engine
    }

    fn board(engine: &Engine<Bloxyee>) -> Board {
        engine.game().board.unwrap()
    }

    /// Ball just under the first block of the bottom row, moving up.
    fn aim_at_bottom_row(engine: &mut Engine<Bloxyee>) {
        let ball = board(engine).ball;
        let node = engine.context_mut().scene.get_mut(ball).unwrap();
        node.pos = Vec2::new(20.0, 210.0);
        node.vel = Vec2::new(0.0, -BALL_SPEED);
    }

    #[test]
    fn setup_lays_out_the_board() {
        let engine = running();
        let board = board(&engine);
        let scene = &engine.context().scene;
        assert_eq!(scene.children(board.blocks).len(), 40);
        assert_eq!(scene.get(board.paddle).unwrap().pos, Vec2::new(208.0, 488.0));
        assert_eq!(scene.get(board.ball).unwrap().pos, Vec2::new(248.0, 248.0));
        assert!(!scene.get(board.message).unwrap().visible);
    }

    #[test]
    fn ball_breaks_a_block_and_bounces() {
        let mut engine = running();
        aim_at_bottom_row(&mut engine);
        engine.tick(DT);

        let board = board(&engine);
        let ctx = engine.context();
        assert_eq!(ctx.scene.children(board.blocks).len(), 39);
        assert_eq!(engine.game().score(), 1);
        assert_eq!(ctx.particles.len(), 12);
        let ball = ctx.scene.get(board.ball).unwrap();
        assert_eq!(ball.pos.y, 208.0);
        assert_eq!(ball.vel.y, BALL_SPEED);
    }

    #[test]
    fn missed_ball_costs_a_point() {
        let mut engine = running();
        engine.game_mut().score = 3;
        let ball = board(&engine).ball;
        let node = engine.context_mut().scene.get_mut(ball).unwrap();
        node.pos = Vec2::new(400.0, 500.0);
        node.vel = Vec2::new(0.0, BALL_SPEED);

        engine.tick(DT);
        assert_eq!(engine.game().score(), 2);
        assert_eq!(engine.context().scene.get(ball).unwrap().vel.y, -BALL_SPEED);
    }

    #[test]
    fn arrow_keys_steer_the_paddle_inside_the_stage() {
        let mut engine = running();
        let paddle = board(&engine).paddle;
        engine.push_input(InputEvent::KeyDown { key_code: keys::RIGHT });
        engine.tick(DT);
        assert_eq!(engine.context().scene.get(paddle).unwrap().pos.x, 216.0);

        for _ in 0..40 {
            engine.tick(DT);
        }
        assert_eq!(engine.context().scene.get(paddle).unwrap().pos.x, 416.0);
    }

    #[test]
    fn space_toggles_pause() {
        let mut engine = running();
        engine.push_input(InputEvent::KeyDown { key_code: keys::SPACE });
        engine.tick(DT);
        assert!(engine.control().is_paused());

        engine.push_input(InputEvent::KeyUp { key_code: keys::SPACE });
        engine.push_input(InputEvent::KeyDown { key_code: keys::SPACE });
        engine.tick(DT);
        assert!(!engine.control().is_paused());
    }

    #[test]
    fn clearing_the_wall_ends_the_round_then_restarts() {
        let mut engine = running();
        let blocks = board(&engine).blocks;
        let cells = engine.context().scene.children(blocks).to_vec();
        for &cell in &cells[..32] {
            engine.context_mut().scene.destroy(cell);
        }
        for &cell in &cells[33..] {
            engine.context_mut().scene.destroy(cell);
        }
        aim_at_bottom_row(&mut engine);

        engine.tick(DT);
        engine.tick(DT);
        assert_eq!(engine.control().state(), Phase::Over);
        let message = board(&engine).message;
        assert!(engine.context().scene.get(message).unwrap().visible);

        for _ in 0..4 {
            engine.tick(1.0);
        }
        let board = board(&engine);
        assert_eq!(engine.control().state(), Phase::Play);
        assert_eq!(engine.game().score(), 0);
        assert_eq!(engine.context().scene.children(board.blocks).len(), 40);
        assert!(!engine.context().scene.get(board.message).unwrap().visible);
    }
}
