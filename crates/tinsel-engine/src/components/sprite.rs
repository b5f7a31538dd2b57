//! Sprite component: one or more texture frames plus frame playback state.

/// Index of a texture region in the asset table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TextureId(pub u32);

/// A texture region handle with its natural size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Texture {
    pub id: TextureId,
    pub width: f32,
    pub height: f32,
}

impl Texture {
    pub fn new(id: TextureId, width: f32, height: f32) -> Self {
        Self { id, width, height }
    }
}

/// Frame playback for multi-frame sprites.
#[derive(Debug, Clone)]
pub struct FrameAnimation {
    /// Frames per second.
    pub fps: f32,
    /// Current frame index.
    pub frame_index: usize,
    /// Time accumulated in the current frame, in seconds.
    pub frame_timer: f32,
    /// Whether the sprite is cycling frames.
    pub playing: bool,
    /// Wrap back to the first frame of the range.
    pub looping: bool,
    /// Inclusive frame range being played.
    range: Option<(usize, usize)>,
}

impl Default for FrameAnimation {
    fn default() -> Self {
        Self {
            fps: 12.0,
            frame_index: 0,
            frame_timer: 0.0,
            playing: false,
            looping: true,
            range: None,
        }
    }
}

impl FrameAnimation {
    fn bounds(&self, frame_count: usize) -> (usize, usize) {
        let last = frame_count.saturating_sub(1);
        match self.range {
            Some((start, end)) => (start.min(last), end.min(last)),
            None => (0, last),
        }
    }

    /// Advance by dt seconds. Returns true if the frame changed.
    pub fn tick(&mut self, dt: f32, frame_count: usize) -> bool {
        if !self.playing || frame_count < 2 || self.fps <= 0.0 {
            return false;
        }

        let frame_duration = 1.0 / self.fps;
        let (start, end) = self.bounds(frame_count);
        self.frame_timer += dt;
        let mut changed = false;

        while self.frame_timer >= frame_duration {
            self.frame_timer -= frame_duration;
            if self.frame_index >= end {
                if self.looping {
                    self.frame_index = start;
                } else {
                    self.playing = false;
                    self.frame_timer = 0.0;
                    break;
                }
            } else {
                self.frame_index += 1;
            }
            changed = true;
        }

        changed
    }
}

/// Pointer interaction state of a button sprite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonState {
    #[default]
    Up,
    Over,
    Down,
}

impl ButtonState {
    /// Frame shown for this state: up, over, down.
    pub fn frame(self) -> usize {
        match self {
            ButtonState::Up => 0,
            ButtonState::Over => 1,
            ButtonState::Down => 2,
        }
    }
}

/// Sprite component: frames and playback.
#[derive(Debug, Clone)]
pub struct SpriteComponent {
    pub frames: Vec<Texture>,
    pub animation: FrameAnimation,
    /// Present when the sprite acts as a button.
    pub button: Option<ButtonState>,
}

impl SpriteComponent {
    pub fn new(frame: Texture) -> Self {
        Self::with_frames(vec![frame])
    }

    pub fn with_frames(frames: Vec<Texture>) -> Self {
        Self {
            frames,
            animation: FrameAnimation::default(),
            button: None,
        }
    }

    /// Whether this sprite has more than one frame.
    pub fn is_animated(&self) -> bool {
        self.frames.len() > 1
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn current_frame(&self) -> Option<Texture> {
        self.frames.get(self.animation.frame_index).copied()
    }

    /// Start cycling frames from the current one.
    pub fn play(&mut self) {
        if self.is_animated() {
            self.animation.range = None;
            self.animation.playing = true;
        }
    }

    /// Cycle through an inclusive frame range.
    pub fn play_range(&mut self, start: usize, end: usize) {
        if !self.is_animated() {
            return;
        }
        let (start, end) = if start <= end { (start, end) } else { (end, start) };
        self.animation.range = Some((start, end));
        self.animation.frame_index = start.min(self.frames.len() - 1);
        self.animation.frame_timer = 0.0;
        self.animation.playing = true;
    }

    /// Stop on the current frame.
    pub fn stop(&mut self) {
        self.animation.playing = false;
        self.animation.frame_timer = 0.0;
    }

    /// Stop and display a specific frame. Out of range indexes are clamped.
    pub fn show(&mut self, frame: usize) {
        self.stop();
        self.animation.frame_index = frame.min(self.frames.len().saturating_sub(1));
    }

    pub fn is_playing(&self) -> bool {
        self.animation.playing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frames(n: u32) -> Vec<Texture> {
        (0..n).map(|i| Texture::new(TextureId(i), 16.0, 16.0)).collect()
    }

    #[test]
    fn single_frame_sprite_never_plays() {
        let mut sprite = SpriteComponent::new(Texture::new(TextureId(0), 32.0, 32.0));
        sprite.play();
        assert!(!sprite.is_playing());
        assert!(!sprite.animation.tick(1.0, sprite.frame_count()));
    }

    #[test]
    fn play_cycles_and_loops() {
        let mut sprite = SpriteComponent::with_frames(frames(3));
        sprite.animation.fps = 10.0;
        sprite.play();

        let count = sprite.frame_count();
        assert!(sprite.animation.tick(0.15, count));
        assert_eq!(sprite.animation.frame_index, 1);

        sprite.animation.tick(0.2, count);
        assert_eq!(sprite.animation.frame_index, 0);
    }

    #[test]
    fn show_stops_on_frame() {
        let mut sprite = SpriteComponent::with_frames(frames(3));
        sprite.play();
        sprite.show(2);
        assert!(!sprite.is_playing());
        assert_eq!(sprite.current_frame().unwrap().id, TextureId(2));

        sprite.show(10);
        assert_eq!(sprite.animation.frame_index, 2);
    }

    #[test]
    fn non_looping_range_stops_at_end() {
        let mut sprite = SpriteComponent::with_frames(frames(4));
        sprite.animation.fps = 10.0;
        sprite.animation.looping = false;
        sprite.play_range(1, 2);

        sprite.animation.tick(0.35, 4);
        assert_eq!(sprite.animation.frame_index, 2);
        assert!(!sprite.is_playing());
    }

    #[test]
    fn button_frames() {
        assert_eq!(ButtonState::Up.frame(), 0);
        assert_eq!(ButtonState::Over.frame(), 1);
        assert_eq!(ButtonState::Down.frame(), 2);
    }
}
