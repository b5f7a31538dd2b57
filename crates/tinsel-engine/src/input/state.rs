use std::collections::HashSet;

use glam::Vec2;

use crate::api::types::NodeId;
use crate::components::sprite::ButtonState;
use crate::core::collision::hit_test_point;
use crate::core::scene::Scene;
use crate::input::queue::InputEvent;

/// Snapshot of one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyState {
    pub is_down: bool,
    pub is_up: bool,
}

/// Pointer position in stage space plus press state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerState {
    pub pos: Vec2,
    pub is_down: bool,
    /// Set on the frame a quick press-release completes.
    pub tapped: bool,
    down_at_ms: f64,
}

impl PointerState {
    pub fn x(&self) -> f32 {
        self.pos.x
    }

    pub fn y(&self) -> f32 {
        self.pos.y
    }

    pub fn is_up(&self) -> bool {
        !self.is_down
    }
}

/// Edge transitions produced while processing a frame's input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEdge {
    KeyPress(u32),
    KeyRelease(u32),
    PointerPress(Vec2),
    PointerRelease(Vec2),
    Tap(Vec2),
    ButtonPress(NodeId),
    ButtonRelease(NodeId),
}

#[derive(Debug, Clone, Copy)]
struct Drag {
    node: NodeId,
    last: Vec2,
}

/// Keyboard and pointer state with edge detection, buttons and dragging.
#[derive(Debug)]
pub struct InputState {
    keys_down: HashSet<u32>,
    pointer: PointerState,
    /// Host pixels per stage unit.
    scale: f32,
    tap_threshold_ms: f64,
    pressed_button: Option<NodeId>,
    drag: Option<Drag>,
}

impl InputState {
    pub fn new(tap_threshold_ms: f64) -> Self {
        Self {
            keys_down: HashSet::new(),
            pointer: PointerState {
                pos: Vec2::ZERO,
                is_down: false,
                tapped: false,
                down_at_ms: 0.0,
            },
            scale: 1.0,
            tap_threshold_ms,
            pressed_button: None,
            drag: None,
        }
    }

    pub fn key(&self, key_code: u32) -> KeyState {
        let is_down = self.keys_down.contains(&key_code);
        KeyState { is_down, is_up: !is_down }
    }

    pub fn is_key_down(&self, key_code: u32) -> bool {
        self.keys_down.contains(&key_code)
    }

    pub fn pointer(&self) -> &PointerState {
        &self.pointer
    }

    /// Host coordinates are divided by this factor. Non-positive values are ignored.
    pub fn set_scale(&mut self, scale: f32) {
        if scale > 0.0 && scale.is_finite() {
            self.scale = scale;
        }
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Node currently being dragged.
    pub fn dragging(&self) -> Option<NodeId> {
        self.drag.map(|d| d.node)
    }

    /// Apply a frame of raw events and return the edges they produced, in order.
    pub fn process(&mut self, events: &[InputEvent], scene: &mut Scene, now_ms: f64) -> Vec<InputEdge> {
        self.pointer.tapped = false;
        let mut edges = Vec::new();

        for &event in events {
            match event {
                InputEvent::KeyDown { key_code } => {
                    if self.keys_down.insert(key_code) {
                        edges.push(InputEdge::KeyPress(key_code));
                    }
                }
                InputEvent::KeyUp { key_code } => {
                    if self.keys_down.remove(&key_code) {
                        edges.push(InputEdge::KeyRelease(key_code));
                    }
                }
                InputEvent::PointerMove { x, y } => {
                    self.pointer.pos = Vec2::new(x, y) / self.scale;
                    self.move_drag(scene);
                    self.hover_buttons(scene);
                }
                InputEvent::PointerDown { x, y } => {
                    self.pointer.pos = Vec2::new(x, y) / self.scale;
                    if self.pointer.is_down {
                        continue;
                    }
                    self.pointer.is_down = true;
                    self.pointer.down_at_ms = now_ms;
                    edges.push(InputEdge::PointerPress(self.pointer.pos));
                    self.press(scene, &mut edges);
                }
                InputEvent::PointerUp { x, y } => {
                    self.pointer.pos = Vec2::new(x, y) / self.scale;
                    if !self.pointer.is_down {
                        continue;
                    }
                    self.pointer.is_down = false;
                    edges.push(InputEdge::PointerRelease(self.pointer.pos));
                    if now_ms - self.pointer.down_at_ms <= self.tap_threshold_ms {
                        self.pointer.tapped = true;
                        edges.push(InputEdge::Tap(self.pointer.pos));
                    }
                    self.release(scene, &mut edges);
                }
            }
        }
        edges
    }

    /// Topmost shown node under the pointer matching `accept`. Nodes inside a
    /// hidden group are not on screen and never match.
    fn topmost(&self, scene: &Scene, accept: impl Fn(&Scene, NodeId) -> bool) -> Option<NodeId> {
        scene
            .paint_order()
            .into_iter()
            .rev()
            .find(|&id| {
                scene.is_shown(id)
                    && accept(scene, id)
                    && hit_test_point(scene, self.pointer.pos, id)
            })
    }

    fn press(&mut self, scene: &mut Scene, edges: &mut Vec<InputEdge>) {
        let button = self.topmost(scene, |s, id| {
            s.get(id)
                .and_then(|n| n.sprite())
                .is_some_and(|sprite| sprite.button.is_some())
        });
        if let Some(id) = button {
            set_button(scene, id, ButtonState::Down);
            self.pressed_button = Some(id);
            edges.push(InputEdge::ButtonPress(id));
        }

        let draggable = self.topmost(scene, |s, id| s.get(id).is_some_and(|n| n.draggable));
        if let Some(node) = draggable {
            scene.bring_to_front(node);
            self.drag = Some(Drag { node, last: self.pointer.pos });
        }
    }

    fn release(&mut self, scene: &mut Scene, edges: &mut Vec<InputEdge>) {
        self.drag = None;
        if let Some(id) = self.pressed_button.take() {
            let over = hit_test_point(scene, self.pointer.pos, id);
            set_button(scene, id, if over { ButtonState::Over } else { ButtonState::Up });
            if over {
                edges.push(InputEdge::ButtonRelease(id));
            }
        }
    }

    fn move_drag(&mut self, scene: &mut Scene) {
        let Some(drag) = self.drag.as_mut() else { return };
        let delta = self.pointer.pos - drag.last;
        drag.last = self.pointer.pos;
        match scene.get_mut(drag.node) {
            Some(node) => node.pos += delta,
            None => self.drag = None,
        }
    }

    fn hover_buttons(&self, scene: &mut Scene) {
        let buttons: Vec<NodeId> = scene
            .iter()
            .filter(|n| n.sprite().is_some_and(|s| s.button.is_some()))
            .map(|n| n.id)
            .collect();
        for id in buttons {
            if Some(id) == self.pressed_button {
                continue;
            }
            let over = scene.is_shown(id) && hit_test_point(scene, self.pointer.pos, id);
            set_button(scene, id, if over { ButtonState::Over } else { ButtonState::Up });
        }
    }
}

fn set_button(scene: &mut Scene, id: NodeId, state: ButtonState) {
    let Some(sprite) = scene.get_mut(id).and_then(|n| n.sprite_mut()) else {
        return;
    };
    if sprite.button == Some(state) {
        return;
    }
    sprite.button = Some(state);
    sprite.show(state.frame());
}
