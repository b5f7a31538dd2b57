/// Something the host saw between two frames. Pointer coordinates are in
/// host pixels; `InputState` divides them by the pointer scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown { x: f32, y: f32 },
    PointerUp { x: f32, y: f32 },
    PointerMove { x: f32, y: f32 },
    /// Browsers resend this while a key is held.
    KeyDown { key_code: u32 },
    KeyUp { key_code: u32 },
}

impl InputEvent {
    /// Pointer events with NaN or infinite coordinates carry no position.
    fn is_usable(&self) -> bool {
        match *self {
            InputEvent::PointerDown { x, y }
            | InputEvent::PointerUp { x, y }
            | InputEvent::PointerMove { x, y } => x.is_finite() && y.is_finite(),
            InputEvent::KeyDown { .. } | InputEvent::KeyUp { .. } => true,
        }
    }
}

/// Events buffered between fixed steps, consumed whole by the next one.
#[derive(Debug, Default)]
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32),
        }
    }

    pub fn push(&mut self, event: InputEvent) {
        if !event.is_usable() {
            log::debug!("dropped input {:?}", event);
            return;
        }
        self.events.push(event);
    }

    /// Everything queued since the last call, oldest first.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_empties_in_arrival_order() {
        let mut queue = InputQueue::new();
        queue.push(InputEvent::KeyDown { key_code: 37 });
        queue.push(InputEvent::PointerDown { x: 10.0, y: 20.0 });
        queue.push(InputEvent::KeyUp { key_code: 37 });
        assert_eq!(queue.len(), 3);

        assert_eq!(
            queue.drain(),
            vec![
                InputEvent::KeyDown { key_code: 37 },
                InputEvent::PointerDown { x: 10.0, y: 20.0 },
                InputEvent::KeyUp { key_code: 37 },
            ]
        );
        assert!(queue.is_empty());
    }

    #[test]
    fn pointer_without_position_is_dropped() {
        let mut queue = InputQueue::default();
        queue.push(InputEvent::PointerMove { x: f32::NAN, y: 4.0 });
        queue.push(InputEvent::PointerUp { x: 1.0, y: f32::INFINITY });
        assert!(queue.is_empty());
    }
}
