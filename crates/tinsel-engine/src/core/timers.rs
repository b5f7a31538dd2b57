use crate::api::types::TimerId;

struct Entry<C> {
    id: TimerId,
    due_ms: f64,
    payload: C,
}

/// One-shot timers ordered by due time, ties broken by scheduling order.
pub struct TimerQueue<C> {
    entries: Vec<Entry<C>>,
    next_id: u32,
}

impl<C> Default for TimerQueue<C> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
        }
    }
}

impl<C> TimerQueue<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `payload` to fire `delay_ms` after `now_ms`. Negative delays fire
    /// on the next dispatch.
    pub fn schedule(&mut self, now_ms: f64, delay_ms: f64, payload: C) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let due_ms = now_ms + delay_ms.max(0.0);
        // Keep sorted; equal due times stay in insertion order.
        let index = self.entries.partition_point(|e| e.due_ms <= due_ms);
        self.entries.insert(index, Entry { id, due_ms, payload });
        id
    }

    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    /// Remove and return every timer due at `now_ms`, earliest first.
    pub fn take_due(&mut self, now_ms: f64) -> Vec<(TimerId, C)> {
        let count = self.entries.partition_point(|e| e.due_ms <= now_ms);
        self.entries
            .drain(..count)
            .map(|e| (e.id, e.payload))
            .collect()
    }

    pub fn contains(&self, id: TimerId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
