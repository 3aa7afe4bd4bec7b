//! Host event queue for resize and pointer input

/// Input from the host environment, consumed at the start of the next tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostEvent {
    /// Drawable size changed (physical pixels)
    Resized {
        width: u32,
        height: u32,
        pixel_ratio: f64,
    },
    /// Pointer moved to a window position in physical pixels
    PointerMoved { x: f64, y: f64 },
    /// Primary button pressed or released (orbit drag)
    PointerButton { pressed: bool },
    /// Scroll wheel, in lines; positive zooms in
    Wheel { delta: f32 },
    /// Host is tearing the experience down; stop scheduling ticks
    Teardown,
}

/// Source of host events, injected so the experience can be driven without
/// a real display surface
pub trait EventSource {
    /// Take every pending event in arrival order
    fn drain(&mut self) -> Vec<HostEvent>;
}

/// A simple event queue that callbacks push to and the update loop drains
#[derive(Debug, Default)]
pub struct HostEventQueue {
    events: Vec<HostEvent>,
}

impl HostEventQueue {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Push an event onto the queue
    pub fn push(&mut self, event: HostEvent) {
        self.events.push(event);
    }

    /// Check if there are pending events
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of pending events
    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl EventSource for HostEventQueue {
    fn drain(&mut self) -> Vec<HostEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_drain() {
        let mut queue = HostEventQueue::new();
        assert!(queue.is_empty());

        queue.push(HostEvent::PointerMoved { x: 10.0, y: 20.0 });
        queue.push(HostEvent::Resized {
            width: 800,
            height: 600,
            pixel_ratio: 1.0,
        });

        assert_eq!(queue.len(), 2);

        let events = queue.drain();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], HostEvent::PointerMoved { x: 10.0, y: 20.0 });
        assert!(queue.is_empty());
    }

    #[test]
    fn test_drain_clears() {
        let mut queue = HostEventQueue::new();
        queue.push(HostEvent::Teardown);

        let _ = queue.drain();
        assert!(queue.drain().is_empty());
    }
}
