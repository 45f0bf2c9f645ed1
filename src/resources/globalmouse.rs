//! Pointer monitoring outside the window.
//!
//! While the pointer is outside the character window the host's
//! [`GlobalPointerHook`] reports positions from its own thread. They travel
//! through a `crossbeam-channel` and are drained on the render thread by
//! [`global_pointer`](crate::systems::globalmouse::global_pointer).
//!
//! The hook is switched on when the pointer leaves the window and off when
//! window-local input resumes. A deregistration deadline, pushed back by
//! every new leave, keeps the hook from staying on forever.

use bevy_ecs::prelude::*;
use crossbeam_channel::{Receiver, Sender, unbounded};
use log::{debug, info};
use raylib::prelude::Vector2;

use crate::host::GlobalPointerHook;

/// Seconds of inactivity before the hook is switched off.
pub const DEREGISTER_DELAY: f64 = 10.0;

/// Pointer position reported by the host's global monitor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlobalPointerEvent {
    pub screen: Vector2,
}

/// Deliver one position from a hook. A closed channel only means monitoring
/// was torn down first, so the event is logged and dropped.
pub fn send_global_pointer(tx: &Sender<GlobalPointerEvent>, event: GlobalPointerEvent) -> bool {
    match tx.send(event) {
        Ok(()) => true,
        Err(e) => {
            debug!("global pointer event dropped: {}", e);
            false
        }
    }
}

#[derive(Resource)]
pub struct GlobalMouse {
    tx: Sender<GlobalPointerEvent>,
    rx: Receiver<GlobalPointerEvent>,
    running: bool,
    deregister_at: Option<f64>,
    /// Whether the last global position was inside the window.
    pub pointer_inside: bool,
}

impl Default for GlobalMouse {
    fn default() -> Self {
        Self::new()
    }
}

impl GlobalMouse {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self {
            tx,
            rx,
            running: false,
            deregister_at: None,
            pointer_inside: false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn deregister_at(&self) -> Option<f64> {
        self.deregister_at
    }

    /// Sender handed to hooks; cloned for producers on other threads.
    pub fn sender(&self) -> Sender<GlobalPointerEvent> {
        self.tx.clone()
    }

    pub fn enable(&mut self, hook: &mut dyn GlobalPointerHook) {
        if self.running {
            return;
        }
        hook.enable(self.tx.clone());
        self.running = true;
        info!("global pointer registered");
    }

    pub fn disable(&mut self, hook: &mut dyn GlobalPointerHook) {
        self.deregister_at = None;
        if !self.running {
            return;
        }
        hook.disable();
        self.running = false;
        while self.rx.try_recv().is_ok() {}
        info!("global pointer deregistered");
    }

    /// Replace any pending deregistration with one `DEREGISTER_DELAY` from `now`.
    pub fn schedule_deregistration(&mut self, now: f64) {
        self.deregister_at = Some(now + DEREGISTER_DELAY);
    }

    pub fn cancel_deregistration(&mut self) {
        self.deregister_at = None;
    }

    /// Whether the deregistration deadline has passed.
    pub fn deregistration_due(&self, now: f64) -> bool {
        matches!(self.deregister_at, Some(at) if now >= at)
    }

    /// Drain pending events, oldest first.
    pub fn poll(&self) -> Vec<GlobalPointerEvent> {
        self.rx.try_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct CountingHook {
        enabled: usize,
        disabled: usize,
        tx: Option<Sender<GlobalPointerEvent>>,
    }

    impl GlobalPointerHook for CountingHook {
        fn enable(&mut self, tx: Sender<GlobalPointerEvent>) {
            self.enabled += 1;
            self.tx = Some(tx);
        }
        fn disable(&mut self) {
            self.disabled += 1;
            self.tx = None;
        }
    }

    #[test]
    fn test_enable_is_idempotent() {
        let mut mouse = GlobalMouse::new();
        let mut hook = CountingHook::default();
        mouse.enable(&mut hook);
        mouse.enable(&mut hook);
        assert_eq!(hook.enabled, 1);
        assert!(mouse.is_running());
        mouse.disable(&mut hook);
        mouse.disable(&mut hook);
        assert_eq!(hook.disabled, 1);
    }

    #[test]
    fn test_events_cross_threads() {
        let mut mouse = GlobalMouse::new();
        let mut hook = CountingHook::default();
        mouse.enable(&mut hook);
        let tx = hook.tx.clone().unwrap();
        std::thread::spawn(move || {
            tx.send(GlobalPointerEvent {
                screen: Vector2 { x: 1.0, y: 2.0 },
            })
            .unwrap();
        })
        .join()
        .unwrap();
        let events = mouse.poll();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].screen.y, 2.0);
        assert!(mouse.poll().is_empty());
    }

    #[test]
    fn test_new_leave_supersedes_deadline() {
        let mut mouse = GlobalMouse::new();
        mouse.schedule_deregistration(1.0);
        mouse.schedule_deregistration(6.0);
        assert!(!mouse.deregistration_due(12.0));
        assert!(mouse.deregistration_due(16.0));
        mouse.cancel_deregistration();
        assert!(!mouse.deregistration_due(100.0));
    }

    #[test]
    fn test_deadline_fires_after_days_of_uptime() {
        let mut mouse = GlobalMouse::new();
        let now = 7.0 * 24.0 * 3600.0;
        mouse.schedule_deregistration(now);
        assert!(!mouse.deregistration_due(now + DEREGISTER_DELAY - 1.0 / 60.0));
        assert!(mouse.deregistration_due(now + DEREGISTER_DELAY));
    }

    #[test]
    fn test_send_to_closed_channel_reports_drop() {
        let event = GlobalPointerEvent {
            screen: Vector2 { x: 5.0, y: 5.0 },
        };
        let mouse = GlobalMouse::new();
        assert!(send_global_pointer(&mouse.sender(), event));
        assert_eq!(mouse.poll(), vec![event]);

        let tx = mouse.sender();
        drop(mouse);
        assert!(!send_global_pointer(&tx, event));
    }
}
