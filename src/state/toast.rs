// Transient notifications.
// Toasts expire on their own; the event loop prunes them each tick.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// At most this many toasts are kept; older ones are dropped first.
const MAX_TOASTS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Info,
    Warning,
    Error,
}

impl ToastKind {
    pub fn label(&self) -> &'static str {
        match self {
            ToastKind::Success => "✓",
            ToastKind::Info => "i",
            ToastKind::Warning => "!",
            ToastKind::Error => "✗",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
    pub expires_at: Instant,
}

#[derive(Debug)]
pub struct Toasts {
    items: VecDeque<Toast>,
    lifetime: Duration,
}

impl Toasts {
    pub fn new(lifetime: Duration) -> Self {
        Self {
            items: VecDeque::new(),
            lifetime,
        }
    }

    /// Show a message. Blank messages are ignored.
    pub fn push(&mut self, kind: ToastKind, message: impl Into<String>, now: Instant) {
        let message = message.into();
        if message.trim().is_empty() {
            return;
        }
        if self.items.len() == MAX_TOASTS {
            self.items.pop_front();
        }
        self.items.push_back(Toast {
            kind,
            message,
            expires_at: now + self.lifetime,
        });
    }

    /// Drop expired toasts.
    pub fn prune(&mut self, now: Instant) {
        self.items.retain(|toast| toast.expires_at > now);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.items.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toasts_expire() {
        let start = Instant::now();
        let mut toasts = Toasts::new(Duration::from_millis(2500));
        toasts.push(ToastKind::Success, "Saved", start);
        toasts.push(ToastKind::Info, "   ", start);
        assert_eq!(toasts.iter().count(), 1);

        toasts.prune(start + Duration::from_millis(2499));
        assert_eq!(toasts.iter().count(), 1);
        toasts.prune(start + Duration::from_millis(2500));
        assert!(toasts.is_empty());
    }

    #[test]
    fn test_oldest_toast_dropped_when_full() {
        let now = Instant::now();
        let mut toasts = Toasts::new(Duration::from_secs(1));
        for i in 0..6 {
            toasts.push(ToastKind::Info, format!("toast {}", i), now);
        }
        assert_eq!(toasts.iter().count(), MAX_TOASTS);
        assert_eq!(toasts.iter().next().map(|t| t.message.as_str()), Some("toast 2"));
    }
}
