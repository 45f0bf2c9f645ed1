//! Message balloon queue.
//!
//! Lines pushed together appear one after another, [`LINE_INTERVAL`] seconds
//! apart, and share a colour. Separate pushes interleave by due time. Shown
//! lines expire after [`MESSAGE_TTL`] seconds unless their push asked for
//! them to stay.

use std::collections::VecDeque;
use std::hash::{Hash, Hasher};

use bevy_ecs::prelude::Resource;
use log::debug;
use rustc_hash::FxHasher;

pub const LINE_INTERVAL: f64 = 1.2;
pub const MESSAGE_TTL: f64 = 8.0;
pub const MAX_SHOWN: usize = 20;

#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub text: String,
    /// Shared by every line of one push; the renderer maps it to a colour.
    pub color_hash: u64,
    pub shown_at: f64,
    /// Never expires on its own.
    pub always_show: bool,
}

#[derive(Debug, Clone)]
struct PendingLine {
    text: String,
    color_hash: u64,
    always_show: bool,
    due: f64,
}

#[derive(Resource, Debug, Clone)]
pub struct MessageQueue {
    enabled: bool,
    /// Ordered by due time.
    pending: VecDeque<PendingLine>,
    shown: VecDeque<Message>,
}

impl Default for MessageQueue {
    fn default() -> Self {
        Self::new(true)
    }
}

fn color_hash(lines: &[String]) -> u64 {
    let mut hasher = FxHasher::default();
    lines.hash(&mut hasher);
    hasher.finish()
}

impl MessageQueue {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            pending: VecDeque::new(),
            shown: VecDeque::new(),
        }
    }

    /// Schedule `lines` starting at `now`. Returns how many were queued.
    pub fn push_words<S: Into<String>>(
        &mut self,
        lines: impl IntoIterator<Item = S>,
        always_show: bool,
        now: f64,
    ) -> usize {
        if !self.enabled {
            return 0;
        }
        let lines: Vec<String> = lines
            .into_iter()
            .map(Into::into)
            .filter(|l: &String| !l.trim().is_empty())
            .collect();
        let hash = color_hash(&lines);
        let count = lines.len();
        for (i, text) in lines.into_iter().enumerate() {
            let due = now + i as f64 * LINE_INTERVAL;
            let at = self.pending.partition_point(|p| p.due <= due);
            self.pending.insert(
                at,
                PendingLine {
                    text,
                    color_hash: hash,
                    always_show,
                    due,
                },
            );
        }
        debug!("queued {} message lines", count);
        count
    }

    /// Drop every pending and shown line.
    pub fn clear_all(&mut self) {
        self.pending.clear();
        self.shown.clear();
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Lines currently displayed, oldest first.
    pub fn shown(&self) -> impl Iterator<Item = &Message> {
        self.shown.iter()
    }

    /// Reveal lines that are due and expire old ones.
    pub fn update(&mut self, now: f64) {
        while self.pending.front().is_some_and(|p| p.due <= now) {
            if let Some(line) = self.pending.pop_front() {
                self.shown.push_back(Message {
                    text: line.text,
                    color_hash: line.color_hash,
                    shown_at: now,
                    always_show: line.always_show,
                });
            }
        }
        self.shown
            .retain(|m| m.always_show || now - m.shown_at < MESSAGE_TTL);
        while self.shown.len() > MAX_SHOWN {
            self.shown.pop_front();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_are_spaced_and_share_colour() {
        let mut q = MessageQueue::new(true);
        assert_eq!(q.push_words(["hello", "there", "friend"], false, 0.0), 3);
        q.update(0.0);
        assert_eq!(q.shown().count(), 1);
        q.update(1.0);
        assert_eq!(q.shown().count(), 1);
        q.update(1.2);
        assert_eq!(q.shown().count(), 2);
        q.update(2.4);
        let shown: Vec<_> = q.shown().collect();
        assert_eq!(shown.len(), 3);
        assert_eq!(shown[2].text, "friend");
        assert_eq!(shown[0].color_hash, shown[2].color_hash);
    }

    #[test]
    fn test_clear_all_cancels_pending() {
        let mut q = MessageQueue::new(true);
        q.push_words(["a", "b"], false, 0.0);
        q.update(0.0);
        q.clear_all();
        q.update(5.0);
        assert_eq!(q.shown().count(), 0);
        assert_eq!(q.pending_len(), 0);
    }

    #[test]
    fn test_lines_expire_unless_always_show() {
        let mut q = MessageQueue::new(true);
        q.push_words(["a"], false, 0.0);
        q.update(0.0);
        q.update(8.5);
        assert_eq!(q.shown().count(), 0);

        q.push_words(["b"], true, 10.0);
        q.push_words(["c"], false, 10.0);
        q.update(10.0);
        q.update(100.0);
        let shown: Vec<_> = q.shown().map(|m| m.text.as_str()).collect();
        assert_eq!(shown, vec!["b"]);
    }

    #[test]
    fn test_disabled_queue_drops_lines() {
        let mut q = MessageQueue::new(false);
        assert_eq!(q.push_words(["a"], false, 0.0), 0);
        q.update(1.0);
        assert_eq!(q.shown().count(), 0);
    }

    #[test]
    fn test_later_push_does_not_wait_behind_earlier_one() {
        let mut q = MessageQueue::new(true);
        q.push_words(["a1", "a2", "a3", "a4", "a5"], false, 0.0);
        q.push_words(["b1"], false, 0.5);
        q.update(1.0);
        let shown: Vec<_> = q.shown().map(|m| m.text.as_str()).collect();
        assert_eq!(shown, vec!["a1", "b1"]);

        q.update(2.4);
        let shown: Vec<_> = q.shown().map(|m| m.text.as_str()).collect();
        assert_eq!(shown, vec!["a1", "b1", "a2", "a3"]);
        assert_eq!(q.pending_len(), 2);
    }

    #[test]
    fn test_lines_keep_revealing_after_days() {
        let mut q = MessageQueue::new(true);
        let now = 7.0 * 24.0 * 3600.0;
        q.push_words(["x", "y"], false, now);
        q.update(now + LINE_INTERVAL);
        assert_eq!(q.shown().count(), 2);
        q.update(now + LINE_INTERVAL + MESSAGE_TTL + 1.0 / 60.0);
        assert_eq!(q.shown().count(), 0);
    }
}
