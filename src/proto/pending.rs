//! Pending-send queue
//!
//! FIFO of application messages that arrived while the window was full. The
//! senders keep it empty whenever the window has room.

use std::collections::VecDeque;

use crate::net::Message;

#[derive(Debug, Default)]
pub struct PendingQueue {
    q: VecDeque<Message>,
}

impl PendingQueue {
    pub fn push(&mut self, msg: Message) {
        self.q.push_back(msg);
    }

    pub fn pop(&mut self) -> Option<Message> {
        self.q.pop_front()
    }

    pub fn len(&self) -> usize {
        self.q.len()
    }

    pub fn is_empty(&self) -> bool {
        self.q.is_empty()
    }

    pub fn clear(&mut self) {
        self.q.clear();
    }
}
