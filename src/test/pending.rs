use crate::proto::PendingQueue;

use super::msg;

#[test]
fn pending_queue_is_fifo() {
    let mut q = PendingQueue::default();
    assert!(q.is_empty());
    for s in ["one", "two", "three"] {
        q.push(msg(s));
    }
    assert_eq!(q.len(), 3);
    assert_eq!(q.pop(), Some(msg("one")));
    assert_eq!(q.pop(), Some(msg("two")));
    q.clear();
    assert_eq!(q.pop(), None);
}
