//! Bounded hand-off queue between the footprint enumerator and the
//! worker pool.
//!
//! Backpressure comes from the bounded channel: the producer blocks when
//! workers fall behind. End-of-stream is the producer dropping its handle,
//! which every worker observes as a disconnect.

use crossbeam_channel::{bounded, Receiver, Sender};

use crate::grid::shapes::CellFootprint;

/// Producer handle, held by the enumerating thread.
pub struct CellQueue {
    tx: Sender<CellFootprint>,
}

/// Consumer handle, one clone per worker.
#[derive(Clone)]
pub struct CellStream {
    rx: Receiver<CellFootprint>,
}

/// Create a queue with the given capacity.
pub fn cell_queue(capacity: usize) -> (CellQueue, CellStream) {
    let (tx, rx) = bounded(capacity);
    (CellQueue { tx }, CellStream { rx })
}

impl CellQueue {
    /// Enqueue a footprint, blocking while the queue is full. Returns
    /// false when every consumer is gone.
    pub fn push(&self, footprint: CellFootprint) -> bool {
        self.tx.send(footprint).is_ok()
    }

    pub fn is_full(&self) -> bool {
        self.tx.is_full()
    }
}

impl CellStream {
    /// Dequeue the next footprint, blocking while the queue is empty.
    /// Returns `None` once the producer is gone and the queue drained.
    pub fn pop(&self) -> Option<CellFootprint> {
        self.rx.recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_order() {
        let (queue, stream) = cell_queue(8);
        for i in 0..4 {
            assert!(queue.push(CellFootprint::new(i as f64, 0.0, 1.0)));
        }
        for i in 0..4 {
            let fp = stream.pop().expect("queued footprint");
            assert_eq!(fp.ring()[1], (i as f64, 0.0));
        }
    }

    #[test]
    fn test_drop_producer_ends_stream() {
        let (queue, stream) = cell_queue(8);
        queue.push(CellFootprint::new(0.0, 0.0, 1.0));
        drop(queue);
        assert!(stream.pop().is_some());
        assert!(stream.pop().is_none());
    }

    #[test]
    fn test_every_consumer_sees_end() {
        let (queue, stream) = cell_queue(8);
        let second = stream.clone();
        drop(queue);
        assert!(stream.pop().is_none());
        assert!(second.pop().is_none());
    }

    #[test]
    fn test_push_fails_without_consumers() {
        let (queue, stream) = cell_queue(8);
        drop(stream);
        assert!(!queue.push(CellFootprint::new(0.0, 0.0, 1.0)));
    }

    #[test]
    fn test_bounded_capacity() {
        let (queue, _stream) = cell_queue(2);
        queue.push(CellFootprint::new(0.0, 0.0, 1.0));
        assert!(!queue.is_full());
        queue.push(CellFootprint::new(1.0, 0.0, 1.0));
        assert!(queue.is_full());
    }
}
