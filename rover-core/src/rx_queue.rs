//! Bounded receive queue shared between the UART interrupt and the reader
//!
//! The interrupt side pushes bytes as they arrive; the reader takes the whole
//! content at once. When the queue is full the oldest bytes are discarded and
//! counted, so a slow reader always sees the most recent `N` bytes.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::CriticalSectionMutex;
use heapless::Deque;

use crate::binary::Binary;

struct State<const N: usize> {
    bytes: Deque<u8, N>,
    dropped: u32,
}

/// Interrupt-fed byte queue holding at most `N` bytes
pub struct RxQueue<const N: usize> {
    state: CriticalSectionMutex<RefCell<State<N>>>,
}

impl<const N: usize> Default for RxQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> RxQueue<N> {
    pub const fn new() -> Self {
        Self {
            state: CriticalSectionMutex::new(RefCell::new(State {
                bytes: Deque::new(),
                dropped: 0,
            })),
        }
    }

    /// Append one byte, discarding the oldest when full
    pub fn push(&self, byte: u8) {
        self.state.lock(|state| {
            let mut state = state.borrow_mut();
            if state.bytes.is_full() {
                state.bytes.pop_front();
                state.dropped = state.dropped.wrapping_add(1);
            }
            // Cannot fail, a slot was freed above
            let _ = state.bytes.push_back(byte);
        })
    }

    /// Append a burst of bytes under a single lock
    pub fn push_slice(&self, bytes: &[u8]) {
        self.state.lock(|state| {
            let mut state = state.borrow_mut();
            for &byte in bytes {
                if state.bytes.is_full() {
                    state.bytes.pop_front();
                    state.dropped = state.dropped.wrapping_add(1);
                }
                let _ = state.bytes.push_back(byte);
            }
        })
    }

    /// Take everything received so far, leaving the queue empty
    pub fn drain(&self) -> Binary {
        let taken = self
            .state
            .lock(|state| core::mem::replace(&mut state.borrow_mut().bytes, Deque::new()));
        taken.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.state.lock(|state| state.borrow().bytes.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bytes discarded because the reader fell behind
    pub fn dropped(&self) -> u32 {
        self.state.lock(|state| state.borrow().dropped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_drain() {
        let queue: RxQueue<8> = RxQueue::new();
        queue.push(1);
        queue.push_slice(&[2, 3]);
        assert_eq!(queue.len(), 3);
        assert_eq!(queue.drain().as_slice(), &[1, 2, 3]);
        assert!(queue.is_empty());
        assert!(queue.drain().is_empty());
    }

    #[test]
    fn test_overflow_keeps_newest() {
        const N: usize = 16;
        let queue: RxQueue<N> = RxQueue::new();
        for byte in 0..(N as u8 + 5) {
            queue.push(byte);
        }
        let expected: Vec<u8> = (5..(N as u8 + 5)).collect();
        assert_eq!(queue.drain().into_vec(), expected);
        assert_eq!(queue.dropped(), 5);
    }

    #[test]
    fn test_overflow_in_one_burst() {
        let queue: RxQueue<4> = RxQueue::new();
        queue.push_slice(&[1, 2, 3, 4, 5, 6]);
        assert_eq!(queue.drain().as_slice(), &[3, 4, 5, 6]);
        assert_eq!(queue.dropped(), 2);
    }

    #[test]
    fn test_static_queue() {
        static QUEUE: RxQueue<4> = RxQueue::new();
        QUEUE.push(0x55);
        assert_eq!(QUEUE.drain().as_slice(), &[0x55]);
    }
}
