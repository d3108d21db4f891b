//! Bounded key queue between keyboard capture and the stepper
//!
//! Any number of producers, one consumer. The stepper drains at most one key
//! per tick and never waits; producers never block either, a full queue drops
//! the key.

use std::sync::mpsc::{Receiver, SyncSender, TryRecvError, TrySendError, sync_channel};

/// Create a queue holding at most `capacity` pending keys
pub fn key_queue(capacity: usize) -> (KeySender, KeyReceiver) {
    let (tx, rx) = sync_channel(capacity);
    (KeySender { tx }, KeyReceiver { rx })
}

/// Producer side, cloneable across capture threads
#[derive(Debug, Clone)]
pub struct KeySender {
    tx: SyncSender<char>,
}

impl KeySender {
    /// Queue a key press. Returns false if the consumer is gone.
    pub fn press(&self, key: char) -> bool {
        match self.tx.try_send(key) {
            Ok(()) => true,
            Err(TrySendError::Full(key)) => {
                log::warn!("Input queue full, dropping key {key:?}");
                true
            }
            Err(TrySendError::Disconnected(_)) => false,
        }
    }
}

/// Consumer side, owned by whoever drives ticks
#[derive(Debug)]
pub struct KeyReceiver {
    rx: Receiver<char>,
}

impl KeyReceiver {
    /// Take the oldest pending key, if any
    pub fn next_key(&self) -> Option<char> {
        match self.rx.try_recv() {
            Ok(key) => Some(key),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }
}
