//! Single-producer, many-consumer handoff of finished chunks.
//!
//! One thread owns the [`ChunkSequence`] and pushes each finished chunk
//! into a bounded channel; any number of consumers pull from a shared
//! receiver. The producer blocks while `capacity` chunks are waiting, which
//! caps the events held in memory at roughly `(capacity + workers + 1)`
//! chunks.

use std::fmt;
use std::sync::mpsc::{self, Receiver};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};

use log::debug;

use crate::input::{ChunkResult, ChunkSequence};
use crate::sink::EventSink;
use crate::OsmInputError;

/// Cloneable consumer handle onto a producer's channel.
pub struct SharedChunks<E> {
    receiver: Arc<Mutex<Receiver<ChunkResult<E>>>>,
}

impl<E> Clone for SharedChunks<E> {
    fn clone(&self) -> Self {
        Self {
            receiver: Arc::clone(&self.receiver),
        }
    }
}

impl<E> fmt::Debug for SharedChunks<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedChunks").finish_non_exhaustive()
    }
}

impl<E> SharedChunks<E> {
    /// Block until the next chunk arrives; `None` once the pass has ended.
    #[must_use]
    pub fn recv_chunk(&self) -> Option<ChunkResult<E>> {
        let receiver = self
            .receiver
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        receiver.recv().ok()
    }

    /// Drain chunks until the pass ends.
    pub fn iter(&self) -> impl Iterator<Item = ChunkResult<E>> + '_ {
        std::iter::from_fn(move || self.recv_chunk())
    }
}

/// The consumer side of [`InputIterable::spawn`](crate::InputIterable::spawn).
#[derive(Debug)]
pub struct ChunkReceiver<E> {
    chunks: SharedChunks<E>,
    producer: JoinHandle<()>,
}

impl<E> ChunkReceiver<E> {
    /// Block until the next chunk arrives; `None` once the pass has ended.
    #[must_use]
    pub fn recv_chunk(&self) -> Option<ChunkResult<E>> {
        self.chunks.recv_chunk()
    }

    /// A handle for another consumer thread.
    #[must_use]
    pub fn shared(&self) -> SharedChunks<E> {
        self.chunks.clone()
    }

    /// Drop this handle and wait for the producer to stop.
    ///
    /// The producer stops once the pass ends or once every consumer handle
    /// has been dropped.
    ///
    /// # Errors
    /// Returns [`OsmInputError::ProducerPanicked`] when the producer thread
    /// panicked.
    pub fn join(self) -> Result<(), OsmInputError> {
        let Self { chunks, producer } = self;
        drop(chunks);
        producer
            .join()
            .map_err(|_| OsmInputError::ProducerPanicked)
    }
}

pub(crate) fn spawn<S>(
    sequence: ChunkSequence<S>,
    capacity: usize,
) -> Result<ChunkReceiver<S::Event>, OsmInputError>
where
    S: EventSink + 'static,
    S::Event: Send + 'static,
{
    let (sender, receiver) = mpsc::sync_channel(capacity);
    let producer = thread::Builder::new()
        .name("osm-chunk-producer".to_owned())
        .spawn(move || {
            for item in sequence {
                if sender.send(item).is_err() {
                    debug!("all chunk consumers gone; producer stopping");
                    break;
                }
            }
        })
        .map_err(|source| OsmInputError::SpawnProducer { source })?;
    Ok(ChunkReceiver {
        chunks: SharedChunks {
            receiver: Arc::new(Mutex::new(receiver)),
        },
        producer,
    })
}
