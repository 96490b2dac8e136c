//! Enumeration of target positions.
//!
//! Positions are visited in a uniformly shuffled order so that the order in
//! which source pixels were put into a bin never correlates with where they
//! end up. Without it, clustered source regions would land on clustered
//! target regions that share a bin and the source structure would show
//! through.
use crate::Position;
use rand::{Rng, seq::SliceRandom};

/// Every position of a `width × height` grid, row by row.
pub fn row_major(
    width: usize,
    height: usize,
) -> impl ExactSizeIterator<Item = Position> {
    (0..width * height).map(move |index| Position {
        x: index % width,
        y: index / width,
    })
}

/// Every position exactly once, in an order drawn from `rng`.
///
/// The same seeded generator always yields the same order.
///
/// ```
/// use pixshuffle::sequence::shuffled;
/// use rand::{SeedableRng, rngs::SmallRng};
///
/// let a = shuffled(4, 3, &mut SmallRng::seed_from_u64(1));
/// let b = shuffled(4, 3, &mut SmallRng::seed_from_u64(1));
/// assert_eq!(a, b);
/// assert_eq!(a.len(), 12);
/// ```
pub fn shuffled<R>(width: usize, height: usize, rng: &mut R) -> Vec<Position>
where
    R: Rng + ?Sized,
{
    let mut positions: Vec<Position> = row_major(width, height).collect();
    positions.shuffle(rng);
    positions
}

#[cfg(feature = "rayon")]
pub use queue::PositionQueue;

#[cfg(feature = "rayon")]
mod queue {
    use crate::Position;
    use parking_lot::Mutex;
    use std::sync::mpsc::{Receiver, sync_channel};

    /// A bounded queue of positions shared by a worker pool.
    ///
    /// The queue is filled completely and closed on construction; workers
    /// learn there is no more work when [`next()`](Self::next) returns
    /// `None`.
    pub struct PositionQueue {
        receiver: Mutex<Receiver<Position>>,
        len: usize,
    }

    impl PositionQueue {
        pub fn load(positions: Vec<Position>) -> Self {
            let len = positions.len();
            // A zero bound would make every send a rendezvous.
            let (sender, receiver) = sync_channel(len.max(1));
            for position in positions {
                // Cannot fail, the receiver is alive and there is room.
                let _ = sender.send(position);
            }
            // Closes the queue.
            drop(sender);

            Self {
                receiver: Mutex::new(receiver),
                len,
            }
        }

        /// Next unclaimed position, `None` once drained.
        #[inline]
        pub fn next(&self) -> Option<Position> {
            self.receiver.lock().recv().ok()
        }

        /// Number of positions the queue was loaded with.
        #[inline]
        pub fn len(&self) -> usize {
            self.len
        }

        #[inline]
        pub fn is_empty(&self) -> bool {
            self.len == 0
        }
    }
}
