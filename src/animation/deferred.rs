//! Delayed continuations guarded by the engine's generation token.

/// What to do when a deferred task fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Continuation {
    /// Start the next Huffman merge.
    NextMerge,
    /// Start the rebalance morph after an AVL commit.
    BeginMorph,
}

#[derive(Debug, Clone, Copy)]
struct DeferredTask {
    remaining: f32,
    generation: u64,
    continuation: Continuation,
}

/// Timer queue of continuations. Each task remembers the generation it was
/// scheduled under and is dropped silently if the engine has been reset
/// since.
#[derive(Debug, Clone, Default)]
pub struct DeferredQueue {
    tasks: Vec<DeferredTask>,
}

impl DeferredQueue {
    /// Empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tasks still waiting, stale ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether no task is waiting.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Run `continuation` after `delay` seconds, if `generation` is still
    /// live by then.
    pub fn schedule(
        &mut self,
        delay: f32,
        generation: u64,
        continuation: Continuation,
    ) {
        self.tasks.push(DeferredTask {
            remaining: delay.max(0.0),
            generation,
            continuation,
        });
    }

    /// Let `dt` seconds pass. Returns the continuations that came due under
    /// the `live` generation, in scheduling order.
    pub fn advance(&mut self, dt: f32, live: u64) -> Vec<Continuation> {
        for task in &mut self.tasks {
            task.remaining -= dt.max(0.0);
        }
        let (due, waiting): (Vec<DeferredTask>, Vec<DeferredTask>) =
            std::mem::take(&mut self.tasks)
                .into_iter()
                .partition(|t| t.remaining <= 0.0);
        self.tasks = waiting;
        Self::filter_live(due, live)
    }

    /// Fire everything now, regardless of remaining delay.
    pub fn drain(&mut self, live: u64) -> Vec<Continuation> {
        let due = std::mem::take(&mut self.tasks);
        Self::filter_live(due, live)
    }

    fn filter_live(due: Vec<DeferredTask>, live: u64) -> Vec<Continuation> {
        due.into_iter()
            .filter_map(|task| {
                if task.generation == live {
                    Some(task.continuation)
                } else {
                    log::trace!(
                        "dropping stale {:?} from generation {} (live {live})",
                        task.continuation,
                        task.generation
                    );
                    None
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_after_delay() {
        let mut queue = DeferredQueue::new();
        queue.schedule(0.3, 0, Continuation::NextMerge);
        assert!(queue.advance(0.2, 0).is_empty());
        assert_eq!(queue.advance(0.2, 0), vec![Continuation::NextMerge]);
        assert!(queue.is_empty());
    }

    #[test]
    fn stale_generation_is_dropped() {
        let mut queue = DeferredQueue::new();
        queue.schedule(0.1, 4, Continuation::BeginMorph);
        queue.schedule(0.1, 5, Continuation::NextMerge);
        assert_eq!(queue.advance(1.0, 5), vec![Continuation::NextMerge]);
        assert_eq!(queue.len(), 0);
    }

    #[test]
    fn drain_ignores_delay_but_not_generation() {
        let mut queue = DeferredQueue::new();
        queue.schedule(10.0, 1, Continuation::NextMerge);
        queue.schedule(10.0, 2, Continuation::BeginMorph);
        assert_eq!(queue.drain(2), vec![Continuation::BeginMorph]);
    }
}
