use std::{
    ops::{Deref, DerefMut},
    sync::{Mutex, PoisonError},
};

use super::state::ChatToResponsesStreamState;

/// Recycles stream states so their maps keep their allocations between
/// streams.
///
/// A state is reset when it is handed out and again when it comes back. At
/// most `capacity` idle states are retained; extra ones are dropped.
#[derive(Debug)]
pub struct StreamStatePool {
    idle: Mutex<Vec<ChatToResponsesStreamState>>,
    capacity: usize,
}

impl StreamStatePool {
    pub fn new(capacity: usize) -> Self {
        Self::with_prewarm(capacity, 0)
    }

    /// Creates a pool holding `prewarm` ready states, capped at `capacity`.
    pub fn with_prewarm(capacity: usize, prewarm: usize) -> Self {
        let idle = (0..prewarm.min(capacity))
            .map(|_| ChatToResponsesStreamState::new())
            .collect();

        Self {
            idle: Mutex::new(idle),
            capacity,
        }
    }

    /// Takes a state out of the pool, creating one if none is idle.
    ///
    /// The state goes back to the pool when the guard is dropped.
    pub fn acquire(&self) -> PooledStreamState<'_> {
        let recycled = self.idle.lock().unwrap_or_else(PoisonError::into_inner).pop();

        let state = match recycled {
            Some(mut state) => {
                state.reset();
                state
            }
            None => ChatToResponsesStreamState::new(),
        };

        PooledStreamState { pool: self, state }
    }

    /// Hands a state back explicitly.
    pub fn release(&self, mut state: ChatToResponsesStreamState) {
        state.reset();

        let mut idle = self.idle.lock().unwrap_or_else(PoisonError::into_inner);

        if idle.len() < self.capacity {
            idle.push(state);
        }
    }

    /// Number of states waiting to be reused.
    pub fn idle_count(&self) -> usize {
        self.idle.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// A stream state on loan from a [`StreamStatePool`].
#[derive(Debug)]
pub struct PooledStreamState<'a> {
    pool: &'a StreamStatePool,
    state: ChatToResponsesStreamState,
}

impl Deref for PooledStreamState<'_> {
    type Target = ChatToResponsesStreamState;

    fn deref(&self) -> &Self::Target {
        &self.state
    }
}

impl DerefMut for PooledStreamState<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.state
    }
}

impl Drop for PooledStreamState<'_> {
    fn drop(&mut self) {
        self.pool.release(std::mem::take(&mut self.state));
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::StreamStatePool;
    use crate::messages::chat::ChatStreamChunk;

    fn chunk(value: serde_json::Value) -> ChatStreamChunk {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn released_state_is_reused_clean() {
        let pool = StreamStatePool::new(2);

        {
            let mut state = pool.acquire();

            state.process_chunk(&chunk(json!({
                "id": "first",
                "choices": [{
                    "delta": {
                        "role": "assistant",
                        "tool_calls": [{ "index": 0, "id": "call_1", "function": { "arguments": "{" } }]
                    }
                }]
            })));

            assert_eq!(state.sequence_number(), 4);
        }

        assert_eq!(pool.idle_count(), 1);

        let mut state = pool.acquire();
        assert_eq!(pool.idle_count(), 0);
        assert_eq!(state.sequence_number(), 0);

        // The index mapping from the previous stream is gone.
        let events = state.process_chunk(&chunk(json!({
            "choices": [{ "delta": { "tool_calls": [{ "index": 0, "function": { "arguments": "}" } }] } }]
        })));

        assert!(events.is_empty());
    }

    #[test]
    fn capacity_bounds_idle_states() {
        let pool = StreamStatePool::new(1);

        let first = pool.acquire();
        let second = pool.acquire();

        drop(first);
        drop(second);

        assert_eq!(pool.idle_count(), 1);
    }

    #[test]
    fn prewarm_is_capped() {
        let pool = StreamStatePool::with_prewarm(2, 5);

        assert_eq!(pool.idle_count(), 2);
        assert_eq!(pool.capacity(), 2);
    }

    #[test]
    fn explicit_release() {
        let pool = StreamStatePool::new(4);

        let mut state = crate::stream::ChatToResponsesStreamState::new();
        state.fail("test", "boom");
        assert!(state.is_terminated());

        pool.release(state);

        let state = pool.acquire();
        assert!(!state.is_terminated());
    }

    #[test]
    fn states_are_shared_across_threads() {
        let pool = StreamStatePool::new(8);

        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    let mut state = pool.acquire();

                    let events = state.process_chunk(&chunk(json!({
                        "choices": [{ "delta": { "role": "assistant", "content": "hi" }, "finish_reason": "stop" }]
                    })));

                    assert_eq!(events.first().map(|event| event.sequence_number), Some(0));
                });
            }
        });

        assert!(pool.idle_count() <= 4);
        assert!(pool.idle_count() >= 1);
    }
}
