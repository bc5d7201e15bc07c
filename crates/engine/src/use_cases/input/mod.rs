//! Input queue use cases.
//!
//! Producers append inputs for a world's engine; the external tick engine
//! drains them in insertion order. Nothing here waits on the engine.

use std::sync::Arc;

mod producers;
mod queue;

pub use producers::{JoinWorld, LeaveWorld, MoveTo, SendWorldInput};
pub use queue::InputQueue;

/// Container for input use cases.
pub struct InputUseCases {
    pub queue: Arc<InputQueue>,
    pub join: Arc<JoinWorld>,
    pub leave: Arc<LeaveWorld>,
    pub move_to: Arc<MoveTo>,
    pub send: Arc<SendWorldInput>,
}

impl InputUseCases {
    pub fn new(
        queue: Arc<InputQueue>,
        join: Arc<JoinWorld>,
        leave: Arc<LeaveWorld>,
        move_to: Arc<MoveTo>,
        send: Arc<SendWorldInput>,
    ) -> Self {
        Self {
            queue,
            join,
            leave,
            move_to,
            send,
        }
    }
}
