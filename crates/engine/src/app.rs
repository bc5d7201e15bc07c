//! Application state and composition.

use std::sync::Arc;

use crate::config::LifecycleConfig;
use crate::infrastructure::{
    clock::{SystemClock, SystemRandom},
    ports::{
        ClockPort, ConversationRepo, EngineControlPort, EngineRepo, InputRepo, RandomPort,
        WorldRepo, WorldStatusRepo,
    },
    sqlite::SqliteRepositories,
};
use crate::use_cases;

/// Main application state.
///
/// Holds all repository ports and use cases.
/// Passed to HTTP handlers and the periodic jobs via `Arc<App>`.
pub struct App {
    pub repositories: Repositories,
    pub use_cases: UseCases,
}

/// Container for all repository ports.
pub struct Repositories {
    pub world: Arc<dyn WorldRepo>,
    pub world_status: Arc<dyn WorldStatusRepo>,
    pub engine: Arc<dyn EngineRepo>,
    pub input: Arc<dyn InputRepo>,
    pub conversation: Arc<dyn ConversationRepo>,
    pub engine_control: Arc<dyn EngineControlPort>,
}

impl From<SqliteRepositories> for Repositories {
    fn from(repos: SqliteRepositories) -> Self {
        Self {
            world: repos.world,
            world_status: repos.world_status,
            engine: repos.engine,
            input: repos.input,
            conversation: repos.conversation,
            engine_control: repos.engine_control,
        }
    }
}

/// Container for all use cases.
pub struct UseCases {
    pub lifecycle: use_cases::LifecycleUseCases,
    pub input: use_cases::InputUseCases,
    pub history: Arc<use_cases::PreviousConversation>,
    pub world: use_cases::WorldUseCases,
}

impl App {
    /// Create a new App wired to the system clock and random source.
    pub fn new(repositories: Repositories, config: LifecycleConfig) -> Self {
        Self::with_ports(
            repositories,
            config,
            Arc::new(SystemClock),
            Arc::new(SystemRandom),
        )
    }

    /// Create a new App with explicit clock and random ports.
    pub fn with_ports(
        repositories: Repositories,
        config: LifecycleConfig,
        clock: Arc<dyn ClockPort>,
        random: Arc<dyn RandomPort>,
    ) -> Self {
        let repos = &repositories;

        let store = Arc::new(use_cases::lifecycle::WorldStatusStore::new(
            repos.world_status.clone(),
            clock.clone(),
            config,
        ));
        let lifecycle = use_cases::LifecycleUseCases::new(
            store.clone(),
            Arc::new(use_cases::lifecycle::DefaultWorldStatus::new(store.clone())),
            Arc::new(use_cases::lifecycle::HeartbeatWorld::new(
                store.clone(),
                repos.engine_control.clone(),
            )),
            Arc::new(use_cases::lifecycle::StopInactiveWorlds::new(
                store.clone(),
                repos.engine_control.clone(),
                config,
            )),
            Arc::new(use_cases::lifecycle::RestartDeadWorlds::new(
                store,
                repos.engine.clone(),
                repos.engine_control.clone(),
                config,
            )),
        );

        let queue = Arc::new(use_cases::input::InputQueue::new(
            repos.input.clone(),
            repos.world_status.clone(),
            repos.engine.clone(),
            clock,
        ));
        let input = use_cases::InputUseCases::new(
            queue.clone(),
            Arc::new(use_cases::input::JoinWorld::new(
                repos.world.clone(),
                queue.clone(),
                random,
            )),
            Arc::new(use_cases::input::LeaveWorld::new(
                repos.world.clone(),
                queue.clone(),
            )),
            Arc::new(use_cases::input::MoveTo::new(queue.clone())),
            Arc::new(use_cases::input::SendWorldInput::new(queue)),
        );

        let history = Arc::new(use_cases::PreviousConversation::new(
            repos.conversation.clone(),
        ));

        let world = use_cases::WorldUseCases::new(Arc::new(use_cases::world::WorldState::new(
            repos.world.clone(),
            repos.world_status.clone(),
            repos.engine.clone(),
        )));

        Self {
            use_cases: UseCases {
                lifecycle,
                input,
                history,
                world,
            },
            repositories,
        }
    }
}
