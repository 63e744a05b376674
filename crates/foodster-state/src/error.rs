use thiserror::Error;

#[derive(Debug, Error)]
pub enum StateError {
    /// The actor task has exited, so the command could not be delivered or
    /// answered.
    #[error("query state manager has stopped")]
    ManagerStopped,
}
