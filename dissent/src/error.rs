use dandelion_voting::Capability;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DissentError {
    #[error("dissent oracle is already initialized")]
    AlreadyInitialized,

    #[error("dissent oracle is not initialized")]
    NotInitialized,

    #[error("sender lacks {capability}")]
    AuthFailed { capability: Capability },
}
