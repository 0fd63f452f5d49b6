use std::any::TypeId;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("state {name} ({type_id:?}) is not registered in StateCtx")]
    StateNotFound { type_id: TypeId, name: &'static str },
    #[error("compute {name} ({type_id:?}) is not registered in StateCtx")]
    ComputeNotFound { type_id: TypeId, name: &'static str },
    #[error("command {name} ({type_id:?}) is not registered in StateCtx")]
    CommandNotFound { type_id: TypeId, name: &'static str },
}

impl Error {
    pub fn state_not_found(type_id: TypeId, name: &'static str) -> Self {
        Self::StateNotFound { type_id, name }
    }

    pub fn compute_not_found(type_id: TypeId, name: &'static str) -> Self {
        Self::ComputeNotFound { type_id, name }
    }

    pub fn command_not_found(type_id: TypeId, name: &'static str) -> Self {
        Self::CommandNotFound { type_id, name }
    }
}
