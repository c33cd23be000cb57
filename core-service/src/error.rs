use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Playlist cannot have more than {max} tracks")]
    CapacityExceeded { max: usize },

    #[error("Cannot remove tracks at invalid position(s)")]
    InvalidPosition,

    #[error("Playlist operation failed")]
    OperationFailed,
}

pub type Result<T> = std::result::Result<T, ServiceError>;
