use thiserror::Error;

#[derive(Error, Debug)]
pub enum LibraryError {
    #[error(
        "Playlist {playlist_id} cannot hold more than {max} entries \
         ({current} present, {requested} requested)"
    )]
    CapacityExceeded {
        playlist_id: String,
        current: usize,
        requested: usize,
        max: usize,
    },

    #[error("Position {position} is out of range for playlist {playlist_id} with {len} entries")]
    PositionOutOfRange {
        playlist_id: String,
        position: usize,
        len: usize,
    },

    #[error("Playlist {0} has no entries")]
    EmptyPlaylist(String),

    #[error("Playlist state inconsistent: {0}")]
    Inconsistent(String),
}

pub type Result<T> = std::result::Result<T, LibraryError>;
