use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DiscoverError {
    #[error("targets directory does not exist: {}", .0.display())]
    NotFound(PathBuf),

    #[error("targets path is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("failed to read targets directory {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
