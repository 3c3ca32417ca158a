use log::*;
use ls8cpu::{
    image::{self, ImageError},
    Ram,
};
use std::{
    fs, io,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// The program never made it into memory.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("{} not found!", .path.display())]
    NotFound { path: PathBuf },
    #[error("could not read {}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{} is not a program image", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: ImageError,
    },
}

/// Read the program image at `path` and put it in a fresh RAM.
pub fn load(path: &Path) -> Result<Ram, LoadError> {
    info!("Attempting to open path: '{}'", path.display());
    let text = fs::read_to_string(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => LoadError::NotFound {
            path: path.to_owned(),
        },
        _ => LoadError::Unreadable {
            path: path.to_owned(),
            source,
        },
    })?;
    let malformed = |source: ImageError| LoadError::Malformed {
        path: path.to_owned(),
        source,
    };
    let bytes = image::parse(&text).map_err(malformed)?;
    info!("Program is {} bytes", bytes.len());
    Ram::from_image(&bytes).map_err(|_| malformed(ImageError::TooLarge { len: bytes.len() }))
}
