use crate::artifacts::session::error::ResolutionError;
use bytes::Bytes;
use std::io::ErrorKind;
use std::path::Path;

/// Working tree files, addressed relative to the repository root
#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    /// Read a file, or `None` when nothing regular exists at that path
    pub fn read_file(&self, file_path: &Path) -> Result<Option<Bytes>, ResolutionError> {
        let full_path = self.path.join(file_path);

        let metadata = match std::fs::metadata(&full_path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ResolutionError::WorkingTree {
                    path: file_path.to_path_buf(),
                    source,
                });
            }
        };

        if !metadata.is_file() {
            return Ok(None);
        }

        std::fs::read(&full_path)
            .map(|content| Some(content.into()))
            .map_err(|source| ResolutionError::WorkingTree {
                path: file_path.to_path_buf(),
                source,
            })
    }
}
