use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid input path: {0}")]
    InvalidInput(PathBuf),
}

/// Output locations for the two derived notebooks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub to_complete: PathBuf,
    pub solution: PathBuf,
}

/// Read a notebook file as UTF-8 text
pub fn read_notebook(path: &Path) -> Result<String, IoError> {
    if !path.exists() {
        return Err(IoError::NotFound(path.to_path_buf()));
    }
    fs::read_to_string(path).map_err(IoError::Io)
}

/// Write content to a file, creating parent directories as needed
pub fn write_output(path: &Path, content: &str) -> Result<(), IoError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(IoError::Io)?;
    }

    fs::write(path, content).map_err(IoError::Io)
}

/// Default output paths: `<stem>_to_complete.<ext>` and `<stem>_solution.<ext>`,
/// next to the input unless `output_dir` is given.
pub fn default_output_paths(input: &Path, output_dir: Option<&Path>) -> Result<OutputPaths, IoError> {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| IoError::InvalidInput(input.to_path_buf()))?;
    let ext = input.extension().and_then(|e| e.to_str()).unwrap_or("ipynb");
    let dir = match output_dir {
        Some(dir) => dir.to_path_buf(),
        None => input.parent().map(Path::to_path_buf).unwrap_or_default(),
    };

    Ok(OutputPaths {
        to_complete: dir.join(format!("{stem}_to_complete.{ext}")),
        solution: dir.join(format!("{stem}_solution.{ext}")),
    })
}
