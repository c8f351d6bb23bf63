//! Named input sources: standard input or a file on disk.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;

/// Display name used for standard input in diagnostics.
pub const STDIN_NAME: &str = "<stdin>";

/// One input the scanner reads from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Stdin,
    File(PathBuf),
}

impl InputSource {
    /// Build the ordered source list from the file arguments.
    ///
    /// No files means standard input. A `-` argument also means standard
    /// input, which can only be consumed once; repeats are returned in the
    /// second list so the caller can report them.
    pub fn from_args(files: &[PathBuf]) -> (Vec<InputSource>, Vec<PathBuf>) {
        if files.is_empty() {
            return (vec![InputSource::Stdin], Vec::new());
        }

        let mut sources = Vec::with_capacity(files.len());
        let mut duplicates = Vec::new();
        let mut stdin_used = false;

        for file in files {
            if file.as_os_str() == "-" {
                if stdin_used {
                    duplicates.push(file.clone());
                    continue;
                }
                stdin_used = true;
                sources.push(InputSource::Stdin);
            } else {
                sources.push(InputSource::File(file.clone()));
            }
        }

        (sources, duplicates)
    }

    pub fn name(&self) -> String {
        match self {
            InputSource::Stdin => STDIN_NAME.to_string(),
            InputSource::File(path) => path.display().to_string(),
        }
    }

    /// Open the source for line reading.
    ///
    /// The returned reader owns the file handle; dropping it closes the file.
    pub fn open(&self) -> io::Result<Box<dyn BufRead>> {
        match self {
            InputSource::Stdin => Ok(Box::new(io::stdin().lock())),
            InputSource::File(path) => {
                let file = File::open(path)?;
                Ok(Box::new(BufReader::new(file)))
            }
        }
    }
}
