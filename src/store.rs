//! Local mirror of exported jobs and the plugin manifest.
//!
//! Jobs live at `<jobs_dir>/<name>/config.xml`; the plugin manifest is a
//! single text file. Paths are resolved relative to the working directory
//! unless they are absolute.

use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8::Dir};
use thiserror::Error;

/// File name of a job definition inside its directory.
pub const JOB_CONFIG_FILE: &str = "config.xml";

/// Errors raised while reading or writing the local mirror.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum StoreError {
    /// Raised when file system operations fail.
    #[error("failed to access {path}: {message}")]
    Io {
        /// Path that could not be accessed.
        path: Utf8PathBuf,
        /// Human-readable error message.
        message: String,
    },
    /// Raised when a job name cannot be used as a directory name.
    #[error("job name {name:?} cannot be stored as a directory")]
    InvalidJobName {
        /// Offending job name.
        name: String,
    },
}

/// Directory layout used by export and import.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LocalStore {
    jobs_dir: Utf8PathBuf,
    plugins_file: Utf8PathBuf,
}

impl LocalStore {
    /// Creates a store rooted at `jobs_dir` with the manifest at
    /// `plugins_file`.
    #[must_use]
    pub fn new(jobs_dir: impl Into<Utf8PathBuf>, plugins_file: impl Into<Utf8PathBuf>) -> Self {
        Self {
            jobs_dir: jobs_dir.into(),
            plugins_file: plugins_file.into(),
        }
    }

    /// Directory holding one subdirectory per job.
    #[must_use]
    pub fn jobs_dir(&self) -> &Utf8Path {
        &self.jobs_dir
    }

    /// Path of the plugin manifest.
    #[must_use]
    pub fn plugins_file(&self) -> &Utf8Path {
        &self.plugins_file
    }

    /// Writes `config_xml` to `<jobs_dir>/<name>/config.xml`, creating
    /// directories as needed and replacing any previous definition.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidJobName`] for names that are empty or
    /// contain path separators, or [`StoreError::Io`] when writing fails.
    pub fn write_job_config(&self, name: &str, config_xml: &str) -> Result<Utf8PathBuf, StoreError> {
        validate_job_name(name)?;
        let job_dir = self.jobs_dir.join(name);
        let dir = create_dir(&job_dir)?;
        let path = job_dir.join(JOB_CONFIG_FILE);
        dir.write(JOB_CONFIG_FILE, config_xml)
            .map_err(|err| io_error(&path, &err))?;
        Ok(path)
    }

    /// Reads the definition stored for job `name`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] when the file is missing or unreadable.
    pub fn read_job_config(&self, name: &str) -> Result<String, StoreError> {
        validate_job_name(name)?;
        let job_dir = self.jobs_dir.join(name);
        let dir = open_dir(&job_dir)?;
        dir.read_to_string(JOB_CONFIG_FILE)
            .map_err(|err| io_error(&job_dir.join(JOB_CONFIG_FILE), &err))
    }

    /// Names of the immediate subdirectories of the jobs directory, sorted.
    ///
    /// Plain files in the jobs directory are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] when the directory cannot be listed.
    pub fn job_names(&self) -> Result<Vec<String>, StoreError> {
        let dir = open_dir(&self.jobs_dir)?;
        let entries = dir
            .entries()
            .map_err(|err| io_error(&self.jobs_dir, &err))?;
        let mut names = Vec::new();
        for item in entries {
            let entry = item.map_err(|err| io_error(&self.jobs_dir, &err))?;
            let is_dir = entry
                .file_type()
                .map_err(|err| io_error(&self.jobs_dir, &err))?
                .is_dir();
            if is_dir {
                names.push(
                    entry
                        .file_name()
                        .map_err(|err| io_error(&self.jobs_dir, &err))?,
                );
            }
        }
        names.sort();
        Ok(names)
    }

    /// Replaces the plugin manifest with `contents`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] when writing fails.
    pub fn write_plugins_manifest(&self, contents: &str) -> Result<(), StoreError> {
        let (parent, file_name) = split_file(&self.plugins_file)?;
        let dir = create_dir(parent)?;
        dir.write(file_name, contents)
            .map_err(|err| io_error(&self.plugins_file, &err))
    }

    /// Reads the plugin manifest.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] when the manifest is missing or unreadable.
    pub fn read_plugins_manifest(&self) -> Result<String, StoreError> {
        let (parent, file_name) = split_file(&self.plugins_file)?;
        let dir = open_dir(parent)?;
        dir.read_to_string(file_name)
            .map_err(|err| io_error(&self.plugins_file, &err))
    }
}

impl Default for LocalStore {
    fn default() -> Self {
        Self::new("jobs", "plugins.txt")
    }
}

fn validate_job_name(name: &str) -> Result<(), StoreError> {
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(StoreError::InvalidJobName {
            name: name.to_owned(),
        });
    }
    Ok(())
}

fn split_file(path: &Utf8Path) -> Result<(&Utf8Path, &str), StoreError> {
    let file_name = path.file_name().ok_or_else(|| StoreError::Io {
        path: path.to_path_buf(),
        message: String::from("path is missing a file name"),
    })?;
    let parent = path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    Ok((parent, file_name))
}

fn open_dir(path: &Utf8Path) -> Result<Dir, StoreError> {
    Dir::open_ambient_dir(path, ambient_authority()).map_err(|err| io_error(path, &err))
}

fn create_dir(path: &Utf8Path) -> Result<Dir, StoreError> {
    Dir::create_ambient_dir_all(path, ambient_authority()).map_err(|err| io_error(path, &err))?;
    open_dir(path)
}

fn io_error(path: &Utf8Path, err: &io::Error) -> StoreError {
    StoreError::Io {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}
