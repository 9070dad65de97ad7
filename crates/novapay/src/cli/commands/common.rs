//! Helpers shared by the command handlers: the NovaPay home directory and
//! reading and writing request bodies and key files.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use novapay_core::{Config, ConfigError, ConfigLoader};

/// Path argument that selects stdin instead of a file.
pub const STDIN_PATH: &str = "-";

/// The NovaPay home directory (`~/.novapay` by default).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Home {
    dir: PathBuf,
}

impl Home {
    /// Use `dir` as the home directory.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Resolve the home directory, falling back to `~/.novapay`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoHomeDirectory`] if no directory is given and
    /// the user's home cannot be determined.
    pub fn resolve(dir: Option<PathBuf>) -> Result<Self, ConfigError> {
        match dir {
            Some(dir) => Ok(Self::new(dir)),
            None => novapay_core::config_loader::default_base_dir().map(Self::new),
        }
    }

    /// The directory itself.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Loader for `<home>/config.toml`.
    #[must_use]
    pub fn loader(&self) -> ConfigLoader {
        ConfigLoader::with_base_dir(self.dir.clone())
    }

    /// The effective configuration; defaults when no file exists.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file exists but cannot be read or parsed.
    pub fn config(&self) -> Result<Config, ConfigError> {
        self.loader().load()
    }
}

/// Which kind of key a file holds; private keys are written owner-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyFileKind {
    /// Private key, mode 0600 on Unix.
    Private,
    /// Public key, default permissions.
    Public,
}

/// Read a request body from `path`, or stdin for `-`.
///
/// # Errors
///
/// Returns the underlying I/O error.
pub fn read_input(path: &Path) -> io::Result<Vec<u8>> {
    if path.as_os_str() == STDIN_PATH {
        let mut buffer = Vec::new();
        io::stdin().lock().read_to_end(&mut buffer)?;
        return Ok(buffer);
    }
    fs::read(path)
}

/// Write a PEM document, refusing to replace an existing file unless `force`.
///
/// # Errors
///
/// Returns [`io::ErrorKind::AlreadyExists`] if `path` exists and `force` is
/// not set, and other I/O errors as they occur.
pub fn write_key_file(path: &Path, pem: &str, kind: KeyFileKind, force: bool) -> io::Result<()> {
    let mut file = open_key_file(path, kind, force)?;
    file.write_all(pem.as_bytes())?;
    if !pem.ends_with('\n') {
        file.write_all(b"\n")?;
    }
    Ok(())
}

/// Open `path` for writing with private keys already restricted to 0600.
///
/// `mode` only applies to newly created files, so a forced overwrite of an
/// existing file is tightened through the handle before any byte is written.
fn open_key_file(path: &Path, kind: KeyFileKind, force: bool) -> io::Result<File> {
    let mut options = OpenOptions::new();
    options.write(true);
    if force {
        options.create(true).truncate(true);
    } else {
        options.create_new(true);
    }

    #[cfg(unix)]
    if kind == KeyFileKind::Private {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let file = options.open(path)?;

    #[cfg(unix)]
    if kind == KeyFileKind::Private {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
    }

    Ok(file)
}
