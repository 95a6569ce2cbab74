use directories::ProjectDirs;
use std::path::PathBuf;

/// Application directories following XDG spec
#[derive(Debug, Clone)]
pub struct Directories {
    /// Config directory (~/.config/bazaar)
    pub config: PathBuf,

    /// Data directory (~/.local/share/bazaar)
    pub data: PathBuf,

    /// Config file path
    pub config_file: PathBuf,

    /// Key-value storage file (theme, profile)
    pub storage_file: PathBuf,
}

impl Directories {
    /// Create a new `Directories` instance with standard XDG paths.
    ///
    /// Falls back to `./.bazaar` when no home directory can be determined.
    #[must_use]
    pub fn new() -> Self {
        let Some(project) = ProjectDirs::from("", "", "bazaar") else {
            return Self::with_base(PathBuf::from(".bazaar"));
        };

        let config = project.config_dir().to_path_buf();
        let data = project.data_dir().to_path_buf();

        Self {
            config_file: config.join("config.json"),
            storage_file: data.join("storage.json"),
            config,
            data,
        }
    }

    #[must_use]
    pub fn with_base(base: PathBuf) -> Self {
        Self {
            config_file: base.join("config.json"),
            storage_file: base.join("storage.json"),
            config: base.clone(),
            data: base,
        }
    }

    /// Ensure all directories exist.
    ///
    /// # Errors
    ///
    /// Returns an error if any directory cannot be created.
    pub fn ensure_exists(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.config)?;
        std::fs::create_dir_all(&self.data)?;
        Ok(())
    }
}

impl Default for Directories {
    fn default() -> Self {
        Self::new()
    }
}
