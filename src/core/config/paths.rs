use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_PATH_ENV: &str = "REVIEW_QA_CONFIG_PATH";

#[derive(Debug, Clone)]
pub struct AppPaths {
    pub project_root: PathBuf,
    pub config_path: PathBuf,
    pub log_dir: PathBuf,
}

impl AppPaths {
    pub fn new() -> Self {
        let project_root = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::with_root(project_root)
    }

    pub fn with_root(project_root: PathBuf) -> Self {
        let config_path = discover_config_path(&project_root);
        let log_dir = project_root.join("logs");
        AppPaths {
            project_root,
            config_path,
            log_dir,
        }
    }

    /// Point logs at `dir`, resolved against the project root when relative.
    pub fn with_log_dir(mut self, dir: &str) -> Self {
        self.log_dir = self.resolve(dir);
        self
    }

    pub fn resolve(&self, path: &str) -> PathBuf {
        let candidate = Path::new(path);
        if candidate.is_absolute() {
            candidate.to_path_buf()
        } else {
            self.project_root.join(candidate)
        }
    }

    pub fn ensure_log_dir(&self) {
        let _ = fs::create_dir_all(&self.log_dir);
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}

fn discover_config_path(project_root: &Path) -> PathBuf {
    if let Ok(path) = env::var(CONFIG_PATH_ENV) {
        return PathBuf::from(path);
    }
    project_root.join("config.yml")
}
