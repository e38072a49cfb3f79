//! Content factory for building match setups from a data directory.

use std::path::{Path, PathBuf};

use arena_core::{GameConfig, MatchSetup};

use crate::loaders::{ConfigLoader, LoadResult, MapLoader};

/// Loads match content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// └── maps/
///     ├── duel.ron
///     └── canopy.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Loads `config.toml`, falling back to defaults when it is absent.
    pub fn load_config(&self) -> LoadResult<GameConfig> {
        let path = self.data_dir.join("config.toml");
        if !path.exists() {
            return Ok(GameConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Loads `maps/{map_name}.ron` with the directory's rule config.
    pub fn load_setup(&self, map_name: &str) -> LoadResult<MatchSetup> {
        let config = self.load_config()?;
        let path = self.map_path(map_name);
        MapLoader::load(&path, config)
    }

    /// Names of every map in `maps/`, sorted.
    pub fn map_names(&self) -> LoadResult<Vec<String>> {
        let dir = self.data_dir.join("maps");
        let entries = std::fs::read_dir(&dir)
            .map_err(|e| anyhow::anyhow!("Failed to list {}: {}", dir.display(), e))?;
        let mut names = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "ron") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    names.push(stem.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    pub fn map_path(&self, map_name: &str) -> PathBuf {
        self.data_dir.join("maps").join(format!("{}.ron", map_name))
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
        assert_eq!(factory.map_path("duel"), Path::new("/tmp/data/maps/duel.ron"));
    }

    #[test]
    fn setup_uses_directory_config() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("maps")).unwrap();
        std::fs::write(dir.path().join("config.toml"), "max_rounds = 12\n").unwrap();
        std::fs::write(
            dir.path().join("maps/tiny.ron"),
            r#"(
                name: "tiny",
                terrain: ["...."],
                robots: [
                    (team: A, robot_type: Archon, position: (0, 0)),
                    (team: B, robot_type: Archon, position: (3, 0)),
                ],
            )"#,
        )
        .unwrap();
        std::fs::write(dir.path().join("maps/notes.txt"), "ignored").unwrap();

        let factory = ContentFactory::new(dir.path());
        assert_eq!(factory.map_names().unwrap(), vec!["tiny".to_string()]);
        let setup = factory.load_setup("tiny").unwrap();
        assert_eq!(setup.config.max_rounds, 12);
        assert_eq!(setup.robots.len(), 2);
    }
}
