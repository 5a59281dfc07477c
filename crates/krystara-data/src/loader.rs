//! Raw dump loader

use crate::error::{Error, Result};
use crate::schema::{UserDump, WorldDump};
use std::fs;
use std::path::Path;

/// Both dumps, parsed but not yet cross-referenced
#[derive(Debug, Clone, Default)]
pub struct RawData {
    pub world: WorldDump,
    pub user: UserDump,
}

/// Loader for the game-data and user dumps
pub struct Loader {
    world: Option<WorldDump>,
    user: Option<UserDump>,
}

impl Loader {
    /// Create a new loader
    pub fn new() -> Self {
        Self {
            world: None,
            user: None,
        }
    }

    /// Load the game-data dump from a file
    pub fn load_world_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let content = read_existing(path.as_ref())?;
        self.load_world_str(&content)
    }

    /// Load the user dump from a file
    pub fn load_user_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let content = read_existing(path.as_ref())?;
        self.load_user_str(&content)
    }

    /// Load the game-data dump from a JSON string
    pub fn load_world_str(&mut self, content: &str) -> Result<()> {
        let world: WorldDump = serde_json::from_str(content)?;
        tracing::debug!(
            troops = world.troops.as_ref().map_or(0, Vec::len),
            kingdoms = world.kingdoms.as_ref().map_or(0, Vec::len),
            "parsed game-data dump"
        );
        self.world = Some(world);
        Ok(())
    }

    /// Load the user dump from a JSON string
    pub fn load_user_str(&mut self, content: &str) -> Result<()> {
        let user: UserDump = serde_json::from_str(content)?;
        self.user = Some(user);
        Ok(())
    }

    /// Finish loading; both dumps must have been provided
    pub fn finish(self) -> Result<RawData> {
        let world = self
            .world
            .ok_or_else(|| Error::MissingField("game-data dump".to_string()))?;
        let user = self
            .user
            .ok_or_else(|| Error::MissingField("user dump".to_string()))?;
        Ok(RawData { world, user })
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Load both dumps from disk
pub fn load(world_path: impl AsRef<Path>, user_path: impl AsRef<Path>) -> Result<RawData> {
    let mut loader = Loader::new();
    loader.load_world_file(world_path)?;
    loader.load_user_file(user_path)?;
    loader.finish()
}

fn read_existing(path: &Path) -> Result<String> {
    if !path.is_file() {
        return Err(Error::NotFound(path.display().to_string()));
    }
    Ok(fs::read_to_string(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_strings() {
        let mut loader = Loader::new();
        loader.load_world_str(r#"{"Spells": [], "Troops": []}"#).unwrap();
        loader.load_user_str(r#"{"pEconomyModel": {}}"#).unwrap();

        let raw = loader.finish().unwrap();
        assert!(raw.world.spells.is_some());
        assert!(raw.user.economy.is_some());
    }

    #[test]
    fn test_finish_requires_both_dumps() {
        let mut loader = Loader::new();
        loader.load_world_str("{}").unwrap();
        assert!(matches!(loader.finish(), Err(Error::MissingField(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = load(dir.path().join("World.json"), dir.path().join("User.json"));
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[test]
    fn test_load_files() {
        let dir = tempfile::tempdir().unwrap();
        let world_path = dir.path().join("World.json");
        let user_path = dir.path().join("User.json");
        fs::File::create(&world_path)
            .unwrap()
            .write_all(br#"{"Kingdoms": []}"#)
            .unwrap();
        fs::File::create(&user_path)
            .unwrap()
            .write_all(br#"{"pEconomyModel": {}}"#)
            .unwrap();

        let raw = load(&world_path, &user_path).unwrap();
        assert!(raw.world.kingdoms.is_some());
    }

    #[test]
    fn test_malformed_json() {
        let mut loader = Loader::new();
        assert!(matches!(loader.load_world_str("{"), Err(Error::Json(_))));
    }
}
