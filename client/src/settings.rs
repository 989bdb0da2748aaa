//! Config loading
//!
//! Runs in `PreStartup` so every `Startup` system can rely on `Res<WalkConfig>`.

use bevy::prelude::*;
use shared::{WalkConfig, CONFIG_FILE};
use std::path::{Path, PathBuf};

/// Inserts the asset folder and loads the config before `Startup`
pub struct SettingsPlugin {
    pub asset_root: AssetRoot,
}

impl Plugin for SettingsPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(self.asset_root.clone())
            .add_systems(PreStartup, load_config);
    }
}

/// Folder the asset server reads from (bundled or development)
#[derive(Resource, Clone, Debug)]
pub struct AssetRoot(pub PathBuf);

impl AssetRoot {
    /// Resolve the asset folder the same way Bevy's file reader does:
    /// `BEVY_ASSET_ROOT`, then `CARGO_MANIFEST_DIR`, then the executable's folder.
    pub fn resolve(file_path: &str) -> Self {
        let path = Path::new(file_path);
        if path.is_absolute() {
            return Self(path.to_path_buf());
        }

        let base = std::env::var_os("BEVY_ASSET_ROOT")
            .or_else(|| std::env::var_os("CARGO_MANIFEST_DIR"))
            .map(PathBuf::from)
            .or_else(|| {
                std::env::current_exe()
                    .ok()
                    .and_then(|exe| exe.parent().map(Path::to_path_buf))
            })
            .unwrap_or_default();
        Self(base.join(path))
    }

    pub fn join(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.0.join(relative)
    }
}

/// Load `config.ron` from the asset folder, falling back to defaults
pub fn load_config(mut commands: Commands, asset_root: Res<AssetRoot>) {
    let path = asset_root.join(CONFIG_FILE);
    let config = match WalkConfig::load_from_file(&path) {
        Ok(config) => {
            info!("Loaded config from {:?}", path);
            config
        }
        Err(e) => {
            warn!("{e}; using default config");
            WalkConfig::default()
        }
    };
    commands.insert_resource(config);
}
