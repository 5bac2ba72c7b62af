// PasteVault - Structure de configuration et valeurs par defaut
//
// Ce module definit la structure `Settings` qui centralise les
// parametres lus par le moteur d'historique : seuils d'eviction,
// fusion des lignes croissantes, support des images, persistance et
// nom du profil courant.
//
// # Fichier
// ```toml
// [history]
// max_history_size = 100
// max_memory_usage = 100   # Mio
// growing_lines = false
// images_support = false
//
// [storage]
// save_history = true
// history_name = "history"
// data_dir = "/home/me/.local/share/pastevault"
// ```
//
// # Chargement
// `Settings::load(path)` lit le fichier TOML. Les cles absentes
// conservent leur defaut ; les valeurs hors bornes sont clampees (ex:
// max_history_size 1..100000). Un fichier illisible ou invalide donne
// la configuration par defaut. La configuration n'est jamais reecrite
// par le moteur.
//
// # Changements a chaud
// Une modification pendant l'execution est decrite par `SettingChange`
// et transmise a `History::apply_setting`, qui reapplique les seuils
// concernes.

use crate::constants::*;
use crate::error::{PvError, PvResult};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Contenu du fichier de configuration ; toutes les cles sont optionnelles.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    history: HistorySection,
    storage: StorageSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct HistorySection {
    max_history_size: Option<usize>,
    max_memory_usage: Option<u64>,
    growing_lines: Option<bool>,
    images_support: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StorageSection {
    save_history: Option<bool>,
    history_name: Option<String>,
    data_dir: Option<PathBuf>,
}

/// Configuration complete du moteur.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    // history
    pub max_history_size: usize,
    /// Budget memoire en Mio
    pub max_memory_usage: u64,
    pub growing_lines: bool,
    pub images_support: bool,
    // storage
    pub save_history: bool,
    pub history_name: String,
    // paths
    pub data_dir: PathBuf,
}

/// Modification d'un parametre pendant l'execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingChange {
    MaxHistorySize(usize),
    MaxMemoryUsage(u64),
    GrowingLines(bool),
    ImagesSupport(bool),
    SaveHistory(bool),
    HistoryName(String),
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_history_size: DEFAULT_MAX_HISTORY_SIZE,
            max_memory_usage: DEFAULT_MAX_MEMORY_USAGE,
            growing_lines: false,
            images_support: false,
            save_history: true,
            history_name: DEFAULT_HISTORY_NAME.to_string(),
            data_dir: default_data_dir(),
        }
    }
}

impl Settings {
    /// Charge la configuration depuis un fichier. Utilise les defauts si
    /// le fichier n'existe pas ou n'est pas valide.
    pub fn load(path: &Path) -> Self {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                log::debug!("no config at {}: {}", path.display(), e);
                return Settings::default();
            }
        };
        Self::from_toml(&text).unwrap_or_else(|e| {
            log::warn!("ignoring config {}: {}", path.display(), e);
            Settings::default()
        })
    }

    /// Construit la configuration depuis un texte TOML.
    pub fn from_toml(text: &str) -> PvResult<Self> {
        let file: ConfigFile = toml::from_str(text).map_err(|e| PvError::Config(e.to_string()))?;
        let mut settings = Settings::default();
        settings.apply_file(file);
        Ok(settings)
    }

    /// Applique les valeurs presentes dans le fichier.
    fn apply_file(&mut self, file: ConfigFile) {
        let ConfigFile { history, storage } = file;
        if let Some(v) = history.max_history_size {
            self.max_history_size = v.clamp(MIN_HISTORY_SIZE, MAX_HISTORY_SIZE);
        }
        if let Some(v) = history.max_memory_usage {
            self.max_memory_usage = v.clamp(MIN_MEMORY_USAGE, MAX_MEMORY_USAGE);
        }
        if let Some(v) = history.growing_lines {
            self.growing_lines = v;
        }
        if let Some(v) = history.images_support {
            self.images_support = v;
        }
        if let Some(v) = storage.save_history {
            self.save_history = v;
        }
        if let Some(name) = storage.history_name.filter(|n| !n.is_empty()) {
            self.history_name = name;
        }
        if let Some(dir) = storage.data_dir.filter(|d| !d.as_os_str().is_empty()) {
            self.data_dir = dir;
        }
    }

    /// Applique un changement et le retourne normalise (valeurs clampees).
    pub fn apply(&mut self, change: SettingChange) -> SettingChange {
        match change {
            SettingChange::MaxHistorySize(v) => {
                self.max_history_size = v.clamp(MIN_HISTORY_SIZE, MAX_HISTORY_SIZE);
                SettingChange::MaxHistorySize(self.max_history_size)
            }
            SettingChange::MaxMemoryUsage(v) => {
                self.max_memory_usage = v.clamp(MIN_MEMORY_USAGE, MAX_MEMORY_USAGE);
                SettingChange::MaxMemoryUsage(self.max_memory_usage)
            }
            SettingChange::GrowingLines(v) => {
                self.growing_lines = v;
                change
            }
            SettingChange::ImagesSupport(v) => {
                self.images_support = v;
                change
            }
            SettingChange::SaveHistory(v) => {
                self.save_history = v;
                change
            }
            SettingChange::HistoryName(ref name) => {
                self.history_name = name.clone();
                change
            }
        }
    }

    /// Budget memoire converti en octets.
    pub fn max_memory_bytes(&self) -> usize {
        usize::try_from(self.max_memory_usage.saturating_mul(MIB)).unwrap_or(usize::MAX)
    }
}

/// Chemin par defaut du fichier de configuration.
pub fn default_config_path() -> PathBuf {
    directories::ProjectDirs::from("", "", APP_DIR_NAME)
        .map(|dirs| dirs.config_dir().join(CONFIG_FILENAME))
        .unwrap_or_else(|| PathBuf::from(".").join(APP_DIR_NAME).join(CONFIG_FILENAME))
}

/// Repertoire des profils : `<donnees utilisateur>/pastevault`.
fn default_data_dir() -> PathBuf {
    directories::BaseDirs::new()
        .map(|dirs| dirs.data_dir().join(APP_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from(".").join(APP_DIR_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let s = Settings::default();
        assert_eq!(s.max_history_size, 100);
        assert_eq!(s.max_memory_usage, 100);
        assert_eq!(s.history_name, "history");
        assert!(s.save_history);
        assert!(!s.growing_lines);
        assert!(s.data_dir.ends_with(APP_DIR_NAME));
    }

    #[test]
    fn test_from_toml_clamps() {
        let s = Settings::from_toml(
            "[history]\nmax_history_size = 0\nmax_memory_usage = 999999\ngrowing_lines = true\n",
        )
        .unwrap();
        assert_eq!(s.max_history_size, MIN_HISTORY_SIZE);
        assert_eq!(s.max_memory_usage, MAX_MEMORY_USAGE);
        assert!(s.growing_lines);
        assert!(!s.images_support);
    }

    #[test]
    fn test_from_toml_storage_section() {
        let s = Settings::from_toml(
            "[storage]\nsave_history = false\nhistory_name = \"work\"\ndata_dir = \"/tmp/pv\"\n",
        )
        .unwrap();
        assert!(!s.save_history);
        assert_eq!(s.history_name, "work");
        assert_eq!(s.data_dir, PathBuf::from("/tmp/pv"));
        assert_eq!(s.max_history_size, DEFAULT_MAX_HISTORY_SIZE);
    }

    #[test]
    fn test_from_toml_empty_name_keeps_default() {
        let s = Settings::from_toml("[storage]\nhistory_name = \"\"\n").unwrap();
        assert_eq!(s.history_name, DEFAULT_HISTORY_NAME);
    }

    #[test]
    fn test_from_toml_wrong_type() {
        let err = Settings::from_toml("[history]\nmax_history_size = \"lots\"\n").unwrap_err();
        assert!(matches!(err, PvError::Config(_)));
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let s = Settings::load(&dir.path().join("absent.toml"));
        assert_eq!(s, Settings::default());
    }

    #[test]
    fn test_load_invalid_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        fs::write(&path, "[history\nmax_history_size = 3\n").unwrap();
        assert_eq!(Settings::load(&path), Settings::default());
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        fs::write(&path, "# clips\n[history]\nmax_history_size = 250\nimages_support = true\n").unwrap();
        let s = Settings::load(&path);
        assert_eq!(s.max_history_size, 250);
        assert!(s.images_support);
    }

    #[test]
    fn test_apply_change_normalizes() {
        let mut s = Settings::default();
        assert_eq!(s.apply(SettingChange::MaxHistorySize(0)), SettingChange::MaxHistorySize(1));
        assert_eq!(s.max_history_size, 1);
        s.apply(SettingChange::HistoryName("other".into()));
        assert_eq!(s.history_name, "other");
    }

    #[test]
    fn test_max_memory_bytes() {
        let mut s = Settings::default();
        s.max_memory_usage = 2;
        assert_eq!(s.max_memory_bytes(), 2 * 1024 * 1024);
    }
}
