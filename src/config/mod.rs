// PasteVault - Module config
// Lecture de la configuration du moteur
//
// Ce module gere la configuration de PasteVault via un fichier TOML
// a deux sections (`[history]`, `[storage]`).
//
// # Sous-modules
// - `settings` : structure Settings (seuils, options, profil courant)
//                avec valeurs par defaut et validation des plages, plus
//                les changements a chaud (`SettingChange`).
//
// # Utilisation
// ```rust,ignore
// let settings = Settings::load(&config_path);
// // Les valeurs manquantes utilisent les defauts
// ```

/// Structure de configuration et valeurs par defaut.
pub mod settings;
