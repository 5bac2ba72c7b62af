// PasteVault - Arbre de modules (crate library)
//
// Ce fichier constitue le point d'entree de la crate library de PasteVault,
// moteur d'historique du presse-papiers. Le binaire et les collaborateurs
// externes (service IPC, surveillance du presse-papiers, interface)
// n'utilisent que les operations publiques de `History` et ses evenements.
//
// # Modules
// - `config`    : configuration (fichier TOML, Settings, changements)
// - `constants` : constantes globales (defauts, bornes, format)
// - `error`     : types d'erreur centralises (PvError, PvResult)
// - `history`   : historique en memoire (elements, fusion, eviction,
//                 mots de passe, recherche, evenements)
// - `storage`   : persistance des profils sur disque

/// Configuration du moteur.
pub mod config;
/// Constantes globales.
pub mod constants;
/// Types d'erreur centralises.
pub mod error;
/// Historique en memoire.
pub mod history;
/// Persistance des profils.
pub mod storage;

pub use config::settings::{SettingChange, Settings};
pub use error::{PvError, PvResult};
pub use history::{History, HistoryEvent, Item, ItemKind, ItemState, UpdateAction, UpdateTarget};
