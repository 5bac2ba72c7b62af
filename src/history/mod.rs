// PasteVault - Module history
// Moteur d'historique du presse-papiers en memoire
//
// # Sous-modules
// - `item`     : element (texte, image, URIs, mot de passe), etat, taille
//                et rendu lisible
// - `store`    : historique ordonne `History` avec fusion des lignes
//                croissantes, eviction par nombre et par memoire, et
//                persistance du profil courant
// - `password` : registre des mots de passe par nom
// - `search`   : recherche par expression reguliere ou par position
// - `event`    : evenements de changement et abonnes
//
// # Architecture
// L'historique possede ses elements dans un Vec (plus recent en tete).
// Toute mutation sauvegarde le profil puis notifie les abonnes.

/// Evenements emis apres chaque mutation.
pub mod event;
/// Element de l'historique.
pub mod item;
/// Registre des mots de passe.
pub mod password;
/// Recherche dans l'historique.
pub mod search;
/// Historique ordonne, fusion et eviction.
pub mod store;

pub use event::{HistoryEvent, UpdateAction, UpdateTarget};
pub use item::{Item, ItemKind, ItemState};
pub use store::History;
