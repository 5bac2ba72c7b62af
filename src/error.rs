// PasteVault - Types d'erreur centralises
//
// Ce module definit l'enumeration `PvError` et le type alias
// `PvResult<T>` utilises dans toute la crate.
//
// # Categories d'erreurs
// - `InvalidIndex` : position hors de l'historique
// - `WrongKind`    : operation reservee a un autre type d'element
// - `ItemTooLarge` : element plus gros que le budget memoire
// - `Pattern`      : expression de recherche invalide
// - `Storage`      : erreur d'I/O disque (lecture/ecriture des profils)
// - `Config`       : erreur de parsing de la configuration
//
// Les violations de precondition sont detectees avant toute mutation :
// l'historique reste intact quand une erreur est retournee.

use thiserror::Error;

/// Enumeration de toutes les erreurs possibles dans PasteVault.
#[derive(Debug, Error)]
pub enum PvError {
    /// Position hors bornes
    #[error("[History] index {index} out of range (len={len})")]
    InvalidIndex { index: usize, len: usize },
    /// Type d'element incompatible avec l'operation
    #[error("[History] item at {index} is {found}, expected {expected}")]
    WrongKind {
        index: usize,
        expected: &'static str,
        found: &'static str,
    },
    /// Element trop volumineux pour le budget memoire
    #[error("[History] item of {size} bytes exceeds memory budget of {max} bytes")]
    ItemTooLarge { size: usize, max: usize },
    /// Motif de recherche invalide
    #[error("[Search] {0}")]
    Pattern(#[from] regex::Error),
    /// Erreur de lecture/ecriture disque
    #[error("[Storage] {0}")]
    Storage(#[from] std::io::Error),
    /// Erreur de configuration
    #[error("[Config] {0}")]
    Config(String),
}

/// Type Result specialise pour PasteVault.
pub type PvResult<T> = Result<T, PvError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PvError::InvalidIndex { index: 4, len: 2 };
        assert_eq!(err.to_string(), "[History] index 4 out of range (len=2)");
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: PvError = io.into();
        assert!(matches!(err, PvError::Storage(_)));
        assert!(err.to_string().starts_with("[Storage]"));
    }
}
