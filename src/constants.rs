// PasteVault - Constantes globales
//
// Ce module centralise les constantes de la crate :
// - Valeurs par defaut de la configuration
// - Bornes de validation des parametres
// - Format des fichiers de profil (extension, en-tetes)
// - Noms de fichiers et repertoires
//
// Les constantes sont utilisees par les modules config, history et
// storage pour garantir la coherence des valeurs.

/// Nombre max d'elements par defaut
pub const DEFAULT_MAX_HISTORY_SIZE: usize = 100;

/// Budget memoire par defaut (Mio)
pub const DEFAULT_MAX_MEMORY_USAGE: u64 = 100;

/// Nom du profil par defaut
pub const DEFAULT_HISTORY_NAME: &str = "history";

/// Bornes du nombre d'elements
pub const MIN_HISTORY_SIZE: usize = 1;
pub const MAX_HISTORY_SIZE: usize = 100_000;

/// Bornes du budget memoire (Mio)
pub const MIN_MEMORY_USAGE: u64 = 1;
pub const MAX_MEMORY_USAGE: u64 = 16_384;

/// Octets par Mio
pub const MIB: u64 = 1024 * 1024;

/// Extension des fichiers de profil
pub const HISTORY_FILE_SUFFIX: &str = ".xml";

/// Declaration en tete de chaque fichier de profil
pub const DOCUMENT_HEADER: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";

/// Version du format de profil
pub const HISTORY_FORMAT_VERSION: &str = "1.0";

/// Taille des blocs lus pendant le chargement d'un profil (octets)
pub const LOAD_CHUNK_SIZE: usize = 8 * 1024;

/// Longueur max (exclue) d'un motif purement numerique interprete comme index
pub const SEARCH_INDEX_MAX_LEN: usize = 5;

/// Nom du dossier application dans le repertoire de donnees utilisateur
pub const APP_DIR_NAME: &str = "pastevault";

/// Nom du fichier de configuration
pub const CONFIG_FILENAME: &str = "config.toml";
