// PasteVault - Structure Item
// Represente un element de l'historique du presse-papiers
//
// Ce module definit les types de donnees fondamentaux de l'historique :
// - `ItemKind`  : type de contenu (texte, image, URIs, mot de passe)
// - `ItemState` : element actif (tete de l'historique) ou inactif
// - `Item`      : element complet avec valeur, rendu et taille
//
// # Taille
// La taille comptee pour le budget memoire est la longueur de la valeur
// plus celle du rendu, plus la taille du fichier pour une image (mesuree
// une seule fois a la construction). Elle ne depend pas de l'etat.
//
// # Egalite
// `equals` compare uniquement le type et la valeur, pas l'etat, le nom
// ni la date.
//
// # Ressources externes
// Une image reference un fichier sur disque. `dispose` le supprime :
// seul l'historique appelle `dispose`, lors d'une suppression
// destructive, pour que le fichier ne soit libere qu'une fois.

use chrono::{DateTime, Local, Utc};
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

/// Prefixe retire des URIs de fichiers pour l'affichage.
const FILE_SCHEME: &str = "file://";

/// Type de contenu d'un element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Text,
    Image,
    Uris,
    Password,
}

impl ItemKind {
    /// Nom du type tel qu'ecrit dans les fichiers de profil.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "Text",
            Self::Image => "Image",
            Self::Uris => "Uris",
            Self::Password => "Password",
        }
    }

    /// Parse depuis le nom persiste (sensible a la casse).
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Text" => Some(Self::Text),
            "Image" => Some(Self::Image),
            "Uris" => Some(Self::Uris),
            "Password" => Some(Self::Password),
            _ => None,
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Etat d'un element dans l'historique.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ItemState {
    #[default]
    Idle,
    Active,
}

/// Donnees propres a chaque type.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Variant {
    Text,
    Image { date: DateTime<Utc>, file_size: usize },
    Uris { uris: Vec<String> },
    Password { name: Option<String> },
}

/// Un element de l'historique.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    variant: Variant,
    value: String,
    display_string: String,
    state: ItemState,
}

impl Item {
    /// Cree un element texte.
    pub fn text(value: impl Into<String>) -> Self {
        Self::build(Variant::Text, value.into())
    }

    /// Cree un element URIs a partir d'une liste separee par des retours
    /// a la ligne. Les lignes vides sont ignorees.
    pub fn uris(value: impl Into<String>) -> Self {
        let value = value.into();
        let uris = value
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect();
        Self::build(Variant::Uris { uris }, value)
    }

    /// Cree un element mot de passe.
    pub fn password(name: Option<&str>, secret: impl Into<String>) -> Self {
        Self::build(
            Variant::Password { name: name.map(str::to_string) },
            secret.into(),
        )
    }

    /// Cree un element image a partir d'un fichier deja ecrit sur disque.
    /// La taille du fichier est lue une fois ; un fichier absent compte 0.
    pub fn image(path: impl Into<String>, date: DateTime<Utc>) -> Self {
        let path = path.into();
        let file_size = fs::metadata(&path)
            .map(|m| usize::try_from(m.len()).unwrap_or(usize::MAX))
            .unwrap_or(0);
        Self::build(Variant::Image { date, file_size }, path)
    }

    fn build(variant: Variant, value: String) -> Self {
        let display_string = render(&variant, &value);
        Self {
            variant,
            value,
            display_string,
            state: ItemState::Idle,
        }
    }

    /// Type de l'element.
    pub fn kind(&self) -> ItemKind {
        match self.variant {
            Variant::Text => ItemKind::Text,
            Variant::Image { .. } => ItemKind::Image,
            Variant::Uris { .. } => ItemKind::Uris,
            Variant::Password { .. } => ItemKind::Password,
        }
    }

    /// Contenu brut (texte, chemin d'image, liste d'URIs ou secret).
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Rendu lisible de la valeur.
    pub fn display_string(&self) -> &str {
        &self.display_string
    }

    /// Cout en octets pour le budget memoire.
    pub fn size(&self) -> usize {
        let extra = match self.variant {
            Variant::Image { file_size, .. } => file_size,
            _ => 0,
        };
        self.value.len() + self.display_string.len() + extra
    }

    pub fn state(&self) -> ItemState {
        self.state
    }

    pub fn set_state(&mut self, state: ItemState) {
        self.state = state;
    }

    pub fn is_active(&self) -> bool {
        self.state == ItemState::Active
    }

    /// Nom d'un mot de passe (None pour les autres types ou sans nom).
    pub fn name(&self) -> Option<&str> {
        match &self.variant {
            Variant::Password { name } => name.as_deref(),
            _ => None,
        }
    }

    /// Renomme un mot de passe. Sans effet sur les autres types.
    pub fn set_name(&mut self, new_name: Option<&str>) {
        if let Variant::Password { name } = &mut self.variant {
            *name = new_name.map(str::to_string);
            self.display_string = render(&self.variant, &self.value);
        }
    }

    /// Date de capture d'une image.
    pub fn date(&self) -> Option<DateTime<Utc>> {
        match self.variant {
            Variant::Image { date, .. } => Some(date),
            _ => None,
        }
    }

    /// URIs d'un element URIs (vide pour les autres types).
    pub fn uris_list(&self) -> &[String] {
        match &self.variant {
            Variant::Uris { uris } => uris,
            _ => &[],
        }
    }

    /// Egalite de contenu : meme type et meme valeur.
    pub fn equals(&self, other: &Item) -> bool {
        self.kind() == other.kind() && self.value == other.value
    }

    /// Vrai si l'element est ecrit dans les fichiers de profil.
    pub fn is_persistent(&self) -> bool {
        !matches!(self.variant, Variant::Password { .. })
    }

    /// Libere les ressources externes de l'element (fichier d'une image).
    pub fn dispose(self) {
        if let Variant::Image { .. } = self.variant {
            remove_file_if_exists(Path::new(&self.value));
        }
    }
}

/// Supprime un fichier ; l'absence du fichier n'est pas une erreur.
pub(crate) fn remove_file_if_exists(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => log::debug!("removed {}", path.display()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => log::warn!("could not remove {}: {}", path.display(), e),
    }
}

/// Calcule le rendu d'une valeur selon son type.
fn render(variant: &Variant, value: &str) -> String {
    match variant {
        Variant::Text => value.to_string(),
        Variant::Image { date, .. } => {
            format!("[Image, {}]", date.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S"))
        }
        Variant::Uris { uris } => {
            let shown: Vec<&str> = uris
                .iter()
                .map(|u| u.strip_prefix(FILE_SCHEME).unwrap_or(u))
                .collect();
            format!("[Files] {}", shown.join(" "))
        }
        Variant::Password { name: Some(name) } => format!("[Password] {}", name),
        Variant::Password { name: None } => "[Password]".to_string(),
    }
}
