// PasteVault - Profils sur disque
//
// Un profil est un fichier `<nom>.xml` dans le repertoire de donnees.
// Ce module resout les chemins, cree le repertoire et liste les profils.

use crate::constants::HISTORY_FILE_SUFFIX;
use crate::error::{PvError, PvResult};
use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

/// Chemin du fichier d'un profil. Le nom doit etre un nom de fichier
/// simple (ni vide, ni separateur, ni `.`/`..`).
pub fn history_file_path(dir: &Path, name: &str) -> PvResult<PathBuf> {
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(PvError::Config(format!("invalid history name {:?}", name)));
    }
    Ok(dir.join(format!("{}{}", name, HISTORY_FILE_SUFFIX)))
}

/// Cree le repertoire des profils s'il n'existe pas.
pub fn ensure_history_dir(dir: &Path) -> PvResult<()> {
    fs::create_dir_all(dir)?;
    Ok(())
}

/// Cree un fichier de profil vide ; un fichier existant est conserve.
pub fn create_placeholder(path: &Path) -> PvResult<()> {
    match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Supprime un fichier de profil ; un fichier absent n'est pas une erreur.
pub fn delete_history_file(path: &Path) -> PvResult<()> {
    match fs::remove_file(path) {
        Ok(()) => {
            log::debug!("deleted {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Noms des profils presents dans `dir`, tries. Un repertoire absent
/// donne une liste vide.
pub fn list_histories(dir: &Path) -> PvResult<Vec<String>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let file_name = entry.file_name();
        if let Some(name) = file_name
            .to_str()
            .and_then(|f| f.strip_suffix(HISTORY_FILE_SUFFIX))
            .filter(|n| !n.is_empty())
        {
            names.push(name.to_string());
        }
    }
    names.sort();
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_file_path() {
        assert_eq!(
            history_file_path(Path::new("/data"), "work").unwrap(),
            PathBuf::from("/data/work.xml")
        );
    }

    #[test]
    fn test_invalid_history_names() {
        for name in ["", "..", "a/b", "a\\b"] {
            let err = history_file_path(Path::new("/data"), name).unwrap_err();
            assert!(matches!(err, PvError::Config(_)), "{:?}", name);
        }
    }

    #[test]
    fn test_list_histories() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.xml"), "").unwrap();
        fs::write(dir.path().join("a.xml"), "").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();
        fs::create_dir(dir.path().join("sub.xml")).unwrap();
        assert_eq!(list_histories(dir.path()).unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_list_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(list_histories(&dir.path().join("absent")).unwrap().is_empty());
    }

    #[test]
    fn test_placeholder_keeps_existing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("p.xml");
        fs::write(&path, "content").unwrap();
        create_placeholder(&path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "content");
    }

    #[test]
    fn test_delete_missing_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gone.xml");
        delete_history_file(&path).unwrap();
        fs::write(&path, "").unwrap();
        delete_history_file(&path).unwrap();
        assert!(!path.exists());
    }
}
