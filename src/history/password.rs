// PasteVault - Mots de passe
//
// Registre des mots de passe au sein de l'historique. Un texte peut etre
// converti sur place en mot de passe (meme valeur secrete, nom libre).
// Les recherches par nom prennent le premier mot de passe portant ce nom
// exact ; les noms ne sont pas uniques.
// Les mots de passe ne sont jamais ecrits sur disque.

use crate::error::PvResult;
use crate::history::item::{Item, ItemKind};
use crate::history::event::{UpdateAction, UpdateTarget};
use crate::history::store::History;

impl History {
    /// Convertit le texte a `pos` en mot de passe nomme `name`.
    /// L'element garde sa position et son etat.
    pub fn set_password(&mut self, pos: usize, name: Option<&str>) -> PvResult<()> {
        self.check_text(pos)?;
        let secret = self.items()[pos].value().to_string();
        self.replace_at(pos, Item::password(name, secret));
        Ok(())
    }

    /// Premier mot de passe nomme `name`.
    pub fn get_password(&self, name: &str) -> Option<&Item> {
        self.password_index(name).map(|pos| &self.items()[pos])
    }

    /// Position du premier mot de passe nomme `name`.
    pub fn password_index(&self, name: &str) -> Option<usize> {
        self.items()
            .iter()
            .position(|item| item.kind() == ItemKind::Password && item.name() == Some(name))
    }

    /// Supprime le premier mot de passe nomme `name`. Retourne `false` si
    /// aucun ne correspond.
    pub fn delete_password(&mut self, name: &str) -> PvResult<bool> {
        match self.password_index(name) {
            Some(pos) => self.remove(pos).map(|()| true),
            None => Ok(false),
        }
    }

    /// Renomme le premier mot de passe nomme `old`.
    pub fn rename_password(&mut self, old: &str, new: Option<&str>) -> bool {
        let Some(pos) = self.password_index(old) else {
            log::debug!("no password named {}", old);
            return false;
        };
        self.rename_at(pos, new);
        self.update(UpdateAction::Replace, UpdateTarget::Position, pos);
        true
    }
}

#[cfg(test)]
mod tests {
    use crate::error::PvError;
    use crate::history::event::{HistoryEvent, UpdateAction, UpdateTarget};
    use crate::history::item::{Item, ItemKind};
    use crate::history::store::tests::{assert_invariants, history_in, record, values};

    #[test]
    fn test_set_password_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let mut h = history_in(dir.path());
        h.add(Item::text("hunter2")).unwrap();
        h.add(Item::text("visible")).unwrap();
        let events = record(&mut h);
        h.set_password(1, Some("mail")).unwrap();

        assert_eq!(values(&h), vec!["visible", "hunter2"]);
        let item = h.get(1).unwrap();
        assert_eq!(item.kind(), ItemKind::Password);
        assert_eq!(item.display_string(), "[Password] mail");
        assert!(h.get(0).unwrap().is_active());
        assert_invariants(&h);

        let events = events.borrow();
        assert_eq!(
            events.as_slice(),
            &[HistoryEvent::Update {
                action: UpdateAction::Replace,
                target: UpdateTarget::Position,
                position: 1,
            }]
        );
    }

    #[test]
    fn test_set_password_requires_text() {
        let dir = tempfile::tempdir().unwrap();
        let mut h = history_in(dir.path());
        h.add(Item::uris("file:///tmp/x")).unwrap();
        assert!(matches!(h.set_password(0, Some("x")), Err(PvError::WrongKind { .. })));
        assert!(matches!(h.set_password(3, Some("x")), Err(PvError::InvalidIndex { .. })));
    }

    #[test]
    fn test_get_password_first_match() {
        let dir = tempfile::tempdir().unwrap();
        let mut h = history_in(dir.path());
        h.add(Item::text("old secret")).unwrap();
        h.add(Item::text("new secret")).unwrap();
        h.set_password(0, Some("bank")).unwrap();
        h.set_password(1, Some("bank")).unwrap();
        assert_eq!(h.get_password("bank").unwrap().value(), "new secret");
        assert!(h.get_password("Bank").is_none());
    }

    #[test]
    fn test_delete_password() {
        let dir = tempfile::tempdir().unwrap();
        let mut h = history_in(dir.path());
        h.add(Item::text("secret")).unwrap();
        h.add(Item::text("plain")).unwrap();
        h.set_password(1, Some("wifi")).unwrap();
        assert!(h.delete_password("wifi").unwrap());
        assert_eq!(values(&h), vec!["plain"]);
        assert!(!h.delete_password("wifi").unwrap());
        assert_invariants(&h);
    }

    #[test]
    fn test_rename_password() {
        let dir = tempfile::tempdir().unwrap();
        let mut h = history_in(dir.path());
        h.add(Item::text("secret")).unwrap();
        h.set_password(0, Some("a")).unwrap();
        let events = record(&mut h);
        assert!(h.rename_password("a", Some("longer name")));
        assert_eq!(h.get(0).unwrap().display_string(), "[Password] longer name");
        assert!(h.get_password("a").is_none());
        assert!(h.get_password("longer name").is_some());
        assert!(!h.rename_password("missing", None));
        assert_invariants(&h);
        assert_eq!(events.borrow().len(), 1);
    }

    #[test]
    fn test_passwords_are_not_saved() {
        let dir = tempfile::tempdir().unwrap();
        let mut h = history_in(dir.path());
        h.load(None).unwrap();
        h.add(Item::text("secret")).unwrap();
        h.set_password(0, Some("pin")).unwrap();
        let saved = std::fs::read_to_string(dir.path().join("history.xml")).unwrap();
        assert!(!saved.contains("secret"));
    }
}
