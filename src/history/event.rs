// PasteVault - Notifications de changement
//
// Evenements emis par l'historique apres chaque operation, a destination
// des collaborateurs externes (service IPC, interface).
//
// - `Selected(item)`  : un nouvel element est devenu la tete active
// - `Switched(name)`  : le profil courant a change
// - `Update { .. }`   : le contenu a change ; `target = All` impose un
//                       rafraichissement complet, `Position` seulement
//                       l'element `position`

use crate::history::item::Item;

/// Nature de la mise a jour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateAction {
    Replace,
    Remove,
}

/// Portee de la mise a jour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateTarget {
    All,
    Position,
}

/// Evenement emis par l'historique.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryEvent {
    Selected(Item),
    Switched(String),
    Update {
        action: UpdateAction,
        target: UpdateTarget,
        position: usize,
    },
}

/// Abonne aux evenements de l'historique.
pub type Listener = Box<dyn FnMut(&HistoryEvent)>;

/// Liste des abonnes, detenue par l'historique.
#[derive(Default)]
pub(crate) struct Listeners {
    listeners: Vec<Listener>,
}

impl Listeners {
    pub(crate) fn push(&mut self, listener: Listener) {
        self.listeners.push(listener);
    }

    pub(crate) fn emit(&mut self, event: &HistoryEvent) {
        log::trace!("emit {:?}", event);
        for listener in &mut self.listeners {
            listener(event);
        }
    }
}
