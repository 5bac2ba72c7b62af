// PasteVault - Historique ordonne
// Liste d'elements avec fusion, eviction et persistance
//
// Ce module implemente le stockage en memoire des elements du
// presse-papiers sous forme de liste ordonnee (plus recent en tete).
// L'element en tete est l'element actif, tous les autres sont inactifs.
//
// # Fusion
// `add` ignore un element egal a la tete, et remplace un element
// existant quand le nouveau texte le prolonge (ligne croissante : le
// nouveau texte commence ou finit par l'ancien).
//
// # Eviction
// Deux seuils independants :
// - nombre : les elements en queue au-dela de `max_history_size` sont
//   supprimes ;
// - memoire : tant que la taille totale depasse le budget, le plus gros
//   element inactif (le candidat) est supprime. La tete n'est jamais
//   evincee.
// Le candidat est recalcule par un parcours complet des qu'il peut etre
// perime.
//
// # Persistance
// Chaque mutation sauvegarde le profil courant puis emet un evenement
// `Update`. Une erreur de sauvegarde est journalisee : l'etat en
// memoire fait foi.
//
// # Indices
// Les positions ne sont valides que jusqu'a la prochaine mutation.

use crate::config::settings::{SettingChange, Settings};
use crate::error::{PvError, PvResult};
use crate::history::event::{HistoryEvent, Listeners, UpdateAction, UpdateTarget};
use crate::history::item::{Item, ItemKind, ItemState};
use crate::storage::{codec, parser, profile};

/// Plus gros element inactif. L'index 0 signifie "aucun candidat".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct EvictionCandidate {
    index: usize,
    size: usize,
}

/// Historique du presse-papiers en memoire, lie a un profil sur disque.
pub struct History {
    settings: Settings,
    name: Option<String>,
    items: Vec<Item>,
    size: usize,
    biggest: EvictionCandidate,
    listeners: Listeners,
}

impl History {
    /// Cree un historique vide. Le profil n'est lu qu'au premier `load`.
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            name: None,
            items: Vec::new(),
            size: 0,
            biggest: EvictionCandidate::default(),
            listeners: Listeners::default(),
        }
    }

    /// Enregistre un abonne aux evenements.
    pub fn subscribe(&mut self, listener: impl FnMut(&HistoryEvent) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Nom du profil actuellement charge.
    pub fn current_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Nombre d'elements.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Taille cumulee de tous les elements (octets).
    pub fn total_size(&self) -> usize {
        self.size
    }

    /// Position et taille du candidat a l'eviction, s'il existe.
    pub fn eviction_candidate(&self) -> Option<(usize, usize)> {
        (self.biggest.index != 0).then_some((self.biggest.index, self.biggest.size))
    }

    /// Elements, du plus recent au plus ancien.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Element a la position donnee (0 = actif).
    pub fn get(&self, pos: usize) -> Option<&Item> {
        self.items.get(pos)
    }

    pub fn get_value(&self, pos: usize) -> Option<&str> {
        self.get(pos).map(Item::value)
    }

    pub fn get_display_string(&self, pos: usize) -> Option<&str> {
        self.get(pos).map(Item::display_string)
    }

    /// Ajoute un element en tete de l'historique.
    ///
    /// Un element egal a la tete est ignore. Une ligne croissante remplace
    /// la tete ; sinon un doublon (ou une ligne croissante) plus ancien est
    /// retire avant l'insertion. Les seuils sont ensuite reappliques.
    pub fn add(&mut self, mut item: Item) -> PvResult<()> {
        let max_memory = self.settings.max_memory_bytes();
        if item.size() >= max_memory {
            return Err(PvError::ItemTooLarge { size: item.size(), max: max_memory });
        }

        let mut election_needed = false;
        let mut target = UpdateTarget::All;

        if let Some(head) = self.items.first() {
            if head.equals(&item) {
                log::debug!("add: item already active");
                return Ok(());
            }

            if self.is_growing_line(head, &item) {
                target = UpdateTarget::Position;
                self.take_at(0);
            } else {
                self.size -= self.items[0].size();
                self.items[0].set_state(ItemState::Idle);
                let size = self.items[0].size();
                self.size += size;

                // l'ancienne tete prendra l'index 1
                if size >= self.biggest.size {
                    self.biggest = EvictionCandidate { index: 0, size };
                }

                let duplicate = self.items[1..]
                    .iter()
                    .position(|old| old.equals(&item) || self.is_growing_line(old, &item))
                    .map(|i| i + 1);

                if let Some(pos) = duplicate {
                    let removed = self.take_at(pos);
                    // meme type et meme valeur : la ressource est partagee
                    if !removed.equals(&item) {
                        removed.dispose();
                    }
                    if pos == self.biggest.index {
                        election_needed = true;
                    } else if pos < self.biggest.index {
                        self.biggest.index -= 1;
                    }
                }

                self.biggest.index += 1;
            }
        }

        item.set_state(ItemState::Idle);
        self.size += item.size();
        self.items.insert(0, item);
        self.activate_first(false);

        self.check_size();
        if election_needed {
            self.elect_new_biggest();
        }
        self.check_memory_usage();

        self.update(UpdateAction::Replace, target, 0);
        Ok(())
    }

    /// Supprime (et detruit) l'element a la position donnee.
    pub fn remove(&mut self, pos: usize) -> PvResult<()> {
        self.check_index(pos)?;

        self.take_at(pos).dispose();

        if pos == 0 {
            self.activate_first(true);
        }

        if pos == 0 || pos == self.biggest.index {
            self.elect_new_biggest();
        } else if pos < self.biggest.index {
            self.biggest.index -= 1;
        }

        self.update(UpdateAction::Remove, UpdateTarget::Position, pos);
        Ok(())
    }

    /// Rend actif l'element a la position donnee (il passe en tete).
    pub fn select(&mut self, pos: usize) -> PvResult<()> {
        self.check_index(pos)?;
        let item = self.items[pos].clone();
        self.add(item)?;
        if let Some(head) = self.items.first() {
            let event = HistoryEvent::Selected(head.clone());
            self.emit(&event);
        }
        Ok(())
    }

    /// Remplace sur place le contenu d'un element texte.
    pub fn replace(&mut self, pos: usize, contents: &str) -> PvResult<()> {
        self.check_text(pos)?;
        self.replace_at(pos, Item::text(contents));
        if pos == 0 {
            let event = HistoryEvent::Selected(self.items[0].clone());
            self.emit(&event);
        }
        Ok(())
    }

    /// Vide l'historique en detruisant tous les elements.
    pub fn empty(&mut self) {
        for item in self.items.drain(..) {
            item.dispose();
        }
        self.size = 0;
        self.elect_new_biggest();
        self.update(UpdateAction::Remove, UpdateTarget::All, 0);
    }

    /// Sauvegarde l'historique dans le profil `name` (defaut : profil courant).
    /// Si la persistance est desactivee, le fichier est supprime.
    pub fn save(&self, name: Option<&str>) -> PvResult<()> {
        let name = name.unwrap_or_else(|| self.profile_name());
        let dir = &self.settings.data_dir;
        let path = profile::history_file_path(dir, name)?;

        if !self.settings.save_history {
            return profile::delete_history_file(&path);
        }

        profile::ensure_history_dir(dir)?;
        codec::save_history_file(&path, &self.items)?;
        log::debug!("saved {} items to {}", self.items.len(), path.display());
        Ok(())
    }

    /// Charge le profil `name` (defaut : celui de la configuration).
    /// Sans effet si ce profil est deja charge.
    pub fn load(&mut self, name: Option<&str>) -> PvResult<()> {
        if let (Some(current), Some(requested)) = (self.name.as_deref(), name) {
            if current == requested {
                return Ok(());
            }
        }

        let name = name.map_or_else(|| self.settings.history_name.clone(), str::to_string);
        let dir = self.settings.data_dir.clone();
        let path = profile::history_file_path(&dir, &name)?;

        // les fichiers des images appartiennent au profil sur disque
        self.items.clear();
        self.size = 0;
        self.biggest = EvictionCandidate::default();
        self.name = Some(name);

        if path.exists() {
            let items = parser::load_history_file(
                &path,
                self.settings.max_history_size,
                self.settings.images_support,
            )?;
            for item in items {
                self.size += item.size();
                self.items.push(item);
            }
            log::debug!("loaded {} items from {}", self.items.len(), path.display());
        } else if self.settings.save_history {
            // fichier vide pour que le profil apparaisse dans la liste
            profile::ensure_history_dir(&dir)?;
            profile::create_placeholder(&path)?;
        }

        if !self.items.is_empty() {
            self.activate_first(true);
            self.elect_new_biggest();
        }
        Ok(())
    }

    /// Change de profil courant via la configuration.
    pub fn switch(&mut self, name: &str) -> PvResult<()> {
        profile::history_file_path(&self.settings.data_dir, name)?;
        self.apply_setting(SettingChange::HistoryName(name.to_string()));
        Ok(())
    }

    /// Supprime le profil `name` (defaut : profil courant). Le profil
    /// courant est d'abord vide.
    pub fn delete(&mut self, name: Option<&str>) -> PvResult<()> {
        let current = self.profile_name().to_string();
        let name = name.unwrap_or(&current);
        let path = profile::history_file_path(&self.settings.data_dir, name)?;
        if name == current {
            self.empty();
        }
        profile::delete_history_file(&path)
    }

    /// Profils disponibles dans le repertoire de donnees.
    pub fn list(&self) -> PvResult<Vec<String>> {
        profile::list_histories(&self.settings.data_dir)
    }

    /// Applique un changement de configuration et reapplique le seuil
    /// concerne.
    pub fn apply_setting(&mut self, change: SettingChange) {
        match self.settings.apply(change) {
            SettingChange::MaxHistorySize(_) => {
                let before = self.items.len();
                self.check_size();
                if self.items.len() != before {
                    self.update(UpdateAction::Remove, UpdateTarget::All, 0);
                }
            }
            SettingChange::MaxMemoryUsage(_) => {
                let before = self.items.len();
                self.check_memory_usage();
                if self.items.len() != before {
                    self.update(UpdateAction::Remove, UpdateTarget::All, 0);
                }
            }
            SettingChange::HistoryName(_) => self.history_name_changed(),
            SettingChange::GrowingLines(_)
            | SettingChange::ImagesSupport(_)
            | SettingChange::SaveHistory(_) => {}
        }
    }

    fn history_name_changed(&mut self) {
        if let Err(e) = self.load(None) {
            log::error!("could not load history {}: {}", self.profile_name(), e);
        }
        let event = HistoryEvent::Switched(self.profile_name().to_string());
        self.emit(&event);
        self.update(UpdateAction::Replace, UpdateTarget::All, 0);
    }

    /// Nom utilise pour la persistance : profil charge, sinon celui de la
    /// configuration.
    fn profile_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.settings.history_name)
    }

    pub(super) fn check_index(&self, pos: usize) -> PvResult<()> {
        if pos < self.items.len() {
            Ok(())
        } else {
            Err(PvError::InvalidIndex { index: pos, len: self.items.len() })
        }
    }

    /// Verifie que l'element a `pos` existe et est un texte.
    pub(super) fn check_text(&self, pos: usize) -> PvResult<()> {
        self.check_index(pos)?;
        let kind = self.items[pos].kind();
        if kind != ItemKind::Text {
            return Err(PvError::WrongKind {
                index: pos,
                expected: ItemKind::Text.as_str(),
                found: kind.as_str(),
            });
        }
        Ok(())
    }

    /// Ligne croissante : deux textes, option active, le nouveau commence
    /// ou finit par l'ancien.
    fn is_growing_line(&self, old: &Item, new: &Item) -> bool {
        self.settings.growing_lines
            && old.kind() == ItemKind::Text
            && new.kind() == ItemKind::Text
            && (new.value().starts_with(old.value()) || new.value().ends_with(old.value()))
    }

    /// Retire un element sans liberer ses ressources.
    fn take_at(&mut self, pos: usize) -> Item {
        let item = self.items.remove(pos);
        self.size -= item.size();
        item
    }

    /// Remplace l'element a `pos` en conservant sa position et son etat.
    pub(super) fn replace_at(&mut self, pos: usize, mut new: Item) {
        new.set_state(self.items[pos].state());
        self.size += new.size();
        let old = std::mem::replace(&mut self.items[pos], new);
        self.size -= old.size();

        if pos != 0 {
            self.elect_new_biggest();
        }

        self.update(UpdateAction::Replace, UpdateTarget::Position, pos);
    }

    /// Renomme le mot de passe a `pos` ; taille et candidat suivent.
    pub(super) fn rename_at(&mut self, pos: usize, name: Option<&str>) {
        let item = &mut self.items[pos];
        self.size -= item.size();
        item.set_name(name);
        self.size += item.size();
        if pos != 0 {
            self.elect_new_biggest();
        }
    }

    fn activate_first(&mut self, select: bool) {
        let Some(first) = self.items.first_mut() else {
            return;
        };
        self.size -= first.size();
        first.set_state(ItemState::Active);
        self.size += first.size();

        if select {
            let event = HistoryEvent::Selected(first.clone());
            self.emit(&event);
        }
    }

    /// Recalcule le candidat : plus gros element inactif, premier en cas
    /// d'egalite.
    fn elect_new_biggest(&mut self) {
        self.biggest = EvictionCandidate::default();
        for (index, item) in self.items.iter().enumerate().skip(1) {
            let size = item.size();
            if self.biggest.index == 0 || size > self.biggest.size {
                self.biggest = EvictionCandidate { index, size };
            }
        }
    }

    /// Seuil de nombre : supprime la queue au-dela du maximum.
    fn check_size(&mut self) {
        let max = self.settings.max_history_size;
        if self.items.len() <= max {
            return;
        }
        for item in self.items.drain(max..) {
            self.size -= item.size();
            item.dispose();
        }
        if self.biggest.index >= self.items.len() {
            self.elect_new_biggest();
        }
    }

    /// Seuil memoire : evince le candidat tant que le budget est depasse.
    fn check_memory_usage(&mut self) {
        let max = self.settings.max_memory_bytes();
        while self.size > max && self.biggest.index != 0 {
            let index = self.biggest.index;
            log::debug!("evicting item {} ({} bytes)", index, self.biggest.size);
            self.take_at(index).dispose();
            self.elect_new_biggest();
        }
    }

    /// Sauvegarde puis notifie.
    pub(super) fn update(&mut self, action: UpdateAction, target: UpdateTarget, position: usize) {
        if let Err(e) = self.save(None) {
            log::error!("could not save history {}: {}", self.profile_name(), e);
        }
        self.emit(&HistoryEvent::Update { action, target, position });
    }

    fn emit(&mut self, event: &HistoryEvent) {
        self.listeners.emit(event);
    }
}
