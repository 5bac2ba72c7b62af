// PasteVault - Lecture des fichiers de profil
// Analyseur incremental et automate de chargement
//
// Le chargement se fait en deux couches :
// - `MarkupParser` decoupe un flux d'octets, recu par blocs de taille
//   arbitraire, en evenements (ouverture, fermeture, texte) transmis a un
//   `MarkupHandler`. Les constructions incompletes sont gardees en tampon
//   jusqu'au bloc suivant.
// - `HistoryLoader` est un `MarkupHandler` qui reconstruit les elements
//   selon l'automate :
//
// ```text
// Begin --<history>--> InHistory --<item>--> InItem --texte--> HasText
// HasText --</item>--> InHistory --</history>--> End
// ```
//
// # Tolerance
// Un evenement hors sequence est journalise puis ignore ; le chargement
// continue. Un document qui ne se termine pas dans l'etat `End` est
// accepte avec ce qui a ete lu.
//
// # Syntaxe reconnue
// - `<![CDATA[...]]>` est transmis tel quel comme texte
// - `<?...?>`, `<!--...-->` et `<!DOCTYPE ...>` sont ignores
// - `<a/>` produit une ouverture suivie d'une fermeture
// - les valeurs d'attributs acceptent `"` ou `'` ; les cinq entites
//   predefinies sont developpees dans les attributs et le texte

use crate::constants::LOAD_CHUNK_SIZE;
use crate::error::PvResult;
use crate::history::item::{remove_file_if_exists, Item, ItemKind};
use crate::storage::codec;
use chrono::{DateTime, Utc};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

const CDATA_OPEN: &[u8] = b"<![CDATA[";
const COMMENT_OPEN: &[u8] = b"<!--";

/// Recepteur des evenements de l'analyseur.
pub trait MarkupHandler {
    fn start_element(&mut self, name: &str, attributes: &[(String, String)]);
    fn end_element(&mut self, name: &str);
    fn text(&mut self, text: &str);
}

/// Analyseur incremental : accepte des blocs d'octets quelconques.
#[derive(Debug, Default)]
pub struct MarkupParser {
    pending: Vec<u8>,
}

impl MarkupParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ajoute un bloc et emet les evenements des constructions completes.
    pub fn feed<H: MarkupHandler + ?Sized>(&mut self, chunk: &[u8], handler: &mut H) {
        self.pending.extend_from_slice(chunk);
        let consumed = self.process(handler, false);
        self.pending.drain(..consumed);
    }

    /// Termine le flux. Le texte final est emis ; une construction
    /// inachevee est signalee puis abandonnee.
    pub fn finish<H: MarkupHandler + ?Sized>(&mut self, handler: &mut H) {
        let consumed = self.process(handler, true);
        if consumed < self.pending.len() {
            log::warn!(
                "unterminated markup at end of document ({} bytes dropped)",
                self.pending.len() - consumed
            );
        }
        self.pending.clear();
    }

    /// Traite le tampon ; retourne le nombre d'octets consommes.
    fn process<H: MarkupHandler + ?Sized>(&self, handler: &mut H, last: bool) -> usize {
        let buf = &self.pending;
        let mut pos = 0;

        while pos < buf.len() {
            if buf[pos] != b'<' {
                let end = match find_byte(buf, pos, b'<') {
                    Some(end) => end,
                    None if last => buf.len(),
                    None => break,
                };
                handler.text(&expand_entities(&String::from_utf8_lossy(&buf[pos..end])));
                pos = end;
                continue;
            }

            let rest = &buf[pos..];
            let partial_open = CDATA_OPEN.starts_with(rest) || COMMENT_OPEN.starts_with(rest);
            if !last && rest.len() < CDATA_OPEN.len() && partial_open {
                break;
            }

            if rest.starts_with(CDATA_OPEN) {
                let start = pos + CDATA_OPEN.len();
                let Some(end) = find_seq(buf, start, b"]]>") else { break };
                handler.text(&String::from_utf8_lossy(&buf[start..end]));
                pos = end + 3;
            } else if rest.starts_with(COMMENT_OPEN) {
                let Some(end) = find_seq(buf, pos + COMMENT_OPEN.len(), b"-->") else { break };
                pos = end + 3;
            } else if rest.starts_with(b"<?") {
                let Some(end) = find_seq(buf, pos + 2, b"?>") else { break };
                pos = end + 2;
            } else if rest.starts_with(b"<!") {
                let Some(end) = find_byte(buf, pos + 2, b'>') else { break };
                pos = end + 1;
            } else {
                let Some(end) = find_tag_end(buf, pos + 1) else { break };
                emit_tag(&String::from_utf8_lossy(&buf[pos + 1..end]), handler);
                pos = end + 1;
            }
        }

        pos
    }
}

fn find_byte(buf: &[u8], from: usize, byte: u8) -> Option<usize> {
    buf[from..].iter().position(|&b| b == byte).map(|i| i + from)
}

fn find_seq(buf: &[u8], from: usize, seq: &[u8]) -> Option<usize> {
    if from > buf.len() {
        return None;
    }
    buf[from..].windows(seq.len()).position(|w| w == seq).map(|i| i + from)
}

/// Position du `>` fermant une balise, hors valeurs entre guillemets.
fn find_tag_end(buf: &[u8], from: usize) -> Option<usize> {
    let mut quote = None;
    for (i, &b) in buf.iter().enumerate().skip(from) {
        match quote {
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None if b == b'"' || b == b'\'' => quote = Some(b),
            None if b == b'>' => return Some(i),
            None => {}
        }
    }
    None
}

/// Emet les evenements d'une balise (contenu entre `<` et `>`).
fn emit_tag<H: MarkupHandler + ?Sized>(tag: &str, handler: &mut H) {
    if let Some(name) = tag.strip_prefix('/') {
        handler.end_element(name.trim());
        return;
    }

    let (body, self_closing) = match tag.strip_suffix('/') {
        Some(body) => (body, true),
        None => (tag, false),
    };
    let body = body.trim();
    let name_end = body.find(char::is_whitespace).unwrap_or(body.len());
    let name = &body[..name_end];
    if name.is_empty() {
        log::warn!("empty element name in <{}>", tag);
        return;
    }

    let attributes = parse_attributes(&body[name_end..]);
    handler.start_element(name, &attributes);
    if self_closing {
        handler.end_element(name);
    }
}

/// Analyse `cle="valeur"` repete. S'arrete a la premiere erreur.
fn parse_attributes(mut s: &str) -> Vec<(String, String)> {
    let mut attributes = Vec::new();
    loop {
        s = s.trim_start();
        if s.is_empty() {
            break;
        }
        let Some(eq) = s.find('=') else {
            log::warn!("malformed attribute near '{}'", s);
            break;
        };
        let key = s[..eq].trim();
        let after = s[eq + 1..].trim_start();
        let Some(quote) = after.chars().next().filter(|c| *c == '"' || *c == '\'') else {
            log::warn!("unquoted value for attribute '{}'", key);
            break;
        };
        let Some(close) = after[1..].find(quote) else {
            log::warn!("unterminated value for attribute '{}'", key);
            break;
        };
        attributes.push((key.to_string(), expand_entities(&after[1..1 + close])));
        s = &after[close + 2..];
    }
    attributes
}

/// Developpe les cinq entites predefinies.
fn expand_entities(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// Etat de l'automate de chargement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Begin,
    InHistory,
    InItem,
    HasText,
    End,
}

/// Reconstruit les elements d'un profil a partir des evenements.
pub struct HistoryLoader {
    state: LoadState,
    max_items: usize,
    images_support: bool,
    kind: Option<ItemKind>,
    date: Option<DateTime<Utc>>,
    name: Option<String>,
    items: Vec<Item>,
}

impl HistoryLoader {
    /// `max_items` borne le nombre d'elements construits ; les suivants
    /// sont ignores.
    pub fn new(max_items: usize, images_support: bool) -> Self {
        Self {
            state: LoadState::Begin,
            max_items,
            images_support,
            kind: None,
            date: None,
            name: None,
            items: Vec::new(),
        }
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    /// Elements lus, dans l'ordre du document.
    pub fn into_items(self) -> Vec<Item> {
        if self.state != LoadState::End {
            log::warn!("history document ended in state {:?}", self.state);
        }
        self.items
    }

    fn start_item(&mut self, attributes: &[(String, String)]) {
        self.kind = None;
        self.date = None;
        self.name = None;

        let mut date = None;
        let mut name = None;
        for (key, value) in attributes {
            match key.as_str() {
                "kind" => {
                    self.kind = ItemKind::parse(value);
                    if self.kind.is_none() {
                        log::warn!("unknown item kind '{}'", value);
                    }
                }
                "date" => date = Some(value.as_str()),
                "name" => name = Some(value.as_str()),
                _ => log::warn!("unknown item attribute '{}'", key),
            }
        }

        if let Some(date) = date {
            if self.kind == Some(ItemKind::Image) {
                self.date = date.parse::<i64>().ok().and_then(|s| DateTime::from_timestamp(s, 0));
                if self.date.is_none() {
                    log::warn!("invalid image date '{}'", date);
                }
            } else {
                log::warn!("date attribute on non-image item ignored");
            }
        }
        if let Some(name) = name {
            if self.kind == Some(ItemKind::Password) {
                self.name = Some(name.to_string());
            } else {
                log::warn!("name attribute on non-password item ignored");
            }
        }
    }

    fn build_item(&self, value: String) -> Option<Item> {
        match self.kind? {
            ItemKind::Text => Some(Item::text(value)),
            ItemKind::Uris => Some(Item::uris(value)),
            ItemKind::Password => Some(Item::password(self.name.as_deref(), value)),
            ItemKind::Image => match self.date {
                Some(date) if self.images_support => Some(Item::image(value, date)),
                _ => {
                    log::debug!("dropping orphan image {}", value);
                    remove_file_if_exists(Path::new(&value));
                    None
                }
            },
        }
    }
}

impl MarkupHandler for HistoryLoader {
    fn start_element(&mut self, name: &str, attributes: &[(String, String)]) {
        match (self.state, name) {
            (LoadState::Begin, "history") => self.state = LoadState::InHistory,
            (LoadState::InHistory, "item") => {
                self.state = LoadState::InItem;
                self.start_item(attributes);
            }
            (state, _) => log::warn!("unexpected <{}> in state {:?}", name, state),
        }
    }

    fn end_element(&mut self, name: &str) {
        match (self.state, name) {
            (LoadState::HasText, "item") => self.state = LoadState::InHistory,
            (LoadState::InItem, "item") => {
                log::debug!("dropping item without value");
                self.state = LoadState::InHistory;
            }
            (LoadState::InHistory, "history") => self.state = LoadState::End,
            (state, _) => log::warn!("unexpected </{}> in state {:?}", name, state),
        }
    }

    fn text(&mut self, text: &str) {
        if text.trim().is_empty() {
            return;
        }
        if self.state != LoadState::InItem {
            log::warn!("unexpected text in state {:?}", self.state);
            return;
        }
        self.state = LoadState::HasText;

        if self.items.len() >= self.max_items {
            return;
        }
        if let Some(item) = self.build_item(codec::decode(text)) {
            self.items.push(item);
        }
    }
}

/// Lit un document de profil depuis un flux, par blocs.
pub fn parse_history<R: Read>(mut reader: R, max_items: usize, images_support: bool) -> io::Result<Vec<Item>> {
    let mut parser = MarkupParser::new();
    let mut loader = HistoryLoader::new(max_items, images_support);
    let mut chunk = vec![0u8; LOAD_CHUNK_SIZE];

    loop {
        let n = match reader.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        parser.feed(&chunk[..n], &mut loader);
    }
    parser.finish(&mut loader);

    Ok(loader.into_items())
}

/// Lit le fichier de profil `path`.
pub fn load_history_file(path: &Path, max_items: usize, images_support: bool) -> PvResult<Vec<Item>> {
    let file = File::open(path)?;
    // profil tout juste cree
    if file.metadata()?.len() == 0 {
        return Ok(Vec::new());
    }
    Ok(parse_history(file, max_items, images_support)?)
}
