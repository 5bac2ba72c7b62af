// PasteVault - Ecriture des fichiers de profil
// Encodage des valeurs et serialisation du document
//
// # Format d'un fichier de profil
// ```text
// <?xml version="1.0" encoding="UTF-8"?>
// <history version="1.0">
//   <item kind="Text"><![CDATA[valeur]]></item>
//   <item kind="Image" date="1700000000"><![CDATA[/chemin/image.png]]></item>
// </history>
// ```
//
// # Encodage
// Dans une valeur, `&` devient `&amp;` puis `>` devient `&gt;`, ce qui
// empeche `]]>` d'apparaitre dans la section CDATA. `decode` applique
// l'inverse dans l'ordre oppose.
//
// # Robustesse
// L'ecriture n'est pas atomique : une erreur d'E/S laisse un fichier
// partiel.

use crate::constants::{DOCUMENT_HEADER, HISTORY_FORMAT_VERSION};
use crate::error::PvResult;
use crate::history::item::{Item, ItemKind};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Encode une valeur pour la section CDATA.
pub fn encode(text: &str) -> String {
    text.replace('&', "&amp;").replace('>', "&gt;")
}

/// Decode une valeur lue dans une section CDATA.
pub fn decode(text: &str) -> String {
    text.replace("&gt;", ">").replace("&amp;", "&")
}

/// Ecrit le document complet. Les mots de passe sont omis.
pub fn write_history<W: Write>(mut out: W, items: &[Item]) -> io::Result<()> {
    out.write_all(DOCUMENT_HEADER.as_bytes())?;
    writeln!(out, "<history version=\"{}\">", HISTORY_FORMAT_VERSION)?;

    for item in items.iter().filter(|i| i.is_persistent()) {
        write!(out, "  <item kind=\"{}\"", item.kind())?;
        if item.kind() == ItemKind::Image {
            if let Some(date) = item.date() {
                write!(out, " date=\"{}\"", date.timestamp())?;
            }
        }
        writeln!(out, "><![CDATA[{}]]></item>", encode(item.value()))?;
    }

    out.write_all(b"</history>\n")?;
    out.flush()
}

/// Ecrit le document dans `path` (cree ou tronque).
pub fn save_history_file(path: &Path, items: &[Item]) -> PvResult<()> {
    let file = File::create(path)?;
    write_history(BufWriter::new(file), items)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn render(items: &[Item]) -> String {
        let mut out = Vec::new();
        write_history(&mut out, items).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_encode_order() {
        assert_eq!(encode("a & b > c"), "a &amp; b &gt; c");
        assert_eq!(encode("&gt;"), "&amp;gt;");
        assert_eq!(encode("]]>"), "]]&gt;");
        assert_eq!(encode("<tag>"), "<tag&gt;");
    }

    #[test]
    fn test_decode_inverts_encode() {
        for s in ["plain", "a & b > c", "&gt;", "&amp;gt; >>", "]]>"] {
            assert_eq!(decode(&encode(s)), s);
        }
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(
            render(&[]),
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<history version=\"1.0\">\n</history>\n"
        );
    }

    #[test]
    fn test_item_records() {
        let items = vec![Item::text("x > y"), Item::uris("file:///a")];
        let doc = render(&items);
        assert!(doc.contains("  <item kind=\"Text\"><![CDATA[x &gt; y]]></item>\n"));
        assert!(doc.contains("  <item kind=\"Uris\"><![CDATA[file:///a]]></item>\n"));
    }

    #[test]
    fn test_image_date_attribute() {
        let date = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let doc = render(&[Item::image("/nonexistent/shot.png", date)]);
        assert!(doc.contains("<item kind=\"Image\" date=\"1700000000\"><![CDATA[/nonexistent/shot.png]]>"));
    }

    #[test]
    fn test_passwords_skipped() {
        let doc = render(&[Item::password(Some("pin"), "1234"), Item::text("keep")]);
        assert!(!doc.contains("1234"));
        assert!(!doc.contains("Password"));
        assert!(doc.contains("keep"));
    }
}
