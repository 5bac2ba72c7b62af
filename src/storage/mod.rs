// PasteVault - Module storage
// Persistance des profils d'historique sur disque
//
// Chaque profil est un document texte `<nom>.xml` dans le repertoire de
// donnees. Les mots de passe ne sont jamais ecrits.
//
// # Sous-modules
// - `codec`   : encodage des valeurs et ecriture du document
// - `parser`  : analyseur incremental par blocs et automate de chargement
// - `profile` : chemins, creation du repertoire, liste des profils
//
// # Format d'un profil
// ```text
// <?xml version="1.0" encoding="UTF-8"?>
// <history version="1.0">
//   <item kind="KIND"[ date="SECONDES"]><![CDATA[VALEUR]]></item>
// </history>
// ```
//
// # Robustesse
// L'ecriture n'est pas atomique. La lecture est tolerante : les
// evenements hors sequence sont journalises et ignores.

/// Encodage des valeurs et ecriture des documents de profil.
pub mod codec;
/// Lecture incrementale des documents de profil.
pub mod parser;
/// Emplacement et liste des profils.
pub mod profile;
