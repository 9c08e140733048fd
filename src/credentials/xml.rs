//! Extraction of credentials from a folder `config.xml`.

use quick_xml::Reader;
use quick_xml::events::Event;
use tracing::warn;

use super::{Credentials, SecretFile, UsernamePassword};

const USERPASS_TAG: &str = "com.cloudbees.plugins.credentials.impl.UsernamePasswordCredentialsImpl";
const SECRET_FILE_TAG: &str = "org.jenkinsci.plugins.plaincredentials.impl.FileCredentialsImpl";
const PROPERTY_SUFFIX: &str = "FolderCredentialsProperty";
const CREDENTIAL_LIST_TAG: &str = "java.util.concurrent.CopyOnWriteArrayList";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Kind {
    UserPass,
    SecretFile,
}

/// Collects the credentials stored in a folder definition.
///
/// Only entries under
/// `properties/*FolderCredentialsProperty/domainCredentialsMap/entry/java.util.concurrent.CopyOnWriteArrayList`
/// are considered. Unknown credential types and fields are ignored. Parsing
/// is best effort: a malformed document yields whatever was read before the
/// error.
#[must_use]
pub fn extract_credentials(folder_xml: &str) -> Credentials {
    let mut reader = Reader::from_str(folder_xml);
    let mut path: Vec<String> = Vec::new();
    let mut credentials = Credentials::default();

    loop {
        match reader.read_event() {
            Ok(Event::Start(start)) => {
                path.push(String::from_utf8_lossy(start.name().as_ref()).into_owned());
                if let Some(kind) = credential_at(&path) {
                    begin(&mut credentials, kind);
                }
            }
            Ok(Event::Empty(empty)) => {
                path.push(String::from_utf8_lossy(empty.name().as_ref()).into_owned());
                if let Some(kind) = credential_at(&path) {
                    begin(&mut credentials, kind);
                }
                path.pop();
            }
            Ok(Event::End(_)) => {
                path.pop();
            }
            Ok(Event::Text(text)) => {
                if let Some((kind, field)) = field_at(&path) {
                    match text.unescape() {
                        Ok(value) => assign(&mut credentials, kind, field, &value),
                        Err(err) => {
                            warn!(error = %err, "credential value could not be unescaped");
                        }
                    }
                }
            }
            Ok(Event::CData(data)) => {
                if let Some((kind, field)) = field_at(&path) {
                    let value = String::from_utf8_lossy(&data).into_owned();
                    assign(&mut credentials, kind, field, &value);
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(err) => {
                warn!(
                    error = %err,
                    position = reader.buffer_position(),
                    "folder XML could not be fully parsed; keeping credentials read so far"
                );
                break;
            }
        }
    }
    credentials
}

fn credential_at(path: &[String]) -> Option<Kind> {
    match path {
        [_, properties, property, map, entry, list, credential]
            if properties == "properties"
                && property.ends_with(PROPERTY_SUFFIX)
                && map == "domainCredentialsMap"
                && entry == "entry"
                && list == CREDENTIAL_LIST_TAG =>
        {
            kind_of(credential)
        }
        _ => None,
    }
}

fn field_at(path: &[String]) -> Option<(Kind, &str)> {
    let (field, parent) = path.split_last()?;
    credential_at(parent).map(|kind| (kind, field.as_str()))
}

fn kind_of(tag: &str) -> Option<Kind> {
    match tag {
        USERPASS_TAG => Some(Kind::UserPass),
        SECRET_FILE_TAG => Some(Kind::SecretFile),
        _ => None,
    }
}

fn begin(credentials: &mut Credentials, kind: Kind) {
    match kind {
        Kind::UserPass => credentials.userpass.push(UsernamePassword::default()),
        Kind::SecretFile => credentials.secretfile.push(SecretFile::default()),
    }
}

fn assign(credentials: &mut Credentials, kind: Kind, field: &str, value: &str) {
    match kind {
        Kind::UserPass => {
            let Some(entry) = credentials.userpass.last_mut() else {
                return;
            };
            let target = match field {
                "id" => &mut entry.id,
                "description" => &mut entry.description,
                "username" => &mut entry.username,
                "password" => &mut entry.password,
                _ => return,
            };
            target.push_str(value);
        }
        Kind::SecretFile => {
            let Some(entry) = credentials.secretfile.last_mut() else {
                return;
            };
            let target = match field {
                "id" => &mut entry.id,
                "description" => &mut entry.description,
                "fileName" => &mut entry.file_name,
                "secretBytes" => &mut entry.secret_bytes,
                _ => return,
            };
            target.push_str(value);
        }
    }
}
