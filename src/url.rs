//! Mapping between logical folder paths and Jenkins item URLs.
//!
//! Jenkins nests every item below its parent using a `/job/<name>` segment,
//! so the folder `teamA/service1` lives at `<base>/job/teamA/job/service1`.
//! The helpers here convert in both directions and normalise user-supplied
//! server addresses.

/// Literal separator Jenkins places before every item name in a URL.
const JOB_SEGMENT: &str = "/job";

/// Builds the URL of `folder` below `base`.
///
/// An empty folder (or one made only of slashes) denotes the root and yields
/// `base` unchanged. Otherwise trailing slashes are removed from both inputs,
/// a leading slash is ensured on the folder, and every `/` becomes `/job/`.
/// Consecutive slashes inside the folder are not collapsed; each one expands
/// independently.
///
/// # Examples
///
/// ```
/// use butler::url::folder_url;
///
/// assert_eq!(
///     folder_url("https://jenkins/", "BLA/BLUB"),
///     "https://jenkins/job/BLA/job/BLUB"
/// );
/// assert_eq!(folder_url("https://jenkins", ""), "https://jenkins");
/// ```
#[must_use]
pub fn folder_url(base: &str, folder: &str) -> String {
    if folder.trim_matches('/').is_empty() {
        return base.to_owned();
    }

    let trimmed_base = base.trim_end_matches('/');
    let trimmed_folder = folder.trim_end_matches('/');
    let rooted = if trimmed_folder.starts_with('/') {
        trimmed_folder.to_owned()
    } else {
        format!("/{trimmed_folder}")
    };

    format!("{trimmed_base}{}", rooted.replace('/', "/job/"))
}

/// Derives the logical folder path from a Jenkins item URL.
///
/// The URL is split on the literal `/job` separator, the host part is
/// dropped, the remainder is rejoined with `/`, doubled slashes are collapsed
/// and surrounding slashes trimmed. A URL without any `/job` segment yields
/// the empty root path; a dangling trailing `/job` contributes nothing.
///
/// # Examples
///
/// ```
/// use butler::url::folder_path_from_url;
///
/// assert_eq!(folder_path_from_url("https://j.org/job/a/job/b/"), "a/b");
/// assert_eq!(folder_path_from_url("https://j.org"), "");
/// ```
#[must_use]
pub fn folder_path_from_url(url: &str) -> String {
    let segments: Vec<&str> = url.split(JOB_SEGMENT).skip(1).collect();
    segments
        .join("/")
        .replace("//", "/")
        .trim_matches('/')
        .to_owned()
}

/// Prefixes `http://` when `server` carries no scheme.
///
/// The empty string stays empty so callers can still detect a missing
/// server.
#[must_use]
pub fn ensure_protocol(server: &str) -> String {
    if server.is_empty() || server.starts_with("http://") || server.starts_with("https://") {
        return server.to_owned();
    }
    format!("http://{server}")
}
