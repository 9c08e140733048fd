//! Jenkins items as reported by the `api/xml` listing endpoint.
//!
//! A listing is kept in server order. Filtering never mutates the source
//! list; every transform returns a fresh [`JobList`].

use serde::Deserialize;
use tracing::warn;

/// Suffix that marks an item class as a folder.
const FOLDER_CLASS_SUFFIX: &str = "Folder";

/// One item from a Jenkins job listing.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
pub struct Job {
    /// Fully qualified Jenkins item class, for example
    /// `org.jenkinsci.plugins.workflow.job.WorkflowJob`.
    #[serde(rename = "@_class", default)]
    pub class: String,
    /// Item name as shown in its parent.
    #[serde(default)]
    pub name: String,
    /// Absolute URL of the item, usually with a trailing slash.
    #[serde(default)]
    pub url: String,
}

impl Job {
    /// Creates a job from its three listing fields.
    #[must_use]
    pub fn new(class: impl Into<String>, name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            name: name.into(),
            url: url.into(),
        }
    }

    /// Returns `true` when the item class ends with `Folder`.
    ///
    /// This is a naming heuristic over an open set of class strings. Item
    /// types such as multibranch projects do not match even though they
    /// contain children.
    #[must_use]
    pub fn is_folder(&self) -> bool {
        self.class.ends_with(FOLDER_CLASS_SUFFIX)
    }
}

/// Ordered collection of [`Job`] entries.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct JobList(Vec<Job>);

impl JobList {
    /// Creates a list from jobs in listing order.
    #[must_use]
    pub const fn new(jobs: Vec<Job>) -> Self {
        Self(jobs)
    }

    /// Decodes the body of an `api/xml` response.
    ///
    /// Decoding is best effort: a missing, empty or malformed document yields
    /// an empty list instead of an error.
    #[must_use]
    pub fn from_xml(body: &str) -> Self {
        if body.trim().is_empty() {
            return Self::default();
        }
        match quick_xml::de::from_str::<Listing>(body) {
            Ok(listing) => Self(listing.jobs),
            Err(err) => {
                warn!(error = %err, "job listing could not be decoded; treating it as empty");
                Self::default()
            }
        }
    }

    /// Returns only the folder entries, preserving order.
    #[must_use]
    pub fn folders(&self) -> Self {
        self.iter().filter(|job| job.is_folder()).cloned().collect()
    }

    /// Returns every entry that is not a folder, preserving order.
    #[must_use]
    pub fn without_folders(&self) -> Self {
        self.iter().filter(|job| !job.is_folder()).cloned().collect()
    }

    /// Iterates over the entries in listing order.
    pub fn iter(&self) -> std::slice::Iter<'_, Job> {
        self.0.iter()
    }

    /// Number of entries.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when the list has no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Appends every entry of `other`, keeping both orders.
    pub fn extend(&mut self, other: Self) {
        self.0.extend(other.0);
    }

    /// Returns the entry names in order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.iter().map(|job| job.name.as_str()).collect()
    }
}

impl FromIterator<Job> for JobList {
    fn from_iter<I: IntoIterator<Item = Job>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for JobList {
    type Item = Job;
    type IntoIter = std::vec::IntoIter<Job>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a JobList {
    type Item = &'a Job;
    type IntoIter = std::slice::Iter<'a, Job>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[derive(Debug, Default, Deserialize)]
struct Listing {
    #[serde(rename = "job", default)]
    jobs: Vec<Job>,
}
