//! Orchestrator wired to a scripted transport and a temporary local store.

use butler::test_support::ScriptedTransport;
use butler::{BasicAuth, JenkinsClient, LocalStore, MirrorOrchestrator};
use camino::{Utf8Path, Utf8PathBuf};
use tempfile::TempDir;

pub const SERVER: &str = "https://jenkins.example.com";

pub struct MirrorHarness {
    pub transport: ScriptedTransport,
    pub mirror: MirrorOrchestrator<ScriptedTransport>,
    pub root: Utf8PathBuf,
    _tmp: TempDir,
}

impl MirrorHarness {
    pub fn new() -> Self {
        let tmp = TempDir::new().unwrap_or_else(|err| panic!("create temp dir: {err}"));
        let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf())
            .unwrap_or_else(|path| panic!("temp dir is not UTF-8: {}", path.display()));
        let transport = ScriptedTransport::new();
        let client = JenkinsClient::new(
            transport.clone(),
            SERVER,
            Some(BasicAuth::new("admin", "token")),
        );
        let store = LocalStore::new(root.join("jobs"), root.join("plugins.txt"));
        Self {
            transport,
            mirror: MirrorOrchestrator::new(client, store),
            root,
            _tmp: tmp,
        }
    }

    pub fn jobs_dir(&self) -> &Utf8Path {
        self.mirror.store().jobs_dir()
    }

    pub fn read(&self, path: &Utf8Path) -> String {
        std::fs::read_to_string(path).unwrap_or_else(|err| panic!("read {path}: {err}"))
    }

    pub fn write(&self, path: &Utf8Path, contents: &str) {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .unwrap_or_else(|err| panic!("create parent directories for {path}: {err}"));
        }
        std::fs::write(path, contents).unwrap_or_else(|err| panic!("write {path}: {err}"));
    }

    pub fn seed_job(&self, name: &str, contents: &str) {
        self.write(&self.jobs_dir().join(name).join("config.xml"), contents);
    }
}
