//! Job export, import, and listing driven through the orchestrator.

#[path = "common/mirror_harness.rs"]
mod mirror_harness;

use butler::client::RequestBody;
use butler::test_support::{
    CRUMB_HEADER, CRUMB_VALUE, FOLDER_CLASS, WORKFLOW_CLASS, job_config_xml, job_listing_xml,
};
use butler::{ClientError, MirrorError, StoreError};
use mirror_harness::{MirrorHarness, SERVER};
use rstest::{fixture, rstest};

#[fixture]
fn harness() -> MirrorHarness {
    MirrorHarness::new()
}

fn item_url(path: &str) -> String {
    format!("{SERVER}/{path}")
}

fn root_listing() -> String {
    job_listing_xml(&[
        (WORKFLOW_CLASS, "build", item_url("job/build/").as_str()),
        (FOLDER_CLASS, "team", item_url("job/team/").as_str()),
    ])
}

#[rstest]
#[tokio::test]
async fn export_writes_every_listed_job(harness: MirrorHarness) {
    harness.transport.push_ok(root_listing());
    harness.transport.push_ok(job_config_xml("build pipeline"));
    harness.transport.push_ok(job_config_xml("team folder"));

    let exported = harness
        .mirror
        .export_jobs("", false)
        .await
        .expect("export should succeed");

    assert_eq!(exported, vec!["build", "team"]);
    assert_eq!(
        harness.transport.urls(),
        vec![
            format!("{SERVER}/api/xml"),
            format!("{SERVER}/job/build/config.xml"),
            format!("{SERVER}/job/team/config.xml"),
        ]
    );
    let build = harness.read(&harness.jobs_dir().join("build").join("config.xml"));
    assert!(build.contains("build pipeline"), "build config was {build}");
    let team = harness.read(&harness.jobs_dir().join("team").join("config.xml"));
    assert!(team.contains("team folder"), "team config was {team}");
}

#[rstest]
#[tokio::test]
async fn export_can_leave_folders_out(harness: MirrorHarness) {
    harness.transport.push_ok(root_listing());
    harness.transport.push_ok(job_config_xml("build pipeline"));

    let exported = harness
        .mirror
        .export_jobs("", true)
        .await
        .expect("export should succeed");

    assert_eq!(exported, vec!["build"]);
    assert!(!harness.jobs_dir().join("team").exists());
    assert_eq!(harness.transport.remaining(), 0);
}

#[rstest]
#[tokio::test]
async fn export_stops_at_first_failing_job(harness: MirrorHarness) {
    harness.transport.push_ok(root_listing());
    harness.transport.push_status(500);
    harness.transport.push_ok(job_config_xml("never fetched"));

    let err = harness
        .mirror
        .export_jobs("", false)
        .await
        .expect_err("export should stop");

    assert!(
        matches!(
            err,
            MirrorError::Client(ClientError::UnexpectedStatus { status: 500, .. })
        ),
        "got {err:?}"
    );
    assert_eq!(harness.transport.remaining(), 1);
    assert!(!harness.jobs_dir().join("team").exists());
}

#[rstest]
#[tokio::test]
async fn export_reads_the_requested_folder(harness: MirrorHarness) {
    harness.transport.push_ok(job_listing_xml(&[(
        WORKFLOW_CLASS,
        "deploy",
        item_url("job/team/job/svc/job/deploy/").as_str(),
    )]));
    harness.transport.push_ok(job_config_xml("deploy"));

    harness
        .mirror
        .export_jobs("team/svc", false)
        .await
        .expect("export should succeed");

    assert_eq!(
        harness.transport.urls().first().map(String::as_str),
        Some("https://jenkins.example.com/job/team/job/svc/api/xml")
    );
}

#[rstest]
#[tokio::test]
async fn export_of_unauthorised_listing_fails(harness: MirrorHarness) {
    harness.transport.push_status(401);

    let err = harness
        .mirror
        .export_jobs("", false)
        .await
        .expect_err("listing should be rejected");

    assert!(
        matches!(err, MirrorError::Client(ClientError::Unauthorized { .. })),
        "got {err:?}"
    );
}

#[rstest]
#[tokio::test]
async fn import_attempts_every_stored_job(harness: MirrorHarness) {
    harness.seed_job("alpha", &job_config_xml("alpha"));
    harness.seed_job("beta", &job_config_xml("beta"));
    harness.write(&harness.jobs_dir().join("gamma").join("notes.txt"), "no config");
    harness.write(&harness.jobs_dir().join("README"), "plain files are ignored");
    harness.transport.push_crumb();
    harness.transport.push_ok("");
    harness.transport.push_crumb();
    harness.transport.push_status(400);

    let summary = harness
        .mirror
        .import_jobs("team")
        .await
        .expect("import should run");

    assert_eq!(summary.imported, vec!["alpha"]);
    assert_eq!(summary.attempted(), 3);
    let failed: Vec<&str> = summary
        .failed
        .iter()
        .map(|failure| failure.name.as_str())
        .collect();
    assert_eq!(failed, vec!["beta", "gamma"]);
    assert!(
        summary
            .failed
            .iter()
            .any(|failure| matches!(failure.error, MirrorError::Store(StoreError::Io { .. })))
    );

    let requests = harness.transport.requests();
    let create = requests.get(1).expect("create request for alpha");
    assert_eq!(create.url, format!("{SERVER}/job/team/createItem?name=alpha"));
    assert_eq!(create.header_value(CRUMB_HEADER), Some(CRUMB_VALUE));
    assert_eq!(create.body, Some(RequestBody::Xml(job_config_xml("alpha"))));
    assert_eq!(requests.len(), 4);
}

#[rstest]
#[tokio::test]
async fn import_without_crumb_issuer_still_creates_jobs(harness: MirrorHarness) {
    harness.seed_job("alpha", &job_config_xml("alpha"));
    harness.transport.push_no_crumb();
    harness.transport.push_ok("");

    let summary = harness
        .mirror
        .import_jobs("")
        .await
        .expect("import should run");

    assert!(summary.is_success());
    let requests = harness.transport.requests();
    let create = requests.last().expect("create request");
    assert_eq!(create.url, format!("{SERVER}/createItem?name=alpha"));
    assert!(create.headers.is_empty());
}

#[rstest]
#[tokio::test]
async fn import_requires_the_jobs_directory(harness: MirrorHarness) {
    let err = harness
        .mirror
        .import_jobs("")
        .await
        .expect_err("missing jobs directory");

    assert!(
        matches!(err, MirrorError::Store(StoreError::Io { .. })),
        "got {err:?}"
    );
    assert!(harness.transport.requests().is_empty());
}

#[rstest]
#[tokio::test]
async fn list_without_recursion_reads_one_folder(harness: MirrorHarness) {
    harness.transport.push_ok(root_listing());

    let listed = harness
        .mirror
        .list_jobs("", false, false)
        .await
        .expect("listing should succeed");

    let paths: Vec<String> = listed.iter().map(butler::ListedJob::path).collect();
    assert_eq!(paths, vec!["build", "team"]);
    assert_eq!(harness.transport.remaining(), 0);
}

#[rstest]
#[case(false, &["build", "team", "team/svc", "team/deploy", "team/svc/api"])]
#[case(true, &["build", "team/deploy", "team/svc/api"])]
#[tokio::test]
async fn recursive_list_labels_nested_items(
    harness: MirrorHarness,
    #[case] skip_folders: bool,
    #[case] expected: &[&str],
) {
    let team = job_listing_xml(&[
        (FOLDER_CLASS, "svc", item_url("job/team/job/svc/").as_str()),
        (WORKFLOW_CLASS, "deploy", item_url("job/team/job/deploy/").as_str()),
    ]);
    let svc = job_listing_xml(&[(
        WORKFLOW_CLASS,
        "api",
        item_url("job/team/job/svc/job/api/").as_str(),
    )]);
    harness.transport.push_ok(root_listing());
    harness.transport.push_ok(team);
    harness.transport.push_ok(svc);

    let listed = harness
        .mirror
        .list_jobs("", true, skip_folders)
        .await
        .expect("listing should succeed");

    let paths: Vec<String> = listed.iter().map(butler::ListedJob::path).collect();
    assert_eq!(paths, expected);
    assert_eq!(
        harness.transport.urls(),
        vec![
            item_url("api/xml"),
            item_url("job/team/api/xml"),
            item_url("job/team/job/svc/api/xml"),
        ],
        "each folder is listed once"
    );
}
