//! BDD step definitions for recursive folder discovery.

use butler::test_support::{FOLDER_CLASS, WORKFLOW_CLASS, job_listing_xml};
use butler::{ClientError, JobList};
use rstest_bdd_macros::{given, then, when};
use tokio::runtime::Builder;

use super::test_helpers::{DiscoveryContext, DiscoveryOutcome, item_url, split_names};

#[derive(Debug, thiserror::Error)]
pub enum StepError {
    #[error("assertion failed: {0}")]
    Assertion(String),
    #[error("runtime error: {0}")]
    Runtime(String),
}

#[given("a root holding folder \"{outer}\" with nested folder \"{inner}\" and job \"{job}\"")]
fn nested_tree(
    discovery_context: DiscoveryContext,
    outer: String,
    inner: String,
    job: String,
) -> DiscoveryContext {
    let outer_path = format!("/job/{outer}");
    let outer_url = item_url(&outer_path);
    let job_url = item_url(&format!("/job/{job}"));
    discovery_context.transport.push_ok(job_listing_xml(&[
        (FOLDER_CLASS, outer.as_str(), outer_url.as_str()),
        (WORKFLOW_CLASS, job.as_str(), job_url.as_str()),
    ]));
    discovery_context.push_folders(&outer_path, &[inner.as_str()]);
    discovery_context.push_job(&format!("{outer_path}/job/{inner}"), "build");
    discovery_context
}

#[given("a root holding folders \"{names}\" where \"{parent}\" contains folder \"{child}\"")]
fn sibling_tree(
    discovery_context: DiscoveryContext,
    names: String,
    parent: String,
    child: String,
) -> DiscoveryContext {
    let folders = split_names(&names);
    discovery_context.push_folders("", &folders);
    for name in folders {
        let path = format!("/job/{name}");
        if name == parent {
            discovery_context.push_folders(&path, &[child.as_str()]);
            discovery_context.push_folders(&format!("{path}/job/{child}"), &[]);
        } else {
            discovery_context.push_folders(&path, &[]);
        }
    }
    discovery_context
}

#[given("a root holding folders \"{names}\" where listing \"{rejected}\" is unauthorised")]
fn rejected_tree(
    discovery_context: DiscoveryContext,
    names: String,
    rejected: String,
) -> DiscoveryContext {
    let folders = split_names(&names);
    discovery_context.push_folders("", &folders);
    for name in folders {
        if name == rejected {
            discovery_context.transport.push_status(401);
        } else {
            discovery_context.push_folders(&format!("/job/{name}"), &[]);
        }
    }
    discovery_context
}

#[when("I discover folders from the root")]
fn discover(discovery_context: DiscoveryContext) -> Result<DiscoveryContext, StepError> {
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| StepError::Runtime(err.to_string()))?;
    let client = discovery_context.client();
    let result: Result<JobList, ClientError> = runtime.block_on(async {
        let top = client.list_folder("").await?;
        client.subfolders_recursively(&top).await
    });
    let outcome = match result {
        Ok(folders) => DiscoveryOutcome::Found(
            folders.names().into_iter().map(str::to_owned).collect(),
        ),
        Err(err) => DiscoveryOutcome::Failed(err),
    };
    Ok(DiscoveryContext {
        outcome: Some(outcome),
        ..discovery_context
    })
}

#[then("the discovered folders are \"{names}\"")]
fn discovered_folders(discovery_context: &DiscoveryContext, names: String) -> Result<(), StepError> {
    let expected = split_names(&names);
    match &discovery_context.outcome {
        Some(DiscoveryOutcome::Found(found)) if *found == expected => Ok(()),
        Some(DiscoveryOutcome::Found(found)) => Err(StepError::Assertion(format!(
            "expected folders {expected:?}, got {found:?}"
        ))),
        Some(DiscoveryOutcome::Failed(err)) => Err(StepError::Assertion(format!(
            "expected folders, discovery failed: {err}"
        ))),
        None => Err(StepError::Assertion(String::from("missing outcome"))),
    }
}

#[then("discovery fails as unauthorised")]
fn discovery_unauthorised(discovery_context: &DiscoveryContext) -> Result<(), StepError> {
    match &discovery_context.outcome {
        Some(DiscoveryOutcome::Failed(err)) if err.is_unauthorized() => Ok(()),
        Some(other) => Err(StepError::Assertion(format!(
            "expected an unauthorised failure, got {other:?}"
        ))),
        None => Err(StepError::Assertion(String::from("missing outcome"))),
    }
}

#[then("every scripted listing was requested")]
fn all_listings_requested(discovery_context: &DiscoveryContext) -> Result<(), StepError> {
    check_remaining(discovery_context, 0)
}

#[then("\"{count}\" scripted listing was never requested")]
fn unrequested_listings(discovery_context: &DiscoveryContext, count: usize) -> Result<(), StepError> {
    check_remaining(discovery_context, count)
}

fn check_remaining(discovery_context: &DiscoveryContext, count: usize) -> Result<(), StepError> {
    let remaining = discovery_context.transport.remaining();
    if remaining == count {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "expected {count} unused listings, found {remaining}"
        )))
    }
}
