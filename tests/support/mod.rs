// ABOUTME: Test support utilities.
// ABOUTME: Provides a scripted in-memory DeploymentApi and fixture builders.

use async_trait::async_trait;
use parking_lot::Mutex;
use preview_wait::github::{
    Actor, ApiError, CommitRef, Deployment, DeploymentApi, DeploymentState, DeploymentStatus,
    PullRequest, Repository,
};
use std::collections::{HashMap, VecDeque};
use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests. Safe to call multiple times.
#[allow(dead_code)]
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter =
            EnvFilter::from_default_env().add_directive("preview_wait=debug".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

#[allow(dead_code)]
pub fn repo() -> Repository {
    Repository::new("acme", "site")
}

#[allow(dead_code)]
pub fn deployment(id: u64, creator: &str) -> Deployment {
    Deployment {
        id,
        creator: Some(Actor {
            login: creator.to_string(),
        }),
        environment: Some("Preview".to_string()),
    }
}

#[allow(dead_code)]
pub fn status(state: DeploymentState, url: &str) -> DeploymentStatus {
    DeploymentStatus::new(state).with_target_url(url)
}

/// One scripted reply; `None` becomes a server error.
type Reply<T> = Option<T>;

/// Replies are consumed in order; the last one repeats forever.
struct Script<T: Clone> {
    replies: VecDeque<Reply<T>>,
}

impl<T: Clone> Script<T> {
    fn new() -> Self {
        Self {
            replies: VecDeque::new(),
        }
    }

    fn next(&mut self) -> Result<T, ApiError> {
        let reply = if self.replies.len() > 1 {
            self.replies.pop_front().flatten()
        } else {
            self.replies.front().cloned().flatten()
        };
        reply.ok_or_else(|| ApiError::Status {
            status: 502,
            message: "Bad Gateway".to_string(),
        })
    }
}

/// In-memory DeploymentApi with scripted replies and call counters.
pub struct FakeApi {
    deployments: Mutex<Script<Vec<Deployment>>>,
    statuses: Mutex<Script<Vec<DeploymentStatus>>>,
    pull_requests: HashMap<u64, String>,
    deployment_calls: Mutex<usize>,
    status_calls: Mutex<usize>,
    last_environment: Mutex<Option<String>>,
}

#[allow(dead_code)]
impl FakeApi {
    pub fn new() -> Self {
        Self {
            deployments: Mutex::new(Script::new()),
            statuses: Mutex::new(Script::new()),
            pull_requests: HashMap::new(),
            deployment_calls: Mutex::new(0),
            status_calls: Mutex::new(0),
            last_environment: Mutex::new(None),
        }
    }

    pub fn deployments(self, reply: Vec<Deployment>) -> Self {
        self.deployments.lock().replies.push_back(Some(reply));
        self
    }

    pub fn deployments_fail(self) -> Self {
        self.deployments.lock().replies.push_back(None);
        self
    }

    pub fn statuses(self, reply: Vec<DeploymentStatus>) -> Self {
        self.statuses.lock().replies.push_back(Some(reply));
        self
    }

    pub fn statuses_fail(self) -> Self {
        self.statuses.lock().replies.push_back(None);
        self
    }

    pub fn pull_request(mut self, number: u64, head_sha: &str) -> Self {
        self.pull_requests.insert(number, head_sha.to_string());
        self
    }

    pub fn deployment_calls(&self) -> usize {
        *self.deployment_calls.lock()
    }

    pub fn status_calls(&self) -> usize {
        *self.status_calls.lock()
    }

    pub fn last_environment(&self) -> Option<String> {
        self.last_environment.lock().clone()
    }
}

#[async_trait]
impl DeploymentApi for FakeApi {
    async fn list_deployments(
        &self,
        _repo: &Repository,
        _sha: &str,
        environment: Option<&str>,
    ) -> Result<Vec<Deployment>, ApiError> {
        *self.deployment_calls.lock() += 1;
        *self.last_environment.lock() = environment.map(str::to_string);
        self.deployments.lock().next()
    }

    async fn list_deployment_statuses(
        &self,
        _repo: &Repository,
        _deployment_id: u64,
    ) -> Result<Vec<DeploymentStatus>, ApiError> {
        *self.status_calls.lock() += 1;
        self.statuses.lock().next()
    }

    async fn get_pull_request(
        &self,
        _repo: &Repository,
        number: u64,
    ) -> Result<PullRequest, ApiError> {
        self.pull_requests
            .get(&number)
            .map(|sha| PullRequest {
                number,
                head: CommitRef { sha: sha.clone() },
            })
            .ok_or_else(|| ApiError::Status {
                status: 404,
                message: "Not Found".to_string(),
            })
    }
}
