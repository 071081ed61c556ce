//! Thin HTTP client for a Marathon-style orchestrator.
//!
//! Implements the collaborator traits against the Marathon app API and the
//! agent statistics endpoint. Transport only: no retries and no token
//! refresh. Fetch failures surface as `NoMetricData` and actuation
//! failures as `Actuation`, so the control loop treats them like any
//! other skippable cycle condition.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde::Deserialize;
use tracing::debug;

use mesoscale_core::{
    Actuator, AppInventory, AppSnapshot, MetricsSource, ScaleError, ScaleResult, TaskStats,
};

const APPS_PATH: &str = "/service/marathon/v2/apps";

/// Spacing between the two cpu-time samples used for the usage delta.
const CPU_SAMPLE_GAP: Duration = Duration::from_secs(1);

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct MarathonClient {
    http: reqwest::Client,
    base: String,
    token: Option<String>,
}

#[derive(Deserialize)]
struct AppResponse {
    app: AppDetail,
}

#[derive(Deserialize)]
struct AppDetail {
    instances: u32,
    #[serde(default)]
    tasks: Vec<TaskDetail>,
}

#[derive(Deserialize)]
struct TaskDetail {
    id: String,
    #[serde(rename = "slaveId")]
    slave_id: String,
}

/// One executor entry from the agent `/monitor/statistics` endpoint.
#[derive(Deserialize)]
struct ExecutorEntry {
    executor_id: String,
    statistics: Statistics,
}

#[derive(Debug, Clone, Copy, Deserialize)]
struct Statistics {
    #[serde(default)]
    cpus_user_time_secs: f64,
    #[serde(default)]
    cpus_system_time_secs: f64,
    #[serde(default)]
    cpus_limit: f64,
    #[serde(default)]
    mem_rss_bytes: u64,
    #[serde(default)]
    mem_limit_bytes: u64,
    #[serde(default)]
    timestamp: f64,
}

impl Statistics {
    fn cpu_time(&self) -> f64 {
        self.cpus_user_time_secs + self.cpus_system_time_secs
    }
}

fn no_data(error: reqwest::Error) -> ScaleError {
    ScaleError::NoMetricData(error.to_string())
}

impl MarathonClient {
    pub fn new(base: &str, token: Option<String>) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            base: base.trim_end_matches('/').to_string(),
            token,
        })
    }

    fn request(&self, method: Method, url: String) -> reqwest::RequestBuilder {
        let mut request = self.http.request(method, url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        request
    }

    /// Statistics for one task on one agent, or `None` if the agent has no
    /// executor for it yet.
    async fn executor_stats(&self, agent: &str, task: &str) -> ScaleResult<Option<Statistics>> {
        let url = format!("{}/agent/{}/monitor/statistics", self.base, agent);
        let response = self
            .request(Method::GET, url)
            .send()
            .await
            .map_err(no_data)?
            .error_for_status()
            .map_err(no_data)?;
        let entries: Vec<ExecutorEntry> = response.json().await.map_err(no_data)?;
        Ok(entries
            .into_iter()
            .find(|entry| entry.executor_id == task)
            .map(|entry| entry.statistics))
    }
}

#[async_trait]
impl MetricsSource for MarathonClient {
    async fn task_stats(&self, agent: &str, task: &str) -> ScaleResult<Option<TaskStats>> {
        Ok(self.executor_stats(agent, task).await?.map(|stats| TaskStats {
            mem_rss_bytes: stats.mem_rss_bytes,
            mem_limit_bytes: stats.mem_limit_bytes,
        }))
    }

    async fn cpu_usage(&self, agent: &str, task: &str) -> ScaleResult<f64> {
        // Utilization needs a delta: cumulative cpu time at two points,
        // divided by the elapsed window and the task's cpu allocation.
        let missing = || {
            ScaleError::NoMetricData(format!("no statistics for task {task} on agent {agent}"))
        };
        let first = self.executor_stats(agent, task).await?.ok_or_else(missing)?;
        tokio::time::sleep(CPU_SAMPLE_GAP).await;
        let second = self.executor_stats(agent, task).await?.ok_or_else(missing)?;

        let elapsed = second.timestamp - first.timestamp;
        if elapsed <= 0.0 || second.cpus_limit <= 0.0 {
            return Err(ScaleError::InvalidMetric {
                task: task.to_string(),
                agent: agent.to_string(),
                reason: "non-positive cpu sample window or cpu limit".to_string(),
            });
        }

        let usage = 100.0 * (second.cpu_time() - first.cpu_time()) / elapsed / second.cpus_limit;
        debug!(%task, %agent, usage, "cpu usage sampled");
        Ok(usage)
    }

    async fn queue_depth(&self, queue: &str) -> ScaleResult<f64> {
        // `queue` is an HTTP endpoint returning the depth as a JSON number.
        self.request(Method::GET, queue.to_string())
            .send()
            .await
            .map_err(no_data)?
            .error_for_status()
            .map_err(no_data)?
            .json::<f64>()
            .await
            .map_err(no_data)
    }
}

#[async_trait]
impl AppInventory for MarathonClient {
    async fn snapshot(&self, app: &str) -> ScaleResult<Option<AppSnapshot>> {
        let url = format!("{}{}{}", self.base, APPS_PATH, app);
        let response = self.request(Method::GET, url).send().await.map_err(no_data)?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let body: AppResponse = response
            .error_for_status()
            .map_err(no_data)?
            .json()
            .await
            .map_err(no_data)?;
        let tasks = body
            .app
            .tasks
            .into_iter()
            .map(|task| (task.id, task.slave_id))
            .collect();
        Ok(Some(AppSnapshot {
            instances: body.app.instances,
            tasks,
        }))
    }
}

#[async_trait]
impl Actuator for MarathonClient {
    async fn set_instances(&self, app: &str, target: u32) -> ScaleResult<()> {
        let url = format!("{}{}{}", self.base, APPS_PATH, app);
        let failed = |error: reqwest::Error| ScaleError::Actuation {
            app: app.to_string(),
            reason: error.to_string(),
        };
        self.request(Method::PUT, url)
            .json(&serde_json::json!({ "instances": target }))
            .send()
            .await
            .map_err(failed)?
            .error_for_status()
            .map_err(failed)?;
        debug!(%app, target, "instance count submitted");
        Ok(())
    }
}
