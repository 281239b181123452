use async_trait::async_trait;
use k8s_openapi::api::core::v1::{Namespace, Pod};
use kube::api::{ListParams, LogParams};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::core::Request;
use kube::{Api, Client, Config, Resource};
use std::path::Path;
use tracing::debug;

use crate::error::{Error, Result};
use crate::types::{LogOptions, LogStream, PodSummary};

/// Everything the monitor needs from the cluster.
///
/// The kube-rs implementation below talks to a real API server; tests plug in
/// an in-memory fake with the same contract.
#[async_trait]
pub trait PodSource: Send + Sync {
    /// List pods in `namespace`, optionally filtered by a label selector.
    async fn list_pods(
        &self,
        namespace: &str,
        label_selector: Option<&str>,
    ) -> Result<Vec<PodSummary>>;

    /// Open the log stream of one container.
    async fn stream_logs<'a>(
        &'a self,
        namespace: &'a str,
        pod: &'a str,
        options: &'a LogOptions,
    ) -> Result<LogStream<'a>>;

    async fn namespace_exists(&self, namespace: &str) -> Result<bool>;

    async fn list_namespaces(&self) -> Result<Vec<String>>;
}

/// A connected client plus what was learned from the kubeconfig.
pub struct ClusterConnection {
    pub source: KubePodSource,
    pub context: String,
    pub default_namespace: String,
}

pub struct KubePodSource {
    client: Client,
}

impl KubePodSource {
    /// Build a client from the given kubeconfig, or the default one
    /// (`$KUBECONFIG` / `~/.kube/config`) when no path is set.
    pub async fn connect(kubeconfig_path: Option<&Path>) -> Result<ClusterConnection> {
        let label = kubeconfig_path
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "the default kubeconfig".to_string());
        let kubeconfig_err = |source: crate::error::BoxError| Error::Kubeconfig {
            path: label.clone(),
            source,
        };

        let kubeconfig = match kubeconfig_path {
            Some(path) => Kubeconfig::read_from(path),
            None => Kubeconfig::read(),
        }
        .map_err(|e| kubeconfig_err(e.into()))?;

        let context = kubeconfig
            .current_context
            .clone()
            .unwrap_or_else(|| "default".to_string());
        let default_namespace = current_namespace(&kubeconfig);

        let config = Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default())
            .await
            .map_err(|e| kubeconfig_err(e.into()))?;
        let client = Client::try_from(config).map_err(|e| kubeconfig_err(e.into()))?;

        debug!("Connected using context {}", context);
        Ok(ClusterConnection {
            source: KubePodSource { client },
            context,
            default_namespace,
        })
    }
}

/// Namespace configured on the kubeconfig's current context, `default` if none.
pub fn current_namespace(kubeconfig: &Kubeconfig) -> String {
    kubeconfig
        .current_context
        .as_ref()
        .and_then(|current| kubeconfig.contexts.iter().find(|c| &c.name == current))
        .and_then(|named| named.context.as_ref())
        .and_then(|ctx| ctx.namespace.clone())
        .filter(|ns| !ns.is_empty())
        .unwrap_or_else(|| "default".to_string())
}

impl From<Pod> for PodSummary {
    fn from(pod: Pod) -> Self {
        let name = pod.metadata.name.unwrap_or_default();
        let (phase, ready) = match &pod.status {
            Some(status) => (
                status.phase.clone().unwrap_or_else(|| "Unknown".to_string()),
                status
                    .conditions
                    .as_ref()
                    .map(|conds| {
                        conds
                            .iter()
                            .any(|c| c.type_ == "Ready" && c.status == "True")
                    })
                    .unwrap_or(false),
            ),
            None => ("Unknown".to_string(), false),
        };
        let (containers, init_containers) = match pod.spec {
            Some(spec) => (
                spec.containers.into_iter().map(|c| c.name).collect(),
                spec.init_containers
                    .unwrap_or_default()
                    .into_iter()
                    .map(|c| c.name)
                    .collect(),
            ),
            None => (Vec::new(), Vec::new()),
        };

        PodSummary {
            name,
            phase,
            ready,
            containers,
            init_containers,
        }
    }
}

#[async_trait]
impl PodSource for KubePodSource {
    async fn list_pods(
        &self,
        namespace: &str,
        label_selector: Option<&str>,
    ) -> Result<Vec<PodSummary>> {
        let api: Api<Pod> = Api::namespaced(self.client.clone(), namespace);
        let mut params = ListParams::default();
        if let Some(selector) = label_selector {
            params = params.labels(selector);
        }

        let list = api.list(&params).await.map_err(|e| Error::Listing {
            namespace: namespace.to_string(),
            source: e.into(),
        })?;

        Ok(list.items.into_iter().map(PodSummary::from).collect())
    }

    async fn stream_logs<'a>(
        &'a self,
        namespace: &'a str,
        pod: &'a str,
        options: &'a LogOptions,
    ) -> Result<LogStream<'a>> {
        let container = options.container.clone().unwrap_or_default();
        let stream_err = |source: crate::error::BoxError| Error::Stream {
            pod: pod.to_string(),
            container: container.clone(),
            source,
        };

        let params = LogParams {
            container: options.container.clone(),
            follow: options.follow,
            since_seconds: options.since_seconds,
            tail_lines: options.tail_lines,
            ..Default::default()
        };

        // Build the request by hand so the stream only borrows the client.
        let request = Request::new(Pod::url_path(&(), Some(namespace)))
            .logs(pod, &params)
            .map_err(|e| stream_err(e.into()))?;
        let stream = self
            .client
            .request_stream(request)
            .await
            .map_err(|e| stream_err(e.into()))?;

        Ok(Box::pin(stream))
    }

    async fn namespace_exists(&self, namespace: &str) -> Result<bool> {
        let api: Api<Namespace> = Api::all(self.client.clone());
        let found = api
            .get_opt(namespace)
            .await
            .map_err(|e| Error::Namespace(e.into()))?;
        Ok(found.is_some())
    }

    async fn list_namespaces(&self) -> Result<Vec<String>> {
        let api: Api<Namespace> = Api::all(self.client.clone());
        let list = api
            .list(&ListParams::default())
            .await
            .map_err(|e| Error::Namespace(e.into()))?;
        Ok(list
            .items
            .into_iter()
            .filter_map(|ns| ns.metadata.name)
            .collect())
    }
}
