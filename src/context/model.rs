use super::{ContextError, ContextResult};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de::Error as _};
use std::{collections::BTreeMap, fmt};

/// Kind of remote endpoint a context connects to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ContextType {
    /// Cluster managed directly through its API server. Backs the legacy server view.
    K8s,
    /// Hosted management service reached through a single global endpoint.
    Tmc,
}

impl ContextType {
    pub const PRIMARY: ContextType = ContextType::K8s;
    pub const ALL: [ContextType; 2] = [ContextType::K8s, ContextType::Tmc];

    /// `None` for tags written by tooling that knows more types than this build.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ty| ty.as_str() == tag)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ContextType::K8s => "k8s",
            ContextType::Tmc => "tmc",
        }
    }

    pub fn is_primary(self) -> bool {
        self == Self::PRIMARY
    }
}

impl fmt::Display for ContextType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterOptions {
    #[serde(default)]
    pub endpoint: String,
    /// Path to the kubeconfig holding the cluster credentials.
    #[serde(default)]
    pub path: String,
    /// Context name inside that kubeconfig.
    #[serde(default)]
    pub context: String,
    #[serde(default)]
    pub is_management_cluster: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalOptions {
    #[serde(default)]
    pub endpoint: String,
}

/// Connection options, one variant per [`ContextType`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Cluster(ClusterOptions),
    Global(GlobalOptions),
}

/// A named connection profile.
///
/// The type tag is derived from the [`Target`] variant, so a context whose tag
/// and payload disagree cannot be built in memory. The on-disk shape keeps the
/// tag and the per-type options side by side and is checked on deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawContext", into = "RawContext")]
pub struct Context {
    pub name: String,
    pub target: Target,
}

impl Context {
    pub fn cluster(name: impl Into<String>, opts: ClusterOptions) -> Self {
        Self {
            name: name.into(),
            target: Target::Cluster(opts),
        }
    }

    pub fn global(name: impl Into<String>, opts: GlobalOptions) -> Self {
        Self {
            name: name.into(),
            target: Target::Global(opts),
        }
    }

    pub fn context_type(&self) -> ContextType {
        match self.target {
            Target::Cluster(_) => ContextType::K8s,
            Target::Global(_) => ContextType::Tmc,
        }
    }

    pub fn endpoint(&self) -> &str {
        match &self.target {
            Target::Cluster(opts) => &opts.endpoint,
            Target::Global(opts) => &opts.endpoint,
        }
    }

    pub fn cluster_opts(&self) -> Option<&ClusterOptions> {
        match &self.target {
            Target::Cluster(opts) => Some(opts),
            Target::Global(_) => None,
        }
    }

    pub(crate) fn validate(&self) -> ContextResult<()> {
        if self.name.trim().is_empty() {
            return Err(ContextError::InvalidContext {
                name: self.name.clone(),
                reason: "name cannot be empty".into(),
            });
        }
        Ok(())
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawContext {
    name: String,
    #[serde(rename = "type")]
    context_type: ContextType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cluster_opts: Option<ClusterOptions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    global_opts: Option<GlobalOptions>,
}

impl TryFrom<RawContext> for Context {
    type Error = ContextError;

    fn try_from(raw: RawContext) -> Result<Self, Self::Error> {
        let invalid = |reason: &str| ContextError::InvalidContext {
            name: raw.name.clone(),
            reason: reason.to_string(),
        };

        let target = match (raw.context_type, raw.cluster_opts, raw.global_opts) {
            (ContextType::K8s, Some(opts), None) => Target::Cluster(opts),
            (ContextType::Tmc, None, Some(opts)) => Target::Global(opts),
            (ContextType::K8s, _, Some(_)) => {
                return Err(invalid("k8s context must not carry globalOpts"));
            }
            (ContextType::Tmc, Some(_), _) => {
                return Err(invalid("tmc context must not carry clusterOpts"));
            }
            (ContextType::K8s, None, None) => return Err(invalid("missing clusterOpts")),
            (ContextType::Tmc, None, None) => return Err(invalid("missing globalOpts")),
        };

        Ok(Context {
            name: raw.name,
            target,
        })
    }
}

impl From<Context> for RawContext {
    fn from(ctx: Context) -> Self {
        let context_type = ctx.context_type();
        let (cluster_opts, global_opts) = match ctx.target {
            Target::Cluster(opts) => (Some(opts), None),
            Target::Global(opts) => (None, Some(opts)),
        };

        RawContext {
            name: ctx.name,
            context_type,
            cluster_opts,
            global_opts,
        }
    }
}

/// A context whose type this build does not know, kept verbatim.
///
/// Its name still takes part in the uniqueness check, and it is written back
/// unchanged so newer tooling sharing the file keeps its entries.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct ForeignContext {
    pub name: Option<String>,
    pub raw: serde_yaml::Value,
}

/// Root of the persisted configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientConfig {
    pub(super) known_contexts: Vec<Context>,
    pub(super) current_context: BTreeMap<ContextType, String>,
    /// Legacy current-server pointer. Only ever written by `sync_current_server`.
    pub(super) current_server: Option<String>,
    pub(super) foreign_contexts: Vec<ForeignContext>,
    pub(super) foreign_current: BTreeMap<String, String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawConfig {
    #[serde(default)]
    contexts: Vec<serde_yaml::Value>,
    #[serde(default)]
    current_context: BTreeMap<String, String>,
    #[serde(default)]
    current: Option<String>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum ContextEntry<'a> {
    Known(&'a Context),
    Foreign(&'a serde_yaml::Value),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ConfigView<'a> {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    contexts: Vec<ContextEntry<'a>>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    current_context: BTreeMap<&'a str, &'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    current: Option<&'a str>,
}

impl<'de> Deserialize<'de> for ClientConfig {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawConfig::deserialize(deserializer)?;
        let mut config = ClientConfig {
            current_server: raw.current,
            ..Default::default()
        };

        for entry in raw.contexts {
            let tag = entry.get("type").and_then(serde_yaml::Value::as_str);
            if tag.and_then(ContextType::from_tag).is_some() {
                let ctx = serde_yaml::from_value(entry).map_err(D::Error::custom)?;
                config.known_contexts.push(ctx);
            } else {
                let name = entry
                    .get("name")
                    .and_then(serde_yaml::Value::as_str)
                    .map(str::to_string);
                config.foreign_contexts.push(ForeignContext { name, raw: entry });
            }
        }

        for (tag, name) in raw.current_context {
            match ContextType::from_tag(&tag) {
                Some(ty) => {
                    config.current_context.insert(ty, name);
                }
                None => {
                    config.foreign_current.insert(tag, name);
                }
            }
        }

        Ok(config)
    }
}

impl Serialize for ClientConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let contexts = self
            .known_contexts
            .iter()
            .map(ContextEntry::Known)
            .chain(
                self.foreign_contexts
                    .iter()
                    .map(|ctx| ContextEntry::Foreign(&ctx.raw)),
            )
            .collect();

        let current_context = self
            .current_context
            .iter()
            .map(|(ty, name)| (ty.as_str(), name.as_str()))
            .chain(
                self.foreign_current
                    .iter()
                    .map(|(tag, name)| (tag.as_str(), name.as_str())),
            )
            .collect();

        ConfigView {
            contexts,
            current_context,
            current: self.current_server.as_deref(),
        }
        .serialize(serializer)
    }
}
