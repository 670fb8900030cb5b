//! Legacy "server" view for callers that predate context types.
//!
//! A server is a projection of a k8s context. Nothing here is stored
//! separately, so the view cannot drift from the contexts it is built on.

use super::{
    ClientConfig, ClusterOptions, Context, ContextError, ContextResult, ContextStore, ContextType,
};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Server {
    pub name: String,
    #[serde(flatten)]
    pub opts: ClusterOptions,
}

impl Server {
    /// `None` for contexts outside the primary type.
    pub fn from_context(ctx: &Context) -> Option<Self> {
        ctx.cluster_opts().map(|opts| Self {
            name: ctx.name.clone(),
            opts: opts.clone(),
        })
    }
}

impl ClientConfig {
    /// Names share one space across all types, so this matches any context.
    pub fn server_exists(&self, name: &str) -> bool {
        self.contains(name)
    }

    pub fn current_server(&self) -> ContextResult<Server> {
        self.current_server
            .as_deref()
            .and_then(|name| self.get(name))
            .and_then(Server::from_context)
            .ok_or(ContextError::NoCurrentContext(ContextType::PRIMARY))
    }

    pub fn servers(&self) -> impl Iterator<Item = Server> {
        self.contexts().iter().filter_map(Server::from_context)
    }
}

impl ContextStore {
    pub fn server_exists(&self, name: &str) -> ContextResult<bool> {
        Ok(self.read()?.server_exists(name))
    }

    pub fn get_current_server(&self) -> ContextResult<Server> {
        self.read()?.current_server()
    }

    pub fn list_servers(&self) -> ContextResult<Vec<Server>> {
        Ok(self.read()?.servers().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::GlobalOptions;

    fn mc(name: &str) -> Context {
        Context::cluster(
            name,
            ClusterOptions {
                endpoint: format!("https://{name}.example"),
                ..Default::default()
            },
        )
    }

    #[test]
    fn current_server_follows_primary_only() {
        let mut config = ClientConfig::default();
        config.add(mc("mc1"), true).unwrap();
        config
            .add(Context::global("svc1", GlobalOptions::default()), true)
            .unwrap();

        let server = config.current_server().unwrap();
        assert_eq!(server.name, "mc1");
        assert_eq!(server.opts.endpoint, "https://mc1.example");

        config.add(mc("mc2"), false).unwrap();
        config.set_current("mc2").unwrap();
        assert_eq!(config.current_server().unwrap().name, "mc2");
    }

    #[test]
    fn no_current_server_reports_primary_type() {
        let config = ClientConfig::default();
        let err = config.current_server().unwrap_err();
        assert_eq!(err.to_string(), "no current context set for type \"k8s\"");
    }

    #[test]
    fn servers_skip_secondary_contexts() {
        let mut config = ClientConfig::default();
        config.add(mc("mc1"), false).unwrap();
        config
            .add(Context::global("svc1", GlobalOptions::default()), false)
            .unwrap();
        config.add(mc("mc2"), false).unwrap();

        let names: Vec<_> = config.servers().map(|s| s.name).collect();
        assert_eq!(names, ["mc1", "mc2"]);
        assert!(config.server_exists("svc1"));
    }
}
