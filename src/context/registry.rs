use super::{ClientConfig, Context, ContextError, ContextResult, ContextType};
use tracing::warn;

impl ClientConfig {
    /// All contexts in insertion order.
    pub fn contexts(&self) -> &[Context] {
        &self.known_contexts
    }

    pub fn get(&self, name: &str) -> Option<&Context> {
        self.known_contexts.iter().find(|ctx| ctx.name == name)
    }

    /// True for any context of that name, including ones of a type this build
    /// does not know. Those reserve their name but cannot be read or changed here.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
            || self
                .foreign_contexts
                .iter()
                .any(|ctx| ctx.name.as_deref() == Some(name))
    }

    pub fn is_current(&self, ctx: &Context) -> bool {
        self.current_context
            .get(&ctx.context_type())
            .is_some_and(|name| *name == ctx.name)
    }

    /// Appends `ctx`, optionally making it current for its type.
    ///
    /// Names are unique across every type.
    pub fn add(&mut self, ctx: Context, make_current: bool) -> ContextResult<()> {
        ctx.validate()?;

        if self.contains(&ctx.name) {
            return Err(ContextError::AlreadyExists(ctx.name));
        }

        if make_current {
            self.current_context.insert(ctx.context_type(), ctx.name.clone());
        }
        self.known_contexts.push(ctx);
        self.sync_current_server();

        Ok(())
    }

    /// Removes the named context, clearing any current pointer that named it.
    pub fn remove(&mut self, name: &str) -> ContextResult<Context> {
        let index = self
            .known_contexts
            .iter()
            .position(|ctx| ctx.name == name)
            .ok_or_else(|| ContextError::RemoveNotFound(name.to_string()))?;

        let ctx = self.known_contexts.remove(index);
        let context_type = ctx.context_type();

        if self.current_context.get(&context_type) == Some(&ctx.name) {
            self.current_context.remove(&context_type);
        }
        self.sync_current_server();

        Ok(ctx)
    }

    pub fn set_current(&mut self, name: &str) -> ContextResult<()> {
        let context_type = self
            .get(name)
            .map(Context::context_type)
            .ok_or_else(|| ContextError::NotFound(name.to_string()))?;

        self.current_context.insert(context_type, name.to_string());
        self.sync_current_server();

        Ok(())
    }

    pub fn current(&self, context_type: ContextType) -> ContextResult<&Context> {
        self.current_context
            .get(&context_type)
            .and_then(|name| self.get(name))
            .ok_or(ContextError::NoCurrentContext(context_type))
    }

    /// Clears the current pointer of `context_type`, returning the name it held.
    pub fn clear_current(&mut self, context_type: ContextType) -> ContextResult<String> {
        let name = self
            .current_context
            .remove(&context_type)
            .ok_or(ContextError::NoCurrentContext(context_type))?;
        self.sync_current_server();

        Ok(name)
    }

    /// Every type that has a current context, with that context.
    pub fn current_contexts(&self) -> impl Iterator<Item = (ContextType, &Context)> {
        self.current_context
            .iter()
            .filter_map(|(ty, name)| self.get(name).map(|ctx| (*ty, ctx)))
    }

    /// Drops current pointers that no longer resolve and adopts a legacy-only current server.
    pub(super) fn normalize(&mut self) {
        let dangling: Vec<ContextType> = self
            .current_context
            .iter()
            .filter(|(ty, name)| self.get(name).is_none_or(|ctx| ctx.context_type() != **ty))
            .map(|(ty, _)| *ty)
            .collect();

        for ty in dangling {
            if let Some(name) = self.current_context.remove(&ty) {
                warn!(
                    context = %name,
                    context_type = %ty,
                    "dropping current context that no longer matches a known context"
                );
            }
        }

        if !self.current_context.contains_key(&ContextType::PRIMARY) {
            let legacy = self
                .current_server
                .as_deref()
                .and_then(|name| self.get(name))
                .filter(|ctx| ctx.context_type().is_primary())
                .map(|ctx| ctx.name.clone());

            if let Some(name) = legacy {
                warn!(context = %name, "adopting legacy current server as current k8s context");
                self.current_context.insert(ContextType::PRIMARY, name);
            }
        }

        self.sync_current_server();
    }

    /// The legacy pointer mirrors the current primary-type context and nothing else.
    fn sync_current_server(&mut self) {
        self.current_server = self.current_context.get(&ContextType::PRIMARY).cloned();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{ClusterOptions, GlobalOptions};

    fn mc(name: &str) -> Context {
        Context::cluster(
            name,
            ClusterOptions {
                endpoint: "test-endpoint".into(),
                path: "test-path".into(),
                context: "test-context".into(),
                is_management_cluster: true,
            },
        )
    }

    fn tmc(name: &str) -> Context {
        Context::global(
            name,
            GlobalOptions {
                endpoint: "test-endpoint".into(),
            },
        )
    }

    #[test]
    fn add_rejects_duplicate_across_types() {
        let mut cfg = ClientConfig::default();
        cfg.add(mc("shared"), true).unwrap();
        let before = cfg.clone();

        let err = cfg.add(tmc("shared"), true).unwrap_err();

        assert_eq!(err.to_string(), "context \"shared\" already exists");
        assert_eq!(cfg, before);
    }

    #[test]
    fn add_current_updates_pointer_and_server() {
        let mut cfg = ClientConfig::default();
        cfg.add(mc("mc1"), true).unwrap();
        cfg.add(tmc("svc1"), true).unwrap();

        assert_eq!(cfg.current(ContextType::K8s).unwrap().name, "mc1");
        assert_eq!(cfg.current(ContextType::Tmc).unwrap().name, "svc1");
        assert_eq!(cfg.current_server.as_deref(), Some("mc1"));
    }

    #[test]
    fn add_without_current_leaves_pointers() {
        let mut cfg = ClientConfig::default();
        cfg.add(mc("mc1"), false).unwrap();

        assert!(cfg.contains("mc1"));
        assert!(matches!(
            cfg.current(ContextType::K8s),
            Err(ContextError::NoCurrentContext(ContextType::K8s))
        ));
        assert_eq!(cfg.current_server, None);
    }

    #[test]
    fn remove_keeps_insertion_order() {
        let mut cfg = ClientConfig::default();
        for name in ["a", "b", "c"] {
            cfg.add(mc(name), false).unwrap();
        }

        cfg.remove("b").unwrap();

        let names: Vec<_> = cfg.contexts().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["a", "c"]);
    }

    #[test]
    fn remove_current_clears_pointers() {
        let mut cfg = ClientConfig::default();
        cfg.add(mc("mc1"), true).unwrap();
        cfg.add(tmc("svc1"), true).unwrap();

        cfg.remove("mc1").unwrap();

        assert!(cfg.current(ContextType::K8s).is_err());
        assert_eq!(cfg.current_server, None);
        assert_eq!(cfg.current(ContextType::Tmc).unwrap().name, "svc1");
    }

    #[test]
    fn remove_missing_uses_unquoted_message() {
        let mut cfg = ClientConfig::default();
        let err = cfg.remove("test").unwrap_err();
        assert_eq!(err.to_string(), "context test not found");
    }

    #[test]
    fn set_current_secondary_leaves_server() {
        let mut cfg = ClientConfig::default();
        cfg.add(mc("mc1"), true).unwrap();
        cfg.add(tmc("svc1"), false).unwrap();

        cfg.set_current("svc1").unwrap();

        assert_eq!(cfg.current_server.as_deref(), Some("mc1"));
    }

    #[test]
    fn set_current_missing_does_not_mutate() {
        let mut cfg = ClientConfig::default();
        cfg.add(mc("mc1"), true).unwrap();
        let before = cfg.clone();

        let err = cfg.set_current("nope").unwrap_err();

        assert_eq!(err.to_string(), "could not find context \"nope\"");
        assert_eq!(cfg, before);
    }

    #[test]
    fn clear_current_primary_clears_server() {
        let mut cfg = ClientConfig::default();
        cfg.add(mc("mc1"), true).unwrap();

        assert_eq!(cfg.clear_current(ContextType::K8s).unwrap(), "mc1");
        assert_eq!(cfg.current_server, None);
        assert!(cfg.clear_current(ContextType::K8s).is_err());
    }

    #[test]
    fn normalize_drops_dangling_and_adopts_legacy() {
        let mut cfg = ClientConfig::default();
        cfg.add(mc("mc1"), false).unwrap();
        cfg.add(tmc("svc1"), false).unwrap();
        cfg.current_context.insert(ContextType::Tmc, "gone".into());
        cfg.current_context.insert(ContextType::K8s, "svc1".into());
        cfg.current_server = Some("mc1".into());

        cfg.normalize();

        assert_eq!(cfg.current(ContextType::K8s).unwrap().name, "mc1");
        assert!(cfg.current(ContextType::Tmc).is_err());
        assert_eq!(cfg.current_server.as_deref(), Some("mc1"));
    }
}
