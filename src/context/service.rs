use super::store::{load, write};
use super::{
    ClientConfig, ConfigLock, Context, ContextError, ContextResult, ContextType, StorePaths,
};
use std::collections::BTreeMap;
use tracing::info;

/// Handle on the persisted context store.
///
/// Every operation runs its own lock -> load -> (mutate -> save) -> unlock
/// bracket, so callers never need to lock, and nothing read in one call is
/// reused by the next.
#[derive(Debug, Clone)]
pub struct ContextStore {
    paths: StorePaths,
}

impl ContextStore {
    pub fn new(paths: StorePaths) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &StorePaths {
        &self.paths
    }

    /// Locks the store and returns a fresh snapshot. Nothing is written back.
    pub fn read(&self) -> ContextResult<ClientConfig> {
        let _lock = ConfigLock::acquire(&self.paths.lock_file())?;
        load(&self.paths.config_file())
    }

    /// Runs `mutate` on freshly loaded state and saves the result.
    ///
    /// If `mutate` fails nothing is written.
    pub fn update<T, F>(&self, mutate: F) -> ContextResult<T>
    where
        F: FnOnce(&mut ClientConfig) -> ContextResult<T>,
    {
        let lock = ConfigLock::acquire(&self.paths.lock_file())?;
        let path = self.paths.config_file();

        let mut config = load(&path)?;
        let out = mutate(&mut config)?;
        write(&path, &config, &lock)?;

        Ok(out)
    }

    pub fn get_context(&self, name: &str) -> ContextResult<Context> {
        let config = self.read()?;

        config
            .get(name)
            .cloned()
            .ok_or_else(|| ContextError::NotFound(name.to_string()))
    }

    pub fn context_exists(&self, name: &str) -> ContextResult<bool> {
        Ok(self.read()?.contains(name))
    }

    pub fn add_context(&self, ctx: Context, make_current: bool) -> ContextResult<()> {
        let name = ctx.name.clone();
        let context_type = ctx.context_type();

        self.update(|config| config.add(ctx, make_current))?;

        info!(context = %name, %context_type, current = make_current, "context added");
        Ok(())
    }

    pub fn remove_context(&self, name: &str) -> ContextResult<Context> {
        let removed = self.update(|config| config.remove(name))?;

        info!(context = %name, context_type = %removed.context_type(), "context removed");
        Ok(removed)
    }

    pub fn set_current_context(&self, name: &str) -> ContextResult<()> {
        self.update(|config| config.set_current(name))?;

        info!(context = %name, "current context set");
        Ok(())
    }

    pub fn get_current_context(&self, context_type: ContextType) -> ContextResult<Context> {
        self.read()?.current(context_type).cloned()
    }

    /// Clears the current context of `context_type`, returning the name it pointed to.
    pub fn remove_current_context(&self, context_type: ContextType) -> ContextResult<String> {
        let name = self.update(|config| config.clear_current(context_type))?;

        info!(context = %name, %context_type, "current context unset");
        Ok(name)
    }

    /// Contexts in insertion order, each flagged with whether it is current for its type.
    pub fn list_contexts(
        &self,
        context_type: Option<ContextType>,
    ) -> ContextResult<Vec<(Context, bool)>> {
        let config = self.read()?;

        Ok(config
            .contexts()
            .iter()
            .filter(|ctx| context_type.is_none_or(|ty| ctx.context_type() == ty))
            .map(|ctx| (ctx.clone(), config.is_current(ctx)))
            .collect())
    }

    pub fn current_contexts(&self) -> ContextResult<BTreeMap<ContextType, Context>> {
        let config = self.read()?;

        Ok(config
            .current_contexts()
            .map(|(ty, ctx)| (ty, ctx.clone()))
            .collect())
    }
}
