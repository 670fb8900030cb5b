use super::{ClientConfig, ConfigLock, ContextError, ContextResult};
use std::{
    fs,
    io::{self, Write},
    path::Path,
};
use tempfile::NamedTempFile;
use tracing::debug;

/// Reads the config at `path`. A missing or blank file is an empty config.
pub fn load(path: &Path) -> ContextResult<ClientConfig> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no config file yet");
            return Ok(ClientConfig::default());
        }
        Err(source) => {
            return Err(ContextError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    if contents.trim().is_empty() {
        return Ok(ClientConfig::default());
    }

    let mut config: ClientConfig =
        serde_yaml::from_str(&contents).map_err(|source| ContextError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    config.normalize();

    debug!(
        path = %path.display(),
        contexts = config.contexts().len(),
        "config loaded"
    );
    Ok(config)
}

/// Replaces the config at `path` with `config`.
///
/// The blob is written to a temp file in the same directory, synced, then
/// renamed over the old one, so a crash leaves either version intact.
pub fn write(path: &Path, config: &ClientConfig, _lock: &ConfigLock) -> ContextResult<()> {
    let write_err = |source: io::Error| ContextError::Write {
        path: path.to_path_buf(),
        source,
    };

    let data = serde_yaml::to_string(config).map_err(ContextError::Serialize)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(write_err)?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(data.as_bytes()).map_err(write_err)?;
    tmp.flush().map_err(write_err)?;
    tmp.as_file().sync_all().map_err(write_err)?;
    tmp.persist(path).map_err(|err| write_err(err.error))?;

    debug!(path = %path.display(), "config saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{ClusterOptions, Context, ContextType, GlobalOptions};
    use tempfile::TempDir;

    fn sample() -> ClientConfig {
        let mut config = ClientConfig::default();
        config
            .add(
                Context::cluster(
                    "test-mc",
                    ClusterOptions {
                        endpoint: "test-endpoint".into(),
                        path: "test-path".into(),
                        context: "test-context".into(),
                        is_management_cluster: true,
                    },
                ),
                true,
            )
            .unwrap();
        config
            .add(
                Context::global(
                    "test-tmc",
                    GlobalOptions {
                        endpoint: "test-endpoint".into(),
                    },
                ),
                true,
            )
            .unwrap();
        config
    }

    #[test]
    fn missing_file_loads_default() {
        let dir = TempDir::new().unwrap();
        let config = load(&dir.path().join("config.yaml")).unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn blank_file_loads_default() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "\n  \n").unwrap();

        assert_eq!(load(&path).unwrap(), ClientConfig::default());
    }

    #[test]
    fn garbage_is_a_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "contexts: [this is: not, valid").unwrap();

        assert!(matches!(load(&path), Err(ContextError::Parse { .. })));
    }

    #[test]
    fn save_then_load_is_stable() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        let lock = ConfigLock::acquire(&dir.path().join(".config.lock")).unwrap();

        let config = sample();
        write(&path, &config, &lock).unwrap();
        let loaded = load(&path).unwrap();
        assert_eq!(loaded, config);

        write(&path, &loaded, &lock).unwrap();
        assert_eq!(load(&path).unwrap(), config);
    }

    #[test]
    fn save_leaves_no_temp_files() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        let lock = ConfigLock::acquire(&dir.path().join(".config.lock")).unwrap();

        write(&path, &sample(), &lock).unwrap();

        let mut names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().into_string().unwrap())
            .collect();
        names.sort();
        assert_eq!(names, [".config.lock", "config.yaml"]);
    }

    #[test]
    fn writes_legacy_current_key() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        let lock = ConfigLock::acquire(&dir.path().join(".config.lock")).unwrap();

        write(&path, &sample(), &lock).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("current: test-mc"), "{raw}");
        assert!(raw.contains("k8s: test-mc"), "{raw}");
        assert!(raw.contains("tmc: test-tmc"), "{raw}");
    }

    #[test]
    fn legacy_only_file_gets_current_k8s() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(
            &path,
            "contexts:\n- name: old-mc\n  type: k8s\n  clusterOpts:\n    endpoint: e\ncurrent: old-mc\n",
        )
        .unwrap();

        let config = load(&path).unwrap();
        assert_eq!(config.current(ContextType::K8s).unwrap().name, "old-mc");
    }
}
