use std::{
    collections::HashSet,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use soak_model::Target;
use tracing::{debug, info, warn};

use crate::{config::DiscoverConfig, errors::DiscoverError};

/// Resolve the target list for the process.
///
/// Without a discovery config the whole suite runs as a single anonymous target.
pub fn resolve(cfg: Option<&DiscoverConfig>) -> Result<Vec<Target>, DiscoverError> {
    match cfg {
        Some(cfg) => discover(cfg),
        None => {
            info!("no targets directory configured; running the whole suite");
            Ok(vec![Target::anonymous()])
        }
    }
}

/// List `cfg.dir` and build one target per entry, ordered by file name.
///
/// Hidden entries (leading `.`) are skipped.
/// With a filter set, the result holds at most one target.
pub fn discover(cfg: &DiscoverConfig) -> Result<Vec<Target>, DiscoverError> {
    let dir = &cfg.dir;
    let entries = fs::read_dir(dir).map_err(|e| read_error(dir, e))?;

    let mut found: Vec<(String, PathBuf, bool)> = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| read_error(dir, e))?;
        let Some(file_name) = entry.file_name().to_str().map(str::to_owned) else {
            warn!(path = %entry.path().display(), "skipping entry with non utf-8 name");
            continue;
        };
        if file_name.starts_with('.') {
            continue;
        }
        let is_dir = entry
            .file_type()
            .map_err(|e| read_error(dir, e))?
            .is_dir();
        found.push((file_name, entry.path(), is_dir));
    }
    found.sort_by(|a, b| a.0.cmp(&b.0));

    debug!(dir = %dir.display(), entries = ?found.iter().map(|e| &e.0).collect::<Vec<_>>(), "listed targets directory");

    let targets: Vec<Target> = found
        .into_iter()
        .filter(|(file_name, _, _)| match &cfg.filter {
            Some(wanted) => file_name == wanted,
            None => true,
        })
        .map(|(file_name, path, is_dir)| {
            let name = target_name(&file_name, is_dir);
            let location = fs::canonicalize(&path).unwrap_or(path);
            Target::new(name, location)
        })
        .collect();

    for name in shared_names(&targets) {
        warn!(
            dir = %dir.display(),
            target = name,
            "several entries share this target name; their series overwrite each other"
        );
    }
    if let Some(wanted) = &cfg.filter
        && targets.is_empty()
    {
        warn!(dir = %dir.display(), filter = %wanted, "no target matches the filter");
    }
    info!(
        dir = %dir.display(),
        count = targets.len(),
        targets = ?targets.iter().map(Target::name).collect::<Vec<_>>(),
        "targets discovered"
    );
    Ok(targets)
}

/// Names carried by more than one target, in first-repeat order.
fn shared_names(targets: &[Target]) -> Vec<&str> {
    let mut seen = HashSet::new();
    let mut shared = Vec::new();
    for t in targets {
        if !seen.insert(t.name()) && !shared.contains(&t.name()) {
            shared.push(t.name());
        }
    }
    shared
}

fn target_name(file_name: &str, is_dir: bool) -> String {
    if is_dir {
        return file_name.to_string();
    }
    Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name)
        .to_string()
}

fn read_error(dir: &Path, e: std::io::Error) -> DiscoverError {
    match e.kind() {
        ErrorKind::NotFound => DiscoverError::NotFound(dir.to_path_buf()),
        ErrorKind::NotADirectory => DiscoverError::NotADirectory(dir.to_path_buf()),
        _ => DiscoverError::Unreadable {
            path: dir.to_path_buf(),
            source: e,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), b"").unwrap();
    }

    #[test]
    fn lists_files_in_name_order_without_extension() {
        let tmp = tempfile::tempdir().unwrap();
        touch(tmp.path(), "b.spec");
        touch(tmp.path(), "a.spec");

        let targets = discover(&DiscoverConfig::new(tmp.path())).unwrap();
        let names: Vec<_> = targets.iter().map(Target::name).collect();
        assert_eq!(names, ["a", "b"]);

        let loc = targets[0].location().unwrap();
        assert!(loc.is_absolute());
        assert!(loc.ends_with("a.spec"));
    }

    #[test]
    fn filter_keeps_exact_match_only() {
        let tmp = tempfile::tempdir().unwrap();
        touch(tmp.path(), "a.spec");
        touch(tmp.path(), "b.spec");

        let cfg = DiscoverConfig::new(tmp.path()).with_filter("b.spec");
        let targets = discover(&cfg).unwrap();
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].name(), "b");
    }

    #[test]
    fn filter_without_match_yields_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        touch(tmp.path(), "a.spec");

        let cfg = DiscoverConfig::new(tmp.path()).with_filter("b");
        assert!(discover(&cfg).unwrap().is_empty());
    }

    #[test]
    fn same_stem_entries_are_kept_and_flagged() {
        let tmp = tempfile::tempdir().unwrap();
        touch(tmp.path(), "a.spec.js");
        touch(tmp.path(), "a.spec.ts");
        touch(tmp.path(), "b.spec.js");

        let targets = discover(&DiscoverConfig::new(tmp.path())).unwrap();
        let names: Vec<_> = targets.iter().map(Target::name).collect();

        assert_eq!(names, ["a.spec", "a.spec", "b.spec"]);
        assert_eq!(shared_names(&targets), ["a.spec"]);
    }

    #[test]
    fn distinct_names_are_not_flagged() {
        let targets = vec![Target::new("a", "/s/a"), Target::new("b", "/s/b")];
        assert!(shared_names(&targets).is_empty());
    }

    #[test]
    fn directories_keep_full_name() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir(tmp.path().join("checkout.flow")).unwrap();
        touch(tmp.path(), "login.spec.js");

        let targets = discover(&DiscoverConfig::new(tmp.path())).unwrap();
        let names: Vec<_> = targets.iter().map(Target::name).collect();
        assert_eq!(names, ["checkout.flow", "login.spec"]);
    }

    #[test]
    fn hidden_entries_are_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        touch(tmp.path(), ".DS_Store");
        touch(tmp.path(), "a.spec");

        let targets = discover(&DiscoverConfig::new(tmp.path())).unwrap();
        assert_eq!(targets.len(), 1);
    }

    #[test]
    fn missing_directory_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("nope");

        let err = discover(&DiscoverConfig::new(&missing)).unwrap_err();
        assert!(matches!(err, DiscoverError::NotFound(p) if p == missing));
    }

    #[test]
    fn file_instead_of_directory_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        touch(tmp.path(), "plain");

        let err = discover(&DiscoverConfig::new(tmp.path().join("plain"))).unwrap_err();
        assert!(matches!(
            err,
            DiscoverError::NotADirectory(_) | DiscoverError::Unreadable { .. }
        ));
    }

    #[test]
    fn resolve_without_config_is_anonymous() {
        let targets = resolve(None).unwrap();
        assert_eq!(targets, vec![Target::anonymous()]);
    }
}
