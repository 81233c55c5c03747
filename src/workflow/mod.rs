//! The workflow context
//!
//! One [`Workflow`] is built per script invocation. It resolves the bundle id,
//! the host version and the storage directories once, then serves settings,
//! file and feedback operations against them.

pub mod location;

pub use location::Location;

use std::ffi::OsString;
use std::fmt;
use std::fs;
use std::path::{self, Path, PathBuf, MAIN_SEPARATOR};

use crate::config::{self, AppBundleProbe, HostVersionProbe};
use crate::error::{Error, Result};
use crate::feedback::{xml, ResultItem, ResultsOverride};
use crate::files::{self, Contents};
use crate::request::{self, RequestOptions};
use crate::settings::{DefaultsStore, SettingsStore};
use crate::shell;

/// Per-invocation state of an Alfred workflow script
pub struct Workflow {
    bundle_id: String,
    placeholder_bundle: bool,
    host_version: u32,
    cache_path: Option<PathBuf>,
    data_path: Option<PathBuf>,
    working_path: PathBuf,
    home_path: PathBuf,
    store: Box<dyn SettingsStore>,
    search_tool: String,
    results: Vec<ResultItem>,
}

/// Builder for [`Workflow`], used to swap out the environment and external tools
#[derive(Default)]
pub struct WorkflowBuilder {
    bundle_id: Option<String>,
    home: Option<PathBuf>,
    working_dir: Option<PathBuf>,
    probe: Option<Box<dyn HostVersionProbe>>,
    store: Option<Box<dyn SettingsStore>>,
    search_tool: Option<String>,
}

impl WorkflowBuilder {
    /// Use this bundle id instead of reading info.plist
    pub fn bundle_id(mut self, bundle_id: impl Into<String>) -> Self {
        self.bundle_id = Some(bundle_id.into());
        self
    }

    pub fn home(mut self, home: impl Into<PathBuf>) -> Self {
        self.home = Some(home.into());
        self
    }

    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn probe(mut self, probe: impl HostVersionProbe + 'static) -> Self {
        self.probe = Some(Box::new(probe));
        self
    }

    pub fn store(mut self, store: impl SettingsStore + 'static) -> Self {
        self.store = Some(Box::new(store));
        self
    }

    /// Command used by `metadata_search` in place of `mdfind`
    pub fn search_tool(mut self, tool: impl Into<String>) -> Self {
        self.search_tool = Some(tool.into());
        self
    }

    /// Resolve the bundle id, host version and storage directories
    pub fn build(self) -> Result<Workflow> {
        let home_path = match self.home {
            Some(home) => home,
            None => dirs::home_dir().ok_or(Error::LocationUnavailable("home"))?,
        };
        let working_path = match self.working_dir {
            Some(dir) => dir,
            None => std::env::current_dir().map_err(|_| Error::LocationUnavailable("working"))?,
        };
        let store = self
            .store
            .unwrap_or_else(|| Box::new(DefaultsStore::default()));
        let probe = self
            .probe
            .unwrap_or_else(|| Box::new(AppBundleProbe::default()));

        let explicit = self.bundle_id.filter(|id| !id.is_empty());
        let (bundle_id, placeholder_bundle) = match explicit {
            Some(id) => (id, false),
            None => match read_bundle_id(&*store, &working_path) {
                Some(id) => (id, false),
                None => {
                    log::warn!(
                        "No bundle id found in {}, using {}",
                        working_path.display(),
                        config::PLACEHOLDER_BUNDLE_ID
                    );
                    (config::PLACEHOLDER_BUNDLE_ID.to_string(), true)
                }
            },
        };

        let host_version = probe
            .installed_version()
            .ok_or(Error::UnknownHostVersion)?;

        let cache_path = ensure_dir(config::cache_dir(&home_path, host_version, &bundle_id));
        let data_path = ensure_dir(config::data_dir(&home_path, host_version, &bundle_id));

        Ok(Workflow {
            bundle_id,
            placeholder_bundle,
            host_version,
            cache_path,
            data_path,
            working_path,
            home_path,
            store,
            search_tool: self
                .search_tool
                .unwrap_or_else(|| config::SEARCH_TOOL.to_string()),
            results: Vec::new(),
        })
    }
}

/// Read `bundleid` from info.plist in the working directory, if there is one
fn read_bundle_id(store: &dyn SettingsStore, working_path: &Path) -> Option<String> {
    let info = join(working_path, config::INFO_PLIST);
    if !info.exists() {
        return None;
    }
    store
        .get(&info, config::BUNDLE_ID_KEY)
        .ok()
        .filter(|id| !id.is_empty())
}

/// Create a single directory level if missing; the parent must already exist
fn ensure_dir(path: PathBuf) -> Option<PathBuf> {
    if path.is_dir() {
        return Some(path);
    }
    match fs::create_dir(&path) {
        Ok(()) => Some(path),
        Err(e) => {
            log::warn!("Could not create {}: {}", path.display(), e);
            None
        }
    }
}

/// Join with exactly one separator, without interpreting `name`
///
/// Trailing separators on `base` are dropped first, so the root joins as `/name`.
fn join(base: &Path, name: &str) -> PathBuf {
    let base = base.as_os_str();
    let mut joined = match base.to_str() {
        Some(text) => OsString::from(text.trim_end_matches(path::is_separator)),
        None => base.to_os_string(),
    };
    joined.push(MAIN_SEPARATOR.to_string());
    joined.push(name);
    PathBuf::from(joined)
}

impl Workflow {
    /// Build a workflow against the real environment
    pub fn new(bundle_id: Option<&str>) -> Result<Self> {
        let mut builder = Self::builder();
        if let Some(id) = bundle_id {
            builder = builder.bundle_id(id);
        }
        builder.build()
    }

    pub fn builder() -> WorkflowBuilder {
        WorkflowBuilder::default()
    }

    pub fn bundle_id(&self) -> &str {
        &self.bundle_id
    }

    /// Whether the bundle id is the fallback placeholder
    pub fn is_placeholder_bundle(&self) -> bool {
        self.placeholder_bundle
    }

    /// Detected major version of the host application
    pub fn host_version(&self) -> u32 {
        self.host_version
    }

    pub fn cache_path(&self) -> Result<&Path> {
        self.cache_path
            .as_deref()
            .ok_or(Error::LocationUnavailable("cache"))
    }

    pub fn data_path(&self) -> Result<&Path> {
        self.data_path
            .as_deref()
            .ok_or(Error::LocationUnavailable("data"))
    }

    /// Working directory at the time the workflow was built
    pub fn working_path(&self) -> &Path {
        &self.working_path
    }

    pub fn home_path(&self) -> &Path {
        &self.home_path
    }

    /// Get the directory behind a base location
    pub fn location(&self, location: Location) -> Result<&Path> {
        match location {
            Location::Cache => self.cache_path(),
            Location::Data => self.data_path(),
            Location::Path => Ok(self.working_path()),
            Location::Home => Ok(self.home_path()),
        }
    }

    /// Join `name` onto a base given by keyword: cache, data, path or home
    ///
    /// Never touches the filesystem.
    pub fn resolve_path(&self, base: &str, name: &str) -> Result<PathBuf> {
        let location = base.parse::<Location>()?;
        self.resolve(location, name)
    }

    /// Join `name` onto a base location
    pub fn resolve(&self, location: Location, name: &str) -> Result<PathBuf> {
        if name.is_empty() {
            return Err(Error::EmptyName);
        }
        Ok(join(self.location(location)?, name))
    }

    /// Find a file by name: an existing path as given, else in data, else in
    /// cache, else where it would be created in data
    pub fn locate(&self, name: &str) -> PathBuf {
        let given = PathBuf::from(name);
        if given.exists() {
            return given;
        }

        let in_data = self.data_path.as_deref().map(|dir| join(dir, name));
        let in_cache = self.cache_path.as_deref().map(|dir| join(dir, name));
        let existing = [&in_data, &in_cache]
            .into_iter()
            .flatten()
            .find(|path| path.exists())
            .cloned();

        existing.or(in_data).unwrap_or(given)
    }

    // Settings

    /// Write one setting. Failures of the settings tool are not reported.
    pub fn set_value<P, V>(&self, file: P, key: &str, value: V)
    where
        P: AsRef<Path>,
        V: fmt::Display,
    {
        self.store.set(file.as_ref(), key, &value.to_string());
    }

    /// Write each setting in order; a failing entry does not stop the rest
    pub fn set_values<P, I, K, V>(&self, file: P, values: I)
    where
        P: AsRef<Path>,
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: fmt::Display,
    {
        let file = file.as_ref();
        for (key, value) in values {
            self.set_value(file, key.as_ref(), value);
        }
    }

    /// Read one setting, failing with `KeyNotFound` when the tool prints nothing
    pub fn get_value<P: AsRef<Path>>(&self, file: P, key: &str) -> Result<String> {
        self.store.get(file.as_ref(), key)
    }

    // Files

    pub fn read_file<P: AsRef<Path>>(&self, path: P) -> Result<Contents> {
        files::read_file(path)
    }

    pub fn write_file<P, D>(&self, path: P, data: D) -> Result<usize>
    where
        P: AsRef<Path>,
        D: Into<Contents>,
    {
        files::write_file(path, &data.into())
    }

    /// Crash-safe write; `suffix` defaults to `atomictmp`
    pub fn atomic_write<P, D>(&self, path: P, data: D, suffix: Option<&str>) -> Result<usize>
    where
        P: AsRef<Path>,
        D: Into<Contents>,
    {
        files::atomic_write(
            path,
            &data.into(),
            suffix.unwrap_or(config::DEFAULT_TEMP_SUFFIX),
        )
    }

    // Feedback

    /// Append a result and hand back a copy of it
    pub fn add_result(&mut self, item: ResultItem) -> ResultItem {
        self.results.push(item.clone());
        item
    }

    /// Snapshot of the results added so far
    pub fn list_results(&self) -> Vec<ResultItem> {
        self.results.clone()
    }

    pub fn clear_results(&mut self) {
        self.results.clear();
    }

    /// Render `results`, or the accumulated list when `None`, as feedback XML
    pub fn render_xml(&self, results: Option<ResultsOverride>) -> Result<String> {
        let items = match results {
            Some(results) => results.into_fields()?,
            None => self.results.iter().map(ResultItem::fields).collect(),
        };
        xml::render(&items)
    }

    // External tools

    pub fn http_request(&self, url: &str, options: &RequestOptions) -> Result<String> {
        request::http_request(url, options)
    }

    /// Run a Spotlight query, one result per line
    ///
    /// With `simple` the query is quoted as a single argument. Otherwise it is
    /// passed to the shell verbatim and the caller is responsible for quoting.
    pub fn metadata_search(&self, query: &str, simple: bool) -> Vec<String> {
        shell::run_lines(&self.search_command(query, simple))
    }

    fn search_command(&self, query: &str, simple: bool) -> String {
        if simple {
            shell::command_line(&self.search_tool, [shell::escape_arg(query)])
        } else {
            shell::command_line(&self.search_tool, [query])
        }
    }
}

impl fmt::Debug for Workflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Workflow")
            .field("bundle_id", &self.bundle_id)
            .field("host_version", &self.host_version)
            .field("cache_path", &self.cache_path)
            .field("data_path", &self.data_path)
            .field("working_path", &self.working_path)
            .field("home_path", &self.home_path)
            .field("results", &self.results.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FixedVersionProbe;
    use crate::settings::MemoryStore;
    use serde_json::json;
    use tempfile::TempDir;

    /// A home directory with both Alfred 2 parent directories in place
    fn fake_home() -> TempDir {
        let home = TempDir::new().unwrap();
        fs::create_dir_all(
            home.path()
                .join("Library/Caches/com.runningwithcrayons.Alfred-2/Workflow Data"),
        )
        .unwrap();
        fs::create_dir_all(
            home.path()
                .join("Library/Application Support/Alfred 2/Workflow Data"),
        )
        .unwrap();
        home
    }

    fn builder(home: &TempDir, working: &TempDir) -> WorkflowBuilder {
        Workflow::builder()
            .home(home.path())
            .working_dir(working.path())
            .probe(FixedVersionProbe(Some(2)))
            .store(MemoryStore::new())
    }

    #[test]
    fn test_explicit_bundle_id() {
        let (home, working) = (fake_home(), TempDir::new().unwrap());
        let wf = builder(&home, &working).bundle_id("com.me.wf").build().unwrap();

        assert_eq!(wf.bundle_id(), "com.me.wf");
        assert!(!wf.is_placeholder_bundle());
        assert_eq!(
            wf.cache_path().unwrap(),
            home.path()
                .join("Library/Caches/com.runningwithcrayons.Alfred-2/Workflow Data/com.me.wf")
        );
        assert!(wf.cache_path().unwrap().is_dir());
        assert!(wf.data_path().unwrap().is_dir());
    }

    #[test]
    fn test_bundle_id_from_info_plist() {
        let (home, working) = (fake_home(), TempDir::new().unwrap());
        let info = working.path().join("info.plist");
        fs::write(&info, "<plist/>").unwrap();

        let store = MemoryStore::new();
        store.insert(&info, "bundleid", "com.from.plist");

        let wf = builder(&home, &working).store(store).build().unwrap();
        assert_eq!(wf.bundle_id(), "com.from.plist");
    }

    #[test]
    fn test_placeholder_bundle_id() {
        let (home, working) = (fake_home(), TempDir::new().unwrap());
        let wf = builder(&home, &working).build().unwrap();

        assert_eq!(wf.bundle_id(), config::PLACEHOLDER_BUNDLE_ID);
        assert!(wf.is_placeholder_bundle());
        assert!(wf.data_path().unwrap().ends_with(config::PLACEHOLDER_BUNDLE_ID));
    }

    #[test]
    fn test_unknown_host_version() {
        let (home, working) = (fake_home(), TempDir::new().unwrap());
        let err = builder(&home, &working)
            .probe(FixedVersionProbe(None))
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::UnknownHostVersion));
    }

    #[test]
    fn test_missing_parent_degrades_location() {
        // No Library tree: single-level mkdir cannot succeed
        let (home, working) = (TempDir::new().unwrap(), TempDir::new().unwrap());
        let wf = builder(&home, &working).bundle_id("com.me.wf").build().unwrap();

        assert!(matches!(
            wf.cache_path(),
            Err(Error::LocationUnavailable("cache"))
        ));
        assert!(wf.resolve_path("data", "x.json").is_err());
        assert!(wf.resolve_path("home", "x.json").is_ok());
    }

    #[test]
    fn test_resolve_path_joins_with_one_separator() {
        let (home, working) = (fake_home(), TempDir::new().unwrap());
        let wf = builder(&home, &working).bundle_id("com.me.wf").build().unwrap();

        for location in Location::ALL {
            let base = wf.location(location).unwrap().to_string_lossy().into_owned();
            let resolved = wf.resolve_path(location.as_str(), "settings.json").unwrap();
            assert_eq!(
                resolved.to_string_lossy(),
                format!("{}{}settings.json", base, MAIN_SEPARATOR)
            );
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_join_drops_trailing_separators() {
        assert_eq!(join(Path::new("/"), "x"), PathBuf::from("/x"));
        assert_eq!(join(Path::new("/tmp/"), "x"), PathBuf::from("/tmp/x"));
        assert_eq!(join(Path::new("/tmp//"), "a/b"), PathBuf::from("/tmp/a/b"));
        assert_eq!(join(Path::new("/tmp"), "x"), PathBuf::from("/tmp/x"));
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_path_under_root_working_dir() {
        let (home, working) = (fake_home(), TempDir::new().unwrap());
        let wf = builder(&home, &working).working_dir("/").build().unwrap();

        let resolved = wf.resolve_path("path", "x").unwrap();
        assert_eq!(resolved.to_string_lossy(), "/x");
    }

    #[test]
    fn test_resolve_path_does_not_create_files() {
        let (home, working) = (fake_home(), TempDir::new().unwrap());
        let wf = builder(&home, &working).build().unwrap();

        let path = wf.resolve_path("cache", "later.json").unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_resolve_path_rejects_bad_input() {
        let (home, working) = (fake_home(), TempDir::new().unwrap());
        let wf = builder(&home, &working).build().unwrap();

        assert!(matches!(
            wf.resolve_path("temp", "a"),
            Err(Error::InvalidBase(_))
        ));
        for location in Location::ALL {
            assert!(matches!(
                wf.resolve_path(location.as_str(), ""),
                Err(Error::EmptyName)
            ));
        }
    }

    #[test]
    fn test_working_path_is_captured() {
        let (home, working) = (fake_home(), TempDir::new().unwrap());
        let wf = builder(&home, &working).build().unwrap();
        assert_eq!(wf.working_path(), working.path());
        assert_eq!(wf.home_path(), home.path());
    }

    #[test]
    fn test_locate_prefers_existing_files() {
        let (home, working) = (fake_home(), TempDir::new().unwrap());
        let wf = builder(&home, &working).build().unwrap();

        let cached = wf.resolve_path("cache", "list.json").unwrap();
        fs::write(&cached, "[]").unwrap();
        assert_eq!(wf.locate("list.json"), cached);

        let stored = wf.resolve_path("data", "list.json").unwrap();
        fs::write(&stored, "[]").unwrap();
        assert_eq!(wf.locate("list.json"), stored);

        assert_eq!(
            wf.locate("new.json"),
            wf.resolve_path("data", "new.json").unwrap()
        );
    }

    #[test]
    fn test_settings_roundtrip() {
        let (home, working) = (fake_home(), TempDir::new().unwrap());
        let wf = builder(&home, &working).build().unwrap();
        let file = wf.resolve_path("data", "settings.plist").unwrap();

        wf.set_value(&file, "count", 3);
        assert_eq!(wf.get_value(&file, "count").unwrap(), "3");
        assert!(matches!(
            wf.get_value(&file, "never-set"),
            Err(Error::KeyNotFound { .. })
        ));
    }

    #[test]
    fn test_set_values_writes_every_entry() {
        let (home, working) = (fake_home(), TempDir::new().unwrap());
        let store = MemoryStore::read_only();
        let wf = builder(&home, &working).store(store.clone()).build().unwrap();

        wf.set_values("/tmp/s.plist", [("a", "1"), ("b", "2"), ("c", "3")]);

        let writes = store.writes();
        assert_eq!(writes.len(), 3);
        assert_eq!(writes[1].key, "b");
        assert_eq!(writes[1].value, "2");
    }

    #[test]
    fn test_atomic_write_default_suffix() {
        let (home, working) = (fake_home(), TempDir::new().unwrap());
        let wf = builder(&home, &working).build().unwrap();
        let path = wf.resolve_path("data", "state.json").unwrap();

        wf.atomic_write(&path, json!({"a": [1, 2]}), None).unwrap();
        assert!(!files::temp_path(&path, "atomictmp").exists());
        assert_eq!(
            wf.read_file(&path).unwrap(),
            Contents::Json(json!({"a": [1, 2]}))
        );
    }

    #[test]
    fn test_render_empty_fails() {
        let (home, working) = (fake_home(), TempDir::new().unwrap());
        let wf = builder(&home, &working).build().unwrap();
        assert!(matches!(wf.render_xml(None), Err(Error::NoResults)));
    }

    #[test]
    fn test_render_minimal_result() {
        let (home, working) = (fake_home(), TempDir::new().unwrap());
        let mut wf = builder(&home, &working).build().unwrap();

        wf.add_result(ResultItem::new("T", "S", "icon.png"));
        let xml = wf.render_xml(None).unwrap();

        assert!(xml.starts_with(r#"<?xml version="1.0"?><items>"#));
        assert!(xml.contains(
            r#"<item valid="yes"><title>T</title><subtitle>S</subtitle><icon>icon.png</icon></item>"#
        ));
        assert!(!xml.contains("uid="));
        assert!(!xml.contains("arg="));
        assert!(!xml.contains("autocomplete="));
    }

    #[test]
    fn test_list_results_is_a_snapshot() {
        let (home, working) = (fake_home(), TempDir::new().unwrap());
        let mut wf = builder(&home, &working).build().unwrap();

        let returned = wf.add_result(ResultItem::new("a", "", "i").uid("1"));
        assert_eq!(returned.uid.as_deref(), Some("1"));

        let mut snapshot = wf.list_results();
        snapshot.clear();
        assert_eq!(wf.list_results().len(), 1);

        wf.clear_results();
        assert!(wf.list_results().is_empty());
    }

    #[test]
    fn test_render_override_ignores_accumulated() {
        let (home, working) = (fake_home(), TempDir::new().unwrap());
        let mut wf = builder(&home, &working).build().unwrap();
        wf.add_result(ResultItem::new("mine", "", "i"));

        let xml = wf
            .render_xml(Some(ResultsOverride::Json(
                r#"[{"title": "theirs", "subtitle": "", "icon": "i"}]"#.into(),
            )))
            .unwrap();
        assert!(xml.contains("<title>theirs</title>"));
        assert!(!xml.contains("mine"));

        assert!(matches!(
            wf.render_xml(Some(ResultsOverride::Items(Vec::new()))),
            Err(Error::NoResults)
        ));
    }

    #[test]
    fn test_search_command_quoting() {
        let (home, working) = (fake_home(), TempDir::new().unwrap());
        let wf = builder(&home, &working).build().unwrap();

        assert_eq!(wf.search_command("my file", true), "mdfind 'my file'");
        assert_eq!(
            wf.search_command("-onlyin ~ 'kind:pdf'", false),
            "mdfind -onlyin ~ 'kind:pdf'"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_metadata_search_simple_vs_raw() {
        let (home, working) = (fake_home(), TempDir::new().unwrap());
        let wf = builder(&home, &working)
            .search_tool("printf '%s\\n'")
            .build()
            .unwrap();

        assert_eq!(wf.metadata_search("a b", true), vec!["a b"]);
        assert_eq!(wf.metadata_search("a b", false), vec!["a", "b"]);
    }
}
