//! Host-specific configuration and paths
//!
//! Alfred keeps per-workflow storage in two versioned locations:
//! - cache: ~/Library/Caches/com.runningwithcrayons.Alfred-<version>/Workflow Data/<bundle id>
//! - data:  ~/Library/Application Support/Alfred <version>/Workflow Data/<bundle id>

use std::path::{Path, PathBuf};

/// Bundle id used when neither an override nor info.plist provides one
pub const PLACEHOLDER_BUNDLE_ID: &str = "com.alfredapp.workflow.unknown";

/// Workflow configuration file inside the working directory
pub const INFO_PLIST: &str = "info.plist";

/// Key holding the bundle id in info.plist
pub const BUNDLE_ID_KEY: &str = "bundleid";

/// Suffix appended to the target name by `atomic_write`
pub const DEFAULT_TEMP_SUFFIX: &str = "atomictmp";

/// Tool used to read and write plist settings
pub const SETTINGS_TOOL: &str = "defaults";

/// Spotlight metadata search tool
pub const SEARCH_TOOL: &str = "mdfind";

/// Alfred major versions probed at startup, lowest first
pub const HOST_VERSIONS: [u32; 4] = [2, 3, 4, 5];

const APPLICATIONS_DIR: &str = "/Applications";
const CACHE_HOST: &str = "com.runningwithcrayons.Alfred";
const DATA_HOST: &str = "Alfred";
const WORKFLOW_DATA: &str = "Workflow Data";

/// Get the volatile cache directory for a workflow
pub fn cache_dir(home: &Path, version: u32, bundle_id: &str) -> PathBuf {
    home.join("Library")
        .join("Caches")
        .join(format!("{}-{}", CACHE_HOST, version))
        .join(WORKFLOW_DATA)
        .join(bundle_id)
}

/// Get the persistent data directory for a workflow
pub fn data_dir(home: &Path, version: u32, bundle_id: &str) -> PathBuf {
    home.join("Library")
        .join("Application Support")
        .join(format!("{} {}", DATA_HOST, version))
        .join(WORKFLOW_DATA)
        .join(bundle_id)
}

/// Detects which major version of the host application is installed
pub trait HostVersionProbe {
    fn installed_version(&self) -> Option<u32>;
}

/// Probe that looks for `Alfred <n>.app` bundles on disk
#[derive(Debug, Clone)]
pub struct AppBundleProbe {
    candidates: Vec<(u32, PathBuf)>,
}

impl AppBundleProbe {
    /// Probe the given versions inside `applications_dir`, in the order given
    pub fn new<P: AsRef<Path>>(applications_dir: P, versions: &[u32]) -> Self {
        let dir = applications_dir.as_ref();
        let candidates = versions
            .iter()
            .map(|v| (*v, dir.join(format!("{} {}.app", DATA_HOST, v))))
            .collect();
        Self { candidates }
    }
}

impl Default for AppBundleProbe {
    fn default() -> Self {
        Self::new(APPLICATIONS_DIR, &HOST_VERSIONS)
    }
}

impl HostVersionProbe for AppBundleProbe {
    fn installed_version(&self) -> Option<u32> {
        self.candidates
            .iter()
            .find(|(_, bundle)| bundle.exists())
            .map(|(version, _)| *version)
    }
}

/// Probe with a predetermined answer
#[derive(Debug, Clone, Copy)]
pub struct FixedVersionProbe(pub Option<u32>);

impl HostVersionProbe for FixedVersionProbe {
    fn installed_version(&self) -> Option<u32> {
        self.0
    }
}
