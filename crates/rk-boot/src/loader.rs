//! Boot configuration loading with overrides
//!
//! Loading runs once, before anything is served:
//!
//! 1. Decode the YAML boot document into a base tree.
//! 2. Collect overrides from prefixed environment variables.
//! 3. Collect overrides from the `--rkset` flag.
//! 4. Merge environment overrides, then flag overrides, into the base tree.
//!    Flags are applied last and therefore win.
//! 5. Project the merged tree onto the caller's configuration type.
//!
//! Only steps 1 and 5 can fail. Malformed overrides are logged and skipped.
//!
//! # Example
//!
//! ```
//! use rk_boot::{BootLoader, OverrideSources};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Boot {
//!     gin: Vec<Gin>,
//! }
//!
//! #[derive(Deserialize)]
//! struct Gin {
//!     port: u16,
//! }
//!
//! let sources = OverrideSources::new()
//!     .with_env([("RK_GIN_0_PORT", "2008")])
//!     .with_flags(["gin[0].port=3000"]);
//!
//! let boot: Boot = BootLoader::new()
//!     .unmarshal("gin:\n  - port: 1949\n", &sources)
//!     .unwrap();
//! assert_eq!(boot.gin[0].port, 3000);
//! ```

use rk_override::{DEFAULT_PREFIX, EnvCollector, FlagCollector, MergeReport, Node, Overrides, merge};
use serde::de::DeserializeOwned;

use crate::args::rkset_values;
use crate::decode::from_node;
use crate::document::parse_document;
use crate::error::{Error, Result};

/// Snapshot of the raw override inputs for one load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverrideSources {
    env: Vec<(String, String)>,
    flags: Vec<String>,
}

impl OverrideSources {
    /// No environment variables and no flag values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot the process environment and command line.
    ///
    /// Environment entries that are not valid UTF-8 are skipped.
    pub fn from_process() -> Self {
        let args: Vec<String> = std::env::args_os()
            .filter_map(|arg| arg.into_string().ok())
            .collect();

        Self::new()
            .with_process_env()
            .with_flags(rkset_values(args))
    }

    /// Add the process environment, skipping entries that are not UTF-8.
    pub fn with_process_env(self) -> Self {
        self.with_env(
            std::env::vars_os()
                .filter_map(|(name, value)| Some((name.into_string().ok()?, value.into_string().ok()?))),
        )
    }

    pub fn with_env<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.env
            .extend(vars.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Add `--rkset` values.
    pub fn with_flags<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.flags.extend(values.into_iter().map(Into::into));
        self
    }

    pub fn env(&self) -> &[(String, String)] {
        &self.env
    }

    pub fn flags(&self) -> &[String] {
        &self.flags
    }
}

/// The merged tree and what went into it.
#[derive(Debug, Clone)]
pub struct LoadedTree {
    pub tree: Node,
    pub env: Overrides,
    pub flags: Overrides,
    pub env_report: MergeReport,
    pub flag_report: MergeReport,
}

impl LoadedTree {
    /// Project the merged tree onto a configuration type.
    pub fn decode<T: DeserializeOwned>(self) -> Result<T> {
        Ok(from_node(self.tree)?)
    }
}

/// Loads boot documents and applies environment and flag overrides.
#[derive(Debug)]
pub struct BootLoader {
    env: EnvCollector,
    flags: FlagCollector,
    lowercase_keys: bool,
}

impl Default for BootLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl BootLoader {
    /// A loader reading environment variables prefixed with `RK_`.
    pub fn new() -> Self {
        Self {
            env: EnvCollector::new(DEFAULT_PREFIX),
            flags: FlagCollector::new(),
            lowercase_keys: true,
        }
    }

    /// Use another environment variable prefix, given without the `_`.
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env = EnvCollector::new(prefix);
        self
    }

    /// Lower-case every key of the boot document and of the overrides before
    /// merging. Enabled by default.
    ///
    /// Environment paths are always lower-case, so documents with mixed-case
    /// keys are only reachable from the environment with this enabled. Struct
    /// fields are matched ignoring case when decoding, so `commonService`
    /// still fills a `rename_all = "camelCase"` field.
    pub fn lowercase_keys(mut self, enabled: bool) -> Self {
        self.lowercase_keys = enabled;
        self
    }

    pub fn env_prefix(&self) -> &str {
        self.env.prefix()
    }

    /// Collect overrides from both sources without loading a document.
    pub fn collect(&self, sources: &OverrideSources) -> (Overrides, Overrides) {
        let env = self.env.collect(
            sources
                .env
                .iter()
                .map(|(name, value)| (name.as_str(), value.as_str())),
        );
        let flags = self.flags.collect(sources.flags.as_slice());
        (env, flags)
    }

    /// Decode `raw` and merge overrides into it.
    pub fn load_tree(&self, raw: &str, sources: &OverrideSources) -> Result<LoadedTree> {
        let mut tree = parse_document(raw)?;
        if self.lowercase_keys {
            tree = tree.lowercase_keys();
        }

        let (env, flags) = self.collect(sources);

        let (env_tree, flag_tree) = if self.lowercase_keys {
            (env.tree().lowercase_keys(), flags.tree().lowercase_keys())
        } else {
            (env.tree().clone(), flags.tree().clone())
        };

        let env_report = merge(&mut tree, &env_tree);
        tracing::debug!(
            replaced = env_report.replaced,
            discarded = env_report.discarded.len(),
            "Merged environment overrides"
        );

        let flag_report = merge(&mut tree, &flag_tree);
        tracing::debug!(
            replaced = flag_report.replaced,
            discarded = flag_report.discarded.len(),
            "Merged flag overrides"
        );

        Ok(LoadedTree {
            tree,
            env,
            flags,
            env_report,
            flag_report,
        })
    }

    /// Decode `raw`, apply overrides, and project onto `T`.
    pub fn unmarshal<T: DeserializeOwned>(&self, raw: &str, sources: &OverrideSources) -> Result<T> {
        self.load_tree(raw, sources)?.decode()
    }

    /// [`BootLoader::unmarshal`] with the process environment and arguments.
    pub fn unmarshal_process<T: DeserializeOwned>(&self, raw: &str) -> Result<T> {
        self.unmarshal(raw, &OverrideSources::from_process())
    }

    /// Like [`BootLoader::unmarshal_process`], but terminates the process
    /// when the configuration cannot be loaded.
    pub fn unmarshal_or_exit<T: DeserializeOwned>(&self, raw: &str) -> T {
        match self.unmarshal_process(raw) {
            Ok(config) => config,
            Err(err) => shutdown_with_error(&err),
        }
    }
}

/// Report a fatal boot error on stderr and exit with status 1.
pub fn shutdown_with_error(err: &Error) -> ! {
    eprintln!("{}", fatal_message(err));
    std::process::exit(1)
}

fn fatal_message(err: &Error) -> String {
    format!("error: {err}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde::Deserialize;

    const BOOT: &str = r#"
gin:
  - name: greeter
    port: 1949
    commonService:
      enabled: true
logger:
  level: info
"#;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Boot {
        gin: Vec<Gin>,
        logger: Logger,
    }

    #[derive(Debug, Deserialize, PartialEq)]
    #[serde(rename_all = "camelCase")]
    struct Gin {
        name: String,
        port: u16,
        common_service: CommonService,
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct CommonService {
        enabled: bool,
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Logger {
        level: String,
    }

    #[test]
    fn test_no_overrides_decodes_document() {
        let boot: Boot = BootLoader::new()
            .unmarshal(BOOT, &OverrideSources::new())
            .unwrap();
        assert_eq!(boot.gin[0].port, 1949);
        assert!(boot.gin[0].common_service.enabled);
        assert_eq!(boot.logger.level, "info");
    }

    #[test]
    fn test_flags_win_over_environment() {
        let sources = OverrideSources::new()
            .with_env([("RK_LOGGER_LEVEL", "debug"), ("RK_GIN_0_PORT", "2008")])
            .with_flags(["logger.level=warn"]);

        let boot: Boot = BootLoader::new().unmarshal(BOOT, &sources).unwrap();

        assert_eq!(boot.logger.level, "warn");
        assert_eq!(boot.gin[0].port, 2008);
    }

    #[test]
    fn test_env_reaches_mixed_case_keys_by_default() {
        let sources =
            OverrideSources::new().with_env([("RK_GIN_0_COMMONSERVICE_ENABLED", "false")]);

        let loaded = BootLoader::new().load_tree(BOOT, &sources).unwrap();
        assert_eq!(loaded.env_report.replaced, 1);
        let enabled = loaded
            .tree
            .get("gin")
            .and_then(|g| g.get_index(0))
            .and_then(|e| e.get("commonservice"))
            .and_then(|c| c.get("enabled"));
        assert_eq!(enabled, Some(&Node::scalar("false")));

        let boot: Boot = loaded.decode().unwrap();
        assert!(!boot.gin[0].common_service.enabled);
        assert_eq!(boot.gin[0].name, "greeter");
    }

    #[test]
    fn test_preserving_case_hides_mixed_case_keys_from_env() {
        let sources =
            OverrideSources::new().with_env([("RK_GIN_0_COMMONSERVICE_ENABLED", "false")]);

        let loaded = BootLoader::new()
            .lowercase_keys(false)
            .load_tree(BOOT, &sources)
            .unwrap();
        assert_eq!(loaded.env_report.replaced, 0);

        let boot: Boot = loaded.decode().unwrap();
        assert!(boot.gin[0].common_service.enabled);
    }

    #[test]
    fn test_flag_can_target_mixed_case_keys() {
        let sources = OverrideSources::new().with_flags(["gin[0].commonService.enabled=false"]);
        let boot: Boot = BootLoader::new().unmarshal(BOOT, &sources).unwrap();
        assert!(!boot.gin[0].common_service.enabled);
    }

    #[test]
    fn test_flag_can_target_mixed_case_keys_with_case_preserved() {
        let sources = OverrideSources::new().with_flags(["gin[0].commonService.enabled=false"]);
        let boot: Boot = BootLoader::new()
            .lowercase_keys(false)
            .unmarshal(BOOT, &sources)
            .unwrap();
        assert!(!boot.gin[0].common_service.enabled);
    }

    #[test]
    fn test_fatal_message_is_reported_once() {
        let err = Error::document("root must be a mapping, found sequence");
        assert_eq!(
            fatal_message(&err),
            "error: Invalid boot document: root must be a mapping, found sequence"
        );
    }

    #[test]
    fn test_custom_prefix() {
        let sources = OverrideSources::new().with_env([
            ("RK_GIN_0_PORT", "1"),
            ("APP_GIN_0_PORT", "2"),
        ]);
        let loader = BootLoader::new().with_env_prefix("APP");
        assert_eq!(loader.env_prefix(), "APP");

        let boot: Boot = loader.unmarshal(BOOT, &sources).unwrap();
        assert_eq!(boot.gin[0].port, 2);
    }

    #[test]
    fn test_malformed_overrides_do_not_fail_the_load() {
        let sources = OverrideSources::new()
            .with_env([("RK_GIN__PORT", "1")])
            .with_flags(["gin[0.port=1,logger.level=debug"]);

        let loaded = BootLoader::new().load_tree(BOOT, &sources).unwrap();

        assert!(loaded.env.error().is_some());
        assert!(loaded.flags.error().is_some());
        let boot: Boot = loaded.decode().unwrap();
        assert_eq!(boot.logger.level, "debug");
        assert_eq!(boot.gin[0].port, 1949);
    }

    #[test]
    fn test_override_that_breaks_typing_fails_decode() {
        let sources = OverrideSources::new().with_flags(["gin[0].port=not-a-port"]);
        let err = BootLoader::new()
            .unmarshal::<Boot>(BOOT, &sources)
            .unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[test]
    fn test_invalid_document_fails() {
        let err = BootLoader::new()
            .unmarshal::<Boot>("gin: [", &OverrideSources::new())
            .unwrap_err();
        assert!(matches!(err, Error::Document { .. }));
    }

    #[test]
    fn test_collect_reports_both_sources() {
        let sources = OverrideSources::new()
            .with_env([("RK_A", "1")])
            .with_flags(["b=2", "c=3"]);
        let (env, flags) = BootLoader::new().collect(&sources);
        assert_eq!(env.assignments().len(), 1);
        assert_eq!(flags.assignments().len(), 2);
    }
}
