//! Configuration for data fetchers.
//!
//! A [`FetcherConfig`] is an explicit value handed to the [`DataFetcher`](crate::DataFetcher)
//! constructor. Nothing in the crate reads global options.

use crate::error::{ArgoError, Result};
use std::{
    path::{Path, PathBuf},
    str::FromStr,
};
use strum_macros::{Display, EnumIter, EnumString};
use tracing::warn;

/// Default ERDDAP server.
pub const DEFAULT_ERDDAP_SERVER: &str = "https://www.ifremer.fr/erddap";

/// Where the data comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, EnumString, Display)]
#[strum(serialize_all = "lowercase")]
pub enum DataSource {
    /// An ERDDAP server
    Erddap,
    /// A local copy of the GDAC FTP archive
    #[strum(serialize = "localftp")]
    LocalFtp,
}

/// Which Argo dataset to query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, EnumString, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Dataset {
    /// Core physical variables: pressure, temperature, salinity
    Phy,
    /// Biogeochemical variables
    Bgc,
    /// Reference dataset used in delayed mode quality control
    Ref,
}

/// How much of the raw data a user sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, EnumString, Display)]
#[strum(serialize_all = "lowercase")]
pub enum UserMode {
    /// Only good data with QC variables removed
    Standard,
    /// Everything as returned by the source
    Expert,
}

/// Configuration for a data fetcher.
#[derive(Debug, Clone, PartialEq)]
pub struct FetcherConfig {
    /// Backend to query.
    pub source: DataSource,

    /// Dataset to query.
    pub dataset: Dataset,

    /// Validation strictness of the post processing.
    pub mode: UserMode,

    /// Whether responses may be kept on disk.
    pub cache_enabled: bool,

    /// Directory for cached responses.
    pub cache_dir: PathBuf,

    /// Root of the local FTP archive, required for `DataSource::LocalFtp`.
    pub local_ftp: Option<PathBuf>,

    /// Root url of the ERDDAP server.
    pub erddap_server: String,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            source: DataSource::Erddap,
            dataset: Dataset::Phy,
            mode: UserMode::Standard,
            cache_enabled: false,
            cache_dir: default_cache_dir(),
            local_ftp: None,
            erddap_server: DEFAULT_ERDDAP_SERVER.to_string(),
        }
    }
}

impl FetcherConfig {
    /// Load configuration from environment variables, keeping the default for any variable that
    /// is unset or cannot be parsed.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(val) = env_parse("ARGO_SRC") {
            config.source = val;
        }

        if let Some(val) = env_parse("ARGO_DATASET") {
            config.dataset = val;
        }

        if let Some(val) = env_parse("ARGO_MODE") {
            config.mode = val;
        }

        if let Ok(val) = std::env::var("ARGO_CACHE") {
            config.cache_enabled = val.to_lowercase() == "true" || val == "1";
        }

        if let Ok(val) = std::env::var("ARGO_CACHE_DIR") {
            config.cache_dir = PathBuf::from(val);
        }

        if let Ok(val) = std::env::var("ARGO_LOCAL_FTP") {
            config.local_ftp = Some(PathBuf::from(val));
        }

        if let Ok(val) = std::env::var("ARGO_ERDDAP") {
            config.erddap_server = val;
        }

        config
    }

    /// Builder method for the data source.
    #[inline]
    pub fn with_source(mut self, source: DataSource) -> Self {
        self.source = source;
        self
    }

    /// Builder method for the dataset.
    #[inline]
    pub fn with_dataset(mut self, dataset: Dataset) -> Self {
        self.dataset = dataset;
        self
    }

    /// Builder method for the user mode.
    #[inline]
    pub fn with_mode(mut self, mode: UserMode) -> Self {
        self.mode = mode;
        self
    }

    /// Builder method to turn on caching in `cache_dir`.
    #[inline]
    pub fn with_cache<P: Into<PathBuf>>(mut self, cache_dir: P) -> Self {
        self.cache_enabled = true;
        self.cache_dir = cache_dir.into();
        self
    }

    /// Builder method for the local FTP archive root.
    #[inline]
    pub fn with_local_ftp<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.local_ftp = Some(path.into());
        self
    }

    /// Builder method for the ERDDAP server.
    #[inline]
    pub fn with_erddap_server<S: Into<String>>(mut self, server: S) -> Self {
        self.erddap_server = server.into();
        self
    }

    /// Validate the configuration.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use argo_profiles::{DataSource, FetcherConfig};
    ///
    /// assert!(FetcherConfig::default().validate().is_ok());
    ///
    /// let cfg = FetcherConfig::default().with_source(DataSource::LocalFtp);
    /// assert!(cfg.validate().is_err());
    ///
    /// let cfg = cfg.with_local_ftp("/data/gdac");
    /// assert!(cfg.validate().is_ok());
    /// ```
    pub fn validate(&self) -> Result<()> {
        if self.source == DataSource::LocalFtp && self.local_ftp.is_none() {
            return Err(ArgoError::InvalidOption {
                option: "local_ftp",
                value: String::new(),
            });
        }

        if url::Url::parse(&self.erddap_server).is_err() {
            return Err(ArgoError::InvalidOption {
                option: "erddap_server",
                value: self.erddap_server.clone(),
            });
        }

        if self.dataset == Dataset::Bgc && self.mode == UserMode::Standard {
            warn!(
                "'bgc' dataset fetching in 'standard' user mode is not reliable, \
                 switch to 'expert' mode if you encounter errors"
            );
        }

        Ok(())
    }

    /// File a response for `key` would be cached in.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use argo_profiles::FetcherConfig;
    ///
    /// let cfg = FetcherConfig::default().with_cache("/tmp/argo");
    /// let path = cfg.cache_path("https://example.org/erddap/tabledap/ArgoFloats.csv");
    ///
    /// assert!(path.starts_with("/tmp/argo"));
    /// assert_eq!(path.extension().unwrap(), "csv");
    /// ```
    pub fn cache_path(&self, key: &str) -> PathBuf {
        self.cache_dir
            .join(format!("{:08x}.csv", crc32c::crc32c(key.as_bytes())))
    }

    /// True if caching is on and a response for `key` is already on disk.
    pub fn is_cached(&self, key: &str) -> bool {
        self.cache_enabled && self.cache_path(key).exists()
    }

    /// Root of the local FTP archive, if one is configured.
    #[inline]
    pub fn local_ftp(&self) -> Option<&Path> {
        self.local_ftp.as_deref()
    }
}

fn env_parse<T: FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|val| val.parse().ok())
}

fn default_cache_dir() -> PathBuf {
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(".cache").join("argo-profiles"),
        None => PathBuf::from(".argo-cache"),
    }
}
