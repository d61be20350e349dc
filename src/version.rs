//! Version and build information.
//!
//! Provides version, git commit, and build metadata.

use std::fmt;

/// Build information
#[derive(Debug, Clone)]
pub struct BuildInfo {
    pub version: &'static str,
    pub commit: Option<&'static str>,
    pub build_date: Option<&'static str>,
    pub target: Option<&'static str>,
    pub rustc_version: Option<&'static str>,
    pub features: Vec<&'static str>,
}

impl fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "netverify {}", self.version)?;

        if let Some(commit) = self.commit {
            writeln!(f, "Commit: {}", commit)?;
        }

        if let Some(date) = self.build_date {
            writeln!(f, "Built: {}", date)?;
        }

        writeln!(f, "Target: {}", self.target.unwrap_or(std::env::consts::ARCH))?;

        if !self.features.is_empty() {
            writeln!(f, "Features: {}", self.features.join(", "))?;
        }

        if let Some(rustc) = self.rustc_version {
            write!(f, "Rustc: {}", rustc)?;
        }

        Ok(())
    }
}

/// Get build information
pub fn get_build_info() -> BuildInfo {
    let mut features = Vec::new();
    if cfg!(feature = "json") {
        features.push("json");
    }
    if cfg!(feature = "junit") {
        features.push("junit");
    }

    BuildInfo {
        version: env!("CARGO_PKG_VERSION"),
        commit: option_env!("NETVERIFY_GIT_HASH"),
        build_date: option_env!("NETVERIFY_BUILD_DATE"),
        target: option_env!("NETVERIFY_TARGET"),
        rustc_version: option_env!("NETVERIFY_RUSTC_VERSION"),
        features,
    }
}
