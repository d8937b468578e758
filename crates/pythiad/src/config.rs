//! Command-line options and the daemon's cache layout.

use std::path::PathBuf;
use std::str::FromStr;
use std::{env, fmt, fs, io};

use clap::Parser;
use thiserror::Error;

/// How the funcargs operation renders a call snippet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamsMode {
    /// Render every parameter, defaulted ones as `name=value`.
    All,
    /// Render only parameters without a default.
    Required,
    /// Render nothing and skip the engine query.
    Disabled,
}

impl ParamsMode {
    /// Returns the mode's command-line spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Required => "required",
            Self::Disabled => "",
        }
    }
}

impl fmt::Display for ParamsMode {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for ParamsMode {
    type Err = ParamsModeParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "all" => Ok(Self::All),
            "required" => Ok(Self::Required),
            "" => Ok(Self::Disabled),
            other => Err(ParamsModeParseError::new(other)),
        }
    }
}

/// Raised when a parameter completion mode is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported parameter completion mode: {0}")]
pub struct ParamsModeParseError(String);

impl ParamsModeParseError {
    /// Creates an error preserving the rejected value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the rejected value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.0
    }
}

/// Options accepted by the daemon at startup.
#[derive(Debug, Parser)]
#[command(
    name = "pythiad",
    about = "Python source analysis daemon speaking JSON lines over stdio",
    version
)]
pub struct DaemonOptions {
    /// Project name namespacing the engine's cache directory.
    #[arg(short = 'p', long = "project", value_name = "NAME", default_value = "")]
    project: String,

    /// Extra directory prepended to the engine's module search path.
    #[arg(short = 'e', long = "extra_folder", value_name = "DIR")]
    extra_folders: Vec<PathBuf>,

    /// Parameter completion mode: "all", "required", or "" to disable.
    #[arg(
        short = 'f',
        long = "complete_function_params",
        value_name = "MODE",
        default_value = "all"
    )]
    function_params: ParamsMode,
}

impl DaemonOptions {
    /// Returns the project name, empty when none was given.
    #[must_use]
    pub const fn project(&self) -> &str {
        self.project.as_str()
    }

    /// Returns the extra search-path directories in flag order.
    #[must_use]
    pub fn extra_folders(&self) -> &[PathBuf] {
        &self.extra_folders
    }

    /// Returns the parameter completion mode.
    #[must_use]
    pub const fn function_params(&self) -> ParamsMode {
        self.function_params
    }

    /// Returns the cache directory for this daemon instance.
    ///
    /// The directory lives under the platform cache root, falling back to
    /// the system temporary directory, and is namespaced by project name
    /// when one was given.
    #[must_use]
    pub fn cache_directory(&self) -> PathBuf {
        let mut path = dirs::cache_dir().unwrap_or_else(env::temp_dir);
        path.push("pythia");
        if !self.project.is_empty() {
            path.push(&self.project);
        }
        path
    }

    /// Creates the cache directory and returns its path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::CreateCacheDirectory`] when the directory
    /// cannot be created.
    pub fn prepare_cache_directory(&self) -> Result<PathBuf, ConfigError> {
        let path = self.cache_directory();
        fs::create_dir_all(&path).map_err(|source| ConfigError::CreateCacheDirectory {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }
}

/// Failures preparing the daemon's configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The cache directory could not be created.
    #[error("failed to create cache directory {}: {source}", path.display())]
    CreateCacheDirectory {
        /// Directory that could not be created.
        path: PathBuf,
        /// Underlying filesystem failure.
        #[source]
        source: io::Error,
    },
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use clap::Parser;
    use rstest::rstest;

    use super::{DaemonOptions, ParamsMode};

    #[rstest]
    #[case::all("all", ParamsMode::All)]
    #[case::required("required", ParamsMode::Required)]
    #[case::disabled("", ParamsMode::Disabled)]
    fn modes_parse_from_their_spellings(#[case] spelling: &str, #[case] expected: ParamsMode) {
        let mode: ParamsMode = spelling.parse().expect("mode should parse");
        assert_eq!(mode, expected);
        assert_eq!(mode.as_str(), spelling);
    }

    #[test]
    fn unknown_modes_are_rejected_with_the_value() {
        let error = "some".parse::<ParamsMode>().expect_err("mode should not parse");
        assert_eq!(error.value(), "some");
        assert_eq!(
            error.to_string(),
            "unsupported parameter completion mode: some"
        );
    }

    #[test]
    fn options_default_to_an_unnamed_project_completing_everything() {
        let options = DaemonOptions::try_parse_from(["pythiad"]).expect("options should parse");

        assert_eq!(options.project(), "");
        assert!(options.extra_folders().is_empty());
        assert_eq!(options.function_params(), ParamsMode::All);
    }

    #[test]
    fn flags_accept_short_and_long_spellings() {
        let options = DaemonOptions::try_parse_from([
            "pythiad",
            "-p",
            "sample",
            "-e",
            "/srv/lib",
            "--extra_folder",
            "/srv/vendor",
            "--complete_function_params",
            "required",
        ])
        .expect("options should parse");

        assert_eq!(options.project(), "sample");
        assert_eq!(
            options.extra_folders(),
            [PathBuf::from("/srv/lib"), PathBuf::from("/srv/vendor")]
        );
        assert_eq!(options.function_params(), ParamsMode::Required);
    }

    #[test]
    fn an_empty_mode_flag_disables_parameter_completion() {
        let options = DaemonOptions::try_parse_from(["pythiad", "-f", ""])
            .expect("options should parse");
        assert_eq!(options.function_params(), ParamsMode::Disabled);
    }

    #[test]
    fn unknown_mode_flags_fail_to_parse() {
        DaemonOptions::try_parse_from(["pythiad", "-f", "some"])
            .expect_err("options should not parse");
    }

    #[test]
    fn cache_directories_are_namespaced_by_project() {
        let unnamed = DaemonOptions::try_parse_from(["pythiad"]).expect("options should parse");
        assert!(unnamed.cache_directory().ends_with("pythia"));

        let named = DaemonOptions::try_parse_from(["pythiad", "-p", "sample"])
            .expect("options should parse");
        assert!(named.cache_directory().ends_with(Path::new("pythia").join("sample")));
    }
}
