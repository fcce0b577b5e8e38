//! Configuration shared by tools built on fsport
//!
//! [`FsConfig`] is a `clap` argument group: a tool flattens it into its own
//! parser, calls [`FsConfig::validate`], and then hands the values to the
//! library calls that take them.

use crate::filesystem::DEFAULT_MAX_READ_SIZE;
use crate::path::{LinkResolver, DEFAULT_MAX_LINK_HOPS, NATIVE_SEPARATOR};
use anyhow::Result;

/// Path handling, read limits and log verbosity
///
/// Used by: `LinkResolver::new()`, `read_file_into_string()`, `init_logging()`
#[derive(clap::Args, Debug, Clone, PartialEq, Eq)]
#[command(next_help_heading = "Filesystem Options")]
pub struct FsConfig {
    /// Path separator used when splitting and joining paths
    #[arg(long, default_value_t = NATIVE_SEPARATOR)]
    pub separator: char,

    /// Maximum symbolic links followed while resolving one path
    #[arg(long, default_value_t = DEFAULT_MAX_LINK_HOPS)]
    pub max_link_hops: usize,

    /// Largest file, in bytes, that whole-file reads will load
    #[arg(long, default_value_t = DEFAULT_MAX_READ_SIZE)]
    pub max_read_size: u64,

    /// Verbose output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress all output except errors)
    #[arg(short, long)]
    pub quiet: bool,
}

impl Default for FsConfig {
    fn default() -> Self {
        Self {
            separator: NATIVE_SEPARATOR,
            max_link_hops: DEFAULT_MAX_LINK_HOPS,
            max_read_size: DEFAULT_MAX_READ_SIZE,
            verbose: 0,
            quiet: false,
        }
    }
}

impl FsConfig {
    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the separator could appear inside a path
    /// component, if either limit is zero, or if `--quiet` and `--verbose`
    /// are combined.
    pub fn validate(&self) -> Result<()> {
        if self.separator == '.' || self.separator.is_whitespace() {
            anyhow::bail!("Separator cannot be '.' or whitespace: {:?}", self.separator);
        }

        if self.separator.is_alphanumeric() {
            anyhow::bail!("Separator cannot be alphanumeric: {:?}", self.separator);
        }

        if self.max_link_hops == 0 {
            anyhow::bail!("Max link hops must be at least 1");
        }

        if self.max_read_size == 0 {
            anyhow::bail!("Max read size must be at least 1 byte");
        }

        if self.quiet && self.verbose > 0 {
            anyhow::bail!("Cannot use both --quiet and --verbose options");
        }

        Ok(())
    }

    /// Symbolic link resolver honoring this configuration
    #[must_use]
    pub const fn link_resolver(&self) -> LinkResolver {
        LinkResolver::new(self.separator, self.max_link_hops)
    }
}
