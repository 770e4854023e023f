use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use publiciser::{FingerprintStrategy, PubliciseConfig, DEFAULT_SUFFIX};

/// publiciser - rewrite a .NET assembly so that every type and member is public
#[derive(Debug, Parser)]
#[command(name = "publiciser", version, about, long_about = None)]
pub struct Cli {
    /// The assembly to publicise.
    #[arg(long, value_name = "FILE")]
    pub target: PathBuf,

    /// Directory receiving the publicised assembly and the cache record.
    #[arg(long, value_name = "DIR")]
    pub output: PathBuf,

    /// Inserted between the assembly name and the `.dll` extension.
    #[arg(long, default_value = DEFAULT_SUFFIX)]
    pub suffix: String,

    /// How to detect whether the target changed since the last run.
    #[arg(long, value_enum, default_value_t = Fingerprint::Mtime)]
    pub fingerprint: Fingerprint,

    /// Rewrite even if the target is unchanged.
    #[arg(long)]
    pub force: bool,

    /// Report each step (info-level logging).
    #[arg(short, long)]
    pub logging: bool,

    /// Enable verbose (debug-level) logging output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit the outcome as JSON instead of human-readable text.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Fingerprint {
    /// Modification time of the target
    Mtime,
    /// SHA-1 of the target's content
    Sha1,
}

impl From<Fingerprint> for FingerprintStrategy {
    fn from(value: Fingerprint) -> Self {
        match value {
            Fingerprint::Mtime => FingerprintStrategy::ModifiedTime,
            Fingerprint::Sha1 => FingerprintStrategy::ContentSha1,
        }
    }
}

impl Cli {
    /// Map the arguments onto a task configuration.
    pub fn config(&self) -> PubliciseConfig {
        PubliciseConfig::new()
            .target_assembly_path(&self.target)
            .output_path(&self.output)
            .suffix(self.suffix.as_str())
            .fingerprint(self.fingerprint.into())
            .force(self.force)
    }

    pub fn log_level(&self) -> log::LevelFilter {
        if self.verbose {
            log::LevelFilter::Debug
        } else if self.logging {
            log::LevelFilter::Info
        } else {
            log::LevelFilter::Warn
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["publiciser", "--target", "bin/Foo.dll", "--output", "obj"])
            .unwrap();
        let config = cli.config();

        assert_eq!(config.target_assembly_path, Some(PathBuf::from("bin/Foo.dll")));
        assert_eq!(config.output_path, Some(PathBuf::from("obj")));
        assert_eq!(config.suffix, "_publicised");
        assert_eq!(config.fingerprint, FingerprintStrategy::ModifiedTime);
        assert!(!config.force);
        assert_eq!(cli.log_level(), log::LevelFilter::Warn);
    }

    #[test]
    fn all_options() {
        let cli = Cli::try_parse_from([
            "publiciser",
            "--target",
            "Foo.dll",
            "--output",
            "out",
            "--suffix",
            "_open",
            "--fingerprint",
            "sha1",
            "--force",
            "-l",
        ])
        .unwrap();
        let config = cli.config();

        assert_eq!(config.suffix, "_open");
        assert_eq!(config.fingerprint, FingerprintStrategy::ContentSha1);
        assert!(config.force);
        assert_eq!(cli.log_level(), log::LevelFilter::Info);

        let cli = Cli::try_parse_from(["publiciser", "--target", "a", "--output", "b", "-l", "-v"])
            .unwrap();
        assert_eq!(cli.log_level(), log::LevelFilter::Debug);
    }

    #[test]
    fn target_and_output_are_required() {
        assert!(Cli::try_parse_from(["publiciser", "--output", "obj"]).is_err());
        assert!(Cli::try_parse_from(["publiciser", "--target", "Foo.dll"]).is_err());
    }
}
