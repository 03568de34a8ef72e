use std::path::PathBuf;

use clap::Parser;

/// Rewrite an HTML document as it streams through, driven by a TOML rule set.
#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// Rule set to apply
    #[arg(long, value_name = "FILE")]
    pub rules: PathBuf,

    /// Input document (default: stdin)
    #[arg(long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Output document (default: stdout)
    #[arg(long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Document encoding label; overrides the rule set's
    #[arg(long, value_name = "LABEL")]
    pub encoding: Option<String>,

    /// Bytes read from the input per write
    #[arg(long, value_name = "N", default_value_t = 64 * 1024, value_parser = clap::value_parser!(u64).range(1..))]
    pub chunk_size: u64,

    /// Abort when more than N bytes of unresolved markup are buffered
    #[arg(long, value_name = "N")]
    pub max_buffered_bytes: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flags() {
        let cli = Cli::try_parse_from([
            "sluice",
            "--rules",
            "r.toml",
            "--encoding",
            "windows-1252",
            "--chunk-size",
            "7",
        ])
        .expect("valid flags");
        assert_eq!(cli.rules, PathBuf::from("r.toml"));
        assert_eq!(cli.encoding.as_deref(), Some("windows-1252"));
        assert_eq!(cli.chunk_size, 7);
        assert_eq!(cli.input, None);
        assert_eq!(cli.max_buffered_bytes, None);
    }

    #[test]
    fn rejects_zero_chunk_size_and_missing_rules() {
        assert!(Cli::try_parse_from(["sluice", "--rules", "r.toml", "--chunk-size", "0"]).is_err());
        assert!(Cli::try_parse_from(["sluice"]).is_err());
    }
}
