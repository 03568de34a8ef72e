//! Rewrite fixtures: a rule set, an input document and the expected output.
//!
//! ```toml
//! format = "sluice-rewrite-cases-v1"
//!
//! [[case]]
//! id = "upgrade-links"
//! rules = '''
//! [[rule]]
//! selector = "a[href]"
//! action = "replace_in_attribute"
//! attribute = "href"
//! from = "http:"
//! to = "https:"
//! '''
//! input = '<a href="http://x">x</a>'
//! expected = '<a href="https://x">x</a>'
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;

pub const REWRITE_CASES_FORMAT_V1: &str = "sluice-rewrite-cases-v1";

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct RewriteCase {
    pub id: String,
    /// Rule set in its TOML form.
    pub rules: String,
    pub input: String,
    pub expected: String,
    /// Document encoding label; UTF-8 when absent.
    #[serde(default)]
    pub encoding: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CaseFile {
    format: String,
    #[serde(rename = "case", default)]
    cases: Vec<RewriteCase>,
}

pub fn parse_cases(content: &str) -> Result<Vec<RewriteCase>, String> {
    let file: CaseFile = toml::from_str(content).map_err(|err| err.to_string())?;
    if file.format != REWRITE_CASES_FORMAT_V1 {
        return Err(format!("unsupported case file format '{}'", file.format));
    }
    let mut ids: Vec<&str> = file.cases.iter().map(|case| case.id.as_str()).collect();
    ids.sort_unstable();
    if let Some(pair) = ids.windows(2).find(|pair| pair[0] == pair[1]) {
        return Err(format!("duplicate case id '{}'", pair[0]));
    }
    Ok(file.cases)
}

/// Load every case of a fixture file. Panics with the path on any error.
pub fn load_cases(path: &Path) -> Vec<RewriteCase> {
    let content = fs::read_to_string(path)
        .unwrap_or_else(|err| panic!("failed to read fixture {path:?}: {err}"));
    parse_cases(&content).unwrap_or_else(|err| panic!("invalid fixture {path:?}: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_cases_and_rejects_duplicates() {
        let ok = r#"
format = "sluice-rewrite-cases-v1"

[[case]]
id = "one"
rules = ""
input = "<p>"
expected = "<p>"
encoding = "windows-1252"
"#;
        let cases = parse_cases(ok).expect("valid fixture");
        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].encoding.as_deref(), Some("windows-1252"));

        let duplicate = format!("{ok}\n[[case]]\nid = \"one\"\nrules = \"\"\ninput = \"\"\nexpected = \"\"\n");
        assert_eq!(
            parse_cases(&duplicate),
            Err("duplicate case id 'one'".to_string())
        );
        assert!(parse_cases("format = \"v0\"").is_err());
    }
}
