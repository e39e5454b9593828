use anyhow::{Context, bail};
use regex::Regex;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// The four inputs of one billing period.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BillingFiles {
    pub bill: PathBuf,
    pub minutes: PathBuf,
    pub messages: PathBuf,
    pub megabytes: PathBuf,
}

struct FilePattern {
    label: &'static str,
    regex: Regex,
}

impl FilePattern {
    fn new(label: &'static str, extension: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            label,
            regex: file_name_regex(label, extension)?,
        })
    }
}

fn file_name_regex(term: &str, extension: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!(
        r"(?i)^[\w-]*{}[\w-]*\.{}$",
        regex::escape(term),
        regex::escape(extension)
    ))
}

/// Picks the bill and usage exports out of a billing directory.
///
/// Entries are visited in name order and the first match for each input wins.
pub fn discover_billing_files(dir: &Path) -> anyhow::Result<BillingFiles> {
    let patterns = [
        FilePattern::new("bill", "toml")?,
        FilePattern::new("minutes", "csv")?,
        FilePattern::new("messages", "csv")?,
        FilePattern::new("megabytes", "csv")?,
    ];

    let mut names = Vec::new();
    for entry in fs::read_dir(dir)
        .with_context(|| format!("failed to read billing directory {}", dir.display()))?
    {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            tracing::debug!(path = %entry.path().display(), "Skipping subdirectory");
            continue;
        }
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    names.sort();

    let mut found: [Option<PathBuf>; 4] = Default::default();
    for (slot, pattern) in found.iter_mut().zip(&patterns) {
        *slot = names
            .iter()
            .find(|name| pattern.regex.is_match(name))
            .map(|name| dir.join(name));
    }

    let [bill, minutes, messages, megabytes] = found;
    let missing: Vec<&str> = [&bill, &minutes, &messages, &megabytes]
        .iter()
        .zip(&patterns)
        .filter(|(path, _)| path.is_none())
        .map(|(_, pattern)| pattern.label)
        .collect();

    match (bill, minutes, messages, megabytes) {
        (Some(bill), Some(minutes), Some(messages), Some(megabytes)) => Ok(BillingFiles {
            bill,
            minutes,
            messages,
            megabytes,
        }),
        _ => bail!(
            "{} is missing required files: {}",
            dir.display(),
            missing.join(", ")
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    fn is_file_match(file_name: &str, term: &str, extension: &str) -> bool {
        file_name_regex(term, extension)
            .expect("valid pattern")
            .is_match(file_name)
    }

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), "").expect("write test file");
    }

    #[rstest]
    #[case::exact("bill.toml", "bill", "toml", true)]
    #[case::dated("20240115-messages.csv", "messages", "csv", true)]
    #[case::suffixed("messages-potatosalad.csv", "messages", "csv", true)]
    #[case::uppercase("MINUTES.CSV", "minutes", "csv", true)]
    #[case::wrong_extension("bill.csv", "bill", "toml", false)]
    #[case::spaces_are_not_word_chars("my bill.toml", "bill", "toml", false)]
    #[case::extension_must_end_name("bill.toml.bak", "bill", "toml", false)]
    fn matches_file_names(
        #[case] name: &str,
        #[case] term: &str,
        #[case] extension: &str,
        #[case] expected: bool,
    ) {
        assert_eq!(is_file_match(name, term, extension), expected);
    }

    #[test]
    fn discovers_first_match_per_input() {
        let dir = TempDir::new().expect("temp dir");
        for name in [
            "bill.toml",
            "2024-01-minutes.csv",
            "2024-02-minutes.csv",
            "messages.csv",
            "Megabytes-jan.csv",
            "notes.txt",
        ] {
            touch(dir.path(), name);
        }
        fs::create_dir(dir.path().join("minutes-archive.csv")).expect("create subdirectory");

        let files = discover_billing_files(dir.path()).expect("files should be found");

        assert_eq!(
            files,
            BillingFiles {
                bill: dir.path().join("bill.toml"),
                minutes: dir.path().join("2024-01-minutes.csv"),
                messages: dir.path().join("messages.csv"),
                megabytes: dir.path().join("Megabytes-jan.csv"),
            }
        );
    }

    #[test]
    fn names_every_missing_input() {
        let dir = TempDir::new().expect("temp dir");
        touch(dir.path(), "bill.toml");
        touch(dir.path(), "minutes.csv");

        let err = discover_billing_files(dir.path()).expect_err("messages and megabytes missing");

        assert!(err.to_string().ends_with("missing required files: messages, megabytes"));
    }

    #[test]
    fn reports_unreadable_directory() {
        let dir = TempDir::new().expect("temp dir");
        let missing = dir.path().join("absent");

        let err = discover_billing_files(&missing).expect_err("directory does not exist");

        assert!(err.to_string().starts_with("failed to read billing directory"));
    }
}
