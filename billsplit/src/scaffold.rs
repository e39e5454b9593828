use anyhow::{Context, bail};
use billsplit_infrastructure::bill_template;
use std::{
    fs,
    path::{Path, PathBuf},
};

pub const DEFAULT_BILLING_DIR: &str = "new-billing-period";
pub const BILL_FILE_NAME: &str = "bill.toml";

/// Creates a billing directory holding a starter `bill.toml`.
///
/// Returns the path of the written bill file.
pub fn create_billing_dir(dir: &Path) -> anyhow::Result<PathBuf> {
    if dir.exists() {
        bail!("directory {} already exists", dir.display());
    }

    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create billing directory {}", dir.display()))?;

    let bill_path = dir.join(BILL_FILE_NAME);
    let template = bill_template().context("failed to encode bill template")?;
    fs::write(&bill_path, template)
        .with_context(|| format!("failed to write {}", bill_path.display()))?;

    tracing::info!(path = %bill_path.display(), "Created billing directory");
    Ok(bill_path)
}
