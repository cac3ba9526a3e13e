// ABOUTME: Config scaffolding for repositories adopting preview-wait.
// ABOUTME: Writes a commented preview-wait.yml template.

use std::path::Path;

use crate::error::{Error, Result};

use super::CONFIG_FILENAME;

const TEMPLATE: &str = r#"# preview-wait configuration. Command-line flags and INPUT_* variables win.
token:
  env: GITHUB_TOKEN
max_timeout: 60
check_interval: 2
allow_inactive: false
path: /
actor: "vercel[bot]"
# environment: Preview
# vercel_password:
#   env: VERCEL_PASSWORD
# protection_bypass_header:
#   env: VERCEL_AUTOMATION_BYPASS_SECRET
"#;

pub fn init_config(dir: &Path, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() && !force {
        return Err(Error::AlreadyExists(config_path));
    }

    std::fs::write(&config_path, TEMPLATE)?;
    Ok(())
}
