use crate::error::{KakeiboError, Result};
use crate::settings::{load_settings, save_settings, shellexpand_path};

/// Point the settings at an existing data dir. The current settings are only
/// replaced once the new dir is known to hold a database.
pub fn run(path: &str) -> Result<()> {
    let mut settings = load_settings();
    let previous = std::mem::replace(&mut settings.data_dir, shellexpand_path(path));

    let db_path = settings.db_path();
    if !db_path.exists() {
        return Err(KakeiboError::Settings(format!(
            "No database found at {}\nRun `kakeibo init --data-dir {}` to create one.",
            db_path.display(),
            settings.data_dir
        )));
    }

    save_settings(&settings)?;
    if previous != settings.data_dir {
        println!("Switched to {} (was {previous})", settings.data_dir);
    } else {
        println!("Already using {}", settings.data_dir);
    }
    Ok(())
}
