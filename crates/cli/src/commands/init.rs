//! `tavernkit init` — Write a default config file.

use tavernkit_config::AppConfig;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config_dir = AppConfig::config_dir();
    let config_path = config_dir.join("config.toml");

    if config_path.exists() {
        println!("  Config already exists: {}", config_path.display());
        return Ok(());
    }

    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)?;
        println!("✅ Created config directory: {}", config_dir.display());
    }

    std::fs::write(&config_path, AppConfig::default_toml())?;
    println!("✅ Wrote default config: {}", config_path.display());
    println!("\nSet an API key via TAVERNKIT_API_KEY or edit the config file.");
    Ok(())
}
