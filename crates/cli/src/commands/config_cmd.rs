//! `windlass config` — Print the effective configuration.

use windlass_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let toml_str = toml::to_string_pretty(&config)?;

    println!("# {}", AppConfig::config_dir().join("config.toml").display());
    println!("{toml_str}");

    Ok(())
}

#[cfg(test)]
mod tests {
    use windlass_config::AppConfig;

    #[test]
    fn default_config_renders_as_toml() {
        let toml_str = AppConfig::default_toml();
        assert!(toml_str.contains("ceiling_tokens"));
        assert!(toml_str.contains("[window.ratios]"));
    }
}
