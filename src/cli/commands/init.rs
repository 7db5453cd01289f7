use crate::config::Config;

pub fn cmd_init() -> anyhow::Result<()> {
    if Config::create_default_if_missing()? {
        println!("Created cityscope.toml with default settings");
    } else {
        println!("cityscope.toml already exists, leaving it untouched");
    }
    Ok(())
}
