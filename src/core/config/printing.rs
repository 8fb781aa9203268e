use crate::core::config::data::{Config, ConfigKey};

impl Config {
    pub fn print_all(&self) {
        println!("Current configuration:");
        for key in ConfigKey::ALL {
            match self.display_value(*key) {
                Some(value) => println!("  {key}: {value}"),
                None => println!("  {key}: (unset)"),
            }
        }
    }
}
