use std::any::Any;

use taskdeck_states::State;
use ustr::Ustr;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_base_url: String,
}

impl AppConfig {
    pub fn new(base_url: String) -> Self {
        Self {
            api_base_url: base_url,
        }
    }

    pub fn api_url(&self) -> Ustr {
        if self.api_base_url.is_empty() {
            Ustr::from("/api")
        } else {
            Ustr::from(&format!("{}/api", self.api_base_url))
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: if cfg!(target_arch = "wasm32") {
                "".to_string()
            } else if cfg!(feature = "env_test") {
                "https://taskdeck-test.lqxclqxc.com".to_string()
            } else if cfg!(feature = "env_pr") {
                "https://taskdeck-pr.lqxclqxc.com".to_string()
            } else if cfg!(feature = "env_nightly") {
                "https://taskdeck-nightly.lqxclqxc.com".to_string()
            } else {
                "https://taskdeck.lqxclqxc.com".to_string()
            },
        }
    }
}

impl State for AppConfig {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
