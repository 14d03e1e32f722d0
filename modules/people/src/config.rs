use query_core::PageLimits;
use serde::{Deserialize, Serialize};

/// Configuration for the people module (`modules.people` in the app config).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct PeopleConfig {
    #[serde(default = "default_page_size")]
    pub default_page_size: u64,
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u64,
}

impl Default for PeopleConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

impl PeopleConfig {
    pub fn limits(&self) -> PageLimits {
        PageLimits {
            default: self.default_page_size,
            max: self.max_page_size,
        }
    }
}

impl From<PageLimits> for PeopleConfig {
    fn from(limits: PageLimits) -> Self {
        Self {
            default_page_size: limits.default,
            max_page_size: limits.max,
        }
    }
}

fn default_page_size() -> u64 {
    50
}

fn default_max_page_size() -> u64 {
    1000
}
