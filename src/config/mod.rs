mod paths;
mod settings;

pub use paths::{Paths, CONFIG_FILE_NAME};
pub use settings::{
    ApiConfig, CacheConfig, CacheLayout, Config, FetchConfig, MissingLanguages, OutputConfig,
    RenderConfig, SiteConfig, DEFAULT_ACCOUNT, DEFAULT_BASE_URL, SETTABLE_KEYS,
};
