use std::path::PathBuf;

#[derive(Clone)]
pub struct AppConfig {
    pub pim_api_url: String,
    pub pim_api_token: String,
    pub log_level: String,
    pub selection_path: PathBuf,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub max_concurrent_fetches: usize,
    pub option_page_limit: usize,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("pim_api_url", &self.pim_api_url)
            .field("pim_api_token", &"[redacted]")
            .field("log_level", &self.log_level)
            .field("selection_path", &self.selection_path)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("max_concurrent_fetches", &self.max_concurrent_fetches)
            .field("option_page_limit", &self.option_page_limit)
            .finish()
    }
}
