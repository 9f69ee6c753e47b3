use worker::Env;

const DEFAULT_PUBLIC_ORIGIN: &str = "http://localhost:8787";
const DEFAULT_CONTROLLER_PATH: &str = "/controller.html";

/// Relay settings, read from worker vars with local-dev defaults
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayConfig {
    /// Fallback origin when the screen does not announce one
    pub public_origin: String,
    pub controller_path: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            public_origin: DEFAULT_PUBLIC_ORIGIN.to_string(),
            controller_path: DEFAULT_CONTROLLER_PATH.to_string(),
        }
    }
}

impl RelayConfig {
    pub fn from_env(env: &Env) -> Self {
        let defaults = Self::default();
        let var = |name: &str| {
            env.var(name)
                .ok()
                .map(|value| value.to_string())
                .filter(|value| !value.trim().is_empty())
        };
        Self {
            public_origin: var("PUBLIC_ORIGIN").unwrap_or(defaults.public_origin),
            controller_path: var("CONTROLLER_PATH").unwrap_or(defaults.controller_path),
        }
    }

    /// Address controllers open, built from the screen's origin if it sent one
    pub fn controller_url(&self, origin: Option<&str>) -> String {
        let origin = origin
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .unwrap_or(&self.public_origin);
        let origin = origin.trim_end_matches('/');
        if self.controller_path.starts_with('/') {
            format!("{origin}{}", self.controller_path)
        } else {
            format!("{origin}/{}", self.controller_path)
        }
    }
}
