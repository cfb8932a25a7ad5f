//! Utility functions and helpers.

pub mod preflight;
pub mod settings;

pub use preflight::{check_agent_url, check_ai_credentials, AiCredentialInfo, AiProvider};
pub use settings::{get_env_flag, get_env_var, get_env_vars, Settings};
