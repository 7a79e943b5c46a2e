use crate::cli::args::CliArgs;
use crate::config::{self, ConfigError};

pub fn validate(args: &CliArgs) -> Result<(), ConfigError> {
    if let Some(timeout) = args.timeout {
        config::check_timeout(timeout)?;
    }
    if let Some(raw) = args.view.as_deref() {
        config::parse_view(raw)?;
    }
    if let Some(raw) = args.api_url.as_deref() {
        config::parse_api_url(raw)?;
    }
    Ok(())
}
