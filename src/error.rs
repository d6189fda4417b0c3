use thiserror::Error;

/// Errors that can occur while extracting a recipe from a URL.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// Request body carried no URL
    #[error("URL is required")]
    MissingUrl,

    /// Target page took longer than the fetch timeout
    #[error("Timed out fetching URL")]
    FetchTimeout,

    /// Network failure reaching the target page
    #[error("Failed to fetch URL: {0}")]
    Fetch(reqwest::Error),

    /// Target responded with a non-2xx status
    #[error("Page returned status {0}")]
    FetchStatus(u16),

    /// All extraction strategies failed
    #[error("No extraction strategy matched this page")]
    NoRecipeFound,

    /// Error parsing HTTP headers
    #[error("Header parse error: {0}")]
    Header(#[from] reqwest::header::InvalidHeaderValue),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl From<reqwest::Error> for ExtractError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ExtractError::FetchTimeout
        } else {
            ExtractError::Fetch(err)
        }
    }
}

impl ExtractError {
    /// The message placed in the response body's `error` field.
    pub fn user_message(&self) -> String {
        match self {
            ExtractError::MissingUrl => "URL is required".to_string(),
            ExtractError::FetchTimeout => {
                "The page took too long to load. Please try again.".to_string()
            }
            ExtractError::Fetch(err) => format!("Failed to fetch the page: {err}"),
            ExtractError::FetchStatus(status) => {
                format!("Failed to fetch the page (status {status}).")
            }
            ExtractError::NoRecipeFound => {
                "No recipe found on this page. Please try a different URL.".to_string()
            }
            ExtractError::Header(err) => format!("Internal error: {err}"),
            ExtractError::Config(err) => format!("Configuration error: {err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_url_message() {
        assert_eq!(ExtractError::MissingUrl.user_message(), "URL is required");
    }

    #[test]
    fn test_status_code_embedded_in_message() {
        let msg = ExtractError::FetchStatus(404).user_message();
        assert!(msg.contains("404"));
    }

    #[test]
    fn test_no_recipe_message_suggests_another_url() {
        let msg = ExtractError::NoRecipeFound.user_message();
        assert!(msg.starts_with("No recipe found on this page."));
    }
}
