//! Profile validation with detailed error reporting.
//!
//! The [`validate`] function checks a parsed [`Profile`] for a missing
//! organization, a malformed management server URL, and inconsistent
//! authentication settings. Returns every [`ValidationError`] found, each
//! with an optional suggestion.

use url::Url;

use super::model::Profile;
use crate::error::ValidationError;

/// Validate a management server URL. Returns `Ok(())` or a human-readable error.
pub fn validate_mgmt_server(url: &str) -> Result<(), String> {
    match Url::parse(url) {
        Ok(parsed) => {
            let scheme = parsed.scheme();
            if scheme != "http" && scheme != "https" {
                Err(format!(
                    "unsupported scheme '{scheme}' (expected http or https)"
                ))
            } else if parsed.cannot_be_a_base() {
                Err(format!("'{url}' cannot be used as a base URL"))
            } else {
                Ok(())
            }
        }
        Err(_) => Err(format!("'{url}' is not a valid URL")),
    }
}

pub fn validate(profile: &Profile) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if profile.org.trim().is_empty() {
        errors.push(ValidationError {
            field: "org".into(),
            message: "organization is required".into(),
            suggestion: Some("set `org` in the profile, --org, or EDGE_ORG".into()),
        });
    }

    if let Err(message) = validate_mgmt_server(&profile.mgmt_server) {
        let suggestion = if profile.mgmt_server.contains("://") {
            None
        } else {
            Some(format!("did you mean 'https://{}'?", profile.mgmt_server))
        };
        errors.push(ValidationError {
            field: "mgmt_server".into(),
            message,
            suggestion,
        });
    }

    let auth = &profile.auth;
    match (&auth.username, &auth.password) {
        (Some(u), Some(p)) => {
            if u.is_empty() {
                errors.push(ValidationError {
                    field: "auth.username".into(),
                    message: "username cannot be empty".into(),
                    suggestion: None,
                });
            }
            if p.is_empty() {
                errors.push(ValidationError {
                    field: "auth.password".into(),
                    message: "password cannot be empty".into(),
                    suggestion: None,
                });
            }
        }
        (Some(_), None) => {
            errors.push(ValidationError {
                field: "auth.password".into(),
                message: "password is required when username is set".into(),
                suggestion: Some("set --password or EDGE_PASSWORD".into()),
            });
        }
        (None, Some(_)) => {
            errors.push(ValidationError {
                field: "auth.username".into(),
                message: "username is required when password is set".into(),
                suggestion: Some("set --username or EDGE_USERNAME".into()),
            });
        }
        (None, None) => {}
    }

    if let Some(token) = &auth.token {
        if token.trim().is_empty() {
            errors.push(ValidationError {
                field: "auth.token".into(),
                message: "token cannot be empty".into(),
                suggestion: None,
            });
        }
        if auth.username.is_some() {
            errors.push(ValidationError {
                field: "auth.token".into(),
                message: "token and username are mutually exclusive".into(),
                suggestion: Some("remove either the token or the username/password".into()),
            });
        }
    }

    if profile.timeout == Some(0) {
        errors.push(ValidationError {
            field: "timeout".into(),
            message: "timeout must be greater than zero".into(),
            suggestion: Some("omit `timeout` to wait indefinitely".into()),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// One-line summary printed by `edgemgmt validate`.
#[must_use]
pub fn format_validation_report(path: &str, profile: &Profile) -> String {
    let auth = if profile.auth.token.is_some() {
        "bearer token"
    } else if profile.auth.username.is_some() {
        "basic"
    } else {
        "none"
    };
    format!(
        "{path} is valid (org {}, {}, auth: {auth})",
        profile.org, profile.mgmt_server
    )
}
