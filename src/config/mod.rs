//! Connection profile loading and validation.
//!
//! A profile is a small file naming the management server, organization,
//! and credentials. [`parse_profile_str`] picks a deserializer from the
//! file extension, [`load_profile`] reads and validates a file, and
//! [`ProfileOverrides`] layers command-line values on top.

pub mod model;
pub mod validation;

use std::path::Path;

use crate::error::EdgeError;
use model::Profile;

/// Parse a profile string based on file extension.
pub fn parse_profile_str(
    ext: &str,
    content: &str,
    path_display: &str,
) -> Result<Profile, EdgeError> {
    match ext {
        #[cfg(feature = "yaml")]
        "yaml" | "yml" => serde_yml::from_str(content).map_err(|e| EdgeError::ConfigParse {
            path: path_display.to_string(),
            source: Box::new(e),
        }),

        #[cfg(feature = "json")]
        "json" => serde_json::from_str(content).map_err(|e| EdgeError::ConfigParse {
            path: path_display.to_string(),
            source: Box::new(e),
        }),

        #[cfg(feature = "toml")]
        "toml" => toml::from_str(content).map_err(|e| EdgeError::ConfigParse {
            path: path_display.to_string(),
            source: Box::new(e),
        }),

        other => Err(EdgeError::UnsupportedFormat(other.to_string())),
    }
}

/// Read and parse a profile file. Validation is left to the caller so
/// overrides can fill gaps first.
pub async fn read_profile(path: &Path) -> Result<Profile, EdgeError> {
    let content = tokio::fs::read_to_string(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            EdgeError::ConfigFileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            EdgeError::Io(e)
        }
    })?;
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    parse_profile_str(ext, &content, &path.display().to_string())
}

/// Read, parse, and validate a profile file.
pub async fn load_profile(path: &Path) -> Result<Profile, EdgeError> {
    let profile = read_profile(path).await?;
    validation::validate(&profile).map_err(|errors| EdgeError::ConfigValidation { errors })?;
    Ok(profile)
}

/// Values supplied outside the profile file (flags, environment).
#[derive(Debug, Clone, Default)]
pub struct ProfileOverrides {
    pub mgmt_server: Option<String>,
    pub org: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub token: Option<String>,
    pub verbosity: Option<u8>,
    pub timeout: Option<u64>,
}

impl ProfileOverrides {
    pub fn apply(self, profile: &mut Profile) {
        if let Some(mgmt_server) = self.mgmt_server {
            profile.mgmt_server = mgmt_server;
        }
        if let Some(org) = self.org {
            profile.org = org;
        }
        if let Some(token) = self.token {
            profile.auth.token = Some(token);
            profile.auth.username = None;
            profile.auth.password = None;
        }
        if let Some(username) = self.username {
            profile.auth.username = Some(username);
            profile.auth.token = None;
        }
        if let Some(password) = self.password {
            profile.auth.password = Some(password);
        }
        if let Some(verbosity) = self.verbosity {
            profile.verbosity = verbosity;
        }
        if let Some(timeout) = self.timeout {
            profile.timeout = Some(timeout);
        }
    }
}

/// Build the effective profile: file (if any), then overrides, then validation.
pub async fn resolve_profile(
    path: Option<&Path>,
    overrides: ProfileOverrides,
) -> Result<Profile, EdgeError> {
    let mut profile = match path {
        Some(path) => read_profile(path).await?,
        None => {
            if overrides.org.is_none() {
                return Err(EdgeError::NoConfigSource {
                    hint: "Pass --profile <file>, or at least --org (EDGE_ORG) with credentials."
                        .into(),
                });
            }
            Profile::default()
        }
    };
    overrides.apply(&mut profile);
    validation::validate(&profile).map_err(|errors| EdgeError::ConfigValidation { errors })?;
    Ok(profile)
}
