//! Author information from the CI environment
//!
//! Posts usually arrive through pull requests, so when a post does not name
//! its author the pull-request submitter is used instead.

use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Path to the JSON payload of the triggering event
pub const EVENT_PATH_VAR: &str = "GITHUB_EVENT_PATH";

/// Login of the user that triggered the run
pub const ACTOR_VAR: &str = "GITHUB_ACTOR";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CiAuthor {
    pub name: String,
    /// May be empty when the payload carries no avatar
    pub avatar: String,
}

/// CI-provided author, resolved once and handed to the post parser
#[derive(Debug, Clone, Default)]
pub struct CiContext {
    author: Option<CiAuthor>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct EventPayload {
    pull_request: Option<PullRequest>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PullRequest {
    user: Option<User>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct User {
    login: String,
    avatar_url: String,
}

impl CiContext {
    /// Resolve from `GITHUB_EVENT_PATH` and `GITHUB_ACTOR`
    pub fn from_env() -> Self {
        let event_path = env::var_os(EVENT_PATH_VAR)
            .filter(|p| !p.is_empty())
            .map(PathBuf::from);
        let actor = env::var(ACTOR_VAR).ok();
        Self::from_sources(event_path.as_deref(), actor.as_deref())
    }

    /// Resolve from an event payload file, then an actor login
    ///
    /// The pull-request submitter wins; the actor is used otherwise, with an
    /// avatar URL derived from the login.
    pub fn from_sources(event_path: Option<&Path>, actor: Option<&str>) -> Self {
        if let Some(author) = event_path.and_then(pull_request_author) {
            return Self::with_author(author.name, author.avatar);
        }

        match actor.map(str::trim).filter(|a| !a.is_empty()) {
            Some(actor) => Self::with_author(actor, format!("https://github.com/{}.png", actor)),
            None => Self::default(),
        }
    }

    pub fn with_author(name: impl Into<String>, avatar: impl Into<String>) -> Self {
        Self {
            author: Some(CiAuthor {
                name: name.into(),
                avatar: avatar.into(),
            }),
        }
    }

    pub fn author(&self) -> Option<&CiAuthor> {
        self.author.as_ref()
    }
}

fn pull_request_author(path: &Path) -> Option<CiAuthor> {
    let data = fs::read_to_string(path)
        .map_err(|e| tracing::debug!("Cannot read CI event payload {:?}: {}", path, e))
        .ok()?;
    let payload: EventPayload = serde_json::from_str(&data)
        .map_err(|e| tracing::debug!("Cannot parse CI event payload {:?}: {}", path, e))
        .ok()?;
    let user = payload.pull_request?.user?;
    if user.login.is_empty() {
        return None;
    }
    Some(CiAuthor {
        name: user.login,
        avatar: user.avatar_url,
    })
}
