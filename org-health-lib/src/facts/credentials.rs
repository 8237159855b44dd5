use core::fmt::{Debug, Formatter};

/// Environment variables consulted for a GitHub token, in priority order.
pub const TOKEN_ENV_VARS: [&str; 2] = ["GITHUB_TOKEN", "GITHUB_PAT"];

/// Credentials used to authenticate against the GitHub API.
///
/// Resolved once by the front end and handed to the [`Fetcher`](super::Fetcher).
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    token: Option<String>,
}

impl Credentials {
    #[must_use]
    pub fn new(token: Option<String>) -> Self {
        Self {
            token: token.filter(|t| !t.trim().is_empty()),
        }
    }

    /// Resolve a token: the explicit value first, then each of [`TOKEN_ENV_VARS`].
    ///
    /// Blank values are skipped.
    #[must_use]
    pub fn resolve(explicit: Option<&str>, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let token = explicit
            .map(str::to_string)
            .into_iter()
            .chain(TOKEN_ENV_VARS.iter().filter_map(|name| lookup(name)))
            .find(|t| !t.trim().is_empty());

        Self::new(token)
    }

    /// Resolve a token from the process environment.
    #[must_use]
    pub fn from_env(explicit: Option<&str>) -> Self {
        Self::resolve(explicit, |name| std::env::var(name).ok())
    }

    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }
}

impl Debug for Credentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
