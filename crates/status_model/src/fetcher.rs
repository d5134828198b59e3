//! Deferred player-count access for the decision core.

/// Lazy capability handed to the decision core alongside each ping.
///
/// The core consults the fetcher only when it needs the host's live player
/// counts as a fallback (its own configured counts take priority), so the
/// accessors must stay cheap to *not* call. The variant is selected once at
/// construction: pings without a players section get [`NoPlayers`], pings
/// with one get [`Live`] closures reading the current values on demand.
///
/// Both accessors are idempotent and side-effect-free.
///
/// [`NoPlayers`]: ResponseFetcher::NoPlayers
/// [`Live`]: ResponseFetcher::Live
pub enum ResponseFetcher {
    /// The outbound ping carries no players section; both accessors
    /// return `None`.
    NoPlayers,
    /// The outbound ping carries a players section; each accessor reads the
    /// live value through its closure.
    Live {
        online: Box<dyn Fn() -> i32 + Send + Sync>,
        max: Box<dyn Fn() -> i32 + Send + Sync>,
    },
}

impl ResponseFetcher {
    /// Fetcher for pings without a players section.
    pub fn no_players() -> Self {
        Self::NoPlayers
    }

    /// Fetcher reading live counts on demand.
    pub fn live<O, M>(online: O, max: M) -> Self
    where
        O: Fn() -> i32 + Send + Sync + 'static,
        M: Fn() -> i32 + Send + Sync + 'static,
    {
        Self::Live {
            online: Box::new(online),
            max: Box::new(max),
        }
    }

    /// Current online player count, if the ping has a players section.
    pub fn players_online(&self) -> Option<i32> {
        match self {
            Self::NoPlayers => None,
            Self::Live { online, .. } => Some(online()),
        }
    }

    /// Maximum player count, if the ping has a players section.
    pub fn max_players(&self) -> Option<i32> {
        match self {
            Self::NoPlayers => None,
            Self::Live { max, .. } => Some(max()),
        }
    }
}

impl std::fmt::Debug for ResponseFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoPlayers => f.write_str("ResponseFetcher::NoPlayers"),
            Self::Live { .. } => f.write_str("ResponseFetcher::Live"),
        }
    }
}
