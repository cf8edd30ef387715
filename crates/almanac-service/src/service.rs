//! Feed service: settings, window policy, decoding, expansion and caching
//! wired together.

use almanac_core::config::Settings;
use almanac_rfc::rfc::ical::core::Occurrence;
use almanac_rfc::rfc::ical::parse::decode;
use chrono::NaiveDateTime;

use crate::cache::{CacheKey, ExpansionCache};
use crate::error::ServiceResult;
use crate::feed::{ExpandOptions, expand_feed};
use crate::window::{Window, WindowPolicy};

/// Expands feeds on behalf of a caller that fetches their text.
///
/// Results are cached per (feed key, window). The cache does not look at the
/// feed text, so a caller that fetched a changed feed must call
/// [`FeedService::invalidate`] first.
#[derive(Debug)]
pub struct FeedService {
    policy: WindowPolicy,
    options: ExpandOptions,
    cache: ExpansionCache,
}

impl FeedService {
    /// ## Summary
    /// Builds a service from loaded settings.
    ///
    /// ## Errors
    /// Returns an error if the expansion or cache settings are invalid.
    pub fn new(settings: &Settings) -> ServiceResult<Self> {
        let policy = WindowPolicy::from_config(&settings.expansion)?;
        let cache = ExpansionCache::from_config(&settings.cache)?;

        tracing::debug!(
            lookback_days = policy.lookback_days,
            lookahead_days = policy.lookahead_days,
            cache_entries = settings.cache.max_entries,
            "Feed service ready"
        );

        Ok(Self {
            policy,
            options: ExpandOptions::from(&settings.expansion),
            cache,
        })
    }

    /// ## Summary
    /// Returns the window the service uses around `now`.
    ///
    /// ## Errors
    /// Returns an error if the window leaves the supported calendar range.
    pub fn window_at(&self, now: NaiveDateTime) -> ServiceResult<Window> {
        self.policy.window_at(now)
    }

    /// ## Summary
    /// Returns the occurrences of the feed `text` in the window around `now`.
    ///
    /// ## Errors
    /// Returns an error only if the window cannot be computed; malformed
    /// feed content never fails.
    #[tracing::instrument(skip(self, text), fields(text_len = text.len()))]
    pub fn occurrences(
        &self,
        feed_key: &str,
        text: &str,
        now: NaiveDateTime,
    ) -> ServiceResult<Vec<Occurrence>> {
        let window = self.window_at(now)?;
        Ok(self.occurrences_in(feed_key, text, window))
    }

    /// Returns the occurrences of the feed `text` in an explicit window.
    #[must_use]
    pub fn occurrences_in(&self, feed_key: &str, text: &str, window: Window) -> Vec<Occurrence> {
        self.cache
            .get_or_insert_with(CacheKey::new(feed_key, window), || {
                let records = decode(text);
                expand_feed(&records, window, &self.options)
            })
    }

    /// Forgets every cached expansion of `feed_key`.
    pub fn invalidate(&self, feed_key: &str) {
        self.cache.invalidate_feed(feed_key);
    }

    #[must_use]
    pub const fn cache(&self) -> &ExpansionCache {
        &self.cache
    }
}
