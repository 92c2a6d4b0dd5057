//! Image fallback with bounded retries.
//!
//! Notion-hosted images use signed S3 URLs that expire. A broken signed URL
//! gets a couple of delayed, cache-busted reloads before the local
//! placeholder is shown; anything else goes straight to the placeholder.
//! [`ImageFallback`] computes the whole plan up front and the renderer
//! writes it into `data-*` attributes for [`IMAGE_RETRY_SCRIPT`].

use std::time::Duration;

/// Local asset shown when an image is missing or keeps failing.
pub const PLACEHOLDER_IMAGE: &str = "/static/placeholder.svg";

pub const PLACEHOLDER_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="640" height="360" viewBox="0 0 640 360"><rect width="640" height="360" fill="#e5e7eb"/><path d="M260 230l50-60 40 45 30-35 60 70H200z" fill="#9ca3af"/><circle cx="250" cy="140" r="22" fill="#9ca3af"/></svg>"##;

/// Doubling backoff between image reloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
}

impl RetryPolicy {
    /// Two retries, after 1s and 2s.
    pub const IMAGE_LOAD: RetryPolicy = RetryPolicy {
        max_retries: 2,
        initial_delay: Duration::from_secs(1),
        max_delay: Duration::from_secs(4),
    };

    /// Wait before retry `retry` (1-based).
    pub fn delay_before(&self, retry: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry.saturating_sub(1));
        self.initial_delay.saturating_mul(factor).min(self.max_delay)
    }
}

/// Whether `url` is a signed, expiring URL (Notion-hosted file on S3).
pub fn is_signed_url(url: &str) -> bool {
    url.contains("X-Amz-Signature")
        || url.contains("X-Amz-Expires")
        || url.contains("prod-files-secure.s3")
        || url.contains("secure.notion-static.com")
}

/// One scheduled reload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryAttempt {
    pub src: String,
    pub delay: Duration,
}

#[derive(Debug, Clone)]
pub struct ImageFallback {
    original: Option<String>,
    policy: RetryPolicy,
}

impl ImageFallback {
    pub fn new(src: Option<&str>) -> Self {
        Self::with_policy(src, RetryPolicy::IMAGE_LOAD)
    }

    pub fn with_policy(src: Option<&str>, policy: RetryPolicy) -> Self {
        Self {
            original: src.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string),
            policy,
        }
    }

    /// The URL to render initially.
    pub fn initial_src(&self) -> &str {
        self.original.as_deref().unwrap_or(PLACEHOLDER_IMAGE)
    }

    /// Reloads to attempt, in order, before giving up. Empty unless the
    /// source is a signed URL.
    pub fn retry_plan(&self) -> Vec<RetryAttempt> {
        let Some(original) = self.original.as_deref().filter(|src| is_signed_url(src)) else {
            return Vec::new();
        };

        (1..=self.policy.max_retries)
            .map(|retry| RetryAttempt {
                src: cache_busted(original, retry),
                delay: self.policy.delay_before(retry),
            })
            .collect()
    }

    /// `data-*` attributes consumed by [`IMAGE_RETRY_SCRIPT`].
    pub fn data_attributes(&self) -> Vec<(&'static str, String)> {
        let mut attrs = vec![("data-fallback", PLACEHOLDER_IMAGE.to_string())];
        let plan = self.retry_plan();
        if !plan.is_empty() {
            let srcs: Vec<&str> = plan.iter().map(|attempt| attempt.src.as_str()).collect();
            let delays: Vec<String> = plan
                .iter()
                .map(|attempt| attempt.delay.as_millis().to_string())
                .collect();
            attrs.push(("data-retry-srcs", srcs.join(" ")));
            attrs.push(("data-retry-delays", delays.join(",")));
        }
        attrs
    }
}

fn cache_busted(url: &str, attempt: u32) -> String {
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{}{}retry={}", url, separator, attempt)
}

/// Walks `data-retry-srcs` with the matching delays, then swaps in
/// `data-fallback`. Included once per page.
pub const IMAGE_RETRY_SCRIPT: &str = r#"document.addEventListener('error', function (e) {
  var img = e.target;
  if (!(img instanceof HTMLImageElement) || !img.dataset.fallback) return;
  var srcs = (img.dataset.retrySrcs || '').split(' ').filter(Boolean);
  var delays = (img.dataset.retryDelays || '').split(',').filter(Boolean).map(Number);
  var attempt = Number(img.dataset.attempt || 0);
  if (attempt < srcs.length) {
    img.dataset.attempt = attempt + 1;
    setTimeout(function () { img.src = srcs[attempt]; }, delays[attempt] || 0);
  } else if (img.getAttribute('src') !== img.dataset.fallback) {
    img.src = img.dataset.fallback;
  }
}, true);"#;
