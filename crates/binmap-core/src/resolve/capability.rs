//! Choosing the runtime that hosts a resolver worker.
//!
//! The worker script needs a runtime of at least `min_host_version`. A
//! manifest pinned to an older runtime is still resolved against that
//! runtime's profile, but the worker process itself runs under a capable
//! host picked once at startup.

use crate::domain::{ProfileMap, RuntimeProfile};

/// First usable profile, by version id, that meets `min`.
pub fn select_host_runtime<'a>(profiles: &'a ProfileMap, min: &[u32]) -> Option<&'a RuntimeProfile> {
    profiles
        .values()
        .find(|profile| profile.meets(min) && profile.is_usable())
}

/// Runtime the worker for `target` runs under: `target` itself when capable,
/// else `host`.
pub fn worker_runtime<'a>(
    target: &'a RuntimeProfile,
    host: Option<&'a RuntimeProfile>,
    min: &[u32],
) -> Option<&'a RuntimeProfile> {
    if target.meets(min) {
        Some(target)
    } else {
        host
    }
}
