//! Display ordering for normalized listings.

use puller_core::CanonicalProduct;

use crate::link::{default_resolver, LinkResolver};

/// Moves listings whose link points at the fallback marketplace to the end.
///
/// This is a stable partition: direct-link listings keep their relative order,
/// followed by fallback-domain listings in their relative order. Applying it
/// twice gives the same result as applying it once.
#[must_use]
pub fn prioritize(products: Vec<CanonicalProduct>) -> Vec<CanonicalProduct> {
    prioritize_with(products, default_resolver())
}

/// Like [`prioritize`], with an explicit link policy.
#[must_use]
pub fn prioritize_with(
    products: Vec<CanonicalProduct>,
    resolver: &LinkResolver,
) -> Vec<CanonicalProduct> {
    let (mut direct, fallback): (Vec<_>, Vec<_>) = products
        .into_iter()
        .partition(|p| !resolver.is_fallback_link(&p.link));
    direct.extend(fallback);
    direct
}
