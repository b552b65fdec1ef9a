//! Panel slot assignment
//!
//! Providers are shuffled once and then cycled to fill the panel, so a
//! short provider list spreads evenly over a larger panel. The shuffle is
//! seedable so tests (and reproducible runs) can fix the ordering.

use super::vote::VoterSlot;
use crate::core::provider::Provider;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// Assign providers to an ordered list of voter slots
///
/// Shuffle-then-cycle: the provider list is shuffled (seeded when `seed`
/// is given), then repeated in order until `panel_size` slots are filled.
/// Duplicates of a provider are expected whenever the panel is larger
/// than the provider list.
pub fn assign_slots(providers: &[Provider], panel_size: usize, seed: Option<u64>) -> Vec<VoterSlot> {
    if providers.is_empty() || panel_size == 0 {
        return Vec::new();
    }

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut shuffled: Vec<Provider> = providers.to_vec();
    shuffled.shuffle(&mut rng);

    shuffled
        .into_iter()
        .cycle()
        .take(panel_size)
        .enumerate()
        .map(|(index, provider)| VoterSlot::new(index, provider))
        .collect()
}
