//! Market generation: ports with seeded random positions and prices.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;
use trader_core::{
    validate_map, validate_template, Location, LocationTemplate, MapBounds, Position, PriceEntry,
    PriceVector, ValidationError,
};

/// Deterministic RNG used for sessions built from a seed.
pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Build one port per template.
///
/// Every template is validated before the first draw, so an inverted range is
/// reported as a configuration error instead of reaching the RNG. Positions are
/// uniform inside the map minus its margin; each price is uniform in its closed
/// range.
pub fn generate_locations<R: Rng>(
    templates: &[LocationTemplate],
    bounds: &MapBounds,
    rng: &mut R,
) -> Result<Vec<Location>, ValidationError> {
    if templates.is_empty() {
        return Err(ValidationError::NoLocations);
    }
    validate_map(bounds)?;
    for t in templates {
        validate_template(t)?;
    }
    templates
        .iter()
        .map(|t| generate_location(t, bounds, rng))
        .collect()
}

fn generate_location<R: Rng>(
    template: &LocationTemplate,
    bounds: &MapBounds,
    rng: &mut R,
) -> Result<Location, ValidationError> {
    let x = rng.gen_range(bounds.margin..=bounds.width - bounds.margin);
    let y = rng.gen_range(bounds.margin..=bounds.height - bounds.margin);
    let entries = template
        .prices
        .iter()
        .map(|r| PriceEntry {
            commodity: r.commodity.clone(),
            price: rng.gen_range(r.min..=r.max),
        })
        .collect();
    let prices = PriceVector::new(entries)?;
    debug!(port = %template.name, x, y, ?prices, "generated port");
    Ok(Location {
        name: template.name.clone(),
        description: template.description.clone(),
        position: Position::new(x, y),
        prices,
    })
}

/// Pick the starting port uniformly. `None` only for an empty slice.
pub fn choose_start<R: Rng>(locations: &[Location], rng: &mut R) -> Option<usize> {
    if locations.is_empty() {
        return None;
    }
    Some(rng.gen_range(0..locations.len()))
}
