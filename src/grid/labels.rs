//! Display labels for grid headers and cells.

const DAY_NAMES: [&str; 7] = ["Lundi", "Mardi", "Mercredi", "Jeudi", "Vendredi", "Samedi", "Dimanche"];
const PROMOTION_NAMES: [&str; 5] = ["L1", "L2", "L3", "M1", "M2"];

/// Weekday name for a zero-based day index, cycling weekly.
#[must_use]
pub fn day_name(day: u32) -> &'static str {
    DAY_NAMES[(day % 7) as usize]
}

/// Column group header, e.g. `"Jour 1 (Lundi)"`.
#[must_use]
pub fn day_label(day: u32) -> String {
    format!("Jour {} ({})", u64::from(day) + 1, day_name(day))
}

/// One-hour slot range, e.g. `"8:00 - 9:00"` for slot 0 from 8h.
#[must_use]
pub fn slot_label(slot: u32, start_hour: u32) -> String {
    let hour = u64::from(start_hour) + u64::from(slot);
    format!("{hour}:00 - {}:00", hour + 1)
}

/// Academic year label: 1..=5 map to `L1`..`M2`, anything else to `P{n}`.
#[must_use]
pub fn promotion_name(promotion: u32) -> String {
    promotion
        .checked_sub(1)
        .and_then(|i| PROMOTION_NAMES.get(i as usize))
        .map_or_else(|| format!("P{promotion}"), |name| (*name).to_owned())
}
