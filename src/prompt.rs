//! Prompt composition for the generation backend
//!
//! [`compose`] is a pure function from a validated [`TripProfile`] to the
//! exact prompt text sent to the backend. Identical profiles yield a
//! byte-identical prompt, which keeps generation behavior reproducible and
//! testable without a backend.

use crate::profile::{Activity, TripDates, TripProfile};

/// Render the trip profile into the packing list prompt
///
/// Fields are interpolated in a fixed order; an empty activity set renders
/// as an empty value rather than failing. The profile is not mutated and no
/// backend is contacted here.
#[must_use]
pub fn compose(profile: &TripProfile) -> String {
    let activities = profile
        .activities
        .iter()
        .map(Activity::label)
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "Erstelle eine Packliste für folgende Reisedaten:\n\
         - Reiseziel: {destination}\n\
         - Reisezeitraum: {period}\n\
         - Erwachsene: {adults}, Kinder: {children}, Kleinkinder: {infants}, Haustiere: {pets}\n\
         - Reiseart: {trip_type}\n\
         - Unterkunft: {accommodation}\n\
         - Transportmittel: {transport}\n\
         - Aktivitäten: {activities}\n\
         - Besondere Wünsche: {special_notes}\n\
         \n\
         Gib die Packliste in klarer, stichpunktartiger Form zurück. Gruppiere ggf. nach Kategorien (Kleidung, Hygiene, Technik, Kinder, Haustiere etc.).\n\
         Berücksichtige Wetter, Dauer und Art der Reise. Nutze dein Wissen über gängige Urlaubsregionen und sei hilfreich.\n\
         Gib die Antwort auf Deutsch zurück.",
        destination = profile.destination,
        period = period_description(&profile.dates),
        adults = profile.adults,
        children = profile.children,
        infants = profile.infants,
        pets = profile.pets,
        trip_type = profile.trip_type.label(),
        accommodation = profile.accommodation.label(),
        transport = profile.transport.label(),
        activities = activities,
        special_notes = profile.special_notes,
    )
}

/// Human-readable trip period, ISO dates for concrete ranges
fn period_description(dates: &TripDates) -> String {
    match dates {
        TripDates::Range { start, end } => {
            format!("{start} bis {end} ({} Tage)", dates.duration_days())
        }
        TripDates::MonthAndDuration {
            month,
            duration_days,
        } => format!("{month}, {duration_days} Tage"),
    }
}
