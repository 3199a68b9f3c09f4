/// Deck draw engine: pop, persist, log.
pub mod draw_service;
/// Paired public/private log recording for draws.
pub mod log_service;
