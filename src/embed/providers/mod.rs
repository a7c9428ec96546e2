// Built-in video providers

pub mod dailymotion;
pub mod vimeo;
pub mod wistia;
pub mod youtube;

pub use dailymotion::Dailymotion;
pub use vimeo::Vimeo;
pub use wistia::Wistia;
pub use youtube::YouTube;

use super::factory::ProviderRegistration;

/// Built-in providers in matching priority order
pub fn default_registrations() -> Vec<ProviderRegistration> {
    vec![
        YouTube::registration(),
        Vimeo::registration(),
        Dailymotion::registration(),
        Wistia::registration(),
    ]
}
