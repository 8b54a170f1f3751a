//! View-models for the vendor openings pages. Each owns the state it fetched;
//! nothing is shared between views.

pub mod detail;
pub mod openings;

pub use detail::{DetailPhase, OpeningDetailView};
pub use openings::OpeningsListView;
