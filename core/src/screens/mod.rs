//! Headless screen models. Each owns its own state; they share nothing but
//! the revision number the list screen publishes.

pub mod apartments;
pub mod stats;

pub use apartments::{
    ApartmentForm, ApartmentsScreen, ApartmentsState, DeleteOutcome, FormError, Mode, Submission,
    SubmitOutcome,
};
pub use stats::{Bar, StatsScreen};
