//! Domain DTOs for the apartments service.
//!
//! # Design
//! `Apartment` is what the service returns; `ApartmentInput` is what the
//! client sends on create and update. Keeping the request body a separate
//! type means an `id` can never be put on the wire by the client.
//!
//! These types are defined independently from the mock-server crate;
//! integration tests catch schema drift between the two.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Rents strictly below this are `bas`.
pub const LOW_RENT_CEILING: f64 = 1000.0;

/// Rents up to and including this are `moyen`.
pub const MEDIUM_RENT_CEILING: f64 = 5000.0;

/// A rental apartment as returned by the service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Apartment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub num_app: String,
    pub design: String,
    pub loyer: f64,
    /// Whatever the service echoes back. The client never fills this in;
    /// use [`Apartment::observation`] for display.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub obs: Option<String>,
}

impl Apartment {
    pub fn observation(&self) -> Observation {
        Observation::from_loyer(self.loyer)
    }

    /// Request body carrying this record's editable fields.
    pub fn to_input(&self) -> ApartmentInput {
        ApartmentInput {
            num_app: self.num_app.clone(),
            design: self.design.clone(),
            loyer: self.loyer,
        }
    }
}

/// Request payload for creating or updating an apartment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ApartmentInput {
    pub num_app: String,
    pub design: String,
    pub loyer: f64,
}

/// Server-computed aggregate over every apartment's rent.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Stats {
    pub total: f64,
    pub min: f64,
    pub max: f64,
}

/// Rent tier shown next to each apartment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Observation {
    Bas,
    Moyen,
    Eleve,
}

impl Observation {
    /// Classify a rent. Both bounds of `moyen` are inclusive.
    pub fn from_loyer(loyer: f64) -> Self {
        if loyer < LOW_RENT_CEILING {
            Observation::Bas
        } else if loyer <= MEDIUM_RENT_CEILING {
            Observation::Moyen
        } else {
            Observation::Eleve
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Observation::Bas => "bas",
            Observation::Moyen => "moyen",
            Observation::Eleve => "élevé",
        }
    }
}

impl fmt::Display for Observation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
