use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The fixed top-level topics the itinerary document is organized under.
/// Variant order matches document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Heading {
    BookingSummary,
    Flights,
    Hotel,
    AirportTransfers,
    ActivitiesVouchers,
    TravelerDocuments,
    BaggagePolicy,
    HotelPolicies,
    KeyFacts,
    ContactEscalation,
}

impl Heading {
    pub const ALL: [Heading; 10] = [
        Heading::BookingSummary,
        Heading::Flights,
        Heading::Hotel,
        Heading::AirportTransfers,
        Heading::ActivitiesVouchers,
        Heading::TravelerDocuments,
        Heading::BaggagePolicy,
        Heading::HotelPolicies,
        Heading::KeyFacts,
        Heading::ContactEscalation,
    ];

    /// The exact heading line as it appears in the source document.
    pub fn as_str(self) -> &'static str {
        match self {
            Heading::BookingSummary => "Booking Summary",
            Heading::Flights => "Flights",
            Heading::Hotel => "Hotel",
            Heading::AirportTransfers => "Airport Transfers",
            Heading::ActivitiesVouchers => "Activities & Vouchers",
            Heading::TravelerDocuments => "Traveler Documents (for check-in)",
            Heading::BaggagePolicy => "Airline Baggage Policy (Summary)",
            Heading::HotelPolicies => "Hotel Policies (Bayview Resort Goa)",
            Heading::KeyFacts => "Key Facts for Q&A (Findable by the Mini-Bot)",
            Heading::ContactEscalation => "Contact & Escalation",
        }
    }

    /// Matches a trimmed document line against the canonical heading strings.
    pub fn from_document_line(line: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|h| h.as_str() == line)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AskRequest {
    pub session_id: String,
    pub query: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskResponse {
    pub response: String,
    pub heading: String,
    pub data_line: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionRequest {
    pub session_id: Option<String>,
    pub reset: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionResponse {
    pub session_id: String,
}

/// The data handed to the generative model: the query plus only the matched
/// sections' lines. Keeping unrelated sections out of `data` is what lets a
/// cited line be traced back to a heading the query actually concerned.
#[derive(Debug, Clone, Serialize)]
pub struct GroundingPayload {
    pub query: String,
    pub data: BTreeMap<String, Vec<String>>,
}

/// A schema-validated model reply. `citation` is `None` when the model
/// answered without pointing at a source line (greetings, out-of-scope).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroundedAnswer {
    pub explanation: String,
    pub citation: Option<(Heading, usize)>,
}

/// Outcome of one generative call, after unwrapping and validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceReply {
    Answer(GroundedAnswer),
    Malformed,
    Failed(String),
}
