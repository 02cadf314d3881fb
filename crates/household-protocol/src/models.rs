//! Marketplace records returned by the backend.
//!
//! The backend is loose about which fields it includes per endpoint, so
//! almost everything is `#[serde(default)]`. Only identifiers are required.

use serde::{Deserialize, Serialize};

use crate::ProtocolError;

// ---------------------------------------------------------------------------
// Services
// ---------------------------------------------------------------------------

/// A service offered on the marketplace (e.g. "Plumbing").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: u64,
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default, alias = "price")]
    pub base_price: f64,

    /// Minutes.
    #[serde(default)]
    pub time_required: Option<u32>,

    #[serde(default)]
    pub service_type: Option<String>,

    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// Body for creating or editing a service (admin only).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceForm {
    pub name: String,
    pub price: f64,
    pub description: String,
    pub service_type: String,
}

// ---------------------------------------------------------------------------
// Service requests (bookings)
// ---------------------------------------------------------------------------

/// Lifecycle of a booking.
///
/// Unknown statuses from newer backends decode as [`RequestStatus::Other`]
/// so a single odd row can't break a whole listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Requested,
    Assigned,
    Accepted,
    Rejected,
    Completed,
    Closed,
    Cancelled,
    #[serde(other)]
    Other,
}

impl RequestStatus {
    /// Still waiting on someone (customer view "active requests").
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Requested | Self::Assigned | Self::Accepted)
    }
}

/// A customer's booking of a professional for a service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceRequest {
    pub id: u64,

    #[serde(default)]
    pub customer_id: Option<u64>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub service_id: Option<u64>,
    #[serde(default)]
    pub service_name: Option<String>,
    #[serde(default)]
    pub professional_id: Option<u64>,
    #[serde(default)]
    pub professional_name: Option<String>,

    pub status: RequestStatus,

    /// ISO-8601 timestamps, kept as strings; the client only displays them.
    #[serde(default, alias = "date_requested")]
    pub requested_date: Option<String>,
    #[serde(default)]
    pub scheduled_date: Option<String>,
    #[serde(default)]
    pub completion_date: Option<String>,

    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub rejection_reason: Option<String>,
}

/// `POST /customer/request` body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewServiceRequest {
    pub service_id: u64,
    pub professional_id: u64,
}

/// `PUT /professional/request/{id}` body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: RequestStatus,
}

// ---------------------------------------------------------------------------
// People
// ---------------------------------------------------------------------------

/// A professional as listed for admins and customers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Professional {
    pub id: u64,

    #[serde(default)]
    pub user_id: Option<u64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub service_type: Option<String>,
    /// Years.
    #[serde(default)]
    pub experience: Option<u32>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "approved")]
    pub is_verified: bool,
    #[serde(default)]
    pub blocked: bool,
}

/// A customer as listed for admins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: u64,

    #[serde(default)]
    pub user_id: Option<u64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub blocked: bool,
}

/// The signed-in user's own profile.
///
/// Role-specific details (address, experience, ...) vary by role and are
/// kept as raw JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default, alias = "user_id")]
    pub id: Option<u64>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(flatten)]
    pub details: serde_json::Map<String, serde_json::Value>,
}

// ---------------------------------------------------------------------------
// Reviews
// ---------------------------------------------------------------------------

/// A review left by a customer on a completed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    #[serde(default)]
    pub id: Option<u64>,
    pub service_request_id: u64,
    pub rating: u8,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// `POST /review/{request_id}` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewForm {
    rating: u8,
    comment: String,
}

impl ReviewForm {
    /// Builds a review, rejecting ratings outside one to five stars.
    pub fn new(rating: u8, comment: impl Into<String>) -> Result<Self, ProtocolError> {
        if !(1..=5).contains(&rating) {
            return Err(ProtocolError::InvalidMessage(format!(
                "rating must be between 1 and 5, got {rating}"
            )));
        }
        Ok(Self {
            rating,
            comment: comment.into(),
        })
    }

    pub fn rating(&self) -> u8 {
        self.rating
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }
}

/// Aggregate ratings for a professional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ReviewStats {
    #[serde(default)]
    pub average_rating: f64,
    #[serde(default)]
    pub total_reviews: u64,
}

// ---------------------------------------------------------------------------
// Search, summaries, reports
// ---------------------------------------------------------------------------

/// Admin search form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// What to search: `"services"`, `"customers"`, `"professionals"`, ...
    pub search_type: String,
    pub search_text: String,
}

/// Customer service search: one criterion per query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceSearch {
    ServiceType(String),
    PinCode(String),
    Location(String),
}

impl ServiceSearch {
    /// The query parameter name and value.
    pub fn query_pair(&self) -> (&'static str, &str) {
        match self {
            Self::ServiceType(v) => ("service_type", v),
            Self::PinCode(v) => ("pin_code", v),
            Self::Location(v) => ("location", v),
        }
    }
}

/// Admin search results (the `data` object of the reply). Professional
/// search fills only `service_requests`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SearchResults {
    #[serde(default)]
    pub customers: Vec<Customer>,
    #[serde(default)]
    pub professionals: Vec<Professional>,
    #[serde(default)]
    pub services: Vec<Service>,
    #[serde(default)]
    pub service_requests: Vec<ServiceRequest>,
}

/// Summary endpoints feed charts whose shape the client doesn't
/// interpret; the raw JSON is handed through.
pub type ChartData = serde_json::Value;

/// `GET /admin/reports/list` reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ReportList {
    #[serde(default)]
    pub downloads: Vec<String>,
}

// ---------------------------------------------------------------------------
// Reply wrappers
// ---------------------------------------------------------------------------

/// A `{data, message, category}` reply (admin search, admin profile).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "crate::types::lenient_category")]
    pub category: Option<crate::Category>,
}

/// `GET /admin/service-requests` reply. `professionals` maps ids to
/// display records and is passed through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AdminRequests {
    #[serde(default)]
    pub requests: Vec<ServiceRequest>,
    #[serde(default)]
    pub professionals: serde_json::Value,
}

/// `GET /reviews/received` reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ReceivedReviews {
    #[serde(default)]
    pub reviews: Vec<Review>,
    #[serde(default)]
    pub customers: serde_json::Value,
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_unwraps_search_data() {
        let reply: Envelope<SearchResults> = serde_json::from_str(
            r#"{"data":{"services":[{"id":1,"name":"Painting"}]},"message":"ok","category":"bogus"}"#,
        )
        .unwrap();

        assert_eq!(reply.data.services.len(), 1);
        assert!(reply.data.customers.is_empty());
        assert_eq!(reply.category, None);
    }

    #[test]
    fn test_received_reviews_tolerates_missing_customers() {
        let reply: ReceivedReviews =
            serde_json::from_str(r#"{"reviews":[{"service_request_id":4,"rating":5}]}"#).unwrap();

        assert_eq!(reply.reviews[0].rating, 5);
        assert!(reply.customers.is_null());
    }

    #[test]
    fn test_service_search_query_pair_names_the_criterion() {
        assert_eq!(
            ServiceSearch::PinCode("560001".into()).query_pair(),
            ("pin_code", "560001")
        );
        assert_eq!(
            ServiceSearch::ServiceType("plumbing".into()).query_pair(),
            ("service_type", "plumbing")
        );
    }

    #[test]
    fn test_service_accepts_price_alias_and_defaults_active() {
        let svc: Service =
            serde_json::from_str(r#"{"id":3,"name":"Plumbing","price":250.0}"#).unwrap();

        assert_eq!(svc.base_price, 250.0);
        assert!(svc.is_active);
        assert!(svc.description.is_none());
    }

    #[test]
    fn test_request_status_unknown_decodes_as_other() {
        let status: RequestStatus = serde_json::from_str(r#""on_hold""#).unwrap();
        assert_eq!(status, RequestStatus::Other);
    }

    #[test]
    fn test_request_status_is_open() {
        assert!(RequestStatus::Requested.is_open());
        assert!(RequestStatus::Assigned.is_open());
        assert!(!RequestStatus::Completed.is_open());
        assert!(!RequestStatus::Rejected.is_open());
    }

    #[test]
    fn test_service_request_reads_date_requested_alias() {
        let req: ServiceRequest = serde_json::from_str(
            r#"{"id":9,"status":"requested","date_requested":"2024-01-02T10:00:00"}"#,
        )
        .unwrap();

        assert_eq!(req.requested_date.as_deref(), Some("2024-01-02T10:00:00"));
        assert_eq!(req.status, RequestStatus::Requested);
    }

    #[test]
    fn test_review_form_rejects_zero_stars() {
        let result = ReviewForm::new(0, "meh");
        assert!(matches!(result, Err(ProtocolError::InvalidMessage(_))));
    }

    #[test]
    fn test_review_form_accepts_five_stars() {
        let form = ReviewForm::new(5, "great").unwrap();
        assert_eq!(form.rating(), 5);
        assert_eq!(form.comment(), "great");
    }

    #[test]
    fn test_profile_keeps_role_specific_details() {
        let profile: Profile = serde_json::from_str(
            r#"{"user_id":4,"username":"bob","address":"1 Main St","pin_code":"560001"}"#,
        )
        .unwrap();

        assert_eq!(profile.id, Some(4));
        assert_eq!(profile.details["address"], "1 Main St");
    }
}
