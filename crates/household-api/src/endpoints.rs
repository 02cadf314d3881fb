//! Typed wrappers for every backend endpoint the client uses.
//!
//! Mutations reply with an [`ApiMessage`] (`{message, category}`) for the
//! caller to display.

use household_protocol::{
    AdminRequests, ApiMessage, ChartData, Claims, ClaimsResponse, Envelope, LoginRequest,
    LoginResponse, NewServiceRequest, Professional, Profile, ReceivedReviews, RegisterRequest,
    ReportList, Review, ReviewForm, ReviewStats, Role, SearchQuery, SearchResults, Service,
    ServiceForm, ServiceRequest, ServiceSearch, StatusUpdate,
};
use urlencoding::encode;
use household_transport::{HttpTransport, Method};

use crate::{ApiError, ApiGateway, Auth};

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

impl<T: HttpTransport> ApiGateway<T> {
    /// `POST /login`. Sent without a token so a failed attempt can't
    /// invalidate an existing session.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let body = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let body = self.encode(&body)?;
        self.call(Method::Post, "/login", Some(body), Auth::Anonymous)
            .await
    }

    /// `GET /get-claims` for a token that isn't in the session yet.
    pub async fn claims(&self, token: &str) -> Result<Claims, ApiError> {
        let reply: ClaimsResponse = self
            .call(Method::Get, "/get-claims", None, Auth::Token(token))
            .await?;
        Ok(reply.claims)
    }

    /// `POST /register`.
    pub async fn register(&self, request: &RegisterRequest) -> Result<ApiMessage, ApiError> {
        let body = self.encode(request)?;
        self.call(Method::Post, "/register", Some(body), Auth::Anonymous)
            .await
    }

    /// The signed-in user's profile for `role`'s section.
    pub async fn profile(&self, role: Role) -> Result<Profile, ApiError> {
        match role {
            // Admin profile comes wrapped in `{data, message, category}`.
            Role::Admin => {
                let reply: Envelope<Profile> = self.get("/admin/profile").await?;
                Ok(reply.data)
            }
            _ => self.get(&format!("/{role}/profile")).await,
        }
    }

    /// Saves the customer or professional profile.
    pub async fn update_profile(&self, role: Role, profile: &Profile) -> Result<ApiMessage, ApiError> {
        self.post(&format!("/{role}/profile"), profile).await
    }
}

// ---------------------------------------------------------------------------
// Admin
// ---------------------------------------------------------------------------

impl<T: HttpTransport> ApiGateway<T> {
    pub async fn admin_services(&self) -> Result<Vec<Service>, ApiError> {
        self.get("/admin/services").await
    }

    pub async fn service(&self, id: u64) -> Result<Service, ApiError> {
        self.get(&format!("/admin/service/{id}")).await
    }

    pub async fn create_service(&self, form: &ServiceForm) -> Result<ApiMessage, ApiError> {
        self.post("/admin/service", form).await
    }

    pub async fn update_service(&self, id: u64, form: &ServiceForm) -> Result<ApiMessage, ApiError> {
        self.put(&format!("/admin/service/{id}"), form).await
    }

    pub async fn delete_service(&self, id: u64) -> Result<ApiMessage, ApiError> {
        self.delete(&format!("/admin/service/{id}")).await
    }

    pub async fn admin_professionals(&self) -> Result<Vec<Professional>, ApiError> {
        self.get("/admin/professionals").await
    }

    pub async fn approve_professional(&self, user_id: u64) -> Result<ApiMessage, ApiError> {
        self.put_empty(&format!("/admin/professional/{user_id}/approve"))
            .await
    }

    pub async fn block_professional(&self, user_id: u64) -> Result<ApiMessage, ApiError> {
        self.put_empty(&format!("/admin/professional/{user_id}/block"))
            .await
    }

    pub async fn approve_customer(&self, id: u64) -> Result<ApiMessage, ApiError> {
        self.put_empty(&format!("/admin/customer/{id}/approve")).await
    }

    pub async fn block_customer(&self, id: u64) -> Result<ApiMessage, ApiError> {
        self.put_empty(&format!("/admin/customer/{id}/block")).await
    }

    pub async fn admin_service_requests(&self) -> Result<AdminRequests, ApiError> {
        self.get("/admin/service-requests").await
    }

    pub async fn search(&self, query: &SearchQuery) -> Result<SearchResults, ApiError> {
        let reply: Envelope<SearchResults> = self.post("/admin/search", query).await?;
        Ok(reply.data)
    }

    /// Ratings histogram (`fiveStars`, `fourStars`, ...).
    pub async fn rating_summary(&self) -> Result<ChartData, ApiError> {
        self.get("/admin/summary/ratings").await
    }

    /// Request counts by status.
    pub async fn request_summary(&self) -> Result<ChartData, ApiError> {
        self.get("/admin/summary/service_requests").await
    }

    /// Starts an export of a professional's closed requests. The report
    /// shows up in [`reports`](Self::reports) once generated.
    pub async fn export_report(&self, professional_id: u64) -> Result<ApiMessage, ApiError> {
        self.get(&format!("/admin/export/{professional_id}")).await
    }

    pub async fn reports(&self) -> Result<ReportList, ApiError> {
        self.get("/admin/reports/list").await
    }
}

// ---------------------------------------------------------------------------
// Customer
// ---------------------------------------------------------------------------

impl<T: HttpTransport> ApiGateway<T> {
    pub async fn customer_services(&self) -> Result<Vec<Service>, ApiError> {
        self.get("/customer/services").await
    }

    pub async fn professionals_for(&self, service_type: &str) -> Result<Vec<Professional>, ApiError> {
        self.get(&format!("/customer/professionals/{}", encode(service_type)))
            .await
    }

    /// `GET /services/search` by service type, PIN code or location.
    pub async fn search_services(&self, search: &ServiceSearch) -> Result<Vec<Service>, ApiError> {
        let (key, value) = search.query_pair();
        self.get(&format!("/services/search?{key}={}", encode(value)))
            .await
    }

    pub async fn customer_requests(&self) -> Result<Vec<ServiceRequest>, ApiError> {
        self.get("/customer/requests").await
    }

    pub async fn create_request(&self, request: &NewServiceRequest) -> Result<ApiMessage, ApiError> {
        self.post("/customer/request", request).await
    }

    pub async fn close_request(&self, id: u64) -> Result<ApiMessage, ApiError> {
        self.put_empty(&format!("/customer/request/{id}/close")).await
    }

    pub async fn reviews_given(&self) -> Result<Vec<Review>, ApiError> {
        self.get("/reviews/given").await
    }

    pub async fn submit_review(&self, request_id: u64, review: &ReviewForm) -> Result<ApiMessage, ApiError> {
        self.post(&format!("/review/{request_id}"), review).await
    }
}

// ---------------------------------------------------------------------------
// Professional
// ---------------------------------------------------------------------------

impl<T: HttpTransport> ApiGateway<T> {
    pub async fn professional_requests(&self) -> Result<Vec<ServiceRequest>, ApiError> {
        self.get("/professional/requests").await
    }

    pub async fn update_request_status(
        &self,
        id: u64,
        update: &StatusUpdate,
    ) -> Result<ApiMessage, ApiError> {
        self.put(&format!("/professional/request/{id}"), update).await
    }

    /// `POST /professional/search` over the professional's own requests
    /// (by date, customer location or PIN code).
    pub async fn search_requests(&self, query: &SearchQuery) -> Result<Vec<ServiceRequest>, ApiError> {
        let reply: Envelope<SearchResults> = self.post("/professional/search", query).await?;
        Ok(reply.data.service_requests)
    }

    pub async fn reviews_received(&self) -> Result<ReceivedReviews, ApiError> {
        self.get("/reviews/received").await
    }

    pub async fn review_stats(&self) -> Result<ReviewStats, ApiError> {
        self.get("/reviews/stats").await
    }
}
