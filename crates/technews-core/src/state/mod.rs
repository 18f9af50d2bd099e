//! Client-side state containers for the non-auth resources.
//!
//! Each container owns the lists and selected item a UI binds to, plus the
//! usual `loading` and `error` flags. Operations call the API, edit the
//! held lists in place on success, and on failure store the server's
//! detail text or the operation's fallback message before returning the
//! error.

mod comments;
mod payments;
mod posts;
mod subscriptions;

pub use comments::CommentsState;
pub use payments::PaymentsState;
pub use posts::PostsState;
pub use subscriptions::SubscriptionsState;

use crate::models::Paginated;

/// Pagination envelope of the last list fetch, without the results.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pagination {
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
}

impl<T> From<&Paginated<T>> for Pagination {
    fn from(page: &Paginated<T>) -> Self {
        Self {
            count: page.count,
            next: page.next.clone(),
            previous: page.previous.clone(),
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use reqwest::StatusCode;

    use crate::api::{ApiClient, ApiError, ApiRequest, ApiResponse, Transport};
    use crate::auth::MemoryTokenStore;

    /// Replays canned responses in order and records request paths.
    #[derive(Default)]
    pub struct Replay {
        responses: Mutex<VecDeque<ApiResponse>>,
        pub paths: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Transport for Replay {
        async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
            self.paths.lock().unwrap().push(request.path().to_string());
            Ok(self
                .responses
                .lock()
                .unwrap()
                .pop_front()
                .expect("unexpected request"))
        }
    }

    pub fn ok(body: serde_json::Value) -> ApiResponse {
        ApiResponse::json_body(StatusCode::OK, &body)
    }

    pub fn status(code: u16, body: serde_json::Value) -> ApiResponse {
        ApiResponse::json_body(StatusCode::from_u16(code).unwrap(), &body)
    }

    pub fn client(responses: Vec<ApiResponse>) -> (ApiClient, Arc<Replay>) {
        let replay = Arc::new(Replay {
            responses: Mutex::new(responses.into()),
            paths: Mutex::new(Vec::new()),
        });
        let client = ApiClient::new(replay.clone(), Arc::new(MemoryTokenStore::new()));
        (client, replay)
    }
}
