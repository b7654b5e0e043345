//! Provider client capability trait.
//!
//! The conversion pipeline only talks to catalogs through this trait, which
//! keeps it independent of HTTP details and lets tests substitute mocks.
//!
//! # Example
//!
//! ```ignore
//! use playlist_porter::convert::traits::ProviderClient;
//!
//! async fn count(client: &dyn ProviderClient, id: &str, token: &AccessToken) -> usize {
//!     client.fetch_playlist_items(id, token).await.map(|i| i.len()).unwrap_or(0)
//! }
//! ```

use async_trait::async_trait;

use super::domain::{
    AccessToken, Catalog, PlaylistSummary, ProviderError, SearchCandidate, SourceItem,
};

/// Operations the conversion core needs from a streaming catalog.
#[async_trait]
pub trait ProviderClient: Send + Sync {
    /// Which catalog this client talks to
    fn catalog(&self) -> Catalog;

    /// Fetch every item of a playlist, in playlist order, across all pages.
    async fn fetch_playlist_items(
        &self,
        playlist_id: &str,
        token: &AccessToken,
    ) -> Result<Vec<SourceItem>, ProviderError>;

    /// Create a playlist owned by the token's user and return its ID.
    async fn create_playlist(
        &self,
        name: &str,
        description: &str,
        token: &AccessToken,
    ) -> Result<String, ProviderError>;

    /// Search the catalog; results are in provider relevance order.
    async fn search_catalog(
        &self,
        query: &str,
        token: &AccessToken,
        max_results: u32,
    ) -> Result<Vec<SearchCandidate>, ProviderError>;

    /// Append one item to the end of a playlist.
    async fn append_item(
        &self,
        playlist_id: &str,
        candidate_id: &str,
        token: &AccessToken,
    ) -> Result<(), ProviderError>;

    /// Resolve the user or channel ID the token belongs to.
    async fn resolve_user_id(&self, token: &AccessToken) -> Result<String, ProviderError>;

    /// Playlists owned by the token's user.
    async fn list_playlists(
        &self,
        token: &AccessToken,
    ) -> Result<Vec<PlaylistSummary>, ProviderError>;
}

/// Mock provider clients for testing.
///
/// Returns configurable responses and records every call.
#[cfg(test)]
pub mod mocks {
    use std::collections::HashMap;

    use parking_lot::Mutex;

    use super::*;

    /// A recorded call against a mock catalog
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Call {
        Fetch(String),
        Create(String),
        Search(String),
        Append { playlist_id: String, candidate_id: String },
        ResolveUser,
        ListPlaylists,
    }

    /// In-memory catalog with scripted responses.
    pub struct MockCatalog {
        catalog: Catalog,
        items: Vec<SourceItem>,
        /// Results per exact query text; unknown queries return nothing
        results: HashMap<String, Vec<SearchCandidate>>,
        /// Errors per exact query text (take precedence over results)
        search_errors: HashMap<String, ProviderError>,
        /// Errors per candidate ID on append
        append_errors: HashMap<String, ProviderError>,
        fetch_error: Option<ProviderError>,
        create_error: Option<ProviderError>,
        playlists: Vec<PlaylistSummary>,
        calls: Mutex<Vec<Call>>,
    }

    impl MockCatalog {
        /// Create an empty mock for the given catalog.
        pub fn new(catalog: Catalog) -> Self {
            Self {
                catalog,
                items: Vec::new(),
                results: HashMap::new(),
                search_errors: HashMap::new(),
                append_errors: HashMap::new(),
                fetch_error: None,
                create_error: None,
                playlists: Vec::new(),
                calls: Mutex::new(Vec::new()),
            }
        }

        /// Playlist contents returned by `fetch_playlist_items`.
        pub fn with_items(mut self, items: Vec<SourceItem>) -> Self {
            self.items = items;
            self
        }

        /// Search results for an exact query text.
        pub fn with_results(mut self, query: &str, results: Vec<SearchCandidate>) -> Self {
            self.results.insert(query.to_string(), results);
            self
        }

        /// Search failure for an exact query text.
        pub fn with_search_error(mut self, query: &str, error: ProviderError) -> Self {
            self.search_errors.insert(query.to_string(), error);
            self
        }

        /// Append failure for a candidate ID.
        pub fn with_append_error(mut self, candidate_id: &str, error: ProviderError) -> Self {
            self.append_errors.insert(candidate_id.to_string(), error);
            self
        }

        pub fn with_fetch_error(mut self, error: ProviderError) -> Self {
            self.fetch_error = Some(error);
            self
        }

        pub fn with_create_error(mut self, error: ProviderError) -> Self {
            self.create_error = Some(error);
            self
        }

        pub fn with_playlists(mut self, playlists: Vec<PlaylistSummary>) -> Self {
            self.playlists = playlists;
            self
        }

        /// Every call made so far, in order.
        pub fn calls(&self) -> Vec<Call> {
            self.calls.lock().clone()
        }

        /// Queries sent to `search_catalog`, in order.
        pub fn searches(&self) -> Vec<String> {
            self.calls()
                .into_iter()
                .filter_map(|c| match c {
                    Call::Search(q) => Some(q),
                    _ => None,
                })
                .collect()
        }

        /// Candidate IDs successfully appended, in order.
        pub fn appended(&self) -> Vec<String> {
            self.calls()
                .into_iter()
                .filter_map(|c| match c {
                    Call::Append { candidate_id, .. } => Some(candidate_id),
                    _ => None,
                })
                .filter(|id| !self.append_errors.contains_key(id))
                .collect()
        }

        fn record(&self, call: Call) {
            self.calls.lock().push(call);
        }
    }

    #[async_trait]
    impl ProviderClient for MockCatalog {
        fn catalog(&self) -> Catalog {
            self.catalog
        }

        async fn fetch_playlist_items(
            &self,
            playlist_id: &str,
            _token: &AccessToken,
        ) -> Result<Vec<SourceItem>, ProviderError> {
            self.record(Call::Fetch(playlist_id.to_string()));
            if let Some(ref err) = self.fetch_error {
                return Err(err.clone());
            }
            Ok(self.items.clone())
        }

        async fn create_playlist(
            &self,
            name: &str,
            _description: &str,
            _token: &AccessToken,
        ) -> Result<String, ProviderError> {
            self.record(Call::Create(name.to_string()));
            if let Some(ref err) = self.create_error {
                return Err(err.clone());
            }
            Ok("mock-playlist-id".to_string())
        }

        async fn search_catalog(
            &self,
            query: &str,
            _token: &AccessToken,
            max_results: u32,
        ) -> Result<Vec<SearchCandidate>, ProviderError> {
            self.record(Call::Search(query.to_string()));
            if let Some(err) = self.search_errors.get(query) {
                return Err(err.clone());
            }
            Ok(self
                .results
                .get(query)
                .map(|r| r.iter().take(max_results as usize).cloned().collect())
                .unwrap_or_default())
        }

        async fn append_item(
            &self,
            playlist_id: &str,
            candidate_id: &str,
            _token: &AccessToken,
        ) -> Result<(), ProviderError> {
            self.record(Call::Append {
                playlist_id: playlist_id.to_string(),
                candidate_id: candidate_id.to_string(),
            });
            match self.append_errors.get(candidate_id) {
                Some(err) => Err(err.clone()),
                None => Ok(()),
            }
        }

        async fn resolve_user_id(&self, _token: &AccessToken) -> Result<String, ProviderError> {
            self.record(Call::ResolveUser);
            Ok("mock-user".to_string())
        }

        async fn list_playlists(
            &self,
            _token: &AccessToken,
        ) -> Result<Vec<PlaylistSummary>, ProviderError> {
            self.record(Call::ListPlaylists);
            Ok(self.playlists.clone())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn token() -> AccessToken {
            AccessToken::new("t")
        }

        #[tokio::test]
        async fn test_mock_search_respects_max_results() {
            let candidate = |id: &str| SearchCandidate {
                id: id.to_string(),
                title: "t".to_string(),
                channel: "c".to_string(),
                rank: 0,
            };
            let mock = MockCatalog::new(Catalog::YouTube)
                .with_results("q", vec![candidate("a"), candidate("b"), candidate("c")]);
            let results = mock.search_catalog("q", &token(), 2).await.unwrap();
            assert_eq!(results.len(), 2);
            assert!(mock.search_catalog("other", &token(), 2).await.unwrap().is_empty());
            assert_eq!(mock.searches(), vec!["q".to_string(), "other".to_string()]);
        }

        #[tokio::test]
        async fn test_mock_append_error() {
            let mock = MockCatalog::new(Catalog::Spotify)
                .with_append_error("bad", ProviderError::Network("timeout".to_string()));
            assert!(mock.append_item("p", "good", &token()).await.is_ok());
            let result = mock.append_item("p", "bad", &token()).await;
            assert!(matches!(result, Err(ProviderError::Network(_))));
            assert_eq!(mock.appended(), vec!["good".to_string()]);
        }
    }
}
