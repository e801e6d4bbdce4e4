//! Namespaced Cache Families
//!
//! Typed wrappers that partition the keyspace by prefix and give each
//! family a fixed TTL. Only the artwork family cascades: changing an artwork
//! makes gallery listings and search results stale.

use std::fmt::Display;
use std::future::Future;
use std::str::FromStr;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};
use tracing::{info, warn};

use crate::cache::CacheManager;
use crate::error::CacheError;

// == Cache Family ==
/// A namespaced partition of the keyspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheFamily {
    Artwork,
    Gallery,
    Analytics,
    Comments,
    Reactions,
    Search,
    Meta,
}

impl CacheFamily {
    pub const ALL: [CacheFamily; 7] = [
        CacheFamily::Artwork,
        CacheFamily::Gallery,
        CacheFamily::Analytics,
        CacheFamily::Comments,
        CacheFamily::Reactions,
        CacheFamily::Search,
        CacheFamily::Meta,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CacheFamily::Artwork => "artwork",
            CacheFamily::Gallery => "gallery",
            CacheFamily::Analytics => "analytics",
            CacheFamily::Comments => "comments",
            CacheFamily::Reactions => "reactions",
            CacheFamily::Search => "search",
            CacheFamily::Meta => "meta",
        }
    }

    /// Key prefix, e.g. `artwork:`.
    pub fn prefix(self) -> &'static str {
        match self {
            CacheFamily::Artwork => "artwork:",
            CacheFamily::Gallery => "gallery:",
            CacheFamily::Analytics => "analytics:",
            CacheFamily::Comments => "comments:",
            CacheFamily::Reactions => "reactions:",
            CacheFamily::Search => "search:",
            CacheFamily::Meta => "meta:",
        }
    }

    /// Invalidation pattern covering the whole family.
    pub fn pattern(self) -> String {
        format!("{}*", self.prefix())
    }

    pub fn key(self, id: impl Display) -> String {
        format!("{}{}", self.prefix(), id)
    }
}

impl FromStr for CacheFamily {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CacheFamily::ALL
            .into_iter()
            .find(|family| family.name() == s)
            .ok_or_else(|| CacheError::NotFound(format!("cache family '{}'", s)))
    }
}

// == Durations Table ==
/// TTL in seconds per family. Fixed once the families are built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheDurations {
    pub artwork: u64,
    pub gallery: u64,
    pub analytics: u64,
    pub comments: u64,
    pub reactions: u64,
    pub search: u64,
    /// Long-lived static data; also used for the meta family
    pub static_content: u64,
}

impl Default for CacheDurations {
    fn default() -> Self {
        Self {
            artwork: 86_400,
            gallery: 7_200,
            analytics: 300,
            comments: 900,
            reactions: 1_800,
            search: 1_800,
            static_content: 604_800,
        }
    }
}

impl CacheDurations {
    pub fn ttl_for(&self, family: CacheFamily) -> u64 {
        match family {
            CacheFamily::Artwork => self.artwork,
            CacheFamily::Gallery => self.gallery,
            CacheFamily::Analytics => self.analytics,
            CacheFamily::Comments => self.comments,
            CacheFamily::Reactions => self.reactions,
            CacheFamily::Search => self.search,
            CacheFamily::Meta => self.static_content,
        }
    }
}

// == Family Cache ==
/// One family bound to the shared manager.
#[derive(Debug, Clone)]
pub struct FamilyCache {
    manager: Arc<CacheManager>,
    family: CacheFamily,
    ttl: u64,
}

impl FamilyCache {
    pub fn new(manager: Arc<CacheManager>, family: CacheFamily, ttl: u64) -> Self {
        Self {
            manager,
            family,
            ttl,
        }
    }

    pub fn family(&self) -> CacheFamily {
        self.family
    }

    pub fn ttl(&self) -> u64 {
        self.ttl
    }

    pub fn key(&self, id: impl Display) -> String {
        self.family.key(id)
    }

    pub async fn get<T: DeserializeOwned>(&self, id: impl Display) -> Option<T> {
        self.manager.get(&self.key(id)).await
    }

    pub async fn set<T: Serialize + ?Sized>(&self, id: impl Display, value: &T) -> bool {
        self.manager.set(&self.key(id), value, self.ttl).await
    }

    pub async fn get_or_set<T, F, Fut, E>(&self, id: impl Display, fetch: F) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.manager.get_or_set(&self.key(id), fetch, self.ttl).await
    }

    /// Deletes a single entry. Does not cascade.
    pub async fn invalidate(&self, id: impl Display) -> bool {
        self.manager.delete(&self.key(id)).await
    }

    /// Removes every entry in this family.
    pub async fn invalidate_all(&self) -> usize {
        self.manager.invalidate_pattern(&self.family.pattern()).await
    }
}

// == Artwork ==
/// Outcome of [`ArtworkCache::invalidate_artwork`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ArtworkInvalidation {
    pub artwork_deleted: bool,
    pub gallery_keys: usize,
    pub search_keys: usize,
}

#[derive(Debug, Clone)]
pub struct ArtworkCache {
    artworks: FamilyCache,
    gallery: FamilyCache,
    search: FamilyCache,
}

impl ArtworkCache {
    pub async fn get_artwork<T: DeserializeOwned>(&self, id: impl Display) -> Option<T> {
        self.artworks.get(id).await
    }

    pub async fn set_artwork<T: Serialize + ?Sized>(&self, id: impl Display, artwork: &T) -> bool {
        self.artworks.set(id, artwork).await
    }

    /// Drops the artwork entry, then every gallery listing and search result.
    pub async fn invalidate_artwork(&self, id: impl Display) -> ArtworkInvalidation {
        let key = self.artworks.key(&id);
        let artwork_deleted = self.artworks.invalidate(&id).await;
        let gallery_keys = self.gallery.invalidate_all().await;
        let search_keys = self.search.invalidate_all().await;

        info!(
            "invalidated {} (+{} gallery, +{} search keys)",
            key, gallery_keys, search_keys
        );
        ArtworkInvalidation {
            artwork_deleted,
            gallery_keys,
            search_keys,
        }
    }

    pub fn family(&self) -> &FamilyCache {
        &self.artworks
    }
}

// == Gallery ==
/// Gallery listings keyed by category or page descriptor.
#[derive(Debug, Clone)]
pub struct GalleryCache(FamilyCache);

impl GalleryCache {
    pub async fn get_gallery<T: DeserializeOwned>(&self, key: impl Display) -> Option<T> {
        self.0.get(key).await
    }

    pub async fn set_gallery<T: Serialize + ?Sized>(&self, key: impl Display, listing: &T) -> bool {
        self.0.set(key, listing).await
    }

    pub fn family(&self) -> &FamilyCache {
        &self.0
    }
}

// == Analytics ==
#[derive(Debug, Clone)]
pub struct AnalyticsCache(FamilyCache);

impl AnalyticsCache {
    pub async fn get_analytics<T: DeserializeOwned>(&self, key: impl Display) -> Option<T> {
        self.0.get(key).await
    }

    pub async fn set_analytics<T: Serialize + ?Sized>(&self, key: impl Display, data: &T) -> bool {
        self.0.set(key, data).await
    }

    pub fn family(&self) -> &FamilyCache {
        &self.0
    }
}

// == Community ==
/// Comment threads keyed by artwork id.
#[derive(Debug, Clone)]
pub struct CommentsCache(FamilyCache);

impl CommentsCache {
    pub async fn get_comments<T: DeserializeOwned>(&self, artwork_id: impl Display) -> Option<T> {
        self.0.get(artwork_id).await
    }

    pub async fn set_comments<T: Serialize + ?Sized>(
        &self,
        artwork_id: impl Display,
        comments: &T,
    ) -> bool {
        self.0.set(artwork_id, comments).await
    }

    pub async fn invalidate_comments(&self, artwork_id: impl Display) -> bool {
        self.0.invalidate(artwork_id).await
    }

    pub fn family(&self) -> &FamilyCache {
        &self.0
    }
}

/// Reaction tallies keyed by artwork id.
#[derive(Debug, Clone)]
pub struct ReactionsCache(FamilyCache);

impl ReactionsCache {
    pub async fn get_reactions<T: DeserializeOwned>(&self, artwork_id: impl Display) -> Option<T> {
        self.0.get(artwork_id).await
    }

    pub async fn set_reactions<T: Serialize + ?Sized>(
        &self,
        artwork_id: impl Display,
        reactions: &T,
    ) -> bool {
        self.0.set(artwork_id, reactions).await
    }

    pub async fn invalidate_reactions(&self, artwork_id: impl Display) -> bool {
        self.0.invalidate(artwork_id).await
    }

    pub fn family(&self) -> &FamilyCache {
        &self.0
    }
}

// == Search ==
/// Search results keyed by a hash of the query and its filters.
#[derive(Debug, Clone)]
pub struct SearchCache(FamilyCache);

impl SearchCache {
    /// Hex SHA-256 of the query and the canonical JSON of `filters`.
    pub fn search_key<F: Serialize + ?Sized>(query: &str, filters: &F) -> String {
        let filters = serde_json::to_value(filters).unwrap_or_else(|e| {
            warn!("search filters not serializable, hashing query only: {}", e);
            Value::Null
        });

        let mut hasher = Sha256::new();
        hasher.update(query.trim().as_bytes());
        hasher.update(b"|");
        hasher.update(filters.to_string().as_bytes());
        hex::encode(hasher.finalize())
    }

    pub async fn get_results<T, F>(&self, query: &str, filters: &F) -> Option<T>
    where
        T: DeserializeOwned,
        F: Serialize + ?Sized,
    {
        self.0.get(Self::search_key(query, filters)).await
    }

    pub async fn set_results<T, F>(&self, query: &str, filters: &F, results: &T) -> bool
    where
        T: Serialize + ?Sized,
        F: Serialize + ?Sized,
    {
        self.0.set(Self::search_key(query, filters), results).await
    }

    pub fn family(&self) -> &FamilyCache {
        &self.0
    }
}

// == Families Bundle ==
/// Every family handle, built from one shared manager and durations table.
#[derive(Debug, Clone)]
pub struct CacheFamilies {
    pub artwork: ArtworkCache,
    pub gallery: GalleryCache,
    pub analytics: AnalyticsCache,
    pub comments: CommentsCache,
    pub reactions: ReactionsCache,
    pub search: SearchCache,
    pub meta: FamilyCache,
    durations: CacheDurations,
    manager: Arc<CacheManager>,
}

impl CacheFamilies {
    pub fn new(manager: Arc<CacheManager>, durations: CacheDurations) -> Self {
        let family = |f: CacheFamily| FamilyCache::new(manager.clone(), f, durations.ttl_for(f));

        Self {
            artwork: ArtworkCache {
                artworks: family(CacheFamily::Artwork),
                gallery: family(CacheFamily::Gallery),
                search: family(CacheFamily::Search),
            },
            gallery: GalleryCache(family(CacheFamily::Gallery)),
            analytics: AnalyticsCache(family(CacheFamily::Analytics)),
            comments: CommentsCache(family(CacheFamily::Comments)),
            reactions: ReactionsCache(family(CacheFamily::Reactions)),
            search: SearchCache(family(CacheFamily::Search)),
            meta: family(CacheFamily::Meta),
            durations,
            manager,
        }
    }

    /// Handle for any family by enum.
    pub fn family(&self, family: CacheFamily) -> &FamilyCache {
        match family {
            CacheFamily::Artwork => self.artwork.family(),
            CacheFamily::Gallery => self.gallery.family(),
            CacheFamily::Analytics => self.analytics.family(),
            CacheFamily::Comments => self.comments.family(),
            CacheFamily::Reactions => self.reactions.family(),
            CacheFamily::Search => self.search.family(),
            CacheFamily::Meta => &self.meta,
        }
    }

    pub fn durations(&self) -> &CacheDurations {
        &self.durations
    }

    pub fn manager(&self) -> &Arc<CacheManager> {
        &self.manager
    }
}
