use async_trait::async_trait;
use shared::domain::{Instance, NewsItem};

use crate::error::FetchError;

/// Where the launcher gets its instance library and news feed from.
///
/// Implementations return the complete current list in the order the
/// backend reports it; the state container replaces its copy wholesale.
#[async_trait]
pub trait DataSource: Send + Sync {
    async fn list_instances(&self) -> Result<Vec<Instance>, FetchError>;
    async fn list_news(&self) -> Result<Vec<NewsItem>, FetchError>;
}

/// Offline source serving a fixed library and news feed.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlaceholderDataSource;

impl PlaceholderDataSource {
    pub fn instances() -> Vec<Instance> {
        vec![
            Instance::new(1, "Fabulously Optimized", "1.18.1", 10),
            Instance::new(2, "New Caves", "1.18 ", 8),
            Instance::new(3, "All the Mods 6", "1.16.5", 4),
            Instance::new(4, "Bees", "1.15.2", 9),
            Instance::new(5, "SkyFactory 4", "1.12.2", 1000),
            Instance::new(6, "RLCraft", "1.12.2", 10000),
            Instance::new(7, "Regrowth", "1.7.10", 1000),
        ]
    }

    pub fn news() -> Vec<NewsItem> {
        vec![
            NewsItem::new(
                1,
                "Caves & Cliffs Update: Part II Dev Q&A",
                "Your questions, answered!",
                "From Minecraft.Net",
            ),
            NewsItem::new(
                2,
                "Project of the WeeK: Gobblygook",
                "Your questions, answered!",
                "Modrinth Blog",
            ),
        ]
    }
}

#[async_trait]
impl DataSource for PlaceholderDataSource {
    async fn list_instances(&self) -> Result<Vec<Instance>, FetchError> {
        Ok(Self::instances())
    }

    async fn list_news(&self) -> Result<Vec<NewsItem>, FetchError> {
        Ok(Self::news())
    }
}

/// Stand-in used when no backend is configured; every fetch fails.
pub struct MissingDataSource;

#[async_trait]
impl DataSource for MissingDataSource {
    async fn list_instances(&self) -> Result<Vec<Instance>, FetchError> {
        Err(FetchError::Unavailable(
            "no instance backend configured".into(),
        ))
    }

    async fn list_news(&self) -> Result<Vec<NewsItem>, FetchError> {
        Err(FetchError::Unavailable("no news backend configured".into()))
    }
}
