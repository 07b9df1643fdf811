use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                std::fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

id_newtype!(InstanceId);
id_newtype!(NewsId);

/// An installed modpack or profile as shown in the launcher library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instance {
    pub id: InstanceId,
    pub name: String,
    pub version: String,
    pub downloads: u64,
}

impl Instance {
    pub fn new(
        id: i64,
        name: impl Into<String>,
        version: impl Into<String>,
        downloads: u64,
    ) -> Self {
        Self {
            id: InstanceId(id),
            name: name.into(),
            version: version.into(),
            downloads,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
    pub id: NewsId,
    pub headline: String,
    pub blurb: String,
    pub source: String,
}

impl NewsItem {
    pub fn new(
        id: i64,
        headline: impl Into<String>,
        blurb: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            id: NewsId(id),
            headline: headline.into(),
            blurb: blurb.into(),
            source: source.into(),
        }
    }
}

/// Which of the two fetched lists an operation or event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListKind {
    Instances,
    News,
}

impl ListKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListKind::Instances => "instances",
            ListKind::News => "news",
        }
    }
}
