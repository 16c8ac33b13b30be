//! Achievement catalog
//!
//! The catalog is static for a session: built in, or loaded once from a TOML
//! file of `[[achievement]]` tables at startup.

use crate::effect::Icon;
use crate::error::{KudosError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rarity::Common => "common",
            Rarity::Rare => "rare",
            Rarity::Epic => "epic",
            Rarity::Legendary => "legendary",
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Achievement {
    #[serde(default)]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub rarity: Rarity,
    #[serde(default)]
    pub points: u32,
    #[serde(default)]
    pub icon: Icon,
}

impl Achievement {
    pub fn new(id: &str, title: &str, description: &str, rarity: Rarity, points: u32, icon: Icon) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            rarity,
            points,
            icon,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default, rename = "achievement")]
    achievements: Vec<Achievement>,
}

/// Immutable, id-indexed list of achievements. Iteration keeps file order.
#[derive(Debug, Clone, Default)]
pub struct AchievementCatalog {
    achievements: Vec<Achievement>,
    index: HashMap<String, usize>,
}

impl AchievementCatalog {
    /// Rejects empty or duplicate ids.
    pub fn from_achievements(achievements: Vec<Achievement>) -> Result<Self> {
        let mut index = HashMap::with_capacity(achievements.len());
        for (i, a) in achievements.iter().enumerate() {
            if a.id.trim().is_empty() {
                return Err(KudosError::MissingAchievementId);
            }
            if index.insert(a.id.clone(), i).is_some() {
                return Err(KudosError::DuplicateAchievement(a.id.clone()));
            }
        }
        Ok(Self {
            achievements,
            index,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: CatalogFile = toml::from_str(content)?;
        Self::from_achievements(file.achievements)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| KudosError::CatalogIo {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_toml_str(&content)?;
        tracing::info!(
            "Loaded {} achievements from {}",
            catalog.len(),
            path.display()
        );
        Ok(catalog)
    }

    /// The portal's stock achievements.
    pub fn builtin() -> Self {
        let achievements = vec![
            Achievement::new("first_login", "First Steps", "Successfully logged in for the first time", Rarity::Common, 10, Icon::Star),
            Achievement::new("first_post", "Community Starter", "Created your first community post", Rarity::Common, 25, Icon::Sparkles),
            Achievement::new("helpful_user", "Helpful Soul", "Received 10 helpful votes", Rarity::Rare, 50, Icon::Heart),
            Achievement::new("week_streak", "Week Warrior", "7 consecutive days of activity", Rarity::Rare, 75, Icon::Flame),
            Achievement::new("content_creator", "Content Creator", "Created 5 valuable resources", Rarity::Epic, 100, Icon::Award),
            Achievement::new("community_leader", "Community Leader", "100 likes on your posts", Rarity::Legendary, 200, Icon::Crown),
        ];
        let index = achievements
            .iter()
            .enumerate()
            .map(|(i, a)| (a.id.clone(), i))
            .collect();
        Self {
            achievements,
            index,
        }
    }

    pub fn get(&self, id: &str) -> Option<&Achievement> {
        self.index.get(id).map(|&i| &self.achievements[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Achievement> {
        self.achievements.iter()
    }

    pub fn len(&self) -> usize {
        self.achievements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.achievements.is_empty()
    }
}
