//! Picking target surfaces out of a world catalog by name pattern and tags.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::geometry::Aabb;
use crate::sampling::ActorBounds;
use crate::scatter::request::Region;
use crate::surface::SurfaceId;

/// How the name and tag rules combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MatchBy {
    NameAndTags,
    #[default]
    NameOrTags,
}

/// A world actor as seen by the selector.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SurfaceActor {
    pub id: SurfaceId,
    pub name: String,
    pub tags: Vec<String>,
    pub bounds: Aabb,
}

impl SurfaceActor {
    pub fn new(id: SurfaceId, name: impl Into<String>, bounds: Aabb) -> Self {
        Self {
            id,
            name: name.into(),
            tags: Vec::new(),
            bounds,
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }
}

/// Name/tag rule set. An empty pattern or empty tag list never matches on its own.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SurfaceSelector {
    pub match_by: MatchBy,
    pub name_pattern: String,
    pub tags: Vec<String>,
    /// Require the whole name to equal the pattern instead of containing it.
    pub exact_name: bool,
}

impl SurfaceSelector {
    pub fn new(match_by: MatchBy) -> Self {
        Self {
            match_by,
            ..Default::default()
        }
    }

    pub fn with_name_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.name_pattern = pattern.into();
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_exact_name(mut self, exact: bool) -> Self {
        self.exact_name = exact;
        self
    }

    fn matches_name(&self, actor: &SurfaceActor) -> bool {
        if self.name_pattern.is_empty() {
            return false;
        }
        if self.exact_name {
            actor.name == self.name_pattern
        } else {
            actor.name.contains(&self.name_pattern)
        }
    }

    fn matches_tags(&self, actor: &SurfaceActor) -> bool {
        !self.tags.is_empty() && self.tags.iter().all(|t| actor.tags.contains(t))
    }

    pub fn matches(&self, actor: &SurfaceActor) -> bool {
        match self.match_by {
            MatchBy::NameAndTags => self.matches_name(actor) && self.matches_tags(actor),
            MatchBy::NameOrTags => self.matches_name(actor) || self.matches_tags(actor),
        }
    }

    /// Matching actors in catalog order.
    pub fn select<'a>(&self, catalog: &'a [SurfaceActor]) -> Vec<&'a SurfaceActor> {
        catalog.iter().filter(|a| self.matches(a)).collect()
    }

    /// Ids of matching actors, for use as a target surface set.
    pub fn target_surfaces(&self, catalog: &[SurfaceActor]) -> Vec<SurfaceId> {
        self.select(catalog).into_iter().map(|a| a.id).collect()
    }

    /// Footprints of matching actors as an actor-set region.
    pub fn actor_set(&self, catalog: &[SurfaceActor]) -> Region {
        Region::ActorSet(
            self.select(catalog)
                .into_iter()
                .map(|a| ActorBounds::new(a.id, a.bounds))
                .collect(),
        )
    }
}
