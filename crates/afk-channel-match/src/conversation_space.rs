use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
/// Platform identifier of a conversation space. Stable for the process lifetime.
pub struct SpaceId(u64);

impl SpaceId {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for SpaceId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for SpaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// Enumerates supported `SpaceKind` values.
pub enum SpaceKind {
    Plain,
    Thread,
    Forum,
}

impl SpaceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::Thread => "thread",
            Self::Forum => "forum",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryLabel {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Snapshot of one conversation space and its ancestors.
///
/// `parent` is a copy of the parent space taken when the snapshot was built;
/// chains are finite and acyclic.
pub struct ConversationSpace {
    pub id: SpaceId,
    pub name: String,
    pub kind: SpaceKind,
    pub category: Option<CategoryLabel>,
    pub parent: Option<Box<ConversationSpace>>,
}

impl ConversationSpace {
    pub fn plain(id: impl Into<SpaceId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: SpaceKind::Plain,
            category: None,
            parent: None,
        }
    }

    pub fn forum(id: impl Into<SpaceId>, name: impl Into<String>) -> Self {
        Self {
            kind: SpaceKind::Forum,
            ..Self::plain(id, name)
        }
    }

    pub fn thread(
        id: impl Into<SpaceId>,
        name: impl Into<String>,
        parent: ConversationSpace,
    ) -> Self {
        Self {
            kind: SpaceKind::Thread,
            parent: Some(Box::new(parent)),
            ..Self::plain(id, name)
        }
    }

    pub fn with_category(mut self, name: impl Into<String>) -> Self {
        self.category = Some(CategoryLabel { name: name.into() });
        self
    }

    pub fn parent(&self) -> Option<&ConversationSpace> {
        self.parent.as_deref()
    }

    pub fn is_forum_thread(&self) -> bool {
        self.kind == SpaceKind::Thread
            && self
                .parent()
                .is_some_and(|parent| parent.kind == SpaceKind::Forum)
    }

    pub fn kind_label(&self) -> &'static str {
        match self.kind {
            SpaceKind::Thread if self.is_forum_thread() => "Forum Thread",
            SpaceKind::Thread => "Thread",
            SpaceKind::Forum => "Forum",
            SpaceKind::Plain => "Text Channel",
        }
    }

    /// Number of ancestors reachable through `parent`.
    pub fn parent_chain_len(&self) -> usize {
        let mut depth = 0;
        let mut cursor = self.parent();
        while let Some(parent) = cursor {
            depth += 1;
            cursor = parent.parent();
        }
        depth
    }
}

#[cfg(test)]
mod tests {
    use super::{ConversationSpace, SpaceId};

    #[test]
    fn unit_kind_label_distinguishes_forum_threads() {
        let forum = ConversationSpace::forum(1_u64, "Help Desk");
        let channel = ConversationSpace::plain(2_u64, "general").with_category("Community");
        assert_eq!(forum.kind_label(), "Forum");
        assert_eq!(channel.kind_label(), "Text Channel");
        assert_eq!(
            ConversationSpace::thread(3_u64, "my question", forum).kind_label(),
            "Forum Thread"
        );
        assert_eq!(
            ConversationSpace::thread(4_u64, "side chat", channel).kind_label(),
            "Thread"
        );
    }

    #[test]
    fn unit_parent_chain_len_counts_ancestors() {
        let channel = ConversationSpace::plain(2_u64, "general");
        assert_eq!(channel.parent_chain_len(), 0);
        let thread = ConversationSpace::thread(3_u64, "t", channel);
        assert_eq!(thread.parent_chain_len(), 1);
        assert_eq!(SpaceId::new(42).to_string(), "42");
    }
}
