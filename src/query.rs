//! Tree queries over a sentence index
//!
//! Ancestor paths follow `governor` links; descendant sets follow `children`.
//! Both work purely on token keys, so they stay valid after pruning as long
//! as the caller re-queries instead of reusing earlier results.

use rustc_hash::FxHashSet;
use thiserror::Error;
use tracing::debug;

use crate::index::SentenceIndex;
use crate::key::{ROOT, TokenId};

/// Error raised when the governor links do not form a tree
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("Query error: governor cycle reached token {key} twice")]
    Cycle { key: TokenId },
}

/// Least common ancestor of two tokens and the path connecting them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommonNode {
    pub common: TokenId,
    /// Unsorted: the climb from the second token up to `common`, then the
    /// climb from the first token stopping short of it
    pub path: Vec<TokenId>,
}

impl SentenceIndex {
    /// Keys from `id` up to its root token, following governors
    ///
    /// The virtual root is not included unless `id` is 0 itself. A key not in
    /// the index yields an empty path.
    pub fn path_to_root(&self, id: TokenId) -> Result<Vec<TokenId>, QueryError> {
        if id == ROOT {
            return Ok(vec![ROOT]);
        }
        let Some(mut token) = self.tokens.get(&id) else {
            return Ok(Vec::new());
        };

        let mut path = vec![id];
        let mut seen = FxHashSet::default();
        seen.insert(id);

        while token.governor != ROOT {
            let governor = token.governor;
            if !seen.insert(governor) {
                return Err(QueryError::Cycle { key: governor });
            }
            path.push(governor);
            match self.tokens.get(&governor) {
                Some(next) => token = next,
                None => break,
            }
        }

        Ok(path)
    }

    /// Least common ancestor of `a` and `b` and the shortest path between them
    ///
    /// Scans the path of `b` outermost and the path of `a` innermost; the first
    /// shared key wins. Returns `None` when either key is absent or the two
    /// tokens hang off different roots.
    pub fn least_common_node(
        &self,
        a: TokenId,
        b: TokenId,
    ) -> Result<Option<CommonNode>, QueryError> {
        let outer = self.path_to_root(b)?;
        let inner = self.path_to_root(a)?;

        let Some(common) = outer.iter().copied().find(|i| inner.contains(i)) else {
            return Ok(None);
        };

        let mut path = Vec::with_capacity(outer.len() + inner.len());
        for &i in &outer {
            path.push(i);
            if i == common {
                break;
            }
        }
        path.extend(inner.iter().copied().take_while(|&i| i != common));

        Ok(Some(CommonNode { common, path }))
    }

    /// `id` and every token reachable from it through `children`, in pre-order
    ///
    /// Returns an empty list for a key not in the index; 0 yields every
    /// attached token after the root itself.
    pub fn descendants(&self, id: TokenId) -> Vec<TokenId> {
        if id != ROOT && !self.tokens.contains_key(&id) {
            return Vec::new();
        }

        let mut found = Vec::new();
        let mut seen = FxHashSet::default();
        let mut stack = vec![id];

        while let Some(current) = stack.pop() {
            if !seen.insert(current) {
                continue;
            }
            found.push(current);
            stack.extend(self.children(current).iter().rev());
        }

        found
    }

    /// Remove `id` and all its descendants
    ///
    /// Irreversible. Afterwards no token or child list refers to a removed
    /// key; markup fragments are left in place. Returns the removed keys.
    pub fn prune(&mut self, id: TokenId) -> Vec<TokenId> {
        let removed = self.descendants(id);
        if removed.is_empty() {
            return removed;
        }

        if let Some(governor) = self.tokens.get(&id).map(|t| t.governor) {
            if let Some(siblings) = self.children.get_mut(&governor) {
                siblings.retain(|&child| child != id);
            }
        }

        for key in &removed {
            self.tokens.remove(key);
            self.children.remove(key);
        }
        if id == ROOT {
            self.children.clear();
        }

        debug!(root = id, removed = removed.len(), "pruned subtree");
        removed
    }

    /// Check that governor links over the remaining tokens form a tree
    ///
    /// Every governor is 0 or a present token, every chain reaches 0, and
    /// each child list matches the governor links exactly.
    pub fn check_tree(&self) -> Result<(), TreeViolation> {
        for (&id, token) in &self.tokens {
            if token.governor != ROOT && !self.tokens.contains_key(&token.governor) {
                return Err(TreeViolation::DanglingGovernor {
                    key: id,
                    governor: token.governor,
                });
            }
            if !self.children(token.governor).contains(&id) {
                return Err(TreeViolation::ChildListMismatch { key: id });
            }
            if let Err(QueryError::Cycle { key }) = self.path_to_root(id) {
                return Err(TreeViolation::Cycle { key });
            }
        }

        for (&governor, children) in &self.children {
            if governor != ROOT && !self.tokens.contains_key(&governor) {
                return Err(TreeViolation::StaleChildList { key: governor });
            }
            for child in children {
                match self.tokens.get(child) {
                    Some(token) if token.governor == governor => {}
                    _ => return Err(TreeViolation::ChildListMismatch { key: *child }),
                }
            }
        }

        Ok(())
    }
}

/// Ways an index can fail [`SentenceIndex::check_tree`]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreeViolation {
    #[error("token {key} points at missing governor {governor}")]
    DanglingGovernor { key: TokenId, governor: TokenId },

    #[error("child lists disagree with the governor of token {key}")]
    ChildListMismatch { key: TokenId },

    #[error("child list kept for removed token {key}")]
    StaleChildList { key: TokenId },

    #[error("governor cycle through token {key}")]
    Cycle { key: TokenId },
}
