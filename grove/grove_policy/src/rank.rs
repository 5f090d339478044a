//! Rank ladders.
//!
//! Rank is declaration order: the later a group is declared, the higher it
//! ranks. Ladders name a subset of groups to move identities along.

use grove_core::{Group, Ladder, User};

use crate::definitions::Definitions;

/// Answers rank questions against one snapshot of the definitions.
pub struct RankResolver<'a> {
    definitions: &'a Definitions,
}

impl<'a> RankResolver<'a> {
    pub fn new(definitions: &'a Definitions) -> Self {
        Self { definitions }
    }

    /// The member of `groups` declared last.
    ///
    /// When none of `groups` is declared at all, the first of them is
    /// returned; `None` only for an empty slice.
    pub fn highest_ranked(&self, groups: &[&'a Group]) -> Option<&'a Group> {
        self.definitions
            .groups()
            .iter()
            .rev()
            .find_map(|declared| groups.iter().copied().find(|g| *g == declared))
            .or_else(|| groups.first().copied())
    }

    /// The highest-ranked of the named groups, ignoring unknown names.
    pub fn highest_ranked_name<S: AsRef<str>>(&self, names: &[S]) -> Option<&'a Group> {
        self.highest_ranked(&self.definitions.groups_named(names))
    }

    /// The group one rung above the user's highest-ranked group on `ladder`.
    ///
    /// Rank here is taken over every group the user holds, whatever context
    /// they apply in. `None` when the user holds no known group, when that
    /// group is not on the ladder, or when it is already at the top.
    pub fn find_promotion(&self, user: &User, ladder: &Ladder) -> Option<&'a Group> {
        let current = self.highest_ranked_name(&user.groups)?;
        let target = ladder.above(&current.name)?;
        self.definitions.group(target)
    }

    /// The group one rung below the user's highest-ranked group on `ladder`.
    pub fn find_demotion(&self, user: &User, ladder: &Ladder) -> Option<&'a Group> {
        let current = self.highest_ranked_name(&user.groups)?;
        let target = ladder.below(&current.name)?;
        self.definitions.group(target)
    }

    /// The first declared ladder that has `group` on it.
    pub fn first_ladder_with_group(&self, group: &Group) -> Option<&'a Ladder> {
        self.definitions
            .ladders()
            .iter()
            .find(|ladder| ladder.contains(&group.name))
    }
}
