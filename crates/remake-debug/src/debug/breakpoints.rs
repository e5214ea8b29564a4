//! Per-target breakpoint registry.

#![allow(missing_docs)]

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use smol_str::SmolStr;
use tracing::debug;

use crate::error::DebugError;

use super::{BreakpointMask, EventPoint, TargetId};

/// A breakpoint on one target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breakpoint {
    pub target: TargetId,
    pub name: SmolStr,
    pub mask: BreakpointMask,
    /// Removed the first time it matches.
    pub temporary: bool,
}

#[derive(Debug, Clone)]
struct TargetBreakpoints {
    name: SmolStr,
    permanent: BreakpointMask,
    temporary: BreakpointMask,
}

impl TargetBreakpoints {
    fn is_empty(&self) -> bool {
        self.permanent.is_empty() && self.temporary.is_empty()
    }
}

/// Breakpoints indexed by target identity.
///
/// Each target holds at most one permanent and one temporary breakpoint;
/// adding another of the same kind unions the masks.
#[derive(Debug, Clone, Default)]
pub struct Breakpoints {
    targets: IndexMap<TargetId, TargetBreakpoints, FxBuildHasher>,
}

impl Breakpoints {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a breakpoint on `target` for the events in `mask`.
    pub fn add(
        &mut self,
        target: TargetId,
        name: impl Into<SmolStr>,
        mask: BreakpointMask,
        temporary: bool,
    ) -> Result<(), DebugError> {
        if mask.is_empty() {
            return Err(DebugError::EmptyBreakpointMask);
        }
        let entry = self
            .targets
            .entry(target)
            .or_insert_with(|| TargetBreakpoints {
                name: name.into(),
                permanent: BreakpointMask::empty(),
                temporary: BreakpointMask::empty(),
            });
        if temporary {
            entry.temporary |= mask;
        } else {
            entry.permanent |= mask;
        }
        debug!(target = %entry.name, mask = ?mask, temporary, "breakpoint added");
        Ok(())
    }

    /// Breakpoints on `target` that stop at `event`.
    ///
    /// A matched temporary breakpoint is removed before this returns.
    pub fn match_event(&mut self, target: TargetId, event: EventPoint) -> Vec<Breakpoint> {
        let Some(entry) = self.targets.get_mut(&target) else {
            return Vec::new();
        };
        let bit = event.mask();
        let mut matched = Vec::new();
        if entry.permanent.contains(bit) {
            matched.push(Breakpoint {
                target,
                name: entry.name.clone(),
                mask: entry.permanent,
                temporary: false,
            });
        }
        if entry.temporary.contains(bit) {
            matched.push(Breakpoint {
                target,
                name: entry.name.clone(),
                mask: entry.temporary,
                temporary: true,
            });
            entry.temporary = BreakpointMask::empty();
            debug!(target = %entry.name, %event, "temporary breakpoint consumed");
        }
        if entry.is_empty() {
            self.targets.shift_remove(&target);
        }
        matched
    }

    /// Remove the events in `mask` from every breakpoint on `target`.
    ///
    /// Returns whether anything was removed.
    pub fn clear(&mut self, target: TargetId, mask: BreakpointMask) -> bool {
        let Some(entry) = self.targets.get_mut(&target) else {
            return false;
        };
        let removed = entry.permanent.intersects(mask) || entry.temporary.intersects(mask);
        entry.permanent.remove(mask);
        entry.temporary.remove(mask);
        if entry.is_empty() {
            self.targets.shift_remove(&target);
        }
        removed
    }

    pub fn clear_all(&mut self) {
        self.targets.clear();
    }

    /// Union of the unfired masks on `target`.
    #[must_use]
    pub fn effective_mask(&self, target: TargetId) -> BreakpointMask {
        self.targets
            .get(&target)
            .map_or(BreakpointMask::empty(), |entry| {
                entry.permanent | entry.temporary
            })
    }

    /// Every installed breakpoint, in installation order.
    pub fn iter(&self) -> impl Iterator<Item = Breakpoint> + '_ {
        self.targets.iter().flat_map(|(target, entry)| {
            let permanent = (!entry.permanent.is_empty()).then(|| Breakpoint {
                target: *target,
                name: entry.name.clone(),
                mask: entry.permanent,
                temporary: false,
            });
            let temporary = (!entry.temporary.is_empty()).then(|| Breakpoint {
                target: *target,
                name: entry.name.clone(),
                mask: entry.temporary,
                temporary: true,
            });
            permanent.into_iter().chain(temporary)
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}
