//! Target graph, variables, and expansion.

#![allow(missing_docs)]

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use smol_str::SmolStr;

use crate::debug::{BuildEngine, Scope, TargetId, VariableOrigin};

const MAX_EXPANSION_DEPTH: u32 = 32;

type VariableMap = IndexMap<SmolStr, Variable, FxBuildHasher>;

/// A variable definition. Values are expanded when referenced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    pub value: String,
    pub origin: VariableOrigin,
}

/// A target with its prerequisites and recipe.
#[derive(Debug, Clone, Default)]
pub struct TargetRule {
    pub prerequisites: Vec<SmolStr>,
    pub recipe: Vec<String>,
    pub variables: IndexMap<SmolStr, Variable, FxBuildHasher>,
    /// The recipe reports failure when run.
    pub fails: bool,
}

impl TargetRule {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_prerequisites<I, S>(mut self, prerequisites: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SmolStr>,
    {
        self.prerequisites = prerequisites.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_recipe<I, S>(mut self, recipe: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.recipe = recipe.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_variable(mut self, name: impl Into<SmolStr>, value: impl Into<String>) -> Self {
        self.variables.insert(
            name.into(),
            Variable {
                value: value.into(),
                origin: VariableOrigin::File,
            },
        );
        self
    }

    #[must_use]
    pub fn failing(mut self) -> Self {
        self.fails = true;
        self
    }
}

/// In-memory build graph implementing [`BuildEngine`].
///
/// Target ids are insertion indices, so they stay stable as targets are added.
#[derive(Debug, Clone, Default)]
pub struct BuildGraph {
    targets: IndexMap<SmolStr, TargetRule, FxBuildHasher>,
    globals: VariableMap,
    stack: Vec<TargetId>,
}

impl BuildGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a target rule.
    pub fn add_target(&mut self, name: impl Into<SmolStr>, rule: TargetRule) -> TargetId {
        let (index, _) = self.targets.insert_full(name.into(), rule);
        id_from_index(index)
    }

    pub fn set_variable(&mut self, name: impl Into<SmolStr>, value: impl Into<String>) {
        self.globals.insert(
            name.into(),
            Variable {
                value: value.into(),
                origin: VariableOrigin::File,
            },
        );
    }

    #[must_use]
    pub fn rule(&self, target: TargetId) -> Option<&TargetRule> {
        self.targets
            .get_index(target.0 as usize)
            .map(|(_, rule)| rule)
    }

    /// Default goal: the first target defined.
    #[must_use]
    pub fn first_target(&self) -> Option<TargetId> {
        (!self.targets.is_empty()).then_some(TargetId(0))
    }

    #[must_use]
    pub fn target_count(&self) -> usize {
        self.targets.len()
    }

    /// Definition visible from `scope`, without expanding it.
    #[must_use]
    pub fn variable(&self, name: &str, scope: Scope) -> Option<&Variable> {
        if let Scope::Target(target) = scope {
            if let Some(variable) = self.rule(target).and_then(|rule| rule.variables.get(name)) {
                return Some(variable);
            }
        }
        self.globals.get(name)
    }

    pub(super) fn push_target(&mut self, target: TargetId) {
        self.stack.push(target);
    }

    pub(super) fn pop_target(&mut self, target: TargetId) {
        let popped = self.stack.pop();
        assert_eq!(popped, Some(target), "target stack out of balance");
    }

    pub(super) fn is_in_progress(&self, target: TargetId) -> bool {
        self.stack.contains(&target)
    }

    fn expand_into(&self, text: &str, scope: Scope, depth: u32, out: &mut String) {
        if depth > MAX_EXPANSION_DEPTH {
            tracing::warn!(text, "variable expansion too deep; left unexpanded");
            out.push_str(text);
            return;
        }
        let mut rest = text;
        while let Some(pos) = rest.find('$') {
            out.push_str(&rest[..pos]);
            let after = &rest[pos + 1..];
            let mut chars = after.chars();
            let Some(next) = chars.next() else {
                out.push('$');
                return;
            };
            let (name, consumed) = match next {
                '$' => {
                    out.push('$');
                    rest = &after[1..];
                    continue;
                }
                '(' | '{' => {
                    let close = if next == '(' { ')' } else { '}' };
                    match matching_close(&after[1..], next, close) {
                        Some(end) => (&after[1..=end], end + 2),
                        None => {
                            out.push_str(&rest[pos..]);
                            return;
                        }
                    }
                }
                other => (&after[..other.len_utf8()], other.len_utf8()),
            };
            rest = &after[consumed..];
            self.expand_reference(name, scope, depth, out);
        }
        out.push_str(rest);
    }

    fn expand_reference(&self, name: &str, scope: Scope, depth: u32, out: &mut String) {
        let mut expanded_name = String::new();
        self.expand_into(name, scope, depth + 1, &mut expanded_name);
        let name = expanded_name.trim();
        if name == "@" {
            if let Scope::Target(target) = scope {
                if let Some(target_name) = self.target_name(target) {
                    out.push_str(&target_name);
                }
            }
            return;
        }
        if let Some(variable) = self.variable(name, scope) {
            self.expand_into(&variable.value, scope, depth + 1, out);
        }
    }
}

/// Byte offset of the delimiter closing a reference opened with `open`.
fn matching_close(text: &str, open: char, close: char) -> Option<usize> {
    let mut depth = 0u32;
    for (offset, ch) in text.char_indices() {
        if ch == open {
            depth += 1;
        } else if ch == close {
            if depth == 0 {
                return Some(offset);
            }
            depth -= 1;
        }
    }
    None
}

fn id_from_index(index: usize) -> TargetId {
    TargetId(u32::try_from(index).unwrap_or(u32::MAX))
}

impl BuildEngine for BuildGraph {
    fn lookup_target(&self, name: &str) -> Option<TargetId> {
        self.targets.get_index_of(name).map(id_from_index)
    }

    fn target_name(&self, target: TargetId) -> Option<SmolStr> {
        self.targets
            .get_index(target.0 as usize)
            .map(|(name, _)| name.clone())
    }

    fn expand_variables(&self, text: &str, scope: Scope) -> String {
        let mut out = String::with_capacity(text.len());
        self.expand_into(text, scope, 0, &mut out);
        out
    }

    fn current_scope(&self) -> Scope {
        self.stack
            .last()
            .map_or(Scope::Global, |target| Scope::Target(*target))
    }

    fn define_variable(&mut self, name: &str, value: &str, origin: VariableOrigin, scope: Scope) {
        let variable = Variable {
            value: value.to_string(),
            origin,
        };
        match scope {
            Scope::Global => {
                self.globals.insert(SmolStr::new(name), variable);
            }
            Scope::Target(target) => {
                if let Some((_, rule)) = self.targets.get_index_mut(target.0 as usize) {
                    rule.variables.insert(SmolStr::new(name), variable);
                }
            }
        }
    }

    fn target_stack(&self) -> Vec<TargetId> {
        self.stack.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph() -> BuildGraph {
        let mut graph = BuildGraph::new();
        graph.set_variable("CC", "cc");
        graph.set_variable("CFLAGS", "-O2 $(EXTRA)");
        graph.set_variable("EXTRA", "-g");
        graph.set_variable("GOAL", "all");
        graph.add_target(
            "all",
            TargetRule::new()
                .with_prerequisites(["main.o"])
                .with_variable("CC", "clang"),
        );
        graph.add_target("main.o", TargetRule::new());
        graph
    }

    #[test]
    fn expands_nested_references() {
        let graph = graph();
        assert_eq!(
            graph.expand_variables("$(CC) ${CFLAGS} -c", Scope::Global),
            "cc -O2 -g -c"
        );
        assert_eq!(graph.expand_variables("cost $$5", Scope::Global), "cost $5");
        assert_eq!(graph.expand_variables("$(MISSING)x", Scope::Global), "x");
    }

    #[test]
    fn target_scope_shadows_global() {
        let graph = graph();
        let all = graph.lookup_target("all").unwrap();
        assert_eq!(graph.expand_variables("$(CC)", Scope::Target(all)), "clang");
        assert_eq!(graph.expand_variables("$@", Scope::Target(all)), "all");
        assert_eq!(graph.expand_variables("$@", Scope::Global), "");
    }

    #[test]
    fn self_reference_stops_at_depth_limit() {
        let mut graph = BuildGraph::new();
        graph.set_variable("LOOP", "x$(LOOP)");
        let expanded = graph.expand_variables("$(LOOP)", Scope::Global);
        assert!(expanded.starts_with("xxx"));
        assert!(expanded.contains("$(LOOP)"));
    }

    #[test]
    fn computed_names_expand_inner_reference_first() {
        let mut graph = graph();
        graph.set_variable("X", "lib");
        graph.set_variable("T_lib", "lib.a");
        assert_eq!(graph.expand_variables("$(T_$(X))", Scope::Global), "lib.a");
        assert_eq!(graph.expand_variables("${T_${X}}.o", Scope::Global), "lib.a.o");
        assert_eq!(graph.expand_variables("$(T_$(X)", Scope::Global), "$(T_$(X)");
    }

    #[test]
    fn unterminated_reference_is_literal() {
        let graph = graph();
        assert_eq!(graph.expand_variables("a $(CC", Scope::Global), "a $(CC");
        assert_eq!(graph.expand_variables("end $", Scope::Global), "end $");
    }

    #[test]
    fn current_scope_follows_stack() {
        let mut graph = graph();
        let all = graph.lookup_target("all").unwrap();
        let main = graph.lookup_target("main.o").unwrap();
        assert_eq!(graph.current_scope(), Scope::Global);
        graph.push_target(all);
        graph.push_target(main);
        assert_eq!(graph.current_scope(), Scope::Target(main));
        assert_eq!(graph.target_stack(), vec![all, main]);
        graph.pop_target(main);
        graph.pop_target(all);
        assert!(graph.target_stack().is_empty());
    }

    #[test]
    fn define_variable_records_origin() {
        let mut graph = graph();
        graph.define_variable("MAKEFLAGS", "", VariableOrigin::Debugger, Scope::Global);
        let variable = graph.variable("MAKEFLAGS", Scope::Global).unwrap();
        assert_eq!(variable.origin, VariableOrigin::Debugger);
        assert!(variable.value.is_empty());
    }

    #[test]
    fn lookup_resolves_names_to_stable_ids() {
        let mut graph = graph();
        let all = graph.lookup_target("all").unwrap();
        graph.add_target("clean", TargetRule::new());
        assert_eq!(graph.lookup_target("all"), Some(all));
        assert_eq!(graph.target_name(all).as_deref(), Some("all"));
        assert_eq!(graph.lookup_target("nope"), None);
        assert_eq!(graph.first_target(), Some(all));
    }
}
