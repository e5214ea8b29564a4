//! Build engine interface consumed by the debugger.

#![allow(missing_docs)]

use smol_str::SmolStr;

use super::TargetId;

/// Variable definition scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// The global variable set.
    Global,
    /// A target-specific variable set, shadowing the global one.
    Target(TargetId),
}

/// Where a variable definition came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariableOrigin {
    Default,
    Environment,
    File,
    CommandLine,
    Override,
    Automatic,
    /// Defined by a debugger command.
    Debugger,
}

/// Engine services the debugger queries while suspended.
///
/// The engine owns the target graph and the variable scope stack; the
/// debugger only reads them, apart from [`BuildEngine::define_variable`].
pub trait BuildEngine {
    /// Resolve a target name to its canonical identity.
    fn lookup_target(&self, name: &str) -> Option<TargetId>;

    /// Name of a known target.
    fn target_name(&self, target: TargetId) -> Option<SmolStr>;

    /// Expand variable references in `text` as seen from `scope`.
    fn expand_variables(&self, text: &str, scope: Scope) -> String;

    /// Scope of the target being evaluated, or global outside recursion.
    fn current_scope(&self) -> Scope;

    /// Define a variable in `scope` through the engine's normal definition path.
    fn define_variable(&mut self, name: &str, value: &str, origin: VariableOrigin, scope: Scope);

    /// Targets under evaluation, innermost last.
    fn target_stack(&self) -> Vec<TargetId>;
}
