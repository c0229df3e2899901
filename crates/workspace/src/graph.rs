//! Dependency graph construction, topological ordering, and cycle
//! detection for workspace members (§4.10, Testable Property #6).

use cforge_errors::{Error, WorkspaceError};
use cforge_types::WorkspaceMember;
use std::collections::{BTreeMap, HashSet};

/// Compute a depth-first topological build order over `members`, whose
/// edges are each member's `depends_on` list. Returns the order, or
/// [`WorkspaceError::CycleDetected`]/[`WorkspaceError::UnknownDependency`]
/// if the graph is invalid.
///
/// # Errors
/// See above.
pub fn topological_order(members: &[WorkspaceMember]) -> Result<Vec<String>, Error> {
    let names: HashSet<&str> = members.iter().map(|m| m.name.as_str()).collect();
    for member in members {
        for dep in &member.depends_on {
            if !names.contains(dep.as_str()) {
                return Err(WorkspaceError::UnknownDependency {
                    member: member.name.clone(),
                    dependency: dep.clone(),
                }
                .into());
            }
        }
    }

    let adjacency: BTreeMap<&str, &[String]> = members
        .iter()
        .map(|m| (m.name.as_str(), m.depends_on.as_slice()))
        .collect();

    let mut order = Vec::with_capacity(members.len());
    let mut visited: HashSet<&str> = HashSet::new();
    let mut on_stack: Vec<&str> = Vec::new();

    for member in members {
        visit(member.name.as_str(), &adjacency, &mut visited, &mut on_stack, &mut order)?;
    }

    Ok(order.into_iter().map(str::to_string).collect())
}

fn visit<'a>(
    node: &'a str,
    adjacency: &BTreeMap<&'a str, &'a [String]>,
    visited: &mut HashSet<&'a str>,
    on_stack: &mut Vec<&'a str>,
    order: &mut Vec<&'a str>,
) -> Result<(), Error> {
    if visited.contains(node) {
        return Ok(());
    }
    if let Some(pos) = on_stack.iter().position(|n| *n == node) {
        let mut chain: Vec<String> = on_stack[pos..].iter().map(|s| (*s).to_string()).collect();
        chain.push(node.to_string());
        return Err(WorkspaceError::CycleDetected {
            chain: chain.join(" -> "),
        }
        .into());
    }

    on_stack.push(node);
    if let Some(deps) = adjacency.get(node) {
        for dep in *deps {
            visit(dep.as_str(), adjacency, visited, on_stack, order)?;
        }
    }
    on_stack.pop();
    visited.insert(node);
    order.push(node);
    Ok(())
}

/// The dependency closure of `member` (itself plus every transitive
/// dependency), used under `--keep-going` to decide which remaining
/// members to skip after a failure (§4.10).
#[must_use]
pub fn dependency_closure(member: &str, members: &[WorkspaceMember]) -> HashSet<String> {
    let adjacency: BTreeMap<&str, &[String]> = members
        .iter()
        .map(|m| (m.name.as_str(), m.depends_on.as_slice()))
        .collect();
    let mut closure = HashSet::new();
    let mut stack = vec![member.to_string()];
    while let Some(current) = stack.pop() {
        if !closure.insert(current.clone()) {
            continue;
        }
        if let Some(deps) = adjacency.get(current.as_str()) {
            stack.extend(deps.iter().cloned());
        }
    }
    closure
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(name: &str, depends_on: &[&str]) -> WorkspaceMember {
        WorkspaceMember {
            name: name.to_string(),
            path: name.into(),
            startup: false,
            inline_overrides: Default::default(),
            depends_on: depends_on.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn orders_a_simple_dag() {
        let members = vec![member("app", &["lib"]), member("lib", &[])];
        let order = topological_order(&members).unwrap();
        assert_eq!(order, vec!["lib".to_string(), "app".to_string()]);
    }

    #[test]
    fn detects_a_cycle_and_names_it() {
        let members = vec![member("a", &["b"]), member("b", &["c"]), member("c", &["a"])];
        let err = topological_order(&members).unwrap_err();
        match err {
            Error::Workspace(WorkspaceError::CycleDetected { chain }) => {
                assert!(chain.contains('a') && chain.contains('b') && chain.contains('c'));
            }
            other => panic!("expected CycleDetected, got {other:?}"),
        }
    }

    #[test]
    fn unknown_dependency_is_reported() {
        let members = vec![member("app", &["missing"])];
        let err = topological_order(&members).unwrap_err();
        assert!(matches!(err, Error::Workspace(WorkspaceError::UnknownDependency { .. })));
    }

    #[test]
    fn dependency_closure_is_transitive() {
        let members = vec![member("app", &["lib"]), member("lib", &["core"]), member("core", &[])];
        let closure = dependency_closure("app", &members);
        assert!(closure.contains("app"));
        assert!(closure.contains("lib"));
        assert!(closure.contains("core"));
    }
}
