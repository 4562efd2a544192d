//! An arena-based trie of OSC address parts, used to dispatch incoming
//! messages to whatever callbacks were registered under matching addresses.
//!
//! Nodes live in a single `Vec`, addressed by index, so a node can hold its
//! parent's index directly instead of an `Rc`/`Weak` pair — there is no
//! ownership cycle to break.
//!
//! Wildcards are interpreted on *either* side of a match: a registered
//! address may itself carry glob metacharacters (`/foo/*` as a pattern
//! stored in the tree), and a query address may carry them too (matching
//! several stored literal children at once). [`AddressTree::matching_callbacks`]
//! is the entry point that exercises both directions; see its doc comment.

use crate::errors::OscError;
use crate::pattern;

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::types::OscMessage;

/// A callback registered against an address: takes the dispatched message.
pub type Callback = Arc<dyn Fn(&OscMessage) + Send + Sync>;

/// An opaque handle returned by [`AddressTree::add_callback`], used to name
/// that exact registration again in [`AddressTree::remove_callback`].
///
/// Rust closures have no general notion of identity or equality, so unlike
/// the callback-value-based removal of the model this tree is adapted from,
/// removal here always goes through one of these tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallbackId(u64);

struct Node {
    parent: Option<usize>,
    label: String,
    children: HashMap<String, usize>,
    /// The subset of `children`'s keys that contain a glob metacharacter.
    /// Kept as a standing set (rather than re-scanned per match) because
    /// §4.4's invariant defines it as exactly that subset and every mutation
    /// site already knows which case it's in.
    wildcard_labels: HashSet<String>,
    callbacks: Vec<(CallbackId, Callback)>,
}

impl Node {
    fn is_empty(&self) -> bool {
        self.callbacks.is_empty() && self.children.is_empty()
    }

    fn root() -> Self {
        Node {
            parent: None,
            label: String::new(),
            children: HashMap::new(),
            wildcard_labels: HashSet::new(),
            callbacks: Vec::new(),
        }
    }
}

/// A tree of OSC address parts with callbacks registered at literal *or*
/// wildcard-carrying paths, dispatched against query addresses that may
/// themselves be literal or carry wildcards.
pub struct AddressTree {
    arena: Vec<Node>,
    next_id: u64,
}

impl AddressTree {
    /// An empty tree containing only the root node (`/`).
    pub fn new() -> Self {
        AddressTree {
            arena: vec![Node::root()],
            next_id: 0,
        }
    }

    /// Registers `callback` at `address`, creating any intermediate nodes
    /// that don't yet exist. Each part of `address` is validated against
    /// §3's forbidden-character rule but, unlike a plain literal address, may
    /// itself carry glob metacharacters — registering `/foo/*` is how a
    /// handler opts into matching every address under `/foo`.
    pub fn add_callback<F>(&mut self, address: &str, callback: F) -> Result<CallbackId, OscError>
    where
        F: Fn(&OscMessage) + Send + Sync + 'static,
    {
        let parts = split_address(address)?;
        let mut node_idx = 0;
        for part in parts {
            node_idx = self.child_or_insert(node_idx, part);
        }

        let id = CallbackId(self.next_id);
        self.next_id += 1;
        self.arena[node_idx]
            .callbacks
            .push((id, Arc::new(callback)));
        Ok(id)
    }

    /// Removes a single callback by the id returned from `add_callback`,
    /// pruning the node (and any now-empty ancestors) if it was the last
    /// thing keeping that path alive. `address` names the exact literal path
    /// the callback was registered at (including any wildcard characters
    /// verbatim, e.g. `/foo/*`) — this walk never globs.
    pub fn remove_callback(&mut self, address: &str, id: CallbackId) -> Result<(), OscError> {
        let node_idx = self.find_node(address)?;
        let callbacks = &mut self.arena[node_idx].callbacks;
        let pos = callbacks
            .iter()
            .position(|(cb_id, _)| *cb_id == id)
            .ok_or(OscError::NoSuchCallback)?;
        callbacks.remove(pos);
        self.prune_from(node_idx);
        Ok(())
    }

    /// Removes every callback registered exactly at `address`, returning how
    /// many were removed, then prunes as `remove_callback` does.
    pub fn remove_all_callbacks(&mut self, address: &str) -> Result<usize, OscError> {
        let node_idx = self.find_node(address)?;
        let removed = self.arena[node_idx].callbacks.len();
        self.arena[node_idx].callbacks.clear();
        self.prune_from(node_idx);
        Ok(removed)
    }

    /// The ids of every callback whose registered address matches `pattern`
    /// — i.e. `match(path(pattern))` per §4.4, the same traversal
    /// [`matching_callbacks`](Self::matching_callbacks) uses, projected to
    /// ids instead of the boxed handlers.
    pub fn get_callbacks(&self, pattern: &str) -> Result<Vec<CallbackId>, OscError> {
        let parts = split_address(pattern)?;
        Ok(self
            .match_from(0, &parts)
            .into_iter()
            .map(|(id, _)| id)
            .collect())
    }

    /// Every callback whose registered address matches `address`. Either
    /// side of the match may carry glob metacharacters: a registered pattern
    /// like `/foo/*` matches a literal incoming `/foo/bar`, and a query like
    /// `/ba*` matches every literal registration starting with `ba`. A
    /// trailing `*` — on whichever side is doing the globbing — matches
    /// every descendant at any depth below the node it selects, not just
    /// immediate children.
    pub fn matching_callbacks(&self, address: &str) -> Result<Vec<Callback>, OscError> {
        let parts = split_address(address)?;
        Ok(self
            .match_from(0, &parts)
            .into_iter()
            .map(|(_, cb)| cb)
            .collect())
    }

    /// Detaches the node at `address` and re-attaches it as a child of the
    /// node at `new_parent`, keeping its own label. Both addresses must
    /// already resolve; `address` must not be the root.
    pub fn set_parent(&mut self, address: &str, new_parent: &str) -> Result<(), OscError> {
        let node_idx = self.find_node(address)?;
        let new_parent_idx = self.find_node(new_parent)?;
        let old_parent_idx = self.arena[node_idx].parent.ok_or(OscError::NoSuchPath)?;
        let label = self.arena[node_idx].label.clone();

        self.arena[old_parent_idx].children.remove(&label);
        self.arena[old_parent_idx].wildcard_labels.remove(&label);
        self.prune_from(old_parent_idx);

        self.arena[new_parent_idx]
            .children
            .insert(label.clone(), node_idx);
        if contains_meta(&label) {
            self.arena[new_parent_idx].wildcard_labels.insert(label);
        }
        self.arena[node_idx].parent = Some(new_parent_idx);
        Ok(())
    }

    /// Renames the node at `address` in place, re-keying its parent's child
    /// map and wildcard-label bookkeeping to `new_label`.
    pub fn set_name(&mut self, address: &str, new_label: &str) -> Result<(), OscError> {
        if !pattern::is_valid_address_part(new_label) {
            return Err(OscError::InvalidAddressPart(new_label.to_string()));
        }
        let node_idx = self.find_node(address)?;
        let parent_idx = self.arena[node_idx].parent.ok_or(OscError::NoSuchPath)?;
        let old_label = self.arena[node_idx].label.clone();

        self.arena[parent_idx].children.remove(&old_label);
        self.arena[parent_idx].wildcard_labels.remove(&old_label);
        self.arena[parent_idx]
            .children
            .insert(new_label.to_string(), node_idx);
        if contains_meta(new_label) {
            self.arena[parent_idx]
                .wildcard_labels
                .insert(new_label.to_string());
        }
        self.arena[node_idx].label = new_label.to_string();
        Ok(())
    }

    /// Creates an empty child node labeled `label` under `parent_address` if
    /// one doesn't already exist, without registering a callback. Useful for
    /// staging tree structure ahead of `set_parent`/`set_name`.
    pub fn add_node(&mut self, parent_address: &str, label: &str) -> Result<(), OscError> {
        if !pattern::is_valid_address_part(label) {
            return Err(OscError::InvalidAddressPart(label.to_string()));
        }
        let parent_idx = self.find_node(parent_address)?;
        self.child_or_insert(parent_idx, label);
        Ok(())
    }

    /// The core of §4.4: walks `parts` against the tree rooted at `node_idx`,
    /// trying, at each step, every way the query part and the node's
    /// children can glob against each other, and returns the matched nodes'
    /// `(id, callback)` pairs.
    fn match_from(&self, node_idx: usize, parts: &[&str]) -> Vec<(CallbackId, Callback)> {
        let (part, rest) = match parts.split_first() {
            Some(split) => split,
            None => return self.node_callbacks(node_idx),
        };

        let mut out = Vec::new();
        let mut visited: HashSet<usize> = HashSet::new();
        let node = &self.arena[node_idx];

        if contains_meta(part) {
            // The query part is a pattern: try it against every *literal*
            // child label (§4.4 step 1). A bare `*` additionally matches
            // every descendant at any depth below the nodes it selects —
            // section 8 scenario 6 requires `/*` to reach grandchildren,
            // which the single-level walk below wouldn't otherwise do.
            let deep = *part == "*";
            for (label, &child_idx) in &node.children {
                if node.wildcard_labels.contains(label) {
                    continue;
                }
                if pattern::glob(label, part) && visited.insert(child_idx) {
                    out.extend(self.match_branch(child_idx, rest, deep));
                }
            }
        } else {
            // The query part is literal: try it against every stored
            // wildcard label (§4.4 step 2). A stored label ending in `*`
            // whose node is itself a leaf deep-matches every descendant of
            // whatever remains in the query (the registered `/foo/*`
            // pattern absorbing `/foo/bar/baz` and deeper).
            for label in &node.wildcard_labels {
                if let Some(&child_idx) = node.children.get(label) {
                    if pattern::glob(part, label) && visited.insert(child_idx) {
                        let leaf = self.arena[child_idx].children.is_empty();
                        let deep = label.ends_with('*') && leaf;
                        out.extend(self.match_branch(child_idx, rest, deep));
                    }
                }
            }
        }

        // §4.4 step 3: independently of the above, an exact literal-key hit
        // always counts too.
        if let Some(&child_idx) = node.children.get(*part) {
            if visited.insert(child_idx) {
                out.extend(self.match_branch(child_idx, rest, false));
            }
        }

        out
    }

    /// Continues the walk into `child_idx`. When `deep` is set the remaining
    /// query parts are ignored entirely: the node's own callbacks and the
    /// transitive closure of its descendants' callbacks are all matched.
    fn match_branch(&self, child_idx: usize, rest: &[&str], deep: bool) -> Vec<(CallbackId, Callback)> {
        if deep {
            let mut out = self.node_callbacks(child_idx);
            out.extend(self.collect_descendants(child_idx));
            out
        } else {
            self.match_from(child_idx, rest)
        }
    }

    fn node_callbacks(&self, idx: usize) -> Vec<(CallbackId, Callback)> {
        self.arena[idx].callbacks.clone()
    }

    fn collect_descendants(&self, node_idx: usize) -> Vec<(CallbackId, Callback)> {
        let mut out = Vec::new();
        for &child_idx in self.arena[node_idx].children.values() {
            out.extend(self.arena[child_idx].callbacks.iter().cloned());
            out.extend(self.collect_descendants(child_idx));
        }
        out
    }

    /// Walks `address` along exact, literal child-map keys — no globbing —
    /// failing with `NoSuchPath` the moment a segment is absent. Used by
    /// every operation that names one specific registered node rather than
    /// matching a pattern against the tree.
    fn find_node(&self, address: &str) -> Result<usize, OscError> {
        let parts = split_address(address)?;
        let mut node_idx = 0;
        for part in parts {
            node_idx = *self.arena[node_idx]
                .children
                .get(part)
                .ok_or(OscError::NoSuchPath)?;
        }
        Ok(node_idx)
    }

    fn child_or_insert(&mut self, node_idx: usize, label: &str) -> usize {
        if let Some(&existing) = self.arena[node_idx].children.get(label) {
            return existing;
        }
        let new_idx = self.arena.len();
        self.arena.push(Node {
            parent: Some(node_idx),
            label: label.to_string(),
            children: HashMap::new(),
            wildcard_labels: HashSet::new(),
            callbacks: Vec::new(),
        });
        self.arena[node_idx]
            .children
            .insert(label.to_string(), new_idx);
        if contains_meta(label) {
            self.arena[node_idx].wildcard_labels.insert(label.to_string());
        }
        new_idx
    }

    /// Removes `node_idx` from its parent if it's now empty, then repeats
    /// for the parent, and so on up to (but not including) the root.
    fn prune_from(&mut self, node_idx: usize) {
        let mut current = node_idx;
        loop {
            if !self.arena[current].is_empty() {
                return;
            }
            let parent = match self.arena[current].parent {
                Some(p) => p,
                None => return, // never prune the root
            };
            let label = self.arena[current].label.clone();
            self.arena[parent].children.remove(&label);
            self.arena[parent].wildcard_labels.remove(&label);
            current = parent;
        }
    }
}

impl Default for AddressTree {
    fn default() -> Self {
        AddressTree::new()
    }
}

fn contains_meta(part: &str) -> bool {
    part.contains(['*', '?', '[', '{'])
}

/// Splits `address` into its `/`-separated parts, rejecting a missing
/// leading `/`, an empty part (from `//` or a trailing `/`), or a part
/// carrying one of the characters OSC forbids in any address. Glob
/// metacharacters are allowed here: whether a given `address` is used as a
/// literal path or a pattern is up to the caller.
fn split_address(address: &str) -> Result<Vec<&str>, OscError> {
    if !address.starts_with('/') {
        return Err(OscError::InvalidAddressPart(address.to_string()));
    }
    let parts: Vec<&str> = address[1..].split('/').collect();
    for part in &parts {
        if !pattern::is_valid_address_part(part) {
            return Err(OscError::InvalidAddressPart((*part).to_string()));
        }
    }
    Ok(parts)
}
