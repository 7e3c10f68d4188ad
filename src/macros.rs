//! A minimal macro table: just enough to answer `defined(NAME)` and to
//! look up object-like replacement text for `Name` tokens in `#if`.

use std::collections::HashMap;

/// Whether a macro is function-like (`NAME(...)`) or object-like.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    /// A plain `#define NAME value` macro.
    ObjectLike,
    /// A `#define NAME(args) value` macro. Function-like macros with no
    /// invocation are simply "defined" for `defined()` purposes; this
    /// crate does not expand macro calls, only tests presence.
    FunctionLike,
}

/// One entry in the macro table.
#[derive(Debug, Clone)]
pub struct MacroNode {
    /// Object-like vs. function-like.
    pub node_type: NodeType,
    /// Whether this macro was defined by a system header, which
    /// suppresses certain pedantic warnings when its expansion is used.
    pub is_sys_macro: bool,
}

/// A simple name -> macro lookup table, standing in for the reference
/// implementation's hash-consed identifier table plus macro hash map.
#[derive(Debug, Default, Clone)]
pub struct MacroTable {
    macros: HashMap<String, MacroNode>,
}

impl MacroTable {
    /// An empty table.
    pub fn new() -> Self {
        MacroTable::default()
    }

    /// Record an object-like macro definition.
    pub fn define_object(&mut self, name: impl Into<String>, is_sys_macro: bool) {
        self.macros.insert(
            name.into(),
            MacroNode {
                node_type: NodeType::ObjectLike,
                is_sys_macro,
            },
        );
    }

    /// Record a function-like macro definition.
    pub fn define_function(&mut self, name: impl Into<String>, is_sys_macro: bool) {
        self.macros.insert(
            name.into(),
            MacroNode {
                node_type: NodeType::FunctionLike,
                is_sys_macro,
            },
        );
    }

    /// Remove a macro (`#undef`).
    pub fn undef(&mut self, name: &str) {
        self.macros.remove(name);
    }

    /// True if `name` is currently defined. This is exactly what
    /// `defined(NAME)` queries.
    pub fn is_defined(&self, name: &str) -> bool {
        self.macros.contains_key(name)
    }

    /// Look up a macro's node, for diagnostics that need to know whether
    /// it came from a system header.
    pub fn lookup(&self, name: &str) -> Option<&MacroNode> {
        self.macros.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn define_and_query() {
        let mut table = MacroTable::new();
        assert!(!table.is_defined("FOO"));
        table.define_object("FOO", false);
        assert!(table.is_defined("FOO"));
    }

    #[test]
    fn undef_removes() {
        let mut table = MacroTable::new();
        table.define_object("FOO", false);
        table.undef("FOO");
        assert!(!table.is_defined("FOO"));
    }

    #[test]
    fn function_like_is_defined_without_invocation() {
        let mut table = MacroTable::new();
        table.define_function("CALL", false);
        assert!(table.is_defined("CALL"));
        assert_eq!(table.lookup("CALL").unwrap().node_type, NodeType::FunctionLike);
    }

    #[test]
    fn sys_macro_flag_is_preserved() {
        let mut table = MacroTable::new();
        table.define_object("__STDC__", true);
        assert!(table.lookup("__STDC__").unwrap().is_sys_macro);
    }
}
