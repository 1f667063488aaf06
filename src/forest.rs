//! A forest of trees sharing a handful of tree kinds.
//!
//! Every tree has its own position, but name, color and texture belong to its
//! [`TreeKind`], which is built once per distinct combination and shared through a
//! [`Registry`]. Planting thousands of oaks allocates one oak kind.

use tracing::info;

use crate::{BoxError, Handle, Intrinsic, Registry, RegistryError, SharedObject};

/// Where a tree stands. Extrinsic: never part of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

/// The intrinsic fields of a tree as supplied by a caller.
#[derive(Debug, Clone, Copy)]
pub struct TreeSpecies<'a> {
    pub name: &'a str,
    pub color: &'a str,
    pub texture: &'a str,
}

/// Canonical key for a tree kind: the trimmed intrinsic fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TreeKey {
    name: String,
    color: String,
    texture: String,
}

impl Intrinsic for TreeSpecies<'_> {
    type Key = TreeKey;

    fn key(&self) -> TreeKey {
        TreeKey {
            name: self.name.trim().to_owned(),
            color: self.color.trim().to_owned(),
            texture: self.texture.trim().to_owned(),
        }
    }
}

/// Shared state of every tree of one kind.
#[derive(Debug)]
pub struct TreeKind {
    name: String,
    color: String,
    texture: String,
}

impl TreeKind {
    /// Species name, e.g. `Oak`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Leaf color.
    pub fn color(&self) -> &str {
        &self.color
    }

    /// Texture file the kind is drawn with.
    pub fn texture(&self) -> &str {
        &self.texture
    }
}

impl SharedObject for TreeKind {
    type Key = TreeKey;
    type Extrinsic = Position;
    type Output = String;

    fn build(key: &TreeKey) -> Result<Self, BoxError> {
        if key.name.is_empty() {
            return Err("tree kind needs a name".into());
        }
        info!(name = %key.name, color = %key.color, "creating tree kind");
        Ok(TreeKind {
            name: key.name.clone(),
            color: key.color.clone(),
            texture: key.texture.clone(),
        })
    }

    fn render(&self, position: &Position) -> String {
        format!(
            "Drawing '{}' ({}, {}) at ({}, {})",
            self.name, self.color, self.texture, position.x, position.y
        )
    }
}

/// A planted tree: its [`Position`] plus a shared [`TreeKind`].
pub type Tree = Handle<TreeKind>;

/// Client-side collection of planted trees.
#[derive(Debug)]
pub struct Forest<'r> {
    kinds: &'r Registry<TreeKey, TreeKind>,
    trees: Vec<Tree>,
}

impl<'r> Forest<'r> {
    /// Creates an empty forest drawing its kinds from `kinds`.
    pub fn new(kinds: &'r Registry<TreeKey, TreeKind>) -> Self {
        Self {
            kinds,
            trees: Vec::new(),
        }
    }

    /// Plants a tree at `(x, y)`, reusing the kind for `species` if one exists.
    ///
    /// Returns a handle to the planted tree; the forest keeps its own.
    pub fn plant_tree(
        &mut self,
        x: i32,
        y: i32,
        species: TreeSpecies<'_>,
    ) -> Result<Tree, RegistryError> {
        let tree = Tree::new(self.kinds, Position { x, y }, species.key())?;
        self.trees.push(tree.clone());
        Ok(tree)
    }

    /// Renders every tree in planting order.
    pub fn draw(&self) -> Vec<String> {
        self.trees.iter().map(Tree::render).collect()
    }

    /// Planted trees, in planting order.
    pub fn trees(&self) -> &[Tree] {
        &self.trees
    }

    /// Number of planted trees.
    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }

    /// Number of distinct tree kinds in the backing registry.
    pub fn kind_count(&self) -> usize {
        self.kinds.size()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OAK: TreeSpecies<'static> = TreeSpecies {
        name: "Oak",
        color: "green",
        texture: "oak.png",
    };

    #[test]
    fn test_key_ignores_surrounding_whitespace() {
        let padded = TreeSpecies {
            name: " Oak ",
            color: "green\n",
            texture: "oak.png",
        };
        assert_eq!(padded.key(), OAK.key());

        let other = TreeSpecies { color: "red", ..OAK };
        assert_ne!(other.key(), OAK.key());
    }

    #[test]
    fn test_trees_share_kind_but_not_position() {
        let kinds = Registry::new();
        let mut forest = Forest::new(&kinds);

        let first = forest.plant_tree(10, 20, OAK).unwrap();
        let second = forest.plant_tree(5, 5, OAK).unwrap();

        assert!(first.shares_with(&second));
        assert_eq!(second.extrinsic(), &Position { x: 5, y: 5 });

        let trees = forest.trees();
        assert_eq!(trees.len(), 2);
        assert!(trees[1].shares_with(&second));
        assert_eq!(trees[1].extrinsic(), second.extrinsic());
        assert_eq!(
            forest.draw(),
            vec![
                "Drawing 'Oak' (green, oak.png) at (10, 20)",
                "Drawing 'Oak' (green, oak.png) at (5, 5)",
            ]
        );
        assert_eq!(forest.kind_count(), 1);
    }

    #[test]
    fn test_unnamed_kind_is_rejected() {
        let kinds = Registry::new();
        let mut forest = Forest::new(&kinds);

        let err = forest
            .plant_tree(0, 0, TreeSpecies { name: "  ", ..OAK })
            .unwrap_err();
        assert!(err.is_construction_failed());
        assert_eq!(forest.tree_count(), 0);
        assert_eq!(forest.kind_count(), 0);
    }

    #[test]
    fn test_kind_accessors() {
        let kind = TreeKind::build(&OAK.key()).unwrap();
        assert_eq!(kind.name(), "Oak");
        assert_eq!(kind.color(), "green");
        assert_eq!(kind.texture(), "oak.png");
    }
}
