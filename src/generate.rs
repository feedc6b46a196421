//! Random org tree generator
//!
//! Produces demo trees shaped like a real company: a CEO, a few levels of
//! management with 3 to 5 reports each, and individual contributors at the
//! bottom. A seed always reproduces the same tree.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::TreeError;
use crate::tree::{CardSize, NodeId, OrgTree, Person};

const FIRST_NAMES: &[&str] = &[
    "John", "Jane", "Alice", "Bob", "Charlie", "David", "Eve", "Frank", "Grace", "Hank", "Ivy",
    "Jack", "Kevin", "Liam", "Mia", "Noah", "Olivia", "Peter", "Quinn", "Ryan",
];

const LAST_NAMES: &[&str] = &[
    "Smith", "Doe", "Johnson", "Brown", "Williams", "Jones", "Garcia", "Miller", "Davis",
    "Rodriguez", "Martinez", "Hernandez", "Lopez", "Gonzalez", "Wilson",
];

const DEPARTMENTS: &[&str] = &[
    "Engineering",
    "Product",
    "Design",
    "Marketing",
    "Sales",
    "Operations",
    "Finance",
    "HR",
    "IT",
    "Customer Success",
];

/// Roles for the fixed management levels, indexed by depth
const LEVEL_ROLES: &[&str] = &["CEO", "VP", "Director", "Manager", "Team Lead"];

/// Roles picked at random below the management levels
const CONTRIBUTOR_ROLES: &[&str] = &[
    "Senior Developer",
    "Developer",
    "Designer",
    "QA",
    "Product Owner",
    "Scrum Master",
];

/// Shape of a generated tree
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    pub seed: u64,
    /// Levels below the root
    pub max_depth: usize,
    pub min_children: usize,
    pub max_children: usize,
    /// Nodes shallower than this start expanded
    pub expanded_depth: usize,
    pub card_size: CardSize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            max_depth: 5,
            min_children: 3,
            max_children: 5,
            expanded_depth: 2,
            card_size: CardSize::new(220.0, 120.0),
        }
    }
}

impl GeneratorConfig {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn with_children(mut self, min: usize, max: usize) -> Self {
        self.min_children = min;
        self.max_children = max.max(min);
        self
    }

    pub fn with_expanded_depth(mut self, depth: usize) -> Self {
        self.expanded_depth = depth;
        self
    }
}

/// Generate a random org tree
pub fn generate(config: &GeneratorConfig) -> Result<OrgTree, TreeError> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut counter = 0usize;

    let role = role_for(&mut rng, 0);
    let person = random_person(&mut rng, role);
    let mut tree = OrgTree::new(next_key(&mut counter), person, config.card_size)?;
    let root = tree.root();
    tree.set_expanded_at(root, config.expanded_depth > 0);

    // (parent, parent depth, children still to create), depth first so keys
    // are numbered in pre-order
    let mut stack: Vec<(NodeId, usize, usize)> = vec![];
    if config.max_depth > 0 {
        stack.push((root, 0, child_count(&mut rng, config)));
    }

    while let Some(top) = stack.last_mut() {
        if top.2 == 0 {
            stack.pop();
            continue;
        }
        top.2 -= 1;
        let (parent, depth) = (top.0, top.1 + 1);

        let role = role_for(&mut rng, depth);
        let person = random_person(&mut rng, role);
        let child = tree.add_child(parent, next_key(&mut counter), person, config.card_size)?;
        tree.set_expanded_at(child, depth < config.expanded_depth);

        if depth < config.max_depth {
            stack.push((child, depth, child_count(&mut rng, config)));
        }
    }

    log::info!(seed = config.seed, nodes = tree.len(); "Generated org tree");
    Ok(tree)
}

fn next_key(counter: &mut usize) -> String {
    *counter += 1;
    format!("user-{}", counter)
}

fn child_count(rng: &mut StdRng, config: &GeneratorConfig) -> usize {
    rng.random_range(config.min_children..=config.max_children.max(config.min_children))
}

fn pick<'a>(rng: &mut StdRng, items: &[&'a str]) -> &'a str {
    items[rng.random_range(0..items.len())]
}

fn role_for(rng: &mut StdRng, depth: usize) -> &'static str {
    LEVEL_ROLES
        .get(depth)
        .copied()
        .unwrap_or_else(|| pick(rng, CONTRIBUTOR_ROLES))
}

fn random_person(rng: &mut StdRng, role: &str) -> Person {
    let first = pick(rng, FIRST_NAMES);
    let last = pick(rng, LAST_NAMES);
    let department = pick(rng, DEPARTMENTS);
    Person::new(format!("{first} {last}"), role)
        .with_department(department)
        .with_email(format!(
            "{}.{}@company.com",
            first.to_lowercase(),
            last.to_lowercase()
        ))
}
