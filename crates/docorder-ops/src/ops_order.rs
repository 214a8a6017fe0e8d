//! Operation: plan the order in which components are documented.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use docorder_core::component::{ComponentKind, ComponentTable};
use docorder_core::config::{AnalyzerConfig, CycleStrategy};
use docorder_graph::{build_graph_from_components, dependency_first_order, resolve_cycles_with};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;

use crate::load_components;

/// How the dependency-first order is presented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderMode {
    /// Dependency-first order.
    #[default]
    Topo,
    /// Every component shuffled, ignoring dependencies.
    RandomNode,
    /// Files shuffled; components inside a file stay dependency-first.
    RandomFile,
}

#[derive(Debug, Clone, Default)]
pub struct OrderOptions {
    pub mode: OrderMode,
    /// Seed for the random modes. Without one, the shuffle is not repeatable.
    pub seed: Option<u64>,
    pub strategy: CycleStrategy,
    /// Leave out components that already have a docstring.
    pub skip_documented: bool,
}

/// One entry of an order plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderedComponent {
    pub id: String,
    pub kind: ComponentKind,
    pub relative_path: PathBuf,
    pub has_docstring: bool,
    /// Dependencies that survived cycle breaking.
    pub depends_on: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderPlan {
    pub mode: OrderMode,
    pub order: Vec<OrderedComponent>,
    pub cycles: Vec<Vec<String>>,
    pub removed_edges: Vec<(String, String)>,
    pub acyclic: bool,
    /// Components left out because they are already documented.
    pub skipped: usize,
}

/// Order already-analyzed components.
pub fn plan_order(components: &ComponentTable, options: &OrderOptions) -> OrderPlan {
    let map = build_graph_from_components(components);
    let resolution = resolve_cycles_with(&map, options.strategy);
    let mut ids = dependency_first_order(&resolution.graph);
    tracing::info!("Sorted {} components for processing", ids.len());

    let mut rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    match options.mode {
        OrderMode::Topo => {}
        OrderMode::RandomNode => ids.shuffle(&mut rng),
        OrderMode::RandomFile => {
            let mut by_file: BTreeMap<PathBuf, Vec<String>> = BTreeMap::new();
            for id in ids {
                let file = components
                    .get(&id)
                    .map(|c| c.relative_path.clone())
                    .unwrap_or_default();
                by_file.entry(file).or_default().push(id);
            }
            let mut files: Vec<Vec<String>> = by_file.into_values().collect();
            files.shuffle(&mut rng);
            ids = files.into_iter().flatten().collect();
        }
    }

    let surviving = resolution.graph.to_map();
    let mut skipped = 0;
    let mut order = Vec::with_capacity(ids.len());
    for id in ids {
        let Some(component) = components.get(&id) else {
            continue;
        };
        if options.skip_documented && component.has_docstring {
            tracing::debug!("{id} already has a docstring, skipping");
            skipped += 1;
            continue;
        }
        let depends_on = surviving
            .get(&id)
            .map(|deps| deps.iter().cloned().collect())
            .unwrap_or_default();
        order.push(OrderedComponent {
            id,
            kind: component.kind,
            relative_path: component.relative_path.clone(),
            has_docstring: component.has_docstring,
            depends_on,
        });
    }

    OrderPlan {
        mode: options.mode,
        order,
        cycles: resolution.cycles,
        removed_edges: resolution.removed,
        acyclic: resolution.acyclic,
        skipped,
    }
}

/// Analyze the repository (or load `graph`) and plan the order.
pub fn order(
    repo: &Path,
    config: &AnalyzerConfig,
    graph: Option<&Path>,
    options: &OrderOptions,
) -> miette::Result<OrderPlan> {
    let components = load_components(repo, config, graph)?;
    Ok(plan_order(&components, options))
}
