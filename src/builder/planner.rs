//! Placement planning and application.
//!
//! Cells are split into three passes: solid blocks, upper halves of two-cell
//! blocks, then blocks that need support. Each pass is ordered bottom-up, so
//! supports and lower halves always exist before what rests on them.

use std::collections::HashSet;

use log::{debug, info, warn};

use super::config::BuilderConfig;
use super::plan::{PlacementClass, PlacementEntry, PlacementPlan, PlacementSource, PlannedBlock};
use super::report::BuildReport;
use super::resolve::resolve_state;
use super::undo::{UndoEntry, UndoStore};
use crate::core::{Error, IVec3, Result};
use crate::detection::rules::any_match;
use crate::voxel::block_state::{identifier_path, is_air, normalize_identifier};
use crate::voxel::{BlockState, GridAccessor};

/// Result of applying a plan
#[derive(Debug)]
pub struct BuildOutcome {
    pub report: BuildReport,
    pub undo: UndoEntry,
}

/// Orders structures for placement and writes them into grids
#[derive(Clone, Debug)]
pub struct ReconstructionPlanner {
    config: BuilderConfig,
    allowed: HashSet<String>,
}

impl ReconstructionPlanner {
    pub fn new(config: BuilderConfig) -> Self {
        let allowed = config
            .allowed_blocks
            .iter()
            .filter_map(|raw| {
                let id = normalize_identifier(raw);
                if id.is_none() {
                    warn!("Ignoring malformed identifier '{raw}' in allowed-blocks");
                }
                id
            })
            .collect();
        Self { config, allowed }
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    /// Support-dependent blocks win over upper halves so a tall plant's two
    /// cells stay in one pass
    pub fn classify(&self, entry: &PlacementEntry) -> PlacementClass {
        let id = entry.identifier().unwrap_or_else(|| entry.block.to_ascii_lowercase());
        if any_match(&self.config.physics_patterns, identifier_path(&id)) {
            PlacementClass::PhysicsDependent
        } else if entry.is_upper_part() {
            PlacementClass::UpperPart
        } else {
            PlacementClass::Solid
        }
    }

    /// Whether the allow-list (if any) admits an identifier
    pub fn is_allowed(&self, id: &str) -> bool {
        self.allowed.is_empty() || is_air(id) || self.allowed.contains(id)
    }

    /// Order a structure's cells for placement at `origin`
    pub fn plan<S: PlacementSource + ?Sized>(&self, structure: &S, origin: IVec3) -> Result<PlacementPlan> {
        let entries = structure.placement_entries()?;
        if entries.is_empty() {
            return Err(Error::InvalidStructure("structure has no blocks".into()));
        }

        let mut steps: Vec<PlannedBlock> = entries
            .into_iter()
            .map(|entry| PlannedBlock {
                position: origin + entry.offset,
                class: self.classify(&entry),
                entry,
            })
            .collect();

        // stable: source order is kept between equal keys
        steps.sort_by_key(|step| (step.class, step.entry.offset.y, step.entry.is_upper_part()));

        Ok(PlacementPlan { origin, size: structure.size(), steps })
    }

    /// Write a plan into a grid. Cells that fail are counted and reported
    /// without aborting; the undo entry holds the prior state of every cell
    /// that was written.
    pub fn apply<G: GridAccessor + ?Sized>(&self, plan: &PlacementPlan, grid: &mut G) -> Result<BuildOutcome> {
        if plan.is_empty() {
            return Err(Error::InvalidStructure("plan has no blocks".into()));
        }
        let heights = grid.height_range();
        let top = plan.origin.y + plan.size.y - 1;
        if plan.origin.y < heights.start || top >= heights.end {
            return Err(Error::InvalidVolume(format!(
                "y {}..={} outside grid height {}..{}",
                plan.origin.y, top, heights.start, heights.end
            )));
        }

        let mut report = BuildReport::new(self.config.max_reported_errors);
        let mut undo = UndoEntry::new();
        let mut recorded = HashSet::new();

        for step in &plan.steps {
            let prior = match grid.block(step.position) {
                Ok(prior) => prior,
                Err(e) => {
                    report.record_failure(format!("Cannot read {}: {e}", step.position));
                    continue;
                }
            };

            match self.place(grid, step, plan.size, &mut report) {
                Ok(()) => {
                    report.record_placed();
                    if recorded.insert(step.position) {
                        undo.record(step.position, prior);
                    }
                }
                Err(e) => report.record_failure(e.to_string()),
            }
        }

        debug!("Applied plan at {}: {report}", plan.origin);
        Ok(BuildOutcome { report, undo })
    }

    /// Plan, apply and push the undo entry for `actor`
    pub fn build<G, S>(
        &self,
        structure: &S,
        origin: IVec3,
        grid: &mut G,
        actor: &str,
        history: &mut UndoStore,
    ) -> Result<BuildReport>
    where
        G: GridAccessor + ?Sized,
        S: PlacementSource + ?Sized,
    {
        let plan = self.plan(structure, origin)?;
        let BuildOutcome { report, undo } = self.apply(&plan, grid)?;

        if !undo.is_empty() {
            history.push(actor, undo);
        }
        if report.is_clean() {
            info!("Built {} blocks at {origin} for {actor}", report.placed);
        } else {
            warn!("Build at {origin} for {actor}: {report}");
        }
        Ok(report)
    }

    /// Place one cell: the full state string first, then the identifier with
    /// resolved discrete properties if the string is rejected
    fn place<G: GridAccessor + ?Sized>(
        &self,
        grid: &mut G,
        step: &PlannedBlock,
        size: IVec3,
        report: &mut BuildReport,
    ) -> Result<()> {
        let entry = &step.entry;
        let id = entry
            .identifier()
            .ok_or_else(|| Error::UnknownBlockIdentifier(entry.block.clone()))?;
        if !self.is_allowed(&id) {
            return Err(Error::InvalidStructure(format!("Block not allowed: {id}")));
        }

        if let Some(full) = &entry.full_state {
            // the full state may name a different block than `block`
            if let Some(full_id) = BlockState::parse_lenient(full).id {
                if !self.is_allowed(&full_id) {
                    return Err(Error::InvalidStructure(format!("Block not allowed: {full_id}")));
                }
            }
            match grid.set_block_data(step.position, full) {
                Ok(()) => return Ok(()),
                Err(e @ (Error::GridMutation(_) | Error::GridRead(_))) => return Err(e),
                Err(e) => debug!("Falling back to discrete properties for '{full}': {e}"),
            }
        }

        if !grid.registry().is_known(&id) {
            return Err(Error::UnknownBlockIdentifier(id));
        }
        let kind = grid.registry().kind_of(&id);
        let resolution = resolve_state(BlockState::new(&id)?, kind, &entry.properties, entry.offset, size);
        for (key, value) in &resolution.ignored {
            report.record_warning(format!("{id}: ignored {key}={value}"));
        }
        grid.set_block(step.position, &resolution.state)
    }
}

impl Default for ReconstructionPlanner {
    fn default() -> Self {
        Self::new(BuilderConfig::default())
    }
}
