//! Family tree simulator - randomized operation harness
//!
//! Drives a [`FamilyTree`] with a seeded mix of valid, edge-case and invalid
//! operations and checks every structural invariant after each step.

use crate::config::TreeConfig;
use crate::handle::FamilyTree;
use crate::invariants::InvariantViolation;
use crate::layout::Position;
use crate::types::{Gender, Individual, IndividualDraft, IndividualId};
use rand::seq::SliceRandom;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::collections::HashMap;

/// Simulator configuration
#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    /// Random seed for reproducibility
    pub seed: u64,
    /// Total operations to execute
    pub total_operations: u64,
    /// Distribution of operation types
    pub operation_distribution: OperationDistribution,
    /// Soft cap on population; above it adds give way to removals
    pub max_individuals: usize,
    /// Stop conditions
    pub stop_on_first_violation: bool,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            total_operations: 10_000,
            operation_distribution: OperationDistribution::default(),
            max_individuals: 200,
            stop_on_first_violation: true,
        }
    }
}

/// Probability distribution for operation generation
#[derive(Debug, Clone)]
pub struct OperationDistribution {
    /// Valid operations (normal editing)
    pub valid_ops: f64,
    /// Edge cases (re-partnering, no-op edits, stale moves)
    pub edge_cases: f64,
    /// Invalid operations (should be rejected)
    pub invalid_ops: f64,
}

impl Default for OperationDistribution {
    fn default() -> Self {
        Self {
            valid_ops: 0.70,
            edge_cases: 0.20,
            invalid_ops: 0.10,
        }
    }
}

/// All operations the simulator can generate
#[derive(Debug, Clone)]
pub enum SimulatedOperation {
    /// Add a new individual.
    Add(IndividualDraft),
    /// Replace the fields of an individual.
    Update(IndividualId, IndividualDraft),
    /// Remove an individual.
    Remove(IndividualId),
    /// Move a card.
    Move(IndividualId, Position),
    /// Export, then import into a fresh tree and compare
    RoundTrip,
    /// Import text that must be rejected without touching the tree
    Import(String),
}

impl SimulatedOperation {
    fn type_name(&self) -> &'static str {
        match self {
            SimulatedOperation::Add(_) => "Add",
            SimulatedOperation::Update(..) => "Update",
            SimulatedOperation::Remove(_) => "Remove",
            SimulatedOperation::Move(..) => "Move",
            SimulatedOperation::RoundTrip => "RoundTrip",
            SimulatedOperation::Import(_) => "Import",
        }
    }
}

/// Expected result classification for an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectedResult {
    /// Operation must be accepted.
    ShouldSucceed,
    /// Operation must be rejected.
    ShouldFail,
}

/// A violation detected during simulation
#[derive(Debug, Clone)]
pub enum Violation {
    /// Operation outcome didn't match expectation
    UnexpectedOutcome {
        /// Position of the operation in the run.
        operation_index: u64,
        /// The offending operation.
        operation: SimulatedOperation,
        /// What the generator expected.
        expected: ExpectedResult,
        /// Display text of the value or error that came back.
        actual: Result<String, String>,
    },
    /// A rejected operation changed the tree anyway
    PartialMutation {
        /// Position of the operation in the run.
        operation_index: u64,
        /// The offending operation.
        operation: SimulatedOperation,
    },
    /// Export followed by import did not reproduce the tree
    RoundTripMismatch { operation_index: u64 },
    /// Structural invariant was violated
    Invariant(InvariantViolation),
}

/// Statistics collected during simulation
#[derive(Debug, Clone, Default)]
pub struct OperationStats {
    /// Operations executed.
    pub total_operations: u64,
    /// Operations the tree accepted.
    pub successful_operations: u64,
    /// Operations the tree rejected.
    pub failed_operations: u64,
    /// Count per operation name.
    pub operations_by_type: HashMap<&'static str, u64>,
}

impl OperationStats {
    /// Count one executed operation.
    pub fn record(&mut self, operation: &SimulatedOperation, succeeded: bool) {
        self.total_operations += 1;
        *self.operations_by_type.entry(operation.type_name()).or_insert(0) += 1;
        if succeeded {
            self.successful_operations += 1;
        } else {
            self.failed_operations += 1;
        }
    }
}

/// Final report from the simulator
#[derive(Debug, Clone)]
pub struct SimulatorReport {
    /// Configuration the run used.
    pub config: SimulatorConfig,
    /// Operation counters.
    pub stats: OperationStats,
    /// Everything that went wrong, in order.
    pub violations: Vec<Violation>,
    /// Population when the run ended.
    pub final_individual_count: usize,
    /// Drawn connections when the run ended.
    pub final_edge_count: usize,
}

impl SimulatorReport {
    /// Check if simulation passed all criteria
    pub fn passed(&self) -> bool {
        self.violations.is_empty()
    }

    /// Generate a text report
    pub fn generate_text(&self) -> String {
        let mut report = String::new();

        report.push_str("=== Family Tree Simulator Report ===\n\n");
        report.push_str(&format!("Seed: {}\n", self.config.seed));
        report.push_str(&format!("Total Operations: {}\n", self.stats.total_operations));
        report.push_str(&format!("Successful: {}\n", self.stats.successful_operations));
        report.push_str(&format!("Failed: {}\n", self.stats.failed_operations));
        report.push_str(&format!("Violations: {}\n", self.violations.len()));
        report.push_str(&format!("Final Individuals: {}\n", self.final_individual_count));
        report.push_str(&format!("Final Edges: {}\n", self.final_edge_count));

        let mut by_type: Vec<_> = self.stats.operations_by_type.iter().collect();
        by_type.sort();
        report.push_str("\n=== Operations ===\n");
        for (name, count) in by_type {
            report.push_str(&format!("{name}: {count}\n"));
        }

        if !self.violations.is_empty() {
            report.push_str("\n=== Violations ===\n");
            for (i, v) in self.violations.iter().enumerate() {
                report.push_str(&format!("{}. {:?}\n", i + 1, v));
            }
        }

        report.push_str(&format!(
            "\n=== Result: {} ===\n",
            if self.passed() { "PASS" } else { "FAIL" }
        ));

        report
    }
}

/// Run the simulator
pub fn run_simulator(config: SimulatorConfig) -> SimulatorReport {
    let mut tree = FamilyTree::with_config(TreeConfig::default().with_seed(config.seed));
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut stats = OperationStats::default();
    let mut violations = Vec::new();

    for i in 0..config.total_operations {
        let (operation, expected) = generate_operation(&mut rng, &config, &tree);
        let before = tree.snapshot();

        let actual = execute_operation(&mut tree, &operation);
        let succeeded = actual.is_ok();

        let outcome_matches = matches!(
            (expected, &actual),
            (ExpectedResult::ShouldSucceed, Ok(_)) | (ExpectedResult::ShouldFail, Err(_))
        );
        if !outcome_matches {
            violations.push(Violation::UnexpectedOutcome {
                operation_index: i,
                operation: operation.clone(),
                expected,
                actual: actual.clone(),
            });
        }

        if !succeeded && tree.snapshot() != before {
            violations.push(Violation::PartialMutation {
                operation_index: i,
                operation: operation.clone(),
            });
        }

        if matches!(operation, SimulatedOperation::RoundTrip) && !round_trips(&tree) {
            violations.push(Violation::RoundTripMismatch { operation_index: i });
        }

        violations.extend(tree.check_invariants().into_iter().map(Violation::Invariant));

        stats.record(&operation, succeeded);

        if config.stop_on_first_violation && !violations.is_empty() {
            break;
        }
    }

    SimulatorReport {
        config,
        stats,
        violations,
        final_individual_count: tree.len(),
        final_edge_count: tree.edges().len(),
    }
}

fn execute_operation(tree: &mut FamilyTree, operation: &SimulatedOperation) -> Result<String, String> {
    let result = match operation {
        SimulatedOperation::Add(draft) => tree.add(draft.clone()).map(|id| id.to_string()),
        SimulatedOperation::Update(id, draft) => tree.update(id, draft.clone()).map(|()| id.to_string()),
        SimulatedOperation::Remove(id) => tree.remove(id).map(|removed| removed.id().to_string()),
        SimulatedOperation::Move(id, position) => tree.set_position(id, *position).map(|()| id.to_string()),
        SimulatedOperation::RoundTrip => tree
            .export()
            .map_err(Into::into)
            .and_then(|text| tree.import(&text))
            .map(|count| count.to_string()),
        SimulatedOperation::Import(text) => tree.import(text).map(|count| count.to_string()),
    };
    result.map_err(|e| e.to_string())
}

fn round_trips(tree: &FamilyTree) -> bool {
    let Ok(text) = tree.export() else {
        return false;
    };
    let mut copy = FamilyTree::new();
    copy.import(&text).is_ok() && copy.snapshot() == tree.snapshot()
}

/// Generate a random operation and its expected outcome
fn generate_operation(
    rng: &mut StdRng,
    config: &SimulatorConfig,
    tree: &FamilyTree,
) -> (SimulatedOperation, ExpectedResult) {
    let distribution = &config.operation_distribution;
    let r: f64 = rng.gen();

    if r < distribution.valid_ops {
        (generate_valid_operation(rng, config, tree), ExpectedResult::ShouldSucceed)
    } else if r < distribution.valid_ops + distribution.edge_cases {
        (generate_edge_case_operation(rng, tree), ExpectedResult::ShouldSucceed)
    } else {
        (generate_invalid_operation(rng, tree), ExpectedResult::ShouldFail)
    }
}

fn generate_valid_operation(
    rng: &mut StdRng,
    config: &SimulatorConfig,
    tree: &FamilyTree,
) -> SimulatedOperation {
    let members: Vec<&Individual> = tree.all().collect();
    if members.is_empty() {
        return SimulatedOperation::Add(random_draft(rng, &members, None));
    }

    let crowded = members.len() >= config.max_individuals;
    match rng.gen_range(0..10) {
        0..=3 if !crowded => SimulatedOperation::Add(random_draft(rng, &members, None)),
        0..=3 | 7 => {
            let target = pick(rng, &members);
            SimulatedOperation::Remove(target.id().clone())
        }
        4 | 5 => {
            let target = pick(rng, &members);
            let draft = random_draft(rng, &members, Some(target.id()));
            SimulatedOperation::Update(target.id().clone(), draft)
        }
        6 => {
            let target = pick(rng, &members);
            let position = Position::new(rng.gen_range(0.0..1200.0), rng.gen_range(0.0..900.0));
            SimulatedOperation::Move(target.id().clone(), position)
        }
        _ => SimulatedOperation::RoundTrip,
    }
}

/// Edge cases: silent re-partnering and unchanged edits
fn generate_edge_case_operation(rng: &mut StdRng, tree: &FamilyTree) -> SimulatedOperation {
    let members: Vec<&Individual> = tree.all().collect();
    if members.len() < 2 {
        return SimulatedOperation::RoundTrip;
    }

    let target = pick(rng, &members);
    match rng.gen_range(0..3) {
        0 => {
            // partner with someone who may already be partnered
            let other = members
                .iter()
                .find(|m| m.id() != target.id() && m.partner().is_some())
                .unwrap_or(&members[0]);
            if other.id() == target.id() {
                return SimulatedOperation::RoundTrip;
            }
            let draft = IndividualDraft::from_individual(target).with_partner(other.id().clone());
            SimulatedOperation::Update(target.id().clone(), draft)
        }
        1 => SimulatedOperation::Update(target.id().clone(), IndividualDraft::from_individual(target)),
        _ => {
            let draft = IndividualDraft::from_individual(target).without_partner();
            SimulatedOperation::Update(target.id().clone(), draft)
        }
    }
}

/// Generate an invalid operation that should be rejected
fn generate_invalid_operation(rng: &mut StdRng, tree: &FamilyTree) -> SimulatedOperation {
    let members: Vec<&Individual> = tree.all().collect();
    let ghost = IndividualId::new(format!("ghost-{}", rng.gen::<u32>()));

    match rng.gen_range(0..6) {
        0 => SimulatedOperation::Add(IndividualDraft::named("   ")),
        1 => SimulatedOperation::Remove(ghost),
        2 => SimulatedOperation::Import("{ not a snapshot".to_string()),
        3 if !members.is_empty() => {
            let target = pick(rng, &members);
            let draft = IndividualDraft::from_individual(target).with_parents([target.id().clone()]);
            SimulatedOperation::Update(target.id().clone(), draft)
        }
        4 => SimulatedOperation::Add(IndividualDraft::named("Orphan").with_parents([ghost])),
        _ => SimulatedOperation::Move(ghost, Position::default()),
    }
}

fn pick<'a>(rng: &mut StdRng, members: &[&'a Individual]) -> &'a Individual {
    members[rng.gen_range(0..members.len())]
}

/// A draft that honours the form's candidate rules: no self, partner not
/// already partnered and not among the chosen parents.
fn random_draft(rng: &mut StdRng, members: &[&Individual], editing: Option<&IndividualId>) -> IndividualDraft {
    let genders = [Gender::Male, Gender::Female, Gender::Other];
    let mut draft = IndividualDraft::named(format!("Person {}", rng.gen::<u16>()))
        .with_gender(genders[rng.gen_range(0..genders.len())]);
    if rng.gen_bool(0.3) {
        draft = draft.with_description("simulated");
    }

    let others: Vec<&Individual> = members.iter().copied().filter(|m| Some(m.id()) != editing).collect();
    let parent_count = rng.gen_range(0..=2.min(others.len()));
    let parents: Vec<IndividualId> = others
        .choose_multiple(rng, parent_count)
        .map(|m| m.id().clone())
        .collect();

    let partner_candidates: Vec<&&Individual> = others
        .iter()
        .filter(|m| m.partner().is_none() && !parents.contains(m.id()))
        .collect();
    if rng.gen_bool(0.4) {
        if let Some(partner) = partner_candidates.choose(rng) {
            draft = draft.with_partner(partner.id().clone());
        }
    }

    draft.with_parents(parents)
}
