//! Exhaustive verification of a proof backend against the evaluator.
//!
//! Every candidate assignment is judged twice: by [`Circuit::evaluate`]
//! (ground truth) and by proving and verifying it through a
//! [`ProofPipeline`]. Disagreements are reported as [`Finding`]s and left
//! for the caller to interpret.

use std::{
    fmt,
    sync::{
        atomic::{AtomicU64, Ordering},
        mpsc,
    },
    thread,
};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    Circuit, EvaluationError,
    backend::ProofBackend,
    pipeline::{Keypair, PipelineError, ProofPipeline},
};

/// One assignment of every input wire
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Candidate {
    /// For enumerated candidates, bit `j` is the value of input wire `1 + j`
    pub index: u64,
    pub primary: Vec<bool>,
    pub auxiliary: Vec<bool>,
}

impl Candidate {
    fn from_bits(index: u64, mut bits: Vec<bool>, primary_input_size: usize) -> Self {
        let auxiliary = bits.split_off(primary_input_size);
        Self {
            index,
            primary: bits,
            auxiliary,
        }
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bits = |values: &[bool]| -> String {
            values.iter().map(|bit| if *bit { '1' } else { '0' }).collect()
        };
        write!(
            f,
            "#{} primary=[{}] auxiliary=[{}]",
            self.index,
            bits(&self.primary),
            bits(&self.auxiliary)
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TrialError {
    #[error(transparent)]
    Evaluation(#[from] EvaluationError),
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Input space of {bits} bits exceeds the limit of {max_bits}")]
    SpaceTooLarge { bits: usize, max_bits: u32 },
    #[error("Trial #{index} failed: {source}")]
    Trial { index: u64, source: TrialError },
    #[error("Circuit differs from the one the keys were generated for")]
    ForeignCircuit,
    #[error("Harness worker panicked")]
    WorkerPanicked,
}
pub type HarnessError = Error;

/// Every assignment of the circuit's inputs, primary bits first
pub fn exhaustive_candidates(circuit: &Circuit, max_bits: u32) -> Result<Vec<Candidate>, Error> {
    let bits = circuit.num_inputs();
    if bits > max_bits.min(u64::BITS - 1) as usize {
        return Err(Error::SpaceTooLarge { bits, max_bits });
    }

    Ok((0..1u64 << bits)
        .map(|index| {
            let assignment = (0..bits).map(|j| (index >> j) & 1 == 1).collect();
            Candidate::from_bits(index, assignment, circuit.primary_input_size)
        })
        .collect())
}

/// `count` uniformly random assignments, indexed by draw order
pub fn sampled_candidates(circuit: &Circuit, count: usize, rng: &mut impl Rng) -> Vec<Candidate> {
    (0..count as u64)
        .map(|index| {
            let assignment = (0..circuit.num_inputs()).map(|_| rng.random()).collect();
            Candidate::from_bits(index, assignment, circuit.primary_input_size)
        })
        .collect()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    pub workers: usize,
    pub max_exhaustive_bits: u32,
    /// Abort the batch on the first failed trial instead of recording it
    pub stop_on_error: bool,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            workers: thread::available_parallelism().map_or(1, |n| n.get()),
            max_exhaustive_bits: 16,
            stop_on_error: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum Finding {
    /// Satisfying assignment whose proof was rejected
    CompletenessViolation(Candidate),
    /// Unsatisfying assignment whose proof was accepted
    SoundnessViolation(Candidate),
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CompletenessViolation(candidate) => {
                write!(f, "completeness violation at {candidate}")
            }
            Self::SoundnessViolation(candidate) => write!(f, "soundness violation at {candidate}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HarnessResult {
    pub candidate: Candidate,
    pub ground_truth: bool,
    pub backend_verdict: bool,
}

impl HarnessResult {
    pub fn finding(&self) -> Option<Finding> {
        match (self.ground_truth, self.backend_verdict) {
            (true, false) => Some(Finding::CompletenessViolation(self.candidate.clone())),
            (false, true) => Some(Finding::SoundnessViolation(self.candidate.clone())),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub struct TrialFailure {
    pub index: u64,
    pub error: TrialError,
}

#[derive(Debug, Default)]
pub struct HarnessReport {
    /// Sorted by candidate index
    pub results: Vec<HarnessResult>,
    pub failures: Vec<TrialFailure>,
}

impl HarnessReport {
    pub fn accepted(&self) -> impl Iterator<Item = &Candidate> + '_ {
        self.results
            .iter()
            .filter(|result| result.backend_verdict)
            .map(|result| &result.candidate)
    }

    pub fn findings(&self) -> Vec<Finding> {
        self.results.iter().filter_map(HarnessResult::finding).collect()
    }

    pub fn is_complete(&self) -> bool {
        !self
            .findings()
            .iter()
            .any(|finding| matches!(finding, Finding::CompletenessViolation(_)))
    }

    pub fn is_sound(&self) -> bool {
        !self
            .findings()
            .iter()
            .any(|finding| matches!(finding, Finding::SoundnessViolation(_)))
    }
}

impl fmt::Display for HarnessReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} trials: {} accepted, {} failed, {}, {}",
            self.results.len() + self.failures.len(),
            self.accepted().count(),
            self.failures.len(),
            if self.is_complete() { "complete" } else { "INCOMPLETE" },
            if self.is_sound() { "sound" } else { "UNSOUND" },
        )?;
        for finding in self.findings() {
            write!(f, "\n  {finding}")?;
        }
        for failure in &self.failures {
            write!(f, "\n  trial #{} failed: {}", failure.index, failure.error)?;
        }
        Ok(())
    }
}

pub struct Harness<'p, B> {
    pipeline: &'p ProofPipeline<B>,
    config: HarnessConfig,
}

impl<'p, B: ProofBackend> Harness<'p, B> {
    pub fn new(pipeline: &'p ProofPipeline<B>, config: HarnessConfig) -> Self {
        Self { pipeline, config }
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// All assignments of `circuit`, bounded by `max_exhaustive_bits`
    pub fn run_exhaustive(
        &self,
        circuit: &Circuit,
        keypair: &Keypair<B>,
    ) -> Result<HarnessReport, Error> {
        let candidates = exhaustive_candidates(circuit, self.config.max_exhaustive_bits)?;
        self.run(circuit, keypair, candidates)
    }

    pub fn run(
        &self,
        circuit: &Circuit,
        keypair: &Keypair<B>,
        candidates: Vec<Candidate>,
    ) -> Result<HarnessReport, Error> {
        if *keypair.circuit != *circuit {
            return Err(Error::ForeignCircuit);
        }

        let workers = self.config.workers.clamp(1, candidates.len().max(1));
        log::info!(
            "harness: {} candidates on {workers} workers",
            candidates.len()
        );

        let (tx, rx) = mpsc::channel();
        // Lowest failing index seen so far. Candidates above it are skipped,
        // candidates below it still run so the lowest failure is always found.
        let first_failure = AtomicU64::new(u64::MAX);
        let mut report = HarnessReport::default();

        let panicked = thread::scope(|scope| {
            let handles: Vec<_> = (0..workers)
                .map(|worker| {
                    let tx = tx.clone();
                    let (first_failure, candidates) = (&first_failure, &candidates);
                    scope.spawn(move || {
                        for candidate in candidates.iter().skip(worker).step_by(workers) {
                            if candidate.index > first_failure.load(Ordering::Relaxed) {
                                continue;
                            }
                            let outcome = self.trial(circuit, keypair, candidate);
                            if outcome.is_err() && self.config.stop_on_error {
                                first_failure.fetch_min(candidate.index, Ordering::Relaxed);
                            }
                            if tx.send((candidate.index, outcome)).is_err() {
                                break;
                            }
                        }
                    })
                })
                .collect();
            drop(tx);

            for (index, outcome) in rx {
                match outcome {
                    Ok(result) => {
                        if let Some(finding) = result.finding() {
                            log::warn!("harness: {finding}");
                        }
                        report.results.push(result);
                    }
                    Err(error) => {
                        log::error!("harness: trial #{index} failed: {error}");
                        report.failures.push(TrialFailure { index, error });
                    }
                }
            }

            handles
                .into_iter()
                .map(|handle| handle.join())
                .filter(Result::is_err)
                .count()
        });
        if panicked > 0 {
            return Err(Error::WorkerPanicked);
        }

        report.results.sort_by_key(|result| result.candidate.index);
        report.failures.sort_by_key(|failure| failure.index);

        if self.config.stop_on_error && !report.failures.is_empty() {
            let TrialFailure { index, error } = report.failures.remove(0);
            return Err(Error::Trial {
                index,
                source: error,
            });
        }

        log::info!("harness: {report}");
        Ok(report)
    }

    fn trial(
        &self,
        circuit: &Circuit,
        keypair: &Keypair<B>,
        candidate: &Candidate,
    ) -> Result<HarnessResult, TrialError> {
        let ground_truth = circuit.evaluate(&candidate.primary, &candidate.auxiliary)?;
        let proof = self.pipeline.prove(
            &keypair.proving_key,
            &candidate.primary,
            &candidate.auxiliary,
        )?;
        let backend_verdict =
            self.pipeline
                .verify(&keypair.verifying_key, &candidate.primary, &proof)?;

        Ok(HarnessResult {
            candidate: candidate.clone(),
            ground_truth,
            backend_verdict,
        })
    }
}
