//! # PathKit Optimizer
//!
//! Population-based search for a faster collision-free version of a path.
//! Candidates perturb unlocked control points (and optionally end points),
//! and are scored by the motion profiler plus a collision penalty. Parents
//! are picked by tournament and mixed by blend crossover before a Gaussian
//! mutation whose variance decays every generation.

pub mod genome;
pub mod operators;
pub mod optimizer;

pub use genome::GenomeLayout;
pub use optimizer::{
    GenerationProgress, OptimizationProblem, OptimizationResult, OptimizerState, PathOptimizer,
};
