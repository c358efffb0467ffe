//! Genetic path optimizer.
//!
//! State machine: `Idle -> Running -> {Completed | Stopped}`. A finished
//! optimizer may be run again. Each generation ends with a cooperative
//! yield so a host can render progress and `stop()` is observed promptly.

use std::sync::atomic::Ordering;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use pathkit_core::{
    stop_flag, thread_safe_rw, EventBus, OptimizerError, PathSegment, PlannerEvent,
    RobotSettings, SequenceItem, Shape, StartPoint, StopFlag, ThreadSafeRw,
};
use pathkit_planner::{valid_shapes, CollisionChecker, MotionProfiler};
use pathkit_settings::{CollisionSettings, OptimizerSettings, ProfilerSettings};

use crate::genome::GenomeLayout;
use crate::operators::{blend, mutate, rank, tournament, Candidate};

/// Lifecycle of a [`PathOptimizer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptimizerState {
    #[default]
    Idle,
    Running,
    Completed,
    Stopped,
}

/// Everything the search reads. Never modified.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationProblem {
    pub start: StartPoint,
    pub segments: Vec<PathSegment>,
    #[serde(default)]
    pub shapes: Vec<Shape>,
    #[serde(default)]
    pub sequence: Vec<SequenceItem>,
    pub robot: RobotSettings,
}

/// Reported after every generation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationProgress {
    pub generation: usize,
    /// Best penalized time found so far.
    pub best_fitness: f64,
    /// Unpenalized time of that candidate.
    pub best_time: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationResult {
    /// Replacement segment list.
    pub segments: Vec<PathSegment>,
    /// Best penalized time.
    pub best_time: f64,
    /// Unpenalized travel time of `segments`.
    pub total_time: f64,
    pub collision_penalty: f64,
    pub stopped: bool,
    pub generations: usize,
    /// Fitness at or above this means every candidate collided.
    pub failure_threshold: f64,
}

impl OptimizationResult {
    /// No collision-free candidate was ever found.
    pub fn failed(&self) -> bool {
        self.best_time >= self.failure_threshold
    }
}

/// Leaves `Running` however `optimize` exits. A future dropped mid-run
/// (timeout, `select!`) lands in `Stopped`.
struct RunGuard<'a> {
    state: &'a ThreadSafeRw<OptimizerState>,
    stop: &'a StopFlag,
    armed: bool,
}

impl<'a> RunGuard<'a> {
    fn new(state: &'a ThreadSafeRw<OptimizerState>, stop: &'a StopFlag) -> Self {
        Self {
            state,
            stop,
            armed: true,
        }
    }

    fn finish(mut self, finished: OptimizerState) {
        *self.state.write() = finished;
        self.stop.store(false, Ordering::SeqCst);
        self.armed = false;
    }
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            tracing::warn!("Optimizer run abandoned before finishing");
            *self.state.write() = OptimizerState::Stopped;
            self.stop.store(false, Ordering::SeqCst);
        }
    }
}

pub struct PathOptimizer {
    problem: OptimizationProblem,
    settings: OptimizerSettings,
    profiler: MotionProfiler,
    checker: CollisionChecker,
    shapes: Vec<Shape>,
    layout: GenomeLayout,
    state: ThreadSafeRw<OptimizerState>,
    stop: StopFlag,
    events: Option<&'static EventBus>,
}

impl PathOptimizer {
    /// Fails fast on missing kinematic limits or invalid search settings,
    /// before the optimizer can ever enter `Running`.
    pub fn new(
        problem: OptimizationProblem,
        settings: OptimizerSettings,
        profiler_settings: ProfilerSettings,
        collision_settings: CollisionSettings,
    ) -> pathkit_core::Result<Self> {
        settings.validate()?;
        let composite_steps = profiler_settings.composite_steps;
        let profiler = MotionProfiler::new(&problem.robot, profiler_settings)?;
        let checker = CollisionChecker::new(collision_settings, &problem.robot, composite_steps);
        let shapes = valid_shapes(&problem.shapes);
        let layout = GenomeLayout::new(&problem.start, &problem.segments, &problem.sequence, &settings);

        Ok(Self {
            problem,
            settings,
            profiler,
            checker,
            shapes,
            layout,
            state: thread_safe_rw(OptimizerState::Idle),
            stop: stop_flag(),
            events: None,
        })
    }

    /// Also publish lifecycle and progress events on `bus`.
    pub fn with_event_bus(mut self, bus: &'static EventBus) -> Self {
        self.events = Some(bus);
        self
    }

    pub fn state(&self) -> OptimizerState {
        *self.state.read()
    }

    pub fn settings(&self) -> &OptimizerSettings {
        &self.settings
    }

    /// Request cancellation. Takes effect at the next generation boundary.
    /// A stop requested before a run starts ends that run before its first
    /// generation. The request is cleared when the run ends.
    pub fn stop(&self) {
        tracing::debug!("Optimizer stop requested");
        self.stop.store(true, Ordering::SeqCst);
    }

    /// Shared flag for callers that cannot hold a reference to the optimizer.
    pub fn stop_handle(&self) -> StopFlag {
        self.stop.clone()
    }

    /// Penalized time of the unmodified input path.
    pub fn baseline(&self) -> f64 {
        self.evaluate(self.layout.encode()).fitness
    }

    /// Run the search, calling `on_progress` after every generation.
    pub async fn optimize<F>(&self, mut on_progress: F) -> pathkit_core::Result<OptimizationResult>
    where
        F: FnMut(GenerationProgress),
    {
        {
            let mut state = self.state.write();
            if *state == OptimizerState::Running {
                return Err(OptimizerError::AlreadyRunning.into());
            }
            if self.layout.is_empty() {
                return Err(OptimizerError::NothingToOptimize.into());
            }
            *state = OptimizerState::Running;
        }
        let guard = RunGuard::new(&self.state, &self.stop);

        let settings = &self.settings;
        let mut rng = match settings.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };

        tracing::info!(
            "Optimizing {} coordinates: population {}, {} generations",
            self.layout.len(),
            settings.population_size,
            settings.max_generations
        );
        self.publish(PlannerEvent::OptimizerStarted {
            population_size: settings.population_size,
            max_generations: settings.max_generations,
        });

        let mut sigma = settings.initial_sigma;
        let mut population = self.initial_population(sigma, &mut rng);
        let mut best = population[0].clone();
        let mut generations = 0;
        let mut stopped = false;

        for generation in 1..=settings.max_generations {
            if self.stop.load(Ordering::SeqCst) {
                stopped = true;
                break;
            }

            population = self.next_generation(&population, sigma, &mut rng);
            if population[0].fitness < best.fitness {
                best = population[0].clone();
            }
            generations = generation;
            sigma = (sigma * settings.sigma_decay).max(settings.min_sigma);

            let progress = GenerationProgress {
                generation,
                best_fitness: best.fitness,
                best_time: best.total_time,
            };
            tracing::debug!("Generation {}: best {:.3}s", generation, best.fitness);
            on_progress(progress);
            self.publish(PlannerEvent::GenerationCompleted {
                generation,
                best_fitness: best.fitness,
            });

            tokio::task::yield_now().await;
        }

        let finished = if stopped {
            OptimizerState::Stopped
        } else {
            OptimizerState::Completed
        };
        guard.finish(finished);

        tracing::info!(
            "Optimizer {:?} after {} generations: best {:.3}s",
            finished,
            generations,
            best.fitness
        );
        self.publish(PlannerEvent::OptimizerFinished {
            generations,
            best_fitness: best.fitness,
            stopped,
        });

        Ok(OptimizationResult {
            segments: self.layout.decode(&best.genome),
            best_time: best.fitness,
            total_time: best.total_time,
            collision_penalty: best.collision_penalty,
            stopped,
            generations,
            failure_threshold: settings.collision_penalty_weight,
        })
    }

    /// The input path plus mutated copies of it, ranked.
    fn initial_population<R: Rng>(&self, sigma: f64, rng: &mut R) -> Vec<Candidate> {
        let original = self.layout.encode();
        let mut population = Vec::with_capacity(self.settings.population_size);
        population.push(self.evaluate(original.clone()));
        while population.len() < self.settings.population_size {
            let mut genome = original.clone();
            mutate(&mut genome, sigma, 1.0, rng);
            population.push(self.evaluate(genome));
        }
        rank(&mut population);
        population
    }

    fn next_generation<R: Rng>(&self, population: &[Candidate], sigma: f64, rng: &mut R) -> Vec<Candidate> {
        let settings = &self.settings;
        let mut next: Vec<Candidate> = population
            .iter()
            .take(settings.elitism)
            .cloned()
            .collect();

        while next.len() < settings.population_size {
            let first = tournament(population, settings.tournament_size, rng);
            let mut genome = if rng.gen_bool(settings.crossover_rate) {
                let second = tournament(population, settings.tournament_size, rng);
                blend(&first.genome, &second.genome, rng)
            } else {
                first.genome.clone()
            };
            mutate(&mut genome, sigma, settings.mutation_rate, rng);
            next.push(self.evaluate(genome));
        }

        rank(&mut next);
        next
    }

    fn evaluate(&self, genome: Vec<f64>) -> Candidate {
        let problem = &self.problem;
        let segments = self.layout.decode(&genome);
        let prediction = self
            .profiler
            .profile_path(&problem.start, &segments, &problem.sequence);
        let collision_penalty =
            self.checker
                .path_penalty(&problem.start, &segments, &problem.sequence, &self.shapes);

        let fitness = if collision_penalty > 0.0 {
            prediction.total_time + self.settings.collision_penalty_weight * collision_penalty
        } else {
            prediction.total_time
        };

        Candidate {
            genome,
            fitness,
            total_time: prediction.total_time,
            collision_penalty,
        }
    }

    fn publish(&self, event: PlannerEvent) {
        if let Some(bus) = self.events {
            bus.publish(event);
        }
    }
}

impl std::fmt::Debug for PathOptimizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PathOptimizer")
            .field("state", &self.state())
            .field("coordinates", &self.layout.len())
            .field("settings", &self.settings)
            .finish()
    }
}
